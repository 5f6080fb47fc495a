//! Downstream collaborators
//!
//! The bundling core decides which modules ship together. Compiling their
//! styles and scripts and packaging the result happens behind these traits.
//! Both bundlers get the finished, sorted bundle list and return one text per
//! bundle in the same order.

use crate::error::Result;
use crate::manifest::ManifestBundle;

pub trait StyleBundler: Send + Sync {
    fn bundle_styles(&self, bundles: &[ManifestBundle]) -> Result<Vec<String>>;
}

pub trait ModuleBundler: Send + Sync {
    fn bundle_modules(&self, bundles: &[ManifestBundle]) -> Result<Vec<String>>;
}

/// Final generation step. Sees every bundle with both content slots filled.
pub trait BundleWriter: Send + Sync {
    fn write_bundles(&self, bundles: &[ManifestBundle]) -> Result<()>;
}
