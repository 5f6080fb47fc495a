use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::manifest::BundleDeclaration;

const MIN_HASH_LENGTH: usize = 4;
const MAX_HASH_LENGTH: usize = 64;

fn default_hash_length() -> usize {
    8
}

/// Bundling options as loaded from the project config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundlingConfig {
    #[serde(default)]
    pub bundles: Vec<BundleDeclaration>,
    /// Give every component that no declaration mentions its own bundle.
    /// Off by default: only declared bundles are emitted.
    #[serde(default)]
    pub bundle_undeclared: bool,
    #[serde(default)]
    pub hash_file_names: bool,
    #[serde(default = "default_hash_length")]
    pub hash_length: usize,
}

impl Default for BundlingConfig {
    fn default() -> Self {
        Self {
            bundles: Vec::new(),
            bundle_undeclared: false,
            hash_file_names: false,
            hash_length: default_hash_length(),
        }
    }
}

impl BundlingConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_bundles(mut self, bundles: Vec<BundleDeclaration>) -> Self {
        self.bundles = bundles;
        self
    }

    pub fn effective_hash_length(&self) -> usize {
        self.hash_length.clamp(MIN_HASH_LENGTH, MAX_HASH_LENGTH)
    }
}
