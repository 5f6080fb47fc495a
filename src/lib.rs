//! # Manifest Bundling Engine
//!
//! Decides which compiled component modules ship together and in what order.
//!
//! ## Bundle Invariants
//!
//! 1. **Encapsulation**: every emitted bundle contains modules of a single
//!    encapsulation mode, plus any modules that declare no styles at all.
//!    Conflicting members are split into sibling bundles, never reported.
//!
//! 2. **Primary Mode**: the mode most members use anchors the bundle.
//!    Equal counts resolve `none`, then `scoped`, then `shadow`.
//!
//! 3. **Ordering**: modules are ordered by tag name inside a bundle and
//!    bundles by their first tag, so output naming is stable between builds.
//!
//! 4. **Partial Success**: an unknown tag is an error diagnostic for that tag
//!    only. The rest of the declaration and every other bundle still builds.
//!
//! 5. **Fan-out/Fan-in**: style and module bundling run concurrently and both
//!    finish before bundle generation reads either result.

mod bridge;
mod collaborators;
mod config;
mod diagnostics;
mod encapsulation;
mod error;
mod manifest;
mod naming;
mod orchestrate;
mod resolve;
mod sort;
mod validate;


#[cfg(feature = "napi")]
pub use bridge::plan_bundles_native;

pub use bridge::{plan, plan_bundles_json, plan_bundles_value, PlanInput, PlanOutput, PlannedBundle};
pub use collaborators::{BundleWriter, ModuleBundler, StyleBundler};
pub use config::BundlingConfig;
pub use diagnostics::{has_error, Diagnosed, Diagnostic, DiagnosticLevel};
pub use encapsulation::primary_encapsulation;
pub use error::{BundleError, Stage};
pub use manifest::{
    BundleContent, BundleDeclaration, BundleOrigin, EncapsulationMode, ManifestBundle,
    ModuleRecord,
};
pub use naming::{bundle_id, entry_key};
pub use orchestrate::{plan_bundles, BundleOutcome, Orchestrator};
pub use resolve::{default_bundles, is_valid_tag_name, resolve_bundles};
pub use sort::sort_bundles;
pub use validate::{is_encapsulation_consistent, validate_bundle, validate_bundles};
