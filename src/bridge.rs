//! JSON bridge for the JavaScript build host.
//!
//! Runs planning only (resolution, validation, sorting, naming). Style and
//! module compilation stay on the host side.

#[cfg(feature = "napi")]
use napi_derive::napi;
use serde::{Deserialize, Serialize};

use crate::config::BundlingConfig;
use crate::diagnostics::{has_error, Diagnostic};
use crate::error::Result;
use crate::manifest::{EncapsulationMode, ModuleRecord};
use crate::naming::{bundle_id, entry_key};
use crate::orchestrate::plan_bundles;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanInput {
    pub modules: Vec<ModuleRecord>,
    #[serde(default)]
    pub config: BundlingConfig,
    /// Diagnostics the build has collected so far.
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedBundle {
    pub id: String,
    pub entry_key: String,
    pub components: Vec<String>,
    pub encapsulation: Option<EncapsulationMode>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanOutput {
    pub bundles: Vec<PlannedBundle>,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn plan(input: PlanInput) -> PlanOutput {
    let PlanInput {
        modules,
        config,
        mut diagnostics,
    } = input;

    if has_error(&diagnostics) {
        return PlanOutput {
            bundles: Vec::new(),
            diagnostics,
        };
    }

    let bundles = plan_bundles(&modules, &config).merge_into(&mut diagnostics);
    let bundles = bundles
        .iter()
        .map(|bundle| PlannedBundle {
            id: bundle_id(bundle, &config),
            entry_key: entry_key(bundle),
            components: bundle.tags().map(str::to_string).collect(),
            encapsulation: bundle.styled_encapsulation(),
        })
        .collect();

    PlanOutput {
        bundles,
        diagnostics,
    }
}

pub fn plan_bundles_value(input: serde_json::Value) -> Result<serde_json::Value> {
    let input: PlanInput = serde_json::from_value(input)?;
    Ok(serde_json::to_value(plan(input))?)
}

pub fn plan_bundles_json(input: &str) -> Result<String> {
    let input: PlanInput = serde_json::from_str(input)?;
    Ok(serde_json::to_string(&plan(input))?)
}

#[cfg(feature = "napi")]
#[napi]
pub fn plan_bundles_native(input: serde_json::Value) -> napi::Result<serde_json::Value> {
    plan_bundles_value(input).map_err(|e| napi::Error::from_reason(e.to_string()))
}
