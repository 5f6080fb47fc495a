//! Bundle Validator/Splitter
//!
//! Guarantees every emitted bundle holds modules of one encapsulation mode,
//! plus any styleless modules. Conflicting members are moved into sibling
//! bundles instead of being reported.

use log::debug;

use crate::encapsulation::primary_encapsulation;
use crate::manifest::{BundleOrigin, EncapsulationMode, ManifestBundle, ModuleRecord};

// ═══════════════════════════════════════════════════════════════════════════════
// INVARIANT
// ═══════════════════════════════════════════════════════════════════════════════

/// True when all styled modules of the bundle share one encapsulation mode.
pub fn is_encapsulation_consistent(bundle: &ManifestBundle) -> bool {
    let mut styled = bundle.modules.iter().filter(|m| m.has_styles);
    match styled.next() {
        Some(first) => styled.all(|m| m.encapsulation == first.encapsulation),
        None => true,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SPLITTING
// ═══════════════════════════════════════════════════════════════════════════════

fn split_origin(origin: BundleOrigin, mode: EncapsulationMode) -> BundleOrigin {
    match origin {
        BundleOrigin::Declared { index } | BundleOrigin::Split { index, .. } => {
            BundleOrigin::Split { index, mode }
        }
        BundleOrigin::Default => BundleOrigin::Default,
    }
}

/// Appends one or more encapsulation-consistent bundles built from `bundle`
/// to `out`. The primary group keeps the input bundle's origin and content slot;
/// overflow groups follow in the order scoped, shadow, plain.
pub fn validate_bundle(bundle: ManifestBundle, out: &mut Vec<ManifestBundle>) {
    match bundle.modules.len() {
        0 => return,
        1 => {
            out.push(bundle);
            return;
        }
        _ => {}
    }

    let Some(primary) = primary_encapsulation(&bundle.modules) else {
        return;
    };

    let ManifestBundle {
        origin,
        modules,
        sort_key,
        content,
    } = bundle;

    let total = modules.len();
    let mut primary_group: Vec<ModuleRecord> = Vec::with_capacity(total);
    let mut scoped_group = Vec::new();
    let mut shadow_group = Vec::new();
    let mut plain_group = Vec::new();

    for module in modules {
        if module.encapsulation == primary || !module.has_styles {
            primary_group.push(module);
            continue;
        }
        match module.encapsulation {
            EncapsulationMode::Scoped => scoped_group.push(module),
            EncapsulationMode::Shadow => shadow_group.push(module),
            EncapsulationMode::None => plain_group.push(module),
        }
    }

    let before = out.len();

    if !primary_group.is_empty() {
        out.push(ManifestBundle {
            origin,
            modules: primary_group,
            sort_key,
            content,
        });
    }

    let overflow = [
        (EncapsulationMode::Scoped, scoped_group),
        (EncapsulationMode::Shadow, shadow_group),
        (EncapsulationMode::None, plain_group),
    ];
    for (mode, group) in overflow {
        if !group.is_empty() {
            out.push(ManifestBundle::new(split_origin(origin, mode), group));
        }
    }

    if out.len() - before > 1 {
        debug!(
            "split {:?} ({} modules, primary {}) into {} bundles",
            origin,
            total,
            primary.as_str(),
            out.len() - before
        );
    }
}

pub fn validate_bundles(bundles: Vec<ManifestBundle>) -> Vec<ManifestBundle> {
    let mut out = Vec::with_capacity(bundles.len());
    for bundle in bundles {
        validate_bundle(bundle, &mut out);
    }
    out
}
