//! Tag Resolver
//!
//! Maps user bundle declarations onto compiled module records. Unknown tags
//! are reported and skipped, never fatal to the rest of the declaration.

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use std::collections::{HashMap, HashSet};

use crate::diagnostics::{Diagnosed, Diagnostic};
use crate::manifest::{BundleDeclaration, BundleOrigin, ManifestBundle, ModuleRecord};

lazy_static! {
    /// Lowercase, starts with a letter, contains a hyphen.
    static ref CUSTOM_ELEMENT_TAG: Regex = Regex::new(r"^[a-z][a-z0-9._]*-[a-z0-9._-]*$").unwrap();
}

pub fn is_valid_tag_name(tag: &str) -> bool {
    CUSTOM_ELEMENT_TAG.is_match(tag)
}

fn describe_declaration(index: usize, declaration: &BundleDeclaration) -> String {
    format!("bundle #{} [{}]", index, declaration.components.join(", "))
}

/// Builds one preliminary bundle per declaration that resolves to at least
/// one module. Module order follows declaration order.
pub fn resolve_bundles(
    modules: &[ModuleRecord],
    declarations: &[BundleDeclaration],
) -> Diagnosed<Vec<ManifestBundle>> {
    let mut by_tag: HashMap<&str, &ModuleRecord> = HashMap::with_capacity(modules.len());
    for module in modules {
        by_tag.entry(module.tag_name.as_str()).or_insert(module);
    }

    let mut bundles = Vec::new();
    let mut diagnostics = Vec::new();
    let mut first_declared: HashMap<&str, usize> = HashMap::new();

    for (index, declaration) in declarations.iter().enumerate() {
        if declaration.components.is_empty() {
            continue;
        }

        let mut resolved = Vec::with_capacity(declaration.components.len());
        for tag in &declaration.components {
            if !is_valid_tag_name(tag) {
                diagnostics.push(Diagnostic::warning(format!(
                    "Component tag \"{}\" in {} is not a valid custom element name. Tags must be lowercase and contain a hyphen.",
                    tag,
                    describe_declaration(index, declaration)
                )));
            }

            match first_declared.get(tag.as_str()) {
                Some(&first) if first == index => {
                    diagnostics.push(Diagnostic::warning(format!(
                        "Component tag \"{}\" is listed more than once in {}.",
                        tag,
                        describe_declaration(index, declaration)
                    )));
                    continue;
                }
                Some(&first) => {
                    diagnostics.push(Diagnostic::warning(format!(
                        "Component tag \"{}\" is declared in both {} and {}.",
                        tag,
                        describe_declaration(first, &declarations[first]),
                        describe_declaration(index, declaration)
                    )));
                }
                None => {
                    first_declared.insert(tag.as_str(), index);
                }
            }

            match by_tag.get(tag.as_str()) {
                Some(module) => resolved.push((*module).clone()),
                None => diagnostics.push(Diagnostic::error(format!(
                    "Component tag \"{}\" is declared in {} but no matching component was found within this app.",
                    tag,
                    describe_declaration(index, declaration)
                ))),
            }
        }

        if resolved.is_empty() {
            debug!("declaration #{} resolved to no modules, dropping", index);
            continue;
        }

        bundles.push(ManifestBundle::new(BundleOrigin::Declared { index }, resolved));
    }

    debug!(
        "resolved {} of {} bundle declarations",
        bundles.len(),
        declarations.len()
    );

    Diagnosed::new(bundles, diagnostics)
}

/// One single-module bundle for every module no declaration mentions, in
/// module input order.
pub fn default_bundles(
    modules: &[ModuleRecord],
    declarations: &[BundleDeclaration],
) -> Vec<ManifestBundle> {
    let declared: HashSet<&str> = declarations
        .iter()
        .flat_map(|d| d.components.iter().map(String::as_str))
        .collect();

    let mut seen = HashSet::new();
    modules
        .iter()
        .filter(|m| !declared.contains(m.tag_name.as_str()))
        .filter(|m| seen.insert(m.tag_name.as_str()))
        .map(|m| ManifestBundle::new(BundleOrigin::Default, vec![m.clone()]))
        .collect()
}
