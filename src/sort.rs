use log::debug;

use crate::manifest::ManifestBundle;
use crate::naming::entry_key;

/// Orders modules inside a bundle by tag name and records the first tag as
/// the bundle's sort key.
pub fn sort_bundle_modules(bundle: &mut ManifestBundle) {
    bundle
        .modules
        .sort_by(|a, b| a.tag_name.cmp(&b.tag_name));
    bundle.sort_key = bundle.modules.first().map(|m| m.tag_name.clone());
}

/// Reorders bundles and their modules so output is identical from build to
/// build, whatever the declaration or map iteration order was.
pub fn sort_bundles(mut bundles: Vec<ManifestBundle>) -> Vec<ManifestBundle> {
    for bundle in &mut bundles {
        sort_bundle_modules(bundle);
    }

    // Equal first tags only happen when a tag is declared in several bundles.
    let mut keyed: Vec<(String, ManifestBundle)> = bundles
        .into_iter()
        .map(|bundle| (entry_key(&bundle), bundle))
        .collect();
    keyed.sort_by(|(a_entry, a), (b_entry, b)| {
        a.sort_key
            .cmp(&b.sort_key)
            .then_with(|| a_entry.cmp(b_entry))
    });

    debug!("sorted {} bundles", keyed.len());
    keyed.into_iter().map(|(_, bundle)| bundle).collect()
}
