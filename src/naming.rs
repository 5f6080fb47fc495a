use sha2::{Digest, Sha256};

use crate::config::BundlingConfig;
use crate::manifest::ManifestBundle;

/// Tag names of the bundle, sorted and joined with `.`. Independent of
/// module order inside the bundle.
pub fn entry_key(bundle: &ManifestBundle) -> String {
    let mut tags: Vec<&str> = bundle.tags().collect();
    tags.sort_unstable();
    tags.join(".")
}

pub fn compute_hash(source: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Output name of a bundle. With `hash_file_names` the entry key is replaced
/// by a truncated content hash of it.
pub fn bundle_id(bundle: &ManifestBundle, config: &BundlingConfig) -> String {
    let key = entry_key(bundle);
    if !config.hash_file_names {
        return key;
    }
    let mut hash = compute_hash(&key);
    hash.truncate(config.effective_hash_length());
    hash
}
