//! Manifest data model
//!
//! Module records come from the upstream component compiler and are only read
//! here. Manifest bundles are built fresh each build and handed to the
//! downstream style and module bundlers.

use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════════
// INPUT TYPES
// ═══════════════════════════════════════════════════════════════════════════════

/// CSS scoping strategy of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncapsulationMode {
    /// Plain global CSS.
    #[default]
    None,
    /// CSS scoped to the component instance.
    Scoped,
    /// Isolated shadow-tree styling.
    Shadow,
}

impl EncapsulationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EncapsulationMode::None => "none",
            EncapsulationMode::Scoped => "scoped",
            EncapsulationMode::Shadow => "shadow",
        }
    }
}

/// A compiled component module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleRecord {
    pub tag_name: String,
    #[serde(default)]
    pub encapsulation: EncapsulationMode,
    #[serde(default)]
    pub has_styles: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

impl ModuleRecord {
    pub fn new(tag_name: &str, encapsulation: EncapsulationMode, has_styles: bool) -> Self {
        Self {
            tag_name: tag_name.to_string(),
            encapsulation,
            has_styles,
            file_path: None,
        }
    }

    pub fn with_file_path(mut self, file_path: &str) -> Self {
        self.file_path = Some(file_path.to_string());
        self
    }
}

/// User-declared list of tag names that should ship together.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleDeclaration {
    #[serde(default)]
    pub components: Vec<String>,
}

impl BundleDeclaration {
    pub fn new<S: AsRef<str>>(components: &[S]) -> Self {
        Self {
            components: components.iter().map(|c| c.as_ref().to_string()).collect(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// OUTPUT TYPES
// ═══════════════════════════════════════════════════════════════════════════════

/// Where a manifest bundle came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum BundleOrigin {
    /// Built from the declaration at `index`.
    Declared { index: usize },
    /// Overflow group split out of declaration `index`.
    Split {
        index: usize,
        mode: EncapsulationMode,
    },
    /// A component no declaration mentions.
    Default,
}

/// Text slots filled by downstream compilers. Never written by this crate
/// before both collaborators have returned.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleContent {
    pub styles: Option<String>,
    pub code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestBundle {
    pub origin: BundleOrigin,
    pub modules: Vec<ModuleRecord>,
    /// Tag of the first module once modules are sorted.
    #[serde(default)]
    pub sort_key: Option<String>,
    #[serde(default)]
    pub content: BundleContent,
}

impl ManifestBundle {
    pub fn new(origin: BundleOrigin, modules: Vec<ModuleRecord>) -> Self {
        Self {
            origin,
            modules,
            sort_key: None,
            content: BundleContent::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.modules.iter().map(|m| m.tag_name.as_str())
    }

    /// Encapsulation shared by the styled modules, if any module has styles.
    pub fn styled_encapsulation(&self) -> Option<EncapsulationMode> {
        self.modules
            .iter()
            .find(|m| m.has_styles)
            .map(|m| m.encapsulation)
    }
}
