use serde::{Deserialize, Serialize};

use crate::error::BundleError;

// ═══════════════════════════════════════════════════════════════════════════════
// DIAGNOSTIC HEADERS
// ═══════════════════════════════════════════════════════════════════════════════

pub const DIAG_TYPE_BUNDLING: &str = "bundling";
pub const HEADER_BUNDLE_ERROR: &str = "Bundle Error";
pub const HEADER_BUNDLE_WARNING: &str = "Bundle Warning";
pub const HEADER_BUNDLING_FAILED: &str = "Bundling Error";

// ═══════════════════════════════════════════════════════════════════════════════
// DIAGNOSTIC RECORD
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    Info,
    Warning,
    Error,
}

/// One entry of the build's append-only diagnostics list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    #[serde(rename = "type")]
    pub diagnostic_type: String,
    pub header: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(level: DiagnosticLevel, header: &str, message: impl Into<String>) -> Self {
        Diagnostic {
            level,
            diagnostic_type: DIAG_TYPE_BUNDLING.to_string(),
            header: header.to_string(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Error, HEADER_BUNDLE_ERROR, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Warning, HEADER_BUNDLE_WARNING, message)
    }

    /// Converts a failure of the whole bundling phase into a reportable error.
    pub fn from_error(err: &BundleError) -> Self {
        Self::new(DiagnosticLevel::Error, HEADER_BUNDLING_FAILED, err.to_string())
    }

    pub fn is_error(&self) -> bool {
        self.level == DiagnosticLevel::Error
    }
}

/// True if any diagnostic in the list is fatal.
pub fn has_error(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_error)
}

// ═══════════════════════════════════════════════════════════════════════════════
// RESULT WITH SIDE CHANNEL
// ═══════════════════════════════════════════════════════════════════════════════

/// A step's primary output together with the diagnostics it produced, in
/// emission order. Callers merge the diagnostics into their own list.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnosed<T> {
    pub value: T,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Diagnosed<T> {
    pub fn new(value: T, diagnostics: Vec<Diagnostic>) -> Self {
        Self { value, diagnostics }
    }

    /// Appends this step's diagnostics to `sink` and hands back the value.
    pub fn merge_into(self, sink: &mut Vec<Diagnostic>) -> T {
        sink.extend(self.diagnostics);
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_type_key() {
        let diag = Diagnostic::error("Component tag \"x-a\" is missing");
        let json = serde_json::to_value(&diag).unwrap();
        assert_eq!(json["level"], "error");
        assert_eq!(json["type"], "bundling");
        assert_eq!(json["header"], "Bundle Error");
    }

    #[test]
    fn test_has_error_ignores_warnings() {
        let mut diags = vec![
            Diagnostic::warning("odd tag"),
            Diagnostic::new(DiagnosticLevel::Info, "Note", "fine"),
        ];
        assert!(!has_error(&diags));
        diags.push(Diagnostic::error("missing"));
        assert!(has_error(&diags));
    }

    #[test]
    fn test_merge_preserves_order() {
        let mut sink = vec![Diagnostic::warning("first")];
        let step = Diagnosed::new(7, vec![Diagnostic::error("second")]);
        let value = step.merge_into(&mut sink);
        assert_eq!(value, 7);
        assert_eq!(sink.len(), 2);
        assert_eq!(sink[1].message, "second");
    }
}
