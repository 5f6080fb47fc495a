//! Bundling Orchestrator
//!
//! Sequences resolution, validation and sorting, then runs style bundling and
//! module bundling side by side and hands the merged result to the writer.
//! Nothing escapes `Orchestrator::run`: a failed phase becomes a diagnostic.

use log::{debug, info, warn};
use std::panic::{self, AssertUnwindSafe};

use crate::collaborators::{BundleWriter, ModuleBundler, StyleBundler};
use crate::config::BundlingConfig;
use crate::diagnostics::{has_error, Diagnosed, Diagnostic};
use crate::error::{BundleError, Result, Stage};
use crate::manifest::{ManifestBundle, ModuleRecord};
use crate::resolve::{default_bundles, resolve_bundles};
use crate::sort::sort_bundles;
use crate::validate::validate_bundles;

// ═══════════════════════════════════════════════════════════════════════════════
// PLANNING
// ═══════════════════════════════════════════════════════════════════════════════

/// Resolution, validation and sorting. Pure and single-threaded.
pub fn plan_bundles(
    modules: &[ModuleRecord],
    config: &BundlingConfig,
) -> Diagnosed<Vec<ManifestBundle>> {
    let mut diagnostics = Vec::new();

    let mut preliminary = resolve_bundles(modules, &config.bundles).merge_into(&mut diagnostics);
    if config.bundle_undeclared {
        preliminary.extend(default_bundles(modules, &config.bundles));
    }

    let validated = validate_bundles(preliminary);
    let sorted = sort_bundles(validated);

    Diagnosed::new(sorted, diagnostics)
}

// ═══════════════════════════════════════════════════════════════════════════════
// ORCHESTRATOR
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub struct BundleOutcome {
    pub bundles: Vec<ManifestBundle>,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct Orchestrator<'a> {
    styles: &'a dyn StyleBundler,
    modules: &'a dyn ModuleBundler,
    writer: &'a dyn BundleWriter,
}

fn check_slots(stage: Stage, texts: Vec<String>, expected: usize) -> Result<Vec<String>> {
    if texts.len() != expected {
        return Err(BundleError::SlotCountMismatch {
            stage,
            expected,
            actual: texts.len(),
        });
    }
    Ok(texts)
}

/// Runs one collaborator call, turning a panic into a `BundleError` so it
/// cannot unwind through the fan-out or out of the phase.
fn contain<T>(stage: Stage, call: impl FnOnce() -> Result<T>) -> Result<T> {
    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(result) => result,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(BundleError::Panicked { stage, message })
        }
    }
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        styles: &'a dyn StyleBundler,
        modules: &'a dyn ModuleBundler,
        writer: &'a dyn BundleWriter,
    ) -> Self {
        Self {
            styles,
            modules,
            writer,
        }
    }

    /// Runs the bundling phase. `diagnostics` is the build's list so far; if it
    /// already holds an error the phase is skipped.
    pub fn run(
        &self,
        modules: &[ModuleRecord],
        config: &BundlingConfig,
        mut diagnostics: Vec<Diagnostic>,
    ) -> BundleOutcome {
        if has_error(&diagnostics) {
            debug!("skipping bundling, build already has errors");
            return BundleOutcome {
                bundles: Vec::new(),
                diagnostics,
            };
        }

        match self.try_run(modules, config, &mut diagnostics) {
            Ok(bundles) => BundleOutcome {
                bundles,
                diagnostics,
            },
            Err(err) => {
                warn!("bundling phase failed: {}", err);
                diagnostics.push(Diagnostic::from_error(&err));
                BundleOutcome {
                    bundles: Vec::new(),
                    diagnostics,
                }
            }
        }
    }

    fn try_run(
        &self,
        modules: &[ModuleRecord],
        config: &BundlingConfig,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Vec<ManifestBundle>> {
        let mut bundles = plan_bundles(modules, config).merge_into(diagnostics);

        debug_assert!(bundles.iter().all(|b| !b.is_empty()));
        if bundles.is_empty() {
            debug!("no bundles to compile");
            return Ok(bundles);
        }

        let count = bundles.len();
        let (styles, code) = rayon::join(
            || contain(Stage::Styles, || self.styles.bundle_styles(&bundles)),
            || contain(Stage::Modules, || self.modules.bundle_modules(&bundles)),
        );
        let styles = styles.and_then(|texts| check_slots(Stage::Styles, texts, count));
        let code = code.and_then(|texts| check_slots(Stage::Modules, texts, count));

        let (styles, code) = match (styles, code) {
            (Ok(styles), Ok(code)) => (styles, code),
            (styles, code) => {
                for err in [styles.err(), code.err()].into_iter().flatten() {
                    warn!("{}", err);
                    diagnostics.push(Diagnostic::from_error(&err));
                }
                debug!("skipping bundle generation after collaborator failure");
                return Ok(Vec::new());
            }
        };

        for ((bundle, style), text) in bundles.iter_mut().zip(styles).zip(code) {
            bundle.content.styles = Some(style);
            bundle.content.code = Some(text);
        }

        contain(Stage::Write, || self.writer.write_bundles(&bundles))?;

        info!(
            "bundled {} components into {} bundles",
            bundles.iter().map(ManifestBundle::len).sum::<usize>(),
            bundles.len()
        );
        Ok(bundles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{DiagnosticLevel, HEADER_BUNDLING_FAILED};
    use crate::manifest::{BundleDeclaration, EncapsulationMode};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct TagStyles {
        calls: AtomicUsize,
    }

    impl StyleBundler for TagStyles {
        fn bundle_styles(&self, bundles: &[ManifestBundle]) -> Result<Vec<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(bundles
                .iter()
                .map(|b| format!("/* {} */", b.tags().collect::<Vec<_>>().join(" ")))
                .collect())
        }
    }

    struct TagModules {
        calls: AtomicUsize,
        fail: bool,
    }

    impl ModuleBundler for TagModules {
        fn bundle_modules(&self, bundles: &[ManifestBundle]) -> Result<Vec<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(BundleError::collaborator(Stage::Modules, "minifier crashed"));
            }
            Ok(bundles.iter().map(|b| format!("export * from '{}';", b.len())).collect())
        }
    }

    struct PanickingModules;

    impl ModuleBundler for PanickingModules {
        fn bundle_modules(&self, _bundles: &[ManifestBundle]) -> Result<Vec<String>> {
            panic!("rollup exploded");
        }
    }

    struct ShortStyles;

    impl StyleBundler for ShortStyles {
        fn bundle_styles(&self, _bundles: &[ManifestBundle]) -> Result<Vec<String>> {
            Ok(Vec::new())
        }
    }

    #[derive(Default)]
    struct RecordingWriter {
        seen: Mutex<Vec<ManifestBundle>>,
        fail: bool,
    }

    impl BundleWriter for RecordingWriter {
        fn write_bundles(&self, bundles: &[ManifestBundle]) -> Result<()> {
            if self.fail {
                return Err(BundleError::collaborator(Stage::Write, "disk full"));
            }
            self.seen.lock().unwrap().extend_from_slice(bundles);
            Ok(())
        }
    }

    fn styles() -> TagStyles {
        TagStyles {
            calls: AtomicUsize::new(0),
        }
    }

    fn modules_bundler(fail: bool) -> TagModules {
        TagModules {
            calls: AtomicUsize::new(0),
            fail,
        }
    }

    fn app() -> Vec<ModuleRecord> {
        vec![
            ModuleRecord::new("x-btn", EncapsulationMode::Shadow, true),
            ModuleRecord::new("x-card", EncapsulationMode::Shadow, true),
            ModuleRecord::new("x-list", EncapsulationMode::Scoped, true),
        ]
    }

    fn config() -> BundlingConfig {
        BundlingConfig {
            bundle_undeclared: true,
            ..Default::default()
        }
        .with_bundles(vec![BundleDeclaration::new(&["x-card", "x-btn"])])
    }

    #[test]
    fn test_plan_includes_default_bundles() {
        let plan = plan_bundles(&app(), &config());
        let layout: Vec<Vec<&str>> = plan.value.iter().map(|b| b.tags().collect()).collect();
        assert_eq!(layout, vec![vec!["x-btn", "x-card"], vec!["x-list"]]);
        assert!(plan.diagnostics.is_empty());
    }

    #[test]
    fn test_plan_without_default_bundles() {
        let mut config = config();
        config.bundle_undeclared = false;
        let plan = plan_bundles(&app(), &config);
        assert_eq!(plan.value.len(), 1);
    }

    #[test]
    fn test_run_fills_both_slots_before_writing() {
        let styles = styles();
        let modules = modules_bundler(false);
        let writer = RecordingWriter::default();
        let outcome = Orchestrator::new(&styles, &modules, &writer).run(&app(), &config(), vec![]);

        assert!(outcome.diagnostics.is_empty());
        assert_eq!(outcome.bundles.len(), 2);
        let seen = writer.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        for bundle in seen.iter() {
            assert!(bundle.content.styles.is_some());
            assert!(bundle.content.code.is_some());
        }
        assert_eq!(seen[0].content.styles.as_deref(), Some("/* x-btn x-card */"));
    }

    #[test]
    fn test_prior_error_short_circuits() {
        let styles = styles();
        let modules = modules_bundler(false);
        let writer = RecordingWriter::default();
        let prior = vec![Diagnostic::error("type check failed")];
        let outcome = Orchestrator::new(&styles, &modules, &writer).run(&app(), &config(), prior);

        assert!(outcome.bundles.is_empty());
        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(styles.calls.load(Ordering::SeqCst), 0);
        assert_eq!(modules.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_failing_collaborator_does_not_stop_sibling() {
        let styles = styles();
        let modules = modules_bundler(true);
        let writer = RecordingWriter::default();
        let outcome = Orchestrator::new(&styles, &modules, &writer).run(&app(), &config(), vec![]);

        assert_eq!(styles.calls.load(Ordering::SeqCst), 1);
        assert_eq!(modules.calls.load(Ordering::SeqCst), 1);
        assert!(writer.seen.lock().unwrap().is_empty());
        assert!(outcome.bundles.is_empty());
        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(outcome.diagnostics[0].level, DiagnosticLevel::Error);
        assert!(outcome.diagnostics[0].message.contains("minifier crashed"));
    }

    #[test]
    fn test_panicking_collaborator_becomes_diagnostic() {
        let styles = styles();
        let writer = RecordingWriter::default();
        let outcome =
            Orchestrator::new(&styles, &PanickingModules, &writer).run(&app(), &config(), vec![]);

        assert_eq!(styles.calls.load(Ordering::SeqCst), 1);
        assert!(outcome.bundles.is_empty());
        assert!(writer.seen.lock().unwrap().is_empty());
        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(outcome.diagnostics[0].header, HEADER_BUNDLING_FAILED);
        assert!(outcome.diagnostics[0]
            .message
            .contains("module bundling panicked: rollup exploded"));
    }

    #[test]
    fn test_slot_mismatch_reported() {
        let modules = modules_bundler(false);
        let writer = RecordingWriter::default();
        let outcome =
            Orchestrator::new(&ShortStyles, &modules, &writer).run(&app(), &config(), vec![]);

        assert_eq!(outcome.diagnostics.len(), 1);
        assert!(outcome.diagnostics[0]
            .message
            .contains("style bundling returned 0 outputs for 2 bundles"));
        assert!(writer.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_writer_failure_becomes_diagnostic() {
        let styles = styles();
        let modules = modules_bundler(false);
        let writer = RecordingWriter {
            fail: true,
            ..Default::default()
        };
        let outcome = Orchestrator::new(&styles, &modules, &writer).run(&app(), &config(), vec![]);

        assert!(outcome.bundles.is_empty());
        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(outcome.diagnostics[0].header, HEADER_BUNDLING_FAILED);
        assert!(outcome.diagnostics[0].message.contains("disk full"));
    }

    #[test]
    fn test_missing_tag_is_not_fatal() {
        let styles = styles();
        let modules = modules_bundler(false);
        let writer = RecordingWriter::default();
        let config = BundlingConfig::default().with_bundles(vec![BundleDeclaration::new(&[
            "x-btn",
            "x-gone",
        ])]);
        let outcome = Orchestrator::new(&styles, &modules, &writer).run(&app(), &config, vec![]);

        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(outcome.bundles.len(), 1);
        assert_eq!(writer.seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_no_bundles_skips_collaborators() {
        let styles = styles();
        let modules = modules_bundler(false);
        let writer = RecordingWriter::default();
        let outcome =
            Orchestrator::new(&styles, &modules, &writer).run(&[], &BundlingConfig::default(), vec![]);

        assert!(outcome.bundles.is_empty());
        assert_eq!(styles.calls.load(Ordering::SeqCst), 0);
    }
}
