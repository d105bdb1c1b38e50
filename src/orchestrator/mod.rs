use crate::analyzers::{self, SourceTree};
use crate::config::MigrationConfig;
use crate::core::errors::MigrateError;
use crate::core::{ComponentDescriptor, MigrationEvent, MigrationReport};
use crate::diff;
use crate::io::{self, walker::ComponentWalker};
use crate::testgen::{self, TestEmitter, TestingLibraryEmitter};
use crate::transform::{self, NameRegistry, TransformOutcome};
use log::{debug, info};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// External cancellation signal. Cancelling stops scheduling new file
/// pipelines; files already past analysis run to completion, and nothing
/// already written is rolled back.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Disposition {
    InFlight,
    Migrated,
    Skipped,
    Failed,
}

/// Per-file pipeline state. Events buffer here and merge into the report in
/// stable input order after all phases finish, so the report ordering never
/// depends on worker scheduling.
struct FileState {
    path: PathBuf,
    relative: PathBuf,
    events: Vec<MigrationEvent>,
    tree: Option<SourceTree>,
    descriptor: Option<ComponentDescriptor>,
    outcome: Option<TransformOutcome>,
    disposition: Disposition,
}

impl FileState {
    fn new(path: PathBuf, relative: PathBuf) -> Self {
        Self {
            path,
            relative,
            events: Vec::new(),
            tree: None,
            descriptor: None,
            outcome: None,
            disposition: Disposition::InFlight,
        }
    }

    fn fail(&mut self, message: String) {
        self.events
            .push(MigrationEvent::error(&self.relative, message));
        self.disposition = Disposition::Failed;
    }
}

/// Run a full batch migration.
pub fn run(config: &MigrationConfig) -> Result<MigrationReport, MigrateError> {
    run_with_cancel(config, &CancelToken::new())
}

/// Run a batch with an external cancellation token.
///
/// Stages per file: parse + analyze (parallel), transform planning
/// (sequential in stable input order, so collision attribution is
/// deterministic), then emission — test synthesis plus diff or write
/// (parallel). A failure in any stage is recorded and the batch continues;
/// only unreadable roots abort the run.
pub fn run_with_cancel(
    config: &MigrationConfig,
    token: &CancelToken,
) -> Result<MigrationReport, MigrateError> {
    validate_roots(config)?;

    let discovered = ComponentWalker::new(config.source_dir.clone())
        .walk()
        .map_err(|e| MigrateError::fatal(format!("failed to scan source root: {e}")))?;

    let mut report = MigrationReport::new();

    let mut skipped_tests: Vec<PathBuf> = discovered
        .source_tests
        .iter()
        .map(|p| relative_to_root(p, &config.source_dir))
        .collect();
    skipped_tests.sort();
    for rel in skipped_tests {
        report.append(MigrationEvent::info(
            &rel,
            "source test file; target tests are regenerated instead",
        ));
        report.record_skipped();
    }

    let mut jobs: Vec<FileState> = discovered
        .components
        .into_iter()
        .map(|path| {
            let relative = relative_to_root(&path, &config.source_dir);
            FileState::new(path, relative)
        })
        .collect();
    jobs.sort_by(|a, b| a.relative.cmp(&b.relative));
    info!(
        "migrating {} component files from {}",
        jobs.len(),
        config.source_dir.display()
    );

    // Phase 1: parse + analyze. Cancellation is only honored here — a file
    // that enters the pipeline runs to completion.
    let jobs: Vec<FileState> = jobs
        .into_par_iter()
        .map(|job| analyze_file(job, token))
        .collect();

    // Phase 2: transform planning against the shared registry.
    let mut registry = NameRegistry::new();
    let jobs: Vec<FileState> = jobs
        .into_iter()
        .map(|job| plan_file(job, config, &mut registry))
        .collect();

    // Phase 3: test synthesis + diff/write.
    let jobs: Vec<FileState> = jobs
        .into_par_iter()
        .map(|job| emit_file(job, config))
        .collect();

    for job in jobs {
        report.append_all(job.events);
        match job.disposition {
            Disposition::Migrated => report.record_migrated(),
            Disposition::Skipped => report.record_skipped(),
            Disposition::Failed => report.record_failed(),
            Disposition::InFlight => report.record_failed(),
        }
    }

    Ok(report)
}

fn validate_roots(config: &MigrationConfig) -> Result<(), MigrateError> {
    if !io::dir_exists(&config.source_dir) {
        return Err(MigrateError::fatal(format!(
            "source root {} is not a readable directory",
            config.source_dir.display()
        )));
    }
    if std::fs::read_dir(&config.source_dir).is_err() {
        return Err(MigrateError::fatal(format!(
            "source root {} is not readable",
            config.source_dir.display()
        )));
    }
    if config.target_dir.exists() && !config.target_dir.is_dir() {
        return Err(MigrateError::fatal(format!(
            "target root {} is not a directory",
            config.target_dir.display()
        )));
    }
    if !config.target_dir.exists() && !config.dry_run {
        io::ensure_dir(&config.target_dir).map_err(|e| {
            MigrateError::fatal(format!(
                "cannot create target root {}: {e}",
                config.target_dir.display()
            ))
        })?;
    }
    Ok(())
}

fn relative_to_root(path: &Path, root: &Path) -> PathBuf {
    path.strip_prefix(root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}

fn analyze_file(mut job: FileState, token: &CancelToken) -> FileState {
    if token.is_cancelled() {
        job.events.push(MigrationEvent::info(
            &job.relative,
            "cancelled before processing started",
        ));
        job.disposition = Disposition::Skipped;
        return job;
    }

    debug!("analyzing {}", job.path.display());
    let content = match io::read_file(&job.path) {
        Ok(content) => content,
        Err(e) => {
            job.fail(format!("Io: {e}"));
            return job;
        }
    };

    let tree = match SourceTree::parse_file_content(&content, &job.path) {
        Ok(tree) => tree,
        Err(e) => {
            job.fail(format!("{}: {e}", e.kind()));
            return job;
        }
    };

    match analyzers::analyze(&tree) {
        Ok(descriptor) => {
            for write in &descriptor.cross_cutting_effects {
                job.events.push(
                    MigrationEvent::warning(
                        &job.relative,
                        format!("write to '{write}' escapes the component; manual review required"),
                    )
                    .with_component(&descriptor.name),
                );
            }
            if !descriptor.unknown_props.is_empty() {
                let names: Vec<&str> =
                    descriptor.unknown_props.iter().map(String::as_str).collect();
                job.events.push(
                    MigrationEvent::info(
                        &job.relative,
                        format!(
                            "props not statically enumerable; observed: {}",
                            names.join(", ")
                        ),
                    )
                    .with_component(&descriptor.name),
                );
            }
            job.tree = Some(tree);
            job.descriptor = Some(descriptor);
        }
        Err(e) => job.fail(format!("{}: {e}", e.kind())),
    }
    job
}

fn plan_file(
    mut job: FileState,
    config: &MigrationConfig,
    registry: &mut NameRegistry,
) -> FileState {
    if job.disposition != Disposition::InFlight {
        return job;
    }
    let Some(name) = job.descriptor.as_ref().map(|d| d.name.clone()) else {
        return job;
    };

    let result = match (job.tree.as_ref(), job.descriptor.as_ref()) {
        (Some(tree), Some(descriptor)) => {
            transform::transform(tree, descriptor, &job.relative, config, registry)
        }
        _ => return job,
    };

    match result {
        Ok(outcome) => {
            for warning in &outcome.warnings {
                job.events.push(
                    MigrationEvent::warning(&job.relative, warning.clone()).with_component(&name),
                );
            }
            if let Some(failure) = &outcome.failure {
                let conflicts = outcome.plan.conflicts.len();
                job.events.push(
                    MigrationEvent::error(
                        &job.relative,
                        format!(
                            "{}: {failure} (partial plan kept: target {}, {conflicts} conflict(s))",
                            failure.kind(),
                            outcome.plan.target_path.display(),
                        ),
                    )
                    .with_component(&name),
                );
                job.disposition = Disposition::Failed;
            } else {
                job.outcome = Some(outcome);
            }
        }
        Err(e) => {
            job.fail(format!("Transform: {e}"));
            if let Some(event) = job.events.last_mut() {
                event.component = Some(name);
            }
        }
    }
    job
}

fn emit_file(mut job: FileState, config: &MigrationConfig) -> FileState {
    if job.disposition != Disposition::InFlight {
        return job;
    }
    let Some(outcome) = job.outcome.take() else {
        return job;
    };
    let descriptor = outcome.plan.descriptor.clone();
    let plan = &outcome.plan;
    let target_path = plan.target_path.clone();

    // Test synthesis is part of the pipeline whether or not specs are
    // written; a scaffolding failure must block the write.
    let spec = testgen::scaffold(&descriptor);
    let test_path = transform::test_path_for(plan, config);
    let emitter = TestingLibraryEmitter::new();
    let test_text = emitter.emit_spec(&spec, &import_specifier(&target_path, &test_path));

    if config.dry_run {
        dry_run_events(&mut job, &outcome);
        if config.generate_tests {
            job.events.push(
                MigrationEvent::info(
                    &job.relative,
                    format!(
                        "would write test spec with {} assertions to {}",
                        spec.assertions.len(),
                        test_path.display()
                    ),
                )
                .with_component(&descriptor.name),
            );
        }
        job.disposition = Disposition::Migrated;
        return job;
    }

    if let Err(e) = io::write_file(&target_path, &outcome.output) {
        job.fail(format!("Io: failed to write {}: {e}", target_path.display()));
        return job;
    }
    job.events.push(
        MigrationEvent::info(
            &job.relative,
            format!("migrated to {}", target_path.display()),
        )
        .with_component(&descriptor.name),
    );

    if config.generate_tests {
        if let Err(e) = io::write_file(&test_path, &test_text) {
            job.fail(format!("Io: failed to write {}: {e}", test_path.display()));
            return job;
        }
        job.events.push(
            MigrationEvent::info(
                &job.relative,
                format!(
                    "scaffolded {} assertions in {}",
                    spec.assertions.len(),
                    test_path.display()
                ),
            )
            .with_component(&descriptor.name),
        );
    }

    job.disposition = Disposition::Migrated;
    job
}

fn dry_run_events(job: &mut FileState, outcome: &TransformOutcome) {
    let plan = &outcome.plan;
    let name = plan.descriptor.name.clone();
    let target_path = &plan.target_path;

    let existing = if io::file_exists(target_path) {
        match io::read_file(target_path) {
            Ok(content) => Some(content),
            Err(e) => {
                job.events.push(
                    MigrationEvent::warning(
                        &job.relative,
                        format!(
                            "cannot read existing target {}: {e}; diff unavailable",
                            target_path.display()
                        ),
                    )
                    .with_component(&name),
                );
                None
            }
        }
    } else {
        None
    };

    let summary = diff::compare(&outcome.output, existing.as_deref(), plan);
    job.events.push(
        MigrationEvent::info(
            &job.relative,
            format!(
                "would migrate to {}: {}",
                target_path.display(),
                summary.describe()
            ),
        )
        .with_component(&name),
    );
}

/// Import specifier from the generated test file to the migrated component,
/// without the extension.
fn import_specifier(target_path: &Path, test_path: &Path) -> String {
    let component = target_path.with_extension("");
    let test_dir = test_path.parent().unwrap_or_else(|| Path::new(""));
    let relative = pathdiff::diff_paths(&component, test_dir)
        .unwrap_or_else(|| component.clone());
    let text = relative.to_string_lossy().replace('\\', "/");
    if text.starts_with("./") || text.starts_with("../") {
        text
    } else {
        format!("./{text}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_specifier_walks_out_of_tests_dir() {
        let target = Path::new("new/src/components_migrated_from_b/Widget.jsx");
        let test = Path::new("new/src/components_migrated_from_b/__tests__/Widget.test.jsx");
        assert_eq!(import_specifier(target, test), "../Widget");
    }

    #[test]
    fn import_specifier_handles_nested_component_dirs() {
        let target = Path::new("new/src/components_migrated_from_b/forms/Input.jsx");
        let test = Path::new("new/src/components_migrated_from_b/__tests__/Input.test.jsx");
        assert_eq!(import_specifier(target, test), "../forms/Input");
    }

    #[test]
    fn cancel_token_flips_once() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
        token.cancel();
        assert!(token.is_cancelled());
        let clone = token.clone();
        assert!(clone.is_cancelled());
    }
}
