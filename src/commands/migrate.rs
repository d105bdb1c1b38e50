use crate::config::MigrationConfig;
use crate::core::ExitStatus;
use crate::io::output::{create_writer, OutputFormat};
use crate::orchestrator;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct MigrateOptions {
    pub source: Option<PathBuf>,
    pub target: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub dry_run: bool,
    pub skip_tests: bool,
    pub tag: Option<String>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
}

/// Assemble the batch configuration from file + flags, run the migration,
/// and write the report. Returns the batch exit status; fatal errors
/// propagate as process failure.
pub fn handle_migrate(options: MigrateOptions) -> Result<ExitStatus> {
    let config = resolve_config(&options)?;

    let report = orchestrator::run(&config).map_err(|e| anyhow::anyhow!(e))?;

    let destination: Box<dyn Write> = match &options.output {
        Some(path) => Box::new(
            File::create(path)
                .with_context(|| format!("Failed to create report file {}", path.display()))?,
        ),
        None => Box::new(std::io::stdout()),
    };
    create_writer(destination, options.format).write_report(&report)?;

    Ok(report.exit_status())
}

fn resolve_config(options: &MigrateOptions) -> Result<MigrationConfig> {
    let config_path = options
        .config
        .clone()
        .or_else(|| discover_config(Path::new("uimigrate.toml")));

    let mut config = match config_path {
        Some(path) => MigrationConfig::from_file(&path)?,
        None => {
            let (Some(source), Some(target)) = (&options.source, &options.target) else {
                anyhow::bail!(
                    "--source and --target are required when no configuration file is present"
                );
            };
            MigrationConfig::new(source, target)
        }
    };

    if let Some(source) = &options.source {
        config.source_dir = source.clone();
    }
    if let Some(target) = &options.target {
        config.target_dir = target.clone();
    }
    if options.dry_run {
        config.dry_run = true;
    }
    if options.skip_tests {
        config.generate_tests = false;
    }
    if let Some(tag) = &options.tag {
        config.naming.provenance_tag = tag.clone();
    }
    config
        .naming
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    Ok(config)
}

fn discover_config(path: &Path) -> Option<PathBuf> {
    path.exists().then(|| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_options() -> MigrateOptions {
        MigrateOptions {
            source: Some(PathBuf::from("old")),
            target: Some(PathBuf::from("new")),
            config: None,
            dry_run: false,
            skip_tests: false,
            tag: None,
            format: OutputFormat::Terminal,
            output: None,
        }
    }

    #[test]
    fn flags_override_defaults() {
        let mut options = base_options();
        options.dry_run = true;
        options.skip_tests = true;
        options.tag = Some("projB".to_string());
        let config = resolve_config(&options).unwrap();
        assert!(config.dry_run);
        assert!(!config.generate_tests);
        assert_eq!(config.naming.provenance_tag, "projB");
    }

    #[test]
    fn missing_roots_without_config_is_an_error() {
        let mut options = base_options();
        options.source = None;
        assert!(resolve_config(&options).is_err());
    }

    #[test]
    fn invalid_tag_is_rejected() {
        let mut options = base_options();
        options.tag = Some("a/b".to_string());
        assert!(resolve_config(&options).is_err());
    }
}
