use anyhow::Result;
use clap::Parser;
use uimigrate::cli::{Cli, Commands};
use uimigrate::commands::{handle_migrate, init_config, MigrateOptions};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Migrate {
            source,
            target,
            config,
            dry_run,
            skip_tests,
            tag,
            format,
            output,
            verbosity,
        } => {
            init_logging(verbosity);
            let status = handle_migrate(MigrateOptions {
                source,
                target,
                config,
                dry_run,
                skip_tests,
                tag,
                format,
                output,
            })?;
            std::process::exit(status.code());
        }
        Commands::Init { force } => {
            init_logging(0);
            init_config(force)
        }
    }
}

fn init_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();
}
