use crate::io;
use anyhow::Result;
use std::path::PathBuf;

const DEFAULT_CONFIG: &str = r#"# uimigrate configuration

source_dir = "../legacy-app/src/components"
target_dir = "."

# Scaffold test specs next to migrated components
generate_tests = true

[naming]
# Migrated files land under src/components_migrated_from_<tag>/
provenance_tag = "legacy"

# Attribute the target project's tests select elements by
test_attribute_convention = "data-testid"

# "explicit-default" keeps destructuring initializers;
# "assigned-defaults-object" moves them to Component.defaultProps
default_prop_style = "explicit-default"

# Treat relative imports with no matching rule as errors
strict_imports = false

# Ordered prefix substitutions for relative imports; longest match wins
[[naming.import_prefix_map]]
prefix = "../shared/"
replacement = "@app/shared/"
"#;

pub fn init_config(force: bool) -> Result<()> {
    let config_path = PathBuf::from("uimigrate.toml");

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    io::write_file(&config_path, DEFAULT_CONFIG)?;
    println!("Created uimigrate.toml configuration file");

    Ok(())
}
