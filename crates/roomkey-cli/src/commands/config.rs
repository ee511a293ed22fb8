//! Configuration management commands.

use std::path::Path;

use anyhow::Result;
use roomkey_config::{Paths, RoomkeyConfig};

use crate::ConfigFormat;
use crate::style::{self, colors::SemanticStyle};

/// Show the effective configuration.
pub fn show(project: &Path, config: &RoomkeyConfig, format: ConfigFormat) -> Result<()> {
    match format {
        ConfigFormat::Json => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        ConfigFormat::Toml => {
            print!("{}", config.to_toml()?);
        }
        ConfigFormat::Text => {
            let configured = Paths::is_configured(project);
            let project_file = Paths::project_config_file(project);
            let project_file = if configured {
                project_file.display().to_string()
            } else {
                format!("{} {}", project_file.display(), "(not present)".warning())
            };

            style::print_info_table(&[
                ("Project directory", project.display().to_string()),
                ("Project config", project_file),
                ("Rule table", config.policy.rules_path.display().to_string()),
                ("Fixtures", config.data.fixtures_path.display().to_string()),
                (
                    "Reference date",
                    config
                        .data
                        .reference_date
                        .map_or_else(|| "none (all bookings active)".to_string(), |d| d.to_string()),
                ),
                ("Log level", config.logging.level.clone()),
            ]);

            if !configured {
                style::print_hint("Create roomkey.toml in the project directory to override these defaults");
            }
        }
    }

    Ok(())
}
