//! Init command implementation

use anyhow::Result;
use std::path::Path;
use tracing::info;

use banana_quest::config::Config;

/// Write a default config file (global location unless `path` is given)
pub fn init_command(path: Option<&Path>, force: bool) -> Result<()> {
    let target = path
        .map(Path::to_path_buf)
        .unwrap_or_else(Config::global_config_path);

    if Config::init_file(&target, force)? {
        info!("Wrote default configuration");
        println!("Created {}", target.display());
    } else {
        println!(
            "Config already exists at {} (use --force to overwrite)",
            target.display()
        );
    }
    Ok(())
}
