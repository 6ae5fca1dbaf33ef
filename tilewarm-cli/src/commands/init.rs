//! Init command - initialize configuration file.

use tilewarm::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Arguments for the init command.
pub struct InitArgs {
    pub force: bool,
}

/// Run the init command.
pub fn run(args: InitArgs) -> Result<(), CliError> {
    let path = config_file_path();

    if path.exists() && !args.force {
        println!("Configuration file already exists: {}", path.display());
        println!("Use --force to overwrite it with the defaults.");
        return Ok(());
    }

    ConfigFile::default().save()?;

    println!("Configuration file: {}", path.display());
    println!();
    println!("Edit this file to customize tilewarm settings.");
    println!("CLI arguments override config file values when specified.");
    Ok(())
}
