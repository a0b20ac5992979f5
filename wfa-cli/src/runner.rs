use std::error::Error;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use config_file::FromConfigFile;
use log::{debug, error, info, warn};
use wfa_common::attributes::{FLAG_TABLE, FileAttributes, flag_by_name};
use wfa_common::error::is_busy;
use wfa_common::format::print_attributes;
use wfa_common::logger::initialize_logger;
use wfa_common::query::{CASCADE, stat_file_attributes};
use wfa_common::reserved::ReservedNames;
use wfa_common::set::set_file_attributes;

use crate::cli::{Action, Arguments};
use crate::configuration::Configuration;

pub fn run(arguments: Arguments) -> Result<(), Box<dyn Error + Send + Sync>> {
    let configuration = match &arguments.config {
        Some(path) => Configuration::from_config_file(path)?,
        None => Configuration::default(),
    };

    let log_file = match &configuration.log_directory {
        Some(directory) => {
            fs::create_dir_all(directory)?;
            Some(File::create(directory.join(format!(
                "wfa-{}.log",
                SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis()
            )))?)
        }
        None => None,
    };
    initialize_logger(configuration.log_level, log_file)?;
    debug!("Initialized logger");

    let mut reserved = ReservedNames::default();
    reserved.extend(configuration.extra_reserved_names.iter().cloned());

    match arguments.command {
        Action::Stat { paths } => _stat(&paths, &reserved),
        Action::Probe { path } => {
            _probe(&path, &reserved);
            Ok(())
        }
        Action::Set { path, flags } => _set(&path, &flags),
    }
}

fn _stat(paths: &[PathBuf], reserved: &ReservedNames) -> Result<(), Box<dyn Error + Send + Sync>> {
    let mut failures = 0_usize;
    for path in paths {
        if reserved.contains(path) {
            info!("{} is a reserved device name", path.display());
        }

        match stat_file_attributes(path) {
            Ok(attributes) => {
                print!("{}:", path.display());
                print_attributes(attributes);
            }
            Err(error) if is_busy(&error) => {
                warn!("{} is busy, skipping: {error}", path.display());
            }
            Err(error) => {
                error!("Failed to query {}: {error}", path.display());
                failures += 1;
            }
        }
    }

    if failures > 0 {
        Err(format!("{failures} path(s) could not be resolved").into())
    } else {
        Ok(())
    }
}

fn _probe(path: &Path, reserved: &ReservedNames) {
    if reserved.contains(path) {
        info!("{} is a reserved device name", path.display());
    }

    for (name, strategy) in &CASCADE {
        match strategy(path) {
            Ok(attributes) => {
                print!("{name}:");
                print_attributes(attributes);
            }
            Err(error) => println!("{name}: {error}"),
        }
    }

    match stat_file_attributes(path) {
        Ok(attributes) => {
            print!("cascade:");
            print_attributes(attributes);
        }
        Err(error) => println!("cascade: {error}"),
    }
}

fn _set(path: &Path, flags: &[String]) -> Result<(), Box<dyn Error + Send + Sync>> {
    let mut attributes = FileAttributes::default();
    for name in flags {
        match flag_by_name(name) {
            Some(flag) => attributes = attributes.with(flag),
            None => {
                let known = FLAG_TABLE
                    .iter()
                    .map(|(_, flag_name)| *flag_name)
                    .collect::<Vec<_>>()
                    .join(", ");
                return Err(
                    format!("Unknown attribute flag {name:?}, expected one of: {known}").into(),
                );
            }
        }
    }

    set_file_attributes(path, attributes)?;
    debug!("Applied attribute mask {attributes:?} to {}", path.display());

    // Read the flags back through the cascade so the change is visible.
    let applied = stat_file_attributes(path)?;
    print!("{}:", path.display());
    print_attributes(applied);

    Ok(())
}
