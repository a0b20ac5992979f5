use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use wfa_common::logger::LogLevel;

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Configuration {
    pub log_level: LogLevel,
    pub log_directory: Option<PathBuf>,
    pub extra_reserved_names: Vec<String>,
}
