#[cfg(target_os = "windows")]
pub mod attributes;
#[cfg(target_os = "windows")]
pub mod error;
#[cfg(target_os = "windows")]
pub mod format;
pub mod logger;
pub mod reserved;

#[cfg(target_os = "windows")]
pub mod query;
#[cfg(target_os = "windows")]
pub mod set;
#[cfg(target_os = "windows")]
mod utils;
