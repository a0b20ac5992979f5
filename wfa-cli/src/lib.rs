pub mod cli;
pub mod configuration;

#[cfg(target_os = "windows")]
pub mod runner;
