use std::io::Write;

use log::{LevelFilter, SetLoggerError};
use serde::{Deserialize, Serialize};
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => Self::Off,
            LogLevel::Error => Self::Error,
            LogLevel::Warn => Self::Warn,
            LogLevel::Info => Self::Info,
            LogLevel::Debug => Self::Debug,
            LogLevel::Trace => Self::Trace,
        }
    }
}

fn _configuration() -> Config {
    ConfigBuilder::new()
        .set_location_level(LevelFilter::Debug)
        .build()
}

// Terminal logging goes to stderr so the formatter keeps stdout to itself;
// a file logger is added only when the caller provides a writer.
pub fn initialize_logger<W>(level: LogLevel, file: Option<W>) -> Result<(), SetLoggerError>
where
    W: Write + Send + 'static,
{
    let filter = LevelFilter::from(level);
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        filter,
        _configuration(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];
    if let Some(file) = file {
        loggers.push(WriteLogger::new(filter, _configuration(), file));
    }

    CombinedLogger::init(loggers)
}

#[cfg(test)]
mod tests {
    use log::LevelFilter;

    use super::LogLevel;

    #[test]
    fn default_level_is_info() {
        assert_eq!(LogLevel::default(), LogLevel::Info);
    }

    #[test]
    fn levels_map_to_matching_filters() {
        assert_eq!(LevelFilter::from(LogLevel::Off), LevelFilter::Off);
        assert_eq!(LevelFilter::from(LogLevel::Warn), LevelFilter::Warn);
        assert_eq!(LevelFilter::from(LogLevel::Trace), LevelFilter::Trace);
    }
}
