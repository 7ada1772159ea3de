use std::time::SystemTime;

use parking_lot::Once;
use thiserror::Error;

pub use log::LevelFilter;

/// Global logger instance
/// Based on crate "fern"
pub struct GlobalLogger {}

static LOGGER_INITIALIZED: Once = Once::new();

#[derive(Debug, Error)]
pub enum GlobalLoggerError {
    #[error("Log adapter throwed an error: {0}")]
    LogAdapterError(#[from] fern::InitError),
}

impl GlobalLogger {
    /// Initialize the process-wide logger. Safe to call more than once;
    /// only the first call takes effect.
    pub fn init(level_filter: LevelFilter, log_path: Option<&str>) {
        LOGGER_INITIALIZED.call_once(|| {
            if let Err(err) = GlobalLogger::setup(level_filter, log_path) {
                eprintln!("Failed to initialize hookguard logger: {err:?}");
            }
        });
    }

    fn setup(level_filter: LevelFilter, log_path: Option<&str>) -> Result<(), GlobalLoggerError> {
        let mut dispatch = fern::Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!(
                    "[{} {} {}] {}",
                    humantime::format_rfc3339_seconds(SystemTime::now()),
                    record.level(),
                    record.target(),
                    message
                ))
            })
            .level(level_filter)
            .chain(std::io::stdout());

        if let Some(path) = log_path {
            dispatch = dispatch.chain(fern::log_file(path).map_err(fern::InitError::Io)?);
        }

        dispatch.apply().map_err(fern::InitError::SetLoggerError)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        GlobalLogger::init(LevelFilter::Debug, None);
        GlobalLogger::init(LevelFilter::Trace, None);
        log::debug!("logger initialized twice without panicking");
    }
}
