use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::prelude::*;

use crate::CliError;
use crate::config::{LogFormat, LoggingConfig};

/// Install the global subscriber.
///
/// Events go to stderr unless `log_file` is given, in which case they are
/// appended to it as JSON lines. `RUST_LOG` overrides the configured level.
pub fn init_logging(config: &LoggingConfig, log_file: Option<&Path>) -> Result<(), CliError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|err| CliError::Logging(err.to_string()))?;

    let (writer, format) = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let writer = LogFileWriter {
                file: Arc::new(Mutex::new(file)),
            };
            let writer = BoxMakeWriter::new(move || writer.clone());
            (writer, LogFormat::Json)
        }
        None => (BoxMakeWriter::new(io::stderr), config.format),
    };

    let result = match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_timer(UtcTime::rfc_3339())
                    .with_writer(writer),
            )
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(writer),
            )
            .try_init(),
    };
    result.map_err(|err| CliError::Logging(err.to_string()))
}

/// Appends formatted events to the `--log-file` target.
///
/// Each event arrives as one buffer; it is written whole under the lock so
/// lines from different threads never interleave.
#[derive(Clone)]
struct LogFileWriter {
    file: Arc<Mutex<File>>,
}

impl LogFileWriter {
    fn lock(&self) -> io::Result<MutexGuard<'_, File>> {
        self.file.lock().map_err(|_| io::Error::other("log file lock poisoned"))
    }
}

impl Write for LogFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock()?.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.lock()?.flush()
    }
}
