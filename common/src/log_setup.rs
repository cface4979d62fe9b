use flexi_logger::{Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming};
use log::info;

/// Starts the file logger.
///
/// The level spec comes from `RUST_LOG` when set, otherwise `base_level`.
/// Stdout is left untouched so binaries can write their reports there;
/// warnings and errors are duplicated to stderr.
///
/// The returned handle must be kept alive for the lifetime of the program.
pub fn setup_logging(base_level: &str) -> LoggerHandle {
    let handle = Logger::try_with_env_or_str(base_level)
        .unwrap_or_else(|e| panic!("Invalid log spec {:?}: {}", base_level, e))
        .log_to_file(FileSpec::default().directory("logs"))
        .duplicate_to_stderr(Duplicate::Warn)
        .rotate(
            Criterion::Size(1024 * 1024), //1MB
            Naming::Timestamps,
            Cleanup::KeepLogFiles(5),
        )
        .start()
        .unwrap_or_else(|e| panic!("Logger initialization failed with {}", e));

    info!("Logging started, default level {}", base_level);

    handle
}
