use std::env;
use std::fs::OpenOptions;
use std::sync::Mutex;
use once_cell::sync::OnceCell;
use tracing::Level;

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Initializes logging based on environment variables:
/// - FASTSWEEP_LOGGING=true enables debug output, `false` or unset keeps warnings only.
/// - FASTSWEEP_LOG_FILE=<path> appends log output to a file instead of stderr.
///
/// Safe to call more than once; only the first call installs a subscriber.
/// To see logs in tests, run: FASTSWEEP_LOGGING=true cargo test -- --nocapture
pub fn init_logging() {
    INITIALIZED.get_or_init(|| {
        let level = match env::var("FASTSWEEP_LOGGING") {
            Ok(value) => match value.as_str() {
                "true" => Level::DEBUG,
                "false" => Level::WARN,
                other => {
                    eprintln!("FASTSWEEP_LOGGING must be 'true' or 'false', got '{}'; using defaults", other);
                    Level::WARN
                }
            },
            Err(_) => Level::WARN,
        };

        let builder = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false);

        let installed = match env::var("FASTSWEEP_LOG_FILE") {
            Ok(path) => match OpenOptions::new().create(true).append(true).open(&path) {
                Ok(file) => builder.with_ansi(false).with_writer(Mutex::new(file)).try_init(),
                Err(e) => {
                    eprintln!("Failed to open log file {}: {}", path, e);
                    builder.with_writer(std::io::stderr).try_init()
                }
            },
            Err(_) => builder.with_writer(std::io::stderr).try_init(),
        };

        if let Err(e) = installed {
            eprintln!("Failed to install log subscriber: {}", e);
        }
    });
}

/// Emits an informational line tagged with a component prefix
pub fn log(prefix: &str, message: &str) {
    tracing::info!("[{}] {}", prefix, message);
}
