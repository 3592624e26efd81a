/// File logging for the terminal editor.
///
/// The terminal is in raw mode while the editor runs, so log output goes to
/// a file instead of stderr. `RUST_LOG` overrides the configured level.
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber writing to `path`.
///
/// # Errors
/// - Returns an error when `level` is unsupported.
/// - Returns an error when the log file cannot be opened.
/// - Returns an error when a global subscriber is already installed.
pub fn init_logging(path: &Path, level: &str) -> Result<(), String> {
    let level = normalize_level(level)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| format!("failed to open log file `{}`: {err}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| format!("failed to install logger: {err}"))?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        level,
        log_file = %path.display(),
        "logging started"
    );
    Ok(())
}

pub fn normalize_level(level: &str) -> Result<&'static str, String> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(format!(
            "unsupported log level `{other}`; expected trace|debug|info|warn|error"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_level_accepts_known_values() {
        assert_eq!(normalize_level("INFO"), Ok("info"));
        assert_eq!(normalize_level(" warning "), Ok("warn"));
        assert_eq!(normalize_level("trace"), Ok("trace"));
        assert!(normalize_level("verbose").is_err());
    }

    #[test]
    fn test_init_logging_rejects_bad_input() {
        let dir = tempfile::tempdir().unwrap();
        assert!(init_logging(&dir.path().join("semio.log"), "loud").is_err());
        assert!(init_logging(&dir.path().join("missing").join("semio.log"), "info").is_err());
    }
}
