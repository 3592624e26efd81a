/// Semio Terminal - semiotic sign editor
///
/// Places signs between the Icon, Index and Symbol attractors and shows
/// them as ASCII art. Press `a` to add a sign, `:` for the command line and
/// `q` to quit; the panel lists every key.
use clap::Parser;
use std::io;
use std::path::PathBuf;

use semio_core::EditorConfig;
use semio_terminal::{logging, TerminalApp};

#[derive(Debug, Parser)]
#[command(name = "semio-terminal", version, about = "Terminal editor for semiotic signs")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Command script run before the editor starts
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Print the points after the script and exit
    #[arg(long)]
    dump: bool,

    /// Log file; defaults to `semio-terminal.log` in the temp directory
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    let log_file = args
        .log_file
        .unwrap_or_else(|| std::env::temp_dir().join("semio-terminal.log"));
    if let Err(err) = logging::init_logging(&log_file, &args.log_level) {
        eprintln!("logging disabled: {err}");
    }

    let config = match &args.config {
        Some(path) => EditorConfig::load(path).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?,
        None => EditorConfig::default(),
    };

    let mut app = match TerminalApp::new(&config) {
        Ok(app) => app,
        // --dump never draws, so piped output needs no terminal
        Err(err) if args.dump => {
            tracing::warn!(error = %err, "terminal size unavailable, using 80x24");
            TerminalApp::with_size(&config, 80, 24)
        }
        Err(err) => return Err(err),
    };

    if let Some(path) = &args.script {
        let script = std::fs::read_to_string(path)?;
        let count = app
            .run_script(&script)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, format!("{}: {err}", path.display())))?;
        tracing::info!(commands = count, script = %path.display(), "script applied");
    }

    if args.dump {
        return app.dump(&mut io::stdout());
    }

    app.run()
}
