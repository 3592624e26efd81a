/// Example: open the editor on a small scripted scene
///
/// Usage: cargo run --example demo_scene
use std::io;
use semio_core::EditorConfig;
use semio_terminal::TerminalApp;

const SCENE: &str = r#"
// One sign per plane, plus a balanced one
add "Red swatch" icon=100 index=0 symbol=0 type=qualisign logic=rheme
add "Footprint" icon=10 index=90 symbol=0 type=sinsign logic=dicent
add "Stop sign" icon=30 index=20 symbol=90 type=legisign logic=argument
add Balanced icon=50 index=50 symbol=50
deselect
"#;

fn main() -> io::Result<()> {
    let config = EditorConfig::default();
    let mut app = TerminalApp::new(&config)?;
    app.run_script(SCENE)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;

    app.dump(&mut io::stdout())?;
    std::thread::sleep(std::time::Duration::from_secs(1));

    app.run()
}
