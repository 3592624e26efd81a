use std::process::{Command, Stdio};

#[test]
fn test_dump_works_with_piped_output() {
    let dir = tempfile::tempdir().unwrap();
    let script = concat!(env!("CARGO_MANIFEST_DIR"), "/../demos/weather.semio");

    let output = Command::new(env!("CARGO_BIN_EXE_semio-terminal"))
        .args(["--script", script, "--dump", "--log-file"])
        .arg(dir.path().join("semio.log"))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("1. Dark clouds "));
    assert!(lines[1].starts_with("2. Rain symbol "));
}
