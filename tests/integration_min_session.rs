// Drives the compiled binary through a PTY against a throwaway state database.
//
// Notes:
// - Requires a TTY; uses expectrl which allocates a pseudo terminal.
// - Unix-only and ignored by default.
// - Run manually via: `cargo test --test integration_min_session -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};

#[test]
#[ignore]
fn dashboard_opens_and_exits() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let db = dir.path().join("state.db");
    let bin = assert_cmd::cargo::cargo_bin("intervue");
    let cmd = format!("{} --dashboard --db {}", bin.display(), db.display());

    let mut p = spawn(cmd)?;
    std::thread::sleep(Duration::from_millis(300));

    // Tab over to the chat and back, then quit
    p.send("\t")?;
    std::thread::sleep(Duration::from_millis(100));
    p.send("\t")?;
    std::thread::sleep(Duration::from_millis(100));
    p.send("\x1b")?; // ESC

    p.expect(Eof)?;
    assert!(db.exists());
    Ok(())
}

#[test]
fn export_writes_csv_without_a_tty() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let db = dir.path().join("state.db");
    let out = dir.path().join("candidates.csv");

    assert_cmd::Command::cargo_bin("intervue")?
        .arg("--db")
        .arg(&db)
        .arg("--export")
        .arg(&out)
        .env("HOME", dir.path())
        .assert()
        .success();

    let csv = std::fs::read_to_string(&out)?;
    assert!(csv.is_empty());
    Ok(())
}
