use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn shelf(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("shelf").unwrap();
    cmd.env("SHELF_HOME", home.path())
        .env("NO_COLOR", "1")
        .env_remove("SHELF_LOG");
    cmd
}

#[test]
fn genre_add_reports_existing() {
    let home = TempDir::new().unwrap();

    shelf(&home)
        .args(["genre", "add", "Science", "Fiction"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created genre 1"));

    shelf(&home)
        .args(["genre", "add", "Science Fiction"])
        .assert()
        .success()
        .stdout(predicate::str::contains("genre 1 already exists"));

    shelf(&home)
        .args(["config", "line-width", "60"])
        .assert()
        .success();

    shelf(&home)
        .args(["genre", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("science-fiction"))
        .stdout(predicate::str::contains("=".repeat(60)));
}

#[test]
fn unknown_field_fails_on_stderr() {
    let home = TempDir::new().unwrap();
    shelf(&home)
        .args(["book", "add", "Solaris"])
        .assert()
        .success();

    shelf(&home)
        .args(["book", "edit", "solaris", "colour", "blue"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::starts_with("Error:"))
        .stderr(predicate::str::contains("not an editable field of book"));

    shelf(&home)
        .args(["book", "info", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("book 1: Solaris"));
}

#[test]
fn reading_status_follows_edits() {
    let home = TempDir::new().unwrap();
    shelf(&home)
        .args(["book", "add", "Solaris", "--author", "Stanisław Lem"])
        .assert()
        .success();
    shelf(&home)
        .args(["read", "add", "book:solaris", "--started", "2024-03-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added read 1 of book:1"));

    shelf(&home)
        .args(["status", "book:1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("reading"));

    shelf(&home)
        .args(["read", "edit", "1", "finished", "2024-03-20"])
        .assert()
        .success();

    shelf(&home)
        .args(["status", "book:solaris"])
        .assert()
        .success()
        .stdout(predicate::str::contains("finished"));
}

#[test]
fn files_can_be_attached_read_and_deleted() {
    let home = TempDir::new().unwrap();
    let source = home.path().join("notes.txt");
    std::fs::write(&source, "margin notes").unwrap();

    shelf(&home)
        .args(["book", "add", "Solaris"])
        .assert()
        .success();
    shelf(&home)
        .args(["file", "add", "book:1"])
        .arg(&source)
        .assert()
        .success()
        .stdout(predicate::str::contains("Attached notes.txt"));

    shelf(&home)
        .args(["file", "cat", "notes"])
        .assert()
        .success()
        .stdout("margin notes");

    let output = shelf(&home)
        .args(["file", "path", "notes"])
        .output()
        .unwrap();
    let blob = String::from_utf8(output.stdout).unwrap();
    assert!(std::path::Path::new(blob.trim()).exists());

    shelf(&home)
        .args(["file", "delete", "notes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted file 1"));
    assert!(!std::path::Path::new(blob.trim()).exists());

    shelf(&home)
        .args(["file", "cat", "notes"])
        .assert()
        .failure();
}

#[test]
fn issue_cover_lives_in_the_media_dir() {
    let home = TempDir::new().unwrap();
    let image = home.path().join("march.jpg");
    std::fs::write(&image, "jpeg").unwrap();

    shelf(&home)
        .args(["magazine", "add", "Analog"])
        .assert()
        .success();
    shelf(&home)
        .args(["issue", "add", "analog", "2024-03", "--cover"])
        .arg(&image)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created issue 1"));

    let output = shelf(&home)
        .args(["issue", "cover-path", "1"])
        .output()
        .unwrap();
    let cover = String::from_utf8(output.stdout).unwrap();
    let cover = std::path::PathBuf::from(cover.trim());
    assert!(cover.starts_with(home.path().join("files")));
    assert_eq!(std::fs::read(&cover).unwrap(), b"jpeg");
    assert_ne!(cover, image);

    shelf(&home)
        .args(["issue", "delete", "1"])
        .assert()
        .success();
    assert!(!cover.exists());
}

#[test]
fn config_round_trip() {
    let home = TempDir::new().unwrap();
    shelf(&home)
        .args(["config", "line-width", "90"])
        .assert()
        .success()
        .stdout(predicate::str::contains("line-width set to 90"));

    shelf(&home)
        .args(["config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("line-width  90"))
        .stdout(predicate::str::contains("media-dir   (unset)"));

    shelf(&home)
        .args(["config", "colour", "red"])
        .assert()
        .failure();
}

#[test]
fn version_flag() {
    let home = TempDir::new().unwrap();
    shelf(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("shelf "));
}
