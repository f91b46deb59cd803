use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn postbook(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("postbook").unwrap();
    cmd.env("NO_COLOR", "1")
        .env("HOME", data_dir)
        .arg("--data-dir")
        .arg(data_dir);
    cmd
}

fn write_ratified_export(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("ratified_export.csv");
    std::fs::write(
        &path,
        "owner_name,full_address,acceptance_date,price\njane doe,12 Elm St,03/01/2024,410000\n  BOB SMITH ,1 main st,2024-03-05,250000\n",
    )
    .unwrap();
    path
}

#[test]
fn test_import_then_reimport_skips_duplicates() {
    let dir = tempfile::tempdir().unwrap();
    let export = write_ratified_export(dir.path());

    postbook(dir.path())
        .args(["import", "-c", "Ratified"])
        .arg(&export)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 imported, 0 skipped"));

    postbook(dir.path())
        .args(["import", "-c", "Ratified"])
        .arg(&export)
        .assert()
        .success()
        .stdout(predicate::str::contains("0 imported, 2 skipped"));

    let saved = std::fs::read_to_string(dir.path().join("Ratified.csv")).unwrap();
    assert_eq!(
        saved,
        "Date,Name,Address,Posted\n2024-03-01,Jane Doe,12 Elm St,False\n2024-03-05,Bob Smith,1 Main St,False\n"
    );
}

#[test]
fn test_invalid_date_rejects_whole_import() {
    let dir = tempfile::tempdir().unwrap();
    let export = dir.path().join("bad.csv");
    std::fs::write(
        &export,
        "owner_name,full_address,closing_date\njane doe,12 Elm St,2024-03-01\nbob,1 Main St,not-a-date\n",
    )
    .unwrap();

    postbook(dir.path())
        .args(["import", "-c", "Sold"])
        .arg(&export)
        .assert()
        .failure()
        .stderr(predicate::str::contains("row 2: 'not-a-date'"));

    assert!(!dir.path().join("Sold.csv").exists());
}

#[test]
fn test_missing_column_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let export = dir.path().join("listed.csv");
    std::fs::write(&export, "owner_name,listing_date\njane doe,2024-03-01\n").unwrap();

    postbook(dir.path())
        .args(["import", "-c", "Listed"])
        .arg(&export)
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing required columns: Address"));
}

#[test]
fn test_post_then_filter_unposted() {
    let dir = tempfile::tempdir().unwrap();
    let export = write_ratified_export(dir.path());
    postbook(dir.path()).args(["import", "-c", "Ratified"]).arg(&export).assert().success();

    postbook(dir.path())
        .args([
            "post", "-c", "Ratified", "--date", "2024-03-01", "--name", "Jane Doe", "--address", "12 Elm St",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Marked 1 record as posted"));

    postbook(dir.path())
        .args(["list", "-c", "Ratified", "--status", "unposted"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bob Smith").and(predicate::str::contains("Jane Doe").not()));

    postbook(dir.path())
        .args(["list", "-c", "Ratified", "--status", "posted", "--name", "JANE"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Jane Doe").and(predicate::str::contains("1 of 2 records")));
}

#[test]
fn test_post_without_selection_fails() {
    let dir = tempfile::tempdir().unwrap();
    postbook(dir.path())
        .args(["post", "-c", "Sold"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No items selected"));
}

#[test]
fn test_delete_by_select() {
    let dir = tempfile::tempdir().unwrap();
    let export = write_ratified_export(dir.path());
    postbook(dir.path()).args(["import", "-c", "Ratified"]).arg(&export).assert().success();

    postbook(dir.path())
        .args(["delete", "-c", "Ratified", "--select", "2024-03-05|Bob Smith|1 Main St"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 1 record"));

    let saved = std::fs::read_to_string(dir.path().join("Ratified.csv")).unwrap();
    assert!(!saved.contains("Bob Smith"));
    assert!(saved.contains("Jane Doe"));
}

#[test]
fn test_reversed_date_range_is_a_filter_error() {
    let dir = tempfile::tempdir().unwrap();
    postbook(dir.path())
        .args(["list", "-c", "Listed", "--from", "2024-03-01", "--to", "2024-01-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid filter parameters"));
}

#[test]
fn test_export_combines_categories() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("Sold.csv"),
        "Date,Name,Address,Posted\n2024-02-01,Ann Lee,9 Oak Ave,True\n",
    )
    .unwrap();
    let export = write_ratified_export(dir.path());
    postbook(dir.path()).args(["import", "-c", "Ratified"]).arg(&export).assert().success();

    let out = dir.path().join("exports").join("all.csv");
    postbook(dir.path())
        .arg("export")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 3 records"));

    let content = std::fs::read_to_string(&out).unwrap();
    assert_eq!(
        content,
        "Date,Name,Address,Posted\n\
         2024-03-01,Jane Doe,12 Elm St,False\n\
         2024-03-05,Bob Smith,1 Main St,False\n\
         2024-02-01,Ann Lee,9 Oak Ave,True\n"
    );
}

#[test]
fn test_unreadable_category_is_not_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let broken = "Date,Name,Address,Posted\nsometime,A,1 St,False\n";
    std::fs::write(dir.path().join("Ratified.csv"), broken).unwrap();
    let export = write_ratified_export(dir.path());

    postbook(dir.path())
        .args(["import", "-c", "Ratified"])
        .arg(&export)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Ratified.csv"));

    assert_eq!(std::fs::read_to_string(dir.path().join("Ratified.csv")).unwrap(), broken);
}

#[test]
fn test_status_counts() {
    let dir = tempfile::tempdir().unwrap();
    let export = write_ratified_export(dir.path());
    postbook(dir.path()).args(["import", "-c", "Ratified"]).arg(&export).assert().success();

    postbook(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ratified").and(predicate::str::contains("Listed")));
}

#[test]
fn test_init_writes_settings() {
    let home = tempfile::tempdir().unwrap();
    let data = home.path().join("books");
    Command::cargo_bin("postbook")
        .unwrap()
        .env("HOME", home.path())
        .arg("init")
        .arg("--data-dir")
        .arg(&data)
        .assert()
        .success();

    assert!(data.is_dir());
    let settings = std::fs::read_to_string(home.path().join(".config/postbook/settings.json")).unwrap();
    assert!(settings.contains("books"));
}

#[test]
fn test_export_refuses_when_a_category_is_unreadable() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("Sold.csv"), "Date,Name,Address,Posted\nsoon,B,2 St,True\n").unwrap();
    std::fs::write(
        dir.path().join("Listed.csv"),
        "Date,Name,Address,Posted\n2024-01-01,A,1 St,False\n",
    )
    .unwrap();

    let out = dir.path().join("all.csv");
    postbook(dir.path())
        .arg("export")
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Sold.csv"));

    assert!(!out.exists());
}

#[test]
fn test_verbose_flag_enables_info_logging() {
    let dir = tempfile::tempdir().unwrap();
    let export = write_ratified_export(dir.path());

    postbook(dir.path())
        .args(["import", "-c", "Ratified"])
        .arg(&export)
        .assert()
        .success()
        .stderr(predicate::str::contains("INFO").not());

    postbook(dir.path())
        .args(["-v", "status"])
        .assert()
        .success()
        .stderr(predicate::str::contains("INFO").and(predicate::str::contains("loaded 2 record(s)")));
}
