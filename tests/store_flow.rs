use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

fn moneta_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("moneta"))
}

fn run_ok(home: &tempfile::TempDir, args: &[&str]) {
    let mut cmd = moneta_cmd();
    cmd.env("MONETA_HOME", home.path());
    cmd.args(args);
    cmd.assert().success();
}

fn run_ok_out(home: &tempfile::TempDir, args: &[&str]) -> String {
    let mut cmd = moneta_cmd();
    cmd.env("MONETA_HOME", home.path());
    cmd.args(args);
    let out = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(out).expect("utf8 stdout")
}

#[test]
fn every_save_leaves_a_timestamped_backup() {
    let home = tempfile::tempdir().expect("tempdir");

    run_ok(&home, &["register", "ada", "--pin", "1234"]);

    let backups: Vec<_> = std::fs::read_dir(home.path().join("data").join("backup"))
        .expect("backup dir")
        .map(|e| e.expect("entry").file_name().into_string().expect("name"))
        .collect();
    assert!(!backups.is_empty(), "no backup written");
    assert!(
        backups
            .iter()
            .all(|n| n.starts_with("backup_") && n.ends_with(".json")),
        "unexpected backup names: {backups:?}"
    );
}

#[test]
fn corrupt_store_is_reported_and_treated_as_empty() {
    let home = tempfile::tempdir().expect("tempdir");

    run_ok(&home, &["register", "ada", "--pin", "1234"]);
    std::fs::write(home.path().join("data").join("users.json"), "{ not json")
        .expect("corrupt store");

    let mut cmd = moneta_cmd();
    cmd.env("MONETA_HOME", home.path());
    cmd.args(["whoami"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("No user logged in."))
        .stderr(predicate::str::contains("Corrupted data file"));

    // Registration starts over on the empty store.
    let out = run_ok_out(&home, &["register", "ada", "--pin", "1234"]);
    assert!(out.contains("User registered successfully!"));
}

#[test]
fn older_records_without_goal_and_budget_arrays_still_load() {
    let home = tempfile::tempdir().expect("tempdir");

    let legacy = serde_json::json!([{
        "username": "ada",
        "pin": "1234",
        "transactions": [{
            "id": "6c0d7f6e-0000-4000-8000-000000000001",
            "type": "income",
            "amount": 1000.0,
            "category": "Salary",
            "note": "",
            "date": "2025-01-05"
        }]
    }]);
    let data_dir = home.path().join("data");
    std::fs::create_dir_all(&data_dir).expect("data dir");
    std::fs::write(
        data_dir.join("users.json"),
        serde_json::to_string_pretty(&legacy).expect("json"),
    )
    .expect("write store");

    run_ok(&home, &["login", "ada", "--pin", "1234"]);
    let out = run_ok_out(&home, &["dashboard"]);
    assert!(out.contains("Total Income:  1000.00"));
}

#[test]
fn malformed_stored_amount_counts_as_zero_not_an_error() {
    let home = tempfile::tempdir().expect("tempdir");

    let tainted = serde_json::json!([{
        "username": "ada",
        "pin": "1234",
        "transactions": [
            {
                "id": "6c0d7f6e-0000-4000-8000-000000000001",
                "type": "income",
                "amount": "not-a-number",
                "category": "Salary",
                "note": "",
                "date": "2025-01-05"
            },
            {
                "id": "6c0d7f6e-0000-4000-8000-000000000002",
                "type": "expense",
                "amount": 40.0,
                "category": "Food",
                "note": "",
                "date": "2025-01-06"
            }
        ],
        "savings_goals": [],
        "monthly_budgets": []
    }]);
    let data_dir = home.path().join("data");
    std::fs::create_dir_all(&data_dir).expect("data dir");
    std::fs::write(
        data_dir.join("users.json"),
        serde_json::to_string_pretty(&tainted).expect("json"),
    )
    .expect("write store");

    run_ok(&home, &["login", "ada", "--pin", "1234"]);

    // The bad record contributes nothing; the aggregation still runs.
    let out = run_ok_out(&home, &["dashboard"]);
    assert!(out.contains("Total Income:  0.00"));
    assert!(out.contains("Total Expense: 40.00"));
    assert!(out.contains("Net Balance:   -40.00"));
}

#[test]
fn csv_export_flattens_all_users() {
    let home = tempfile::tempdir().expect("tempdir");

    run_ok(&home, &["register", "ada", "--pin", "1234"]);
    run_ok(&home, &["login", "ada", "--pin", "1234"]);
    run_ok(
        &home,
        &["tx", "add", "income", "1000", "Salary", "--date", "2025-01-05"],
    );
    run_ok(
        &home,
        &["tx", "add", "expense", "42.5", "Food", "-m", "lunch, again", "--date", "2025-01-06"],
    );

    let out_path = home.path().join("export.csv");
    let out = run_ok_out(&home, &["export", "--out", out_path.to_str().expect("utf8 path")]);
    assert!(out.contains("Exported 2 transaction(s)"));

    let csv = std::fs::read_to_string(&out_path).expect("read csv");
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("username,type,amount,category,date,note")
    );
    assert_eq!(lines.next(), Some("ada,income,1000,Salary,2025-01-05,"));
    // The note carries a comma, so the writer must quote it.
    assert_eq!(
        lines.next(),
        Some("ada,expense,42.5,Food,2025-01-06,\"lunch, again\"")
    );
}
