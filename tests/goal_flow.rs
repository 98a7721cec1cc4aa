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

fn login(home: &tempfile::TempDir) {
    run_ok(home, &["register", "ada", "--pin", "1234"]);
    run_ok(home, &["login", "ada", "--pin", "1234"]);
}

fn store_json(home: &tempfile::TempDir) -> serde_json::Value {
    let raw = std::fs::read_to_string(home.path().join("data").join("users.json"))
        .expect("read store");
    serde_json::from_str(&raw).expect("parse store")
}

#[test]
fn add_and_list_goals_with_progress() {
    let home = tempfile::tempdir().expect("tempdir");
    login(&home);

    let out = run_ok_out(&home, &["goal", "list"]);
    assert!(out.contains("No savings goals found."));

    run_ok(
        &home,
        &["goal", "add", "Laptop", "1500", "--deadline", "2025-12-31"],
    );
    run_ok(&home, &["goal", "add", "Trip", "400"]);

    let out = run_ok_out(&home, &["goal", "list"]);
    assert!(out.contains("1. Laptop -- saved: 0.00 / 1500.00 (0.0%) In progress | deadline: 2025-12-31"));
    assert!(out.contains("2. Trip -- saved: 0.00 / 400.00 (0.0%) In progress"));
}

#[test]
fn goal_add_rejects_bad_input() {
    let home = tempfile::tempdir().expect("tempdir");
    login(&home);

    let mut cmd = moneta_cmd();
    cmd.env("MONETA_HOME", home.path());
    cmd.args(["goal", "add", "Laptop", "0"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Goal target must be > 0"));

    let mut cmd = moneta_cmd();
    cmd.env("MONETA_HOME", home.path());
    cmd.args(["goal", "add", "Laptop", "100", "--deadline", "soon"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid deadline"));
}

#[test]
fn allocation_is_a_dual_write_of_expense_and_saved_amount() {
    let home = tempfile::tempdir().expect("tempdir");
    login(&home);

    run_ok(&home, &["goal", "add", "Laptop", "100.00"]);
    let out = run_ok_out(&home, &["goal", "allocate", "1", "25.50"]);
    assert!(out.contains("Allocated 25.50 to goal 'Laptop'. Transaction recorded."));

    // The goal side: saved_amount persists as the decimal string "25.50".
    let users = store_json(&home);
    let goal = &users[0]["savings_goals"][0];
    assert_eq!(goal["saved_amount"], serde_json::json!("25.50"));
    assert_eq!(goal["target_amount"], serde_json::json!("100.00"));

    // The transaction side: a Savings expense in the legacy number encoding,
    // with a note naming the goal.
    let tx = &users[0]["transactions"][0];
    assert_eq!(tx["type"], serde_json::json!("expense"));
    assert_eq!(tx["category"], serde_json::json!("Savings"));
    assert!(tx["amount"].is_number(), "amount must be a JSON number: {tx}");
    assert_eq!(tx["amount"].as_f64(), Some(25.5));
    let note = tx["note"].as_str().expect("note");
    assert!(note.contains("Allocated to goal"));
    assert!(note.contains("Laptop"));

    // And it is visible in the ledger like any other expense.
    let out = run_ok_out(&home, &["tx", "list"]);
    assert!(out.contains("[EXPENSE] 25.5 | Savings |"));

    let out = run_ok_out(&home, &["goal", "list"]);
    assert!(out.contains("saved: 25.50 / 100.00 (25.5%)"));
}

#[test]
fn achieved_goal_notifies_achieved_not_close() {
    let home = tempfile::tempdir().expect("tempdir");
    login(&home);

    run_ok(&home, &["goal", "add", "Laptop", "100"]);
    run_ok(&home, &["goal", "allocate", "1", "100"]);

    let out = run_ok_out(&home, &["notifications"]);
    assert!(out.contains("Goal 'Laptop' achieved!"));
    assert!(!out.contains("close to achieving"));

    let out = run_ok_out(&home, &["goal", "list"]);
    assert!(out.contains("(100.0%) Reached"));
}

#[test]
fn close_to_goal_notifies_at_eighty_percent() {
    let home = tempfile::tempdir().expect("tempdir");
    login(&home);

    run_ok(&home, &["goal", "add", "Trip", "100"]);
    run_ok(&home, &["goal", "allocate", "1", "85"]);
    // A goal below 80% stays silent.
    run_ok(&home, &["goal", "add", "Car", "1000"]);
    run_ok(&home, &["goal", "allocate", "2", "100"]);

    let out = run_ok_out(&home, &["notifications"]);
    assert!(out.contains("You're close to achieving your goal 'Trip' (85.00/100.00)"));
    assert!(!out.contains("'Car'"));
}

#[test]
fn notifications_list_budgets_before_goals() {
    let home = tempfile::tempdir().expect("tempdir");
    login(&home);

    run_ok(&home, &["goal", "add", "Trip", "100"]);
    run_ok(&home, &["goal", "allocate", "1", "90"]);
    run_ok(&home, &["budget", "set", "2025-01", "100"]);
    run_ok(
        &home,
        &["tx", "add", "expense", "95", "Rent", "--date", "2025-01-02"],
    );

    let out = run_ok_out(&home, &["notifications"]);
    let budget_note = out.find("budget limit for 2025-01").expect("budget note");
    let goal_note = out.find("your goal 'Trip'").expect("goal note");
    assert!(budget_note < goal_note, "budgets come first: {out}");
}

#[test]
fn edit_and_delete_goals() {
    let home = tempfile::tempdir().expect("tempdir");
    login(&home);

    run_ok(&home, &["goal", "add", "Laptop", "1500"]);
    run_ok(
        &home,
        &["goal", "edit", "1", "--name", "Desktop", "--target", "1200"],
    );

    let out = run_ok_out(&home, &["goal", "list"]);
    assert!(out.contains("1. Desktop -- saved: 0.00 / 1200.00"));

    let mut cmd = moneta_cmd();
    cmd.env("MONETA_HOME", home.path());
    cmd.args(["goal", "edit", "1", "--target=-5"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Goal target must be > 0"));

    let out = run_ok_out(&home, &["goal", "delete", "1", "--yes"]);
    assert!(out.contains("Deleted goal 'Desktop'."));
    let out = run_ok_out(&home, &["goal", "list"]);
    assert!(out.contains("No savings goals found."));
}
