//! Integration tests for the sales-ledger CLI.
//!
//! These tests run the actual binary against a temporary data directory.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Run the binary with `args` against `data_dir` and return parsed stdout
fn run_ledger(data_dir: &Path, args: &[&str]) -> Value {
    let mut cmd = Command::cargo_bin("sales-ledger").unwrap();
    let assert = cmd
        .env_remove("SALES_DATA_DIR")
        .arg("--data-dir")
        .arg(data_dir)
        .args(args)
        .assert()
        .success();
    serde_json::from_slice(&assert.get_output().stdout).unwrap()
}

fn add_sale(data_dir: &Path, product: &str, amount: &str, quantity: &str, ts: &str) -> Value {
    run_ledger(
        data_dir,
        &[
            "add",
            "shop1",
            "--product",
            product,
            "--category",
            "Tools",
            "--amount",
            amount,
            "--quantity",
            quantity,
            "--timestamp",
            ts,
            "--customer",
            "Alice",
        ],
    )
}

#[test]
fn test_register_and_login() {
    let dir = tempfile::tempdir().unwrap();

    let registered = run_ledger(
        dir.path(),
        &["register", "alice", "secret1", "--full-name", "Alice A"],
    );
    assert_eq!(registered["success"], true);
    assert_eq!(registered["message"], "Registration successful");
    assert_eq!(registered["user"]["username"], "alice");
    assert_eq!(registered["user"]["fullName"], "Alice A");
    assert!(registered["user"].get("passwordHash").is_none());

    let again = run_ledger(
        dir.path(),
        &["register", "alice", "other99", "--full-name", "Other"],
    );
    assert_eq!(again["success"], false);
    assert_eq!(again["message"], "Username already exists");

    let login = run_ledger(dir.path(), &["login", "alice", "secret1"]);
    assert_eq!(login["success"], true);
    assert_eq!(login["message"], "Login successful");

    let bad = run_ledger(dir.path(), &["login", "alice", "other99"]);
    assert_eq!(bad["success"], false);
    assert_eq!(bad["message"], "Invalid username or password");
    assert!(bad.get("user").is_none());
}

#[test]
fn test_short_password_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_ledger(
        dir.path(),
        &["register", "bob", "12345", "--full-name", "Bob"],
    );
    assert_eq!(out["success"], false);
    assert_eq!(out["message"], "Password must be at least 6 characters");
}

#[test]
fn test_add_list_delete() {
    let dir = tempfile::tempdir().unwrap();

    let added = add_sale(dir.path(), "Widget", "10", "2", "2024-01-05 09:00:00");
    assert_eq!(added["success"], true);
    add_sale(dir.path(), "Gadget", "20.00", "1", "2024-01-05 14:00:00");
    add_sale(dir.path(), "Gizmo", "5.25", "4", "2024-02-01 10:15:00");

    let listed = run_ledger(dir.path(), &["list", "shop1"]);
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 3);
    assert_eq!(listed[0]["id"], 1);
    assert_eq!(listed[0]["saleAmount"], 10.0);
    assert_eq!(listed[0]["saleDate"], "2024-01-05 09:00:00");
    assert_eq!(listed[2]["saleAmount"], 5.25);
    assert_eq!(listed[2]["productName"], "Gizmo");

    let deleted = run_ledger(dir.path(), &["delete", "shop1", "2"]);
    assert_eq!(deleted["success"], true);
    assert_eq!(deleted["message"], "Sale deleted successfully");

    let listed = run_ledger(dir.path(), &["list", "shop1"]);
    let ids: Vec<_> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 3]);

    let file = fs::read_to_string(dir.path().join("sales_shop1.txt")).unwrap();
    assert_eq!(
        file,
        "1,Widget,Tools,10.00,2,2024-01-05 09:00:00,Alice\n\
         3,Gizmo,Tools,5.25,4,2024-02-01 10:15:00,Alice\n"
    );
}

#[test]
fn test_analytics_output() {
    let dir = tempfile::tempdir().unwrap();
    add_sale(dir.path(), "Widget", "10.00", "2", "2024-01-05 09:00:00");
    add_sale(dir.path(), "Gadget", "20.00", "1", "2024-01-05 14:00:00");

    let out = run_ledger(dir.path(), &["analytics", "shop1"]);
    assert_eq!(out["summary"]["totalRevenue"], 30.0);
    assert_eq!(out["summary"]["totalSales"], 2);
    assert_eq!(out["summary"]["maxSaleProduct"], "Gadget");
    assert_eq!(out["summary"]["maxSaleMonth"], "JANUARY 2024");
    assert_eq!(out["summary"]["peakSalesHour"], 14);
    assert_eq!(out["topProducts"]["Widget"], 2);
    assert_eq!(out["categorySales"]["Tools"], 30.0);
}

#[test]
fn test_analytics_for_new_user() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_ledger(dir.path(), &["analytics", "nobody"]);
    assert_eq!(out["summary"]["totalRevenue"], 0.0);
    assert_eq!(out["summary"]["maxSaleProduct"], "N/A");
    assert_eq!(out["summary"]["maxSaleMonth"], "N/A");
    assert_eq!(out["summary"]["peakSalesHour"], 0);
    assert_eq!(out["topProducts"], serde_json::json!({}));
}

#[test]
fn test_data_dir_from_env() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("sales-ledger").unwrap();
    cmd.env("SALES_DATA_DIR", dir.path())
        .args(["register", "carol", "secret1", "--full-name", "Carol"])
        .assert()
        .success();

    let users = fs::read_to_string(dir.path().join("users.txt")).unwrap();
    assert!(users.starts_with("carol|"));
    assert!(!users.contains("secret1"));
}

#[test]
fn test_data_dir_flag_overrides_env() {
    let flag_dir = tempfile::tempdir().unwrap();
    let env_dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("sales-ledger").unwrap();
    cmd.env("SALES_DATA_DIR", env_dir.path())
        .arg("--data-dir")
        .arg(flag_dir.path())
        .args(["register", "dave", "secret1", "--full-name", "Dave"])
        .assert()
        .success();

    assert!(flag_dir.path().join("users.txt").is_file());
    assert!(!env_dir.path().join("users.txt").exists());
}

#[test]
fn test_line_break_in_customer_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    add_sale(dir.path(), "Widget", "10.00", "1", "2024-01-05 09:00:00");

    let out = run_ledger(
        dir.path(),
        &[
            "add",
            "shop1",
            "--product",
            "Widget",
            "--category",
            "Tools",
            "--amount",
            "10.00",
            "--quantity",
            "1",
            "--customer",
            "Alice\n99,Forged,X,9999.00,1,2024-01-05 09:00:00,Eve",
        ],
    );
    assert_eq!(out["success"], false);
    assert_eq!(out["message"], "Fields must not contain commas or line breaks");

    let listed = run_ledger(dir.path(), &["list", "shop1"]);
    assert_eq!(listed.as_array().unwrap().len(), 1);
    let analytics = run_ledger(dir.path(), &["analytics", "shop1"]);
    assert_eq!(analytics["summary"]["totalRevenue"], 10.0);
}

#[test]
fn test_invalid_username_for_list_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("sales-ledger").unwrap();
    cmd.arg("--data-dir")
        .arg(dir.path())
        .args(["list", "../etc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error").and(predicate::str::contains("invalid username")));
}

#[test]
fn test_bad_amount_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("sales-ledger").unwrap();
    cmd.arg("--data-dir")
        .arg(dir.path())
        .args([
            "add", "shop1", "--product", "W", "--category", "T", "--amount", "ten",
            "--quantity", "1", "--customer", "A",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("amount"));
}

#[test]
fn test_missing_subcommand_error() {
    let mut cmd = Command::cargo_bin("sales-ledger").unwrap();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
