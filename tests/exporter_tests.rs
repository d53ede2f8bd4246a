// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use orebook::commands::importer::import_ledger;
use orebook::models::{Account, Transaction, TransactionKind};
use orebook::store::{insert_transaction, load_transactions};
use orebook::{cli, commands::exporter, db};
use rusqlite::Connection;
use rust_decimal::Decimal;
use tempfile::tempdir;

fn base_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    insert_transaction(
        &conn,
        &Transaction {
            id: 1,
            date: NaiveDate::from_ymd_opt(2021, 4, 23).unwrap(),
            kind: TransactionKind::Sale,
            item: "Iron Ore".into(),
            category: "Resources - Ore".into(),
            quantity: 10,
            unit_price: Decimal::new(6650, 2),
            account: Account::Personal,
            total: Decimal::from(665),
            personal_amount: Decimal::new(6650, 2),
            company_amount: Decimal::new(59850, 2),
            location: Some("North Pit".into()),
            notes: None,
        },
    )
    .unwrap();
    conn
}

fn export(conn: &Connection, format: &str, out: &str) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from([
        "orebook", "export", "ledger", "--format", format, "--out", out,
    ]);
    match matches.subcommand() {
        Some(("export", sub)) => exporter::handle(conn, sub),
        _ => panic!("no export subcommand"),
    }
}

#[test]
fn csv_export_has_ledger_columns_and_opening_row() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out = dir.path().join("ledger.csv");
    export(&conn, "csv", &out.to_string_lossy()).unwrap();

    let mut rdr = csv::Reader::from_path(&out).unwrap();
    let headers: Vec<String> = rdr.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(
        headers,
        vec![
            "Date", "Type", "Item", "Category", "Qty", "Unit Price", "Account", "Total",
            "Personal Amount", "Company Amount",
        ]
    );
    let records: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 2);
    assert_eq!(&records[0][1], "Opening");
    assert_eq!(&records[0][8], "100000");
    assert_eq!(&records[1][2], "Iron Ore");
    assert_eq!(&records[1][7], "665");
}

#[test]
fn json_export_writes_array_of_objects() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out = dir.path().join("ledger.json");
    export(&conn, "JSON", &out.to_string_lossy()).unwrap();

    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    let rows = parsed.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1]["Type"], "Sale");
    assert_eq!(rows[1]["Qty"], 10);
    assert_eq!(rows[1]["Account"], "Personal");
}

#[test]
fn unknown_format_fails_without_creating_file() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out = dir.path().join("ledger.xml");
    let err = export(&conn, "xml", &out.to_string_lossy()).unwrap_err();
    assert!(err.to_string().contains("Unknown format"));
    assert!(!out.exists());
}

#[test]
fn exported_csv_imports_back() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out = dir.path().join("ledger.csv");
    export(&conn, "csv", &out.to_string_lossy()).unwrap();

    let mut fresh = Connection::open_in_memory().unwrap();
    db::init_schema(&fresh).unwrap();
    let report = import_ledger(&mut fresh, &out).unwrap();
    assert!(report.errors.is_empty());
    assert!(report.warnings.is_empty());

    let original = load_transactions(&conn).unwrap();
    let restored = load_transactions(&fresh).unwrap();
    assert_eq!(restored.len(), 1);
    assert_eq!(restored[0].total, original[0].total);
    assert_eq!(restored[0].personal_amount, original[0].personal_amount);
    assert_eq!(restored[0].company_amount, original[0].company_amount);
}
