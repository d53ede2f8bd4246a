// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use orebook::commands::doctor;
use orebook::models::{Account, Transaction, TransactionKind};
use orebook::settings::{GameSettings, STARTING_CAPITAL, default_game_date, set_setting};
use orebook::store::insert_transaction;
use orebook::{cli, commands::settings, db};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn set(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["orebook", "settings", "set"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("settings", sub)) => settings::handle(conn, sub),
        _ => panic!("no settings subcommand"),
    }
}

#[test]
fn defaults_when_nothing_is_stored() {
    let conn = setup();
    let s = GameSettings::load(&conn).unwrap();
    assert_eq!(s.opening.personal, Decimal::from(STARTING_CAPITAL));
    assert_eq!(s.opening.company, Decimal::ZERO);
    assert_eq!(s.game_start_date, default_game_date());
    assert_eq!(s.days_played(), 1);
}

#[test]
fn set_updates_only_given_fields() {
    let conn = setup();
    set(&conn, &["--vn", "5", "--opening-company", "2500", "--date", "2021-05-01"]).unwrap();
    let s = GameSettings::load(&conn).unwrap();
    assert_eq!(s.skills.vendor_negotiation, 5);
    assert_eq!(s.skills.investment_forecasting, 0);
    assert_eq!(s.opening.company, Decimal::from(2500));
    assert_eq!(s.opening.personal, Decimal::from(STARTING_CAPITAL));
    assert_eq!(s.days_played(), 10);
}

#[test]
fn out_of_range_skill_is_not_saved() {
    let conn = setup();
    assert!(set(&conn, &["--if", "7"]).is_err());
    assert_eq!(
        GameSettings::load(&conn).unwrap().skills.investment_forecasting,
        0
    );
}

#[test]
fn doctor_reports_inconsistent_rows() {
    let conn = setup();
    assert!(doctor::diagnose(&conn).unwrap().is_empty());

    set_setting(&conn, "vendor_negotiation", "9").unwrap();
    insert_transaction(
        &conn,
        &Transaction {
            id: 1,
            date: default_game_date(),
            kind: TransactionKind::Sale,
            item: "Ghost Ore".into(),
            category: "Resources - Ore".into(),
            quantity: 2,
            unit_price: Decimal::from(10),
            account: Account::Personal,
            total: Decimal::from(25),
            personal_amount: Decimal::from(25),
            company_amount: Decimal::ZERO,
            location: None,
            notes: None,
        },
    )
    .unwrap();

    let issues: Vec<String> = doctor::diagnose(&conn)
        .unwrap()
        .into_iter()
        .map(|row| row[0].clone())
        .collect();
    for expected in [
        "invalid_skill_level",
        "item_not_in_catalog",
        "stored_total_mismatch",
        "negative_stock",
    ] {
        assert!(issues.iter().any(|i| i == expected), "missing {}", expected);
    }
}
