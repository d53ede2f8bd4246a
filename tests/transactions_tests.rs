// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use orebook::models::Item;
use orebook::settings::GameSettings;
use orebook::store::{load_history, load_transactions, upsert_item};
use orebook::{cli, commands::transactions, db};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::str::FromStr;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    for (name, category, buy, sell) in [
        ("Iron Ore", "Resources - Ore", 0, "66.50"),
        ("Pickaxe", "Tools", 200, "150"),
    ] {
        upsert_item(
            &conn,
            &Item {
                name: name.into(),
                category: category.into(),
                buy_price: buy,
                sell_price: Decimal::from_str(sell).unwrap(),
                can_buy: buy > 0,
                can_sell: true,
            },
        )
        .unwrap();
    }
    conn
}

fn run(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["orebook", "tx"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("tx", tx_m)) => transactions::handle(conn, tx_m),
        _ => panic!("no tx subcommand"),
    }
}

fn list(conn: &Connection, args: &[&str]) -> Vec<transactions::TransactionRow> {
    let mut argv = vec!["orebook", "tx", "list"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            return transactions::query_rows(conn, list_m).unwrap();
        }
    }
    panic!("no list subcommand");
}

#[test]
fn ore_sale_is_priced_and_split() {
    let conn = setup();
    run(
        &conn,
        &["add", "--date", "2021-04-23", "--type", "Sale", "--item", "iron ore", "--qty", "2000"],
    )
    .unwrap();
    let rows = load_transactions(&conn).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].item, "Iron Ore");
    assert_eq!(rows[0].total, Decimal::from(133_000));
    assert_eq!(rows[0].personal_amount, Decimal::from(13_300));
    assert_eq!(rows[0].company_amount, Decimal::from(119_700));
}

#[test]
fn purchase_uses_skill_discount() {
    let conn = setup();
    let mut settings = GameSettings::load(&conn).unwrap();
    settings.skills.vendor_negotiation = 7;
    settings.save(&conn).unwrap();

    run(
        &conn,
        &["add", "--date", "2021-04-23", "--type", "buy", "--item", "Pickaxe", "--account", "Company"],
    )
    .unwrap();
    let rows = load_transactions(&conn).unwrap();
    assert_eq!(rows[0].total, Decimal::from(193));
    assert_eq!(rows[0].company_amount, Decimal::from(-193));
}

#[test]
fn rejected_add_writes_nothing() {
    let conn = setup();
    let err = run(
        &conn,
        &["add", "--date", "2021-04-23", "--type", "Purchase", "--item", "Iron Ore"],
    )
    .unwrap_err();
    assert!(err.to_string().contains("cannot be purchased"));
    assert!(run(&conn, &["add", "--date", "2021-04-23", "--type", "Sale", "--item", "Nope"]).is_err());
    assert!(load_transactions(&conn).unwrap().is_empty());
}

#[test]
fn list_shows_running_balances_newest_first() {
    let conn = setup();
    run(&conn, &["add", "--date", "2021-04-23", "--type", "Sale", "--item", "Pickaxe"]).unwrap();
    run(
        &conn,
        &["transfer", "--date", "2021-04-24", "--from", "Personal", "--to", "Company", "--amount", "1000"],
    )
    .unwrap();
    let rows = list(&conn, &[]);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].kind, "Transfer");
    assert_eq!(rows[0].personal_balance, "99150.00");
    assert_eq!(rows[0].company_balance, "1000.00");
    assert_eq!(rows[1].personal_balance, "100150.00");

    assert_eq!(list(&conn, &["--type", "sale"]).len(), 1);
    assert_eq!(list(&conn, &["--limit", "1"])[0].kind, "Transfer");
}

#[test]
fn remove_then_undo_and_redo() {
    let conn = setup();
    run(&conn, &["add", "--date", "2021-04-23", "--type", "Sale", "--item", "Pickaxe"]).unwrap();
    run(&conn, &["add", "--date", "2021-04-24", "--type", "Sale", "--item", "Pickaxe", "--qty", "2"]).unwrap();

    run(&conn, &["rm", "--id", "1"]).unwrap();
    assert_eq!(load_transactions(&conn).unwrap().len(), 1);

    run(&conn, &["undo"]).unwrap();
    let ids: Vec<i64> = load_transactions(&conn).unwrap().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1, 2]);

    run(&conn, &["redo"]).unwrap();
    assert_eq!(load_transactions(&conn).unwrap().len(), 1);

    let history = load_history(&conn, 50).unwrap();
    assert_eq!(history.undo_len(), 3);
    assert!(!history.can_redo());
    assert_eq!(transactions::stack_summary(&history), "3 to undo, 0 to redo");

    run(&conn, &["undo"]).unwrap();
    run(&conn, &["undo"]).unwrap();
    let history = load_history(&conn, 50).unwrap();
    assert_eq!(history.redo_len(), 2);
    assert_eq!(transactions::stack_summary(&history), "1 to undo, 2 to redo");
}

#[test]
fn undo_with_empty_history_is_a_no_op() {
    let conn = setup();
    run(&conn, &["undo"]).unwrap();
    run(&conn, &["redo"]).unwrap();
    assert!(load_transactions(&conn).unwrap().is_empty());
}

#[test]
fn removing_unknown_id_fails() {
    let conn = setup();
    assert!(run(&conn, &["rm", "--id", "42"]).is_err());
}
