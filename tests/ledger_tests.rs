// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use orebook::ledger::{Change, History, Ledger, replay};
use orebook::models::{Account, Balances, Transaction, TransactionKind};
use rust_decimal::Decimal;

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 4, day).unwrap()
}

fn txn(day: u32, kind: TransactionKind, personal: i64, company: i64) -> Transaction {
    Transaction {
        id: 0,
        date: d(day),
        kind,
        item: "Iron Ore".into(),
        category: "Resources - Ore".into(),
        quantity: 1,
        unit_price: Decimal::from((personal + company).abs()),
        account: Account::Personal,
        total: Decimal::from((personal + company).abs()),
        personal_amount: Decimal::from(personal),
        company_amount: Decimal::from(company),
        location: None,
        notes: None,
    }
}

fn opening() -> Balances {
    Balances::new(Decimal::from(100_000), Decimal::ZERO)
}

#[test]
fn replay_accumulates_in_date_order() {
    let mut ledger = Ledger::new(50);
    ledger.add(txn(25, TransactionKind::Sale, 10, 90));
    ledger.add(txn(23, TransactionKind::Purchase, -500, 0));
    let balances = ledger.balances(opening());
    assert_eq!(balances.len(), 2);
    assert_eq!(balances[0].date, d(23));
    assert_eq!(balances[0].personal, Decimal::from(99_500));
    assert_eq!(balances[1].personal, Decimal::from(99_510));
    assert_eq!(balances[1].company, Decimal::from(90));
}

#[test]
fn deleting_a_middle_row_leaves_no_drift() {
    let mut ledger = Ledger::new(50);
    ledger.add(txn(22, TransactionKind::Purchase, -100, 0));
    let middle = ledger.add(txn(23, TransactionKind::Sale, 50, 450)).transaction().id;
    ledger.add(txn(24, TransactionKind::Fuel, 0, -30));

    let mut expected = ledger.entries().to_vec();
    expected.retain(|t| t.id != middle);
    ledger.delete(middle).unwrap();

    assert_eq!(ledger.balances(opening()), replay(opening(), &expected));
    let current = ledger.current_balances(opening());
    assert_eq!(current.personal, Decimal::from(99_900));
    assert_eq!(current.company, Decimal::from(-30));
}

#[test]
fn replay_is_idempotent_and_skips_opening_rows() {
    let rows = vec![
        txn(22, TransactionKind::Opening, 0, 0),
        txn(23, TransactionKind::Sale, 5, 45),
    ];
    let first = replay(opening(), &rows);
    assert_eq!(first, replay(opening(), &rows));
    assert_eq!(first.len(), 1);
}

#[test]
fn current_balance_without_rows_is_opening() {
    let ledger = Ledger::new(50);
    assert_eq!(ledger.current_balances(opening()), opening());
}

#[test]
fn undo_and_redo_restore_state() {
    let mut ledger = Ledger::new(50);
    ledger.add(txn(22, TransactionKind::Sale, 10, 90));
    let second = ledger.add(txn(23, TransactionKind::Sale, 20, 180));
    let after_add = ledger.entries().to_vec();

    let undone = ledger.undo().unwrap();
    assert_eq!(undone, second.inverse());
    assert_eq!(ledger.entries().len(), 1);

    let redone = ledger.redo().unwrap();
    assert_eq!(redone, second);
    assert_eq!(ledger.entries(), after_add.as_slice());
    assert!(ledger.redo().is_none());
    assert!(ledger.history().can_undo());
}

#[test]
fn undo_of_delete_reinserts_same_row() {
    let mut ledger = Ledger::new(50);
    let id = ledger.add(txn(22, TransactionKind::Sale, 10, 90)).transaction().id;
    ledger.delete(id).unwrap();
    assert!(ledger.get(id).is_none());
    assert!(matches!(ledger.undo(), Some(Change::Added(_))));
    assert_eq!(ledger.get(id).map(|t| t.id), Some(id));
}

#[test]
fn new_action_clears_redo() {
    let mut ledger = Ledger::new(50);
    ledger.add(txn(22, TransactionKind::Sale, 10, 90));
    ledger.undo();
    assert!(ledger.history().can_redo());
    ledger.add(txn(23, TransactionKind::Sale, 1, 9));
    assert!(!ledger.history().can_redo());
}

#[test]
fn history_depth_is_bounded() {
    let mut ledger = Ledger::new(3);
    for day in 1..=5 {
        ledger.add(txn(day, TransactionKind::Sale, 1, 9));
    }
    assert_eq!(ledger.history().undo_len(), 3);
    while ledger.undo().is_some() {}
    assert_eq!(ledger.entries().len(), 2);
}

#[test]
fn ids_are_not_reused_while_redo_holds_them() {
    let mut ledger = Ledger::new(50);
    let first = ledger.add(txn(22, TransactionKind::Sale, 1, 9)).transaction().id;
    ledger.undo();
    assert!(ledger.next_id() > first);
}

#[test]
fn history_survives_json() {
    let mut history = History::new(5);
    history.record(Change::Added(txn(22, TransactionKind::Sale, 1, 9)));
    let json = serde_json::to_string(&history).unwrap();
    let back: History = serde_json::from_str(&json).unwrap();
    assert_eq!(back, history);
}

#[test]
fn totals_split_income_and_expense() {
    let mut ledger = Ledger::new(50);
    ledger.add(txn(22, TransactionKind::Sale, 100, 900));
    ledger.add(txn(23, TransactionKind::Purchase, -250, 0));
    ledger.add(txn(24, TransactionKind::Transfer, -50, 50));
    let t = ledger.totals();
    assert_eq!(t.personal_income, Decimal::from(100));
    assert_eq!(t.company_income, Decimal::from(900));
    assert_eq!(t.personal_expense, Decimal::from(250));
    assert_eq!(t.total_net, Decimal::from(750));
    assert_eq!(t.transaction_count, 3);
}

#[test]
fn cashflow_groups_by_month() {
    let mut ledger = Ledger::new(50);
    ledger.add(txn(22, TransactionKind::Sale, 10, 90));
    let mut may = txn(1, TransactionKind::Purchase, -40, 0);
    may.date = NaiveDate::from_ymd_opt(2021, 5, 3).unwrap();
    ledger.add(may);
    let flows = ledger.monthly_cashflow();
    assert_eq!(flows.len(), 2);
    assert_eq!(flows[0].month, "2021-04");
    assert_eq!(flows[0].income, Decimal::from(100));
    assert_eq!(flows[1].expense, Decimal::from(40));
}
