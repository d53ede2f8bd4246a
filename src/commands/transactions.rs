// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::{Change, History, Ledger, replay};
use crate::models::{Account, Transaction, TransactionKind};
use crate::pricing::{self, PriceRequest};
use crate::settings::GameSettings;
use crate::store::{apply_change, load_catalog, load_ledger, save_history};
use crate::utils::{
    arg, fmt_money, maybe_print_json, opt_arg, parse_date, parse_decimal, pretty_table,
};
use anyhow::{Context, Result, anyhow, bail};
use rusqlite::Connection;
use serde::Serialize;
use std::collections::HashMap;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("transfer", sub)) => transfer(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => remove(conn, sub)?,
        Some(("undo", _)) => undo(conn)?,
        Some(("redo", _)) => redo(conn)?,
        _ => {}
    }
    Ok(())
}

/// Writes a ledger change and the updated history atomically.
fn persist(conn: &Connection, ledger: &Ledger, change: &Change) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    apply_change(&tx, change)?;
    save_history(&tx, ledger.history())?;
    tx.commit()?;
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(arg(sub, "date")?)?;
    let kind: TransactionKind = arg(sub, "type")?.parse()?;
    if matches!(kind, TransactionKind::Transfer | TransactionKind::Opening) {
        bail!("Use 'tx transfer' for transfers and 'settings set' for opening balances");
    }
    let item_name = arg(sub, "item")?;
    let quantity = *sub.get_one::<i64>("qty").unwrap_or(&1);
    let account: Account = arg(sub, "account")?.parse()?;
    let base_price = match opt_arg(sub, "price") {
        Some(p) => Some(parse_decimal(&p)?),
        None => None,
    };

    let settings = GameSettings::load(conn)?;
    let catalog = load_catalog(conn)?;
    let item = catalog
        .get(item_name)
        .with_context(|| format!("Item '{}' not found in reference data", item_name))?;

    let req = PriceRequest {
        kind,
        account,
        quantity,
        base_price,
    };
    let line = pricing::price(&req, item, &settings.skills)?;

    let mut ledger = load_ledger(conn, &settings)?;
    let change = ledger.add(Transaction {
        id: 0,
        date,
        kind,
        item: item.name.clone(),
        category: item.category.clone(),
        quantity,
        unit_price: line.effective_unit_price,
        account,
        total: line.total,
        personal_amount: line.personal_amount,
        company_amount: line.company_amount,
        location: opt_arg(sub, "location"),
        notes: opt_arg(sub, "notes"),
    });
    persist(conn, &ledger, &change)?;

    let txn = change.transaction();
    tracing::info!(id = txn.id, kind = %kind, total = %txn.total, "transaction recorded");
    println!(
        "Recorded #{} {} {} x {} = {} (personal {}, company {})",
        txn.id,
        kind,
        quantity,
        txn.item,
        fmt_money(&txn.total),
        fmt_money(&txn.personal_amount),
        fmt_money(&txn.company_amount)
    );
    Ok(())
}

fn transfer(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(arg(sub, "date")?)?;
    let from: Account = arg(sub, "from")?.parse()?;
    let to: Account = arg(sub, "to")?.parse()?;
    let amount = parse_decimal(arg(sub, "amount")?)?;
    let (personal_amount, company_amount) = pricing::transfer(amount, from, to)?;

    let settings = GameSettings::load(conn)?;
    let mut ledger = load_ledger(conn, &settings)?;
    let change = ledger.add(Transaction {
        id: 0,
        date,
        kind: TransactionKind::Transfer,
        item: format!("Transfer to {}", to),
        category: "Transfer".into(),
        quantity: 1,
        unit_price: amount,
        account: to,
        total: amount,
        personal_amount,
        company_amount,
        location: None,
        notes: opt_arg(sub, "notes"),
    });
    persist(conn, &ledger, &change)?;
    println!(
        "Recorded #{}: moved {} from {} to {}",
        change.transaction().id,
        fmt_money(&amount),
        from,
        to
    );
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub kind: String,
    pub item: String,
    pub category: String,
    pub quantity: i64,
    pub unit_price: String,
    pub account: String,
    pub total: String,
    pub personal_amount: String,
    pub company_amount: String,
    pub personal_balance: String,
    pub company_balance: String,
}

/// Newest first, with the running balance after each row.
pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let settings = GameSettings::load(conn)?;
    let ledger = load_ledger(conn, &settings)?;
    let balances: HashMap<i64, (String, String)> = replay(settings.opening, ledger.entries())
        .into_iter()
        .map(|b| (b.id, (format!("{:.2}", b.personal), format!("{:.2}", b.company))))
        .collect();

    let month = opt_arg(sub, "month");
    let category = opt_arg(sub, "category");
    let kind = match opt_arg(sub, "type") {
        Some(k) => Some(k.parse::<TransactionKind>()?),
        None => None,
    };
    let limit = sub.get_one::<usize>("limit").copied();

    let rows = ledger
        .entries()
        .iter()
        .rev()
        .filter(|t| {
            month
                .as_deref()
                .is_none_or(|m| t.date.format("%Y-%m").to_string() == m)
        })
        .filter(|t| {
            category
                .as_deref()
                .is_none_or(|c| t.category.eq_ignore_ascii_case(c))
        })
        .filter(|t| kind.is_none_or(|k| t.kind == k))
        .take(limit.unwrap_or(usize::MAX))
        .map(|t| {
            let (pb, cb) = balances.get(&t.id).cloned().unwrap_or_default();
            TransactionRow {
                id: t.id,
                date: t.date.to_string(),
                kind: t.kind.to_string(),
                item: t.item.clone(),
                category: t.category.clone(),
                quantity: t.quantity,
                unit_price: t.unit_price.to_string(),
                account: t.account.to_string(),
                total: t.total.to_string(),
                personal_amount: t.personal_amount.to_string(),
                company_amount: t.company_amount.to_string(),
                personal_balance: pb,
                company_balance: cb,
            }
        })
        .collect();
    Ok(rows)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.kind.clone(),
                    r.item.clone(),
                    r.quantity.to_string(),
                    r.unit_price.clone(),
                    r.account.clone(),
                    r.total.clone(),
                    r.personal_amount.clone(),
                    r.company_amount.clone(),
                    r.personal_balance.clone(),
                    r.company_balance.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &[
                    "ID", "Date", "Type", "Item", "Qty", "Unit", "Account", "Total", "Personal",
                    "Company", "Personal Bal", "Company Bal",
                ],
                rows,
            )
        );
    }
    Ok(())
}

fn remove(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub
        .get_one::<i64>("id")
        .ok_or_else(|| anyhow!("Missing --id"))?;
    let settings = GameSettings::load(conn)?;
    let mut ledger = load_ledger(conn, &settings)?;
    let change = ledger
        .delete(id)
        .with_context(|| format!("Transaction #{} not found", id))?;
    persist(conn, &ledger, &change)?;
    println!("Removed transaction #{}", id);
    Ok(())
}

fn describe(change: &Change) -> String {
    let t = change.transaction();
    match change {
        Change::Added(_) => format!("restored #{} ({} {})", t.id, t.kind, t.item),
        Change::Removed(_) => format!("removed #{} ({} {})", t.id, t.kind, t.item),
    }
}

/// Remaining depth of both stacks, shown after every undo or redo.
pub fn stack_summary(history: &History) -> String {
    format!(
        "{} to undo, {} to redo",
        history.undo_len(),
        history.redo_len()
    )
}

fn undo(conn: &Connection) -> Result<()> {
    let settings = GameSettings::load(conn)?;
    let mut ledger = load_ledger(conn, &settings)?;
    match ledger.undo() {
        Some(change) => {
            persist(conn, &ledger, &change)?;
            println!(
                "Undo: {} ({})",
                describe(&change),
                stack_summary(ledger.history())
            );
        }
        None => println!("Nothing to undo"),
    }
    Ok(())
}

fn redo(conn: &Connection) -> Result<()> {
    let settings = GameSettings::load(conn)?;
    let mut ledger = load_ledger(conn, &settings)?;
    match ledger.redo() {
        Some(change) => {
            persist(conn, &ledger, &change)?;
            println!(
                "Redo: {} ({})",
                describe(&change),
                stack_summary(ledger.history())
            );
        }
        None => println!("Nothing to redo"),
    }
    Ok(())
}
