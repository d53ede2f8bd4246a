// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::inventory::{StockLine, stock, summarize};
use crate::store::{load_catalog, load_transactions};
use crate::utils::{fmt_money, maybe_print_json, opt_arg, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn query_stock(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<StockLine>> {
    let catalog = load_catalog(conn)?;
    let transactions = load_transactions(conn)?;
    let status = opt_arg(sub, "status");
    Ok(stock(&transactions, &catalog)
        .into_iter()
        .filter(|l| {
            status
                .as_deref()
                .is_none_or(|s| l.status.to_string().eq_ignore_ascii_case(s))
        })
        .collect())
}

pub fn handle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let lines = query_stock(conn, sub)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &lines)? {
        return Ok(());
    }
    let summary = summarize(&lines);
    let rows = lines
        .iter()
        .map(|l| {
            vec![
                l.item.clone(),
                l.category.clone(),
                l.quantity.to_string(),
                fmt_money(&l.unit_value),
                fmt_money(&l.value),
                l.status.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Item", "Category", "Qty", "Unit Value", "Value", "Status"],
            rows
        )
    );
    println!(
        "{} items, {} in stock, {} low, total value {}",
        summary.items,
        summary.in_stock,
        summary.low_stock,
        fmt_money(&summary.total_value)
    );
    Ok(())
}
