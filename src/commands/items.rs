// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::catalog::{ItemQuote, quote};
use crate::settings::GameSettings;
use crate::store::load_catalog;
use crate::utils::{arg, fmt_money, maybe_print_json, opt_arg, pretty_table, yes_no};
use anyhow::{Context, Result};
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        _ => {}
    }
    Ok(())
}

pub fn query_quotes(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<ItemQuote>> {
    let catalog = load_catalog(conn)?;
    let skills = GameSettings::load(conn)?.skills;
    let category = opt_arg(sub, "category");
    let buyable = sub.get_flag("buyable");
    let sellable = sub.get_flag("sellable");

    let mut out = Vec::new();
    for item in catalog.items() {
        if let Some(ref c) = category {
            if !item.category.eq_ignore_ascii_case(c) {
                continue;
            }
        }
        if (buyable && !item.can_buy) || (sellable && !item.can_sell) {
            continue;
        }
        out.push(quote(item, &skills)?);
    }
    Ok(out)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_quotes(conn, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|q| {
                vec![
                    q.name.clone(),
                    q.category.clone(),
                    fmt_money(&q.current_buy_price),
                    fmt_money(&q.sell_price),
                    fmt_money(&q.margin),
                    format!("{:.1}%", q.roi_percent),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Item", "Category", "Buy (now)", "Sell", "Margin", "ROI"],
                rows
            )
        );
    }
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = arg(sub, "name")?;
    let catalog = load_catalog(conn)?;
    let item = catalog
        .get(name)
        .with_context(|| format!("Item '{}' not found", name))?;
    let q = quote(item, &GameSettings::load(conn)?.skills)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &q)? {
        return Ok(());
    }
    let rows = vec![
        vec!["Name".into(), item.name.clone()],
        vec!["Category".into(), item.category.clone()],
        vec!["Buy price".into(), fmt_money(&Decimal::from(item.buy_price))],
        vec!["Buy price (discounted)".into(), fmt_money(&q.current_buy_price)],
        vec!["Sell price".into(), fmt_money(&item.sell_price)],
        vec!["Can purchase".into(), yes_no(item.can_buy)],
        vec!["Can sell".into(), yes_no(item.can_sell)],
        vec!["Margin".into(), fmt_money(&q.margin)],
        vec!["ROI".into(), format!("{:.1}%", q.roi_percent)],
    ];
    println!("{}", pretty_table(&["Field", "Value"], rows));
    Ok(())
}
