// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::settings::GameSettings;
use crate::store::load_ledger;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("balances", sub)) => balances(conn, sub)?,
        Some(("totals", sub)) => totals(conn, sub)?,
        Some(("categories", sub)) => categories(conn, sub)?,
        Some(("cashflow", sub)) => cashflow(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn balances(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let settings = GameSettings::load(conn)?;
    let ledger = load_ledger(conn, &settings)?;
    let current = ledger.current_balances(settings.opening);
    let data = vec![
        vec![
            "Personal".to_string(),
            format!("{:.2}", settings.opening.personal),
            format!("{:.2}", current.personal),
        ],
        vec![
            "Company".to_string(),
            format!("{:.2}", settings.opening.company),
            format!("{:.2}", current.company),
        ],
        vec![
            "Total".to_string(),
            format!("{:.2}", settings.opening.total()),
            format!("{:.2}", current.total()),
        ],
    ];
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        println!("{}", pretty_table(&["Account", "Opening", "Current"], data));
    }
    Ok(())
}

fn totals(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let settings = GameSettings::load(conn)?;
    let t = load_ledger(conn, &settings)?.totals();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &t)? {
        return Ok(());
    }
    let rows = vec![
        vec![
            "Personal".into(),
            fmt_money(&t.personal_income),
            fmt_money(&t.personal_expense),
            fmt_money(&t.personal_net),
        ],
        vec![
            "Company".into(),
            fmt_money(&t.company_income),
            fmt_money(&t.company_expense),
            fmt_money(&t.company_net),
        ],
        vec![
            "Total".into(),
            fmt_money(&t.total_income),
            fmt_money(&t.total_expense),
            fmt_money(&t.total_net),
        ],
    ];
    println!(
        "{}",
        pretty_table(&["Account", "Income", "Expense", "Net"], rows)
    );
    println!("{} transactions", t.transaction_count);
    Ok(())
}

fn categories(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let settings = GameSettings::load(conn)?;
    let mut data = load_ledger(conn, &settings)?.category_totals();
    data.sort_by(|a, b| b.net.cmp(&a.net));
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|c| {
                vec![
                    c.category.clone(),
                    fmt_money(&c.income),
                    fmt_money(&c.expense),
                    fmt_money(&c.net),
                    c.count.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "Income", "Expense", "Net", "Count"], rows)
        );
    }
    Ok(())
}

fn cashflow(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let months: usize = *sub.get_one::<usize>("months").unwrap_or(&12);
    let settings = GameSettings::load(conn)?;
    let flows = load_ledger(conn, &settings)?.monthly_cashflow();
    let data: Vec<Vec<String>> = flows
        .iter()
        .rev()
        .take(months)
        .map(|f| {
            vec![
                f.month.clone(),
                format!("{:.2}", f.income),
                format!("{:.2}", f.expense),
            ]
        })
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        println!("{}", pretty_table(&["Month", "Income", "Expense"], data));
    }
    Ok(())
}
