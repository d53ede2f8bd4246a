// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Investment, Revenue};
use crate::roi::{InvestmentReport, report, summarize};
use crate::settings::GameSettings;
use crate::store::{id_for_investment, insert_investment, insert_revenue, load_investments, load_revenues};
use crate::utils::{arg, fmt_money, maybe_print_json, opt_arg, parse_date, parse_decimal, pretty_table};
use anyhow::{Result, bail};
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("revenue", sub)) => revenue(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = arg(sub, "name")?.to_string();
    let cost = parse_decimal(arg(sub, "cost")?)?;
    if cost <= Decimal::ZERO {
        bail!("Investment cost must be positive, got {}", cost);
    }
    let date = parse_date(arg(sub, "date")?)?;
    insert_investment(
        conn,
        &Investment {
            id: 0,
            name: name.clone(),
            cost,
            date,
        },
    )?;
    println!("Tracking '{}' (cost {})", name, fmt_money(&cost));
    Ok(())
}

fn revenue(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = arg(sub, "name")?;
    let amount = parse_decimal(arg(sub, "amount")?)?;
    let date = parse_date(arg(sub, "date")?)?;
    let investment_id = id_for_investment(conn, name)?;
    insert_revenue(
        conn,
        &Revenue {
            id: 0,
            investment_id,
            date,
            amount,
            note: opt_arg(sub, "note"),
        },
    )?;
    println!("Added {} revenue to '{}'", fmt_money(&amount), name);
    Ok(())
}

pub fn query_reports(conn: &Connection) -> Result<Vec<InvestmentReport>> {
    let today = GameSettings::load(conn)?.current_game_date;
    let revenues = load_revenues(conn)?;
    Ok(load_investments(conn)?
        .iter()
        .map(|inv| report(inv, &revenues, today))
        .collect())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let reports = query_reports(conn)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &reports)? {
        return Ok(());
    }
    let rows = reports
        .iter()
        .map(|r| {
            vec![
                r.name.clone(),
                fmt_money(&r.cost),
                fmt_money(&r.revenue),
                fmt_money(&r.metrics.profit),
                format!("{:+.1}%", r.metrics.roi_percent),
                r.metrics
                    .break_even_days
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".into()),
                r.status.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Investment", "Cost", "Revenue", "Profit", "ROI", "Break-even (days)", "Status"],
            rows
        )
    );
    let s = summarize(&reports);
    println!(
        "Invested {}, returned {}, net {} ({:+.1}%), best: {}",
        fmt_money(&s.total_invested),
        fmt_money(&s.total_revenue),
        fmt_money(&s.net_profit),
        s.overall_roi_percent,
        s.best.as_deref().unwrap_or("-")
    );
    Ok(())
}
