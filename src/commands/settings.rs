// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::pricing::discount_rate;
use crate::settings::GameSettings;
use crate::utils::{fmt_money, maybe_print_json, opt_arg, parse_date, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(conn, sub)?,
        Some(("set", sub)) => set(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let s = GameSettings::load(conn)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        return Ok(());
    }
    let general = discount_rate(&s.skills, false)? * Decimal::ONE_HUNDRED;
    let vehicle = discount_rate(&s.skills, true)? * Decimal::ONE_HUNDRED;
    let rows = vec![
        vec!["Opening (Personal)".into(), fmt_money(&s.opening.personal)],
        vec!["Opening (Company)".into(), fmt_money(&s.opening.company)],
        vec![
            "Vendor Negotiation".into(),
            format!("{} ({:.1}% on all purchases)", s.skills.vendor_negotiation, general),
        ],
        vec![
            "Investment Forecasting".into(),
            format!(
                "{} ({:.1}% on vehicles, combined)",
                s.skills.investment_forecasting, vehicle
            ),
        ],
        vec!["Game start".into(), s.game_start_date.to_string()],
        vec!["Current date".into(), s.current_game_date.to_string()],
        vec!["Days played".into(), s.days_played().to_string()],
        vec!["Undo depth".into(), s.undo_depth.to_string()],
    ];
    println!("{}", pretty_table(&["Setting", "Value"], rows));
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let mut s = GameSettings::load(conn)?;
    if let Some(vn) = sub.get_one::<u8>("vn") {
        s.skills.vendor_negotiation = *vn;
    }
    if let Some(level) = sub.get_one::<u8>("if") {
        s.skills.investment_forecasting = *level;
    }
    if let Some(v) = opt_arg(sub, "opening_personal") {
        s.opening.personal = parse_decimal(&v)?;
    }
    if let Some(v) = opt_arg(sub, "opening_company") {
        s.opening.company = parse_decimal(&v)?;
    }
    if let Some(v) = opt_arg(sub, "start_date") {
        s.game_start_date = parse_date(&v)?;
    }
    if let Some(v) = opt_arg(sub, "date") {
        s.current_game_date = parse_date(&v)?;
    }
    if let Some(depth) = sub.get_one::<usize>("undo_depth") {
        s.undo_depth = *depth;
    }
    s.save(conn)?;
    tracing::info!(skills = ?s.skills, opening = ?s.opening, "settings saved");
    println!("Settings saved");
    Ok(())
}
