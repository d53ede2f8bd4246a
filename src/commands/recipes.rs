// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::production::{RecipeBook, analyse};
use crate::store::{load_catalog, load_recipes};
use crate::utils::{arg, fmt_money, maybe_print_json, opt_arg, pretty_table};
use anyhow::{Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(conn, sub)?,
        Some(("chain", sub)) => chain(conn, sub)?,
        Some(("analyse", sub)) => analyse_cmd(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn format_inputs(inputs: &[(String, i64)]) -> String {
    inputs
        .iter()
        .map(|(name, qty)| format!("{} x{}", name, qty))
        .collect::<Vec<_>>()
        .join(", ")
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let workbench = opt_arg(sub, "workbench");
    let data: Vec<_> = load_recipes(conn)?
        .into_iter()
        .filter(|r| {
            workbench
                .as_deref()
                .is_none_or(|w| r.workbench.eq_ignore_ascii_case(w))
        })
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    r.workbench.clone(),
                    r.output.clone(),
                    r.output_qty.to_string(),
                    format_inputs(&r.inputs),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Workbench", "Output", "Qty", "Inputs"], rows)
        );
    }
    Ok(())
}

fn chain(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let output = arg(sub, "output")?;
    let qty = *sub.get_one::<i64>("qty").unwrap_or(&1);
    if qty < 1 {
        bail!("Quantity must be at least 1, got {}", qty);
    }
    let book = RecipeBook::new(load_recipes(conn)?);
    if book.for_output(output).is_empty() {
        bail!("No recipe produces '{}'", output);
    }

    if sub.get_flag("raw") {
        let totals = book.raw_totals(output, qty)?;
        if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &totals)? {
            let rows = totals
                .iter()
                .map(|(name, q)| vec![name.clone(), q.to_string()])
                .collect();
            println!("{}", pretty_table(&["Raw material", "Qty"], rows));
        }
        return Ok(());
    }

    let steps = book.chain(output, qty)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &steps)? {
        let rows = steps
            .iter()
            .map(|s| {
                vec![
                    format!("{}{}", "  ".repeat(s.depth), s.material),
                    s.quantity.to_string(),
                    s.runs.map(|r| r.to_string()).unwrap_or_default(),
                    s.workbench.clone().unwrap_or_else(|| "raw".into()),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Material", "Qty", "Runs", "Workbench"], rows)
        );
    }
    Ok(())
}

fn analyse_cmd(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let book = RecipeBook::new(load_recipes(conn)?);
    let catalog = load_catalog(conn)?;
    let mut data = analyse(&book, &catalog);
    if let Some(limit) = sub.get_one::<usize>("limit") {
        data.truncate(*limit);
    }
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|a| {
                vec![
                    a.output.clone(),
                    a.workbench.clone(),
                    fmt_money(&a.input_cost),
                    fmt_money(&a.output_value),
                    fmt_money(&a.profit),
                    format!("{:.1}%", a.margin_percent),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Output", "Workbench", "Input cost", "Output value", "Profit", "Margin"],
                rows
            )
        );
    }
    Ok(())
}
