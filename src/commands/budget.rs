// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::budget::{BudgetOverview, QueueEntry, line_cost, overview, queue};
use crate::catalog::discounted_buy_price;
use crate::models::{PlannedPurchase, Priority};
use crate::settings::GameSettings;
use crate::store::{delete_plan, insert_plan, load_catalog, load_ledger, load_plans, set_plan_included};
use crate::utils::{arg, fmt_money, maybe_print_json, opt_arg, parse_decimal, pretty_table, yes_no};
use anyhow::{Result, anyhow, bail};
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("overview", sub)) => show_overview(conn, sub)?,
        Some(("include", sub)) => toggle(conn, sub, true)?,
        Some(("exclude", sub)) => toggle(conn, sub, false)?,
        Some(("rm", sub)) => remove(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn id_of(sub: &clap::ArgMatches) -> Result<i64> {
    sub.get_one::<i64>("id")
        .copied()
        .ok_or_else(|| anyhow!("Missing --id"))
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = arg(sub, "item")?;
    let quantity = *sub.get_one::<i64>("qty").unwrap_or(&1);
    let priority: Priority = arg(sub, "priority")?.parse()?;

    let catalog = load_catalog(conn)?;
    let (item, unit_price) = match (opt_arg(sub, "price"), catalog.get(name)) {
        (Some(p), found) => (
            found.map(|i| i.name.clone()).unwrap_or_else(|| name.to_string()),
            parse_decimal(&p)?,
        ),
        (None, Some(item)) => {
            if !item.can_buy {
                bail!("'{}' cannot be purchased", item.name);
            }
            let skills = GameSettings::load(conn)?.skills;
            (item.name.clone(), discounted_buy_price(item, &skills)?)
        }
        (None, None) => bail!("Item '{}' not in catalog; pass --price", name),
    };

    let mut plan = PlannedPurchase {
        id: 0,
        item,
        quantity,
        unit_price,
        priority,
        include: true,
        notes: opt_arg(sub, "notes"),
    };
    let cost = line_cost(&plan)?;
    plan.id = insert_plan(conn, &plan)?;
    tracing::info!(id = plan.id, item = %plan.item, %cost, "purchase planned");
    println!(
        "Planned #{} {} x{} ({}, {})",
        plan.id,
        plan.item,
        plan.quantity,
        fmt_money(&cost),
        plan.priority
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let plans = load_plans(conn)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &plans)? {
        return Ok(());
    }
    let mut rows = Vec::with_capacity(plans.len());
    for p in &plans {
        rows.push(vec![
            p.id.to_string(),
            p.priority.to_string(),
            p.item.clone(),
            p.quantity.to_string(),
            fmt_money(&p.unit_price),
            fmt_money(&line_cost(p)?),
            yes_no(p.include),
        ]);
    }
    println!(
        "{}",
        pretty_table(
            &["ID", "Priority", "Item", "Qty", "Unit", "Cost", "Included"],
            rows
        )
    );
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct BudgetView {
    pub overview: BudgetOverview,
    pub queue: Vec<QueueEntry>,
}

/// Planned purchases measured against the current Personal balance.
pub fn query_overview(conn: &Connection) -> Result<BudgetView> {
    let settings = GameSettings::load(conn)?;
    let available = load_ledger(conn, &settings)?
        .current_balances(settings.opening)
        .personal;
    let plans = load_plans(conn)?;
    Ok(BudgetView {
        overview: overview(&plans, available)?,
        queue: queue(&plans, available)?,
    })
}

fn show_overview(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let view = query_overview(conn)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &view)? {
        return Ok(());
    }
    let rows = view
        .queue
        .iter()
        .map(|q| {
            vec![
                q.priority.to_string(),
                q.item.clone(),
                q.quantity.to_string(),
                fmt_money(&q.cost),
                fmt_money(&q.cumulative),
                yes_no(q.funded),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Priority", "Item", "Qty", "Cost", "Cumulative", "Funded"],
            rows
        )
    );
    let o = &view.overview;
    println!(
        "{}: planned {} ({} items), available {}, {}% funded",
        o.status,
        fmt_money(&o.planned_total),
        o.included,
        fmt_money(&o.available),
        o.funded_percent
    );
    if o.shortfall.is_zero() {
        println!("Surplus {}. Fully funded!", fmt_money(&o.surplus));
    } else {
        println!(
            "Shortfall {}. Revenue needed: {} gross ore/fluid sales",
            fmt_money(&o.shortfall),
            fmt_money(&o.revenue_needed)
        );
    }
    Ok(())
}

fn toggle(conn: &Connection, sub: &clap::ArgMatches, include: bool) -> Result<()> {
    let id = id_of(sub)?;
    if !set_plan_included(conn, id, include)? {
        bail!("Planned purchase #{} not found", id);
    }
    println!(
        "{} planned purchase #{}",
        if include { "Included" } else { "Excluded" },
        id
    );
    Ok(())
}

fn remove(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = id_of(sub)?;
    if !delete_plan(conn, id)? {
        bail!("Planned purchase #{} not found", id);
    }
    println!("Removed planned purchase #{}", id);
    Ok(())
}
