// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::catalog::Catalog;
use crate::models::{HaulSession, OreYield, ProcessSession};
use crate::sessions::{SessionTotals, haul_figures, process_figures, totals};
use crate::store::{
    delete_haul, delete_process, find_vehicle, insert_haul, insert_process, load_catalog,
    load_hauls, load_process_sessions, load_vehicles,
};
use crate::utils::{arg, fmt_money, maybe_print_json, opt_arg, parse_date, parse_decimal, pretty_table};
use anyhow::{Context, Result, anyhow, bail};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("haul", sub)) => haul(conn, sub)?,
        Some(("process", sub)) => process(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("totals", sub)) => show_totals(conn, sub)?,
        Some(("vehicles", sub)) => vehicles(conn, sub)?,
        Some(("rm", sub)) => remove(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn haul(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let vehicle = find_vehicle(conn, arg(sub, "vehicle")?)?;
    let loads = *sub
        .get_one::<i64>("loads")
        .ok_or_else(|| anyhow!("Missing --loads"))?;
    let hours = parse_decimal(arg(sub, "hours")?)?;
    let figures = haul_figures(&vehicle, loads, hours)?;

    let mut session = HaulSession {
        id: 0,
        date: parse_date(arg(sub, "date")?)?,
        location: arg(sub, "location")?.to_string(),
        vehicle: vehicle.name,
        loads,
        volume_yd3: figures.volume_yd3,
        stockpile: opt_arg(sub, "stockpile"),
        hours,
        fuel_used_l: figures.fuel_used_l,
        fuel_cost: figures.fuel_cost,
        notes: opt_arg(sub, "notes"),
    };
    session.id = insert_haul(conn, &session)?;
    tracing::info!(id = session.id, volume = %session.volume_yd3, "hauling session saved");
    println!(
        "Haul #{}: {} yd³ moved, {} L fuel ({})",
        session.id,
        session.volume_yd3,
        session.fuel_used_l,
        fmt_money(&session.fuel_cost)
    );
    Ok(())
}

/// Parses `Name:qty@price;Name:qty`. A missing quantity means 1 and a
/// missing price falls back to the catalog sell price.
pub fn parse_ores(spec: &str, catalog: &Catalog) -> Result<Vec<OreYield>> {
    let mut out = Vec::new();
    for part in spec.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        let (rest, price) = match part.rsplit_once('@') {
            Some((rest, p)) => (rest.trim(), Some(parse_decimal(p)?)),
            None => (part, None),
        };
        let (name, quantity) = match rest.rsplit_once(':') {
            Some((n, q)) => (
                n.trim(),
                q.trim()
                    .parse::<i64>()
                    .with_context(|| format!("Invalid ore quantity in '{}'", part))?,
            ),
            None => (rest, 1),
        };
        if name.is_empty() {
            bail!("Ore name missing in '{}'", part);
        }
        let unit_price = match price {
            Some(p) => p,
            None => catalog
                .get(name)
                .map(|i| i.sell_price)
                .with_context(|| format!("No price for '{}'; write it as {}:{}@price", name, name, quantity))?,
        };
        out.push(OreYield {
            ore: catalog
                .get(name)
                .map(|i| i.name.clone())
                .unwrap_or_else(|| name.to_string()),
            quantity,
            unit_price,
        });
    }
    Ok(out)
}

fn process(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let catalog = load_catalog(conn)?;
    let mut session = ProcessSession {
        id: 0,
        date: parse_date(arg(sub, "date")?)?,
        processor: arg(sub, "processor")?.to_string(),
        material: arg(sub, "material")?.to_string(),
        input_volume_yd3: parse_decimal(arg(sub, "volume")?)?,
        ores: parse_ores(arg(sub, "ores")?, &catalog)?,
        processing_cost: parse_decimal(arg(sub, "cost")?)?,
        notes: opt_arg(sub, "notes"),
    };
    let figures = process_figures(&session)?;
    session.id = insert_process(conn, &session)?;
    tracing::info!(id = session.id, net = %figures.net_revenue, "processing session saved");
    println!(
        "Process #{}: {} ores, net {} ({}/yd³), personal {} / company {}",
        session.id,
        figures.total_ores,
        fmt_money(&figures.net_revenue),
        fmt_money(&figures.revenue_per_yd3),
        fmt_money(&figures.personal_share),
        fmt_money(&figures.company_share)
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (json, jsonl) = (sub.get_flag("json"), sub.get_flag("jsonl"));
    match arg(sub, "kind")?.to_lowercase().as_str() {
        "haul" => {
            let data = load_hauls(conn)?;
            if maybe_print_json(json, jsonl, &data)? {
                return Ok(());
            }
            let rows = data
                .iter()
                .map(|h| {
                    vec![
                        h.id.to_string(),
                        h.date.to_string(),
                        h.location.clone(),
                        h.vehicle.clone(),
                        h.loads.to_string(),
                        h.volume_yd3.to_string(),
                        h.stockpile.clone().unwrap_or_default(),
                        h.fuel_used_l.to_string(),
                        fmt_money(&h.fuel_cost),
                    ]
                })
                .collect();
            println!(
                "{}",
                pretty_table(
                    &["ID", "Date", "Location", "Vehicle", "Loads", "yd³", "Stockpile", "Fuel (L)", "Fuel cost"],
                    rows
                )
            );
        }
        "process" => {
            let data = load_process_sessions(conn)?;
            if maybe_print_json(json, jsonl, &data)? {
                return Ok(());
            }
            let mut rows = Vec::with_capacity(data.len());
            for s in &data {
                let f = process_figures(s)?;
                rows.push(vec![
                    s.id.to_string(),
                    s.date.to_string(),
                    s.processor.clone(),
                    s.material.clone(),
                    s.input_volume_yd3.to_string(),
                    f.total_ores.to_string(),
                    fmt_money(&f.net_revenue),
                    fmt_money(&f.revenue_per_yd3),
                ]);
            }
            println!(
                "{}",
                pretty_table(
                    &["ID", "Date", "Processor", "Material", "yd³", "Ores", "Net", "Net/yd³"],
                    rows
                )
            );
        }
        other => bail!("Unknown session kind: {} (use haul|process)", other),
    }
    Ok(())
}

pub fn query_totals(conn: &Connection) -> Result<SessionTotals> {
    Ok(totals(&load_hauls(conn)?, &load_process_sessions(conn)?)?)
}

fn show_totals(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let t = query_totals(conn)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &t)? {
        return Ok(());
    }
    let rows = vec![
        vec!["Hauling sessions".into(), t.haul_sessions.to_string()],
        vec!["Volume moved (yd³)".into(), t.volume_moved_yd3.to_string()],
        vec!["Fuel used (L)".into(), t.fuel_used_l.to_string()],
        vec!["Fuel cost".into(), fmt_money(&t.fuel_cost)],
        vec!["Processing sessions".into(), t.process_sessions.to_string()],
        vec!["Volume processed (yd³)".into(), t.volume_processed_yd3.to_string()],
        vec!["Ores extracted".into(), t.ores_extracted.to_string()],
        vec!["Net revenue".into(), fmt_money(&t.net_revenue)],
    ];
    println!("{}", pretty_table(&["Metric", "Value"], rows));
    Ok(())
}

fn vehicles(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = load_vehicles(conn)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|v| {
                vec![
                    v.name.clone(),
                    v.category.clone(),
                    v.capacity_yd3.to_string(),
                    v.fuel_use_lph.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Vehicle", "Category", "Capacity (yd³)", "Fuel (L/h)"], rows)
        );
    }
    Ok(())
}

fn remove(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub
        .get_one::<i64>("id")
        .ok_or_else(|| anyhow!("Missing --id"))?;
    let removed = match arg(sub, "kind")?.to_lowercase().as_str() {
        "haul" => delete_haul(conn, id)?,
        "process" => delete_process(conn, id)?,
        other => bail!("Unknown session kind: {} (use haul|process)", other),
    };
    if !removed {
        bail!("Session #{} not found", id);
    }
    println!("Removed session #{}", id);
    Ok(())
}
