// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Plain CRUD between the SQLite record store and the in-memory models.

use crate::catalog::Catalog;
use crate::ledger::{Change, History, Ledger};
use crate::models::{
    Account, GameMap, HaulSession, Investment, Item, Location, OreYield, PlannedPurchase,
    ProcessSession, Recipe, Revenue, Transaction, TransactionKind, Vehicle,
};
use crate::settings::{GameSettings, get_setting, set_setting};
use crate::utils::{parse_date, parse_decimal};
use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::HashMap;

const KEY_HISTORY: &str = "history";

pub fn upsert_item(conn: &Connection, item: &Item) -> Result<()> {
    conn.execute(
        "INSERT INTO items(name, category, buy_price, sell_price, can_buy, can_sell)
         VALUES (?1,?2,?3,?4,?5,?6)
         ON CONFLICT(name) DO UPDATE SET
            category=excluded.category,
            buy_price=excluded.buy_price,
            sell_price=excluded.sell_price,
            can_buy=excluded.can_buy,
            can_sell=excluded.can_sell",
        params![
            item.name,
            item.category,
            item.buy_price,
            item.sell_price.to_string(),
            item.can_buy,
            item.can_sell
        ],
    )?;
    Ok(())
}

pub fn load_catalog(conn: &Connection) -> Result<Catalog> {
    let mut stmt = conn.prepare(
        "SELECT name, category, buy_price, sell_price, can_buy, can_sell FROM items ORDER BY name",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, i64>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, bool>(4)?,
            r.get::<_, bool>(5)?,
        ))
    })?;
    let mut items = Vec::new();
    for row in rows {
        let (name, category, buy_price, sell_s, can_buy, can_sell) = row?;
        let sell_price = parse_decimal(&sell_s)
            .with_context(|| format!("Invalid sell price '{}' for {}", sell_s, name))?;
        items.push(Item {
            name,
            category,
            buy_price,
            sell_price,
            can_buy,
            can_sell,
        });
    }
    Ok(Catalog::new(items))
}

pub fn insert_transaction(conn: &Connection, t: &Transaction) -> Result<()> {
    conn.execute(
        "INSERT INTO transactions(id, date, type, item, category, quantity, unit_price, account,
                                  total, personal_amount, company_amount, location, notes)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13)",
        params![
            t.id,
            t.date.to_string(),
            t.kind.as_str(),
            t.item,
            t.category,
            t.quantity,
            t.unit_price.to_string(),
            t.account.as_str(),
            t.total.to_string(),
            t.personal_amount.to_string(),
            t.company_amount.to_string(),
            t.location,
            t.notes
        ],
    )
    .with_context(|| format!("Insert transaction #{}", t.id))?;
    Ok(())
}

pub fn delete_transaction(conn: &Connection, id: i64) -> Result<()> {
    conn.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    Ok(())
}

pub fn apply_change(conn: &Connection, change: &Change) -> Result<()> {
    match change {
        Change::Added(t) => insert_transaction(conn, t),
        Change::Removed(t) => delete_transaction(conn, t.id),
    }
}

pub fn load_transactions(conn: &Connection) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(
        "SELECT id, date, type, item, category, quantity, unit_price, account,
                total, personal_amount, company_amount, location, notes
         FROM transactions ORDER BY date, id",
    )?;
    let mut cur = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let date: String = r.get(1)?;
        let kind: String = r.get(2)?;
        let unit_price: String = r.get(6)?;
        let account: String = r.get(7)?;
        let total: String = r.get(8)?;
        let personal: String = r.get(9)?;
        let company: String = r.get(10)?;
        out.push(Transaction {
            id,
            date: parse_date(&date)?,
            kind: kind
                .parse::<TransactionKind>()
                .with_context(|| format!("Transaction #{}", id))?,
            item: r.get(3)?,
            category: r.get(4)?,
            quantity: r.get(5)?,
            unit_price: parse_decimal(&unit_price)?,
            account: account
                .parse::<Account>()
                .with_context(|| format!("Transaction #{}", id))?,
            total: parse_decimal(&total)?,
            personal_amount: parse_decimal(&personal)?,
            company_amount: parse_decimal(&company)?,
            location: r.get(11)?,
            notes: r.get(12)?,
        });
    }
    Ok(out)
}

pub fn load_history(conn: &Connection, depth: usize) -> Result<History> {
    let mut history = match get_setting(conn, KEY_HISTORY)? {
        Some(json) => match serde_json::from_str::<History>(&json) {
            Ok(h) => h,
            Err(err) => {
                tracing::warn!(%err, "discarding unreadable undo history");
                History::new(depth)
            }
        },
        None => History::new(depth),
    };
    history.set_depth(depth);
    Ok(history)
}

pub fn save_history(conn: &Connection, history: &History) -> Result<()> {
    set_setting(conn, KEY_HISTORY, &serde_json::to_string(history)?)
}

pub fn load_ledger(conn: &Connection, settings: &GameSettings) -> Result<Ledger> {
    let entries = load_transactions(conn)?;
    let history = load_history(conn, settings.undo_depth)?;
    Ok(Ledger::from_parts(entries, history))
}

pub fn insert_recipe(conn: &Connection, recipe: &Recipe) -> Result<i64> {
    conn.execute(
        "INSERT INTO recipes(workbench, output, output_qty) VALUES (?1,?2,?3)",
        params![recipe.workbench, recipe.output, recipe.output_qty],
    )?;
    let id = conn.last_insert_rowid();
    for (item, qty) in &recipe.inputs {
        conn.execute(
            "INSERT INTO recipe_inputs(recipe_id, item, quantity) VALUES (?1,?2,?3)",
            params![id, item, qty],
        )?;
    }
    Ok(id)
}

/// Drops recipes for the same workbench and output before inserting.
pub fn replace_recipe(conn: &Connection, recipe: &Recipe) -> Result<i64> {
    conn.execute(
        "DELETE FROM recipe_inputs WHERE recipe_id IN
            (SELECT id FROM recipes WHERE workbench=?1 COLLATE NOCASE AND output=?2 COLLATE NOCASE)",
        params![recipe.workbench, recipe.output],
    )?;
    conn.execute(
        "DELETE FROM recipes WHERE workbench=?1 COLLATE NOCASE AND output=?2 COLLATE NOCASE",
        params![recipe.workbench, recipe.output],
    )?;
    insert_recipe(conn, recipe)
}

pub fn load_recipes(conn: &Connection) -> Result<Vec<Recipe>> {
    let mut inputs: HashMap<i64, Vec<(String, i64)>> = HashMap::new();
    let mut stmt =
        conn.prepare("SELECT recipe_id, item, quantity FROM recipe_inputs ORDER BY id")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, i64>(2)?,
        ))
    })?;
    for row in rows {
        let (rid, item, qty) = row?;
        inputs.entry(rid).or_default().push((item, qty));
    }

    let mut stmt = conn.prepare("SELECT id, workbench, output, output_qty FROM recipes ORDER BY id")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, i64>(3)?,
        ))
    })?;
    let mut recipes = Vec::new();
    for row in rows {
        let (id, workbench, output, output_qty) = row?;
        recipes.push(Recipe {
            id,
            workbench,
            output,
            output_qty,
            inputs: inputs.remove(&id).unwrap_or_default(),
        });
    }
    Ok(recipes)
}

pub fn insert_investment(conn: &Connection, inv: &Investment) -> Result<i64> {
    conn.execute(
        "INSERT INTO investments(name, cost, date) VALUES (?1,?2,?3)",
        params![inv.name, inv.cost.to_string(), inv.date.to_string()],
    )
    .with_context(|| format!("Add investment '{}'", inv.name))?;
    Ok(conn.last_insert_rowid())
}

pub fn id_for_investment(conn: &Connection, name: &str) -> Result<i64> {
    let id: Option<i64> = conn
        .query_row(
            "SELECT id FROM investments WHERE name=?1",
            params![name],
            |r| r.get(0),
        )
        .optional()?;
    id.with_context(|| format!("Investment '{}' not found", name))
}

pub fn insert_revenue(conn: &Connection, rev: &Revenue) -> Result<i64> {
    conn.execute(
        "INSERT INTO investment_revenues(investment_id, date, amount, note) VALUES (?1,?2,?3,?4)",
        params![
            rev.investment_id,
            rev.date.to_string(),
            rev.amount.to_string(),
            rev.note
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn load_investments(conn: &Connection) -> Result<Vec<Investment>> {
    let mut stmt = conn.prepare("SELECT id, name, cost, date FROM investments ORDER BY date, id")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, name, cost, date) = row?;
        out.push(Investment {
            id,
            cost: parse_decimal(&cost)
                .with_context(|| format!("Invalid cost '{}' for {}", cost, name))?,
            date: parse_date(&date)?,
            name,
        });
    }
    Ok(out)
}

pub fn load_revenues(conn: &Connection) -> Result<Vec<Revenue>> {
    let mut stmt = conn.prepare(
        "SELECT id, investment_id, date, amount, note FROM investment_revenues ORDER BY date, id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, i64>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, Option<String>>(4)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, investment_id, date, amount, note) = row?;
        out.push(Revenue {
            id,
            investment_id,
            date: parse_date(&date)?,
            amount: parse_decimal(&amount)?,
            note,
        });
    }
    Ok(out)
}

pub fn ensure_map(conn: &Connection, name: &str, abbreviation: &str) -> Result<i64> {
    let existing: Option<i64> = conn
        .query_row(
            "SELECT id FROM maps WHERE name=?1",
            params![name],
            |r| r.get(0),
        )
        .optional()?;
    if let Some(id) = existing {
        return Ok(id);
    }
    conn.execute(
        "INSERT INTO maps(abbreviation, name) VALUES (?1,?2)",
        params![abbreviation.to_uppercase(), name],
    )
    .with_context(|| format!("Add map '{}' ({})", name, abbreviation))?;
    Ok(conn.last_insert_rowid())
}

pub fn ensure_location_type(conn: &Connection, name: &str) -> Result<i64> {
    conn.execute(
        "INSERT OR IGNORE INTO location_types(name) VALUES (?1)",
        params![name],
    )?;
    Ok(conn.query_row(
        "SELECT id FROM location_types WHERE name=?1",
        params![name],
        |r| r.get(0),
    )?)
}

/// Adds or re-links a location by name. Returns true when it was new.
/// `map` is (name, abbreviation); the abbreviation only matters for a new map.
pub fn upsert_location(
    conn: &Connection,
    name: &str,
    map: Option<(&str, &str)>,
    kind: Option<&str>,
) -> Result<bool> {
    let map_id = map
        .map(|(map_name, abbrev)| ensure_map(conn, map_name, abbrev))
        .transpose()?;
    let type_id = kind.map(|k| ensure_location_type(conn, k)).transpose()?;
    let existing: Option<i64> = conn
        .query_row(
            "SELECT id FROM locations WHERE name=?1",
            params![name],
            |r| r.get(0),
        )
        .optional()?;
    match existing {
        Some(id) => {
            conn.execute(
                "UPDATE locations SET map_id=?1, type_id=?2 WHERE id=?3",
                params![map_id, type_id, id],
            )?;
            Ok(false)
        }
        None => {
            conn.execute(
                "INSERT INTO locations(name, map_id, type_id) VALUES (?1,?2,?3)",
                params![name, map_id, type_id],
            )?;
            Ok(true)
        }
    }
}

pub fn delete_location(conn: &Connection, name: &str) -> Result<bool> {
    let n = conn.execute("DELETE FROM locations WHERE name=?1", params![name])?;
    Ok(n > 0)
}

pub fn load_maps(conn: &Connection) -> Result<Vec<GameMap>> {
    let mut stmt = conn.prepare("SELECT id, abbreviation, name FROM maps ORDER BY name")?;
    let rows = stmt.query_map([], |r| {
        Ok(GameMap {
            id: r.get(0)?,
            abbreviation: r.get(1)?,
            name: r.get(2)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn load_location_types(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM location_types ORDER BY name")?;
    let rows = stmt.query_map([], |r| r.get::<_, String>(0))?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn load_locations(conn: &Connection) -> Result<Vec<Location>> {
    let mut stmt = conn.prepare(
        "SELECT l.id, l.name, m.name, m.abbreviation, t.name
         FROM locations l
         LEFT JOIN maps m ON l.map_id = m.id
         LEFT JOIN location_types t ON l.type_id = t.id
         ORDER BY m.name, l.name",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok(Location {
            id: r.get(0)?,
            name: r.get(1)?,
            map: r.get(2)?,
            map_abbreviation: r.get(3)?,
            kind: r.get(4)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn insert_plan(conn: &Connection, plan: &PlannedPurchase) -> Result<i64> {
    conn.execute(
        "INSERT INTO planned_purchases(item, quantity, unit_price, priority, include, notes)
         VALUES (?1,?2,?3,?4,?5,?6)",
        params![
            plan.item,
            plan.quantity,
            plan.unit_price.to_string(),
            plan.priority.as_str(),
            plan.include,
            plan.notes
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn load_plans(conn: &Connection) -> Result<Vec<PlannedPurchase>> {
    let mut stmt = conn.prepare(
        "SELECT id, item, quantity, unit_price, priority, include, notes
         FROM planned_purchases ORDER BY id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, i64>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, bool>(5)?,
            r.get::<_, Option<String>>(6)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, item, quantity, price, priority, include, notes) = row?;
        out.push(PlannedPurchase {
            id,
            unit_price: parse_decimal(&price)
                .with_context(|| format!("Invalid planned price '{}' for {}", price, item))?,
            priority: priority.parse()?,
            item,
            quantity,
            include,
            notes,
        });
    }
    Ok(out)
}

pub fn set_plan_included(conn: &Connection, id: i64, include: bool) -> Result<bool> {
    let n = conn.execute(
        "UPDATE planned_purchases SET include=?1 WHERE id=?2",
        params![include, id],
    )?;
    Ok(n > 0)
}

pub fn delete_plan(conn: &Connection, id: i64) -> Result<bool> {
    let n = conn.execute("DELETE FROM planned_purchases WHERE id=?1", params![id])?;
    Ok(n > 0)
}

pub fn upsert_vehicle(conn: &Connection, v: &Vehicle) -> Result<()> {
    conn.execute(
        "INSERT INTO vehicles(name, category, capacity_yd3, fuel_use_lph) VALUES (?1,?2,?3,?4)
         ON CONFLICT(name) DO UPDATE SET
            category=excluded.category,
            capacity_yd3=excluded.capacity_yd3,
            fuel_use_lph=excluded.fuel_use_lph",
        params![
            v.name,
            v.category,
            v.capacity_yd3.to_string(),
            v.fuel_use_lph.to_string()
        ],
    )?;
    Ok(())
}

pub fn load_vehicles(conn: &Connection) -> Result<Vec<Vehicle>> {
    let mut stmt =
        conn.prepare("SELECT name, category, capacity_yd3, fuel_use_lph FROM vehicles ORDER BY name")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (name, category, capacity, fuel) = row?;
        out.push(Vehicle {
            capacity_yd3: parse_decimal(&capacity)
                .with_context(|| format!("Invalid capacity '{}' for {}", capacity, name))?,
            fuel_use_lph: parse_decimal(&fuel)
                .with_context(|| format!("Invalid fuel use '{}' for {}", fuel, name))?,
            name,
            category,
        });
    }
    Ok(out)
}

pub fn find_vehicle(conn: &Connection, name: &str) -> Result<Vehicle> {
    load_vehicles(conn)?
        .into_iter()
        .find(|v| v.name.eq_ignore_ascii_case(name.trim()))
        .with_context(|| format!("Vehicle '{}' not found (import vehicles first)", name))
}

pub fn insert_haul(conn: &Connection, h: &HaulSession) -> Result<i64> {
    conn.execute(
        "INSERT INTO haul_sessions(date, location, vehicle, loads, volume_yd3, stockpile,
                                   hours, fuel_used_l, fuel_cost, notes)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10)",
        params![
            h.date.to_string(),
            h.location,
            h.vehicle,
            h.loads,
            h.volume_yd3.to_string(),
            h.stockpile,
            h.hours.to_string(),
            h.fuel_used_l.to_string(),
            h.fuel_cost.to_string(),
            h.notes
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn load_hauls(conn: &Connection) -> Result<Vec<HaulSession>> {
    let mut stmt = conn.prepare(
        "SELECT id, date, location, vehicle, loads, volume_yd3, stockpile, hours,
                fuel_used_l, fuel_cost, notes
         FROM haul_sessions ORDER BY date, id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            (
                r.get::<_, i64>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, String>(2)?,
                r.get::<_, String>(3)?,
                r.get::<_, i64>(4)?,
                r.get::<_, String>(5)?,
            ),
            (
                r.get::<_, Option<String>>(6)?,
                r.get::<_, String>(7)?,
                r.get::<_, String>(8)?,
                r.get::<_, String>(9)?,
                r.get::<_, Option<String>>(10)?,
            ),
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let ((id, date, location, vehicle, loads, volume), (stockpile, hours, fuel, cost, notes)) =
            row?;
        out.push(HaulSession {
            id,
            date: parse_date(&date)?,
            location,
            vehicle,
            loads,
            volume_yd3: parse_decimal(&volume)?,
            stockpile,
            hours: parse_decimal(&hours)?,
            fuel_used_l: parse_decimal(&fuel)?,
            fuel_cost: parse_decimal(&cost)?,
            notes,
        });
    }
    Ok(out)
}

pub fn insert_process(conn: &Connection, p: &ProcessSession) -> Result<i64> {
    conn.execute(
        "INSERT INTO process_sessions(date, processor, material, input_volume_yd3,
                                      processing_cost, notes)
         VALUES (?1,?2,?3,?4,?5,?6)",
        params![
            p.date.to_string(),
            p.processor,
            p.material,
            p.input_volume_yd3.to_string(),
            p.processing_cost.to_string(),
            p.notes
        ],
    )?;
    let id = conn.last_insert_rowid();
    for ore in &p.ores {
        conn.execute(
            "INSERT INTO process_ores(session_id, ore, quantity, unit_price) VALUES (?1,?2,?3,?4)",
            params![id, ore.ore, ore.quantity, ore.unit_price.to_string()],
        )?;
    }
    Ok(id)
}

pub fn load_process_sessions(conn: &Connection) -> Result<Vec<ProcessSession>> {
    let mut ores: HashMap<i64, Vec<OreYield>> = HashMap::new();
    let mut stmt =
        conn.prepare("SELECT session_id, ore, quantity, unit_price FROM process_ores ORDER BY id")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, i64>(2)?,
            r.get::<_, String>(3)?,
        ))
    })?;
    for row in rows {
        let (sid, ore, quantity, price) = row?;
        ores.entry(sid).or_default().push(OreYield {
            ore,
            quantity,
            unit_price: parse_decimal(&price)?,
        });
    }

    let mut stmt = conn.prepare(
        "SELECT id, date, processor, material, input_volume_yd3, processing_cost, notes
         FROM process_sessions ORDER BY date, id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, String>(5)?,
            r.get::<_, Option<String>>(6)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, date, processor, material, volume, cost, notes) = row?;
        out.push(ProcessSession {
            id,
            date: parse_date(&date)?,
            processor,
            material,
            input_volume_yd3: parse_decimal(&volume)?,
            ores: ores.remove(&id).unwrap_or_default(),
            processing_cost: parse_decimal(&cost)?,
            notes,
        });
    }
    Ok(out)
}

pub fn delete_haul(conn: &Connection, id: i64) -> Result<bool> {
    let n = conn.execute("DELETE FROM haul_sessions WHERE id=?1", params![id])?;
    Ok(n > 0)
}

pub fn delete_process(conn: &Connection, id: i64) -> Result<bool> {
    conn.execute("DELETE FROM process_ores WHERE session_id=?1", params![id])?;
    let n = conn.execute("DELETE FROM process_sessions WHERE id=?1", params![id])?;
    Ok(n > 0)
}
