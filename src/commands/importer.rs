// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::catalog::Catalog;
use crate::error::{ImportError, PricingError};
use crate::locations::map_abbreviation;
use crate::models::{Account, Item, Recipe, Transaction, TransactionKind, Vehicle};
use crate::pricing;
use crate::settings::GameSettings;
use crate::store::{
    insert_transaction, load_catalog, load_ledger, replace_recipe, upsert_item, upsert_location,
    upsert_vehicle,
};
use crate::utils::{parse_currency, parse_date, parse_flag, pretty_table};
use anyhow::{Context, Result, anyhow, bail};
use csv::{ReaderBuilder, StringRecord};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::path::Path;

/// Supplied totals may differ from the recomputed ones by this much before we warn.
const TOTAL_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

#[derive(Debug, Default)]
pub struct ImportReport {
    pub imported: usize,
    pub errors: Vec<ImportError>,
    pub warnings: Vec<String>,
}

impl ImportReport {
    fn reject(&mut self, line: u64, err: anyhow::Error) {
        tracing::debug!(line, error = %err, "row rejected");
        self.errors.push(ImportError {
            line,
            message: format!("{:#}", err),
        });
    }
}

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    let (what, sub) = match m.subcommand() {
        Some(pair) => pair,
        None => return Ok(()),
    };
    let path = sub
        .get_one::<String>("path")
        .map(|s| s.trim())
        .ok_or_else(|| anyhow!("Missing --path"))?;
    let report = match what {
        "items" => import_items(conn, Path::new(path))?,
        "ledger" => import_ledger(conn, Path::new(path))?,
        "recipes" => import_recipes(conn, Path::new(path))?,
        "locations" => import_locations(conn, Path::new(path))?,
        "vehicles" => import_vehicles(conn, Path::new(path))?,
        _ => return Ok(()),
    };
    print_report(path, &report);
    Ok(())
}

fn print_report(path: &str, report: &ImportReport) {
    println!("Imported {} rows from {}", report.imported, path);
    for w in &report.warnings {
        println!("warning: {}", w);
    }
    if !report.errors.is_empty() {
        let rows = report
            .errors
            .iter()
            .map(|e| vec![e.line.to_string(), e.message.clone()])
            .collect();
        println!("{}", pretty_table(&["Line", "Problem"], rows));
    }
}

/// Header lookup by case-insensitive column name.
struct Columns(HashMap<String, usize>);

impl Columns {
    fn new(headers: &StringRecord, required: &[&str]) -> Result<Self> {
        let map: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim().to_lowercase(), i))
            .collect();
        let missing: Vec<&str> = required
            .iter()
            .copied()
            .filter(|c| !map.contains_key(&c.to_lowercase()))
            .collect();
        if !missing.is_empty() {
            bail!("Missing column(s): {}", missing.join(", "));
        }
        Ok(Columns(map))
    }

    fn get<'r>(&self, rec: &'r StringRecord, name: &str) -> &'r str {
        self.0
            .get(&name.to_lowercase())
            .and_then(|&i| rec.get(i))
            .map(|s| s.trim())
            .unwrap_or("")
    }

    fn required<'r>(&self, rec: &'r StringRecord, name: &str) -> Result<&'r str> {
        let v = self.get(rec, name);
        if v.is_empty() {
            bail!("{} is blank", name);
        }
        Ok(v)
    }
}

fn open(path: &Path) -> Result<csv::Reader<std::fs::File>> {
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path.display()))
}

fn line_of(rec: &StringRecord, idx: usize) -> u64 {
    rec.position().map(|p| p.line()).unwrap_or(idx as u64 + 2)
}

fn whole_price(value: Decimal, column: &str) -> Result<i64> {
    if value.is_sign_negative() && !value.is_zero() {
        bail!("{} cannot be negative, got {}", column, value);
    }
    if !value.fract().is_zero() {
        bail!("{} must be a whole number, got {}", column, value);
    }
    i64::try_from(value).with_context(|| format!("{} out of range: {}", column, value))
}

fn item_row(cols: &Columns, rec: &StringRecord) -> Result<Item> {
    let name = cols.required(rec, "Item Name")?.to_string();
    let buy = parse_currency(cols.get(rec, "Buy Price"))?.unwrap_or_default();
    let sell = parse_currency(cols.get(rec, "Sell Price"))?.unwrap_or_default();
    if sell.is_sign_negative() && !sell.is_zero() {
        bail!("Sell Price cannot be negative, got {}", sell);
    }
    Ok(Item {
        category: cols.get(rec, "Category").to_string(),
        buy_price: whole_price(buy, "Buy Price")?,
        sell_price: sell,
        can_buy: parse_flag(cols.get(rec, "Can Purchase?"))?,
        can_sell: parse_flag(cols.get(rec, "Can Sell?"))?,
        name,
    })
}

/// Upserts reference items by name.
pub fn import_items(conn: &mut Connection, path: &Path) -> Result<ImportReport> {
    let mut rdr = open(path)?;
    let cols = Columns::new(rdr.headers()?, &["Item Name", "Buy Price", "Sell Price"])?;
    let tx = conn.transaction()?;
    let mut report = ImportReport::default();
    for (idx, result) in rdr.records().enumerate() {
        let rec = match result {
            Ok(r) => r,
            Err(err) => {
                report.reject(idx as u64 + 2, err.into());
                continue;
            }
        };
        let line = line_of(&rec, idx);
        match item_row(&cols, &rec).and_then(|item| upsert_item(&tx, &item)) {
            Ok(()) => report.imported += 1,
            Err(err) => report.reject(line, err),
        }
    }
    tx.commit()?;
    tracing::info!(imported = report.imported, rejected = report.errors.len(), "items imported");
    Ok(report)
}

enum LedgerRow {
    Entry(Transaction, Option<Decimal>),
    Opening(Decimal, Decimal),
}

fn ledger_row(cols: &Columns, rec: &StringRecord, catalog: &Catalog) -> Result<LedgerRow> {
    let kind: TransactionKind = cols.required(rec, "Type")?.parse()?;
    if kind == TransactionKind::Opening {
        let personal = parse_currency(cols.get(rec, "Personal Amount"))?.unwrap_or_default();
        let company = parse_currency(cols.get(rec, "Company Amount"))?.unwrap_or_default();
        return Ok(LedgerRow::Opening(personal, company));
    }

    let date = parse_date(cols.required(rec, "Date")?)?;
    let account: Account = cols.required(rec, "Account")?.parse()?;
    let quantity = match cols.get(rec, "Qty") {
        "" => 1,
        q => q
            .replace(',', "")
            .parse::<i64>()
            .with_context(|| format!("Invalid quantity '{}'", q))?,
    };
    let unit_price = parse_currency(cols.required(rec, "Unit Price")?)?
        .ok_or_else(|| anyhow!("Unit Price is blank"))?;
    let supplied_total = parse_currency(cols.get(rec, "Total"))?;
    let notes = Some(cols.get(rec, "Notes").to_string()).filter(|s| !s.is_empty());
    let location = Some(cols.get(rec, "Location").to_string()).filter(|s| !s.is_empty());

    let txn = if kind == TransactionKind::Transfer {
        let amount = unit_price
            .checked_mul(Decimal::from(quantity.max(1)))
            .ok_or(PricingError::Overflow {
                unit_price,
                quantity,
            })?;
        let (personal_amount, company_amount) = pricing::transfer(amount, account.other(), account)?;
        Transaction {
            id: 0,
            date,
            kind,
            item: match cols.get(rec, "Item") {
                "" => format!("Transfer to {}", account),
                s => s.to_string(),
            },
            category: "Transfer".into(),
            quantity: 1,
            unit_price: amount,
            account,
            total: amount,
            personal_amount,
            company_amount,
            location,
            notes,
        }
    } else {
        let item = cols.required(rec, "Item")?.to_string();
        let category = match cols.get(rec, "Category") {
            "" => catalog
                .get(&item)
                .map(|i| i.category.clone())
                .unwrap_or_default(),
            c => c.to_string(),
        };
        let line = pricing::price_line(kind, &category, account, quantity, unit_price)?;
        Transaction {
            id: 0,
            date,
            kind,
            item,
            category,
            quantity,
            unit_price,
            account,
            total: line.total,
            personal_amount: line.personal_amount,
            company_amount: line.company_amount,
            location,
            notes,
        }
    };
    Ok(LedgerRow::Entry(txn, supplied_total))
}

/// Appends ledger rows. Computed columns are always recomputed; an Opening
/// row replaces the opening balances. Imported rows do not enter the undo history.
pub fn import_ledger(conn: &mut Connection, path: &Path) -> Result<ImportReport> {
    let mut rdr = open(path)?;
    let cols = Columns::new(
        rdr.headers()?,
        &["Date", "Type", "Item", "Qty", "Unit Price", "Account"],
    )?;
    let mut settings = GameSettings::load(conn)?;
    let catalog = load_catalog(conn)?;
    let mut next_id = load_ledger(conn, &settings)?.next_id();

    let tx = conn.transaction()?;
    let mut report = ImportReport::default();
    let mut opening_changed = false;
    for (idx, result) in rdr.records().enumerate() {
        let rec = match result {
            Ok(r) => r,
            Err(err) => {
                report.reject(idx as u64 + 2, err.into());
                continue;
            }
        };
        let line = line_of(&rec, idx);
        match ledger_row(&cols, &rec, &catalog) {
            Ok(LedgerRow::Opening(personal, company)) => {
                settings.opening.personal = personal;
                settings.opening.company = company;
                opening_changed = true;
                report.imported += 1;
            }
            Ok(LedgerRow::Entry(mut txn, supplied)) => {
                txn.id = next_id;
                if let Some(total) = supplied {
                    if (total.abs() - txn.total).abs() > TOTAL_TOLERANCE {
                        tracing::warn!(line, supplied = %total, computed = %txn.total, "total mismatch");
                        report.warnings.push(format!(
                            "line {}: Total {} recomputed as {}",
                            line, total, txn.total
                        ));
                    }
                }
                match insert_transaction(&tx, &txn) {
                    Ok(()) => {
                        next_id += 1;
                        report.imported += 1;
                    }
                    Err(err) => report.reject(line, err),
                }
            }
            Err(err) => report.reject(line, err),
        }
    }
    if opening_changed {
        settings.save(&tx)?;
    }
    tx.commit()?;
    tracing::info!(imported = report.imported, rejected = report.errors.len(), "ledger imported");
    Ok(report)
}

/// `Name:qty;Name:qty`. A bare name means one unit.
pub fn parse_inputs(s: &str) -> Result<Vec<(String, i64)>> {
    let mut out = Vec::new();
    for part in s.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        let (name, qty) = match part.rsplit_once(':') {
            Some((n, q)) => (
                n.trim(),
                q.trim()
                    .parse::<i64>()
                    .with_context(|| format!("Invalid input quantity in '{}'", part))?,
            ),
            None => (part, 1),
        };
        if name.is_empty() {
            bail!("Input '{}' has no item name", part);
        }
        if qty < 1 {
            bail!("Input quantity for '{}' must be at least 1", name);
        }
        out.push((name.to_string(), qty));
    }
    if out.is_empty() {
        bail!("Recipe has no inputs");
    }
    Ok(out)
}

fn recipe_row(cols: &Columns, rec: &StringRecord) -> Result<Recipe> {
    let output_qty = match cols.get(rec, "Output Qty") {
        "" => 1,
        q => q
            .parse::<i64>()
            .with_context(|| format!("Invalid output quantity '{}'", q))?,
    };
    if output_qty < 1 {
        bail!("Output Qty must be at least 1, got {}", output_qty);
    }
    Ok(Recipe {
        id: 0,
        workbench: cols.required(rec, "Workbench")?.to_string(),
        output: cols.required(rec, "Output")?.to_string(),
        output_qty,
        inputs: parse_inputs(cols.get(rec, "Inputs"))?,
    })
}

/// Recipes replace any existing recipe with the same workbench and output.
pub fn import_recipes(conn: &mut Connection, path: &Path) -> Result<ImportReport> {
    let mut rdr = open(path)?;
    let cols = Columns::new(rdr.headers()?, &["Workbench", "Output", "Inputs"])?;
    let tx = conn.transaction()?;
    let mut report = ImportReport::default();
    for (idx, result) in rdr.records().enumerate() {
        let rec = match result {
            Ok(r) => r,
            Err(err) => {
                report.reject(idx as u64 + 2, err.into());
                continue;
            }
        };
        let line = line_of(&rec, idx);
        match recipe_row(&cols, &rec).and_then(|r| replace_recipe(&tx, &r)) {
            Ok(_) => report.imported += 1,
            Err(err) => report.reject(line, err),
        }
    }
    tx.commit()?;
    tracing::info!(imported = report.imported, rejected = report.errors.len(), "recipes imported");
    Ok(report)
}

/// Upserts locations by name, creating their maps and types on the way.
/// A new map takes its abbreviation from the first `ABC - Place` location
/// listed on it, else from the first three letters of its name.
pub fn import_locations(conn: &mut Connection, path: &Path) -> Result<ImportReport> {
    let mut rdr = open(path)?;
    let cols = Columns::new(rdr.headers()?, &["Location", "Map"])?;
    let mut report = ImportReport::default();
    let mut rows = Vec::new();
    let mut abbreviations: HashMap<String, String> = HashMap::new();
    for (idx, result) in rdr.records().enumerate() {
        let rec = match result {
            Ok(r) => r,
            Err(err) => {
                report.reject(idx as u64 + 2, err.into());
                continue;
            }
        };
        let line = line_of(&rec, idx);
        let name = match cols.required(&rec, "Location") {
            Ok(n) => n.to_string(),
            Err(err) => {
                report.reject(line, err);
                continue;
            }
        };
        let map = cols.get(&rec, "Map").to_string();
        if !map.is_empty() && name.contains(" - ") {
            abbreviations
                .entry(map.to_lowercase())
                .or_insert_with(|| map_abbreviation(&name, &map));
        }
        rows.push((line, name, map, cols.get(&rec, "Type").to_string()));
    }

    let tx = conn.transaction()?;
    let mut added = 0usize;
    for (line, name, map, kind) in rows {
        let abbrev = abbreviations
            .get(&map.to_lowercase())
            .cloned()
            .unwrap_or_else(|| map_abbreviation(&name, &map));
        let map_ref = Some(map.as_str())
            .filter(|m| !m.is_empty())
            .map(|m| (m, abbrev.as_str()));
        let kind_ref = Some(kind.as_str()).filter(|k| !k.is_empty());
        match upsert_location(&tx, &name, map_ref, kind_ref) {
            Ok(is_new) => {
                report.imported += 1;
                added += usize::from(is_new);
            }
            Err(err) => report.reject(line, err),
        }
    }
    tx.commit()?;
    report.errors.sort_by_key(|e| e.line);
    tracing::info!(
        imported = report.imported,
        added,
        rejected = report.errors.len(),
        "locations imported"
    );
    Ok(report)
}

fn vehicle_row(cols: &Columns, rec: &StringRecord) -> Result<Vehicle> {
    let name = cols.required(rec, "Name")?.to_string();
    let capacity_yd3 = parse_currency(cols.required(rec, "Capacity yd3")?)?.unwrap_or_default();
    if capacity_yd3 <= Decimal::ZERO {
        bail!("Capacity yd3 must be positive, got {}", capacity_yd3);
    }
    let fuel_use_lph = parse_currency(cols.get(rec, "Fuel L/h"))?.unwrap_or_default();
    if fuel_use_lph.is_sign_negative() && !fuel_use_lph.is_zero() {
        bail!("Fuel L/h cannot be negative, got {}", fuel_use_lph);
    }
    Ok(Vehicle {
        name,
        category: cols.get(rec, "Category").to_string(),
        capacity_yd3,
        fuel_use_lph,
    })
}

/// Vehicle specs used by hauling sessions, upserted by name.
pub fn import_vehicles(conn: &mut Connection, path: &Path) -> Result<ImportReport> {
    let mut rdr = open(path)?;
    let cols = Columns::new(rdr.headers()?, &["Name", "Capacity yd3", "Fuel L/h"])?;
    let tx = conn.transaction()?;
    let mut report = ImportReport::default();
    for (idx, result) in rdr.records().enumerate() {
        let rec = match result {
            Ok(r) => r,
            Err(err) => {
                report.reject(idx as u64 + 2, err.into());
                continue;
            }
        };
        let line = line_of(&rec, idx);
        match vehicle_row(&cols, &rec).and_then(|v| upsert_vehicle(&tx, &v)) {
            Ok(()) => report.imported += 1,
            Err(err) => report.reject(line, err),
        }
    }
    tx.commit()?;
    tracing::info!(imported = report.imported, rejected = report.errors.len(), "vehicles imported");
    Ok(report)
}
