// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Transaction;
use crate::settings::GameSettings;
use crate::store::load_transactions;
use crate::utils::arg;
use anyhow::{Context, Result, bail};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::Path;

/// One ledger line in the exchange layout shared by CSV and JSON.
#[derive(Debug, Serialize)]
pub struct LedgerRecord {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Item")]
    pub item: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Qty")]
    pub quantity: i64,
    #[serde(rename = "Unit Price")]
    pub unit_price: Decimal,
    #[serde(rename = "Account")]
    pub account: String,
    #[serde(rename = "Total")]
    pub total: Decimal,
    #[serde(rename = "Personal Amount")]
    pub personal_amount: Decimal,
    #[serde(rename = "Company Amount")]
    pub company_amount: Decimal,
}

impl From<&Transaction> for LedgerRecord {
    fn from(t: &Transaction) -> Self {
        LedgerRecord {
            date: t.date.to_string(),
            kind: t.kind.to_string(),
            item: t.item.clone(),
            category: t.category.clone(),
            quantity: t.quantity,
            unit_price: t.unit_price,
            account: t.account.to_string(),
            total: t.total,
            personal_amount: t.personal_amount,
            company_amount: t.company_amount,
        }
    }
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("ledger", sub)) => {
            let fmt = arg(sub, "format")?.to_lowercase();
            let out = arg(sub, "out")?;
            let n = export_ledger(conn, &fmt, Path::new(out))?;
            println!("Exported {} ledger rows to {}", n, out);
            Ok(())
        }
        _ => Ok(()),
    }
}

/// The opening balances lead the export as an Opening row so a re-import restores them.
pub fn ledger_records(conn: &Connection) -> Result<Vec<LedgerRecord>> {
    let settings = GameSettings::load(conn)?;
    let opening = settings.opening;
    let mut records = vec![LedgerRecord {
        date: settings.game_start_date.to_string(),
        kind: "Opening".into(),
        item: "Opening Balance".into(),
        category: String::new(),
        quantity: 1,
        unit_price: opening.total(),
        account: "Personal".into(),
        total: opening.total(),
        personal_amount: opening.personal,
        company_amount: opening.company,
    }];
    records.extend(load_transactions(conn)?.iter().map(LedgerRecord::from));
    Ok(records)
}

pub fn export_ledger(conn: &Connection, fmt: &str, out: &Path) -> Result<usize> {
    if !matches!(fmt, "csv" | "json") {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }
    let records = ledger_records(conn)?;
    match fmt {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)
                .with_context(|| format!("Create {}", out.display()))?;
            for rec in &records {
                wtr.serialize(rec)?;
            }
            wtr.flush()?;
        }
        _ => {
            std::fs::write(out, serde_json::to_string_pretty(&records)?)
                .with_context(|| format!("Write {}", out.display()))?;
        }
    }
    tracing::info!(rows = records.len(), path = %out.display(), "ledger exported");
    Ok(records.len())
}
