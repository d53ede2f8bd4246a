// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::inventory::stock;
use crate::locations::find;
use crate::models::TransactionKind;
use crate::pricing::{self, price_line};
use crate::settings::GameSettings;
use crate::store::{load_catalog, load_hauls, load_locations, load_recipes, load_transactions};
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

pub fn diagnose(conn: &Connection) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();

    let settings = GameSettings::load(conn)?;
    if let Err(err) = settings.validate() {
        rows.push(vec!["invalid_skill_level".into(), err.to_string()]);
    }

    let catalog = load_catalog(conn)?;
    let transactions = load_transactions(conn)?;
    for t in &transactions {
        match t.kind {
            TransactionKind::Transfer => {
                if !(t.personal_amount + t.company_amount).is_zero() {
                    rows.push(vec![
                        "transfer_unbalanced".into(),
                        format!("#{} moves {} / {}", t.id, t.personal_amount, t.company_amount),
                    ]);
                }
            }
            TransactionKind::Opening => {
                rows.push(vec!["opening_in_ledger".into(), format!("#{}", t.id)]);
            }
            kind => {
                if catalog.get(&t.item).is_none() {
                    rows.push(vec![
                        "item_not_in_catalog".into(),
                        format!("#{} {}", t.id, t.item),
                    ]);
                }
                match price_line(kind, &t.category, t.account, t.quantity, t.unit_price) {
                    Ok(line) => {
                        if line.total != t.total
                            || line.personal_amount != t.personal_amount
                            || line.company_amount != t.company_amount
                        {
                            rows.push(vec![
                                "stored_total_mismatch".into(),
                                format!("#{} stored {} recomputed {}", t.id, t.total, line.total),
                            ]);
                        }
                    }
                    Err(err) => {
                        rows.push(vec!["unpriceable".into(), format!("#{}: {}", t.id, err)]);
                    }
                }
            }
        }
    }

    for line in stock(&transactions, &catalog) {
        if line.quantity < 0 {
            rows.push(vec![
                "negative_stock".into(),
                format!("{} ({})", line.item, line.quantity),
            ]);
        }
    }

    for recipe in load_recipes(conn)? {
        let names = std::iter::once(&recipe.output).chain(recipe.inputs.iter().map(|(n, _)| n));
        for name in names {
            if catalog.get(name).is_none() {
                rows.push(vec![
                    "recipe_item_not_in_catalog".into(),
                    format!("{} ({})", name, recipe.workbench),
                ]);
            }
        }
    }

    let locations = load_locations(conn)?;
    if !locations.is_empty() {
        let mut places: Vec<(String, String)> = transactions
            .iter()
            .filter_map(|t| t.location.clone().map(|l| (format!("#{}", t.id), l)))
            .collect();
        places.extend(
            load_hauls(conn)?
                .into_iter()
                .map(|h| (format!("haul #{}", h.id), h.location)),
        );
        for (owner, place) in places {
            if find(&locations, &place).is_none() {
                rows.push(vec!["unknown_location".into(), format!("{} {}", owner, place)]);
            }
        }
    }

    // Ore/fluid sales must keep the personal share.
    for t in transactions
        .iter()
        .filter(|t| t.kind == TransactionKind::Sale && pricing::is_split_category(&t.category))
    {
        if t.personal_amount + t.company_amount != t.total {
            rows.push(vec!["split_does_not_sum".into(), format!("#{}", t.id)]);
        }
    }

    Ok(rows)
}

pub fn handle(conn: &Connection) -> Result<()> {
    let rows = diagnose(conn)?;
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
