// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::catalog::Catalog;
use crate::models::{Transaction, TransactionKind};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

pub const STOCK_LOW: i64 = 10;
pub const STOCK_GOOD: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StockStatus {
    Empty,
    Low,
    Good,
    High,
}

impl StockStatus {
    pub fn for_quantity(quantity: i64) -> Self {
        if quantity <= 0 {
            StockStatus::Empty
        } else if quantity <= STOCK_LOW {
            StockStatus::Low
        } else if quantity <= STOCK_GOOD {
            StockStatus::Good
        } else {
            StockStatus::High
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StockStatus::Empty => "Empty",
            StockStatus::Low => "Low",
            StockStatus::Good => "Good",
            StockStatus::High => "High",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockLine {
    pub item: String,
    pub category: String,
    pub quantity: i64,
    pub unit_value: Decimal,
    pub value: Decimal,
    pub status: StockStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InventorySummary {
    pub items: usize,
    pub in_stock: usize,
    pub low_stock: usize,
    pub total_value: Decimal,
}

/// Net holdings per (item, category): purchases add, sales remove.
/// Fuel is consumed on purchase and never stocked.
pub fn stock(transactions: &[Transaction], catalog: &Catalog) -> Vec<StockLine> {
    let mut qty: BTreeMap<(String, String), (String, String, i64)> = BTreeMap::new();
    for txn in transactions {
        let delta = match txn.kind {
            TransactionKind::Purchase => txn.quantity,
            TransactionKind::Sale => -txn.quantity,
            _ => continue,
        };
        let key = (txn.item.to_lowercase(), txn.category.to_lowercase());
        let entry = qty
            .entry(key)
            .or_insert_with(|| (txn.item.clone(), txn.category.clone(), 0));
        entry.2 += delta;
    }

    qty.into_values()
        .map(|(item, category, quantity)| {
            let unit_value = catalog.sell_price(&item);
            StockLine {
                value: unit_value * Decimal::from(quantity.max(0)),
                status: StockStatus::for_quantity(quantity),
                item,
                category,
                quantity,
                unit_value,
            }
        })
        .collect()
}

pub fn summarize(lines: &[StockLine]) -> InventorySummary {
    let mut summary = InventorySummary {
        items: lines.len(),
        ..Default::default()
    };
    for line in lines {
        if line.quantity > 0 {
            summary.in_stock += 1;
        }
        if line.status == StockStatus::Low {
            summary.low_stock += 1;
        }
        summary.total_value += line.value;
    }
    summary
}
