// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! In-memory ledger: chronological balance replay plus a bounded undo/redo
//! history of reversible changes.

use crate::models::{Balances, Transaction, TransactionKind};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

pub const DEFAULT_UNDO_DEPTH: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunningBalance {
    pub id: i64,
    pub date: NaiveDate,
    pub personal: Decimal,
    pub company: Decimal,
}

/// Running balances after each transaction, ordered by (date, id).
/// Opening rows carry no amounts and produce no entry.
pub fn replay(opening: Balances, transactions: &[Transaction]) -> Vec<RunningBalance> {
    let mut ordered: Vec<&Transaction> = transactions.iter().collect();
    ordered.sort_by_key(|t| (t.date, t.id));

    let mut personal = opening.personal;
    let mut company = opening.company;
    ordered
        .into_iter()
        .filter(|t| t.kind != TransactionKind::Opening)
        .map(|t| {
            personal += t.personal_amount;
            company += t.company_amount;
            RunningBalance {
                id: t.id,
                date: t.date,
                personal,
                company,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Change {
    Added(Transaction),
    Removed(Transaction),
}

impl Change {
    pub fn inverse(&self) -> Change {
        match self {
            Change::Added(t) => Change::Removed(t.clone()),
            Change::Removed(t) => Change::Added(t.clone()),
        }
    }

    pub fn transaction(&self) -> &Transaction {
        match self {
            Change::Added(t) | Change::Removed(t) => t,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct History {
    undo: VecDeque<Change>,
    redo: Vec<Change>,
    depth: usize,
}

impl Default for History {
    fn default() -> Self {
        History::new(DEFAULT_UNDO_DEPTH)
    }
}

impl History {
    pub fn new(depth: usize) -> Self {
        History {
            undo: VecDeque::new(),
            redo: Vec::new(),
            depth: depth.max(1),
        }
    }

    pub fn set_depth(&mut self, depth: usize) {
        self.depth = depth.max(1);
        self.trim();
    }

    /// A fresh user action invalidates anything that could be redone.
    pub fn record(&mut self, change: Change) {
        self.redo.clear();
        self.push_undo(change);
    }

    fn push_undo(&mut self, change: Change) {
        self.undo.push_back(change);
        self.trim();
    }

    fn trim(&mut self) {
        while self.undo.len() > self.depth {
            self.undo.pop_front();
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Totals {
    pub personal_income: Decimal,
    pub personal_expense: Decimal,
    pub personal_net: Decimal,
    pub company_income: Decimal,
    pub company_expense: Decimal,
    pub company_net: Decimal,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub total_net: Decimal,
    pub transaction_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthFlow {
    pub month: String,
    pub income: Decimal,
    pub expense: Decimal,
}

#[derive(Debug, Clone, Default)]
pub struct Ledger {
    entries: Vec<Transaction>,
    history: History,
}

impl Ledger {
    pub fn new(undo_depth: usize) -> Self {
        Ledger {
            entries: Vec::new(),
            history: History::new(undo_depth),
        }
    }

    pub fn from_parts(mut entries: Vec<Transaction>, history: History) -> Self {
        entries.sort_by_key(|t| (t.date, t.id));
        Ledger { entries, history }
    }

    pub fn entries(&self) -> &[Transaction] {
        &self.entries
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn get(&self, id: i64) -> Option<&Transaction> {
        self.entries.iter().find(|t| t.id == id)
    }

    /// Never reuses an id still referenced by the undo or redo stack.
    pub fn next_id(&self) -> i64 {
        let h = &self.history;
        self.entries
            .iter()
            .chain(h.undo.iter().map(Change::transaction))
            .chain(h.redo.iter().map(Change::transaction))
            .map(|t| t.id)
            .max()
            .unwrap_or(0)
            + 1
    }

    /// Appends a transaction, assigning the next id when it has none.
    pub fn add(&mut self, mut txn: Transaction) -> Change {
        if txn.id <= 0 {
            txn.id = self.next_id();
        }
        let change = Change::Added(txn);
        self.apply(&change);
        self.history.record(change.clone());
        change
    }

    pub fn delete(&mut self, id: i64) -> Option<Change> {
        let txn = self.get(id)?.clone();
        let change = Change::Removed(txn);
        self.apply(&change);
        self.history.record(change.clone());
        Some(change)
    }

    /// Reverts the latest change and returns what was applied to the entries.
    pub fn undo(&mut self) -> Option<Change> {
        let change = self.history.undo.pop_back()?;
        let inverse = change.inverse();
        self.apply(&inverse);
        self.history.redo.push(change);
        Some(inverse)
    }

    pub fn redo(&mut self) -> Option<Change> {
        let change = self.history.redo.pop()?;
        self.apply(&change);
        self.history.push_undo(change.clone());
        Some(change)
    }

    fn apply(&mut self, change: &Change) {
        match change {
            Change::Added(t) => {
                let key = (t.date, t.id);
                let pos = self.entries.partition_point(|e| (e.date, e.id) <= key);
                self.entries.insert(pos, t.clone());
            }
            Change::Removed(t) => self.entries.retain(|e| e.id != t.id),
        }
    }

    pub fn balances(&self, opening: Balances) -> Vec<RunningBalance> {
        replay(opening, &self.entries)
    }

    pub fn current_balances(&self, opening: Balances) -> Balances {
        self.balances(opening)
            .last()
            .map(|b| Balances::new(b.personal, b.company))
            .unwrap_or(opening)
    }

    pub fn totals(&self) -> Totals {
        let mut t = Totals::default();
        for txn in &self.entries {
            match txn.kind {
                TransactionKind::Sale => {
                    t.personal_income += txn.personal_amount;
                    t.company_income += txn.company_amount;
                }
                TransactionKind::Purchase | TransactionKind::Fuel => {
                    t.personal_expense -= txn.personal_amount;
                    t.company_expense -= txn.company_amount;
                }
                TransactionKind::Transfer | TransactionKind::Opening => {}
            }
        }
        t.personal_net = t.personal_income - t.personal_expense;
        t.company_net = t.company_income - t.company_expense;
        t.total_income = t.personal_income + t.company_income;
        t.total_expense = t.personal_expense + t.company_expense;
        t.total_net = t.total_income - t.total_expense;
        t.transaction_count = self.entries.len();
        t
    }

    pub fn category_totals(&self) -> Vec<CategoryTotal> {
        let mut map: BTreeMap<String, (Decimal, Decimal, usize)> = BTreeMap::new();
        for txn in &self.entries {
            let cat = if txn.category.trim().is_empty() {
                "Uncategorized".to_string()
            } else {
                txn.category.clone()
            };
            let entry = map.entry(cat).or_insert((Decimal::ZERO, Decimal::ZERO, 0));
            match txn.kind {
                TransactionKind::Sale => entry.0 += txn.total,
                k if k.is_debit() => entry.1 += txn.total,
                _ => {}
            }
            entry.2 += 1;
        }
        map.into_iter()
            .map(|(category, (income, expense, count))| CategoryTotal {
                category,
                income,
                expense,
                net: income - expense,
                count,
            })
            .collect()
    }

    pub fn monthly_cashflow(&self) -> Vec<MonthFlow> {
        let mut map: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
        for txn in &self.entries {
            let entry = map
                .entry(txn.date.format("%Y-%m").to_string())
                .or_insert((Decimal::ZERO, Decimal::ZERO));
            match txn.kind {
                TransactionKind::Sale => entry.0 += txn.total,
                k if k.is_debit() => entry.1 += txn.total,
                _ => {}
            }
        }
        map.into_iter()
            .map(|(month, (income, expense))| MonthFlow {
                month,
                income,
                expense,
            })
            .collect()
    }
}
