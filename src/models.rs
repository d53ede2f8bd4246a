// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::ParseError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    Purchase,
    Sale,
    Transfer,
    Fuel,
    Opening,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Purchase => "Purchase",
            TransactionKind::Sale => "Sale",
            TransactionKind::Transfer => "Transfer",
            TransactionKind::Fuel => "Fuel",
            TransactionKind::Opening => "Opening",
        }
    }

    /// Purchases and fuel always take money out of the selected account.
    pub fn is_debit(&self) -> bool {
        matches!(self, TransactionKind::Purchase | TransactionKind::Fuel)
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "purchase" | "buy" => Ok(TransactionKind::Purchase),
            "sale" | "sell" => Ok(TransactionKind::Sale),
            "transfer" => Ok(TransactionKind::Transfer),
            "fuel" => Ok(TransactionKind::Fuel),
            "opening" => Ok(TransactionKind::Opening),
            _ => Err(ParseError::UnknownKind(s.trim().to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Account {
    Personal,
    Company,
}

impl Account {
    pub fn as_str(&self) -> &'static str {
        match self {
            Account::Personal => "Personal",
            Account::Company => "Company",
        }
    }

    pub fn other(&self) -> Account {
        match self {
            Account::Personal => Account::Company,
            Account::Company => Account::Personal,
        }
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Account {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "personal" => Ok(Account::Personal),
            "company" => Ok(Account::Company),
            _ => Err(ParseError::UnknownAccount(s.trim().to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub category: String,
    pub buy_price: i64,
    pub sell_price: Decimal,
    pub can_buy: bool,
    pub can_sell: bool,
}

impl Item {
    pub fn is_vehicle(&self) -> bool {
        self.category.starts_with("Vehicles")
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillLevels {
    pub vendor_negotiation: u8,
    pub investment_forecasting: u8,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balances {
    pub personal: Decimal,
    pub company: Decimal,
}

impl Balances {
    pub fn new(personal: Decimal, company: Decimal) -> Self {
        Balances { personal, company }
    }

    pub fn total(&self) -> Decimal {
        self.personal + self.company
    }
}

/// A priced ledger entry. Amounts are signed: debits are negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    pub kind: TransactionKind,
    pub item: String,
    pub category: String,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub account: Account,
    pub total: Decimal,
    pub personal_amount: Decimal,
    pub company_amount: Decimal,
    pub location: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub workbench: String,
    pub output: String,
    pub output_qty: i64,
    pub inputs: Vec<(String, i64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investment {
    pub id: i64,
    pub name: String,
    pub cost: Decimal,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Revenue {
    pub id: i64,
    pub investment_id: i64,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameMap {
    pub id: i64,
    pub abbreviation: String,
    pub name: String,
}

/// A named place on a map. Map and type are optional reference links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: i64,
    pub name: String,
    pub map: Option<String>,
    pub map_abbreviation: Option<String>,
    pub kind: Option<String>,
}

/// Planner priority, most urgent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Critical => "CRITICAL",
            Priority::High => "HIGH",
            Priority::Medium => "MEDIUM",
            Priority::Low => "LOW",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "critical" => Ok(Priority::Critical),
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(ParseError::UnknownPriority(s.trim().to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedPurchase {
    pub id: i64,
    pub item: String,
    pub quantity: i64,
    /// Unit price fixed when planned, after the skill discount.
    pub unit_price: Decimal,
    pub priority: Priority,
    pub include: bool,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub name: String,
    pub category: String,
    pub capacity_yd3: Decimal,
    pub fuel_use_lph: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HaulSession {
    pub id: i64,
    pub date: NaiveDate,
    pub location: String,
    pub vehicle: String,
    pub loads: i64,
    pub volume_yd3: Decimal,
    pub stockpile: Option<String>,
    pub hours: Decimal,
    pub fuel_used_l: Decimal,
    pub fuel_cost: Decimal,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OreYield {
    pub ore: String,
    pub quantity: i64,
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessSession {
    pub id: i64,
    pub date: NaiveDate,
    pub processor: String,
    pub material: String,
    pub input_volume_yd3: Decimal,
    pub ores: Vec<OreYield>,
    pub processing_cost: Decimal,
    pub notes: Option<String>,
}
