// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

/// Rejections raised by the pricing calculator. These are user-correctable
/// and are surfaced as-is.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    #[error("quantity must be at least 1, got {0}")]
    InvalidQuantity(i64),

    #[error("'{0}' cannot be purchased")]
    NotPurchasable(String),

    #[error("'{0}' cannot be sold")]
    NotSellable(String),

    #[error("{skill} level {level} is outside 0..={max}")]
    SkillLevelOutOfRange {
        skill: &'static str,
        level: u8,
        max: u8,
    },

    #[error("unit price cannot be negative, got {0}")]
    NegativePrice(Decimal),

    #[error("transfer amount must be positive, got {0}")]
    InvalidTransferAmount(Decimal),

    #[error("transfer needs two different accounts")]
    SameAccount,

    #[error("{0} transactions are not priced")]
    NotPriceable(&'static str),

    #[error("{quantity} x {unit_price} is too large to total")]
    Overflow { unit_price: Decimal, quantity: i64 },
}

#[derive(Debug, Error, PartialEq)]
pub enum ProductionError {
    #[error("quantity of '{0}' is too large to expand")]
    Overflow(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("unknown transaction type '{0}'")]
    UnknownKind(String),

    #[error("unknown account '{0}' (use Personal or Company)")]
    UnknownAccount(String),

    #[error("unknown priority '{0}' (use Critical, High, Medium or Low)")]
    UnknownPriority(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum PlanError {
    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("planned costs are too large to total")]
    Overflow,
}

/// Rejections for hauling and processing sessions.
#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("loads must be at least 1, got {0}")]
    InvalidLoads(i64),

    #[error("hours cannot be negative, got {0}")]
    NegativeHours(Decimal),

    #[error("input volume must be positive, got {0}")]
    InvalidVolume(Decimal),

    #[error("ore quantity for '{0}' must be at least 1")]
    InvalidOreQuantity(String),

    #[error("{0} cannot be negative")]
    Negative(&'static str),

    #[error("session figures are too large to total")]
    Overflow,
}

/// One rejected row of a CSV import. `line` is 1-based and counts the header.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("line {line}: {message}")]
pub struct ImportError {
    pub line: u64,
    pub message: String,
}
