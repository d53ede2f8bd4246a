// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Turns a raw (item, quantity, price, account, skills) request into a priced
//! line with its Personal/Company split.

use crate::error::PricingError;
use crate::models::{Account, Item, SkillLevels, TransactionKind};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

pub const MAX_VENDOR_NEGOTIATION: u8 = 7;
pub const MAX_INVESTMENT_FORECASTING: u8 = 6;

/// Sales in these categories (and their subcategories) pay 10% personal, 90% company.
pub const SPLIT_CATEGORIES: [&str; 2] = ["Resources - Ore", "Resources - Fluids"];

fn discount_step() -> Decimal {
    Decimal::new(5, 3)
}

fn max_discount() -> Decimal {
    Decimal::new(65, 3)
}

/// Personal cut of an ore or fluid sale.
pub fn personal_share() -> Decimal {
    Decimal::new(10, 2)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRequest {
    pub kind: TransactionKind,
    pub account: Account,
    pub quantity: i64,
    /// Overrides the catalog price when set. Still subject to the discount.
    pub base_price: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricedLine {
    pub discount_rate: Decimal,
    pub effective_unit_price: Decimal,
    pub total: Decimal,
    pub personal_amount: Decimal,
    pub company_amount: Decimal,
}

pub fn validate_skills(skills: &SkillLevels) -> Result<(), PricingError> {
    if skills.vendor_negotiation > MAX_VENDOR_NEGOTIATION {
        return Err(PricingError::SkillLevelOutOfRange {
            skill: "Vendor Negotiation",
            level: skills.vendor_negotiation,
            max: MAX_VENDOR_NEGOTIATION,
        });
    }
    if skills.investment_forecasting > MAX_INVESTMENT_FORECASTING {
        return Err(PricingError::SkillLevelOutOfRange {
            skill: "Investment Forecasting",
            level: skills.investment_forecasting,
            max: MAX_INVESTMENT_FORECASTING,
        });
    }
    Ok(())
}

/// Purchase discount as a fraction, e.g. 0.035 for VN 7 on a non-vehicle.
pub fn discount_rate(skills: &SkillLevels, is_vehicle: bool) -> Result<Decimal, PricingError> {
    validate_skills(skills)?;
    let mut rate = discount_step() * Decimal::from(skills.vendor_negotiation);
    if is_vehicle {
        rate += discount_step() * Decimal::from(skills.investment_forecasting);
    }
    Ok(rate.min(max_discount()))
}

pub fn discounted(base: Decimal, rate: Decimal) -> Decimal {
    base * (Decimal::ONE - rate)
}

/// A single unit rounds up to the next whole unit; bulk totals are exact to the cent.
pub fn line_total(effective_unit_price: Decimal, quantity: i64) -> Result<Decimal, PricingError> {
    if quantity < 1 {
        return Err(PricingError::InvalidQuantity(quantity));
    }
    if effective_unit_price.is_sign_negative() && !effective_unit_price.is_zero() {
        return Err(PricingError::NegativePrice(effective_unit_price));
    }
    if quantity == 1 {
        return Ok(effective_unit_price.ceil());
    }
    effective_unit_price
        .checked_mul(Decimal::from(quantity))
        .map(round_cents)
        .ok_or(PricingError::Overflow {
            unit_price: effective_unit_price,
            quantity,
        })
}

pub fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn is_split_category(category: &str) -> bool {
    SPLIT_CATEGORIES
        .iter()
        .any(|prefix| category.trim().starts_with(prefix))
}

/// Signed (personal, company) amounts for a priced total.
pub fn split(
    kind: TransactionKind,
    category: &str,
    account: Account,
    total: Decimal,
) -> (Decimal, Decimal) {
    if kind == TransactionKind::Sale && is_split_category(category) {
        let personal = round_cents(total * personal_share());
        return (personal, total - personal);
    }
    let signed = if kind.is_debit() { -total } else { total };
    match account {
        Account::Personal => (signed, Decimal::ZERO),
        Account::Company => (Decimal::ZERO, signed),
    }
}

fn ensure_priceable(kind: TransactionKind) -> Result<(), PricingError> {
    match kind {
        TransactionKind::Transfer | TransactionKind::Opening => {
            Err(PricingError::NotPriceable(kind.as_str()))
        }
        _ => Ok(()),
    }
}

/// Price a request against a catalog item and the player's skills.
pub fn price(
    req: &PriceRequest,
    item: &Item,
    skills: &SkillLevels,
) -> Result<PricedLine, PricingError> {
    ensure_priceable(req.kind)?;
    if req.quantity < 1 {
        return Err(PricingError::InvalidQuantity(req.quantity));
    }

    let (base, rate) = if req.kind.is_debit() {
        if !item.can_buy {
            return Err(PricingError::NotPurchasable(item.name.clone()));
        }
        let base = req.base_price.unwrap_or_else(|| Decimal::from(item.buy_price));
        (base, discount_rate(skills, item.is_vehicle())?)
    } else {
        if !item.can_sell {
            return Err(PricingError::NotSellable(item.name.clone()));
        }
        validate_skills(skills)?;
        (req.base_price.unwrap_or(item.sell_price), Decimal::ZERO)
    };
    if base.is_sign_negative() && !base.is_zero() {
        return Err(PricingError::NegativePrice(base));
    }

    let effective = discounted(base, rate);
    let mut line = price_line(req.kind, &item.category, req.account, req.quantity, effective)?;
    line.discount_rate = rate;
    Ok(line)
}

/// Price a line whose unit price is already the effective one (no discount applied).
pub fn price_line(
    kind: TransactionKind,
    category: &str,
    account: Account,
    quantity: i64,
    effective_unit_price: Decimal,
) -> Result<PricedLine, PricingError> {
    ensure_priceable(kind)?;
    let total = line_total(effective_unit_price, quantity)?;
    let (personal_amount, company_amount) = split(kind, category, account, total);
    Ok(PricedLine {
        discount_rate: Decimal::ZERO,
        effective_unit_price,
        total,
        personal_amount,
        company_amount,
    })
}

/// Signed (personal, company) amounts for moving `amount` from one account to the other.
pub fn transfer(
    amount: Decimal,
    from: Account,
    to: Account,
) -> Result<(Decimal, Decimal), PricingError> {
    if amount <= Decimal::ZERO {
        return Err(PricingError::InvalidTransferAmount(amount));
    }
    if from == to {
        return Err(PricingError::SameAccount);
    }
    Ok(match to {
        Account::Personal => (amount, -amount),
        Account::Company => (-amount, amount),
    })
}
