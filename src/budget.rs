// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Purchase planner: a priority queue of planned buys measured against the
//! Personal balance, and the ore revenue still needed to fund it.

use crate::error::PlanError;
use crate::models::{PlannedPurchase, Priority};
use crate::pricing;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// What the line will cost once bought, rounded like a ledger purchase.
pub fn line_cost(plan: &PlannedPurchase) -> Result<Decimal, PlanError> {
    Ok(pricing::line_total(plan.unit_price, plan.quantity)?)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueEntry {
    pub id: i64,
    pub priority: Priority,
    pub item: String,
    pub quantity: i64,
    pub cost: Decimal,
    pub cumulative: Decimal,
    /// The available balance covers this entry and everything ahead of it.
    pub funded: bool,
}

/// Included plans in priority order, oldest first within a priority.
pub fn queue(plans: &[PlannedPurchase], available: Decimal) -> Result<Vec<QueueEntry>, PlanError> {
    let mut included: Vec<&PlannedPurchase> = plans.iter().filter(|p| p.include).collect();
    included.sort_by_key(|p| (p.priority, p.id));

    let mut cumulative = Decimal::ZERO;
    let mut out = Vec::with_capacity(included.len());
    for plan in included {
        let cost = line_cost(plan)?;
        cumulative = cumulative.checked_add(cost).ok_or(PlanError::Overflow)?;
        out.push(QueueEntry {
            id: plan.id,
            priority: plan.priority,
            item: plan.item.clone(),
            quantity: plan.quantity,
            cost,
            cumulative,
            funded: cumulative <= available,
        });
    }
    Ok(out)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BudgetStatus {
    CanAfford,
    OverBudget,
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BudgetStatus::CanAfford => "Can afford all planned items",
            BudgetStatus::OverBudget => "Over budget",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetOverview {
    pub planned_total: Decimal,
    pub included: usize,
    pub excluded: usize,
    pub available: Decimal,
    pub shortfall: Decimal,
    pub surplus: Decimal,
    /// 0..=100, truncated.
    pub funded_percent: Decimal,
    /// Gross ore/fluid sales whose personal share would cover the shortfall.
    pub revenue_needed: Decimal,
    pub status: BudgetStatus,
}

pub fn overview(plans: &[PlannedPurchase], available: Decimal) -> Result<BudgetOverview, PlanError> {
    let mut planned_total = Decimal::ZERO;
    for plan in plans.iter().filter(|p| p.include) {
        planned_total = planned_total
            .checked_add(line_cost(plan)?)
            .ok_or(PlanError::Overflow)?;
    }
    let included = plans.iter().filter(|p| p.include).count();

    let gap = planned_total
        .checked_sub(available)
        .ok_or(PlanError::Overflow)?;
    let shortfall = gap.max(Decimal::ZERO);
    let surplus = (-gap).max(Decimal::ZERO);

    let funded_percent = if available >= planned_total {
        Decimal::ONE_HUNDRED
    } else if available <= Decimal::ZERO {
        Decimal::ZERO
    } else {
        (available / planned_total * Decimal::ONE_HUNDRED).trunc()
    };

    let revenue_needed = shortfall
        .checked_div(pricing::personal_share())
        .ok_or(PlanError::Overflow)?;

    Ok(BudgetOverview {
        planned_total,
        included,
        excluded: plans.len() - included,
        available,
        shortfall,
        surplus,
        funded_percent,
        revenue_needed,
        status: if shortfall.is_zero() {
            BudgetStatus::CanAfford
        } else {
            BudgetStatus::OverBudget
        },
    })
}
