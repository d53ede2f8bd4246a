// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Mining sessions: hauling runs (volume moved, fuel burned) and processing
//! runs (ore extracted, revenue per cubic yard).

use crate::error::SessionError;
use crate::models::{HaulSession, ProcessSession, Vehicle};
use crate::pricing::{personal_share, round_cents};
use rust_decimal::Decimal;
use serde::Serialize;

/// In-game diesel price per litre.
pub fn fuel_price_per_litre() -> Decimal {
    Decimal::new(32, 2)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HaulFigures {
    pub volume_yd3: Decimal,
    pub fuel_used_l: Decimal,
    pub fuel_cost: Decimal,
}

pub fn haul_figures(vehicle: &Vehicle, loads: i64, hours: Decimal) -> Result<HaulFigures, SessionError> {
    if loads < 1 {
        return Err(SessionError::InvalidLoads(loads));
    }
    if hours.is_sign_negative() && !hours.is_zero() {
        return Err(SessionError::NegativeHours(hours));
    }
    let volume_yd3 = vehicle
        .capacity_yd3
        .checked_mul(Decimal::from(loads))
        .ok_or(SessionError::Overflow)?;
    let fuel_used_l = hours
        .checked_mul(vehicle.fuel_use_lph)
        .ok_or(SessionError::Overflow)?;
    let fuel_cost = fuel_used_l
        .checked_mul(fuel_price_per_litre())
        .map(round_cents)
        .ok_or(SessionError::Overflow)?;
    Ok(HaulFigures {
        volume_yd3,
        fuel_used_l,
        fuel_cost,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessFigures {
    pub total_ores: i64,
    pub gross_revenue: Decimal,
    pub net_revenue: Decimal,
    pub revenue_per_yd3: Decimal,
    pub personal_share: Decimal,
    pub company_share: Decimal,
}

/// Revenue of a processing run. Net revenue is split like an ore sale:
/// 10% personal, the rest company.
pub fn process_figures(session: &ProcessSession) -> Result<ProcessFigures, SessionError> {
    if session.input_volume_yd3 <= Decimal::ZERO {
        return Err(SessionError::InvalidVolume(session.input_volume_yd3));
    }
    if session.processing_cost.is_sign_negative() && !session.processing_cost.is_zero() {
        return Err(SessionError::Negative("processing cost"));
    }

    let mut total_ores: i64 = 0;
    let mut gross_revenue = Decimal::ZERO;
    for ore in &session.ores {
        if ore.quantity < 1 {
            return Err(SessionError::InvalidOreQuantity(ore.ore.clone()));
        }
        if ore.unit_price.is_sign_negative() && !ore.unit_price.is_zero() {
            return Err(SessionError::Negative("ore price"));
        }
        total_ores = total_ores
            .checked_add(ore.quantity)
            .ok_or(SessionError::Overflow)?;
        let subtotal = ore
            .unit_price
            .checked_mul(Decimal::from(ore.quantity))
            .ok_or(SessionError::Overflow)?;
        gross_revenue = gross_revenue
            .checked_add(subtotal)
            .ok_or(SessionError::Overflow)?;
    }

    let net_revenue = gross_revenue - session.processing_cost;
    let personal = round_cents(net_revenue * personal_share());
    let revenue_per_yd3 = net_revenue
        .checked_div(session.input_volume_yd3)
        .ok_or(SessionError::Overflow)?
        .round_dp(2);
    Ok(ProcessFigures {
        total_ores,
        gross_revenue,
        net_revenue,
        revenue_per_yd3,
        personal_share: personal,
        company_share: net_revenue - personal,
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionTotals {
    pub haul_sessions: usize,
    pub volume_moved_yd3: Decimal,
    pub fuel_used_l: Decimal,
    pub fuel_cost: Decimal,
    pub process_sessions: usize,
    pub volume_processed_yd3: Decimal,
    pub ores_extracted: i64,
    pub net_revenue: Decimal,
}

pub fn totals(hauls: &[HaulSession], runs: &[ProcessSession]) -> Result<SessionTotals, SessionError> {
    let mut t = SessionTotals {
        haul_sessions: hauls.len(),
        process_sessions: runs.len(),
        ..SessionTotals::default()
    };
    let add = |a: Decimal, b: Decimal| a.checked_add(b).ok_or(SessionError::Overflow);
    for h in hauls {
        t.volume_moved_yd3 = add(t.volume_moved_yd3, h.volume_yd3)?;
        t.fuel_used_l = add(t.fuel_used_l, h.fuel_used_l)?;
        t.fuel_cost = add(t.fuel_cost, h.fuel_cost)?;
    }
    for run in runs {
        let figures = process_figures(run)?;
        t.volume_processed_yd3 = add(t.volume_processed_yd3, run.input_volume_yd3)?;
        t.ores_extracted = t
            .ores_extracted
            .checked_add(figures.total_ores)
            .ok_or(SessionError::Overflow)?;
        t.net_revenue = add(t.net_revenue, figures.net_revenue)?;
    }
    Ok(t)
}
