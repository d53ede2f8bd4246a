// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Game configuration kept in the `settings` key/value table.

use crate::error::PricingError;
use crate::ledger::DEFAULT_UNDO_DEPTH;
use crate::models::{Balances, SkillLevels};
use crate::pricing::validate_skills;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

pub const STARTING_CAPITAL: i64 = 100_000;

const KEY_OPENING_PERSONAL: &str = "opening_personal";
const KEY_OPENING_COMPANY: &str = "opening_company";
const KEY_VN: &str = "vendor_negotiation";
const KEY_IF: &str = "investment_forecasting";
const KEY_START: &str = "game_start_date";
const KEY_CURRENT: &str = "current_game_date";
const KEY_UNDO_DEPTH: &str = "undo_depth";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSettings {
    pub opening: Balances,
    pub skills: SkillLevels,
    pub game_start_date: NaiveDate,
    pub current_game_date: NaiveDate,
    pub undo_depth: usize,
}

pub fn default_game_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 4, 22).unwrap_or_default()
}

impl Default for GameSettings {
    fn default() -> Self {
        GameSettings {
            opening: Balances::new(Decimal::from(STARTING_CAPITAL), Decimal::ZERO),
            skills: SkillLevels::default(),
            game_start_date: default_game_date(),
            current_game_date: default_game_date(),
            undo_depth: DEFAULT_UNDO_DEPTH,
        }
    }
}

impl GameSettings {
    pub fn days_played(&self) -> i64 {
        (self.current_game_date - self.game_start_date).num_days() + 1
    }

    pub fn validate(&self) -> Result<(), PricingError> {
        validate_skills(&self.skills)
    }

    pub fn load(conn: &Connection) -> Result<Self> {
        let d = GameSettings::default();
        Ok(GameSettings {
            opening: Balances::new(
                read_or(conn, KEY_OPENING_PERSONAL, d.opening.personal)?,
                read_or(conn, KEY_OPENING_COMPANY, d.opening.company)?,
            ),
            skills: SkillLevels {
                vendor_negotiation: read_or(conn, KEY_VN, d.skills.vendor_negotiation)?,
                investment_forecasting: read_or(conn, KEY_IF, d.skills.investment_forecasting)?,
            },
            game_start_date: read_or(conn, KEY_START, d.game_start_date)?,
            current_game_date: read_or(conn, KEY_CURRENT, d.current_game_date)?,
            undo_depth: read_or(conn, KEY_UNDO_DEPTH, d.undo_depth)?,
        })
    }

    pub fn save(&self, conn: &Connection) -> Result<()> {
        self.validate()?;
        set_setting(conn, KEY_OPENING_PERSONAL, &self.opening.personal.to_string())?;
        set_setting(conn, KEY_OPENING_COMPANY, &self.opening.company.to_string())?;
        set_setting(conn, KEY_VN, &self.skills.vendor_negotiation.to_string())?;
        set_setting(conn, KEY_IF, &self.skills.investment_forecasting.to_string())?;
        set_setting(conn, KEY_START, &self.game_start_date.to_string())?;
        set_setting(conn, KEY_CURRENT, &self.current_game_date.to_string())?;
        set_setting(conn, KEY_UNDO_DEPTH, &self.undo_depth.to_string())?;
        Ok(())
    }
}

fn read_or<T>(conn: &Connection, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get_setting(conn, key)? {
        Some(v) => v
            .trim()
            .parse::<T>()
            .with_context(|| format!("Invalid setting {}='{}'", key, v)),
        None => Ok(default),
    }
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}
