// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.orebook", "Orebook", "orebook"));

/// Overrides the platform data directory when set.
pub const DB_ENV: &str = "OREBOOK_DB";

pub fn db_path() -> Result<PathBuf> {
    if let Some(p) = std::env::var_os(DB_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(p));
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("orebook.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    tracing::debug!(path = %path.display(), "database ready");
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS items(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE COLLATE NOCASE,
        category TEXT NOT NULL,
        buy_price INTEGER NOT NULL DEFAULT 0,
        sell_price TEXT NOT NULL DEFAULT '0',
        can_buy INTEGER NOT NULL DEFAULT 1,
        can_sell INTEGER NOT NULL DEFAULT 1
    );
    CREATE INDEX IF NOT EXISTS idx_items_category ON items(category);

    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY,
        date TEXT NOT NULL,
        type TEXT NOT NULL CHECK(type IN ('Purchase','Sale','Transfer','Fuel','Opening')),
        item TEXT NOT NULL,
        category TEXT NOT NULL DEFAULT '',
        quantity INTEGER NOT NULL DEFAULT 1,
        unit_price TEXT NOT NULL DEFAULT '0',
        account TEXT NOT NULL CHECK(account IN ('Personal','Company')),
        total TEXT NOT NULL,
        personal_amount TEXT NOT NULL DEFAULT '0',
        company_amount TEXT NOT NULL DEFAULT '0',
        location TEXT,
        notes TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
    CREATE INDEX IF NOT EXISTS idx_transactions_category ON transactions(category);

    CREATE TABLE IF NOT EXISTS recipes(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        workbench TEXT NOT NULL,
        output TEXT NOT NULL,
        output_qty INTEGER NOT NULL DEFAULT 1 CHECK(output_qty >= 1)
    );

    CREATE TABLE IF NOT EXISTS recipe_inputs(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        recipe_id INTEGER NOT NULL,
        item TEXT NOT NULL,
        quantity INTEGER NOT NULL CHECK(quantity >= 1),
        FOREIGN KEY(recipe_id) REFERENCES recipes(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS investments(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        cost TEXT NOT NULL,
        date TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS investment_revenues(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        investment_id INTEGER NOT NULL,
        date TEXT NOT NULL,
        amount TEXT NOT NULL,
        note TEXT,
        FOREIGN KEY(investment_id) REFERENCES investments(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS maps(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        abbreviation TEXT NOT NULL UNIQUE COLLATE NOCASE,
        name TEXT NOT NULL UNIQUE COLLATE NOCASE
    );

    CREATE TABLE IF NOT EXISTS location_types(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE COLLATE NOCASE
    );

    CREATE TABLE IF NOT EXISTS locations(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE COLLATE NOCASE,
        map_id INTEGER,
        type_id INTEGER,
        FOREIGN KEY(map_id) REFERENCES maps(id) ON DELETE SET NULL,
        FOREIGN KEY(type_id) REFERENCES location_types(id) ON DELETE SET NULL
    );

    CREATE TABLE IF NOT EXISTS planned_purchases(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        item TEXT NOT NULL,
        quantity INTEGER NOT NULL CHECK(quantity >= 1),
        unit_price TEXT NOT NULL,
        priority TEXT NOT NULL CHECK(priority IN ('CRITICAL','HIGH','MEDIUM','LOW')),
        include INTEGER NOT NULL DEFAULT 1,
        notes TEXT
    );

    CREATE TABLE IF NOT EXISTS vehicles(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE COLLATE NOCASE,
        category TEXT NOT NULL DEFAULT '',
        capacity_yd3 TEXT NOT NULL,
        fuel_use_lph TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS haul_sessions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        location TEXT NOT NULL,
        vehicle TEXT NOT NULL,
        loads INTEGER NOT NULL CHECK(loads >= 1),
        volume_yd3 TEXT NOT NULL,
        stockpile TEXT,
        hours TEXT NOT NULL,
        fuel_used_l TEXT NOT NULL,
        fuel_cost TEXT NOT NULL,
        notes TEXT
    );

    CREATE TABLE IF NOT EXISTS process_sessions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        processor TEXT NOT NULL,
        material TEXT NOT NULL,
        input_volume_yd3 TEXT NOT NULL,
        processing_cost TEXT NOT NULL DEFAULT '0',
        notes TEXT
    );

    CREATE TABLE IF NOT EXISTS process_ores(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        session_id INTEGER NOT NULL,
        ore TEXT NOT NULL,
        quantity INTEGER NOT NULL CHECK(quantity >= 1),
        unit_price TEXT NOT NULL,
        FOREIGN KEY(session_id) REFERENCES process_sessions(id) ON DELETE CASCADE
    );
    "#,
    )?;
    Ok(())
}
