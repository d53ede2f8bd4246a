// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use orebook::catalog::Catalog;
use orebook::commands::importer::import_vehicles;
use orebook::commands::sessions::{self, parse_ores};
use orebook::error::SessionError;
use orebook::models::{Item, OreYield, ProcessSession, Vehicle};
use orebook::sessions::{haul_figures, process_figures};
use orebook::store::{load_hauls, load_process_sessions, load_vehicles, upsert_item};
use orebook::{cli, db};
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::fs;
use std::str::FromStr;
use tempfile::tempdir;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn truck() -> Vehicle {
    Vehicle {
        name: "Arvik DX20E".into(),
        category: "Vehicles - Rock Trucks".into(),
        capacity_yd3: dec("30.1"),
        fuel_use_lph: dec("10"),
    }
}

fn ore(name: &str, qty: i64, price: &str) -> OreYield {
    OreYield {
        ore: name.into(),
        quantity: qty,
        unit_price: dec(price),
    }
}

fn wash(volume: &str, ores: Vec<OreYield>, cost: &str) -> ProcessSession {
    ProcessSession {
        id: 0,
        date: NaiveDate::from_ymd_opt(2021, 5, 1).unwrap(),
        processor: "Washplant".into(),
        material: "Paydirt".into(),
        input_volume_yd3: dec(volume),
        ores,
        processing_cost: dec(cost),
        notes: None,
    }
}

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn run(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["orebook", "session"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("session", m)) => sessions::handle(conn, m),
        _ => panic!("no session subcommand"),
    }
}

#[test]
fn hauling_volume_and_fuel() {
    let f = haul_figures(&truck(), 4, dec("2.5")).unwrap();
    assert_eq!(f.volume_yd3, dec("120.4"));
    assert_eq!(f.fuel_used_l, dec("25"));
    assert_eq!(f.fuel_cost, dec("8.00"));

    assert_eq!(
        haul_figures(&truck(), 0, Decimal::ONE),
        Err(SessionError::InvalidLoads(0))
    );
    assert_eq!(
        haul_figures(&truck(), 1, dec("-1")),
        Err(SessionError::NegativeHours(dec("-1")))
    );
}

#[test]
fn processing_revenue_and_split() {
    let run = wash(
        "50",
        vec![ore("Gold Ore", 10, "43"), ore("Coal", 25, "13")],
        "100",
    );
    let f = process_figures(&run).unwrap();
    assert_eq!(f.total_ores, 35);
    assert_eq!(f.gross_revenue, dec("755"));
    assert_eq!(f.net_revenue, dec("655"));
    assert_eq!(f.revenue_per_yd3, dec("13.10"));
    assert_eq!(f.personal_share, dec("65.50"));
    assert_eq!(f.company_share, dec("589.50"));
}

#[test]
fn processing_rejects_bad_input() {
    assert_eq!(
        process_figures(&wash("0", vec![], "0")),
        Err(SessionError::InvalidVolume(Decimal::ZERO))
    );
    assert_eq!(
        process_figures(&wash("5", vec![ore("Coal", 0, "13")], "0")),
        Err(SessionError::InvalidOreQuantity("Coal".into()))
    );
    assert_eq!(
        process_figures(&wash("5", vec![], "-3")),
        Err(SessionError::Negative("processing cost"))
    );
    assert_eq!(
        process_figures(&wash(
            "5",
            vec![ore("Gold", i64::MAX, "79228162514264337593543950")],
            "0"
        )),
        Err(SessionError::Overflow)
    );
    assert_eq!(
        process_figures(&wash(
            "0.0000000000000000000000000001",
            vec![ore("Gold", 1, "79228162514")],
            "0"
        )),
        Err(SessionError::Overflow)
    );
}

#[test]
fn ore_lists_fall_back_to_catalog_prices() {
    let catalog = Catalog::new([Item {
        name: "Gold Ore".into(),
        category: "Resources - Ore".into(),
        buy_price: 0,
        sell_price: dec("43"),
        can_buy: false,
        can_sell: true,
    }]);
    let ores = parse_ores("gold ore:10; Coal:25@13 ;Silver Ore@41", &catalog).unwrap();
    assert_eq!(
        ores,
        vec![
            ore("Gold Ore", 10, "43"),
            ore("Coal", 25, "13"),
            ore("Silver Ore", 1, "41"),
        ]
    );
    assert!(parse_ores("Mystery:3", &catalog).is_err());
    assert!(parse_ores("Coal:x@13", &catalog).is_err());
    assert!(parse_ores("", &catalog).unwrap().is_empty());
}

#[test]
fn sessions_from_the_command_line() {
    let mut conn = setup();
    let dir = tempdir().unwrap();
    let path = dir.path().join("vehicles.csv");
    fs::write(
        &path,
        "Name,Category,Capacity yd3,Fuel L/h\nArvik DX20E,Vehicles - Rock Trucks,30.1,10\nBroken,Vehicles,0,5\n",
    )
    .unwrap();
    let report = import_vehicles(&mut conn, &path).unwrap();
    assert_eq!(report.imported, 1);
    assert_eq!(report.errors[0].line, 3);
    assert_eq!(load_vehicles(&conn).unwrap()[0].capacity_yd3, dec("30.1"));

    upsert_item(
        &conn,
        &Item {
            name: "Gold Ore".into(),
            category: "Resources - Ore".into(),
            buy_price: 0,
            sell_price: dec("43"),
            can_buy: false,
            can_sell: true,
        },
    )
    .unwrap();

    run(
        &conn,
        &[
            "haul", "--date", "2021-05-01", "--location", "FQR - North Pit", "--vehicle",
            "arvik dx20e", "--loads", "4", "--hours", "2.5", "--stockpile", "Dump",
        ],
    )
    .unwrap();
    assert!(run(
        &conn,
        &["haul", "--date", "2021-05-01", "--location", "Pit", "--vehicle", "Arvik DX20E", "--loads", "0"],
    )
    .is_err());
    assert!(run(
        &conn,
        &["haul", "--date", "2021-05-01", "--location", "Pit", "--vehicle", "Bicycle", "--loads", "1"],
    )
    .is_err());

    run(
        &conn,
        &[
            "process", "--date", "2021-05-02", "--processor", "Washplant", "--material",
            "Paydirt", "--volume", "120.4", "--ores", "Gold Ore:10", "--cost", "30",
        ],
    )
    .unwrap();
    assert!(run(
        &conn,
        &["process", "--date", "2021-05-02", "--processor", "Washplant", "--material", "Paydirt", "--volume", "0"],
    )
    .is_err());

    let hauls = load_hauls(&conn).unwrap();
    assert_eq!(hauls.len(), 1);
    assert_eq!(hauls[0].vehicle, "Arvik DX20E");
    assert_eq!(hauls[0].stockpile.as_deref(), Some("Dump"));
    let runs = load_process_sessions(&conn).unwrap();
    assert_eq!(runs[0].ores, vec![ore("Gold Ore", 10, "43")]);

    let t = sessions::query_totals(&conn).unwrap();
    assert_eq!((t.haul_sessions, t.process_sessions), (1, 1));
    assert_eq!(t.volume_moved_yd3, dec("120.4"));
    assert_eq!(t.fuel_cost, dec("8.00"));
    assert_eq!(t.volume_processed_yd3, dec("120.4"));
    assert_eq!(t.ores_extracted, 10);
    assert_eq!(t.net_revenue, dec("400"));

    run(&conn, &["rm", "--kind", "process", "--id", &runs[0].id.to_string()]).unwrap();
    assert!(load_process_sessions(&conn).unwrap().is_empty());
    assert!(run(&conn, &["rm", "--kind", "haul", "--id", "99"]).is_err());
}
