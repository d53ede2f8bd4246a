// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::locations::{filter, map_abbreviation, summarize};
use crate::store::{delete_location, load_locations, load_maps, upsert_location};
use crate::utils::{arg, maybe_print_json, opt_arg, pretty_table};
use anyhow::{Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(conn, sub)?,
        Some(("add", sub)) => add(conn, sub)?,
        Some(("rm", sub)) => remove(conn, sub)?,
        Some(("maps", sub)) => maps(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let all = load_locations(conn)?;
    let map = opt_arg(sub, "map");
    let kind = opt_arg(sub, "type");
    let data = filter(&all, map.as_deref(), kind.as_deref());
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let rows = data
        .iter()
        .map(|l| {
            vec![
                l.name.clone(),
                l.map.clone().unwrap_or_default(),
                l.kind.clone().unwrap_or_default(),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Location", "Map", "Type"], rows));
    let s = summarize(&all);
    println!(
        "Maps: {} | Types: {} | Locations: {}",
        s.maps, s.types, s.locations
    );
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = arg(sub, "name")?;
    let map = opt_arg(sub, "map");
    let abbrev = match (&map, opt_arg(sub, "abbrev")) {
        (_, Some(a)) => a,
        (Some(m), None) => map_abbreviation(name, m),
        (None, None) => String::new(),
    };
    let kind = opt_arg(sub, "type");
    let added = upsert_location(
        conn,
        name,
        map.as_deref().map(|m| (m, abbrev.as_str())),
        kind.as_deref(),
    )?;
    if added {
        println!("Added location '{}'", name);
    } else {
        println!("Updated location '{}'", name);
    }
    Ok(())
}

fn remove(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = arg(sub, "name")?;
    if !delete_location(conn, name)? {
        bail!("Location '{}' not found", name);
    }
    println!("Removed location '{}'", name);
    Ok(())
}

fn maps(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = load_maps(conn)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|m| vec![m.abbreviation.clone(), m.name.clone()])
            .collect();
        println!("{}", pretty_table(&["Abbreviation", "Map"], rows));
    }
    Ok(())
}
