// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Maps, location types and named locations used to tag ledger rows and
//! hauling sessions.

use crate::models::Location;
use serde::Serialize;
use std::collections::BTreeSet;

/// Abbreviation for a map. Location names like "FQR - Main Base" carry it as
/// a prefix; otherwise the first three letters of the map name are used.
pub fn map_abbreviation(location: &str, map: &str) -> String {
    match location.split_once(" - ") {
        Some((prefix, _)) if !prefix.trim().is_empty() => prefix.trim().to_uppercase(),
        _ => map.trim().chars().take(3).collect::<String>().to_uppercase(),
    }
}

/// Locations on `map` and of `kind`, both matched case-insensitively.
pub fn filter<'a>(
    locations: &'a [Location],
    map: Option<&str>,
    kind: Option<&str>,
) -> Vec<&'a Location> {
    let matches = |value: &Option<String>, wanted: Option<&str>| match wanted {
        None => true,
        Some(w) => value.as_deref().is_some_and(|v| v.eq_ignore_ascii_case(w)),
    };
    locations
        .iter()
        .filter(|l| matches(&l.map, map) && matches(&l.kind, kind))
        .collect()
}

pub fn find<'a>(locations: &'a [Location], name: &str) -> Option<&'a Location> {
    let name = name.trim();
    locations.iter().find(|l| l.name.eq_ignore_ascii_case(name))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LocationSummary {
    pub maps: usize,
    pub types: usize,
    pub locations: usize,
}

pub fn summarize(locations: &[Location]) -> LocationSummary {
    let maps: BTreeSet<String> = locations
        .iter()
        .filter_map(|l| l.map.as_deref().map(str::to_lowercase))
        .collect();
    let types: BTreeSet<String> = locations
        .iter()
        .filter_map(|l| l.kind.as_deref().map(str::to_lowercase))
        .collect();
    LocationSummary {
        maps: maps.len(),
        types: types.len(),
        locations: locations.len(),
    }
}
