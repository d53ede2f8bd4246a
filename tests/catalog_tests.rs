// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use orebook::catalog::{Catalog, quote};
use orebook::models::{Item, SkillLevels};
use rust_decimal::Decimal;

fn item(name: &str, category: &str, buy: i64, sell: i64, can_buy: bool) -> Item {
    Item {
        name: name.into(),
        category: category.into(),
        buy_price: buy,
        sell_price: Decimal::from(sell),
        can_buy,
        can_sell: true,
    }
}

fn catalog() -> Catalog {
    Catalog::new([
        item("Iron Ore", "Resources - Ore", 0, 50, false),
        item("Pickaxe", "Tools", 200, 150, true),
        item("Dump Truck", "Vehicles - Heavy", 100_000, 60_000, true),
    ])
}

#[test]
fn lookup_ignores_case_and_whitespace() {
    let c = catalog();
    assert_eq!(c.get("  iron ORE ").map(|i| i.buy_price), Some(0));
    assert!(c.get("Copper Ore").is_none());
    assert_eq!(c.sell_price("Copper Ore"), Decimal::ZERO);
}

#[test]
fn upsert_replaces_by_name() {
    let mut c = catalog();
    c.upsert(item("PICKAXE", "Tools", 180, 150, true));
    assert_eq!(c.len(), 3);
    assert_eq!(c.get("pickaxe").map(|i| i.buy_price), Some(180));
}

#[test]
fn filters_and_categories() {
    let c = catalog();
    assert_eq!(c.purchasable().count(), 2);
    assert_eq!(c.sellable().count(), 3);
    assert_eq!(c.by_category("tools").count(), 1);
    assert_eq!(
        c.categories(),
        vec!["Resources - Ore", "Tools", "Vehicles - Heavy"]
    );
}

#[test]
fn quote_uses_current_skill_discount() {
    let c = catalog();
    let skills = SkillLevels {
        vendor_negotiation: 7,
        investment_forecasting: 6,
    };
    let truck = quote(c.get("Dump Truck").unwrap(), &skills).unwrap();
    assert_eq!(truck.current_buy_price, Decimal::from(93_500));
    assert_eq!(truck.margin, Decimal::from(-33_500));

    let ore = quote(c.get("Iron Ore").unwrap(), &skills).unwrap();
    assert_eq!(ore.margin, Decimal::ZERO);
    assert_eq!(ore.roi_percent, Decimal::ZERO);
}
