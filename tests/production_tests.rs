// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use orebook::catalog::Catalog;
use orebook::error::ProductionError;
use orebook::models::{Item, Recipe};
use orebook::production::{RecipeBook, analyse};
use rust_decimal::Decimal;

fn recipe(workbench: &str, output: &str, qty: i64, inputs: &[(&str, i64)]) -> Recipe {
    Recipe {
        id: 0,
        workbench: workbench.into(),
        output: output.into(),
        output_qty: qty,
        inputs: inputs.iter().map(|(n, q)| (n.to_string(), *q)).collect(),
    }
}

fn book() -> RecipeBook {
    RecipeBook::new(vec![
        recipe("Smelter", "Iron Bar", 2, &[("Iron Ore", 5), ("Coal", 1)]),
        recipe("Forge", "Pickaxe", 1, &[("Iron Bar", 3), ("Wood", 2)]),
    ])
}

#[test]
fn chain_expands_intermediates_with_runs() {
    let steps = book().chain("Pickaxe", 2).unwrap();
    assert_eq!(steps[0].material, "Pickaxe");
    assert_eq!(steps[0].runs, Some(2));
    let bars = steps.iter().find(|s| s.material == "Iron Bar").unwrap();
    assert_eq!(bars.quantity, 6);
    assert_eq!(bars.runs, Some(3));
    assert_eq!(bars.depth, 1);
    let ore = steps.iter().find(|s| s.material == "Iron Ore").unwrap();
    assert!(ore.is_raw);
    assert_eq!(ore.quantity, 15);
}

#[test]
fn raw_totals_sum_across_the_tree() {
    let totals = book().raw_totals("Pickaxe", 1).unwrap();
    assert_eq!(
        totals,
        vec![
            ("Coal".to_string(), 2),
            ("Iron Ore".to_string(), 10),
            ("Wood".to_string(), 2),
        ]
    );
}

#[test]
fn cycles_stop_at_first_revisit() {
    let cyclic = RecipeBook::new(vec![
        recipe("A", "Alpha", 1, &[("Beta", 1)]),
        recipe("B", "Beta", 1, &[("Alpha", 1)]),
    ]);
    let steps = cyclic.chain("Alpha", 1).unwrap();
    assert_eq!(steps.len(), 3);
    assert!(steps[2].is_raw);
    assert_eq!(steps[2].material, "Alpha");
}

#[test]
fn analyse_ranks_by_profit() {
    let price = |name: &str, sell: i64| Item {
        name: name.into(),
        category: "Misc".into(),
        buy_price: 0,
        sell_price: Decimal::from(sell),
        can_buy: false,
        can_sell: true,
    };
    let catalog = Catalog::new([
        price("Iron Ore", 2),
        price("Coal", 1),
        price("Iron Bar", 20),
        price("Wood", 3),
        price("Pickaxe", 50),
    ]);
    let rows = analyse(&book(), &catalog);
    assert_eq!(rows[0].output, "Iron Bar");
    assert_eq!(rows[0].input_cost, Decimal::from(11));
    assert_eq!(rows[0].profit, Decimal::from(29));
    assert_eq!(rows[1].profit, Decimal::from(-16));
}

#[test]
fn huge_quantities_fail_instead_of_wrapping() {
    let plates = RecipeBook::new(vec![recipe("Press", "Plate", 1, &[("Ore", 2)])]);
    let qty = i64::MAX / 2 + 1;
    assert_eq!(
        plates.chain("Plate", qty),
        Err(ProductionError::Overflow("Ore".into()))
    );
    assert!(plates.raw_totals("Plate", qty).is_err());
    assert_eq!(
        plates.raw_totals("Plate", i64::MAX / 2).unwrap(),
        vec![("Ore".to_string(), i64::MAX - 1)]
    );
}

#[test]
fn raw_totals_that_sum_past_the_limit_fail() {
    let doubled = RecipeBook::new(vec![
        recipe("Bench", "Kit", 1, &[("Left", 1), ("Right", 1)]),
        recipe("Bench", "Left", 1, &[("Ore", 1)]),
        recipe("Bench", "Right", 1, &[("Ore", 1)]),
    ]);
    assert_eq!(
        doubled.raw_totals("Kit", i64::MAX),
        Err(ProductionError::Overflow("Ore".into()))
    );
}
