// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::catalog::Catalog;
use crate::error::ProductionError;
use crate::models::Recipe;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, Default)]
pub struct RecipeBook {
    recipes: Vec<Recipe>,
    by_output: BTreeMap<String, Vec<usize>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainStep {
    pub material: String,
    pub quantity: i64,
    pub depth: usize,
    pub is_raw: bool,
    pub runs: Option<i64>,
    pub workbench: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeAnalysis {
    pub output: String,
    pub workbench: String,
    pub input_cost: Decimal,
    pub output_value: Decimal,
    pub profit: Decimal,
    pub margin_percent: Decimal,
}

impl RecipeBook {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        let mut by_output: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (idx, r) in recipes.iter().enumerate() {
            by_output.entry(key(&r.output)).or_default().push(idx);
        }
        RecipeBook { recipes, by_output }
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn for_output(&self, output: &str) -> Vec<&Recipe> {
        self.by_output
            .get(&key(output))
            .map(|idxs| idxs.iter().map(|&i| &self.recipes[i]).collect())
            .unwrap_or_default()
    }

    /// Material tree needed to produce `quantity` of `output`, depth-first.
    /// The first recipe for an output is used. Items without a recipe, or
    /// already being expanded further up the tree, are treated as raw.
    pub fn chain(&self, output: &str, quantity: i64) -> Result<Vec<ChainStep>, ProductionError> {
        let mut steps = Vec::new();
        let mut visiting = HashSet::new();
        self.expand(output, quantity, 0, &mut steps, &mut visiting)?;
        Ok(steps)
    }

    fn expand(
        &self,
        material: &str,
        quantity: i64,
        depth: usize,
        steps: &mut Vec<ChainStep>,
        visiting: &mut HashSet<String>,
    ) -> Result<(), ProductionError> {
        let k = key(material);
        let recipe = match self.for_output(material).first() {
            Some(r) if !visiting.contains(&k) => (*r).clone(),
            _ => {
                steps.push(ChainStep {
                    material: material.to_string(),
                    quantity,
                    depth,
                    is_raw: true,
                    runs: None,
                    workbench: None,
                });
                return Ok(());
            }
        };

        let overflow = || ProductionError::Overflow(material.to_string());
        let per_run = recipe.output_qty.max(1);
        let runs = quantity
            .checked_add(per_run - 1)
            .map(|q| q / per_run)
            .ok_or_else(overflow)?;
        steps.push(ChainStep {
            material: material.to_string(),
            quantity,
            depth,
            is_raw: false,
            runs: Some(runs),
            workbench: Some(recipe.workbench.clone()),
        });

        visiting.insert(k.clone());
        for (input, qty) in &recipe.inputs {
            let needed = qty
                .checked_mul(runs)
                .ok_or_else(|| ProductionError::Overflow(input.clone()))?;
            self.expand(input, needed, depth + 1, steps, visiting)?;
        }
        visiting.remove(&k);
        Ok(())
    }

    /// Raw materials summed across the whole chain, by name.
    pub fn raw_totals(&self, output: &str, quantity: i64) -> Result<Vec<(String, i64)>, ProductionError> {
        let mut totals: BTreeMap<String, i64> = BTreeMap::new();
        for step in self.chain(output, quantity)?.into_iter().filter(|s| s.is_raw) {
            let entry = totals.entry(step.material.clone()).or_insert(0);
            *entry = entry
                .checked_add(step.quantity)
                .ok_or(ProductionError::Overflow(step.material))?;
        }
        Ok(totals.into_iter().collect())
    }
}

fn key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Profitability of every recipe at catalog sell prices, best first.
pub fn analyse(book: &RecipeBook, catalog: &Catalog) -> Vec<RecipeAnalysis> {
    let mut rows: Vec<RecipeAnalysis> = book
        .recipes()
        .iter()
        .map(|r| {
            let input_cost: Decimal = r
                .inputs
                .iter()
                .map(|(name, qty)| catalog.sell_price(name) * Decimal::from(*qty))
                .sum();
            let output_value = catalog.sell_price(&r.output) * Decimal::from(r.output_qty);
            let profit = output_value - input_cost;
            let margin_percent = if input_cost > Decimal::ZERO {
                (profit / input_cost * Decimal::ONE_HUNDRED).round_dp(2)
            } else {
                Decimal::ZERO
            };
            RecipeAnalysis {
                output: r.output.clone(),
                workbench: r.workbench.clone(),
                input_cost,
                output_value,
                profit,
                margin_percent,
            }
        })
        .collect();
    rows.sort_by(|a, b| b.profit.cmp(&a.profit));
    rows
}
