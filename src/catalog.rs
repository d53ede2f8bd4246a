// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::PricingError;
use crate::models::{Item, SkillLevels};
use crate::pricing::{discount_rate, discounted};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Reference items keyed by lowercase name.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: BTreeMap<String, Item>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemQuote {
    pub name: String,
    pub category: String,
    pub buy_price: i64,
    pub current_buy_price: Decimal,
    pub sell_price: Decimal,
    pub margin: Decimal,
    pub roi_percent: Decimal,
}

impl Catalog {
    pub fn new(items: impl IntoIterator<Item = Item>) -> Self {
        let mut catalog = Catalog::default();
        for item in items {
            catalog.upsert(item);
        }
        catalog
    }

    pub fn upsert(&mut self, item: Item) {
        self.items.insert(key(&item.name), item);
    }

    pub fn get(&self, name: &str) -> Option<&Item> {
        self.items.get(&key(name))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn by_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Item> {
        self.items
            .values()
            .filter(move |i| i.category.eq_ignore_ascii_case(category))
    }

    pub fn purchasable(&self) -> impl Iterator<Item = &Item> {
        self.items.values().filter(|i| i.can_buy)
    }

    pub fn sellable(&self) -> impl Iterator<Item = &Item> {
        self.items.values().filter(|i| i.can_sell)
    }

    pub fn categories(&self) -> Vec<String> {
        self.items
            .values()
            .map(|i| i.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Catalog sell price, used to value stock and recipe outputs.
    pub fn sell_price(&self, name: &str) -> Decimal {
        self.get(name).map(|i| i.sell_price).unwrap_or(Decimal::ZERO)
    }
}

fn key(name: &str) -> String {
    name.trim().to_lowercase()
}

pub fn discounted_buy_price(item: &Item, skills: &SkillLevels) -> Result<Decimal, PricingError> {
    let rate = discount_rate(skills, item.is_vehicle())?;
    Ok(discounted(Decimal::from(item.buy_price), rate))
}

/// Buy/sell figures for an item at the player's current skill levels.
pub fn quote(item: &Item, skills: &SkillLevels) -> Result<ItemQuote, PricingError> {
    let current = discounted_buy_price(item, skills)?;
    let tradeable = item.can_buy && item.can_sell;
    let margin = if tradeable {
        item.sell_price - current
    } else {
        Decimal::ZERO
    };
    let roi_percent = if tradeable && !current.is_zero() {
        (margin / current * Decimal::ONE_HUNDRED).round_dp(2)
    } else {
        Decimal::ZERO
    };
    Ok(ItemQuote {
        name: item.name.clone(),
        category: item.category.clone(),
        buy_price: item.buy_price,
        current_buy_price: current,
        sell_price: item.sell_price,
        margin,
        roi_percent,
    })
}
