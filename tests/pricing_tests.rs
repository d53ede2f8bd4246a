// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use orebook::error::PricingError;
use orebook::models::{Account, Item, SkillLevels, TransactionKind};
use orebook::pricing::{self, PriceRequest};
use rust_decimal::Decimal;
use std::str::FromStr;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn item(name: &str, category: &str, buy: i64, sell: &str) -> Item {
    Item {
        name: name.into(),
        category: category.into(),
        buy_price: buy,
        sell_price: dec(sell),
        can_buy: true,
        can_sell: true,
    }
}

fn skills(vn: u8, level_if: u8) -> SkillLevels {
    SkillLevels {
        vendor_negotiation: vn,
        investment_forecasting: level_if,
    }
}

fn sale(account: Account, quantity: i64) -> PriceRequest {
    PriceRequest {
        kind: TransactionKind::Sale,
        account,
        quantity,
        base_price: None,
    }
}

#[test]
fn single_unit_rounds_up_to_whole_currency() {
    let ore = item("Iron Ore", "Resources - Ore", 0, "66.50");
    let line = pricing::price(&sale(Account::Company, 1), &ore, &skills(0, 0)).unwrap();
    assert_eq!(line.total, dec("67"));
}

#[test]
fn bulk_quantity_keeps_exact_total() {
    let ore = item("Iron Ore", "Resources - Ore", 0, "66.50");
    let line = pricing::price(&sale(Account::Company, 2000), &ore, &skills(0, 0)).unwrap();
    assert_eq!(line.total, dec("133000"));
}

#[test]
fn bulk_rounds_half_away_from_zero_to_cents() {
    assert_eq!(pricing::line_total(dec("0.125"), 3).unwrap(), dec("0.38"));
    assert_eq!(pricing::round_cents(dec("2.345")), dec("2.35"));
}

#[test]
fn vendor_negotiation_discount() {
    assert_eq!(pricing::discount_rate(&skills(7, 0), false).unwrap(), dec("0.035"));
    assert_eq!(pricing::discount_rate(&skills(0, 6), false).unwrap(), Decimal::ZERO);
}

#[test]
fn vehicle_discount_is_capped() {
    assert_eq!(pricing::discount_rate(&skills(7, 6), true).unwrap(), dec("0.065"));
    assert_eq!(pricing::discount_rate(&skills(4, 2), true).unwrap(), dec("0.030"));
}

#[test]
fn purchase_applies_discount_and_debits_account() {
    let truck = item("Dump Truck", "Vehicles - Heavy", 100000, "0");
    let req = PriceRequest {
        kind: TransactionKind::Purchase,
        account: Account::Company,
        quantity: 1,
        base_price: None,
    };
    let line = pricing::price(&req, &truck, &skills(7, 6)).unwrap();
    assert_eq!(line.effective_unit_price, dec("93500"));
    assert_eq!(line.total, dec("93500"));
    assert_eq!(line.personal_amount, Decimal::ZERO);
    assert_eq!(line.company_amount, dec("-93500"));
}

#[test]
fn sales_are_never_discounted() {
    let gold = item("Gold Bar", "Refined", 0, "1000");
    let line = pricing::price(&sale(Account::Personal, 2), &gold, &skills(7, 6)).unwrap();
    assert_eq!(line.discount_rate, Decimal::ZERO);
    assert_eq!(line.total, dec("2000"));
}

#[test]
fn ore_and_fluid_sales_split_ten_ninety() {
    for (category, qty) in [("Resources - Ore", 37), ("Resources - Fluids - Oil", 13)] {
        let thing = item("Thing", category, 0, "12.34");
        let line = pricing::price(&sale(Account::Personal, qty), &thing, &skills(0, 0)).unwrap();
        assert_eq!(line.personal_amount + line.company_amount, line.total);
        assert_eq!(line.personal_amount, pricing::round_cents(line.total * dec("0.10")));
    }
}

#[test]
fn other_sales_credit_the_selected_account() {
    let gold = item("Gold Bar", "Refined", 0, "250");
    let line = pricing::price(&sale(Account::Company, 4), &gold, &skills(0, 0)).unwrap();
    assert_eq!(line.company_amount, line.total);
    assert_eq!(line.personal_amount, Decimal::ZERO);
}

#[test]
fn fuel_is_discounted_like_a_purchase() {
    let diesel = item("Diesel", "Fuel", 100, "0");
    let req = PriceRequest {
        kind: TransactionKind::Fuel,
        account: Account::Personal,
        quantity: 10,
        base_price: None,
    };
    let line = pricing::price(&req, &diesel, &skills(2, 0)).unwrap();
    assert_eq!(line.total, dec("990"));
    assert_eq!(line.personal_amount, dec("-990"));
}

#[test]
fn rejects_bad_requests() {
    let ore = item("Iron Ore", "Resources - Ore", 10, "5");
    let err = pricing::price(&sale(Account::Personal, 0), &ore, &skills(0, 0)).unwrap_err();
    assert_eq!(err, PricingError::InvalidQuantity(0));

    let unbuyable = Item {
        can_buy: false,
        ..ore.clone()
    };
    let buy = PriceRequest {
        kind: TransactionKind::Purchase,
        account: Account::Personal,
        quantity: 1,
        base_price: None,
    };
    assert!(matches!(
        pricing::price(&buy, &unbuyable, &skills(0, 0)),
        Err(PricingError::NotPurchasable(_))
    ));

    assert!(matches!(
        pricing::price(&buy, &ore, &skills(8, 0)),
        Err(PricingError::SkillLevelOutOfRange { level: 8, .. })
    ));

    let negative = PriceRequest {
        base_price: Some(dec("-1")),
        ..buy
    };
    assert!(matches!(
        pricing::price(&negative, &ore, &skills(0, 0)),
        Err(PricingError::NegativePrice(_))
    ));
}

#[test]
fn transfer_moves_money_between_accounts() {
    let (p, c) = pricing::transfer(dec("500"), Account::Personal, Account::Company).unwrap();
    assert_eq!((p, c), (dec("-500"), dec("500")));
    assert_eq!(
        pricing::transfer(dec("0"), Account::Personal, Account::Company),
        Err(PricingError::InvalidTransferAmount(Decimal::ZERO))
    );
    assert_eq!(
        pricing::transfer(dec("1"), Account::Company, Account::Company),
        Err(PricingError::SameAccount)
    );
}

#[test]
fn unsellable_items_cannot_be_sold() {
    let pickaxe = Item {
        can_sell: false,
        ..item("Pickaxe", "Tools", 1200, "150")
    };
    assert_eq!(
        pricing::price(&sale(Account::Company, 1), &pickaxe, &skills(0, 0)),
        Err(PricingError::NotSellable("Pickaxe".into()))
    );
}

#[test]
fn fuel_needs_a_purchasable_item() {
    let diesel = Item {
        can_buy: false,
        ..item("Diesel", "Fuel", 100, "0")
    };
    let req = PriceRequest {
        kind: TransactionKind::Fuel,
        account: Account::Company,
        quantity: 5,
        base_price: None,
    };
    assert_eq!(
        pricing::price(&req, &diesel, &skills(0, 0)),
        Err(PricingError::NotPurchasable("Diesel".into()))
    );
}

#[test]
fn transfers_and_openings_are_not_priced() {
    let ore = item("Iron Ore", "Resources - Ore", 10, "5");
    for (kind, name) in [
        (TransactionKind::Transfer, "Transfer"),
        (TransactionKind::Opening, "Opening"),
    ] {
        let req = PriceRequest {
            kind,
            account: Account::Personal,
            quantity: 1,
            base_price: None,
        };
        assert_eq!(
            pricing::price(&req, &ore, &skills(0, 0)),
            Err(PricingError::NotPriceable(name))
        );
        assert_eq!(
            pricing::price_line(kind, "", Account::Company, 1, dec("10")),
            Err(PricingError::NotPriceable(name))
        );
    }
}

#[test]
fn oversized_totals_are_an_error() {
    let huge = dec("79228162514264337593543950");
    assert_eq!(
        pricing::line_total(huge, 2000),
        Err(PricingError::Overflow {
            unit_price: huge,
            quantity: 2000
        })
    );
    let gold = item("Gold", "Refined", 0, "79228162514264337593543950");
    assert!(matches!(
        pricing::price(&sale(Account::Personal, 2000), &gold, &skills(0, 0)),
        Err(PricingError::Overflow { .. })
    ));
}
