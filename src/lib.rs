// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod cli;
pub mod db;
pub mod error;
pub mod models;
pub mod utils;
pub mod settings;
pub mod store;
pub mod pricing;
pub mod ledger;
pub mod catalog;
pub mod inventory;
pub mod roi;
pub mod production;
pub mod locations;
pub mod budget;
pub mod sessions;
pub mod commands;
