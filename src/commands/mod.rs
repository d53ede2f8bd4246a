// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod settings;
pub mod items;
pub mod transactions;
pub mod reports;
pub mod inventory;
pub mod roi;
pub mod recipes;
pub mod locations;
pub mod budget;
pub mod sessions;
pub mod importer;
pub mod exporter;
pub mod doctor;
