// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn path_arg() -> Arg {
    Arg::new("path")
        .long("path")
        .required(true)
        .help("CSV file to read")
}

fn id_arg() -> Arg {
    Arg::new("id")
        .long("id")
        .required(true)
        .value_parser(value_parser!(i64))
}

pub fn build_cli() -> Command {
    Command::new("orebook")
        .version(crate_version!())
        .about("Ledger, pricing and production bookkeeping for mining-simulation playthroughs")
        .subcommand(Command::new("init").about("Create the database if missing"))
        .subcommand(
            Command::new("settings")
                .about("Opening balances, skill levels and game dates")
                .subcommand(json_flags(Command::new("show")))
                .subcommand(
                    Command::new("set")
                        .arg(
                            Arg::new("vn")
                                .long("vn")
                                .value_parser(value_parser!(u8))
                                .help("Vendor Negotiation level (0-7)"),
                        )
                        .arg(
                            Arg::new("if")
                                .long("if")
                                .value_parser(value_parser!(u8))
                                .help("Investment Forecasting level (0-6)"),
                        )
                        .arg(Arg::new("opening_personal").long("opening-personal"))
                        .arg(Arg::new("opening_company").long("opening-company"))
                        .arg(Arg::new("start_date").long("start-date"))
                        .arg(Arg::new("date").long("date").help("Current in-game date"))
                        .arg(
                            Arg::new("undo_depth")
                                .long("undo-depth")
                                .value_parser(value_parser!(usize)),
                        ),
                ),
        )
        .subcommand(
            Command::new("item")
                .about("Reference catalog")
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("buyable")
                                .long("buyable")
                                .action(ArgAction::SetTrue),
                        )
                        .arg(
                            Arg::new("sellable")
                                .long("sellable")
                                .action(ArgAction::SetTrue),
                        ),
                ))
                .subcommand(json_flags(
                    Command::new("show").arg(Arg::new("name").long("name").required(true)),
                )),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and manage ledger transactions")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .help("Purchase, Sale or Fuel"),
                        )
                        .arg(Arg::new("item").long("item").required(true))
                        .arg(
                            Arg::new("qty")
                                .long("qty")
                                .value_parser(value_parser!(i64))
                                .allow_negative_numbers(true)
                                .default_value("1"),
                        )
                        .arg(
                            Arg::new("account")
                                .long("account")
                                .default_value("Personal"),
                        )
                        .arg(
                            Arg::new("price")
                                .long("price")
                                .help("Base unit price; defaults to the catalog price"),
                        )
                        .arg(Arg::new("location").long("location"))
                        .arg(Arg::new("notes").long("notes")),
                )
                .subcommand(
                    Command::new("transfer")
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(Arg::new("from").long("from").required(true))
                        .arg(Arg::new("to").long("to").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("notes").long("notes")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(Arg::new("month").long("month"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("type").long("type"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("rm").arg(
                        Arg::new("id")
                            .long("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                )
                .subcommand(Command::new("undo").about("Revert the latest add or delete"))
                .subcommand(Command::new("redo").about("Reapply the latest undone change")),
        )
        .subcommand(
            Command::new("report")
                .about("Balances and totals derived from the ledger")
                .subcommand(json_flags(Command::new("balances")))
                .subcommand(json_flags(Command::new("totals")))
                .subcommand(json_flags(Command::new("categories")))
                .subcommand(json_flags(
                    Command::new("cashflow").arg(
                        Arg::new("months")
                            .long("months")
                            .value_parser(value_parser!(usize))
                            .default_value("12"),
                    ),
                )),
        )
        .subcommand(json_flags(
            Command::new("inventory")
                .about("Stock on hand derived from purchases and sales")
                .arg(Arg::new("status").long("status").help("Empty, Low, Good or High")),
        ))
        .subcommand(
            Command::new("roi")
                .about("Track investments and their revenue")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("cost").long("cost").required(true))
                        .arg(Arg::new("date").long("date").required(true)),
                )
                .subcommand(
                    Command::new("revenue")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(json_flags(Command::new("list"))),
        )
        .subcommand(
            Command::new("recipe")
                .about("Crafting recipes, material chains and profitability")
                .subcommand(json_flags(
                    Command::new("list").arg(Arg::new("workbench").long("workbench")),
                ))
                .subcommand(json_flags(
                    Command::new("chain")
                        .arg(Arg::new("output").long("output").required(true))
                        .arg(
                            Arg::new("qty")
                                .long("qty")
                                .value_parser(value_parser!(i64))
                                .default_value("1"),
                        )
                        .arg(
                            Arg::new("raw")
                                .long("raw")
                                .action(ArgAction::SetTrue)
                                .help("Only print summed raw materials"),
                        ),
                ))
                .subcommand(json_flags(
                    Command::new("analyse").arg(
                        Arg::new("limit")
                            .long("limit")
                            .value_parser(value_parser!(usize)),
                    ),
                )),
        )
        .subcommand(
            Command::new("location")
                .about("Maps, location types and named locations")
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(Arg::new("map").long("map"))
                        .arg(Arg::new("type").long("type")),
                ))
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("map").long("map"))
                        .arg(
                            Arg::new("abbrev")
                                .long("abbrev")
                                .requires("map")
                                .help("Map abbreviation when the map is new"),
                        )
                        .arg(Arg::new("type").long("type").help("e.g. Base, Mine Site, Stockpile")),
                )
                .subcommand(Command::new("rm").arg(Arg::new("name").long("name").required(true)))
                .subcommand(json_flags(Command::new("maps"))),
        )
        .subcommand(
            Command::new("budget")
                .about("Plan purchases against the Personal balance")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("item").long("item").required(true))
                        .arg(
                            Arg::new("qty")
                                .long("qty")
                                .value_parser(value_parser!(i64))
                                .allow_negative_numbers(true)
                                .default_value("1"),
                        )
                        .arg(
                            Arg::new("price")
                                .long("price")
                                .help("Unit price; defaults to the discounted catalog buy price"),
                        )
                        .arg(
                            Arg::new("priority")
                                .long("priority")
                                .default_value("Medium")
                                .help("Critical, High, Medium or Low"),
                        )
                        .arg(Arg::new("notes").long("notes")),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(json_flags(Command::new("overview")))
                .subcommand(Command::new("include").arg(id_arg()))
                .subcommand(Command::new("exclude").arg(id_arg()))
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("session")
                .about("Hauling and processing sessions")
                .subcommand(
                    Command::new("haul")
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(Arg::new("location").long("location").required(true))
                        .arg(Arg::new("vehicle").long("vehicle").required(true))
                        .arg(
                            Arg::new("loads")
                                .long("loads")
                                .required(true)
                                .value_parser(value_parser!(i64))
                                .allow_negative_numbers(true),
                        )
                        .arg(Arg::new("hours").long("hours").default_value("0"))
                        .arg(Arg::new("stockpile").long("stockpile"))
                        .arg(Arg::new("notes").long("notes")),
                )
                .subcommand(
                    Command::new("process")
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(Arg::new("processor").long("processor").required(true))
                        .arg(Arg::new("material").long("material").required(true))
                        .arg(
                            Arg::new("volume")
                                .long("volume")
                                .required(true)
                                .help("Input volume in cubic yards"),
                        )
                        .arg(
                            Arg::new("ores")
                                .long("ores")
                                .default_value("")
                                .help("Name:qty@price;... (price defaults to the catalog sell price)"),
                        )
                        .arg(Arg::new("cost").long("cost").default_value("0"))
                        .arg(Arg::new("notes").long("notes")),
                )
                .subcommand(json_flags(
                    Command::new("list").arg(
                        Arg::new("kind")
                            .long("kind")
                            .default_value("haul")
                            .help("haul or process"),
                    ),
                ))
                .subcommand(json_flags(Command::new("totals")))
                .subcommand(json_flags(Command::new("vehicles")))
                .subcommand(
                    Command::new("rm")
                        .arg(Arg::new("kind").long("kind").required(true).help("haul or process"))
                        .arg(id_arg()),
                ),
        )
        .subcommand(
            Command::new("import")
                .about("Import reference data, ledger rows, recipes, locations or vehicles from CSV")
                .subcommand(Command::new("items").arg(path_arg()))
                .subcommand(Command::new("ledger").arg(path_arg()))
                .subcommand(Command::new("recipes").arg(path_arg()))
                .subcommand(Command::new("locations").arg(path_arg()))
                .subcommand(Command::new("vehicles").arg(path_arg())),
        )
        .subcommand(
            Command::new("export")
                .about("Export the ledger")
                .subcommand(
                    Command::new("ledger")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv or json"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Check stored data for inconsistencies"))
}
