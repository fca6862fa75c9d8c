//! CLI smoke entry point.
//!
//! # Responsibility
//! - Wire `tablekit_core` against an in-memory SQLite database.
//! - Print the stored rows as JSON for quick local sanity checks.
//!
//! Logging is enabled when `TABLEKIT_LOG_DIR` names an absolute directory;
//! `TABLEKIT_LOG_LEVEL` overrides the build-mode default level.

use log::info;
use std::error::Error;
use std::process::ExitCode;
use tablekit_core::db::open_db_in_memory;
use tablekit_core::{
    core_version, init_logging, ColumnType, Entity, EntityDescriptor, EntityRegistry, LogConfig,
    Table, TableConfig, Value,
};

const CARS_DDL: &str = "CREATE TABLE cars (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    make TEXT NOT NULL,
    model TEXT NOT NULL,
    hp INTEGER NOT NULL,
    modified TEXT NOT NULL,
    created TEXT NOT NULL
);";

fn main() -> ExitCode {
    if let Err(err) = setup_logging() {
        eprintln!("tablekit logging disabled: {err}");
    }

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("tablekit error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn setup_logging() -> Result<(), String> {
    let Ok(log_dir) = std::env::var("TABLEKIT_LOG_DIR") else {
        return Ok(());
    };
    let config = match std::env::var("TABLEKIT_LOG_LEVEL") {
        Ok(level) => LogConfig::new(level, log_dir),
        Err(_) => LogConfig::with_default_level(log_dir),
    };
    init_logging(&config)
}

fn run() -> Result<(), Box<dyn Error>> {
    println!("tablekit_core version={}", core_version());

    let mut registry = EntityRegistry::new();
    let car = registry.register(EntityDescriptor::new(
        "Car",
        [
            ("make", ColumnType::Text),
            ("model", ColumnType::Text),
            ("hp", ColumnType::Integer),
        ],
    ));

    let conn = open_db_in_memory()?;
    conn.execute_batch(CARS_DDL)?;

    let config = TableConfig::new("CarTable").table_name("cars").entity("Car");
    let cars = Table::try_new(&conn, &registry, &config)?;
    println!("{}", cars.command().insert_into());

    for (make, model, hp) in [("Ford", "Mustang", 435), ("Ford", "Fiesta", 70), ("Kia", "Rio", 84)] {
        let entity = Entity::new(
            &car,
            [
                ("make", Value::from(make)),
                ("model", Value::from(model)),
                ("hp", Value::from(hp)),
            ],
        )?;
        cars.insert(&entity)?;
    }

    let mut mustang = cars
        .find_by([("model", "Mustang")])?
        .into_iter()
        .next()
        .ok_or("inserted car not found")?;
    mustang.set("hp", 480)?;
    let updated = cars.update(&mut mustang)?;
    info!("event=cli_demo module=cli status=ok updated={updated}");

    for entity in cars.find_by([("make", "Ford")])? {
        println!("{}", serde_json::to_string(&entity.to_record())?);
    }

    Ok(())
}
