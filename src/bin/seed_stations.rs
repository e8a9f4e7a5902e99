use std::path::Path;

use rand::Rng;
use rand::seq::SliceRandom;

use ev_charging_api::adapters::db::{
    clear_stations, insert_station, open_connection, run_migrations,
};
use ev_charging_api::domain::models::NewStationRecord;

const DEFAULT_STATION_COUNT: usize = 20;

const STREETS: &[&str] = &[
    "Main St",
    "Oak Ave",
    "Maple Dr",
    "Cedar Ln",
    "River Rd",
    "Hill Blvd",
    "Harbor St",
    "Station Way",
    "Sunset Ave",
    "Elm St",
];
const CITIES: &[&str] = &[
    "Springfield",
    "Riverton",
    "Lakewood",
    "Fairview",
    "Georgetown",
];
const STATUSES: &[&str] = &["available", "charging", "offline"];
const POWER_RATINGS_KW: &[f64] = &[22.0, 50.0, 150.0, 350.0];

fn main() {
    if let Err(error) = run() {
        eprintln!("failed to seed stations: {error}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let mut path = std::env::var("STATION_DB_PATH")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| "./data/stations.db".to_string());
    let mut count = DEFAULT_STATION_COUNT;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut index = 0;
    while index < args.len() {
        match args[index].as_str() {
            "--path" => {
                let Some(value) = args.get(index + 1) else {
                    return Err("--path requires a value".to_string());
                };
                path = value.clone();
                index += 2;
            }
            "--count" => {
                let Some(value) = args.get(index + 1) else {
                    return Err("--count requires a value".to_string());
                };
                count = value
                    .parse::<usize>()
                    .map_err(|_| "--count must be a valid number".to_string())?;
                index += 2;
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            other => {
                return Err(format!("unknown argument: {other}"));
            }
        }
    }

    let path_ref = Path::new(&path);
    if let Some(parent) = path_ref.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .map_err(|error| format!("failed to create parent directory: {error}"))?;
    }

    let mut connection = open_connection(&path).map_err(|error| error.to_string())?;
    run_migrations(&mut connection).map_err(|error| error.to_string())?;

    clear_stations(&connection).map_err(|error| error.to_string())?;
    println!("cleared existing station data");

    let mut rng = rand::thread_rng();
    for _ in 0..count {
        let street = STREETS.choose(&mut rng).copied().unwrap_or("Main St");
        let city = CITIES.choose(&mut rng).copied().unwrap_or("Springfield");
        let number = rng.gen_range(1..=999);
        let status = STATUSES.choose(&mut rng).copied().unwrap_or("available");
        let power_kw = POWER_RATINGS_KW.choose(&mut rng).copied().unwrap_or(50.0);

        let station = NewStationRecord {
            name: format!("{street} SuperCharger"),
            location: format!("{number} {street}, {city}"),
            status: status.to_string(),
            power_kw,
        };
        insert_station(&connection, &station).map_err(|error| error.to_string())?;
    }

    println!("inserted {count} stations into {path}");
    Ok(())
}

fn print_help() {
    println!("seed_stations");
    println!();
    println!("Truncates the stations table and repopulates it with sample data.");
    println!();
    println!("Usage:");
    println!("  cargo run --bin seed_stations -- [--path <file>] [--count <n>]");
    println!();
    println!("Options:");
    println!("  --path <file>   target sqlite file (default: $STATION_DB_PATH or ./data/stations.db)");
    println!("  --count <n>     number of stations to insert (default: 20)");
}
