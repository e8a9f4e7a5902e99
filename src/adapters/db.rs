use rusqlite::types::ToSql;
use rusqlite::{Connection, Row, params};
use thiserror::Error;

use crate::domain::models::{NewStationRecord, StationPatch, StationRecord};

pub const LATEST_SCHEMA_VERSION: u32 = 1;

const MIGRATIONS: &[(u32, &str)] = &[(
    1,
    r#"
CREATE TABLE IF NOT EXISTS stations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    location TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'available',
    power_kw REAL NOT NULL DEFAULT 50.0,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now'))
);

CREATE INDEX IF NOT EXISTS idx_stations_name
ON stations (name);
"#,
)];

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database operation failed: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("unsupported schema version {current}; latest supported is {latest}")]
    UnsupportedSchemaVersion { current: u32, latest: u32 },
    #[error("inserted station {id} could not be read back")]
    MissingInsertedRow { id: i64 },
}

pub fn open_connection(path: &str) -> Result<Connection, DbError> {
    Connection::open(path).map_err(DbError::from)
}

pub fn run_migrations(connection: &mut Connection) -> Result<(), DbError> {
    let current_version = schema_version(connection)?;

    if current_version > LATEST_SCHEMA_VERSION {
        return Err(DbError::UnsupportedSchemaVersion {
            current: current_version,
            latest: LATEST_SCHEMA_VERSION,
        });
    }

    let transaction = connection.transaction()?;

    for (version, sql) in MIGRATIONS {
        if *version > current_version {
            transaction.execute_batch(sql)?;
            transaction.pragma_update(None, "user_version", version)?;
        }
    }

    transaction.commit()?;

    Ok(())
}

pub fn schema_version(connection: &Connection) -> Result<u32, DbError> {
    let version = connection.pragma_query_value(None, "user_version", |row| row.get(0))?;
    Ok(version)
}

fn row_to_station(row: &Row<'_>) -> Result<StationRecord, rusqlite::Error> {
    Ok(StationRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        location: row.get(2)?,
        status: row.get(3)?,
        power_kw: row.get(4)?,
        created_at: row.get(5)?,
    })
}

pub fn insert_station(
    connection: &Connection,
    new_station: &NewStationRecord,
) -> Result<StationRecord, DbError> {
    connection.execute(
        "INSERT INTO stations (name, location, status, power_kw) VALUES (?1, ?2, ?3, ?4)",
        params![
            new_station.name,
            new_station.location,
            new_station.status,
            new_station.power_kw,
        ],
    )?;

    let id = connection.last_insert_rowid();
    get_station(connection, id)?.ok_or(DbError::MissingInsertedRow { id })
}

pub fn get_station(connection: &Connection, id: i64) -> Result<Option<StationRecord>, DbError> {
    let mut statement = connection.prepare(
        "SELECT id, name, location, status, power_kw, created_at
         FROM stations
         WHERE id = ?1",
    )?;

    let mut rows = statement.query(params![id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(row_to_station(row)?));
    }

    Ok(None)
}

pub fn list_stations(connection: &Connection) -> Result<Vec<StationRecord>, DbError> {
    let mut statement = connection.prepare(
        "SELECT id, name, location, status, power_kw, created_at
         FROM stations",
    )?;

    let rows = statement.query_map([], |row| row_to_station(row))?;

    let mut stations = Vec::new();
    for row in rows {
        stations.push(row?);
    }

    Ok(stations)
}

/// Applies only the fields present in the patch. `created_at` and `id` are
/// never part of the SET list.
pub fn update_station(
    connection: &Connection,
    id: i64,
    patch: &StationPatch,
) -> Result<Option<StationRecord>, DbError> {
    if patch.is_empty() {
        return get_station(connection, id);
    }

    let mut assignments: Vec<&str> = Vec::new();
    let mut values: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(name) = &patch.name {
        assignments.push("name = ?");
        values.push(Box::new(name.clone()));
    }
    if let Some(location) = &patch.location {
        assignments.push("location = ?");
        values.push(Box::new(location.clone()));
    }
    if let Some(status) = &patch.status {
        assignments.push("status = ?");
        values.push(Box::new(status.clone()));
    }
    if let Some(power_kw) = patch.power_kw {
        assignments.push("power_kw = ?");
        values.push(Box::new(power_kw));
    }
    values.push(Box::new(id));

    let sql = format!(
        "UPDATE stations SET {} WHERE id = ?",
        assignments.join(", ")
    );
    let params = values.iter().map(|value| value.as_ref());
    let changed = connection.execute(&sql, rusqlite::params_from_iter(params))?;

    if changed == 0 {
        return Ok(None);
    }

    get_station(connection, id)
}

pub fn delete_station(connection: &Connection, id: i64) -> Result<bool, DbError> {
    let changed = connection.execute("DELETE FROM stations WHERE id = ?1", params![id])?;
    Ok(changed > 0)
}

/// Empties the table and resets the AUTOINCREMENT counter so seeded ids
/// start from 1 again.
pub fn clear_stations(connection: &Connection) -> Result<(), DbError> {
    connection.execute("DELETE FROM stations", [])?;

    let has_sequence: i64 = connection.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='sqlite_sequence'",
        [],
        |row| row.get(0),
    )?;
    if has_sequence > 0 {
        connection.execute("DELETE FROM sqlite_sequence WHERE name = 'stations'", [])?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::domain::models::{NewStationRecord, StationPatch};

    use super::{
        LATEST_SCHEMA_VERSION, clear_stations, delete_station, get_station, insert_station,
        list_stations, open_connection, run_migrations, schema_version, update_station,
    };

    fn temp_db_path(name: &str) -> PathBuf {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let path = dir.path().join(name);
        std::mem::forget(dir);
        path
    }

    fn sample_station(name: &str) -> NewStationRecord {
        NewStationRecord {
            name: name.to_string(),
            location: "1 Main St".to_string(),
            status: "available".to_string(),
            power_kw: 50.0,
        }
    }

    #[test]
    fn migrates_fresh_database_to_latest_version() {
        let db_path = temp_db_path("fresh.sqlite");
        let mut connection =
            open_connection(db_path.to_string_lossy().as_ref()).expect("db connection should open");

        run_migrations(&mut connection).expect("migrations should succeed");

        let version = schema_version(&connection).expect("schema version should be queryable");
        assert_eq!(version, LATEST_SCHEMA_VERSION);

        let table_exists: i64 = connection
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='stations'",
                [],
                |row| row.get(0),
            )
            .expect("stations table check should work");
        assert_eq!(table_exists, 1);

        let index_exists: i64 = connection
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='index' AND name='idx_stations_name'",
                [],
                |row| row.get(0),
            )
            .expect("stations index check should work");
        assert_eq!(index_exists, 1);
    }

    #[test]
    fn migrations_are_idempotent() {
        let db_path = temp_db_path("idempotent.sqlite");
        let mut connection =
            open_connection(db_path.to_string_lossy().as_ref()).expect("db connection should open");

        run_migrations(&mut connection).expect("first migration run should succeed");
        run_migrations(&mut connection).expect("second migration run should succeed");

        let version = schema_version(&connection).expect("schema version should be queryable");
        assert_eq!(version, LATEST_SCHEMA_VERSION);
    }

    #[test]
    fn keeps_existing_data_when_migrations_rerun() {
        let db_path = temp_db_path("rerun.sqlite");
        let mut connection =
            open_connection(db_path.to_string_lossy().as_ref()).expect("db connection should open");

        run_migrations(&mut connection).expect("first migration run should succeed");
        insert_station(&connection, &sample_station("City Hall Charger 1"))
            .expect("insert should succeed");

        run_migrations(&mut connection).expect("second migration run should succeed");

        let stations = list_stations(&connection).expect("list should succeed");
        assert_eq!(stations.len(), 1);
    }

    #[test]
    fn insert_returns_materialized_row_with_storage_assigned_fields() {
        let db_path = temp_db_path("insert.sqlite");
        let mut connection =
            open_connection(db_path.to_string_lossy().as_ref()).expect("db connection should open");
        run_migrations(&mut connection).expect("migrations should succeed");

        let station = insert_station(&connection, &sample_station("City Hall Charger 1"))
            .expect("insert should succeed");

        assert_eq!(station.id, 1);
        assert_eq!(station.name, "City Hall Charger 1");
        assert_eq!(station.status, "available");
        assert_eq!(station.power_kw, 50.0);
        assert!(!station.created_at.is_empty());
    }

    #[test]
    fn duplicate_names_and_locations_are_permitted() {
        let db_path = temp_db_path("duplicates.sqlite");
        let mut connection =
            open_connection(db_path.to_string_lossy().as_ref()).expect("db connection should open");
        run_migrations(&mut connection).expect("migrations should succeed");

        let first = insert_station(&connection, &sample_station("Library Charger A"))
            .expect("first insert should succeed");
        let second = insert_station(&connection, &sample_station("Library Charger A"))
            .expect("second insert should succeed");

        assert_ne!(first.id, second.id);
    }

    #[test]
    fn get_returns_none_for_missing_id() {
        let db_path = temp_db_path("get-missing.sqlite");
        let mut connection =
            open_connection(db_path.to_string_lossy().as_ref()).expect("db connection should open");
        run_migrations(&mut connection).expect("migrations should succeed");

        let station = get_station(&connection, 999_999).expect("query should succeed");
        assert_eq!(station, None);
    }

    #[test]
    fn list_on_empty_table_returns_empty_vec() {
        let db_path = temp_db_path("list-empty.sqlite");
        let mut connection =
            open_connection(db_path.to_string_lossy().as_ref()).expect("db connection should open");
        run_migrations(&mut connection).expect("migrations should succeed");

        let stations = list_stations(&connection).expect("list should succeed");
        assert!(stations.is_empty());
    }

    #[test]
    fn update_touches_only_present_fields() {
        let db_path = temp_db_path("update-partial.sqlite");
        let mut connection =
            open_connection(db_path.to_string_lossy().as_ref()).expect("db connection should open");
        run_migrations(&mut connection).expect("migrations should succeed");

        let created = insert_station(&connection, &sample_station("City Hall Charger 1"))
            .expect("insert should succeed");

        let patch = StationPatch {
            status: Some("charging".to_string()),
            ..StationPatch::default()
        };
        let updated = update_station(&connection, created.id, &patch)
            .expect("update should succeed")
            .expect("station should exist");

        assert_eq!(updated.status, "charging");
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.location, created.location);
        assert_eq!(updated.power_kw, created.power_kw);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[test]
    fn empty_patch_is_a_noop_returning_current_row() {
        let db_path = temp_db_path("update-noop.sqlite");
        let mut connection =
            open_connection(db_path.to_string_lossy().as_ref()).expect("db connection should open");
        run_migrations(&mut connection).expect("migrations should succeed");

        let created = insert_station(&connection, &sample_station("City Hall Charger 1"))
            .expect("insert should succeed");

        let updated = update_station(&connection, created.id, &StationPatch::default())
            .expect("update should succeed")
            .expect("station should exist");

        assert_eq!(updated, created);
    }

    #[test]
    fn update_on_missing_id_returns_none() {
        let db_path = temp_db_path("update-missing.sqlite");
        let mut connection =
            open_connection(db_path.to_string_lossy().as_ref()).expect("db connection should open");
        run_migrations(&mut connection).expect("migrations should succeed");

        let patch = StationPatch {
            name: Some("renamed".to_string()),
            ..StationPatch::default()
        };
        let updated = update_station(&connection, 999_999, &patch).expect("update should succeed");
        assert_eq!(updated, None);
    }

    #[test]
    fn delete_removes_row_and_reports_missing_ids() {
        let db_path = temp_db_path("delete.sqlite");
        let mut connection =
            open_connection(db_path.to_string_lossy().as_ref()).expect("db connection should open");
        run_migrations(&mut connection).expect("migrations should succeed");

        let created = insert_station(&connection, &sample_station("City Hall Charger 1"))
            .expect("insert should succeed");

        assert!(delete_station(&connection, created.id).expect("delete should succeed"));
        assert_eq!(
            get_station(&connection, created.id).expect("query should succeed"),
            None
        );
        assert!(!delete_station(&connection, created.id).expect("second delete should succeed"));
    }

    #[test]
    fn clear_resets_the_autoincrement_sequence() {
        let db_path = temp_db_path("clear.sqlite");
        let mut connection =
            open_connection(db_path.to_string_lossy().as_ref()).expect("db connection should open");
        run_migrations(&mut connection).expect("migrations should succeed");

        insert_station(&connection, &sample_station("City Hall Charger 1"))
            .expect("insert should succeed");
        clear_stations(&connection).expect("clear should succeed");

        let station = insert_station(&connection, &sample_station("Library Charger A"))
            .expect("insert after clear should succeed");
        assert_eq!(station.id, 1);
    }

    #[test]
    fn clear_on_fresh_database_succeeds() {
        let db_path = temp_db_path("clear-fresh.sqlite");
        let mut connection =
            open_connection(db_path.to_string_lossy().as_ref()).expect("db connection should open");
        run_migrations(&mut connection).expect("migrations should succeed");

        clear_stations(&connection).expect("clear should succeed");
    }
}
