use rusqlite::Connection;

use crate::adapters::db::{open_connection, run_migrations};

/// Opens a throwaway on-disk database with the schema applied.
pub fn open_test_connection(name: &str) -> Connection {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let path = dir.path().join(name);
    std::mem::forget(dir);

    let mut connection =
        open_connection(path.to_string_lossy().as_ref()).expect("test db should open");
    run_migrations(&mut connection).expect("test migrations should succeed");
    connection
}
