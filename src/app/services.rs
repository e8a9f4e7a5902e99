use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use thiserror::Error;

use crate::adapters::db;
use crate::adapters::db::DbError;
use crate::domain::models::{NewStationRecord, StationPatch, StationRecord};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("station {0} not found")]
    StationNotFound(i64),
    #[error("database lock poisoned")]
    DbLockPoisoned,
    #[error("database operation failed: {0}")]
    Database(#[from] DbError),
}

/// The station directory's persistence contract. The entity shape stays in
/// `domain::models`; this trait is the only query interface handlers see.
pub trait StationRepository {
    fn create_station(
        &self,
        new_station: &NewStationRecord,
    ) -> Result<StationRecord, ServiceError>;
    fn list_stations(&self) -> Result<Vec<StationRecord>, ServiceError>;
    fn get_station(&self, id: i64) -> Result<StationRecord, ServiceError>;
    fn update_station(
        &self,
        id: i64,
        patch: &StationPatch,
    ) -> Result<StationRecord, ServiceError>;
    fn delete_station(&self, id: i64) -> Result<(), ServiceError>;
}

#[derive(Clone)]
pub struct SqliteStationStore {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteStationStore {
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn with_connection<T>(
        &self,
        op: impl FnOnce(&Connection) -> Result<T, DbError>,
    ) -> Result<T, ServiceError> {
        let connection = self
            .connection
            .lock()
            .map_err(|_| ServiceError::DbLockPoisoned)?;
        op(&connection).map_err(ServiceError::from)
    }
}

impl StationRepository for SqliteStationStore {
    fn create_station(
        &self,
        new_station: &NewStationRecord,
    ) -> Result<StationRecord, ServiceError> {
        self.with_connection(|connection| db::insert_station(connection, new_station))
    }

    fn list_stations(&self) -> Result<Vec<StationRecord>, ServiceError> {
        self.with_connection(db::list_stations)
    }

    fn get_station(&self, id: i64) -> Result<StationRecord, ServiceError> {
        self.with_connection(|connection| db::get_station(connection, id))?
            .ok_or(ServiceError::StationNotFound(id))
    }

    fn update_station(
        &self,
        id: i64,
        patch: &StationPatch,
    ) -> Result<StationRecord, ServiceError> {
        self.with_connection(|connection| db::update_station(connection, id, patch))?
            .ok_or(ServiceError::StationNotFound(id))
    }

    fn delete_station(&self, id: i64) -> Result<(), ServiceError> {
        let removed = self.with_connection(|connection| db::delete_station(connection, id))?;
        if removed {
            Ok(())
        } else {
            Err(ServiceError::StationNotFound(id))
        }
    }
}
