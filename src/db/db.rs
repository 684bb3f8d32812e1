use crate::db::migrations::MigrationManager;
use crate::libs::data_storage::DataStorage;
use anyhow::Result;
use rusqlite::Connection;

pub const DB_FILE_NAME: &str = "timecap.db";

pub struct Db {
    pub conn: Connection,
}

impl Db {
    /// Opens the local database and brings the schema up to date.
    pub fn new() -> Result<Db> {
        let db_file_path = DataStorage::new().get_path(DB_FILE_NAME)?;
        let mut conn = Connection::open(db_file_path)?;

        MigrationManager::new().run_migrations(&mut conn)?;

        Ok(Db { conn })
    }
}
