#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};
    use timecap::db::db::Db;
    use timecap::db::migrations::MigrationManager;

    struct MigrationTestContext {
        _temp_dir: TempDir,
    }

    impl TestContext for MigrationTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            std::env::set_var("HOME", temp_dir.path());
            std::env::set_var("LOCALAPPDATA", temp_dir.path());
            MigrationTestContext { _temp_dir: temp_dir }
        }
    }

    fn table_exists(conn: &rusqlite::Connection, name: &str) -> bool {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [name],
            |row| row.get::<_, i64>(0),
        )
        .unwrap()
            > 0
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_migrations_create_schema(_ctx: &mut MigrationTestContext) {
        let db = Db::new().unwrap();
        assert!(table_exists(&db.conn, "action_queue"));
        assert!(table_exists(&db.conn, "sessions"));
        assert!(table_exists(&db.conn, "migrations"));
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_migrations_are_idempotent(_ctx: &mut MigrationTestContext) {
        let mut db = Db::new().unwrap();

        // Running the manager again must not fail or duplicate anything.
        MigrationManager::new().run_migrations(&mut db.conn).unwrap();

        let applied: i64 = db.conn.query_row("SELECT COUNT(*) FROM migrations", [], |row| row.get(0)).unwrap();
        assert_eq!(applied, 2);
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_schema_survives_reopen(_ctx: &mut MigrationTestContext) {
        {
            let db = Db::new().unwrap();
            db.conn
                .execute(
                    "INSERT INTO action_queue (kind, payload, enqueued_at, retry_count, max_retries) VALUES ('screenshot-upload', '{}', '2026-01-01 10:00:00.000', 0, 3)",
                    [],
                )
                .unwrap();
        }

        let db = Db::new().unwrap();
        let count: i64 = db.conn.query_row("SELECT COUNT(*) FROM action_queue", [], |row| row.get(0)).unwrap();
        assert_eq!(count, 1);
    }
}
