#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};
    use timecap::api::TrackerConfig;
    use timecap::libs::config::{CaptureConfig, Config};

    struct ConfigTestContext {
        _temp_dir: TempDir,
    }

    impl TestContext for ConfigTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            std::env::set_var("HOME", temp_dir.path());
            std::env::set_var("LOCALAPPDATA", temp_dir.path());
            ConfigTestContext { _temp_dir: temp_dir }
        }
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_read_missing_file_yields_default(_ctx: &mut ConfigTestContext) {
        let config = Config::read().unwrap();
        assert!(config.tracker.is_none());
        assert!(config.capture.is_none());
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_save_and_read_round_trip(_ctx: &mut ConfigTestContext) {
        let config = Config {
            tracker: Some(TrackerConfig {
                api_url: "https://tracker.example.com".to_string(),
                email: "user@example.com".to_string(),
                employee_id: Some(1),
            }),
            capture: Some(CaptureConfig {
                interval_minutes: 10,
                max_retries: 5,
                drain_interval_secs: 60,
                probe_interval_secs: 20,
            }),
        };
        config.save().unwrap();

        let loaded = Config::read().unwrap();
        assert_eq!(loaded.tracker, config.tracker);
        assert_eq!(loaded.capture, config.capture);
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_capture_defaults(_ctx: &mut ConfigTestContext) {
        let capture = CaptureConfig::default();
        assert_eq!(capture.interval_minutes, 5);
        assert_eq!(capture.max_retries, 3);
        assert_eq!(capture.drain_interval_secs, 30);
        assert_eq!(capture.probe_interval_secs, 15);
        capture.validate().unwrap();
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_interval_bounds(_ctx: &mut ConfigTestContext) {
        let mut capture = CaptureConfig::default();
        capture.interval_minutes = 0;
        assert!(capture.validate().is_err());
        capture.interval_minutes = 61;
        assert!(capture.validate().is_err());
        capture.interval_minutes = 1;
        capture.validate().unwrap();
        capture.interval_minutes = 60;
        capture.validate().unwrap();
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_delete_removes_file(_ctx: &mut ConfigTestContext) {
        Config::default().save().unwrap();
        Config::delete().unwrap();
        let config = Config::read().unwrap();
        assert!(config.tracker.is_none());

        // Deleting again is a no-op.
        Config::delete().unwrap();
    }
}
