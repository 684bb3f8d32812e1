#[cfg(test)]
mod tests {
    use chrono::Local;
    use std::cell::Cell;
    use std::rc::Rc;
    use tempfile::TempDir;
    use test_context::{test_context, AsyncTestContext};
    use timecap::api::{Gateway, GatewayError, TaskRef};
    use timecap::db::queue::ActionQueueStore;
    use timecap::libs::action::{ActionPayload, ScreenshotPayload};
    use timecap::libs::connectivity::ConnectivityMonitor;
    use timecap::libs::network::NetIdentity;
    use timecap::libs::queue::ActionQueue;
    use timecap::libs::session::Session;

    struct ConnectivityTestContext {
        _temp_dir: TempDir,
    }

    impl AsyncTestContext for ConnectivityTestContext {
        async fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            std::env::set_var("HOME", temp_dir.path());
            std::env::set_var("LOCALAPPDATA", temp_dir.path());
            ConnectivityTestContext { _temp_dir: temp_dir }
        }
    }

    struct MockGateway {
        reachable: Cell<bool>,
        upload_calls: Cell<usize>,
    }

    impl Gateway for MockGateway {
        async fn create_session(&self, _task_id: i64, _net: &NetIdentity) -> Result<Session, GatewayError> {
            Err(GatewayError::Transport("not under test".to_string()))
        }

        async fn stop_session(&self, _session_id: i64) -> Result<Session, GatewayError> {
            Err(GatewayError::Transport("not under test".to_string()))
        }

        async fn active_session(&self, _employee_id: i64) -> Result<Option<Session>, GatewayError> {
            Ok(None)
        }

        async fn resolve_task(&self, task_id: i64) -> Result<TaskRef, GatewayError> {
            Ok(TaskRef {
                id: task_id,
                project_id: 1,
                name: "task".to_string(),
            })
        }

        async fn upload_screenshot(&self, _shot: &ScreenshotPayload) -> Result<(), GatewayError> {
            self.upload_calls.set(self.upload_calls.get() + 1);
            if !self.reachable.get() {
                return Err(GatewayError::Transport("connection refused".to_string()));
            }
            Ok(())
        }

        async fn ping(&self) -> bool {
            self.reachable.get()
        }
    }

    fn screenshot_payload() -> ActionPayload {
        let mut payload = ScreenshotPayload {
            image_b64: String::new(),
            employee_id: 1,
            session_id: 42,
            permission: true,
            ip: None,
            mac: None,
            captured_at: Local::now().naive_local(),
        };
        payload.set_image_bytes(&[1, 2, 3]);
        ActionPayload::Screenshot(payload)
    }

    #[test_context(ConnectivityTestContext)]
    #[tokio::test]
    async fn test_online_edge_drains_queue(_ctx: &mut ConnectivityTestContext) {
        let gateway = Rc::new(MockGateway {
            reachable: Cell::new(false),
            upload_calls: Cell::new(0),
        });
        let queue = ActionQueue::new(ActionQueueStore::new().unwrap(), 3);
        queue.enqueue(&screenshot_payload()).unwrap();
        queue.enqueue(&screenshot_payload()).unwrap();

        let monitor = ConnectivityMonitor::new(Rc::clone(&gateway), std::sync::Arc::clone(&queue), 15, 30);

        // Offline probe: no drain, flag stays down.
        assert!(!monitor.probe_once().await);
        assert!(!monitor.is_online());
        assert_eq!(monitor.queue_size().unwrap(), 2);
        assert_eq!(gateway.upload_calls.get(), 0);

        // Transition to online drains both queued actions.
        gateway.reachable.set(true);
        assert!(monitor.probe_once().await);
        assert!(monitor.is_online());
        assert_eq!(monitor.queue_size().unwrap(), 0);
        assert_eq!(gateway.upload_calls.get(), 2);
    }

    #[test_context(ConnectivityTestContext)]
    #[tokio::test]
    async fn test_steady_online_probe_does_not_redrain(_ctx: &mut ConnectivityTestContext) {
        let gateway = Rc::new(MockGateway {
            reachable: Cell::new(true),
            upload_calls: Cell::new(0),
        });
        let queue = ActionQueue::new(ActionQueueStore::new().unwrap(), 3);
        let monitor = ConnectivityMonitor::new(Rc::clone(&gateway), std::sync::Arc::clone(&queue), 15, 30);

        assert!(monitor.probe_once().await);
        queue.enqueue(&screenshot_payload()).unwrap();

        // Already online: the probe alone does not drain, that is the
        // safety-net timer's job.
        assert!(monitor.probe_once().await);
        assert_eq!(monitor.queue_size().unwrap(), 1);
        assert_eq!(gateway.upload_calls.get(), 0);
    }

    #[test_context(ConnectivityTestContext)]
    #[tokio::test]
    async fn test_offline_transition_flips_flag(_ctx: &mut ConnectivityTestContext) {
        let gateway = Rc::new(MockGateway {
            reachable: Cell::new(true),
            upload_calls: Cell::new(0),
        });
        let queue = ActionQueue::new(ActionQueueStore::new().unwrap(), 3);
        let monitor = ConnectivityMonitor::new(Rc::clone(&gateway), std::sync::Arc::clone(&queue), 15, 30);

        assert!(monitor.probe_once().await);
        gateway.reachable.set(false);
        assert!(!monitor.probe_once().await);
        assert!(!monitor.is_online());
    }
}
