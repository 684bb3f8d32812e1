#[cfg(test)]
mod tests {
    use chrono::Local;
    use parking_lot::Mutex;
    use std::cell::Cell;
    use std::rc::Rc;
    use std::sync::Arc;
    use tempfile::TempDir;
    use test_context::{test_context, AsyncTestContext};
    use timecap::api::{Gateway, GatewayError, TaskRef};
    use timecap::db::queue::ActionQueueStore;
    use timecap::libs::action::{ActionKind, ActionPayload, ScreenshotPayload};
    use timecap::libs::capture::{Capture, ScreenGrabber};
    use timecap::libs::network::NetIdentity;
    use timecap::libs::queue::ActionQueue;
    use timecap::libs::scheduler::CaptureScheduler;
    use timecap::libs::session::{Session, SharedSession};

    struct SchedulerTestContext {
        _temp_dir: TempDir,
    }

    impl AsyncTestContext for SchedulerTestContext {
        async fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            std::env::set_var("HOME", temp_dir.path());
            std::env::set_var("LOCALAPPDATA", temp_dir.path());
            SchedulerTestContext { _temp_dir: temp_dir }
        }
    }

    struct MockGateway {
        fail_uploads: Cell<bool>,
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
            if self.fail_uploads.get() {
                return Err(GatewayError::Transport("connection refused".to_string()));
            }
            Ok(())
        }

        async fn ping(&self) -> bool {
            true
        }
    }

    struct MockGrabber {
        fail: Cell<bool>,
        permission: Cell<bool>,
    }

    impl ScreenGrabber for MockGrabber {
        fn grab(&self) -> anyhow::Result<Capture> {
            if self.fail.get() {
                anyhow::bail!("no display");
            }
            Ok(Capture {
                image: vec![0xAA, 0xBB],
                captured_at: Local::now().naive_local(),
                permission_granted: self.permission.get(),
            })
        }
    }

    struct Harness {
        gateway: Rc<MockGateway>,
        grabber: Rc<MockGrabber>,
        queue: Arc<ActionQueue>,
        session: SharedSession,
        scheduler: Rc<CaptureScheduler<MockGateway, MockGrabber>>,
    }

    fn harness() -> Harness {
        let gateway = Rc::new(MockGateway {
            fail_uploads: Cell::new(false),
            upload_calls: Cell::new(0),
        });
        let grabber = Rc::new(MockGrabber {
            fail: Cell::new(false),
            permission: Cell::new(true),
        });
        let queue = ActionQueue::new(ActionQueueStore::new().unwrap(), 3);
        let session: SharedSession = Arc::new(Mutex::new(None));
        let scheduler = CaptureScheduler::new(
            Rc::clone(&gateway),
            Rc::clone(&grabber),
            Arc::clone(&queue),
            Arc::clone(&session),
        );
        Harness {
            gateway,
            grabber,
            queue,
            session,
            scheduler,
        }
    }

    fn active_session() -> Session {
        Session {
            id: 42,
            employee_id: 1,
            task_id: 7,
            start_time: Local::now().naive_local(),
            end_time: None,
            active: true,
        }
    }

    #[test_context(SchedulerTestContext)]
    #[tokio::test]
    async fn test_tick_uploads_immediately_when_online(_ctx: &mut SchedulerTestContext) {
        let h = harness();
        *h.session.lock() = Some(active_session());

        h.scheduler.tick().await;

        assert_eq!(h.gateway.upload_calls.get(), 1);
        assert_eq!(h.queue.size().unwrap(), 0);
    }

    #[test_context(SchedulerTestContext)]
    #[tokio::test]
    async fn test_failed_upload_lands_in_queue(_ctx: &mut SchedulerTestContext) {
        let h = harness();
        *h.session.lock() = Some(active_session());
        h.gateway.fail_uploads.set(true);

        h.scheduler.tick().await;

        let actions = h.queue.snapshot().unwrap();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].kind, ActionKind::ScreenshotUpload);
        assert_eq!(actions[0].retry_count, 0);
        match &actions[0].payload {
            ActionPayload::Screenshot(shot) => {
                assert_eq!(shot.session_id, 42);
                assert_eq!(shot.employee_id, 1);
                assert!(shot.permission);
                assert_eq!(shot.image_bytes().unwrap(), vec![0xAA, 0xBB]);
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test_context(SchedulerTestContext)]
    #[tokio::test]
    async fn test_tick_without_session_does_nothing(_ctx: &mut SchedulerTestContext) {
        let h = harness();

        h.scheduler.tick().await;

        assert_eq!(h.gateway.upload_calls.get(), 0);
        assert_eq!(h.queue.size().unwrap(), 0);
    }

    #[test_context(SchedulerTestContext)]
    #[tokio::test]
    async fn test_failed_capture_skips_tick(_ctx: &mut SchedulerTestContext) {
        let h = harness();
        *h.session.lock() = Some(active_session());
        h.grabber.fail.set(true);

        h.scheduler.tick().await;

        assert_eq!(h.gateway.upload_calls.get(), 0);
        assert_eq!(h.queue.size().unwrap(), 0);
    }

    #[test_context(SchedulerTestContext)]
    #[tokio::test]
    async fn test_denied_permission_still_uploads_flagged(_ctx: &mut SchedulerTestContext) {
        let h = harness();
        *h.session.lock() = Some(active_session());
        h.grabber.permission.set(false);
        h.gateway.fail_uploads.set(true);

        h.scheduler.tick().await;

        let actions = h.queue.snapshot().unwrap();
        assert_eq!(actions.len(), 1);
        match &actions[0].payload {
            ActionPayload::Screenshot(shot) => assert!(!shot.permission),
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test_context(SchedulerTestContext)]
    #[tokio::test]
    async fn test_broken_store_drops_frame_without_panic(_ctx: &mut SchedulerTestContext) {
        let h = harness();
        *h.session.lock() = Some(active_session());
        h.gateway.fail_uploads.set(true);

        // Break durable storage underneath the fallback enqueue: a second
        // handle on the same database drops the queue table.
        let saboteur = ActionQueueStore::new().unwrap();
        saboteur.conn.lock().execute("DROP TABLE action_queue", []).unwrap();

        // The tick reports the loss and completes instead of escalating.
        h.scheduler.tick().await;

        assert_eq!(h.gateway.upload_calls.get(), 1);
    }

    #[test_context(SchedulerTestContext)]
    #[tokio::test]
    async fn test_restart_replaces_timer(_ctx: &mut SchedulerTestContext) {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let h = harness();
                h.scheduler.start(5);
                assert!(h.scheduler.is_running());
                h.scheduler.start(10);
                assert!(h.scheduler.is_running());

                h.scheduler.stop();
                assert!(!h.scheduler.is_running());
            })
            .await;
    }

    #[test_context(SchedulerTestContext)]
    #[tokio::test]
    async fn test_stop_is_idempotent(_ctx: &mut SchedulerTestContext) {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let h = harness();
                h.scheduler.stop();
                h.scheduler.start(1);
                h.scheduler.stop();
                h.scheduler.stop();
                assert!(!h.scheduler.is_running());
            })
            .await;
    }
}
