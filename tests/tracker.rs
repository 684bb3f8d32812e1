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
    use timecap::db::sessions::Sessions;
    use timecap::libs::action::ScreenshotPayload;
    use timecap::libs::capture::{Capture, ScreenGrabber};
    use timecap::libs::network::NetIdentity;
    use timecap::libs::queue::ActionQueue;
    use timecap::libs::scheduler::CaptureScheduler;
    use timecap::libs::session::{Session, SharedSession};
    use timecap::libs::tracker::{Tracker, TrackerState};

    struct TrackerTestContext {
        _temp_dir: TempDir,
    }

    impl AsyncTestContext for TrackerTestContext {
        async fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            std::env::set_var("HOME", temp_dir.path());
            std::env::set_var("LOCALAPPDATA", temp_dir.path());
            TrackerTestContext { _temp_dir: temp_dir }
        }
    }

    fn remote_session(id: i64) -> Session {
        Session {
            id,
            employee_id: 1,
            task_id: 7,
            start_time: Local::now().naive_local(),
            end_time: None,
            active: true,
        }
    }

    struct MockGateway {
        fail_create: Cell<bool>,
        fail_stop: Cell<bool>,
        remote_active: Mutex<Option<Session>>,
        create_calls: Cell<usize>,
    }

    impl MockGateway {
        fn new() -> Rc<Self> {
            Rc::new(Self {
                fail_create: Cell::new(false),
                fail_stop: Cell::new(false),
                remote_active: Mutex::new(None),
                create_calls: Cell::new(0),
            })
        }
    }

    impl Gateway for MockGateway {
        async fn create_session(&self, task_id: i64, _net: &NetIdentity) -> Result<Session, GatewayError> {
            self.create_calls.set(self.create_calls.get() + 1);
            if self.fail_create.get() {
                return Err(GatewayError::Transport("connection refused".to_string()));
            }
            let mut session = remote_session(42);
            session.task_id = task_id;
            Ok(session)
        }

        async fn stop_session(&self, session_id: i64) -> Result<Session, GatewayError> {
            if self.fail_stop.get() {
                return Err(GatewayError::Status {
                    status: 503,
                    body: "unavailable".to_string(),
                });
            }
            let mut session = remote_session(session_id);
            session.end_time = Some(Local::now().naive_local());
            session.active = false;
            Ok(session)
        }

        async fn active_session(&self, _employee_id: i64) -> Result<Option<Session>, GatewayError> {
            Ok(self.remote_active.lock().clone())
        }

        async fn resolve_task(&self, task_id: i64) -> Result<TaskRef, GatewayError> {
            Ok(TaskRef {
                id: task_id,
                project_id: 3,
                name: "review".to_string(),
            })
        }

        async fn upload_screenshot(&self, _shot: &ScreenshotPayload) -> Result<(), GatewayError> {
            Ok(())
        }

        async fn ping(&self) -> bool {
            true
        }
    }

    struct MockGrabber;

    impl ScreenGrabber for MockGrabber {
        fn grab(&self) -> anyhow::Result<Capture> {
            Ok(Capture {
                image: vec![1, 2, 3],
                captured_at: Local::now().naive_local(),
                permission_granted: true,
            })
        }
    }

    fn build_tracker(gateway: &Rc<MockGateway>) -> (Tracker<MockGateway, MockGrabber>, Rc<CaptureScheduler<MockGateway, MockGrabber>>) {
        let session: SharedSession = Arc::new(Mutex::new(None));
        let queue = ActionQueue::new(ActionQueueStore::new().unwrap(), 3);
        let scheduler = CaptureScheduler::new(Rc::clone(gateway), Rc::new(MockGrabber), queue, Arc::clone(&session));
        let tracker = Tracker::new(
            Rc::clone(gateway),
            Rc::clone(&scheduler),
            Sessions::new().unwrap(),
            session,
            1,
            5,
        );
        (tracker, scheduler)
    }

    #[test_context(TrackerTestContext)]
    #[tokio::test]
    async fn test_start_reaches_active_and_arms_scheduler(_ctx: &mut TrackerTestContext) {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let gateway = MockGateway::new();
                let (tracker, scheduler) = build_tracker(&gateway);
                assert_eq!(tracker.state(), TrackerState::Idle);

                let session = tracker.start(7).await.unwrap();
                assert_eq!(session.id, 42);
                assert_eq!(tracker.state(), TrackerState::Active);
                assert!(scheduler.is_running());
                assert_eq!(tracker.session().unwrap().id, 42);
            })
            .await;
    }

    #[test_context(TrackerTestContext)]
    #[tokio::test]
    async fn test_start_failure_reverts_to_idle(_ctx: &mut TrackerTestContext) {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let gateway = MockGateway::new();
                gateway.fail_create.set(true);
                let (tracker, scheduler) = build_tracker(&gateway);

                assert!(tracker.start(7).await.is_err());
                assert_eq!(tracker.state(), TrackerState::Idle);
                assert!(!scheduler.is_running());
                assert!(tracker.session().is_none());

                // Manual retry works once the remote recovers.
                gateway.fail_create.set(false);
                tracker.start(7).await.unwrap();
                assert_eq!(tracker.state(), TrackerState::Active);
            })
            .await;
    }

    #[test_context(TrackerTestContext)]
    #[tokio::test]
    async fn test_start_rejected_while_active(_ctx: &mut TrackerTestContext) {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let gateway = MockGateway::new();
                let (tracker, _scheduler) = build_tracker(&gateway);

                tracker.start(7).await.unwrap();
                assert!(tracker.start(8).await.is_err());
                assert_eq!(gateway.create_calls.get(), 1);
            })
            .await;
    }

    #[test_context(TrackerTestContext)]
    #[tokio::test]
    async fn test_stop_returns_to_idle(_ctx: &mut TrackerTestContext) {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let gateway = MockGateway::new();
                let (tracker, scheduler) = build_tracker(&gateway);

                tracker.start(7).await.unwrap();
                let stopped = tracker.stop().await.unwrap();
                assert_eq!(stopped.id, 42);
                assert_eq!(tracker.state(), TrackerState::Idle);
                assert!(!scheduler.is_running());
                assert!(tracker.session().is_none());

                // Local mirror is closed too.
                assert!(Sessions::new().unwrap().fetch_active().unwrap().is_none());
            })
            .await;
    }

    #[test_context(TrackerTestContext)]
    #[tokio::test]
    async fn test_stop_failure_stays_active(_ctx: &mut TrackerTestContext) {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let gateway = MockGateway::new();
                let (tracker, scheduler) = build_tracker(&gateway);

                tracker.start(7).await.unwrap();
                gateway.fail_stop.set(true);
                assert!(tracker.stop().await.is_err());
                assert_eq!(tracker.state(), TrackerState::Active);
                assert!(scheduler.is_running());
            })
            .await;
    }

    #[test_context(TrackerTestContext)]
    #[tokio::test]
    async fn test_reconcile_adopts_remote_session(_ctx: &mut TrackerTestContext) {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let gateway = MockGateway::new();
                *gateway.remote_active.lock() = Some(remote_session(42));
                let (tracker, scheduler) = build_tracker(&gateway);

                tracker.reconcile().await.unwrap();
                assert_eq!(tracker.state(), TrackerState::Active);
                assert_eq!(tracker.session().unwrap().id, 42);
                assert!(scheduler.is_running());
                // Recovery never creates a second session.
                assert_eq!(gateway.create_calls.get(), 0);
            })
            .await;
    }

    #[test_context(TrackerTestContext)]
    #[tokio::test]
    async fn test_reconcile_corrects_stale_local_state(_ctx: &mut TrackerTestContext) {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let gateway = MockGateway::new();
                let (tracker, _scheduler) = build_tracker(&gateway);

                // Mirror claims an active session the server does not know.
                Sessions::new().unwrap().upsert(&remote_session(99)).unwrap();

                tracker.reconcile().await.unwrap();
                assert_eq!(tracker.state(), TrackerState::Idle);
                assert!(Sessions::new().unwrap().fetch_active().unwrap().is_none());
            })
            .await;
    }

    #[test_context(TrackerTestContext)]
    #[tokio::test]
    async fn test_interval_change_only_while_idle(_ctx: &mut TrackerTestContext) {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let gateway = MockGateway::new();
                let (tracker, _scheduler) = build_tracker(&gateway);

                tracker.set_interval(10).unwrap();
                assert_eq!(tracker.interval_minutes(), 10);
                assert!(tracker.set_interval(0).is_err());
                assert!(tracker.set_interval(61).is_err());

                tracker.start(7).await.unwrap();
                assert!(tracker.set_interval(15).is_err());
                assert_eq!(tracker.interval_minutes(), 10);
            })
            .await;
    }

    #[test_context(TrackerTestContext)]
    #[tokio::test]
    async fn test_logout_forces_idle_despite_stop_error(_ctx: &mut TrackerTestContext) {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let gateway = MockGateway::new();
                let (tracker, scheduler) = build_tracker(&gateway);

                tracker.start(7).await.unwrap();
                gateway.fail_stop.set(true);

                tracker.stop_for_logout().await.unwrap();
                assert_eq!(tracker.state(), TrackerState::Idle);
                assert!(!scheduler.is_running());
                assert!(tracker.session().is_none());
            })
            .await;
    }
}
