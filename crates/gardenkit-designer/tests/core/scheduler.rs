use gardenkit_designer::{FrameClock, FrameId, ManualClock, RedrawScheduler};

#[test]
fn test_five_requests_run_one_frame_then_one_follow_up() {
    let mut scheduler = RedrawScheduler::new(ManualClock::new());
    let mut passes = 0;

    assert!(scheduler.request_redraw());
    for _ in 0..4 {
        assert!(!scheduler.request_redraw());
    }
    let due = scheduler.clock_mut().take_due();
    assert_eq!(due.len(), 1);
    for id in due {
        scheduler.run_frame(id, || passes += 1);
    }
    assert_eq!(passes, 1);

    let due = scheduler.clock_mut().take_due();
    assert_eq!(due.len(), 1);
    for id in due {
        scheduler.run_frame(id, || passes += 1);
    }
    assert_eq!(passes, 2);

    assert!(scheduler.clock_mut().take_due().is_empty());
    assert!(!scheduler.is_frame_requested());
    assert_eq!(scheduler.frames_run(), 2);
}

#[test]
fn test_request_during_frame_is_deferred_not_lost() {
    let mut scheduler = RedrawScheduler::default();
    scheduler.request_redraw();
    let id = scheduler.clock_mut().take_due()[0];

    assert!(scheduler.begin_frame(id));
    for _ in 0..5 {
        scheduler.request_redraw();
    }
    assert!(scheduler.clock().scheduled().is_empty());
    scheduler.end_frame();

    assert_eq!(scheduler.clock().scheduled().len(), 1);
    assert!(!scheduler.is_redraw_pending());
}

#[test]
fn test_single_request_runs_exactly_once() {
    let mut scheduler = RedrawScheduler::default();
    scheduler.request_redraw();
    let id = scheduler.clock_mut().take_due()[0];
    assert!(scheduler.run_frame(id, || {}));
    assert!(scheduler.clock_mut().take_due().is_empty());
}

#[test]
fn test_stale_frame_is_ignored() {
    let mut scheduler = RedrawScheduler::default();
    scheduler.request_redraw();
    let id = scheduler.clock_mut().take_due()[0];
    assert!(scheduler.run_frame(id, || {}));
    assert!(!scheduler.run_frame(id, || panic!("stale frame drew")));
    assert!(!scheduler.begin_frame(FrameId::new(999)));
}

#[test]
fn test_teardown_cancels_pending_frame() {
    let mut scheduler = RedrawScheduler::default();
    scheduler.request_redraw();
    let id = scheduler.pending_frame().unwrap();

    scheduler.teardown();
    assert_eq!(scheduler.clock().cancelled(), 1);
    assert!(scheduler.clock().scheduled().is_empty());
    assert!(!scheduler.run_frame(id, || panic!("drew after teardown")));
    assert!(!scheduler.request_redraw());
    assert!(scheduler.is_torn_down());
}

#[derive(Default)]
struct CountingClock {
    requested: Vec<FrameId>,
    cancelled: Vec<FrameId>,
}

impl FrameClock for CountingClock {
    fn request_frame(&mut self) -> FrameId {
        let id = FrameId::new(100 + self.requested.len() as u64);
        self.requested.push(id);
        id
    }

    fn cancel_frame(&mut self, id: FrameId) {
        self.cancelled.push(id);
    }
}

#[test]
fn test_custom_clock() {
    let mut scheduler = RedrawScheduler::new(CountingClock::default());
    scheduler.request_redraw();
    scheduler.request_redraw();
    assert_eq!(scheduler.clock().requested, vec![FrameId::new(100)]);
    scheduler.teardown();
    assert_eq!(scheduler.clock().cancelled, vec![FrameId::new(100)]);
}
