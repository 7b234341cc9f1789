//! Debounced scroll reporting
//!
//! Grids fire scroll callbacks on every frame of a scroll gesture. Reporting
//! each one would flood the buffer, so the tracker waits for a quiet period
//! and reports once, trailing edge:
//!
//! ```text
//! Idle ──scroll──▶ Pending(timer) ──scroll──▶ Pending(timer re-armed)
//!                        │
//!                        └── quiet period elapses ──▶ emit grid_scrolled ──▶ Idle
//! ```
//!
//! The timer is a tokio task. Re-arming aborts the previous task before a new
//! one is spawned, and every task carries a generation number so a task that
//! already woke up but was superseded cannot emit. Tearing the tracker down
//! (grid unmounted) aborts any pending task.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::events::{EventPayload, GridScrolled, ScrollDirection};
use crate::grid::GridSlot;
use crate::telemetry::TelemetryService;

/// Default quiet period before a scroll is reported
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// A raw scroll callback from the grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollEvent {
    pub direction: ScrollDirection,
    pub top: f64,
    pub left: f64,
}

impl ScrollEvent {
    pub fn vertical(top: f64) -> Self {
        Self {
            direction: ScrollDirection::Vertical,
            top,
            left: 0.0,
        }
    }

    pub fn horizontal(left: f64) -> Self {
        Self {
            direction: ScrollDirection::Horizontal,
            top: 0.0,
            left,
        }
    }
}

#[derive(Debug)]
enum TrackerState {
    Idle,
    Pending { generation: u64, timer: JoinHandle<()> },
}

#[derive(Debug)]
struct Inner {
    state: TrackerState,
    next_generation: u64,
}

/// Trailing-edge debouncer that turns scroll bursts into `grid_scrolled` events
pub struct ScrollTracker {
    inner: Arc<Mutex<Inner>>,
    service: Arc<TelemetryService>,
    grid: GridSlot,
    debounce: Duration,
}

impl ScrollTracker {
    pub fn new(service: Arc<TelemetryService>, grid: GridSlot, debounce: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                state: TrackerState::Idle,
                next_generation: 0,
            })),
            service,
            grid,
            debounce,
        }
    }

    fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
        inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record a scroll callback, (re)arming the quiet-period timer
    ///
    /// Must be called from within a tokio runtime; outside one the scroll is
    /// dropped with a warning.
    pub fn on_scroll(&self, event: ScrollEvent) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("Scroll ignored: no async runtime to schedule the debounce timer");
            return;
        };

        let mut inner = Self::lock(&self.inner);
        if let TrackerState::Pending { timer, .. } =
            std::mem::replace(&mut inner.state, TrackerState::Idle)
        {
            timer.abort();
        }

        let generation = inner.next_generation;
        inner.next_generation += 1;

        let shared = self.inner.clone();
        let service = self.service.clone();
        let grid = self.grid.clone();
        let debounce = self.debounce;
        let timer = runtime.spawn(async move {
            tokio::time::sleep(debounce).await;
            Self::fire(&shared, generation, &service, &grid, event);
        });

        inner.state = TrackerState::Pending { generation, timer };
        tracing::trace!(generation, "Scroll debounce armed");
    }

    /// Timer callback: emit against the grid state at fire time
    ///
    /// The tracker lock is held until the event is sent, so `teardown` waits
    /// for an in-flight emission and nothing is emitted once it returns.
    fn fire(
        inner: &Mutex<Inner>,
        generation: u64,
        service: &TelemetryService,
        grid: &GridSlot,
        event: ScrollEvent,
    ) {
        let mut inner = Self::lock(inner);
        let armed = match &inner.state {
            TrackerState::Pending { generation, .. } => Some(*generation),
            TrackerState::Idle => None,
        };
        // Superseded or torn down
        if armed != Some(generation) {
            return;
        }
        inner.state = TrackerState::Idle;

        let Some(surface) = grid.current() else {
            tracing::debug!("Scroll debounce fired with no grid attached");
            return;
        };

        let first = surface.first_displayed_index();
        let last = surface.last_displayed_index();

        service.send(EventPayload::GridScrolled(GridScrolled {
            direction: event.direction,
            first_visible_row: first,
            last_visible_row: last,
            visible_row_count: usize::try_from(last - first + 1).unwrap_or(0),
            scroll_top: event.top,
            scroll_left: event.left,
        }));
    }

    /// Whether a timer is currently armed
    pub fn is_pending(&self) -> bool {
        matches!(Self::lock(&self.inner).state, TrackerState::Pending { .. })
    }

    /// Cancel any armed timer and return to idle
    ///
    /// Blocks while a timer that already woke finishes emitting.
    pub fn teardown(&self) {
        let mut inner = Self::lock(&self.inner);
        if let TrackerState::Pending { timer, generation } =
            std::mem::replace(&mut inner.state, TrackerState::Idle)
        {
            timer.abort();
            tracing::debug!(generation, "Pending scroll report cancelled");
        }
    }
}

impl Drop for ScrollTracker {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventType, TelemetryEvent};
    use crate::fixtures;
    use crate::grid::{ColumnState, FilterModel, GridSurface, InMemoryGrid, Row};
    use std::sync::{Arc, Barrier};
    use tokio::time::sleep;

    fn setup() -> (Arc<TelemetryService>, GridSlot, Arc<InMemoryGrid>) {
        let service = Arc::new(TelemetryService::default());
        let grid = Arc::new(fixtures::sample_grid().with_page_size(5));
        let slot = GridSlot::new();
        slot.attach(grid.clone());
        (service, slot, grid)
    }

    fn scrolled(service: &TelemetryService) -> Vec<TelemetryEvent> {
        service
            .snapshot()
            .into_iter()
            .filter(|e| e.event_type() == EventType::GridScrolled)
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_coalesces_to_one_event() {
        let (service, slot, grid) = setup();
        let tracker = ScrollTracker::new(service.clone(), slot, DEFAULT_DEBOUNCE);

        for i in 0..6 {
            tracker.on_scroll(ScrollEvent::vertical(40.0 * i as f64));
            sleep(Duration::from_millis(50)).await;
        }
        // Grid moves after the last callback but before the timer fires
        grid.scroll_to(7);

        // 50ms already elapsed since the last scroll
        sleep(Duration::from_millis(249)).await;
        assert!(scrolled(&service).is_empty());
        assert!(tracker.is_pending());

        sleep(Duration::from_millis(2)).await;
        tokio::task::yield_now().await;

        let events = scrolled(&service);
        assert_eq!(events.len(), 1);
        assert!(!tracker.is_pending());

        match &events[0].payload {
            EventPayload::GridScrolled(s) => {
                assert_eq!(s.direction, ScrollDirection::Vertical);
                assert_eq!(s.scroll_top, 200.0);
                assert_eq!(s.first_visible_row, 7);
                assert_eq!(s.last_visible_row, 11);
                assert_eq!(s.visible_row_count, 5);
            }
            other => panic!("Expected GridScrolled, got {:?}", other),
        }

        // Silence afterwards produces nothing more
        sleep(Duration::from_secs(5)).await;
        assert_eq!(scrolled(&service).len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_quiet_periods_emit_separately() {
        let (service, slot, _grid) = setup();
        let tracker = ScrollTracker::new(service.clone(), slot, DEFAULT_DEBOUNCE);

        tracker.on_scroll(ScrollEvent::vertical(10.0));
        sleep(Duration::from_millis(400)).await;
        tracker.on_scroll(ScrollEvent::horizontal(30.0));
        sleep(Duration::from_millis(400)).await;

        let events = scrolled(&service);
        assert_eq!(events.len(), 2);
        // Newest first
        match &events[0].payload {
            EventPayload::GridScrolled(s) => {
                assert_eq!(s.direction, ScrollDirection::Horizontal);
                assert_eq!(s.scroll_left, 30.0);
            }
            other => panic!("Expected GridScrolled, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_cancels_pending_timer() {
        let (service, slot, _grid) = setup();
        let tracker = ScrollTracker::new(service.clone(), slot, DEFAULT_DEBOUNCE);

        tracker.on_scroll(ScrollEvent::vertical(10.0));
        sleep(Duration::from_millis(100)).await;
        tracker.teardown();
        assert!(!tracker.is_pending());

        sleep(Duration::from_secs(1)).await;
        assert!(scrolled(&service).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_timer() {
        let (service, slot, _grid) = setup();
        {
            let tracker = ScrollTracker::new(service.clone(), slot, DEFAULT_DEBOUNCE);
            tracker.on_scroll(ScrollEvent::vertical(10.0));
        }

        sleep(Duration::from_secs(1)).await;
        assert!(scrolled(&service).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_detached_grid_skips_emission() {
        let (service, slot, _grid) = setup();
        let tracker = ScrollTracker::new(service.clone(), slot.clone(), DEFAULT_DEBOUNCE);

        tracker.on_scroll(ScrollEvent::vertical(10.0));
        slot.detach();
        sleep(Duration::from_secs(1)).await;

        assert!(scrolled(&service).is_empty());
        assert!(!tracker.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_viewport_reports_zero_rows() {
        let service = Arc::new(TelemetryService::default());
        let slot = GridSlot::new();
        slot.attach(Arc::new(InMemoryGrid::new(
            Vec::new(),
            fixtures::sample_columns(),
            "id",
        )));
        let tracker = ScrollTracker::new(service.clone(), slot, DEFAULT_DEBOUNCE);

        tracker.on_scroll(ScrollEvent::vertical(0.0));
        sleep(Duration::from_millis(350)).await;

        match &scrolled(&service)[0].payload {
            EventPayload::GridScrolled(s) => assert_eq!(s.visible_row_count, 0),
            other => panic!("Expected GridScrolled, got {:?}", other),
        }
    }

    /// Surface that parks inside the viewport query until released
    struct GatedGrid {
        inner: InMemoryGrid,
        entered: Barrier,
        release: Barrier,
    }

    impl GridSurface for GatedGrid {
        fn first_displayed_index(&self) -> i64 {
            self.entered.wait();
            self.release.wait();
            self.inner.first_displayed_index()
        }
        fn last_displayed_index(&self) -> i64 {
            self.inner.last_displayed_index()
        }
        fn row_at(&self, index: i64) -> Option<Row> {
            self.inner.row_at(index)
        }
        fn selected_rows(&self) -> Vec<Row> {
            self.inner.selected_rows()
        }
        fn for_each_row(&self, visit: &mut dyn FnMut(&Row)) {
            self.inner.for_each_row(visit)
        }
        fn column_state(&self) -> Vec<ColumnState> {
            self.inner.column_state()
        }
        fn filter_model(&self) -> FilterModel {
            self.inner.filter_model()
        }
        fn displayed_row_count(&self) -> usize {
            self.inner.displayed_row_count()
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_teardown_waits_for_in_flight_emission() {
        let service = Arc::new(TelemetryService::default());
        let grid = Arc::new(GatedGrid {
            inner: fixtures::sample_grid().with_page_size(5),
            entered: Barrier::new(2),
            release: Barrier::new(2),
        });
        let slot = GridSlot::new();
        slot.attach(grid.clone());
        let tracker = Arc::new(ScrollTracker::new(
            service.clone(),
            slot.clone(),
            Duration::from_millis(10),
        ));

        tracker.on_scroll(ScrollEvent::vertical(10.0));

        // Tear down from a plain thread once the timer is inside the grid query
        let teardown = {
            let grid = grid.clone();
            let tracker = tracker.clone();
            let service = service.clone();
            std::thread::spawn(move || {
                grid.entered.wait();
                tracker.teardown();
                slot.detach();
                scrolled(&service).len()
            })
        };

        // Give teardown a chance to run before the query completes
        std::thread::sleep(Duration::from_millis(50));
        grid.release.wait();
        let at_teardown = teardown.join().unwrap();

        sleep(Duration::from_millis(50)).await;
        assert_eq!(scrolled(&service).len(), at_teardown);
        assert!(!tracker.is_pending());
    }

    #[test]
    fn test_scroll_outside_runtime_is_ignored() {
        let (service, slot, _grid) = setup();
        let tracker = ScrollTracker::new(service.clone(), slot, DEFAULT_DEBOUNCE);

        tracker.on_scroll(ScrollEvent::vertical(10.0));
        assert!(!tracker.is_pending());
    }
}
