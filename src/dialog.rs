// ── Dialog session ────────────────────────────────────────────────────────────
//
// The asynchronous modal-dialog controller.  The native "show dialog" call
// blocks for the dialog's whole lifetime and never yields a window handle, so
// the session runs that call on a dedicated worker thread, tags the dialog
// with a throwaway correlation title, and resolves a live handle by title
// lookup before the constructor returns (see `correlate`).  The caller then
// owns a handle it can reposition, retitle, show, hide, or close while the
// worker stays blocked.
//
// Thread model: exactly two contexts per session.  The worker writes the
// outcome once and touches nothing else; the constructing context owns the
// handle and the visibility flag.  No `unsafe` — all OS access goes through
// the `DialogHost` seam.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::correlate;
use crate::error::{HeraldError, Result};
use crate::host::{DialogHost, WindowRef};

// ── Tuning ────────────────────────────────────────────────────────────────────

/// How long construction waits for the dialog window to materialize before
/// failing with [`HeraldError::DiscoveryTimeout`].
const DISCOVERY_TIMEOUT: Duration = Duration::from_secs(5);

/// How long teardown waits for the worker to finish after requesting close.
/// Past this, the worker is detached and left to finalize on its own.
const TEARDOWN_WAIT: Duration = Duration::from_millis(500);

/// Poll interval for [`DialogSession::wait_result`] and the teardown wait.
const POLL_INTERVAL: Duration = Duration::from_millis(1);

// ── Alignment ─────────────────────────────────────────────────────────────────

/// Horizontal anchor for [`DialogSession::set_position`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignX {
    Left,
    Middle,
    Right,
}

/// Vertical anchor for [`DialogSession::set_position`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignY {
    Top,
    Middle,
    Bottom,
}

/// Translate an anchor point into a window origin for a window of the given
/// size: the requested coordinate names the window's left/center/right edge
/// (respectively top/center/bottom) depending on the alignment.
fn aligned_origin(
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    align_x: AlignX,
    align_y: AlignY,
) -> (i32, i32) {
    let x = match align_x {
        AlignX::Left => x,
        AlignX::Middle => x - width / 2,
        AlignX::Right => x - width,
    };
    let y = match align_y {
        AlignY::Top => y,
        AlignY::Middle => y - height / 2,
        AlignY::Bottom => y - height,
    };
    (x, y)
}

// ── Outcome cell ──────────────────────────────────────────────────────────────

/// Pending sentinel.  Real dialog results are small non-negative codes
/// (`IDOK` is 1; a failed native call yields 0), so `i32::MIN` can never be a
/// legitimate outcome.
const PENDING: i32 = i32::MIN;

/// Write-once result slot shared between the worker and every reader.
/// Single writer (the worker), any number of readers; a compare-exchange from
/// the sentinel makes the pending → finalized transition happen exactly once.
struct OutcomeCell(AtomicI32);

impl OutcomeCell {
    fn new() -> Self {
        Self(AtomicI32::new(PENDING))
    }

    /// `None` while pending, `Some(result)` forever after finalization.
    fn get(&self) -> Option<i32> {
        let v = self.0.load(Ordering::Acquire);
        (v != PENDING).then_some(v)
    }

    /// Finalize the outcome.  Returns `false` if it was already finalized.
    fn finalize(&self, result: i32) -> bool {
        // i32::MIN is reserved for the pending state; remap a colliding
        // value rather than lose the transition.
        let stored = if result == PENDING { PENDING + 1 } else { result };
        self.0
            .compare_exchange(PENDING, stored, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

/// A live handle to one open modal dialog.
///
/// Constructing a session blocks until the dialog window exists and has been
/// hidden, so every method operates on a resolved handle — callers never poll
/// for readiness.  The dialog stays hidden until [`show`](Self::show) is
/// called, leaving a window of time to set the caption, owner, and position
/// before the user can see or interact with it.
///
/// Once the dialog closes (user action or [`close`](Self::close)), the
/// session becomes inert: every mutator is a silent no-op and only
/// [`result`](Self::result) remains meaningful.
pub struct DialogSession<H: DialogHost> {
    host: Arc<H>,
    /// Resolved before construction returns; stable for the session lifetime.
    handle: WindowRef,
    /// Caller-observable visibility, mutated only by `show` / `hide`.
    visible: bool,
    outcome: Arc<OutcomeCell>,
    /// The thread blocked inside the native dialog call.  `None` only after
    /// teardown has taken it.
    worker: Option<JoinHandle<()>>,
}

impl<H: DialogHost> std::fmt::Debug for DialogSession<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogSession")
            .field("handle", &self.handle)
            .field("visible", &self.visible)
            .field("worker", &self.worker)
            .finish_non_exhaustive()
    }
}

impl<H: DialogHost> DialogSession<H> {
    /// Launch the dialog described by `params` and resolve a handle to it.
    ///
    /// Dispatches the blocking native call on a worker thread, then waits —
    /// a short hot spin, then exponential backoff, bounded by a deadline —
    /// for a window carrying this session's correlation token.  The window
    /// is hidden before this returns.
    pub fn launch(host: Arc<H>, params: H::Params) -> Result<Self> {
        Self::launch_bounded(host, params, DISCOVERY_TIMEOUT)
    }

    fn launch_bounded(host: Arc<H>, params: H::Params, timeout: Duration) -> Result<Self> {
        let token = correlate::next_token();
        let outcome = Arc::new(OutcomeCell::new());

        let worker = {
            let host = Arc::clone(&host);
            let outcome = Arc::clone(&outcome);
            let token = token.clone();
            thread::Builder::new()
                .name("herald-dialog".into())
                .spawn(move || {
                    let result = host.run_dialog(params, &token);
                    outcome.finalize(result);
                })?
        };

        let handle = match discover(host.as_ref(), &token, &outcome, timeout) {
            Ok(handle) => handle,
            Err(e) => {
                // No handle to close with.  The worker owns the native call
                // and finalizes the outcome on its own if it ever returns.
                drop(worker);
                return Err(e);
            }
        };

        // Suppress the initial visibility: the native call pops the dialog
        // visible, and the caller must get a chance to configure it first.
        host.set_visible(handle, false);

        Ok(Self {
            host,
            handle,
            visible: false,
            outcome,
            worker: Some(worker),
        })
    }

    /// `true` while the dialog is open and accepting mutations.
    fn live(&self) -> bool {
        self.outcome.get().is_none()
    }

    /// Re-owner the dialog so it is modal relative to `owner`.
    /// Affects z-order and input blocking, not visibility.
    pub fn set_owner(&self, owner: WindowRef) {
        if !self.live() {
            return;
        }
        self.host.set_owner(self.handle, owner);
    }

    /// Replace the window title.  The correlation token is gone for good
    /// once a real caption is set — lookup already happened.
    pub fn set_caption(&self, caption: &str) {
        if !self.live() {
            return;
        }
        self.host.set_title(self.handle, caption);
    }

    /// Move the dialog so that `(x, y)` lands on the requested anchor of the
    /// window (nine combinations).  The size is left untouched.
    pub fn set_position(&self, x: i32, y: i32, align_x: AlignX, align_y: AlignY) {
        if !self.live() {
            return;
        }
        let Some(b) = self.host.window_bounds(self.handle) else {
            return;
        };
        let (x, y) = aligned_origin(x, y, b.width, b.height, align_x, align_y);
        self.host.move_window(self.handle, x, y, b.width, b.height);
    }

    /// Reveal the dialog.  No-op if it is already visible or already closed.
    pub fn show(&mut self) {
        if !self.live() || self.visible {
            return;
        }
        self.host.set_visible(self.handle, true);
        self.visible = true;
    }

    /// Conceal the dialog.  No-op if it is already hidden or already closed.
    pub fn hide(&mut self) {
        if !self.live() || !self.visible {
            return;
        }
        self.host.set_visible(self.handle, false);
        self.visible = false;
    }

    /// Ask the dialog to close, as if the user dismissed it.  A request, not
    /// a guarantee: the outcome finalizes asynchronously once the blocking
    /// call returns — poll [`result`](Self::result) to observe it.
    pub fn close(&self) {
        if !self.live() {
            return;
        }
        self.host.request_close(self.handle);
    }

    /// The resolved window handle, or `None` once the dialog has closed
    /// (the native handle is invalid from that point on).
    pub fn handle(&self) -> Option<WindowRef> {
        self.live().then_some(self.handle)
    }

    /// Caller-observable visibility as driven by `show` / `hide`.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// The dialog's result: `None` while it is still open, `Some(code)`
    /// forever after it closes.  Never blocks.
    pub fn result(&self) -> Option<i32> {
        self.outcome.get()
    }

    /// Poll [`result`](Self::result) until it finalizes or `timeout` passes.
    pub fn wait_result(&self, timeout: Duration) -> Option<i32> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(r) = self.outcome.get() {
                return Some(r);
            }
            if Instant::now() >= deadline {
                return None;
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

/// Resolve the window created by the in-flight native call via exact-title
/// lookup.  Bails out early if the worker finalizes first (the native call
/// failed fast — there is no window coming).
fn discover<H: DialogHost>(
    host: &H,
    token: &str,
    outcome: &OutcomeCell,
    timeout: Duration,
) -> Result<WindowRef> {
    let started = Instant::now();
    let mut attempt = 0u32;
    loop {
        if let Some(window) = host.find_window(token) {
            return Ok(window);
        }
        if let Some(result) = outcome.get() {
            return Err(HeraldError::ClosedDuringDiscovery { result });
        }
        if started.elapsed() >= timeout {
            return Err(HeraldError::DiscoveryTimeout {
                token: token.to_owned(),
                waited: timeout,
            });
        }
        let delay = correlate::backoff_delay(attempt);
        if delay.is_zero() {
            std::hint::spin_loop();
        } else {
            thread::sleep(delay);
        }
        attempt = attempt.saturating_add(1);
    }
}

impl<H: DialogHost> Drop for DialogSession<H> {
    fn drop(&mut self) {
        if self.outcome.get().is_none() {
            self.host.request_close(self.handle);
        }
        if let Some(worker) = self.worker.take() {
            let deadline = Instant::now() + TEARDOWN_WAIT;
            while !worker.is_finished() && Instant::now() < deadline {
                thread::sleep(POLL_INTERVAL);
            }
            if worker.is_finished() {
                let _ = worker.join();
            } else {
                // Forced detach: the native call ignored the close request
                // past the deadline.  The worker still finalizes the (now
                // unobservable) outcome whenever the dialog actually closes.
                #[cfg(debug_assertions)]
                eprintln!("[herald] dialog worker still blocked at teardown; detaching");
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Bounds;
    use std::collections::HashMap;
    use std::sync::atomic::AtomicIsize;
    use std::sync::{Condvar, Mutex};

    // ── Simulated host ────────────────────────────────────────────────────────
    //
    // Models what the session needs from the OS: `run_dialog` registers a
    // visible window under the given title and blocks, modal-style, until a
    // close request lands; lookup and the manipulation primitives work off a
    // shared registry.  Every manipulation attempt is counted even when the
    // window is already destroyed, so tests can tell "session refused to
    // call" apart from "host ignored the call".

    #[derive(Clone)]
    struct FakeParams {
        result: i32,
        bounds: Bounds,
        create_after: Duration,
        /// `false` models a native call that produces no window at all.
        create_window: bool,
        /// With `create_window == false`: block until `release_stuck` instead
        /// of returning immediately.
        hold_without_window: bool,
    }

    impl Default for FakeParams {
        fn default() -> Self {
            Self {
                result: 1,
                bounds: Bounds {
                    x: 0,
                    y: 0,
                    width: 200,
                    height: 120,
                },
                create_after: Duration::ZERO,
                create_window: true,
                hold_without_window: false,
            }
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    struct FakeWindow {
        title: String,
        visible: bool,
        bounds: Bounds,
        owner: Option<WindowRef>,
        close_requested: bool,
        destroyed: bool,
        // Attempt counters, bumped on every host call for this handle.
        visibility_calls: u32,
        title_calls: u32,
        move_calls: u32,
        owner_calls: u32,
    }

    struct FakeHost {
        windows: Mutex<HashMap<isize, FakeWindow>>,
        closed: Condvar,
        next_raw: AtomicIsize,
        stuck: Mutex<bool>,
        released: Condvar,
    }

    impl FakeHost {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                windows: Mutex::new(HashMap::new()),
                closed: Condvar::new(),
                next_raw: AtomicIsize::new(1),
                stuck: Mutex::new(false),
                released: Condvar::new(),
            })
        }

        fn snapshot(&self, window: WindowRef) -> FakeWindow {
            self.windows
                .lock()
                .unwrap()
                .get(&window.as_raw())
                .expect("window was never registered")
                .clone()
        }

        /// Unblock workers stuck in `hold_without_window` mode.
        fn release_stuck(&self) {
            *self.stuck.lock().unwrap() = true;
            self.released.notify_all();
        }
    }

    impl DialogHost for FakeHost {
        type Params = FakeParams;

        fn run_dialog(&self, params: FakeParams, title: &str) -> i32 {
            if !params.create_window {
                if params.hold_without_window {
                    let mut released = self.stuck.lock().unwrap();
                    while !*released {
                        released = self.released.wait(released).unwrap();
                    }
                }
                return params.result;
            }

            if !params.create_after.is_zero() {
                thread::sleep(params.create_after);
            }

            let raw = self.next_raw.fetch_add(1, Ordering::Relaxed);
            let mut windows = self.windows.lock().unwrap();
            windows.insert(
                raw,
                FakeWindow {
                    title: title.to_owned(),
                    visible: true,
                    bounds: params.bounds,
                    owner: None,
                    close_requested: false,
                    destroyed: false,
                    visibility_calls: 0,
                    title_calls: 0,
                    move_calls: 0,
                    owner_calls: 0,
                },
            );

            // Modal: hold until a close request lands.
            while !windows[&raw].close_requested {
                windows = self.closed.wait(windows).unwrap();
            }
            windows.get_mut(&raw).unwrap().destroyed = true;
            params.result
        }

        fn find_window(&self, title: &str) -> Option<WindowRef> {
            self.windows
                .lock()
                .unwrap()
                .iter()
                .find(|(_, w)| !w.destroyed && w.title == title)
                .map(|(raw, _)| WindowRef::from_raw(*raw))
        }

        fn set_visible(&self, window: WindowRef, visible: bool) {
            if let Some(w) = self.windows.lock().unwrap().get_mut(&window.as_raw()) {
                w.visibility_calls += 1;
                if !w.destroyed {
                    w.visible = visible;
                }
            }
        }

        fn window_bounds(&self, window: WindowRef) -> Option<Bounds> {
            self.windows
                .lock()
                .unwrap()
                .get(&window.as_raw())
                .filter(|w| !w.destroyed)
                .map(|w| w.bounds)
        }

        fn move_window(&self, window: WindowRef, x: i32, y: i32, width: i32, height: i32) {
            if let Some(w) = self.windows.lock().unwrap().get_mut(&window.as_raw()) {
                w.move_calls += 1;
                if !w.destroyed {
                    w.bounds = Bounds {
                        x,
                        y,
                        width,
                        height,
                    };
                }
            }
        }

        fn set_title(&self, window: WindowRef, title: &str) {
            if let Some(w) = self.windows.lock().unwrap().get_mut(&window.as_raw()) {
                w.title_calls += 1;
                if !w.destroyed {
                    w.title = title.to_owned();
                }
            }
        }

        fn set_owner(&self, window: WindowRef, owner: WindowRef) {
            if let Some(w) = self.windows.lock().unwrap().get_mut(&window.as_raw()) {
                w.owner_calls += 1;
                if !w.destroyed {
                    w.owner = Some(owner);
                }
            }
        }

        fn request_close(&self, window: WindowRef) {
            let mut windows = self.windows.lock().unwrap();
            if let Some(w) = windows.get_mut(&window.as_raw()) {
                w.close_requested = true;
            }
            self.closed.notify_all();
        }
    }

    fn open(host: &Arc<FakeHost>, params: FakeParams) -> DialogSession<FakeHost> {
        DialogSession::launch(Arc::clone(host), params).expect("launch")
    }

    // ── Construction ──────────────────────────────────────────────────────────

    #[test]
    fn handle_resolved_and_hidden_after_construction() {
        let host = FakeHost::new();
        let session = open(&host, FakeParams::default());

        let handle = session.handle().expect("handle resolved by constructor");
        assert!(!session.is_visible());
        assert_eq!(session.result(), None);

        let w = host.snapshot(handle);
        assert!(!w.visible, "window must be hidden before launch returns");
        assert_eq!(w.visibility_calls, 1);
    }

    #[test]
    fn discovery_outlasts_slow_window_creation() {
        let host = FakeHost::new();
        let session = open(
            &host,
            FakeParams {
                create_after: Duration::from_millis(20),
                ..FakeParams::default()
            },
        );
        assert!(session.handle().is_some());
    }

    #[test]
    fn discovery_times_out_when_no_window_appears() {
        let host = FakeHost::new();
        let err = DialogSession::launch_bounded(
            Arc::clone(&host),
            FakeParams {
                create_window: false,
                hold_without_window: true,
                ..FakeParams::default()
            },
            Duration::from_millis(50),
        )
        .expect_err("no window can be discovered");

        match err {
            HeraldError::DiscoveryTimeout { token, waited } => {
                assert!(token.starts_with("__herald_probe_"));
                assert_eq!(waited, Duration::from_millis(50));
            }
            other => panic!("expected DiscoveryTimeout, got {other:?}"),
        }

        // Let the parked worker run to completion.
        host.release_stuck();
    }

    #[test]
    fn fast_native_failure_reports_closed_during_discovery() {
        let host = FakeHost::new();
        let err = DialogSession::launch(
            Arc::clone(&host),
            FakeParams {
                create_window: false,
                result: 0,
                ..FakeParams::default()
            },
        )
        .expect_err("native call failed fast");

        match err {
            HeraldError::ClosedDuringDiscovery { result } => assert_eq!(result, 0),
            other => panic!("expected ClosedDuringDiscovery, got {other:?}"),
        }
    }

    // ── Visibility ────────────────────────────────────────────────────────────

    #[test]
    fn show_is_idempotent() {
        let host = FakeHost::new();
        let mut session = open(&host, FakeParams::default());
        let handle = session.handle().unwrap();

        session.show();
        assert!(session.is_visible());
        assert!(host.snapshot(handle).visible);
        assert_eq!(host.snapshot(handle).visibility_calls, 2); // hide + show

        session.show();
        assert!(session.is_visible());
        assert_eq!(
            host.snapshot(handle).visibility_calls,
            2,
            "second show must not reach the host"
        );
    }

    #[test]
    fn hide_is_idempotent() {
        let host = FakeHost::new();
        let mut session = open(&host, FakeParams::default());
        let handle = session.handle().unwrap();

        // Already hidden by construction.
        session.hide();
        assert!(!session.is_visible());
        assert_eq!(host.snapshot(handle).visibility_calls, 1);

        session.show();
        session.hide();
        session.hide();
        assert!(!session.is_visible());
        assert_eq!(host.snapshot(handle).visibility_calls, 3);
    }

    // ── Outcome ───────────────────────────────────────────────────────────────

    #[test]
    fn result_is_pending_then_stable() {
        let host = FakeHost::new();
        let session = open(
            &host,
            FakeParams {
                result: 7,
                ..FakeParams::default()
            },
        );

        assert_eq!(session.result(), None);
        session.close();
        assert_eq!(
            session.wait_result(Duration::from_secs(2)),
            Some(7),
            "close must finalize the worker's result"
        );

        // Idempotent read.
        assert_eq!(session.result(), Some(7));
        assert_eq!(session.result(), Some(7));
        assert_eq!(session.handle(), None, "handle is invalid once closed");
    }

    #[test]
    fn mutations_after_finalize_are_noops() {
        let host = FakeHost::new();
        let mut session = open(&host, FakeParams::default());
        let handle = session.handle().unwrap();

        session.close();
        session.wait_result(Duration::from_secs(2)).expect("finalized");

        let before = host.snapshot(handle);
        session.set_caption("too late");
        session.set_position(100, 100, AlignX::Middle, AlignY::Middle);
        session.set_owner(WindowRef::from_raw(0x5555));
        session.show();
        session.hide();
        session.close();

        let after = host.snapshot(handle);
        assert_eq!(before, after, "no host call may follow finalization");
        assert!(!session.is_visible());
    }

    #[test]
    fn outcome_cell_finalizes_exactly_once() {
        let cell = OutcomeCell::new();
        assert_eq!(cell.get(), None);
        assert!(cell.finalize(6));
        assert!(!cell.finalize(2), "second write must be rejected");
        assert_eq!(cell.get(), Some(6));
    }

    #[test]
    fn outcome_cell_remaps_sentinel_collision() {
        let cell = OutcomeCell::new();
        assert!(cell.finalize(PENDING));
        // Still reads as finalized, just not as the exact reserved value.
        assert!(cell.get().is_some());
    }

    // ── Mutations on a live dialog ────────────────────────────────────────────

    #[test]
    fn set_position_middle_middle_centers_the_window() {
        let host = FakeHost::new();
        let session = open(&host, FakeParams::default()); // 200 × 120
        let handle = session.handle().unwrap();

        session.set_position(400, 300, AlignX::Middle, AlignY::Middle);

        let b = host.snapshot(handle).bounds;
        assert_eq!((b.x, b.y), (300, 240));
        assert_eq!((b.width, b.height), (200, 120), "size must not change");
        assert_eq!((b.x + b.width / 2, b.y + b.height / 2), (400, 300));
    }

    #[test]
    fn set_caption_and_owner_reach_the_window() {
        let host = FakeHost::new();
        let session = open(&host, FakeParams::default());
        let handle = session.handle().unwrap();

        session.set_caption("Save changes?");
        session.set_owner(WindowRef::from_raw(0xBEEF));

        let w = host.snapshot(handle);
        assert_eq!(w.title, "Save changes?");
        assert_eq!(w.owner, Some(WindowRef::from_raw(0xBEEF)));
    }

    #[test]
    fn aligned_origin_covers_all_nine_anchors() {
        let cases = [
            (AlignX::Left, AlignY::Top, (10, 20)),
            (AlignX::Middle, AlignY::Top, (-40, 20)),
            (AlignX::Right, AlignY::Top, (-90, 20)),
            (AlignX::Left, AlignY::Middle, (10, -5)),
            (AlignX::Middle, AlignY::Middle, (-40, -5)),
            (AlignX::Right, AlignY::Middle, (-90, -5)),
            (AlignX::Left, AlignY::Bottom, (10, -30)),
            (AlignX::Middle, AlignY::Bottom, (-40, -30)),
            (AlignX::Right, AlignY::Bottom, (-90, -30)),
        ];
        for (ax, ay, expected) in cases {
            assert_eq!(
                aligned_origin(10, 20, 100, 50, ax, ay),
                expected,
                "anchor {ax:?}/{ay:?}"
            );
        }
    }

    // ── Concurrency ───────────────────────────────────────────────────────────

    #[test]
    fn concurrent_sessions_never_cross_wire() {
        let host = FakeHost::new();

        let sessions: Vec<DialogSession<FakeHost>> = (0..6)
            .map(|i| {
                let host = Arc::clone(&host);
                thread::spawn(move || {
                    DialogSession::launch(
                        host,
                        FakeParams {
                            result: 10 + i,
                            ..FakeParams::default()
                        },
                    )
                    .expect("launch")
                })
            })
            .collect::<Vec<_>>()
            .into_iter()
            .map(|h| h.join().expect("constructor thread"))
            .collect();

        // All sessions resolved distinct windows.
        let handles: Vec<WindowRef> = sessions.iter().map(|s| s.handle().unwrap()).collect();
        let mut dedup = handles.clone();
        dedup.sort_by_key(|w| w.as_raw());
        dedup.dedup();
        assert_eq!(dedup.len(), sessions.len(), "handles must be distinct");

        // Each session's operations land on its own window…
        for (i, session) in sessions.iter().enumerate() {
            session.set_caption(&format!("session {i}"));
        }
        for (i, handle) in handles.iter().enumerate() {
            assert_eq!(host.snapshot(*handle).title, format!("session {i}"));
        }

        // …and each reads back its own worker's result.
        for (i, session) in sessions.iter().enumerate() {
            session.close();
            assert_eq!(
                session.wait_result(Duration::from_secs(2)),
                Some(10 + i as i32)
            );
        }
    }

    // ── Teardown ──────────────────────────────────────────────────────────────

    #[test]
    fn drop_closes_a_pending_dialog_and_joins_the_worker() {
        let host = FakeHost::new();
        let session = open(&host, FakeParams::default());
        let handle = session.handle().unwrap();

        drop(session);

        let w = host.snapshot(handle);
        assert!(w.close_requested, "teardown must request close");
        assert!(w.destroyed, "worker must have finished within the bounded wait");
    }

    #[test]
    fn drop_after_finalization_does_not_close_again() {
        let host = FakeHost::new();
        let session = open(&host, FakeParams::default());
        let handle = session.handle().unwrap();

        session.close();
        session.wait_result(Duration::from_secs(2)).expect("finalized");
        let calls_before = host.snapshot(handle);

        drop(session);

        // close_requested was already set by the explicit close; teardown
        // must not have touched the window again.
        assert_eq!(host.snapshot(handle), calls_before);
    }
}
