// ── Host seam ─────────────────────────────────────────────────────────────────
//
// Everything `dialog::DialogSession` needs from the operating system, collected
// behind one trait: the blocking dialog call itself, title-based window
// lookup, and the handful of manipulation primitives that operate on a found
// window.  `platform::win32` provides the real implementation; the session
// tests drive a simulated host.  No `unsafe` lives here.

/// Opaque reference to an OS window, wide enough for a native handle on any
/// supported target.  Zero is never a valid window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowRef(isize);

impl WindowRef {
    /// Wrap a raw native handle value.
    pub fn from_raw(raw: isize) -> Self {
        Self(raw)
    }

    /// The raw native handle value.
    pub fn as_raw(self) -> isize {
        self.0
    }
}

/// Screen-space bounds of a window, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// The services a dialog session consumes from the OS.
///
/// One host instance may serve any number of concurrent sessions, so every
/// method takes `&self` and implementations must be `Send + Sync`.  All
/// manipulation methods are best-effort: a window that has already been
/// destroyed is silently ignored, matching the permissive contract of the
/// underlying Win32 calls.
pub trait DialogHost: Send + Sync + 'static {
    /// Host-specific dialog parameter block, moved into the worker thread.
    type Params: Send + 'static;

    /// Show the modal dialog titled `title` and block until it closes.
    /// Returns the integer result code of the close.  Called on the
    /// session's worker thread; this is the only host method invoked
    /// off the constructing thread.
    fn run_dialog(&self, params: Self::Params, title: &str) -> i32;

    /// Exact-title lookup in the OS window registry.
    fn find_window(&self, title: &str) -> Option<WindowRef>;

    /// Show or hide `window`.
    fn set_visible(&self, window: WindowRef, visible: bool);

    /// Current screen bounds of `window`, or `None` if it is gone.
    fn window_bounds(&self, window: WindowRef) -> Option<Bounds>;

    /// Move `window` to `(x, y)` keeping the given size.
    fn move_window(&self, window: WindowRef, x: i32, y: i32, width: i32, height: i32);

    /// Replace the window title.
    fn set_title(&self, window: WindowRef, title: &str);

    /// Re-owner `window` so it is modal relative to `owner`.
    fn set_owner(&self, window: WindowRef, owner: WindowRef);

    /// Post a close request to `window`, as if the user dismissed it.
    /// A request, not a guarantee: the blocking call finalizes asynchronously.
    fn request_close(&self, window: WindowRef);
}
