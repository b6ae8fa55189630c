// ── Message-box backend ───────────────────────────────────────────────────────
//
// `Win32Host` implements the `DialogHost` seam over the real OS: the blocking
// call is `MessageBoxIndirectW`, lookup is `FindWindowW` by exact title, and
// the manipulation primitives are the usual `user32` window calls.  All of
// them tolerate a stale handle, which is what the session's permissive
// post-close contract relies on.
//
// This is inside `platform::win32` so `unsafe` is permitted per crate policy.

#![allow(unsafe_code)]

use std::sync::Arc;

use windows::{
    core::PCWSTR,
    Win32::{
        Foundation::{HINSTANCE, HWND, LPARAM, RECT, WPARAM},
        UI::WindowsAndMessaging::{
            FindWindowW, GetWindowRect, MessageBoxIndirectW, MoveWindow, PostMessageW,
            SetWindowTextW, ShowWindow, GWLP_HWNDPARENT, MESSAGEBOX_STYLE, MSGBOXCALLBACK,
            MSGBOXPARAMSW, SW_HIDE, SW_SHOW, WM_CLOSE,
        },
    },
};

#[cfg(target_pointer_width = "64")]
use windows::Win32::UI::WindowsAndMessaging::SetWindowLongPtrW;
#[cfg(target_pointer_width = "32")]
use windows::Win32::UI::WindowsAndMessaging::SetWindowLongW;

use super::wide;
use crate::dialog::DialogSession;
use crate::error::Result;
use crate::host::{Bounds, DialogHost, WindowRef};

// ── Parameter block ───────────────────────────────────────────────────────────

/// `MAKELANGID(LANG_NEUTRAL, SUBLANG_DEFAULT)` — what the native call uses
/// when the caller does not care about the button language.
const LANG_NEUTRAL_DEFAULT: u32 = 0x0400;

/// Opaque reference to a loaded module, used to resolve a custom icon
/// resource.  Wraps the raw `HINSTANCE` value so the parameter block can
/// cross into the worker thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleRef(isize);

impl ModuleRef {
    /// Wrap a raw `HINSTANCE` value.
    pub fn from_raw(raw: isize) -> Self {
        Self(raw)
    }

    /// The raw `HINSTANCE` value.
    pub fn as_raw(self) -> isize {
        self.0
    }
}

impl From<HINSTANCE> for ModuleRef {
    fn from(h: HINSTANCE) -> Self {
        Self(h.0 as isize)
    }
}

/// A custom icon resource inside [`MessageBoxParams::module`].
/// Requires `MB_USERICON` in the style flags to take effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconSource {
    /// An integer resource ordinal (`MAKEINTRESOURCE` style).
    Ordinal(u16),
    /// A named resource.
    Name(String),
}

/// Everything `MessageBoxIndirectW` consumes, minus the caption — the
/// session supplies the correlation token as the initial title, and callers
/// retitle through the live session afterwards.
pub struct MessageBoxParams {
    /// Body text shown to the user.
    pub text: String,
    /// Button / icon / behavior bits (`MB_OK | MB_ICONINFORMATION`, …).
    pub style: MESSAGEBOX_STYLE,
    /// Owner window for true modality, if any.
    pub owner: Option<WindowRef>,
    /// Module holding the custom icon resource.
    pub module: Option<ModuleRef>,
    /// Custom icon resource; needs `MB_USERICON` in `style`.
    pub icon: Option<IconSource>,
    /// Help context id delivered to the help callback.
    pub help_context_id: usize,
    /// Invoked when the user presses F1 or the Help button (`MB_HELP`).
    pub help_callback: MSGBOXCALLBACK,
    /// Button-caption language.
    pub language_id: u32,
}

impl MessageBoxParams {
    /// A parameter block with the given text and style and every optional
    /// field at its native default.
    pub fn new(text: impl Into<String>, style: MESSAGEBOX_STYLE) -> Self {
        Self {
            text: text.into(),
            style,
            owner: None,
            module: None,
            icon: None,
            help_context_id: 0,
            help_callback: None,
            language_id: LANG_NEUTRAL_DEFAULT,
        }
    }
}

// ── Handle conversions ────────────────────────────────────────────────────────

impl From<HWND> for WindowRef {
    fn from(h: HWND) -> Self {
        Self::from_raw(h.0 as isize)
    }
}

/// Rebuild an `HWND` from the seam's opaque reference.
fn hwnd(window: WindowRef) -> HWND {
    HWND(window.as_raw() as _)
}

// ── Host implementation ───────────────────────────────────────────────────────

/// The real-OS [`DialogHost`].  Stateless: all state lives in the OS window
/// it operates on.
pub struct Win32Host;

impl DialogHost for Win32Host {
    type Params = MessageBoxParams;

    fn run_dialog(&self, params: MessageBoxParams, title: &str) -> i32 {
        let text = wide::to_wide(&params.text);
        let caption = wide::to_wide(title);

        // Buffer kept alive next to `mbp`; only used for named icons.
        let icon_name = match &params.icon {
            Some(IconSource::Name(name)) => wide::to_wide(name),
            _ => Vec::new(),
        };
        let lpsz_icon = match &params.icon {
            None => PCWSTR::null(),
            // MAKEINTRESOURCEW: the ordinal travels in the pointer value.
            Some(IconSource::Ordinal(ordinal)) => PCWSTR(*ordinal as usize as *const u16),
            Some(IconSource::Name(_)) => PCWSTR(icon_name.as_ptr()),
        };

        let mbp = MSGBOXPARAMSW {
            cbSize: std::mem::size_of::<MSGBOXPARAMSW>() as u32,
            hwndOwner: params.owner.map(hwnd).unwrap_or_default(),
            hInstance: params
                .module
                .map(|m| HINSTANCE(m.as_raw() as _))
                .unwrap_or_default(),
            lpszText: PCWSTR(text.as_ptr()),
            lpszCaption: PCWSTR(caption.as_ptr()),
            dwStyle: params.style,
            lpszIcon: lpsz_icon,
            dwContextHelpId: params.help_context_id,
            lpfnMsgBoxCallback: params.help_callback,
            dwLanguageId: params.language_id,
        };

        // SAFETY: every pointer in `mbp` refers to a NUL-terminated UTF-16
        // buffer owned by this frame (`text`, `caption`, `icon_name`), and
        // the struct size field is set.  The call blocks this worker thread
        // until the dialog closes, well within all buffer lifetimes.
        unsafe { MessageBoxIndirectW(&mbp) }.0
    }

    fn find_window(&self, title: &str) -> Option<WindowRef> {
        let title = wide::to_wide(title);
        // SAFETY: the title buffer is a valid NUL-terminated UTF-16 string
        // for the duration of the call; a null class name matches windows of
        // any class.
        unsafe { FindWindowW(PCWSTR::null(), PCWSTR(title.as_ptr())) }
            .ok()
            .filter(|h| !h.is_invalid())
            .map(WindowRef::from)
    }

    fn set_visible(&self, window: WindowRef, visible: bool) {
        let cmd = if visible { SW_SHOW } else { SW_HIDE };
        // SAFETY: ShowWindow tolerates a stale handle.  The returned previous
        // visibility state is not needed.
        unsafe {
            let _ = ShowWindow(hwnd(window), cmd);
        }
    }

    fn window_bounds(&self, window: WindowRef) -> Option<Bounds> {
        let mut rect = RECT::default();
        // SAFETY: `rect` is a valid out-pointer for the duration of the call.
        unsafe { GetWindowRect(hwnd(window), &mut rect) }.ok()?;
        Some(Bounds {
            x: rect.left,
            y: rect.top,
            width: rect.right - rect.left,
            height: rect.bottom - rect.top,
        })
    }

    fn move_window(&self, window: WindowRef, x: i32, y: i32, width: i32, height: i32) {
        // SAFETY: a stale handle fails harmlessly; repaint is requested so
        // the dialog redraws at its new position.
        unsafe {
            let _ = MoveWindow(hwnd(window), x, y, width, height, true);
        }
    }

    fn set_title(&self, window: WindowRef, title: &str) {
        let title = wide::to_wide(title);
        // SAFETY: the buffer is a valid NUL-terminated UTF-16 string for the
        // duration of the call; a stale handle fails harmlessly.
        unsafe {
            let _ = SetWindowTextW(hwnd(window), PCWSTR(title.as_ptr()));
        }
    }

    fn set_owner(&self, window: WindowRef, owner: WindowRef) {
        // GWLP_HWNDPARENT on a top-level window rewires its owner, which is
        // what makes the dialog modal relative to `owner`.
        // SAFETY: both handles are caller-supplied window references; a stale
        // handle fails harmlessly.  The returned previous value is not needed.
        #[cfg(target_pointer_width = "64")]
        unsafe {
            let _ = SetWindowLongPtrW(hwnd(window), GWLP_HWNDPARENT, owner.as_raw());
        }
        #[cfg(target_pointer_width = "32")]
        unsafe {
            let _ = SetWindowLongW(hwnd(window), GWLP_HWNDPARENT, owner.as_raw() as i32);
        }
    }

    fn request_close(&self, window: WindowRef) {
        // Posted, not sent: the worker owns the dialog's modal message pump,
        // and a post never blocks the caller on it.
        // SAFETY: posting WM_CLOSE to a stale handle fails harmlessly.
        unsafe {
            let _ = PostMessageW(hwnd(window), WM_CLOSE, WPARAM(0), LPARAM(0));
        }
    }
}

// ── Caller-facing surface ─────────────────────────────────────────────────────

/// A live Win32 message box: construction returns only after the dialog
/// window exists and has been hidden, ready to be configured and shown.
pub type MessageBox = DialogSession<Win32Host>;

impl DialogSession<Win32Host> {
    /// Open a message box with the given text and style flags.
    ///
    /// The dialog starts hidden; call [`show`](Self::show) once it is
    /// configured.
    pub fn open(text: &str, style: MESSAGEBOX_STYLE) -> Result<Self> {
        Self::open_with(MessageBoxParams::new(text, style))
    }

    /// Open a message box from a full parameter block.
    pub fn open_with(params: MessageBoxParams) -> Result<Self> {
        Self::launch(Arc::new(Win32Host), params)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
