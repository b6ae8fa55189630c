// ── Shell about dialog ────────────────────────────────────────────────────────
//
// One synchronous `ShellAboutW` call; no lifecycle to manage.  The native
// call parses its app parameter as `"window title#first line"`, which is why
// the two are composed here instead of exposing the raw format to callers.

#![allow(unsafe_code)]

use windows::{
    core::PCWSTR,
    Win32::{
        Foundation::HWND,
        UI::{Shell::ShellAboutW, WindowsAndMessaging::HICON},
    },
};

use super::{last_error, wide};
use crate::error::Result;
use crate::host::WindowRef;

/// Opaque reference to a loaded icon, shown in place of the Windows logo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconRef(isize);

impl IconRef {
    /// Wrap a raw `HICON` value.
    pub fn from_raw(raw: isize) -> Self {
        Self(raw)
    }
}

impl From<HICON> for IconRef {
    fn from(h: HICON) -> Self {
        Self(h.0 as isize)
    }
}

/// Show the standard Windows "About" dialog.
///
/// `title` becomes the dialog's window title, `first_line` the leading line
/// of the body, and `second_line` the free-form text underneath (version,
/// copyright, …).  Blocks until the user dismisses the dialog.
pub fn about_box(
    owner: Option<WindowRef>,
    title: &str,
    first_line: &str,
    second_line: &str,
    icon: Option<IconRef>,
) -> Result<()> {
    let app = wide::to_wide(&format!("{title}#{first_line}"));
    let other = wide::to_wide(second_line);

    let hwnd = HWND(owner.map_or(0, WindowRef::as_raw) as _);
    let hicon = HICON(icon.map_or(0, |i| i.0) as _);

    // SAFETY: both buffers are valid NUL-terminated UTF-16 strings that
    // outlive the call; null owner and icon are documented as "no owner" and
    // "default Windows logo".  The call blocks until the dialog closes.
    let ok = unsafe { ShellAboutW(hwnd, PCWSTR(app.as_ptr()), PCWSTR(other.as_ptr()), hicon) };
    if ok == 0 {
        return Err(last_error("ShellAboutW"));
    }
    Ok(())
}
