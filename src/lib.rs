// ── Safety policy ─────────────────────────────────────────────────────────────
// Unsafe code is forbidden everywhere except `platform::win32` (Win32 FFI).
// Each unsafe block in that module MUST carry a `// SAFETY:` comment.
#![deny(unsafe_code)]

//! Live-handle control of Win32 message boxes.
//!
//! `MessageBoxIndirectW` blocks its calling thread for the dialog's whole
//! lifetime and never yields a window handle while the dialog is open.
//! herald runs that call on a worker thread, resolves the window through a
//! unique throwaway title, and hands back a [`DialogSession`]: a live handle
//! that can retitle, re-owner, reposition, show, hide, and close the dialog
//! while the native call stays blocked.  The dialog starts hidden so it can
//! be fully configured before the user ever sees it.
//!
//! ```ignore
//! use herald::{AlignX, AlignY, MessageBox};
//! use windows::Win32::UI::WindowsAndMessaging::{MB_ICONINFORMATION, MB_OK};
//!
//! let mut dialog = MessageBox::open("All changes saved.", MB_OK | MB_ICONINFORMATION)?;
//! dialog.set_caption("Sync");
//! dialog.set_position(960, 540, AlignX::Middle, AlignY::Middle);
//! dialog.show();
//!
//! // The caller keeps running; poll for the user's answer.
//! let answer = dialog.wait_result(std::time::Duration::from_secs(30));
//! # Ok::<(), herald::HeraldError>(())
//! ```
//!
//! The crate also carries two small Win32 utilities with no lifecycle of
//! their own — the standard shell About dialog (`platform::win32::shell`)
//! and a fatal hard-error trigger (`platform::win32::harderror`) — plus
//! narrow/wide transcoding helpers (`platform::win32::wide`).

mod correlate;
pub mod dialog;
pub mod error;
pub mod host;
pub mod platform;

pub use dialog::{AlignX, AlignY, DialogSession};
pub use error::{HeraldError, Result};
pub use host::{Bounds, DialogHost, WindowRef};

#[cfg(windows)]
pub use platform::win32::{IconSource, MessageBox, MessageBoxParams, ModuleRef, Win32Host};
