// ── Win32 platform implementation ─────────────────────────────────────────────
//
// This is the only module in the codebase where `unsafe` code is permitted.
// Every `unsafe` block MUST carry a `// SAFETY:` comment that states:
//   • which invariant makes the operation sound, and
//   • what the caller is responsible for maintaining.
//
// Nothing in this module is `pub` beyond what callers genuinely need; keep the
// unsafe surface as small as possible.

#![allow(unsafe_code)]

use windows::Win32::Foundation::GetLastError;

use crate::error::HeraldError;

// ── Sub-modules ───────────────────────────────────────────────────────────────

pub mod harderror; // hard-error (bugcheck) trigger via ntdll
pub mod message_box; // DialogHost backend + MessageBox session alias
pub mod shell; // ShellAbout wrapper
pub mod wide; // narrow/wide transcoding helpers

pub use message_box::{IconSource, MessageBox, MessageBoxParams, ModuleRef, Win32Host};

// ── Error helpers ─────────────────────────────────────────────────────────────

/// Capture the current Win32 last-error code and wrap it in a `HeraldError`.
///
/// Call immediately after a Win32 function that signals failure —
/// `GetLastError` reads thread-local state that can be overwritten by any
/// subsequent API call.
pub(crate) fn last_error(function: &'static str) -> HeraldError {
    // SAFETY: GetLastError reads thread-local state set by the last Win32
    // call.  It is always safe to call and never fails.
    let code = unsafe { GetLastError() };
    HeraldError::Win32 {
        function,
        code: code.0,
    }
}
