// ── Platform layer ────────────────────────────────────────────────────────────
//
// OS-specific code lives below this module.  No `unsafe` lives here; all
// Win32 FFI is confined to the `win32` sub-module and never leaks outward —
// the rest of the crate talks to the OS through `host::DialogHost`.

#[cfg(windows)]
pub mod win32;
