// ── Central error type ────────────────────────────────────────────────────────
//
// All fallible operations in herald return `error::Result<T>`.  No panics in
// production paths.  Post-discovery window mutations are deliberately
// infallible no-ops (see `dialog`); only construction and the standalone
// utilities surface errors.

use std::time::Duration;

/// Every error that herald can produce.
#[derive(Debug)]
pub enum HeraldError {
    /// A Win32 API call returned a failure code.
    Win32 {
        /// The name of the failing function, for display purposes.
        function: &'static str,
        /// The raw Win32 error code (`GetLastError()` value) or HRESULT.
        code: u32,
    },

    /// A standard I/O error (currently only worker-thread spawn failure).
    Io(std::io::Error),

    /// No window carrying the correlation token appeared before the
    /// discovery deadline.  The native call may still pop a dialog later;
    /// the worker stays detached and finalizes on its own.
    DiscoveryTimeout {
        /// The correlation token that was being searched for.
        token: String,
        /// How long discovery waited before giving up.
        waited: Duration,
    },

    /// The blocking dialog call returned before a window could be resolved,
    /// so there is no live handle to hand back.  Carries the result the
    /// native call produced (0 for a failed `MessageBoxIndirectW`).
    ClosedDuringDiscovery {
        /// The finalized dialog result.
        result: i32,
    },
}

impl std::fmt::Display for HeraldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Win32 { function, code } => {
                write!(f, "{function} failed (error {code:#010x})")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::DiscoveryTimeout { token, waited } => {
                write!(f, "no window titled {token:?} appeared within {waited:?}")
            }
            Self::ClosedDuringDiscovery { result } => {
                write!(
                    f,
                    "dialog finished (result {result}) before its window could be resolved"
                )
            }
        }
    }
}

impl std::error::Error for HeraldError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for HeraldError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

// Convert a windows-crate error (HRESULT) directly into a HeraldError so that
// `?` can be used on `windows::core::Result<T>` throughout the platform module.
#[cfg(windows)]
impl From<windows::core::Error> for HeraldError {
    fn from(e: windows::core::Error) -> Self {
        // HRESULT.0 is i32; reinterpret bits as u32 for display purposes.
        // Win32 errors appear as 0x8007xxxx HRESULTs.
        Self::Win32 {
            function: "windows",
            code: e.code().0 as u32,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, HeraldError>;
