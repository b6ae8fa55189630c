// ── Title correlation ─────────────────────────────────────────────────────────
//
// The native dialog call never hands back a window handle while the dialog is
// open, so the session plants a unique throwaway title on the dialog and finds
// the window by exact-title lookup.  This module owns the two pieces of that
// protocol: token generation and the pacing of the discovery wait.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

/// Private marker prefixed to every correlation token.  Lookup searches the
/// OS-global window registry, so the token also embeds the process id — two
/// herald processes probing at once must never match each other's dialogs.
const TOKEN_PREFIX: &str = "__herald_probe_";

/// Process-wide token sequence.  Monotonic uniqueness is all that is needed;
/// the counter is never reset.
static NEXT_SEQ: AtomicU32 = AtomicU32::new(0);

/// Produce a correlation token that no other live session in any process is
/// using as a window title.
pub(crate) fn next_token() -> String {
    let seq = NEXT_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("{TOKEN_PREFIX}{}_{seq}", std::process::id())
}

// ── Discovery pacing ──────────────────────────────────────────────────────────

/// Attempts served by pure spinning before the schedule starts sleeping.
/// A message box typically materializes within well under a millisecond, so
/// the common case never reaches the first sleep.
const SPIN_ATTEMPTS: u32 = 128;

/// First sleep after the spin phase.
const INITIAL_BACKOFF: Duration = Duration::from_micros(50);

/// Ceiling for the exponential backoff.  Keeps worst-case discovery latency
/// (window appears just after a sleep begins) small relative to the deadline.
const MAX_BACKOFF: Duration = Duration::from_millis(2);

/// Delay to apply after the `attempt`-th failed lookup (0-based).
/// `Duration::ZERO` means "spin, do not sleep".
pub(crate) fn backoff_delay(attempt: u32) -> Duration {
    if attempt < SPIN_ATTEMPTS {
        return Duration::ZERO;
    }
    // Shift capped well below 32 so the multiplier cannot overflow.
    let exp = (attempt - SPIN_ATTEMPTS).min(16);
    (INITIAL_BACKOFF * (1u32 << exp)).min(MAX_BACKOFF)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
