// ── Hard-error trigger ────────────────────────────────────────────────────────
//
// Simulates a fatal system error: enable the shutdown privilege on the
// process token, resolve `ZwRaiseHardError` from ntdll, and ask the kernel to
// shut the system down with the given status.  Sequential, no state to keep —
// on success the machine stops before this module returns.

#![allow(unsafe_code)]

use std::convert::Infallible;
use std::thread;
use std::time::Duration;

use windows::{
    core::{s, w, PCWSTR},
    Win32::{
        Foundation::{
            CloseHandle, GetLastError, ERROR_NOT_ALL_ASSIGNED, HANDLE, LUID, UNICODE_STRING,
        },
        Security::{
            AdjustTokenPrivileges, LookupPrivilegeValueW, OpenProcessToken, LUID_AND_ATTRIBUTES,
            SE_PRIVILEGE_ENABLED, SE_SHUTDOWN_NAME, TOKEN_ADJUST_PRIVILEGES, TOKEN_PRIVILEGES,
        },
        System::{
            LibraryLoader::{GetModuleHandleW, GetProcAddress},
            Threading::GetCurrentProcess,
        },
    },
};

use super::last_error;
use crate::error::{HeraldError, Result};

// ── Tuning ────────────────────────────────────────────────────────────────────

/// `HARDERROR_RESPONSE_OPTION` value that makes the kernel bugcheck instead
/// of showing a message to the user.
const OPTION_SHUTDOWN_SYSTEM: u32 = 6;

/// Parameter-slot mask for `ZwRaiseHardError`: bit 2 marks the third slot as
/// a `UNICODE_STRING` pointer.
const UNICODE_MASK: u32 = 0b100;

/// The token can be momentarily busy; retry privilege adjustment briefly
/// before giving up.
const PRIVILEGE_RETRY_DELAY: Duration = Duration::from_millis(10);
const PRIVILEGE_MAX_ATTEMPTS: u32 = 100;

/// Pause between attempts if the kernel declines the hard error.
const REISSUE_DELAY: Duration = Duration::from_secs(1);

/// `ZwRaiseHardError` — undocumented, resolved from ntdll at runtime.  The
/// signature has been stable across NT releases.
type ZwRaiseHardError = unsafe extern "system" fn(
    status: i32,
    n_params: u32,
    unicode_mask: u32,
    params: *const usize,
    response_option: u32,
    response: *mut u32,
) -> i32;

// ── Entry point ───────────────────────────────────────────────────────────────

/// Raise a fatal system hard error ("blue screen") carrying `status`.
///
/// Needs the shutdown privilege, which only elevated tokens hold; callers
/// without it get an error back instead of a dead machine.  On success this
/// never returns.
pub fn raise(status: i32) -> Result<Infallible> {
    enable_shutdown_privilege()?;

    // SAFETY: ntdll is mapped into every process for its whole lifetime, so
    // the returned module handle never dangles.
    let ntdll = unsafe { GetModuleHandleW(w!("ntdll.dll")) }.map_err(HeraldError::from)?;

    // SAFETY: ntdll is a valid module handle and the export name is a
    // NUL-terminated literal.
    let entry = unsafe { GetProcAddress(ntdll, s!("ZwRaiseHardError")) }
        .ok_or_else(|| last_error("GetProcAddress"))?;

    // SAFETY: the export carries the signature declared above on every NT
    // release; the transmute only reinterprets the function pointer type.
    let zw_raise_hard_error: ZwRaiseHardError = unsafe { std::mem::transmute(entry) };

    // Third parameter slot is an empty UNICODE_STRING, per the mask.
    let empty = UNICODE_STRING::default();
    let params: [usize; 3] = [0, 0, std::ptr::addr_of!(empty) as usize];
    let mut response = 0u32;

    loop {
        // SAFETY: the parameter array and response out-pointer stay valid for
        // the call; with the shutdown privilege enabled and the
        // shutdown-system response option the kernel bugchecks rather than
        // returning.
        unsafe {
            let _ = zw_raise_hard_error(
                status,
                params.len() as u32,
                UNICODE_MASK,
                params.as_ptr(),
                OPTION_SHUTDOWN_SYSTEM,
                &mut response,
            );
        }
        // Only reachable if the kernel declined; try again shortly.
        thread::sleep(REISSUE_DELAY);
    }
}

// ── Privilege adjustment ──────────────────────────────────────────────────────

/// Enable `SeShutdownPrivilege` on the current process token, retrying for a
/// bounded interval before surfacing the last failure.
fn enable_shutdown_privilege() -> Result<()> {
    let mut attempts = 0u32;
    loop {
        match try_enable_shutdown_privilege() {
            Ok(()) => return Ok(()),
            Err(e) => {
                attempts += 1;
                if attempts >= PRIVILEGE_MAX_ATTEMPTS {
                    return Err(e);
                }
                thread::sleep(PRIVILEGE_RETRY_DELAY);
            }
        }
    }
}

fn try_enable_shutdown_privilege() -> Result<()> {
    let mut token = HANDLE::default();
    // SAFETY: GetCurrentProcess returns a pseudo-handle that needs no
    // closing; the token out-pointer is valid for the call.
    unsafe { OpenProcessToken(GetCurrentProcess(), TOKEN_ADJUST_PRIVILEGES, &mut token) }
        .map_err(HeraldError::from)?;

    let adjust = || -> Result<()> {
        let mut luid = LUID::default();
        // SAFETY: the privilege name is a valid constant and the out-pointer
        // is valid; a null system name means the local machine.
        unsafe { LookupPrivilegeValueW(PCWSTR::null(), SE_SHUTDOWN_NAME, &mut luid) }
            .map_err(HeraldError::from)?;

        let new_state = TOKEN_PRIVILEGES {
            PrivilegeCount: 1,
            Privileges: [LUID_AND_ATTRIBUTES {
                Luid: luid,
                Attributes: SE_PRIVILEGE_ENABLED,
            }],
        };
        // SAFETY: the token was opened with TOKEN_ADJUST_PRIVILEGES and
        // new_state is fully initialized; no previous state is requested.
        unsafe { AdjustTokenPrivileges(token, false, Some(&new_state), 0, None, None) }
            .map_err(HeraldError::from)?;

        // The call succeeds even when nothing was assigned; the verdict is
        // in the thread's last error.
        // SAFETY: GetLastError reads thread-local state only.
        if unsafe { GetLastError() } == ERROR_NOT_ALL_ASSIGNED {
            return Err(HeraldError::Win32 {
                function: "AdjustTokenPrivileges",
                code: ERROR_NOT_ALL_ASSIGNED.0,
            });
        }
        Ok(())
    };

    let result = adjust();
    // SAFETY: the token was opened above and is closed exactly once.
    unsafe {
        let _ = CloseHandle(token);
    }
    result
}
