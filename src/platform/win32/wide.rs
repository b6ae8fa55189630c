// ── Narrow/wide transcoding ───────────────────────────────────────────────────
//
// UTF-8 ↔ UTF-16 goes through std; arbitrary Windows code pages go through
// `MultiByteToWideChar` / `WideCharToMultiByte` with the usual size-then-fill
// two-call pattern.

#![allow(unsafe_code)]

use windows::{
    core::PCSTR,
    Win32::Globalization::{
        MultiByteToWideChar, WideCharToMultiByte, CP_ACP, CP_UTF8,
        MULTI_BYTE_TO_WIDE_CHAR_FLAGS,
    },
};

use super::last_error;
use crate::error::Result;

// ── UTF-16 for FFI ────────────────────────────────────────────────────────────

/// Encode `s` as NUL-terminated UTF-16, ready to pass as a `PCWSTR`.
pub fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Decode UTF-16 units up to the first NUL (or the whole slice), lossily.
pub fn from_wide(units: &[u16]) -> String {
    let len = units.iter().position(|&u| u == 0).unwrap_or(units.len());
    String::from_utf16_lossy(&units[..len])
}

// ── Code-page conversion ──────────────────────────────────────────────────────

/// Decode `bytes` from the given Windows code page.
pub fn multibyte_to_string(code_page: u32, bytes: &[u8]) -> Result<String> {
    if bytes.is_empty() {
        return Ok(String::new());
    }

    // SAFETY: with no output slice the call only measures; the input slice
    // is valid for the duration of the call.
    let needed = unsafe {
        MultiByteToWideChar(code_page, MULTI_BYTE_TO_WIDE_CHAR_FLAGS(0), bytes, None)
    };
    if needed <= 0 {
        return Err(last_error("MultiByteToWideChar"));
    }

    let mut wide = vec![0u16; needed as usize];
    // SAFETY: `wide` is exactly the size the measuring call reported; both
    // slices are valid for the duration of the call.
    let written = unsafe {
        MultiByteToWideChar(
            code_page,
            MULTI_BYTE_TO_WIDE_CHAR_FLAGS(0),
            bytes,
            Some(&mut wide),
        )
    };
    if written <= 0 {
        return Err(last_error("MultiByteToWideChar"));
    }

    wide.truncate(written as usize);
    Ok(String::from_utf16_lossy(&wide))
}

/// Encode `s` into the given Windows code page.  Characters without a
/// representation in the target code page become the code page's default
/// character.
pub fn string_to_multibyte(code_page: u32, s: &str) -> Result<Vec<u8>> {
    if s.is_empty() {
        return Ok(Vec::new());
    }

    let wide: Vec<u16> = s.encode_utf16().collect();

    // SAFETY: with no output slice the call only measures; the input slice
    // is valid for the duration of the call.
    let needed = unsafe { WideCharToMultiByte(code_page, 0, &wide, None, PCSTR::null(), None) };
    if needed <= 0 {
        return Err(last_error("WideCharToMultiByte"));
    }

    let mut bytes = vec![0u8; needed as usize];
    // SAFETY: `bytes` is exactly the size the measuring call reported; both
    // slices are valid for the duration of the call.
    let written = unsafe {
        WideCharToMultiByte(code_page, 0, &wide, Some(&mut bytes), PCSTR::null(), None)
    };
    if written <= 0 {
        return Err(last_error("WideCharToMultiByte"));
    }

    bytes.truncate(written as usize);
    Ok(bytes)
}

/// Decode bytes from the system ANSI code page.
pub fn ansi_to_string(bytes: &[u8]) -> Result<String> {
    multibyte_to_string(CP_ACP, bytes)
}

/// Encode `s` into the system ANSI code page.
pub fn string_to_ansi(s: &str) -> Result<Vec<u8>> {
    string_to_multibyte(CP_ACP, s)
}

/// Decode UTF-8 bytes via the code-page machinery.  Prefer
/// `std::str::from_utf8` unless parity with the other code pages matters.
pub fn utf8_to_string(bytes: &[u8]) -> Result<String> {
    multibyte_to_string(CP_UTF8, bytes)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_wide_appends_terminator() {
        assert_eq!(to_wide("hi"), vec![b'h' as u16, b'i' as u16, 0]);
        assert_eq!(to_wide(""), vec![0]);
    }

    #[test]
    fn from_wide_stops_at_terminator() {
        let units = [b'h' as u16, b'i' as u16, 0, b'x' as u16];
        assert_eq!(from_wide(&units), "hi");
        assert_eq!(from_wide(&[]), "");
    }

    #[test]
    fn wide_roundtrip_preserves_non_ascii() {
        let original = "héllo — 你好";
        assert_eq!(from_wide(&to_wide(original)), original);
    }

    #[test]
    fn utf8_code_page_roundtrip() {
        let original = "héllo — 你好";
        let bytes = string_to_multibyte(CP_UTF8, original).expect("encode");
        assert_eq!(bytes, original.as_bytes());
        assert_eq!(
            multibyte_to_string(CP_UTF8, &bytes).expect("decode"),
            original
        );
    }

    #[test]
    fn ansi_roundtrip_for_ascii() {
        // ASCII maps identically in every ANSI code page.
        let bytes = string_to_ansi("plain ascii").expect("encode");
        assert_eq!(bytes, b"plain ascii");
        assert_eq!(ansi_to_string(&bytes).expect("decode"), "plain ascii");
    }

    #[test]
    fn empty_inputs_do_not_reach_the_os() {
        assert_eq!(multibyte_to_string(CP_UTF8, &[]).expect("decode"), "");
        assert!(string_to_multibyte(CP_UTF8, "").expect("encode").is_empty());
    }
}
