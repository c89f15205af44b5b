//! C-compatible FFI API for the tag normalizer.
//!
//! # ABI Contract
//!
//! All exported functions use the `extern "C"` calling convention and
//! `#[no_mangle]` so symbol names are stable.
//!
//! ## Memory management
//! - Strings returned through out-parameters are allocated on the Rust heap
//!   and **must** be released with `rforge_free_string`.
//! - Passing a null pointer to `rforge_free_string` is a no-op.
//!
//! ## Error handling
//! - Functions that can fail return a `c_int`; `0` means success.
//! - The message for the most recent failure is available from
//!   `rforge_last_error`.
//!
//! ## Thread safety
//! - The last error is thread-local.
//!
//! ## Usage from Go (cgo)
//! ```go
//! // #cgo LDFLAGS: -lresume_forge
//! // #include <stdint.h>
//! // extern int rforge_normalize_tags(const char* input, char** out, int64_t* out_position);
//! // extern void rforge_free_string(char* s);
//! // extern const char* rforge_last_error();
//! import "C"
//! ```

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};
use std::ptr;

use crate::tags::{normalize_tags, TagError};

/// Success.
pub const RFORGE_OK: c_int = 0;
/// A required pointer argument was null.
pub const RFORGE_NULL_POINTER: c_int = 1;
/// The input was not valid UTF-8.
pub const RFORGE_INVALID_UTF8: c_int = 2;
/// `<%` found while another `<%` was open.
pub const RFORGE_NESTED_TAG: c_int = 3;
/// `%>` found with no open `<%`.
pub const RFORGE_UNMATCHED_CLOSE: c_int = 4;
/// Input ended with a `<%` still open.
pub const RFORGE_UNMATCHED_OPEN: c_int = 5;

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

fn tag_error_code(err: &TagError) -> c_int {
    match err {
        TagError::Nested { .. } => RFORGE_NESTED_TAG,
        TagError::UnmatchedClose { .. } => RFORGE_UNMATCHED_CLOSE,
        TagError::UnmatchedOpen { .. } => RFORGE_UNMATCHED_OPEN,
    }
}

/// Rewrite `<%…%>` spans in a null-terminated UTF-8 string as `<b>…</b>`.
///
/// # Parameters
/// - `input`: null-terminated UTF-8 text
/// - `out`: on success, receives a newly allocated null-terminated string
/// - `out_position`: optional; on a markup error receives the character
///   offset of the offending token, otherwise `-1`
///
/// # Returns
/// `RFORGE_OK` on success, otherwise one of the `RFORGE_*` error codes.
///
/// # Safety
/// - `input` must point to a valid null-terminated string.
/// - `out` must be a valid pointer; `out_position` must be valid or null.
/// - The caller must free `*out` with `rforge_free_string`.
#[no_mangle]
pub unsafe extern "C" fn rforge_normalize_tags(
    input: *const c_char,
    out: *mut *mut c_char,
    out_position: *mut i64,
) -> c_int {
    if !out_position.is_null() {
        *out_position = -1;
    }
    if input.is_null() || out.is_null() {
        set_last_error("Null pointer argument");
        return RFORGE_NULL_POINTER;
    }
    *out = ptr::null_mut();

    let text = match CStr::from_ptr(input).to_str() {
        Ok(s) => s,
        Err(e) => {
            set_last_error(&format!("Invalid UTF-8: {e}"));
            return RFORGE_INVALID_UTF8;
        }
    };

    match normalize_tags(text) {
        Ok(normalized) => match CString::new(normalized) {
            Ok(cs) => {
                *out = cs.into_raw();
                RFORGE_OK
            }
            // Unreachable in practice: the input had no interior NUL either.
            Err(_) => {
                set_last_error("Output contained null byte");
                RFORGE_INVALID_UTF8
            }
        },
        Err(err) => {
            if !out_position.is_null() {
                *out_position = err.position() as i64;
            }
            set_last_error(&err.to_string());
            tag_error_code(&err)
        }
    }
}

/// Free a string returned through an `rforge_*` out-parameter.
///
/// # Safety
/// `s` must have been produced by this library, or be null.
#[no_mangle]
pub unsafe extern "C" fn rforge_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = CString::from_raw(s);
    }
}

/// Retrieve the last error message as a null-terminated string.
///
/// The pointer stays valid until the next failing `rforge_*` call on the same
/// thread and must **not** be freed. Returns null if nothing has failed yet.
#[no_mangle]
pub extern "C" fn rforge_last_error() -> *const c_char {
    LAST_ERROR.with(|e| {
        let borrow = e.borrow();
        match borrow.as_ref() {
            Some(cs) => cs.as_ptr(),
            None => ptr::null(),
        }
    })
}

/// Library version as a static null-terminated string. Do not free.
#[no_mangle]
pub extern "C" fn rforge_version() -> *const c_char {
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr() as *const c_char
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn cs(s: &str) -> CString {
        CString::new(s).unwrap()
    }

    fn call(input: &CStr) -> (c_int, Option<String>, i64) {
        let mut out: *mut c_char = ptr::null_mut();
        let mut position: i64 = 0;
        let rc = unsafe { rforge_normalize_tags(input.as_ptr(), &mut out, &mut position) };
        let text = if out.is_null() {
            None
        } else {
            let s = unsafe { CStr::from_ptr(out) }.to_str().unwrap().to_string();
            unsafe { rforge_free_string(out) };
            Some(s)
        };
        (rc, text, position)
    }

    #[test]
    fn ffi_normalize() {
        let (rc, text, position) = call(&cs("Built <%fast%> tools"));
        assert_eq!(rc, RFORGE_OK);
        assert_eq!(text.as_deref(), Some("Built <b>fast</b> tools"));
        assert_eq!(position, -1);
    }

    #[test]
    fn ffi_error_codes_and_positions() {
        assert_eq!(call(&cs("<%a<%b%>%>")), (RFORGE_NESTED_TAG, None, 3));
        assert_eq!(call(&cs("a%>b")), (RFORGE_UNMATCHED_CLOSE, None, 1));
        assert_eq!(call(&cs("<%abc")), (RFORGE_UNMATCHED_OPEN, None, 0));

        let msg = unsafe { CStr::from_ptr(rforge_last_error()) };
        assert_eq!(msg.to_str().unwrap(), "unmatched '<%' found at position 0");
    }

    #[test]
    fn ffi_null_input() {
        let mut out: *mut c_char = ptr::null_mut();
        let rc = unsafe { rforge_normalize_tags(ptr::null(), &mut out, ptr::null_mut()) };
        assert_eq!(rc, RFORGE_NULL_POINTER);
        assert!(out.is_null());
    }

    #[test]
    fn ffi_invalid_utf8() {
        let bytes = b"ab\xff\0";
        let input = CStr::from_bytes_with_nul(bytes).unwrap();
        let (rc, text, _) = call(input);
        assert_eq!(rc, RFORGE_INVALID_UTF8);
        assert!(text.is_none());
    }

    #[test]
    fn ffi_version() {
        let v = unsafe { CStr::from_ptr(rforge_version()) };
        assert_eq!(v.to_str().unwrap(), env!("CARGO_PKG_VERSION"));
    }
}
