//! Handle validation.
//!
//! The same rule applies to handles entered by a user and to generated
//! suggestions: 2 to 30 characters, each one a letter, a digit, `_` or `.`.
//! Letters and digits include non-ASCII alphanumerics; length is counted in
//! characters, not bytes. A handle made only of dots is rejected: it would
//! become a `.` or `..` path segment in a profile URL.

use crate::error::ScoutError;

/// Shortest accepted handle, in characters.
pub const MIN_HANDLE_LEN: usize = 2;

/// Longest accepted handle, in characters.
pub const MAX_HANDLE_LEN: usize = 30;

fn is_handle_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

/// Whether a handle satisfies the validity rule.
pub fn is_valid_handle(handle: &str) -> bool {
    let len = handle.chars().count();
    (MIN_HANDLE_LEN..=MAX_HANDLE_LEN).contains(&len)
        && handle.chars().all(is_handle_char)
        && !is_all_dots(handle)
}

fn is_all_dots(handle: &str) -> bool {
    handle.chars().all(|c| c == '.')
}

/// Validate a handle, explaining what is wrong with it.
///
/// Callers at each entry point run this before any network activity; the
/// checker itself does not re-validate.
pub fn validate_handle(handle: &str) -> Result<(), ScoutError> {
    let len = handle.chars().count();
    if !(MIN_HANDLE_LEN..=MAX_HANDLE_LEN).contains(&len) {
        return Err(ScoutError::invalid_handle(
            handle,
            format!(
                "Username must be {}-{} chars",
                MIN_HANDLE_LEN, MAX_HANDLE_LEN
            ),
        ));
    }

    if !handle.chars().all(is_handle_char) {
        return Err(ScoutError::invalid_handle(
            handle,
            "Username may contain letters, numbers, underscore, dot",
        ));
    }

    if is_all_dots(handle) {
        return Err(ScoutError::invalid_handle(
            handle,
            "Username cannot consist only of dots",
        ));
    }

    Ok(())
}
