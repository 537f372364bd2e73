//! # Input Normalization
//!
//! Canonicalization of raw scanner or keyboard input.
//!
//! Printed labels are uppercase, but hand-typed entry and some scanner
//! firmwares deliver lowercase or padded values. Everything downstream
//! (directory lookups, pending comparison, the wire contract) assumes the
//! canonical form produced here.

use crate::WAITER_CODE_PREFIX;

/// Canonicalizes a raw code: trims surrounding whitespace and uppercases.
///
/// Pure and total - empty input maps to the empty string, and callers must
/// reject empty codes themselves.
///
/// ## Example
/// ```rust
/// use festa_core::normalize::normalize;
///
/// assert_eq!(normalize("  pz-001 \n"), "PZ-001");
/// assert_eq!(normalize(""), "");
/// ```
pub fn normalize(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Returns true if a normalized code has the waiter-badge shape.
///
/// Only meaningful on already-normalized input; `w-7` is not a waiter code
/// until it has been through [`normalize`].
pub fn is_waiter_code(code: &str) -> bool {
    code.starts_with(WAITER_CODE_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_and_uppercases() {
        assert_eq!(normalize("  pz-001  "), "PZ-001");
        assert_eq!(normalize("\tw-7\n"), "W-7");
        assert_eq!(normalize("PZ-002"), "PZ-002");
    }

    #[test]
    fn test_normalize_is_total() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_waiter_code_shape() {
        assert!(is_waiter_code("W-7"));
        assert!(is_waiter_code("W-"));
        assert!(!is_waiter_code("PZ-001"));
        // Not normalized yet, so not a waiter code
        assert!(!is_waiter_code("w-7"));
    }
}
