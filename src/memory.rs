//! Retained-memory estimation for expression trees.
//!
//! Estimates are additive: a node struct reports its own fixed instance size
//! plus the estimates of every owned child and payload element, and
//! [`Expression::ram_bytes_used`] charges each node one `Expression` slot.
//! The query memory governor sums these per plan.

use crate::expression::Expression;

/// Fixed in-place size of `T`.
pub const fn shallow_size_of<T>() -> u64 {
    std::mem::size_of::<T>() as u64
}

/// Estimated bytes retained by an owned string: its header plus its UTF-8 bytes.
pub fn size_of_string(value: &str) -> u64 {
    shallow_size_of::<String>() + value.len() as u64
}

/// Estimated bytes retained by `expression` and everything it owns.
pub fn estimate(expression: &Expression) -> u64 {
    expression.ram_bytes_used()
}

pub fn estimate_optional(expression: Option<&Expression>) -> u64 {
    expression.map_or(0, estimate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_size_grows_with_length() {
        let empty = size_of_string("");
        assert_eq!(empty, shallow_size_of::<String>());
        assert_eq!(size_of_string("abcd") - empty, 4);
        assert_eq!(size_of_string("é") - empty, 2);
    }

    #[test]
    fn test_estimate_optional() {
        assert_eq!(estimate_optional(None), 0);

        let expr = Expression::time_series("root.sg.d1.s1");
        assert_eq!(estimate_optional(Some(&expr)), estimate(&expr));
        assert!(estimate(&expr) > 0);
    }
}
