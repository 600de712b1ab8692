//! Availability arithmetic for a seance.
//!
//! The admission check and the public availability endpoint share the same
//! raw computation but differ in how they treat a negative result: admission
//! compares against the unclamped value, the endpoint clamps to zero for
//! display (a negative can only appear transiently, because the two sums are
//! read without the seance lock).

/// Unclamped availability: `capacity - sold - active_held`.
///
/// This is the value the hold admission check must use. It can go negative
/// only when the sums straddle a concurrent commit; admission itself always
/// runs under the seance row lock and never observes that.
pub fn available(capacity: i64, sold: i64, active_held: i64) -> i64 {
    capacity - sold - active_held
}

/// Availability for display: negative values are clamped to zero.
pub fn available_for_display(capacity: i64, sold: i64, active_held: i64) -> i64 {
    available(capacity, sold, active_held).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn available_subtracts_sold_and_held() {
        assert_eq!(available(10, 3, 4), 3);
    }

    #[test]
    fn available_is_capacity_when_nothing_reserved() {
        assert_eq!(available(10, 0, 0), 10);
    }

    #[test]
    fn available_can_go_negative() {
        assert_eq!(available(10, 8, 5), -3);
    }

    #[test]
    fn display_clamps_negative_to_zero() {
        assert_eq!(available_for_display(10, 8, 5), 0);
    }

    #[test]
    fn display_leaves_zero_untouched() {
        assert_eq!(available_for_display(10, 6, 4), 0);
    }

    #[test]
    fn display_leaves_positive_untouched() {
        assert_eq!(available_for_display(10, 2, 3), 5);
    }
}
