//! Saturating counters
//!
//! Increment and decrement clamp at a bound instead of wrapping. The bound is
//! optional: without one the type's own range is used.

/// Unsigned counter types that can be stepped by one without wrapping
pub trait Saturating: Copy + Ord {
    /// Lowest representable value
    const ZERO: Self;
    /// Highest representable value
    const MAX: Self;

    /// Add one, clamping at `Self::MAX`
    #[must_use]
    fn step_up(self) -> Self;

    /// Subtract one, clamping at `Self::ZERO`
    #[must_use]
    fn step_down(self) -> Self;
}

macro_rules! impl_saturating {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Saturating for $ty {
                const ZERO: Self = 0;
                const MAX: Self = <$ty>::MAX;

                #[inline]
                fn step_up(self) -> Self {
                    self.saturating_add(1)
                }

                #[inline]
                fn step_down(self) -> Self {
                    self.saturating_sub(1)
                }
            }
        )*
    };
}

impl_saturating!(u8, u16, u32, u64, usize);

/// Increment `value` by one unless it already reached `limit`
///
/// With `limit == None` the counter stops at the type maximum.
/// Returns `true` if the value changed.
#[inline]
pub fn incr<T: Saturating>(value: &mut T, limit: Option<T>) -> bool {
    let bound = limit.unwrap_or(T::MAX);
    if *value < bound {
        *value = value.step_up();
        true
    } else {
        false
    }
}

/// Decrement `value` by one while it stays above `floor`
///
/// With `floor == None` the counter stops at zero.
/// Returns `true` if the value changed.
#[inline]
pub fn decr<T: Saturating>(value: &mut T, floor: Option<T>) -> bool {
    let bound = floor.unwrap_or(T::ZERO);
    if *value > bound {
        *value = value.step_down();
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(0u8, None, 1u8, true)]
    #[case(u8::MAX, None, u8::MAX, false)]
    #[case(3u8, Some(4u8), 4u8, true)]
    #[case(4u8, Some(4u8), 4u8, false)]
    #[case(9u8, Some(4u8), 9u8, false)]
    fn test_incr_u8(
        #[case] start: u8,
        #[case] limit: Option<u8>,
        #[case] expected: u8,
        #[case] changed: bool,
    ) {
        let mut value = start;
        assert_eq!(incr(&mut value, limit), changed);
        assert_eq!(value, expected);
    }

    #[rstest]
    #[case(1u16, None, 0u16, true)]
    #[case(0u16, None, 0u16, false)]
    #[case(5u16, Some(2u16), 4u16, true)]
    #[case(2u16, Some(2u16), 2u16, false)]
    fn test_decr_u16(
        #[case] start: u16,
        #[case] floor: Option<u16>,
        #[case] expected: u16,
        #[case] changed: bool,
    ) {
        let mut value = start;
        assert_eq!(decr(&mut value, floor), changed);
        assert_eq!(value, expected);
    }

    #[test]
    fn test_usize_counter_pins_at_limit() {
        let mut count = 0usize;
        for _ in 0..100 {
            incr(&mut count, Some(64));
        }
        assert_eq!(count, 64);

        for _ in 0..100 {
            decr(&mut count, None);
        }
        assert_eq!(count, 0);
    }

    proptest! {
        #[test]
        fn prop_incr_never_passes_limit(start in 0u32..1000, limit in 0u32..1000, steps in 0usize..50) {
            let mut value = start;
            for _ in 0..steps {
                incr(&mut value, Some(limit));
            }
            prop_assert!(value <= start.max(limit));
            prop_assert!(value >= start);
        }

        #[test]
        fn prop_decr_never_goes_below_floor(start in 0u64..1000, floor in 0u64..1000, steps in 0usize..50) {
            let mut value = start;
            for _ in 0..steps {
                decr(&mut value, Some(floor));
            }
            prop_assert!(value >= start.min(floor));
            prop_assert!(value <= start);
        }
    }
}
