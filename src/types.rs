use std::cmp::Ordering;

/// The ordering contract every map key implements.
///
/// `compared_to` must be a strict total order: consistent across calls,
/// antisymmetric and transitive. The tree never looks inside a key, it only
/// asks how two keys compare.
///
/// ```rust
/// use std::cmp::Ordering;
/// use llrb_map::Key;
///
/// struct Version(u32, u32);
///
/// impl Key for Version {
///     fn compared_to(&self, other: &Self) -> Ordering {
///         (self.0, self.1).cmp(&(other.0, other.1))
///     }
/// }
///
/// assert_eq!(Version(1, 2).compared_to(&Version(1, 10)), Ordering::Less);
/// ```
pub trait Key {
    /// Three-way comparison of `self` against `other`.
    fn compared_to(&self, other: &Self) -> Ordering;
}

/// Implements `Key` by delegating to `Ord`.
macro_rules! ord_key {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Key for $ty {
                #[inline]
                fn compared_to(&self, other: &Self) -> Ordering {
                    Ord::cmp(self, other)
                }
            }
        )*
    };
}

ord_key!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, String,
    Box<str>, Vec<u8>,
);

impl Key for &str {
    #[inline]
    fn compared_to(&self, other: &Self) -> Ordering {
        Ord::cmp(*self, *other)
    }
}

// IEEE 754 total order: -NaN < -inf < ... < -0.0 < +0.0 < ... < +inf < +NaN.
impl Key for f32 {
    #[inline]
    fn compared_to(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }
}

impl Key for f64 {
    #[inline]
    fn compared_to(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }
}

/// The "no key" sentinel. Every `NilKey` compares equal to every other, so a
/// map keyed by it holds at most one entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NilKey;

impl Key for NilKey {
    #[inline]
    fn compared_to(&self, _other: &Self) -> Ordering {
        Ordering::Equal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_false_sorts_first() {
        assert_eq!(false.compared_to(&true), Ordering::Less);
        assert_eq!(true.compared_to(&false), Ordering::Greater);
        assert_eq!(true.compared_to(&true), Ordering::Equal);
    }

    #[test]
    fn floats_use_total_order() {
        assert_eq!(1.5f64.compared_to(&2.5), Ordering::Less);
        assert_eq!((-0.0f64).compared_to(&0.0), Ordering::Less);
        assert_eq!(f64::NAN.compared_to(&f64::INFINITY), Ordering::Greater);
        assert_eq!(f32::NAN.compared_to(&f32::NAN), Ordering::Equal);
    }

    #[test]
    fn strings_and_bytes_are_lexicographic() {
        assert_eq!("apple".compared_to(&"banana"), Ordering::Less);
        assert_eq!(String::from("b").compared_to(&String::from("ab")), Ordering::Greater);
        assert_eq!(b"ab".to_vec().compared_to(&b"abc".to_vec()), Ordering::Less);
    }

    #[test]
    fn nil_keys_are_all_equal() {
        assert_eq!(NilKey.compared_to(&NilKey), Ordering::Equal);
    }
}
