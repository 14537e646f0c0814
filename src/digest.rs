//! Digest family: maps a key to the `u64` the map uses as its sole identity.
//!
//! Digests are deliberately weak. Integers digest to themselves and text
//! digests to the sum of its bytes, so `"ab"` and `"ba"` collide. Because
//! the map never compares keys, a collision is an identity clash, not just
//! a slower probe.
//!
//! Only the types below implement [`Digestible`]. Using any other key type
//! (tuples, structs, floats) with [`HashMap`](crate::HashMap) is a compile
//! error rather than a runtime failure.

use std::borrow::Cow;
use std::rc::Rc;

/// Digest recorded in a free or never-claimed slot.
///
/// Keys that digest to this value are not remapped; see
/// [`HashMap::insert`](crate::HashMap::insert).
pub const EMPTY_DIGEST: u64 = 0;

/// A key type with a defined digest computation.
pub trait Digestible {
    /// Pure and deterministic: equal inputs always yield equal digests.
    fn digest(&self) -> u64;
}

macro_rules! digest_unsigned {
    ($($t:ty),*) => {
        $(
            impl Digestible for $t {
                #[inline]
                fn digest(&self) -> u64 {
                    *self as u64
                }
            }
        )*
    };
}

// Signed values sign-extend to 64 bits before reinterpretation, so -1
// digests to u64::MAX just like a C cast to size_t.
macro_rules! digest_signed {
    ($($t:ty),*) => {
        $(
            impl Digestible for $t {
                #[inline]
                fn digest(&self) -> u64 {
                    *self as i64 as u64
                }
            }
        )*
    };
}

digest_unsigned!(u8, u16, u32, u64, usize, u128);
digest_signed!(i8, i16, i32, i64, isize, i128);

/// Wrapping sum of the unsigned byte values of `bytes`.
#[inline]
fn byte_sum(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(0u64, |acc, &b| acc.wrapping_add(u64::from(b)))
}

impl Digestible for str {
    #[inline]
    fn digest(&self) -> u64 {
        byte_sum(self.as_bytes())
    }
}

impl Digestible for String {
    #[inline]
    fn digest(&self) -> u64 {
        self.as_str().digest()
    }
}

impl Digestible for char {
    #[inline]
    fn digest(&self) -> u64 {
        let mut buf = [0u8; 4];
        self.encode_utf8(&mut buf).digest()
    }
}

impl Digestible for Cow<'_, str> {
    #[inline]
    fn digest(&self) -> u64 {
        self.as_ref().digest()
    }
}

impl<T: Digestible + ?Sized> Digestible for &T {
    #[inline]
    fn digest(&self) -> u64 {
        (**self).digest()
    }
}

impl<T: Digestible + ?Sized> Digestible for Box<T> {
    #[inline]
    fn digest(&self) -> u64 {
        (**self).digest()
    }
}

impl<T: Digestible + ?Sized> Digestible for Rc<T> {
    #[inline]
    fn digest(&self) -> u64 {
        (**self).digest()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use static_assertions::{assert_impl_all, assert_not_impl_any};

    assert_impl_all!(i32: Digestible);
    assert_impl_all!(str: Digestible);
    assert_impl_all!(String: Digestible);
    assert_impl_all!(&'static str: Digestible);
    assert_not_impl_any!((i32, i32): Digestible);
    assert_not_impl_any!(f64: Digestible);
    assert_not_impl_any!(Vec<u8>: Digestible);

    /// Invariant: integer digests are the identity on the unsigned width.
    #[test]
    fn integers_digest_to_themselves() {
        assert_eq!(0u32.digest(), 0);
        assert_eq!(42i32.digest(), 42);
        assert_eq!(7usize.digest(), 7);
        assert_eq!(u64::MAX.digest(), u64::MAX);
    }

    /// Invariant: negative integers sign-extend before the cast.
    #[test]
    fn negative_integers_sign_extend() {
        assert_eq!((-1i32).digest(), u64::MAX);
        assert_eq!((-1i8).digest(), u64::MAX);
        assert_eq!((-2i64).digest(), u64::MAX - 1);
    }

    /// Invariant: text digests sum bytes, so anagrams collide.
    #[test]
    fn text_sums_bytes_and_collides_on_anagrams() {
        assert_eq!("a".digest(), 97);
        assert_eq!("ab".digest(), 97 + 98);
        assert_eq!("ab".digest(), "ba".digest());
        assert_eq!("".digest(), EMPTY_DIGEST);
    }

    /// Invariant: bytes are read unsigned, so non-ASCII text never subtracts.
    #[test]
    fn non_ascii_bytes_are_unsigned() {
        // U+00E9 encodes as 0xC3 0xA9.
        assert_eq!("é".digest(), 0xC3 + 0xA9);
        assert_eq!('é'.digest(), "é".digest());
    }

    /// Invariant: owned, borrowed and boxed text share one digest.
    #[test]
    fn wrappers_forward_to_pointee() {
        let s = String::from("Willy");
        let expected = "Willy".digest();
        assert_eq!(s.digest(), expected);
        assert_eq!((&s).digest(), expected);
        assert_eq!(Box::<str>::from("Willy").digest(), expected);
        assert_eq!(Cow::Borrowed("Willy").digest(), expected);
        assert_eq!(Rc::new(5u16).digest(), 5);
    }
}
