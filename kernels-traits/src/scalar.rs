//! Scalar type bounds and scalar kind tags.

use std::ops::{Add, Mul};

/// Shared trait bounds for all element types usable with the generic kernels.
///
/// The merge step of the sparse engine sums values with `+` starting from
/// `zero()`; the rotation bodies additionally need [`num_traits::Float`].
/// A custom ring type (modular integers, say) satisfies `ScalarBase` without
/// implementing [`Scalar`].
pub trait ScalarBase:
    Copy + PartialEq + Send + Sync + Add<Output = Self> + Mul<Output = Self> + num_traits::Zero + num_traits::One
{
}

impl<T> ScalarBase for T where
    T: Copy + PartialEq + Send + Sync + Add<Output = T> + Mul<Output = T> + num_traits::Zero + num_traits::One
{
}

/// Element type tag used as one axis of a dispatch signature.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    F32,
    F64,
    Complex32,
    Complex64,
    I32,
    I64,
    /// Any type without a dedicated tag. Never registered with a backend.
    Other,
}

impl ScalarKind {
    /// Numeric code, usable in `const` comparisons.
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// A scalar with a known [`ScalarKind`].
///
/// The kind is a compile-time constant, so backend availability for a
/// signature involving `Self` folds to a constant as well.
pub trait Scalar: ScalarBase + 'static {
    const KIND: ScalarKind;
}

macro_rules! impl_scalar {
    ($($t:ty => $kind:ident),* $(,)?) => {
        $(impl Scalar for $t {
            const KIND: ScalarKind = ScalarKind::$kind;
        })*
    };
}

impl_scalar!(
    f32 => F32,
    f64 => F64,
    num_complex::Complex32 => Complex32,
    num_complex::Complex64 => Complex64,
    i32 => I32,
    i64 => I64,
);

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::{One, Zero};

    fn requires_base<T: ScalarBase>(a: T, b: T) -> T {
        a * b + T::one()
    }

    #[test]
    fn test_builtin_kinds() {
        assert_eq!(requires_base(2.0f32, 3.0), 7.0);
        assert_eq!(requires_base(2i64, 3), 7);
        assert_eq!(<f32 as Scalar>::KIND, ScalarKind::F32);
        assert_eq!(<f64 as Scalar>::KIND, ScalarKind::F64);
        assert_eq!(<i32 as Scalar>::KIND, ScalarKind::I32);
        assert_eq!(<num_complex::Complex32 as Scalar>::KIND, ScalarKind::Complex32);
        assert_eq!(<num_complex::Complex64 as Scalar>::KIND, ScalarKind::Complex64);
    }

    /// Integers modulo 7.
    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Mod7(u8);

    impl Add for Mod7 {
        type Output = Self;
        fn add(self, rhs: Self) -> Self {
            Mod7((self.0 + rhs.0) % 7)
        }
    }

    impl Mul for Mod7 {
        type Output = Self;
        fn mul(self, rhs: Self) -> Self {
            Mod7((self.0 * rhs.0) % 7)
        }
    }

    impl Zero for Mod7 {
        fn zero() -> Self {
            Mod7(0)
        }
        fn is_zero(&self) -> bool {
            self.0 == 0
        }
    }

    impl One for Mod7 {
        fn one() -> Self {
            Mod7(1)
        }
    }

    impl Scalar for Mod7 {
        const KIND: ScalarKind = ScalarKind::Other;
    }

    #[test]
    fn test_ring_type_is_tagged_other() {
        assert_eq!(requires_base(Mod7(3), Mod7(4)), Mod7(6));
        assert_eq!(Mod7(5) + Mod7(4), Mod7(2));
        assert_eq!(Mod7::KIND, ScalarKind::Other);
        assert_ne!(Mod7::KIND.code(), ScalarKind::F64.code());
    }
}
