//! Animatable vector values
//!
//! [`Vector`] is the interchange format between view properties and the
//! spring integrator: a fixed number of `f32` components. The integrator
//! itself works on one of two [`Interpolatable`] value types, [`Vector1D`]
//! (alpha) and [`Vector4D`] (frame: x, y, width, height).

use lightbox_core::Rect;
use smallvec::SmallVec;
use std::ops::{Add, Mul, Neg, Sub};

/// Ordered, fixed-length sequence of components
///
/// The component count is fixed at construction; values can be changed in
/// place through [`Vector::values_mut`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Vector {
    values: SmallVec<[f32; 4]>,
}

impl Vector {
    pub fn new(values: &[f32]) -> Self {
        Self {
            values: SmallVec::from_slice(values),
        }
    }

    /// A vector of `count` zero components
    pub fn zeros(count: usize) -> Self {
        Self {
            values: SmallVec::from_elem(0.0, count),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [f32] {
        &mut self.values
    }

    /// True if every component is within `threshold` of `target`
    ///
    /// Vectors of different lengths are never within threshold of each other.
    pub fn is_within(&self, target: &Vector, threshold: f32) -> bool {
        self.len() == target.len()
            && self
                .values
                .iter()
                .zip(target.values.iter())
                .all(|(current, target)| (current - target).abs() <= threshold)
    }

    /// Component `index`, or zero past the end
    fn component(&self, index: usize) -> f32 {
        self.values.get(index).copied().unwrap_or(0.0)
    }
}

impl From<&[f32]> for Vector {
    fn from(values: &[f32]) -> Self {
        Vector::new(values)
    }
}

impl<const N: usize> From<[f32; N]> for Vector {
    fn from(values: [f32; N]) -> Self {
        Vector::new(&values)
    }
}

impl FromIterator<f32> for Vector {
    fn from_iter<I: IntoIterator<Item = f32>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::Vector1D {}
    impl Sealed for super::Vector4D {}
}

/// A fixed-size value the spring integrator can operate on
///
/// Arithmetic is componentwise. Conversion from a [`Vector`] zero-pads short
/// input and drops components beyond [`Interpolatable::COMPONENTS`].
///
/// Implemented only by [`Vector1D`] and [`Vector4D`].
pub trait Interpolatable:
    sealed::Sealed
    + Copy
    + std::fmt::Debug
    + PartialEq
    + Neg<Output = Self>
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Mul<f32, Output = Self>
{
    /// Number of components
    const COMPONENTS: usize;

    const ZERO: Self;

    fn from_vector(vector: &Vector) -> Self;

    fn to_vector(&self) -> Vector;
}

// ============================================================================
// Vector1D
// ============================================================================

/// Single-component value (alpha)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector1D {
    pub x: f32,
}

impl Vector1D {
    pub const ZERO: Vector1D = Vector1D { x: 0.0 };

    pub const fn new(x: f32) -> Self {
        Self { x }
    }
}

impl Interpolatable for Vector1D {
    const COMPONENTS: usize = 1;
    const ZERO: Self = Vector1D::ZERO;

    fn from_vector(vector: &Vector) -> Self {
        Self::new(vector.component(0))
    }

    fn to_vector(&self) -> Vector {
        Vector::from([self.x])
    }
}

impl From<f32> for Vector1D {
    fn from(x: f32) -> Self {
        Self::new(x)
    }
}

// ============================================================================
// Vector4D
// ============================================================================

/// Four-component value (frame as x, y, width, height)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector4D {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vector4D {
    pub const ZERO: Vector4D = Vector4D {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 0.0,
    };

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }
}

impl Interpolatable for Vector4D {
    const COMPONENTS: usize = 4;
    const ZERO: Self = Vector4D::ZERO;

    fn from_vector(vector: &Vector) -> Self {
        Self::new(
            vector.component(0),
            vector.component(1),
            vector.component(2),
            vector.component(3),
        )
    }

    fn to_vector(&self) -> Vector {
        Vector::from([self.x, self.y, self.z, self.w])
    }
}

impl From<Rect> for Vector4D {
    fn from(rect: Rect) -> Self {
        let [x, y, width, height] = rect.to_array();
        Self::new(x, y, width, height)
    }
}

impl From<Vector4D> for Rect {
    fn from(value: Vector4D) -> Self {
        Rect::from_array([value.x, value.y, value.z, value.w])
    }
}

// ============================================================================
// Componentwise arithmetic
// ============================================================================

macro_rules! impl_componentwise_ops {
    ($ty:ident { $($field:ident),+ }) => {
        impl Neg for $ty {
            type Output = $ty;

            fn neg(self) -> $ty {
                $ty { $($field: -self.$field),+ }
            }
        }

        impl Add for $ty {
            type Output = $ty;

            fn add(self, rhs: $ty) -> $ty {
                $ty { $($field: self.$field + rhs.$field),+ }
            }
        }

        impl Sub for $ty {
            type Output = $ty;

            fn sub(self, rhs: $ty) -> $ty {
                $ty { $($field: self.$field - rhs.$field),+ }
            }
        }

        impl Mul for $ty {
            type Output = $ty;

            fn mul(self, rhs: $ty) -> $ty {
                $ty { $($field: self.$field * rhs.$field),+ }
            }
        }

        impl Mul<f32> for $ty {
            type Output = $ty;

            fn mul(self, rhs: f32) -> $ty {
                $ty { $($field: self.$field * rhs),+ }
            }
        }

        impl Mul<$ty> for f32 {
            type Output = $ty;

            fn mul(self, rhs: $ty) -> $ty {
                rhs * self
            }
        }
    };
}

impl_componentwise_ops!(Vector1D { x });
impl_componentwise_ops!(Vector4D { x, y, z, w });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector4d_round_trip() {
        let values = [12.5, -3.0, 320.0, 0.25];
        let vector = Vector4D::from_vector(&Vector::from(values));
        assert_eq!(vector.to_vector().values(), &values);
    }

    #[test]
    fn test_short_input_is_zero_padded() {
        let vector = Vector4D::from_vector(&Vector::from([1.0, 2.0]));
        assert_eq!(vector, Vector4D::new(1.0, 2.0, 0.0, 0.0));
    }

    #[test]
    fn test_long_input_is_truncated() {
        let vector = Vector1D::from_vector(&Vector::from([0.5, 9.0, 9.0]));
        assert_eq!(vector, Vector1D::new(0.5));
        assert_eq!(vector.to_vector().len(), 1);
    }

    #[test]
    fn test_componentwise_arithmetic() {
        let a = Vector4D::new(1.0, 2.0, 3.0, 4.0);
        let b = Vector4D::new(2.0, 2.0, 2.0, 2.0);

        assert_eq!(a + b, Vector4D::new(3.0, 4.0, 5.0, 6.0));
        assert_eq!(a - b, Vector4D::new(-1.0, 0.0, 1.0, 2.0));
        assert_eq!(a * b, Vector4D::new(2.0, 4.0, 6.0, 8.0));
        assert_eq!(-a, Vector4D::new(-1.0, -2.0, -3.0, -4.0));
        assert_eq!(a * 0.5, 0.5 * a);
        assert_eq!(Vector1D::new(3.0) * 2.0, Vector1D::new(6.0));
    }

    #[test]
    fn test_is_within_threshold() {
        let current = Vector::from([100.05, 99.95, 50.0, 50.1]);
        let target = Vector::from([100.0, 100.0, 50.0, 50.0]);
        assert!(current.is_within(&target, 0.1));
        assert!(!current.is_within(&target, 0.01));
    }

    #[test]
    fn test_mismatched_lengths_never_within() {
        let current = Vector::from([1.0]);
        let target = Vector::from([1.0, 0.0, 0.0, 0.0]);
        assert!(!current.is_within(&target, 1000.0));
    }

    #[test]
    fn test_rect_conversion() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(Rect::from(Vector4D::from(rect)), rect);
    }
}
