//! Animatable view properties
//!
//! A property knows how to read a [`Vector`] out of a view, write one back,
//! and how close to the target counts as finished.

use crate::vector::{Interpolatable, Vector, Vector1D, Vector4D};
use lightbox_core::{Rect, View};

/// A numeric view property a spring can drive
pub trait AnimatableProperty {
    /// Value type the integrator works in
    type Value: Interpolatable;

    /// Largest per-component deviation from the target that counts as done
    fn threshold(&self) -> f32;

    fn read(&self, view: &View) -> Vector;

    fn write(&self, view: &mut View, value: &Vector);
}

/// The view's frame, as `[x, y, width, height]`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewFrame;

impl AnimatableProperty for ViewFrame {
    type Value = Vector4D;

    fn threshold(&self) -> f32 {
        0.1
    }

    fn read(&self, view: &View) -> Vector {
        Vector::from(view.frame.to_array())
    }

    fn write(&self, view: &mut View, value: &Vector) {
        view.frame = Rect::from(Vector4D::from_vector(value));
    }
}

/// The view's opacity
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewAlpha;

impl AnimatableProperty for ViewAlpha {
    type Value = Vector1D;

    fn threshold(&self) -> f32 {
        0.01
    }

    fn read(&self, view: &View) -> Vector {
        Vector::from([view.alpha])
    }

    fn write(&self, view: &mut View, value: &Vector) {
        view.alpha = Vector1D::from_vector(value).x;
    }
}
