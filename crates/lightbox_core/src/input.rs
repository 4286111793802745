//! Gesture input delivered by the host toolkit
//!
//! Samples are already recognized gestures (not raw touches). Locations,
//! translations, and velocities are in the coordinate space of the reference
//! view that accompanies the sample.

use crate::geometry::{Point, Vec2};

/// Recognizer phase of a continuous gesture
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GesturePhase {
    /// Not yet recognized
    #[default]
    Possible,
    /// Gesture recognized, first sample
    Began,
    /// Finger moved
    Changed,
    /// Finger lifted
    Ended,
    /// Interrupted by the system (incoming call, another recognizer, ...)
    Cancelled,
    /// Recognition failed
    Failed,
}

/// One sample of a pan (drag) gesture
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanGesture {
    pub phase: GesturePhase,
    /// Current touch location
    pub location: Point,
    /// Total translation since the gesture began
    pub translation: Vec2,
    /// Velocity in points per second
    pub velocity: Vec2,
}

impl PanGesture {
    pub fn began(location: Point) -> Self {
        Self {
            phase: GesturePhase::Began,
            location,
            translation: Vec2::ZERO,
            velocity: Vec2::ZERO,
        }
    }

    pub fn changed(location: Point, translation: Vec2) -> Self {
        Self {
            phase: GesturePhase::Changed,
            location,
            translation,
            velocity: Vec2::ZERO,
        }
    }

    pub fn ended(location: Point, translation: Vec2, velocity: Vec2) -> Self {
        Self {
            phase: GesturePhase::Ended,
            location,
            translation,
            velocity,
        }
    }

    pub fn with_phase(mut self, phase: GesturePhase) -> Self {
        self.phase = phase;
        self
    }
}

/// A recognized tap
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TapGesture {
    pub location: Point,
    pub tap_count: u32,
}

impl TapGesture {
    pub fn double(location: Point) -> Self {
        Self {
            location,
            tap_count: 2,
        }
    }
}
