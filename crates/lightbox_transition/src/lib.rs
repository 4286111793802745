//! Lightbox Transitions
//!
//! Custom modal transitions between a thumbnail and its full-size image.
//!
//! # Features
//!
//! - **Shared-Element Zoom**: a "flying" copy of the image springs between the
//!   thumbnail frame and the full-size frame while the presented view fades
//! - **Interactive Dismissal**: a drag on the displayed image moves the flying
//!   image with the finger, then completes or springs back on release
//! - **Failure Tolerant**: missing views abandon the transition and report it
//!   as not completed instead of faulting
//!
//! The host presentation system talks to this crate through
//! [`TransitionContext`] (what it provides to a running transition) and
//! [`TransitioningDelegate`] (what it asks for when presenting/dismissing).

pub mod animator;
pub mod context;
pub mod controller;

pub use animator::{TransitionAnimator, TransitionDirection, TransitionPhase};
pub use context::{SimpleTransitionContext, TransitionContext, TransitionViewKey};
pub use controller::{ImageViewLookup, PanResponse, TransitionController, TransitioningDelegate};
