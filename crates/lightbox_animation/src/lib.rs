//! Lightbox Animation System
//!
//! Spring physics driving view properties, one frame at a time.
//!
//! # Features
//!
//! - **Spring Physics**: RK4-integrated damped springs (spring, friction)
//! - **Vector Values**: 1D and 4D component vectors with componentwise arithmetic
//! - **View Properties**: frame and alpha, each with its own completion threshold
//! - **Per-Surface Animator**: one frame driver per display, paused while idle
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use lightbox_animation::{Animator, SpringAnimation, Vector1D, ViewAlpha};
//! use lightbox_core::{Rect, SurfaceId, View, ViewTree};
//!
//! let mut views = ViewTree::new(SurfaceId(7));
//! let view = views.insert(View::new(Rect::new(0.0, 0.0, 100.0, 100.0)).with_alpha(0.0));
//!
//! let fade = SpringAnimation::new(&views, view, ViewAlpha, Vector1D::new(1.0), Vector1D::ZERO);
//! let animator = Animator::for_surface(views.surface());
//! animator.add(fade.into_shared());
//!
//! while animator.is_running() {
//!     animator.tick(Duration::from_secs_f32(1.0 / 60.0), &mut views);
//! }
//! assert_eq!(views.get(view).unwrap().alpha, 1.0);
//! # lightbox_animation::Animator::release_surface(SurfaceId(7));
//! ```

pub mod animation;
pub mod animator;
pub mod property;
pub mod spring;
pub mod vector;

pub use animation::{Animatable, SharedAnimation, SpringAnimation, SpringStep, TickCallback};
pub use animator::{Animator, ClockCallback};
pub use property::{AnimatableProperty, ViewAlpha, ViewFrame};
pub use spring::{Derivative, SpringIntegrator};
pub use vector::{Interpolatable, Vector, Vector1D, Vector4D};
