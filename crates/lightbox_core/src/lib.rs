//! Lightbox Core
//!
//! Foundational primitives shared by the Lightbox image gallery crates:
//!
//! - **Geometry**: points, sizes, rects, colors, and drop shadows
//! - **View Registry**: a generational view tree whose handles never keep views alive
//! - **Input**: pan and tap gesture samples delivered by the host toolkit
//! - **Configuration**: TOML-backed transition and viewer tuning
//!
//! # Example
//!
//! ```rust
//! use lightbox_core::{Rect, SurfaceId, View, ViewTree};
//!
//! let mut views = ViewTree::new(SurfaceId::MAIN);
//! let container = views.insert(View::new(Rect::new(0.0, 0.0, 320.0, 480.0)));
//! let thumbnail = views.insert(View::new(Rect::new(10.0, 20.0, 80.0, 80.0)));
//! views.add_subview(container, thumbnail);
//!
//! views.destroy(thumbnail);
//! assert!(views.get(thumbnail).is_none());
//! ```

pub mod config;
pub mod error;
pub mod geometry;
pub mod input;
pub mod view;

pub use config::{DismissButtonPosition, LightboxConfig, TransitionConfig, ViewerConfig};
pub use error::{LightboxError, Result};
pub use geometry::{Color, EdgeInsets, Point, Rect, Shadow, Size, Vec2};
pub use input::{GesturePhase, PanGesture, TapGesture};
pub use view::{ContentMode, ImageId, SurfaceId, View, ViewId, ViewTree};
