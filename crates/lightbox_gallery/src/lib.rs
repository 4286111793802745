//! Lightbox Gallery
//!
//! A modal, paging image viewer: local images or images downloaded on demand,
//! double-tap zoom, and swipe-to-dismiss with a photo zoom transition back to
//! the thumbnail it was opened from.
//!
//! # Example
//!
//! ```rust
//! use lightbox_core::{LightboxConfig, Size};
//! use lightbox_gallery::{Image, ImageViewer};
//!
//! let images = vec![
//!     Image::new(Size::new(1200.0, 800.0), vec![0u8; 16]),
//!     Image::new(Size::new(800.0, 1200.0), vec![0u8; 16]),
//! ];
//! let viewer = ImageViewer::with_images(images, 1, Size::new(320.0, 480.0), LightboxConfig::default())
//!     .expect("valid viewer");
//! assert_eq!(viewer.current_index(), 1);
//! ```

pub mod album;
pub mod cache;
pub mod downloader;
pub mod image;
pub mod page;
pub mod viewer;

pub use album::{Album, ImageViewerDelegate, SharedPage};
pub use cache::RemoteImageCache;
pub use downloader::{DownloadCompletion, ImageDownloader};
pub use image::{Image, ImageSource};
pub use page::{DoubleTapZoom, ImagePage};
pub use viewer::ImageViewer;
