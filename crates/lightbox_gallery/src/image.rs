//! Image data
//!
//! [`Image`] is decoded image content: a pixel payload shared between clones
//! plus its size in points. Views show images by [`ImageId`].

use crate::downloader::ImageDownloader;
use lightbox_core::{ImageId, Size};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_IMAGE_ID: AtomicU64 = AtomicU64::new(1);

/// Decoded image content
#[derive(Clone)]
pub struct Image {
    id: ImageId,
    size: Size,
    pixels: Rc<[u8]>,
}

impl Image {
    pub fn new(size: Size, pixels: impl Into<Rc<[u8]>>) -> Self {
        Self {
            id: ImageId(NEXT_IMAGE_ID.fetch_add(1, Ordering::Relaxed)),
            size,
            pixels: pixels.into(),
        }
    }

    pub fn id(&self) -> ImageId {
        self.id
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

impl PartialEq for Image {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("id", &self.id)
            .field("size", &self.size)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

/// Where the viewer's images come from
#[derive(Clone)]
pub enum ImageSource {
    /// Images already in memory
    Local(Vec<Image>),
    /// Images downloaded on demand from `urls`
    Remote {
        urls: Vec<String>,
        downloader: Rc<dyn ImageDownloader>,
    },
}

impl ImageSource {
    /// Number of images
    pub fn len(&self) -> usize {
        match self {
            ImageSource::Local(images) => images.len(),
            ImageSource::Remote { urls, .. } => urls.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::Local(images) => f.debug_tuple("Local").field(&images.len()).finish(),
            ImageSource::Remote { urls, .. } => f.debug_struct("Remote").field("urls", urls).finish(),
        }
    }
}
