//! Image download capability
//!
//! The gallery never performs network I/O itself. Hosts supply an
//! [`ImageDownloader`] and call the completion once the image arrives or the
//! download fails. There is no retry: a failed download leaves its page
//! showing the loading state.

use crate::image::Image;
use lightbox_core::Result;

/// Receives the outcome of one download; can only be called once
pub type DownloadCompletion = Box<dyn FnOnce(Result<Image>)>;

/// Fetches images by URL
pub trait ImageDownloader {
    /// Start downloading `url`, then call `completion` on the UI thread
    fn download(&self, url: &str, completion: DownloadCompletion);
}

impl<F> ImageDownloader for F
where
    F: Fn(&str, DownloadCompletion),
{
    fn download(&self, url: &str, completion: DownloadCompletion) {
        self(url, completion)
    }
}
