//! Album paging
//!
//! The data source behind the viewer's pages. Pages are created on demand
//! for the neighbours of the page on screen; remote images come from the
//! cache when possible and are downloaded otherwise.

use crate::cache::RemoteImageCache;
use crate::downloader::DownloadCompletion;
use crate::image::{Image, ImageSource};
use crate::page::ImagePage;
use lightbox_core::{LightboxError, Rect, Result, Size, ViewId, ViewerConfig};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// A page shared between the album and the paging container
pub type SharedPage = Rc<RefCell<ImagePage>>;

/// Host callbacks for the viewer
pub trait ImageViewerDelegate {
    /// The presenter's view showing image `index`, used as the zoom
    /// transition's start and end point
    fn transition_image_view(&self, index: usize) -> Option<ViewId>;

    /// Image `index` is now on screen
    fn did_display_image(&self, _index: usize) {}
}

pub struct Album {
    source: ImageSource,
    config: ViewerConfig,
    viewport: Size,
    cache: Rc<RefCell<RemoteImageCache>>,
    current: SharedPage,
}

impl Album {
    /// An album showing image `initial_index` of `source`
    pub fn new(
        source: ImageSource,
        initial_index: usize,
        viewport: Size,
        config: ViewerConfig,
    ) -> Result<Self> {
        config.validate()?;
        let cache = Rc::new(RefCell::new(RemoteImageCache::new(
            config.remote_cache_capacity,
        )));
        let current = create_page(&source, &config, viewport, &cache, initial_index)?;
        tracing::debug!(
            "Album: {} images, starting at {}",
            source.len(),
            initial_index
        );
        Ok(Self {
            source,
            config,
            viewport,
            cache,
            current,
        })
    }

    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    pub fn source(&self) -> &ImageSource {
        &self.source
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Page on screen
    pub fn current_page(&self) -> SharedPage {
        self.current.clone()
    }

    pub fn current_index(&self) -> usize {
        self.current.borrow().index()
    }

    /// A fresh page for image `index`
    ///
    /// Remote images missing from the cache start downloading; the page shows
    /// the loading state until the download completes.
    pub fn page(&self, index: usize) -> Result<SharedPage> {
        create_page(&self.source, &self.config, self.viewport, &self.cache, index)
    }

    /// The page before `page`, `None` at the start of the album
    pub fn page_before(&self, page: &SharedPage) -> Option<SharedPage> {
        let index = page.borrow().index().checked_sub(1)?;
        self.page(index).ok()
    }

    /// The page after `page`, `None` at the end of the album
    pub fn page_after(&self, page: &SharedPage) -> Option<SharedPage> {
        let index = page.borrow().index() + 1;
        self.page(index).ok()
    }

    /// The paging container settled
    ///
    /// When the swipe `completed`, pages swiped away are reset to minimum zoom
    /// and `current` becomes the page on screen. Returns the index of the newly
    /// displayed image.
    pub fn did_finish_paging(
        &mut self,
        completed: bool,
        previous: &[SharedPage],
        current: SharedPage,
    ) -> Option<usize> {
        if !completed {
            return None;
        }
        for page in previous.iter().filter(|page| !Rc::ptr_eq(page, &current)) {
            page.borrow_mut().reset();
        }
        self.current = current;
        let index = self.current_index();
        tracing::debug!("Album: displaying image {}", index);
        Some(index)
    }

    /// Frame of page `index` in the paging container's content
    pub fn page_frame(&self, index: usize) -> Rect {
        let stride = self.viewport.width + self.config.spacing_between_images;
        Rect::new(
            index as f32 * stride,
            0.0,
            self.viewport.width,
            self.viewport.height,
        )
    }

    /// Resize the viewport; the page on screen is refitted
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
        self.current.borrow_mut().set_viewport(viewport);
    }

    /// Number of downloaded images held in memory
    pub fn cached_image_count(&self) -> usize {
        self.cache.borrow().len()
    }

    /// Drop every cached download
    pub fn handle_memory_warning(&self) {
        tracing::debug!("Album: memory warning");
        self.cache.borrow_mut().clear();
    }
}

fn create_page(
    source: &ImageSource,
    config: &ViewerConfig,
    viewport: Size,
    cache: &Rc<RefCell<RemoteImageCache>>,
    index: usize,
) -> Result<SharedPage> {
    let count = source.len();
    if index >= count {
        return Err(LightboxError::IndexOutOfRange { index, count });
    }

    match source {
        ImageSource::Local(images) => {
            let image = images.get(index).cloned();
            Ok(Rc::new(RefCell::new(ImagePage::new(
                index, image, viewport, config,
            ))))
        }
        ImageSource::Remote { urls, downloader } => {
            let url = &urls[index];
            let cached = cache.borrow_mut().get(url);
            if cached.is_some() {
                tracing::trace!("Album: {} served from cache", url);
                return Ok(Rc::new(RefCell::new(ImagePage::new(
                    index, cached, viewport, config,
                ))));
            }

            let page = Rc::new(RefCell::new(ImagePage::new(index, None, viewport, config)));
            tracing::debug!("Album: downloading image {} from {}", index, url);
            downloader.download(
                url,
                download_completion(url.clone(), Rc::downgrade(&page), Rc::downgrade(cache)),
            );
            Ok(page)
        }
    }
}

/// Stores a finished download and hands it to its page, if still alive
fn download_completion(
    url: String,
    page: Weak<RefCell<ImagePage>>,
    cache: Weak<RefCell<RemoteImageCache>>,
) -> DownloadCompletion {
    Box::new(move |result: Result<Image>| {
        let image = match result {
            Ok(image) => image,
            Err(err) => {
                tracing::warn!("Album: dropping download of {}: {}", url, err);
                return;
            }
        };
        if let Some(cache) = cache.upgrade() {
            cache.borrow_mut().insert(url.clone(), image.clone());
        }
        match page.upgrade() {
            Some(page) => page.borrow_mut().set_image(image),
            None => tracing::trace!("Album: page for {} went away before download finished", url),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downloader::ImageDownloader;
    use std::cell::Cell;

    const VIEWPORT: Size = Size::new(320.0, 480.0);

    fn local_album(count: usize, initial: usize) -> Result<Album> {
        let images = (0..count)
            .map(|_| Image::new(Size::new(640.0, 480.0), vec![0u8; 4]))
            .collect();
        Album::new(
            ImageSource::Local(images),
            initial,
            VIEWPORT,
            ViewerConfig::default(),
        )
    }

    /// Completes every download immediately, counting requests
    struct InstantDownloader {
        requests: Cell<usize>,
        fail: bool,
    }

    impl ImageDownloader for InstantDownloader {
        fn download(&self, url: &str, completion: DownloadCompletion) {
            self.requests.set(self.requests.get() + 1);
            if self.fail {
                completion(Err(LightboxError::download(url, "connection reset")));
            } else {
                completion(Ok(Image::new(Size::new(100.0, 100.0), vec![0u8; 4])));
            }
        }
    }

    fn remote_album(fail: bool) -> (Album, Rc<InstantDownloader>) {
        let downloader = Rc::new(InstantDownloader {
            requests: Cell::new(0),
            fail,
        });
        let source = ImageSource::Remote {
            urls: vec!["https://img/0".into(), "https://img/1".into()],
            downloader: downloader.clone(),
        };
        let album = Album::new(source, 0, VIEWPORT, ViewerConfig::default()).unwrap();
        (album, downloader)
    }

    #[test]
    fn test_initial_index_out_of_range() {
        let err = local_album(2, 2).err().unwrap();
        assert!(matches!(
            err,
            LightboxError::IndexOutOfRange { index: 2, count: 2 }
        ));
        assert!(local_album(0, 0).is_err());
    }

    #[test]
    fn test_rejects_inverted_zoom_range() {
        let config = ViewerConfig {
            minimum_zoom_scale: 2.0,
            maximum_zoom_scale: 1.0,
            ..ViewerConfig::default()
        };
        let images = vec![Image::new(Size::new(640.0, 480.0), vec![0u8; 4])];
        let err = Album::new(ImageSource::Local(images), 0, VIEWPORT, config)
            .err()
            .unwrap();
        assert!(matches!(err, LightboxError::InvalidConfig { .. }));
    }

    #[test]
    fn test_neighbours_stop_at_the_ends() {
        let album = local_album(3, 0).unwrap();
        let first = album.current_page();
        assert!(album.page_before(&first).is_none());

        let second = album.page_after(&first).unwrap();
        assert_eq!(second.borrow().index(), 1);
        let third = album.page_after(&second).unwrap();
        assert!(album.page_after(&third).is_none());
        assert_eq!(album.page_before(&third).unwrap().borrow().index(), 1);
    }

    #[test]
    fn test_finished_paging_resets_previous_pages() {
        let mut album = local_album(3, 0).unwrap();
        let first = album.current_page();
        first.borrow_mut().set_zoom_scale(2.5);
        let second = album.page_after(&first).unwrap();

        assert_eq!(album.did_finish_paging(false, &[first.clone()], second.clone()), None);
        assert_eq!(first.borrow().zoom_scale(), 2.5);
        assert_eq!(album.current_index(), 0);

        assert_eq!(album.did_finish_paging(true, &[first.clone()], second), Some(1));
        assert_eq!(first.borrow().zoom_scale(), 1.0);
        assert_eq!(album.current_index(), 1);
    }

    #[test]
    fn test_page_frames_include_spacing() {
        let album = local_album(3, 0).unwrap();
        assert_eq!(album.page_frame(0), Rect::new(0.0, 0.0, 320.0, 480.0));
        assert_eq!(album.page_frame(2), Rect::new(720.0, 0.0, 320.0, 480.0));
    }

    #[test]
    fn test_remote_pages_download_once_then_hit_cache() {
        let (album, downloader) = remote_album(false);
        assert_eq!(downloader.requests.get(), 1);
        assert!(!album.current_page().borrow().is_loading());
        assert_eq!(album.cached_image_count(), 1);

        let again = album.page(0).unwrap();
        assert!(!again.borrow().is_loading());
        assert_eq!(downloader.requests.get(), 1);

        album.page(1).unwrap();
        assert_eq!(downloader.requests.get(), 2);
        assert_eq!(album.cached_image_count(), 2);
    }

    #[test]
    fn test_failed_download_keeps_loading() {
        let (album, downloader) = remote_album(true);
        assert_eq!(downloader.requests.get(), 1);
        assert!(album.current_page().borrow().is_loading());
        assert_eq!(album.cached_image_count(), 0);
    }

    #[test]
    fn test_memory_warning_empties_cache() {
        let (album, downloader) = remote_album(false);
        album.handle_memory_warning();
        assert_eq!(album.cached_image_count(), 0);

        album.page(0).unwrap();
        assert_eq!(downloader.requests.get(), 2);
    }
}
