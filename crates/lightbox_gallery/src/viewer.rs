//! Image viewer entry points
//!
//! [`ImageViewer`] assembles an [`Album`] and a [`TransitionController`] for
//! one modal presentation. Hosts forward gestures and paging events here and
//! drive the returned transitions with the surface's animator.

use crate::album::{Album, ImageViewerDelegate, SharedPage};
use crate::downloader::ImageDownloader;
use crate::image::{Image, ImageSource};
use crate::page::DoubleTapZoom;
use lightbox_core::{
    DismissButtonPosition, LightboxConfig, PanGesture, Result, Size, TapGesture, ViewId, ViewTree,
};
use lightbox_transition::{PanResponse, TransitionContext, TransitionController};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

pub struct ImageViewer {
    config: LightboxConfig,
    album: Rc<RefCell<Album>>,
    transition_controller: TransitionController,
    delegate: Option<Weak<dyn ImageViewerDelegate>>,
}

impl ImageViewer {
    /// A viewer over images already in memory, opened at `initial_index`
    pub fn with_images(
        images: Vec<Image>,
        initial_index: usize,
        viewport: Size,
        config: LightboxConfig,
    ) -> Result<Self> {
        Self::new(ImageSource::Local(images), initial_index, viewport, config)
    }

    /// A viewer over remote images fetched through `downloader`
    pub fn with_urls(
        urls: Vec<String>,
        initial_index: usize,
        downloader: Rc<dyn ImageDownloader>,
        viewport: Size,
        config: LightboxConfig,
    ) -> Result<Self> {
        Self::new(
            ImageSource::Remote { urls, downloader },
            initial_index,
            viewport,
            config,
        )
    }

    pub fn new(
        source: ImageSource,
        initial_index: usize,
        viewport: Size,
        config: LightboxConfig,
    ) -> Result<Self> {
        config.validate()?;
        let album = Album::new(source, initial_index, viewport, config.viewer.clone())?;
        Ok(Self {
            transition_controller: TransitionController::new(config.transition.clone()),
            config,
            album: Rc::new(RefCell::new(album)),
            delegate: None,
        })
    }

    pub fn config(&self) -> &LightboxConfig {
        &self.config
    }

    pub fn album(&self) -> &Rc<RefCell<Album>> {
        &self.album
    }

    pub fn dismiss_button_position(&self) -> DismissButtonPosition {
        self.config.viewer.dismiss_button_position
    }

    pub fn transition_controller(&self) -> &TransitionController {
        &self.transition_controller
    }

    pub fn transition_controller_mut(&mut self) -> &mut TransitionController {
        &mut self.transition_controller
    }

    pub fn delegate(&self) -> Option<Rc<dyn ImageViewerDelegate>> {
        self.delegate.as_ref().and_then(Weak::upgrade)
    }

    /// Attach or detach the host delegate
    ///
    /// The delegate is held weakly. While it is attached the transition
    /// controller can resolve both ends of the zoom transition: the current
    /// page's image view and the presenter's view for the same index.
    pub fn set_delegate(&mut self, delegate: Option<&Rc<dyn ImageViewerDelegate>>) {
        let Some(delegate) = delegate else {
            self.delegate = None;
            self.transition_controller.clear_image_view_lookups();
            return;
        };

        let delegate = Rc::downgrade(delegate);
        self.delegate = Some(delegate.clone());

        let album = Rc::downgrade(&self.album);
        self.transition_controller
            .set_current_image_view(move || current_image_view(&album));

        let album = Rc::downgrade(&self.album);
        self.transition_controller.set_transition_image_view(move || {
            let index = current_index(&album)?;
            delegate.upgrade()?.transition_image_view(index)
        });
    }

    pub fn current_index(&self) -> usize {
        self.album.borrow().current_index()
    }

    pub fn current_page(&self) -> SharedPage {
        self.album.borrow().current_page()
    }

    pub fn page_before(&self, page: &SharedPage) -> Option<SharedPage> {
        self.album.borrow().page_before(page)
    }

    pub fn page_after(&self, page: &SharedPage) -> Option<SharedPage> {
        self.album.borrow().page_after(page)
    }

    /// The paging container settled; tells the delegate which image is shown
    pub fn did_finish_paging(&self, completed: bool, previous: &[SharedPage], current: SharedPage) {
        let displayed = self
            .album
            .borrow_mut()
            .did_finish_paging(completed, previous, current);
        let (Some(index), Some(delegate)) = (displayed, self.delegate()) else {
            return;
        };
        delegate.did_display_image(index);
    }

    pub fn set_viewport(&self, viewport: Size) {
        self.album.borrow_mut().set_viewport(viewport);
    }

    /// Pan sample from the viewer's swipe-to-dismiss recognizer
    pub fn handle_pan(
        &mut self,
        gesture: &PanGesture,
        source_view: ViewId,
        views: &mut ViewTree,
    ) -> PanResponse {
        self.transition_controller.did_pan(gesture, source_view, views)
    }

    /// Double tap on the current page
    pub fn handle_double_tap(&self, tap: &TapGesture) -> Option<DoubleTapZoom> {
        self.current_page().borrow_mut().double_tap(tap)
    }

    pub fn handle_memory_warning(&self) {
        self.album.borrow().handle_memory_warning();
    }

    /// Run the zoom-in presentation; `false` means use the host default
    pub fn present(&self, context: &Rc<dyn TransitionContext>, views: &mut ViewTree) -> bool {
        self.transition_controller.begin_presentation(context, views)
    }

    /// Run the dismissal, interactively when a pan on the image asked for it;
    /// `false` means use the host default
    pub fn dismiss(&mut self, context: &Rc<dyn TransitionContext>, views: &mut ViewTree) -> bool {
        self.transition_controller.begin_dismissal(context, views)
    }
}

fn current_index(album: &Weak<RefCell<Album>>) -> Option<usize> {
    let index = album.upgrade()?.try_borrow().ok()?.current_index();
    Some(index)
}

fn current_image_view(album: &Weak<RefCell<Album>>) -> Option<ViewId> {
    let page = album.upgrade()?.try_borrow().ok()?.current_page();
    page.try_borrow().ok().and_then(|page| page.image_view())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lightbox_core::{LightboxError, Point, SurfaceId, View};
    use lightbox_transition::TransitioningDelegate;
    use std::cell::Cell;

    const VIEWPORT: Size = Size::new(320.0, 480.0);

    struct Presenter {
        thumbnails: Vec<ViewId>,
        displayed: Cell<Option<usize>>,
    }

    impl ImageViewerDelegate for Presenter {
        fn transition_image_view(&self, index: usize) -> Option<ViewId> {
            self.thumbnails.get(index).copied()
        }

        fn did_display_image(&self, index: usize) {
            self.displayed.set(Some(index));
        }
    }

    fn images(count: usize) -> Vec<Image> {
        (0..count)
            .map(|_| Image::new(Size::new(640.0, 640.0), vec![0u8; 4]))
            .collect()
    }

    #[test]
    fn test_rejects_bad_input() {
        let err = ImageViewer::with_images(images(2), 5, VIEWPORT, LightboxConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, LightboxError::IndexOutOfRange { index: 5, count: 2 }));

        let mut config = LightboxConfig::default();
        config.viewer.maximum_zoom_scale = 0.5;
        let err = ImageViewer::with_images(images(2), 0, VIEWPORT, config)
            .err()
            .unwrap();
        assert!(matches!(err, LightboxError::InvalidConfig { .. }));
    }

    #[test]
    fn test_delegate_wires_transition_lookups() {
        let mut views = ViewTree::new(SurfaceId::MAIN);
        let container = views.insert(View::new(VIEWPORT.to_rect()));
        let thumbnails: Vec<ViewId> = (0..3)
            .map(|_| views.insert(View::new(lightbox_core::Rect::new(0.0, 0.0, 40.0, 40.0))))
            .collect();

        let mut viewer =
            ImageViewer::with_images(images(3), 1, VIEWPORT, LightboxConfig::default()).unwrap();
        let image_view = viewer
            .current_page()
            .borrow_mut()
            .attach(&mut views, container)
            .unwrap();

        assert!(viewer.transition_controller().animation_for_present().is_none());

        let presenter: Rc<dyn ImageViewerDelegate> = Rc::new(Presenter {
            thumbnails: thumbnails.clone(),
            displayed: Cell::new(None),
        });
        viewer.set_delegate(Some(&presenter));

        let present = viewer.transition_controller().animation_for_present().unwrap();
        assert_eq!(present.from_image_view(), thumbnails[1]);
        assert_eq!(present.to_image_view(), image_view);

        // Held weakly: dropping the host's delegate unwires the presenter side
        drop(presenter);
        assert!(viewer.delegate().is_none());
        assert!(viewer.transition_controller().animation_for_present().is_none());
    }

    #[test]
    fn test_paging_notifies_delegate() {
        let mut viewer =
            ImageViewer::with_images(images(3), 0, VIEWPORT, LightboxConfig::default()).unwrap();
        let presenter = Rc::new(Presenter {
            thumbnails: Vec::new(),
            displayed: Cell::new(None),
        });
        let delegate: Rc<dyn ImageViewerDelegate> = presenter.clone();
        viewer.set_delegate(Some(&delegate));

        let first = viewer.current_page();
        let second = viewer.page_after(&first).unwrap();
        viewer.did_finish_paging(true, &[first], second);

        assert_eq!(viewer.current_index(), 1);
        assert_eq!(presenter.displayed.get(), Some(1));
    }

    #[test]
    fn test_double_tap_zooms_current_page() {
        let viewer =
            ImageViewer::with_images(images(1), 0, VIEWPORT, LightboxConfig::default()).unwrap();
        let zoom = viewer.handle_double_tap(&TapGesture::double(Point::new(160.0, 240.0)));
        assert!(matches!(zoom, Some(DoubleTapZoom::ZoomTo(_))));
        assert_eq!(viewer.current_page().borrow().zoom_scale(), 3.0);
    }
}
