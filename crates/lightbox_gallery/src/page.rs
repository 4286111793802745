//! Single image page
//!
//! One page of the viewer: an image fitted into the viewport, zoomable
//! between the configured minimum and maximum scale, centred whenever it is
//! smaller than the viewport.
//!
//! The page models a scrolling container. `content_size` is the fitted image
//! size times the zoom scale, `content_inset` centres small content, and
//! `content_offset` is the scroll position. [`ImagePage::layout`] mirrors that
//! state onto the page's image view.

use crate::image::Image;
use lightbox_core::{
    ContentMode, EdgeInsets, Point, Rect, Size, TapGesture, View, ViewId, ViewTree, ViewerConfig,
};
use std::time::Duration;

/// What a double tap did
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DoubleTapZoom {
    /// Back to the minimum zoom scale
    ZoomOut,
    /// Zoomed in to show `rect`, in fitted-image coordinates
    ZoomTo(Rect),
}

#[derive(Debug)]
pub struct ImagePage {
    index: usize,
    image: Option<Image>,
    viewport: Size,
    minimum_zoom_scale: f32,
    maximum_zoom_scale: f32,
    zoom_animation: Duration,
    zoom_scale: f32,
    effective_image_size: Option<Size>,
    content_inset: EdgeInsets,
    content_offset: Point,
    image_view: Option<ViewId>,
    needs_layout: bool,
}

impl ImagePage {
    /// A page for image `index`
    ///
    /// A zoom range that fails validation collapses to a fixed scale of 1.
    pub fn new(index: usize, image: Option<Image>, viewport: Size, config: &ViewerConfig) -> Self {
        let (minimum_zoom_scale, maximum_zoom_scale) = match config.validate() {
            Ok(()) => (config.minimum_zoom_scale, config.maximum_zoom_scale),
            Err(err) => {
                tracing::warn!("ImagePage {}: {}, zoom disabled", index, err);
                (1.0, 1.0)
            }
        };
        let mut page = Self {
            index,
            image,
            viewport,
            minimum_zoom_scale,
            maximum_zoom_scale,
            zoom_animation: config.zoom_animation(),
            zoom_scale: minimum_zoom_scale,
            effective_image_size: None,
            content_inset: EdgeInsets::ZERO,
            content_offset: Point::ZERO,
            image_view: None,
            needs_layout: true,
        };
        page.reset();
        page
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn image(&self) -> Option<&Image> {
        self.image.as_ref()
    }

    /// Waiting for a download
    pub fn is_loading(&self) -> bool {
        self.image.is_none()
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn zoom_scale(&self) -> f32 {
        self.zoom_scale
    }

    /// Duration hosts should animate zoom changes over
    pub fn zoom_animation(&self) -> Duration {
        self.zoom_animation
    }

    /// Image size when aspect-fitted into the viewport at zoom scale 1
    pub fn effective_image_size(&self) -> Option<Size> {
        self.effective_image_size
    }

    pub fn content_size(&self) -> Size {
        self.effective_image_size
            .map_or(Size::ZERO, |size| size.scaled(self.zoom_scale))
    }

    pub fn content_inset(&self) -> EdgeInsets {
        self.content_inset
    }

    pub fn content_offset(&self) -> Point {
        self.content_offset
    }

    pub fn image_view(&self) -> Option<ViewId> {
        self.image_view
    }

    /// Geometry or image changed since the last [`ImagePage::layout`]
    pub fn needs_layout(&self) -> bool {
        self.needs_layout
    }

    /// On-screen frame of the image within the page
    pub fn image_frame(&self) -> Rect {
        Rect::from_origin_size(
            Point::new(-self.content_offset.x, -self.content_offset.y),
            self.content_size(),
        )
    }

    /// Show `image`, ending the loading state
    pub fn set_image(&mut self, image: Image) {
        self.image = Some(image);
        self.reset();
    }

    /// Back to minimum zoom, re-fitted and re-centred
    pub fn reset(&mut self) {
        self.zoom_scale = self.minimum_zoom_scale;
        self.effective_image_size = self.image.as_ref().and_then(|image| {
            let size = image.size();
            if size.width <= 0.0 || size.height <= 0.0 {
                return None;
            }
            let width_factor = self.viewport.width / size.width;
            let height_factor = self.viewport.height / size.height;
            Some(size.scaled(width_factor.min(height_factor)))
        });
        self.center();
        self.content_offset = Point::new(-self.content_inset.left, -self.content_inset.top);
    }

    /// Resize the viewport, resetting the page if the size changed
    pub fn set_viewport(&mut self, viewport: Size) {
        if self.viewport != viewport {
            self.viewport = viewport;
            self.reset();
        }
    }

    /// Zoom to `scale`, clamped to the configured range
    pub fn set_zoom_scale(&mut self, scale: f32) {
        if scale.is_nan() {
            return;
        }
        self.zoom_scale = scale.clamp(self.minimum_zoom_scale, self.maximum_zoom_scale);
        self.center();
    }

    fn center(&mut self) {
        let content = self.content_size();
        let horizontal = if self.viewport.width > content.width {
            (self.viewport.width - content.width) / 2.0
        } else {
            0.0
        };
        let vertical = if self.viewport.height > content.height {
            (self.viewport.height - content.height) / 2.0
        } else {
            0.0
        };
        self.content_inset = EdgeInsets::symmetric(vertical, horizontal);
        self.needs_layout = true;
    }

    /// Handle a double tap at `tap.location` (page coordinates)
    ///
    /// Taps outside the displayed image are ignored. A zoomed-in page zooms
    /// out; otherwise the page zooms in on the tapped point.
    pub fn double_tap(&mut self, tap: &TapGesture) -> Option<DoubleTapZoom> {
        let effective = self.effective_image_size?;
        let scaled = effective.scaled(self.zoom_scale);
        let scaled_rect = Rect::new(
            (self.viewport.width - scaled.width) / 2.0,
            (self.viewport.height - scaled.height) / 2.0,
            scaled.width,
            scaled.height,
        );
        if !scaled_rect.contains(tap.location) {
            return None;
        }

        if self.zoom_scale > self.minimum_zoom_scale {
            self.set_zoom_scale(self.minimum_zoom_scale);
            self.content_offset = Point::new(-self.content_inset.left, -self.content_inset.top);
            tracing::trace!("ImagePage {}: zoomed out", self.index);
            return Some(DoubleTapZoom::ZoomOut);
        }

        // Tap location in fitted-image coordinates
        let tap_in_image = Point::new(
            (tap.location.x + self.content_offset.x) / self.zoom_scale,
            (tap.location.y + self.content_offset.y) / self.zoom_scale,
        );
        let zoom_size = Size::new(
            self.viewport.width / self.maximum_zoom_scale,
            self.viewport.height / self.maximum_zoom_scale,
        );
        let rect = Rect::from_center(tap_in_image, zoom_size).enclosed_by(&effective.to_rect());
        self.zoom_to_rect(rect);
        tracing::trace!("ImagePage {}: zoomed to {:?}", self.index, rect);
        Some(DoubleTapZoom::ZoomTo(rect))
    }

    /// Zoom so `rect` (fitted-image coordinates) fills as much of the
    /// viewport as the maximum scale allows
    pub fn zoom_to_rect(&mut self, rect: Rect) {
        if rect.width() <= 0.0 || rect.height() <= 0.0 {
            return;
        }
        let scale = (self.viewport.width / rect.width()).min(self.viewport.height / rect.height());
        self.set_zoom_scale(scale);
        self.content_offset = Point::new(
            rect.x() * self.zoom_scale - self.content_inset.left,
            rect.y() * self.zoom_scale - self.content_inset.top,
        );
    }

    /// Create this page's image view inside `container`
    pub fn attach(&mut self, views: &mut ViewTree, container: ViewId) -> Option<ViewId> {
        if let Some(existing) = self.image_view.filter(|&id| views.contains(id)) {
            return Some(existing);
        }
        let view = View::image_view(self.image_frame(), self.image.as_ref().map(Image::id))
            .with_content_mode(ContentMode::ScaleAspectFit);
        let id = views.insert(view);
        if !views.add_subview(container, id) {
            views.destroy(id);
            return None;
        }
        self.image_view = Some(id);
        self.needs_layout = false;
        Some(id)
    }

    /// Destroy this page's image view
    pub fn detach(&mut self, views: &mut ViewTree) {
        if let Some(id) = self.image_view.take() {
            views.destroy(id);
        }
    }

    /// Push image and geometry onto the image view
    pub fn layout(&mut self, views: &mut ViewTree) {
        let frame = self.image_frame();
        let image = self.image.as_ref().map(Image::id);
        let Some(view) = self.image_view.and_then(|id| views.get_mut(id)) else {
            return;
        };
        view.frame = frame;
        view.image = image;
        self.needs_layout = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lightbox_core::SurfaceId;

    const VIEWPORT: Size = Size::new(300.0, 600.0);

    fn landscape_page() -> ImagePage {
        // 2:1 image fits to 300 x 150
        let image = Image::new(Size::new(1200.0, 600.0), Vec::<u8>::new());
        ImagePage::new(0, Some(image), VIEWPORT, &ViewerConfig::default())
    }

    #[test]
    fn test_aspect_fit_and_centering() {
        let page = landscape_page();
        assert_eq!(page.effective_image_size(), Some(Size::new(300.0, 150.0)));
        assert_eq!(page.content_inset(), EdgeInsets::symmetric(225.0, 0.0));
        assert_eq!(page.image_frame(), Rect::new(0.0, 225.0, 300.0, 150.0));
    }

    #[test]
    fn test_loading_page_has_no_geometry() {
        let mut page = ImagePage::new(3, None, VIEWPORT, &ViewerConfig::default());
        assert!(page.is_loading());
        assert!(page.double_tap(&TapGesture::double(Point::new(150.0, 300.0))).is_none());

        page.set_image(Image::new(Size::new(100.0, 200.0), Vec::<u8>::new()));
        assert!(!page.is_loading());
        assert_eq!(page.effective_image_size(), Some(Size::new(300.0, 600.0)));
    }

    #[test]
    fn test_double_tap_outside_image_is_ignored() {
        let mut page = landscape_page();
        assert!(page.double_tap(&TapGesture::double(Point::new(150.0, 100.0))).is_none());
        assert_eq!(page.zoom_scale(), 1.0);
    }

    #[test]
    fn test_double_tap_zooms_in_then_out() {
        let mut page = landscape_page();

        let zoom = page.double_tap(&TapGesture::double(Point::new(150.0, 300.0)));
        // 100 x 200 rect centred on (150, 75), clamped into the 300 x 150 image
        assert_eq!(zoom, Some(DoubleTapZoom::ZoomTo(Rect::new(100.0, 0.0, 100.0, 150.0))));
        assert_eq!(page.zoom_scale(), 3.0);
        assert_eq!(page.content_size(), Size::new(900.0, 450.0));
        assert_eq!(page.content_inset(), EdgeInsets::symmetric(75.0, 0.0));

        let zoom = page.double_tap(&TapGesture::double(Point::new(150.0, 300.0)));
        assert_eq!(zoom, Some(DoubleTapZoom::ZoomOut));
        assert_eq!(page.zoom_scale(), 1.0);
        assert_eq!(page.image_frame(), Rect::new(0.0, 225.0, 300.0, 150.0));
    }

    #[test]
    fn test_invalid_zoom_range_disables_zoom() {
        let config = ViewerConfig {
            minimum_zoom_scale: 2.0,
            maximum_zoom_scale: 1.0,
            ..ViewerConfig::default()
        };
        let image = Image::new(Size::new(1200.0, 600.0), Vec::<u8>::new());
        let mut page = ImagePage::new(0, Some(image), VIEWPORT, &config);

        let zoom = page.double_tap(&TapGesture::double(Point::new(150.0, 300.0)));
        assert!(matches!(zoom, Some(DoubleTapZoom::ZoomTo(_))));
        assert_eq!(page.zoom_scale(), 1.0);

        page.set_zoom_scale(f32::NAN);
        assert_eq!(page.zoom_scale(), 1.0);
    }

    #[test]
    fn test_zoom_scale_is_clamped() {
        let mut page = landscape_page();
        page.set_zoom_scale(10.0);
        assert_eq!(page.zoom_scale(), 3.0);
        page.set_zoom_scale(0.1);
        assert_eq!(page.zoom_scale(), 1.0);
    }

    #[test]
    fn test_viewport_change_resets_zoom() {
        let mut page = landscape_page();
        page.set_zoom_scale(2.0);

        page.set_viewport(VIEWPORT);
        assert_eq!(page.zoom_scale(), 2.0);

        page.set_viewport(Size::new(600.0, 300.0));
        assert_eq!(page.zoom_scale(), 1.0);
        assert_eq!(page.effective_image_size(), Some(Size::new(600.0, 300.0)));
    }

    #[test]
    fn test_attach_and_layout() {
        let mut views = ViewTree::new(SurfaceId::MAIN);
        let container = views.insert(View::new(VIEWPORT.to_rect()));
        let mut page = landscape_page();

        let image_view = page.attach(&mut views, container).unwrap();
        assert_eq!(page.attach(&mut views, container), Some(image_view));
        assert_eq!(views.frame_in(image_view, container), Some(page.image_frame()));

        assert!(!page.needs_layout());
        page.set_zoom_scale(2.0);
        assert!(page.needs_layout());
        page.layout(&mut views);
        assert!(!page.needs_layout());
        assert_eq!(views.get(image_view).unwrap().frame.size, Size::new(600.0, 300.0));

        page.detach(&mut views);
        assert!(views.get(image_view).is_none());
    }
}
