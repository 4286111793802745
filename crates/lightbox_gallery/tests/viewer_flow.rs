//! The viewer as a host drives it: remote pages arriving late, paging, and a
//! swipe that zooms the image back onto its thumbnail

use lightbox_animation::Animator;
use lightbox_core::{
    LightboxConfig, LightboxError, PanGesture, Point, Rect, Size, SurfaceId, Vec2, View, ViewId,
    ViewTree,
};
use lightbox_gallery::{DownloadCompletion, Image, ImageViewer, ImageViewerDelegate};
use lightbox_transition::{PanResponse, SimpleTransitionContext, TransitionContext};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

const VIEWPORT: Size = Size::new(320.0, 480.0);
const FRAME: Duration = Duration::from_micros(16_667);

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Holds downloads until the test completes them
#[derive(Default)]
struct PendingDownloads {
    requests: RefCell<Vec<(String, DownloadCompletion)>>,
}

impl PendingDownloads {
    fn request(&self, url: &str, completion: DownloadCompletion) {
        self.requests.borrow_mut().push((url.to_string(), completion));
    }

    fn urls(&self) -> Vec<String> {
        self.requests.borrow().iter().map(|(url, _)| url.clone()).collect()
    }

    fn complete(&self, url: &str, result: Result<Image, LightboxError>) {
        let position = self
            .requests
            .borrow()
            .iter()
            .position(|(pending, _)| pending == url)
            .expect("download was requested");
        let (_, completion) = self.requests.borrow_mut().remove(position);
        completion(result);
    }
}

fn remote_viewer(initial_index: usize) -> (ImageViewer, Rc<PendingDownloads>) {
    init_tracing();
    let pending = Rc::new(PendingDownloads::default());
    let downloader = {
        let pending = pending.clone();
        Rc::new(move |url: &str, completion: DownloadCompletion| pending.request(url, completion))
    };
    let urls = (0..3).map(|i| format!("https://photos.example/{i}.jpg")).collect();
    let viewer = ImageViewer::with_urls(
        urls,
        initial_index,
        downloader,
        VIEWPORT,
        LightboxConfig::default(),
    )
    .expect("valid viewer");
    (viewer, pending)
}

#[test]
fn test_remote_page_loads_when_download_completes() {
    let (viewer, pending) = remote_viewer(1);
    assert_eq!(pending.urls(), vec!["https://photos.example/1.jpg"]);

    let page = viewer.current_page();
    assert!(page.borrow().is_loading());

    pending.complete(
        "https://photos.example/1.jpg",
        Ok(Image::new(Size::new(640.0, 320.0), vec![0u8; 8])),
    );
    assert!(!page.borrow().is_loading());
    assert_eq!(page.borrow().effective_image_size(), Some(Size::new(320.0, 160.0)));
    assert!(page.borrow().needs_layout());
    assert_eq!(viewer.album().borrow().cached_image_count(), 1);

    // Paging back to it is served from the cache
    let neighbour = viewer.page_after(&page).unwrap();
    let back = viewer.page_before(&neighbour).unwrap();
    assert!(!back.borrow().is_loading());
    assert_eq!(pending.urls(), vec!["https://photos.example/2.jpg"]);
}

#[test]
fn test_failed_download_leaves_page_loading() {
    let (viewer, pending) = remote_viewer(0);
    pending.complete(
        "https://photos.example/0.jpg",
        Err(LightboxError::download("https://photos.example/0.jpg", "timed out")),
    );

    assert!(viewer.current_page().borrow().is_loading());
    assert_eq!(viewer.album().borrow().cached_image_count(), 0);
}

#[test]
fn test_download_outliving_its_page_still_fills_cache() {
    let (viewer, pending) = remote_viewer(0);
    let page = viewer.current_page();
    let next = viewer.page_after(&page).unwrap();
    drop(next);

    pending.complete(
        "https://photos.example/1.jpg",
        Ok(Image::new(Size::new(100.0, 100.0), vec![0u8; 4])),
    );
    assert_eq!(viewer.album().borrow().cached_image_count(), 1);

    viewer.handle_memory_warning();
    assert_eq!(viewer.album().borrow().cached_image_count(), 0);
}

/// A grid of thumbnails that opened the viewer
struct Grid {
    thumbnails: Vec<ViewId>,
    displayed: RefCell<Vec<usize>>,
}

impl ImageViewerDelegate for Grid {
    fn transition_image_view(&self, index: usize) -> Option<ViewId> {
        self.thumbnails.get(index).copied()
    }

    fn did_display_image(&self, index: usize) {
        self.displayed.borrow_mut().push(index);
    }
}

#[test]
fn test_swipe_on_paged_image_zooms_back_to_its_thumbnail() {
    init_tracing();
    let surface = SurfaceId(401);
    let mut views = ViewTree::new(surface);

    let container = views.insert(View::new(VIEWPORT.to_rect()));
    let presenter = views.insert(View::new(VIEWPORT.to_rect()));
    let viewer_view = views.insert(View::new(VIEWPORT.to_rect()));
    views.add_subview(container, presenter);
    views.add_subview(container, viewer_view);
    let thumbnails: Vec<ViewId> = (0..3)
        .map(|i| {
            let thumbnail =
                views.insert(View::image_view(Rect::new(10.0 + 100.0 * i as f32, 40.0, 80.0, 80.0), None));
            views.add_subview(presenter, thumbnail);
            thumbnail
        })
        .collect();

    let images = (0..3)
        .map(|_| Image::new(Size::new(640.0, 640.0), vec![0u8; 4]))
        .collect();
    let mut viewer =
        ImageViewer::with_images(images, 0, VIEWPORT, LightboxConfig::default()).unwrap();
    let grid = Rc::new(Grid {
        thumbnails: thumbnails.clone(),
        displayed: RefCell::new(Vec::new()),
    });
    let delegate: Rc<dyn ImageViewerDelegate> = grid.clone();
    viewer.set_delegate(Some(&delegate));

    // Page to the second image and put it on screen
    let first = viewer.current_page();
    let second = viewer.page_after(&first).unwrap();
    viewer.did_finish_paging(true, &[first], second.clone());
    assert_eq!(*grid.displayed.borrow(), vec![1]);
    let full_image = second.borrow_mut().attach(&mut views, viewer_view).unwrap();
    assert_eq!(views.get(full_image).unwrap().frame, Rect::new(0.0, 80.0, 320.0, 320.0));

    // Swipe down from the middle of the image
    let context = Rc::new(SimpleTransitionContext::new(container, viewer_view, presenter));
    let on_image = Point::new(160.0, 240.0);
    let response = viewer.handle_pan(&PanGesture::began(on_image), viewer_view, &mut views);
    assert_eq!(response, PanResponse::DismissRequested);
    let dyn_context: Rc<dyn TransitionContext> = context.clone();
    assert!(viewer.dismiss(&dyn_context, &mut views));

    viewer.handle_pan(
        &PanGesture::changed(on_image, Vec2::new(0.0, 120.0)),
        viewer_view,
        &mut views,
    );
    let response = viewer.handle_pan(
        &PanGesture::ended(on_image, Vec2::new(0.0, 120.0), Vec2::new(0.0, 600.0)),
        viewer_view,
        &mut views,
    );
    assert_eq!(response, PanResponse::Finished);

    let animator = Animator::for_surface(surface);
    let mut frames = 0;
    while animator.is_running() {
        animator.tick(FRAME, &mut views);
        frames += 1;
        assert!(frames < 1_000, "animations never settled");
    }

    assert_eq!(context.outcome(), Some(true));
    assert!(!views.get(thumbnails[1]).unwrap().hidden);
    assert_eq!(views.get(viewer_view).unwrap().alpha, 0.0);
    Animator::release_surface(surface);
}
