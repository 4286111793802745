//! View registry
//!
//! Every view of a display surface lives in a [`ViewTree`]. Consumers hold
//! [`ViewId`]s, which are generational keys: once a view is destroyed, every
//! outstanding id for it resolves to `None`. Animations and transitions keep
//! only ids, so they never extend the lifetime of the views they drive.

use crate::geometry::{Point, Rect, Shadow};
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Non-owning handle to a view in a [`ViewTree`]
    pub struct ViewId;
}

/// Identity of a display surface (screen / window)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u32);

impl SurfaceId {
    /// The primary display
    pub const MAIN: SurfaceId = SurfaceId(0);
}

/// Identity of decoded image content shown by an image view
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageId(pub u64);

/// How image content is fitted into a view's bounds
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ContentMode {
    #[default]
    ScaleToFill,
    ScaleAspectFit,
    ScaleAspectFill,
    Center,
}

/// A node in the view tree
#[derive(Clone, Debug)]
pub struct View {
    /// Frame in the superview's coordinate space
    pub frame: Rect,
    pub alpha: f32,
    pub hidden: bool,
    /// Image content, if this is an image view
    pub image: Option<ImageId>,
    pub clips_to_bounds: bool,
    pub content_mode: ContentMode,
    pub corner_radius: f32,
    pub shadow: Option<Shadow>,
    superview: Option<ViewId>,
    /// Back-to-front
    subviews: Vec<ViewId>,
}

impl View {
    pub fn new(frame: Rect) -> Self {
        Self {
            frame,
            alpha: 1.0,
            hidden: false,
            image: None,
            clips_to_bounds: false,
            content_mode: ContentMode::default(),
            corner_radius: 0.0,
            shadow: None,
            superview: None,
            subviews: Vec::new(),
        }
    }

    /// Create an image view showing `image`
    pub fn image_view(frame: Rect, image: Option<ImageId>) -> Self {
        Self {
            image,
            ..Self::new(frame)
        }
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_content_mode(mut self, mode: ContentMode) -> Self {
        self.content_mode = mode;
        self
    }

    pub fn with_clips_to_bounds(mut self, clips: bool) -> Self {
        self.clips_to_bounds = clips;
        self
    }

    pub fn with_corner_radius(mut self, radius: f32) -> Self {
        self.corner_radius = radius;
        self
    }

    pub fn superview(&self) -> Option<ViewId> {
        self.superview
    }

    pub fn subviews(&self) -> &[ViewId] {
        &self.subviews
    }

    /// Bounds in the view's own coordinate space
    pub fn bounds(&self) -> Rect {
        self.frame.size.to_rect()
    }
}

/// All views of one display surface
pub struct ViewTree {
    surface: SurfaceId,
    views: SlotMap<ViewId, View>,
}

impl ViewTree {
    pub fn new(surface: SurfaceId) -> Self {
        Self {
            surface,
            views: SlotMap::with_key(),
        }
    }

    /// The display surface these views are shown on
    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Register a detached view
    pub fn insert(&mut self, view: View) -> ViewId {
        let mut view = view;
        view.superview = None;
        view.subviews.clear();
        self.views.insert(view)
    }

    pub fn contains(&self, id: ViewId) -> bool {
        self.views.contains_key(id)
    }

    pub fn get(&self, id: ViewId) -> Option<&View> {
        self.views.get(id)
    }

    pub fn get_mut(&mut self, id: ViewId) -> Option<&mut View> {
        self.views.get_mut(id)
    }

    /// Append `child` as the front-most subview of `parent`
    ///
    /// Returns `false` if either view no longer exists or `child` is an
    /// ancestor of `parent`.
    pub fn add_subview(&mut self, parent: ViewId, child: ViewId) -> bool {
        if !self.can_attach(parent, child) {
            return false;
        }
        self.detach(child);
        if let Some(node) = self.views.get_mut(parent) {
            node.subviews.push(child);
        }
        if let Some(node) = self.views.get_mut(child) {
            node.superview = Some(parent);
        }
        true
    }

    /// Insert `child` into `parent` directly above `sibling`
    ///
    /// Falls back to appending when `sibling` is not a subview of `parent`.
    pub fn insert_subview_above(&mut self, parent: ViewId, child: ViewId, sibling: ViewId) -> bool {
        if !self.can_attach(parent, child) {
            return false;
        }
        self.detach(child);
        let Some(node) = self.views.get_mut(parent) else {
            return false;
        };
        match node.subviews.iter().position(|&id| id == sibling) {
            Some(index) => node.subviews.insert(index + 1, child),
            None => node.subviews.push(child),
        }
        if let Some(node) = self.views.get_mut(child) {
            node.superview = Some(parent);
        }
        true
    }

    /// Detach a view from its superview, keeping it registered
    pub fn remove_from_superview(&mut self, id: ViewId) {
        self.detach(id);
    }

    /// Remove a view and its whole subtree from the registry
    ///
    /// Returns `false` if the view was already gone.
    pub fn destroy(&mut self, id: ViewId) -> bool {
        if !self.views.contains_key(id) {
            return false;
        }
        self.detach(id);

        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(view) = self.views.remove(next) {
                pending.extend(view.subviews);
            }
        }
        tracing::trace!("ViewTree: destroyed {:?}", id);
        true
    }

    /// Origin of `id` expressed in surface coordinates
    pub fn origin_on_surface(&self, id: ViewId) -> Option<Point> {
        let mut origin = Point::ZERO;
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.views.get(node_id)?;
            origin.x += node.frame.origin.x;
            origin.y += node.frame.origin.y;
            current = node.superview;
        }
        Some(origin)
    }

    /// Convert `rect` from the coordinate space of `from` to that of `to`
    ///
    /// `None` on either side means surface coordinates. Returns `None` when a
    /// referenced view no longer exists.
    pub fn convert_rect(&self, rect: Rect, from: Option<ViewId>, to: Option<ViewId>) -> Option<Rect> {
        let from_origin = match from {
            Some(id) => self.origin_on_surface(id)?,
            None => Point::ZERO,
        };
        let to_origin = match to {
            Some(id) => self.origin_on_surface(id)?,
            None => Point::ZERO,
        };
        Some(rect.offset(from_origin.x - to_origin.x, from_origin.y - to_origin.y))
    }

    /// Convert a point between coordinate spaces, see [`ViewTree::convert_rect`]
    pub fn convert_point(&self, point: Point, from: Option<ViewId>, to: Option<ViewId>) -> Option<Point> {
        self.convert_rect(Rect::from_origin_size(point, Default::default()), from, to)
            .map(|rect| rect.origin)
    }

    /// Frame of `id` in the coordinate space of `container`
    ///
    /// Requires `id` to be attached to a superview.
    pub fn frame_in(&self, id: ViewId, container: ViewId) -> Option<Rect> {
        let view = self.views.get(id)?;
        let superview = view.superview?;
        self.convert_rect(view.frame, Some(superview), Some(container))
    }

    fn can_attach(&self, parent: ViewId, child: ViewId) -> bool {
        if parent == child || !self.views.contains_key(parent) || !self.views.contains_key(child) {
            return false;
        }
        // Refuse cycles: child must not be an ancestor of parent
        let mut current = self.views.get(parent).and_then(|v| v.superview);
        while let Some(id) = current {
            if id == child {
                return false;
            }
            current = self.views.get(id).and_then(|v| v.superview);
        }
        true
    }

    fn detach(&mut self, id: ViewId) {
        let Some(superview) = self.views.get_mut(id).and_then(|v| v.superview.take()) else {
            return;
        };
        if let Some(parent) = self.views.get_mut(superview) {
            parent.subviews.retain(|&sub| sub != id);
        }
    }
}
