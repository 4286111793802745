//! Transition animator
//!
//! Runs one present or dismiss transition between an image view on the
//! outgoing screen and its counterpart on the incoming screen:
//!
//! 1. **Prepare**: when presenting, the incoming screen is placed above the
//!    outgoing one. A flying copy of the source image is added to the
//!    container at the source frame, and both real image views are hidden.
//! 2. **Fade**: the presented screen springs its alpha in (present) or out
//!    (dismiss).
//! 3. **Zoom**: the flying image springs from the source frame to the
//!    destination frame. While a dismissal is dragged interactively the
//!    flying image follows the finger instead, and the zoom starts on release.
//! 4. **Finish**: the flying image is removed, the real image views are shown
//!    again, and the outcome is reported to the [`TransitionContext`].
//!
//! A transition whose views have disappeared is abandoned and reported as not
//! completed. The outcome is reported exactly once.

use crate::context::{TransitionContext, TransitionViewKey};
use lightbox_animation::{
    Animator, SharedAnimation, SpringAnimation, SpringIntegrator, Vector1D, Vector4D, ViewAlpha,
    ViewFrame,
};
use lightbox_core::{Color, Shadow, TransitionConfig, Vec2, View, ViewId, ViewTree};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

/// Which way the modal transition goes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionDirection {
    /// Thumbnail to full-size viewer
    Present,
    /// Full-size viewer back to the thumbnail
    Dismiss,
}

/// Lifecycle of a transition
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransitionPhase {
    /// Not started
    #[default]
    Idle,
    /// Setting up the container and the flying image
    Preparing,
    /// Fade running, flying image following the gesture
    Interactive,
    /// Zooming toward the destination
    Finishing,
    /// Zooming back toward the source
    Cancelling,
    /// Reported as completed
    Completed,
    /// Reported as not completed after a cancel
    Cancelled,
    /// Abandoned because a required view was missing
    Aborted,
}

impl TransitionPhase {
    /// Whether the outcome has been reported
    pub fn is_finished(self) -> bool {
        matches!(
            self,
            TransitionPhase::Completed | TransitionPhase::Cancelled | TransitionPhase::Aborted
        )
    }
}

struct TransitionState {
    direction: TransitionDirection,
    from_image_view: ViewId,
    to_image_view: ViewId,
    flying_image_view: Option<ViewId>,
    from_view: Option<ViewId>,
    to_view: Option<ViewId>,
    context: Option<Weak<dyn TransitionContext>>,
    phase: TransitionPhase,
    config: TransitionConfig,
    fade: Option<SharedAnimation>,
    zoom: Option<SharedAnimation>,
    reported: bool,
}

/// Which running spring a new one replaces
#[derive(Clone, Copy)]
enum Leg {
    Fade,
    Zoom,
}

/// Driver of a single present or dismiss transition
///
/// Cloning yields another handle to the same transition; compare handles
/// with [`TransitionAnimator::ptr_eq`].
#[derive(Clone)]
pub struct TransitionAnimator {
    state: Rc<RefCell<TransitionState>>,
}

impl TransitionAnimator {
    pub fn new(direction: TransitionDirection, from_image_view: ViewId, to_image_view: ViewId) -> Self {
        Self::with_config(
            direction,
            from_image_view,
            to_image_view,
            TransitionConfig::default(),
        )
    }

    pub fn with_config(
        direction: TransitionDirection,
        from_image_view: ViewId,
        to_image_view: ViewId,
        config: TransitionConfig,
    ) -> Self {
        Self {
            state: Rc::new(RefCell::new(TransitionState {
                direction,
                from_image_view,
                to_image_view,
                flying_image_view: None,
                from_view: None,
                to_view: None,
                context: None,
                phase: TransitionPhase::Idle,
                config,
                fade: None,
                zoom: None,
                reported: false,
            })),
        }
    }

    pub fn direction(&self) -> TransitionDirection {
        self.state.borrow().direction
    }

    pub fn phase(&self) -> TransitionPhase {
        self.state.borrow().phase
    }

    pub fn from_image_view(&self) -> ViewId {
        self.state.borrow().from_image_view
    }

    pub fn to_image_view(&self) -> ViewId {
        self.state.borrow().to_image_view
    }

    /// The transient image travelling between the two image views
    pub fn flying_image_view(&self) -> Option<ViewId> {
        self.state.borrow().flying_image_view
    }

    /// Nominal duration reported to the host presentation system
    pub fn transition_duration(&self) -> Duration {
        self.state.borrow().config.duration()
    }

    /// Check if two handles drive the same transition
    pub fn ptr_eq(&self, other: &TransitionAnimator) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    /// Run the whole transition without gesture input
    pub fn animate_transition(&self, context: &Rc<dyn TransitionContext>, views: &mut ViewTree) {
        self.start_interactive_transition(context, views);
        if self.phase() == TransitionPhase::Interactive {
            self.finish_interactive_transition(Vec2::ZERO, views);
        }
    }

    /// Set up the flying image and start the fade
    pub fn start_interactive_transition(
        &self,
        context: &Rc<dyn TransitionContext>,
        views: &mut ViewTree,
    ) {
        let from_view = context.view(TransitionViewKey::From);
        let to_view = context.view(TransitionViewKey::To);
        {
            let mut state = self.state.borrow_mut();
            if state.phase != TransitionPhase::Idle {
                tracing::warn!(
                    "TransitionAnimator: {:?} transition already started ({:?})",
                    state.direction,
                    state.phase
                );
                return;
            }
            state.context = Some(Rc::downgrade(context));
            state.from_view = from_view;
            state.to_view = to_view;
            state.phase = TransitionPhase::Preparing;
            tracing::debug!("TransitionAnimator: starting {:?}", state.direction);
        }

        self.prepare_container_view(views);
        if !self.prepare_image_views(views) {
            return;
        }
        if self.perform_fade(false, views) {
            self.set_phase(TransitionPhase::Interactive);
        }
    }

    /// Move the flying image by `delta` while the gesture is live
    pub fn update_interactive_transition(&self, delta: Vec2, views: &mut ViewTree) {
        if self.phase().is_finished() {
            return;
        }
        let flying = self.flying_image_view();
        if let Some(view) = flying.and_then(|id| views.get_mut(id)) {
            view.frame = view.frame.offset(delta.x, delta.y);
            return;
        }
        self.abort("flying image view is gone", views);
    }

    /// Spring the flying image to its destination, seeded with `velocity`
    pub fn finish_interactive_transition(&self, velocity: Vec2, views: &mut ViewTree) {
        if self.phase().is_finished() {
            return;
        }
        self.set_phase(TransitionPhase::Finishing);
        self.perform_zoom(false, velocity, views);
    }

    /// Fade back and spring the flying image back to its source
    pub fn cancel_interactive_transition(&self, velocity: Vec2, views: &mut ViewTree) {
        if self.phase().is_finished() {
            return;
        }
        self.set_phase(TransitionPhase::Cancelling);
        if self.perform_fade(true, views) {
            self.perform_zoom(true, velocity, views);
        }
    }

    fn set_phase(&self, phase: TransitionPhase) {
        let mut state = self.state.borrow_mut();
        tracing::trace!(
            "TransitionAnimator: {:?} {:?} -> {:?}",
            state.direction,
            state.phase,
            phase
        );
        state.phase = phase;
    }

    fn context(&self) -> Option<Rc<dyn TransitionContext>> {
        self.state.borrow().context.as_ref().and_then(Weak::upgrade)
    }

    /// The container view, if the context and the view are both still alive
    fn container_view(&self, views: &ViewTree) -> Option<ViewId> {
        self.context()?
            .container_view()
            .filter(|&id| views.contains(id))
    }

    fn integrator(&self) -> SpringIntegrator {
        SpringIntegrator::from_config(&self.state.borrow().config)
    }

    fn prepare_container_view(&self, views: &mut ViewTree) {
        let (direction, from_view, to_view) = {
            let state = self.state.borrow();
            (state.direction, state.from_view, state.to_view)
        };
        if direction != TransitionDirection::Present {
            return;
        }
        if let (Some(container), Some(from_view), Some(to_view)) =
            (self.container_view(views), from_view, to_view)
        {
            views.insert_subview_above(container, to_view, from_view);
        }
    }

    fn prepare_image_views(&self, views: &mut ViewTree) -> bool {
        let (from_image, to_image, config) = {
            let state = self.state.borrow();
            (state.from_image_view, state.to_image_view, state.config.clone())
        };
        let prepared = self.container_view(views).and_then(|container| {
            let frame = views.frame_in(from_image, container)?;
            views.contains(to_image).then_some((container, frame))
        });
        let Some((container, frame)) = prepared else {
            self.abort("missing container or image view", views);
            return false;
        };

        let image = views.get(from_image).and_then(|view| view.image);
        let mut flying = View::image_view(frame, image);
        flying.shadow = Some(Shadow::new(
            0.0,
            config.shadow_offset_y,
            config.shadow_radius,
            Color::BLACK.with_alpha(config.shadow_opacity),
        ));
        let flying = views.insert(flying);
        views.add_subview(container, flying);

        for id in [from_image, to_image] {
            if let Some(view) = views.get_mut(id) {
                view.hidden = true;
            }
        }
        self.state.borrow_mut().flying_image_view = Some(flying);
        true
    }

    fn perform_fade(&self, reverse: bool, views: &mut ViewTree) -> bool {
        let (direction, from_view, to_view) = {
            let state = self.state.borrow();
            (state.direction, state.from_view, state.to_view)
        };
        let alive = |id: Option<ViewId>| id.filter(|&id| views.contains(id));
        let (Some(_), Some(from_view), Some(to_view)) =
            (self.container_view(views), alive(from_view), alive(to_view))
        else {
            self.abort("missing container or screen view", views);
            return false;
        };

        let (view, initial, target) = match direction {
            TransitionDirection::Present => (to_view, 0.0, 1.0),
            TransitionDirection::Dismiss => (from_view, 1.0, 0.0),
        };
        let (start, end) = if reverse { (target, initial) } else { (initial, target) };
        if let Some(node) = views.get_mut(view) {
            node.alpha = start;
        }

        let fade = SpringAnimation::new(views, view, ViewAlpha, Vector1D::new(end), Vector1D::ZERO)
            .with_integrator(self.integrator())
            .into_shared();
        self.run(Leg::Fade, fade, views);
        true
    }

    fn perform_zoom(&self, reverse: bool, velocity: Vec2, views: &mut ViewTree) -> bool {
        let (direction, from_image, to_image, flying, context) = {
            let state = self.state.borrow();
            (
                state.direction,
                state.from_image_view,
                state.to_image_view,
                state.flying_image_view,
                state.context.clone(),
            )
        };
        let resolved = self.container_view(views).and_then(|container| {
            let flying = flying.filter(|&id| views.contains(id))?;
            let initial = views.frame_in(from_image, container)?;
            let destination = views.frame_in(to_image, container)?;
            Some((flying, initial, destination))
        });
        let Some((flying, initial, destination)) = resolved else {
            self.abort("missing container, image, or flying image view", views);
            return false;
        };

        if !reverse {
            let source = match direction {
                TransitionDirection::Present => from_image,
                TransitionDirection::Dismiss => to_image,
            };
            let styling = views
                .get(source)
                .map(|view| (view.clips_to_bounds, view.content_mode));
            let corner_radius = views.get(to_image).map(|view| view.corner_radius);
            if let Some(view) = views.get_mut(flying) {
                if let Some((clips_to_bounds, content_mode)) = styling {
                    view.clips_to_bounds = clips_to_bounds;
                    view.content_mode = content_mode;
                }
                if let Some(corner_radius) = corner_radius {
                    view.corner_radius = corner_radius;
                }
            }
        }

        let target = if reverse { initial } else { destination };
        let state = Rc::downgrade(&self.state);
        let zoom = SpringAnimation::new(
            views,
            flying,
            ViewFrame,
            Vector4D::from(target),
            Vector4D::new(velocity.x, velocity.y, 0.0, 0.0),
        )
        .with_integrator(self.integrator())
        .on_tick(move |finished, views| {
            if !finished {
                return;
            }
            views.destroy(flying);
            for id in [from_image, to_image] {
                if let Some(view) = views.get_mut(id) {
                    view.hidden = false;
                }
            }
            conclude(&state, context.as_ref(), !reverse);
        })
        .into_shared();
        self.run(Leg::Zoom, zoom, views);
        true
    }

    /// Register `animation` with the surface animator, replacing the
    /// previous spring of the same leg
    fn run(&self, leg: Leg, animation: SharedAnimation, views: &ViewTree) {
        let previous = {
            let mut state = self.state.borrow_mut();
            let slot = match leg {
                Leg::Fade => &mut state.fade,
                Leg::Zoom => &mut state.zoom,
            };
            slot.replace(animation.clone())
        };
        let animator = Animator::for_surface(views.surface());
        if let Some(previous) = previous {
            animator.remove(&previous);
        }
        animator.add(animation);
    }

    /// Abandon the transition and report it as not completed
    fn abort(&self, reason: &str, views: &mut ViewTree) {
        let (flying, running, images) = {
            let mut state = self.state.borrow_mut();
            if state.reported {
                return;
            }
            tracing::warn!(
                "TransitionAnimator: abandoning {:?} transition: {}",
                state.direction,
                reason
            );
            let running: Vec<SharedAnimation> =
                state.fade.take().into_iter().chain(state.zoom.take()).collect();
            (
                state.flying_image_view.take(),
                running,
                [state.from_image_view, state.to_image_view],
            )
        };

        let animator = Animator::for_surface(views.surface());
        for animation in &running {
            animator.remove(animation);
        }
        if let Some(flying) = flying {
            views.destroy(flying);
        }
        for id in images {
            if let Some(view) = views.get_mut(id) {
                view.hidden = false;
            }
        }
        self.report(false, TransitionPhase::Aborted);
    }

    fn report(&self, did_complete: bool, phase: TransitionPhase) {
        let context = {
            let mut state = self.state.borrow_mut();
            if state.reported {
                return;
            }
            state.reported = true;
            state.phase = phase;
            state.flying_image_view = None;
            state.fade = None;
            state.zoom = None;
            tracing::debug!(
                "TransitionAnimator: {:?} transition ended ({:?})",
                state.direction,
                phase
            );
            state.context.take()
        };
        if let Some(context) = context.as_ref().and_then(Weak::upgrade) {
            context.complete_transition(did_complete);
        }
    }
}

/// Report the end of a zoom, whether or not the animator is still around
fn conclude(
    state: &Weak<RefCell<TransitionState>>,
    context: Option<&Weak<dyn TransitionContext>>,
    did_complete: bool,
) {
    let phase = if did_complete {
        TransitionPhase::Completed
    } else {
        TransitionPhase::Cancelled
    };
    match state.upgrade() {
        Some(state) => TransitionAnimator { state }.report(did_complete, phase),
        None => {
            if let Some(context) = context.and_then(Weak::upgrade) {
                context.complete_transition(did_complete);
            }
        }
    }
}

impl fmt::Debug for TransitionAnimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("TransitionAnimator")
            .field("direction", &state.direction)
            .field("phase", &state.phase)
            .field("flying_image_view", &state.flying_image_view)
            .finish()
    }
}
