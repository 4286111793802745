//! Transition controller
//!
//! Owns the gesture side of swipe-to-dismiss and answers the host's
//! transitioning-delegate questions.
//!
//! A pan that begins on the displayed image makes the dismissal eligible for
//! interactive control. The host is then expected to start dismissing (see
//! [`PanResponse::DismissRequested`] and
//! [`TransitionController::begin_dismissal`]), which hands the new dismiss
//! [`TransitionAnimator`] back to this controller. Subsequent pan samples
//! move the flying image, and releasing past the translation threshold on
//! either axis completes the dismissal; anything shorter springs back.

use crate::animator::{TransitionAnimator, TransitionDirection};
use crate::context::TransitionContext;
use lightbox_core::{GesturePhase, PanGesture, TransitionConfig, Vec2, ViewId, ViewTree};
use std::rc::Rc;

/// Resolves an image view on demand
pub type ImageViewLookup = Box<dyn Fn() -> Option<ViewId>>;

/// What a pan sample did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanResponse {
    /// Nothing to do for this sample
    Ignored,
    /// Gesture started on the image: the host should dismiss the viewer now
    DismissRequested,
    /// The flying image moved with the finger
    Updated,
    /// Released past the threshold, dismissal is completing
    Finished,
    /// Released short of the threshold or interrupted, dismissal is reverting
    Cancelled,
}

/// The questions a host presentation system asks about custom transitions
pub trait TransitioningDelegate {
    /// Animator for presenting the viewer, `None` for the host default
    fn animation_for_present(&self) -> Option<TransitionAnimator>;

    /// Animator for dismissing the viewer, `None` for the host default
    fn animation_for_dismiss(&mut self) -> Option<TransitionAnimator>;

    /// Interactive driver for `animator`, `None` to run it non-interactively
    fn interaction_controller_for_dismissal(
        &self,
        animator: &TransitionAnimator,
    ) -> Option<TransitionAnimator>;
}

/// Gesture-driven dismissal and transition vending for one viewer
pub struct TransitionController {
    config: TransitionConfig,
    current_image_view: Option<ImageViewLookup>,
    transition_image_view: Option<ImageViewLookup>,
    dismiss_transition_animator: Option<TransitionAnimator>,
    should_dismiss_interactively: bool,
    last_pan_translation: Option<Vec2>,
}

impl TransitionController {
    pub fn new(config: TransitionConfig) -> Self {
        Self {
            config,
            current_image_view: None,
            transition_image_view: None,
            dismiss_transition_animator: None,
            should_dismiss_interactively: false,
            last_pan_translation: None,
        }
    }

    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    /// Lookup for the image currently displayed in the viewer
    pub fn set_current_image_view<F>(&mut self, lookup: F)
    where
        F: Fn() -> Option<ViewId> + 'static,
    {
        self.current_image_view = Some(Box::new(lookup));
    }

    /// Lookup for the presenter's image that the viewer zooms from and to
    pub fn set_transition_image_view<F>(&mut self, lookup: F)
    where
        F: Fn() -> Option<ViewId> + 'static,
    {
        self.transition_image_view = Some(Box::new(lookup));
    }

    pub fn clear_image_view_lookups(&mut self) {
        self.current_image_view = None;
        self.transition_image_view = None;
    }

    /// Whether the current gesture started on the displayed image
    pub fn is_dismissing_interactively(&self) -> bool {
        self.should_dismiss_interactively
    }

    /// The dismiss transition handed out most recently, while still in use
    pub fn dismiss_transition_animator(&self) -> Option<&TransitionAnimator> {
        self.dismiss_transition_animator.as_ref()
    }

    fn current_image_view(&self) -> Option<ViewId> {
        self.current_image_view.as_ref().and_then(|lookup| lookup())
    }

    fn transition_image_view(&self) -> Option<ViewId> {
        self.transition_image_view.as_ref().and_then(|lookup| lookup())
    }

    /// Feed one pan sample, expressed in `source_view` coordinates
    pub fn did_pan(
        &mut self,
        gesture: &PanGesture,
        source_view: ViewId,
        views: &mut ViewTree,
    ) -> PanResponse {
        match gesture.phase {
            GesturePhase::Began => {
                let Some(image_view) = self.current_image_view() else {
                    return PanResponse::Ignored;
                };
                let on_image = views
                    .frame_in(image_view, source_view)
                    .is_some_and(|frame| frame.contains(gesture.location));
                if !on_image {
                    tracing::trace!("TransitionController: pan began off the image");
                    return PanResponse::Ignored;
                }

                self.last_pan_translation = Some(gesture.translation);
                self.should_dismiss_interactively = true;
                tracing::debug!("TransitionController: interactive dismissal requested");
                PanResponse::DismissRequested
            }
            GesturePhase::Changed => {
                let (true, Some(animator), Some(last)) = (
                    self.should_dismiss_interactively,
                    self.dismiss_transition_animator.as_ref(),
                    self.last_pan_translation,
                ) else {
                    return PanResponse::Ignored;
                };

                let delta = Vec2::new(
                    gesture.translation.x - last.x,
                    gesture.translation.y - last.y,
                );
                animator.update_interactive_transition(delta, views);
                self.last_pan_translation = Some(gesture.translation);
                PanResponse::Updated
            }
            GesturePhase::Ended => {
                let animator = self.take_interactive_animator();
                let Some(animator) = animator else {
                    return PanResponse::Ignored;
                };

                let threshold = self.config.dismiss_translation_threshold;
                if gesture.translation.exceeds_on_either_axis(threshold) {
                    tracing::debug!(
                        "TransitionController: released at {:?}, finishing dismissal",
                        gesture.translation
                    );
                    animator.finish_interactive_transition(gesture.velocity, views);
                    PanResponse::Finished
                } else {
                    tracing::debug!(
                        "TransitionController: released at {:?}, cancelling dismissal",
                        gesture.translation
                    );
                    animator.cancel_interactive_transition(gesture.velocity, views);
                    PanResponse::Cancelled
                }
            }
            GesturePhase::Cancelled | GesturePhase::Failed => {
                let Some(animator) = self.take_interactive_animator() else {
                    return PanResponse::Ignored;
                };
                tracing::debug!(
                    "TransitionController: gesture {:?}, cancelling dismissal",
                    gesture.phase
                );
                animator.cancel_interactive_transition(Vec2::ZERO, views);
                PanResponse::Cancelled
            }
            GesturePhase::Possible => PanResponse::Ignored,
        }
    }

    /// Reset gesture bookkeeping, returning the animator if the gesture was
    /// driving one
    fn take_interactive_animator(&mut self) -> Option<TransitionAnimator> {
        let eligible = std::mem::take(&mut self.should_dismiss_interactively);
        self.last_pan_translation = None;
        let animator = self.dismiss_transition_animator.take();
        animator.filter(|_| eligible)
    }

    /// Run the presentation transition the way a host would
    ///
    /// Returns `false` when no custom animator is available, in which case
    /// the host should fall back to its default transition.
    pub fn begin_presentation(
        &self,
        context: &Rc<dyn TransitionContext>,
        views: &mut ViewTree,
    ) -> bool {
        let Some(animator) = self.animation_for_present() else {
            return false;
        };
        animator.animate_transition(context, views);
        true
    }

    /// Run the dismissal transition the way a host would, interactively if
    /// a pan gesture asked for it
    pub fn begin_dismissal(
        &mut self,
        context: &Rc<dyn TransitionContext>,
        views: &mut ViewTree,
    ) -> bool {
        let Some(animator) = self.animation_for_dismiss() else {
            return false;
        };
        match self.interaction_controller_for_dismissal(&animator) {
            Some(interactive) => interactive.start_interactive_transition(context, views),
            None => animator.animate_transition(context, views),
        }
        true
    }
}

impl Default for TransitionController {
    fn default() -> Self {
        Self::new(TransitionConfig::default())
    }
}

impl TransitioningDelegate for TransitionController {
    fn animation_for_present(&self) -> Option<TransitionAnimator> {
        let from_image_view = self.transition_image_view()?;
        let to_image_view = self.current_image_view()?;
        Some(TransitionAnimator::with_config(
            TransitionDirection::Present,
            from_image_view,
            to_image_view,
            self.config.clone(),
        ))
    }

    fn animation_for_dismiss(&mut self) -> Option<TransitionAnimator> {
        let from_image_view = self.current_image_view()?;
        let to_image_view = self.transition_image_view()?;
        let animator = TransitionAnimator::with_config(
            TransitionDirection::Dismiss,
            from_image_view,
            to_image_view,
            self.config.clone(),
        );
        self.dismiss_transition_animator = Some(animator.clone());
        Some(animator)
    }

    fn interaction_controller_for_dismissal(
        &self,
        animator: &TransitionAnimator,
    ) -> Option<TransitionAnimator> {
        if !self.should_dismiss_interactively {
            return None;
        }
        self.dismiss_transition_animator
            .as_ref()
            .filter(|retained| retained.ptr_eq(animator))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lightbox_core::{Point, Rect, SurfaceId, View};

    fn controller_with_views() -> (TransitionController, ViewTree, ViewId, ViewId) {
        let mut views = ViewTree::new(SurfaceId::MAIN);
        let root = views.insert(View::new(Rect::new(0.0, 0.0, 320.0, 480.0)));
        let image = views.insert(View::new(Rect::new(0.0, 80.0, 320.0, 320.0)));
        let thumbnail = views.insert(View::new(Rect::new(10.0, 10.0, 40.0, 40.0)));
        views.add_subview(root, image);
        views.add_subview(root, thumbnail);

        let mut controller = TransitionController::default();
        controller.set_current_image_view(move || Some(image));
        controller.set_transition_image_view(move || Some(thumbnail));
        (controller, views, root, image)
    }

    #[test]
    fn test_began_on_image_requests_dismissal() {
        let (mut controller, mut views, root, _) = controller_with_views();
        let response = controller.did_pan(&PanGesture::began(Point::new(160.0, 200.0)), root, &mut views);

        assert_eq!(response, PanResponse::DismissRequested);
        assert!(controller.is_dismissing_interactively());
    }

    #[test]
    fn test_began_off_image_is_ignored() {
        let (mut controller, mut views, root, _) = controller_with_views();
        let response = controller.did_pan(&PanGesture::began(Point::new(160.0, 20.0)), root, &mut views);

        assert_eq!(response, PanResponse::Ignored);
        assert!(!controller.is_dismissing_interactively());
    }

    #[test]
    fn test_began_without_lookup_is_ignored() {
        let (mut controller, mut views, root, _) = controller_with_views();
        controller.clear_image_view_lookups();
        let response = controller.did_pan(&PanGesture::began(Point::new(160.0, 200.0)), root, &mut views);
        assert_eq!(response, PanResponse::Ignored);
        assert!(controller.animation_for_present().is_none());
    }

    #[test]
    fn test_vends_present_and_dismiss_animators() {
        let (mut controller, _views, _root, image) = controller_with_views();

        let present = controller.animation_for_present().unwrap();
        assert_eq!(present.direction(), TransitionDirection::Present);
        assert_eq!(present.to_image_view(), image);

        let dismiss = controller.animation_for_dismiss().unwrap();
        assert_eq!(dismiss.direction(), TransitionDirection::Dismiss);
        assert_eq!(dismiss.from_image_view(), image);
        assert!(controller.dismiss_transition_animator().unwrap().ptr_eq(&dismiss));
    }

    #[test]
    fn test_interaction_controller_requires_eligibility_and_identity() {
        let (mut controller, mut views, root, _) = controller_with_views();
        let dismiss = controller.animation_for_dismiss().unwrap();
        assert!(controller.interaction_controller_for_dismissal(&dismiss).is_none());

        controller.did_pan(&PanGesture::began(Point::new(160.0, 200.0)), root, &mut views);
        let dismiss = controller.animation_for_dismiss().unwrap();
        let interactive = controller.interaction_controller_for_dismissal(&dismiss).unwrap();
        assert!(interactive.ptr_eq(&dismiss));

        let stranger = controller.animation_for_present().unwrap();
        assert!(controller.interaction_controller_for_dismissal(&stranger).is_none());
    }

    #[test]
    fn test_ended_resets_bookkeeping() {
        let (mut controller, mut views, root, _) = controller_with_views();
        controller.did_pan(&PanGesture::began(Point::new(160.0, 200.0)), root, &mut views);
        controller.animation_for_dismiss();

        controller.did_pan(
            &PanGesture::ended(Point::new(160.0, 200.0), Vec2::new(0.0, 10.0), Vec2::ZERO),
            root,
            &mut views,
        );
        assert!(!controller.is_dismissing_interactively());
        assert!(controller.dismiss_transition_animator().is_none());
    }

    #[test]
    fn test_gesture_cancel_clears_eligibility() {
        let (mut controller, mut views, root, _) = controller_with_views();
        controller.did_pan(&PanGesture::began(Point::new(160.0, 200.0)), root, &mut views);

        let interrupted = PanGesture::began(Point::new(160.0, 200.0)).with_phase(GesturePhase::Cancelled);
        // No dismissal was started, so there is nothing to cancel
        assert_eq!(controller.did_pan(&interrupted, root, &mut views), PanResponse::Ignored);
        assert!(!controller.is_dismissing_interactively());
    }
}
