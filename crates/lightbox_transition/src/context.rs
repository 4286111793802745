//! Transition context
//!
//! What the host presentation system hands a running transition: the
//! container view the transition plays out in, the root views of the
//! outgoing and incoming screens, and a way to report the outcome.

use lightbox_core::ViewId;
use std::cell::Cell;

/// Which side of the transition a view belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionViewKey {
    /// The screen being transitioned away from
    From,
    /// The screen being transitioned to
    To,
}

/// Host-provided state of one running transition
///
/// Transitions hold the context weakly; the host keeps it alive until
/// [`TransitionContext::complete_transition`] has been called.
pub trait TransitionContext {
    /// View the transition animates in
    fn container_view(&self) -> Option<ViewId>;

    /// Root view of the outgoing or incoming screen
    fn view(&self, key: TransitionViewKey) -> Option<ViewId>;

    /// Report the outcome; `false` means the transition did not take effect
    fn complete_transition(&self, did_complete: bool);
}

type CompletionHandler = Box<dyn Fn(bool)>;

/// A fixed set of views with an optional completion handler
///
/// Records the reported outcome, which makes it handy for hosts that only
/// need to poll.
pub struct SimpleTransitionContext {
    container: Option<ViewId>,
    from: Option<ViewId>,
    to: Option<ViewId>,
    outcome: Cell<Option<bool>>,
    completions: Cell<u32>,
    on_complete: Option<CompletionHandler>,
}

impl SimpleTransitionContext {
    pub fn new(container: ViewId, from: ViewId, to: ViewId) -> Self {
        Self {
            container: Some(container),
            from: Some(from),
            to: Some(to),
            outcome: Cell::new(None),
            completions: Cell::new(0),
            on_complete: None,
        }
    }

    /// A context that is missing its container view
    pub fn without_container(from: ViewId, to: ViewId) -> Self {
        Self {
            container: None,
            ..Self::new(ViewId::default(), from, to)
        }
    }

    pub fn on_complete<F>(mut self, handler: F) -> Self
    where
        F: Fn(bool) + 'static,
    {
        self.on_complete = Some(Box::new(handler));
        self
    }

    /// The last reported outcome, if any
    pub fn outcome(&self) -> Option<bool> {
        self.outcome.get()
    }

    /// How many times the outcome has been reported
    pub fn completion_count(&self) -> u32 {
        self.completions.get()
    }
}

impl TransitionContext for SimpleTransitionContext {
    fn container_view(&self) -> Option<ViewId> {
        self.container
    }

    fn view(&self, key: TransitionViewKey) -> Option<ViewId> {
        match key {
            TransitionViewKey::From => self.from,
            TransitionViewKey::To => self.to,
        }
    }

    fn complete_transition(&self, did_complete: bool) {
        self.outcome.set(Some(did_complete));
        self.completions.set(self.completions.get() + 1);
        if let Some(handler) = &self.on_complete {
            handler(did_complete);
        }
    }
}
