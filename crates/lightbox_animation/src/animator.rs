//! Per-surface frame driver
//!
//! Every display surface has one [`Animator`], created on first use and shared
//! by all consumers on that surface. It ticks its active animations once per
//! display refresh and pauses its frame clock whenever it has nothing to do.
//!
//! The host owns the real display link: it registers a clock callback with
//! [`Animator::set_clock_callback`], starts delivering frames when told the
//! clock is running, and calls [`Animator::tick`] on every refresh.
//!
//! Everything here lives on the UI thread. Adds and removes issued from inside
//! a tick pass (for example from a completion callback) are queued and applied
//! once the pass is over.

use crate::animation::SharedAnimation;
use lightbox_core::{SurfaceId, ViewTree};
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Notified with `true` when the clock resumes and `false` when it pauses
pub type ClockCallback = Rc<dyn Fn(bool)>;

/// Nominal refresh interval used for the first frame after the clock resumes
const NOMINAL_FRAME: Duration = Duration::from_micros(16_667);

thread_local! {
    static ANIMATORS: RefCell<FxHashMap<SurfaceId, Animator>> = RefCell::new(FxHashMap::default());
}

#[derive(Default)]
struct AnimatorState {
    animations: Vec<SharedAnimation>,
    running: bool,
    ticking: bool,
    pending_add: Vec<SharedAnimation>,
    pending_remove: Vec<SharedAnimation>,
    last_frame: Option<Instant>,
    clock_callback: Option<ClockCallback>,
}

impl AnimatorState {
    /// Set the clock state, returning the callback to notify if it changed
    fn set_running(&mut self, running: bool) -> Option<ClockCallback> {
        if self.running == running {
            return None;
        }
        self.running = running;
        if running {
            self.last_frame = None;
        }
        tracing::debug!(
            "Animator: frame clock {}",
            if running { "resumed" } else { "paused" }
        );
        self.clock_callback.clone()
    }
}

/// Frame driver for one display surface
///
/// Cloning yields another handle to the same driver.
#[derive(Clone, Default)]
pub struct Animator {
    state: Rc<RefCell<AnimatorState>>,
}

impl Animator {
    /// A standalone animator not registered for any surface
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared animator for `surface`, created on first use
    pub fn for_surface(surface: SurfaceId) -> Animator {
        ANIMATORS.with(|animators| {
            animators
                .borrow_mut()
                .entry(surface)
                .or_insert_with(|| {
                    tracing::debug!("Animator: created for {:?}", surface);
                    Animator::new()
                })
                .clone()
        })
    }

    /// Tear down the animator for `surface`
    ///
    /// Active animations are dropped and the clock is reported paused.
    /// Returns `false` if no animator existed.
    pub fn release_surface(surface: SurfaceId) -> bool {
        let Some(animator) = ANIMATORS.with(|animators| animators.borrow_mut().remove(&surface))
        else {
            return false;
        };
        let notify = {
            let mut state = animator.state.borrow_mut();
            state.animations.clear();
            state.pending_add.clear();
            state.pending_remove.clear();
            let notify = state.set_running(false);
            state.clock_callback = None;
            notify
        };
        if let Some(callback) = notify {
            callback(false);
        }
        tracing::debug!("Animator: released {:?}", surface);
        true
    }

    /// Hook the host's display link
    pub fn set_clock_callback<F>(&self, callback: F)
    where
        F: Fn(bool) + 'static,
    {
        self.state.borrow_mut().clock_callback = Some(Rc::new(callback));
    }

    pub fn clear_clock_callback(&self) {
        self.state.borrow_mut().clock_callback = None;
    }

    /// Whether the frame clock is running
    pub fn is_running(&self) -> bool {
        self.state.borrow().running
    }

    /// Number of active animations
    pub fn len(&self) -> usize {
        self.state.borrow().animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().animations.is_empty()
    }

    pub fn contains(&self, animation: &SharedAnimation) -> bool {
        self.state
            .borrow()
            .animations
            .iter()
            .any(|active| Rc::ptr_eq(active, animation))
    }

    /// Check if two handles refer to the same driver
    pub fn ptr_eq(&self, other: &Animator) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    /// Start ticking `animation`; a no-op if it is already active
    pub fn add(&self, animation: SharedAnimation) {
        let notify = {
            let mut state = self.state.borrow_mut();
            if state.ticking {
                state
                    .pending_remove
                    .retain(|queued| !Rc::ptr_eq(queued, &animation));
                if !contains(&state.pending_add, &animation) {
                    state.pending_add.push(animation);
                }
                return;
            }
            if contains(&state.animations, &animation) {
                return;
            }
            state.animations.push(animation);
            state.set_running(true)
        };
        if let Some(callback) = notify {
            callback(true);
        }
    }

    /// Stop ticking `animation`; a no-op if it is not active
    pub fn remove(&self, animation: &SharedAnimation) {
        let notify = {
            let mut state = self.state.borrow_mut();
            if state.ticking {
                state.pending_add.retain(|queued| !Rc::ptr_eq(queued, animation));
                if !contains(&state.pending_remove, animation) {
                    state.pending_remove.push(animation.clone());
                }
                return;
            }
            let before = state.animations.len();
            state.animations.retain(|active| !Rc::ptr_eq(active, animation));
            if state.animations.len() == before || !state.animations.is_empty() {
                return;
            }
            state.set_running(false)
        };
        if let Some(callback) = notify {
            callback(false);
        }
    }

    /// Display refresh entry point
    ///
    /// Ticks every active animation once with `frame_duration`, then drops
    /// the ones that finished. Does nothing while the clock is paused.
    pub fn tick(&self, frame_duration: Duration, views: &mut ViewTree) {
        let active = {
            let mut state = self.state.borrow_mut();
            if !state.running || state.ticking {
                return;
            }
            state.ticking = true;
            state.last_frame = Some(Instant::now());
            state.animations.clone()
        };

        let dt = frame_duration.as_secs_f32();
        let finished: Vec<SharedAnimation> = active
            .iter()
            .filter(|animation| animation.borrow_mut().animation_tick(dt, views))
            .cloned()
            .collect();

        let notify = {
            let mut state = self.state.borrow_mut();
            state.ticking = false;

            let pending_remove = std::mem::take(&mut state.pending_remove);
            state.animations.retain(|animation| {
                !contains(&finished, animation) && !contains(&pending_remove, animation)
            });
            for animation in std::mem::take(&mut state.pending_add) {
                if !contains(&state.animations, &animation) {
                    state.animations.push(animation);
                }
            }

            if !finished.is_empty() {
                tracing::trace!(
                    "Animator: {} finished, {} active",
                    finished.len(),
                    state.animations.len()
                );
            }
            let running = !state.animations.is_empty();
            state.set_running(running).map(|callback| (callback, running))
        };
        if let Some((callback, running)) = notify {
            callback(running);
        }
    }

    /// Tick using the wall-clock time since the previous frame
    pub fn tick_now(&self, views: &mut ViewTree) {
        let frame_duration = self
            .state
            .borrow()
            .last_frame
            .map_or(NOMINAL_FRAME, |last| last.elapsed());
        self.tick(frame_duration, views);
    }
}

fn contains(list: &[SharedAnimation], animation: &SharedAnimation) -> bool {
    list.iter().any(|entry| Rc::ptr_eq(entry, animation))
}
