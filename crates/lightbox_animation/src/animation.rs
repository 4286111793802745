//! Spring animations bound to a view
//!
//! A [`SpringAnimation`] drives one [`AnimatableProperty`] of one view toward
//! a target. It holds only a [`ViewId`], so the view can be destroyed at any
//! time; the next tick then reports the animation finished without touching
//! anything.

use crate::property::AnimatableProperty;
use crate::spring::SpringIntegrator;
use crate::vector::{Interpolatable, Vector};
use lightbox_core::{ViewId, ViewTree};
use std::cell::RefCell;
use std::rc::Rc;

/// Called after every tick with the finished flag
pub type TickCallback = Box<dyn FnMut(bool, &mut ViewTree)>;

/// An animation registered with an [`Animator`](crate::Animator)
///
/// Identity is the `Rc` allocation: the same handle added twice is one entry.
pub type SharedAnimation = Rc<RefCell<dyn Animatable>>;

/// Anything the frame driver can tick
pub trait Animatable {
    /// Advance by `dt` seconds, returning `true` once finished
    fn animation_tick(&mut self, dt: f32, views: &mut ViewTree) -> bool;
}

/// Result of one [`SpringAnimation::tick`]
#[derive(Clone, Debug, PartialEq)]
pub struct SpringStep {
    pub position: Vector,
    pub velocity: Vector,
    pub finished: bool,
}

pub struct SpringAnimation<P: AnimatableProperty> {
    view: ViewId,
    property: P,
    target: Vector,
    current: Vector,
    velocity: Vector,
    integrator: SpringIntegrator,
    on_tick: Option<TickCallback>,
}

impl<P: AnimatableProperty> SpringAnimation<P> {
    /// Animate `property` of `view` from its current value to `target`
    pub fn new(
        views: &ViewTree,
        view: ViewId,
        property: P,
        target: P::Value,
        velocity: P::Value,
    ) -> Self {
        Self::from_vectors(views, view, property, target.to_vector(), velocity.to_vector())
    }

    /// Like [`SpringAnimation::new`] but with raw component vectors
    ///
    /// A `target` whose length differs from the property's value never
    /// satisfies the completion test, so such an animation runs until its
    /// view is destroyed or it is removed from the animator.
    pub fn from_vectors(
        views: &ViewTree,
        view: ViewId,
        property: P,
        target: Vector,
        velocity: Vector,
    ) -> Self {
        let current = match views.get(view) {
            Some(node) => property.read(node),
            None => P::Value::ZERO.to_vector(),
        };
        Self {
            view,
            property,
            target,
            current,
            velocity,
            integrator: SpringIntegrator::default(),
            on_tick: None,
        }
    }

    pub fn with_integrator(mut self, integrator: SpringIntegrator) -> Self {
        self.integrator = integrator;
        self
    }

    /// Register the per-tick callback
    pub fn on_tick<F>(mut self, callback: F) -> Self
    where
        F: FnMut(bool, &mut ViewTree) + 'static,
    {
        self.on_tick = Some(Box::new(callback));
        self
    }

    pub fn view(&self) -> ViewId {
        self.view
    }

    pub fn target(&self) -> &Vector {
        &self.target
    }

    pub fn current(&self) -> &Vector {
        &self.current
    }

    pub fn velocity(&self) -> &Vector {
        &self.velocity
    }

    pub fn spring(&self) -> f32 {
        self.integrator.spring
    }

    pub fn set_spring(&mut self, spring: f32) {
        self.integrator.spring = spring;
    }

    pub fn friction(&self) -> f32 {
        self.integrator.friction
    }

    pub fn set_friction(&mut self, friction: f32) {
        self.integrator.friction = friction;
    }

    /// Advance one integration step of `dt` seconds
    pub fn tick(&mut self, dt: f32, views: &mut ViewTree) -> SpringStep {
        let finished = match views.get_mut(self.view) {
            Some(node) => {
                let current = P::Value::from_vector(&self.current);
                let velocity = P::Value::from_vector(&self.velocity);
                let target = P::Value::from_vector(&self.target);

                let derivative = self.integrator.integrate(current - target, velocity, dt);
                self.current = (current + derivative.dpdt * dt).to_vector();
                self.velocity = (velocity + derivative.dvdt * dt).to_vector();
                self.property.write(node, &self.current);

                let finished = self
                    .current
                    .is_within(&self.target, self.property.threshold());
                if finished {
                    // Land exactly on target rather than asymptotically near it
                    self.property.write(node, &self.target);
                }
                finished
            }
            None => {
                tracing::trace!("SpringAnimation: view {:?} is gone, finishing", self.view);
                return self.step(true);
            }
        };

        if let Some(callback) = self.on_tick.as_mut() {
            callback(finished, views);
        }
        self.step(finished)
    }

    fn step(&self, finished: bool) -> SpringStep {
        SpringStep {
            position: self.current.clone(),
            velocity: self.velocity.clone(),
            finished,
        }
    }
}

impl<P: AnimatableProperty + 'static> SpringAnimation<P> {
    /// Wrap for registration with an [`Animator`](crate::Animator)
    pub fn into_shared(self) -> SharedAnimation {
        let shared: SharedAnimation = Rc::new(RefCell::new(self));
        shared
    }
}

impl<P: AnimatableProperty> Animatable for SpringAnimation<P> {
    fn animation_tick(&mut self, dt: f32, views: &mut ViewTree) -> bool {
        self.tick(dt, views).finished
    }
}
