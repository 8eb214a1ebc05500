//! Scene collaborators: the transforms and joints concrete controls drive.
//!
//! Controls never own scene objects. They hold [`Weak`] handles, upgrade them at the moment of
//! use, and treat a dead handle as "reference missing". This module provides the interface
//! the host's scene/physics layer implements, plus kinematic stand-ins.
//!
//! # Overview
//!
//! 1. **Transform** - anything with a pose a control can move (a rigid body, a slider grip)
//! 2. **HingeJoint** - a one-axis joint with mechanical stops and a connected body
//! 3. **KinematicBody / KinematicHinge** - simple in-memory implementations
//!
//! # Example
//!
//! ```rust
//! use rangekit::scene::{self, HingeJoint, KinematicBody, KinematicHinge, JointLimits};
//! use rangekit::math::Vec3;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let body = Rc::new(RefCell::new(KinematicBody::default()));
//! let hinge = Rc::new(RefCell::new(KinematicHinge::new(
//!     Vec3::Y,
//!     JointLimits::new(-90.0, 90.0),
//!     Some(scene::transform_ref(&body)),
//! )));
//!
//! let joint = scene::joint_ref(&hinge);
//! assert!(scene::resolve_body(&joint).is_some());
//! ```

pub mod kinematic;

pub use kinematic::{KinematicBody, KinematicHinge};

use crate::math::Pose;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// An object whose pose a control may read and replace.
pub trait Transform {
    fn pose(&self) -> Pose;
    fn set_pose(&mut self, pose: Pose);
}

/// Lower and upper mechanical stops of a hinge, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointLimits {
    pub min: f32,
    pub max: f32,
}

impl JointLimits {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, degrees: f32) -> f32 {
        degrees.clamp(self.min, self.max)
    }
}

/// A one-axis joint, as provided by the host's physics engine.
pub trait HingeJoint {
    /// The moving part attached to this joint, if any
    fn connected_body(&self) -> Option<TransformRef>;

    fn limits(&self) -> JointLimits;

    fn set_limits(&mut self, limits: JointLimits);

    /// Current angle about the hinge axis, in degrees
    fn angle(&self) -> f32;

    /// Records the angle a control has posed the connected body at, so the joint resumes from
    /// there. Implementations clamp to their limits.
    fn set_angle(&mut self, degrees: f32);
}

/// Non-owning handle to a [`Transform`].
pub type TransformRef = Weak<RefCell<dyn Transform>>;

/// Non-owning handle to a [`HingeJoint`].
pub type JointRef = Weak<RefCell<dyn HingeJoint>>;

pub fn transform_ref<T: Transform + 'static>(transform: &Rc<RefCell<T>>) -> TransformRef {
    let transform: Rc<RefCell<dyn Transform>> = transform.clone();
    Rc::downgrade(&transform)
}

pub fn joint_ref<J: HingeJoint + 'static>(joint: &Rc<RefCell<J>>) -> JointRef {
    let joint: Rc<RefCell<dyn HingeJoint>> = joint.clone();
    Rc::downgrade(&joint)
}

/// Resolves the moving part behind a joint handle. `None` if either side is gone.
pub fn resolve_body(joint: &JointRef) -> Option<TransformRef> {
    let joint = joint.upgrade()?;
    let body = joint.borrow().connected_body()?;
    body.upgrade().is_some().then_some(body)
}
