//! In-memory scene objects for hosts without a physics engine, demos and tests.

use super::{HingeJoint, JointLimits, Transform, TransformRef};
use crate::math::{Pose, Quat, Vec3};

/// A transform that simply stores its pose.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KinematicBody {
    pose: Pose,
}

impl KinematicBody {
    pub fn new(pose: Pose) -> Self {
        Self { pose }
    }
}

impl Transform for KinematicBody {
    fn pose(&self) -> Pose {
        self.pose
    }

    fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }
}

/// A hinge that is driven explicitly instead of simulated.
///
/// [`drive`](Self::drive) plays the role of the physics step moving a grabbed part: it clamps
/// the requested angle to the stops and rotates the connected body about the hinge axis.
pub struct KinematicHinge {
    axis: Vec3,
    limits: JointLimits,
    angle: f32,
    body: Option<TransformRef>,
}

impl KinematicHinge {
    pub fn new(axis: Vec3, limits: JointLimits, body: Option<TransformRef>) -> Self {
        Self {
            axis: axis.normalize_or_zero(),
            limits,
            angle: limits.clamp(0.0),
            body,
        }
    }

    pub fn axis(&self) -> Vec3 {
        self.axis
    }

    pub fn set_body(&mut self, body: Option<TransformRef>) {
        self.body = body;
    }

    /// Moves the hinge to `degrees`, clamped to the current stops.
    pub fn drive(&mut self, degrees: f32) {
        self.angle = self.limits.clamp(degrees);
        let Some(body) = self.body.as_ref().and_then(|b| b.upgrade()) else {
            return;
        };
        let mut body = body.borrow_mut();
        let pose = body.pose();
        body.set_pose(pose.with_rotation(Quat::from_axis_angle(
            self.axis,
            self.angle.to_radians(),
        )));
    }
}

impl HingeJoint for KinematicHinge {
    fn connected_body(&self) -> Option<TransformRef> {
        self.body.clone()
    }

    fn limits(&self) -> JointLimits {
        self.limits
    }

    fn set_limits(&mut self, limits: JointLimits) {
        self.limits = limits;
        self.angle = limits.clamp(self.angle);
    }

    fn angle(&self) -> f32 {
        self.angle
    }

    fn set_angle(&mut self, degrees: f32) {
        self.angle = self.limits.clamp(degrees);
    }
}
