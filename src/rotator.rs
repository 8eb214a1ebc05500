//! Rotator: a dial whose value maps onto a hinge angle.
//!
//! `angle = min_angle + value * (max_angle - min_angle)`, applied as an absolute rotation about
//! the configured axis to the body connected to the hinge joint. While a pointer holds the
//! rotator the physics engine turns the hinge, and each tick the hinge angle is fed back as the
//! new value.

use crate::config::{MAX_ANGLE_RANGE, MIN_ANGLE_RANGE, RotatorConfig};
use crate::control::{RangeControl, RangeCore};
use crate::error::{RangeKitError, Result};
use crate::events::ValueEventData;
use crate::math::{Quat, Vec3, inverse_lerp, lerp};
use crate::scene::{JointLimits, JointRef, TransformRef, resolve_body};

pub struct Rotator {
    core: RangeCore,
    min_angle: f32,
    max_angle: f32,
    axis: Vec3,
    joint: Option<JointRef>,
    /// Moving part, resolved from `joint`
    body: Option<TransformRef>,
}

impl Rotator {
    /// Creates an inactive rotator. Attach the hinge with [`set_joint`](Self::set_joint) before
    /// activating it.
    ///
    /// # Errors
    ///
    /// Returns an error if an angle bound is outside its allowed range or the axis is zero.
    pub fn new(config: RotatorConfig) -> Result<Self> {
        RangeKitError::check_range(
            "min_angle",
            config.min_angle,
            MIN_ANGLE_RANGE.0,
            MIN_ANGLE_RANGE.1,
        )?;
        RangeKitError::check_range(
            "max_angle",
            config.max_angle,
            MAX_ANGLE_RANGE.0,
            MAX_ANGLE_RANGE.1,
        )?;
        let axis = config.axis.try_normalize().ok_or_else(|| {
            RangeKitError::Configuration(format!("Invalid rotation axis {:?}", config.axis))
        })?;

        Ok(Self {
            core: RangeCore::new(&config.range),
            min_angle: config.min_angle,
            max_angle: config.max_angle,
            axis,
            joint: None,
            body: None,
        })
    }

    pub fn min_angle(&self) -> f32 {
        self.min_angle
    }

    pub fn max_angle(&self) -> f32 {
        self.max_angle
    }

    pub fn axis(&self) -> Vec3 {
        self.axis
    }

    /// Angle for the current value, in degrees.
    pub fn angle(&self) -> f32 {
        self.angle_for(self.value())
    }

    pub fn angle_for(&self, value: f32) -> f32 {
        lerp(self.min_angle, self.max_angle, value)
    }

    /// Value whose angle is `degrees`, clamped to `[0, 1]`.
    pub fn value_for_angle(&self, degrees: f32) -> f32 {
        inverse_lerp(self.min_angle, self.max_angle, degrees)
    }

    /// # Errors
    ///
    /// Returns [`RangeKitError::OutOfRange`] outside `[-180, 0]`; the bound is left unchanged.
    pub fn set_min_angle(&mut self, degrees: f32) -> Result<()> {
        RangeKitError::check_range("min_angle", degrees, MIN_ANGLE_RANGE.0, MIN_ANGLE_RANGE.1)?;
        self.min_angle = degrees;
        self.update_joint_limits();
        self.apply_rotation();
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`RangeKitError::OutOfRange`] outside `[0, 180]`; the bound is left unchanged.
    pub fn set_max_angle(&mut self, degrees: f32) -> Result<()> {
        RangeKitError::check_range("max_angle", degrees, MAX_ANGLE_RANGE.0, MAX_ANGLE_RANGE.1)?;
        self.max_angle = degrees;
        self.update_joint_limits();
        self.apply_rotation();
        Ok(())
    }

    pub fn joint(&self) -> Option<&JointRef> {
        self.joint.as_ref()
    }

    /// Replaces the hinge reference and re-resolves the moving part from it.
    pub fn set_joint(&mut self, joint: Option<JointRef>) {
        self.body = joint.as_ref().and_then(resolve_body);
        self.joint = joint;
        if self.body.is_some() {
            self.update_joint_limits();
            self.apply_rotation();
        }
    }

    /// Whether both the joint and its moving part are currently alive.
    pub fn has_references(&self) -> bool {
        let joint_alive = self.joint.as_ref().is_some_and(|j| j.strong_count() > 0);
        let body_alive = self.body.as_ref().is_some_and(|b| b.strong_count() > 0);
        joint_alive && body_alive
    }

    fn update_joint_limits(&self) {
        let Some(joint) = self.joint.as_ref().and_then(|j| j.upgrade()) else {
            return;
        };
        let Ok(mut joint) = joint.try_borrow_mut() else {
            log::warn!("{}: joint busy, limits not updated", self.id());
            return;
        };
        joint.set_limits(JointLimits::new(self.min_angle, self.max_angle));
        log::debug!(
            "{}: joint limits set to [{}, {}]",
            self.id(),
            self.min_angle,
            self.max_angle
        );
    }

    /// Poses the moving part for the current value and records the angle on the joint, so
    /// engaged ticks resume from the value rather than a stale joint angle.
    fn apply_rotation(&self) {
        let angle = self.angle();
        if let Some(body) = self.body.as_ref().and_then(|b| b.upgrade()) {
            match body.try_borrow_mut() {
                Ok(mut body) => {
                    let rotation = Quat::from_axis_angle(self.axis, angle.to_radians());
                    let pose = body.pose();
                    body.set_pose(pose.with_rotation(rotation));
                }
                Err(_) => log::warn!("{}: moving part busy, rotation not applied", self.id()),
            }
        }
        if let Some(joint) = self.joint.as_ref().and_then(|j| j.upgrade()) {
            match joint.try_borrow_mut() {
                Ok(mut joint) => joint.set_angle(angle),
                Err(_) => log::warn!("{}: joint busy, angle not recorded", self.id()),
            }
        }
    }
}

impl RangeControl for Rotator {
    fn core(&self) -> &RangeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut RangeCore {
        &mut self.core
    }

    fn validate(&mut self) -> Result<()> {
        let Some(joint) = self.joint.as_ref().filter(|j| j.strong_count() > 0) else {
            return Err(RangeKitError::MissingReference(
                "rotator has no hinge joint".into(),
            ));
        };
        let Some(body) = resolve_body(joint) else {
            return Err(RangeKitError::MissingReference(
                "rotator hinge has no moving part".into(),
            ));
        };
        self.body = Some(body);
        self.update_joint_limits();
        Ok(())
    }

    fn on_value_changed(&mut self, _event: &ValueEventData) {
        self.apply_rotation();
    }

    fn on_tick(&mut self) {
        if !self.is_engaged() {
            return;
        }
        let Some(joint) = self.joint.as_ref().and_then(|j| j.upgrade()) else {
            return;
        };
        let angle = joint.borrow().angle();
        let value = self.value_for_angle(angle);
        self.set_value(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::tests::{init_logging, observe};
    use crate::events::{PointerEvent, PointerId};
    use crate::scene::{
        HingeJoint, KinematicBody, KinematicHinge, Transform, joint_ref, transform_ref,
    };
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Rig {
        body: Rc<RefCell<KinematicBody>>,
        hinge: Rc<RefCell<KinematicHinge>>,
    }

    fn rig() -> Rig {
        let body = Rc::new(RefCell::new(KinematicBody::default()));
        let hinge = Rc::new(RefCell::new(KinematicHinge::new(
            Vec3::Y,
            JointLimits::new(-180.0, 180.0),
            Some(transform_ref(&body)),
        )));
        Rig { body, hinge }
    }

    fn active_rotator(initial_value: f32, rig: &Rig) -> Rotator {
        init_logging();
        let mut rotator = Rotator::new(
            RotatorConfig::new()
                .initial_value(initial_value)
                .min_angle(-90.0)
                .max_angle(90.0),
        )
        .unwrap();
        rotator.set_joint(Some(joint_ref(&rig.hinge)));
        rotator.activate().unwrap();
        rotator
    }

    fn body_rotation(rig: &Rig) -> Quat {
        rig.body.borrow().pose().rotation
    }

    #[test]
    fn test_angle_interpolation() {
        let rotator = Rotator::new(RotatorConfig::new().min_angle(-90.0).max_angle(90.0)).unwrap();
        assert_eq!(rotator.angle_for(0.0), -90.0);
        assert_eq!(rotator.angle_for(0.5), 0.0);
        assert_eq!(rotator.angle_for(1.0), 90.0);
        assert_eq!(rotator.angle_for(0.25), -45.0);
        assert_eq!(rotator.angle_for(0.75), 45.0);
        assert_eq!(rotator.value_for_angle(45.0), 0.75);
    }

    #[test]
    fn test_value_drives_body_rotation() {
        let rig = rig();
        let mut rotator = active_rotator(0.5, &rig);
        assert!(body_rotation(&rig).abs_diff_eq(Quat::IDENTITY, 1e-6));

        for (value, degrees) in [(0.0f32, -90.0f32), (1.0, 90.0), (0.5, 0.0)] {
            rotator.set_value(value);
            assert_eq!(rotator.angle(), degrees);
            let expected = Quat::from_axis_angle(Vec3::Y, degrees.to_radians());
            assert!(body_rotation(&rig).abs_diff_eq(expected, 1e-6));
        }
    }

    #[test]
    fn test_rotation_is_absolute() {
        let rig = rig();
        let mut rotator = active_rotator(0.5, &rig);
        rotator.set_value(1.0);
        rotator.set_value(0.75);
        let expected = Quat::from_axis_angle(Vec3::Y, 45f32.to_radians());
        assert!(body_rotation(&rig).abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn test_max_angle_out_of_range_keeps_previous() {
        let rig = rig();
        let mut rotator = active_rotator(0.5, &rig);
        let err = rotator.set_max_angle(181.0).unwrap_err();
        assert!(matches!(
            err,
            RangeKitError::OutOfRange {
                parameter: "max_angle",
                ..
            }
        ));
        assert_eq!(rotator.max_angle(), 90.0);
        assert_eq!(rig.hinge.borrow().limits(), JointLimits::new(-90.0, 90.0));

        assert!(rotator.set_max_angle(-1.0).is_err());
        assert!(rotator.set_max_angle(f32::NAN).is_err());
        assert_eq!(rotator.max_angle(), 90.0);
    }

    #[test]
    fn test_min_angle_out_of_range_keeps_previous() {
        let rig = rig();
        let mut rotator = active_rotator(0.5, &rig);
        assert!(rotator.set_min_angle(0.5).is_err());
        assert!(rotator.set_min_angle(-180.5).is_err());
        assert_eq!(rotator.min_angle(), -90.0);
    }

    #[test]
    fn test_bound_change_updates_joint_limits() {
        let rig = rig();
        let mut rotator = active_rotator(1.0, &rig);
        assert_eq!(rig.hinge.borrow().limits(), JointLimits::new(-90.0, 90.0));

        rotator.set_max_angle(180.0).unwrap();
        assert_eq!(rig.hinge.borrow().limits(), JointLimits::new(-90.0, 180.0));
        rotator.set_min_angle(-180.0).unwrap();
        assert_eq!(rig.hinge.borrow().limits(), JointLimits::new(-180.0, 180.0));

        assert_eq!(rotator.angle(), 180.0);
        let expected = Quat::from_axis_angle(Vec3::Y, std::f32::consts::PI);
        assert!(body_rotation(&rig).abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        assert!(Rotator::new(RotatorConfig::new().max_angle(181.0)).is_err());
        assert!(Rotator::new(RotatorConfig::new().min_angle(10.0)).is_err());
        assert!(matches!(
            Rotator::new(RotatorConfig::new().axis(Vec3::ZERO)),
            Err(RangeKitError::Configuration(_))
        ));
    }

    #[test]
    fn test_missing_joint_disables() {
        let mut rotator = Rotator::new(RotatorConfig::new()).unwrap();
        let log = observe(&rotator);
        let err = rotator.activate().unwrap_err();
        assert!(matches!(err, RangeKitError::MissingReference(_)));
        assert!(!rotator.is_enabled());
        assert!(log.borrow().values.is_empty());

        let mut down = PointerEvent::at_origin(PointerId(1));
        rotator.pointer_down(&mut down);
        assert!(!down.consumed);
    }

    #[test]
    fn test_missing_moving_part_disables() {
        let hinge = Rc::new(RefCell::new(KinematicHinge::new(
            Vec3::Y,
            JointLimits::new(-90.0, 90.0),
            None,
        )));
        let mut rotator = Rotator::new(RotatorConfig::new()).unwrap();
        rotator.set_joint(Some(joint_ref(&hinge)));
        assert!(!rotator.has_references());
        assert!(rotator.activate().is_err());
        assert!(!rotator.is_enabled());
    }

    #[test]
    fn test_dropped_joint_disables() {
        let rig = rig();
        let mut rotator = Rotator::new(RotatorConfig::new()).unwrap();
        rotator.set_joint(Some(joint_ref(&rig.hinge)));
        assert!(rotator.has_references());
        drop(rig);
        assert!(rotator.activate().is_err());
    }

    #[test]
    fn test_set_joint_re_resolves_body() {
        let first = rig();
        let second = rig();
        let mut rotator = active_rotator(1.0, &first);

        rotator.set_joint(Some(joint_ref(&second.hinge)));
        rotator.set_value(0.0);

        let expected = Quat::from_axis_angle(Vec3::Y, (-90f32).to_radians());
        assert!(body_rotation(&second).abs_diff_eq(expected, 1e-6));
        let untouched = Quat::from_axis_angle(Vec3::Y, 90f32.to_radians());
        assert!(body_rotation(&first).abs_diff_eq(untouched, 1e-6));
    }

    #[test]
    fn test_engaged_tick_follows_hinge() {
        let rig = rig();
        let mut rotator = active_rotator(0.5, &rig);
        let log = observe(&rotator);

        rig.hinge.borrow_mut().drive(45.0);
        rotator.tick();
        assert_eq!(rotator.value(), 0.5);

        rotator.pointer_down(&mut PointerEvent::at_origin(PointerId(1)));
        rotator.tick();
        assert_eq!(rotator.value(), 0.75);
        rotator.tick();

        rig.hinge.borrow_mut().drive(-90.0);
        rotator.tick();
        assert_eq!(rotator.value(), 0.0);
        assert_eq!(log.borrow().values, vec![(0.5, 0.75), (0.75, 0.0)]);
    }

    #[test]
    fn test_grab_without_motion_keeps_value() {
        let rig = rig();
        let mut rotator = active_rotator(1.0, &rig);
        assert_eq!(rig.hinge.borrow().angle(), 90.0);
        let log = observe(&rotator);

        rotator.pointer_down(&mut PointerEvent::at_origin(PointerId(1)));
        rotator.tick();
        rotator.tick();
        assert_eq!(rotator.value(), 1.0);
        assert!(log.borrow().values.is_empty());
    }

    #[test]
    fn test_set_value_updates_joint_angle() {
        let rig = rig();
        let mut rotator = active_rotator(0.5, &rig);
        rotator.set_value(0.25);
        assert_eq!(rig.hinge.borrow().angle(), -45.0);

        rotator.core_mut().set_value_untracked(0.75);
        rotator.tick();
        assert_eq!(rig.hinge.borrow().angle(), 45.0);

        rotator.pointer_down(&mut PointerEvent::at_origin(PointerId(1)));
        rotator.tick();
        assert_eq!(rotator.value(), 0.75);
    }
}
