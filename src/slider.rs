//! Slider: a grip that travels along a straight track.
//!
//! The value places the grip at `start + (end - start) * value`. While engaged, pointer drags
//! are projected onto the track: the displacement since the interaction started, divided by
//! the track length, is added to the value the slider had at that moment.

use crate::config::SliderConfig;
use crate::control::{RangeControl, RangeCore};
use crate::error::{RangeKitError, Result};
use crate::events::{InteractionBoundary, PointerEvent, ValueEventData};
use crate::math::Vec3;
use crate::scene::TransformRef;

#[derive(Debug, Clone, Copy)]
struct DragAnchor {
    pointer_position: Vec3,
    value: f32,
}

pub struct Slider {
    core: RangeCore,
    start: Vec3,
    end: Vec3,
    step_divisions: Option<u32>,
    grip: Option<TransformRef>,
    drag_anchor: Option<DragAnchor>,
}

impl Slider {
    /// # Errors
    ///
    /// Returns an error for a zero-length track or zero step divisions.
    pub fn new(config: SliderConfig) -> Result<Self> {
        check_track(config.start, config.end)?;
        if config.step_divisions == Some(0) {
            return Err(RangeKitError::Configuration(
                "step_divisions must be at least 1".into(),
            ));
        }
        Ok(Self {
            core: RangeCore::new(&config.range),
            start: config.start,
            end: config.end,
            step_divisions: config.step_divisions,
            grip: None,
            drag_anchor: None,
        })
    }

    pub fn start(&self) -> Vec3 {
        self.start
    }

    pub fn end(&self) -> Vec3 {
        self.end
    }

    pub fn track_length(&self) -> f32 {
        self.start.distance(self.end)
    }

    /// Unit vector from `start` to `end`.
    pub fn track_axis(&self) -> Vec3 {
        (self.end - self.start).normalize()
    }

    /// # Errors
    ///
    /// Returns an error if `start` and `end` coincide; the track is left unchanged.
    pub fn set_track(&mut self, start: Vec3, end: Vec3) -> Result<()> {
        check_track(start, end)?;
        self.start = start;
        self.end = end;
        self.apply_grip_position();
        Ok(())
    }

    pub fn grip_position_for(&self, value: f32) -> Vec3 {
        self.start.lerp(self.end, value)
    }

    pub fn set_grip(&mut self, grip: Option<TransformRef>) {
        self.grip = grip;
        self.apply_grip_position();
    }

    pub fn step_divisions(&self) -> Option<u32> {
        self.step_divisions
    }

    fn snap(&self, value: f32) -> f32 {
        match self.step_divisions {
            Some(divisions) => {
                let divisions = divisions as f32;
                (value * divisions).round() / divisions
            }
            None => value,
        }
    }

    fn apply_grip_position(&self) {
        let Some(grip) = self.grip.as_ref().and_then(|g| g.upgrade()) else {
            return;
        };
        let Ok(mut grip) = grip.try_borrow_mut() else {
            log::warn!("{}: grip busy, position not applied", self.id());
            return;
        };
        let pose = grip.pose();
        grip.set_pose(pose.with_position(self.grip_position_for(self.value())));
    }
}

fn check_track(start: Vec3, end: Vec3) -> Result<()> {
    if start.distance_squared(end) <= f32::EPSILON || !start.is_finite() || !end.is_finite() {
        return Err(RangeKitError::Configuration(format!(
            "Degenerate slider track {:?} -> {:?}",
            start, end
        )));
    }
    Ok(())
}

impl RangeControl for Slider {
    fn core(&self) -> &RangeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut RangeCore {
        &mut self.core
    }

    fn validate(&mut self) -> Result<()> {
        if !self.grip.as_ref().is_some_and(|g| g.strong_count() > 0) {
            return Err(RangeKitError::MissingReference("slider has no grip".into()));
        }
        Ok(())
    }

    fn on_value_changed(&mut self, _event: &ValueEventData) {
        self.apply_grip_position();
    }

    fn on_interaction_boundary(&mut self, boundary: InteractionBoundary) {
        self.drag_anchor = match boundary {
            InteractionBoundary::Started { position, .. } => Some(DragAnchor {
                pointer_position: position,
                value: self.value(),
            }),
            InteractionBoundary::Ended { .. } => None,
        };
    }

    fn on_pointer_dragged(&mut self, event: &mut PointerEvent) {
        if event.consumed || self.active_pointer() != Some(event.pointer) {
            return;
        }
        let Some(anchor) = self.drag_anchor else {
            return;
        };
        let travel = (event.position - anchor.pointer_position).dot(self.track_axis());
        let value = self.snap((anchor.value + travel / self.track_length()).clamp(0.0, 1.0));
        self.set_value(value);
        event.consume();
    }
}
