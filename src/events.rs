//! Event types for rangekit
//!
//! Two families live here:
//! - input events delivered by the host's pointer system ([`PointerEvent`], [`FocusEvent`])
//! - semantic events published by controls on their channels ([`ControlEventData`],
//!   [`ValueEventData`])

use crate::math::Vec3;
use uuid::Uuid;

/// Stable identity of a range control instance.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ControlId(Uuid);

impl ControlId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for ControlId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ControlId({})", self.0)
    }
}

/// Identity of an external input source (hand ray, controller, mouse).
///
/// Controls only compare pointer ids; they never own or dereference the pointer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PointerId(pub u64);

impl std::fmt::Display for PointerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PointerId({})", self.0)
    }
}

/// Pointer down/up/drag/click notification.
///
/// Passed by mutable reference so that the handler that acts on it can mark it consumed;
/// handlers must ignore events that arrive already consumed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub pointer: PointerId,
    /// World-space position of the pointer when the event fired
    pub position: Vec3,
    pub consumed: bool,
}

impl PointerEvent {
    pub fn new(pointer: PointerId, position: Vec3) -> Self {
        Self {
            pointer,
            position,
            consumed: false,
        }
    }

    pub fn at_origin(pointer: PointerId) -> Self {
        Self::new(pointer, Vec3::ZERO)
    }

    pub fn consume(&mut self) {
        self.consumed = true;
    }
}

/// Focus enter/exit notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusEvent {
    pub pointer: PointerId,
}

impl FocusEvent {
    pub fn new(pointer: PointerId) -> Self {
        Self { pointer }
    }
}

/// Payload of hover and interaction events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlEventData {
    pub control: ControlId,
}

/// Payload of value-updated events, sampled when the change was committed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueEventData {
    pub control: ControlId,
    pub old_value: f32,
    pub new_value: f32,
}

impl ValueEventData {
    pub fn new(control: ControlId, old_value: f32, new_value: f32) -> Self {
        Self {
            control,
            old_value,
            new_value,
        }
    }

    /// Signed change carried by this event.
    pub fn delta(&self) -> f32 {
        self.new_value - self.old_value
    }

    pub fn control_event(&self) -> ControlEventData {
        ControlEventData {
            control: self.control,
        }
    }
}

/// Edge of an interaction, handed to the control's boundary hook.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionBoundary {
    /// A pointer engaged the control
    Started { pointer: PointerId, position: Vec3 },
    /// The engaged pointer released, or the control was deactivated mid-interaction
    Ended { pointer: PointerId },
}

impl InteractionBoundary {
    pub fn pointer(&self) -> PointerId {
        match self {
            Self::Started { pointer, .. } | Self::Ended { pointer } => *pointer,
        }
    }

    pub fn is_start(&self) -> bool {
        matches!(self, Self::Started { .. })
    }
}
