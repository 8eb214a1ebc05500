//! Range control core: value ownership, the interaction state machine and event fan-out.
//!
//! Concrete controls embed a [`RangeCore`] and implement [`RangeControl`], overriding only the
//! hooks they need. Everything else (input handling, lifecycle, value publishing, per-tick
//! reconciliation) is provided by the trait.
//!
//! # State machine
//!
//! ```text
//!            pointer_down (not consumed, no active pointer)
//!   Idle  ---------------------------------------------->  Engaged(p)
//!         <----------------------------------------------
//!            pointer_up from p (not consumed) | deactivate
//! ```
//!
//! Hover (focus enter/exit) is orthogonal and never touches the active pointer.

use crate::channel::Channel;
use crate::config::RangeConfig;
use crate::error::Result;
use crate::events::{
    ControlEventData, ControlId, FocusEvent, InteractionBoundary, PointerEvent, PointerId,
    ValueEventData,
};

/// Activation state of a control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Constructed or deactivated; input and ticks are ignored
    Inactive,
    /// Activated and processing input
    Active,
    /// Activation failed on a configuration error; the control does no further work
    Disabled,
}

/// The two interaction states, derived from the active pointer slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    Idle,
    Engaged(PointerId),
}

/// The five notification channels every range control exposes.
#[derive(Debug, Clone)]
pub struct RangeChannels {
    pub hover_entered: Channel<ControlEventData>,
    pub hover_exited: Channel<ControlEventData>,
    pub interaction_started: Channel<ControlEventData>,
    pub interaction_ended: Channel<ControlEventData>,
    pub value_updated: Channel<ValueEventData>,
}

impl RangeChannels {
    pub fn new() -> Self {
        Self {
            hover_entered: Channel::new("hover_entered"),
            hover_exited: Channel::new("hover_exited"),
            interaction_started: Channel::new("interaction_started"),
            interaction_ended: Channel::new("interaction_ended"),
            value_updated: Channel::new("value_updated"),
        }
    }
}

impl Default for RangeChannels {
    fn default() -> Self {
        Self::new()
    }
}

/// State shared by every range control.
#[derive(Debug)]
pub struct RangeCore {
    id: ControlId,
    value: f32,
    /// Value most recently announced on `value_updated`; drives tick reconciliation
    last_known_value: f32,
    active_pointer: Option<PointerId>,
    lifecycle: Lifecycle,
    channels: RangeChannels,
}

impl RangeCore {
    pub fn new(config: &RangeConfig) -> Self {
        Self {
            id: ControlId::new(),
            value: config.initial_value,
            last_known_value: config.initial_value,
            active_pointer: None,
            lifecycle: Lifecycle::Inactive,
            channels: RangeChannels::new(),
        }
    }

    pub fn id(&self) -> ControlId {
        self.id
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn active_pointer(&self) -> Option<PointerId> {
        self.active_pointer
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_active(&self) -> bool {
        self.lifecycle == Lifecycle::Active
    }

    pub fn interaction_state(&self) -> InteractionState {
        match self.active_pointer {
            Some(pointer) => InteractionState::Engaged(pointer),
            None => InteractionState::Idle,
        }
    }

    pub fn channels(&self) -> &RangeChannels {
        &self.channels
    }

    /// Writes the value without publishing anything.
    ///
    /// This is the authoring/live-editing path: the next [`RangeControl::tick`] notices the
    /// difference and publishes a single value-updated event for it.
    pub fn set_value_untracked(&mut self, value: f32) {
        if !value.is_finite() {
            log::warn!("{}: rejecting non-finite value {}", self.id, value);
            return;
        }
        self.value = value;
    }

    fn control_event(&self) -> ControlEventData {
        ControlEventData { control: self.id }
    }

    /// Stores `value` and returns the event to publish, or `None` if nothing changed.
    fn commit_value(&mut self, value: f32) -> Option<ValueEventData> {
        if !value.is_finite() {
            log::warn!("{}: rejecting non-finite value {}", self.id, value);
            return None;
        }
        if value == self.value {
            return None;
        }
        let old_value = self.value;
        self.value = value;
        self.last_known_value = value;
        Some(ValueEventData::new(self.id, old_value, value))
    }

    fn reconcile(&mut self) -> Option<ValueEventData> {
        if self.value == self.last_known_value {
            return None;
        }
        let event = ValueEventData::new(self.id, self.last_known_value, self.value);
        self.last_known_value = self.value;
        Some(event)
    }
}

/// Capability interface of a range control.
///
/// Implementors supply [`core`](Self::core)/[`core_mut`](Self::core_mut) and may override the
/// `validate` and `on_*` hooks; the remaining methods are the control surface.
pub trait RangeControl {
    fn core(&self) -> &RangeCore;
    fn core_mut(&mut self) -> &mut RangeCore;

    /// Checks external references during activation. An error disables the control.
    fn validate(&mut self) -> Result<()> {
        Ok(())
    }

    /// Runs after the value changed and before value-updated subscribers are notified.
    fn on_value_changed(&mut self, _event: &ValueEventData) {}

    /// Runs when an interaction starts or ends, before the channel publish.
    fn on_interaction_boundary(&mut self, _boundary: InteractionBoundary) {}

    fn on_pointer_dragged(&mut self, _event: &mut PointerEvent) {}

    fn on_pointer_clicked(&mut self, _event: &mut PointerEvent) {}

    /// Runs at the end of every tick while active.
    fn on_tick(&mut self) {}

    fn id(&self) -> ControlId {
        self.core().id()
    }

    fn value(&self) -> f32 {
        self.core().value()
    }

    /// Sets the value, publishing a value-updated event if it differs from the current one.
    fn set_value(&mut self, value: f32) {
        if self.core().lifecycle() == Lifecycle::Disabled {
            log::trace!("{}: disabled, ignoring set_value({})", self.id(), value);
            return;
        }
        if let Some(event) = self.core_mut().commit_value(value) {
            log::debug!(
                "{}: value {} -> {}",
                event.control,
                event.old_value,
                event.new_value
            );
            self.on_value_changed(&event);
            self.core().channels().value_updated.publish(&event);
        }
    }

    fn active_pointer(&self) -> Option<PointerId> {
        self.core().active_pointer()
    }

    fn interaction_state(&self) -> InteractionState {
        self.core().interaction_state()
    }

    fn is_engaged(&self) -> bool {
        self.core().active_pointer().is_some()
    }

    fn lifecycle(&self) -> Lifecycle {
        self.core().lifecycle()
    }

    fn is_enabled(&self) -> bool {
        self.core().lifecycle() != Lifecycle::Disabled
    }

    fn hover_entered(&self) -> &Channel<ControlEventData> {
        &self.core().channels().hover_entered
    }

    fn hover_exited(&self) -> &Channel<ControlEventData> {
        &self.core().channels().hover_exited
    }

    fn interaction_started(&self) -> &Channel<ControlEventData> {
        &self.core().channels().interaction_started
    }

    fn interaction_ended(&self) -> &Channel<ControlEventData> {
        &self.core().channels().interaction_ended
    }

    fn value_updated(&self) -> &Channel<ValueEventData> {
        &self.core().channels().value_updated
    }

    /// Validates references and starts processing input.
    ///
    /// On success the current value is published with `old == new` so that listeners learn the
    /// starting value. On failure the control is disabled and the error is returned.
    fn activate(&mut self) -> Result<()> {
        if self.core().is_active() {
            return Ok(());
        }
        if let Err(err) = self.validate() {
            log::error!("{}: disabled: {}", self.id(), err);
            self.core_mut().lifecycle = Lifecycle::Disabled;
            return Err(err);
        }

        let core = self.core_mut();
        core.lifecycle = Lifecycle::Active;
        core.last_known_value = core.value;
        let event = ValueEventData::new(core.id, core.value, core.value);
        log::debug!("{}: activated at value {}", event.control, event.new_value);

        self.on_value_changed(&event);
        self.core().channels().value_updated.publish(&event);
        Ok(())
    }

    /// Stops processing input, ending any interaction in progress.
    fn deactivate(&mut self) {
        if !self.core().is_active() {
            return;
        }
        if self.is_engaged() {
            end_interaction(self);
        }
        self.core_mut().lifecycle = Lifecycle::Inactive;
        log::debug!("{}: deactivated", self.id());
    }

    /// Per-frame entry point: publishes untracked edits, then runs [`on_tick`](Self::on_tick).
    fn tick(&mut self) {
        if !self.core().is_active() {
            return;
        }
        if let Some(event) = self.core_mut().reconcile() {
            log::debug!(
                "{}: reconciled value {} -> {}",
                event.control,
                event.old_value,
                event.new_value
            );
            self.on_value_changed(&event);
            self.core().channels().value_updated.publish(&event);
        }
        self.on_tick();
    }

    fn pointer_down(&mut self, event: &mut PointerEvent) {
        if !self.core().is_active() || event.consumed {
            return;
        }
        if let Some(active) = self.core().active_pointer() {
            log::trace!(
                "{}: ignoring pointer down from {}, engaged by {}",
                self.id(),
                event.pointer,
                active
            );
            return;
        }

        self.core_mut().active_pointer = Some(event.pointer);
        log::debug!("{}: engaged by {}", self.id(), event.pointer);
        self.on_interaction_boundary(InteractionBoundary::Started {
            pointer: event.pointer,
            position: event.position,
        });
        let data = self.core().control_event();
        self.core().channels().interaction_started.publish(&data);
        event.consume();
    }

    fn pointer_up(&mut self, event: &mut PointerEvent) {
        if !self.core().is_active() || event.consumed {
            return;
        }
        if self.core().active_pointer() != Some(event.pointer) {
            log::trace!(
                "{}: ignoring pointer up from non-active {}",
                self.id(),
                event.pointer
            );
            return;
        }
        end_interaction(self);
        event.consume();
    }

    fn pointer_dragged(&mut self, event: &mut PointerEvent) {
        if self.core().is_active() {
            self.on_pointer_dragged(event);
        }
    }

    fn pointer_clicked(&mut self, event: &mut PointerEvent) {
        if self.core().is_active() {
            self.on_pointer_clicked(event);
        }
    }

    fn focus_enter(&mut self, _event: &FocusEvent) {
        if self.core().is_active() {
            let data = self.core().control_event();
            self.core().channels().hover_entered.publish(&data);
        }
    }

    fn focus_exit(&mut self, _event: &FocusEvent) {
        if self.core().is_active() {
            let data = self.core().control_event();
            self.core().channels().hover_exited.publish(&data);
        }
    }
}

/// Engaged -> Idle. Callers check that an interaction is in progress.
fn end_interaction<C: RangeControl + ?Sized>(control: &mut C) {
    let Some(pointer) = control.core().active_pointer() else {
        return;
    };
    control.on_interaction_boundary(InteractionBoundary::Ended { pointer });
    let data = control.core().control_event();
    control.core().channels().interaction_ended.publish(&data);
    control.core_mut().active_pointer = None;
    log::debug!("{}: released by {}", control.id(), pointer);
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::RangeKitError;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Minimal control that records hook calls.
    pub(crate) struct RecordingControl {
        core: RangeCore,
        pub fail_validation: bool,
        pub hooks: Vec<String>,
    }

    impl RecordingControl {
        pub fn new(initial_value: f32) -> Self {
            Self {
                core: RangeCore::new(&RangeConfig::new().initial_value(initial_value)),
                fail_validation: false,
                hooks: Vec::new(),
            }
        }
    }

    impl RangeControl for RecordingControl {
        fn core(&self) -> &RangeCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut RangeCore {
            &mut self.core
        }

        fn validate(&mut self) -> Result<()> {
            if self.fail_validation {
                return Err(RangeKitError::MissingReference("test part".into()));
            }
            Ok(())
        }

        fn on_value_changed(&mut self, event: &ValueEventData) {
            self.hooks
                .push(format!("value {} -> {}", event.old_value, event.new_value));
        }

        fn on_interaction_boundary(&mut self, boundary: InteractionBoundary) {
            let edge = if boundary.is_start() { "start" } else { "end" };
            self.hooks.push(format!("{edge} {}", boundary.pointer()));
        }

        fn on_pointer_dragged(&mut self, _event: &mut PointerEvent) {
            self.hooks.push("drag".into());
        }
    }

    #[derive(Default)]
    pub(crate) struct EventLog {
        pub values: Vec<(f32, f32)>,
        pub started: usize,
        pub ended: usize,
        pub hover_entered: usize,
        pub hover_exited: usize,
    }

    pub(crate) fn observe(control: &dyn RangeControl) -> Rc<RefCell<EventLog>> {
        let log = Rc::new(RefCell::new(EventLog::default()));
        let l = log.clone();
        control
            .value_updated()
            .subscribe(move |e| l.borrow_mut().values.push((e.old_value, e.new_value)));
        let l = log.clone();
        control
            .interaction_started()
            .subscribe(move |_| l.borrow_mut().started += 1);
        let l = log.clone();
        control
            .interaction_ended()
            .subscribe(move |_| l.borrow_mut().ended += 1);
        let l = log.clone();
        control
            .hover_entered()
            .subscribe(move |_| l.borrow_mut().hover_entered += 1);
        let l = log.clone();
        control
            .hover_exited()
            .subscribe(move |_| l.borrow_mut().hover_exited += 1);
        log
    }

    pub(crate) fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn active_control(initial_value: f32) -> (RecordingControl, Rc<RefCell<EventLog>>) {
        init_logging();
        let mut control = RecordingControl::new(initial_value);
        let log = observe(&control);
        control.activate().unwrap();
        log.borrow_mut().values.clear();
        control.hooks.clear();
        (control, log)
    }

    #[test]
    fn test_set_same_value_is_noop() {
        let (mut control, log) = active_control(0.5);
        control.set_value(0.5);
        assert!(log.borrow().values.is_empty());
    }

    #[test]
    fn test_set_value_publishes_old_and_new() {
        let (mut control, log) = active_control(0.5);
        control.set_value(0.75);
        assert_eq!(log.borrow().values, vec![(0.5, 0.75)]);
        assert_eq!(control.value(), 0.75);
        assert_eq!(control.hooks.last().unwrap(), "value 0.5 -> 0.75");
    }

    #[test]
    fn test_set_value_uses_exact_inequality() {
        let (mut control, log) = active_control(0.5);
        control.set_value(0.5 + f32::EPSILON);
        assert_eq!(log.borrow().values.len(), 1);
    }

    #[test]
    fn test_set_value_rejects_nan() {
        let (mut control, log) = active_control(0.5);
        control.set_value(f32::NAN);
        assert_eq!(control.value(), 0.5);
        assert!(log.borrow().values.is_empty());
    }

    #[test]
    fn test_activation_publishes_initial_value_once() {
        let mut control = RecordingControl::new(0.3);
        let log = observe(&control);
        control.activate().unwrap();
        control.activate().unwrap();

        assert_eq!(log.borrow().values, vec![(0.3, 0.3)]);
        assert_eq!(control.lifecycle(), Lifecycle::Active);
        assert_eq!(control.hooks, vec!["value 0.3 -> 0.3"]);
    }

    #[test]
    fn test_second_pointer_is_ignored_while_engaged() {
        let (mut control, log) = active_control(0.0);
        let p1 = PointerId(1);
        let p2 = PointerId(2);

        let mut down1 = PointerEvent::at_origin(p1);
        control.pointer_down(&mut down1);
        assert!(down1.consumed);
        assert_eq!(control.active_pointer(), Some(p1));

        let mut down2 = PointerEvent::at_origin(p2);
        control.pointer_down(&mut down2);
        assert!(!down2.consumed);
        assert_eq!(control.active_pointer(), Some(p1));

        let mut up2 = PointerEvent::at_origin(p2);
        control.pointer_up(&mut up2);
        assert!(!up2.consumed);
        assert_eq!(control.interaction_state(), InteractionState::Engaged(p1));

        let mut up1 = PointerEvent::at_origin(p1);
        control.pointer_up(&mut up1);
        assert!(up1.consumed);
        assert_eq!(control.active_pointer(), None);

        assert_eq!(log.borrow().started, 1);
        assert_eq!(log.borrow().ended, 1);
        assert_eq!(control.hooks, vec!["start PointerId(1)", "end PointerId(1)"]);
    }

    #[test]
    fn test_consumed_events_are_ignored() {
        let (mut control, log) = active_control(0.0);
        let mut down = PointerEvent::at_origin(PointerId(1));
        down.consume();
        control.pointer_down(&mut down);
        assert!(!control.is_engaged());

        let mut down = PointerEvent::at_origin(PointerId(1));
        control.pointer_down(&mut down);
        let mut up = PointerEvent::at_origin(PointerId(1));
        up.consume();
        control.pointer_up(&mut up);
        assert!(control.is_engaged());
        assert_eq!(log.borrow().ended, 0);
    }

    #[test]
    fn test_deactivate_while_engaged_ends_interaction_once() {
        let (mut control, log) = active_control(0.0);
        control.pointer_down(&mut PointerEvent::at_origin(PointerId(9)));
        control.deactivate();

        assert_eq!(log.borrow().ended, 1);
        assert_eq!(control.active_pointer(), None);
        assert_eq!(control.lifecycle(), Lifecycle::Inactive);

        control.deactivate();
        assert_eq!(log.borrow().ended, 1);
    }

    #[test]
    fn test_deactivate_while_idle_publishes_nothing() {
        let (mut control, log) = active_control(0.0);
        control.deactivate();
        assert_eq!(log.borrow().ended, 0);
        assert_eq!(log.borrow().started, 0);
    }

    #[test]
    fn test_hover_is_orthogonal_to_engagement() {
        let (mut control, log) = active_control(0.0);
        let focus = FocusEvent::new(PointerId(4));
        control.focus_enter(&focus);
        control.pointer_down(&mut PointerEvent::at_origin(PointerId(1)));
        control.focus_exit(&focus);

        assert_eq!(log.borrow().hover_entered, 1);
        assert_eq!(log.borrow().hover_exited, 1);
        assert_eq!(control.active_pointer(), Some(PointerId(1)));
    }

    #[test]
    fn test_tick_reconciles_untracked_edit_once() {
        let (mut control, log) = active_control(0.2);
        control.core_mut().set_value_untracked(0.9);
        assert!(log.borrow().values.is_empty());

        control.tick();
        control.tick();
        assert_eq!(log.borrow().values, vec![(0.2, 0.9)]);
    }

    #[test]
    fn test_untracked_edit_rejects_non_finite() {
        let (mut control, log) = active_control(0.2);
        control.core_mut().set_value_untracked(f32::NAN);
        control.core_mut().set_value_untracked(f32::INFINITY);
        assert_eq!(control.value(), 0.2);

        for _ in 0..4 {
            control.tick();
        }
        assert!(log.borrow().values.is_empty());
        assert!(control.hooks.is_empty());
    }

    #[test]
    fn test_tick_without_edit_publishes_nothing() {
        let (mut control, log) = active_control(0.2);
        control.set_value(0.4);
        control.tick();
        assert_eq!(log.borrow().values, vec![(0.2, 0.4)]);
    }

    #[test]
    fn test_inactive_control_ignores_input() {
        let mut control = RecordingControl::new(0.0);
        let log = observe(&control);
        let mut down = PointerEvent::at_origin(PointerId(1));
        control.pointer_down(&mut down);
        control.focus_enter(&FocusEvent::new(PointerId(1)));
        control.pointer_dragged(&mut down);

        assert!(!down.consumed);
        assert_eq!(log.borrow().started, 0);
        assert_eq!(log.borrow().hover_entered, 0);
        assert!(control.hooks.is_empty());
    }

    #[test]
    fn test_failed_validation_disables_control() {
        let mut control = RecordingControl::new(0.0);
        control.fail_validation = true;
        let log = observe(&control);

        assert!(control.activate().is_err());
        assert_eq!(control.lifecycle(), Lifecycle::Disabled);
        assert!(!control.is_enabled());

        control.set_value(0.7);
        control.pointer_down(&mut PointerEvent::at_origin(PointerId(1)));
        control.tick();
        assert_eq!(control.value(), 0.0);
        assert!(log.borrow().values.is_empty());
        assert_eq!(log.borrow().started, 0);
    }

    #[test]
    fn test_drag_routes_to_hook() {
        let (mut control, _log) = active_control(0.0);
        control.pointer_dragged(&mut PointerEvent::at_origin(PointerId(1)));
        assert_eq!(control.hooks.last().unwrap(), "drag");
    }
}
