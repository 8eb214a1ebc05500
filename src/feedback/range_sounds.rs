//! Grab, release and notch sounds driven by a range control's channels.
//!
//! Notches accumulate absolute value movement; once it passes `tick_every` a notch plays at a
//! pitch interpolated over the new value, at most once per `min_time_between_ticks`.

use super::clock::{Clock, SystemClock};
use crate::audio::{AudioClip, AudioOutput, AudioSource, SourceId};
use crate::channel::{Channel, SubscriptionId};
use crate::config::SoundsConfig;
use crate::control::RangeControl;
use crate::error::{RangeKitError, Result};
use crate::events::{ControlEventData, ControlId, ValueEventData};
use crate::math::lerp;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Mutable state shared by the channel callbacks.
struct SoundState {
    config: SoundsConfig,
    source: AudioSource,
    clock: Rc<dyn Clock>,
    /// Absolute value movement since the last notch
    accumulated: f32,
    last_notch: Option<Duration>,
}

impl SoundState {
    fn on_value_updated(&mut self, event: &ValueEventData) {
        if !self.config.play_tick_sounds {
            return;
        }
        self.accumulated += event.delta().abs();
        if self.accumulated <= self.config.tick_every {
            return;
        }

        let now = self.clock.now();
        if let Some(last) = self.last_notch {
            if now.saturating_sub(last) < self.config.min_time_between_ticks {
                return;
            }
        }

        let pitch = lerp(
            self.config.start_pitch,
            self.config.end_pitch,
            event.new_value,
        );
        if let Some(clip) = &self.config.pass_notch_clip {
            self.play(clip, pitch);
        }
        self.accumulated = 0.0;
        self.last_notch = Some(now);
    }

    fn play(&self, clip: &AudioClip, pitch: f32) {
        if let Err(e) = self.source.play_one_shot(clip, pitch) {
            log::warn!("{}: dropped '{}': {}", self.source.id(), clip.name(), e);
        }
    }
}

/// Subscriptions held on one control.
struct Attachment {
    control: ControlId,
    interaction_started: (Channel<ControlEventData>, SubscriptionId),
    interaction_ended: (Channel<ControlEventData>, SubscriptionId),
    value_updated: (Channel<ValueEventData>, SubscriptionId),
}

impl Attachment {
    fn release(self) {
        self.interaction_started.0.unsubscribe(self.interaction_started.1);
        self.interaction_ended.0.unsubscribe(self.interaction_ended.1);
        self.value_updated.0.unsubscribe(self.value_updated.1);
    }
}

/// Plays grab, release and notch sounds for a range control.
///
/// The listener owns its audio source, created once from the [`AudioOutput`] at construction.
///
/// # Example
///
/// ```rust
/// use rangekit::audio::{AudioClip, AudioOutput};
/// use rangekit::config::{SliderConfig, SoundsConfig};
/// use rangekit::feedback::RangeSounds;
/// use rangekit::{RangeControl, Slider};
///
/// let output = AudioOutput::new();
/// let slider = Slider::new(SliderConfig::default())?;
///
/// let mut sounds = RangeSounds::new(
///     SoundsConfig::new().grab_clip(AudioClip::new("grab")),
///     &output,
/// )?;
/// sounds.attach(&slider);
/// assert_eq!(sounds.attached_to(), Some(slider.id()));
/// # Ok::<(), rangekit::RangeKitError>(())
/// ```
pub struct RangeSounds {
    state: Rc<RefCell<SoundState>>,
    attachment: Option<Attachment>,
}

impl RangeSounds {
    /// # Errors
    ///
    /// Returns [`RangeKitError::OutOfRange`] if `tick_every` is NaN or negative.
    pub fn new(config: SoundsConfig, output: &AudioOutput) -> Result<Self> {
        Self::with_clock(config, output, Rc::new(SystemClock::new()))
    }

    pub fn with_clock(
        config: SoundsConfig,
        output: &AudioOutput,
        clock: Rc<dyn Clock>,
    ) -> Result<Self> {
        check_tick_every(config.tick_every)?;
        Ok(Self {
            state: Rc::new(RefCell::new(SoundState {
                config,
                source: output.create_source(),
                clock,
                accumulated: 0.0,
                last_notch: None,
            })),
            attachment: None,
        })
    }

    /// Subscribes to `control`, first releasing any control observed before.
    pub fn attach(&mut self, control: &dyn RangeControl) {
        if self.attached_to() == Some(control.id()) {
            return;
        }
        self.detach();

        let state = Rc::clone(&self.state);
        let started = control.interaction_started().subscribe(move |_| {
            let state = state.borrow();
            if let Some(clip) = &state.config.grab_clip {
                state.play(clip, 1.0);
            }
        });

        let state = Rc::clone(&self.state);
        let ended = control.interaction_ended().subscribe(move |_| {
            let state = state.borrow();
            if let Some(clip) = &state.config.release_clip {
                state.play(clip, 1.0);
            }
        });

        let state = Rc::clone(&self.state);
        let value = control
            .value_updated()
            .subscribe(move |event| state.borrow_mut().on_value_updated(event));

        log::debug!(
            "{}: observing {}",
            self.state.borrow().source.id(),
            control.id()
        );
        self.attachment = Some(Attachment {
            control: control.id(),
            interaction_started: (control.interaction_started().clone(), started),
            interaction_ended: (control.interaction_ended().clone(), ended),
            value_updated: (control.value_updated().clone(), value),
        });
    }

    /// Releases the observed control, if any.
    pub fn detach(&mut self) {
        if let Some(attachment) = self.attachment.take() {
            log::debug!(
                "{}: released {}",
                self.state.borrow().source.id(),
                attachment.control
            );
            attachment.release();
        }
    }

    pub fn attached_to(&self) -> Option<ControlId> {
        self.attachment.as_ref().map(|a| a.control)
    }

    pub fn source_id(&self) -> SourceId {
        self.state.borrow().source.id()
    }

    /// Movement accumulated towards the next notch.
    pub fn accumulated(&self) -> f32 {
        self.state.borrow().accumulated
    }

    pub fn tick_every(&self) -> f32 {
        self.state.borrow().config.tick_every
    }

    /// Infinity disables notches.
    ///
    /// # Errors
    ///
    /// Returns [`RangeKitError::OutOfRange`] if `amount` is NaN or negative; the previous spacing
    /// is kept.
    pub fn set_tick_every(&mut self, amount: f32) -> Result<()> {
        check_tick_every(amount)?;
        self.state.borrow_mut().config.tick_every = amount;
        Ok(())
    }

    pub fn config(&self) -> SoundsConfig {
        self.state.borrow().config.clone()
    }
}

fn check_tick_every(amount: f32) -> Result<()> {
    RangeKitError::check_range("tick_every", amount, 0.0, f32::INFINITY)
}

impl Drop for RangeSounds {
    fn drop(&mut self) {
        self.detach();
    }
}
