//! # rangekit
//!
//! Interactive range controls (rotators/dials and sliders) for mixed-reality UIs, with
//! synchronous event channels and audio feedback listeners.
//!
//! A range control owns a single value in `[0, 1]`, tracks which pointer is manipulating it,
//! and turns raw pointer/focus input into semantic events: hover, interaction start/end and
//! value updates. Any number of independent listeners subscribe to those events without the
//! control knowing about them.
//!
//! ## Quick Start
//!
//! ```no_run
//! use rangekit::*;
//! use rangekit::audio::{AudioClip, AudioOutput};
//! use rangekit::config::{RotatorConfig, RotatorSoundsConfig, SoundsConfig};
//! use rangekit::feedback::RotatorSounds;
//! use rangekit::scene::{self, JointLimits, KinematicBody, KinematicHinge};
//! use rangekit::math::Vec3;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! // Scene objects normally come from the host's physics engine
//! let body = Rc::new(RefCell::new(KinematicBody::default()));
//! let hinge = Rc::new(RefCell::new(KinematicHinge::new(
//!     Vec3::Y,
//!     JointLimits::new(-90.0, 90.0),
//!     Some(scene::transform_ref(&body)),
//! )));
//!
//! // Create the control and point it at its hinge
//! let mut rotator = Rotator::new(RotatorConfig::new().min_angle(-90.0).max_angle(90.0))?;
//! rotator.set_joint(Some(scene::joint_ref(&hinge)));
//!
//! // Listen for value changes
//! rotator.value_updated().subscribe(|event| {
//!     println!("value {} -> {}", event.old_value, event.new_value);
//! });
//!
//! // Add audio feedback
//! let output = AudioOutput::new();
//! let mut sounds = RotatorSounds::new(
//!     RotatorSoundsConfig::new(SoundsConfig::new().pass_notch_clip(AudioClip::new("notch"))),
//!     &output,
//! )?;
//! sounds.attach(&rotator);
//!
//! // Activate, then feed input and ticks every frame
//! rotator.activate()?;
//! let mut down = PointerEvent::at_origin(PointerId(1));
//! rotator.pointer_down(&mut down);
//! rotator.tick();
//!
//! // Hand queued sounds to the playback engine
//! for command in output.poll_commands() {
//!     println!("{:?}", command);
//! }
//! # Ok::<(), RangeKitError>(())
//! ```
//!
//! ## Key Components
//!
//! - **[`RangeControl`]**: capability trait every control implements (value, channels, input)
//! - **[`Rotator`]**: maps the value onto a hinge angle and rotates the moving part
//! - **[`Slider`]**: maps the value onto a grip position and pointer drags onto the value
//! - **[`Channel`]**: ordered, synchronous 1:N notification list
//! - **[`RangeSounds`] / [`RotatorSounds`]**: audio feedback listeners
//! - **[`AudioOutput`](audio::AudioOutput)**: sound commands for the host's playback engine
//!
//! ## Model
//!
//! Everything runs on the thread that drives the controls. Input handlers, `tick` and
//! `set_value` publish synchronously before returning; subscribers of one channel run in
//! subscription order. The only thread boundary is the audio command queue.

pub mod audio;
pub mod channel;
pub mod config;
pub mod control;
pub mod error;
pub mod events;
pub mod feedback;
pub mod math;
pub mod rotator;
pub mod scene;
pub mod slider;

pub use channel::{Channel, SubscriptionId};
pub use config::{RangeConfig, RotatorConfig, SliderConfig};
pub use control::{InteractionState, Lifecycle, RangeChannels, RangeControl, RangeCore};
pub use error::RangeKitError;
pub use events::{
    ControlEventData, ControlId, FocusEvent, InteractionBoundary, PointerEvent, PointerId,
    ValueEventData,
};
pub use feedback::{RangeSounds, RotatorSounds};
pub use rotator::Rotator;
pub use slider::Slider;
