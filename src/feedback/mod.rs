//! Audio feedback for range controls.
//!
//! Feedback listeners subscribe to a control's channels and turn its events into one-shot
//! sounds. The control never knows they exist: attaching, swapping or dropping a listener only
//! touches the control's channel subscriptions.
//!
//! - [`RangeSounds`]: grab/release sounds plus pitched notch ticks for any
//!   [`RangeControl`](crate::RangeControl)
//! - [`RotatorSounds`]: the same, with notch spacing expressed in degrees of rotation
//! - [`Clock`]: time source for the minimum interval between notches

pub mod clock;
pub mod range_sounds;
pub mod rotator_sounds;

pub use clock::{Clock, ManualClock, SystemClock};
pub use range_sounds::RangeSounds;
pub use rotator_sounds::RotatorSounds;
