use anyhow::Result;
use crossbeam_channel::Receiver;
use rangekit::audio::{AudioClip, AudioCommand, AudioOutput};
use rangekit::config::{RotatorConfig, RotatorSoundsConfig, SliderConfig, SoundsConfig};
use rangekit::feedback::{ManualClock, RangeSounds, RotatorSounds};
use rangekit::math::Vec3;
use rangekit::scene::{self, HingeJoint, JointLimits, KinematicBody, KinematicHinge, Transform};
use rangekit::{FocusEvent, PointerEvent, PointerId, RangeControl, Rotator, Slider};
use std::cell::RefCell;
use std::rc::Rc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Simulated frame length
const FRAME: Duration = Duration::from_millis(16);

/// Stand-in for the host's playback engine: logs every command until all senders are gone.
fn spawn_playback(receiver: Receiver<AudioCommand>) -> JoinHandle<usize> {
    std::thread::spawn(move || {
        let mut played = 0;
        for command in receiver.iter() {
            let AudioCommand::PlayOneShot {
                source,
                clip,
                pitch,
                volume,
            } = command;
            log::info!(
                "  [audio] {} plays '{}' (pitch {:.2}, volume {:.2})",
                source,
                clip.name(),
                pitch,
                volume
            );
            played += 1;
        }
        played
    })
}

fn sounds_config() -> SoundsConfig {
    SoundsConfig::new()
        .pass_notch_clip(AudioClip::new("notch"))
        .grab_clip(AudioClip::new("grab"))
        .release_clip(AudioClip::new("release"))
        .pitch_range(0.8, 1.2)
        .min_time_between_ticks(Duration::from_millis(40))
}

pub fn run_rotator_scene() -> Result<()> {
    log::info!("=== Rotator scene ===");

    let body = Rc::new(RefCell::new(KinematicBody::default()));
    let hinge = Rc::new(RefCell::new(KinematicHinge::new(
        Vec3::Y,
        JointLimits::new(-180.0, 180.0),
        Some(scene::transform_ref(&body)),
    )));

    let mut rotator = Rotator::new(
        RotatorConfig::new()
            .initial_value(0.5)
            .min_angle(-90.0)
            .max_angle(90.0),
    )?;
    rotator.set_joint(Some(scene::joint_ref(&hinge)));
    rotator.value_updated().subscribe(|event| {
        log::info!("  value {:.3} -> {:.3}", event.old_value, event.new_value);
    });

    let output = AudioOutput::new();
    let playback = spawn_playback(output.receiver());
    let clock = Rc::new(ManualClock::new());
    let mut sounds = RotatorSounds::with_clock(
        RotatorSoundsConfig::new(sounds_config()).degrees_per_notch(15.0),
        &output,
        clock.clone(),
    )?;
    sounds.attach(&rotator);

    rotator.activate()?;
    log::info!(
        "Joint limits after activation: {:?}",
        hinge.borrow().limits()
    );

    let hand = PointerId(1);
    rotator.focus_enter(&FocusEvent::new(hand));
    rotator.pointer_down(&mut PointerEvent::at_origin(hand));

    // A second hand trying to grab is left for other handlers
    let mut other = PointerEvent::at_origin(PointerId(2));
    rotator.pointer_down(&mut other);
    log::info!("Second hand consumed: {}", other.consumed);

    // The physics step turns the dial while it is held
    for frame in 0..20 {
        hinge.borrow_mut().drive(frame as f32 * 4.5);
        clock.advance(FRAME);
        rotator.tick();
    }
    log::info!(
        "Angle {:.1} deg, rotation {:?}",
        rotator.angle(),
        body.borrow().pose().rotation
    );

    rotator.pointer_up(&mut PointerEvent::at_origin(hand));
    rotator.focus_exit(&FocusEvent::new(hand));

    // Live edit outside the setter, picked up on the next tick
    rotator.core_mut().set_value_untracked(0.25);
    rotator.tick();

    if let Err(e) = rotator.set_max_angle(181.0) {
        log::warn!("Rejected bound: {}", e);
    }
    rotator.set_max_angle(135.0)?;
    log::info!("Joint limits now {:?}", hinge.borrow().limits());

    rotator.deactivate();
    drop(sounds);
    drop(output);
    let played = playback.join().unwrap_or_default();
    log::info!("Rotator scene finished, {} sounds played", played);
    Ok(())
}

pub fn run_slider_scene() -> Result<()> {
    log::info!("=== Slider scene ===");

    let grip = Rc::new(RefCell::new(KinematicBody::default()));
    let mut slider = Slider::new(
        SliderConfig::new()
            .initial_value(0.0)
            .track(Vec3::new(-0.1, 0.0, 0.0), Vec3::new(0.1, 0.0, 0.0))
            .step_divisions(10),
    )?;
    slider.set_grip(Some(scene::transform_ref(&grip)));

    let output = AudioOutput::new();
    let playback = spawn_playback(output.receiver());
    let clock = Rc::new(ManualClock::new());
    let mut sounds =
        RangeSounds::with_clock(sounds_config().tick_every(0.05), &output, clock.clone())?;
    sounds.attach(&slider);

    slider.activate()?;

    let hand = PointerId(7);
    let start = Vec3::new(-0.1, 0.02, 0.0);
    slider.pointer_down(&mut PointerEvent::new(hand, start));
    for frame in 1..=25 {
        let position = start + Vec3::new(frame as f32 * 0.01, 0.0, 0.0);
        clock.advance(FRAME);
        slider.pointer_dragged(&mut PointerEvent::new(hand, position));
        slider.tick();
    }
    log::info!(
        "Slider value {:.2}, grip at {:?}",
        slider.value(),
        grip.borrow().pose().position
    );

    // Deactivating mid-drag ends the interaction
    slider.deactivate();
    log::info!("Engaged after deactivate: {}", slider.is_engaged());

    drop(sounds);
    drop(output);
    let played = playback.join().unwrap_or_default();
    log::info!("Slider scene finished, {} sounds played", played);
    Ok(())
}
