#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`Animation`**: Tweens one device through a FIFO queue of segments
//! - **`Segment`**: Keyframes placed on cue points, played over a duration with an easing
//! - **`KeyFrame`**: A value (absolute, relative step, copy, or "current") at a cue point
//! - **`Easing`**: How progress is reshaped between keyframes
//! - **`Animatable`**: Trait to implement for anything with an animated output
//! - **`FrameTimer`**: Paces frames at a segment's fps over the host's clock
//! - **`TimeSource`**: Trait to implement for your timing system
//! - **`AnimationAction`**: Commands that can be sent to control animations
//! - **`Led`**, **`Rgb`**, **`Servo`**: Ready-made adapters over small hardware traits
//!
//! Progress is always computed from elapsed time, never from tick counts, so a
//! late or irregular `service()` call only drops frames.

// Re-export Srgb from palette for user convenience
pub use palette::Srgb;

#[macro_use]
mod fmt;

pub mod time;
pub mod easing;
pub mod keyframe;
pub mod segment;
pub mod timer;
pub mod animation;
pub mod command;
pub mod devices;

pub use animation::{Animatable, Animation, AnimationError, AnimationState, ServiceTiming};
pub use command::{AnimationAction, AnimationCommand, CONTROL_CAPACITY, Controls};
pub use devices::{BLACK, BLUE, GREEN, Led, PwmOutput, RED, Rgb, RgbLed, Servo, ServoOutput, WHITE, YELLOW, hsv};
pub use easing::Easing;
pub use keyframe::{Frame, KeyFrame, Tween};
pub use segment::{Callback, DEFAULT_DURATION_MS, DEFAULT_FPS, Segment, SegmentBuilder, SegmentError};
pub use time::{TimeDuration, TimeInstant, TimeSource};
pub use timer::{FramePoll, FrameTimer};
