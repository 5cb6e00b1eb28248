//! Shared test infrastructure for keyframe-animator integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use core::convert::Infallible;
use keyframe_animator::{
    Animatable, Animation, Controls, PwmOutput, RgbLed, ServoOutput, Srgb, TimeDuration,
    TimeInstant, TimeSource,
};

// ============================================================================
// Mock Time Types
// ============================================================================

/// Mock duration type for testing (wraps milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestDuration(pub u64);

impl TimeDuration for TestDuration {
    const ZERO: Self = TestDuration(0);

    fn as_millis(&self) -> u64 {
        self.0
    }

    fn from_millis(millis: u64) -> Self {
        TestDuration(millis)
    }

    fn saturating_sub(self, other: Self) -> Self {
        TestDuration(self.0.saturating_sub(other.0))
    }
}

/// Mock instant type for testing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestInstant(pub u64);

impl TimeInstant for TestInstant {
    type Duration = TestDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        TestDuration(self.0.saturating_sub(earlier.0))
    }
}

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock time source with controllable time advancement
pub struct MockTimeSource {
    current_time: core::cell::Cell<TestInstant>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self {
            current_time: core::cell::Cell::new(TestInstant(0)),
        }
    }

    /// Advance time by the given number of milliseconds
    pub fn advance(&self, millis: u64) {
        let current = self.current_time.get();
        self.current_time.set(TestInstant(current.0 + millis));
    }

    pub fn set_time(&self, millis: u64) {
        self.current_time.set(TestInstant(millis));
    }
}

impl TimeSource<TestInstant> for MockTimeSource {
    fn now(&self) -> TestInstant {
        self.current_time.get()
    }
}

// ============================================================================
// Mock Devices
// ============================================================================

/// Scalar device that records every rendered value
pub struct MockDevice {
    value: f32,
    history: Vec<f32>,
}

impl MockDevice {
    pub fn new(value: f32) -> Self {
        Self {
            value,
            history: Vec::new(),
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn history(&self) -> &[f32] {
        &self.history
    }
}

impl Animatable for MockDevice {
    type Value = f32;
    type Error = Infallible;

    fn current(&self) -> f32 {
        self.value
    }

    fn render(&mut self, value: f32) -> Result<(), Infallible> {
        self.value = value;
        self.history.push(value);
        Ok(())
    }
}

/// Device whose hardware always fails
pub struct FailingDevice;

impl Animatable for FailingDevice {
    type Value = f32;
    type Error = &'static str;

    fn current(&self) -> f32 {
        0.0
    }

    fn render(&mut self, _value: f32) -> Result<(), &'static str> {
        Err("bus fault")
    }
}

/// PWM channel that records duty cycles
#[derive(Default)]
pub struct MockPwm {
    pub duties: Vec<f32>,
}

impl PwmOutput for MockPwm {
    fn set_duty(&mut self, duty: f32) {
        self.duties.push(duty);
    }
}

/// RGB LED that records color changes
#[derive(Default)]
pub struct MockLed {
    pub colors: Vec<Srgb>,
}

impl RgbLed for MockLed {
    fn set_color(&mut self, color: Srgb) {
        self.colors.push(color);
    }
}

/// Servo controller that records angles
#[derive(Default)]
pub struct MockServo {
    pub angles: Vec<f32>,
}

impl ServoOutput for MockServo {
    fn set_degrees(&mut self, degrees: f32) {
        self.angles.push(degrees);
    }
}

// ============================================================================
// Type Aliases
// ============================================================================

/// Animation over the mock clock with room for 8 keyframes and 4 queued segments
pub type TestAnimation<'t, A> = Animation<'t, TestInstant, A, MockTimeSource, 8, 4>;

/// Callback handle matching scalar `TestAnimation` segments
pub type TestControls = Controls<f32, TestDuration, 8>;

// ============================================================================
// Test Helper Functions
// ============================================================================

/// Compare two floats with tolerance
pub fn approx(a: f32, b: f32) -> bool {
    const EPSILON: f32 = 0.001;
    (a - b).abs() < EPSILON
}

/// Compare two colors with floating-point tolerance
pub fn colors_equal(a: Srgb, b: Srgb) -> bool {
    approx(a.red, b.red) && approx(a.green, b.green) && approx(a.blue, b.blue)
}
