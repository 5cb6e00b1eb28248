//! Animatable adapters for common outputs.
//!
//! Each adapter wraps a hardware sink trait that the host implements for its
//! PWM peripheral, LED driver or servo controller, remembers the last value it
//! wrote, and keeps animated values inside the range the hardware accepts.

use crate::animation::Animatable;
use core::convert::Infallible;
use palette::{Clamp, FromColor, Hsv, Srgb};

pub const BLACK: Srgb = Srgb::new(0.0, 0.0, 0.0);
pub const WHITE: Srgb = Srgb::new(1.0, 1.0, 1.0);
pub const RED: Srgb = Srgb::new(1.0, 0.0, 0.0);
pub const GREEN: Srgb = Srgb::new(0.0, 1.0, 0.0);
pub const BLUE: Srgb = Srgb::new(0.0, 0.0, 1.0);
pub const YELLOW: Srgb = Srgb::new(1.0, 1.0, 0.0);

/// Creates an RGB color from HSV (Hue, Saturation, Value) components.
///
/// Hue is in degrees; saturation and value are in `0.0..=1.0`.
#[inline]
pub fn hsv(hue: f32, saturation: f32, value: f32) -> Srgb {
    Srgb::from_color(Hsv::new(hue, saturation, value))
}

/// Trait for abstracting a single PWM channel.
pub trait PwmOutput {
    /// Sets the duty cycle, from 0.0 (off) to 1.0 (fully on).
    fn set_duty(&mut self, duty: f32);
}

/// Trait for abstracting RGB LED hardware.
///
/// Color components are in the range 0.0-1.0. Implementations should convert
/// these to their hardware's native format (e.g. PWM duty cycles, 8-bit values).
pub trait RgbLed {
    /// Sets the LED to the specified RGB color.
    fn set_color(&mut self, color: Srgb);
}

/// Trait for abstracting hobby servo hardware.
pub trait ServoOutput {
    /// Moves the horn to `degrees`.
    fn set_degrees(&mut self, degrees: f32);
}

/// A dimmable LED. Animates brightness in `0.0..=1.0`.
pub struct Led<P: PwmOutput> {
    output: P,
    brightness: f32,
}

impl<P: PwmOutput> Led<P> {
    /// Creates an LED and switches it off.
    pub fn new(mut output: P) -> Self {
        output.set_duty(0.0);
        Self {
            output,
            brightness: 0.0,
        }
    }

    pub fn brightness(&self) -> f32 {
        self.brightness
    }

    pub fn output(&self) -> &P {
        &self.output
    }
}

impl<P: PwmOutput> Animatable for Led<P> {
    type Value = f32;
    type Error = Infallible;

    fn current(&self) -> f32 {
        self.brightness
    }

    fn normalize(&self, value: f32) -> f32 {
        value.clamp(0.0, 1.0)
    }

    fn render(&mut self, value: f32) -> Result<(), Infallible> {
        // Overshooting easings can leave the valid range between keyframes.
        let value = value.clamp(0.0, 1.0);
        self.output.set_duty(value);
        self.brightness = value;
        Ok(())
    }
}

/// An RGB LED. Animates color, blending each channel independently.
pub struct Rgb<L: RgbLed> {
    led: L,
    color: Srgb,
}

impl<L: RgbLed> Rgb<L> {
    /// Creates an RGB LED and switches it off.
    pub fn new(mut led: L) -> Self {
        led.set_color(BLACK);
        Self { led, color: BLACK }
    }

    pub fn color(&self) -> Srgb {
        self.color
    }

    pub fn led(&self) -> &L {
        &self.led
    }
}

impl<L: RgbLed> Animatable for Rgb<L> {
    type Value = Srgb;
    type Error = Infallible;

    fn current(&self) -> Srgb {
        self.color
    }

    fn normalize(&self, value: Srgb) -> Srgb {
        value.clamp()
    }

    fn render(&mut self, value: Srgb) -> Result<(), Infallible> {
        let value = value.clamp();
        self.led.set_color(value);
        self.color = value;
        Ok(())
    }
}

/// A positional servo. Animates the horn angle in degrees within its range.
pub struct Servo<S: ServoOutput> {
    output: S,
    degrees: f32,
    min: f32,
    max: f32,
}

impl<S: ServoOutput> Servo<S> {
    /// Creates a servo with the full 0-180° range, parked at `start` degrees.
    pub fn new(output: S, start: f32) -> Self {
        Self::with_range(output, start, 0.0, 180.0)
    }

    /// Creates a servo limited to `min..=max` degrees, parked at `start`.
    pub fn with_range(mut output: S, start: f32, min: f32, max: f32) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        let start = start.clamp(min, max);
        output.set_degrees(start);
        Self {
            output,
            degrees: start,
            min,
            max,
        }
    }

    pub fn degrees(&self) -> f32 {
        self.degrees
    }

    pub fn range(&self) -> (f32, f32) {
        (self.min, self.max)
    }

    pub fn output(&self) -> &S {
        &self.output
    }
}

impl<S: ServoOutput> Animatable for Servo<S> {
    type Value = f32;
    type Error = Infallible;

    fn current(&self) -> f32 {
        self.degrees
    }

    fn normalize(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    fn render(&mut self, value: f32) -> Result<(), Infallible> {
        let value = value.clamp(self.min, self.max);
        self.output.set_degrees(value);
        self.degrees = value;
        Ok(())
    }
}
