//! Keyframe values and the interpolation contract for animated values.

use crate::easing::Easing;
use palette::{Mix, Srgb};

/// A value that can be tweened between keyframes.
///
/// Compound values (such as colors) interpolate each component with the same
/// eased progress.
pub trait Tween: Copy {
    /// Interpolates from `self` toward `to` by `t` (0.0 = `self`, 1.0 = `to`).
    fn tween(self, to: Self, t: f32) -> Self;

    /// Applies a relative step to `self`.
    fn offset(self, delta: Self) -> Self;
}

impl Tween for f32 {
    #[inline]
    fn tween(self, to: Self, t: f32) -> Self {
        self + (to - self) * t
    }

    #[inline]
    fn offset(self, delta: Self) -> Self {
        self + delta
    }
}

impl Tween for Srgb {
    #[inline]
    fn tween(self, to: Self, t: f32) -> Self {
        self.mix(to, t)
    }

    #[inline]
    fn offset(self, delta: Self) -> Self {
        self + delta
    }
}

/// One keyframe of a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyFrame<V> {
    /// The device's value when the segment starts. After the first keyframe,
    /// holds the previous keyframe's value.
    Current,

    /// Relative change from the previous keyframe (or the device's value when first).
    Step(V),

    /// Explicit value. `easing` overrides the segment easing for the interval
    /// that ends at this keyframe.
    Absolute { value: V, easing: Option<Easing> },

    /// Reuses the resolved value of the earlier keyframe at `index`.
    Copy { index: usize, easing: Option<Easing> },
}

impl<V> KeyFrame<V> {
    /// Explicit value using the segment easing.
    #[inline]
    pub const fn to(value: V) -> Self {
        KeyFrame::Absolute { value, easing: None }
    }

    /// Explicit value approached with its own easing.
    #[inline]
    pub const fn eased(value: V, easing: Easing) -> Self {
        KeyFrame::Absolute {
            value,
            easing: Some(easing),
        }
    }

    /// Easing override carried by this keyframe, if any.
    pub fn easing(&self) -> Option<Easing> {
        match self {
            KeyFrame::Absolute { easing, .. } | KeyFrame::Copy { easing, .. } => *easing,
            KeyFrame::Current | KeyFrame::Step(_) => None,
        }
    }
}

/// A keyframe after resolution against the device: always a concrete value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame<V> {
    pub value: V,
    pub easing: Option<Easing>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_tween_extrapolates_for_overshoot() {
        assert_eq!(0.0f32.tween(10.0, 0.5), 5.0);
        assert_eq!(0.0f32.tween(10.0, 1.1), 11.0);
    }

    #[test]
    fn color_tween_blends_each_channel() {
        let from = Srgb::new(0.0, 1.0, 0.2);
        let to = Srgb::new(1.0, 0.0, 0.2);
        let mid = from.tween(to, 0.5);
        assert!((mid.red - 0.5).abs() < 1e-6);
        assert!((mid.green - 0.5).abs() < 1e-6);
        assert!((mid.blue - 0.2).abs() < 1e-6);
    }

    #[test]
    fn easing_override_only_on_explicit_frames() {
        assert_eq!(KeyFrame::eased(1.0f32, Easing::OutBounce).easing(), Some(Easing::OutBounce));
        assert_eq!(KeyFrame::<f32>::Step(1.0).easing(), None);
        assert_eq!(KeyFrame::<f32>::Current.easing(), None);
    }
}
