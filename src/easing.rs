//! Easing curves that reshape linear progress.
//!
//! Every curve maps `t` in `[0, 1]` to eased progress with `f(0) == 0` and
//! `f(1) == 1`. The `Back` curves overshoot between the endpoints and the
//! `Bounce` curves dip, which is intended. Inputs outside `[0, 1]` are not
//! clamped.

use core::f32::consts::PI;

const BACK_OVERSHOOT: f32 = 1.70158;
const BACK_OVERSHOOT_IN_OUT: f32 = BACK_OVERSHOOT * 1.525;

const BOUNCE_SCALE: f32 = 7.5625;
const BOUNCE_SPAN: f32 = 2.75;

/// Named easing curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Easing {
    /// Constant rate.
    #[default]
    Linear,
    InQuad,
    OutQuad,
    InOutQuad,
    InCube,
    OutCube,
    InOutCube,
    InQuart,
    OutQuart,
    InOutQuart,
    InQuint,
    OutQuint,
    InOutQuint,
    InSine,
    OutSine,
    InOutSine,
    InExpo,
    OutExpo,
    InOutExpo,
    InCirc,
    OutCirc,
    InOutCirc,
    /// Pulls back below 0 before accelerating.
    InBack,
    /// Overshoots past 1 before settling.
    OutBack,
    InOutBack,
    InBounce,
    OutBounce,
    InOutBounce,
}

impl Easing {
    /// Every curve, in declaration order.
    pub const ALL: [Easing; 28] = [
        Easing::Linear,
        Easing::InQuad,
        Easing::OutQuad,
        Easing::InOutQuad,
        Easing::InCube,
        Easing::OutCube,
        Easing::InOutCube,
        Easing::InQuart,
        Easing::OutQuart,
        Easing::InOutQuart,
        Easing::InQuint,
        Easing::OutQuint,
        Easing::InOutQuint,
        Easing::InSine,
        Easing::OutSine,
        Easing::InOutSine,
        Easing::InExpo,
        Easing::OutExpo,
        Easing::InOutExpo,
        Easing::InCirc,
        Easing::OutCirc,
        Easing::InOutCirc,
        Easing::InBack,
        Easing::OutBack,
        Easing::InOutBack,
        Easing::InBounce,
        Easing::OutBounce,
        Easing::InOutBounce,
    ];

    /// Maps linear progress `n` to eased progress.
    pub fn apply(self, n: f32) -> f32 {
        match self {
            Easing::Linear => n,

            Easing::InQuad => n * n,
            Easing::OutQuad => n * (2.0 - n),
            Easing::InOutQuad => {
                let n = n * 2.0;
                if n < 1.0 {
                    0.5 * n * n
                } else {
                    let n = n - 1.0;
                    -0.5 * (n * (n - 2.0) - 1.0)
                }
            }

            Easing::InCube => n * n * n,
            Easing::OutCube => {
                let n = n - 1.0;
                n * n * n + 1.0
            }
            Easing::InOutCube => {
                let n = n * 2.0;
                if n < 1.0 {
                    0.5 * n * n * n
                } else {
                    let n = n - 2.0;
                    0.5 * (n * n * n + 2.0)
                }
            }

            Easing::InQuart => n * n * n * n,
            Easing::OutQuart => {
                let n = n - 1.0;
                1.0 - n * n * n * n
            }
            Easing::InOutQuart => {
                let n = n * 2.0;
                if n < 1.0 {
                    0.5 * n * n * n * n
                } else {
                    let n = n - 2.0;
                    -0.5 * (n * n * n * n - 2.0)
                }
            }

            Easing::InQuint => n * n * n * n * n,
            Easing::OutQuint => {
                let n = n - 1.0;
                n * n * n * n * n + 1.0
            }
            Easing::InOutQuint => {
                let n = n * 2.0;
                if n < 1.0 {
                    0.5 * n * n * n * n * n
                } else {
                    let n = n - 2.0;
                    0.5 * (n * n * n * n * n + 2.0)
                }
            }

            Easing::InSine => 1.0 - libm::cosf(n * PI / 2.0),
            Easing::OutSine => libm::sinf(n * PI / 2.0),
            Easing::InOutSine => 0.5 * (1.0 - libm::cosf(PI * n)),

            Easing::InExpo => {
                if n == 0.0 {
                    0.0
                } else {
                    libm::powf(1024.0, n - 1.0)
                }
            }
            Easing::OutExpo => {
                if n == 1.0 {
                    1.0
                } else {
                    1.0 - libm::powf(2.0, -10.0 * n)
                }
            }
            Easing::InOutExpo => {
                if n == 0.0 {
                    return 0.0;
                }
                if n == 1.0 {
                    return 1.0;
                }
                let n = n * 2.0;
                if n < 1.0 {
                    0.5 * libm::powf(1024.0, n - 1.0)
                } else {
                    0.5 * (2.0 - libm::powf(2.0, -10.0 * (n - 1.0)))
                }
            }

            Easing::InCirc => 1.0 - libm::sqrtf(1.0 - n * n),
            Easing::OutCirc => {
                let n = n - 1.0;
                libm::sqrtf(1.0 - n * n)
            }
            Easing::InOutCirc => {
                let n = n * 2.0;
                if n < 1.0 {
                    -0.5 * (libm::sqrtf(1.0 - n * n) - 1.0)
                } else {
                    let n = n - 2.0;
                    0.5 * (libm::sqrtf(1.0 - n * n) + 1.0)
                }
            }

            Easing::InBack => {
                let s = BACK_OVERSHOOT;
                n * n * ((s + 1.0) * n - s)
            }
            Easing::OutBack => {
                let s = BACK_OVERSHOOT;
                let n = n - 1.0;
                n * n * ((s + 1.0) * n + s) + 1.0
            }
            Easing::InOutBack => {
                let s = BACK_OVERSHOOT_IN_OUT;
                let n = n * 2.0;
                if n < 1.0 {
                    0.5 * (n * n * ((s + 1.0) * n - s))
                } else {
                    let n = n - 2.0;
                    0.5 * (n * n * ((s + 1.0) * n + s) + 2.0)
                }
            }

            Easing::InBounce => 1.0 - out_bounce(1.0 - n),
            Easing::OutBounce => out_bounce(n),
            Easing::InOutBounce => {
                if n < 0.5 {
                    Easing::InBounce.apply(n * 2.0) * 0.5
                } else {
                    out_bounce(n * 2.0 - 1.0) * 0.5 + 0.5
                }
            }
        }
    }
}

fn out_bounce(n: f32) -> f32 {
    if n < 1.0 / BOUNCE_SPAN {
        BOUNCE_SCALE * n * n
    } else if n < 2.0 / BOUNCE_SPAN {
        let n = n - 1.5 / BOUNCE_SPAN;
        BOUNCE_SCALE * n * n + 0.75
    } else if n < 2.5 / BOUNCE_SPAN {
        let n = n - 2.25 / BOUNCE_SPAN;
        BOUNCE_SCALE * n * n + 0.9375
    } else {
        let n = n - 2.625 / BOUNCE_SPAN;
        BOUNCE_SCALE * n * n + 0.984375
    }
}
