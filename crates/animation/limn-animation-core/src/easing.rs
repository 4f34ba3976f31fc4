//! Easing library.
//!
//! The classic tween curves in the `(t, b, c, d)` parameterization: elapsed
//! time, begin value, total change, duration. Every curve is exact at both
//! endpoints; `apply` does not clamp, the scheduler clamps elapsed time
//! before sampling.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Easing {
    #[serde(rename = "linear")]
    Linear,
    #[serde(rename = "easeInQuad")]
    InQuad,
    #[serde(rename = "easeOutQuad")]
    OutQuad,
    #[serde(rename = "easeInOutQuad")]
    InOutQuad,
    #[serde(rename = "easeInCubic")]
    InCubic,
    #[serde(rename = "easeOutCubic")]
    OutCubic,
    #[serde(rename = "easeInOutCubic")]
    InOutCubic,
    #[serde(rename = "easeInQuart")]
    InQuart,
    #[serde(rename = "easeOutQuart")]
    OutQuart,
    #[serde(rename = "easeInOutQuart")]
    InOutQuart,
    #[serde(rename = "easeInQuint")]
    InQuint,
    #[serde(rename = "easeOutQuint")]
    OutQuint,
    #[serde(rename = "easeInOutQuint")]
    InOutQuint,
    #[serde(rename = "easeInSine")]
    InSine,
    #[serde(rename = "easeOutSine")]
    OutSine,
    #[serde(rename = "easeInOutSine")]
    InOutSine,
    #[serde(rename = "easeInExpo")]
    InExpo,
    #[serde(rename = "easeOutExpo")]
    OutExpo,
    #[serde(rename = "easeInOutExpo")]
    InOutExpo,
    #[serde(rename = "easeInCirc")]
    InCirc,
    #[serde(rename = "easeOutCirc")]
    OutCirc,
    #[serde(rename = "easeInOutCirc")]
    InOutCirc,
    #[serde(rename = "easeInElastic")]
    InElastic,
    #[serde(rename = "easeOutElastic")]
    OutElastic,
    #[serde(rename = "easeInOutElastic")]
    InOutElastic,
    #[serde(rename = "easeInBack")]
    InBack,
    #[serde(rename = "easeOutBack")]
    OutBack,
    #[serde(rename = "easeInOutBack")]
    InOutBack,
    #[serde(rename = "easeInBounce")]
    InBounce,
    #[serde(rename = "easeOutBounce")]
    OutBounce,
    #[serde(rename = "easeInOutBounce")]
    InOutBounce,
}

/// Every curve, paired with its wire name.
pub const ALL: &[(Easing, &str)] = &[
    (Easing::Linear, "linear"),
    (Easing::InQuad, "easeInQuad"),
    (Easing::OutQuad, "easeOutQuad"),
    (Easing::InOutQuad, "easeInOutQuad"),
    (Easing::InCubic, "easeInCubic"),
    (Easing::OutCubic, "easeOutCubic"),
    (Easing::InOutCubic, "easeInOutCubic"),
    (Easing::InQuart, "easeInQuart"),
    (Easing::OutQuart, "easeOutQuart"),
    (Easing::InOutQuart, "easeInOutQuart"),
    (Easing::InQuint, "easeInQuint"),
    (Easing::OutQuint, "easeOutQuint"),
    (Easing::InOutQuint, "easeInOutQuint"),
    (Easing::InSine, "easeInSine"),
    (Easing::OutSine, "easeOutSine"),
    (Easing::InOutSine, "easeInOutSine"),
    (Easing::InExpo, "easeInExpo"),
    (Easing::OutExpo, "easeOutExpo"),
    (Easing::InOutExpo, "easeInOutExpo"),
    (Easing::InCirc, "easeInCirc"),
    (Easing::OutCirc, "easeOutCirc"),
    (Easing::InOutCirc, "easeInOutCirc"),
    (Easing::InElastic, "easeInElastic"),
    (Easing::OutElastic, "easeOutElastic"),
    (Easing::InOutElastic, "easeInOutElastic"),
    (Easing::InBack, "easeInBack"),
    (Easing::OutBack, "easeOutBack"),
    (Easing::InOutBack, "easeInOutBack"),
    (Easing::InBounce, "easeInBounce"),
    (Easing::OutBounce, "easeOutBounce"),
    (Easing::InOutBounce, "easeInOutBounce"),
];

impl Easing {
    pub fn from_name(name: &str) -> Option<Easing> {
        ALL.iter().find(|(_, n)| *n == name).map(|(e, _)| *e)
    }

    pub fn name(self) -> &'static str {
        match ALL.iter().find(|(e, _)| *e == self) {
            Some((_, n)) => n,
            None => "linear",
        }
    }

    /// Evaluate the curve at elapsed time `t` of `d`, easing from `b` by a
    /// total change of `c`.
    pub fn apply(self, t: f64, b: f64, c: f64, d: f64) -> f64 {
        match self {
            Easing::Linear => c * t / d + b,
            Easing::InQuad => {
                let t = t / d;
                c * t * t + b
            }
            Easing::OutQuad => {
                let t = t / d;
                -c * t * (t - 2.0) + b
            }
            Easing::InOutQuad => {
                let t = t / (d / 2.0);
                if t < 1.0 {
                    c / 2.0 * t * t + b
                } else {
                    let t = t - 1.0;
                    -c / 2.0 * (t * (t - 2.0) - 1.0) + b
                }
            }
            Easing::InCubic => {
                let t = t / d;
                c * t * t * t + b
            }
            Easing::OutCubic => {
                let t = t / d - 1.0;
                c * (t * t * t + 1.0) + b
            }
            Easing::InOutCubic => {
                let t = t / (d / 2.0);
                if t < 1.0 {
                    c / 2.0 * t * t * t + b
                } else {
                    let t = t - 2.0;
                    c / 2.0 * (t * t * t + 2.0) + b
                }
            }
            Easing::InQuart => {
                let t = t / d;
                c * t * t * t * t + b
            }
            Easing::OutQuart => {
                let t = t / d - 1.0;
                -c * (t * t * t * t - 1.0) + b
            }
            Easing::InOutQuart => {
                let t = t / (d / 2.0);
                if t < 1.0 {
                    c / 2.0 * t * t * t * t + b
                } else {
                    let t = t - 2.0;
                    -c / 2.0 * (t * t * t * t - 2.0) + b
                }
            }
            Easing::InQuint => {
                let t = t / d;
                c * t * t * t * t * t + b
            }
            Easing::OutQuint => {
                let t = t / d - 1.0;
                c * (t * t * t * t * t + 1.0) + b
            }
            Easing::InOutQuint => {
                let t = t / (d / 2.0);
                if t < 1.0 {
                    c / 2.0 * t * t * t * t * t + b
                } else {
                    let t = t - 2.0;
                    c / 2.0 * (t * t * t * t * t + 2.0) + b
                }
            }
            Easing::InSine => -c * (t / d * (PI / 2.0)).cos() + c + b,
            Easing::OutSine => c * (t / d * (PI / 2.0)).sin() + b,
            Easing::InOutSine => -c / 2.0 * ((PI * t / d).cos() - 1.0) + b,
            Easing::InExpo => {
                if t == 0.0 {
                    b
                } else {
                    c * 2f64.powf(10.0 * (t / d - 1.0)) + b
                }
            }
            Easing::OutExpo => {
                if t == d {
                    b + c
                } else {
                    c * (-(2f64.powf(-10.0 * t / d)) + 1.0) + b
                }
            }
            Easing::InOutExpo => {
                if t == 0.0 {
                    return b;
                }
                if t == d {
                    return b + c;
                }
                let t = t / (d / 2.0);
                if t < 1.0 {
                    c / 2.0 * 2f64.powf(10.0 * (t - 1.0)) + b
                } else {
                    let t = t - 1.0;
                    c / 2.0 * (-(2f64.powf(-10.0 * t)) + 2.0) + b
                }
            }
            Easing::InCirc => {
                let t = t / d;
                -c * ((1.0 - t * t).sqrt() - 1.0) + b
            }
            Easing::OutCirc => {
                let t = t / d - 1.0;
                c * (1.0 - t * t).sqrt() + b
            }
            Easing::InOutCirc => {
                let t = t / (d / 2.0);
                if t < 1.0 {
                    -c / 2.0 * ((1.0 - t * t).sqrt() - 1.0) + b
                } else {
                    let t = t - 2.0;
                    c / 2.0 * ((1.0 - t * t).sqrt() + 1.0) + b
                }
            }
            Easing::InElastic => {
                if t == 0.0 {
                    return b;
                }
                let t = t / d;
                if t == 1.0 {
                    return b + c;
                }
                let p = d * 0.3;
                let a = c;
                let s = if a < c.abs() {
                    p / 4.0
                } else {
                    p / (2.0 * PI) * (c / a).asin()
                };
                let t = t - 1.0;
                -(a * 2f64.powf(10.0 * t) * ((t * d - s) * (2.0 * PI) / p).sin()) + b
            }
            Easing::OutElastic => {
                if t == 0.0 {
                    return b;
                }
                let t = t / d;
                if t == 1.0 {
                    return b + c;
                }
                let p = d * 0.3;
                let a = c;
                let s = if a < c.abs() {
                    p / 4.0
                } else {
                    p / (2.0 * PI) * (c / a).asin()
                };
                a * 2f64.powf(-10.0 * t) * ((t * d - s) * (2.0 * PI) / p).sin() + c + b
            }
            Easing::InOutElastic => {
                if t == 0.0 {
                    return b;
                }
                let t = t / (d / 2.0);
                if t == 2.0 {
                    return b + c;
                }
                let p = d * (0.3 * 1.5);
                let a = c;
                let s = if a < c.abs() {
                    p / 4.0
                } else {
                    p / (2.0 * PI) * (c / a).asin()
                };
                if t < 1.0 {
                    let t = t - 1.0;
                    -0.5 * (a * 2f64.powf(10.0 * t) * ((t * d - s) * (2.0 * PI) / p).sin()) + b
                } else {
                    let t = t - 1.0;
                    a * 2f64.powf(-10.0 * t) * ((t * d - s) * (2.0 * PI) / p).sin() * 0.5 + c + b
                }
            }
            Easing::InBack => {
                let s = 1.70158;
                let t = t / d;
                c * t * t * ((s + 1.0) * t - s) + b
            }
            Easing::OutBack => {
                let s = 1.70158;
                let t = t / d - 1.0;
                c * (t * t * ((s + 1.0) * t + s) + 1.0) + b
            }
            Easing::InOutBack => {
                let s = 1.70158 * 1.525;
                let t = t / (d / 2.0);
                if t < 1.0 {
                    c / 2.0 * (t * t * ((s + 1.0) * t - s)) + b
                } else {
                    let t = t - 2.0;
                    c / 2.0 * (t * t * ((s + 1.0) * t + s) + 2.0) + b
                }
            }
            Easing::InBounce => c - out_bounce(d - t, 0.0, c, d) + b,
            Easing::OutBounce => out_bounce(t, b, c, d),
            Easing::InOutBounce => {
                if t < d / 2.0 {
                    (c - out_bounce(d - t * 2.0, 0.0, c, d)) * 0.5 + b
                } else {
                    out_bounce(t * 2.0 - d, 0.0, c, d) * 0.5 + c * 0.5 + b
                }
            }
        }
    }
}

fn out_bounce(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d;
    if t < 1.0 / 2.75 {
        c * (7.5625 * t * t) + b
    } else if t < 2.0 / 2.75 {
        let t = t - 1.5 / 2.75;
        c * (7.5625 * t * t + 0.75) + b
    } else if t < 2.5 / 2.75 {
        let t = t - 2.25 / 2.75;
        c * (7.5625 * t * t + 0.9375) + b
    } else {
        let t = t - 2.625 / 2.75;
        c * (7.5625 * t * t + 0.984375) + b
    }
}

impl Default for Easing {
    fn default() -> Self {
        Easing::Linear
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Easing {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Easing::from_name(s).ok_or_else(|| format!("unknown easing `{s}`"))
    }
}
