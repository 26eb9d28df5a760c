use std::time::Duration;

use bitflags::bitflags;

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    Spring { damping: f32, stiffness: f32 },
}

impl Easing {
    pub fn interpolate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => t * (2.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Easing::Spring { damping, stiffness } => {
                // Simplified spring physics
                let omega = (stiffness / damping).sqrt();
                let zeta = damping / (2.0 * (stiffness * damping).sqrt());

                if zeta < 1.0 {
                    // Underdamped
                    let omega_d = omega * (1.0 - zeta * zeta).sqrt();
                    let t = t * 2.0;
                    1.0 - ((-zeta * omega * t).exp() * (omega_d * t).cos())
                } else {
                    t * (2.0 - t)
                }
            }
        }
    }
}

bitflags! {
    /// Style flags handed to the effect runner along with the curve.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct EffectOptions: u32 {
        const CROSS_DISSOLVE = 1 << 0;
        const FLIP_FROM_LEFT = 1 << 1;
        const FLIP_FROM_RIGHT = 1 << 2;
        const CURL_UP = 1 << 3;
        const CURL_DOWN = 1 << 4;
        const ALLOW_USER_INTERACTION = 1 << 5;
    }
}

/// Duration and style of one timed visual effect.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectParams {
    pub duration: Duration,
    pub easing: Easing,
    pub options: EffectOptions,
}

impl Default for EffectParams {
    fn default() -> Self {
        Self::fade()
    }
}

impl EffectParams {
    pub fn new(duration: Duration, easing: Easing, options: EffectOptions) -> Self {
        Self {
            duration,
            easing,
            options,
        }
    }

    /// The 200ms ease-out cross dissolve used for state changes when nothing else is asked for.
    pub fn fade() -> Self {
        Self {
            duration: Duration::from_millis(200),
            easing: Easing::EaseOut,
            options: EffectOptions::CROSS_DISSOLVE,
        }
    }

    pub fn tween(duration: Duration, easing: Easing) -> Self {
        Self {
            duration,
            easing,
            options: EffectOptions::empty(),
        }
    }

    pub fn spring() -> Self {
        Self {
            duration: Duration::from_millis(500),
            easing: Easing::Spring {
                damping: 0.8,
                stiffness: 200.0,
            },
            options: EffectOptions::empty(),
        }
    }

    pub fn fast() -> Self {
        Self {
            duration: Duration::from_millis(150),
            easing: Easing::EaseOut,
            options: EffectOptions::empty(),
        }
    }

    pub fn slow() -> Self {
        Self {
            duration: Duration::from_millis(600),
            easing: Easing::EaseInOut,
            options: EffectOptions::empty(),
        }
    }

    pub fn with_options(mut self, options: EffectOptions) -> Self {
        self.options = options;
        self
    }

    /// Eased progress after `elapsed`, in `0.0..=1.0`.
    pub fn progress(&self, elapsed: Duration) -> f32 {
        if self.duration.is_zero() || elapsed >= self.duration {
            return 1.0;
        }
        let t = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        self.easing.interpolate(t)
    }
}
