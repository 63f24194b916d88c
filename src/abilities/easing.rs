//! Abilities domain: displacement curves for the dash.

use std::f32::consts::PI;

use crate::content::{ActionSettings, EaseType};

/// Maps normalised dash time to normalised distance covered.
#[derive(Debug, Clone, PartialEq)]
pub enum DashCurve {
    Ease(EaseType),
    /// Evenly spaced samples over [0, 1], linearly interpolated.
    Sampled(Vec<f32>),
}

impl Default for DashCurve {
    fn default() -> Self {
        DashCurve::Ease(EaseType::Linear)
    }
}

impl DashCurve {
    pub fn from_settings(settings: &ActionSettings) -> Self {
        match &settings.dash_curve {
            Some(samples) if samples.len() >= 2 => DashCurve::Sampled(samples.clone()),
            _ => DashCurve::Ease(settings.dash_easing),
        }
    }

    /// Progress at `t`, with `t` clamped to [0, 1] and the result kept in [0, 1].
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        let value = match self {
            DashCurve::Ease(ease) => ease_value(*ease, t),
            DashCurve::Sampled(samples) => sample(samples, t),
        };
        value.clamp(0.0, 1.0)
    }
}

pub fn ease_value(ease: EaseType, t: f32) -> f32 {
    match ease {
        EaseType::Linear => t,
        EaseType::EaseInQuad => t * t,
        EaseType::EaseOutQuad => t * (2.0 - t),
        EaseType::EaseInOutQuad => {
            if t < 0.5 {
                2.0 * t * t
            } else {
                -1.0 + (4.0 - 2.0 * t) * t
            }
        }
        EaseType::EaseOutCubic => {
            let u = t - 1.0;
            u * u * u + 1.0
        }
        EaseType::EaseInOutSine => 0.5 * (1.0 - (PI * t).cos()),
    }
}

fn sample(samples: &[f32], t: f32) -> f32 {
    match samples {
        [] => t,
        [only] => *only,
        _ => {
            let scaled = t * (samples.len() - 1) as f32;
            let index = (scaled.floor() as usize).min(samples.len() - 2);
            let frac = scaled - index as f32;
            samples[index] + (samples[index + 1] - samples[index]) * frac
        }
    }
}
