//! Easing curves used by tweens, scroll scrubbing and smooth scrolling.
//!
//! Every curve maps a normalized time `t` in `[0, 1]` to eased progress.
//! Inputs outside that range are clamped first.

use std::f64::consts::PI;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Ease {
    Linear,
    /// Quadratic ease-in.
    Power1In,
    /// Cubic ease-in.
    Power2In,
    /// Cubic ease-out.
    Power2Out,
    Power2InOut,
    /// Quartic ease-out.
    Power3Out,
    SineIn,
    SineOut,
    SineInOut,
    /// Overshoots past 1 before settling; the value is the overshoot amount.
    BackOut(f64),
    /// The smooth-scroll curve: `min(1, 1.001 - 2^(-10t))`.
    ExpoOut,
}

impl Default for Ease {
    fn default() -> Self {
        Ease::Power2Out
    }
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        if t <= 0.0 {
            return 0.0;
        }
        match self {
            Ease::Linear => t,
            Ease::Power1In => t * t,
            Ease::Power2In => t.powi(3),
            Ease::Power2Out => 1.0 - (1.0 - t).powi(3),
            Ease::Power2InOut => {
                if t < 0.5 {
                    4.0 * t.powi(3)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Ease::Power3Out => 1.0 - (1.0 - t).powi(4),
            Ease::SineIn => 1.0 - (t * PI / 2.0).cos(),
            Ease::SineOut => (t * PI / 2.0).sin(),
            Ease::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
            Ease::BackOut(s) => {
                let u = t - 1.0;
                1.0 + (s + 1.0) * u.powi(3) + s * u * u
            }
            Ease::ExpoOut => (1.001 - 2f64.powf(-10.0 * t)).min(1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const ALL: [Ease; 11] = [
        Ease::Linear,
        Ease::Power1In,
        Ease::Power2In,
        Ease::Power2Out,
        Ease::Power2InOut,
        Ease::Power3Out,
        Ease::SineIn,
        Ease::SineOut,
        Ease::SineInOut,
        Ease::BackOut(1.7),
        Ease::ExpoOut,
    ];

    #[test]
    fn endpoints_are_fixed() {
        for ease in ALL {
            assert_abs_diff_eq!(ease.apply(0.0), 0.0, epsilon = 1e-9);
            assert_abs_diff_eq!(ease.apply(1.0), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn input_is_clamped() {
        for ease in ALL {
            assert_abs_diff_eq!(ease.apply(-3.0), 0.0, epsilon = 1e-9);
            assert_abs_diff_eq!(ease.apply(7.0), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn out_curves_lead_linear() {
        assert!(Ease::Power2Out.apply(0.5) > 0.5);
        assert!(Ease::Power3Out.apply(0.5) > Ease::Power2Out.apply(0.5));
        assert!(Ease::SineOut.apply(0.3) > 0.3);
        assert!(Ease::Power2In.apply(0.5) < 0.5);
    }

    #[test]
    fn back_out_overshoots() {
        let peak = (1..100)
            .map(|i| Ease::BackOut(1.7).apply(i as f64 / 100.0))
            .fold(f64::MIN, f64::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn sine_in_out_is_symmetric() {
        assert_abs_diff_eq!(Ease::SineInOut.apply(0.5), 0.5, epsilon = 1e-9);
        assert_abs_diff_eq!(
            Ease::SineInOut.apply(0.2) + Ease::SineInOut.apply(0.8),
            1.0,
            epsilon = 1e-9
        );
    }
}
