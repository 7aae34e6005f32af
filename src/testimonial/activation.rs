/// Where the testimonial block is in its lifetime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    /// Never shown yet; the word reveal is still pending.
    #[default]
    Fresh,
    Active,
    /// Shown at least once, currently out of view.
    Resting,
}

/// What an activation should start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Activated {
    /// First activation: reveal the words, the wave follows.
    Reveal,
    /// Later activations only restart the wave.
    Wave,
}

#[derive(Clone, Debug, Default)]
pub struct Activation {
    phase: Phase,
}

impl Activation {
    #[cfg(test)]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    #[cfg(test)]
    pub fn has_revealed(&self) -> bool {
        self.phase != Phase::Fresh
    }

    /// `None` when already active.
    pub fn activate(&mut self) -> Option<Activated> {
        let activated = match self.phase {
            Phase::Active => return None,
            Phase::Fresh => Activated::Reveal,
            Phase::Resting => Activated::Wave,
        };
        self.phase = Phase::Active;
        Some(activated)
    }

    /// Returns whether this actually deactivated anything.
    pub fn deactivate(&mut self) -> bool {
        if self.phase != Phase::Active {
            return false;
        }
        self.phase = Phase::Resting;
        true
    }
}

pub fn should_activate(intersection_ratio: f64, threshold: f64) -> bool {
    intersection_ratio >= threshold
}

/// Whether a block already on screen at load time should start right away:
/// its top is above `threshold` of the viewport and its bottom below the top.
pub fn initially_visible(top: f64, bottom: f64, viewport_h: f64, threshold: f64) -> bool {
    top < viewport_h * threshold && bottom > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveal_happens_once() {
        let mut activation = Activation::default();
        assert!(!activation.has_revealed());
        assert_eq!(activation.activate(), Some(Activated::Reveal));
        assert_eq!(activation.activate(), None);

        for _ in 0..3 {
            assert!(activation.deactivate());
            assert!(!activation.deactivate());
            assert_eq!(activation.phase(), Phase::Resting);
            assert_eq!(activation.activate(), Some(Activated::Wave));
        }
        assert!(activation.is_active());
        assert!(activation.has_revealed());
    }

    #[test]
    fn deactivating_a_fresh_block_is_a_no_op() {
        let mut activation = Activation::default();
        assert!(!activation.deactivate());
        assert_eq!(activation.phase(), Phase::Fresh);
    }

    #[test]
    fn visibility_threshold() {
        assert!(should_activate(0.35, 0.35));
        assert!(should_activate(0.6, 0.35));
        assert!(!should_activate(0.15, 0.35));
    }

    #[test]
    fn initial_visibility() {
        assert!(initially_visible(200.0, 900.0, 1000.0, 0.35));
        assert!(!initially_visible(400.0, 900.0, 1000.0, 0.35));
        assert!(!initially_visible(-900.0, -10.0, 1000.0, 0.35));
    }
}
