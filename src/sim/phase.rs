//! Phase state machine
//!
//! All phase changes go through `transition`, which checks the legal table
//! in `Phase::can_enter`. The install panel is a shadow on top of whatever
//! phase is running and restores it on close.

use super::state::Phase;

#[derive(Debug, Clone)]
pub struct PhaseMachine {
    phase: Phase,
    /// Phase hidden behind the install panel
    shadowed: Option<Phase>,
}

impl Default for PhaseMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseMachine {
    pub fn new() -> Self {
        Self {
            phase: Phase::Start,
            shadowed: None,
        }
    }

    /// Visible phase (`CtaPanel` while shadowed)
    pub fn current(&self) -> Phase {
        if self.shadowed.is_some() {
            Phase::CtaPanel
        } else {
            self.phase
        }
    }

    /// Phase running underneath the panel, if any
    pub fn underlying(&self) -> Phase {
        self.shadowed.unwrap_or(self.phase)
    }

    pub fn is_shadowed(&self) -> bool {
        self.shadowed.is_some()
    }

    /// Move to `next` if the table allows it. Illegal requests are ignored.
    pub fn transition(&mut self, next: Phase) -> bool {
        if self.shadowed.is_some() {
            log::warn!("Ignoring {:?} -> {:?} while the panel is open", self.phase, next);
            return false;
        }
        if !self.phase.can_enter(next) {
            log::warn!("Illegal phase transition {:?} -> {:?}", self.phase, next);
            return false;
        }
        log::info!("Phase {:?} -> {:?}", self.phase, next);
        self.phase = next;
        true
    }

    /// Shadow the running phase with the install panel
    pub fn open_panel(&mut self) -> bool {
        if self.shadowed.is_some() {
            return false;
        }
        self.shadowed = Some(self.phase);
        log::info!("Install panel opened over {:?}", self.phase);
        true
    }

    /// Drop the shadow and resume the prior phase
    pub fn close_panel(&mut self) -> bool {
        match self.shadowed.take() {
            Some(prior) => {
                log::info!("Install panel closed, resuming {:?}", prior);
                self.phase = prior;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_lifecycle() {
        let mut m = PhaseMachine::new();
        assert!(m.transition(Phase::Playing));
        assert!(m.transition(Phase::Tutorial));
        assert!(m.transition(Phase::Playing));
        assert!(m.transition(Phase::Fail));
        assert!(m.transition(Phase::Cta));
        assert!(m.transition(Phase::Start));
        assert_eq!(m.current(), Phase::Start);
    }

    #[test]
    fn test_illegal_transition_ignored() {
        let mut m = PhaseMachine::new();
        assert!(!m.transition(Phase::Success));
        assert!(!m.transition(Phase::Tutorial));
        assert_eq!(m.current(), Phase::Start);
    }

    #[test]
    fn test_panel_shadows_and_restores() {
        let mut m = PhaseMachine::new();
        m.transition(Phase::Playing);
        assert!(m.open_panel());
        assert!(!m.open_panel());
        assert_eq!(m.current(), Phase::CtaPanel);
        assert_eq!(m.underlying(), Phase::Playing);

        // Nothing moves underneath the panel
        assert!(!m.transition(Phase::Fail));

        assert!(m.close_panel());
        assert_eq!(m.current(), Phase::Playing);
        assert!(!m.close_panel());
    }
}
