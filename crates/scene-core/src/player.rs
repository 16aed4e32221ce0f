//! Player state shared between the director and the movement simulation.

use crate::math::Vec2;

/// Movement capabilities the director grants or revokes.
///
/// The movement simulation reads these flags every tick: a `false` axis flag
/// means that axis produces no displacement this tick, and `run_enabled`
/// selects the higher speed cap. Only the currently active director step (or
/// a vaultable reacting to its grace window) writes the gate; everything else
/// treats it as read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityGate {
    pub allow_right: bool,
    pub allow_left: bool,
    pub allow_up: bool,
    pub allow_down: bool,
    pub run_enabled: bool,
}

impl Default for CapabilityGate {
    fn default() -> Self {
        Self {
            allow_right: true,
            allow_left: true,
            allow_up: true,
            allow_down: true,
            run_enabled: true,
        }
    }
}

impl CapabilityGate {
    /// Enables all four movement axes. Leaves `run_enabled` untouched.
    pub fn allow_all(&mut self) {
        self.allow_right = true;
        self.allow_left = true;
        self.allow_up = true;
        self.allow_down = true;
    }

    /// Disables all four movement axes. Leaves `run_enabled` untouched.
    pub fn deny_all(&mut self) {
        self.allow_right = false;
        self.allow_left = false;
        self.allow_up = false;
        self.allow_down = false;
    }
}

/// The player entity as the director sees it: a position written by the
/// external movement simulation and the capability gate it reads back.
#[derive(Debug, Clone, Copy, Default)]
pub struct Player {
    pub position: Vec2,
    pub gate: CapabilityGate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_defaults_to_fully_open() {
        let gate = CapabilityGate::default();
        assert!(gate.allow_right && gate.allow_left && gate.allow_up && gate.allow_down);
        assert!(gate.run_enabled);
    }

    #[test]
    fn deny_all_keeps_run_flag() {
        let mut gate = CapabilityGate::default();
        gate.deny_all();
        assert!(!gate.allow_right && !gate.allow_left && !gate.allow_up && !gate.allow_down);
        assert!(gate.run_enabled);

        gate.allow_all();
        assert!(gate.allow_right && gate.allow_left && gate.allow_up && gate.allow_down);
    }
}
