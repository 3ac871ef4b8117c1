//! The canonical particle-state taxonomy.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a particle's role in the event record.
///
/// Every generator's native status/alive flags are mapped onto this closed
/// set by its input handler. `Undefined` is the catch-all for combinations
/// a handler chooses to tolerate rather than reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticleState {
    /// Incoming probe or struck nucleon.
    Initial,
    /// Re-interacted inside the nucleus; never left the event generator's
    /// intranuclear cascade.
    Fsi,
    /// Observable final-state particle.
    Final,
    /// Target nucleus before the interaction.
    NuclearInitial,
    /// Nuclear remnant / hadronic blob after the interaction.
    NuclearRemnant,
    /// Unclassifiable native status combination.
    Undefined,
}

impl ParticleState {
    /// Stack ordering used by `CanonicalEvent::order_stack`.
    ///
    /// Note Final is emitted before Fsi: the ordering is by usefulness to
    /// selection code, not by declaration order.
    pub const SORT_ORDER: [ParticleState; 6] = [
        ParticleState::Initial,
        ParticleState::Final,
        ParticleState::Fsi,
        ParticleState::NuclearInitial,
        ParticleState::NuclearRemnant,
        ParticleState::Undefined,
    ];

    /// Position of this state in [`Self::SORT_ORDER`].
    pub fn rank(self) -> usize {
        Self::SORT_ORDER.iter().position(|s| *s == self).expect("state present in sort order")
    }

    /// Stable integer code used by the flat interchange format.
    pub fn code(self) -> u32 {
        match self {
            ParticleState::Undefined => 0,
            ParticleState::Initial => 1,
            ParticleState::Fsi => 2,
            ParticleState::Final => 3,
            ParticleState::NuclearInitial => 4,
            ParticleState::NuclearRemnant => 5,
        }
    }

    /// Inverse of [`Self::code`]; unknown codes decode to `Undefined`.
    pub fn from_code(code: u32) -> Self {
        match code {
            1 => ParticleState::Initial,
            2 => ParticleState::Fsi,
            3 => ParticleState::Final,
            4 => ParticleState::NuclearInitial,
            5 => ParticleState::NuclearRemnant,
            _ => ParticleState::Undefined,
        }
    }
}

impl fmt::Display for ParticleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParticleState::Initial => "initial",
            ParticleState::Fsi => "fsi",
            ParticleState::Final => "final",
            ParticleState::NuclearInitial => "nuclear-initial",
            ParticleState::NuclearRemnant => "nuclear-remnant",
            ParticleState::Undefined => "undefined",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn final_ranks_before_fsi() {
        assert!(ParticleState::Final.rank() < ParticleState::Fsi.rank());
        assert_eq!(ParticleState::Initial.rank(), 0);
        assert_eq!(ParticleState::Undefined.rank(), 5);
    }

    #[test]
    fn codes_round_trip() {
        for s in ParticleState::SORT_ORDER {
            assert_eq!(ParticleState::from_code(s.code()), s);
        }
        assert_eq!(ParticleState::from_code(99), ParticleState::Undefined);
    }
}
