//! Particle value view and PDG whitelist groups.

use crate::state::ParticleState;
use crate::vec4::FourVector;

/// A by-value snapshot of one particle-stack slot.
///
/// Consumers hold stack *indices* across mutations; a `Particle` is only a
/// momentary copy handed out by the event accessors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Four-momentum in MeV.
    pub mom: FourVector,
    /// PDG code.
    pub pdg: i32,
    /// Canonical state.
    pub state: ParticleState,
    /// Attached to the primary interaction vertex?
    pub primary: bool,
}

impl Particle {
    /// 3-momentum magnitude in MeV.
    pub fn p(&self) -> f64 {
        self.mom.p()
    }

    /// Energy in MeV.
    pub fn e(&self) -> f64 {
        self.mom.e
    }

    /// Invariant mass in MeV.
    pub fn mass(&self) -> f64 {
        self.mom.m()
    }

    /// Kinetic energy in MeV.
    pub fn ke(&self) -> f64 {
        self.mom.e - self.mass()
    }
}

/// PDG code whitelists used with the filtered event accessors.
///
/// Filters match signed codes exactly, so each list carries both particle
/// and antiparticle entries where relevant.
pub mod pdg {
    /// All neutrino flavours, both signs.
    pub const NEUTRINOS: [i32; 6] = [12, -12, 14, -14, 16, -16];
    /// Charged leptons, both signs.
    pub const CHARGED_LEPTONS: [i32; 6] = [11, -11, 13, -13, 15, -15];
    /// Neutrinos and charged leptons.
    pub const ALL_LEPTONS: [i32; 12] =
        [11, -11, 12, -12, 13, -13, 14, -14, 15, -15, 16, -16];
    /// All pions.
    pub const PIONS: [i32; 3] = [111, 211, -211];
    /// Charged pions only.
    pub const CHARGED_PIONS: [i32; 2] = [211, -211];
    /// Protons and neutrons.
    pub const NUCLEONS: [i32; 2] = [2212, 2112];

    /// Is this PDG code a meson? (open range used for FS meson counting)
    pub fn is_meson(code: i32) -> bool {
        let a = code.abs();
        (111..=557).contains(&a)
    }

    /// Is this PDG code a charged lepton?
    pub fn is_charged_lepton(code: i32) -> bool {
        matches!(code.abs(), 11 | 13 | 15)
    }

    /// Is this PDG code a neutrino?
    pub fn is_neutrino(code: i32) -> bool {
        matches!(code.abs(), 12 | 14 | 16)
    }

    /// Nuclear PDG code from charge and mass numbers (10LZZZAAAI, I=0).
    pub fn nucleus(z: i32, a: i32) -> i32 {
        1_000_000_000 + z * 10_000 + a * 10
    }

    /// Free proton target.
    pub const FREE_PROTON: i32 = 1_000_010_010;
}
