//! GENIE event records.

use serde::{Deserialize, Serialize};

/// Reserved tree name in GENIE sample files.
pub const TREE_NAME: &str = "gtree";

/// GHep particle status codes, as written by GENIE.
pub mod status {
    /// Undefined.
    pub const UNDEFINED: i32 = -1;
    /// Generator-level initial state.
    pub const INITIAL: i32 = 0;
    /// Generator-level final state.
    pub const STABLE_FINAL: i32 = 1;
    /// Intermediate state.
    pub const INTERMEDIATE: i32 = 2;
    /// Decayed state.
    pub const DECAYED: i32 = 3;
    /// Correlated nucleon.
    pub const CORRELATED_NUCLEON: i32 = 10;
    /// Struck nucleon target.
    pub const NUCLEON_TARGET: i32 = 11;
    /// DIS pre-fragmentation hadronic state.
    pub const DIS_PREFRAG: i32 = 12;
    /// Pre-decay resonant state.
    pub const PREDECAY_RESONANT: i32 = 13;
    /// Hadron inside the nucleus, subject to transport.
    pub const HADRON_IN_NUCLEUS: i32 = 14;
    /// Low-energy nuclear fragments entering as a hadronic blob.
    pub const NUCLEAR_REMNANT: i32 = 15;
    /// Composite nucleon cluster target.
    pub const NUCLEON_CLUSTER_TARGET: i32 = 16;
}

/// Scattering type of the summarized process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenieScattering {
    /// Quasi-elastic.
    QuasiElastic,
    /// (NC) elastic.
    Elastic,
    /// Resonance production.
    Resonant,
    /// Deep-inelastic scattering.
    DeepInelastic,
    /// Coherent pion production.
    Coherent,
    /// Meson-exchange current / 2p2h.
    Mec,
    /// Neutrino-electron elastic.
    NuElectronElastic,
    /// Inverse muon decay.
    InverseMuDecay,
    /// Anything this schema does not model.
    #[serde(other)]
    Unknown,
}

/// Interaction current of the summarized process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenieCurrent {
    /// Weak charged current.
    ChargedCurrent,
    /// Weak neutral current.
    NeutralCurrent,
    /// Electromagnetic.
    Electromagnetic,
}

/// One GHep particle. Momenta are GeV natively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeniePart {
    /// PDG code.
    pub pdg: i32,
    /// GHep status code (see [`status`]).
    pub status: i32,
    /// Four-momentum (px, py, pz, E) in GeV.
    pub p: [f64; 4],
}

/// One GENIE event with its process summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenieRecord {
    /// Probe PDG code.
    pub probe_pdg: i32,
    /// Struck nucleon PDG code (0 when not applicable).
    pub hit_nucleon_pdg: i32,
    /// Event cross-section, GENIE units.
    pub xsec: f64,
    /// Interaction current.
    pub current: GenieCurrent,
    /// Scattering type.
    pub scattering: GenieScattering,
    /// GHep particle record.
    pub parts: Vec<GeniePart>,
}
