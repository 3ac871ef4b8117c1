//! NUANCE event records.

use serde::{Deserialize, Serialize};

/// Reserved tree name in NUANCE sample files.
pub const TREE_NAME: &str = "h3";

/// An outgoing NUANCE particle. Momenta are MeV natively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NuancePart {
    /// PDG code.
    pub pdg: i32,
    /// Four-momentum (px, py, pz, E) in MeV.
    pub p: [f64; 4],
}

/// One NUANCE event: fixed neutrino/target slots plus outgoing lepton and
/// hadron lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NuanceRecord {
    /// NUANCE channel number.
    pub channel: i32,
    /// Incoming neutrino PDG.
    pub neutrino: i32,
    /// Target PDG.
    pub target: i32,
    /// Neutrino four-momentum, MeV.
    pub p_neutrino: [f64; 4],
    /// Target four-momentum, MeV.
    pub p_targ: [f64; 4],
    /// Outgoing leptons.
    pub leptons: Vec<NuancePart>,
    /// Outgoing hadrons.
    pub hadrons: Vec<NuancePart>,
}
