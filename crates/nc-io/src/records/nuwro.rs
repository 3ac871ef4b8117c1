//! NuWro event records.

use serde::{Deserialize, Serialize};

/// Reserved tree name in NuWro sample files.
pub const TREE_NAME: &str = "treeout";

/// Process/dynamics flags for one event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NuwroFlags {
    /// Quasi-elastic.
    #[serde(default)]
    pub qel: bool,
    /// Resonance production.
    #[serde(default)]
    pub res: bool,
    /// Deep-inelastic.
    #[serde(default)]
    pub dis: bool,
    /// Coherent.
    #[serde(default)]
    pub coh: bool,
    /// Meson-exchange current.
    #[serde(default)]
    pub mec: bool,
    /// Charged current (false = neutral current).
    #[serde(default)]
    pub cc: bool,
    /// Antineutrino probe.
    #[serde(default)]
    pub anty: bool,
}

/// Target-nucleus parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NuwroParams {
    /// Protons in the target nucleus.
    pub nucleus_p: i32,
    /// Neutrons in the target nucleus.
    pub nucleus_n: i32,
}

/// One NuWro particle. Momenta are MeV natively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NuwroPart {
    /// PDG code.
    pub pdg: i32,
    /// Four-momentum (px, py, pz, E) in MeV.
    pub p: [f64; 4],
}

/// One NuWro event: incoming, primary-vertex outgoing, and post-FSI
/// particle vectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NuwroRecord {
    /// Dynamics flags.
    pub flag: NuwroFlags,
    /// Target parameters.
    pub par: NuwroParams,
    /// Incoming particles.
    #[serde(rename = "in")]
    pub in_parts: Vec<NuwroPart>,
    /// Primary-vertex outgoing particles (pre-FSI).
    pub out: Vec<NuwroPart>,
    /// Post-FSI particles.
    pub post: Vec<NuwroPart>,
}

impl NuwroRecord {
    /// Count primary-vertex outgoing particles with this PDG code.
    ///
    /// Mode derivation inspects the primary vertex, not the post-FSI
    /// stack.
    pub fn nof(&self, pdg: i32) -> usize {
        self.out.iter().filter(|p| p.pdg == pdg).count()
    }

    /// Target mass number.
    pub fn target_a(&self) -> i32 {
        self.par.nucleus_p + self.par.nucleus_n
    }
}
