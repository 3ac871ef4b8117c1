//! HepMC3 (NuHepMC) event records.

use serde::{Deserialize, Serialize};

/// Reserved tree name in converted HepMC3 sample files.
pub const TREE_NAME: &str = "hepmc3_tree";

/// NuHepMC particle status codes this reader understands.
pub mod status {
    /// Undecayed physical particle (final state).
    pub const FINAL: i32 = 1;
    /// Decayed physical particle.
    pub const DECAYED: i32 = 2;
    /// Documentation line.
    pub const DOCUMENTATION: i32 = 3;
    /// Incoming beam particle.
    pub const BEAM: i32 = 4;
    /// Target particle (nucleus).
    pub const TARGET: i32 = 11;
    /// Struck nucleon.
    pub const STRUCK_NUCLEON: i32 = 21;
}

/// One HepMC particle. Momenta are GeV natively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HepmcParticle {
    /// PDG code.
    pub pdg: i32,
    /// NuHepMC status code.
    pub status: i32,
    /// Four-momentum (px, py, pz, E) in GeV.
    pub p: [f64; 4],
}

/// One NuHepMC event.
///
/// `proc_id` carries the hard-scatter mode already in canonical signed
/// numbering (the NuHepMC E.C.1 convention), so no translation table is
/// needed for this family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HepmcRecord {
    /// Event number.
    pub event_no: u32,
    /// Hard-scatter process ID.
    pub proc_id: i32,
    /// Particle list.
    pub parts: Vec<HepmcParticle>,
}
