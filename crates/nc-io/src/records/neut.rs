//! NEUT event records.

use serde::{Deserialize, Serialize};

/// Reserved tree name in NEUT sample files.
pub const TREE_NAME: &str = "neuttree";

/// One particle in a NEUT event vector. Momenta are MeV natively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeutPart {
    /// NEUT status code (-1 = initial state, 0 = determined by alive flag,
    /// 2 = FSI/outgoing-neutrino, see the handler for the full story).
    pub status: i32,
    /// NEUT alive flag.
    pub is_alive: bool,
    /// PDG code.
    pub pdg: i32,
    /// Four-momentum (px, py, pz, E) in MeV.
    pub p: [f64; 4],
}

/// One NEUT event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeutRecord {
    /// NEUT reaction mode (already in canonical numbering).
    pub mode: i32,
    /// Event number.
    pub event_no: u32,
    /// Target mass number.
    pub target_a: i32,
    /// Target charge number.
    pub target_z: i32,
    /// Free-hydrogen flag.
    pub target_h: i32,
    /// Bound-nucleon flag.
    pub bound: bool,
    /// Particle vector.
    pub parts: Vec<NeutPart>,
}
