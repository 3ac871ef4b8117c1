//! GiBUU event records.

use serde::{Deserialize, Serialize};

/// Reserved tree name in GiBUU sample files.
pub const TREE_NAME: &str = "RootTuple";

/// One transported GiBUU particle. Momenta are GeV natively; positions fm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GibuuPart {
    /// PDG code.
    pub pdg: i32,
    /// Four-momentum (px, py, pz, E) in GeV.
    pub p: [f64; 4],
    /// Position (x, y, z) in fm at the end of transport.
    pub pos: [f64; 3],
}

/// One GiBUU event. The incoming/outgoing leptons and the struck nucleon
/// are recorded separately from the transported hadrons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GibuuRecord {
    /// GiBUU per-event weight (perweight / ensemble normalization).
    pub weight: f64,
    /// GiBUU event type (native mode numbering).
    pub ev_type: i32,
    /// Process ID: |1| = EM, |2| = CC, |3| = NC; sign = neutrino sign.
    pub process_id: i32,
    /// Flavor ID: 1 = e, 2 = mu, 3 = tau.
    pub flavor_id: i32,
    /// Number of simulated ensembles.
    pub num_ensembles: i32,
    /// Number of runs with this configuration.
    pub num_runs: i32,
    /// Target mass number.
    pub nucleus_a: i32,
    /// Target charge number.
    pub nucleus_z: i32,
    /// Incoming lepton four-momentum, GeV.
    pub lep_in: [f64; 4],
    /// Outgoing lepton four-momentum, GeV.
    pub lep_out: [f64; 4],
    /// Struck nucleon four-momentum, GeV.
    pub nuc: [f64; 4],
    /// Struck nucleon charge (1 = proton, 0 = neutron).
    pub nuc_charge: i32,
    /// Transported hadrons.
    pub parts: Vec<GibuuPart>,
}

impl GibuuRecord {
    /// PDG of the struck nucleon.
    pub fn struck_nucleon_pdg(&self) -> i32 {
        if self.nuc_charge != 0 {
            2212
        } else {
            2112
        }
    }
}
