//! The canonical flat interchange format.
//!
//! Canonical events can be written back out as a tree with a fixed branch
//! layout, making the canonical representation its own on-disk format:
//! a file written here is read back by the generic flat input handler
//! with no generator libraries involved.

use nc_core::{CanonicalEvent, FourVector, ParticleState};
use serde::{Deserialize, Serialize};

/// Reserved tree name for canonical event files.
pub const TREE_NAME: &str = "nucanon_events";
/// Reserved flux-spectrum key in canonical event files.
pub const FLUX_NAME: &str = "nucanon_fluxhist";
/// Reserved event-rate-spectrum key in canonical event files.
pub const EVENT_NAME: &str = "nucanon_eventhist";
/// Reserved tree name for per-event spline coefficient blocks.
pub const SPLINE_TREE_NAME: &str = "spline_tree";

/// One serialized canonical event. Field names are the fixed branch names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatRecord {
    /// Canonical interaction mode.
    #[serde(rename = "Mode")]
    pub mode: i32,
    /// Event number.
    #[serde(rename = "EventNo")]
    pub event_no: u32,
    /// Total cross-section.
    #[serde(rename = "TotCrs")]
    pub tot_crs: f64,
    /// Target mass number.
    #[serde(rename = "TargetA")]
    pub target_a: i32,
    /// Free-hydrogen flag.
    #[serde(rename = "TargetH")]
    pub target_h: i32,
    /// Bound-nucleon flag.
    #[serde(rename = "Bound")]
    pub bound: bool,
    /// Reweight value saved by the pass that wrote this file.
    #[serde(rename = "RWWeight")]
    pub rw_weight: f64,
    /// Input weight at write time.
    #[serde(rename = "InputWeight")]
    pub input_weight: f64,
    /// Particle count.
    #[serde(rename = "NParticles")]
    pub n_particles: u32,
    /// Particle state codes.
    #[serde(rename = "ParticleState")]
    pub particle_state: Vec<u32>,
    /// Particle PDG codes.
    #[serde(rename = "ParticlePDG")]
    pub particle_pdg: Vec<i32>,
    /// Particle four-momenta, MeV.
    #[serde(rename = "ParticleMom")]
    pub particle_mom: Vec<[f64; 4]>,
}

/// Per-event spline coefficient block, stored entry-parallel to the event
/// tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplineBlock {
    /// Response-spline coefficients for this event.
    pub coeffs: Vec<f64>,
}

impl FlatRecord {
    /// Serialize a canonical event.
    pub fn from_event(ev: &CanonicalEvent) -> Self {
        let n = ev.n_particles();
        let mut particle_state = Vec::with_capacity(n);
        let mut particle_pdg = Vec::with_capacity(n);
        let mut particle_mom = Vec::with_capacity(n);
        for i in 0..n {
            let p = ev.particle(i).expect("index below count");
            particle_state.push(p.state.code());
            particle_pdg.push(p.pdg);
            particle_mom.push(p.mom.into());
        }
        Self {
            mode: ev.mode,
            event_no: ev.event_no,
            tot_crs: ev.total_xsec,
            target_a: ev.target_a,
            target_h: ev.target_h,
            bound: ev.bound,
            rw_weight: ev.weights.generator,
            input_weight: ev.weights.input,
            n_particles: n as u32,
            particle_state,
            particle_pdg,
            particle_mom,
        }
    }

    /// Populate a (reset) canonical event from this record.
    ///
    /// Weights are not touched: the reading handler composes them from
    /// the stored branches and its own joint-input scale.
    pub fn fill_event(&self, ev: &mut CanonicalEvent) {
        ev.mode = self.mode;
        ev.event_no = self.event_no;
        ev.total_xsec = self.tot_crs;
        ev.target_a = self.target_a;
        ev.target_h = self.target_h;
        ev.bound = self.bound;

        let n = self.n_particles as usize;
        if n > ev.capacity() {
            ev.expand_stack(n);
        }
        for i in 0..n {
            ev.push_particle(
                FourVector::from(self.particle_mom[i]),
                self.particle_pdg[i],
                ParticleState::from_code(self.particle_state[i]),
                true,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_round_trips_through_record() {
        let mut ev = CanonicalEvent::new();
        ev.reset();
        ev.mode = -11;
        ev.event_no = 42;
        ev.total_xsec = 1.25;
        ev.target_a = 12;
        ev.target_h = 0;
        ev.bound = true;
        ev.push_particle(FourVector::new(0.0, 0.0, 900.0, 900.0), -14, ParticleState::Initial, true);
        ev.push_particle(FourVector::new(10.0, 0.0, 700.0, 712.0), -13, ParticleState::Final, true);
        ev.order_stack();

        let rec = FlatRecord::from_event(&ev);
        assert_eq!(rec.n_particles, 2);
        assert_eq!(rec.particle_pdg, vec![-14, -13]);

        let mut back = CanonicalEvent::new();
        back.reset();
        rec.fill_event(&mut back);
        assert_eq!(back.mode, -11);
        assert_eq!(back.event_no, 42);
        assert_eq!(back.n_particles(), 2);
        assert_eq!(back.particle(0).unwrap().state, ParticleState::Initial);
        assert_eq!(back.particle(1).unwrap().mom, FourVector::new(10.0, 0.0, 700.0, 712.0));
    }

    #[test]
    fn branch_names_are_fixed() {
        let mut ev = CanonicalEvent::new();
        ev.reset();
        let v = serde_json::to_value(FlatRecord::from_event(&ev)).unwrap();
        for key in
            ["Mode", "EventNo", "TotCrs", "TargetA", "TargetH", "Bound", "RWWeight", "InputWeight", "NParticles", "ParticleState", "ParticlePDG", "ParticleMom"]
        {
            assert!(v.get(key).is_some(), "missing branch {key}");
        }
    }
}
