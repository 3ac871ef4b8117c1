//! The canonical event container and its particle stack.

use crate::modes::{self, MODE_UNSET};
use crate::particle::{pdg as pdg_groups, Particle};
use crate::state::ParticleState;
use crate::vec4::FourVector;
use crate::weights::EventWeights;
use std::fmt;

/// Initial particle-stack capacity. Grown on demand, never shrunk.
pub const DEFAULT_STACK_SIZE: usize = 400;

/// Generator-agnostic event representation.
///
/// One instance is owned by each input handler and reused across every
/// read: `reset()` must be called before repopulating for a new entry,
/// otherwise stale particles leak into the new event.
///
/// The particle stack is an index-based struct-of-arrays arena. All
/// consumers hold plain `usize` indices, so growing the backing storage
/// never invalidates anything a caller could still be holding.
#[derive(Debug, Clone)]
pub struct CanonicalEvent {
    /// Signed canonical interaction code; `MODE_UNSET` until translated.
    pub mode: i32,
    /// Generator event number (when the format carries one).
    pub event_no: u32,
    /// Total cross-section for this event, generator units.
    pub total_xsec: f64,
    /// Target mass number.
    pub target_a: i32,
    /// Target charge number.
    pub target_z: i32,
    /// Free-nucleon flag (0/1).
    pub target_h: i32,
    /// Target nuclear PDG code.
    pub target_pdg: i32,
    /// Was the struck nucleon bound in a nucleus?
    pub bound: bool,
    /// Cached probe energy in MeV, set by [`Self::cache_probe`].
    pub probe_e: f64,
    /// Cached probe PDG code, set by [`Self::cache_probe`].
    pub probe_pdg: i32,
    /// Multiplicative weight components.
    pub weights: EventWeights,

    n_particles: usize,
    mom: Vec<FourVector>,
    pdg: Vec<i32>,
    state: Vec<ParticleState>,
    primary: Vec<bool>,

    // Copy-aside buffers for order_stack; kept allocated between calls.
    orig_mom: Vec<FourVector>,
    orig_pdg: Vec<i32>,
    orig_state: Vec<ParticleState>,
    orig_primary: Vec<bool>,
}

impl Default for CanonicalEvent {
    fn default() -> Self {
        Self::new()
    }
}

impl CanonicalEvent {
    /// Event with the default stack capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_STACK_SIZE)
    }

    /// Event with an explicit stack capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            mode: MODE_UNSET,
            event_no: 0,
            total_xsec: -1.0,
            target_a: -1,
            target_z: -1,
            target_h: -1,
            target_pdg: 0,
            bound: false,
            probe_e: 0.0,
            probe_pdg: 0,
            weights: EventWeights::default(),
            n_particles: 0,
            mom: vec![FourVector::default(); capacity],
            pdg: vec![0; capacity],
            state: vec![ParticleState::Undefined; capacity],
            primary: vec![false; capacity],
            orig_mom: vec![FourVector::default(); capacity],
            orig_pdg: vec![0; capacity],
            orig_state: vec![ParticleState::Undefined; capacity],
            orig_primary: vec![false; capacity],
        }
    }

    /// Current stack capacity.
    pub fn capacity(&self) -> usize {
        self.mom.len()
    }

    /// Clear all scalars to sentinels and drop all particles.
    ///
    /// Backing storage is retained.
    pub fn reset(&mut self) {
        self.mode = MODE_UNSET;
        self.event_no = 0;
        self.total_xsec = -1.0;
        self.target_a = -1;
        self.target_z = -1;
        self.target_h = -1;
        self.target_pdg = 0;
        self.bound = false;
        self.probe_e = 0.0;
        self.probe_pdg = 0;
        self.weights.reset();
        self.n_particles = 0;
    }

    /// Grow the particle-stack buffers to at least `new_size` slots,
    /// preserving already-written entries. Shrink requests are ignored.
    pub fn expand_stack(&mut self, new_size: usize) {
        if new_size <= self.capacity() {
            return;
        }
        tracing::debug!(from = self.capacity(), to = new_size, "expanding particle stack");
        self.mom.resize(new_size, FourVector::default());
        self.pdg.resize(new_size, 0);
        self.state.resize(new_size, ParticleState::Undefined);
        self.primary.resize(new_size, false);
        self.orig_mom.resize(new_size, FourVector::default());
        self.orig_pdg.resize(new_size, 0);
        self.orig_state.resize(new_size, ParticleState::Undefined);
        self.orig_primary.resize(new_size, false);
    }

    /// Append a particle at the next free slot and return its index.
    ///
    /// Panics when the stack is full: callers that know the native
    /// particle count must call [`Self::expand_stack`] first.
    pub fn push_particle(
        &mut self,
        mom: FourVector,
        pdg: i32,
        state: ParticleState,
        primary: bool,
    ) -> usize {
        let i = self.n_particles;
        assert!(
            i < self.capacity(),
            "particle stack full ({} slots); expand_stack must be called before appending",
            self.capacity()
        );
        self.mom[i] = mom;
        self.pdg[i] = pdg;
        self.state[i] = state;
        self.primary[i] = primary;
        self.n_particles += 1;
        i
    }

    /// Stable-partition the stack by [`ParticleState::SORT_ORDER`] rank.
    ///
    /// Within each state the relative order of particles is preserved.
    /// The particle count must come out unchanged; losing one would
    /// silently corrupt every index the caller holds, so that is a fatal
    /// internal error.
    pub fn order_stack(&mut self) {
        let npart = self.n_particles;
        self.orig_mom[..npart].copy_from_slice(&self.mom[..npart]);
        self.orig_pdg[..npart].copy_from_slice(&self.pdg[..npart]);
        self.orig_state[..npart].copy_from_slice(&self.state[..npart]);
        self.orig_primary[..npart].copy_from_slice(&self.primary[..npart]);

        self.n_particles = 0;
        for want in ParticleState::SORT_ORDER {
            for i in 0..npart {
                if self.orig_state[i] != want {
                    continue;
                }
                let slot = self.n_particles;
                self.mom[slot] = self.orig_mom[i];
                self.pdg[slot] = self.orig_pdg[i];
                self.state[slot] = self.orig_state[i];
                self.primary[slot] = self.orig_primary[i];
                self.n_particles += 1;
            }
        }

        assert_eq!(self.n_particles, npart, "dropped particles when ordering the stack");
    }

    /// Cache probe energy/PDG from the highest-momentum initial-state
    /// lepton, if the event has one. Call after [`Self::order_stack`].
    pub fn cache_probe(&mut self) {
        if let Some(i) =
            self.hm_particle_index(&pdg_groups::ALL_LEPTONS, Some(ParticleState::Initial))
        {
            self.probe_e = self.mom[i].e;
            self.probe_pdg = self.pdg[i];
        }
    }

    // ---- stack access ----

    /// Number of particles currently on the stack.
    pub fn n_particles(&self) -> usize {
        self.n_particles
    }

    /// Snapshot of the particle at `index`, if in range.
    pub fn particle(&self, index: usize) -> Option<Particle> {
        if index >= self.n_particles {
            return None;
        }
        Some(Particle {
            mom: self.mom[index],
            pdg: self.pdg[index],
            state: self.state[index],
            primary: self.primary[index],
        })
    }

    /// Squared 3-momentum of the particle at `index`; 0 when out of range.
    pub fn particle_mom2(&self, index: usize) -> f64 {
        if index >= self.n_particles {
            return 0.0;
        }
        self.mom[index].p2()
    }

    fn matches(&self, i: usize, pdgs: &[i32], state: Option<ParticleState>) -> bool {
        if let Some(s) = state {
            if self.state[i] != s {
                return false;
            }
        }
        pdgs.is_empty() || pdgs.contains(&self.pdg[i])
    }

    /// Does any particle match the PDG whitelist (empty = any) and state
    /// (`None` = any)?
    pub fn has_particle(&self, pdgs: &[i32], state: Option<ParticleState>) -> bool {
        (0..self.n_particles).any(|i| self.matches(i, pdgs, state))
    }

    /// Count of matching particles.
    pub fn num_particles(&self, pdgs: &[i32], state: Option<ParticleState>) -> usize {
        (0..self.n_particles).filter(|&i| self.matches(i, pdgs, state)).count()
    }

    /// Stack indices of all matching particles, in stack order.
    pub fn particle_indices(&self, pdgs: &[i32], state: Option<ParticleState>) -> Vec<usize> {
        (0..self.n_particles).filter(|&i| self.matches(i, pdgs, state)).collect()
    }

    /// Index of the highest-|p| matching particle; ties go to the first
    /// one scanned.
    pub fn hm_particle_index(
        &self,
        pdgs: &[i32],
        state: Option<ParticleState>,
    ) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for i in 0..self.n_particles {
            if !self.matches(i, pdgs, state) {
                continue;
            }
            let p2 = self.mom[i].p2();
            if best.map_or(true, |(_, b)| p2 > b) {
                best = Some((i, p2));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Index of the second-highest-|p| matching particle.
    ///
    /// When only one candidate exists its own index is returned, so a
    /// caller asking for "the recoil" always gets something usable.
    pub fn shm_particle_index(
        &self,
        pdgs: &[i32],
        state: Option<ParticleState>,
    ) -> Option<usize> {
        let mut lead: Option<(usize, f64)> = None;
        let mut recoil: Option<(usize, f64)> = None;
        for i in 0..self.n_particles {
            if !self.matches(i, pdgs, state) {
                continue;
            }
            let p2 = self.mom[i].p2();
            if lead.map_or(true, |(_, b)| p2 > b) {
                recoil = lead;
                lead = Some((i, p2));
            } else if recoil.map_or(true, |(_, b)| p2 > b) {
                recoil = Some((i, p2));
            }
        }
        recoil.or(lead).map(|(i, _)| i)
    }

    /// Highest-momentum matching particle, by value.
    pub fn hm_particle(&self, pdgs: &[i32], state: Option<ParticleState>) -> Option<Particle> {
        self.hm_particle_index(pdgs, state).and_then(|i| self.particle(i))
    }

    // ---- final/initial state conveniences ----

    /// Does the final state contain this PDG?
    pub fn has_fs_particle(&self, pdg: i32) -> bool {
        self.has_particle(&[pdg], Some(ParticleState::Final))
    }

    /// Final-state count for this PDG.
    pub fn num_fs_particles(&self, pdg: i32) -> usize {
        self.num_particles(&[pdg], Some(ParticleState::Final))
    }

    /// Highest-momentum final-state particle of this PDG.
    pub fn hm_fs_particle(&self, pdg: i32) -> Option<Particle> {
        self.hm_particle(&[pdg], Some(ParticleState::Final))
    }

    /// Does the initial state contain this PDG?
    pub fn has_is_particle(&self, pdg: i32) -> bool {
        self.has_particle(&[pdg], Some(ParticleState::Initial))
    }

    /// Highest-momentum initial-state particle of this PDG.
    pub fn hm_is_particle(&self, pdg: i32) -> Option<Particle> {
        self.hm_particle(&[pdg], Some(ParticleState::Initial))
    }

    /// Number of charged leptons in the final state.
    pub fn num_fs_leptons(&self) -> usize {
        (0..self.n_particles)
            .filter(|&i| {
                self.state[i] == ParticleState::Final
                    && pdg_groups::is_charged_lepton(self.pdg[i])
            })
            .count()
    }

    /// Number of mesons in the final state.
    pub fn num_fs_mesons(&self) -> usize {
        (0..self.n_particles)
            .filter(|&i| {
                self.state[i] == ParticleState::Final && pdg_groups::is_meson(self.pdg[i])
            })
            .count()
    }

    // ---- beam / kinematics ----

    /// Index of the incoming beam neutrino: the first initial-state
    /// particle with a neutrino PDG.
    pub fn beam_neutrino_index(&self) -> Option<usize> {
        (0..self.n_particles).find(|&i| {
            self.state[i] == ParticleState::Initial && pdg_groups::is_neutrino(self.pdg[i])
        })
    }

    /// Beam neutrino energy in MeV; 0 when the event has no neutrino.
    pub fn enu(&self) -> f64 {
        self.beam_neutrino_index().map_or(0.0, |i| self.mom[i].e)
    }

    /// Beam neutrino PDG; 0 when the event has no neutrino.
    pub fn pdg_nu(&self) -> i32 {
        self.beam_neutrino_index().map_or(0, |i| self.pdg[i])
    }

    fn probe_for_current(&self) -> i32 {
        if self.probe_pdg != 0 {
            self.probe_pdg
        } else {
            self.pdg_nu()
        }
    }

    /// Is this event charged-current?
    pub fn is_cc(&self) -> bool {
        modes::is_cc(self.mode, self.probe_for_current())
    }

    /// Is this event neutral-current?
    pub fn is_nc(&self) -> bool {
        modes::is_nc(self.mode, self.probe_for_current())
    }

    /// PDG of the outgoing lepton implied by the beam neutrino and the
    /// CC/NC character of the mode.
    pub fn lepton_out_pdg(&self) -> i32 {
        let nu = self.pdg_nu();
        if self.is_cc() {
            if nu > 0 {
                nu - 1
            } else {
                nu + 1
            }
        } else {
            nu
        }
    }

    /// Index of the outgoing lepton: the highest-momentum final-state
    /// particle matching [`Self::lepton_out_pdg`].
    pub fn lepton_out_index(&self) -> Option<usize> {
        self.hm_particle_index(&[self.lepton_out_pdg()], Some(ParticleState::Final))
    }

    /// True four-momentum transfer Q² in GeV².
    ///
    /// Returns 0 when the beam neutrino or outgoing lepton is absent.
    pub fn q2(&self) -> f64 {
        let (Some(nu), Some(lep)) = (self.beam_neutrino_index(), self.lepton_out_index()) else {
            return 0.0;
        };
        let q = self.mom[lep] - self.mom[nu];
        // Momenta are MeV; convert the Minkowski product to GeV².
        -q.m2() / 1.0e6
    }

    // ---- in-place adjustments ----

    /// Remove up to `ke` MeV of kinetic energy from the particle at
    /// `index`, rescaling its 3-momentum onto the new mass shell. Cannot
    /// take more kinetic energy than the particle has.
    pub fn remove_ke(&mut self, index: usize, ke: f64) {
        let Some(part) = self.particle(index) else { return };
        let mass = part.mass();
        let mut new_e = mass + (part.ke() - ke);
        if new_e < mass {
            new_e = mass;
        }
        let new_p = (new_e * new_e - mass * mass).max(0.0).sqrt();
        let mut mom = self.mom[index].with_p(new_p);
        mom.e = new_e;
        self.mom[index] = mom;
    }

    /// Add `ke` MeV of kinetic energy to the particle at `index`.
    pub fn give_ke(&mut self, index: usize, ke: f64) {
        self.remove_ke(index, -ke);
    }
}

impl fmt::Display for CanonicalEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "event no={} mode={} ({}) weight={:.6}",
            self.event_no,
            self.mode,
            modes::mode_name(self.mode),
            self.weights.total()
        )?;
        writeln!(f, "  target A={} Z={} pdg={} bound={}", self.target_a, self.target_z, self.target_pdg, self.bound)?;
        for i in 0..self.n_particles {
            writeln!(
                f,
                "  {:3}. pdg={:<12} {:<16} p=({:.1}, {:.1}, {:.1}, {:.1})",
                i, self.pdg[i], self.state[i].to_string(), self.mom[i].px, self.mom[i].py, self.mom[i].pz, self.mom[i].e
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn mk(pz: f64) -> FourVector {
        FourVector::new(0.0, 0.0, pz, pz.abs())
    }

    #[test]
    fn reset_is_idempotent() {
        let mut ev = CanonicalEvent::new();
        ev.push_particle(mk(100.0), 14, ParticleState::Initial, true);
        ev.mode = 1;
        ev.reset();
        assert_eq!(ev.n_particles(), 0);
        assert_eq!(ev.mode, MODE_UNSET);
        ev.reset();
        assert_eq!(ev.n_particles(), 0);
        assert_eq!(ev.mode, MODE_UNSET);
        assert_eq!(ev.weights.total(), 1.0);
    }

    #[test]
    fn order_stack_partitions_and_preserves_count() {
        let mut ev = CanonicalEvent::new();
        ev.reset();
        // Supplied out of order: [Final, Initial, FSI, Initial].
        ev.push_particle(mk(1.0), 13, ParticleState::Final, true);
        ev.push_particle(mk(2.0), 14, ParticleState::Initial, true);
        ev.push_particle(mk(3.0), 211, ParticleState::Fsi, false);
        ev.push_particle(mk(4.0), 2112, ParticleState::Initial, true);
        ev.order_stack();

        assert_eq!(ev.n_particles(), 4);
        let states: Vec<_> = (0..4).map(|i| ev.particle(i).unwrap().state).collect();
        assert_eq!(
            states,
            vec![
                ParticleState::Initial,
                ParticleState::Initial,
                ParticleState::Final,
                ParticleState::Fsi
            ]
        );
        // Stability: the two Initial entries keep their relative order.
        assert_eq!(ev.particle(0).unwrap().pdg, 14);
        assert_eq!(ev.particle(1).unwrap().pdg, 2112);
    }

    #[test]
    fn order_stack_preserves_multiset() {
        let mut ev = CanonicalEvent::new();
        ev.reset();
        let input = [
            (13, ParticleState::Final, 10.0),
            (14, ParticleState::Initial, 20.0),
            (2212, ParticleState::NuclearRemnant, 5.0),
            (111, ParticleState::Undefined, 7.0),
            (211, ParticleState::Fsi, 3.0),
            (22, ParticleState::Final, 1.0),
        ];
        for (pdg, state, pz) in input {
            ev.push_particle(mk(pz), pdg, state, false);
        }
        let mut before: Vec<_> =
            (0..ev.n_particles()).map(|i| ev.particle(i).unwrap()).collect();
        ev.order_stack();
        let mut after: Vec<_> = (0..ev.n_particles()).map(|i| ev.particle(i).unwrap()).collect();
        let key = |p: &Particle| (p.pdg, p.state.rank(), p.mom.pz as i64);
        before.sort_by_key(key);
        after.sort_by_key(key);
        assert_eq!(before, after);

        // Ranks are non-decreasing after ordering.
        let ranks: Vec<_> =
            (0..ev.n_particles()).map(|i| ev.particle(i).unwrap().state.rank()).collect();
        assert!(ranks.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn expand_preserves_entries() {
        let mut ev = CanonicalEvent::with_capacity(2);
        ev.push_particle(mk(1.0), 14, ParticleState::Initial, true);
        ev.push_particle(mk(2.0), 13, ParticleState::Final, true);
        ev.expand_stack(8);
        assert_eq!(ev.capacity(), 8);
        assert_eq!(ev.particle(0).unwrap().pdg, 14);
        assert_eq!(ev.particle(1).unwrap().pdg, 13);
        ev.expand_stack(4); // shrink request ignored
        assert_eq!(ev.capacity(), 8);
    }

    #[test]
    #[should_panic(expected = "particle stack full")]
    fn push_past_capacity_panics() {
        let mut ev = CanonicalEvent::with_capacity(1);
        ev.push_particle(mk(1.0), 14, ParticleState::Initial, true);
        ev.push_particle(mk(2.0), 13, ParticleState::Final, true);
    }

    #[test]
    fn highest_momentum_searches() {
        let mut ev = CanonicalEvent::new();
        ev.reset();
        ev.push_particle(mk(100.0), 2212, ParticleState::Final, true);
        ev.push_particle(mk(300.0), 2212, ParticleState::Final, true);
        ev.push_particle(mk(200.0), 2212, ParticleState::Final, true);
        ev.push_particle(mk(999.0), 2212, ParticleState::Fsi, false);

        assert_eq!(ev.hm_particle_index(&[2212], Some(ParticleState::Final)), Some(1));
        assert_eq!(ev.shm_particle_index(&[2212], Some(ParticleState::Final)), Some(2));
        // Single candidate: second-highest falls back to the highest.
        assert_eq!(ev.shm_particle_index(&[2212], Some(ParticleState::Fsi)), Some(3));
        assert_eq!(ev.hm_particle_index(&[2112], None), None);
    }

    #[test]
    fn hm_tie_takes_first_scanned() {
        let mut ev = CanonicalEvent::new();
        ev.reset();
        ev.push_particle(mk(100.0), 211, ParticleState::Final, true);
        ev.push_particle(mk(100.0), 211, ParticleState::Final, true);
        assert_eq!(ev.hm_particle_index(&[211], Some(ParticleState::Final)), Some(0));
    }

    #[test]
    fn q2_from_probe_and_lepton() {
        let mut ev = CanonicalEvent::new();
        ev.reset();
        ev.mode = 1;
        ev.push_particle(FourVector::new(0.0, 0.0, 1000.0, 1000.0), 14, ParticleState::Initial, true);
        ev.push_particle(FourVector::new(100.0, 0.0, 800.0, 812.0), 13, ParticleState::Final, true);
        ev.order_stack();
        ev.cache_probe();
        assert_eq!(ev.probe_pdg, 14);
        assert_relative_eq!(ev.probe_e, 1000.0);

        let q = FourVector::new(100.0, 0.0, -200.0, -188.0);
        assert_relative_eq!(ev.q2(), -q.m2() / 1.0e6, epsilon = 1e-12);
        assert!(ev.q2() > 0.0);
    }

    #[test]
    fn q2_zero_when_lepton_missing() {
        let mut ev = CanonicalEvent::new();
        ev.reset();
        ev.mode = 1;
        ev.push_particle(mk(1000.0), 14, ParticleState::Initial, true);
        assert_eq!(ev.q2(), 0.0);
    }

    #[test]
    fn outgoing_lepton_pdg() {
        let mut ev = CanonicalEvent::new();
        ev.reset();
        ev.mode = 1;
        ev.push_particle(mk(1000.0), 14, ParticleState::Initial, true);
        assert_eq!(ev.lepton_out_pdg(), 13);
        ev.mode = -1;
        ev.reset();
        ev.mode = -1;
        ev.push_particle(mk(1000.0), -14, ParticleState::Initial, true);
        assert_eq!(ev.lepton_out_pdg(), -13);
        ev.mode = 52;
        assert_eq!(ev.lepton_out_pdg(), -14);
    }

    #[test]
    fn ke_adjustment_clamps_at_mass_shell() {
        let mut ev = CanonicalEvent::new();
        ev.reset();
        // proton: m = 400 MeV in this synthetic setup
        ev.push_particle(FourVector::new(0.0, 0.0, 300.0, 500.0), 2212, ParticleState::Final, true);
        ev.remove_ke(0, 1.0e9);
        let p = ev.particle(0).unwrap();
        assert_relative_eq!(p.e(), p.mass(), epsilon = 1e-9);
        assert_relative_eq!(p.p(), 0.0, epsilon = 1e-6);
    }
}
