//! NEUT input handler.

use crate::handler::{HandlerCore, InputHandler};
use crate::joint::JointInputBuilder;
use crate::loader::load_sample;
use nc_core::particle::pdg;
use nc_core::{CanonicalEvent, Error, FourVector, ParticleState, Result};
use nc_io::records::neut::{NeutPart, NeutRecord, TREE_NAME};
use nc_io::Spectrum;
use std::path::PathBuf;

/// Reads NEUT sample files. NEUT modes are already canonical and momenta
/// are already MeV, so this handler is mostly about the status/alive
/// classification quirks.
#[derive(Debug)]
pub struct NeutInput {
    core: HandlerCore,
    entries: Vec<NeutRecord>,
}

/// Classify one NEUT particle.
///
/// NEUT reuses status 2 across particle species: for the outgoing
/// neutrino of an NC event it means "final state", for everything else it
/// marks a particle that re-interacted. The status table was audited as
/// exhaustive upstream, so an alive particle that matches nothing here is
/// treated as a new, unhandled code and rejected rather than coerced.
pub fn neut_particle_state(event_mode: i32, part: &NeutPart) -> Result<ParticleState> {
    if !part.is_alive && part.status == -1 {
        return Ok(ParticleState::Initial);
    }

    if part.status == 2 {
        if event_mode.abs() > 30 && matches!(part.pdg.abs(), 12 | 14) {
            return Ok(ParticleState::Final);
        }
        if part.is_alive {
            return Ok(ParticleState::Fsi);
        }
        return Ok(ParticleState::Undefined);
    }

    if part.is_alive && part.status == 0 {
        return Ok(ParticleState::Final);
    }

    if part.is_alive {
        return Err(Error::Validation(format!(
            "unclassified NEUT particle: alive=true status={} pdg={}",
            part.status, part.pdg
        )));
    }
    Ok(ParticleState::Undefined)
}

impl NeutInput {
    /// Open one or more NEUT sample files as a single (joint) input.
    pub fn open(handle: &str, files: &[PathBuf]) -> Result<Self> {
        tracing::info!(handle, "creating NEUT input handler");
        let mut builder = JointInputBuilder::new();
        let mut entries = Vec::new();
        for path in files {
            let (tree, flux, event_rate) = load_sample::<NeutRecord>(
                path,
                TREE_NAME,
                "the MC may need to be regenerated with flux/event-rate spectra attached",
            )?;
            builder.register(path.display().to_string(), tree.len(), flux, event_rate)?;
            entries.extend(tree);
        }
        let core = HandlerCore::new(handle, builder.finalize()?);
        Ok(Self { core, entries })
    }

    fn fill_kinematics(&mut self, entry: usize) -> Result<()> {
        let rec = &self.entries[entry];
        let ev = &mut self.core.event;
        ev.reset();

        ev.mode = rec.mode;
        ev.event_no = rec.event_no;
        ev.target_a = rec.target_a;
        ev.target_z = rec.target_z;
        ev.target_h = rec.target_h;
        ev.bound = rec.bound;
        ev.target_pdg = if rec.bound {
            pdg::nucleus(rec.target_z, rec.target_a)
        } else {
            pdg::FREE_PROTON
        };

        let npart = rec.parts.len();
        if npart > ev.capacity() {
            tracing::warn!(npart, "NEUT event exceeds particle stack; expanding");
            ev.expand_stack(npart);
        }

        for part in &rec.parts {
            let state = neut_particle_state(rec.mode, part)?;
            ev.push_particle(FourVector::from(part.p), part.pdg, state, true);
        }

        ev.order_stack();
        ev.cache_probe();
        Ok(())
    }
}

impl InputHandler for NeutInput {
    fn name(&self) -> &str {
        &self.core.name
    }

    fn n_events(&self) -> usize {
        self.core.n_events()
    }

    fn nuisance_event(&mut self, entry: usize) -> Result<Option<&CanonicalEvent>> {
        if entry >= self.core.n_events() {
            return Ok(None);
        }
        self.fill_kinematics(entry)?;
        let scale = self.core.input_weight(entry);
        self.core.event.weights.input *= scale;
        Ok(Some(&self.core.event))
    }

    fn base_event(&mut self, entry: usize) -> Result<Option<&CanonicalEvent>> {
        if entry >= self.core.n_events() {
            return Ok(None);
        }
        let mode = self.entries[entry].mode;
        let ev = &mut self.core.event;
        ev.reset();
        ev.mode = mode;
        ev.weights.input = self.core.joint.input_weight(entry);
        Ok(Some(&self.core.event))
    }

    fn truncate(&mut self, cap: usize) -> Result<()> {
        self.core.truncate(cap)
    }

    fn flux_spectrum(&self) -> &Spectrum {
        self.core.joint.flux()
    }

    fn event_spectrum(&self) -> &Spectrum {
        self.core.joint.event_rate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(status: i32, is_alive: bool, pdg: i32) -> NeutPart {
        NeutPart { status, is_alive, pdg, p: [0.0, 0.0, 1.0, 1.0] }
    }

    #[test]
    fn initial_state() {
        assert_eq!(
            neut_particle_state(1, &part(-1, false, 14)).unwrap(),
            ParticleState::Initial
        );
    }

    #[test]
    fn cc_status_two_is_fsi() {
        assert_eq!(neut_particle_state(1, &part(2, true, 2212)).unwrap(), ParticleState::Fsi);
    }

    #[test]
    fn nc_outgoing_neutrino_is_final() {
        // Same status code, different meaning for the NC neutrino.
        assert_eq!(neut_particle_state(51, &part(2, false, 14)).unwrap(), ParticleState::Final);
        assert_eq!(neut_particle_state(51, &part(2, true, 14)).unwrap(), ParticleState::Final);
        // A hadron with status 2 in the same NC event re-interacted.
        assert_eq!(neut_particle_state(51, &part(2, true, 2212)).unwrap(), ParticleState::Fsi);
    }

    #[test]
    fn alive_status_zero_is_final() {
        assert_eq!(neut_particle_state(1, &part(0, true, 13)).unwrap(), ParticleState::Final);
    }

    #[test]
    fn unknown_alive_combination_is_fatal() {
        assert!(matches!(
            neut_particle_state(1, &part(5, true, 2212)),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn dead_unmatched_is_undefined() {
        assert_eq!(
            neut_particle_state(1, &part(5, false, 2212)).unwrap(),
            ParticleState::Undefined
        );
    }
}
