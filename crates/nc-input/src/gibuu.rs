//! GiBUU input handler.

use crate::ensemble::EnsembleInputBuilder;
use crate::handler::{HandlerCore, InputHandler};
use crate::loader::load_sample;
use nc_core::{modes, CanonicalEvent, Error, FourVector, ParticleState, Result};
use nc_io::records::gibuu::{GibuuRecord, TREE_NAME};
use nc_io::Spectrum;
use std::path::PathBuf;

/// Radius inside which a transported particle is still part of the
/// nucleus, in fm. A guess that holds up to argon; too few transport time
/// steps can still confuse it.
const NUCLEAR_RADIUS_FM: f64 = 6.0;

/// Reads GiBUU sample files. GiBUU output is run-averaged rather than
/// per-file normalized, so files register through the ensemble strategy,
/// and every event carries a native weight that folds into the input
/// weight.
pub struct GibuuInput {
    core: HandlerCore,
    entries: Vec<GibuuRecord>,
}

/// Translate a GiBUU event type into the canonical signed mode.
pub fn gibuu_mode(
    ev_type: i32,
    process_id: i32,
    struck_nucleon_pdg: i32,
    first_part_pdg: i32,
) -> i32 {
    let is_cc = process_id.abs() == 2;
    let sign = if process_id > 0 { 1 } else { -1 };

    match ev_type {
        // QE / elastic
        1 => {
            if is_cc {
                sign * modes::CCQE
            } else {
                sign * if struck_nucleon_pdg == 2212 { modes::NCEL_P } else { modes::NCEL_N }
            }
        }
        // The resonance block: single-pion channels decided by the struck
        // nucleon and the leading final-state particle.
        2..=31 => {
            if is_cc {
                if sign > 0 {
                    if struck_nucleon_pdg == 2212 {
                        modes::CC_1PIP_P
                    } else if first_part_pdg == 111 {
                        modes::CC_1PI0_N
                    } else {
                        modes::CC_1PIP_N
                    }
                } else if struck_nucleon_pdg == 2112 {
                    -modes::CC_1PIP_P
                } else if first_part_pdg == 111 {
                    -modes::CC_1PI0_N
                } else {
                    -modes::CC_1PIP_N
                }
            } else if struck_nucleon_pdg == 2212 {
                sign * if first_part_pdg == 111 { modes::NC_1PI0_P } else { modes::NC_1PIP_P }
            } else {
                sign * if first_part_pdg == 111 { modes::NC_1PI0_N } else { modes::NC_1PIM_N }
            }
        }
        // Single-pion background
        32 | 33 => sign * if is_cc { modes::CC_1PIP_P } else { modes::NC_1PI0_N },
        // DIS
        34 => sign * if is_cc { modes::CC_DIS } else { modes::NC_DIS },
        // 2p2h
        35 | 36 => sign * if is_cc { modes::CC_2P2H } else { 42 },
        // Multi-pion
        37 => sign * if is_cc { modes::CC_MULTIPI } else { modes::NC_MULTIPI },
        _ => {
            tracing::warn!(ev_type, "unable to map GiBUU event type to a canonical mode");
            modes::MODE_UNKNOWN
        }
    }
}

/// PDG of the incoming neutrino from flavor and process IDs.
pub fn gibuu_nu_pdg(flavor_id: i32, process_id: i32) -> i32 {
    let pdg = match flavor_id {
        1 => 12,
        2 => 14,
        3 => 16,
        _ => 0,
    };
    if process_id < 0 {
        -pdg
    } else {
        pdg
    }
}

/// PDG of the outgoing lepton; electron scattering is not supported.
pub fn gibuu_lepton_pdg(flavor_id: i32, process_id: i32) -> Result<i32> {
    let nu = gibuu_nu_pdg(flavor_id, process_id);
    match process_id.abs() {
        1 => Err(Error::Config(
            "GiBUU file includes electron-scattering events, which are not supported".into(),
        )),
        3 => Ok(nu),
        2 => Ok(if nu > 0 { nu - 1 } else { nu + 1 }),
        other => Err(Error::Config(format!("unknown GiBUU process ID {other}"))),
    }
}

fn onshell_mass_gev(pdg: i32) -> Option<f64> {
    // Nucleon and pion masses match the transport code's internal values.
    match pdg.abs() {
        2212 | 2112 => Some(0.938),
        211 | 111 => Some(0.138),
        11 => Some(0.000511),
        13 => Some(0.1057),
        15 => Some(1.777),
        12 | 14 | 16 | 22 => Some(0.0),
        321 | 311 => Some(0.494),
        221 => Some(0.548),
        3122 => Some(1.116),
        _ => None,
    }
}

/// Classify a transported GiBUU particle by its energy and position.
pub fn gibuu_particle_state(e_gev: f64, pdg: i32, dist_fm: f64, target_a: i32) -> ParticleState {
    // Still inside the nucleus: not final state.
    if dist_fm < NUCLEAR_RADIUS_FM && target_a > 1 {
        return ParticleState::Fsi;
    }
    match onshell_mass_gev(pdg) {
        // Unknown species default to on-shell.
        None => ParticleState::Final,
        Some(m) => {
            if e_gev < m {
                ParticleState::Fsi
            } else {
                ParticleState::Final
            }
        }
    }
}

impl GibuuInput {
    /// Open one or more GiBUU sample files as one ensemble-normalized
    /// input.
    pub fn open(handle: &str, files: &[PathBuf]) -> Result<Self> {
        tracing::info!(handle, "creating GiBUU input handler");
        let mut builder = EnsembleInputBuilder::new();
        let mut entries = Vec::new();
        for path in files {
            let (tree, flux, event_rate) = load_sample::<GibuuRecord>(
                path,
                TREE_NAME,
                "run the GiBUU preparation step to attach flux/event-rate spectra",
            )?;
            let first = &tree[0];
            builder.register(
                path.display().to_string(),
                first.process_id,
                first.flavor_id,
                first.nucleus_a,
                tree.len(),
                flux,
                event_rate,
            )?;
            entries.extend(tree);
        }
        let core = HandlerCore::new(handle, builder.finalize()?);
        Ok(Self { core, entries })
    }

    fn fill_kinematics(&mut self, entry: usize) -> Result<()> {
        let rec = &self.entries[entry];
        let ev = &mut self.core.event;
        ev.reset();
        ev.event_no = entry as u32;

        let first_part_pdg = rec.parts.first().map_or(0, |p| p.pdg);
        ev.mode = gibuu_mode(rec.ev_type, rec.process_id, rec.struck_nucleon_pdg(), first_part_pdg);
        ev.target_a = rec.nucleus_a;
        ev.target_z = rec.nucleus_z;
        ev.target_h = 0;
        ev.bound = false;

        // GiBUU events are not equally weighted.
        ev.weights.input = rec.weight;

        // Leptons and the struck nucleon come first, then transported
        // hadrons.
        let npart = rec.parts.len() + 3;
        if npart > ev.capacity() {
            tracing::warn!(npart, "GiBUU event exceeds particle stack; expanding");
            ev.expand_stack(npart);
        }

        let gev = |p: [f64; 4]| FourVector::new(p[0] * 1e3, p[1] * 1e3, p[2] * 1e3, p[3] * 1e3);
        ev.push_particle(
            gev(rec.lep_in),
            gibuu_nu_pdg(rec.flavor_id, rec.process_id),
            ParticleState::Initial,
            true,
        );
        ev.push_particle(
            gev(rec.lep_out),
            gibuu_lepton_pdg(rec.flavor_id, rec.process_id)?,
            ParticleState::Final,
            true,
        );
        ev.push_particle(gev(rec.nuc), rec.struck_nucleon_pdg(), ParticleState::Initial, true);

        for part in &rec.parts {
            let dist =
                (part.pos[0] * part.pos[0] + part.pos[1] * part.pos[1] + part.pos[2] * part.pos[2])
                    .sqrt();
            // Particles still inside the nucleus are dropped outright.
            if dist < NUCLEAR_RADIUS_FM && rec.nucleus_a > 1 {
                tracing::debug!(pdg = part.pdg, dist, "dropping in-nucleus particle");
                continue;
            }
            let state = gibuu_particle_state(part.p[3], part.pdg, dist, rec.nucleus_a);
            ev.push_particle(gev(part.p), part.pdg, state, true);
        }

        ev.order_stack();
        ev.cache_probe();
        Ok(())
    }
}

impl InputHandler for GibuuInput {
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
        // Native weight times the ensemble scale factor.
        let scale = self.core.input_weight(entry);
        self.core.event.weights.input *= scale;
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

    #[test]
    fn qe_modes() {
        assert_eq!(gibuu_mode(1, 2, 2112, 0), 1);
        assert_eq!(gibuu_mode(1, -2, 2112, 0), -1);
        assert_eq!(gibuu_mode(1, 3, 2212, 0), 51);
        assert_eq!(gibuu_mode(1, -3, 2112, 0), -52);
    }

    #[test]
    fn resonance_block() {
        assert_eq!(gibuu_mode(2, 2, 2212, 211), 11);
        assert_eq!(gibuu_mode(17, 2, 2112, 111), 12);
        assert_eq!(gibuu_mode(31, 2, 2112, 211), 13);
        assert_eq!(gibuu_mode(2, -2, 2112, 0), -11);
        assert_eq!(gibuu_mode(5, 3, 2212, 111), 32);
        assert_eq!(gibuu_mode(5, 3, 2112, 211), 33);
    }

    #[test]
    fn bulk_modes() {
        assert_eq!(gibuu_mode(34, 2, 0, 0), 26);
        assert_eq!(gibuu_mode(34, -3, 0, 0), -46);
        assert_eq!(gibuu_mode(35, 2, 0, 0), 2);
        assert_eq!(gibuu_mode(37, -2, 0, 0), -21);
        assert_eq!(gibuu_mode(99, 2, 0, 0), 0);
    }

    #[test]
    fn lepton_pdgs() {
        assert_eq!(gibuu_nu_pdg(2, 2), 14);
        assert_eq!(gibuu_nu_pdg(2, -2), -14);
        assert_eq!(gibuu_lepton_pdg(2, 2).unwrap(), 13);
        assert_eq!(gibuu_lepton_pdg(2, -2).unwrap(), -13);
        assert_eq!(gibuu_lepton_pdg(1, 3).unwrap(), 12);
        assert!(gibuu_lepton_pdg(2, 1).is_err());
    }

    #[test]
    fn transported_particle_states() {
        // Inside the nucleus.
        assert_eq!(gibuu_particle_state(1.0, 2212, 3.0, 12), ParticleState::Fsi);
        // Hydrogen is exempt from the radius cut.
        assert_eq!(gibuu_particle_state(1.0, 2212, 3.0, 1), ParticleState::Final);
        // Off-shell outside the nucleus.
        assert_eq!(gibuu_particle_state(0.5, 2212, 10.0, 12), ParticleState::Fsi);
        // On-shell outside.
        assert_eq!(gibuu_particle_state(1.1, 2212, 10.0, 12), ParticleState::Final);
        // Unknown species default to final.
        assert_eq!(gibuu_particle_state(0.01, 4444, 10.0, 12), ParticleState::Final);
    }
}
