//! GENIE input handler.

use crate::handler::{HandlerCore, InputHandler};
use crate::joint::JointInputBuilder;
use crate::loader::load_sample;
use nc_core::{modes, CanonicalEvent, FourVector, ParticleState, Result};
use nc_io::records::genie::{
    status, GenieCurrent, GeniePart, GenieRecord, GenieScattering, TREE_NAME,
};
use nc_io::Spectrum;
use std::path::PathBuf;

/// Reads GENIE sample files: GHep status classification plus reaction-code
/// translation. Momenta are GeV natively and converted to MeV here.
pub struct GenieInput {
    core: HandlerCore,
    entries: Vec<GenieRecord>,
}

/// Classify one GHep particle.
///
/// Unmatched status codes coerce to `Undefined`; GENIE grows new codes
/// between releases and an unknown one is not worth killing a run over.
pub fn genie_particle_state(part: &GeniePart, event_mode: i32) -> ParticleState {
    let mut state = match part.status {
        status::NUCLEON_TARGET
        | status::INITIAL
        | status::CORRELATED_NUCLEON
        | status::NUCLEON_CLUSTER_TARGET => ParticleState::Initial,

        status::STABLE_FINAL => ParticleState::Final,

        // For 2p2h the in-nucleus hadrons are the initial nucleon pair.
        status::HADRON_IN_NUCLEUS => {
            if event_mode.abs() == 2 {
                ParticleState::Initial
            } else {
                ParticleState::Fsi
            }
        }

        status::PREDECAY_RESONANT | status::DIS_PREFRAG | status::INTERMEDIATE => {
            ParticleState::Fsi
        }

        _ => ParticleState::Undefined,
    };

    // Nuclei ride along under their own state pair.
    if part.pdg > 1_000_000 {
        state = match state {
            ParticleState::Initial => ParticleState::NuclearInitial,
            ParticleState::Final => ParticleState::NuclearRemnant,
            s => s,
        };
    }

    state
}

fn count_final(parts: &[GeniePart], pdg: i32) -> usize {
    parts.iter().filter(|p| p.status == status::STABLE_FINAL && p.pdg == pdg).count()
}

/// Translate a GENIE process summary into the canonical signed mode.
///
/// Unrecognized combinations canonicalize to 0 with a warning.
pub fn genie_reaction_code(rec: &GenieRecord) -> i32 {
    let sign = if rec.probe_pdg < 0 { -1 } else { 1 };
    let on_proton = rec.hit_nucleon_pdg == 2212;
    let fs_pi0 = count_final(&rec.parts, 111) > 0;

    match rec.current {
        GenieCurrent::Electromagnetic => {
            if rec.probe_pdg.abs() == 11 {
                match rec.scattering {
                    GenieScattering::QuasiElastic => 1,
                    GenieScattering::Mec => 2,
                    GenieScattering::Resonant => 13,
                    GenieScattering::DeepInelastic => 26,
                    _ => {
                        tracing::warn!(?rec.scattering, "unknown GENIE electron-scattering mode");
                        modes::MODE_UNKNOWN
                    }
                }
            } else {
                modes::MODE_UNKNOWN
            }
        }

        GenieCurrent::ChargedCurrent => match rec.scattering {
            GenieScattering::QuasiElastic | GenieScattering::Elastic => sign * modes::CCQE,
            GenieScattering::Mec => sign * modes::CC_2P2H,
            GenieScattering::Resonant => {
                // Single-pion channel from the struck nucleon and the
                // final-state pion charge.
                if sign > 0 {
                    if on_proton {
                        sign * modes::CC_1PIP_P
                    } else if fs_pi0 {
                        sign * modes::CC_1PI0_N
                    } else {
                        sign * modes::CC_1PIP_N
                    }
                } else if !on_proton {
                    sign * modes::CC_1PIP_P
                } else if fs_pi0 {
                    sign * modes::CC_1PI0_N
                } else {
                    sign * modes::CC_1PIP_N
                }
            }
            GenieScattering::DeepInelastic => sign * modes::CC_DIS,
            GenieScattering::Coherent => sign * modes::CC_COHERENT,
            GenieScattering::InverseMuDecay => sign * modes::INV_MU_DECAY,
            GenieScattering::NuElectronElastic => sign * modes::NU_E_ELASTIC,
            _ => {
                tracing::warn!(?rec.scattering, "unknown GENIE CC scattering mode");
                modes::MODE_UNKNOWN
            }
        },

        GenieCurrent::NeutralCurrent => match rec.scattering {
            GenieScattering::QuasiElastic | GenieScattering::Elastic => {
                if on_proton {
                    sign * modes::NCEL_P
                } else {
                    sign * modes::NCEL_N
                }
            }
            // Kept at the NC1pi0p slot rather than NC2p2h to match the
            // established canonical numbering of NC MEC events.
            GenieScattering::Mec => sign * modes::NC_1PI0_P,
            GenieScattering::Resonant => {
                if on_proton {
                    if fs_pi0 {
                        sign * modes::NC_1PI0_P
                    } else {
                        sign * modes::NC_1PIP_P
                    }
                } else if fs_pi0 {
                    sign * modes::NC_1PI0_N
                } else {
                    sign * modes::NC_1PIM_N
                }
            }
            GenieScattering::DeepInelastic => sign * modes::NC_DIS,
            GenieScattering::Coherent => sign * modes::NC_COHERENT,
            GenieScattering::NuElectronElastic => sign * modes::NU_E_ELASTIC,
            _ => {
                tracing::warn!(?rec.scattering, "unknown GENIE NC scattering mode");
                modes::MODE_UNKNOWN
            }
        },
    }
}

impl GenieInput {
    /// Open one or more GENIE sample files as a single (joint) input.
    pub fn open(handle: &str, files: &[PathBuf]) -> Result<Self> {
        tracing::info!(handle, "creating GENIE input handler");
        let mut builder = JointInputBuilder::new();
        let mut entries = Vec::new();
        for path in files {
            let (tree, flux, event_rate) = load_sample::<GenieRecord>(
                path,
                TREE_NAME,
                "run the GENIE preparation step to attach flux/event-rate spectra",
            )?;
            builder.register(path.display().to_string(), tree.len(), flux, event_rate)?;
            entries.extend(tree);
        }
        let core = HandlerCore::new(handle, builder.finalize()?);
        Ok(Self { core, entries })
    }

    fn fill_kinematics(&mut self, entry: usize) {
        let rec = &self.entries[entry];
        let ev = &mut self.core.event;
        ev.reset();

        ev.mode = genie_reaction_code(rec);
        ev.total_xsec = rec.xsec;
        ev.target_a = 0;
        ev.target_z = 0;
        ev.target_h = 0;
        ev.bound = false;

        let npart = rec.parts.len();
        if npart > ev.capacity() {
            tracing::warn!(npart, "GENIE event exceeds particle stack; expanding");
            ev.expand_stack(npart);
        }

        for part in &rec.parts {
            let state = genie_particle_state(part, ev.mode);
            let mom = FourVector::new(
                part.p[0] * 1.0e3,
                part.p[1] * 1.0e3,
                part.p[2] * 1.0e3,
                part.p[3] * 1.0e3,
            );
            ev.push_particle(mom, part.pdg, state, true);
        }

        ev.order_stack();
        ev.cache_probe();
    }
}

impl InputHandler for GenieInput {
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
        self.fill_kinematics(entry);
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
