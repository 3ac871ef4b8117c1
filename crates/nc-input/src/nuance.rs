//! NUANCE input handler.

use crate::handler::{HandlerCore, InputHandler};
use crate::joint::JointInputBuilder;
use crate::loader::load_sample;
use nc_core::{modes, CanonicalEvent, Error, FourVector, ParticleState, Result};
use nc_io::records::nuance::{NuanceRecord, TREE_NAME};
use nc_io::Spectrum;
use std::path::PathBuf;

/// Reads NUANCE sample files: a channel-number table plus a fixed
/// neutrino/target/leptons/hadrons event layout, all in MeV.
pub struct NuanceInput {
    core: HandlerCore,
    entries: Vec<NuanceRecord>,
}

/// Translate a NUANCE channel number into the canonical signed mode.
///
/// The channel list is closed; an unknown channel means the file was
/// produced by an incompatible NUANCE version and is rejected.
pub fn nuance_mode(channel: i32, neutrino_pdg: i32, target_pdg: i32) -> Result<i32> {
    let sg = if neutrino_pdg < 0 { -1 } else { 1 };
    let m = match channel {
        // Cabibbo-allowed quasi-elastic.
        1 => modes::CCQE,
        // NC elastic, split by target nucleon.
        2 => {
            if target_pdg == 2212 {
                modes::NCEL_P
            } else {
                modes::NCEL_N
            }
        }
        // Single-pion production via the Delta, nu and nubar blocks.
        3 | 10 => modes::CC_1PIP_P,
        4 | 11 => modes::CC_1PI0_N,
        5 | 12 => modes::CC_1PIP_N,
        6 | 13 => modes::NC_1PI0_P,
        7 | 14 => modes::NC_1PIP_P,
        8 | 15 => modes::NC_1PI0_N,
        9 | 16 => modes::NC_1PIM_N,
        // Multi-pion resonant production.
        17..=21 | 28..=32 | 73 | 76 | 79 | 80 | 85 | 86 => modes::CC_MULTIPI,
        22..=27 | 33..=38 | 74 | 75 | 77 | 78 | 81..=84 | 87..=90 => modes::NC_MULTIPI,
        // Eta production.
        39..=41 | 46..=48 | 67 | 70 => modes::CC_1ETA_N,
        42 | 43 | 49 | 50 | 68 | 69 | 71 => modes::NC_1ETA_P,
        44 | 45 | 51 | 52 | 72 => modes::NC_1ETA_N,
        // Kaon production.
        53..=55 | 60..=63 => modes::CC_1KAON_P,
        57..=59 | 64 | 65 => modes::NC_1KAON_0,
        56 | 66 => modes::NC_1KAON_P,
        // Deep inelastic.
        91 => modes::CC_DIS,
        92 => modes::NC_DIS,
        // Delta radiative decay.
        93 => modes::CC_1GAMMA,
        94 => modes::NC_1GAMMA_P,
        // Coherent pion production.
        96 => modes::NC_COHERENT,
        97 => modes::CC_COHERENT,
        // Channels with no canonical counterpart.
        95 | 98 | 99 => modes::MODE_UNKNOWN,
        other => {
            return Err(Error::Validation(format!("unknown NUANCE channel ID {other}")));
        }
    };
    Ok(sg * m)
}

impl NuanceInput {
    /// Open one or more NUANCE sample files as a single (joint) input.
    pub fn open(handle: &str, files: &[PathBuf]) -> Result<Self> {
        tracing::info!(handle, "creating NUANCE input handler");
        let mut builder = JointInputBuilder::new();
        let mut entries = Vec::new();
        for path in files {
            let (tree, flux, event_rate) = load_sample::<NuanceRecord>(
                path,
                TREE_NAME,
                "run the NUANCE preparation step to attach flux/event-rate spectra",
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

        ev.mode = nuance_mode(rec.channel, rec.neutrino, rec.target)?;
        ev.total_xsec = 1.0;
        ev.target_a = 0;
        ev.target_z = 0;
        ev.target_h = 0;
        ev.bound = false;

        let npart = 2 + rec.leptons.len() + rec.hadrons.len();
        if npart > ev.capacity() {
            tracing::warn!(npart, "NUANCE event exceeds particle stack; expanding");
            ev.expand_stack(npart);
        }

        ev.push_particle(
            FourVector::from(rec.p_neutrino),
            rec.neutrino,
            ParticleState::Initial,
            true,
        );
        ev.push_particle(FourVector::from(rec.p_targ), rec.target, ParticleState::Initial, true);
        for lepton in &rec.leptons {
            ev.push_particle(FourVector::from(lepton.p), lepton.pdg, ParticleState::Final, true);
        }
        for hadron in &rec.hadrons {
            ev.push_particle(FourVector::from(hadron.p), hadron.pdg, ParticleState::Final, true);
        }

        ev.order_stack();
        ev.cache_probe();
        Ok(())
    }
}

impl InputHandler for NuanceInput {
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
