//! NuWro input handler.

use crate::handler::{HandlerCore, InputHandler};
use crate::joint::JointInputBuilder;
use crate::loader::load_sample;
use nc_core::{modes, CanonicalEvent, FourVector, ParticleState, Result};
use nc_io::records::nuwro::{NuwroRecord, TREE_NAME};
use nc_io::Spectrum;
use std::path::PathBuf;

/// Reads NuWro sample files. NuWro carries no mode number; the canonical
/// code is derived from its dynamics flags plus the primary-vertex
/// final-state multiplicities.
pub struct NuwroInput {
    core: HandlerCore,
    entries: Vec<NuwroRecord>,
}

const PROTON: i32 = 2212;
const NEUTRON: i32 = 2112;
const PI0: i32 = 111;
const PIP: i32 = 211;
const PIM: i32 = -211;
const ETA: i32 = 221;
const LAMBDA: i32 = 3122;
const K0: i32 = 311;
const KP: i32 = 321;

/// Derive the canonical signed mode from NuWro event flags.
///
/// Returns `MODE_UNSET` when no flag combination matches; the caller maps
/// that (and anything out of the canonical range) to unknown.
pub fn nuwro_mode(e: &NuwroRecord) -> i32 {
    let sign = if e.flag.anty { -1 } else { 1 };

    if e.flag.qel {
        if e.flag.cc {
            return sign * modes::CCQE;
        }
        if e.nof(PROTON) > 0 {
            return sign * modes::NCEL_P;
        }
        if e.nof(NEUTRON) > 0 {
            return sign * modes::NCEL_N;
        }
    }

    if e.flag.mec {
        return sign * modes::CC_2P2H;
    }

    if e.flag.res {
        let n_pi = e.nof(PI0) + e.nof(PIP) + e.nof(PIM);
        let n_kaon = e.nof(K0) + e.nof(KP);

        // Zero or several pions at the primary vertex: multi-pion bucket.
        if n_pi != 1 {
            return sign * if e.flag.cc { modes::CC_MULTIPI } else { modes::NC_MULTIPI };
        }

        if e.flag.cc {
            if e.flag.anty {
                if e.nof(NEUTRON) > 0 && e.nof(PIM) > 0 {
                    return -modes::CC_1PIP_P;
                }
                if e.nof(NEUTRON) > 0 && e.nof(PI0) > 0 {
                    return -modes::CC_1PI0_N;
                }
                if e.nof(PROTON) > 0 && e.nof(PIM) > 0 {
                    return -modes::CC_1PIP_N;
                }
            } else {
                if e.nof(PROTON) > 0 && e.nof(PIP) > 0 {
                    return modes::CC_1PIP_P;
                }
                if e.nof(PROTON) > 0 && e.nof(PI0) > 0 {
                    return modes::CC_1PI0_N;
                }
                if e.nof(NEUTRON) > 0 && e.nof(PIP) > 0 {
                    return modes::CC_1PIP_N;
                }
            }
        } else if e.nof(PROTON) > 0 {
            if e.nof(PIM) > 0 {
                return sign * modes::NC_1PIM_N;
            }
            if e.nof(PI0) > 0 {
                return sign * modes::NC_1PI0_P;
            }
        } else if e.nof(NEUTRON) > 0 {
            if e.nof(PIP) > 0 {
                return sign * modes::NC_1PIP_P;
            }
            if e.nof(PI0) > 0 {
                return sign * modes::NC_1PI0_N;
            }
        }

        if e.nof(ETA) > 0 {
            if e.flag.cc {
                return sign * modes::CC_1ETA_N;
            }
            if e.nof(NEUTRON) > 0 {
                return sign * modes::NC_1ETA_N;
            }
            if e.nof(PROTON) > 0 {
                return sign * modes::NC_1ETA_P;
            }
        }

        if e.nof(LAMBDA) == 1 && n_kaon == 1 {
            if e.flag.anty {
                if e.flag.cc && e.nof(K0) > 0 {
                    return -modes::CC_1KAON_P;
                }
                if e.nof(K0) > 0 {
                    return -modes::NC_1KAON_0;
                }
                if e.nof(KP) > 0 {
                    return -modes::NC_1KAON_P;
                }
            } else {
                if e.flag.cc && e.nof(KP) > 0 {
                    return modes::CC_1KAON_P;
                }
                if e.nof(K0) > 0 {
                    return modes::NC_1KAON_0;
                }
                if e.nof(KP) > 0 {
                    return modes::NC_1KAON_P;
                }
            }
        }
    }

    if e.flag.coh {
        // Coherent production is only generated on oxygen.
        if e.target_a() == 16 {
            if e.flag.anty {
                if e.flag.cc && e.nof(PIM) > 0 {
                    return -modes::CC_COHERENT;
                }
                if e.nof(PI0) > 0 {
                    return -modes::NC_COHERENT;
                }
            } else {
                if e.flag.cc && e.nof(PIP) > 0 {
                    return modes::CC_COHERENT;
                }
                if e.nof(PI0) > 0 {
                    return modes::NC_COHERENT;
                }
            }
        }
    }

    if e.flag.dis {
        return sign * if e.flag.cc { modes::CC_DIS } else { modes::NC_DIS };
    }

    modes::MODE_UNSET
}

impl NuwroInput {
    /// Open one or more NuWro sample files as a single (joint) input.
    pub fn open(handle: &str, files: &[PathBuf]) -> Result<Self> {
        tracing::info!(handle, "creating NuWro input handler");
        let mut builder = JointInputBuilder::new();
        let mut entries = Vec::new();
        for path in files {
            let (tree, flux, event_rate) = load_sample::<NuwroRecord>(
                path,
                TREE_NAME,
                "run the NuWro preparation step to attach flux/event-rate spectra",
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

        let mode = nuwro_mode(rec);
        ev.mode = if mode.abs() > 60 {
            tracing::warn!(mode, "failed NuWro mode derivation");
            modes::MODE_UNKNOWN
        } else {
            mode
        };

        ev.target_a = rec.target_a();
        ev.target_z = rec.par.nucleus_p;
        ev.target_h = 0;
        ev.bound = rec.target_a() > 1;

        let npart = rec.in_parts.len() + rec.post.len();
        if npart > ev.capacity() {
            tracing::warn!(npart, "NuWro event exceeds particle stack; expanding");
            ev.expand_stack(npart);
        }

        // Incoming vector is the initial state; the post-FSI vector is the
        // observable final state. The primary-vertex `out` list only feeds
        // mode derivation.
        for part in &rec.in_parts {
            ev.push_particle(FourVector::from(part.p), part.pdg, ParticleState::Initial, true);
        }
        for part in &rec.post {
            ev.push_particle(FourVector::from(part.p), part.pdg, ParticleState::Final, true);
        }

        ev.order_stack();
        ev.cache_probe();
    }
}

impl InputHandler for NuwroInput {
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

#[cfg(test)]
mod tests {
    use super::*;
    use nc_io::records::nuwro::{NuwroFlags, NuwroParams, NuwroPart};

    fn part(pdg: i32) -> NuwroPart {
        NuwroPart { pdg, p: [0.0, 0.0, 1.0, 1.0] }
    }

    fn event(flag: NuwroFlags, out: Vec<NuwroPart>) -> NuwroRecord {
        NuwroRecord {
            flag,
            par: NuwroParams { nucleus_p: 8, nucleus_n: 8 },
            in_parts: vec![part(14), part(2112)],
            out,
            post: vec![part(13), part(2212)],
        }
    }

    #[test]
    fn quasi_elastic() {
        let f = NuwroFlags { qel: true, cc: true, ..Default::default() };
        assert_eq!(nuwro_mode(&event(f, vec![])), 1);
        let f = NuwroFlags { qel: true, cc: true, anty: true, ..Default::default() };
        assert_eq!(nuwro_mode(&event(f, vec![])), -1);
        let f = NuwroFlags { qel: true, ..Default::default() };
        assert_eq!(nuwro_mode(&event(f, vec![part(2212)])), 51);
        assert_eq!(nuwro_mode(&event(f, vec![part(2112)])), 52);
    }

    #[test]
    fn resonant_single_pion() {
        let f = NuwroFlags { res: true, cc: true, ..Default::default() };
        assert_eq!(nuwro_mode(&event(f, vec![part(2212), part(211)])), 11);
        assert_eq!(nuwro_mode(&event(f, vec![part(2212), part(111)])), 12);
        assert_eq!(nuwro_mode(&event(f, vec![part(2112), part(211)])), 13);

        let f = NuwroFlags { res: true, ..Default::default() };
        assert_eq!(nuwro_mode(&event(f, vec![part(2112), part(111)])), 31);
        assert_eq!(nuwro_mode(&event(f, vec![part(2212), part(-211)])), 33);
    }

    #[test]
    fn multipi_and_dis() {
        let f = NuwroFlags { res: true, cc: true, ..Default::default() };
        assert_eq!(nuwro_mode(&event(f, vec![part(211), part(211)])), 21);
        let f = NuwroFlags { res: true, ..Default::default() };
        assert_eq!(nuwro_mode(&event(f, vec![part(2112)])), 41);
        let f = NuwroFlags { dis: true, cc: true, anty: true, ..Default::default() };
        assert_eq!(nuwro_mode(&event(f, vec![])), -26);
        let f = NuwroFlags { dis: true, ..Default::default() };
        assert_eq!(nuwro_mode(&event(f, vec![])), 46);
    }

    #[test]
    fn coherent_needs_oxygen() {
        let f = NuwroFlags { coh: true, cc: true, ..Default::default() };
        let mut e = event(f, vec![part(211)]);
        assert_eq!(nuwro_mode(&e), 16);
        e.par = NuwroParams { nucleus_p: 6, nucleus_n: 6 };
        assert_eq!(nuwro_mode(&e), modes::MODE_UNSET);
    }

    #[test]
    fn unmatched_flags_leave_mode_unset() {
        let f = NuwroFlags::default();
        assert_eq!(nuwro_mode(&event(f, vec![])), modes::MODE_UNSET);
    }
}
