//! Canonical interaction-mode codes.
//!
//! The canonical numbering follows the NEUT reaction-code convention: the
//! magnitude selects the process family, the sign selects neutrino (+) vs
//! antineutrino (-). Charged-current families sit at |mode| <= 30,
//! neutral-current families above. Every other generator's native mode
//! taxonomy is translated onto these codes by its input handler.

/// Sentinel for "mode not yet computed" (a freshly reset event).
pub const MODE_UNSET: i32 = 9999;

/// Sentinel for "translation failed"; never fatal.
pub const MODE_UNKNOWN: i32 = 0;

/// Charged-current quasi-elastic.
pub const CCQE: i32 = 1;
/// Charged-current 2p2h / meson-exchange current.
pub const CC_2P2H: i32 = 2;
/// CC single pi+ on proton.
pub const CC_1PIP_P: i32 = 11;
/// CC single pi0 on neutron.
pub const CC_1PI0_N: i32 = 12;
/// CC single pi+ on neutron.
pub const CC_1PIP_N: i32 = 13;
/// CC diffractive single-pion production.
pub const CC_DIFF_SPP: i32 = 15;
/// CC coherent pion production.
pub const CC_COHERENT: i32 = 16;
/// CC single-gamma production.
pub const CC_1GAMMA: i32 = 17;
/// CC multi-pion production.
pub const CC_MULTIPI: i32 = 21;
/// CC single eta on neutron.
pub const CC_1ETA_N: i32 = 22;
/// CC single kaon on proton.
pub const CC_1KAON_P: i32 = 23;
/// CC deep-inelastic scattering.
pub const CC_DIS: i32 = 26;
/// NC single pi0 on neutron.
pub const NC_1PI0_N: i32 = 31;
/// NC single pi0 on proton.
pub const NC_1PI0_P: i32 = 32;
/// NC single pi- on neutron.
pub const NC_1PIM_N: i32 = 33;
/// NC single pi+ on proton.
pub const NC_1PIP_P: i32 = 34;
/// NC diffractive single-pion production.
pub const NC_DIFF_SPP: i32 = 35;
/// NC coherent pion production.
pub const NC_COHERENT: i32 = 36;
/// NC single gamma on neutron.
pub const NC_1GAMMA_N: i32 = 38;
/// NC single gamma on proton.
pub const NC_1GAMMA_P: i32 = 39;
/// NC multi-pion production.
pub const NC_MULTIPI: i32 = 41;
/// NC single eta on neutron.
pub const NC_1ETA_N: i32 = 42;
/// NC single eta on proton.
pub const NC_1ETA_P: i32 = 43;
/// NC single K0.
pub const NC_1KAON_0: i32 = 44;
/// NC single K+.
pub const NC_1KAON_P: i32 = 45;
/// NC deep-inelastic scattering.
pub const NC_DIS: i32 = 46;
/// NC elastic on proton.
pub const NCEL_P: i32 = 51;
/// NC elastic on neutron.
pub const NCEL_N: i32 = 52;
/// NC 2p2h.
pub const NC_2P2H: i32 = 53;
/// Neutrino-electron elastic scattering.
pub const NU_E_ELASTIC: i32 = 54;
/// Inverse muon decay.
pub const INV_MU_DECAY: i32 = 55;

/// Is this mode/probe combination charged-current?
///
/// Electron probes are electromagnetic, never CC, regardless of mode.
pub fn is_cc(mode: i32, probe_pdg: i32) -> bool {
    if probe_pdg.abs() == 11 {
        return false;
    }
    mode.abs() <= 30
}

/// Is this mode/probe combination neutral-current?
pub fn is_nc(mode: i32, probe_pdg: i32) -> bool {
    !is_cc(mode, probe_pdg)
}

/// Is this a resonant single-pion mode?
pub fn is_resonant(mode: i32) -> bool {
    matches!(mode.abs(), 11 | 12 | 13 | 31 | 32 | 33 | 34)
}

/// Human-readable family name for diagnostics.
pub fn mode_name(mode: i32) -> &'static str {
    match mode.abs() {
        1 => "CCQE",
        2 => "CC2p2h",
        11 => "CC1pi+p",
        12 => "CC1pi0n",
        13 => "CC1pi+n",
        15 => "CCDiffSPP",
        16 => "CCCoherent",
        17 => "CC1gamma",
        21 => "CCmultipi",
        22 => "CC1eta",
        23 => "CC1kaon",
        26 => "CCDIS",
        31 => "NC1pi0n",
        32 => "NC1pi0p",
        33 => "NC1pi-n",
        34 => "NC1pi+p",
        35 => "NCDiffSPP",
        36 => "NCCoherent",
        38 => "NC1gamman",
        39 => "NC1gammap",
        41 => "NCmultipi",
        42 => "NC1etan",
        43 => "NC1etap",
        44 => "NC1kaon0",
        45 => "NC1kaon+",
        46 => "NCDIS",
        51 => "NCELp",
        52 => "NCELn",
        53 => "NC2p2h",
        54 => "NuEElastic",
        55 => "InvMuDecay",
        _ => "UNKNOWN",
    }
}
