//! On-disk fixtures shared by the integration tests.

use nc_io::records::neut::{NeutPart, NeutRecord};
use nc_io::{SampleFile, Spectrum};
use std::path::Path;

/// Uniform 2-bin spectrum on [0, 2] GeV with the requested
/// width-weighted integral.
pub fn spectrum(name: &str, integral_width: f64) -> Spectrum {
    Spectrum::uniform(name, 2, 0.0, 2.0, vec![integral_width / 2.0, integral_width / 2.0])
        .unwrap()
}

/// One CCQE-like NEUT event with its particles deliberately out of
/// canonical order: [final mu, initial nu, FSI p, initial n].
pub fn neut_event(event_no: u32) -> NeutRecord {
    NeutRecord {
        mode: 1,
        event_no,
        target_a: 12,
        target_z: 6,
        target_h: 0,
        bound: true,
        parts: vec![
            NeutPart { status: 0, is_alive: true, pdg: 13, p: [30.0, 0.0, 450.0, 470.0] },
            NeutPart { status: -1, is_alive: false, pdg: 14, p: [0.0, 0.0, 600.0, 600.0] },
            NeutPart { status: 2, is_alive: true, pdg: 2212, p: [10.0, 5.0, 80.0, 942.0] },
            NeutPart { status: -1, is_alive: false, pdg: 2112, p: [-5.0, 2.0, 1.0, 939.6] },
        ],
    }
}

/// Write a NEUT sample file with `n_events` identical events and the
/// given spectrum normalizations.
pub fn write_neut_sample(
    path: &Path,
    n_events: usize,
    flux_integral: f64,
    rate_integral: f64,
) {
    let events: Vec<NeutRecord> = (0..n_events).map(|i| neut_event(i as u32)).collect();
    let mut file = SampleFile::create();
    file.insert_spectrum(spectrum("flux_numu", flux_integral));
    file.insert_spectrum(spectrum("evtrt_numu", rate_integral));
    file.insert_tree(nc_io::records::neut::TREE_NAME, &events).unwrap();
    file.write(path).unwrap();
}
