//! Factory dispatch and the canonical interchange loop.

mod common;

use approx::assert_relative_eq;
use common::{spectrum, write_neut_sample};
use nc_core::ParticleState;
use nc_input::flat::write_canonical_file;
use nc_input::spline::SplineInput;
use nc_input::{InputFactory, InputHandler};
use nc_io::records::flat::{FlatRecord, SplineBlock};
use nc_io::records::gibuu::{GibuuPart, GibuuRecord};
use nc_io::SampleFile;

#[test]
fn factory_dispatches_by_prefix_and_by_guess() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("neut.json");
    write_neut_sample(&path, 10, 1.0, 5.0);
    let factory = InputFactory::new();

    let spec = format!("NEUT:{}", path.display());
    let mut handler = factory.create("explicit", &spec).unwrap();
    assert_eq!(handler.name(), "explicit");
    assert_eq!(handler.n_events(), 10);
    assert_eq!(handler.nuisance_event(3).unwrap().unwrap().mode, 1);

    // No prefix: the reserved tree name identifies the family.
    let mut guessed = factory.create("guessed", &path.display().to_string()).unwrap();
    assert_eq!(guessed.nuisance_event(0).unwrap().unwrap().mode, 1);
}

#[test]
fn unknown_type_and_bad_descriptor_are_rejected() {
    let factory = InputFactory::new();
    assert!(factory.create("x", "NOSUCH:file.json").is_err());
    assert!(factory.create("x", "NEUT:(a.json,b.json").is_err());
    assert!(factory.create("x", "").is_err());
}

#[test]
fn canonical_files_round_trip_through_the_generic_handler() {
    let dir = tempfile::tempdir().unwrap();
    let neut_path = dir.path().join("neut.json");
    write_neut_sample(&neut_path, 10, 1.0, 5.0);

    let factory = InputFactory::new();
    let mut source = factory.create("src", &format!("NEUT:{}", neut_path.display())).unwrap();

    // Convert every event to the flat interchange layout.
    let mut records = Vec::new();
    for entry in 0..source.n_events() {
        let ev = source.nuisance_event(entry).unwrap().unwrap();
        records.push(FlatRecord::from_event(ev));
    }
    let flat_path = dir.path().join("canonical.json");
    write_canonical_file(
        &flat_path,
        &records,
        source.flux_spectrum(),
        source.event_spectrum(),
    )
    .unwrap();

    // The canonical file is itself a valid input, discovered by key
    // probing.
    let mut reread = factory.create("reread", &flat_path.display().to_string()).unwrap();
    assert_eq!(reread.name(), "reread");
    assert_eq!(reread.n_events(), 10);

    for entry in 0..10 {
        let ev = reread.nuisance_event(entry).unwrap().unwrap();
        assert_eq!(ev.mode, 1);
        assert_eq!(ev.event_no, entry as u32);
        assert_eq!(ev.n_particles(), 4);
        // Stored stacks stay partitioned.
        assert_eq!(ev.particle(0).unwrap().state, ParticleState::Initial);
        assert_eq!(ev.particle(2).unwrap().state, ParticleState::Final);
        assert_eq!(ev.probe_pdg, 14);
        assert!(ev.q2() > 0.0);
    }

    // Spectra survive the trip.
    assert_relative_eq!(reread.total_integrated_flux(None, None), 1.0);
    assert_relative_eq!(reread.predicted_event_rate(None, None), 5.0);
}

#[test]
fn spline_files_carry_entry_parallel_coefficients() {
    let dir = tempfile::tempdir().unwrap();
    let neut_path = dir.path().join("neut.json");
    write_neut_sample(&neut_path, 4, 1.0, 5.0);

    let factory = InputFactory::new();
    let mut source = factory.create("src", &format!("NEUT:{}", neut_path.display())).unwrap();
    let mut records = Vec::new();
    for entry in 0..source.n_events() {
        records.push(FlatRecord::from_event(source.nuisance_event(entry).unwrap().unwrap()));
    }

    let spline_path = dir.path().join("splines.json");
    let coeffs: Vec<SplineBlock> =
        (0..4).map(|i| SplineBlock { coeffs: vec![i as f64, 1.0, -0.5] }).collect();
    let mut file = SampleFile::create();
    file.insert_spectrum(spectrum(nc_io::records::flat::FLUX_NAME, 1.0));
    file.insert_spectrum(spectrum(nc_io::records::flat::EVENT_NAME, 5.0));
    file.insert_tree(nc_io::records::flat::TREE_NAME, &records).unwrap();
    file.insert_tree(nc_io::records::flat::SPLINE_TREE_NAME, &coeffs).unwrap();
    file.write(&spline_path).unwrap();

    let mut spline = SplineInput::open("spl", &[spline_path.clone()]).unwrap();
    assert_eq!(spline.n_events(), 4);
    assert_eq!(spline.spline_coeffs(2).unwrap(), &[2.0, 1.0, -0.5]);
    assert_eq!(spline.starting_weight(0), Some(1.0));
    assert_eq!(spline.nuisance_event(1).unwrap().unwrap().n_particles(), 4);

    // And the factory recognizes the spline block on its own.
    let guessed = InputFactory::new().create("g", &spline_path.display().to_string());
    assert!(guessed.is_ok());

    // Joint spline groups are refused.
    assert!(SplineInput::open("spl2", &[spline_path.clone(), spline_path]).is_err());
}

fn gibuu_event(weight: f64) -> GibuuRecord {
    GibuuRecord {
        weight,
        ev_type: 1,
        process_id: 2,
        flavor_id: 2,
        num_ensembles: 1,
        num_runs: 1,
        nucleus_a: 12,
        nucleus_z: 6,
        lep_in: [0.0, 0.0, 0.6, 0.6],
        lep_out: [0.03, 0.0, 0.45, 0.47],
        nuc: [0.0, 0.0, 0.0, 0.938],
        nuc_charge: 1,
        parts: vec![GibuuPart {
            pdg: 2212,
            p: [0.0, 0.0, 0.3, 0.99],
            pos: [0.0, 0.0, 8.0],
        }],
    }
}

#[test]
fn gibuu_files_use_the_ensemble_strategy() {
    let dir = tempfile::tempdir().unwrap();
    let mut paths = Vec::new();
    for (i, name) in ["r1.json", "r2.json"].iter().enumerate() {
        let path = dir.path().join(name);
        let events: Vec<GibuuRecord> = (0..10).map(|_| gibuu_event(0.1 * (i + 1) as f64)).collect();
        let mut file = SampleFile::create();
        file.insert_spectrum(spectrum("flux", 1.0));
        file.insert_spectrum(spectrum("evtrt", 40.0 + 20.0 * i as f64));
        file.insert_tree(nc_io::records::gibuu::TREE_NAME, &events).unwrap();
        file.write(&path).unwrap();
        paths.push(path);
    }

    let factory = InputFactory::new();
    let spec = format!("GIBUU:({},{})", paths[0].display(), paths[1].display());
    let mut handler = factory.create("gibuu", &spec).unwrap();
    assert_eq!(handler.n_events(), 20);

    // Identical run configurations: rates average to 50, scale factors
    // are equal, and the per-event native weight multiplies in.
    assert_relative_eq!(handler.predicted_event_rate(None, None), 50.0);
    let scale = 1.0 * 20.0 / 50.0 * (12.0 / 12.0) / 2.0;
    let ev = handler.nuisance_event(0).unwrap().unwrap();
    assert_relative_eq!(ev.weights.input, 0.1 * scale, epsilon = 1e-12);
    assert_eq!(ev.mode, 1);
    // nu, outgoing mu, struck nucleon, transported proton.
    assert_eq!(ev.n_particles(), 4);
    assert_eq!(ev.probe_pdg, 14);
    assert_relative_eq!(ev.probe_e, 600.0);

    let ev = handler.nuisance_event(10).unwrap().unwrap();
    assert_relative_eq!(ev.weights.input, 0.2 * scale, epsilon = 1e-12);
}

#[test]
fn histogram_only_inputs_synthesize_weighted_events() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pred.json");
    let mut file = SampleFile::create();
    file.insert_spectrum(spectrum("flux_pred", 1.0));
    file.insert_spectrum(spectrum("evtrt_pred", 6.0));
    file.write(&path).unwrap();

    let factory = InputFactory::new();
    let mut handler =
        factory.create("histo", &format!("HISTO:{}", path.display())).unwrap();
    // One entry per event-rate bin.
    assert_eq!(handler.n_events(), 2);

    let ev = handler.nuisance_event(0).unwrap().unwrap();
    assert_eq!(ev.n_particles(), 1);
    assert_eq!(ev.probe_pdg, 14);
    assert_relative_eq!(ev.probe_e, 0.5);
    assert_relative_eq!(ev.weights.input, 3.0);

    // Spectra-only files cannot be type-guessed.
    assert!(InputFactory::new().create("g", &path.display().to_string()).is_err());
}

#[test]
fn mixed_generator_files_are_kept_separate() {
    // A NEUT handler pointed at a GiBUU file fails on the missing tree.
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gibuu.json");
    let events = vec![gibuu_event(1.0)];
    let mut file = SampleFile::create();
    file.insert_spectrum(spectrum("flux", 1.0));
    file.insert_spectrum(spectrum("evtrt", 5.0));
    file.insert_tree(nc_io::records::gibuu::TREE_NAME, &events).unwrap();
    file.write(&path).unwrap();

    let factory = InputFactory::new();
    assert!(factory.create("wrong", &format!("NEUT:{}", path.display())).is_err());

    // But guessing picks the right family from the tree name.
    let mut ok = factory.create("right", &path.display().to_string()).unwrap();
    assert_eq!(ok.nuisance_event(0).unwrap().unwrap().mode, 1);
}
