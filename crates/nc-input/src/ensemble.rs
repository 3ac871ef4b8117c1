//! Ensemble-averaged joint-input strategy.
//!
//! GiBUU reports a run-averaged event rate rather than a per-file event
//! count: several files generated with an identical run configuration
//! each carry an estimate of the *same* rate, and compound targets are
//! simulated per nucleon species. Event-rate spectra sharing a
//! configuration are therefore averaged (not summed) before summing
//! across distinct configurations, and scale factors pick up a
//! nucleon-count weighting. This is deliberately a separate strategy from
//! [`crate::joint::JointInputBuilder`] so the default path stays free of
//! generator-specific conditionals.

use crate::joint::{JointInput, JointInputs};
use nc_core::{Error, Result};
use nc_io::Spectrum;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RunConfig {
    process_id: i32,
    flavor_id: i32,
    nucleons: i32,
}

#[derive(Debug)]
struct EnsembleEntry {
    input: JointInput,
    config: RunConfig,
}

/// Accumulates files for the ensemble-averaged normalization strategy.
#[derive(Debug, Default)]
pub struct EnsembleInputBuilder {
    entries: Vec<EnsembleEntry>,
    total: usize,
}

impl EnsembleInputBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one file along with its run configuration.
    ///
    /// `nucleons` is the number of nucleons contributing to this file's
    /// target (the mass number for a single-species run).
    pub fn register(
        &mut self,
        path: impl Into<String>,
        process_id: i32,
        flavor_id: i32,
        nucleons: i32,
        n_events: usize,
        flux: Spectrum,
        event_rate: Spectrum,
    ) -> Result<()> {
        let path = path.into();
        if n_events == 0 {
            return Err(Error::Config(format!("'{path}' contains 0 events")));
        }
        if nucleons <= 0 {
            return Err(Error::Config(format!("'{path}' reports {nucleons} target nucleons")));
        }
        if flux.bin_edges != event_rate.bin_edges {
            return Err(Error::Config(format!(
                "'{path}': flux and event-rate spectra are binned differently"
            )));
        }
        let low = self.total;
        self.total += n_events;
        self.entries.push(EnsembleEntry {
            input: JointInput {
                path,
                n_events,
                low,
                high: self.total,
                flux,
                event_rate,
            },
            config: RunConfig { process_id, flavor_id, nucleons },
        });
        Ok(())
    }

    /// Number of files registered so far.
    pub fn n_registered(&self) -> usize {
        self.entries.len()
    }

    /// Derive the ensemble-averaged combined spectra and scale factors.
    ///
    /// All files are assumed to share one flux (the first is taken). The
    /// combined event rate is, per distinct run configuration, the
    /// average of that configuration's spectra weighted by its nucleon
    /// count, summed over configurations and divided by the total number
    /// of unique nucleons. Scaling is always applied, even for a single
    /// file.
    pub fn finalize(self) -> Result<JointInputs> {
        if self.entries.is_empty() {
            return Err(Error::Config("no input files registered".into()));
        }

        let flux = self.entries[0].input.flux.clone();

        // Unique nucleon counts across distinct species.
        let mut unique_nucl: Vec<i32> = Vec::new();
        for e in &self.entries {
            if !unique_nucl.contains(&e.config.nucleons) {
                unique_nucl.push(e.config.nucleons);
            }
        }
        let total_unique_nucl: i32 = unique_nucl.iter().sum();

        // Distinct run configurations, in first-seen order.
        let mut configs: Vec<RunConfig> = Vec::new();
        for e in &self.entries {
            if !configs.contains(&e.config) {
                configs.push(e.config);
            }
        }

        let mut event_rate: Option<Spectrum> = None;
        for cfg in &configs {
            let members: Vec<&EnsembleEntry> =
                self.entries.iter().filter(|e| e.config == *cfg).collect();
            let mut group = members[0].input.event_rate.clone();
            for m in &members[1..] {
                group.add(&m.input.event_rate).map_err(|e| {
                    Error::Config(format!(
                        "'{}': event-rate binning differs across joint inputs: {e}",
                        m.input.path
                    ))
                })?;
            }
            // Average within the configuration, weight by its nucleons.
            group.scale(cfg.nucleons as f64 / members.len() as f64);
            match &mut event_rate {
                None => event_rate = Some(group),
                Some(total) => total.add(&group).map_err(|e| {
                    Error::Config(format!("event-rate binning differs across joint inputs: {e}"))
                })?,
            }
        }
        let mut event_rate = event_rate.expect("at least one configuration");
        // Per-nucleon rate for the compound target.
        event_rate.scale(1.0 / f64::from(total_unique_nucl));

        let rate_total = event_rate.integral_width();
        if rate_total <= 0.0 {
            return Err(Error::Normalization(
                "combined event-rate integral is not positive".into(),
            ));
        }

        let flux_total = flux.integral_width();
        let n_total = self.total as f64;
        let scales: Vec<f64> = self
            .entries
            .iter()
            .map(|e| {
                let n_same =
                    self.entries.iter().filter(|o| o.config == e.config).count() as f64;
                // Reverse the flux-averaged cross-section scaling, then
                // weight by this file's share of the compound target.
                flux_total * n_total / rate_total * f64::from(e.config.nucleons)
                    / f64::from(total_unique_nucl)
                    / n_same
            })
            .collect();

        tracing::info!(
            files = self.entries.len(),
            configs = configs.len(),
            nucleons = total_unique_nucl,
            "ensemble inputs registered"
        );

        let inputs = self.entries.into_iter().map(|e| e.input).collect();
        // Ensemble scaling applies even to a single registered file.
        Ok(JointInputs::from_parts(inputs, scales, flux, event_rate, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn spectrum(name: &str, level: f64) -> Spectrum {
        Spectrum::uniform(name, 2, 0.0, 1.0, vec![level, level]).unwrap()
    }

    #[test]
    fn same_config_files_are_averaged() {
        // Two files, identical configuration (CC numu on C12): their rate
        // estimates average instead of summing.
        let mut b = EnsembleInputBuilder::new();
        b.register("r1", 2, 2, 12, 100, spectrum("flux", 1.0), spectrum("evtrt", 40.0)).unwrap();
        b.register("r2", 2, 2, 12, 100, spectrum("flux", 1.0), spectrum("evtrt", 60.0)).unwrap();
        let j = b.finalize().unwrap();

        // avg(40, 60) = 50 per bin; * nucleons / total_unique = 12/12 = 1.
        assert_relative_eq!(j.event_rate().integral_width(), 50.0);

        // Same configuration => identical scale factors, split two ways.
        assert_relative_eq!(j.scale_factor(0), j.scale_factor(1));
        let expect = 1.0 * 200.0 / 50.0 * (12.0 / 12.0) / 2.0;
        assert_relative_eq!(j.scale_factor(0), expect);
    }

    #[test]
    fn distinct_species_sum_per_nucleon() {
        // Hydrogen + carbon files of one compound target.
        let mut b = EnsembleInputBuilder::new();
        b.register("h", 2, 2, 1, 50, spectrum("flux", 1.0), spectrum("evtrt", 10.0)).unwrap();
        b.register("c", 2, 2, 12, 100, spectrum("flux", 1.0), spectrum("evtrt", 30.0)).unwrap();
        let j = b.finalize().unwrap();

        // (10*1 + 30*12) / 13 per-nucleon combined rate.
        assert_relative_eq!(j.event_rate().integral_width(), (10.0 + 360.0) / 13.0);

        // Heavier species carries proportionally more weight.
        assert_relative_eq!(j.scale_factor(1) / j.scale_factor(0), 12.0);
    }

    #[test]
    fn single_file_still_scales() {
        let mut b = EnsembleInputBuilder::new();
        b.register("only", 2, 2, 12, 100, spectrum("flux", 2.0), spectrum("evtrt", 25.0)).unwrap();
        let j = b.finalize().unwrap();
        // jointness is forced on: weight != 1 even with one file.
        let w = j.input_weight(0);
        assert!(w != 1.0);
        assert_relative_eq!(w, j.scale_factor(0));
    }
}
