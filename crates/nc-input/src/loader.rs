//! Shared sample-file loading for the generator handlers.

use nc_core::{Error, Result};
use nc_io::{SampleFile, Spectrum};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Flux-spectrum key fragment searched in every generator sample file.
pub const FLUX_FRAGMENT: &str = "flux";
/// Event-rate-spectrum key fragment searched in every generator sample file.
pub const EVENT_FRAGMENT: &str = "evtrt";

/// Load one generator sample file: its event tree plus the reserved
/// flux/event-rate spectra.
///
/// Missing spectra or tree, or an empty tree, are configuration errors:
/// downstream normalization needs every registered file to contribute
/// valid spectra, so the file is unusable rather than skippable.
pub fn load_sample<T: DeserializeOwned>(
    path: &Path,
    tree_name: &str,
    prep_hint: &str,
) -> Result<(Vec<T>, Spectrum, Spectrum)> {
    let file = SampleFile::open(path)?;
    let flux = file.spectrum_matching(FLUX_FRAGMENT).cloned().ok_or_else(|| {
        Error::Config(format!(
            "'{}' doesn't contain a flux spectrum; {prep_hint}",
            path.display()
        ))
    })?;
    let event_rate = file.spectrum_matching(EVENT_FRAGMENT).cloned().ok_or_else(|| {
        Error::Config(format!(
            "'{}' doesn't contain an event-rate spectrum; {prep_hint}",
            path.display()
        ))
    })?;
    let entries: Vec<T> = file.tree(tree_name)?;
    if entries.is_empty() {
        return Err(Error::Config(format!(
            "tree '{tree_name}' in '{}' holds 0 events; the file may need to be regenerated",
            path.display()
        )));
    }
    Ok((entries, flux, event_rate))
}
