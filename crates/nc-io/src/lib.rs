//! # nc-io
//!
//! On-disk formats for nucanon.
//!
//! A *sample file* is a keyed object store holding 1-D spectra and event
//! trees. Reproducing ROOT's binary layout is explicitly out of scope, so
//! the container is JSON, but the access API keeps the familiar shape:
//! open a file, list its keys, fetch a spectrum by name or substring,
//! fetch a tree of typed records.
//!
//! ## Example
//!
//! ```no_run
//! use nc_io::{SampleFile, records::neut::NeutRecord};
//!
//! let f = SampleFile::open("sample.json").unwrap();
//! for key in f.list_keys() {
//!     println!("{} ({})", key.name, key.class);
//! }
//! let flux = f.spectrum_matching("flux").unwrap();
//! println!("bins: {}, integral: {}", flux.n_bins(), flux.integral_width());
//! let events: Vec<NeutRecord> = f.tree("neuttree").unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod file;
pub mod records;
pub mod spectrum;

pub use file::{KeyInfo, SampleFile, StoredObject};
pub use spectrum::Spectrum;
