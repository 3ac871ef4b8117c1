//! # nc-input
//!
//! Input handlers for nucanon.
//!
//! One handler per generator family turns native event records into
//! [`nc_core::CanonicalEvent`]s behind the common [`InputHandler`] trait.
//! Several files can be registered under one handler as a *joint input*;
//! the [`joint`] module keeps their combined flux/event-rate spectra and
//! the per-file scale factors that make the merged stream statistically
//! correct.
//!
//! ## Example
//!
//! ```no_run
//! use nc_input::{InputFactory, InputHandler};
//!
//! let factory = InputFactory::new();
//! let mut handler = factory.create("t2k_numu", "NEUT:(fhc_a.json,fhc_b.json)").unwrap();
//! for entry in 0..handler.n_events() {
//!     let ev = handler.nuisance_event(entry).unwrap().expect("entry in range");
//!     println!("mode {} weight {}", ev.mode, ev.weights.total());
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod ensemble;
pub mod factory;
pub mod flat;
pub mod genie;
pub mod gibuu;
pub mod handler;
pub mod hepmc;
pub mod histo;
pub mod joint;
pub(crate) mod loader;
pub mod neut;
pub mod nuance;
pub mod nuwro;
pub mod spec;
pub mod spline;

pub use ensemble::EnsembleInputBuilder;
pub use factory::InputFactory;
pub use handler::{HandlerCore, InputHandler};
pub use joint::{JointInputBuilder, JointInputs};
pub use spec::InputSpec;
