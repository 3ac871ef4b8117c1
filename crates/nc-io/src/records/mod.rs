//! Native record schemas, one module per generator family.
//!
//! These are pure serde types mirroring what each generator writes into
//! its event tree; all unit conventions and status-code quirks are
//! resolved by the corresponding input handler, not here.

pub mod flat;
pub mod genie;
pub mod gibuu;
pub mod hepmc;
pub mod neut;
pub mod nuance;
pub mod nuwro;
