//! # nc-core
//!
//! Generator-agnostic canonical event model for nucanon.
//!
//! Every supported event generator is translated into the same
//! [`CanonicalEvent`] representation: a reusable particle stack with a
//! closed [`ParticleState`] taxonomy, a signed interaction-mode code, and
//! multiplicative event weights. Downstream selection code only ever sees
//! this one structure.
//!
//! ## Example
//!
//! ```
//! use nc_core::{CanonicalEvent, FourVector, ParticleState};
//!
//! let mut ev = CanonicalEvent::new();
//! ev.reset();
//! ev.mode = 1;
//! ev.push_particle(FourVector::new(0.0, 0.0, 600.0, 600.0), 14, ParticleState::Initial, true);
//! ev.push_particle(FourVector::new(50.0, 0.0, 450.0, 470.0), 13, ParticleState::Final, true);
//! ev.order_stack();
//! ev.cache_probe();
//! assert_eq!(ev.probe_pdg, 14);
//! assert!(ev.q2() > 0.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod event;
pub mod modes;
pub mod particle;
pub mod state;
pub mod vec4;
pub mod weights;

pub use error::{Error, Result};
pub use event::{CanonicalEvent, DEFAULT_STACK_SIZE};
pub use particle::Particle;
pub use state::ParticleState;
pub use vec4::FourVector;
pub use weights::EventWeights;
