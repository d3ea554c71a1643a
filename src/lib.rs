//! Artificial General Intelligence Testbed.
//!
//! A battery of behavioural invariants and randomised hypothesis checks for
//! stateful next-input predictors. A model plugs in by implementing
//! [`Cortex`]; the testbed never looks inside it, only feeding inputs,
//! reading predictions, comparing instances and cloning them.
//!
//! # Layout
//!
//! - [`input`]: the fixed-width spiking input contract and [`Spikes`].
//! - [`sequence`]: ordered inputs and their structural checks.
//! - [`generator`]: random sequences under the refractory rule.
//! - [`cortex`]: the model contract and the [`Adapter`] primitives.
//! - [`oracle`]: bounded counterexample searches.
//! - [`config`] and [`error`]: run configuration and failure types.
//! - [`testing`]: calibration models for exercising the testbed itself.
//!
//! The twelve conformance cases and the runner live in the
//! `agitb-conformance` crate.
//!
//! ```
//! use agitb::{Adapter, Sequence, Spikes};
//! use agitb::testing::TransitionMemory;
//!
//! let pattern: Sequence<Spikes<3>> =
//!     ["100", "000"].iter().map(|s| s.parse().unwrap()).collect();
//! let mut model = Adapter::<TransitionMemory<Spikes<3>>>::new();
//! assert!(model.adapt(&pattern, 100));
//! assert_eq!(model.behaviour(2), pattern);
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub mod cortex;
pub mod error;
pub mod generator;
pub mod input;
pub mod oracle;
pub mod sequence;
pub mod testing;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::{FailurePolicy, PatternPeriod, TestbedConfig};
pub use cortex::{Adapter, Cortex};
pub use error::{ConfigError, Error, Result};
pub use generator::SequenceGenerator;
pub use input::{respects_refractory, CanonicalInput, Input, Spikes, CANONICAL_WIDTH};
pub use oracle::{identical_behaviour, GeneralisationScore, Oracle, UnobservabilityWitness};
pub use sequence::Sequence;
