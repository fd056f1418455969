//! sm-model: state-space models for springsim.
//!
//! Contains:
//! - traits (StateSpaceModel: the derivative contract the integrator drives)
//! - spring_mass (damped spring-mass oscillator with unit-typed parameters)
//! - error (model error types)

pub mod error;
pub mod spring_mass;
pub mod traits;

pub use error::{ModelError, ModelResult};
pub use spring_mass::{Parameters, SpringMassDamper, State};
pub use traits::StateSpaceModel;
