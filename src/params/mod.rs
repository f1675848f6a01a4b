//! Parameter specs and the live registry
//!
//! Parameters are derived from MIDI map attributes and rebuilt whenever a
//! new map is installed.

mod registry;
mod spec;

pub use registry::{ParameterRegistry, RegistryError};
pub use spec::{parameter_id, ParameterSpec};
