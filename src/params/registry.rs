//! Live parameter registry rebuilt from MIDI map documents

use thiserror::Error;

use crate::map::MidiMap;

use super::ParameterSpec;

/// Errors from registry operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The document declared no groups or no attributes
    #[error("MIDI map has no groups or no attributes")]
    EmptyDocument,

    /// No parameter with the requested id
    #[error("unknown parameter '{0}'")]
    ParameterNotFound(String),
}

/// Owns the live set of named, ranged parameters and their current values.
///
/// The whole set is discarded and rebuilt whenever a new document is
/// installed. Install is atomic: the replacement set is built off to the
/// side and swapped in as one step, so a failed install leaves the
/// previous set untouched.
#[derive(Debug, Default)]
pub struct ParameterRegistry {
    entries: Vec<(ParameterSpec, f64)>,
    generation: u64,
}

impl ParameterRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the parameter set from a document, one parameter per
    /// attribute entry in document order. Values reset to spec defaults.
    pub fn install(&mut self, map: &MidiMap) -> Result<(), RegistryError> {
        if !map.is_valid() {
            return Err(RegistryError::EmptyDocument);
        }

        let entries: Vec<(ParameterSpec, f64)> = map
            .attributes
            .iter()
            .map(|(_, name)| {
                let spec = ParameterSpec::from_attribute_name(name);
                let value = spec.default;
                (spec, value)
            })
            .collect();

        self.entries = entries;
        self.generation += 1;
        Ok(())
    }

    /// Get a parameter's current value
    pub fn get(&self, id: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(spec, _)| spec.id == id)
            .map(|(_, value)| *value)
    }

    /// Set a parameter's value, clamped into its range. Returns the stored
    /// value. Unknown ids have no side effects.
    pub fn set(&mut self, id: &str, value: f64) -> Result<f64, RegistryError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|(spec, _)| spec.id == id)
            .ok_or_else(|| RegistryError::ParameterNotFound(id.to_string()))?;

        entry.1 = entry.0.clamp(value);
        Ok(entry.1)
    }

    /// All parameter ids in install order
    pub fn ids(&self) -> Vec<&str> {
        self.entries.iter().map(|(spec, _)| spec.id.as_str()).collect()
    }

    /// Get the spec for a parameter id
    pub fn spec_of(&self, id: &str) -> Option<&ParameterSpec> {
        self.entries
            .iter()
            .find(|(spec, _)| spec.id == id)
            .map(|(spec, _)| spec)
    }

    /// All specs in install order
    pub fn specs(&self) -> impl Iterator<Item = &ParameterSpec> {
        self.entries.iter().map(|(spec, _)| spec)
    }

    /// Structural change counter, bumped on every successful install.
    /// A host adapter can poll this to know when to rebuild its surface.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of live parameters
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry has no parameters
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
