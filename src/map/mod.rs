//! MIDI map documents: model, JSON codec, and file helpers

mod codec;
mod document;

pub use codec::{decode, encode, DecodeError};
pub use document::MidiMap;

use anyhow::{Context, Result};
use std::path::Path;

/// Load and decode a MIDI map file
pub fn load_file(path: &Path) -> Result<MidiMap> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading MIDI map from {}", path.display()))?;
    let map = decode(&text)?;
    Ok(map)
}

/// Encode and write a MIDI map file, creating parent directories as needed
pub fn save_file(path: &Path, map: &MidiMap) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, encode(map))
        .with_context(|| format!("writing MIDI map to {}", path.display()))?;
    Ok(())
}
