//! Dmxbridge - MIDI map driven control bridge for DMX lighting
//!
//! Maps named color parameters (hue, saturation, brightness) onto MIDI
//! control-change messages and pub/sub topics under a hot-swappable name
//! mapping. The parameter set rebuilds itself at runtime from the map
//! document; fuzzy name matching binds each parameter to its outbound
//! controller.

pub mod bridge;
pub mod map;
pub mod output;
pub mod params;
pub mod resolve;

pub use bridge::Bridge;
pub use map::MidiMap;
