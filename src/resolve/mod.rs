//! Fuzzy attribute resolution
//!
//! Parameter ids are machine-derived (lowercased, despaced) while attribute
//! names are human-entered, so matching tries both directions to stay
//! robust to naming drift between the two representations.

use crate::map::MidiMap;

/// Find the attribute a parameter currently represents.
///
/// Scans attributes in document order and returns the first whose display
/// name, compared case-insensitively, occurs inside the parameter id, or
/// whose name lowercased with spaces removed equals the id exactly. Returns
/// the attribute id and display name. No match is a valid outcome meaning
/// the parameter has no outbound binding right now.
pub fn resolve<'a>(parameter_id: &str, map: &'a MidiMap) -> Option<(&'a str, &'a str)> {
    let param = parameter_id.to_lowercase();

    map.attributes.iter().find_map(|(id, name)| {
        let lower = name.to_lowercase();
        if param.contains(&lower) || lower.replace(' ', "") == param {
            Some((id.as_str(), name.as_str()))
        } else {
            None
        }
    })
}
