//! MIDI map document model

/// The externally supplied group/attribute name table.
///
/// Both lists map string ids to display names. Group ids address outbound
/// MIDI channels, attribute ids address controller numbers. Order is
/// significant and preserved across decode/encode.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MidiMap {
    /// Group id to name, e.g. "0" -> "Vocalist"
    pub groups: Vec<(String, String)>,

    /// Attribute id to name, e.g. "1" -> "Hue"
    pub attributes: Vec<(String, String)>,
}

impl MidiMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock map: five performer groups and the three color attributes
    pub fn default_map() -> Self {
        Self {
            groups: vec![
                ("0".to_string(), "Vocalist".to_string()),
                ("1".to_string(), "Guitarist".to_string()),
                ("2".to_string(), "Bassist".to_string()),
                ("3".to_string(), "Drummer".to_string()),
                ("4".to_string(), "Rear".to_string()),
            ],
            attributes: vec![
                ("1".to_string(), "Hue".to_string()),
                ("2".to_string(), "Saturation".to_string()),
                ("3".to_string(), "Brightness".to_string()),
            ],
        }
    }

    /// Check whether a group id exists
    pub fn has_group(&self, group_id: &str) -> bool {
        self.groups.iter().any(|(id, _)| id == group_id)
    }

    /// Check whether an attribute id exists
    pub fn has_attribute(&self, attribute_id: &str) -> bool {
        self.attributes.iter().any(|(id, _)| id == attribute_id)
    }

    /// Get the display name for a group id
    pub fn group_name(&self, group_id: &str) -> Option<&str> {
        self.groups
            .iter()
            .find(|(id, _)| id == group_id)
            .map(|(_, name)| name.as_str())
    }

    /// Get the display name for an attribute id
    pub fn attribute_name(&self, attribute_id: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(id, _)| id == attribute_id)
            .map(|(_, name)| name.as_str())
    }

    /// All group ids in document order
    pub fn group_ids(&self) -> Vec<&str> {
        self.groups.iter().map(|(id, _)| id.as_str()).collect()
    }

    /// All attribute ids in document order
    pub fn attribute_ids(&self) -> Vec<&str> {
        self.attributes.iter().map(|(id, _)| id.as_str()).collect()
    }

    /// A map is valid when it declares at least one group and one attribute
    pub fn is_valid(&self) -> bool {
        !self.groups.is_empty() && !self.attributes.is_empty()
    }
}
