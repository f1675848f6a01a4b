//! Parameter spec derivation from attribute names

/// A live, ranged, host-visible parameter derived from one attribute
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    /// Stable machine id: attribute name lowercased with spaces removed
    pub id: String,

    /// Human-readable name (the original attribute name)
    pub name: String,

    /// Range minimum
    pub min: f64,

    /// Range maximum
    pub max: f64,

    /// Default value
    pub default: f64,

    /// Display suffix ("°", "%", "Hz", or empty)
    pub unit: &'static str,
}

impl ParameterSpec {
    /// Derive a spec from an attribute display name.
    ///
    /// Names containing "hue" span 0-360 degrees; color intensity names
    /// span 0-100 percent and default to full; "strobe" spans 0-20 Hz.
    /// Anything else gets a plain 0-100 range. First rule hit wins.
    pub fn from_attribute_name(name: &str) -> Self {
        let lower = name.to_lowercase();

        let (min, max, default, unit) = if lower.contains("hue") {
            (0.0, 360.0, 0.0, "°")
        } else if lower.contains("saturation")
            || lower.contains("brightness")
            || lower.contains("intensity")
        {
            (0.0, 100.0, 100.0, "%")
        } else if lower.contains("strobe") {
            (0.0, 20.0, 0.0, "Hz")
        } else {
            (0.0, 100.0, 0.0, "")
        };

        Self {
            id: parameter_id(name),
            name: name.to_string(),
            min,
            max,
            default,
            unit,
        }
    }

    /// Clamp a value into this spec's range
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Normalize a value to 0..1 within this spec's range
    pub fn normalize(&self, value: f64) -> f64 {
        let range = self.max - self.min;
        if range.abs() < f64::EPSILON {
            0.0
        } else {
            (value - self.min) / range
        }
    }
}

/// Machine id for an attribute name: lowercased with spaces removed
pub fn parameter_id(name: &str) -> String {
    name.to_lowercase().replace(' ', "")
}
