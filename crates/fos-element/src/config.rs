//! Wrapper Configuration

/// Registry configuration options
#[derive(Debug, Clone)]
pub struct Config {
    /// Attribute whose presence overrides value reads and writes
    pub value_attribute: String,

    /// Attribute selecting the value codec (`IP` or `URL`)
    pub map_attribute: String,

    /// Register bridging listeners for the capture phase
    pub capture: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            value_attribute: "data-val".to_string(),
            map_attribute: "data-map".to_string(),
            capture: true,
        }
    }
}
