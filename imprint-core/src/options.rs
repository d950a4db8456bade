use serde::{Deserialize, Serialize};

/// Default limit on nesting and reference hops.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// How string bytes are delimited in the encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StringFraming {
    /// Tag byte followed by the raw bytes. Adjacent strings rely on the next
    /// tag byte to separate them.
    #[default]
    Unframed,
    /// Tag byte, byte length as little-endian `u64`, then the raw bytes.
    LengthPrefixed,
}

/// Encoding options.
///
/// Digests are only comparable when computed with equal options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    pub max_depth: usize,
    pub string_framing: StringFraming,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            string_framing: StringFraming::default(),
        }
    }
}

/// Error type for loading options.
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    #[error("invalid options: {0}")]
    Parse(#[from] toml::de::Error),
}

impl Options {
    /// Parses options from a TOML document. Missing keys keep their defaults.
    pub fn from_toml(content: &str) -> Result<Self, OptionsError> {
        Ok(toml::from_str(content)?)
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_string_framing(mut self, string_framing: StringFraming) -> Self {
        self.string_framing = string_framing;
        self
    }
}
