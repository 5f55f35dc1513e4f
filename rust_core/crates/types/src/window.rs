/// Analysis horizon of a trailing window.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum WindowTag {
    /// Short term (10 bars by default)
    Short,
    /// Medium term (20 bars by default)
    Medium,
    /// Long term (40 bars by default)
    Long,
}

/// Error parsing a window tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseWindowTagError;

impl std::fmt::Display for ParseWindowTagError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid window tag string")
    }
}

impl std::error::Error for ParseWindowTagError {}

impl std::str::FromStr for WindowTag {
    type Err = ParseWindowTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "short" => Ok(WindowTag::Short),
            "medium" => Ok(WindowTag::Medium),
            "long" => Ok(WindowTag::Long),
            _ => Err(ParseWindowTagError),
        }
    }
}

impl WindowTag {
    /// Evaluation order used by the calculators: long, medium, short.
    pub const ALL: [WindowTag; 3] = [WindowTag::Long, WindowTag::Medium, WindowTag::Short];

    /// Default window length in bars.
    #[must_use]
    pub fn default_len(&self) -> usize {
        match self {
            WindowTag::Short => 10,
            WindowTag::Medium => 20,
            WindowTag::Long => 40,
        }
    }

    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            WindowTag::Short => "short",
            WindowTag::Medium => "medium",
            WindowTag::Long => "long",
        }
    }
}

impl std::fmt::Display for WindowTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Directional reading of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bias {
    /// Points to rising prices
    Bullish,
    /// Points to falling prices
    Bearish,
    /// No directional content
    Neutral,
}
