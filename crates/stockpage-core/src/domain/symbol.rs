use std::fmt::{Display, Formatter};

use crate::ValidationError;

/// Ticker as it is placed in the upstream URL path.
///
/// Any non-blank text is accepted (`^GSPC`, `BRK.B`, `7203.T`); the proxies
/// percent-encode it, so only the bare dot segments are refused.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol(String);

impl Symbol {
    /// Ticker used when a page request names none.
    pub const DEFAULT: &'static str = "AAPL";

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        if input.trim().is_empty() {
            return Err(ValidationError::EmptySymbol);
        }
        if input == "." || input == ".." {
            return Err(ValidationError::DotSegmentSymbol {
                value: input.to_owned(),
            });
        }

        Ok(Self(input.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
