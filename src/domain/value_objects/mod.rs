use std::fmt;

use serde::{Deserialize, Serialize};

/// Destination number in the digits-only form the messaging gateway expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Normalizes a raw ledger phone. Returns `None` when no digits remain.
    pub fn parse(raw: &str) -> Option<Self> {
        let digits = normalize_phone(raw);
        (!digits.is_empty()).then_some(Self(digits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strips everything but digits and applies the São Paulo country/area code
/// fixups: an 11-digit number starting with `11` gets `55`, a bare 10-digit
/// number gets `5511`. Any other shape passes through untouched.
pub fn normalize_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    match digits.len() {
        11 if digits.starts_with("11") => format!("55{digits}"),
        10 => format!("5511{digits}"),
        _ => digits,
    }
}
