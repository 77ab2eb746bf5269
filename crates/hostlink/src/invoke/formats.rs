// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Initial receiver lengths per result format.

use crate::error::CallError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Receiver length the host documents for a format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatLength {
    Fixed(u32),
    /// Depends on the object (field count, key count...).
    Variable,
}

const BUILTIN: &[(&str, FormatLength)] = &[
    ("OBJD0100", FormatLength::Fixed(90)),
    ("OBJD0200", FormatLength::Fixed(180)),
    ("OBJD0300", FormatLength::Fixed(460)),
    ("OBJD0400", FormatLength::Fixed(667)),
    ("PGMI0100", FormatLength::Fixed(537)),
    ("MBRD0100", FormatLength::Fixed(135)),
    ("MBRD0200", FormatLength::Fixed(550)),
    ("MBRD0300", FormatLength::Fixed(780)),
    ("MBRD0400", FormatLength::Fixed(102_068)),
    ("MBRD0500", FormatLength::Fixed(16)),
    ("FILD0100", FormatLength::Variable),
    ("FILD0200", FormatLength::Variable),
    ("FILD0300", FormatLength::Variable),
    ("FILD0400", FormatLength::Variable),
];

/// Documented length of a format, if known.
pub fn builtin(format: &str) -> Option<FormatLength> {
    BUILTIN
        .iter()
        .find(|(name, _)| *name == format)
        .map(|(_, length)| *length)
}

/// Format table with configuration overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatTable {
    /// First guess for variable formats; the retry loop corrects it.
    pub variable_estimate: u32,

    /// Overrides and additional formats.
    pub lengths: BTreeMap<String, u32>,
}

fn default_variable_estimate() -> u32 {
    2048
}

impl Default for FormatTable {
    fn default() -> Self {
        Self {
            variable_estimate: default_variable_estimate(),
            lengths: BTreeMap::new(),
        }
    }
}

impl FormatTable {
    pub fn with_length(mut self, format: &str, length: u32) -> Self {
        self.lengths.insert(format.to_string(), length);
        self
    }

    /// Receiver length for the first attempt.
    pub fn initial_length(&self, format: &str) -> Result<u32, CallError> {
        if let Some(length) = self.lengths.get(format) {
            return Ok(*length);
        }
        match builtin(format) {
            Some(FormatLength::Fixed(length)) => Ok(length),
            Some(FormatLength::Variable) => Ok(self.variable_estimate),
            None => Err(CallError::UnknownFormat(format.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_lengths() {
        let table = FormatTable::default();
        assert_eq!(table.initial_length("OBJD0100").ok(), Some(90));
        assert_eq!(table.initial_length("OBJD0400").ok(), Some(667));
        assert_eq!(table.initial_length("PGMI0100").ok(), Some(537));
        assert_eq!(table.initial_length("MBRD0400").ok(), Some(102_068));
        assert_eq!(table.initial_length("MBRD0500").ok(), Some(16));
    }

    #[test]
    fn variable_formats_use_estimate() {
        let mut table = FormatTable::default();
        assert_eq!(table.initial_length("FILD0300").ok(), Some(2048));
        table.variable_estimate = 512;
        assert_eq!(table.initial_length("FILD0100").ok(), Some(512));
    }

    #[test]
    fn overrides_win() {
        let table = FormatTable::default()
            .with_length("OBJD0100", 128)
            .with_length("JOBI0100", 86);
        assert_eq!(table.initial_length("OBJD0100").ok(), Some(128));
        assert_eq!(table.initial_length("JOBI0100").ok(), Some(86));
    }

    #[test]
    fn unknown_format_is_an_error() {
        let err = FormatTable::default().initial_length("XXXX0100").unwrap_err();
        assert!(matches!(err, CallError::UnknownFormat(f) if f == "XXXX0100"));
    }
}
