//! Alignment mode enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How followers are aligned to the leader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlignmentMode {
    /// Engine disabled.
    #[default]
    Off,
    /// Same top line, character scaled by line-length ratio.
    Normal,
    /// Fixed per-follower line delta captured at leader change.
    Offset,
}

impl AlignmentMode {
    /// Every mode, in mode-picker order.
    pub const ALL: [AlignmentMode; 3] = [
        AlignmentMode::Normal,
        AlignmentMode::Offset,
        AlignmentMode::Off,
    ];

    /// Upper-case name as persisted and shown in labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            AlignmentMode::Off => "OFF",
            AlignmentMode::Normal => "NORMAL",
            AlignmentMode::Offset => "OFFSET",
        }
    }

    /// One-line description for pickers.
    pub fn description(&self) -> &'static str {
        match self {
            AlignmentMode::Normal => "Sync scroll to the same line",
            AlignmentMode::Offset => "Sync scroll with the same scrolling distance",
            AlignmentMode::Off => "Turn off sync scroll",
        }
    }

    /// True for the two modes that actually synchronize.
    pub fn is_active(&self) -> bool {
        !matches!(self, AlignmentMode::Off)
    }
}

impl fmt::Display for AlignmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown mode name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown alignment mode {0:?} (expected one of: off, normal, offset)")]
pub struct InvalidMode(pub String);

impl FromStr for AlignmentMode {
    type Err = InvalidMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OFF" => Ok(AlignmentMode::Off),
            "NORMAL" => Ok(AlignmentMode::Normal),
            "OFFSET" => Ok(AlignmentMode::Offset),
            _ => Err(InvalidMode(s.to_string())),
        }
    }
}
