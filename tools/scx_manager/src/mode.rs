// SPDX-License-Identifier: GPL-2.0
//
// Copyright (c) 2024-2025 Vladislav Nepogodin <vnepogodin@cachyos.org>

// This software may be used and distributed according to the terms of the
// GNU General Public License version 2.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

/// Performance profile of a scheduler.
///
/// The discriminant is the wire value exchanged with scx_loader, so the
/// variants must keep their numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SchedMode {
    /// Default values for the scheduler
    #[default]
    Auto = 0,
    /// Applies flags for better gaming experience
    Gaming = 1,
    /// Applies flags for lower power usage
    PowerSave = 2,
    /// Starts scheduler in low latency mode
    LowLatency = 3,
    /// Starts scheduler in server-oriented mode
    Server = 4,
}

impl SchedMode {
    /// All modes in ordinal order. The mode selector is filled from this.
    pub const ALL: [SchedMode; 5] = [
        SchedMode::Auto,
        SchedMode::Gaming,
        SchedMode::PowerSave,
        SchedMode::LowLatency,
        SchedMode::Server,
    ];

    pub fn ordinal(self) -> u32 {
        self as u32
    }

    /// Text shown in the mode selector.
    pub fn label(self) -> &'static str {
        match self {
            SchedMode::Auto => "Auto",
            SchedMode::Gaming => "Gaming",
            SchedMode::PowerSave => "Powersave",
            SchedMode::LowLatency => "Lowlatency",
            SchedMode::Server => "Server",
        }
    }

    /// Lowercase name used by scx_loader and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            SchedMode::Auto => "auto",
            SchedMode::Gaming => "gaming",
            SchedMode::PowerSave => "powersave",
            SchedMode::LowLatency => "lowlatency",
            SchedMode::Server => "server",
        }
    }

    /// Strict ordinal decoding, for callers that must reject unknown values.
    pub fn try_from_ordinal(raw_mode: u32) -> Option<SchedMode> {
        match raw_mode {
            0 => Some(SchedMode::Auto),
            1 => Some(SchedMode::Gaming),
            2 => Some(SchedMode::PowerSave),
            3 => Some(SchedMode::LowLatency),
            4 => Some(SchedMode::Server),
            _ => None,
        }
    }
}

impl fmt::Display for SchedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SchedMode {
    type Err = anyhow::Error;

    fn from_str(mode_name: &str) -> anyhow::Result<SchedMode> {
        match mode_name {
            "auto" => Ok(SchedMode::Auto),
            "gaming" => Ok(SchedMode::Gaming),
            "powersave" => Ok(SchedMode::PowerSave),
            "lowlatency" => Ok(SchedMode::LowLatency),
            "server" => Ok(SchedMode::Server),
            _ => Err(anyhow::anyhow!("{mode_name} is not supported")),
        }
    }
}

/// Maps a mode selector label to its mode. Anything unrecognized, `"Auto"`
/// included, falls back to [`SchedMode::Auto`].
pub fn mode_from_name(name: &str) -> SchedMode {
    match name {
        "Gaming" => SchedMode::Gaming,
        "Lowlatency" => SchedMode::LowLatency,
        "Powersave" => SchedMode::PowerSave,
        "Server" => SchedMode::Server,
        _ => SchedMode::Auto,
    }
}

/// Decodes a mode ordinal reported by scx_loader. Out of range values are
/// logged and coerced to [`SchedMode::Auto`].
pub fn mode_from_ordinal(raw_mode: u32) -> SchedMode {
    SchedMode::try_from_ordinal(raw_mode).unwrap_or_else(|| {
        log::warn!("SchedMode with such value doesn't exist: {raw_mode}");
        SchedMode::Auto
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_roundtrip_through_ordinal() {
        for name in ["Gaming", "Lowlatency", "Powersave", "Server"] {
            let mode = mode_from_name(name);
            assert_ne!(mode, SchedMode::Auto);
            assert_eq!(mode_from_ordinal(mode.ordinal()), mode);
            assert_eq!(mode.label(), name);
        }
    }

    #[test]
    fn test_unknown_names_fall_back_to_auto() {
        assert_eq!(mode_from_name("Auto"), SchedMode::Auto);
        assert_eq!(mode_from_name(""), SchedMode::Auto);
        assert_eq!(mode_from_name("gaming"), SchedMode::Auto);
        assert_eq!(mode_from_name("LowLatency"), SchedMode::Auto);
    }

    #[test]
    fn test_ordinal_is_total_over_u8() {
        for raw in 0..=u8::MAX {
            let mode = mode_from_ordinal(raw as u32);
            match raw {
                0 => assert_eq!(mode, SchedMode::Auto),
                1 => assert_eq!(mode, SchedMode::Gaming),
                2 => assert_eq!(mode, SchedMode::PowerSave),
                3 => assert_eq!(mode, SchedMode::LowLatency),
                4 => assert_eq!(mode, SchedMode::Server),
                _ => assert_eq!(mode, SchedMode::Auto),
            }
        }
    }

    #[test]
    fn test_selector_order_matches_ordinals() {
        for (idx, mode) in SchedMode::ALL.iter().enumerate() {
            assert_eq!(mode.ordinal() as usize, idx);
        }
    }

    #[test]
    fn test_lowercase_names() {
        for mode in SchedMode::ALL {
            assert_eq!(mode.as_str().parse::<SchedMode>().unwrap(), mode);
        }
        assert!("Gaming".parse::<SchedMode>().is_err());
    }
}
