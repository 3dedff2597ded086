// SPDX-License-Identifier: GPL-2.0
//
// Copyright (c) 2024-2025 Vladislav Nepogodin <vnepogodin@cachyos.org>

// This software may be used and distributed according to the terms of the
// GNU General Public License version 2.

/// Schedulers which ship distinct presets for every mode.
const PROFILE_SCHEDULERS: [&str; 2] = ["scx_bpfland", "scx_lavd"];

/// Whether selecting a mode is meaningful for the given scheduler.
pub fn supports_profiles(scheduler: &str) -> bool {
    PROFILE_SCHEDULERS.contains(&scheduler)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supports_profiles() {
        assert!(supports_profiles("scx_bpfland"));
        assert!(supports_profiles("scx_lavd"));
        assert!(!supports_profiles("scx_rusty"));
        assert!(!supports_profiles("scx_tickless"));
        assert!(!supports_profiles("bpfland"));
        assert!(!supports_profiles(""));
    }
}
