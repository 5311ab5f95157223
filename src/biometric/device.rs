// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Host device description.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Ios,
    Android,
    Web,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub platform: Platform,
    /// Model name as reported by the OS, e.g. `sdk_gphone64_arm64`.
    pub device_name: Option<String>,
    /// The platform itself reports a simulator/emulator.
    pub is_simulator: bool,
}

const EMULATOR_MARKERS: [&str; 3] = ["sdk", "Simulator", "Emulator"];

impl DeviceInfo {
    /// A physical device on `platform`.
    pub fn physical(platform: Platform, device_name: impl Into<String>) -> Self {
        Self {
            platform,
            device_name: Some(device_name.into()),
            is_simulator: false,
        }
    }

    /// Whether biometrics are categorically unavailable here.
    ///
    /// Web and unknown platforms always count as simulated.
    pub fn is_simulated(&self) -> bool {
        if self.is_simulator {
            return true;
        }
        match self.platform {
            Platform::Ios => false,
            Platform::Android => self
                .device_name
                .as_deref()
                .is_some_and(|name| EMULATOR_MARKERS.iter().any(|m| name.contains(m))),
            Platform::Web | Platform::Other => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn android_emulators_are_detected_by_name() {
        assert!(DeviceInfo::physical(Platform::Android, "sdk_gphone64_arm64").is_simulated());
        assert!(DeviceInfo::physical(Platform::Android, "Android Emulator").is_simulated());
        assert!(!DeviceInfo::physical(Platform::Android, "Pixel 8").is_simulated());
    }

    #[test]
    fn web_is_always_simulated() {
        assert!(DeviceInfo::physical(Platform::Web, "Chrome").is_simulated());
        assert!(DeviceInfo::physical(Platform::Other, "desktop").is_simulated());
    }

    #[test]
    fn platform_flag_wins() {
        let mut device = DeviceInfo::physical(Platform::Ios, "iPhone 15");
        assert!(!device.is_simulated());
        device.is_simulator = true;
        assert!(device.is_simulated());
    }
}
