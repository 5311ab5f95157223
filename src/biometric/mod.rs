// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Biometric Gate
//!
//! Device capability checks and the challenge that unlocks the app.

pub mod device;
pub mod gate;

pub use device::{DeviceInfo, Platform};
pub use gate::{
    describe_biometry, Availability, BiometricAuthenticator, BiometricError, BiometricGate,
    BiometricResult, BiometryType, NativeOutcome, PromptOptions, SimulatedAuthenticator,
};
