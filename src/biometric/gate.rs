// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Biometric capability checks and challenges.
//!
//! The platform prompt sits behind [`BiometricAuthenticator`]; the gate adds
//! the simulator precondition and the hardware/enrollment checks. A failed
//! or cancelled challenge is an `Err`, never a panic, and is never retried
//! here.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use super::device::DeviceInfo;

pub const SIMULATOR_MESSAGE: &str = "La autenticación biométrica no está disponible en simuladores";
pub const UNSUPPORTED_MESSAGE: &str = "El dispositivo no soporta autenticación biométrica";
pub const NOT_ENROLLED_MESSAGE: &str = "No hay datos biométricos configurados";
pub const CANCELLED_MESSAGE: &str = "Autenticación cancelada por el usuario";
pub const FAILED_MESSAGE: &str = "Autenticación biométrica fallida";
pub const PLATFORM_ERROR_MESSAGE: &str = "Error durante la autenticación biométrica";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BiometryType {
    Fingerprint,
    FacialRecognition,
    Iris,
}

/// Every failure is recoverable: the UI may offer a retry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BiometricError {
    #[error("{}", SIMULATOR_MESSAGE)]
    Simulated,

    #[error("{}", UNSUPPORTED_MESSAGE)]
    Unsupported,

    #[error("{}", NOT_ENROLLED_MESSAGE)]
    NotEnrolled,

    #[error("{}", CANCELLED_MESSAGE)]
    Cancelled,

    /// Challenge rejected; carries the platform reason or [`FAILED_MESSAGE`].
    #[error("{0}")]
    Failed(String),

    /// The platform API itself failed; the detail is only logged.
    #[error("{}", PLATFORM_ERROR_MESSAGE)]
    Platform(String),
}

/// What the native prompt reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeOutcome {
    Success,
    Cancelled,
    Failed(Option<String>),
}

/// Labels shown by the native prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptOptions {
    pub prompt_message: String,
    pub fallback_label: String,
    pub cancel_label: String,
    /// Disallow the device passcode as a fallback.
    pub disable_device_fallback: bool,
}

impl Default for PromptOptions {
    fn default() -> Self {
        Self {
            prompt_message: "Confirma tu identidad".to_string(),
            fallback_label: "Usar código".to_string(),
            cancel_label: "Cancelar".to_string(),
            disable_device_fallback: false,
        }
    }
}

impl PromptOptions {
    pub fn new(
        prompt_message: impl Into<String>,
        fallback_label: impl Into<String>,
        cancel_label: impl Into<String>,
    ) -> Self {
        Self {
            prompt_message: prompt_message.into(),
            fallback_label: fallback_label.into(),
            cancel_label: cancel_label.into(),
            disable_device_fallback: false,
        }
    }
}

/// Native biometric API of the host platform.
#[async_trait]
pub trait BiometricAuthenticator: Send + Sync {
    async fn has_hardware(&self) -> Result<bool, BiometricError>;

    async fn is_enrolled(&self) -> Result<bool, BiometricError>;

    async fn supported_types(&self) -> Result<Vec<BiometryType>, BiometricError>;

    async fn authenticate(&self, options: &PromptOptions) -> Result<NativeOutcome, BiometricError>;
}

/// Result of [`BiometricGate::is_available`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    Available(Vec<BiometryType>),
    Unavailable(BiometricError),
}

impl Availability {
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available(_))
    }

    /// Why biometrics cannot be used, if they cannot.
    pub fn reason(&self) -> Option<String> {
        match self {
            Availability::Available(_) => None,
            Availability::Unavailable(e) => Some(e.to_string()),
        }
    }

    pub fn biometry_types(&self) -> &[BiometryType] {
        match self {
            Availability::Available(types) => types,
            Availability::Unavailable(_) => &[],
        }
    }
}

/// Supported biometry types on success.
pub type BiometricResult = Result<Vec<BiometryType>, BiometricError>;

pub struct BiometricGate {
    authenticator: Arc<dyn BiometricAuthenticator>,
    device: DeviceInfo,
}

impl BiometricGate {
    pub fn new(authenticator: Arc<dyn BiometricAuthenticator>, device: DeviceInfo) -> Self {
        Self {
            authenticator,
            device,
        }
    }

    pub fn device(&self) -> &DeviceInfo {
        &self.device
    }

    /// Simulator check, then hardware, then enrollment.
    pub async fn is_available(&self) -> Availability {
        if self.device.is_simulated() {
            warn!(platform = ?self.device.platform, "Biometrics unavailable on simulated device");
            return Availability::Unavailable(BiometricError::Simulated);
        }

        if !self.check("hardware", self.authenticator.has_hardware().await) {
            return Availability::Unavailable(BiometricError::Unsupported);
        }
        if !self.check("enrollment", self.authenticator.is_enrolled().await) {
            return Availability::Unavailable(BiometricError::NotEnrolled);
        }

        let types = self.authenticator.supported_types().await.unwrap_or_else(|e| {
            warn!(error = ?e, "Failed to list biometry types");
            Vec::new()
        });
        Availability::Available(types)
    }

    /// Issue a single native challenge.
    pub async fn authenticate(&self, options: &PromptOptions) -> BiometricResult {
        let types = match self.is_available().await {
            Availability::Available(types) => types,
            Availability::Unavailable(e) => return Err(e),
        };

        match self.authenticator.authenticate(options).await {
            Ok(NativeOutcome::Success) => Ok(types),
            Ok(NativeOutcome::Cancelled) => {
                info!("Biometric prompt cancelled by user");
                Err(BiometricError::Cancelled)
            }
            Ok(NativeOutcome::Failed(reason)) => Err(BiometricError::Failed(
                reason
                    .filter(|r| !r.is_empty())
                    .unwrap_or_else(|| FAILED_MESSAGE.to_string()),
            )),
            Err(e) => {
                error!(error = ?e, "Biometric authentication failed in platform API");
                Err(e)
            }
        }
    }

    fn check(&self, what: &'static str, result: Result<bool, BiometricError>) -> bool {
        result.unwrap_or_else(|e| {
            warn!(check = what, error = ?e, "Biometric capability check failed");
            false
        })
    }
}

/// Human-readable name of the strongest available biometry.
pub fn describe_biometry(types: &[BiometryType]) -> &'static str {
    if types.contains(&BiometryType::FacialRecognition) {
        "Face ID"
    } else if types.contains(&BiometryType::Fingerprint) {
        "Touch ID / Huella digital"
    } else if types.contains(&BiometryType::Iris) {
        "Reconocimiento de iris"
    } else {
        "Autenticación biométrica"
    }
}

/// Always-succeeding authenticator for development builds.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedAuthenticator;

#[async_trait]
impl BiometricAuthenticator for SimulatedAuthenticator {
    async fn has_hardware(&self) -> Result<bool, BiometricError> {
        Ok(true)
    }

    async fn is_enrolled(&self) -> Result<bool, BiometricError> {
        Ok(true)
    }

    async fn supported_types(&self) -> Result<Vec<BiometryType>, BiometricError> {
        Ok(Vec::new())
    }

    async fn authenticate(&self, _options: &PromptOptions) -> Result<NativeOutcome, BiometricError> {
        info!("Simulating successful biometric authentication");
        Ok(NativeOutcome::Success)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::biometric::device::Platform;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Authenticator with fixed capabilities and a queue of prompt outcomes.
    pub(crate) struct ScriptedAuthenticator {
        pub hardware: Result<bool, BiometricError>,
        pub enrolled: bool,
        pub types: Vec<BiometryType>,
        pub outcomes: Mutex<Vec<Result<NativeOutcome, BiometricError>>>,
        pub prompts: AtomicUsize,
        pub last_options: Mutex<Option<PromptOptions>>,
    }

    impl ScriptedAuthenticator {
        pub(crate) fn new(outcomes: Vec<Result<NativeOutcome, BiometricError>>) -> Self {
            Self {
                hardware: Ok(true),
                enrolled: true,
                types: vec![BiometryType::Fingerprint],
                outcomes: Mutex::new(outcomes),
                prompts: AtomicUsize::new(0),
                last_options: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl BiometricAuthenticator for ScriptedAuthenticator {
        async fn has_hardware(&self) -> Result<bool, BiometricError> {
            self.hardware.clone()
        }

        async fn is_enrolled(&self) -> Result<bool, BiometricError> {
            Ok(self.enrolled)
        }

        async fn supported_types(&self) -> Result<Vec<BiometryType>, BiometricError> {
            Ok(self.types.clone())
        }

        async fn authenticate(&self, options: &PromptOptions) -> Result<NativeOutcome, BiometricError> {
            self.prompts.fetch_add(1, Ordering::SeqCst);
            *self.last_options.lock().unwrap() = Some(options.clone());
            let mut outcomes = self.outcomes.lock().unwrap();
            if outcomes.is_empty() {
                Ok(NativeOutcome::Failed(None))
            } else {
                outcomes.remove(0)
            }
        }
    }

    pub(crate) fn phone() -> DeviceInfo {
        DeviceInfo::physical(Platform::Android, "Pixel 8")
    }

    #[tokio::test]
    async fn simulator_is_a_hard_precondition() {
        let authenticator = Arc::new(ScriptedAuthenticator::new(vec![Ok(NativeOutcome::Success)]));
        let gate = BiometricGate::new(
            authenticator.clone(),
            DeviceInfo::physical(Platform::Android, "sdk_gphone64_arm64"),
        );

        let availability = gate.is_available().await;
        assert_eq!(availability, Availability::Unavailable(BiometricError::Simulated));
        assert_eq!(availability.reason().as_deref(), Some(SIMULATOR_MESSAGE));

        assert_eq!(
            gate.authenticate(&PromptOptions::default()).await,
            Err(BiometricError::Simulated)
        );
        assert_eq!(authenticator.prompts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_hardware_and_enrollment() {
        let mut no_hardware = ScriptedAuthenticator::new(vec![]);
        no_hardware.hardware = Err(BiometricError::Platform("binder died".to_string()));
        let gate = BiometricGate::new(Arc::new(no_hardware), phone());
        assert_eq!(
            gate.is_available().await.reason().as_deref(),
            Some(UNSUPPORTED_MESSAGE)
        );

        let mut not_enrolled = ScriptedAuthenticator::new(vec![]);
        not_enrolled.enrolled = false;
        let gate = BiometricGate::new(Arc::new(not_enrolled), phone());
        assert_eq!(
            gate.is_available().await,
            Availability::Unavailable(BiometricError::NotEnrolled)
        );
    }

    #[tokio::test]
    async fn available_reports_types() {
        let mut authenticator = ScriptedAuthenticator::new(vec![]);
        authenticator.types = vec![BiometryType::Fingerprint, BiometryType::FacialRecognition];
        let gate = BiometricGate::new(Arc::new(authenticator), phone());

        let availability = gate.is_available().await;
        assert!(availability.is_available());
        assert_eq!(availability.reason(), None);
        assert_eq!(describe_biometry(availability.biometry_types()), "Face ID");
    }

    #[tokio::test]
    async fn single_challenge_per_call() {
        let authenticator = Arc::new(ScriptedAuthenticator::new(vec![
            Ok(NativeOutcome::Cancelled),
            Ok(NativeOutcome::Failed(Some("lockout".to_string()))),
            Ok(NativeOutcome::Failed(None)),
            Err(BiometricError::Platform("native crash".to_string())),
            Ok(NativeOutcome::Success),
        ]));
        let gate = BiometricGate::new(authenticator.clone(), phone());
        let options = PromptOptions::default();

        assert_eq!(gate.authenticate(&options).await, Err(BiometricError::Cancelled));
        assert_eq!(
            gate.authenticate(&options).await,
            Err(BiometricError::Failed("lockout".to_string()))
        );
        assert_eq!(
            gate.authenticate(&options).await.unwrap_err().to_string(),
            FAILED_MESSAGE
        );
        assert_eq!(
            gate.authenticate(&options).await.unwrap_err().to_string(),
            PLATFORM_ERROR_MESSAGE
        );
        assert_eq!(
            gate.authenticate(&options).await,
            Ok(vec![BiometryType::Fingerprint])
        );
        assert_eq!(authenticator.prompts.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn prompt_labels_reach_the_platform() {
        let authenticator = Arc::new(ScriptedAuthenticator::new(vec![Ok(NativeOutcome::Success)]));
        let gate = BiometricGate::new(authenticator.clone(), phone());
        let options = PromptOptions::new("Desbloquea la app", "Usar PIN", "Salir");

        gate.authenticate(&options).await.unwrap();
        assert_eq!(authenticator.last_options.lock().unwrap().as_ref(), Some(&options));
    }

    #[test]
    fn default_labels_and_descriptions() {
        let options = PromptOptions::default();
        assert_eq!(options.prompt_message, "Confirma tu identidad");
        assert_eq!(options.fallback_label, "Usar código");
        assert_eq!(options.cancel_label, "Cancelar");

        assert_eq!(describe_biometry(&[BiometryType::Fingerprint]), "Touch ID / Huella digital");
        assert_eq!(describe_biometry(&[BiometryType::Iris]), "Reconocimiento de iris");
        assert_eq!(describe_biometry(&[]), "Autenticación biométrica");
    }

    #[tokio::test]
    async fn simulated_authenticator_always_succeeds() {
        let gate = BiometricGate::new(Arc::new(SimulatedAuthenticator), phone());
        assert_eq!(gate.authenticate(&PromptOptions::default()).await, Ok(Vec::new()));
    }
}
