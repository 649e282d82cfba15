//! Password recovery wizard: request a code, verify it, set a new password.

use super::{check_new_password, ValidationError};

pub const CODE_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecoveryStep {
    #[default]
    RequestCode,
    VerifyCode,
    ResetPassword,
    Done,
}

impl RecoveryStep {
    /// 1-based position for the progress indicator
    pub fn number(self) -> u8 {
        match self {
            RecoveryStep::RequestCode => 1,
            RecoveryStep::VerifyCode => 2,
            RecoveryStep::ResetPassword | RecoveryStep::Done => 3,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            RecoveryStep::RequestCode => "Solicitar código",
            RecoveryStep::VerifyCode => "Verificar código",
            RecoveryStep::ResetPassword => "Nueva contraseña",
            RecoveryStep::Done => "Contraseña actualizada",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecoveryWizard {
    step: RecoveryStep,
    email: String,
}

impl RecoveryWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> RecoveryStep {
        self.step
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Step 1. The code is not actually delivered anywhere.
    pub fn send_code(&mut self, email: &str) -> Result<(), ValidationError> {
        let email = email.trim();
        if !email.contains('@') {
            return Err(ValidationError::InvalidEmail);
        }
        self.email = email.to_string();
        self.step = RecoveryStep::VerifyCode;
        tracing::info!("Recovery code requested for {}", self.email);
        Ok(())
    }

    /// Step 2. Any six digits pass.
    pub fn verify_code(&mut self, code: &str) -> Result<(), ValidationError> {
        let code = code.trim();
        if code.len() != CODE_LEN || !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::InvalidCode);
        }
        self.step = RecoveryStep::ResetPassword;
        Ok(())
    }

    /// Step 3
    pub fn reset_password(&mut self, password: &str, confirm: &str) -> Result<(), ValidationError> {
        check_new_password(password, confirm)?;
        self.step = RecoveryStep::Done;
        tracing::info!("Password reset completed for {}", self.email);
        Ok(())
    }

    /// Go back one step; the first step stays put
    pub fn back(&mut self) {
        self.step = match self.step {
            RecoveryStep::RequestCode | RecoveryStep::VerifyCode => RecoveryStep::RequestCode,
            RecoveryStep::ResetPassword => RecoveryStep::VerifyCode,
            RecoveryStep::Done => RecoveryStep::Done,
        };
    }

    pub fn is_done(&self) -> bool {
        self.step == RecoveryStep::Done
    }
}
