//! Voice and face enrollment for the signed-in user.
//!
//! Both flows start by confirming the current password. Recognition is
//! simulated: listening and uploading are ticketed transitions that a timer
//! finishes, so closing the dialog mid-way cancels whatever is in flight.

use std::time::Duration;

use chrono::{DateTime, Utc};

use super::ValidationError;
use crate::transition::{Transition, TransitionTicket};

/// Phrase the user reads aloud
pub const VOICE_PHRASE: &str =
    "Hola asistente, estoy configurando mi perfil de voz para el sistema de casa inteligente";
/// Simulated listening window
pub const VOICE_LISTEN: Duration = Duration::from_millis(3000);
/// Mocked upload of a voice sample or the face photos
pub const UPLOAD_DELAY: Duration = Duration::from_millis(1000);
pub const MAX_FACE_PHOTOS: usize = 3;

/// The mock session keeps no password, so any non-blank entry confirms it
fn check_current_password(password: &str) -> Result<(), ValidationError> {
    if password.trim().is_empty() {
        return Err(ValidationError::CurrentPasswordRequired);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoiceStep {
    #[default]
    Locked,
    Ready,
    Listening,
    Captured,
    Uploading,
    Saved,
}

impl VoiceStep {
    pub fn status(self) -> Option<&'static str> {
        match self {
            VoiceStep::Locked => None,
            VoiceStep::Ready => Some("✅ Contraseña verificada. Puedes agregar tu voz."),
            VoiceStep::Listening => Some("Escuchando..."),
            VoiceStep::Captured => Some("Voz capturada. Guárdala para terminar."),
            VoiceStep::Uploading => Some("Guardando voz..."),
            VoiceStep::Saved => Some("✅ Voz registrada."),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct VoiceEnrollment {
    step: VoiceStep,
    transcript: Option<String>,
    pending: Transition,
    registered: bool,
}

impl VoiceEnrollment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> VoiceStep {
        self.step
    }

    pub fn transcript(&self) -> Option<&str> {
        self.transcript.as_deref()
    }

    pub fn is_verified(&self) -> bool {
        self.step != VoiceStep::Locked
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.step, VoiceStep::Listening | VoiceStep::Uploading)
    }

    /// A sample has been saved at least once
    pub fn is_registered(&self) -> bool {
        self.registered
    }

    pub fn verify_password(&mut self, password: &str) -> Result<(), ValidationError> {
        if self.is_busy() {
            return Err(ValidationError::EnrollmentBusy);
        }
        check_current_password(password)?;
        if self.step == VoiceStep::Locked {
            self.step = VoiceStep::Ready;
        }
        Ok(())
    }

    /// Open the microphone; finish with the ticket after [`VOICE_LISTEN`].
    /// Listening again discards the previous sample.
    pub fn start_listening(&mut self) -> Result<TransitionTicket, ValidationError> {
        match self.step {
            VoiceStep::Locked => Err(ValidationError::VerifyPasswordFirst),
            VoiceStep::Listening | VoiceStep::Uploading => Err(ValidationError::EnrollmentBusy),
            VoiceStep::Ready | VoiceStep::Captured | VoiceStep::Saved => {
                self.transcript = None;
                self.step = VoiceStep::Listening;
                Ok(self.pending.start())
            }
        }
    }

    pub fn finish_listening(&mut self, ticket: TransitionTicket) -> bool {
        if self.step != VoiceStep::Listening || !self.pending.finish(ticket) {
            return false;
        }
        self.transcript = Some(VOICE_PHRASE.to_string());
        self.step = VoiceStep::Captured;
        true
    }

    /// Send the captured sample; finish with the ticket after [`UPLOAD_DELAY`]
    pub fn start_upload(&mut self) -> Result<TransitionTicket, ValidationError> {
        match self.step {
            VoiceStep::Locked => Err(ValidationError::VerifyPasswordFirst),
            VoiceStep::Listening | VoiceStep::Uploading => Err(ValidationError::EnrollmentBusy),
            VoiceStep::Ready | VoiceStep::Saved => Err(ValidationError::NoVoiceSample),
            VoiceStep::Captured => {
                self.step = VoiceStep::Uploading;
                Ok(self.pending.start())
            }
        }
    }

    pub fn finish_upload(&mut self, ticket: TransitionTicket) -> bool {
        if self.step != VoiceStep::Uploading || !self.pending.finish(ticket) {
            return false;
        }
        self.step = VoiceStep::Saved;
        self.registered = true;
        tracing::info!("Voice sample registered");
        true
    }

    /// Dialog closed: cancel anything in flight, keep the verification
    pub fn close(&mut self) {
        self.pending.cancel();
        self.transcript = None;
        if self.step != VoiceStep::Locked {
            self.step = VoiceStep::Ready;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacePhoto {
    pub taken_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct FaceEnrollment {
    verified: bool,
    photos: Vec<FacePhoto>,
    uploading: Transition,
    registered: bool,
}

impl FaceEnrollment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_verified(&self) -> bool {
        self.verified
    }

    pub fn photos(&self) -> &[FacePhoto] {
        &self.photos
    }

    /// The first photo counts as a detected face
    pub fn face_detected(&self) -> bool {
        !self.photos.is_empty()
    }

    /// Every photo slot is filled; saving is offered
    pub fn is_complete(&self) -> bool {
        self.photos.len() == MAX_FACE_PHOTOS
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading.is_active()
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }

    pub fn verify_password(&mut self, password: &str) -> Result<(), ValidationError> {
        if self.is_uploading() {
            return Err(ValidationError::EnrollmentBusy);
        }
        check_current_password(password)?;
        self.verified = true;
        Ok(())
    }

    /// Capture a frame. Returns how many photos are held now.
    pub fn take_photo(&mut self) -> Result<usize, ValidationError> {
        if !self.verified {
            return Err(ValidationError::VerifyPasswordFirst);
        }
        if self.is_uploading() {
            return Err(ValidationError::EnrollmentBusy);
        }
        if self.photos.len() >= MAX_FACE_PHOTOS {
            return Err(ValidationError::PhotoLimit {
                max: MAX_FACE_PHOTOS,
            });
        }
        self.photos.push(FacePhoto {
            taken_at: Utc::now(),
        });
        Ok(self.photos.len())
    }

    /// Send the photos; finish with the ticket after [`UPLOAD_DELAY`]
    pub fn start_upload(&mut self) -> Result<TransitionTicket, ValidationError> {
        if !self.verified {
            return Err(ValidationError::VerifyPasswordFirst);
        }
        if self.is_uploading() {
            return Err(ValidationError::EnrollmentBusy);
        }
        if self.photos.is_empty() {
            return Err(ValidationError::NoFacePhotos);
        }
        Ok(self.uploading.start())
    }

    /// Completes the upload and discards the photos
    pub fn finish_upload(&mut self, ticket: TransitionTicket) -> bool {
        if !self.uploading.finish(ticket) {
            return false;
        }
        tracing::info!("Registered face from {} photos", self.photos.len());
        self.photos.clear();
        self.registered = true;
        true
    }

    /// Dialog closed: photos are discarded and any upload is abandoned
    pub fn close(&mut self) {
        self.uploading.cancel();
        self.photos.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verified_voice() -> VoiceEnrollment {
        let mut voice = VoiceEnrollment::new();
        voice.verify_password("clave").unwrap();
        voice
    }

    fn verified_face() -> FaceEnrollment {
        let mut face = FaceEnrollment::new();
        face.verify_password("clave").unwrap();
        face
    }

    #[test]
    fn test_voice_requires_password_first() {
        let mut voice = VoiceEnrollment::new();
        assert_eq!(
            voice.start_listening(),
            Err(ValidationError::VerifyPasswordFirst)
        );
        assert_eq!(
            voice.verify_password("   "),
            Err(ValidationError::CurrentPasswordRequired)
        );
        assert!(!voice.is_verified());

        voice.verify_password("clave").unwrap();
        assert_eq!(voice.step(), VoiceStep::Ready);
        assert!(voice.step().status().is_some());
    }

    #[test]
    fn test_voice_full_flow() {
        let mut voice = verified_voice();
        assert_eq!(voice.start_upload(), Err(ValidationError::NoVoiceSample));

        let listen = voice.start_listening().unwrap();
        assert!(voice.is_busy());
        assert_eq!(voice.start_listening(), Err(ValidationError::EnrollmentBusy));
        assert!(voice.finish_listening(listen));
        assert_eq!(voice.transcript(), Some(VOICE_PHRASE));

        let upload = voice.start_upload().unwrap();
        // The listening ticket cannot end the upload
        assert!(!voice.finish_upload(listen));
        assert!(voice.finish_upload(upload));
        assert_eq!(voice.step(), VoiceStep::Saved);
        assert!(voice.is_registered());
    }

    #[test]
    fn test_voice_close_cancels_listening() {
        let mut voice = verified_voice();
        let listen = voice.start_listening().unwrap();
        voice.close();
        assert_eq!(voice.step(), VoiceStep::Ready);
        assert!(!voice.finish_listening(listen));
        assert!(voice.transcript().is_none());
    }

    #[test]
    fn test_voice_close_cancels_upload() {
        let mut voice = verified_voice();
        let listen = voice.start_listening().unwrap();
        voice.finish_listening(listen);
        let upload = voice.start_upload().unwrap();
        voice.close();
        assert!(!voice.finish_upload(upload));
        assert!(!voice.is_registered());
    }

    #[test]
    fn test_face_requires_password_first() {
        let mut face = FaceEnrollment::new();
        assert_eq!(face.take_photo(), Err(ValidationError::VerifyPasswordFirst));
        assert_eq!(face.start_upload(), Err(ValidationError::VerifyPasswordFirst));
        assert_eq!(
            face.verify_password(""),
            Err(ValidationError::CurrentPasswordRequired)
        );
    }

    #[test]
    fn test_face_photo_limit() {
        let mut face = verified_face();
        assert!(!face.face_detected());
        for expected in 1..=MAX_FACE_PHOTOS {
            assert_eq!(face.take_photo(), Ok(expected));
        }
        assert!(face.face_detected());
        assert!(face.is_complete());
        assert_eq!(
            face.take_photo(),
            Err(ValidationError::PhotoLimit {
                max: MAX_FACE_PHOTOS
            })
        );
        assert_eq!(face.photos().len(), MAX_FACE_PHOTOS);
    }

    #[test]
    fn test_face_upload() {
        let mut face = verified_face();
        assert_eq!(face.start_upload(), Err(ValidationError::NoFacePhotos));

        face.take_photo().unwrap();
        let ticket = face.start_upload().unwrap();
        assert!(face.is_uploading());
        assert_eq!(face.take_photo(), Err(ValidationError::EnrollmentBusy));
        assert_eq!(face.start_upload(), Err(ValidationError::EnrollmentBusy));

        assert!(face.finish_upload(ticket));
        assert!(face.photos().is_empty());
        assert!(face.is_registered());
        assert!(!face.finish_upload(ticket));
    }

    #[test]
    fn test_face_close_abandons_upload() {
        let mut face = verified_face();
        face.take_photo().unwrap();
        let ticket = face.start_upload().unwrap();
        face.close();
        assert!(!face.is_uploading());
        assert!(face.photos().is_empty());
        assert!(!face.finish_upload(ticket));
        assert!(!face.is_registered());
        // Verification survives closing the dialog
        assert!(face.is_verified());
    }
}
