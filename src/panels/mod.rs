//! Feature panel state.
//!
//! Everything in here is plain data plus operations, with no UI types, so
//! each panel can be driven directly from tests. The Dioxus pages in
//! `app::pages` hold these structs in signals.

pub mod backend;
pub mod devices;
pub mod enrollment;
pub mod family;
pub mod location;
pub mod notifications;
pub mod recovery;
pub mod routines;
pub mod security;

use thiserror::Error;

use crate::storage::StorageError;
use backend::BackendError;
use devices::DeviceId;

/// Input rejected before any operation is attempted.
///
/// The display text is what the panel shows inline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("El nombre no puede quedar vacío.")]
    NameRequired,
    #[error("Escribe la frase que activará la rutina.")]
    PhraseRequired,
    #[error("La hora debe tener el formato HH:MM.")]
    InvalidHour,
    #[error("Selecciona un dispositivo y un evento.")]
    EventRequired,
    #[error("Agrega al menos una acción o un mensaje de voz.")]
    ActionRequired,
    #[error("El nombre de usuario es obligatorio.")]
    UsernameRequired,
    #[error("Ya existe un miembro con ese nombre.")]
    DuplicateMember,
    #[error("La contraseña debe tener al menos {min} caracteres.")]
    PasswordTooShort { min: usize },
    #[error("Las contraseñas no coinciden.")]
    PasswordMismatch,
    #[error("Solo el propietario puede agregar nuevos usuarios.")]
    NotOwner,
    #[error("Ingresa un correo electrónico válido.")]
    InvalidEmail,
    #[error("El código debe tener 6 dígitos.")]
    InvalidCode,
    #[error("Coordenadas fuera de rango.")]
    InvalidCoordinates,
    #[error("Confirma tu contraseña actual.")]
    CurrentPasswordRequired,
    #[error("Primero verifica tu contraseña actual.")]
    VerifyPasswordFirst,
    #[error("Graba tu voz antes de guardarla.")]
    NoVoiceSample,
    #[error("Toma al menos una foto de tu rostro.")]
    NoFacePhotos,
    #[error("Ya tomaste las {max} fotos.")]
    PhotoLimit { max: usize },
    #[error("Espera a que termine la operación en curso.")]
    EnrollmentBusy,
}

#[derive(Debug, Error)]
pub enum PanelError {
    #[error("El dispositivo {0} no existe.")]
    UnknownDevice(DeviceId),
    #[error("La rutina {0} ya no existe.")]
    UnknownRoutine(String),
    #[error("El miembro {0} ya no existe.")]
    UnknownMember(String),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Minimum password length for new members and password resets
pub const MIN_PASSWORD_LEN: usize = 4;

/// Shared password rule: long enough and confirmed
pub fn check_new_password(password: &str, confirm: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
        });
    }
    if password != confirm {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_rules() {
        assert_eq!(
            check_new_password("abc", "abc"),
            Err(ValidationError::PasswordTooShort { min: 4 })
        );
        assert_eq!(
            check_new_password("abcd", "abce"),
            Err(ValidationError::PasswordMismatch)
        );
        assert!(check_new_password("ñandú", "ñandú").is_ok());
    }

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            ValidationError::PasswordTooShort { min: 4 }.to_string(),
            "La contraseña debe tener al menos 4 caracteres."
        );
        assert_eq!(
            PanelError::from(ValidationError::NameRequired).to_string(),
            "El nombre no puede quedar vacío."
        );
    }
}
