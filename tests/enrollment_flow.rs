//! Voice and face enrollment driven by their simulated timers.

use std::cell::RefCell;
use std::time::Duration;

use smart_home_dashboard::panels::enrollment::{
    FaceEnrollment, VoiceEnrollment, VoiceStep, MAX_FACE_PHOTOS, UPLOAD_DELAY, VOICE_LISTEN,
    VOICE_PHRASE,
};
use smart_home_dashboard::panels::ValidationError;
use smart_home_dashboard::timer;

#[tokio::test(start_paused = true)]
async fn voice_listens_then_uploads() {
    let voice = RefCell::new(VoiceEnrollment::new());
    voice
        .borrow_mut()
        .verify_password("clave")
        .expect("password accepted");

    let ticket = voice.borrow_mut().start_listening().expect("listening");
    let listen_timer = async {
        timer::sleep(VOICE_LISTEN).await;
        voice.borrow_mut().finish_listening(ticket)
    };
    let just_before = async {
        timer::sleep(VOICE_LISTEN - Duration::from_millis(1)).await;
        voice.borrow().step()
    };
    let (captured, step_before) = tokio::join!(listen_timer, just_before);
    assert_eq!(step_before, VoiceStep::Listening);
    assert!(captured);
    assert_eq!(voice.borrow().transcript(), Some(VOICE_PHRASE));

    let started = tokio::time::Instant::now();
    let ticket = voice.borrow_mut().start_upload().expect("upload");
    timer::sleep(UPLOAD_DELAY).await;
    assert!(voice.borrow_mut().finish_upload(ticket));
    assert!(started.elapsed() >= UPLOAD_DELAY);
    assert_eq!(voice.borrow().step(), VoiceStep::Saved);
    assert!(voice.borrow().is_registered());
}

#[tokio::test(start_paused = true)]
async fn closing_mid_listen_leaves_no_sample() {
    let mut voice = VoiceEnrollment::new();
    voice.verify_password("clave").expect("password accepted");
    let stale = voice.start_listening().expect("listening");

    timer::sleep(Duration::from_millis(500)).await;
    voice.close();

    // Reopened and listening again before the first window would have ended
    let current = voice.start_listening().expect("listening again");
    timer::sleep(VOICE_LISTEN - Duration::from_millis(500)).await;
    assert!(!voice.finish_listening(stale));
    assert_eq!(voice.step(), VoiceStep::Listening);

    timer::sleep(Duration::from_millis(500)).await;
    assert!(voice.finish_listening(current));
    assert_eq!(voice.step(), VoiceStep::Captured);
}

#[tokio::test(start_paused = true)]
async fn face_upload_takes_a_second_and_clears_photos() {
    let face = RefCell::new(FaceEnrollment::new());
    face.borrow_mut()
        .verify_password("clave")
        .expect("password accepted");
    for _ in 0..MAX_FACE_PHOTOS {
        face.borrow_mut().take_photo().expect("photo");
    }
    assert!(face.borrow().is_complete());

    let ticket = face.borrow_mut().start_upload().expect("upload");
    let upload_timer = async {
        timer::sleep(UPLOAD_DELAY).await;
        face.borrow_mut().finish_upload(ticket)
    };
    let just_before = async {
        timer::sleep(UPLOAD_DELAY - Duration::from_millis(1)).await;
        face.borrow().is_uploading()
    };
    let (finished, uploading_before) = tokio::join!(upload_timer, just_before);

    assert!(uploading_before);
    assert!(finished);
    assert!(face.borrow().photos().is_empty());
    assert!(face.borrow().is_registered());
}

#[tokio::test(start_paused = true)]
async fn face_dialog_closed_during_upload_registers_nothing() {
    let mut face = FaceEnrollment::new();
    face.verify_password("clave").expect("password accepted");
    face.take_photo().expect("photo");
    let ticket = face.start_upload().expect("upload");

    face.close();
    timer::sleep(UPLOAD_DELAY).await;
    assert!(!face.finish_upload(ticket));
    assert!(!face.is_registered());
    assert_eq!(face.start_upload(), Err(ValidationError::NoFacePhotos));
}
