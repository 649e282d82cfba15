//! Session hydration, login, the timed post-login overlay and logout.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use smart_home_dashboard::session::{
    Session, SessionError, SessionPhase, UserProfile, POST_LOGIN_TRANSITION,
};
use smart_home_dashboard::storage::{MemoryStore, SharedStore, ACCESS_TOKEN_KEY, USER_KEY};
use smart_home_dashboard::timer;

fn session_on(store: &Rc<MemoryStore>) -> Session {
    let shared: SharedStore = store.clone();
    Session::new(shared)
}

#[test]
fn fresh_session_is_loading_until_checked() {
    let store = Rc::new(MemoryStore::new());
    let mut session = session_on(&store);
    assert_eq!(session.phase(), SessionPhase::Uninitialized);
    assert!(session.is_loading());

    session.check_auth();
    assert_eq!(session.phase(), SessionPhase::Unauthenticated);
    assert!(!session.is_loading());
    assert!(session.user().is_none());
}

#[test]
fn login_survives_a_reload() {
    let store = Rc::new(MemoryStore::new());
    let mut first = session_on(&store);
    first.check_auth();
    first.login("marta", "clave").expect("login should succeed");

    let mut reloaded = session_on(&store);
    reloaded.check_auth();
    assert!(reloaded.is_authenticated());
    assert_eq!(reloaded.user(), Some(&UserProfile::from_username("marta")));
    assert_eq!(reloaded.access_token(), first.access_token());
    // A restored session does not replay the door animation
    assert!(!reloaded.is_post_login_transition());
}

#[test]
fn corrupt_profile_is_discarded() {
    let store = Rc::new(
        MemoryStore::new()
            .with_entry(ACCESS_TOKEN_KEY, "mock_token_1")
            .with_entry(USER_KEY, "{not json"),
    );
    let mut session = session_on(&store);
    session.check_auth();

    assert_eq!(session.phase(), SessionPhase::Unauthenticated);
    assert!(!store.contains(ACCESS_TOKEN_KEY));
    assert!(!store.contains(USER_KEY));
}

#[test]
fn token_without_profile_is_logged_out() {
    let store = Rc::new(MemoryStore::new().with_entry(ACCESS_TOKEN_KEY, "mock_token_1"));
    let mut session = session_on(&store);
    session.check_auth();
    assert!(!session.is_authenticated());
}

#[test]
fn empty_credentials_are_rejected() {
    let store = Rc::new(MemoryStore::new());
    let mut session = session_on(&store);
    session.check_auth();

    assert!(matches!(
        session.login("   ", "x"),
        Err(SessionError::MissingCredentials)
    ));
    assert!(matches!(
        session.login("ana", ""),
        Err(SessionError::MissingCredentials)
    ));
    assert!(store.is_empty());
    assert!(!session.is_post_login_transition());
}

#[test]
fn failed_persist_leaves_session_logged_out() {
    let store = Rc::new(MemoryStore::read_only());
    let mut session = session_on(&store);
    session.check_auth();

    assert!(matches!(
        session.login("ana", "clave"),
        Err(SessionError::Storage(_))
    ));
    assert_eq!(session.phase(), SessionPhase::Unauthenticated);
    assert!(!session.is_post_login_transition());
}

#[test]
fn logout_clears_everything() {
    let store = Rc::new(MemoryStore::new());
    let mut session = session_on(&store);
    session.check_auth();
    session.login("ana", "clave").expect("login should succeed");

    session.logout();
    assert_eq!(session.phase(), SessionPhase::Unauthenticated);
    assert!(session.user().is_none());
    assert!(session.access_token().is_none());
    assert!(!session.is_post_login_transition());
    assert!(store.is_empty());
}

#[tokio::test(start_paused = true)]
async fn post_login_overlay_lasts_two_seconds() {
    let store = Rc::new(MemoryStore::new());
    let session = RefCell::new(session_on(&store));
    session.borrow_mut().check_auth();

    let ticket = session
        .borrow_mut()
        .login("ana", "clave")
        .expect("login should succeed");
    assert!(session.borrow().is_authenticated());
    assert!(session.borrow().is_post_login_transition());

    let started = tokio::time::Instant::now();
    let overlay_timer = async {
        timer::sleep(POST_LOGIN_TRANSITION).await;
        session.borrow_mut().finish_post_login_transition(ticket)
    };
    let just_before = async {
        timer::sleep(POST_LOGIN_TRANSITION - Duration::from_millis(1)).await;
        session.borrow().is_post_login_transition()
    };
    let (finished, showing_before_deadline) = tokio::join!(overlay_timer, just_before);

    assert!(showing_before_deadline);
    assert!(finished);
    assert!(!session.borrow().is_post_login_transition());
    assert!(started.elapsed() >= POST_LOGIN_TRANSITION);
}

#[tokio::test(start_paused = true)]
async fn timer_from_an_earlier_login_is_ignored() {
    let store = Rc::new(MemoryStore::new());
    let mut session = session_on(&store);
    session.check_auth();

    let stale = session.login("ana", "clave").expect("first login");
    session.logout();
    timer::sleep(Duration::from_millis(500)).await;
    let current = session.login("ana", "clave").expect("second login");

    // The first timer fires while the second overlay is still up
    timer::sleep(POST_LOGIN_TRANSITION - Duration::from_millis(500)).await;
    assert!(!session.finish_post_login_transition(stale));
    assert!(session.is_post_login_transition());

    timer::sleep(Duration::from_millis(500)).await;
    assert!(session.finish_post_login_transition(current));
    assert!(!session.is_post_login_transition());
}
