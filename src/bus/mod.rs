//! Event bus for panel → shell requests
//!
//! Uses a bounded futures mpsc channel: any number of panels hold an
//! [`EventBus`] handle, the shell owns the single [`EventStream`].
//! Events are typed and serialize as `{"type": ..., "payload": ...}`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::channel::mpsc;
use futures::StreamExt;
use serde::{Deserialize, Serialize};

use crate::navigation::MenuKey;

/// Default channel capacity
pub const BUS_CAPACITY: usize = 32;

/// Event types that can be published on the bus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum AppEvent {
    /// Switch the selected menu (e.g. "see all routines")
    Navigate { menu: MenuKey },
    /// Browser back/forward fired; re-read the address bar
    HistoryPopped,
    /// End the session from a panel
    LogoutRequested,
}

/// Publishing half, cheap to clone into every panel.
///
/// Clones share one sender so the channel capacity holds across all of
/// them (every distinct `mpsc::Sender` would get its own extra slot).
#[derive(Clone)]
pub struct EventBus {
    sender: Rc<RefCell<mpsc::Sender<AppEvent>>>,
    /// A `HistoryPopped` is queued and not yet consumed
    pop_pending: Rc<Cell<bool>>,
}

/// Receiving half, owned by the shell
pub struct EventStream {
    receiver: mpsc::Receiver<AppEvent>,
    pop_pending: Rc<Cell<bool>>,
}

impl EventBus {
    /// Create a bus with the given capacity
    pub fn channel(capacity: usize) -> (EventBus, EventStream) {
        let (sender, receiver) = mpsc::channel(capacity);
        let pop_pending = Rc::new(Cell::new(false));
        (
            EventBus {
                sender: Rc::new(RefCell::new(sender)),
                pop_pending: pop_pending.clone(),
            },
            EventStream {
                receiver,
                pop_pending,
            },
        )
    }

    /// Publish an event. Returns false if the buffer is full or the shell
    /// has gone away; the event is dropped in that case.
    pub fn publish(&self, event: AppEvent) -> bool {
        let result = self.sender.borrow_mut().try_send(event);
        match result {
            Ok(()) => true,
            Err(e) => {
                let reason = if e.is_full() { "full" } else { "closed" };
                tracing::warn!("Dropped bus event {:?}: channel {}", e.into_inner(), reason);
                false
            }
        }
    }

    pub fn navigate(&self, menu: MenuKey) -> bool {
        self.publish(AppEvent::Navigate { menu })
    }

    pub fn request_logout(&self) -> bool {
        self.publish(AppEvent::LogoutRequested)
    }

    /// Report a browser back/forward. Unlike [`publish`](Self::publish) this
    /// is not dropped on a full buffer.
    ///
    /// The consumer re-reads the address bar, so while one pop is queued the
    /// ones after it are already covered. An overflowing pop goes out on a
    /// fresh sender, which the channel always admits once.
    pub fn history_popped(&self) -> bool {
        if self.pop_pending.get() {
            return true;
        }
        let mut sender = self.sender.borrow_mut();
        let result = match sender.try_send(AppEvent::HistoryPopped) {
            Err(e) if e.is_full() => sender.clone().try_send(e.into_inner()),
            other => other,
        };
        drop(sender);
        match result {
            Ok(()) => {
                self.pop_pending.set(true);
                true
            }
            Err(_) => {
                tracing::warn!("Dropped HistoryPopped: channel closed");
                false
            }
        }
    }
}

impl EventStream {
    /// Next event; `None` once every publisher is dropped
    pub async fn next(&mut self) -> Option<AppEvent> {
        let event = self.receiver.next().await;
        if event == Some(AppEvent::HistoryPopped) {
            self.pop_pending.set(false);
        }
        event
    }
}
