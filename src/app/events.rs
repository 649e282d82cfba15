//! Bus wiring: panels publish [`AppEvent`]s, the root consumes them.
//!
//! Browser `popstate` is routed through the bus as well, so every
//! navigation change lands inside a Dioxus task.

use dioxus::prelude::*;

use crate::app::navigation_context::NavigationContext;
use crate::app::session_context::SessionContext;
use crate::bus::{AppEvent, EventBus, EventStream, BUS_CAPACITY};

/// Create the bus, start its consumer and provide the publishing half
pub fn use_event_bus_provider(session: SessionContext, navigation: NavigationContext) -> EventBus {
    let bus = use_hook(|| {
        let (bus, stream) = EventBus::channel(BUS_CAPACITY);
        spawn(consume(stream, session, navigation));
        bus
    });
    use_context_provider(|| bus.clone());

    #[cfg(target_arch = "wasm32")]
    {
        let popped = bus.clone();
        // Held for the lifetime of the root; dropping it unregisters
        use_hook(move || {
            std::rc::Rc::new(crate::navigation::PopStateListener::register(move || {
                popped.history_popped();
            }))
        });
    }

    bus
}

/// Get the bus - use in any panel that needs to reach the shell
pub fn use_event_bus() -> EventBus {
    use_context::<EventBus>()
}

async fn consume(mut stream: EventStream, session: SessionContext, navigation: NavigationContext) {
    while let Some(event) = stream.next().await {
        tracing::debug!("Bus event: {:?}", event);
        match event {
            AppEvent::Navigate { menu } => navigation.request(menu),
            AppEvent::HistoryPopped => navigation.on_popstate(),
            AppEvent::LogoutRequested => session.logout(),
        }
    }
    tracing::debug!("Event bus closed");
}
