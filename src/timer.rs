//! Platform timer used for mocked latency and timed UI transitions.

use std::time::Duration;

/// Sleep for `duration` on whichever executor drives the app.
///
/// Browser builds use `setTimeout` through gloo; native builds (SSR, tests)
/// use tokio's timer, which honours `tokio::time::pause` in tests.
pub async fn sleep(duration: Duration) {
    if duration.is_zero() {
        return;
    }

    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::sleep(duration).await;

    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(duration).await;
}
