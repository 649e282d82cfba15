//! Smart-home dashboard entry point.
//!
//! The server build loads configuration and logging before handing over to
//! Dioxus; the browser build only launches the app.

use smart_home_dashboard::app::App;

#[cfg(feature = "server")]
fn main() -> anyhow::Result<()> {
    use smart_home_dashboard::config;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "smart_home_dashboard=debug,dioxus=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Starting smart-home dashboard v{} ({})",
        env!("SHD_VERSION"),
        env!("SHD_GIT_SHA")
    );

    let config = config::load_config()?;
    tracing::info!("Configuration loaded, listening on {}:{}", config.ip, config.port);

    // The fullstack launcher reads its bind address from the environment
    std::env::set_var("IP", &config.ip);
    std::env::set_var("PORT", config.port.to_string());

    dioxus::launch(App);
    Ok(())
}

#[cfg(not(feature = "server"))]
fn main() {
    dioxus::launch(App);
}
