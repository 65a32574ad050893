//! Web server for GasMate.

pub mod router;
pub mod types;

pub use router::create_router;
pub use types::{ServerState, MAX_REQUEST_BODY_SIZE};

use std::sync::Arc;

use gasmate_core::ChannelKind;
use gasmate_messages::SoundChannel;
use gasmate_storage::Stores;

use crate::auth::HmacIdentityVerifier;
use crate::config::GasmateConfig;

impl ServerState {
    /// Open the stores and build every configured transport.
    pub fn from_config(config: &GasmateConfig) -> anyhow::Result<Self> {
        let stores = Stores::open(&config.server.data_dir)?;
        let verifier = HmacIdentityVerifier::from_secret_or_generate(config.identity.secret.as_deref());
        let sound = SoundChannel::new();
        let transports = config.transports(sound.clone())?;

        Ok(Self::new(
            stores,
            Arc::new(verifier),
            transports.channels,
            sound,
            transports.whatsapp,
        )
        .with_cors_origin(&config.server.cors_origin))
    }
}

/// Start the web server.
/// This is the main entry point for running the server.
pub async fn run(config: GasmateConfig) -> anyhow::Result<()> {
    use crate::startup::StartupLogger;

    let mut startup = StartupLogger::new();
    startup.banner();

    // Initialization phase
    startup.phase_init();
    let bind = config.bind_addr()?;
    std::fs::create_dir_all(&config.server.data_dir)?;
    let state = ServerState::from_config(&config)?;
    startup.success("Stores opened");
    startup.detail(&format!("data dir: {}", config.server.data_dir.display()));

    // Configuration phase
    startup.phase_config();
    if config.identity.secret.is_some() {
        startup.success("Identity secret loaded");
    } else {
        startup.warning("No identity secret set, tokens will not survive a restart");
    }
    startup.info(&format!("CORS origin: {}", config.server.cors_origin));

    // Channels phase
    startup.phase_services();
    let channels = state.pipeline.fanout_channels();
    for kind in ChannelKind::ALL {
        startup.service(&format!("{} channel", kind), channels.is_configured(kind));
    }

    let state_for_cleanup = state.clone();
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(bind).await?;

    // Ready phase
    startup.ready(&bind);
    tracing::info!(%bind, "GasMate server listening");

    // Run with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(crate::shutdown::shutdown_signal())
        .await?;

    crate::shutdown::cleanup_resources(&state_for_cleanup);

    tracing::info!("Server shutdown complete");
    Ok(())
}
