//! Server state and types.

use std::sync::Arc;

use dashmap::DashMap;
use gasmate_core::{IdentityVerifier, ReadingFeed};
use gasmate_messages::{
    AlertPipeline, AlertRecorder, ChannelSet, MonitorHandle, NotificationFanout, SoundChannel,
    TwilioWhatsAppChannel,
};
use gasmate_storage::Stores;

/// Maximum request body size (64 KB)
pub const MAX_REQUEST_BODY_SIZE: usize = 64 * 1024;

/// Server state shared across all handlers.
#[derive(Clone)]
pub struct ServerState {
    pub pipeline: Arc<AlertPipeline>,
    pub feed: ReadingFeed,
    pub stores: Stores,
    /// Sound cue transport, also registered in the fanout channel set.
    pub sound: SoundChannel,
    /// At most one running monitor per account.
    pub monitors: Arc<DashMap<String, MonitorHandle>>,
    pub cors_origin: String,
    /// Unix timestamp of server start.
    pub started_at: i64,
}

impl ServerState {
    /// Wire the pipeline from explicit parts.
    ///
    /// `channels` should contain `sound` so cues reach the stream endpoint.
    pub fn new(
        stores: Stores,
        verifier: Arc<dyn IdentityVerifier>,
        channels: ChannelSet,
        sound: SoundChannel,
        whatsapp: Option<Arc<TwilioWhatsAppChannel>>,
    ) -> Self {
        let recorder = AlertRecorder::new(stores.alerts.clone(), stores.settings.clone());
        let mut pipeline = AlertPipeline::new(
            verifier,
            stores.settings.clone(),
            recorder,
            NotificationFanout::new(channels),
        );
        if let Some(whatsapp) = whatsapp {
            pipeline = pipeline.with_whatsapp_relay(whatsapp);
        }

        Self {
            pipeline: Arc::new(pipeline),
            feed: ReadingFeed::new(),
            stores,
            sound,
            monitors: Arc::new(DashMap::new()),
            cors_origin: gasmate_core::config::defaults::CORS_ORIGIN.to_string(),
            started_at: chrono::Utc::now().timestamp(),
        }
    }

    pub fn with_cors_origin(mut self, origin: impl Into<String>) -> Self {
        self.cors_origin = origin.into();
        self
    }
}
