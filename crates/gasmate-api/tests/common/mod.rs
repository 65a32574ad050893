//! Common test utilities for API tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::http::{header, HeaderMap, HeaderValue};
use gasmate_api::ServerState;
use gasmate_core::{AccountSettings, ChannelKind, IdentityVerifier, StaticIdentityVerifier};
use gasmate_messages::{ChannelSet, MemoryChannel, SoundChannel};
use gasmate_storage::Stores;

pub const TOKEN: &str = "valid-token";
pub const ACCOUNT: &str = "acct-1";
pub const OTHER_TOKEN: &str = "other-token";
pub const OTHER_ACCOUNT: &str = "acct-2";

/// Server state backed by in-memory stores and recording channels.
pub struct TestServer {
    pub state: ServerState,
    pub push: MemoryChannel,
    pub whatsapp: MemoryChannel,
    pub email: MemoryChannel,
}

impl TestServer {
    pub async fn transport_calls(&self) -> usize {
        self.push.count().await + self.whatsapp.count().await + self.email.count().await
    }

    /// Save the default settings document for `account_id`.
    pub fn configure(&self, account_id: &str) {
        self.save_settings(account_id, &AccountSettings::default());
    }

    pub fn save_settings(&self, account_id: &str, settings: &AccountSettings) {
        self.state.stores.settings.put(account_id, settings).unwrap();
    }
}

pub fn create_test_server() -> TestServer {
    create_test_server_with(MemoryChannel::new(ChannelKind::WhatsApp))
}

pub fn create_test_server_with(whatsapp: MemoryChannel) -> TestServer {
    let verifier = StaticIdentityVerifier::new()
        .with_token(TOKEN, ACCOUNT)
        .with_token(OTHER_TOKEN, OTHER_ACCOUNT);
    build_test_server(whatsapp, Arc::new(verifier))
}

/// Test server that verifies bearer tokens with `verifier`.
pub fn create_test_server_with_verifier(verifier: Arc<dyn IdentityVerifier>) -> TestServer {
    build_test_server(MemoryChannel::new(ChannelKind::WhatsApp), verifier)
}

fn build_test_server(whatsapp: MemoryChannel, verifier: Arc<dyn IdentityVerifier>) -> TestServer {
    let push = MemoryChannel::new(ChannelKind::Push);
    let email = MemoryChannel::new(ChannelKind::Email);
    let sound = SoundChannel::new();

    let channels = ChannelSet::new()
        .with(Arc::new(push.clone()))
        .with(Arc::new(whatsapp.clone()))
        .with(Arc::new(email.clone()))
        .with(Arc::new(sound.clone()));

    let state = ServerState::new(
        Stores::memory().unwrap(),
        verifier,
        channels,
        sound,
        None,
    );

    TestServer {
        state,
        push,
        whatsapp,
        email,
    }
}

pub fn auth(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );
    headers
}

pub fn no_auth() -> HeaderMap {
    HeaderMap::new()
}
