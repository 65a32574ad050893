//! Server configuration.
//!
//! Loaded from an optional TOML file, then overridden by environment
//! variables. A transport section is only kept when its required fields are
//! all present, so a partially configured channel stays unconfigured.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use gasmate_core::config::{defaults, env_vars};
use gasmate_messages::{
    ChannelSet, FcmConfig, FcmPushChannel, SoundChannel, TwilioConfig, TwilioWhatsAppChannel,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GasmateConfig {
    pub server: ServerConfig,
    pub identity: IdentityConfig,
    pub twilio: Option<TwilioSection>,
    pub fcm: Option<FcmSection>,
    pub smtp: Option<SmtpSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub data_dir: PathBuf,
    /// Allowed CORS origin. `*` allows any origin.
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: defaults::BIND.to_string(),
            data_dir: PathBuf::from(defaults::DATA_DIR),
            cors_origin: defaults::CORS_ORIGIN.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// HMAC key for identity tokens.
    pub secret: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TwilioSection {
    pub account_sid: String,
    pub auth_token: String,
    pub whatsapp_number: String,
    pub api_base: Option<String>,
}

impl TwilioSection {
    fn is_complete(&self) -> bool {
        !self.account_sid.is_empty() && !self.auth_token.is_empty() && !self.whatsapp_number.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FcmSection {
    pub project_id: String,
    pub access_token: String,
    pub api_base: Option<String>,
}

impl FcmSection {
    fn is_complete(&self) -> bool {
        !self.project_id.is_empty() && !self.access_token.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpSection {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: String,
}

impl Default for SmtpSection {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: defaults::SMTP_PORT,
            username: None,
            password: None,
            from: String::new(),
        }
    }
}

impl SmtpSection {
    fn is_complete(&self) -> bool {
        !self.host.is_empty() && !self.from.is_empty()
    }
}

/// Channel transports built from the configuration.
pub struct Transports {
    pub channels: ChannelSet,
    /// Twilio client shared with the standalone WhatsApp relay.
    pub whatsapp: Option<Arc<TwilioWhatsAppChannel>>,
}

impl GasmateConfig {
    /// Load from `path`, or from the default file when it exists, then apply
    /// the process environment.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(defaults::CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Override values from `lookup`. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = var(env_vars::BIND) {
            self.server.bind = v;
        }
        if let Some(v) = var(env_vars::DATA_DIR) {
            self.server.data_dir = PathBuf::from(v);
        }
        if let Some(v) = var(env_vars::CORS_ORIGIN) {
            self.server.cors_origin = v;
        }
        if let Some(v) = var(env_vars::IDENTITY_SECRET) {
            self.identity.secret = Some(v);
        }

        let mut twilio = self.twilio.take().unwrap_or_default();
        if let Some(v) = var(env_vars::TWILIO_ACCOUNT_SID) {
            twilio.account_sid = v;
        }
        if let Some(v) = var(env_vars::TWILIO_AUTH_TOKEN) {
            twilio.auth_token = v;
        }
        if let Some(v) = var(env_vars::TWILIO_WHATSAPP_NUMBER) {
            twilio.whatsapp_number = v;
        }
        if let Some(v) = var(env_vars::TWILIO_API_BASE) {
            twilio.api_base = Some(v);
        }
        self.twilio = twilio.is_complete().then_some(twilio);

        let mut fcm = self.fcm.take().unwrap_or_default();
        if let Some(v) = var(env_vars::FCM_PROJECT_ID) {
            fcm.project_id = v;
        }
        if let Some(v) = var(env_vars::FCM_ACCESS_TOKEN) {
            fcm.access_token = v;
        }
        if let Some(v) = var(env_vars::FCM_API_BASE) {
            fcm.api_base = Some(v);
        }
        self.fcm = fcm.is_complete().then_some(fcm);

        let mut smtp = self.smtp.take().unwrap_or_default();
        if let Some(v) = var(env_vars::SMTP_HOST) {
            smtp.host = v;
        }
        if let Some(v) = var(env_vars::SMTP_PORT) {
            match v.parse() {
                Ok(port) => smtp.port = port,
                Err(_) => tracing::warn!(value = %v, "Ignoring invalid {}", env_vars::SMTP_PORT),
            }
        }
        if let Some(v) = var(env_vars::SMTP_USERNAME) {
            smtp.username = Some(v);
        }
        if let Some(v) = var(env_vars::SMTP_PASSWORD) {
            smtp.password = Some(v);
        }
        if let Some(v) = var(env_vars::SMTP_FROM) {
            smtp.from = v;
        }
        self.smtp = smtp.is_complete().then_some(smtp);
    }

    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        self.server
            .bind
            .parse()
            .with_context(|| format!("Invalid bind address {}", self.server.bind))
    }

    /// Build a transport for every configured channel. Sound is always present.
    pub fn transports(&self, sound: SoundChannel) -> anyhow::Result<Transports> {
        let mut channels = ChannelSet::new().with(Arc::new(sound));
        let mut whatsapp = None;

        if let Some(section) = &self.twilio {
            let mut config = TwilioConfig::new(
                &section.account_sid,
                &section.auth_token,
                &section.whatsapp_number,
            );
            if let Some(base) = &section.api_base {
                config = config.with_api_base(base);
            }
            let channel = Arc::new(TwilioWhatsAppChannel::new(config)?);
            channels.register(channel.clone());
            whatsapp = Some(channel);
        }

        if let Some(section) = &self.fcm {
            let mut config = FcmConfig::new(&section.project_id, &section.access_token);
            if let Some(base) = &section.api_base {
                config = config.with_api_base(base);
            }
            channels.register(Arc::new(FcmPushChannel::new(config)?));
        }

        if let Some(section) = &self.smtp {
            self.register_email(&mut channels, section)?;
        }

        Ok(Transports { channels, whatsapp })
    }

    #[cfg(feature = "email")]
    fn register_email(&self, channels: &mut ChannelSet, section: &SmtpSection) -> anyhow::Result<()> {
        use gasmate_messages::{SmtpConfig, SmtpEmailChannel};

        let mut config = SmtpConfig::new(&section.host, &section.from).with_port(section.port);
        if let (Some(username), Some(password)) = (&section.username, &section.password) {
            config = config.with_credentials(username, password);
        }
        channels.register(Arc::new(SmtpEmailChannel::new(config)?));
        Ok(())
    }

    #[cfg(not(feature = "email"))]
    fn register_email(&self, _channels: &mut ChannelSet, _section: &SmtpSection) -> anyhow::Result<()> {
        tracing::warn!("SMTP is configured but this build has no email support");
        Ok(())
    }
}
