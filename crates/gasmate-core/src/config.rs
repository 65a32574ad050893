//! Shared configuration constants.
//!
//! Defaults and environment variable names used across crates live here so
//! they are defined once.

/// Default values.
pub mod defaults {
    /// Critical threshold in PPM.
    pub const CRITICAL_PPM: f64 = 4.0;
    /// Danger threshold in PPM.
    pub const DANGER_PPM: f64 = 6.0;
    pub const BIND: &str = "127.0.0.1:5000";
    pub const DATA_DIR: &str = "data";
    pub const CONFIG_FILE: &str = "gasmate.toml";
    /// Dashboard origin allowed by CORS.
    pub const CORS_ORIGIN: &str = "http://localhost:5173";
    pub const SOUND_TYPE: &str = "default";
    pub const ALERT_HISTORY_LIMIT: usize = 50;
    pub const READING_HISTORY_LIMIT: usize = 10;
    pub const MAX_HISTORY_LIMIT: usize = 500;
    /// Lifetime of a development identity token.
    pub const TOKEN_TTL_SECS: i64 = 3600;
    /// Transport request timeout.
    pub const HTTP_TIMEOUT_SECS: u64 = 30;
    /// Age after which an unfinished fanout claim may be taken over.
    pub const FANOUT_CLAIM_STALE_SECS: i64 = 300;
    pub const SMTP_PORT: u16 = 587;
}

/// Transport API endpoints.
pub mod endpoints {
    pub const TWILIO_API: &str = "https://api.twilio.com";
    pub const FCM_API: &str = "https://fcm.googleapis.com";
}

/// Environment variable names.
pub mod env_vars {
    pub const BIND: &str = "GASMATE_BIND";
    pub const DATA_DIR: &str = "GASMATE_DATA_DIR";
    pub const IDENTITY_SECRET: &str = "GASMATE_IDENTITY_SECRET";
    pub const CORS_ORIGIN: &str = "GASMATE_CORS_ORIGIN";
    pub const LOG_JSON: &str = "GASMATE_LOG_JSON";

    pub const TWILIO_ACCOUNT_SID: &str = "TWILIO_ACCOUNT_SID";
    pub const TWILIO_AUTH_TOKEN: &str = "TWILIO_AUTH_TOKEN";
    pub const TWILIO_WHATSAPP_NUMBER: &str = "TWILIO_WHATSAPP_NUMBER";
    pub const TWILIO_API_BASE: &str = "TWILIO_API_BASE";

    pub const FCM_PROJECT_ID: &str = "FCM_PROJECT_ID";
    pub const FCM_ACCESS_TOKEN: &str = "FCM_ACCESS_TOKEN";
    pub const FCM_API_BASE: &str = "FCM_API_BASE";

    pub const SMTP_HOST: &str = "SMTP_HOST";
    pub const SMTP_PORT: &str = "SMTP_PORT";
    pub const SMTP_USERNAME: &str = "SMTP_USERNAME";
    pub const SMTP_PASSWORD: &str = "SMTP_PASSWORD";
    pub const SMTP_FROM: &str = "SMTP_FROM";
}

/// Clamp a requested history limit into `1..=MAX_HISTORY_LIMIT`.
pub fn clamp_limit(requested: Option<usize>, default: usize) -> usize {
    requested
        .unwrap_or(default)
        .clamp(1, defaults::MAX_HISTORY_LIMIT)
}
