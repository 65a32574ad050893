//! Rendered notification bodies.
//!
//! Content is rendered once per fanout and shared by every channel.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use gasmate_core::{AlertId, AlertKind, AlertNotice, ChannelKind};

pub const ALERT_HEADLINE: &str = "🚨 GasMate Alert!";
pub const LEAK_LINE: &str = "⚠️ Gas leak detected! Supply has been closed.";

/// Title, body and data payload of a push notification.
#[derive(Debug, Clone, PartialEq)]
pub struct PushContent {
    pub title: String,
    pub body: String,
    pub data: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotificationContent {
    /// `None` for test sends.
    pub alert_id: Option<AlertId>,
    pub kind: Option<AlertKind>,
    /// Plain text used by WhatsApp and the email text part.
    pub text: String,
    pub push: PushContent,
    pub email_subject: String,
    pub email_html: String,
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

impl NotificationContent {
    pub fn for_alert(notice: &AlertNotice) -> Self {
        let label = notice.kind.label();
        let time = format_timestamp(&notice.timestamp);

        let mut text = format!(
            "{}\nGas Level: {} PPM\nStatus: {}\nTime: {}",
            ALERT_HEADLINE, notice.gas_level, label, time
        );
        if notice.is_leak {
            text.push('\n');
            text.push_str(LEAK_LINE);
        }

        let mut push_body = format!("Gas level: {} PPM", notice.gas_level);
        if notice.is_leak {
            push_body.push_str(" - Gas leak detected!");
        }

        let data = BTreeMap::from([
            ("gasLevel".to_string(), notice.gas_level.to_string()),
            ("timestamp".to_string(), notice.timestamp.to_rfc3339()),
            ("isLeak".to_string(), notice.is_leak.to_string()),
            ("alertType".to_string(), notice.kind.as_str().to_string()),
        ]);

        Self {
            alert_id: Some(notice.alert_id.clone()),
            kind: Some(notice.kind),
            email_subject: format!("[GasMate] {} gas alert", label),
            email_html: alert_html(notice, &time),
            text,
            push: PushContent {
                title: format!("GasMate {} Alert", label),
                body: push_body,
                data,
            },
        }
    }

    /// Content for a manual test send on one channel.
    pub fn test(channel: ChannelKind) -> Self {
        let name = match channel {
            ChannelKind::Push => "push",
            ChannelKind::WhatsApp => "WhatsApp",
            ChannelKind::Email => "email",
            ChannelKind::Sound => "sound",
        };
        let text = format!(
            "This is a test alert from GasMate. Your {} notifications are working!",
            name
        );
        Self {
            alert_id: None,
            kind: None,
            push: PushContent {
                title: "GasMate Test Alert".to_string(),
                body: text.clone(),
                data: BTreeMap::from([("test".to_string(), "true".to_string())]),
            },
            email_subject: "[GasMate] Test notification".to_string(),
            email_html: format!("<p>{}</p>", text),
            text,
        }
    }
}

fn alert_html(notice: &AlertNotice, time: &str) -> String {
    let leak = if notice.is_leak {
        format!(r#"<p class="leak">{}</p>"#, LEAK_LINE)
    } else {
        String::new()
    };
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <style>
        body {{ font-family: Arial, sans-serif; }}
        .alert {{ padding: 20px; border-radius: 5px; }}
        .kind-critical {{ background-color: #fff3cd; border-left: 4px solid #ffc107; }}
        .kind-danger {{ background-color: #f8d7da; border-left: 4px solid #dc3545; }}
        .timestamp {{ color: #6c757d; font-size: 0.9em; }}
        .leak {{ font-weight: bold; color: #bd2130; }}
    </style>
</head>
<body>
    <div class="alert kind-{}">
        <h2>{}</h2>
        <p><strong>Gas Level:</strong> {} PPM</p>
        <p><strong>Status:</strong> {}</p>
        <p class="timestamp">Time: {}</p>
        {}
    </div>
</body>
</html>"#,
        notice.kind.as_str(),
        ALERT_HEADLINE,
        notice.gas_level,
        notice.kind.label(),
        time,
        leak
    )
}
