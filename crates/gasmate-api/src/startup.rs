//! Console output printed while the server starts.

use std::net::SocketAddr;
use std::sync::OnceLock;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const BLUE: &str = "\x1b[34m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

/// `NO_COLOR` disables colors and `GASMATE_COLOR=true` forces them.
/// Otherwise colors follow whether stderr is a terminal.
fn colors_enabled() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| {
        if std::env::var("NO_COLOR").is_ok() {
            return false;
        }
        let forced = std::env::var("GASMATE_COLOR")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(false);
        forced || atty::is(atty::Stream::Stderr)
    })
}

fn paint(text: &str, ansi: &str, enabled: bool) -> String {
    if enabled {
        format!("{}{}{}", ansi, text, RESET)
    } else {
        text.to_string()
    }
}

fn color(text: &str, ansi: &str) -> String {
    paint(text, ansi, colors_enabled())
}

fn service_line(name: &str, configured: bool, colors: bool) -> String {
    let (icon, ansi, state) = if configured {
        ("✓", GREEN, "configured")
    } else {
        ("○", DIM, "not configured")
    };
    format!(
        "    {} {:<20} {}",
        paint(icon, ansi, colors),
        name,
        paint(state, DIM, colors)
    )
}

/// Prints startup progress grouped under phase headings.
#[derive(Default)]
pub struct StartupLogger {
    phase: Option<&'static str>,
}

impl StartupLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn banner(&self) {
        println!();
        println!(
            "{} {}",
            color(&format!("GasMate {}", gasmate_core::VERSION), BOLD),
            color("· gas leak alerts and notifications", DIM)
        );
        println!();
    }

    fn enter(&mut self, title: &'static str) {
        if self.phase == Some(title) {
            return;
        }
        println!("{} {}", color("›", BOLD), color(title, BLUE));
        self.phase = Some(title);
    }

    pub fn phase_init(&mut self) {
        self.enter("Initialization");
    }

    pub fn phase_config(&mut self) {
        self.enter("Configuration");
    }

    pub fn phase_services(&mut self) {
        self.enter("Channels");
    }

    pub fn info(&self, message: &str) {
        println!("  {} {}", color("●", BLUE), message);
    }

    pub fn success(&self, message: &str) {
        println!("  {} {}", color("✓", GREEN), message);
    }

    pub fn warning(&self, message: &str) {
        println!("  {} {}", color("⚠", YELLOW), message);
    }

    pub fn detail(&self, message: &str) {
        println!("    {}", color(message, DIM));
    }

    pub fn service(&self, name: &str, configured: bool) {
        println!("{}", service_line(name, configured, colors_enabled()));
    }

    pub fn ready(&mut self, addr: &SocketAddr) {
        self.phase = Some("Ready");
        println!();
        println!("{} {}", color("✓", GREEN), color("Server ready", BOLD));
        println!("  API     {}", color(&format!("http://{}/api", addr), CYAN));
        println!("  Health  {}", color(&format!("http://{}/api/health", addr), CYAN));
        println!("  {}", color("Press Ctrl+C to stop.", DIM));
        println!();
    }
}
