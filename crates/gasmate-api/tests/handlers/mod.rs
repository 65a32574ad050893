mod alerts;
mod basic;
mod monitor;
mod notifications;
mod readings;
mod router;
mod settings;
