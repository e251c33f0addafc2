pub mod app;
pub mod config;
pub mod input;
pub mod logging;
pub mod mail;
pub mod poller;
pub mod settings;
pub mod ui;
