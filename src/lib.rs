// Library surface for the binary, headless runs and integration tests.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod dispatch;
pub mod duration;
pub mod event_log;
pub mod logging;
pub mod notify;
pub mod runtime;
pub mod session;
pub mod ui;
