// Library surface shared by the binary and the integration tests.
pub mod app;
pub mod app_dirs;
pub mod candidate;
pub mod config;
pub mod error;
pub mod export;
pub mod questions;
pub mod resume;
pub mod runtime;
pub mod scoring;
pub mod session;
pub mod storage;
pub mod summary;
pub mod telemetry;
pub mod timer;
pub mod ui;
pub mod util;

pub use app::App;
