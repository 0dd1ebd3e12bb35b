pub mod app_config;
pub mod console;
pub mod logging;

pub use app_config::*;
pub use console::*;
pub use logging::*;
