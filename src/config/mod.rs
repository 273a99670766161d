//! Configuration module

mod site;

pub use site::AppConfig;
pub use site::HighlightConfig;
pub use site::CONFIG_FILE;
