pub mod config;
pub mod error;

pub use config::{load_dotenv, VeilConfig, WatchConfig, RULES_FILE_NAME};
pub use error::*;
