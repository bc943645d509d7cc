mod load;
mod types;

pub use load::{load_default, ENV_LOG_LEVEL, ENV_ON_UNSUPPORTED, ENV_STORE_NAME};
pub use types::{CloneConfig, LoggingConfig, StoreConfig, UnsupportedPolicy};
