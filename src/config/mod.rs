//! Configuration access for the serializer factory.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── error      # ConfigError
//! ├── key        # Config key constants
//! ├── load       # TOML / JSON document loading
//! ├── path       # ConfigPath, ConfigSection
//! └── mod.rs     # (this file)
//! ```
//!
//! The factory never reads configuration files itself: callers hand it a
//! root [`serde_json::Value`] (directly or through the container), and the
//! factory walks it with a [`ConfigPath`].

mod error;
pub mod key;
mod load;
mod path;

pub use error::ConfigError;
pub use load::{load_config, parse_json, parse_toml};
pub use path::{ConfigPath, ConfigSection, PathSegment};
