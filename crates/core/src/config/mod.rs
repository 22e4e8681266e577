pub mod defaults;
pub mod loader;
pub mod merge;
pub mod provider;
pub mod schema;
pub mod settings;
pub mod validation;

pub use defaults::{BUILTIN_CONFIG_JSON, builtin_config, fallback_config};
pub use loader::{CONFIG_ENV_VAR, ConfigLoader, USER_CONFIG_DIR, USER_CONFIG_FILE, user_config_path};
pub use merge::{ConfigInfo, ConfigMerger};
pub use provider::{ConfigProvider, SchemaConfigProvider};
pub use schema::{CONFIG_VERSION, ConfigSchema};
pub use settings::{DependencyCheckConfig, DetectionSettings};
pub use validation::{ConfigValidator, SchemaValidator, ValidationReport};
