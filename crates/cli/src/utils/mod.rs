pub mod workspace;

pub use workspace::{STORE_FILE, load_config, resolve_root, store_path};
