pub mod templates;

pub use templates::create_workspace_config;
