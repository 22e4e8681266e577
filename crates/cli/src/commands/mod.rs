pub mod categories;
pub mod deps;
pub mod detect;
pub mod init;
pub mod store;
pub mod validate;

pub use categories::{categories_command, commands_command};
pub use deps::{deps_command, unavailable_categories};
pub use detect::{detect_command, detect_workspace, scripts_command};
pub use init::init_command;
pub use store::store_command;
pub use validate::validate_command;
