pub mod formatter;

pub use formatter::{
    print_categories, print_command_groups, print_dependencies, print_detection, print_header,
    print_scripts, print_stored_commands,
};
