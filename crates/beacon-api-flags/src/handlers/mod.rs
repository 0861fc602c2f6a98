//! HTTP handlers for the flag API.

pub mod audit;
pub mod flags;
pub mod workspaces;

pub use audit::list_audit_handler;
pub use flags::{
    create_flag_handler, delete_flag_handler, get_flag_handler, list_flags_handler,
    update_flag_handler,
};
pub use workspaces::{
    list_flag_workspaces_handler, region_counts_handler, set_workspaces_handler,
    workspace_flags_handler,
};
