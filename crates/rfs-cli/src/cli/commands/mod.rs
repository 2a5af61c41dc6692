//! CLI command handlers. Each command is in its own file; downloads share `attempt`.

mod attempt;
mod checksum;
mod fetch;
mod module;
mod run;
mod update;

pub use checksum::run_checksum;
pub use fetch::{fetch_subject, run_fetch};
pub use module::{module_subject, run_module};
pub use run::{load_subject_file, run_subject_file};
pub use update::{run_update, update_subject};
