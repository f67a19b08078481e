mod add;
mod common;
mod delete;
mod edit;
mod list;
mod show;
mod status;
mod sync;

pub use add::run_add;
pub use delete::run_delete;
pub use edit::run_edit;
pub use list::run_list;
pub use show::run_show;
pub use status::run_status;
pub use sync::run_sync;
