pub mod create;
pub mod list;
pub mod show;

pub use create::{handle_create, ItemSource};
pub use list::handle_list;
pub use show::handle_show;
