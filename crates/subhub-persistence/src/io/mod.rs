//! File I/O operations for the draft file.

mod load;
mod save;

pub use load::load_drafts;
pub use save::save_drafts;
