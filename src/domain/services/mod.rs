pub mod actions;
mod app_state;
mod checkout;
pub mod clipboard;
pub mod events;
pub mod seo;
mod story_list;
mod token_store;
mod translations;

pub use app_state::*;
pub use checkout::*;
pub use story_list::*;
pub use token_store::*;
pub use translations::*;
