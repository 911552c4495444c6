mod action;
mod api;
mod dimension;
mod event;
mod identity;
mod language;
mod loading;
mod page;
mod product;
mod storage;
mod story;
mod token;
mod view;

pub use action::*;
pub use api::*;
pub use dimension::*;
pub use event::*;
pub use identity::*;
pub use language::*;
pub use loading::*;
pub use page::*;
pub use product::*;
pub use storage::*;
pub use story::*;
pub use token::*;
pub use view::*;
