mod generator;
mod policy;
mod render;
mod sitemap;

pub use generator::*;
pub use policy::*;
pub use render::*;
pub use sitemap::*;
