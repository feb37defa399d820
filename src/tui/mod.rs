pub mod app;
pub mod input;
pub mod keys;
pub mod render;
pub mod swipe;
pub mod text;
pub mod theme;

pub use app::run;
