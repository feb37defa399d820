pub mod change;
pub mod config;
pub mod idea;
pub mod source;

pub use change::*;
pub use config::*;
pub use idea::*;
pub use source::*;
