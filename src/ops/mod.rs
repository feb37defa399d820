pub mod board;
pub mod specs;
pub mod validate;
