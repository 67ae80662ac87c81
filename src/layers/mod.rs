#[macro_use]
pub mod macros;

pub mod base;
pub mod path;
pub mod triangle;
