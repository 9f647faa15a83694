//! Random search

pub mod bes;
pub mod prs;

pub use bes::{Bes, BesConfig};
pub use prs::{Prs, PrsConfig};
