//! Evolution strategies

pub mod vdcma;

pub use vdcma::{Vdcma, VdcmaConfig};
