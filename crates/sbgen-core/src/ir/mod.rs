pub mod operations;
pub mod types;

pub use operations::*;
pub use types::{IrInfo, IrSpec};
