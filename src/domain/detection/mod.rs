//! Disease detection domain: tensors, artifacts, labels and batch outcomes

mod artifact;
mod batch;
mod label;
mod tensor;

pub use artifact::*;
pub use batch::*;
pub use label::*;
pub use tensor::*;
