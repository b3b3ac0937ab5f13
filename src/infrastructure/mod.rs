//! Infrastructure layer - Model loading, image decoding and runtime plumbing

pub mod image;
pub mod loaders;
pub mod logging;
pub mod observability;
pub mod onnx;
pub mod registry;
pub mod services;
