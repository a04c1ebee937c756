// Copyright 2025 Irreducible Inc.

//! Flat `f32` buffers with an optional gradient buffer of the same length.
//!
//! Tensors here carry no shape beyond their element count. Layers own them exclusively and
//! reinterpret the flat buffer as `[batch, features]` matrices where needed.

mod error;
mod tensor;

pub use error::*;
pub use tensor::Tensor;
