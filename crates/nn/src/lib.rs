// Copyright 2025 Irreducible Inc.

//! Differentiable layers built on [`synapse_tensor::Tensor`].
//!
//! A layer owns the tensors it produces. [`Layer::forward`] returns a borrow of the layer's
//! output, [`Layer::backward`] takes a tensor whose gradient buffer holds the gradient of that
//! output and returns a borrow of the layer's input copy, now carrying the input gradient. A
//! [`Sequential`] threads both passes through its children without a computation graph.

mod activation;
mod buffer;
mod dropout;
mod error;
mod identity;
pub mod init;
mod layer;
mod linear;
pub mod optim;
mod sequential;

pub use activation::*;
pub use dropout::Dropout;
pub use error::*;
pub use identity::Identity;
pub use layer::{Layer, Mode};
pub use linear::{Linear, LinearConfig, MAX_FEATURES};
pub use sequential::Sequential;
