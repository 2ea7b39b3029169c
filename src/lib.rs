//! A laboratory of lossless entropy and dictionary coders, assembled
//! behind one dispatcher so the same CLI harness, logging, and error
//! reporting can drive any of them.
//!
//! [`codec`] is the entry point: it names each coder and wires the
//! model-plus-VLC family (arithmetic, unary, Rice, Golomb) up to the
//! order-0 model in [`structs::order0_model`]. The coders themselves
//! live under [`structs`], one module per algorithm.

pub mod codec;
pub mod error;
pub mod structs;
