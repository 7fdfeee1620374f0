//! `nb-array` - N-dimensional arrays with pluggable compute backends.
//!
//! This crate provides:
//! - An `NdArray` type over typed, reference-counted storage
//! - Ten element types (signed/unsigned 8..64-bit integers, `f32`, `f64`)
//! - Strided layouts, transposed views and broadcasting
//! - A `ComputeBackend` trait with allocating, buffered and in-place call forms
//! - A reference `CpuBackend` implementation
//! - Result-dtype promotion rules and output-buffer checks

pub mod array;
pub mod backend;
pub mod cpu;
pub mod dtype;
pub mod element;
pub mod error;
pub mod layout;
pub mod ops;
pub mod scalar;
pub mod shape;
pub mod storage;

// Re-export primary types at the crate root for convenience.
pub use array::NdArray;
pub use backend::ComputeBackend;
pub use cpu::CpuBackend;
pub use dtype::DType;
pub use element::Element;
pub use error::{ArrayError, Result};
pub use layout::Layout;
pub use ops::{BinaryOp, UnaryOp};
pub use scalar::Scalar;
pub use shape::Shape;
pub use storage::Storage;

/// Crate version, reported in benchmark banners.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
