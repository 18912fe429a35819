//! Algebra: column-major `Matrix4`, `Vector3`, `Vector4` and `Quaternion`.
//!
//! # Invariants
//! - Matrix elements are column-major: element `(row, col)` lives at `col * 4 + row`.
//! - Mutators overwrite in place and return `&mut Self` so calls chain.
//! - Convenience transforms (`rotate`, `translate`, `scale`, `look_at`,
//!   `ortho`, `frustum`, `perspective`) left-multiply a fresh elementary
//!   matrix: operations apply in the order they are called.
//! - Degenerate math is fail-soft: normalizing a zero vector yields zero and
//!   inverting a singular matrix leaves the target unchanged.
//! - Degenerate projections are fail-fast and return [`AlgebraError`].

mod error;
mod float;
mod interop;
mod matrix;
mod quaternion;
mod vector;

pub use error::AlgebraError;
pub use float::float_nearly_equal;
pub use matrix::Matrix4;
pub use quaternion::Quaternion;
pub use vector::{Vector3, Vector4};

pub fn crate_info() -> &'static str {
    "tidescape-algebra v0.1.0"
}
