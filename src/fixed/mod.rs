//! Vectors and matrices whose dimensions are part of their type.

mod matrix;
mod vector;

pub use matrix::Matrix;
pub use vector::Vector;
