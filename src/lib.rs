//! Dense LU Decomposition (Doolittle, partial pivoting)

mod backend;
mod debug;
mod error;
mod lu;
mod matrix;
mod permutation;
mod plu;
mod solve;
mod traits;
mod unpack;

pub use backend::*;
pub use error::*;
pub use lu::*;
pub use matrix::Matrix;
pub use permutation::*;
pub use plu::*;
pub use solve::*;
pub use traits::*;
pub use unpack::*;

#[cfg(feature = "debug")]
pub use debug::matrix_table;
