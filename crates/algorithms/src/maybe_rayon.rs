//! `into_par_iter()` for grid rows, with or without rayon.
//!
//! The `parallel` feature maps it to rayon. Otherwise it is a plain
//! `into_iter()` and rows are resolved one after another.

#[cfg(feature = "parallel")]
pub use rayon::prelude::*;

#[cfg(not(feature = "parallel"))]
pub trait IntoParallelIterator: IntoIterator + Sized {
    fn into_par_iter(self) -> Self::IntoIter {
        self.into_iter()
    }
}

#[cfg(not(feature = "parallel"))]
impl<I: IntoIterator> IntoParallelIterator for I {}
