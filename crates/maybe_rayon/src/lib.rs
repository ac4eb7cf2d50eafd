//! Parallel iteration that degrades to sequential iteration when the
//! `multithreaded` feature is off. Call sites are written once against
//! the `maybe_*` methods and compile either way.

#[cfg(feature = "multithreaded")]
mod multi_threaded;
#[cfg(not(feature = "multithreaded"))]
mod single_threaded;

#[cfg(feature = "multithreaded")]
pub use multi_threaded::*;
#[cfg(not(feature = "multithreaded"))]
pub use single_threaded::*;

pub mod prelude {
    #[cfg(feature = "multithreaded")]
    pub use rayon::prelude::*;

    pub use crate::{MaybeParallelRefExt, MaybeParallelSliceMut};
}
