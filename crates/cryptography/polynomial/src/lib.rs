pub mod domain;
mod fft;
pub mod poly_coeff;

pub use domain::Domain;
pub use poly_coeff::PolyCoeff;
