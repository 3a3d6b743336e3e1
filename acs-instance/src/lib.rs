pub mod error;
pub use error::{AcsError, Result};
mod distance;
pub use distance::*;
mod tour;
pub use tour::*;
pub mod travelling_salesman;
