use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AcsError {
    /// Rejected before any iteration runs: bad matrix, bad coordinates or a
    /// configuration parameter outside its range.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// A route that is not a permutation of the instance's nodes.
    #[error("Invalid tour: {0}")]
    InvalidTour(String),
}

pub type Result<T> = std::result::Result<T, AcsError>;

macro_rules! invalid_input {
    ($($arg:tt)*) => {
        $crate::error::AcsError::InvalidInput(format!($($arg)*))
    };
}

macro_rules! invalid_tour {
    ($($arg:tt)*) => {
        $crate::error::AcsError::InvalidTour(format!($($arg)*))
    };
}

pub(crate) use invalid_input;
pub(crate) use invalid_tour;
