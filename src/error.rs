use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the particle engine.
///
/// Physics-layer clamping (velocity limits, boundary containment) is domain
/// behavior and never reported here; errors are reserved for misuse of the
/// container API.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A container index referred to a slot outside the live region.
    #[error("index {index} out of range (live particles: {len})")]
    IndexOutOfRange {
        /// The requested slot.
        index: usize,
        /// Live particles at the time of the call.
        len: usize,
    },
}
