/// Reasons a sync message is rejected at the relay boundary
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SyncError {
    /// A playback time was negative, NaN, or infinite
    #[error("Invalid {field} in {message}: {value}")]
    InvalidTime {
        /// Wire name of the offending message
        message: &'static str,
        /// Payload field holding the time
        field: &'static str,
        /// Rejected value
        value: f64,
    },

    /// Aspect ratio was zero, negative, or not finite
    #[error("Invalid aspect ratio: {0}")]
    InvalidAspectRatio(f64),

    /// A window size had a zero dimension
    #[error("Invalid window size {width}x{height}")]
    InvalidSize {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },

    /// Message could not be decoded from its wire form
    #[error("Malformed sync message: {0}")]
    Malformed(String),
}
