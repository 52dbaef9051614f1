//! Result type alias for ehrbridge

use super::errors::BridgeError;

/// Result type alias for ehrbridge operations
///
/// # Examples
///
/// ```
/// use ehrbridge::domain::result::Result;
/// use ehrbridge::domain::errors::BridgeError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(BridgeError::MissingInput("patients.json".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, BridgeError>;
