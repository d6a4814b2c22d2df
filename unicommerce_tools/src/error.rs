use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum UnicommerceApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Could not authenticate with Unicommerce: {0}")]
    AuthenticationError(String),
    #[error("Invalid REST request: {0}")]
    RestRequestError(String),
    #[error("Invalid REST response: {0}")]
    RestResponseError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
    #[error("Unicommerce reported an unsuccessful request: {0}")]
    Unsuccessful(String),
    #[error("The sale order payload is invalid: {0}")]
    InvalidPayload(String),
}
