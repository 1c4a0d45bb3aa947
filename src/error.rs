use thiserror::Error;

/// Failure of a single request against the meeting backend
#[derive(Error, Debug)]
pub enum ApiError {
    /// The transport gave up waiting for a response
    #[error("Request timed out")]
    Timeout,

    /// The backend could not be reached
    #[error("Cannot connect to backend: {0}")]
    Connection(String),

    /// The backend answered with a non-2xx status
    #[error("Backend error {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not match the expected shape
    #[error("Failed to decode response from {path}: {message}")]
    Decode { path: String, message: String },

    /// Any other request failure
    #[error("Request failed: {0}")]
    Request(String),

    /// Meeting id was empty
    #[error("Meeting id must not be empty")]
    InvalidMeetingId,
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_connect() {
            ApiError::Connection(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::Status {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            ApiError::Request(err.to_string())
        }
    }
}

/// Reasons an analysis screen cannot be shown
#[derive(Error, Debug)]
pub enum ScreenError {
    #[error("缺少会议ID")]
    MissingMeetingId,

    #[error("加载会议失败: {0}")]
    MeetingLoad(#[source] ApiError),
}
