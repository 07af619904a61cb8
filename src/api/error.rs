#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("HTTP {status}: {reason}")]
    Status { status: u16, reason: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    Rejected(String),

    #[error("response carries no data")]
    MissingData,

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("base url cannot carry a path: {0}")]
    BaseUrl(String),
}
