//! Error types for eproc-scraper

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("WebDriver error: {0}")]
    WebDriver(#[from] thirtyfour::error::WebDriverError),

    #[error("Browser operation failed: {0}")]
    BrowserOperation(String),

    #[error("Browser session already closed")]
    SessionClosed,

    #[error("Failed to parse HTML: {0}")]
    ParseError(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("Database error: {0}")]
    DatabaseError(#[source] sqlx::Error),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("File system error")]
    FsError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<sqlx::Error> for ScraperError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                ScraperError::ConstraintViolation(db_err.message().to_string())
            }
            _ => ScraperError::DatabaseError(err),
        }
    }
}

impl ScraperError {
    /// Short description suitable for showing to end users.
    pub fn user_message(&self) -> String {
        match self {
            ScraperError::WebDriver(_)
            | ScraperError::BrowserOperation(_)
            | ScraperError::SessionClosed => "Failed to query the court portal".to_string(),
            ScraperError::ParseError(_) => "Failed to read the portal results".to_string(),
            ScraperError::InvalidUrl(_) | ScraperError::UrlParseError(_) => {
                "Portal returned an invalid link".to_string()
            }
            ScraperError::DatabaseError(_) | ScraperError::ConstraintViolation(_) => {
                "Failed to store the results".to_string()
            }
            ScraperError::SerializationError(_) | ScraperError::FsError(_) => {
                "Failed to export the results".to_string()
            }
            ScraperError::ConfigError(msg) => format!("Invalid configuration: {}", msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScraperError>;
