/// Failures reported by the browser layer, independent of any table.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("timed out waiting for {0}")]
    Timeout(String),
    #[error("no element matches {0}")]
    NotFound(String),
    #[error(transparent)]
    WebDriver(#[from] thirtyfour::prelude::WebDriverError),
}

/// Failures of a table verification. Every variant names the table it happened on.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{table}: timed out waiting for {what}")]
    NotVisibleTimeout { table: String, what: String },
    #[error("{table}: unable to parse pagination total from '{text}'")]
    Parse { table: String, text: String },
    #[error("{table}: {message}")]
    Assertion { table: String, message: String },
    #[error("{table}: browser failure")]
    Driver {
        table: String,
        #[source]
        source: DriverError,
    },
}

impl Error {
    pub(crate) fn assertion(table: &str, message: impl Into<String>) -> Self {
        Self::Assertion {
            table: table.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn driver(table: &str, source: DriverError) -> Self {
        match source {
            DriverError::Timeout(what) => Self::NotVisibleTimeout {
                table: table.to_string(),
                what,
            },
            source => Self::Driver {
                table: table.to_string(),
                source,
            },
        }
    }
}
