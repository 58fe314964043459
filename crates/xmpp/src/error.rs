/// Failures that abort an XMPP page request.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Error getting status: {message}")]
    Status { message: String },
    #[error("Error running command - {message}")]
    Setup { message: String },
    #[error("Error registering user - {message}")]
    Register { message: String },
}

impl From<Error> for boxpanel_web::Error {
    fn from(err: Error) -> Self {
        Self::message(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
