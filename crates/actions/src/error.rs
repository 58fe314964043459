#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid action name: '{name}'")]
    InvalidAction { name: String },
    #[error("no superuser command configured for privileged action '{action}'")]
    NoSuperuserCommand { action: String },
    #[error("{message}")]
    Message { message: String },
}

impl boxpanel_common::FromMessage for Error {
    fn from_message(message: String) -> Self {
        Self::Message { message }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

boxpanel_common::impl_context!();
