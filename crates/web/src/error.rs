use {
    askama::Template,
    axum::{
        http::StatusCode,
        response::{Html, IntoResponse, Response},
    },
    tracing::error,
};

/// Fatal per-request failure. Rendered as a generic 500 page.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to render page: {0}")]
    Render(#[from] askama::Error),
    #[error("{message}")]
    Message { message: String },
}

impl Error {
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Template)]
#[template(path = "error.html", escape = "html")]
struct ErrorTemplate<'a> {
    status: u16,
    reason: &'a str,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        error!(error = %self, "request failed");

        let page = ErrorTemplate {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Error"),
        }
        .render()
        .unwrap_or_else(|_| status.to_string());
        (status, Html(page)).into_response()
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, axum::body::to_bytes};

    #[tokio::test]
    async fn error_page_hides_details() {
        let resp = Error::message("Error running command - sudo: a password is required")
            .into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("500 Internal Server Error"));
        assert!(body.contains("could not be completed"));
        assert!(!body.contains("sudo"));
    }
}
