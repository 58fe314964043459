//! Result messages accumulated while handling one request.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub severity: Severity,
    pub text: String,
}

impl Message {
    pub fn css_class(&self) -> &'static str {
        match self.severity {
            Severity::Info => "alert-info",
            Severity::Success => "alert-success",
            Severity::Error => "alert-error",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Messages(Vec<Message>);

impl Messages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, severity: Severity, text: impl Into<String>) {
        self.0.push(Message {
            severity,
            text: text.into(),
        });
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(Severity::Info, text);
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.push(Severity::Success, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(Severity::Error, text);
    }

    pub fn as_slice(&self) -> &[Message] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of messages with the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.0.iter().filter(|m| m.severity == severity).count()
    }
}
