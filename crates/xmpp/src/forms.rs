use boxpanel_web::{BoundForm, CleanedData, FieldSpec, FieldValue, Form};

use crate::status::XmppStatus;

pub const FORM_PREFIX: &str = "xmpp";

/// In-band registration settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigureForm {
    pub inband_enabled: bool,
}

impl ConfigureForm {
    /// Unbound form showing `status`.
    pub fn from_status(status: XmppStatus) -> BoundForm {
        Self::unbound().with_initial("inband_enabled", FieldValue::Bool(status.inband_enabled))
    }

    pub fn status(&self) -> XmppStatus {
        XmppStatus {
            inband_enabled: self.inband_enabled,
        }
    }
}

impl Form for ConfigureForm {
    // `dummy` keeps a submission with the checkbox cleared non-empty.
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::checkbox("inband_enabled", "Allow In-Band Registration").help(
            "When enabled, anyone who can reach this server will be allowed to register an \
             account through an XMPP client",
        ),
        FieldSpec::hidden("dummy", "Dummy").initial("dummy"),
    ];
    const PREFIX: &'static str = FORM_PREFIX;

    fn from_cleaned(data: &CleanedData) -> Self {
        Self {
            inband_enabled: data.bool("inband_enabled"),
        }
    }
}

/// New account on the local XMPP server.
#[derive(Clone, PartialEq, Eq)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for RegisterForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterForm")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl Form for RegisterForm {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::text("username", "Username"),
        FieldSpec::password("password", "Password"),
    ];
    const PREFIX: &'static str = FORM_PREFIX;

    fn from_cleaned(data: &CleanedData) -> Self {
        Self {
            username: data.text("username").to_owned(),
            password: data.text("password").to_owned(),
        }
    }
}
