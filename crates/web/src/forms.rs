//! Declarative HTML forms: field specs, binding submitted data, validation,
//! and a render-ready view of every field.
//!
//! Field names on the wire carry the form prefix: a field `username` in a form
//! with prefix `xmpp` is submitted as `xmpp-username`.

use std::collections::HashMap;

use askama::Template;

pub const REQUIRED_MESSAGE: &str = "This field is required.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Password,
    Hidden,
    Checkbox,
}

impl FieldKind {
    fn input_type(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Password => "password",
            Self::Hidden => "hidden",
            Self::Checkbox => "checkbox",
        }
    }
}

/// Static description of one form field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub initial: Option<&'static str>,
    pub help: &'static str,
}

impl FieldSpec {
    /// Required single-line text input.
    pub const fn text(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Text,
            required: true,
            initial: None,
            help: "",
        }
    }

    /// Required password input. Its value is never rendered back.
    pub const fn password(name: &'static str, label: &'static str) -> Self {
        Self {
            kind: FieldKind::Password,
            ..Self::text(name, label)
        }
    }

    /// Required hidden input.
    pub const fn hidden(name: &'static str, label: &'static str) -> Self {
        Self {
            kind: FieldKind::Hidden,
            ..Self::text(name, label)
        }
    }

    /// Optional checkbox. A missing value cleans to `false`.
    pub const fn checkbox(name: &'static str, label: &'static str) -> Self {
        Self {
            kind: FieldKind::Checkbox,
            required: false,
            ..Self::text(name, label)
        }
    }

    pub const fn initial(mut self, initial: &'static str) -> Self {
        self.initial = Some(initial);
        self
    }

    pub const fn help(mut self, help: &'static str) -> Self {
        self.help = help;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Bool(bool),
    Text(String),
}

/// Validated values of a bound form.
#[derive(Debug, Clone, Default)]
pub struct CleanedData {
    values: HashMap<&'static str, FieldValue>,
}

impl CleanedData {
    pub fn bool(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(FieldValue::Bool(true)))
    }

    pub fn text(&self, name: &str) -> &str {
        match self.values.get(name) {
            Some(FieldValue::Text(s)) => s,
            _ => "",
        }
    }
}

/// A typed form built from [`CleanedData`].
pub trait Form: Sized {
    const PREFIX: &'static str;
    const FIELDS: &'static [FieldSpec];

    fn from_cleaned(data: &CleanedData) -> Self;

    /// Fresh form showing field defaults.
    fn unbound() -> BoundForm {
        BoundForm::unbound(Self::PREFIX, Self::FIELDS)
    }

    /// Form holding submitted `data`.
    fn bind(data: &HashMap<String, String>) -> BoundForm {
        BoundForm::bound(Self::PREFIX, Self::FIELDS, data)
    }
}

/// A form instance, either unbound (showing initial values) or bound to
/// submitted data.
#[derive(Debug, Clone)]
pub struct BoundForm {
    prefix: &'static str,
    specs: &'static [FieldSpec],
    data: Option<HashMap<String, String>>,
    initial: HashMap<&'static str, FieldValue>,
    errors: HashMap<&'static str, Vec<String>>,
}

impl BoundForm {
    pub fn unbound(prefix: &'static str, specs: &'static [FieldSpec]) -> Self {
        Self {
            prefix,
            specs,
            data: None,
            initial: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn bound(
        prefix: &'static str,
        specs: &'static [FieldSpec],
        data: &HashMap<String, String>,
    ) -> Self {
        Self {
            data: Some(data.clone()),
            ..Self::unbound(prefix, specs)
        }
    }

    /// Override the initial value shown by an unbound form.
    pub fn with_initial(mut self, name: &'static str, value: FieldValue) -> Self {
        self.initial.insert(name, value);
        self
    }

    pub fn is_bound(&self) -> bool {
        self.data.is_some()
    }

    pub fn html_name(&self, field: &str) -> String {
        if self.prefix.is_empty() {
            field.to_owned()
        } else {
            format!("{}-{field}", self.prefix)
        }
    }

    fn raw(&self, field: &str) -> Option<&str> {
        self.data
            .as_ref()
            .and_then(|d| d.get(&self.html_name(field)))
            .map(String::as_str)
    }

    /// Validate the bound data, recording per-field errors.
    ///
    /// Returns `None` for unbound forms and for forms with errors.
    pub fn validate(&mut self) -> Option<CleanedData> {
        if !self.is_bound() {
            return None;
        }

        self.errors.clear();
        let mut cleaned = CleanedData::default();
        for spec in self.specs {
            match spec.kind {
                FieldKind::Checkbox => {
                    let checked = self.raw(spec.name).is_some_and(checkbox_value);
                    if spec.required && !checked {
                        self.add_error(spec.name, REQUIRED_MESSAGE);
                    }
                    cleaned.values.insert(spec.name, FieldValue::Bool(checked));
                },
                FieldKind::Text | FieldKind::Password | FieldKind::Hidden => {
                    let value = self
                        .raw(spec.name)
                        .map(str::trim)
                        .unwrap_or_default()
                        .to_owned();
                    if spec.required && value.is_empty() {
                        self.add_error(spec.name, REQUIRED_MESSAGE);
                    }
                    cleaned.values.insert(spec.name, FieldValue::Text(value));
                },
            }
        }

        self.errors.is_empty().then_some(cleaned)
    }

    /// Validate and convert into the typed form.
    pub fn clean<F: Form>(&mut self) -> Option<F> {
        self.validate().map(|data| F::from_cleaned(&data))
    }

    pub fn add_error(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.entry(field).or_default().push(message.into());
    }

    pub fn errors(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Render-ready view of every field, in declaration order.
    pub fn fields(&self) -> Vec<FieldView> {
        self.specs.iter().map(|spec| self.view(spec)).collect()
    }

    fn view(&self, spec: &FieldSpec) -> FieldView {
        let html_name = self.html_name(spec.name);
        let (value, checked) = match spec.kind {
            FieldKind::Password => (String::new(), false),
            FieldKind::Checkbox => {
                let checked = if self.is_bound() {
                    self.raw(spec.name).is_some_and(checkbox_value)
                } else {
                    match self.initial.get(spec.name) {
                        Some(FieldValue::Bool(b)) => *b,
                        _ => spec.initial.is_some_and(checkbox_value),
                    }
                };
                (String::new(), checked)
            },
            FieldKind::Text | FieldKind::Hidden => {
                let value = if self.is_bound() {
                    self.raw(spec.name).unwrap_or_default().to_owned()
                } else {
                    match self.initial.get(spec.name) {
                        Some(FieldValue::Text(s)) => s.clone(),
                        _ => spec.initial.unwrap_or_default().to_owned(),
                    }
                };
                (value, false)
            },
        };

        FieldView {
            id: format!("id_{html_name}"),
            html_name,
            label: spec.label,
            input_type: spec.kind.input_type(),
            value,
            checked,
            required: spec.required,
            help: spec.help,
            errors: self.errors(spec.name).to_vec(),
            hidden: spec.kind == FieldKind::Hidden,
            checkbox: spec.kind == FieldKind::Checkbox,
        }
    }

    /// Render the form as an HTML fragment posting to `action`.
    pub fn render(&self, action: &str, submit_label: &str) -> askama::Result<String> {
        let fields = self.fields();
        let hidden_errors = fields
            .iter()
            .filter(|f| f.hidden)
            .flat_map(|f| {
                f.errors
                    .iter()
                    .map(move |e| format!("(Hidden field {}) {e}", f.label))
            })
            .collect();
        FormTemplate {
            action,
            submit_label,
            fields: &fields,
            hidden_errors,
        }
        .render()
    }
}

/// Checkbox semantics: empty, `false` and `0` are unchecked, anything else
/// (including `off`) is checked.
fn checkbox_value(raw: &str) -> bool {
    !matches!(raw.trim().to_ascii_lowercase().as_str(), "" | "false" | "0")
}

#[derive(Debug, Clone)]
pub struct FieldView {
    pub html_name: String,
    pub id: String,
    pub label: &'static str,
    pub input_type: &'static str,
    pub value: String,
    pub checked: bool,
    pub required: bool,
    pub help: &'static str,
    pub errors: Vec<String>,
    pub hidden: bool,
    pub checkbox: bool,
}

#[derive(Template)]
#[template(path = "form.html", escape = "html")]
struct FormTemplate<'a> {
    action: &'a str,
    submit_label: &'a str,
    fields: &'a [FieldView],
    hidden_errors: Vec<String>,
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    const SIGNUP: &[FieldSpec] = &[
        FieldSpec::text("username", "Username"),
        FieldSpec::password("password", "Password"),
        FieldSpec::checkbox("newsletter", "Newsletter").help("Monthly mail"),
        FieldSpec::hidden("token", "Token").initial("t0k"),
    ];

    struct Signup {
        username: String,
        newsletter: bool,
    }

    impl Form for Signup {
        const FIELDS: &'static [FieldSpec] = SIGNUP;
        const PREFIX: &'static str = "s";

        fn from_cleaned(data: &CleanedData) -> Self {
            Self {
                username: data.text("username").to_owned(),
                newsletter: data.bool("newsletter"),
            }
        }
    }

    fn data(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[rstest]
    #[case("on", true)]
    #[case("true", true)]
    #[case("1", true)]
    #[case("yes", true)]
    #[case("", false)]
    #[case("false", false)]
    #[case("False", false)]
    #[case("0", false)]
    #[case("off", true)]
    fn checkbox_values(#[case] raw: &str, #[case] expected: bool) {
        assert_eq!(checkbox_value(raw), expected);
    }

    #[test]
    fn unbound_never_validates() {
        let mut form = Signup::unbound();
        assert!(!form.is_bound());
        assert!(form.validate().is_none());
        assert!(!form.has_errors());
    }

    #[test]
    fn valid_submission_cleans_to_typed_form() {
        let mut form = Signup::bind(&data(&[
            ("s-username", "  alice "),
            ("s-password", "pw"),
            ("s-newsletter", "on"),
            ("s-token", "t0k"),
        ]));
        let signup: Signup = form.clean().unwrap();
        assert_eq!(signup.username, "alice");
        assert!(signup.newsletter);
    }

    #[test]
    fn missing_checkbox_is_false_not_an_error() {
        let mut form = Signup::bind(&data(&[
            ("s-username", "alice"),
            ("s-password", "pw"),
            ("s-token", "t0k"),
        ]));
        let signup: Signup = form.clean().unwrap();
        assert!(!signup.newsletter);
    }

    #[test]
    fn required_fields_report_errors() {
        let mut form = Signup::bind(&data(&[("s-username", "   "), ("username", "x")]));
        assert!(form.validate().is_none());
        assert_eq!(form.errors("username"), [REQUIRED_MESSAGE]);
        assert_eq!(form.errors("password"), [REQUIRED_MESSAGE]);
        assert_eq!(form.errors("token"), [REQUIRED_MESSAGE]);
        assert!(form.errors("newsletter").is_empty());
    }

    #[test]
    fn unbound_view_uses_initial_values() {
        let form = Signup::unbound().with_initial("newsletter", FieldValue::Bool(true));
        let fields = form.fields();
        assert_eq!(fields[0].html_name, "s-username");
        assert_eq!(fields[0].id, "id_s-username");
        assert!(fields[2].checked);
        assert_eq!(fields[3].value, "t0k");
        assert!(fields[3].hidden);
    }

    #[test]
    fn bound_view_keeps_values_but_not_password() {
        let form = Signup::bind(&data(&[("s-username", "bob"), ("s-password", "secret")]));
        let fields = form.fields();
        assert_eq!(fields[0].value, "bob");
        assert_eq!(fields[1].value, "");
        assert!(!fields[2].checked);
        assert_eq!(fields[3].value, "");
    }

    #[test]
    fn render_marks_errors_and_hidden_fields() {
        let mut form = Signup::bind(&data(&[("s-username", "bob")]));
        form.validate();
        let html = form.render("/signup", "Sign up").unwrap();
        assert!(html.contains("action=\"/signup\""));
        assert!(html.contains("name=\"s-username\""));
        assert!(html.contains("value=\"bob\""));
        assert!(html.contains("type=\"hidden\""));
        assert!(html.contains("(Hidden field Token) This field is required."));
        assert!(html.contains("Monthly mail"));
        assert!(!html.contains("secret"));
    }

    #[test]
    fn required_text_with_error_keeps_submitted_value() {
        let mut form = Signup::bind(&data(&[("s-username", " bob "), ("s-token", "t0k")]));
        assert!(form.validate().is_none());
        assert!(form.errors("username").is_empty());
        assert_eq!(form.errors("password"), [REQUIRED_MESSAGE]);
        assert_eq!(form.fields()[0].value, " bob ");
    }

    #[test]
    fn render_escapes_values() {
        let form = Signup::bind(&data(&[("s-username", "<script>")]));
        let html = form.render("/signup", "Go").unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("value=\"&#60;script&#62;\""));
    }
}
