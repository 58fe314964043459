//! Configuration validation engine.
//!
//! Validates TOML configuration files against the known schema, detects
//! unknown/misspelled fields, and reports security warnings.

use std::{collections::HashMap, path::Path};

use crate::schema::BoxpanelConfig;

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Category: "syntax", "unknown-field", "type-error", "security",
    /// "server", "actions", "file-ref"
    pub category: &'static str,
    /// Dotted path, e.g. "server.bnd"
    pub path: String,
    pub message: String,
}

/// Result of validating a configuration file.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
    pub config_path: Option<std::path::PathBuf>,
}

impl ValidationResult {
    /// Returns `true` if any diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Count diagnostics by severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

// ── Schema tree for unknown-field detection ─────────────────────────────────

enum KnownKeys {
    Struct(HashMap<&'static str, KnownKeys>),
    Leaf,
}

/// Mirrors every field in `schema.rs`.
fn build_schema_map() -> KnownKeys {
    use KnownKeys::{Leaf, Struct};

    Struct(HashMap::from([
        (
            "server",
            Struct(HashMap::from([("bind", Leaf), ("port", Leaf)])),
        ),
        (
            "auth",
            Struct(HashMap::from([
                ("disabled", Leaf),
                ("username", Leaf),
                ("password", Leaf),
            ])),
        ),
        (
            "actions",
            Struct(HashMap::from([("dir", Leaf), ("superuser_command", Leaf)])),
        ),
        ("xmpp", Struct(HashMap::from([("enabled", Leaf)]))),
    ]))
}

// ── Levenshtein distance ────────────────────────────────────────────────────

fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b_chars.len();
    }

    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr = vec![0; b_chars.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b_chars.len()]
}

/// Closest candidate within `max_distance` edits, if any.
fn suggest<'a>(needle: &str, candidates: &[&'a str], max_distance: usize) -> Option<&'a str> {
    candidates
        .iter()
        .map(|&c| (c, levenshtein(needle, c)))
        .filter(|&(_, d)| d > 0 && d <= max_distance)
        .min_by_key(|&(_, d)| d)
        .map(|(c, _)| c)
}

// ── Core validation ─────────────────────────────────────────────────────────

/// Validate a config file at the given path, or discover the default config
/// file location if `path` is `None`.
#[must_use]
pub fn validate(path: Option<&Path>) -> ValidationResult {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => crate::loader::find_config_file(),
    };

    let Some(ref actual_path) = config_path else {
        return ValidationResult {
            diagnostics: vec![Diagnostic {
                severity: Severity::Info,
                category: "file-ref",
                path: String::new(),
                message: "no config file found; using defaults".into(),
            }],
            config_path: None,
        };
    };

    let is_toml = actual_path
        .extension()
        .and_then(|e| e.to_str())
        .is_none_or(|e| e == "toml");
    if !is_toml {
        return validate_other_format(actual_path);
    }

    match std::fs::read_to_string(actual_path) {
        Ok(content) => {
            let content = crate::env_subst::substitute_env(&content);
            let mut result = validate_toml_str(&content);
            result.config_path = Some(actual_path.clone());
            if let Ok(config) = toml::from_str::<BoxpanelConfig>(&content) {
                check_actions_dir(&config, &mut result.diagnostics);
            }
            result
        },
        Err(e) => ValidationResult {
            diagnostics: vec![Diagnostic {
                severity: Severity::Error,
                category: "syntax",
                path: String::new(),
                message: format!("failed to read config file: {e}"),
            }],
            config_path: Some(actual_path.clone()),
        },
    }
}

/// Validate a TOML string without file-system side effects.
#[must_use]
pub fn validate_toml_str(toml_str: &str) -> ValidationResult {
    let mut diagnostics = Vec::new();

    let toml_value: toml::Value = match toml::from_str(toml_str) {
        Ok(v) => v,
        Err(e) => {
            diagnostics.push(Diagnostic {
                severity: Severity::Error,
                category: "syntax",
                path: String::new(),
                message: format!("TOML syntax error: {e}"),
            });
            return ValidationResult {
                diagnostics,
                config_path: None,
            };
        },
    };

    check_unknown_fields(&toml_value, &build_schema_map(), "", &mut diagnostics);

    match toml::from_str::<BoxpanelConfig>(toml_str) {
        Ok(config) => check_semantic_warnings(&config, &mut diagnostics),
        Err(e) => diagnostics.push(Diagnostic {
            severity: Severity::Error,
            category: "type-error",
            path: String::new(),
            message: format!("type error: {e}"),
        }),
    }

    ValidationResult {
        diagnostics,
        config_path: None,
    }
}

/// YAML and JSON files only get a parse check plus the semantic checks.
fn validate_other_format(path: &Path) -> ValidationResult {
    let mut diagnostics = vec![Diagnostic {
        severity: Severity::Info,
        category: "file-ref",
        path: String::new(),
        message: "unknown-field detection only runs on TOML files".into(),
    }];
    match crate::loader::load_config(path) {
        Ok(config) => {
            check_semantic_warnings(&config, &mut diagnostics);
            check_actions_dir(&config, &mut diagnostics);
        },
        Err(e) => diagnostics.push(Diagnostic {
            severity: Severity::Error,
            category: "syntax",
            path: String::new(),
            message: format!("{e:#}"),
        }),
    }
    ValidationResult {
        diagnostics,
        config_path: Some(path.to_path_buf()),
    }
}

fn check_unknown_fields(
    value: &toml::Value,
    schema: &KnownKeys,
    prefix: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let (toml::Value::Table(table), KnownKeys::Struct(fields)) = (value, schema) else {
        return;
    };

    let known_keys: Vec<&str> = fields.keys().copied().collect();
    for (key, child_value) in table {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        if let Some(child_schema) = fields.get(key.as_str()) {
            check_unknown_fields(child_value, child_schema, &path, diagnostics);
            continue;
        }

        let level = if prefix.is_empty() {
            "at top level "
        } else {
            ""
        };
        let message = match suggest(key, &known_keys, 3) {
            Some(s) => format!("unknown field {level}(did you mean \"{s}\"?)"),
            None => format!("unknown field {level}"),
        };
        diagnostics.push(Diagnostic {
            severity: Severity::Error,
            category: "unknown-field",
            path,
            message: message.trim().to_string(),
        });
    }
}

fn check_semantic_warnings(config: &BoxpanelConfig, diagnostics: &mut Vec<Diagnostic>) {
    let exposed = !config.server.is_loopback();

    if exposed && config.auth.disabled {
        diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            category: "security",
            path: "auth.disabled".into(),
            message: format!(
                "authentication is disabled while binding to {}",
                config.server.bind
            ),
        });
    } else if exposed && !config.auth.has_password() {
        diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            category: "security",
            path: "auth.password".into(),
            message: format!(
                "no admin password set while binding to {}, every page will be refused",
                config.server.bind
            ),
        });
    }

    if config.server.port == 0 {
        diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            category: "server",
            path: "server.port".into(),
            message: "port 0 binds a random port on every start".into(),
        });
    }

    if config.actions.superuser_command.is_empty() {
        diagnostics.push(Diagnostic {
            severity: Severity::Error,
            category: "actions",
            path: "actions.superuser_command".into(),
            message: "superuser_command must name at least one program".into(),
        });
    }
}

fn check_actions_dir(config: &BoxpanelConfig, diagnostics: &mut Vec<Diagnostic>) {
    if !config.actions.dir.is_dir() {
        diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            category: "file-ref",
            path: "actions.dir".into(),
            message: format!(
                "actions directory {} does not exist",
                config.actions.dir.display()
            ),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find<'a>(result: &'a ValidationResult, path: &str) -> Option<&'a Diagnostic> {
        result.diagnostics.iter().find(|d| d.path == path)
    }

    #[test]
    fn levenshtein_edits() {
        assert_eq!(levenshtein("server", "server"), 0);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("sever", "server"), 1);
        assert_eq!(levenshtein("xmp", "xmpp"), 1);
    }

    #[test]
    fn empty_config_is_clean() {
        let result = validate_toml_str("");
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn unknown_top_level_key_with_suggestion() {
        let result = validate_toml_str("sever = 42\n");
        let d = find(&result, "sever");
        assert!(d.is_some_and(|d| d.category == "unknown-field"
            && d.message.contains("did you mean \"server\"")));
        assert!(result.has_errors());
    }

    #[test]
    fn unknown_nested_key() {
        let result = validate_toml_str("[xmpp]\nenabeld = true\n");
        let d = find(&result, "xmpp.enabeld");
        assert!(d.is_some_and(|d| d.message.contains("\"enabled\"")));
    }

    #[test]
    fn syntax_error_stops_early() {
        let result = validate_toml_str("[server\n");
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].category, "syntax");
    }

    #[test]
    fn type_error_reported() {
        let result = validate_toml_str("[server]\nport = \"eighty\"\n");
        assert!(
            result
                .diagnostics
                .iter()
                .any(|d| d.category == "type-error")
        );
    }

    #[test]
    fn exposed_without_password_warns() {
        let result = validate_toml_str("[server]\nbind = \"0.0.0.0\"\n");
        let d = find(&result, "auth.password");
        assert!(d.is_some_and(|d| d.severity == Severity::Warning));
        assert!(!result.has_errors());
    }

    #[test]
    fn exposed_with_auth_disabled_warns() {
        let result =
            validate_toml_str("[server]\nbind = \"0.0.0.0\"\n[auth]\ndisabled = true\n");
        assert!(find(&result, "auth.disabled").is_some());
        assert!(find(&result, "auth.password").is_none());
    }

    #[test]
    fn loopback_without_password_is_fine() {
        let result = validate_toml_str("[server]\nbind = \"localhost\"\n");
        assert_eq!(result.count(Severity::Warning), 0);
    }

    #[test]
    fn empty_superuser_command_is_error() {
        let result = validate_toml_str("[actions]\nsuperuser_command = []\n");
        assert!(find(&result, "actions.superuser_command").is_some());
        assert!(result.has_errors());
    }

    #[test]
    fn missing_actions_dir_warns_on_file_validation() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
        let path = dir.path().join("boxpanel.toml");
        let body = format!(
            "[actions]\ndir = \"{}\"\n",
            dir.path().join("missing").display()
        );
        std::fs::write(&path, body).unwrap_or_else(|e| panic!("write: {e}"));

        let result = validate(Some(&path));
        assert_eq!(result.config_path.as_deref(), Some(path.as_path()));
        assert!(find(&result, "actions.dir").is_some());
    }

    #[test]
    fn yaml_file_gets_semantic_checks() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
        let path = dir.path().join("boxpanel.yaml");
        std::fs::write(&path, "actions:\n  superuser_command: []\n")
            .unwrap_or_else(|e| panic!("write: {e}"));

        let result = validate(Some(&path));
        assert!(find(&result, "actions.superuser_command").is_some());
        assert!(result.has_errors());
    }
}
