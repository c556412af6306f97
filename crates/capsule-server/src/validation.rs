use std::sync::OnceLock;

use capsule_core::Failure;
use indexmap::IndexMap;
use regex::Regex;
use serde_json::{Map, Value};

/// A single field constraint
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    Required,
    Str,
    Email,
    MinLen(usize),
    MaxLen(usize),
}

/// Declarative rule set for a JSON request body
///
/// Checked field by field in declaration order; all failing fields are
/// reported together so the caller sees every problem at once.
#[derive(Debug, Default)]
pub struct Rules {
    fields: Vec<(&'static str, Vec<Rule>)>,
}

impl Rules {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn field(mut self, name: &'static str, rules: &[Rule]) -> Self {
        self.fields.push((name, rules.to_vec()));
        self
    }

    /// Validate a JSON body against the rule set
    ///
    /// Returns the validated fields (declared fields that were present).
    /// A non-object body is treated as empty, so every required field
    /// reports as missing.
    ///
    /// # Errors
    ///
    /// Returns [`Failure::Validation`] carrying a field-to-messages map
    /// when any rule fails
    pub fn check(&self, body: &Value) -> Result<Map<String, Value>, Failure> {
        static EMPTY: OnceLock<Map<String, Value>> = OnceLock::new();
        let object = body.as_object().unwrap_or_else(|| EMPTY.get_or_init(Map::new));

        let mut errors: IndexMap<String, Vec<String>> = IndexMap::new();
        let mut validated = Map::new();

        for (name, rules) in &self.fields {
            let value = object.get(*name);
            let messages = check_field(name, value, rules);
            if messages.is_empty() {
                if let Some(value) = value {
                    validated.insert((*name).to_owned(), value.clone());
                }
            } else {
                errors.insert((*name).to_owned(), messages);
            }
        }

        if errors.is_empty() {
            Ok(validated)
        } else {
            Err(Failure::validation(errors))
        }
    }
}

fn check_field(name: &str, value: Option<&Value>, rules: &[Rule]) -> Vec<String> {
    let mut messages = Vec::new();

    let present = match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    };

    if !present {
        if rules.iter().any(|rule| matches!(rule, Rule::Required)) {
            messages.push(format!("The {name} field is required."));
        }
        // Absent optional fields skip the remaining rules
        return messages;
    }
    let value = value.expect("present implies Some");

    for rule in rules {
        match rule {
            Rule::Required => {}
            Rule::Str => {
                if !value.is_string() {
                    messages.push(format!("The {name} field must be a string."));
                }
            }
            Rule::Email => {
                if !value.as_str().is_some_and(is_email) {
                    messages.push(format!("The {name} field must be a valid email address."));
                }
            }
            Rule::MinLen(min) => {
                if let Some(s) = value.as_str()
                    && s.chars().count() < *min
                {
                    messages.push(format!("The {name} field must be at least {min} characters."));
                }
            }
            Rule::MaxLen(max) => {
                if let Some(s) = value.as_str()
                    && s.chars().count() > *max
                {
                    messages.push(format!("The {name} field must not be greater than {max} characters."));
                }
            }
        }
    }

    messages
}

fn is_email(candidate: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("must be valid regex"));
    re.is_match(candidate)
}
