//! Form validation against per-form rule lists fixed at compile time.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

/// A single constraint on a form field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Rule {
    /// Not blank
    Required,
    /// Character count within `min..=max`
    Length(usize, usize),
    Email,
    Digits,
}

impl Rule {
    fn message(&self) -> Cow<'static, str> {
        match self {
            Rule::Required => Cow::Borrowed("cannot be blank"),
            Rule::Length(min, max) => {
                Cow::Owned(format!("the length must be between {min} and {max}"))
            }
            Rule::Email => Cow::Borrowed("must be a valid email address"),
            Rule::Digits => Cow::Borrowed("must contain digits only"),
        }
    }

    /// Whether `value` satisfies the rule. Every rule except `Required`
    /// accepts an empty value, so blank optional fields pass.
    fn check(&self, value: &str) -> bool {
        let value = value.trim();
        match self {
            Rule::Required => !value.is_empty(),
            _ if value.is_empty() => true,
            Rule::Length(min, max) => (*min..=*max).contains(&value.chars().count()),
            Rule::Email => is_email(value),
            Rule::Digits => value.chars().all(|c| c.is_ascii_digit()),
        }
    }
}

static EMAIL_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$")
        .map_err(|e| tracing::error!(error = %e, "Email pattern failed to compile"))
        .ok()
});

fn is_email(value: &str) -> bool {
    value.len() <= 254
        && EMAIL_PATTERN
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(value))
}

/// A form type together with its rule list.
pub(crate) trait FormSchema {
    /// `(field name, rules)` in the order they are checked
    const RULES: &'static [(&'static str, &'static [Rule])];

    /// Submitted value of `field`; unknown names read as empty
    fn field(&self, name: &str) -> &str;
}

/// First failing rule message per field
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct FieldErrors(BTreeMap<&'static str, Cow<'static, str>>);

impl FieldErrors {
    pub(crate) fn get(&self, field: &str) -> &str {
        self.0.get(field).map_or("", |m| &**m)
    }

    pub(crate) fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub(crate) fn validate<F: FormSchema>(form: &F) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();
    for &(name, rules) in F::RULES {
        let value = form.field(name);
        if let Some(rule) = rules.iter().find(|rule| !rule.check(value)) {
            errors.0.insert(name, rule.message());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        tracing::debug!(?errors, "Form validation failed");
        Err(errors)
    }
}
