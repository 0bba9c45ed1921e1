//! Localized reply strings.
//!
//! Locale files live in `locales/<code>.toml` and are compiled into the binary.
//! A key is addressed by a dotted namespace plus a key name, e.g.
//! `("command.playlist", "edit_success")`. Values may contain `{name}`
//! placeholders that [`I18n::get_with`] fills in.
//!
//! Missing keys fall back to the default locale, then to `namespace.key` itself
//! so a typo shows up in the reply instead of an empty message.

use crate::errors::{Error, Result};
use std::collections::HashMap;
use toml::{Table, Value};
use tracing::warn;

/// Locale used when a guild has none set, and for keys a locale lacks
pub const DEFAULT_LOCALE: &str = "en";

const BUNDLED: &[(&str, &str)] = &[
    ("en", include_str!("../locales/en.toml")),
    ("vi", include_str!("../locales/vi.toml")),
];

/// Loaded locale tables
#[derive(Debug, Clone)]
pub struct I18n {
    locales: HashMap<String, Table>,
}

impl I18n {
    /// Parses the locales bundled with the binary.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if a bundled file is not valid TOML.
    pub fn load() -> Result<Self> {
        let mut locales = HashMap::new();
        for (code, source) in BUNDLED {
            let table = source.parse::<Table>().map_err(|e| Error::Config {
                message: format!("Invalid locale file {code}.toml: {e}"),
            })?;
            locales.insert((*code).to_string(), table);
        }
        Ok(Self { locales })
    }

    /// Whether `locale` has a loaded table
    #[must_use]
    pub fn has_locale(&self, locale: &str) -> bool {
        self.locales.contains_key(locale)
    }

    /// Loaded locale codes, sorted
    #[must_use]
    pub fn available(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.locales.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }

    /// Looks up `namespace.key` in `locale`.
    #[must_use]
    pub fn get(&self, locale: &str, namespace: &str, key: &str) -> String {
        self.get_with(locale, namespace, key, &[])
    }

    /// Looks up `namespace.key` in `locale` and substitutes `{name}` placeholders.
    #[must_use]
    pub fn get_with(&self, locale: &str, namespace: &str, key: &str, vars: &[(&str, &str)]) -> String {
        let template = self
            .lookup(locale, namespace, key)
            .or_else(|| self.lookup(DEFAULT_LOCALE, namespace, key));

        let Some(template) = template else {
            warn!(locale, namespace, key, "Missing translation");
            return format!("{namespace}.{key}");
        };

        fill(template, vars)
    }

    fn lookup(&self, locale: &str, namespace: &str, key: &str) -> Option<&str> {
        let mut table = self.locales.get(locale)?;
        for part in namespace.split('.') {
            table = table.get(part)?.as_table()?;
        }
        match table.get(key)? {
            Value::String(text) => Some(text),
            _ => None,
        }
    }
}

/// Replaces each `{name}` placeholder of `template` with its value in one pass.
///
/// Substituted text is never scanned again, so a value that itself contains
/// `{name}` is kept verbatim. Unknown placeholders are left as written.
fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            rest = &rest[open..];
            break;
        };
        let name = &after[..close];
        match vars.iter().find(|(var, _)| *var == name) {
            Some((_, value)) => out.push_str(value),
            None => {
                out.push('{');
                out.push_str(name);
                out.push('}');
            }
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    out
}
