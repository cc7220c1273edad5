//! Runner option schemas.
//!
//! Each runner declares the options it understands, with a type and a default.
//! Persisted overrides are type-checked against the declaration before use.

use std::fmt;
use std::path::PathBuf;

/// Type of a runner option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionKind {
    Bool,
    Int { min: i64, max: i64 },
    Text,
    Path,
    Choice(&'static [&'static str]),
}

/// Resolved value of a runner option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Text(String),
    Path(PathBuf),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{}", b),
            OptionValue::Int(i) => write!(f, "{}", i),
            OptionValue::Text(s) => f.write_str(s),
            OptionValue::Path(p) => write!(f, "{}", p.display()),
        }
    }
}

impl OptionKind {
    /// Convert a persisted TOML value into this kind, if it fits.
    pub fn coerce(&self, value: &toml::Value) -> Option<OptionValue> {
        match (self, value) {
            (OptionKind::Bool, toml::Value::Boolean(b)) => Some(OptionValue::Bool(*b)),
            (OptionKind::Int { min, max }, toml::Value::Integer(i)) => {
                (*min..=*max).contains(i).then_some(OptionValue::Int(*i))
            }
            (OptionKind::Text, toml::Value::String(s)) => Some(OptionValue::Text(s.clone())),
            (OptionKind::Path, toml::Value::String(s)) => Some(OptionValue::Path(PathBuf::from(s))),
            (OptionKind::Choice(choices), toml::Value::String(s)) => choices
                .contains(&s.as_str())
                .then(|| OptionValue::Text(s.clone())),
            _ => None,
        }
    }
}

/// Declaration of one runner option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    pub name: &'static str,
    pub kind: OptionKind,
    /// `None` means the option is unset unless configured.
    pub default: Option<OptionValue>,
    pub description: &'static str,
}

impl OptionSpec {
    pub fn bool(name: &'static str, default: bool, description: &'static str) -> Self {
        Self {
            name,
            kind: OptionKind::Bool,
            default: Some(OptionValue::Bool(default)),
            description,
        }
    }

    pub fn int(
        name: &'static str,
        default: i64,
        min: i64,
        max: i64,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            kind: OptionKind::Int { min, max },
            default: Some(OptionValue::Int(default)),
            description,
        }
    }

    pub fn text(name: &'static str, default: Option<&str>, description: &'static str) -> Self {
        Self {
            name,
            kind: OptionKind::Text,
            default: default.map(|d| OptionValue::Text(d.to_string())),
            description,
        }
    }

    /// A path option with no default; unset until configured.
    pub fn path(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            kind: OptionKind::Path,
            default: None,
            description,
        }
    }

    pub fn choice(
        name: &'static str,
        choices: &'static [&'static str],
        default: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            kind: OptionKind::Choice(choices),
            default: Some(OptionValue::Text(default.to_string())),
            description,
        }
    }
}
