//! Syntax and reserved-word checks for the three generation identifiers.
//!
//! Every validator is pure: given the same input it returns the same verdict
//! and touches nothing outside its arguments. A successful verdict is a
//! newtype that can only be built here, so downstream code never sees an
//! unchecked identifier.

pub mod rules;

use std::fmt;
use std::sync::OnceLock;

use regex_lite::Regex;
use thiserror::Error;

use crate::error::ErrorKind;
use rules::{
    is_reserved_keyword, is_reserved_prefix, BUNDLE_ID_PATTERN, MAX_PACKAGE_NAME_LEN,
    PACKAGE_NAME_PATTERN, PROJECT_NAME_PATTERN,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("Project name is required")]
    ProjectNameEmpty,

    #[error(
        "Project name must start with a letter.\n  Got: \"{got}\"\n  Suggestion: Start with a capital letter like \"MyApp\" or \"WeatherApp\""
    )]
    ProjectNameStart { got: String },

    #[error(
        "Project name contains invalid character '{offending}'.\n  Got: \"{got}\"\n  Only letters and numbers allowed (no spaces, hyphens, or special characters)"
    )]
    ProjectNameChars { got: String, offending: char },

    #[error(
        "Invalid package name format.\n  Got: \"{got}\"\n  Requirements:\n  - Must be lowercase\n  - Must have at least 2 parts separated by dots\n  - Each part must start with a letter\n  Suggestion: Use format like \"com.company.appname\""
    )]
    PackageFormat { got: String },

    #[error(
        "Package name is very long ({len} characters).\n  Long package names can cause build issues with file path limits.\n  Suggestion: Use a shorter package name (under 100 characters)"
    )]
    PackageTooLong { len: usize },

    #[error(
        "Package name cannot start with reserved prefix '{prefix}'. These namespaces are reserved for platform/language libraries."
    )]
    ReservedPrefix { prefix: String },

    #[error(
        "Package name contains keyword or reserved word '{segment}'. Keywords and reserved words cannot be used as package name components. Consider adding a prefix or suffix, e.g., '{segment}s' or 'my{segment}'."
    )]
    ReservedKeyword { segment: String },

    #[error(
        "Bundle ID must have at least 2 parts separated by dots, each starting with a letter. Can contain letters, numbers, and hyphens. Got: {got}"
    )]
    BundleIdFormat { got: String },
}

impl IdentifierError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ReservedPrefix { .. } | Self::ReservedKeyword { .. } => ErrorKind::ReservedName,
            _ => ErrorKind::InputFormat,
        }
    }
}

macro_rules! identifier_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

identifier_newtype!(
    /// A project name that passed [`validate_project_name`].
    ProjectName
);
identifier_newtype!(
    /// A package name that passed [`validate_package_name`].
    PackageName
);
identifier_newtype!(
    /// A bundle identifier that passed [`validate_bundle_id`], or a package name standing in for one.
    BundleId
);

impl From<&PackageName> for BundleId {
    fn from(package: &PackageName) -> Self {
        // every valid package name is also a valid bundle id
        BundleId(package.0.clone())
    }
}

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("valid regex"))
}

fn project_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(&RE, PROJECT_NAME_PATTERN)
}

fn package_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(&RE, PACKAGE_NAME_PATTERN)
}

fn bundle_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(&RE, BUNDLE_ID_PATTERN)
}

/// Accepts names like `WeatherApp`: a leading ASCII letter followed by letters or digits.
pub fn validate_project_name(input: &str) -> Result<ProjectName, IdentifierError> {
    let Some(first) = input.chars().next() else {
        return Err(IdentifierError::ProjectNameEmpty);
    };
    if !first.is_ascii_alphabetic() {
        return Err(IdentifierError::ProjectNameStart {
            got: input.to_string(),
        });
    }
    if !project_name_re().is_match(input) {
        let offending = input
            .chars()
            .find(|c| !c.is_ascii_alphanumeric())
            .unwrap_or(first);
        return Err(IdentifierError::ProjectNameChars {
            got: input.to_string(),
            offending,
        });
    }
    Ok(ProjectName(input.to_string()))
}

/// Accepts reverse-domain package names like `com.acme.weather`.
pub fn validate_package_name(input: &str) -> Result<PackageName, IdentifierError> {
    if !package_name_re().is_match(input) {
        return Err(IdentifierError::PackageFormat {
            got: input.to_string(),
        });
    }

    if input.len() > MAX_PACKAGE_NAME_LEN {
        return Err(IdentifierError::PackageTooLong { len: input.len() });
    }

    if let Some(leading) = input.split('.').next() {
        if is_reserved_prefix(leading) {
            return Err(IdentifierError::ReservedPrefix {
                prefix: leading.to_string(),
            });
        }
    }

    if let Some(segment) = input.split('.').find(|s| is_reserved_keyword(s)) {
        return Err(IdentifierError::ReservedKeyword {
            segment: segment.to_string(),
        });
    }

    Ok(PackageName(input.to_string()))
}

/// Accepts Apple-style bundle identifiers like `com.Acme.weather-app`.
pub fn validate_bundle_id(input: &str) -> Result<BundleId, IdentifierError> {
    if !bundle_id_re().is_match(input) {
        return Err(IdentifierError::BundleIdFormat {
            got: input.to_string(),
        });
    }
    Ok(BundleId(input.to_string()))
}

/// Validate an optional bundle id, falling back to the package name when absent or empty.
pub fn resolve_bundle_id(
    input: Option<&str>,
    package: &PackageName,
) -> Result<BundleId, IdentifierError> {
    match input {
        Some(s) if !s.is_empty() => validate_bundle_id(s),
        _ => Ok(BundleId::from(package)),
    }
}
