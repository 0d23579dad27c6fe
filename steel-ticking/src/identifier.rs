//! Namespaced registry keys used as the type identity of ticked objects.

use std::{
    borrow::Cow,
    fmt::{self, Display},
    str::FromStr,
};

use crate::error::IdentifierError;

/// A namespaced key such as `minecraft:beacon`.
///
/// Two objects share a type for scheduling purposes exactly when their
/// identifiers compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier {
    /// The namespace, `minecraft` for vanilla types.
    pub namespace: Cow<'static, str>,
    /// The path inside the namespace.
    pub path: Cow<'static, str>,
}

impl Identifier {
    /// The namespace used for vanilla content and for bare paths.
    pub const VANILLA_NAMESPACE: &'static str = "minecraft";

    /// Creates a validated identifier.
    pub fn new(
        namespace: impl Into<Cow<'static, str>>,
        path: impl Into<Cow<'static, str>>,
    ) -> Result<Self, IdentifierError> {
        let namespace = namespace.into();
        let path = path.into();
        if !Self::validate_namespace(&namespace) {
            return Err(IdentifierError::Namespace(namespace.into_owned()));
        }
        if !Self::validate_path(&path) {
            return Err(IdentifierError::Path(path.into_owned()));
        }
        Ok(Self { namespace, path })
    }

    /// Creates a vanilla identifier from an owned path without validation.
    #[must_use]
    pub fn vanilla(path: String) -> Self {
        Self {
            namespace: Cow::Borrowed(Self::VANILLA_NAMESPACE),
            path: Cow::Owned(path),
        }
    }

    /// Creates a vanilla identifier from a static path without validation.
    #[must_use]
    pub const fn vanilla_static(path: &'static str) -> Self {
        Self {
            namespace: Cow::Borrowed(Self::VANILLA_NAMESPACE),
            path: Cow::Borrowed(path),
        }
    }

    fn valid_namespace_char(c: char) -> bool {
        matches!(c, '_' | '-' | '.') || c.is_ascii_lowercase() || c.is_ascii_digit()
    }

    fn valid_path_char(c: char) -> bool {
        Self::valid_namespace_char(c) || c == '/'
    }

    /// Returns `true` if `namespace` is non-empty and only uses `[a-z0-9_.-]`.
    #[must_use]
    pub fn validate_namespace(namespace: &str) -> bool {
        !namespace.is_empty() && namespace.chars().all(Self::valid_namespace_char)
    }

    /// Returns `true` if `path` is non-empty and only uses `[a-z0-9_./-]`.
    #[must_use]
    pub fn validate_path(path: &str) -> bool {
        !path.is_empty() && path.chars().all(Self::valid_path_char)
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl FromStr for Identifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(path), None, None) => {
                Self::new(Self::VANILLA_NAMESPACE, path.to_owned())
            }
            (Some(namespace), Some(path), None) => {
                Self::new(namespace.to_owned(), path.to_owned())
            }
            _ => Err(IdentifierError::Malformed(s.to_owned())),
        }
    }
}
