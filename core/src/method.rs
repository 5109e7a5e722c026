//! `MethodResolver`: method-name → protocol method enumeration
//!
//! The converter does not decide what a method name means. It asks a
//! [`MethodResolver`], and passes any error the resolver returns through
//! unchanged.

use crate::ProfileError;
use std::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

/// The registered HTTP methods a proxy recognizes natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Connect,
    Head,
    Trace,
}

impl Method {
    /// All registered methods, in wire order.
    pub const ALL: [Method; 9] = [
        Method::Get,
        Method::Post,
        Method::Put,
        Method::Delete,
        Method::Patch,
        Method::Options,
        Method::Connect,
        Method::Head,
        Method::Trace,
    ];

    /// The canonical method token.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Options => "OPTIONS",
            Self::Connect => "CONNECT",
            Self::Head => "HEAD",
            Self::Trace => "TRACE",
        }
    }

    /// Look up a registered method by its exact (case-sensitive) token.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == token)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP method as carried in the output tree.
///
/// Extension methods that are not [registered](Method) travel as raw strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum HttpMethod {
    /// One of the registered methods.
    Registered(Method),
    /// Any other method token, verbatim.
    Unregistered(String),
}

impl HttpMethod {
    /// The method token as written on the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Registered(m) => m.as_str(),
            Self::Unregistered(s) => s,
        }
    }
}

impl From<Method> for HttpMethod {
    fn from(m: Method) -> Self {
        Self::Registered(m)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves a user-written method name into an [`HttpMethod`].
///
/// Implementations must be pure: the same name always resolves the same way.
pub trait MethodResolver: Send + Sync {
    /// Resolve `name`.
    ///
    /// # Errors
    ///
    /// Whatever the resolver considers unresolvable. The converter returns the
    /// error to its caller as-is.
    fn resolve(&self, name: &str) -> Result<HttpMethod, ProfileError>;
}

/// Default resolver: registered tokens map to [`HttpMethod::Registered`],
/// everything else to [`HttpMethod::Unregistered`]. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardMethods;

impl MethodResolver for StandardMethods {
    fn resolve(&self, name: &str) -> Result<HttpMethod, ProfileError> {
        Ok(Method::from_token(name).map_or_else(
            || HttpMethod::Unregistered(name.to_owned()),
            HttpMethod::Registered,
        ))
    }
}

/// Strict resolver: only registered tokens are accepted.
///
/// Anything else fails with [`ProfileError::UnknownMethod`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RegisteredOnly;

impl MethodResolver for RegisteredOnly {
    fn resolve(&self, name: &str) -> Result<HttpMethod, ProfileError> {
        Method::from_token(name)
            .map(HttpMethod::Registered)
            .ok_or_else(|| ProfileError::UnknownMethod {
                name: name.to_owned(),
            })
    }
}

impl<R: MethodResolver + ?Sized> MethodResolver for &R {
    fn resolve(&self, name: &str) -> Result<HttpMethod, ProfileError> {
        (**self).resolve(name)
    }
}

impl<R: MethodResolver + ?Sized> MethodResolver for Box<R> {
    fn resolve(&self, name: &str) -> Result<HttpMethod, ProfileError> {
        (**self).resolve(name)
    }
}
