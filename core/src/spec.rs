//! Input model: the declarative route document as written by users.
//!
//! These types mirror the external schema: every selector is an optional field,
//! so a node may carry zero, one, or several of them. [`validate()`] is what
//! turns "several optional fields" into "exactly one selector".
//!
//! # Relationship to output types
//!
//! | Input type | Output type | Conversion |
//! |------------|-------------|------------|
//! | [`RouteSpec`] | [`Route`](crate::Route) | [`to_route()`](crate::to_route) |
//! | [`ResponseClassSpec`] | [`ResponseClass`](crate::ResponseClass) | [`to_response_class()`](crate::to_response_class) |
//! | [`RequestMatchSpec`] | [`RequestMatch`](crate::RequestMatch) | [`to_request_match()`](crate::to_request_match) |
//! | [`ResponseMatchSpec`] | [`ResponseMatch`](crate::ResponseMatch) | [`to_response_match()`](crate::to_response_match) |
//!
//! # Set semantics
//!
//! `all`, `any`, `not` and `status` are set when present, even if empty
//! (`all: []` is a set selector). `method` and `path` are set when non-empty.
//!
//! [`validate()`]: RequestMatchSpec::validate

#[cfg(feature = "serde")]
use serde::Deserialize;

/// A document holding an ordered list of routes.
///
/// ```yaml
/// routes:
/// - name: GET /books
///   condition:
///     all:
///     - method: GET
///     - path: ^/books/?$
///   responseClasses:
///   - condition:
///       status: { min: 500, max: 599 }
///     isSuccess: false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct ProfileSpec {
    /// Routes in declaration order.
    pub routes: Vec<RouteSpec>,
}

/// A named request condition plus the response classes that label its outcomes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct RouteSpec {
    /// Route name, exported as the `route` metrics label. Not validated.
    pub name: String,

    /// Which requests belong to this route. Required.
    pub condition: Option<RequestMatchSpec>,

    /// How responses on this route are classified.
    #[cfg_attr(feature = "serde", serde(rename = "responseClasses", alias = "responses"))]
    pub responses: Vec<ResponseClassSpec>,
}

impl RouteSpec {
    /// Create a route with a condition and no response classes.
    #[must_use]
    pub fn new(name: impl Into<String>, condition: RequestMatchSpec) -> Self {
        Self {
            name: name.into(),
            condition: Some(condition),
            responses: Vec::new(),
        }
    }

    /// Append a response class (builder pattern).
    #[must_use]
    pub fn with_response(mut self, class: ResponseClassSpec) -> Self {
        self.responses.push(class);
        self
    }
}

/// A response condition tagged as success or failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct ResponseClassSpec {
    /// Which responses fall into this class. Required.
    pub condition: Option<ResponseMatchSpec>,

    /// Whether matching responses count as successes.
    pub is_success: bool,
}

impl ResponseClassSpec {
    /// Create a response class.
    #[must_use]
    pub fn new(condition: ResponseMatchSpec, is_success: bool) -> Self {
        Self {
            condition: Some(condition),
            is_success,
        }
    }
}

/// A boolean test over an HTTP request.
///
/// Exactly one field must be set for the node to be valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct RequestMatchSpec {
    /// Conjunction: every child must match.
    pub all: Option<Vec<RequestMatchSpec>>,

    /// Disjunction: at least one child must match.
    pub any: Option<Vec<RequestMatchSpec>>,

    /// Negation of the child.
    pub not: Option<Box<RequestMatchSpec>>,

    /// HTTP method name, e.g. `GET`. Empty means unset.
    pub method: String,

    /// Regular expression over the request path. Empty means unset.
    #[cfg_attr(feature = "serde", serde(alias = "pathRegex"))]
    pub path: String,
}

impl RequestMatchSpec {
    /// A conjunction node.
    #[must_use]
    pub fn all(children: Vec<Self>) -> Self {
        Self {
            all: Some(children),
            ..Self::default()
        }
    }

    /// A disjunction node.
    #[must_use]
    pub fn any(children: Vec<Self>) -> Self {
        Self {
            any: Some(children),
            ..Self::default()
        }
    }

    /// A negation node.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(child: Self) -> Self {
        Self {
            not: Some(Box::new(child)),
            ..Self::default()
        }
    }

    /// A method leaf.
    #[must_use]
    pub fn method(name: impl Into<String>) -> Self {
        Self {
            method: name.into(),
            ..Self::default()
        }
    }

    /// A path-regex leaf.
    #[must_use]
    pub fn path(pattern: impl Into<String>) -> Self {
        Self {
            path: pattern.into(),
            ..Self::default()
        }
    }

    /// Calculate the nesting depth of this match tree.
    ///
    /// Leaves (and empty nodes) have depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        let all = self.all.iter().flatten().map(Self::depth).max().unwrap_or(0);
        let any = self.any.iter().flatten().map(Self::depth).max().unwrap_or(0);
        let not = self.not.as_deref().map_or(0, Self::depth);
        1 + all.max(any).max(not)
    }
}

/// A boolean test over an HTTP response.
///
/// Exactly one field must be set for the node to be valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct ResponseMatchSpec {
    /// Conjunction: every child must match.
    pub all: Option<Vec<ResponseMatchSpec>>,

    /// Disjunction: at least one child must match.
    pub any: Option<Vec<ResponseMatchSpec>>,

    /// Negation of the child.
    pub not: Option<Box<ResponseMatchSpec>>,

    /// Status code range.
    pub status: Option<StatusRangeSpec>,
}

impl ResponseMatchSpec {
    /// A conjunction node.
    #[must_use]
    pub fn all(children: Vec<Self>) -> Self {
        Self {
            all: Some(children),
            ..Self::default()
        }
    }

    /// A disjunction node.
    #[must_use]
    pub fn any(children: Vec<Self>) -> Self {
        Self {
            any: Some(children),
            ..Self::default()
        }
    }

    /// A negation node.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(child: Self) -> Self {
        Self {
            not: Some(Box::new(child)),
            ..Self::default()
        }
    }

    /// A status-range leaf. A bound of 0 means unbounded on that side.
    #[must_use]
    pub fn status(min: u32, max: u32) -> Self {
        Self {
            status: Some(StatusRangeSpec { min, max }),
            ..Self::default()
        }
    }

    /// Calculate the nesting depth of this match tree.
    #[must_use]
    pub fn depth(&self) -> usize {
        let all = self.all.iter().flatten().map(Self::depth).max().unwrap_or(0);
        let any = self.any.iter().flatten().map(Self::depth).max().unwrap_or(0);
        let not = self.not.as_deref().map_or(0, Self::depth);
        1 + all.max(any).max(not)
    }
}

/// An inclusive HTTP status range. `0` leaves that side unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatusRangeSpec {
    /// Lowest matching status, or 0.
    pub min: u32,
    /// Highest matching status, or 0.
    pub max: u32,
}

impl StatusRangeSpec {
    /// Returns `true` if both bounds are set and `max < min`.
    #[must_use]
    pub fn is_inverted(&self) -> bool {
        self.min != 0 && self.max != 0 && self.max < self.min
    }
}
