//! svcprof - service-profile route match compiler
//!
//! Validates user-authored route match trees and converts them into the
//! normalized match trees a data-plane proxy consumes.
//!
//! # Architecture
//!
//! ```text
//! RouteSpec / RequestMatchSpec / ResponseMatchSpec   (spec: declarative input)
//!         ↓ validate()   exactly one selector per node, sane status ranges
//!         ↓ convert      Converter<R: MethodResolver>
//! Route / RequestMatch / ResponseMatch               (dst: tagged-union output)
//! ```
//!
//! Two grammars share the same shape:
//!
//! - [`RequestMatchSpec`]: `all`, `any`, `not`, `method`, `path`
//! - [`ResponseMatchSpec`]: `all`, `any`, `not`, `status`
//!
//! # Key Design Insights
//!
//! 1. **Exclusivity lives in the output type**: the input mirrors the external
//!    document (a struct of optional selectors), the output is an enum. Validation
//!    is the one place where "exactly one selector" is checked; after that the
//!    type system carries it.
//!
//! 2. **Fail-fast, depth-first, left-to-right**: the first error aborts the whole
//!    conversion. No partial trees, no aggregation.
//!
//! 3. **Pure tree-to-tree transform**: input is borrowed, never mutated. Child
//!    order and branching factor are preserved exactly.
//!
//! # Example
//!
//! ```
//! use svcprof::prelude::*;
//!
//! let spec = RouteSpec::new("r1", RequestMatchSpec::method("GET"))
//!     .with_response(ResponseClassSpec::new(ResponseMatchSpec::status(200, 299), true));
//!
//! let route = to_route(&spec).unwrap();
//! assert_eq!(route.metrics_labels["route"], "r1");
//! assert!(!route.response_classes[0].is_failure);
//! ```

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod convert;
pub mod dst;
mod method;
pub mod spec;
mod validate;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

pub use convert::{
    to_request_match, to_response_class, to_response_match, to_route, to_routes, Converter,
};
pub use dst::{
    HttpStatusRange, PathMatch, RequestMatch, RequestMatchSeq, ResponseClass, ResponseMatch,
    ResponseMatchSeq, Route,
};
pub use method::{HttpMethod, Method, MethodResolver, RegisteredOnly, StandardMethods};
pub use spec::{
    ProfileSpec, RequestMatchSpec, ResponseClassSpec, ResponseMatchSpec, RouteSpec,
    StatusRangeSpec,
};

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use svcprof::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Conversion
        to_request_match,
        to_response_class,
        to_response_match,
        to_route,
        to_routes,
        Converter,
        // Methods
        HttpMethod,
        Method,
        MethodResolver,
        RegisteredOnly,
        StandardMethods,
        // Output tree
        HttpStatusRange,
        PathMatch,
        RequestMatch,
        ResponseClass,
        ResponseMatch,
        Route,
        // Input model
        ProfileSpec,
        RequestMatchSpec,
        ResponseClassSpec,
        ResponseMatchSpec,
        RouteSpec,
        StatusRangeSpec,
        // Errors
        MatchKind,
        ProfileError,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Recommended maximum nesting depth for match trees.
///
/// Not enforced by default. Conversion recurses once per level, so callers fed
/// by untrusted sources should opt in via [`Converter::with_max_depth`].
pub const MAX_DEPTH: usize = 32;

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Which match grammar an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchKind {
    /// [`RequestMatchSpec`] / [`RequestMatch`].
    Request,
    /// [`ResponseMatchSpec`] / [`ResponseMatch`].
    Response,
}

impl std::fmt::Display for MatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Request => f.write_str("request"),
            Self::Response => f.write_str("response"),
        }
    }
}

/// Errors from match validation and conversion.
///
/// All of these are terminal: the route definition is rejected as a whole.
/// Fix the input and convert again.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    /// A match node required by the schema is absent.
    #[error("missing {kind} match")]
    MissingMatch {
        /// Which grammar the missing node belongs to.
        kind: MatchKind,
    },

    /// A node has none of its selectors populated.
    #[error("a {kind} match must have a field set")]
    NoFieldSet {
        /// Which grammar the empty node belongs to.
        kind: MatchKind,
    },

    /// A node has more than one selector populated.
    #[error("a {kind} match may not have more than one field set (found `{first}` and `{second}`)")]
    MultipleFieldsSet {
        /// Which grammar the ambiguous node belongs to.
        kind: MatchKind,
        /// The first selector recognized, in precedence order.
        first: &'static str,
        /// The selector that made the node ambiguous.
        second: &'static str,
    },

    /// A status range has both bounds set and `max < min`.
    #[error("range maximum {max} cannot be smaller than minimum {min}")]
    InvalidRange {
        /// Lower bound as written.
        min: u32,
        /// Upper bound as written.
        max: u32,
    },

    /// The method resolver refused a method name.
    #[error("unrecognized HTTP method \"{name}\"")]
    UnknownMethod {
        /// The method name as written.
        name: String,
    },

    /// A match tree is nested deeper than the configured limit.
    #[error(
        "{kind} match nesting depth is {depth}, but maximum allowed is {max}; \
         reduce nesting or flatten the match tree"
    )]
    DepthExceeded {
        /// Which grammar the tree belongs to.
        kind: MatchKind,
        /// Actual depth of the tree.
        depth: usize,
        /// Maximum allowed depth.
        max: usize,
    },

    /// A path pattern failed to compile as a regular expression.
    #[error("invalid path pattern \"{pattern}\": {message}")]
    InvalidPattern {
        /// The pattern that failed to compile.
        pattern: String,
        /// The regex compiler's message.
        message: String,
    },
}

impl ProfileError {
    /// Stable snake_case identifier for this error, for machine-readable output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingMatch { .. } => "missing_match",
            Self::NoFieldSet { .. } => "no_field_set",
            Self::MultipleFieldsSet { .. } => "multiple_fields_set",
            Self::InvalidRange { .. } => "invalid_range",
            Self::UnknownMethod { .. } => "unknown_method",
            Self::DepthExceeded { .. } => "depth_exceeded",
            Self::InvalidPattern { .. } => "invalid_pattern",
        }
    }
}
