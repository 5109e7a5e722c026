//! Output tree: the normalized match representation handed to the proxy.
//!
//! Every node is a tagged union, so "exactly one selector" holds by
//! construction. Values of these types only come out of a successful
//! conversion; nothing here re-validates.
//!
//! With the `serde` feature, the tree serializes as externally tagged
//! snake_case JSON:
//!
//! ```json
//! { "all": { "matches": [ { "method": { "registered": "GET" } },
//!                         { "path": { "regex": "^/books$" } } ] } }
//! { "status": { "min": 500, "max": 599 } }
//! ```

use crate::{HttpMethod, ProfileError};
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::Serialize;

/// A route ready for the proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Route {
    /// Which requests belong to this route.
    pub condition: RequestMatch,

    /// Response classes in declaration order.
    pub response_classes: Vec<ResponseClass>,

    /// Labels attached to metrics for this route: `{"route": <name>}`.
    pub metrics_labels: BTreeMap<String, String>,
}

/// A response classification ready for the proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ResponseClass {
    /// Which responses fall into this class.
    pub condition: ResponseMatch,

    /// `true` when matching responses count as failures.
    pub is_failure: bool,
}

/// A boolean test over an HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RequestMatch {
    /// Every child must match.
    All(RequestMatchSeq),
    /// At least one child must match.
    Any(RequestMatchSeq),
    /// Inverts the child.
    Not(Box<RequestMatch>),
    /// Request method equals this method.
    Method(HttpMethod),
    /// Request path matches this pattern.
    Path(PathMatch),
}

/// An ordered sequence of request matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct RequestMatchSeq {
    /// Children, in the order they were declared.
    pub matches: Vec<RequestMatch>,
}

/// A path regular expression, carried uncompiled.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PathMatch {
    /// The pattern as written.
    pub regex: String,
}

impl PathMatch {
    /// Create a path match from a raw pattern.
    pub fn new(regex: impl Into<String>) -> Self {
        Self {
            regex: regex.into(),
        }
    }

    /// Compile the pattern.
    ///
    /// The converter never calls this; the proxy compiles patterns on its side.
    /// Use it to surface bad patterns early.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::InvalidPattern`] if the pattern does not compile.
    pub fn compile(&self) -> Result<regex::Regex, ProfileError> {
        regex::Regex::new(&self.regex).map_err(|e| ProfileError::InvalidPattern {
            pattern: self.regex.clone(),
            message: e.to_string(),
        })
    }
}

/// A boolean test over an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ResponseMatch {
    /// Every child must match.
    All(ResponseMatchSeq),
    /// At least one child must match.
    Any(ResponseMatchSeq),
    /// Inverts the child.
    Not(Box<ResponseMatch>),
    /// Response status falls inside this range.
    Status(HttpStatusRange),
}

/// An ordered sequence of response matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ResponseMatchSeq {
    /// Children, in the order they were declared.
    pub matches: Vec<ResponseMatch>,
}

/// Inclusive status range, copied verbatim from the input.
///
/// `0` on either side means unbounded; interpreting that is up to the consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct HttpStatusRange {
    pub min: u32,
    pub max: u32,
}

impl RequestMatch {
    /// Calculate the nesting depth of this match tree.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::All(seq) | Self::Any(seq) => {
                1 + seq.matches.iter().map(Self::depth).max().unwrap_or(0)
            }
            Self::Not(inner) => 1 + inner.depth(),
            Self::Method(_) | Self::Path(_) => 1,
        }
    }

    /// Every path pattern in the tree, depth-first, left to right.
    pub fn paths(&self) -> Vec<&PathMatch> {
        let mut out = Vec::new();
        self.collect_paths(&mut out);
        out
    }

    fn collect_paths<'a>(&'a self, out: &mut Vec<&'a PathMatch>) {
        match self {
            Self::All(seq) | Self::Any(seq) => {
                for m in &seq.matches {
                    m.collect_paths(out);
                }
            }
            Self::Not(inner) => inner.collect_paths(out),
            Self::Path(p) => out.push(p),
            Self::Method(_) => {}
        }
    }
}

impl ResponseMatch {
    /// Calculate the nesting depth of this match tree.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::All(seq) | Self::Any(seq) => {
                1 + seq.matches.iter().map(Self::depth).max().unwrap_or(0)
            }
            Self::Not(inner) => 1 + inner.depth(),
            Self::Status(_) => 1,
        }
    }
}
