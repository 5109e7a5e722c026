//! Converter: input specs → output match trees
//!
//! Each node is validated before it is converted, and children are converted
//! recursively in declaration order. The output mirrors the input exactly:
//! same branching factor, same child order, nothing merged or deduplicated.

use crate::dst::{
    HttpStatusRange, PathMatch, RequestMatch, RequestMatchSeq, ResponseClass, ResponseMatch,
    ResponseMatchSeq, Route,
};
use crate::spec::{RequestMatchSpec, ResponseClassSpec, ResponseMatchSpec, RouteSpec};
use crate::{MatchKind, MethodResolver, ProfileError, StandardMethods};
use std::collections::BTreeMap;

/// Metrics label key carrying the route name.
const ROUTE_LABEL: &str = "route";

/// Converts route specs into output routes.
///
/// Holds the [`MethodResolver`] used for `method` selectors and an optional
/// nesting limit. Stateless otherwise: a `Converter` can be shared across
/// threads and reused for any number of conversions.
///
/// # Example
///
/// ```
/// use svcprof::prelude::*;
///
/// let converter = Converter::new(RegisteredOnly).with_max_depth(svcprof::MAX_DEPTH);
/// let err = converter
///     .request_match(Some(&RequestMatchSpec::method("BREW")))
///     .unwrap_err();
/// assert_eq!(err.code(), "unknown_method");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Converter<R = StandardMethods> {
    resolver: R,
    max_depth: Option<usize>,
}

impl<R: MethodResolver> Converter<R> {
    /// Create a converter with the given method resolver and no depth limit.
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            max_depth: None,
        }
    }

    /// Reject match trees nested deeper than `max` (builder pattern).
    ///
    /// The check runs once per root condition, before validation.
    #[must_use]
    pub fn with_max_depth(mut self, max: usize) -> Self {
        self.max_depth = Some(max);
        self
    }

    /// The configured depth limit, if any.
    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// The method resolver.
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Convert a list of routes, in order.
    ///
    /// # Errors
    ///
    /// The first error from [`route`](Self::route); no partial list is returned.
    pub fn routes(&self, specs: &[RouteSpec]) -> Result<Vec<Route>, ProfileError> {
        specs.iter().map(|spec| self.route(spec)).collect()
    }

    /// Convert a route.
    ///
    /// The condition is converted first, then every response class in order.
    /// `metrics_labels` is `{"route": spec.name}`; the name is not validated.
    ///
    /// # Errors
    ///
    /// Any error from the condition or a response class, unchanged.
    pub fn route(&self, spec: &RouteSpec) -> Result<Route, ProfileError> {
        let result = self.convert_route(spec);
        match &result {
            Ok(route) => tracing::debug!(
                route = %spec.name,
                classes = route.response_classes.len(),
                "converted route"
            ),
            Err(e) => tracing::debug!(route = %spec.name, error = %e, "rejected route"),
        }
        result
    }

    fn convert_route(&self, spec: &RouteSpec) -> Result<Route, ProfileError> {
        let condition = self.request_match(spec.condition.as_ref())?;
        let response_classes = spec
            .responses
            .iter()
            .map(|rc| self.response_class(rc))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Route {
            condition,
            response_classes,
            metrics_labels: BTreeMap::from([(ROUTE_LABEL.to_owned(), spec.name.clone())]),
        })
    }

    /// Convert a response class; `is_failure` is `!is_success`.
    ///
    /// # Errors
    ///
    /// Any error from converting the condition, unchanged.
    pub fn response_class(&self, spec: &ResponseClassSpec) -> Result<ResponseClass, ProfileError> {
        Ok(ResponseClass {
            condition: self.response_match(spec.condition.as_ref())?,
            is_failure: !spec.is_success,
        })
    }

    /// Validate and convert a request match tree.
    ///
    /// # Errors
    ///
    /// - [`ProfileError::MissingMatch`] if `spec` is `None`
    /// - [`ProfileError::DepthExceeded`] if a depth limit is set and exceeded
    /// - any validation error from [`RequestMatchSpec::validate`]
    /// - any error from the method resolver
    pub fn request_match(
        &self,
        spec: Option<&RequestMatchSpec>,
    ) -> Result<RequestMatch, ProfileError> {
        let spec = spec.ok_or(ProfileError::MissingMatch {
            kind: MatchKind::Request,
        })?;
        self.check_depth(MatchKind::Request, spec.depth())?;
        self.convert_request(spec)
    }

    /// Validate and convert a response match tree.
    ///
    /// # Errors
    ///
    /// - [`ProfileError::MissingMatch`] if `spec` is `None`
    /// - [`ProfileError::DepthExceeded`] if a depth limit is set and exceeded
    /// - any validation error from [`ResponseMatchSpec::validate`]
    pub fn response_match(
        &self,
        spec: Option<&ResponseMatchSpec>,
    ) -> Result<ResponseMatch, ProfileError> {
        let spec = spec.ok_or(ProfileError::MissingMatch {
            kind: MatchKind::Response,
        })?;
        self.check_depth(MatchKind::Response, spec.depth())?;
        convert_response(spec)
    }

    fn check_depth(&self, kind: MatchKind, depth: usize) -> Result<(), ProfileError> {
        match self.max_depth {
            Some(max) if depth > max => Err(ProfileError::DepthExceeded { kind, depth, max }),
            _ => Ok(()),
        }
    }

    fn convert_request(&self, spec: &RequestMatchSpec) -> Result<RequestMatch, ProfileError> {
        spec.validate()?;

        if let Some(children) = &spec.all {
            return Ok(RequestMatch::All(self.convert_request_seq(children)?));
        }
        if let Some(children) = &spec.any {
            return Ok(RequestMatch::Any(self.convert_request_seq(children)?));
        }
        if !spec.method.is_empty() {
            return Ok(RequestMatch::Method(self.resolver.resolve(&spec.method)?));
        }
        if let Some(child) = &spec.not {
            return Ok(RequestMatch::Not(Box::new(self.convert_request(child)?)));
        }
        if !spec.path.is_empty() {
            return Ok(RequestMatch::Path(PathMatch::new(spec.path.as_str())));
        }

        // validate() guarantees one of the above was set.
        Err(ProfileError::NoFieldSet {
            kind: MatchKind::Request,
        })
    }

    fn convert_request_seq(
        &self,
        children: &[RequestMatchSpec],
    ) -> Result<RequestMatchSeq, ProfileError> {
        let matches = children
            .iter()
            .map(|child| self.convert_request(child))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RequestMatchSeq { matches })
    }
}

fn convert_response(spec: &ResponseMatchSpec) -> Result<ResponseMatch, ProfileError> {
    spec.validate()?;

    if let Some(children) = &spec.all {
        return Ok(ResponseMatch::All(convert_response_seq(children)?));
    }
    if let Some(children) = &spec.any {
        return Ok(ResponseMatch::Any(convert_response_seq(children)?));
    }
    if let Some(range) = &spec.status {
        return Ok(ResponseMatch::Status(HttpStatusRange {
            min: range.min,
            max: range.max,
        }));
    }
    if let Some(child) = &spec.not {
        return Ok(ResponseMatch::Not(Box::new(convert_response(child)?)));
    }

    Err(ProfileError::NoFieldSet {
        kind: MatchKind::Response,
    })
}

fn convert_response_seq(children: &[ResponseMatchSpec]) -> Result<ResponseMatchSeq, ProfileError> {
    let matches = children
        .iter()
        .map(convert_response)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ResponseMatchSeq { matches })
}

// ═══════════════════════════════════════════════════════════════════════════════
// Default-converter shorthands
// ═══════════════════════════════════════════════════════════════════════════════

/// Convert a route with [`Converter::default()`].
///
/// # Errors
///
/// See [`Converter::route`].
pub fn to_route(spec: &RouteSpec) -> Result<Route, ProfileError> {
    Converter::<StandardMethods>::default().route(spec)
}

/// Convert a list of routes with [`Converter::default()`].
///
/// # Errors
///
/// See [`Converter::routes`].
pub fn to_routes(specs: &[RouteSpec]) -> Result<Vec<Route>, ProfileError> {
    Converter::<StandardMethods>::default().routes(specs)
}

/// Convert a response class with [`Converter::default()`].
///
/// # Errors
///
/// See [`Converter::response_class`].
pub fn to_response_class(spec: &ResponseClassSpec) -> Result<ResponseClass, ProfileError> {
    Converter::<StandardMethods>::default().response_class(spec)
}

/// Convert a request match with [`Converter::default()`].
///
/// # Errors
///
/// See [`Converter::request_match`].
pub fn to_request_match(spec: Option<&RequestMatchSpec>) -> Result<RequestMatch, ProfileError> {
    Converter::<StandardMethods>::default().request_match(spec)
}

/// Convert a response match with [`Converter::default()`].
///
/// # Errors
///
/// See [`Converter::response_match`].
pub fn to_response_match(spec: Option<&ResponseMatchSpec>) -> Result<ResponseMatch, ProfileError> {
    Converter::<StandardMethods>::default().response_match(spec)
}

impl TryFrom<&RequestMatchSpec> for RequestMatch {
    type Error = ProfileError;

    fn try_from(spec: &RequestMatchSpec) -> Result<Self, Self::Error> {
        to_request_match(Some(spec))
    }
}

impl TryFrom<&ResponseMatchSpec> for ResponseMatch {
    type Error = ProfileError;

    fn try_from(spec: &ResponseMatchSpec) -> Result<Self, Self::Error> {
        to_response_match(Some(spec))
    }
}
