//! svcprof-test: conformance fixtures and tree generators
//!
//! Two pieces:
//!
//! 1. **Generators**: synthetic match trees of a chosen width or depth, shared by
//!    unit tests and benchmarks.
//! 2. **Fixtures** (feature = `"fixtures"`): YAML documents describing an input
//!    and the expected output tree or error code, run by `tests/conformance.rs`.

use svcprof::prelude::*;

#[cfg(feature = "fixtures")]
pub mod fixture;

/// A conjunction of `width` path leaves, `/p0` … `/p{width-1}`.
#[must_use]
pub fn wide_request(width: usize) -> RequestMatchSpec {
    RequestMatchSpec::all(
        (0..width)
            .map(|i| RequestMatchSpec::path(format!("/p{i}")))
            .collect(),
    )
}

/// A method leaf wrapped in `depth - 1` alternating `not`/`any` layers.
///
/// `deep_request(1)` is the bare leaf; `deep_request(n).depth() == n`.
#[must_use]
pub fn deep_request(depth: usize) -> RequestMatchSpec {
    let mut spec = RequestMatchSpec::method("GET");
    for level in 1..depth {
        spec = if level % 2 == 0 {
            RequestMatchSpec::any(vec![spec])
        } else {
            RequestMatchSpec::not(spec)
        };
    }
    spec
}

/// A disjunction of `width` adjacent 10-code status ranges starting at 100.
#[must_use]
pub fn wide_response(width: usize) -> ResponseMatchSpec {
    ResponseMatchSpec::any(
        (0..width)
            .map(|i| {
                let min = 100 + 10 * u32::try_from(i).unwrap_or(u32::MAX / 20);
                ResponseMatchSpec::status(min, min + 9)
            })
            .collect(),
    )
}

/// A status leaf wrapped in `depth - 1` `not` layers.
#[must_use]
pub fn deep_response(depth: usize) -> ResponseMatchSpec {
    let mut spec = ResponseMatchSpec::status(500, 599);
    for _ in 1..depth {
        spec = ResponseMatchSpec::not(spec);
    }
    spec
}

/// A realistic route: `GET` on a path, 5xx as failure, everything else success.
#[must_use]
pub fn sample_route(name: &str, path: &str) -> RouteSpec {
    RouteSpec::new(
        name,
        RequestMatchSpec::all(vec![
            RequestMatchSpec::method("GET"),
            RequestMatchSpec::path(path),
        ]),
    )
    .with_response(ResponseClassSpec::new(
        ResponseMatchSpec::status(500, 599),
        false,
    ))
    .with_response(ResponseClassSpec::new(
        ResponseMatchSpec::not(ResponseMatchSpec::status(500, 599)),
        true,
    ))
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{deep_request, deep_response, sample_route, wide_request, wide_response};
    pub use svcprof::prelude::*;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generators_hit_requested_shape() {
        assert_eq!(deep_request(1).depth(), 1);
        assert_eq!(deep_request(7).depth(), 7);
        assert_eq!(deep_response(5).depth(), 5);
        assert_eq!(wide_request(12).all.as_ref().map(Vec::len), Some(12));
        assert_eq!(wide_response(3).any.as_ref().map(Vec::len), Some(3));
    }

    #[test]
    fn generated_trees_are_valid() {
        assert!(wide_request(64).validate().is_ok());
        assert!(deep_request(20).validate().is_ok());
        assert!(wide_response(64).validate().is_ok());
        assert!(deep_response(20).validate().is_ok());
        assert!(to_route(&sample_route("books", "^/books$")).is_ok());
    }
}
