//! Conformance test fixture runner
//!
//! Loads YAML fixtures and runs them through the converter. Each fixture holds
//! exactly one input (`request`, `response` or `route`) and either the expected
//! output tree as JSON (`expect`) or an error code (`expect_error`).
//!
//! ```yaml
//! name: path leaf
//! request:
//!   path: /foo
//! expect:
//!   path: { regex: /foo }
//! ---
//! name: ambiguous leaf
//! request: { method: GET, path: /foo }
//! expect_error: multiple_fields_set
//! ```

use serde::Deserialize;
use svcprof::prelude::*;

/// A complete test fixture.
#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub name: String,
    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub request: Option<RequestMatchSpec>,
    #[serde(default)]
    pub response: Option<ResponseMatchSpec>,
    #[serde(default)]
    pub route: Option<RouteSpec>,

    /// Expected output, in the serialized shape of the output tree.
    #[serde(default)]
    pub expect: Option<serde_json::Value>,
    /// Expected [`ProfileError::code`].
    #[serde(default)]
    pub expect_error: Option<String>,

    /// Use [`RegisteredOnly`] instead of the default resolver.
    #[serde(default)]
    pub strict_methods: bool,
    /// Passed to [`Converter::with_max_depth`].
    #[serde(default)]
    pub max_depth: Option<usize>,
}

/// What running a fixture produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Converted(serde_json::Value),
    Failed(String),
}

impl Fixture {
    /// Parse a fixture from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse multiple fixtures from a YAML file with `---` separators.
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        let mut fixtures = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            fixtures.push(Self::deserialize(doc)?);
        }
        Ok(fixtures)
    }

    /// The outcome this fixture declares.
    ///
    /// # Panics
    ///
    /// If the fixture declares both or neither of `expect` / `expect_error`.
    pub fn expected(&self) -> Outcome {
        match (&self.expect, &self.expect_error) {
            (Some(v), None) => Outcome::Converted(v.clone()),
            (None, Some(code)) => Outcome::Failed(code.clone()),
            _ => panic!(
                "fixture '{}' must set exactly one of `expect` and `expect_error`",
                self.name
            ),
        }
    }

    /// Convert the fixture's input.
    ///
    /// # Panics
    ///
    /// If the fixture declares more or fewer than one input.
    pub fn run(&self) -> Outcome {
        if self.strict_methods {
            self.run_with(self.converter(RegisteredOnly))
        } else {
            self.run_with(self.converter(StandardMethods))
        }
    }

    fn converter<R: MethodResolver>(&self, resolver: R) -> Converter<R> {
        let converter = Converter::new(resolver);
        match self.max_depth {
            Some(max) => converter.with_max_depth(max),
            None => converter,
        }
    }

    fn run_with<R: MethodResolver>(&self, converter: Converter<R>) -> Outcome {
        let result = match (&self.request, &self.response, &self.route) {
            (Some(req), None, None) => converter
                .request_match(Some(req))
                .map(|m| serde_json::to_value(m)),
            (None, Some(rsp), None) => converter
                .response_match(Some(rsp))
                .map(|m| serde_json::to_value(m)),
            (None, None, Some(route)) => converter.route(route).map(|r| serde_json::to_value(r)),
            _ => panic!(
                "fixture '{}' must set exactly one of `request`, `response` and `route`",
                self.name
            ),
        };

        match result {
            Ok(json) => Outcome::Converted(json.unwrap_or_else(|e| {
                panic!("fixture '{}': output did not serialize: {e}", self.name)
            })),
            Err(e) => Outcome::Failed(e.code().to_owned()),
        }
    }

    /// Run the fixture and panic if the outcome differs from the expectation.
    pub fn run_and_assert(&self) {
        let expected = self.expected();
        let actual = self.run();
        assert!(
            actual == expected,
            "Fixture '{}' failed: expected {:?}, got {:?}",
            self.name,
            expected,
            actual
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_multi_document_yaml() {
        let yaml = r"
name: one
request: { path: /foo }
expect: { path: { regex: /foo } }
---
name: two
response: {}
expect_error: no_field_set
";
        let fixtures = Fixture::from_yaml_multi(yaml).unwrap();
        assert_eq!(fixtures.len(), 2);
        for f in &fixtures {
            f.run_and_assert();
        }
    }

    #[test]
    fn strict_methods_switch_resolver() {
        let yaml = r"
name: strict
strict_methods: true
request: { method: BREW }
expect_error: unknown_method
";
        Fixture::from_yaml(yaml).unwrap().run_and_assert();
    }

    #[test]
    #[should_panic(expected = "exactly one of `request`")]
    fn fixture_without_input_is_rejected() {
        let fixture = Fixture::from_yaml("name: empty\nexpect_error: no_field_set\n").unwrap();
        fixture.run();
    }
}
