//! Validation: "exactly one selector" and status-range sanity.
//!
//! Selectors are inspected in a fixed precedence order:
//!
//! | Grammar | Order |
//! |---------|-------|
//! | request | `all`, `any`, `method`, `not`, `path` |
//! | response | `all`, `any`, `status`, `not` |
//!
//! Children are validated as soon as their selector is recognized, so an
//! invalid child under `all` is reported before a conflicting selector that
//! comes later in the order. The first error wins; nothing is aggregated.

use crate::spec::{RequestMatchSpec, ResponseMatchSpec};
use crate::{MatchKind, ProfileError};

/// Tracks which selector a node has claimed so far.
struct Selector {
    kind: MatchKind,
    claimed: Option<&'static str>,
}

impl Selector {
    fn new(kind: MatchKind) -> Self {
        Self {
            kind,
            claimed: None,
        }
    }

    /// Record `name` as set; any earlier claim makes the node ambiguous.
    fn claim(&mut self, name: &'static str) -> Result<(), ProfileError> {
        if let Some(first) = self.claimed {
            tracing::trace!(kind = %self.kind, first, second = name, "multiple selectors set");
            return Err(ProfileError::MultipleFieldsSet {
                kind: self.kind,
                first,
                second: name,
            });
        }
        self.claimed = Some(name);
        Ok(())
    }

    fn finish(self) -> Result<(), ProfileError> {
        if self.claimed.is_none() {
            tracing::trace!(kind = %self.kind, "no selector set");
            return Err(ProfileError::NoFieldSet { kind: self.kind });
        }
        Ok(())
    }
}

impl RequestMatchSpec {
    /// Validate this node and its whole subtree.
    ///
    /// # Errors
    ///
    /// - [`ProfileError::NoFieldSet`] if a node has no selector
    /// - [`ProfileError::MultipleFieldsSet`] if a node has more than one
    ///
    /// `method` and `path` are not checked further here.
    pub fn validate(&self) -> Result<(), ProfileError> {
        let mut selector = Selector::new(MatchKind::Request);

        if let Some(children) = &self.all {
            selector.claim("all")?;
            children.iter().try_for_each(Self::validate)?;
        }
        if let Some(children) = &self.any {
            selector.claim("any")?;
            children.iter().try_for_each(Self::validate)?;
        }
        if !self.method.is_empty() {
            selector.claim("method")?;
        }
        if let Some(child) = &self.not {
            selector.claim("not")?;
            child.validate()?;
        }
        if !self.path.is_empty() {
            selector.claim("path")?;
        }

        selector.finish()
    }
}

impl ResponseMatchSpec {
    /// Validate this node and its whole subtree.
    ///
    /// # Errors
    ///
    /// - [`ProfileError::NoFieldSet`] if a node has no selector
    /// - [`ProfileError::MultipleFieldsSet`] if a node has more than one
    /// - [`ProfileError::InvalidRange`] if a status range has both bounds set
    ///   and `max < min`
    pub fn validate(&self) -> Result<(), ProfileError> {
        let mut selector = Selector::new(MatchKind::Response);

        if let Some(children) = &self.all {
            selector.claim("all")?;
            children.iter().try_for_each(Self::validate)?;
        }
        if let Some(children) = &self.any {
            selector.claim("any")?;
            children.iter().try_for_each(Self::validate)?;
        }
        if let Some(range) = &self.status {
            selector.claim("status")?;
            if range.is_inverted() {
                tracing::trace!(min = range.min, max = range.max, "inverted status range");
                return Err(ProfileError::InvalidRange {
                    min: range.min,
                    max: range.max,
                });
            }
        }
        if let Some(child) = &self.not {
            selector.claim("not")?;
            child.validate()?;
        }

        selector.finish()
    }
}
