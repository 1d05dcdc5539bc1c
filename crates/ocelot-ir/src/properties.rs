use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;

use crate::expr::{Expr, ExprKind};
use crate::normalize::normalize_property;

/// Verification status of a single property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyStatus {
    /// Not checked yet.
    Unknown,
    /// Excluded from checking by the user.
    Disabled,
    /// Used as an assumption rather than checked.
    Assumed,
    Proved,
    /// Holds on every path up to the given number of timeframes.
    ProvedWithBound(usize),
    Refuted,
    RefutedWithBound(usize),
    /// Discarded by the engine (e.g. unsupported by the chosen procedure).
    Dropped,
    Failure,
    /// The procedure finished without a verdict.
    Inconclusive,
}

impl fmt::Display for PropertyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyStatus::Unknown => write!(f, "UNKNOWN"),
            PropertyStatus::Disabled => write!(f, "DISABLED"),
            PropertyStatus::Assumed => write!(f, "ASSUMED"),
            PropertyStatus::Proved => write!(f, "PROVED"),
            PropertyStatus::ProvedWithBound(k) => write!(f, "PROVED up to bound {k}"),
            PropertyStatus::Refuted => write!(f, "REFUTED"),
            PropertyStatus::RefutedWithBound(k) => write!(f, "REFUTED up to bound {k}"),
            PropertyStatus::Dropped => write!(f, "DROPPED"),
            PropertyStatus::Failure => write!(f, "FAILURE"),
            PropertyStatus::Inconclusive => write!(f, "INCONCLUSIVE"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PropertyError {
    #[error("Property '{0}' not found")]
    UnknownProperty(String),
}

/// A property together with its normalized form and verification status.
#[derive(Debug, Clone)]
pub struct Property {
    pub number: usize,
    pub identifier: String,
    pub name: String,
    pub description: String,
    pub original_expr: Expr,
    /// `None` when normalization failed; the status is then `Failure`.
    pub normalized_expr: Option<Expr>,
    pub status: PropertyStatus,
    pub failure_reason: Option<String>,
}

impl Property {
    /// Builds a property record and normalizes its expression.
    ///
    /// A property that cannot be normalized is recorded with status
    /// `Failure` instead of being rejected, so the remaining properties can
    /// still be checked.
    pub fn new(
        number: usize,
        identifier: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        expr: Expr,
    ) -> Self {
        let mut property = Self {
            number,
            identifier: identifier.into(),
            name: name.into(),
            description: description.into(),
            original_expr: expr,
            normalized_expr: None,
            status: PropertyStatus::Unknown,
            failure_reason: None,
        };
        match normalize_property(&property.original_expr) {
            Ok(normalized) => property.normalized_expr = Some(normalized),
            Err(err) => property.failure(err.to_string()),
        }
        property
    }

    pub fn unknown(&mut self) {
        self.status = PropertyStatus::Unknown;
        self.failure_reason = None;
    }

    pub fn disable(&mut self) {
        self.status = PropertyStatus::Disabled;
    }

    pub fn assume(&mut self) {
        self.status = PropertyStatus::Assumed;
    }

    pub fn proved(&mut self) {
        self.status = PropertyStatus::Proved;
    }

    pub fn proved_with_bound(&mut self, bound: usize) {
        self.status = PropertyStatus::ProvedWithBound(bound);
    }

    pub fn refuted(&mut self) {
        self.status = PropertyStatus::Refuted;
    }

    pub fn refuted_with_bound(&mut self, bound: usize) {
        self.status = PropertyStatus::RefutedWithBound(bound);
    }

    pub fn dropped(&mut self) {
        self.status = PropertyStatus::Dropped;
    }

    pub fn failure(&mut self, reason: impl Into<String>) {
        self.status = PropertyStatus::Failure;
        self.failure_reason = Some(reason.into());
    }

    pub fn inconclusive(&mut self) {
        self.status = PropertyStatus::Inconclusive;
    }

    pub fn is_unknown(&self) -> bool {
        self.status == PropertyStatus::Unknown
    }

    pub fn is_disabled(&self) -> bool {
        self.status == PropertyStatus::Disabled
    }

    pub fn is_assumed(&self) -> bool {
        self.status == PropertyStatus::Assumed
    }

    pub fn is_proved(&self) -> bool {
        matches!(
            self.status,
            PropertyStatus::Proved | PropertyStatus::ProvedWithBound(_)
        )
    }

    pub fn is_refuted(&self) -> bool {
        matches!(
            self.status,
            PropertyStatus::Refuted | PropertyStatus::RefutedWithBound(_)
        )
    }

    pub fn is_failure(&self) -> bool {
        self.status == PropertyStatus::Failure
    }

    pub fn is_inconclusive(&self) -> bool {
        self.status == PropertyStatus::Inconclusive
    }

    /// Still to be checked: neither disabled nor used as an assumption.
    pub fn is_enabled(&self) -> bool {
        !self.is_disabled() && !self.is_assumed()
    }

    /// Liveness properties need the lasso (loop-back) symbols constrained.
    pub fn requires_lasso_constraints(&self) -> bool {
        self.normalized_expr.as_ref().is_some_and(|e| {
            e.contains(&|n| {
                matches!(
                    n.kind,
                    ExprKind::Eventually(_) | ExprKind::StrongEventually(_)
                )
            })
        })
    }

    pub fn is_exists_path(&self) -> bool {
        matches!(self.original_expr.kind, ExprKind::ExistsPath(_))
    }
}

/// All properties of a design, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct PropertySet {
    properties: Vec<Property>,
}

impl PropertySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a property, numbering it after the existing ones.
    pub fn add(&mut self, identifier: impl Into<String>, expr: Expr) -> &mut Property {
        let number = self.properties.len();
        let identifier = identifier.into();
        self.properties
            .push(Property::new(number, identifier.clone(), identifier, "", expr));
        let last = self.properties.len() - 1;
        &mut self.properties[last]
    }

    pub fn push(&mut self, property: Property) {
        self.properties.push(property);
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Property> {
        self.properties.iter_mut()
    }

    pub fn get(&self, identifier: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.identifier == identifier)
    }

    pub fn get_mut(&mut self, identifier: &str) -> Option<&mut Property> {
        self.properties
            .iter_mut()
            .find(|p| p.identifier == identifier)
    }

    pub fn all_properties_proved(&self) -> bool {
        self.iter().filter(|p| p.is_enabled()).all(Property::is_proved)
    }

    pub fn requires_lasso_constraints(&self) -> bool {
        self.iter()
            .filter(|p| p.is_enabled())
            .any(Property::requires_lasso_constraints)
    }

    /// Enabled properties keyed by identifier.
    pub fn property_map(&self) -> IndexMap<&str, &Property> {
        self.iter()
            .filter(|p| p.is_enabled())
            .map(|p| (p.identifier.as_str(), p))
            .collect()
    }

    /// Disables every property except `identifier`.
    pub fn select(&mut self, identifier: &str) -> Result<(), PropertyError> {
        if self.get(identifier).is_none() {
            return Err(PropertyError::UnknownProperty(identifier.to_string()));
        }
        for p in &mut self.properties {
            if p.identifier != identifier {
                p.disable();
            }
        }
        Ok(())
    }
}
