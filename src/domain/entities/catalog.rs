//! # Package Catalog
//!
//! The set of packages offered to clients, keyed by [`PackageId`].
//!
//! The catalog is built once at startup (from configuration or
//! [`PackageCatalog::standard`]) and shared read-only between requests.

use crate::domain::entities::package::Package;
use crate::domain::errors::ValidationResult;
use crate::domain::value_objects::{Money, PackageId};

/// Ordered collection of packages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageCatalog {
    packages: Vec<Package>,
}

impl PackageCatalog {
    /// Creates a catalog from packages. Later duplicates of an id are ignored.
    #[must_use]
    pub fn new(packages: Vec<Package>) -> Self {
        let mut unique: Vec<Package> = Vec::with_capacity(packages.len());
        for package in packages {
            if !unique.iter().any(|p| same_key(p.id().as_str(), package.id().as_str())) {
                unique.push(package);
            }
        }
        Self { packages: unique }
    }

    /// The built-in catalog used when configuration does not supply one.
    ///
    /// # Errors
    ///
    /// Only fails if the built-in data is itself invalid.
    pub fn standard() -> ValidationResult<Self> {
        let starter = Package::new(PackageId::new("starter"), "Starter", Money::from_whole(2500))?
            .with_deliverables([
                "500 targeted outreach emails per month",
                "Ideal customer profile research",
                "Monthly performance report",
            ])
            .with_estimated_prospects(15);

        let growth = Package::new(PackageId::new("growth"), "Growth", Money::from_whole(4200))?
            .with_deliverables([
                "1,000 targeted outreach emails per month",
                "300 LinkedIn outreach touchpoints per month",
                "Dedicated campaign manager",
                "Bi-weekly performance reviews",
            ])
            .with_estimated_prospects(40);

        let scale = Package::new(PackageId::new("scale"), "Scale", Money::from_whole(7500))?
            .with_deliverables([
                "2,500 targeted outreach emails per month",
                "800 LinkedIn outreach touchpoints per month",
                "200 cold call outreach attempts per month",
                "Dedicated campaign manager and copywriter",
                "Weekly strategy calls",
            ])
            .with_estimated_prospects(90);

        Ok(Self::new(vec![starter, growth, scale]))
    }

    /// Looks up a package by identifier, case-insensitively.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Package> {
        self.packages.iter().find(|p| same_key(p.id().as_str(), id))
    }

    /// Looks up a package by identifier, falling back to its display name.
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&Package> {
        self.get(key)
            .or_else(|| self.packages.iter().find(|p| same_key(p.name(), key)))
    }

    /// Iterates packages in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Package> {
        self.packages.iter()
    }

    /// Number of packages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Returns true if the catalog has no packages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

fn same_key(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}
