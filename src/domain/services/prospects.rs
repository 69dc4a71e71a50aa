//! # Prospect Estimation
//!
//! Estimated qualified prospects per month for a package.
//!
//! The catalog's lookup value wins when present. Otherwise the estimate is
//! summed from deliverable text: every deliverable mentioning "outreach"
//! contributes its leading number (`"1,000 targeted outreach emails"` adds
//! 1000). Deliverables whose first token is not a number are skipped.

use crate::domain::entities::package::Package;

/// Returns the prospect estimate for a package.
#[must_use]
pub fn estimate_prospects(package: &Package) -> u32 {
    package
        .estimated_prospects()
        .unwrap_or_else(|| prospects_from_deliverables(package.deliverables()))
}

/// Sums leading integers of the deliverables that mention outreach.
///
/// # Examples
///
/// ```
/// use proposal_dispatch::domain::services::prospects::prospects_from_deliverables;
///
/// let total = prospects_from_deliverables(&[
///     "1,000 targeted outreach emails",
///     "250 LinkedIn OUTREACH messages",
///     "Weekly report",
///     "Unlimited outreach",
/// ]);
/// assert_eq!(total, 1250);
/// ```
#[must_use]
pub fn prospects_from_deliverables<S: AsRef<str>>(deliverables: &[S]) -> u32 {
    deliverables
        .iter()
        .map(AsRef::<str>::as_ref)
        .filter(|d| d.to_lowercase().contains("outreach"))
        .filter_map(leading_integer)
        .fold(0u32, u32::saturating_add)
}

fn leading_integer(text: &str) -> Option<u32> {
    let token = text.split_whitespace().next()?;
    let digits: String = token
        .trim_end_matches('+')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
