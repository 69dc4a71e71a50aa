//! # Email Content
//!
//! Sender identity and the message text shared by all providers, so every
//! provider sends the same subject and body for a proposal.

use crate::domain::entities::package::AddOnKind;
use crate::domain::entities::proposal::PricedProposal;
use crate::domain::value_objects::EmailAddress;
use std::fmt::Write as _;

/// Who proposals are sent from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderIdentity {
    /// Envelope and header sender.
    pub from_address: EmailAddress,
    /// Display name, also used as the issuing business name.
    pub from_name: String,
    /// Reply-To header, when replies go elsewhere.
    pub reply_to: Option<EmailAddress>,
    /// Closing contact line.
    pub contact_line: String,
}

impl SenderIdentity {
    /// Formats the sender as `Name <address>`.
    #[must_use]
    pub fn mailbox(&self) -> String {
        if self.from_name.trim().is_empty() {
            self.from_address.to_string()
        } else {
            format!("{} <{}>", self.from_name.replace(['<', '>', '"'], ""), self.from_address)
        }
    }
}

/// Subject and bodies of a proposal email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailContent {
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html: String,
    /// Plain-text alternative.
    pub text: String,
}

impl EmailContent {
    /// Builds the email for a proposal.
    #[must_use]
    pub fn compose(proposal: &PricedProposal, sender: &SenderIdentity) -> Self {
        Self {
            subject: subject(proposal, sender),
            html: html_body(proposal, sender),
            text: text_body(proposal, sender),
        }
    }
}

/// Subject line for a proposal.
#[must_use]
pub fn subject(proposal: &PricedProposal, sender: &SenderIdentity) -> String {
    format!(
        "Your {} Proposal from {}",
        proposal.package_name(),
        sender.from_name
    )
}

fn summary_rows(proposal: &PricedProposal) -> Vec<(String, String)> {
    let mut rows = vec![
        ("Package".to_string(), proposal.package_name().to_string()),
        (
            "Monthly investment".to_string(),
            proposal.raw_monthly().to_string(),
        ),
        (
            "Payment frequency".to_string(),
            proposal.payment_term().label().to_string(),
        ),
    ];
    if proposal.discount_percent() > 0 {
        rows.push((
            format!("Discounted monthly ({}% off)", proposal.discount_percent()),
            proposal.discounted_monthly().to_string(),
        ));
    }
    if !proposal.one_time_total().is_zero() {
        rows.push((
            "One-time fees".to_string(),
            proposal.one_time_total().to_string(),
        ));
    }
    rows.push((
        "First payment".to_string(),
        proposal.first_payment().to_string(),
    ));
    rows
}

fn html_body(proposal: &PricedProposal, sender: &SenderIdentity) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<p>Hi {},</p><p>Thank you for your interest in {}. Your proposal for {} is attached as a PDF.</p>",
        escape_html(proposal.client_name()),
        escape_html(&sender.from_name),
        escape_html(proposal.company()),
    );

    html.push_str("<table cellpadding=\"4\">");
    for (label, value) in summary_rows(proposal) {
        let _ = write!(
            html,
            "<tr><td>{}</td><td><strong>{}</strong></td></tr>",
            escape_html(&label),
            escape_html(&value)
        );
    }
    html.push_str("</table>");

    if !proposal.add_ons().is_empty() {
        html.push_str("<p>Add-ons:</p><ul>");
        for item in proposal.add_ons() {
            let _ = write!(
                html,
                "<li>{} ({}{})</li>",
                escape_html(&item.name),
                item.price,
                add_on_suffix(item.kind)
            );
        }
        html.push_str("</ul>");
    }

    let _ = write!(
        html,
        "<p>{}</p><p>Reference: {}</p>",
        escape_html(&sender.contact_line),
        proposal.id().reference()
    );
    html
}

fn text_body(proposal: &PricedProposal, sender: &SenderIdentity) -> String {
    let mut text = format!(
        "Hi {},\n\nThank you for your interest in {}. Your proposal for {} is attached as a PDF.\n\n",
        proposal.client_name(),
        sender.from_name,
        proposal.company()
    );
    for (label, value) in summary_rows(proposal) {
        let _ = writeln!(text, "{}: {}", label, value);
    }
    for item in proposal.add_ons() {
        let _ = writeln!(
            text,
            "Add-on: {} ({}{})",
            item.name,
            item.price,
            add_on_suffix(item.kind)
        );
    }
    let _ = write!(
        text,
        "\n{}\nReference: {}\n",
        sender.contact_line,
        proposal.id().reference()
    );
    text
}

fn add_on_suffix(kind: AddOnKind) -> &'static str {
    match kind {
        AddOnKind::Recurring => "/month",
        AddOnKind::OneTime => " one-time",
    }
}

/// Escapes text for inclusion in HTML element content or attributes.
#[must_use]
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::entities::package::{AddOn, Package};
    use crate::domain::entities::selection::SelectionRequest;
    use crate::domain::services::pricing::PricingEngine;
    use crate::domain::value_objects::{Money, PackageId, PaymentTerm, Timestamp};

    pub(crate) fn sender() -> SenderIdentity {
        SenderIdentity {
            from_address: EmailAddress::parse("proposals@agency.test").unwrap(),
            from_name: "Agency".to_string(),
            reply_to: Some(EmailAddress::parse("sales@agency.test").unwrap()),
            contact_line: "Questions? Call us.".to_string(),
        }
    }

    pub(crate) fn proposal(company: &str) -> PricedProposal {
        let selection = SelectionRequest::new(
            EmailAddress::parse("client@example.com").unwrap(),
            Package::new(PackageId::new("growth"), "Growth", Money::from_whole(4200)).unwrap(),
            vec![AddOn::new("Extra Inbox", Money::from_whole(300), AddOnKind::Recurring).unwrap()],
            PaymentTerm::Quarterly,
            Some("Jane"),
            Some(company),
        );
        PricingEngine::new().price_at(&selection, Timestamp::from_secs(1_704_067_200).unwrap())
    }

    #[test]
    fn mailbox_format() {
        assert_eq!(sender().mailbox(), "Agency <proposals@agency.test>");
        let mut anonymous = sender();
        anonymous.from_name = String::new();
        assert_eq!(anonymous.mailbox(), "proposals@agency.test");
    }

    #[test]
    fn escape() {
        assert_eq!(
            escape_html("<b>Tom & \"Jerry\"</b>"),
            "&lt;b&gt;Tom &amp; &quot;Jerry&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn compose_includes_figures() {
        let content = EmailContent::compose(&proposal("Acme"), &sender());
        assert_eq!(content.subject, "Your Growth Proposal from Agency");
        assert!(content.html.contains("$12,825.00"));
        assert!(content.html.contains("Extra Inbox ($300.00/month)"));
        assert!(content.text.contains("First payment: $12,825.00"));
        assert!(content.text.contains("Discounted monthly (5% off): $4,275.00"));
    }

    #[test]
    fn html_escapes_client_input() {
        let content = EmailContent::compose(&proposal("<script>Evil</script>"), &sender());
        assert!(!content.html.contains("<script>"));
        assert!(content.html.contains("&lt;script&gt;"));
    }
}
