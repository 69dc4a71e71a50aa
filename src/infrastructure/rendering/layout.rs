//! # Proposal Layout
//!
//! Builds the fixed proposal layout as a flat list of lines, then places the
//! lines on pages.
//!
//! Layout is separate from PDF emission so pagination can be checked without
//! decoding a PDF. Positions are in millimetres; `baseline_mm` is measured
//! from the bottom edge as PDF coordinates are.
//!
//! Pagination never drops content: when the next line would cross the
//! bottom margin a new page starts and the current section continues there.
//! A heading is moved to the next page together with its first line.

use crate::domain::entities::package::AddOnKind;
use crate::domain::entities::proposal::PricedProposal;

/// Millimetres per typographic point.
const MM_PER_PT: f32 = 0.3528;

/// Average Helvetica glyph width as a fraction of the font size.
const AVG_GLYPH_WIDTH_EM: f32 = 0.52;

/// Terms and conditions printed on every proposal.
pub const TERMS_AND_CONDITIONS: [&str; 5] = [
    "This proposal is valid for 30 days from the date shown above.",
    "The first payment is due on acceptance and covers the full billing cycle of the selected payment term.",
    "Services renew automatically at the end of each billing cycle unless cancelled in writing at least 14 days before renewal.",
    "One-time fees, where listed, are invoiced separately and are non-refundable once work has begun.",
    "Prospect estimates are projections based on typical campaign performance and are not guaranteed.",
];

/// Page size and margins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// Page width.
    pub width_mm: f32,
    /// Page height.
    pub height_mm: f32,
    /// Space above the first line.
    pub margin_top_mm: f32,
    /// Space below the last line; the footer lives here.
    pub margin_bottom_mm: f32,
    /// Left text edge.
    pub margin_left_mm: f32,
    /// Right text edge.
    pub margin_right_mm: f32,
    /// Left edge of the amount column in tables.
    pub amount_column_mm: f32,
}

impl PageGeometry {
    /// ISO A4 portrait.
    pub const A4: Self = Self {
        width_mm: 210.0,
        height_mm: 297.0,
        margin_top_mm: 20.0,
        margin_bottom_mm: 22.0,
        margin_left_mm: 20.0,
        margin_right_mm: 20.0,
        amount_column_mm: 145.0,
    };

    /// Width available for running text.
    #[must_use]
    pub fn text_width_mm(&self) -> f32 {
        self.width_mm - self.margin_left_mm - self.margin_right_mm
    }

    /// Lowest position (from the top) a line may reach.
    #[must_use]
    pub fn content_limit_mm(&self) -> f32 {
        self.height_mm - self.margin_bottom_mm
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::A4
    }
}

/// Typographic role of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextStyle {
    /// Document title.
    Title,
    /// Section heading.
    Heading,
    /// Running text.
    Body,
    /// Emphasized row (first payment).
    Strong,
    /// Fine print and footer.
    Small,
}

impl TextStyle {
    /// Font size in points.
    #[must_use]
    pub const fn font_size_pt(self) -> f32 {
        match self {
            Self::Title => 20.0,
            Self::Heading => 13.0,
            Self::Body => 10.0,
            Self::Strong => 11.5,
            Self::Small => 8.0,
        }
    }

    /// Vertical advance for one line.
    #[must_use]
    pub const fn line_height_mm(self) -> f32 {
        match self {
            Self::Title => 11.0,
            Self::Heading => 8.0,
            Self::Body => 5.5,
            Self::Strong => 7.0,
            Self::Small => 4.2,
        }
    }

    /// True for styles drawn with the bold face.
    #[must_use]
    pub const fn is_bold(self) -> bool {
        matches!(self, Self::Title | Self::Heading | Self::Strong)
    }

    /// Approximate number of characters fitting in `width_mm`.
    #[must_use]
    pub fn chars_per_width(self, width_mm: f32) -> usize {
        let glyph_mm = self.font_size_pt() * MM_PER_PT * AVG_GLYPH_WIDTH_EM;
        let bold_factor = if self.is_bold() { 1.08 } else { 1.0 };
        let chars = (width_mm / (glyph_mm * bold_factor)).floor();
        if chars < 1.0 { 1 } else { chars as usize }
    }
}

/// One line of text before placement.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutLine {
    /// Typographic role.
    pub style: TextStyle,
    /// Text drawn at the left.
    pub text: String,
    /// Offset from the left margin.
    pub indent_mm: f32,
    /// Text drawn in the amount column, for table rows.
    pub amount: Option<String>,
}

/// Element of the unplaced layout.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutItem {
    /// A line of text.
    Line(LayoutLine),
    /// Vertical space. Dropped at the top of a page.
    Gap(f32),
}

/// A line with its position on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    /// The line.
    pub line: LayoutLine,
    /// Left edge of the text.
    pub x_mm: f32,
    /// Baseline, measured from the bottom edge.
    pub baseline_mm: f32,
}

/// Lines placed on one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    /// Lines in drawing order.
    pub lines: Vec<PlacedLine>,
}

/// Text the layout needs beyond the proposal itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Name of the business issuing the proposal.
    pub issuer_name: String,
    /// Footer contact line.
    pub contact_line: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            issuer_name: "Proposal Dispatch".to_string(),
            contact_line: "Questions? Reply to this email and our team will get back to you."
                .to_string(),
        }
    }
}

struct LayoutBuilder<'a> {
    geometry: &'a PageGeometry,
    items: Vec<LayoutItem>,
}

impl<'a> LayoutBuilder<'a> {
    fn new(geometry: &'a PageGeometry) -> Self {
        Self {
            geometry,
            items: Vec::new(),
        }
    }

    fn gap(&mut self, mm: f32) {
        self.items.push(LayoutItem::Gap(mm));
    }

    fn line(&mut self, style: TextStyle, text: String, indent_mm: f32, amount: Option<String>) {
        self.items.push(LayoutItem::Line(LayoutLine {
            style,
            text,
            indent_mm,
            amount,
        }));
    }

    fn heading(&mut self, text: impl Into<String>) {
        self.gap(4.0);
        self.paragraph(TextStyle::Heading, &text.into(), 0.0);
    }

    fn paragraph(&mut self, style: TextStyle, text: &str, indent_mm: f32) {
        let width = self.geometry.text_width_mm() - indent_mm;
        for chunk in wrap_text(text, style.chars_per_width(width)) {
            self.line(style, chunk, indent_mm, None);
        }
    }

    fn bullet(&mut self, style: TextStyle, text: &str) {
        const BULLET_INDENT_MM: f32 = 3.0;
        const HANGING_INDENT_MM: f32 = 6.0;
        let width = self.geometry.text_width_mm() - HANGING_INDENT_MM;
        for (i, chunk) in wrap_text(text, style.chars_per_width(width))
            .into_iter()
            .enumerate()
        {
            if i == 0 {
                self.line(style, format!("-  {}", chunk), BULLET_INDENT_MM, None);
            } else {
                self.line(style, chunk, HANGING_INDENT_MM, None);
            }
        }
    }

    fn row(&mut self, style: TextStyle, label: &str, amount: String) {
        let width = self.geometry.amount_column_mm - self.geometry.margin_left_mm - 4.0;
        let mut amount = Some(amount);
        for chunk in wrap_text(label, style.chars_per_width(width)) {
            self.line(style, chunk, 0.0, amount.take());
        }
    }

    fn finish(self) -> Vec<LayoutItem> {
        self.items
    }
}

/// Builds the proposal layout.
#[must_use]
pub fn build_layout(
    proposal: &PricedProposal,
    options: &RenderOptions,
    geometry: &PageGeometry,
) -> Vec<LayoutItem> {
    let mut b = LayoutBuilder::new(geometry);

    b.paragraph(TextStyle::Title, "Service Proposal", 0.0);
    b.paragraph(
        TextStyle::Small,
        &format!("{} | Reference {}", options.issuer_name, proposal.id().reference()),
        0.0,
    );
    b.gap(4.0);
    b.paragraph(
        TextStyle::Body,
        &format!(
            "Prepared for: {}, {}",
            proposal.client_name(),
            proposal.company()
        ),
        0.0,
    );
    b.paragraph(
        TextStyle::Body,
        &format!("Date: {}", proposal.generated_at().to_long_date()),
        0.0,
    );

    b.heading(format!("Selected Package: {}", proposal.package_name()));
    if proposal.deliverables().is_empty() {
        b.paragraph(
            TextStyle::Body,
            "Deliverables as agreed in the accompanying statement of work.",
            0.0,
        );
    }
    for deliverable in proposal.deliverables() {
        b.bullet(TextStyle::Body, deliverable);
    }

    if !proposal.add_ons().is_empty() {
        b.heading("Add-ons");
        for item in proposal.add_ons() {
            let amount = match item.kind {
                AddOnKind::Recurring => format!("{}/month", item.price),
                AddOnKind::OneTime => format!("{} one-time", item.price),
            };
            b.row(TextStyle::Body, &item.name, amount);
        }
    }

    let term = proposal.payment_term();
    b.heading("Investment Summary");
    b.row(
        TextStyle::Body,
        "Monthly investment",
        proposal.raw_monthly().to_string(),
    );
    b.row(
        TextStyle::Body,
        "Payment frequency",
        term.label().to_string(),
    );
    if proposal.discount_percent() > 0 {
        b.row(
            TextStyle::Body,
            &format!("Discount ({}%)", proposal.discount_percent()),
            format!("-{}/month", proposal.monthly_saving()),
        );
        b.row(
            TextStyle::Body,
            "Discounted monthly rate",
            proposal.discounted_monthly().to_string(),
        );
    }
    if !proposal.one_time_total().is_zero() {
        b.row(
            TextStyle::Body,
            "One-time fees (invoiced separately)",
            proposal.one_time_total().to_string(),
        );
    }
    let months = term.billing_multiplier();
    let first_payment_label = if months == 1 {
        "First payment (1 month)".to_string()
    } else {
        format!("First payment ({} months)", months)
    };
    b.row(
        TextStyle::Strong,
        &first_payment_label,
        proposal.first_payment().to_string(),
    );

    b.heading("Expected Outcomes");
    if proposal.estimated_prospects() > 0 {
        b.bullet(
            TextStyle::Body,
            &format!(
                "Approximately {} qualified prospects per month once campaigns are live",
                proposal.estimated_prospects()
            ),
        );
    } else {
        b.bullet(
            TextStyle::Body,
            "Prospect volume confirmed after the onboarding audit",
        );
    }
    b.bullet(
        TextStyle::Body,
        "Monthly performance reporting with campaign optimization",
    );
    b.bullet(
        TextStyle::Body,
        &format!("Ongoing strategy support from the {} team", options.issuer_name),
    );

    b.heading("Terms & Conditions");
    for (i, term) in TERMS_AND_CONDITIONS.iter().enumerate() {
        b.paragraph(TextStyle::Small, &format!("{}. {}", i + 1, term), 0.0);
    }

    b.gap(6.0);
    b.paragraph(TextStyle::Small, &options.contact_line, 0.0);
    b.paragraph(
        TextStyle::Small,
        &format!("Thank you for considering {}.", options.issuer_name),
        0.0,
    );

    b.finish()
}

/// Places layout items on pages. Always returns at least one page.
#[must_use]
pub fn paginate(items: &[LayoutItem], geometry: &PageGeometry) -> Vec<PageLayout> {
    let limit = geometry.content_limit_mm();
    let mut pages = Vec::new();
    let mut current = PageLayout::default();
    let mut cursor = geometry.margin_top_mm;

    for (index, item) in items.iter().enumerate() {
        match item {
            LayoutItem::Gap(mm) => {
                if !current.lines.is_empty() {
                    cursor += mm;
                }
            }
            LayoutItem::Line(line) => {
                let height = line.style.line_height_mm();
                let needed = if line.style == TextStyle::Heading {
                    height + next_line_height(items, index + 1)
                } else {
                    height
                };

                if cursor + needed > limit && !current.lines.is_empty() {
                    pages.push(std::mem::take(&mut current));
                    cursor = geometry.margin_top_mm;
                }

                cursor += height;
                current.lines.push(PlacedLine {
                    line: line.clone(),
                    x_mm: geometry.margin_left_mm + line.indent_mm,
                    baseline_mm: geometry.height_mm - cursor,
                });
            }
        }
    }

    pages.push(current);
    pages
}

fn next_line_height(items: &[LayoutItem], from: usize) -> f32 {
    items
        .iter()
        .skip(from)
        .find_map(|item| match item {
            LayoutItem::Line(line) => Some(line.style.line_height_mm()),
            LayoutItem::Gap(_) => None,
        })
        .unwrap_or(0.0)
}

/// Greedy word wrap. Words longer than `max_chars` are split.
#[must_use]
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        while word.len() > max_chars {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let word_len = word.len();
        if word_len == 0 {
            continue;
        }
        if current_len > 0 && current_len + 1 + word_len > max_chars {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(word);
        current_len += word_len;
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::domain::entities::package::{AddOn, Package};
    use crate::domain::entities::selection::SelectionRequest;
    use crate::domain::services::pricing::PricingEngine;
    use crate::domain::value_objects::{EmailAddress, Money, PackageId, PaymentTerm, Timestamp};

    fn proposal(deliverables: Vec<String>, add_ons: Vec<AddOn>, term: PaymentTerm) -> PricedProposal {
        let package = Package::new(PackageId::new("growth"), "Growth", Money::from_whole(4200))
            .unwrap()
            .with_deliverables(deliverables);
        let selection = SelectionRequest::new(
            EmailAddress::parse("client@example.com").unwrap(),
            package,
            add_ons,
            term,
            Some("Jane Doe"),
            Some("Acme"),
        );
        PricingEngine::new().price_at(&selection, Timestamp::from_secs(1_704_067_200).unwrap())
    }

    fn texts(items: &[LayoutItem]) -> Vec<String> {
        items
            .iter()
            .filter_map(|i| match i {
                LayoutItem::Line(l) => Some(l.text.clone()),
                LayoutItem::Gap(_) => None,
            })
            .collect()
    }

    #[test]
    fn wrap_respects_width() {
        let lines = wrap_text("the quick brown fox jumps over the lazy dog", 10);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps over", "the lazy", "dog"]);
        assert!(lines.iter().all(|l| l.chars().count() <= 10));
    }

    #[test]
    fn wrap_splits_long_words() {
        let lines = wrap_text("abcdefghij xy", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij", "xy"]);
    }

    #[test]
    fn wrap_empty_text_yields_one_line() {
        assert_eq!(wrap_text("   ", 10), vec![String::new()]);
    }

    #[test]
    fn add_on_block_omitted_when_empty() {
        let items = build_layout(
            &proposal(vec!["a".into()], vec![], PaymentTerm::Monthly),
            &RenderOptions::default(),
            &PageGeometry::A4,
        );
        let texts = texts(&items);
        assert!(!texts.iter().any(|t| t == "Add-ons"));
        assert!(!texts.iter().any(|t| t.starts_with("Discount")));
    }

    #[test]
    fn pricing_rows_present() {
        let add_on = AddOn::new(
            "Extra Inbox",
            Money::from_whole(300),
            AddOnKind::Recurring,
        )
        .unwrap();
        let items = build_layout(
            &proposal(vec![], vec![add_on], PaymentTerm::Quarterly),
            &RenderOptions::default(),
            &PageGeometry::A4,
        );
        let rows: Vec<(String, String)> = items
            .iter()
            .filter_map(|i| match i {
                LayoutItem::Line(l) => l.amount.clone().map(|a| (l.text.clone(), a)),
                LayoutItem::Gap(_) => None,
            })
            .collect();

        assert!(rows.contains(&("Extra Inbox".into(), "$300.00/month".into())));
        assert!(rows.contains(&("Monthly investment".into(), "$4,500.00".into())));
        assert!(rows.contains(&("Payment frequency".into(), "Quarterly".into())));
        assert!(rows.contains(&("Discount (5%)".into(), "-$225.00/month".into())));
        assert!(rows.contains(&("Discounted monthly rate".into(), "$4,275.00".into())));
        assert!(rows.contains(&("First payment (3 months)".into(), "$12,825.00".into())));
    }

    #[test]
    fn header_shows_client_and_date() {
        let items = build_layout(
            &proposal(vec![], vec![], PaymentTerm::Monthly),
            &RenderOptions::default(),
            &PageGeometry::A4,
        );
        let texts = texts(&items);
        assert!(texts.contains(&"Prepared for: Jane Doe, Acme".to_string()));
        assert!(texts.contains(&"Date: January 1, 2024".to_string()));
    }

    #[test]
    fn long_proposal_spans_pages_without_losing_lines() {
        let deliverables: Vec<String> = (0..150)
            .map(|i| format!("Deliverable number {i} with a reasonably descriptive label"))
            .collect();
        let geometry = PageGeometry::A4;
        let items = build_layout(
            &proposal(deliverables.clone(), vec![], PaymentTerm::Annual),
            &RenderOptions::default(),
            &geometry,
        );
        let pages = paginate(&items, &geometry);
        assert!(pages.len() > 1);

        let placed: Vec<&str> = pages
            .iter()
            .flat_map(|p| p.lines.iter().map(|l| l.line.text.as_str()))
            .collect();
        let expected_lines = items
            .iter()
            .filter(|i| matches!(i, LayoutItem::Line(_)))
            .count();
        assert_eq!(placed.len(), expected_lines);

        for deliverable in &deliverables {
            assert!(placed.iter().any(|t| t.ends_with(deliverable.as_str())));
        }

        for page in &pages {
            for line in &page.lines {
                assert!(line.baseline_mm >= geometry.margin_bottom_mm);
                assert!(line.baseline_mm <= geometry.height_mm - geometry.margin_top_mm);
            }
        }
    }

    #[test]
    fn heading_never_ends_a_page() {
        let geometry = PageGeometry::A4;
        let mut items = Vec::new();
        for _ in 0..200 {
            items.push(LayoutItem::Line(LayoutLine {
                style: TextStyle::Heading,
                text: "H".into(),
                indent_mm: 0.0,
                amount: None,
            }));
            items.push(LayoutItem::Line(LayoutLine {
                style: TextStyle::Body,
                text: "b".into(),
                indent_mm: 0.0,
                amount: None,
            }));
        }
        let pages = paginate(&items, &geometry);
        for page in &pages {
            let last = page.lines.last().unwrap();
            assert_ne!(last.line.style, TextStyle::Heading);
        }
    }

    #[test]
    fn gaps_dropped_at_page_top() {
        let geometry = PageGeometry::A4;
        let items = vec![
            LayoutItem::Gap(50.0),
            LayoutItem::Line(LayoutLine {
                style: TextStyle::Body,
                text: "first".into(),
                indent_mm: 0.0,
                amount: None,
            }),
        ];
        let pages = paginate(&items, &geometry);
        assert_eq!(pages.len(), 1);
        let first = &pages[0].lines[0];
        assert!((first.baseline_mm - (297.0 - 20.0 - 5.5)).abs() < 0.001);
    }

    #[test]
    fn empty_layout_still_has_a_page() {
        assert_eq!(paginate(&[], &PageGeometry::A4).len(), 1);
    }
}
