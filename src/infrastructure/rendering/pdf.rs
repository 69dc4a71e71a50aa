//! # PDF Renderer
//!
//! [`DocumentRenderer`] backed by `printpdf`, using the builtin Helvetica
//! faces so no font files ship with the binary.
//!
//! Output is byte-for-byte reproducible for a given proposal: the document
//! id and all dates come from the proposal, XMP metadata is disabled, and
//! the trailer `/ID` entry (which the encoder fills with a random instance
//! id) is overwritten with characters derived from the proposal id.
//!
//! The builtin faces use WinAnsiEncoding, so only Latin-1 text renders as
//! written. Characters outside it (Cyrillic, CJK, emoji) are printed as `?`
//! by [`sanitize_text`]; a company name like `Москва` appears as `??????`.

use crate::domain::entities::proposal::PricedProposal;
use crate::infrastructure::rendering::error::{RenderError, RenderResult};
use crate::infrastructure::rendering::layout::{
    PageGeometry, PageLayout, RenderOptions, TextStyle, build_layout, paginate,
};
use crate::infrastructure::rendering::traits::{
    DocumentRenderer, RenderedDocument, proposal_filename,
};
use printpdf::{
    BuiltinFont, CustomPdfConformance, IndirectFontRef, Mm, OffsetDateTime, PdfConformance,
    PdfDocument, PdfDocumentReference, PdfLayerReference,
};
use tracing::debug;

/// Renders proposals as A4 PDF documents.
///
/// Text is limited to Latin-1; see [`sanitize_text`].
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    options: RenderOptions,
    geometry: PageGeometry,
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Fonts {
    fn for_style(&self, style: TextStyle) -> &IndirectFontRef {
        if style.is_bold() { &self.bold } else { &self.regular }
    }
}

impl PdfRenderer {
    /// Creates a renderer with the given issuer details.
    #[must_use]
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            geometry: PageGeometry::A4,
        }
    }

    /// Returns the issuer details.
    #[must_use]
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    fn new_document(
        &self,
        proposal: &PricedProposal,
    ) -> RenderResult<(PdfDocumentReference, PdfLayerReference)> {
        let title = format!(
            "Service Proposal {} - {}",
            proposal.id().reference(),
            sanitize_text(proposal.company())
        );
        let (doc, page, layer) = PdfDocument::new(
            title,
            Mm(self.geometry.width_mm),
            Mm(self.geometry.height_mm),
            "Page 1",
        );

        let generated = OffsetDateTime::from_unix_timestamp(proposal.generated_at().timestamp_secs())
            .map_err(|e| RenderError::metadata(e.to_string()))?;

        let conformance = PdfConformance::Custom(CustomPdfConformance {
            requires_icc_profile: false,
            requires_xmp_metadata: false,
            ..Default::default()
        });

        let doc = doc
            .with_conformance(conformance)
            .with_document_id(proposal.id().as_uuid().simple().to_string())
            .with_creation_date(generated)
            .with_mod_date(generated)
            .with_metadata_date(generated);
        let first_layer = doc.get_page(page).get_layer(layer);
        Ok((doc, first_layer))
    }

    fn draw_page(&self, layer: &PdfLayerReference, page: &PageLayout, fonts: &Fonts) {
        for placed in &page.lines {
            let style = placed.line.style;
            let font = fonts.for_style(style);
            let size = style.font_size_pt();
            if !placed.line.text.is_empty() {
                layer.use_text(
                    sanitize_text(&placed.line.text),
                    size,
                    Mm(placed.x_mm),
                    Mm(placed.baseline_mm),
                    font,
                );
            }
            if let Some(amount) = &placed.line.amount {
                layer.use_text(
                    sanitize_text(amount),
                    size,
                    Mm(self.geometry.amount_column_mm),
                    Mm(placed.baseline_mm),
                    font,
                );
            }
        }
    }

    fn draw_footer(&self, layer: &PdfLayerReference, number: usize, total: usize, fonts: &Fonts) {
        let style = TextStyle::Small;
        let baseline = self.geometry.margin_bottom_mm / 2.0;
        layer.use_text(
            sanitize_text(&self.options.issuer_name),
            style.font_size_pt(),
            Mm(self.geometry.margin_left_mm),
            Mm(baseline),
            &fonts.regular,
        );
        layer.use_text(
            format!("Page {} of {}", number, total),
            style.font_size_pt(),
            Mm(self.geometry.width_mm - self.geometry.margin_right_mm - 20.0),
            Mm(baseline),
            &fonts.regular,
        );
    }
}

impl DocumentRenderer for PdfRenderer {
    fn render(&self, proposal: &PricedProposal) -> RenderResult<RenderedDocument> {
        let items = build_layout(proposal, &self.options, &self.geometry);
        let pages = paginate(&items, &self.geometry);

        let (doc, first_layer) = self.new_document(proposal)?;
        let fonts = Fonts {
            regular: doc
                .add_builtin_font(BuiltinFont::Helvetica)
                .map_err(|e| RenderError::font(e.to_string()))?,
            bold: doc
                .add_builtin_font(BuiltinFont::HelveticaBold)
                .map_err(|e| RenderError::font(e.to_string()))?,
        };

        let total = pages.len();
        let mut layers = vec![first_layer];
        for number in 2..=total {
            let (page, layer) = doc.add_page(
                Mm(self.geometry.width_mm),
                Mm(self.geometry.height_mm),
                format!("Page {}", number),
            );
            layers.push(doc.get_page(page).get_layer(layer));
        }

        for (index, (page, layer)) in pages.iter().zip(&layers).enumerate() {
            self.draw_page(layer, page, &fonts);
            self.draw_footer(layer, index + 1, total, &fonts);
        }

        let mut bytes = doc
            .save_to_bytes()
            .map_err(|e| RenderError::encoding(e.to_string()))?;
        pin_trailer_id(&mut bytes, &proposal.id().as_uuid().simple().to_string());

        debug!(
            proposal = %proposal.id(),
            pages = total,
            size = bytes.len(),
            "Rendered proposal PDF"
        );

        Ok(RenderedDocument::pdf(
            proposal_filename(proposal.company()),
            bytes,
        ))
    }
}

/// Maps text onto what the builtin fonts can encode.
///
/// Typographic punctuation becomes its ASCII form; other characters outside
/// Latin-1 become `?`.
#[must_use]
pub fn sanitize_text(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2013}' | '\u{2014}' => '-',
            '\u{2022}' => '-',
            '\u{00A0}' => ' ',
            c if c.is_control() => ' ',
            c if (c as u32) <= 0xFF => c,
            _ => '?',
        })
        .collect()
}

/// Overwrites the literal strings of the last `/ID` array in place.
///
/// Lengths are preserved so cross-reference offsets stay valid.
fn pin_trailer_id(bytes: &mut [u8], seed: &str) {
    let Some(start) = find_last(bytes, b"/ID") else {
        return;
    };
    let seed = if seed.is_empty() { "0" } else { seed };
    let mut fill = seed.bytes().cycle();
    let mut inside = false;

    for byte in bytes.iter_mut().skip(start + 3) {
        match *byte {
            b']' if !inside => break,
            b'(' if !inside => inside = true,
            b')' if inside => inside = false,
            b'<' if !inside => inside = true,
            b'>' if inside => inside = false,
            _ if inside => {
                if let Some(next) = fill.next() {
                    *byte = next;
                }
            }
            _ => {}
        }
    }
}

fn find_last(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .rposition(|window| window == needle)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::package::{AddOn, AddOnKind, Package};
    use crate::domain::entities::selection::SelectionRequest;
    use crate::domain::services::pricing::PricingEngine;
    use crate::domain::value_objects::{EmailAddress, Money, PackageId, PaymentTerm, Timestamp};

    fn proposal(deliverables: usize) -> PricedProposal {
        proposal_for("Acme Corp", deliverables)
    }

    fn proposal_for(company: &str, deliverables: usize) -> PricedProposal {
        let package = Package::new(PackageId::new("growth"), "Growth", Money::from_whole(4200))
            .unwrap()
            .with_deliverables(
                (0..deliverables).map(|i| format!("{} targeted outreach emails, batch {i}", 100 + i)),
            );
        let selection = SelectionRequest::new(
            EmailAddress::parse("client@example.com").unwrap(),
            package,
            vec![AddOn::new("Extra Inbox", Money::from_whole(300), AddOnKind::Recurring).unwrap()],
            PaymentTerm::Quarterly,
            Some("Jane Doe"),
            Some(company),
        );
        PricingEngine::new().price_at(&selection, Timestamp::from_secs(1_704_067_200).unwrap())
    }

    #[test]
    fn renders_pdf_document() {
        let doc = PdfRenderer::new(RenderOptions::default())
            .render(&proposal(4))
            .unwrap();
        assert!(doc.bytes().starts_with(b"%PDF"));
        assert_eq!(doc.filename(), "Acme-Corp-Proposal.pdf");
        assert_eq!(doc.content_type(), "application/pdf");
    }

    #[test]
    fn rendering_is_deterministic() {
        let renderer = PdfRenderer::new(RenderOptions::default());
        let proposal = proposal(4);
        let first = renderer.render(&proposal).unwrap();
        let second = renderer.render(&proposal).unwrap();
        assert_eq!(first.bytes(), second.bytes());
    }

    #[test]
    fn long_proposals_render() {
        let renderer = PdfRenderer::new(RenderOptions::default());
        let short = renderer.render(&proposal(2)).unwrap();
        let long = renderer.render(&proposal(200)).unwrap();
        assert!(long.len() > short.len());
    }

    #[test]
    fn sanitize_maps_typographic_punctuation() {
        assert_eq!(sanitize_text("O\u{2019}Brien \u{2013} \u{201C}VIP\u{201D}"), "O'Brien - \"VIP\"");
        assert_eq!(sanitize_text("Zürich"), "Zürich");
        assert_eq!(sanitize_text("東京"), "??");
        assert_eq!(sanitize_text("a\tb"), "a b");
    }

    #[test]
    fn text_outside_latin1_becomes_placeholders() {
        assert_eq!(sanitize_text("Москва"), "??????");
        assert_eq!(sanitize_text("東京 Labs"), "?? Labs");
        assert_eq!(sanitize_text("Café 🚀"), "Café ?");
    }

    #[test]
    fn non_latin_company_still_renders() {
        let doc = PdfRenderer::new(RenderOptions::default())
            .render(&proposal_for("東京 Labs", 2))
            .unwrap();
        assert!(doc.bytes().starts_with(b"%PDF"));
        assert_eq!(doc.filename(), "Labs-Proposal.pdf");
    }

    #[test]
    fn trailer_id_is_rewritten_in_place() {
        let mut bytes = b"trailer<</Size 3/ID[(abcd)(wxyz)]>>\nstartxref".to_vec();
        let len = bytes.len();
        pin_trailer_id(&mut bytes, "12");
        assert_eq!(bytes.len(), len);
        assert_eq!(
            bytes,
            b"trailer<</Size 3/ID[(1212)(1212)]>>\nstartxref".to_vec()
        );
    }

    #[test]
    fn trailer_without_id_is_untouched() {
        let mut bytes = b"trailer<</Size 3>>".to_vec();
        pin_trailer_id(&mut bytes, "12");
        assert_eq!(bytes, b"trailer<</Size 3>>".to_vec());
    }
}
