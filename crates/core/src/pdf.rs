//! Invoice PDF rendering.
//!
//! Single A4 page: header, client block, line-item table, totals. Page
//! coordinates are f32 millimeters, so float lints are relaxed for this
//! module only; money values stay `Decimal` until formatted.
#![allow(clippy::float_arithmetic)]

use chrono::NaiveDate;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Point};
use rust_decimal::Decimal;
use thiserror::Error;

/// PDF rendering errors.
#[derive(Debug, Error)]
pub enum PdfError {
    /// The underlying PDF library failed.
    #[error("PDF rendering failed: {0}")]
    Render(String),
}

/// A line item row on the rendered invoice.
#[derive(Debug, Clone)]
pub struct PdfLineItem {
    /// Item description.
    pub description: String,
    /// Quantity.
    pub quantity: Decimal,
    /// Unit price.
    pub unit_price: Decimal,
    /// Line total.
    pub line_total: Decimal,
}

/// Everything the renderer needs, already tenant-scoped by the caller.
#[derive(Debug, Clone)]
pub struct InvoicePdf {
    /// Invoice number.
    pub number: String,
    /// Issuing organization name.
    pub organization_name: String,
    /// Client display name.
    pub client_name: String,
    /// Client company, if any.
    pub client_company: Option<String>,
    /// Client email, if any.
    pub client_email: Option<String>,
    /// Issue date.
    pub issue_date: Option<NaiveDate>,
    /// Due date.
    pub due_date: Option<NaiveDate>,
    /// Currency code.
    pub currency: String,
    /// Line items.
    pub line_items: Vec<PdfLineItem>,
    /// Subtotal.
    pub subtotal: Decimal,
    /// Tax.
    pub tax: Decimal,
    /// Discount.
    pub discount: Decimal,
    /// Total.
    pub total: Decimal,
    /// Amount paid so far.
    pub amount_paid: Decimal,
    /// Free-form notes.
    pub notes: Option<String>,
}

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;

/// Renders the invoice as PDF bytes.
///
/// # Errors
///
/// Returns `PdfError::Render` if font loading or serialization fails.
pub fn render_invoice(invoice: &InvoicePdf) -> Result<Vec<u8>, PdfError> {
    let title = format!("Invoice {}", invoice.number);
    let (doc, page, layer) =
        PdfDocument::new(&title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
    let layer = doc.get_page(page).get_layer(layer);

    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| PdfError::Render(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| PdfError::Render(e.to_string()))?;

    let mut y = PAGE_HEIGHT_MM - MARGIN_MM;

    layer.use_text("INVOICE", 22.0, Mm(MARGIN_MM), Mm(y), &bold);
    layer.use_text(
        &invoice.organization_name,
        11.0,
        Mm(PAGE_WIDTH_MM - MARGIN_MM - 70.0),
        Mm(y),
        &font,
    );
    y -= 8.0;
    layer.use_text(
        format!("Invoice #: {}", invoice.number),
        10.0,
        Mm(MARGIN_MM),
        Mm(y),
        &font,
    );
    y -= 5.0;
    if let Some(issued) = invoice.issue_date {
        layer.use_text(
            format!("Issue date: {issued}"),
            10.0,
            Mm(MARGIN_MM),
            Mm(y),
            &font,
        );
        y -= 5.0;
    }
    if let Some(due) = invoice.due_date {
        layer.use_text(format!("Due date: {due}"), 10.0, Mm(MARGIN_MM), Mm(y), &font);
        y -= 5.0;
    }

    y -= 6.0;
    layer.use_text("Bill to:", 10.0, Mm(MARGIN_MM), Mm(y), &bold);
    y -= 5.0;
    layer.use_text(&invoice.client_name, 10.0, Mm(MARGIN_MM), Mm(y), &font);
    y -= 5.0;
    if let Some(company) = &invoice.client_company {
        layer.use_text(company, 10.0, Mm(MARGIN_MM), Mm(y), &font);
        y -= 5.0;
    }
    if let Some(email) = &invoice.client_email {
        layer.use_text(email, 10.0, Mm(MARGIN_MM), Mm(y), &font);
        y -= 5.0;
    }

    y -= 8.0;
    draw_rule(&layer, MARGIN_MM, PAGE_WIDTH_MM - MARGIN_MM, y + 2.0);
    layer.use_text("Description", 10.0, Mm(MARGIN_MM), Mm(y - 3.0), &bold);
    layer.use_text("Qty", 10.0, Mm(115.0), Mm(y - 3.0), &bold);
    layer.use_text("Unit", 10.0, Mm(135.0), Mm(y - 3.0), &bold);
    layer.use_text("Amount", 10.0, Mm(165.0), Mm(y - 3.0), &bold);
    y -= 8.0;
    draw_rule(&layer, MARGIN_MM, PAGE_WIDTH_MM - MARGIN_MM, y + 1.0);

    for item in &invoice.line_items {
        y -= 6.0;
        if y < MARGIN_MM + 40.0 {
            // One page only; remaining items are summarized in the totals.
            layer.use_text("...", 10.0, Mm(MARGIN_MM), Mm(y), &font);
            break;
        }
        layer.use_text(&item.description, 10.0, Mm(MARGIN_MM), Mm(y), &font);
        layer.use_text(money(item.quantity), 10.0, Mm(115.0), Mm(y), &font);
        layer.use_text(money(item.unit_price), 10.0, Mm(135.0), Mm(y), &font);
        layer.use_text(money(item.line_total), 10.0, Mm(165.0), Mm(y), &font);
    }

    y -= 10.0;
    draw_rule(&layer, 115.0, PAGE_WIDTH_MM - MARGIN_MM, y + 4.0);
    let mut totals_row = |label: &str, value: Decimal, font: &IndirectFontRef| {
        layer.use_text(label, 10.0, Mm(115.0), Mm(y), font);
        layer.use_text(
            format!("{} {}", invoice.currency, money(value)),
            10.0,
            Mm(160.0),
            Mm(y),
            font,
        );
        y -= 5.0;
    };
    totals_row("Subtotal", invoice.subtotal, &font);
    if !invoice.discount.is_zero() {
        totals_row("Discount", invoice.discount, &font);
    }
    if !invoice.tax.is_zero() {
        totals_row("Tax", invoice.tax, &font);
    }
    totals_row("Total", invoice.total, &bold);
    if !invoice.amount_paid.is_zero() {
        totals_row("Paid", invoice.amount_paid, &font);
        totals_row("Amount due", invoice.total - invoice.amount_paid, &bold);
    }

    if let Some(notes) = &invoice.notes {
        y -= 8.0;
        layer.use_text("Notes", 10.0, Mm(MARGIN_MM), Mm(y), &bold);
        y -= 5.0;
        layer.use_text(notes, 9.0, Mm(MARGIN_MM), Mm(y), &font);
    }

    doc.save_to_bytes().map_err(|e| PdfError::Render(e.to_string()))
}

fn money(value: Decimal) -> String {
    value.round_dp(2).to_string()
}

fn draw_rule(layer: &PdfLayerReference, x1: f32, x2: f32, y: f32) {
    layer.add_line(printpdf::Line {
        points: vec![
            (Point::new(Mm(x1), Mm(y)), false),
            (Point::new(Mm(x2), Mm(y)), false),
        ],
        is_closed: false,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample() -> InvoicePdf {
        InvoicePdf {
            number: "INV-001".to_string(),
            organization_name: "Acme LLC".to_string(),
            client_name: "Ada Lovelace".to_string(),
            client_company: Some("Analytical Engines".to_string()),
            client_email: Some("ada@example.com".to_string()),
            issue_date: NaiveDate::from_ymd_opt(2025, 3, 1),
            due_date: NaiveDate::from_ymd_opt(2025, 3, 31),
            currency: "USD".to_string(),
            line_items: vec![
                PdfLineItem {
                    description: "Consulting".to_string(),
                    quantity: dec!(2),
                    unit_price: dec!(100),
                    line_total: dec!(200),
                },
                PdfLineItem {
                    description: "Support".to_string(),
                    quantity: dec!(1),
                    unit_price: dec!(50),
                    line_total: dec!(50),
                },
            ],
            subtotal: dec!(250),
            tax: dec!(0),
            discount: dec!(0),
            total: dec!(250),
            amount_paid: dec!(0),
            notes: Some("Thank you".to_string()),
        }
    }

    #[test]
    fn test_render_produces_pdf_bytes() {
        let bytes = render_invoice(&sample()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn test_render_without_optional_fields() {
        let mut invoice = sample();
        invoice.client_company = None;
        invoice.client_email = None;
        invoice.issue_date = None;
        invoice.due_date = None;
        invoice.notes = None;
        invoice.line_items.clear();
        assert!(render_invoice(&invoice).is_ok());
    }
}
