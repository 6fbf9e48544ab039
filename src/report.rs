//! Printable portfolio report.
//!
//! Layout happens in page units (millimetres from the top-left corner of an
//! A4 page) and is independent of the PDF backend, so pagination can be
//! checked without producing a file.

use printpdf::{BuiltinFont, Mm, PdfDocument};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::error::ReportError;
use crate::portfolio::{compute_metrics, format_fixed, FundGroup};

pub const DEFAULT_REPORT_FILE: &str = "investment-report.pdf";
pub const TITLE: &str = "Six-Month Portfolio Performance Analysis of Mutual Funds";

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const FONT_SIZE: f32 = 16.0;

const FIRST_PAGE_CURSOR: f32 = 30.0;
const NEW_PAGE_CURSOR: f32 = 20.0;
const PAGE_BUDGET: f32 = 270.0;
const SUMMARY_SPACE: f32 = 40.0;

const HEADING_X: f32 = 14.0;
const SUMMARY_X: f32 = 20.0;
const DETAIL_X: f32 = 25.0;

#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub x: f32,
    pub y: f32,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub lines: Vec<TextLine>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    pub pages: Vec<Page>,
}

impl ReportDocument {
    /// All lines in reading order, one per row, with a marker between pages.
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        for (i, page) in self.pages.iter().enumerate() {
            if i > 0 {
                out.push_str(&format!("--- page {} ---\n", i + 1));
            }
            for line in &page.lines {
                let indent = ((line.x - HEADING_X) / 3.0).max(0.0) as usize;
                out.push_str(&" ".repeat(indent));
                out.push_str(&line.text);
                out.push('\n');
            }
        }
        out
    }
}

/// Tracks the write position and the space left on the current page.
struct PageCursor {
    pages: Vec<Page>,
    y: f32,
    available: f32,
}

impl PageCursor {
    fn new() -> Self {
        PageCursor {
            pages: vec![Page::default()],
            y: FIRST_PAGE_CURSOR,
            available: PAGE_BUDGET,
        }
    }

    fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.y = NEW_PAGE_CURSOR;
        self.available = PAGE_BUDGET;
    }

    fn text_at(&mut self, x: f32, y: f32, text: String) {
        if let Some(page) = self.pages.last_mut() {
            page.lines.push(TextLine { x, y, text });
        }
    }

    fn text(&mut self, x: f32, text: String) {
        let y = self.y;
        self.text_at(x, y, text);
    }

    /// Move down by `step`, then write.
    fn advance(&mut self, step: f32, x: f32, text: String) {
        self.y += step;
        self.text(x, text);
    }
}

fn required_space(group: &FundGroup) -> f32 {
    50.0 + group.records.len() as f32 * 30.0 + 40.0
}

/// Lay out the report for the given fund groups.
pub fn render_report(groups: &[FundGroup]) -> ReportDocument {
    let mut cursor = PageCursor::new();
    cursor.text_at(HEADING_X, 16.0, TITLE.to_string());

    for (index, group) in groups.iter().enumerate() {
        let metrics = group.metrics();
        let required = required_space(group);

        if index > 0 && cursor.y + required > cursor.available {
            cursor.new_page();
        }

        cursor.text(HEADING_X, format!("Fund {}: {}", index + 1, group.name));
        for (i, sip) in group.records.iter().enumerate() {
            cursor.advance(10.0, SUMMARY_X, format!("SIP {}:", i + 1));
            cursor.advance(8.0, DETAIL_X, format!("SIP Amount: {}", sip.get_sip_amount()));
            cursor.advance(
                8.0,
                DETAIL_X,
                format!("SIP Duration: {} months", sip.get_sip_duration()),
            );
            cursor.advance(
                8.0,
                DETAIL_X,
                format!("Current Amount: {}", sip.get_current_amount()),
            );
        }

        cursor.advance(
            10.0,
            SUMMARY_X,
            format!(
                "Total Initial Investment: {}",
                format_fixed(metrics.initial_investment)
            ),
        );
        cursor.advance(
            8.0,
            SUMMARY_X,
            format!(
                "Current Market Value: {}",
                format_fixed(metrics.current_market_value)
            ),
        );
        cursor.advance(8.0, SUMMARY_X, format!("ROI: {}%", format_fixed(metrics.roi)));
        cursor.advance(
            8.0,
            SUMMARY_X,
            format!("Annualized Return: {}%", format_fixed(metrics.annualized_return)),
        );

        cursor.y += 10.0;
        cursor.available -= required;
    }

    let overall = compute_metrics(groups.iter().flat_map(|g| g.records.iter().copied()));

    if cursor.y + SUMMARY_SPACE > cursor.available {
        cursor.new_page();
    }

    cursor.text(HEADING_X, "Overall Portfolio Analysis".to_string());
    cursor.advance(
        10.0,
        SUMMARY_X,
        format!(
            "Total Initial Investment: {}",
            format_fixed(overall.initial_investment)
        ),
    );
    cursor.advance(
        8.0,
        SUMMARY_X,
        format!(
            "Total Current Market Value: {}",
            format_fixed(overall.current_market_value)
        ),
    );
    cursor.advance(8.0, SUMMARY_X, format!("Overall ROI: {}%", format_fixed(overall.roi)));
    cursor.advance(
        8.0,
        SUMMARY_X,
        format!("Annualized Return: {}%", format_fixed(overall.annualized_return)),
    );

    ReportDocument {
        pages: cursor.pages,
    }
}

/// Write the document as an A4 PDF.
pub fn write_pdf(document: &ReportDocument, path: &Path) -> Result<(), ReportError> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(TITLE, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ReportError::Pdf(e.to_string()))?;

    for (i, page) in document.pages.iter().enumerate() {
        let (page_index, layer_index) = if i == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), format!("Page {}", i + 1))
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);
        for line in &page.lines {
            // PDF measures y from the bottom edge
            layer.use_text(
                line.text.as_str(),
                FONT_SIZE,
                Mm(line.x),
                Mm(PAGE_HEIGHT - line.y),
                &font,
            );
        }
    }

    let mut writer = BufWriter::new(File::create(path)?);
    doc.save(&mut writer)
        .map_err(|e| ReportError::Pdf(e.to_string()))?;
    tracing::info!(
        "Wrote {} page report to {}",
        document.pages.len(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::group_by_fund;
    use crate::record::InvestmentRecord;

    fn sip(name: &str) -> InvestmentRecord {
        InvestmentRecord::new(name, "1000", "6", "6500", "2024-01-01")
    }

    fn texts(page: &Page) -> Vec<&str> {
        page.lines.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn test_single_fund_layout() {
        let records = vec![sip("A")];
        let doc = render_report(&group_by_fund(&records));
        assert_eq!(doc.pages.len(), 1);
        let page = &doc.pages[0];
        assert_eq!(
            texts(page),
            vec![
                TITLE,
                "Fund 1: A",
                "SIP 1:",
                "SIP Amount: 1000",
                "SIP Duration: 6 months",
                "Current Amount: 6500",
                "Total Initial Investment: 6000.00",
                "Current Market Value: 6500.00",
                "ROI: 8.33%",
                "Annualized Return: 161.30%",
                "Overall Portfolio Analysis",
                "Total Initial Investment: 6000.00",
                "Total Current Market Value: 6500.00",
                "Overall ROI: 8.33%",
                "Annualized Return: 161.30%",
            ]
        );
        let ys: Vec<f32> = page.lines.iter().map(|l| l.y).collect();
        assert_eq!(
            ys,
            vec![
                16.0, 30.0, 40.0, 48.0, 56.0, 64.0, 74.0, 82.0, 90.0, 98.0, 108.0, 118.0,
                126.0, 134.0, 142.0
            ]
        );
        assert_eq!(page.lines[1].x, 14.0);
        assert_eq!(page.lines[2].x, 20.0);
        assert_eq!(page.lines[3].x, 25.0);
    }

    #[test]
    fn test_two_sips_in_one_fund() {
        let records = vec![sip("A"), sip("A")];
        let doc = render_report(&group_by_fund(&records));
        let first = texts(&doc.pages[0]);
        assert!(first.contains(&"SIP 2:"));
        assert!(first.contains(&"Total Initial Investment: 12000.00"));
        assert!(first.contains(&"ROI: 8.33%"));
        assert!(first.contains(&"Annualized Return: 61.65%"));
        // cursor ends at 142 with 120 left, so the summary moves on
        assert_eq!(doc.pages.len(), 2);
        assert_eq!(doc.pages[1].lines[0].text, "Overall Portfolio Analysis");
    }

    #[test]
    fn test_second_fund_starts_new_page_when_space_runs_out() {
        let records = vec![sip("A"), sip("B")];
        let doc = render_report(&group_by_fund(&records));
        // first fund ends at 108 with 150 left; second needs 120
        assert_eq!(doc.pages.len(), 2);
        let second = &doc.pages[1];
        assert_eq!(second.lines[0].text, "Fund 2: B");
        assert_eq!(second.lines[0].y, 20.0);
    }

    #[test]
    fn test_first_fund_never_breaks_page() {
        let records: Vec<_> = (0..12).map(|_| sip("Large")).collect();
        let doc = render_report(&group_by_fund(&records));
        assert_eq!(doc.pages[0].lines[1].text, "Fund 1: Large");
        assert_eq!(doc.pages[0].lines[1].y, 30.0);
    }

    #[test]
    fn test_summary_moves_to_new_page_when_budget_is_spent() {
        let records: Vec<_> = (0..3).map(|_| sip("A")).collect();
        let doc = render_report(&group_by_fund(&records));
        // cursor ends at 176, budget 270 - 180 = 90
        assert_eq!(doc.pages.len(), 2);
        let summary = &doc.pages[1];
        assert_eq!(summary.lines[0].text, "Overall Portfolio Analysis");
        assert_eq!(summary.lines[0].y, 20.0);
        assert_eq!(summary.lines[1].y, 30.0);
    }

    #[test]
    fn test_many_funds_reset_cursor_on_every_page() {
        let names = ["A", "B", "C", "D", "E"];
        let records: Vec<_> = names.iter().map(|n| sip(n)).collect();
        let doc = render_report(&group_by_fund(&records));
        assert!(doc.pages.len() > 1);
        for page in doc.pages.iter().skip(1) {
            assert_eq!(page.lines[0].y, 20.0);
        }
        let headers: usize = doc
            .pages
            .iter()
            .flat_map(|p| p.lines.iter())
            .filter(|l| l.text.starts_with("Fund "))
            .count();
        assert_eq!(headers, names.len());
    }

    #[test]
    fn test_empty_portfolio_renders_non_numeric_return() {
        let doc = render_report(&[]);
        assert_eq!(doc.pages.len(), 1);
        let page = texts(&doc.pages[0]);
        assert_eq!(page[1], "Overall Portfolio Analysis");
        assert_eq!(page[1 + 3], "Overall ROI: 0.00%");
        assert_eq!(page[1 + 4], "Annualized Return: NaN%");
    }

    #[test]
    fn test_raw_text_is_printed_as_stored() {
        let records = vec![InvestmentRecord::new("A", "1k", "6", "6500", "2024-01-01")];
        let doc = render_report(&group_by_fund(&records));
        let page = texts(&doc.pages[0]);
        assert!(page.contains(&"SIP Amount: 1k"));
        assert!(page.contains(&"Total Initial Investment: 0.00"));
        assert!(page.contains(&"Annualized Return: Infinity%"));
    }

    #[test]
    fn test_amounts_round_halves_up() {
        let records = vec![InvestmentRecord::new("A", "1000.125", "1", "1000.125", "2024-01-01")];
        let doc = render_report(&group_by_fund(&records));
        let lines = texts(&doc.pages[0]);
        assert!(lines.contains(&"Total Initial Investment: 1000.13"));
        assert!(lines.contains(&"Current Market Value: 1000.13"));
        assert!(lines.contains(&"Total Current Market Value: 1000.13"));
    }

    #[test]
    fn test_plain_text_marks_pages() {
        let records = vec![sip("A"), sip("B")];
        let text = render_report(&group_by_fund(&records)).to_plain_text();
        assert!(text.starts_with(TITLE));
        assert!(text.contains("--- page 2 ---\nFund 2: B"));
        assert!(text.contains("\n  SIP 1:\n"));
    }

    #[test]
    fn test_write_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_REPORT_FILE);
        let records = vec![sip("A"), sip("B"), sip("C")];
        let doc = render_report(&group_by_fund(&records));
        write_pdf(&doc, &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
