use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use super::row::{classify_row, DocumentRow, RowOutcome, SkipReason};
use super::value::{Competence, Money};
use crate::input::PeriodFilter;

static TABLE_BODY: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tbody").expect("tbody selector is valid"));
static TABLE_ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("tr selector is valid"));
static PAGINATION: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.paginacao").expect("pagination selector is valid"));
static NEXT_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"a[title="Próxima"]"#).expect("next link selector is valid"));

/// Whether scanning may go on past the current page. Once `Stop` is
/// reached the run never resumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanFlow {
    Continue,
    Stop,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult {
    pub page_total: Money,
    pub page_count: u32,
    pub flow: ScanFlow,
    pub has_next_page: bool,
    /// Competence of the row that stopped the scan.
    pub stopped_at: Option<Competence>,
}

impl PageResult {
    fn end_of_data() -> Self {
        Self {
            page_total: Money::ZERO,
            page_count: 0,
            flow: ScanFlow::Stop,
            has_next_page: false,
            stopped_at: None,
        }
    }
}

pub fn extract_page(body: &str, filter: &PeriodFilter) -> PageResult {
    let document = Html::parse_document(body);

    let Some(tbody) = document.select(&TABLE_BODY).next() else {
        log::debug!("No document table on page");
        return PageResult::end_of_data();
    };

    let rows: Vec<_> = tbody.select(&TABLE_ROW).collect();
    if rows.is_empty() {
        log::debug!("Document table is empty");
        return PageResult::end_of_data();
    }

    let mut page_total = Money::ZERO;
    let mut page_count = 0;
    let mut flow = ScanFlow::Continue;
    let mut stopped_at = None;

    for element in rows {
        let row = DocumentRow::from_element(element);
        match classify_row(&row, filter) {
            RowOutcome::Counted(amount) => match page_total.checked_add(amount) {
                Some(total) => {
                    page_total = total;
                    page_count += 1;
                }
                None => log::warn!("Skipping row of {}: page total would overflow", amount),
            },
            RowOutcome::Stop(competence) => {
                log::info!(
                    "Found competence {} (year {}), stopping search",
                    competence,
                    competence.year()
                );
                flow = ScanFlow::Stop;
                stopped_at = Some(competence);
                break;
            }
            RowOutcome::Skip(SkipReason::NotIssued) => {}
            RowOutcome::Skip(reason) => log::trace!("Row skipped: {:?}", reason),
        }
    }

    PageResult {
        page_total,
        page_count,
        flow,
        has_next_page: has_next_page(&document),
        stopped_at,
    }
}

/// A "Próxima" link only counts when it points somewhere real.
fn has_next_page(document: &Html) -> bool {
    let Some(pagination) = document.select(&PAGINATION).next() else {
        return false;
    };
    let Some(link) = pagination.select(&NEXT_LINK).next() else {
        return false;
    };

    match link.value().attr("href").map(str::trim) {
        None | Some("") | Some("#") => false,
        Some(href) => !href.to_ascii_lowercase().contains("javascript:"),
    }
}
