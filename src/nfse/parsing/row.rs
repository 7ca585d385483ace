use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};

use super::value::{parse_brl, parse_competence, Competence, Money};
use crate::input::PeriodFilter;

pub const ISSUED_ICON_SRC: &str = "/EmissorNacional/img/tb-gerada.svg";

static ISSUED_ICON: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(&format!(r#"img[src="{}"]"#, ISSUED_ICON_SRC)).expect("issued icon selector is valid")
});
static COMPETENCE_CELL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td.td-competencia").expect("competence selector is valid"));
static VALUE_CELL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td.td-valor").expect("value selector is valid"));

/// The cells of one listing row that matter for revenue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentRow {
    pub issued: bool,
    pub competence: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NotIssued,
    MissingCompetence,
    MalformedCompetence(String),
    LaterYear(Competence),
    OtherMonth(Competence),
    MissingValue,
    MalformedValue(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Skip(SkipReason),
    /// An earlier year was reached; nothing after this row can match.
    Stop(Competence),
    Counted(Money),
}

impl DocumentRow {
    pub fn from_element(row: ElementRef<'_>) -> Self {
        let cell_text = |selector: &Selector| {
            row.select(selector)
                .next()
                .map(|td| td.text().collect::<String>().trim().to_string())
        };

        Self {
            issued: row.select(&ISSUED_ICON).next().is_some(),
            competence: cell_text(&COMPETENCE_CELL),
            value: cell_text(&VALUE_CELL),
        }
    }
}

/// Decides what a single row contributes. Listing rows are expected in
/// descending competence order, which is what makes `Stop` safe.
pub fn classify_row(row: &DocumentRow, filter: &PeriodFilter) -> RowOutcome {
    if !row.issued {
        return RowOutcome::Skip(SkipReason::NotIssued);
    }

    let competence = match row.competence.as_deref() {
        None => return RowOutcome::Skip(SkipReason::MissingCompetence),
        Some(text) => match parse_competence(text) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Skipping row with unreadable competence: {}", e);
                return RowOutcome::Skip(SkipReason::MalformedCompetence(text.to_string()));
            }
        },
    };

    if competence.year() < filter.year() {
        return RowOutcome::Stop(competence);
    }
    if competence.year() > filter.year() {
        return RowOutcome::Skip(SkipReason::LaterYear(competence));
    }
    if let Some(month) = filter.month() {
        if competence.month() != month {
            return RowOutcome::Skip(SkipReason::OtherMonth(competence));
        }
    }

    let value = match row.value.as_deref() {
        None => return RowOutcome::Skip(SkipReason::MissingValue),
        Some(text) => text,
    };
    match parse_brl(value) {
        Ok(amount) => RowOutcome::Counted(amount),
        Err(e) => {
            log::warn!("Skipping {} row with unreadable value: {}", competence, e);
            RowOutcome::Skip(SkipReason::MalformedValue(value.to_string()))
        }
    }
}
