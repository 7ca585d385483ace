pub mod page;
pub mod row;
pub mod value;

pub use page::{extract_page, PageResult, ScanFlow};
pub use row::{classify_row, DocumentRow, RowOutcome, SkipReason};
pub use value::{parse_brl, parse_competence, Competence, CompetenceError, Money, ValueError};
