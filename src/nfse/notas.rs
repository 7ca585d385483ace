use indicatif::ProgressBar;

use super::parsing::{extract_page, Money, ScanFlow};
use crate::core::types::{PageFetcher, Portal};
use crate::error::AuthError;
use crate::input::{Credentials, PeriodFilter};

/// Totals across every page visited in one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionResult {
    pub total_value: Money,
    pub total_count: u32,
    pub pages_visited: u32,
}

/// Logs in once and walks the issued-notes listing.
///
/// The session is owned by this call and dropped, cookies included, when it
/// returns.
pub async fn run<P: Portal>(
    portal: &P,
    credentials: Credentials,
    filter: &PeriodFilter,
    max_pages: u32,
    progress: Option<&ProgressBar>,
) -> Result<ExtractionResult, AuthError> {
    log::info!("Logging in...");
    if let Some(pb) = progress {
        pb.set_message("Fazendo login...");
    }
    let session = portal.authenticate(credentials).await?;
    Ok(extract_pages(&session, filter, max_pages, progress).await)
}

/// Fetches pages in order until the listing runs out, an earlier year shows
/// up, a fetch fails or `max_pages` is reached. Every stop is soft: whatever
/// was accumulated is returned.
///
/// Relies on the portal listing notes in descending competence order.
/// When a progress bar is given its message follows the page being read.
pub async fn extract_pages<F: PageFetcher + ?Sized>(
    fetcher: &F,
    filter: &PeriodFilter,
    max_pages: u32,
    progress: Option<&ProgressBar>,
) -> ExtractionResult {
    let mut result = ExtractionResult::default();
    let mut page = 1;

    log::info!("Searching issued notes for {}", filter.period_label());

    loop {
        if page > max_pages {
            log::warn!("Stopping after {} pages without reaching the end of the listing", max_pages);
            break;
        }

        log::info!("Processing page {}...", page);
        if let Some(pb) = progress {
            pb.set_message(format!(
                "Processando página {}... ({} notas até agora)",
                page, result.total_count
            ));
        }
        let response = match fetcher.fetch_page(page).await {
            Ok(response) => response,
            Err(e) => {
                log::warn!("Could not fetch page {}: {}", page, e);
                break;
            }
        };
        if !response.is_success() {
            log::warn!("Error fetching page {}. Status: {}", page, response.status);
            break;
        }

        let page_result = extract_page(&response.body, filter);
        let Some(total_value) = result.total_value.checked_add(page_result.page_total) else {
            log::warn!("Total would overflow on page {}, stopping", page);
            break;
        };
        result.total_value = total_value;
        result.total_count += page_result.page_count;
        result.pages_visited += 1;

        log::info!("{} valid notes found on page {}", page_result.page_count, page);
        if let (Some(pb), Some(competence)) = (progress, page_result.stopped_at) {
            pb.set_message(format!("Encontrou competência {}, parando busca", competence));
        }

        if page_result.flow == ScanFlow::Stop || !page_result.has_next_page {
            break;
        }
        page += 1;
    }

    log::info!("Total notes processed: {}", result.total_count);
    result
}
