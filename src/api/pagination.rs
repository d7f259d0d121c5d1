//! Page collection for paginated endpoints.

use super::response::ApiResponse;
use crate::config::LabelConfig;
use crate::constants::{DEFAULT_PAGE_SIZE, HOUSEHOLD_PAGE_SIZE};
use crate::error::Result;
use serde_json::Value;
use std::future::Future;
use tracing::{debug, info};

/// Anything that can fetch one page of an endpoint, starting at page 1
pub trait PageSource {
    fn fetch_page(
        &self,
        page: usize,
        page_size: usize,
    ) -> impl Future<Output = Result<ApiResponse>> + Send;
}

/// When to stop requesting pages of a paged response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopRule {
    /// Stop once the collected item count reaches `total_items`
    ItemCount,
    /// Stop once `page * page_size` reaches `total_items`
    PageSize,
}

impl StopRule {
    /// Page size used when the configuration does not set one
    ///
    /// Household survey endpoints stop by item count and serve smaller
    /// pages than the price and exchange-rate endpoints.
    pub fn default_page_size(&self) -> usize {
        match self {
            StopRule::ItemCount => HOUSEHOLD_PAGE_SIZE,
            StopRule::PageSize => DEFAULT_PAGE_SIZE,
        }
    }

    /// Page size for a request under `config`
    pub fn page_size(&self, config: &LabelConfig) -> usize {
        config.page_size.unwrap_or_else(|| self.default_page_size())
    }

    fn is_done(
        &self,
        page: usize,
        page_size: usize,
        collected: usize,
        total_items: usize,
    ) -> bool {
        match self {
            StopRule::ItemCount => collected >= total_items,
            StopRule::PageSize => page.saturating_mul(page_size) >= total_items,
        }
    }
}

/// Fetch pages until the stop rule is met and return every record in order
///
/// Pages are requested with the configured page size (or the rule's
/// default) and `config.page_delay()` is slept between requests. An empty
/// page always ends the loop. A response that is not paged is taken as the
/// complete result.
pub async fn collect_pages<S: PageSource>(
    source: &S,
    rule: StopRule,
    config: &LabelConfig,
) -> Result<Vec<Value>> {
    config.validate()?;
    let page_size = rule.page_size(config);
    let delay = config.page_delay();

    let mut collected = Vec::new();
    let mut page = 0;

    loop {
        page += 1;
        let response = source.fetch_page(page, page_size).await?;

        let (items, total_items) = match response {
            ApiResponse::Paged { items, total_items } => (items, total_items),
            other => {
                debug!("Page {} is not paged, taking it as the full result", page);
                collected.extend(other.into_items());
                break;
            }
        };

        info!("Fetching page {}: {} items", page, items.len());
        if items.is_empty() {
            break;
        }
        collected.extend(items);

        if rule.is_done(page, page_size, collected.len(), total_items) {
            break;
        }
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    debug!("Collected {} items over {} pages", collected.len(), page);
    Ok(collected)
}
