//! Operation history: response normalization, client-side pagination, and
//! usage statistics.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::operation::Operation;
use crate::timestamp;

/// Placeholder shown when the history is empty.
pub const EMPTY_PLACEHOLDER: &str = "Nenhuma operação realizada ainda.";

/// Items per page for the profile-screen history view.
pub const PAGE_SIZE: usize = 10;

/// The two shapes the list endpoint is known to answer with: a bare array,
/// or an envelope with a `results` field. Normalized here, at the boundary,
/// and never branched on downstream.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OperationsPayload {
    Paginated { results: Vec<Operation> },
    Plain(Vec<Operation>),
}

impl OperationsPayload {
    /// Collapses both shapes into the underlying list.
    pub fn into_operations(self) -> Vec<Operation> {
        match self {
            OperationsPayload::Paginated { results } => results,
            OperationsPayload::Plain(operations) => operations,
        }
    }
}

/// Client-side pagination cursor over a fully fetched list.
///
/// The page index lives in `[1, total_pages]`; out-of-range navigation
/// requests are ignored rather than clamped into effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    current_page: usize,
    total_pages: usize,
    page_size: usize,
}

impl Pager {
    /// Creates a pager for a list of `len` items.
    pub fn new(len: usize, page_size: usize) -> Self {
        Self {
            current_page: 1,
            total_pages: len.div_ceil(page_size),
            page_size,
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// True when there is more than one page to show controls for.
    pub fn has_multiple_pages(&self) -> bool {
        self.total_pages > 1
    }

    /// Moves to `page` if it is in range; out-of-range requests are ignored.
    pub fn set_page(&mut self, page: usize) {
        if page >= 1 && page <= self.total_pages {
            self.current_page = page;
        }
    }

    /// Moves forward one page, if there is one.
    pub fn next(&mut self) {
        self.set_page(self.current_page + 1);
    }

    /// Moves back one page, if there is one.
    pub fn prev(&mut self) {
        if self.current_page > 1 {
            self.set_page(self.current_page - 1);
        }
    }

    /// Recomputes the page count after a refetch, keeping the current page
    /// in range.
    pub fn refresh(&mut self, len: usize) {
        self.total_pages = len.div_ceil(self.page_size);
        if self.current_page > self.total_pages {
            self.current_page = self.total_pages.max(1);
        }
    }

    /// Slices the in-memory list down to the current page.
    pub fn page_slice<'a>(&self, items: &'a [Operation]) -> &'a [Operation] {
        let start = (self.current_page - 1) * self.page_size;
        let end = (start + self.page_size).min(items.len());
        if start >= items.len() {
            &[]
        } else {
            &items[start..end]
        }
    }

    /// The `Página X de Y` status line.
    pub fn status_line(&self) -> String {
        format!("Página {} de {}", self.current_page, self.total_pages)
    }
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(0, PAGE_SIZE)
    }
}

/// Usage counts computed client-side over the fetched operation list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistoryStats {
    pub total: usize,
    pub today: usize,
    pub last_week: usize,
}

impl HistoryStats {
    /// Counts total, same-day, and trailing-7-day operations.
    ///
    /// `now` is passed in so the computation stays pure. Entries without a
    /// parseable timestamp count toward the total only.
    pub fn compute(operations: &[Operation], now: DateTime<Utc>) -> Self {
        let week_ago = now - chrono::Duration::days(7);
        let mut stats = Self {
            total: operations.len(),
            ..Self::default()
        };

        for op in operations {
            let Some(recorded) = op.recorded_at.as_deref().and_then(timestamp::parse) else {
                continue;
            };
            let recorded = recorded.with_timezone(&Utc);

            if recorded.date_naive() == now.date_naive() {
                stats.today += 1;
            }
            if recorded >= week_ago {
                stats.last_week += 1;
            }
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(expression: &str, recorded_at: Option<&str>) -> Operation {
        Operation {
            id: None,
            expression: expression.to_string(),
            result: "1".to_string(),
            recorded_at: recorded_at.map(str::to_string),
        }
    }

    fn ops(n: usize) -> Vec<Operation> {
        (0..n).map(|i| op(&format!("{i}+1"), None)).collect()
    }

    #[test]
    fn test_payload_shapes_normalize_identically() {
        let plain = r#"[{"operacao": "2+2", "resultado": "4"}]"#;
        let paginated = r#"{"count": 1, "results": [{"operacao": "2+2", "resultado": "4"}]}"#;

        let from_plain: OperationsPayload = serde_json::from_str(plain).unwrap();
        let from_paginated: OperationsPayload = serde_json::from_str(paginated).unwrap();

        assert_eq!(
            from_plain.into_operations(),
            from_paginated.into_operations()
        );
    }

    #[test]
    fn test_payload_rejects_non_list_shapes() {
        let bogus = r#"{"detail": "unexpected"}"#;
        assert!(serde_json::from_str::<OperationsPayload>(bogus).is_err());
    }

    #[test]
    fn test_pager_25_items_yield_3_pages() {
        let mut pager = Pager::new(25, PAGE_SIZE);
        assert_eq!(pager.total_pages(), 3);

        pager.set_page(3);
        assert_eq!(pager.current_page(), 3);

        // Out-of-range navigation is ignored.
        pager.set_page(4);
        assert_eq!(pager.current_page(), 3);
        pager.next();
        assert_eq!(pager.current_page(), 3);
    }

    #[test]
    fn test_pager_slices_current_page() {
        let items = ops(25);
        let mut pager = Pager::new(items.len(), PAGE_SIZE);

        assert_eq!(pager.page_slice(&items).len(), 10);

        pager.set_page(3);
        let last = pager.page_slice(&items);
        assert_eq!(last.len(), 5);
        assert_eq!(last[0].expression, "20+1");
    }

    #[test]
    fn test_pager_refresh_clamps_current_page() {
        let mut pager = Pager::new(25, PAGE_SIZE);
        pager.set_page(3);

        pager.refresh(5);
        assert_eq!(pager.total_pages(), 1);
        assert_eq!(pager.current_page(), 1);

        pager.refresh(0);
        assert_eq!(pager.total_pages(), 0);
        assert_eq!(pager.current_page(), 1);
    }

    #[test]
    fn test_stats_counts_today_and_week() {
        let now = "2024-06-15T12:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let operations = vec![
            op("1+1", Some("2024-06-15T08:00:00Z")), // today
            op("2+2", Some("2024-06-12T08:00:00Z")), // this week
            op("3+3", Some("2024-05-01T08:00:00Z")), // older
            op("4+4", None),                         // no timestamp
        ];

        let stats = HistoryStats::compute(&operations, now);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.today, 1);
        assert_eq!(stats.last_week, 2);
    }
}
