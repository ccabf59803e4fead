//! History list controller.
//!
//! Fetches the full operation list (normalized from either response
//! shape), keeps it in memory for client-side pagination, and computes the
//! profile-screen usage statistics from it.

use std::sync::Arc;

use chrono::Utc;

use calq_core::api::OperationsApi;
use calq_core::error::Result;
use calq_core::history::{HistoryStats, Pager, PAGE_SIZE};
use calq_core::operation::Operation;

/// Drives the history list and its paginated profile-screen view.
pub struct HistoryController {
    ops: Arc<dyn OperationsApi>,
    operations: Vec<Operation>,
    pager: Pager,
}

impl HistoryController {
    pub fn new(ops: Arc<dyn OperationsApi>) -> Self {
        Self {
            ops,
            operations: Vec::new(),
            pager: Pager::default(),
        }
    }

    /// The full fetched list, newest first (server order).
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Refetches the list. A failure leaves the previous list untouched;
    /// the caller decides how to surface the error (a 401 means the
    /// session expired and forces a logout).
    pub async fn refresh(&mut self) -> Result<()> {
        let operations = self.ops.list_operations().await?;
        self.operations = operations;
        self.pager.refresh(self.operations.len());
        Ok(())
    }

    /// Clears the server-side history after the user confirmed.
    ///
    /// Without confirmation this is a no-op that issues no network call
    /// and returns `None`. On success the local list is emptied and the
    /// number of removed operations returned.
    pub async fn clear(&mut self, confirmed: bool) -> Result<Option<u64>> {
        if !confirmed {
            return Ok(None);
        }

        let deleted = self.ops.clear_history().await?;
        self.operations.clear();
        self.pager = Pager::new(0, PAGE_SIZE);
        Ok(Some(deleted))
    }

    // ===== Paginated profile-screen view =====

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    /// The slice of operations for the current page.
    pub fn page(&self) -> &[Operation] {
        self.pager.page_slice(&self.operations)
    }

    /// Moves to `page` if it is in range; out-of-range requests are
    /// ignored.
    pub fn set_page(&mut self, page: usize) {
        self.pager.set_page(page);
    }

    pub fn next_page(&mut self) {
        self.pager.next();
    }

    pub fn prev_page(&mut self) {
        self.pager.prev();
    }

    /// Usage statistics over the fetched list.
    pub fn stats(&self) -> HistoryStats {
        HistoryStats::compute(&self.operations, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_operation, MockOperationsApi};
    use calq_core::error::CalqError;

    fn many_operations(n: usize) -> Vec<Operation> {
        (0..n)
            .map(|i| sample_operation(&format!("{i}+{i}"), &format!("{}", i * 2)))
            .collect()
    }

    #[tokio::test]
    async fn test_refresh_populates_list_and_pager() {
        let mut controller =
            HistoryController::new(Arc::new(MockOperationsApi::with_operations(
                many_operations(25),
            )));

        controller.refresh().await.unwrap();
        assert_eq!(controller.operations().len(), 25);
        assert_eq!(controller.pager().total_pages(), 3);
        assert_eq!(controller.page().len(), 10);
    }

    #[tokio::test]
    async fn test_page_navigation_is_clamped() {
        let mut controller =
            HistoryController::new(Arc::new(MockOperationsApi::with_operations(
                many_operations(25),
            )));
        controller.refresh().await.unwrap();

        controller.set_page(3);
        controller.next_page();
        assert_eq!(controller.pager().current_page(), 3);
        assert_eq!(controller.page().len(), 5);

        controller.set_page(0);
        assert_eq!(controller.pager().current_page(), 3);
    }

    #[tokio::test]
    async fn test_clear_without_confirmation_issues_no_call() {
        let ops = Arc::new(MockOperationsApi::with_operations(many_operations(3)));
        let mut controller = HistoryController::new(Arc::clone(&ops) as Arc<dyn OperationsApi>);

        let outcome = controller.clear(false).await.unwrap();
        assert_eq!(outcome, None);
        assert_eq!(ops.call_count(), 0);
    }

    #[tokio::test]
    async fn test_clear_confirmed_empties_list() {
        let mut controller =
            HistoryController::new(Arc::new(MockOperationsApi::with_operations(
                many_operations(3),
            )));
        controller.refresh().await.unwrap();

        let outcome = controller.clear(true).await.unwrap();
        assert_eq!(outcome, Some(3));
        assert!(controller.is_empty());
        assert_eq!(controller.pager().current_page(), 1);
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_previous_list() {
        let mut controller =
            HistoryController::new(Arc::new(MockOperationsApi::with_operations(
                many_operations(2),
            )));
        controller.refresh().await.unwrap();

        let mut failing =
            HistoryController::new(Arc::new(MockOperationsApi::failing(
                CalqError::SessionExpired,
            )));
        failing.operations = controller.operations.clone();

        let err = failing.refresh().await.unwrap_err();
        assert!(err.is_session_expired());
        assert_eq!(failing.operations().len(), 2);
    }
}
