//! Calculator screen controller.
//!
//! Owns the expression buffer and the visible history. The buffer is
//! opaque text; `calculate` hands it to the server verbatim and the server
//! is the sole source of operator precedence and numeric semantics.

use std::sync::Arc;

use calq_core::api::OperationsApi;
use calq_core::display::ExpressionBuffer;
use calq_core::error::Result;
use calq_core::operation::Operation;

/// Drives the calculator display and its visible history list.
pub struct CalculatorController {
    ops: Arc<dyn OperationsApi>,
    buffer: ExpressionBuffer,
    history: Vec<Operation>,
}

impl CalculatorController {
    pub fn new(ops: Arc<dyn OperationsApi>) -> Self {
        Self {
            ops,
            buffer: ExpressionBuffer::new(),
            history: Vec::new(),
        }
    }

    /// The current display value.
    pub fn value(&self) -> &str {
        self.buffer.value()
    }

    /// The visible history, most recent first.
    pub fn history(&self) -> &[Operation] {
        &self.history
    }

    /// Seeds the visible history from a fetched list (already newest
    /// first, as the server returns it).
    pub fn set_history(&mut self, operations: Vec<Operation>) {
        self.history = operations;
    }

    pub fn append(&mut self, token: char) {
        self.buffer.append(token);
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn backspace(&mut self) {
        self.buffer.backspace();
    }

    /// Submits the buffer for evaluation.
    ///
    /// Success replaces the display with the result (RESULT state) and
    /// prepends the operation to the visible history. Failure resets the
    /// display to `"0"`; no partial state is retained.
    pub async fn calculate(&mut self) -> Result<&Operation> {
        let expression = self.buffer.value().to_string();

        match self.ops.calculate(&expression).await {
            Ok(operation) => {
                self.buffer.accept_result(&operation.result);
                self.history.insert(0, operation);
                Ok(&self.history[0])
            }
            Err(err) => {
                self.buffer.reset_after_error();
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_operation, MockOperationsApi};
    use calq_core::error::CalqError;

    fn type_expression(controller: &mut CalculatorController, expression: &str) {
        for c in expression.chars() {
            controller.append(c);
        }
    }

    #[tokio::test]
    async fn test_calculate_updates_display_and_prepends_history() {
        let mut controller =
            CalculatorController::new(Arc::new(MockOperationsApi::with_result("4")));
        controller.set_history(vec![sample_operation("1+1", "2")]);

        type_expression(&mut controller, "2+2");
        let operation = controller.calculate().await.unwrap();
        assert_eq!(operation.result, "4");

        assert_eq!(controller.value(), "4");
        assert_eq!(controller.history().len(), 2);
        assert_eq!(controller.history()[0].expression, "2+2");
        assert_eq!(controller.history()[0].result, "4");
        assert_eq!(controller.history()[1].expression, "1+1");
    }

    #[tokio::test]
    async fn test_result_feeds_next_expression() {
        let mut controller =
            CalculatorController::new(Arc::new(MockOperationsApi::with_result("4")));

        type_expression(&mut controller, "2+2");
        controller.calculate().await.unwrap();

        // Typing after a result restarts the buffer.
        controller.append('9');
        assert_eq!(controller.value(), "9");
    }

    #[tokio::test]
    async fn test_failed_calculation_resets_display() {
        let mut controller = CalculatorController::new(Arc::new(MockOperationsApi::failing(
            CalqError::http(400, "Erro no cálculo"),
        )));

        type_expression(&mut controller, "2++2");
        assert!(controller.calculate().await.is_err());

        assert_eq!(controller.value(), "0");
        assert!(controller.history().is_empty());
    }
}
