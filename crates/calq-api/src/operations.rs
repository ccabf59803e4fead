//! Calculation and history endpoints.

use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use calq_core::api::OperationsApi;
use calq_core::error::Result;
use calq_core::history::OperationsPayload;
use calq_core::operation::Operation;

use crate::client::ApiClient;

const CALCULATE_PATH: &str = "/api/operacoes/calcular/";
const OPERATIONS_PATH: &str = "/api/operacoes/";
const CLEAR_HISTORY_PATH: &str = "/api/operacoes/limpar_historico/";

#[derive(Serialize)]
struct CalculateRequest<'a> {
    operacao: &'a str,
}

/// The calculate endpoint echoes the expression and returns the result as
/// a bare number; history entries carry it as a string. Both are folded
/// into opaque text here.
#[derive(Deserialize)]
struct CalculateResponse {
    #[serde(default)]
    operacao: Option<String>,
    resultado: serde_json::Value,
    #[serde(default)]
    id: Option<i64>,
    #[serde(default)]
    data_inclusao: Option<String>,
}

impl CalculateResponse {
    fn into_operation(self, submitted: &str) -> Operation {
        Operation {
            id: self.id,
            expression: self.operacao.unwrap_or_else(|| submitted.to_string()),
            result: render_result(&self.resultado),
            recorded_at: self.data_inclusao,
        }
    }
}

fn render_result(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Deserialize)]
struct ClearHistoryResponse {
    operacoes_deletadas: u64,
}

#[async_trait]
impl OperationsApi for ApiClient {
    async fn calculate(&self, expression: &str) -> Result<Operation> {
        tracing::debug!(expression, "submitting expression");

        let body = CalculateRequest {
            operacao: expression,
        };
        let builder = self.request(Method::POST, CALCULATE_PATH)?.json(&body);
        let response: CalculateResponse = self.execute(builder, "Erro ao calcular").await?;

        Ok(response.into_operation(expression))
    }

    async fn list_operations(&self) -> Result<Vec<Operation>> {
        let builder = self.request(Method::GET, OPERATIONS_PATH)?;
        let payload: OperationsPayload = self
            .execute(builder, "Erro ao carregar histórico")
            .await?;

        Ok(payload.into_operations())
    }

    async fn clear_history(&self) -> Result<u64> {
        let builder = self.request(Method::POST, CLEAR_HISTORY_PATH)?;
        let response: ClearHistoryResponse = self
            .execute(builder, "Erro ao limpar histórico")
            .await?;

        Ok(response.operacoes_deletadas)
    }
}
