//! reqwest implementation of the bill service contract.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde_json::json;
use tracing::{debug, instrument};

use crate::dto::{
    AddPaymentResponseDto, BillDto, BillItemDto, BillPatchDto, CustomerPageDto,
    MeasurementTemplateDto, PaymentDto, PaymentRequestDto, ServiceOfferingDto,
};
use darzi_core::bill::types::{BillAggregate, Payment, PaymentInput};
use darzi_core::catalog::{Customer, MeasurementTemplate, ServiceOffering};
use darzi_core::mutation::{
    AddPaymentResponse, BillPatch, BillService, CacheScope, ServiceError,
};
use darzi_shared::config::RemoteConfig;
use darzi_shared::error::AppError;
use darzi_shared::types::{BillId, CursorPage, CursorRequest, PaymentId};

/// HTTP client for the remote billing service.
///
/// Cheap to clone; the inner connection pool is shared.
#[derive(Debug, Clone)]
pub struct HttpBillService {
    client: Client,
    base_url: String,
}

impl HttpBillService {
    /// Builds a client with the configured base URL and request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Configuration`] when the underlying client
    /// cannot be constructed (bad TLS backend, invalid settings).
    pub fn new(config: &RemoteConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| AppError::Configuration(err.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Lists all bills.
    #[instrument(skip(self))]
    pub async fn list_bills(&self) -> Result<Vec<BillAggregate>, ServiceError> {
        let response = self
            .client
            .get(self.url("/bills"))
            .send()
            .await
            .map_err(map_transport)?;
        let bills: Vec<BillDto> = decode(check(response).await?).await?;
        Ok(bills.into_iter().map(BillDto::into_domain).collect())
    }

    /// Lists one page of customers, optionally filtered by a search text
    /// matched against name, phone, and address.
    #[instrument(skip(self))]
    pub async fn list_customers(
        &self,
        page: &CursorRequest,
        search: Option<&str>,
    ) -> Result<CursorPage<Customer>, ServiceError> {
        let mut query: Vec<(&str, String)> = vec![("limit", page.limit.to_string())];
        if let Some(cursor) = &page.start_after {
            query.push(("startAfter", cursor.clone()));
        }
        if let Some(text) = search {
            query.push(("search", text.to_string()));
        }

        let response = self
            .client
            .get(self.url("/customers"))
            .query(&query)
            .send()
            .await
            .map_err(map_transport)?;
        let page: CustomerPageDto = decode(check(response).await?).await?;
        Ok(CursorPage {
            items: page
                .customers
                .into_iter()
                .map(crate::dto::CustomerDto::into_domain)
                .collect(),
            next_cursor: page.last_evaluated_key,
        })
    }

    /// Lists the shop's service offerings.
    #[instrument(skip(self))]
    pub async fn list_services(&self) -> Result<Vec<ServiceOffering>, ServiceError> {
        let response = self
            .client
            .get(self.url("/services"))
            .send()
            .await
            .map_err(map_transport)?;
        let offerings: Vec<ServiceOfferingDto> = decode(check(response).await?).await?;
        Ok(offerings
            .into_iter()
            .map(ServiceOfferingDto::into_domain)
            .collect())
    }

    /// Lists the per-garment measurement templates.
    #[instrument(skip(self))]
    pub async fn list_measurement_templates(
        &self,
    ) -> Result<Vec<MeasurementTemplate>, ServiceError> {
        let response = self
            .client
            .get(self.url("/measurement-configs"))
            .send()
            .await
            .map_err(map_transport)?;
        let templates: Vec<MeasurementTemplateDto> = decode(check(response).await?).await?;
        Ok(templates
            .into_iter()
            .map(MeasurementTemplateDto::into_domain)
            .collect())
    }
}

impl BillService for HttpBillService {
    async fn fetch_bill(&self, bill_id: BillId) -> Result<BillAggregate, ServiceError> {
        debug!(%bill_id, "fetching bill");
        let response = self
            .client
            .get(self.url(&format!("/bills/{bill_id}")))
            .send()
            .await
            .map_err(map_transport)?;
        let bill: BillDto = decode(check(response).await?).await?;
        Ok(bill.into_domain())
    }

    async fn add_payment(
        &self,
        bill_id: BillId,
        request: PaymentInput,
    ) -> Result<AddPaymentResponse, ServiceError> {
        debug!(%bill_id, "adding payment");
        let response = self
            .client
            .post(self.url(&format!("/bills/{bill_id}/payments")))
            .json(&PaymentRequestDto::from(request))
            .send()
            .await
            .map_err(map_transport)?;
        let created: AddPaymentResponseDto = decode(check(response).await?).await?;
        Ok(AddPaymentResponse {
            payment: created.payment.into_domain(),
            bill: created.bill.into_domain(),
        })
    }

    async fn update_payment(
        &self,
        bill_id: BillId,
        payment_id: PaymentId,
        request: PaymentInput,
    ) -> Result<Payment, ServiceError> {
        debug!(%bill_id, %payment_id, "updating payment");
        let response = self
            .client
            .put(self.url(&format!("/bills/{bill_id}/payments/{payment_id}")))
            .json(&PaymentRequestDto::from(request))
            .send()
            .await
            .map_err(map_transport)?;
        let updated: PaymentDto = decode(check(response).await?).await?;
        Ok(updated.into_domain())
    }

    async fn delete_payment(
        &self,
        bill_id: BillId,
        payment_id: PaymentId,
    ) -> Result<(), ServiceError> {
        debug!(%bill_id, %payment_id, "deleting payment");
        let response = self
            .client
            .delete(self.url(&format!("/bills/{bill_id}/payments/{payment_id}")))
            .send()
            .await
            .map_err(map_transport)?;
        check(response).await?;
        Ok(())
    }

    async fn update_bill(&self, bill_id: BillId, patch: BillPatch) -> Result<(), ServiceError> {
        debug!(%bill_id, "updating bill items");
        let body = BillPatchDto {
            items: patch.items.iter().map(BillItemDto::from).collect(),
            delivery_status: patch.delivery_status,
        };
        let response = self
            .client
            .put(self.url(&format!("/bills/{bill_id}")))
            .json(&body)
            .send()
            .await
            .map_err(map_transport)?;
        check(response).await?;
        Ok(())
    }

    async fn clear_cache(&self, scope: CacheScope) -> Result<(), ServiceError> {
        debug!(%scope, "requesting cache invalidation");
        let response = self
            .client
            .post(self.url("/cache/invalidate"))
            .json(&json!({ "scope": scope.to_string() }))
            .send()
            .await
            .map_err(map_transport)?;
        check(response).await?;
        Ok(())
    }
}

/// Maps a transport-level reqwest failure onto the service error taxonomy.
fn map_transport(err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        ServiceError::Timeout
    } else if err.is_decode() {
        ServiceError::Decode(err.to_string())
    } else {
        ServiceError::Network(err.to_string())
    }
}

/// Turns non-success statuses into service errors, passing the response
/// through otherwise.
async fn check(response: Response) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(ServiceError::NotFound);
    }
    let message = response
        .text()
        .await
        .ok()
        .and_then(|body| extract_error_message(&body))
        .unwrap_or_else(|| status.to_string());
    Err(ServiceError::Rejected {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, ServiceError> {
    response.json::<T>().await.map_err(map_transport)
}

/// Pulls the `error` field out of the service's JSON error body, falling
/// back to the raw text.
fn extract_error_message(body: &str) -> Option<String> {
    if body.is_empty() {
        return None;
    }
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
        })
        .or_else(|| Some(body.to_string()))
}
