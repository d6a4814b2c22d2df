use std::sync::{Arc, RwLock};

use chrono::{DateTime, Duration, Utc};
use karban_common::Secret;
use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{config::UnicommerceConfig, SaleOrder, SaleOrderStatus, SaleOrderSummary, UnicommerceApiError};

const SEARCH_SALE_ORDERS_PATH: &str = "/services/rest/v1/oms/saleOrder/search";
const GET_SALE_ORDER_PATH: &str = "/services/rest/v1/oms/saleorder/get";
/// Tokens are refreshed this long before Unicommerce says they expire.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::minutes(5);

#[derive(Clone)]
struct AccessToken {
    value: Secret<String>,
    expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct UnicommerceApi {
    config: UnicommerceConfig,
    client: Arc<Client>,
    token: Arc<RwLock<Option<AccessToken>>>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

impl UnicommerceApi {
    pub fn new(config: UnicommerceConfig) -> Result<Self, UnicommerceApiError> {
        let mut headers = HeaderMap::with_capacity(1);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| UnicommerceApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client), token: Arc::new(RwLock::new(None)) })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url())
    }

    fn cached_token(&self) -> Option<Secret<String>> {
        let guard = self.token.read().ok()?;
        guard.as_ref().filter(|t| t.expires_at > Utc::now()).map(|t| t.value.clone())
    }

    /// Returns a valid bearer token, requesting a new one with the password grant if the cached token has expired.
    pub async fn access_token(&self) -> Result<Secret<String>, UnicommerceApiError> {
        if let Some(token) = self.cached_token() {
            return Ok(token);
        }
        debug!("Requesting a new Unicommerce access token for {}", self.config.username);
        let params = [
            ("grant_type", "password"),
            ("client_id", self.config.client_id.as_str()),
            ("username", self.config.username.as_str()),
            ("password", self.config.password.reveal().as_str()),
        ];
        let response = self
            .client
            .get(self.url("/oauth/token"))
            .query(&params)
            .send()
            .await
            .map_err(|e| UnicommerceApiError::AuthenticationError(e.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            return Err(UnicommerceApiError::AuthenticationError(format!("Token request failed with status {status}")));
        }
        let token =
            response.json::<TokenResponse>().await.map_err(|e| UnicommerceApiError::JsonError(e.to_string()))?;
        let lifetime = token.expires_in.map(Duration::seconds).unwrap_or_else(|| Duration::hours(1));
        let value = Secret::new(token.access_token);
        let expires_at = Utc::now() + lifetime - TOKEN_EXPIRY_MARGIN;
        if let Ok(mut guard) = self.token.write() {
            *guard = Some(AccessToken { value: value.clone(), expires_at });
        }
        info!("Unicommerce access token obtained. It is valid until {expires_at}");
        Ok(value)
    }

    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<B>,
    ) -> Result<T, UnicommerceApiError> {
        let url = self.url(path);
        let token = self.access_token().await?;
        trace!("Sending REST query: {url}");
        let mut req = self.client.request(method, url).header("Authorization", format!("bearer {}", token.reveal()));
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| UnicommerceApiError::RestRequestError(e.to_string()))?;
        if response.status().is_success() {
            trace!("REST query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| UnicommerceApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message =
                response.text().await.map_err(|e| UnicommerceApiError::RestResponseError(e.to_string()))?;
            Err(UnicommerceApiError::QueryError { status, message })
        }
    }

    /// Searches for sale orders updated in the last `updated_since_minutes` minutes, optionally restricted to a
    /// single status.
    pub async fn search_sale_orders(
        &self,
        updated_since_minutes: i64,
        status: Option<&SaleOrderStatus>,
    ) -> Result<Vec<SaleOrderSummary>, UnicommerceApiError> {
        let mut body = json!({ "updatedSinceInMinutes": updated_since_minutes });
        if let Some(status) = status {
            body["status"] = json!(status.as_str());
        }
        debug!("Searching for sale orders updated in the last {updated_since_minutes} minutes");
        let result = self.rest_query::<Value, Value>(Method::POST, SEARCH_SALE_ORDERS_PATH, Some(body)).await?;
        check_successful(&result)?;
        let elements = result.get("elements").cloned().unwrap_or_else(|| Value::Array(vec![]));
        let orders = serde_json::from_value::<Vec<SaleOrderSummary>>(elements)
            .map_err(|e| UnicommerceApiError::JsonError(e.to_string()))?;
        info!("Sale order search returned {} orders", orders.len());
        Ok(orders)
    }

    /// Fetches the full sale order for the given code. Returns `None` if Unicommerce does not return an order.
    pub async fn get_sale_order(&self, code: &str) -> Result<Option<SaleOrder>, UnicommerceApiError> {
        let body = json!({ "code": code, "facilityCodes": [] });
        debug!("Fetching sale order {code}");
        let result = self.rest_query::<Value, Value>(Method::POST, GET_SALE_ORDER_PATH, Some(body)).await?;
        check_successful(&result)?;
        match result.get("saleOrderDTO") {
            None | Some(Value::Null) => {
                warn!("Unicommerce returned no saleOrderDTO for {code}");
                Ok(None)
            },
            Some(dto) => SaleOrder::from_payload(dto.clone()).map(Some),
        }
    }
}

/// Unicommerce reports most failures with a 200 status and `"successful": false` in the body.
fn check_successful(response: &Value) -> Result<(), UnicommerceApiError> {
    match response.get("successful").and_then(Value::as_bool) {
        Some(true) => Ok(()),
        _ => {
            let errors = response.get("errors").map(|e| e.to_string()).unwrap_or_else(|| "no details".to_string());
            Err(UnicommerceApiError::Unsuccessful(errors))
        },
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn successful_flag() {
        assert!(check_successful(&json!({"successful": true, "elements": []})).is_ok());
        let err = check_successful(&json!({"successful": false, "errors": [{"message": "Invalid code"}]}));
        assert!(matches!(err, Err(UnicommerceApiError::Unsuccessful(m)) if m.contains("Invalid code")));
        assert!(check_successful(&json!({})).is_err());
    }

    #[test]
    fn urls_use_tenant() {
        let config = UnicommerceConfig { tenant: "acme".into(), ..Default::default() };
        let api = UnicommerceApi::new(config).unwrap();
        assert_eq!(api.url(GET_SALE_ORDER_PATH), "https://acme.unicommerce.com/services/rest/v1/oms/saleorder/get");
    }
}
