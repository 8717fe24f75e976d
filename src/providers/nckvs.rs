use std::{future::Future, time::Duration};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::core::{
    config::KvsConfig,
    errors::{AppError, AppResult},
    types::{MatchCriterion, SearchResponse, StoreAck, UpsertRecord},
};

const SUCCESS_CODE: &str = "200";

/// Remote key-value store the publisher writes bulletins to.
pub trait RecordStore: Send + Sync {
    fn search(
        &self,
        criteria: &[MatchCriterion],
    ) -> impl Future<Output = AppResult<SearchResponse>> + Send;

    fn set(&self, records: &[UpsertRecord]) -> impl Future<Output = AppResult<StoreAck>> + Send;
}

/// Login and application identity sent with every store request.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SystemParams {
    pub login_name: String,
    pub login_pass: String,
    pub app_servername: String,
    pub app_username: String,
    pub timezone: String,
}

impl From<&KvsConfig> for SystemParams {
    fn from(config: &KvsConfig) -> Self {
        Self {
            login_name: config.login_name.clone(),
            login_pass: config.login_pass.clone(),
            app_servername: config.app_servername.clone(),
            app_username: config.app_username.clone(),
            timezone: config.timezone.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct KvsClient {
    http: reqwest::Client,
    base_url: String,
    system: SystemParams,
    datatypename: String,
    datatypeversion: i64,
}

impl KvsClient {
    pub fn new(config: &KvsConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| AppError::Network(err.to_string()))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            system: SystemParams::from(config),
            datatypename: config.datatypename.clone(),
            datatypeversion: config.datatypeversion,
        })
    }

    pub fn system(&self) -> &SystemParams {
        &self.system
    }

    pub fn search_payload(&self, criteria: &[MatchCriterion]) -> Value {
        serde_json::json!({
            "system": self.system,
            "query": {
                "datatypename": self.datatypename,
                "dataversion": "*",
                "limit": 0,
                "sortorder": [],
                "matching": criteria
            }
        })
    }

    pub fn set_payload(&self, records: &[UpsertRecord]) -> Value {
        serde_json::json!({
            "system": self.system,
            "query": {
                "datalist": records,
                "datatypename": self.datatypename,
                "datatypeversion": self.datatypeversion
            }
        })
    }

    async fn request<T>(&self, path: &str, payload: &Value) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        let endpoint = format!("{}{path}", self.base_url);
        tracing::debug!(%endpoint, "nckvs request");

        let response = self
            .http
            .post(&endpoint)
            .json(payload)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    AppError::StoreTimeout
                } else {
                    AppError::Network(err.to_string())
                }
            })?;

        let status = response.status();
        let body: Value = response.json().await.map_err(|err| AppError::RemoteStore {
            code: status.as_u16().to_string(),
            message: format!("response is not JSON: {err}"),
        })?;

        let code = match body.get("code") {
            Some(Value::String(code)) => code.clone(),
            Some(Value::Number(code)) => code.to_string(),
            _ => {
                return Err(AppError::RemoteStore {
                    code: status.as_u16().to_string(),
                    message: "response has no code".to_string(),
                })
            }
        };
        if code != SUCCESS_CODE {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            return Err(AppError::RemoteStore { code, message });
        }

        serde_json::from_value(body).map_err(|err| AppError::RemoteStore {
            code,
            message: format!("unexpected response shape: {err}"),
        })
    }
}

impl RecordStore for KvsClient {
    async fn search(&self, criteria: &[MatchCriterion]) -> AppResult<SearchResponse> {
        let payload = self.search_payload(criteria);
        self.request("/data/search/", &payload).await
    }

    async fn set(&self, records: &[UpsertRecord]) -> AppResult<StoreAck> {
        let payload = self.set_payload(records);
        self.request("/data/set/", &payload).await
    }
}
