use super::types::NcstEnvelope;
use crate::config::Config;
use crate::grid::GridCell;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KmaError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("HTTP error! status: {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("API error: {message} (resultCode {code})")]
    Api { code: String, message: String },
    #[error("JSON parsing failed: {0}")]
    JsonParsing(#[from] serde_json::Error),
    #[error("missing observation category: {0}")]
    MissingCategory(&'static str),
}

pub struct KmaClient {
    client: Client,
    config: Config,
}

impl KmaClient {
    pub fn new(config: Config) -> Self {
        let client = Client::builder()
            .user_agent("WindNowcastServer/1.0")
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Fetch the ultra-short-term nowcast for a grid cell at the given
    /// observation hour.
    ///
    /// A non-2xx transport status and a non-"00" result code are both
    /// failures; a returned envelope is always a validated success.
    pub async fn ultra_srt_ncst(
        &self,
        cell: &GridCell,
        base_date: &str,
        base_time: &str,
    ) -> Result<NcstEnvelope, KmaError> {
        let url = format!("{}{}", self.config.kma_base_url, self.config.kma_ncst_path);

        tracing::debug!(
            "requesting nowcast: {} nx={} ny={} base={} {}",
            url,
            cell.nx,
            cell.ny,
            base_date,
            base_time
        );

        let nx = cell.nx.to_string();
        let ny = cell.ny.to_string();
        let params: [(&str, &str); 8] = [
            ("pageNo", "1"),
            ("numOfRows", "10"),
            ("dataType", "JSON"),
            ("base_date", base_date),
            ("base_time", base_time),
            ("nx", &nx),
            ("ny", &ny),
            ("authKey", &self.config.kma_auth_key),
        ];

        let response = self.client.get(&url).query(&params).send().await?;

        if !response.status().is_success() {
            return Err(KmaError::HttpStatus(response.status()));
        }

        let json: Value = response.json().await?;
        let envelope: NcstEnvelope = serde_json::from_value(json)?;

        let header = &envelope.response.header;
        if header.result_code != "00" {
            return Err(KmaError::Api {
                code: header.result_code.clone(),
                message: header.result_msg.clone(),
            });
        }

        Ok(envelope)
    }
}
