use serde::{Deserialize, Serialize};
use std::env;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    pub kma_auth_key: String,
    pub kma_base_url: String,
    pub kma_ncst_path: String,
    pub app_timezone: String,
    pub app_language: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Config {
            kma_auth_key: env::var("KMA_AUTH_KEY")
                .map_err(|_| anyhow::anyhow!("KMA_AUTH_KEY not set"))?,
            kma_base_url: env::var("KMA_BASE_URL")
                .unwrap_or_else(|_| "https://apihub.kma.go.kr".to_string()),
            kma_ncst_path: env::var("KMA_NCST_PATH").unwrap_or_else(|_| {
                "/api/typ02/openApi/VilageFcstInfoService_2.0/getUltraSrtNcst".to_string()
            }),
            app_timezone: env::var("APP_TIMEZONE").unwrap_or_else(|_| "Asia/Seoul".to_string()),
            app_language: env::var("APP_LANGUAGE").unwrap_or_else(|_| "ko".to_string()),
        })
    }
}
