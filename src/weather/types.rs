use serde::{Deserialize, Serialize};

/// Current wind conditions at a site, as handed back to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindObservation {
    pub wind_speed: f64,
    pub wind_direction: i32,
    pub observed_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NcstEnvelope {
    pub response: NcstResponse,
}

// The API omits `body` entirely on error responses; only the header is
// guaranteed to be present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NcstResponse {
    pub header: NcstHeader,
    #[serde(default)]
    pub body: Option<NcstBody>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NcstHeader {
    #[serde(rename = "resultCode")]
    pub result_code: String,
    #[serde(rename = "resultMsg")]
    pub result_msg: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NcstBody {
    pub items: NcstItems,
    #[serde(rename = "numOfRows", default)]
    pub num_of_rows: Option<i32>,
    #[serde(rename = "pageNo", default)]
    pub page_no: Option<i32>,
    #[serde(rename = "totalCount", default)]
    pub total_count: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NcstItems {
    #[serde(default)]
    pub item: Vec<NcstItem>,
}

/// One observed value. `category` tags the quantity (`WSD` wind speed,
/// `VEC` wind direction, `T1H` temperature, ...); `obsr_value` carries it
/// as a string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NcstItem {
    #[serde(rename = "baseDate", default)]
    pub base_date: Option<String>,
    #[serde(rename = "baseTime", default)]
    pub base_time: Option<String>,
    pub category: String,
    #[serde(default)]
    pub nx: Option<i32>,
    #[serde(default)]
    pub ny: Option<i32>,
    #[serde(rename = "obsrValue")]
    pub obsr_value: String,
}

impl NcstEnvelope {
    /// Observation items of the response, empty when the body is absent.
    pub fn items(&self) -> &[NcstItem] {
        self.response
            .body
            .as_ref()
            .map(|body| body.items.item.as_slice())
            .unwrap_or(&[])
    }
}
