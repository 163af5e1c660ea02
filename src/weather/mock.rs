use super::types::{NcstBody, NcstEnvelope, NcstHeader, NcstItem, NcstItems, NcstResponse};
use crate::grid::GridCell;

/// Build a nowcast envelope carrying the full category set the live endpoint
/// returns for one observation hour, with jittered but plausible values.
pub fn ncst_envelope(cell: &GridCell, base_date: &str, base_time: &str) -> NcstEnvelope {
    let wind_speed = 1.0 + 6.0 * fastrand::f64();
    let wind_direction = (360.0 * fastrand::f64()).floor() as i32;
    let temperature = 16.0 + 12.0 * fastrand::f64();
    let humidity = 40 + fastrand::i32(0..50);

    let categories = vec![
        ("T1H", format!("{:.1}", temperature)),
        ("RN1", "0".to_string()),
        ("UUU", format!("{:.1}", wind_speed * 0.7)),
        ("VVV", format!("{:.1}", wind_speed * 0.3)),
        ("REH", humidity.to_string()),
        ("PTY", "0".to_string()),
        ("VEC", wind_direction.to_string()),
        ("WSD", format!("{:.1}", wind_speed)),
    ];

    ncst_envelope_with(cell, base_date, base_time, categories)
}

/// Build an envelope carrying exactly the given `(category, obsrValue)`
/// pairs, so callers can drop or corrupt individual categories.
pub fn ncst_envelope_with(
    cell: &GridCell,
    base_date: &str,
    base_time: &str,
    categories: Vec<(&str, String)>,
) -> NcstEnvelope {
    let item: Vec<NcstItem> = categories
        .into_iter()
        .map(|(category, obsr_value)| NcstItem {
            base_date: Some(base_date.to_string()),
            base_time: Some(base_time.to_string()),
            category: category.to_string(),
            nx: Some(cell.nx),
            ny: Some(cell.ny),
            obsr_value,
        })
        .collect();

    NcstEnvelope {
        response: NcstResponse {
            header: NcstHeader {
                result_code: "00".to_string(),
                result_msg: "NORMAL_SERVICE".to_string(),
            },
            body: Some(NcstBody {
                total_count: Some(item.len() as i32),
                num_of_rows: Some(10),
                page_no: Some(1),
                items: NcstItems { item },
            }),
        },
    }
}

/// The envelope shape the API returns on failure: header only, no body.
pub fn error_envelope(code: &str, message: &str) -> NcstEnvelope {
    NcstEnvelope {
        response: NcstResponse {
            header: NcstHeader {
                result_code: code.to_string(),
                result_msg: message.to_string(),
            },
            body: None,
        },
    }
}
