use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;
use std::sync::Arc;

use super::kma::{KmaClient, KmaError};
use super::types::{NcstItem, WindObservation};
use super::{CachedObservation, WindCache};
use crate::grid;
use crate::notify::{Language, Notifier, WIND_LOAD_ERROR_KEY};

/// Fetches current wind observations per site, with a short-lived cache in
/// front of the KMA nowcast endpoint.
pub struct WindFetcher {
    client: KmaClient,
    cache: WindCache,
    notifier: Arc<dyn Notifier>,
    language: Language,
    timezone: Tz,
}

impl WindFetcher {
    pub fn new(
        client: KmaClient,
        cache: WindCache,
        notifier: Arc<dyn Notifier>,
        language: Language,
        timezone: Tz,
    ) -> Self {
        Self {
            client,
            cache,
            notifier,
            language,
            timezone,
        }
    }

    /// Fetch the current wind observation for a site, serving from cache
    /// when a fresh entry exists.
    ///
    /// Never returns an error: any failure is logged, surfaced through the
    /// notifier with the localized template, and resolved as `None`. One
    /// shot per call; the next call retries once the cache entry is stale or
    /// absent. Overlapping calls for the same site may each reach the
    /// network between the cache check and the write; the later write wins.
    pub async fn fetch_wind(&self, lat: f64, lon: f64, site_id: &str) -> Option<WindObservation> {
        if let Some(entry) = self.cache.get(site_id).await {
            tracing::debug!(
                "using cached wind observation for site {} (fetched at {})",
                site_id,
                entry.fetched_at
            );
            return Some(entry.observation);
        }

        match self.fetch_fresh(lat, lon).await {
            Ok(observation) => {
                self.cache
                    .insert(
                        site_id.to_string(),
                        CachedObservation {
                            observation: observation.clone(),
                            fetched_at: Utc::now(),
                        },
                    )
                    .await;
                tracing::info!(
                    "wind observation loaded for site {}: {:.1} m/s from {}°",
                    site_id,
                    observation.wind_speed,
                    observation.wind_direction
                );
                Some(observation)
            }
            Err(e) => {
                tracing::error!("wind observation fetch failed for site {}: {}", site_id, e);
                let template = self.notifier.translate(WIND_LOAD_ERROR_KEY, self.language);
                self.notifier
                    .display(&template.replace("{{message}}", &e.to_string()));
                None
            }
        }
    }

    async fn fetch_fresh(&self, lat: f64, lon: f64) -> Result<WindObservation, KmaError> {
        let cell = grid::lat_lon_to_grid(lat, lon);
        tracing::debug!(
            "grid cell for ({:.4}, {:.4}): nx={} ny={}",
            lat,
            lon,
            cell.nx,
            cell.ny
        );

        let (base_date, base_time) = observation_hour(Utc::now().with_timezone(&self.timezone));
        let envelope = self
            .client
            .ultra_srt_ncst(&cell, &base_date, &base_time)
            .await?;

        let (wind_speed, wind_direction) = wind_components(envelope.items())?;

        Ok(WindObservation {
            wind_speed,
            wind_direction,
            observed_at: format!("{}T{}", base_date, base_time),
        })
    }
}

/// Observation-hour request parameters: date as YYYYMMDD and the hour on the
/// hour as HHMM, in the service's configured timezone.
fn observation_hour(now: DateTime<Tz>) -> (String, String) {
    (
        now.format("%Y%m%d").to_string(),
        format!("{:02}00", now.hour()),
    )
}

/// Scan the item list for wind speed (`WSD`) and wind direction (`VEC`).
/// Either category absent after the full scan is missing data; an
/// unparsable value counts as absent.
fn wind_components(items: &[NcstItem]) -> Result<(f64, i32), KmaError> {
    let mut wind_speed = None;
    let mut wind_direction = None;

    for item in items {
        match item.category.as_str() {
            "WSD" => wind_speed = item.obsr_value.parse::<f64>().ok(),
            "VEC" => {
                wind_direction = item.obsr_value.parse::<f64>().ok().map(|deg| deg as i32);
            }
            _ => {}
        }
    }

    let wind_speed = wind_speed.ok_or(KmaError::MissingCategory("WSD"))?;
    let wind_direction = wind_direction.ok_or(KmaError::MissingCategory("VEC"))?;
    Ok((wind_speed, wind_direction))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::weather::mock;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;
    use chrono::TimeZone;
    use moka::future::Cache;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    const NCST_PATH: &str = "/api/typ02/openApi/VilageFcstInfoService_2.0/getUltraSrtNcst";

    #[derive(Default)]
    struct RecordingNotifier {
        messages: Mutex<Vec<String>>,
    }

    impl RecordingNotifier {
        fn displayed(&self) -> Vec<String> {
            self.messages.lock().unwrap().clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn display(&self, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }

        fn translate(&self, key: &str, _lang: Language) -> String {
            format!("{}: {{{{message}}}}", key)
        }
    }

    /// Serve a canned nowcast response on an ephemeral port, counting hits.
    async fn spawn_kma_stub(body: String, status: StatusCode, hits: Arc<AtomicUsize>) -> String {
        let app = Router::new().route(
            NCST_PATH,
            get(move || {
                let body = body.clone();
                let hits = hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    (status, body)
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}", addr)
    }

    fn test_fetcher(
        base_url: &str,
        cache_ttl: Duration,
        notifier: Arc<RecordingNotifier>,
    ) -> WindFetcher {
        let config = Config {
            kma_auth_key: "test-key".to_string(),
            kma_base_url: base_url.to_string(),
            kma_ncst_path: NCST_PATH.to_string(),
            app_timezone: "Asia/Seoul".to_string(),
            app_language: "en".to_string(),
        };
        let cache = Cache::builder()
            .max_capacity(64)
            .time_to_live(cache_ttl)
            .build();

        WindFetcher::new(
            KmaClient::new(config),
            cache,
            notifier,
            Language::English,
            chrono_tz::Asia::Seoul,
        )
    }

    #[tokio::test]
    async fn test_cached_observation_reused_within_ttl() {
        let hits = Arc::new(AtomicUsize::new(0));
        let cell = grid::lat_lon_to_grid(37.5665, 126.9780);
        let envelope = mock::ncst_envelope(&cell, "20250801", "1400");
        let base_url = spawn_kma_stub(
            serde_json::to_string(&envelope).unwrap(),
            StatusCode::OK,
            hits.clone(),
        )
        .await;

        let notifier = Arc::new(RecordingNotifier::default());
        let fetcher = test_fetcher(&base_url, Duration::from_secs(600), notifier.clone());

        let first = fetcher
            .fetch_wind(37.5665, 126.9780, "site-101")
            .await
            .unwrap();
        let second = fetcher
            .fetch_wind(37.5665, 126.9780, "site-101")
            .await
            .unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(first, second);
        assert!(notifier.displayed().is_empty());
    }

    #[tokio::test]
    async fn test_stale_cache_triggers_refetch() {
        let hits = Arc::new(AtomicUsize::new(0));
        let cell = grid::lat_lon_to_grid(37.5665, 126.9780);
        let envelope = mock::ncst_envelope(&cell, "20250801", "1400");
        let base_url = spawn_kma_stub(
            serde_json::to_string(&envelope).unwrap(),
            StatusCode::OK,
            hits.clone(),
        )
        .await;

        let notifier = Arc::new(RecordingNotifier::default());
        let fetcher = test_fetcher(&base_url, Duration::from_millis(100), notifier.clone());

        assert!(fetcher.fetch_wind(37.5665, 126.9780, "site-101").await.is_some());
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert!(fetcher.fetch_wind(37.5665, 126.9780, "site-101").await.is_some());

        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_distinct_sites_fetch_separately() {
        let hits = Arc::new(AtomicUsize::new(0));
        let cell = grid::lat_lon_to_grid(37.5665, 126.9780);
        let envelope = mock::ncst_envelope(&cell, "20250801", "1400");
        let base_url = spawn_kma_stub(
            serde_json::to_string(&envelope).unwrap(),
            StatusCode::OK,
            hits.clone(),
        )
        .await;

        let notifier = Arc::new(RecordingNotifier::default());
        let fetcher = test_fetcher(&base_url, Duration::from_secs(600), notifier.clone());

        // Same coordinates, different site identifiers: the cache key is
        // the site, not the location.
        assert!(fetcher.fetch_wind(37.5665, 126.9780, "site-101").await.is_some());
        assert!(fetcher.fetch_wind(37.5665, 126.9780, "site-202").await.is_some());

        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_missing_wind_category_reports_error_once() {
        let hits = Arc::new(AtomicUsize::new(0));
        let cell = grid::lat_lon_to_grid(37.5665, 126.9780);
        let envelope = mock::ncst_envelope_with(
            &cell,
            "20250801",
            "1400",
            vec![
                ("T1H", "21.0".to_string()),
                ("VEC", "250".to_string()),
            ],
        );
        let base_url = spawn_kma_stub(
            serde_json::to_string(&envelope).unwrap(),
            StatusCode::OK,
            hits.clone(),
        )
        .await;

        let notifier = Arc::new(RecordingNotifier::default());
        let fetcher = test_fetcher(&base_url, Duration::from_secs(600), notifier.clone());

        assert!(fetcher.fetch_wind(37.5665, 126.9780, "site-7").await.is_none());

        let displayed = notifier.displayed();
        assert_eq!(displayed.len(), 1);
        assert!(displayed[0].contains("WSD"));
    }

    #[tokio::test]
    async fn test_api_error_returns_none_and_skips_cache() {
        let hits = Arc::new(AtomicUsize::new(0));
        let envelope = mock::error_envelope("03", "NO_DATA");
        let base_url = spawn_kma_stub(
            serde_json::to_string(&envelope).unwrap(),
            StatusCode::OK,
            hits.clone(),
        )
        .await;

        let notifier = Arc::new(RecordingNotifier::default());
        let fetcher = test_fetcher(&base_url, Duration::from_secs(600), notifier.clone());

        assert!(fetcher.fetch_wind(37.5665, 126.9780, "site-9").await.is_none());
        assert!(fetcher.fetch_wind(37.5665, 126.9780, "site-9").await.is_none());

        // The failure was never cached, so both calls went upstream.
        assert_eq!(hits.load(Ordering::SeqCst), 2);

        let displayed = notifier.displayed();
        assert_eq!(displayed.len(), 2);
        assert!(displayed[0].contains("NO_DATA"));
    }

    #[tokio::test]
    async fn test_http_error_returns_none() {
        let hits = Arc::new(AtomicUsize::new(0));
        let base_url = spawn_kma_stub(
            String::new(),
            StatusCode::INTERNAL_SERVER_ERROR,
            hits.clone(),
        )
        .await;

        let notifier = Arc::new(RecordingNotifier::default());
        let fetcher = test_fetcher(&base_url, Duration::from_secs(600), notifier.clone());

        assert!(fetcher.fetch_wind(37.5665, 126.9780, "site-1").await.is_none());
        assert_eq!(notifier.displayed().len(), 1);
    }

    #[test]
    fn test_wind_components_extraction() {
        let cell = grid::lat_lon_to_grid(37.5665, 126.9780);
        let envelope = mock::ncst_envelope_with(
            &cell,
            "20250801",
            "0500",
            vec![
                ("T1H", "21.0".to_string()),
                ("WSD", "3.4".to_string()),
                ("VEC", "270.9".to_string()),
            ],
        );

        let (speed, direction) = wind_components(envelope.items()).unwrap();
        assert_eq!(speed, 3.4);
        assert_eq!(direction, 270);
    }

    #[test]
    fn test_wind_components_missing_direction() {
        let cell = grid::lat_lon_to_grid(37.5665, 126.9780);
        let envelope = mock::ncst_envelope_with(
            &cell,
            "20250801",
            "0500",
            vec![("WSD", "3.4".to_string())],
        );

        let err = wind_components(envelope.items()).unwrap_err();
        assert!(matches!(err, KmaError::MissingCategory("VEC")));
    }

    #[test]
    fn test_observation_hour_format() {
        let now = chrono_tz::Asia::Seoul
            .with_ymd_and_hms(2025, 8, 5, 14, 37, 12)
            .unwrap();
        let (base_date, base_time) = observation_hour(now);
        assert_eq!(base_date, "20250805");
        assert_eq!(base_time, "1400");
    }
}
