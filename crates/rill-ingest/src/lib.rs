use chrono::{Datelike, NaiveDate};
use reqwest::Client;
use std::path::Path;
use std::time::Duration;

const API_BASE: &str = "https://api.weather.com/v1";
const DEFAULT_LOCATION: &str = "KPHL:9:US";
const COMPACT_DATE: &str = "%Y%m%d";

pub fn default_location() -> &'static str {
    DEFAULT_LOCATION
}

pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| format!("unsupported date (expected YYYY-mm-dd): {value}"))
}

/// The historical endpoint caps one request at 31 days, so a range is walked
/// one calendar month at a time: the first and last windows are clipped to
/// the requested range, every window in between spans its whole month.
pub fn month_windows(start: NaiveDate, end: NaiveDate) -> Vec<(NaiveDate, NaiveDate)> {
    let mut windows = Vec::new();
    if end < start {
        return windows;
    }

    let mut cursor = start;
    while cursor <= end {
        let month_end = last_day_of_month(cursor.year(), cursor.month());
        let window_end = month_end.min(end);
        windows.push((cursor, window_end));
        cursor = match window_end.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }
    windows
}

fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

pub async fn fetch_history(
    api_key: &str,
    location: &str,
    units: &str,
    start: NaiveDate,
    end: NaiveDate,
    out_dir: &Path,
    sleep_ms: u64,
    base_url: Option<&str>,
) -> Result<(), String> {
    if end < start {
        return Err("start must be <= end".to_string());
    }
    std::fs::create_dir_all(out_dir)
        .map_err(|err| format!("failed to create out dir {}: {}", out_dir.display(), err))?;

    let client = Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|err| format!("failed to build HTTP client: {err}"))?;

    let url = format!(
        "{}/location/{}/observations/historical.json",
        base_url.unwrap_or(API_BASE).trim_end_matches('/'),
        location
    );

    let windows = month_windows(start, end);
    let total = windows.len();
    let mut fetched = 0usize;
    for (index, (window_start, window_end)) in windows.into_iter().enumerate() {
        let start_param = window_start.format(COMPACT_DATE).to_string();
        let end_param = window_end.format(COMPACT_DATE).to_string();

        match fetch_window(&client, &url, api_key, units, &start_param, &end_param).await {
            Ok(payload) => {
                let out_file = out_dir.join(format!("{start_param}_{end_param}.json"));
                let pretty = serde_json::to_string_pretty(&payload)
                    .map_err(|err| format!("failed to serialize response: {err}"))?;
                std::fs::write(&out_file, pretty).map_err(|err| {
                    format!("failed to write {}: {}", out_file.display(), err)
                })?;
                fetched += 1;
                println!(
                    "fetch window={}/{} start={} end={} file={}",
                    index + 1,
                    total,
                    start_param,
                    end_param,
                    out_file.display()
                );
            }
            // One failed window must not abort the sweep.
            Err(err) => {
                eprintln!("error retrieving window {start_param} -> {end_param}: {err}");
            }
        }

        if index + 1 < total {
            tokio::time::sleep(Duration::from_millis(sleep_ms)).await;
        }
    }

    println!("fetch complete: location={location} windows={total} fetched={fetched}");
    Ok(())
}

async fn fetch_window(
    client: &Client,
    url: &str,
    api_key: &str,
    units: &str,
    start_date: &str,
    end_date: &str,
) -> Result<serde_json::Value, String> {
    let mut attempts = 0u32;
    loop {
        attempts += 1;
        let response = client
            .get(url)
            .query(&[
                ("apiKey", api_key),
                ("units", units),
                ("startDate", start_date),
                ("endDate", end_date),
            ])
            .send()
            .await
            .map_err(|err| format!("request failed: {err}"))?;

        if response.status().as_u16() == 429 && attempts <= 5 {
            let backoff = 500u64 * attempts as u64;
            tokio::time::sleep(Duration::from_millis(backoff)).await;
            continue;
        }

        if !response.status().is_success() {
            return Err(format!("request failed with status {}", response.status()));
        }

        return response
            .json()
            .await
            .map_err(|err| format!("response parse failed: {err}"));
    }
}
