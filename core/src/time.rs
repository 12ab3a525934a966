use chrono::{Duration, Local, NaiveDate};
use anyhow::{anyhow, Result};

/// Calendar dates covered by the window, oldest first; the last one is `today`.
pub fn window_dates(today: NaiveDate, days: usize) -> Vec<NaiveDate> {
    (0..days)
        .rev()
        .map(|back| today - Duration::days(back as i64))
        .collect()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn today_index(days: usize) -> Option<usize> {
    days.checked_sub(1)
}

/// Resolves a human day reference to a ledger day index.
///
/// Accepts `today`, `yesterday`, `-N` (N days ago), `YYYY-MM-DD` or a plain index.
pub fn parse_day_ref(input: &str, today: NaiveDate, days: usize) -> Result<usize> {
    let input = input.trim();
    let last = today_index(days).ok_or_else(|| anyhow!("Empty attendance window"))?;

    let back = match input.to_lowercase().as_str() {
        "today" | "tod" => Some(0),
        "yesterday" | "yest" => Some(1),
        _ => None,
    };
    if let Some(back) = back {
        return index_from_back(back, last);
    }

    // 1. Relative (-N days)
    if let Some(num_str) = input.strip_prefix('-') {
        let back: usize = num_str
            .parse()
            .map_err(|_| anyhow!("Invalid relative day: {}", input))?;
        return index_from_back(back, last);
    }

    // 2. Absolute date
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        let back = (today - date).num_days();
        if back < 0 {
            return Err(anyhow!("{} is after today", date));
        }
        return index_from_back(back as usize, last);
    }

    // 3. Plain index
    let index: usize = input
        .parse()
        .map_err(|_| anyhow!("Unrecognized day: '{}'", input))?;
    if index > last {
        return Err(anyhow!("Day {} is outside the {}-day window", index, days));
    }
    Ok(index)
}

fn index_from_back(back: usize, last: usize) -> Result<usize> {
    last.checked_sub(back)
        .ok_or_else(|| anyhow!("{} days ago is outside the {}-day window", back, last + 1))
}
