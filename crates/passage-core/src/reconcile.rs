//! Merges partially-populated record batches from several providers into one
//! deduplicated, field-complete sequence.

use crate::models::WeatherRecord;

/// Fill-only merge of one optional field: a value that is already present is
/// never overwritten, an absent one is taken from the incoming source.
fn coalesce<T>(existing: &mut Option<T>, incoming: Option<T>) {
    if existing.is_none() {
        *existing = incoming;
    }
}

/// Copy every field the target is missing from `source`. First writer wins
/// per field; later sources only fill gaps.
fn fill_missing(target: &mut WeatherRecord, source: &WeatherRecord) {
    coalesce(&mut target.wind_direction_deg, source.wind_direction_deg);
    coalesce(&mut target.wind_speed_kmh, source.wind_speed_kmh);
    coalesce(&mut target.wind_gust_kmh, source.wind_gust_kmh);
    coalesce(&mut target.current_direction_deg, source.current_direction_deg);
    coalesce(&mut target.current_speed_kmh, source.current_speed_kmh);
    coalesce(&mut target.wave_direction_deg, source.wave_direction_deg);
    coalesce(&mut target.wave_height_m, source.wave_height_m);
    coalesce(&mut target.condition_title, source.condition_title.clone());
    coalesce(&mut target.condition_icon, source.condition_icon.clone());
    coalesce(&mut target.is_daylight, source.is_daylight);
}

/// Merge freshly fetched records with a waypoint's existing ones.
///
/// New records are folded in order against what has already accumulated in
/// the output (not against the original existing list), so two fresh batches
/// for the same hour bucket collapse into one entry with the earlier batch
/// winning each populated field. Existing records then fill whatever gaps
/// remain, or are appended if their sample is not represented at all.
///
/// Callers supply `new_records` first so that freshly fetched data takes
/// per-field priority. The result is sorted ascending by timestamp and is
/// fully deterministic for identical ordered inputs.
pub fn merge(
    new_records: Vec<WeatherRecord>,
    existing_records: Vec<WeatherRecord>,
) -> Vec<WeatherRecord> {
    let mut merged: Vec<WeatherRecord> = Vec::new();

    for record in new_records.into_iter().chain(existing_records) {
        match merged.iter_mut().find(|entry| entry.same_sample(&record)) {
            Some(entry) => fill_missing(entry, &record),
            None => merged.push(record),
        }
    }

    merged.sort_by_key(|record| record.timestamp);
    merged
}
