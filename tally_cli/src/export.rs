//! History export: finalized-session summaries appended to a CSV file.

use std::fs::OpenOptions;
use std::path::Path;

use eyre::WrapErr;
use tally_core::CompletionEvent;

const HEADERS: [&str; 7] = [
    "finished_at_ms",
    "station",
    "lot",
    "partials",
    "total_count",
    "total_weight_kg",
    "average_weight_kg",
];

/// Append one completion row to `path`, writing the header first when the
/// file is new. The file is opened per event; completions are rare.
pub fn append_history(path: &Path, station: Option<&str>, event: &CompletionEvent) -> eyre::Result<()> {
    let write_headers = !path.exists();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .wrap_err_with(|| format!("open history file {}", path.display()))?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    if write_headers {
        writer.write_record(HEADERS)?;
    }
    let s = &event.snapshot;
    writer.write_record([
        event.finished_at_ms.to_string(),
        station.unwrap_or("").to_string(),
        event.lot.as_deref().unwrap_or("").to_string(),
        s.partial_count.to_string(),
        s.sum_of_captured_counts.to_string(),
        format!("{:.2}", s.total_weight_kg),
        format!("{:.2}", s.average_weight_kg),
    ])?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::AggregateSnapshot;
    use tempfile::tempdir;

    fn event() -> CompletionEvent {
        CompletionEvent {
            snapshot: AggregateSnapshot {
                total_weight_kg: 170.0,
                average_weight_kg: 85.0,
                partial_count: 2,
                sum_of_captured_counts: 18,
                current_live_count: 12,
            },
            lot: Some("L-042".to_string()),
            finished_at_ms: 1234,
        }
    }

    #[test]
    fn header_written_once_rows_appended() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.csv");

        append_history(&path, Some("corridor-1"), &event()).unwrap();
        append_history(&path, Some("corridor-1"), &event()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("finished_at_ms,"));
        assert!(lines[1].contains("corridor-1"));
        assert!(lines[1].contains("L-042"));
        assert!(lines[2].contains("170.00"));
    }

    #[test]
    fn missing_station_and_lot_are_empty_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.csv");
        let mut ev = event();
        ev.lot = None;

        append_history(&path, None, &ev).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.lines().nth(1).unwrap().contains("1234,,,2,18"));
    }
}
