use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::aqi::{Aqi, AqiError, compute_aqi};

/// One row of the historical measurements export.
///
/// A blank `pm2p5` cell is kept as `None`; the row still takes part in the
/// analysis but has no AQI.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HistoryRecord {
    #[serde(deserialize_with = "deserialize_datetime")]
    pub datetime: NaiveDateTime,
    pub pm2p5: Option<f64>,
    pub ws: Option<f64>,
    pub temp: Option<f64>,
    pub rh: Option<f64>,
    pub bcaod550: Option<f64>,
    pub omaod550: Option<f64>,
    pub ssaod550: Option<f64>,
    /// Every input cell as `(header, value)`, in input order.
    #[serde(skip)]
    pub columns: Vec<(String, String)>,
}

impl HistoryRecord {
    /// The typed columns as text, used when the record was not read from CSV.
    fn measured_columns(&self) -> Vec<(String, String)> {
        let text = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_default();
        vec![
            (
                "datetime".to_string(),
                self.datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
            ),
            ("pm2p5".to_string(), text(self.pm2p5)),
            ("ws".to_string(), text(self.ws)),
            ("temp".to_string(), text(self.temp)),
            ("rh".to_string(), text(self.rh)),
            ("bcaod550".to_string(), text(self.bcaod550)),
            ("omaod550".to_string(), text(self.omaod550)),
            ("ssaod550".to_string(), text(self.ssaod550)),
        ]
    }
}

/// A history row with its derived AQI.
#[derive(Debug, Clone)]
pub struct ScoredRecord {
    pub record: HistoryRecord,
    /// `None` when the row has no PM2.5 reading.
    pub aqi: Option<Result<Aqi, AqiError>>,
}

impl ScoredRecord {
    pub fn aqi_value(&self) -> Option<Aqi> {
        self.aqi.and_then(Result::ok)
    }

    pub fn is_out_of_range(&self) -> bool {
        matches!(self.aqi, Some(Err(_)))
    }
}

/// One output row of [`crate::output::write_enriched`]: every input column in
/// input order, then `year`, `month` and `aqi`.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRow {
    pub fields: Vec<(String, String)>,
}

impl EnrichedRow {
    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(h, _)| h.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(_, v)| v.as_str())
    }
}

impl From<&ScoredRecord> for EnrichedRow {
    fn from(s: &ScoredRecord) -> Self {
        use chrono::Datelike;

        let r = &s.record;
        let mut fields = if r.columns.is_empty() {
            r.measured_columns()
        } else {
            r.columns.clone()
        };
        fields.push(("year".to_string(), r.datetime.year().to_string()));
        fields.push(("month".to_string(), r.datetime.month().to_string()));
        fields.push((
            "aqi".to_string(),
            s.aqi_value().map(|a| a.to_string()).unwrap_or_default(),
        ));
        EnrichedRow { fields }
    }
}

/// Parses the formats seen in spreadsheet exports: RFC 3339, ISO date-time
/// with a space or `T` separator (optional fractional seconds), or a bare date.
///
/// Offset timestamps keep their wall-clock time.
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_local());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d.and_hms_opt(0, 0, 0).unwrap_or_default());
    }
    bail!("unrecognised datetime '{s}'")
}

fn deserialize_datetime<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_datetime(&raw).map_err(serde::de::Error::custom)
}

/// Reads history rows from CSV with a header row. Column order is free; the
/// `datetime` and `pm2p5` columns must be present, other unknown columns are
/// carried through untyped.
pub fn read_history<R: Read>(reader: R) -> Result<Vec<HistoryRecord>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = rdr.headers()?.clone();
    for required in ["datetime", "pm2p5"] {
        if !headers.iter().any(|h| h == required) {
            bail!("History is missing the '{required}' column");
        }
    }

    let mut rows = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let context = || format!("Invalid history record at data row {}", line + 1);
        let raw = result.with_context(context)?;
        let mut record: HistoryRecord = raw.deserialize(Some(&headers)).with_context(context)?;
        record.columns = headers
            .iter()
            .zip(raw.iter())
            .map(|(h, v)| (h.to_string(), v.to_string()))
            .collect();
        rows.push(record);
    }

    Ok(rows)
}

/// Loads a history CSV file.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn load_history(path: &Path) -> Result<Vec<HistoryRecord>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open history file '{}'", path.display()))?;
    let rows = read_history(file)?;
    debug!(rows = rows.len(), "History loaded");
    Ok(rows)
}

/// Sorts by timestamp and attaches the AQI of each row. Rows are scored
/// independently; a missing or out-of-range reading only affects its own row.
pub fn score_records(mut records: Vec<HistoryRecord>) -> Vec<ScoredRecord> {
    records.sort_by_key(|r| r.datetime);
    records
        .into_iter()
        .map(|record| {
            let aqi = record.pm2p5.map(compute_aqi);
            ScoredRecord { record, aqi }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_datetime_formats() {
        let expected = NaiveDate::from_ymd_opt(2021, 3, 4)
            .unwrap()
            .and_hms_opt(5, 6, 7)
            .unwrap();
        assert_eq!(parse_datetime("2021-03-04 05:06:07").unwrap(), expected);
        assert_eq!(parse_datetime("2021-03-04T05:06:07").unwrap(), expected);
        assert_eq!(parse_datetime("2021-03-04T05:06:07Z").unwrap(), expected);
        assert_eq!(parse_datetime("2021-03-04T05:06:07+05:30").unwrap(), expected);
        assert_eq!(
            parse_datetime("2021-03-04").unwrap(),
            NaiveDate::from_ymd_opt(2021, 3, 4).unwrap().and_hms_opt(0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_offset_timestamp_keeps_local_month() {
        use chrono::Datelike;

        let dt = parse_datetime("2021-02-01T02:00:00+05:30").unwrap();
        assert_eq!(dt.month(), 2);
        assert_eq!(dt.day(), 1);
    }

    #[test]
    fn test_parse_datetime_rejects_garbage() {
        assert!(parse_datetime("04/03/2021").is_err());
        assert!(parse_datetime("").is_err());
    }

    #[test]
    fn test_read_history_with_missing_optional_cells() {
        let csv = "datetime,pm2p5,ws,temp,rh,bcaod550,omaod550,ssaod550,extra\n\
                   2021-01-01 00:00:00,10.0,1.5,,60,0.01,0.02,0.003,x\n";
        let rows = read_history(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].pm2p5, Some(10.0));
        assert_eq!(rows[0].ws, Some(1.5));
        assert_eq!(rows[0].temp, None);
        assert_eq!(rows[0].rh, Some(60.0));
    }

    #[test]
    fn test_read_history_requires_pm25() {
        let csv = "datetime,ws\n2021-01-01,1.0\n";
        assert!(read_history(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_score_records_sorts_and_scores() {
        let csv = "datetime,pm2p5\n2021-02-01,600\n2021-01-01,12.0\n";
        let scored = score_records(read_history(csv.as_bytes()).unwrap());

        assert_eq!(scored[0].record.pm2p5, Some(12.0));
        assert_eq!(scored[0].aqi_value().unwrap().value(), 50);
        assert!(scored[1].is_out_of_range());

        let row = EnrichedRow::from(&scored[1]);
        let values: Vec<&str> = row.values().collect();
        assert_eq!(values, vec!["2021-02-01", "600", "2021", "2", ""]);
    }

    #[test]
    fn test_blank_pm25_keeps_other_rows() {
        let csv = "datetime,pm2p5,ws\n\
                   2021-01-01,10.0,1.0\n\
                   2021-01-02,,2.0\n\
                   2021-01-03,20.0,3.0\n";
        let rows = read_history(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].pm2p5, None);
        assert_eq!(rows[1].ws, Some(2.0));

        let scored = score_records(rows);
        assert_eq!(scored[0].aqi_value().unwrap().value(), 41);
        assert_eq!(scored[1].aqi, None);
        assert!(!scored[1].is_out_of_range());
        assert_eq!(scored[2].aqi_value().unwrap().value(), 67);
    }

    #[test]
    fn test_enriched_row_keeps_every_input_column() {
        let csv = "datetime,wd,pm2p5\n2021-06-01 12:00:00,310.5,35.4\n";
        let scored = score_records(read_history(csv.as_bytes()).unwrap());
        let row = EnrichedRow::from(&scored[0]);

        let headers: Vec<&str> = row.headers().collect();
        assert_eq!(headers, vec!["datetime", "wd", "pm2p5", "year", "month", "aqi"]);
        let values: Vec<&str> = row.values().collect();
        assert_eq!(values, vec!["2021-06-01 12:00:00", "310.5", "35.4", "2021", "6", "100"]);
    }
}
