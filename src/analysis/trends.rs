use chrono::{Datelike, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::analysis::records::ScoredRecord;
use crate::analysis::utility::{mean, mean_opt};

/// Mean AQI for one calendar year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyAqi {
    pub year: i32,
    pub records: usize,
    pub mean_aqi: Option<f64>,
}

/// Mean AQI for one month of the year, pooled across years.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthOfYearAqi {
    pub month: u32,
    pub records: usize,
    pub mean_aqi: Option<f64>,
}

/// Means of the measured columns over a group of records. Absent cells are
/// skipped; a column with no values has no mean.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ColumnMeans {
    pub ws: Option<f64>,
    pub pm2p5: Option<f64>,
    pub temp: Option<f64>,
    pub rh: Option<f64>,
    pub bcaod550: Option<f64>,
    pub omaod550: Option<f64>,
    pub ssaod550: Option<f64>,
}

/// Aggregates for one `YYYY-MM` period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    pub period: String,
    pub records: usize,
    pub mean_aqi: Option<f64>,
    pub means: ColumnMeans,
}

/// Historical trend summary produced from a history export.
#[derive(Debug, Serialize)]
pub struct TrendReport {
    pub generated_at: chrono::DateTime<Utc>,
    pub record_count: usize,
    /// Rows whose PM2.5 had no AQI; they are left out of every AQI mean.
    pub out_of_range_count: usize,
    /// Rows with a blank PM2.5 cell; left out of the AQI and PM2.5 means.
    pub missing_pm25_count: usize,
    pub yearly: Vec<YearlyAqi>,
    pub month_of_year: Vec<MonthOfYearAqi>,
    pub monthly: Vec<MonthlySummary>,
    /// Mean of the per-year AQI means.
    pub annual_average_aqi: Option<f64>,
}

#[derive(Default)]
struct Series {
    records: usize,
    aqi: Vec<f64>,
}

#[derive(Default)]
struct PeriodSeries {
    records: usize,
    aqi: Vec<f64>,
    ws: Vec<f64>,
    pm2p5: Vec<f64>,
    temp: Vec<f64>,
    rh: Vec<f64>,
    bcaod550: Vec<f64>,
    omaod550: Vec<f64>,
    ssaod550: Vec<f64>,
}

/// Groups scored records by year, by month of year and by year-month.
pub fn build_trends(records: &[ScoredRecord]) -> TrendReport {
    let mut by_year: BTreeMap<i32, Series> = BTreeMap::new();
    let mut by_month: BTreeMap<u32, Series> = BTreeMap::new();
    let mut by_period: BTreeMap<(i32, u32), PeriodSeries> = BTreeMap::new();
    let mut out_of_range_count = 0;
    let mut missing_pm25_count = 0;

    for scored in records {
        let r = &scored.record;
        let year = r.datetime.year();
        let month = r.datetime.month();
        let aqi = scored.aqi_value().map(|a| f64::from(a.value()));
        match scored.aqi {
            Some(Err(_)) => out_of_range_count += 1,
            None => missing_pm25_count += 1,
            Some(Ok(_)) => {}
        }

        for series in [
            by_year.entry(year).or_default(),
            by_month.entry(month).or_default(),
        ] {
            series.records += 1;
            series.aqi.extend(aqi);
        }

        let period = by_period.entry((year, month)).or_default();
        period.records += 1;
        period.aqi.extend(aqi);

        macro_rules! push_opt {
            ($($field:ident),*) => {
                $( period.$field.extend(r.$field); )*
            };
        }
        push_opt!(ws, pm2p5, temp, rh, bcaod550, omaod550, ssaod550);
    }

    let yearly: Vec<YearlyAqi> = by_year
        .into_iter()
        .map(|(year, s)| YearlyAqi {
            year,
            records: s.records,
            mean_aqi: mean_opt(&s.aqi),
        })
        .collect();

    let month_of_year = by_month
        .into_iter()
        .map(|(month, s)| MonthOfYearAqi {
            month,
            records: s.records,
            mean_aqi: mean_opt(&s.aqi),
        })
        .collect();

    let monthly = by_period
        .into_iter()
        .map(|((year, month), p)| MonthlySummary {
            period: format!("{year:04}-{month:02}"),
            records: p.records,
            mean_aqi: mean_opt(&p.aqi),
            means: ColumnMeans {
                ws: mean_opt(&p.ws),
                pm2p5: mean_opt(&p.pm2p5),
                temp: mean_opt(&p.temp),
                rh: mean_opt(&p.rh),
                bcaod550: mean_opt(&p.bcaod550),
                omaod550: mean_opt(&p.omaod550),
                ssaod550: mean_opt(&p.ssaod550),
            },
        })
        .collect();

    let year_means: Vec<f64> = yearly.iter().filter_map(|y| y.mean_aqi).collect();
    let annual_average_aqi = (!year_means.is_empty()).then(|| mean(&year_means));

    TrendReport {
        generated_at: Utc::now(),
        record_count: records.len(),
        out_of_range_count,
        missing_pm25_count,
        yearly,
        month_of_year,
        monthly,
        annual_average_aqi,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::records::{read_history, score_records};

    fn report(csv: &str) -> TrendReport {
        build_trends(&score_records(read_history(csv.as_bytes()).unwrap()))
    }

    #[test]
    fn test_empty_history() {
        let r = report("datetime,pm2p5\n");
        assert_eq!(r.record_count, 0);
        assert!(r.yearly.is_empty());
        assert_eq!(r.annual_average_aqi, None);
    }

    #[test]
    fn test_yearly_and_annual_average() {
        // AQI: 12.0 -> 50, 35.4 -> 100, 0.0 -> 0
        let r = report(
            "datetime,pm2p5\n\
             2020-01-10,12.0\n\
             2020-02-10,35.4\n\
             2021-01-10,0.0\n",
        );
        assert_eq!(r.yearly.len(), 2);
        assert_eq!(r.yearly[0].year, 2020);
        assert_eq!(r.yearly[0].mean_aqi, Some(75.0));
        assert_eq!(r.yearly[1].mean_aqi, Some(0.0));
        assert_eq!(r.annual_average_aqi, Some(37.5));
    }

    #[test]
    fn test_month_of_year_pools_years() {
        let r = report(
            "datetime,pm2p5\n\
             2020-01-10,12.0\n\
             2021-01-10,0.0\n\
             2021-03-10,35.4\n",
        );
        assert_eq!(r.month_of_year.len(), 2);
        assert_eq!(r.month_of_year[0].month, 1);
        assert_eq!(r.month_of_year[0].records, 2);
        assert_eq!(r.month_of_year[0].mean_aqi, Some(25.0));
        assert_eq!(r.month_of_year[1].month, 3);
    }

    #[test]
    fn test_out_of_range_rows_skip_aqi_means() {
        let r = report(
            "datetime,pm2p5\n\
             2020-05-01,12.0\n\
             2020-05-02,900\n",
        );
        assert_eq!(r.out_of_range_count, 1);
        assert_eq!(r.yearly[0].records, 2);
        assert_eq!(r.yearly[0].mean_aqi, Some(50.0));
        assert_eq!(r.monthly[0].means.pm2p5, Some(456.0));
    }

    #[test]
    fn test_monthly_column_means_skip_missing() {
        let r = report(
            "datetime,pm2p5,ws,temp\n\
             2020-05-01,10,2.0,\n\
             2020-05-20,20,4.0,\n\
             2020-06-01,30,,25.0\n",
        );
        assert_eq!(r.monthly.len(), 2);
        assert_eq!(r.monthly[0].period, "2020-05");
        assert_eq!(r.monthly[0].means.ws, Some(3.0));
        assert_eq!(r.monthly[0].means.temp, None);
        assert_eq!(r.monthly[0].means.pm2p5, Some(15.0));
        assert_eq!(r.monthly[1].period, "2020-06");
        assert_eq!(r.monthly[1].means.ws, None);
        assert_eq!(r.monthly[1].means.temp, Some(25.0));
    }

    #[test]
    fn test_blank_pm25_row_is_counted_not_fatal() {
        let r = report(
            "datetime,pm2p5,ws\n\
             2021-01-01,10.0,1.0\n\
             2021-01-02,,2.0\n\
             2021-01-03,20.0,3.0\n",
        );
        assert_eq!(r.record_count, 3);
        assert_eq!(r.missing_pm25_count, 1);
        assert_eq!(r.out_of_range_count, 0);
        assert_eq!(r.yearly[0].records, 3);
        // AQI 41 and 67
        assert_eq!(r.yearly[0].mean_aqi, Some(54.0));
        assert_eq!(r.monthly[0].means.pm2p5, Some(15.0));
        assert_eq!(r.monthly[0].means.ws, Some(2.0));
    }

    #[test]
    fn test_year_with_only_out_of_range_rows() {
        let r = report(
            "datetime,pm2p5\n\
             2019-01-01,-5\n\
             2020-01-01,12.0\n",
        );
        assert_eq!(r.yearly[0].mean_aqi, None);
        assert_eq!(r.annual_average_aqi, Some(50.0));
    }
}
