//! End-to-end: CSV on disk → filter → aggregates.

use airq_dashboard::data::{Category, Measure, TimeIndexed};
use airq_dashboard::stats::{correlate, group_by, pairs, resample, Granularity};
use airq_dashboard::{filter, DashboardConfig, DashboardReport, DataLoader, DatasetCache};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

const HEADER: &str =
    "No,year,month,day,hour,PM2.5,PM10,SO2,NO2,CO,O3,TEMP,PRES,DEWP,RAIN,wd,WSPM,station";

fn write_csv(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file.flush().unwrap();
    file
}

#[test]
fn three_rows_filter_and_yearly_mean() {
    let file = write_csv(&[
        "1,2013,1,1,0,10,20,NA,NA,NA,NA,1,1020,-5,0,N,2,Wanliu",
        "2,2013,6,1,0,20,40,NA,NA,NA,NA,25,1005,15,0,SE,1.5,Wanliu",
        "3,2014,1,1,0,NA,30,NA,NA,NA,NA,-3,1025,-10,0,NW,3,Wanliu",
    ]);

    let dataset = DataLoader::load_csv(file.path()).unwrap();
    assert_eq!(dataset.len(), 3);

    let view = filter(&dataset, 2013, 2013);
    assert_eq!(view.len(), 2);

    let yearly = resample(view, Granularity::Year, &[Measure::Pm25]);
    assert_eq!(yearly.len(), 1);
    assert_eq!(yearly.buckets[0].year, 2013);
    assert_eq!(yearly.buckets[0].means, vec![Some(15.0)]);
}

#[test]
fn wind_groups_keep_row_order() {
    let file = write_csv(&[
        "1,2015,1,1,0,5,20,NA,NA,NA,NA,1,1020,-5,0,N,2,Wanliu",
        "2,2015,1,1,1,7,40,NA,NA,NA,NA,2,1005,15,0,N,1.5,Wanliu",
        "3,2015,1,1,2,9,30,NA,NA,NA,NA,3,1025,-10,0,SE,3,Wanliu",
    ]);
    let dataset = DataLoader::load_csv(file.path()).unwrap();

    let groups = group_by(dataset.view(), Category::WindDirection, Measure::Pm25);
    assert_eq!(groups.labels().collect::<Vec<_>>(), vec!["N", "SE"]);
    assert_eq!(groups.get("N"), Some(&[5.0, 7.0][..]));
    assert_eq!(groups.get("SE"), Some(&[9.0][..]));

    let stations = group_by(dataset.view(), Category::Station, Measure::Pm25);
    assert_eq!(stations.get("Wanliu").map(<[f64]>::len), Some(3));
}

#[test]
fn empty_range_never_fails() {
    let file = write_csv(&["1,2013,1,1,0,10,20,NA,NA,NA,NA,1,1020,-5,0,N,2,Wanliu"]);
    let dataset = DataLoader::load_csv(file.path()).unwrap();
    let view = filter(&dataset, 2016, 2017);

    assert!(view.is_empty());
    assert!(resample(view, Granularity::Month, &[Measure::Pm25, Measure::Pm10]).is_empty());
    assert!(correlate(view, &[Measure::Pm25, Measure::Temp]).is_empty());
    assert!(pairs(view, Measure::Temp, Measure::Pm25).is_empty());
    assert!(group_by(view, Category::WindDirection, Measure::Pm25).is_empty());

    let config = DashboardConfig::default().report_config().unwrap();
    assert!(DashboardReport::build(view, &config).is_empty());
}

#[test]
fn dataset_is_reused_across_filters() {
    let file = write_csv(&[
        "1,2013,3,1,0,10,20,NA,NA,NA,NA,1,1020,-5,0,N,2,Wanliu",
        "2,2014,3,1,0,30,20,NA,NA,NA,NA,1,1020,-5,0,N,2,Wanliu",
        "3,2015,3,1,0,50,20,NA,NA,NA,NA,1,1020,-5,0,N,2,Wanliu",
    ]);

    let cache = DatasetCache::new();
    let dataset = cache.get_or_load(file.path()).unwrap();

    let config = DashboardConfig::default().report_config().unwrap();
    let first = DashboardReport::build(filter(&dataset, 2014, 2015), &config);
    let _ = DashboardReport::build(filter(&dataset, 2013, 2013), &config);
    let again = DashboardReport::build(filter(&dataset, 2014, 2015), &config);

    assert_eq!(first.row_count, 2);
    assert_eq!(first.yearly, again.yearly);
    assert_eq!(dataset.len(), 3);
    assert!(Arc::ptr_eq(&dataset, &cache.get_or_load(file.path()).unwrap()));
}
