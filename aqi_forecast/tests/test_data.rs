use aqi_forecast::data::{parse_query_date, AqiHistory, DatasetLoader};
use aqi_forecast::AdvisorError;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

#[test]
fn test_parse_comma_separated_history() {
    let history = AqiHistory::parse(" 45, 60,, 80 ,120,200, ").unwrap();

    assert_eq!(history.values(), &[45.0, 60.0, 80.0, 120.0, 200.0]);
    assert_eq!(history.len(), 5);
    assert!(history.dates().is_none());

    let parsed: AqiHistory = "1,2,3".parse().unwrap();
    assert_eq!(parsed.values(), &[1.0, 2.0, 3.0]);
}

#[test]
fn test_parse_rejects_bad_values() {
    assert!(matches!(
        AqiHistory::parse("45, sixty, 80"),
        Err(AdvisorError::DataError(_))
    ));
    assert!(matches!(
        AqiHistory::parse("45, -3, 80"),
        Err(AdvisorError::DataError(_))
    ));
    assert!(matches!(
        AqiHistory::parse("45, NaN"),
        Err(AdvisorError::DataError(_))
    ));

    let empty = AqiHistory::parse("").unwrap();
    assert!(empty.is_empty());
}

#[test]
fn test_dated_history_must_be_chronological() {
    let ok = AqiHistory::with_dates(
        vec![date("2023-01-01"), date("2023-01-02")],
        vec![10.0, 20.0],
    )
    .unwrap();
    assert_eq!(ok.last_date(), Some(date("2023-01-02")));

    let unordered = AqiHistory::with_dates(
        vec![date("2023-01-02"), date("2023-01-01")],
        vec![10.0, 20.0],
    );
    assert!(matches!(unordered, Err(AdvisorError::DataError(_))));

    let mismatched = AqiHistory::with_dates(vec![date("2023-01-01")], vec![10.0, 20.0]);
    assert!(matches!(mismatched, Err(AdvisorError::DataError(_))));
}

#[test]
fn test_dataset_loader_from_csv() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "City,Date,PM2.5,NO2,AQI,AQI_Bucket").unwrap();
    writeln!(file, "Delhi,2023-01-01,81.4,30.2,150,Moderate").unwrap();
    writeln!(file, "Delhi,2023-01-02,,28.0,162,Moderate").unwrap();
    writeln!(file, "Delhi,2023-01-03,90.1,31.5,,").unwrap();
    writeln!(file, "Delhi,2023-01-04,95.0,33.3,175,Poor").unwrap();

    let dataset = DatasetLoader::from_csv(file.path()).unwrap();

    // The row without an AQI value is skipped
    assert_eq!(dataset.len(), 3);

    let first = dataset.lookup(date("2023-01-01")).unwrap();
    assert_eq!(first.aqi, 150.0);
    assert_eq!(first.pollutants.get("PM2.5"), Some(&81.4));
    assert_eq!(first.pollutants.get("NO2"), Some(&30.2));
    assert!(!first.pollutants.contains_key("City"));
    assert!(!first.pollutants.contains_key("AQI_Bucket"));

    let second = dataset.lookup(date("2023-01-02")).unwrap();
    assert!(!second.pollutants.contains_key("PM2.5"));

    let history = dataset.history_through(date("2023-01-02")).unwrap();
    assert_eq!(history.values(), &[150.0, 162.0]);
    assert_eq!(history.last_date(), Some(date("2023-01-02")));
}

#[test]
fn test_dataset_lookup_missing_date() {
    let csv = "Date,AQI\n2023-01-01,50\n2023-01-02,60\n";
    let dataset = DatasetLoader::from_reader(csv.as_bytes()).unwrap();

    match dataset.lookup(date("2023-02-01")) {
        Err(AdvisorError::DateNotFound(missing)) => assert_eq!(missing, date("2023-02-01")),
        other => panic!("Expected DateNotFound, got {:?}", other),
    }
    assert!(matches!(
        dataset.history_through(date("2022-12-31")),
        Err(AdvisorError::DateNotFound(_))
    ));
}

#[test]
fn test_dataset_loader_error_handling() {
    // Non-existent file
    assert!(matches!(
        DatasetLoader::from_csv("nonexistent_file.csv"),
        Err(AdvisorError::Io(_))
    ));

    // No date column
    let result = DatasetLoader::from_reader("day,AQI\n1,50\n".as_bytes());
    assert!(matches!(result, Err(AdvisorError::DataError(_))));

    // No AQI column
    let result = DatasetLoader::from_reader("Date,PM10\n2023-01-01,50\n".as_bytes());
    assert!(matches!(result, Err(AdvisorError::DataError(_))));

    // Out of order
    let result =
        DatasetLoader::from_reader("Date,AQI\n2023-01-02,50\n2023-01-01,60\n".as_bytes());
    assert!(matches!(result, Err(AdvisorError::DataError(_))));

    // Unparseable AQI
    let result = DatasetLoader::from_reader("Date,AQI\n2023-01-01,high\n".as_bytes());
    assert!(matches!(result, Err(AdvisorError::DataError(_))));

    // Unparseable date
    let result = DatasetLoader::from_reader("Date,AQI\n01/02/2023,50\n".as_bytes());
    assert!(matches!(result, Err(AdvisorError::DataError(_))));
}

#[test]
fn test_parse_query_date() {
    assert_eq!(parse_query_date("2023-06-15").unwrap(), date("2023-06-15"));
    assert_eq!(parse_query_date(" 2023-06-15 ").unwrap(), date("2023-06-15"));

    for bad in ["2023-13-01", "15/06/2023", "yesterday", ""] {
        assert!(
            matches!(parse_query_date(bad), Err(AdvisorError::InvalidDate(_))),
            "expected InvalidDate for {:?}",
            bad
        );
    }
}
