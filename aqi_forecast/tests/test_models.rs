use approx::assert_abs_diff_eq;
use aqi_forecast::models::ets::EtsModel;
use aqi_forecast::models::holt_winters::HoltWintersModel;
use aqi_forecast::models::{ForecastModel, ForecastResult, TrainedForecastModel};
use aqi_forecast::AdvisorError;
use chrono::NaiveDate;

fn create_test_data() -> Vec<f64> {
    vec![100.0, 102.0, 104.0, 103.0, 105.0, 108.0, 107.0, 110.0]
}

fn seasonal_data() -> Vec<f64> {
    // Weekly cycle on a gentle upward drift
    let cycle = [0.0, 5.0, 12.0, 8.0, 3.0, -4.0, -6.0];
    (0..35)
        .map(|i| 80.0 + 0.5 * i as f64 + cycle[i % 7])
        .collect()
}

#[test]
fn test_holt_linear_model() {
    let data = create_test_data();
    let model = HoltWintersModel::trend_only();

    let trained = model.train(&data).unwrap();
    let forecast = trained.forecast(3).unwrap();

    assert_eq!(forecast.horizons(), 3);
    assert_eq!(forecast.values().len(), 3);

    // One-step-ahead predictions start at the second observation
    assert_eq!(trained.fitted_values().len(), data.len() - 1);

    let summary = forecast.model().unwrap();
    assert!((0.0..=1.0).contains(&summary.alpha.unwrap()));
    assert!((0.0..=1.0).contains(&summary.beta.unwrap()));
    assert!(summary.gamma.is_none());
    assert!(summary.seasonal_period.is_none());
    assert!(summary.sse >= 0.0);

    // Upward drifting series keeps drifting upward
    for value in forecast.values() {
        assert!(*value > 100.0 && *value < 125.0);
    }
}

#[test]
fn test_holt_linear_tracks_straight_line() {
    let trained = HoltWintersModel::trend_only()
        .train(&[10.0, 20.0, 30.0, 40.0, 50.0])
        .unwrap();
    let forecast = trained.forecast(3).unwrap();

    assert_abs_diff_eq!(forecast.values()[0], 60.0, epsilon = 1e-6);
    assert_abs_diff_eq!(forecast.values()[1], 70.0, epsilon = 1e-6);
    assert_abs_diff_eq!(forecast.values()[2], 80.0, epsilon = 1e-6);
}

#[test]
fn test_ets_additive_trend_model() {
    // A month of readings drifting upward with day-to-day noise
    let data: Vec<f64> = (0..30)
        .map(|i| 100.0 + 0.5 * i as f64 + if i % 2 == 0 { 1.5 } else { -1.5 })
        .collect();

    let trained = EtsModel::additive_trend().train(&data).unwrap();
    assert_eq!(trained.name(), "ETS(A,A,N)");
    assert!(!trained.fitted_values().is_empty());
    assert!(trained.fitted_values().len() <= data.len());

    let forecast = trained.forecast_with_intervals(5, 0.95).unwrap();
    assert_eq!(forecast.values().len(), 5);
    for ((lower, upper), value) in forecast.intervals().unwrap().iter().zip(forecast.values()) {
        assert!(lower <= value && value <= upper);
        assert!(*value > 100.0 && *value < 140.0);
    }

    let summary = forecast.model().unwrap();
    assert!(summary.alpha.is_none());
    assert!(summary.seasonal_period.is_none());
    assert!(summary.sse.is_finite());

    assert!(matches!(
        trained.forecast_with_intervals(2, 0.0),
        Err(AdvisorError::InvalidParameter(_))
    ));
}

#[test]
fn test_seasonal_model_fits_cycle() {
    let data = seasonal_data();
    let trained = HoltWintersModel::seasonal(7).unwrap().train(&data).unwrap();
    let forecast = trained.forecast(7).unwrap();

    let summary = forecast.model().unwrap();
    assert_eq!(summary.seasonal_period, Some(7));
    assert!(summary.gamma.is_some());

    // Pattern continues: 35 % 7 == 0, so step 1 is the cycle start
    let expected: Vec<f64> = (35..42)
        .map(|i| 80.0 + 0.5 * i as f64 + [0.0, 5.0, 12.0, 8.0, 3.0, -4.0, -6.0][i % 7])
        .collect();
    for (got, want) in forecast.values().iter().zip(&expected) {
        assert_abs_diff_eq!(*got, *want, epsilon = 1.0);
    }
}

#[test]
fn test_prediction_intervals() {
    let data = create_test_data();
    let trained = HoltWintersModel::trend_only().train(&data).unwrap();
    let forecast = trained.forecast_with_intervals(4, 0.95).unwrap();

    let intervals = forecast.intervals().unwrap();
    assert_eq!(intervals.len(), 4);
    for ((lower, upper), value) in intervals.iter().zip(forecast.values()) {
        assert!(lower <= value && value <= upper);
    }

    // Uncertainty widens with the horizon
    let width = |(l, u): &(f64, f64)| u - l;
    assert!(width(&intervals[3]) >= width(&intervals[0]));

    assert!(matches!(
        trained.forecast_with_intervals(2, 1.5),
        Err(AdvisorError::InvalidParameter(_))
    ));
}

#[test]
fn test_forecast_result_operations() {
    let values = vec![105.123, 106.0, 107.456];
    let forecast = ForecastResult::new(values.clone(), 3).unwrap();

    assert_eq!(forecast.horizons(), 3);
    assert_eq!(forecast.values(), &values[..]);
    assert_eq!(forecast.first(), Some(105.123));

    let json = forecast.to_json().unwrap();
    assert!(json.contains("\"values\""));

    let dated = forecast
        .with_dates_after(NaiveDate::from_ymd_opt(2023, 12, 30).unwrap())
        .unwrap();
    let dates = dated.dates().unwrap();
    assert_eq!(dates[0], NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
    assert_eq!(dates[2], NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
}

#[test]
fn test_model_parameter_validation() {
    assert!(ForecastResult::new(vec![1.0, 2.0], 3).is_err());
    assert!(ForecastResult::new(vec![1.0], 1)
        .unwrap()
        .with_intervals(vec![])
        .is_err());

    assert!(matches!(
        HoltWintersModel::seasonal(1),
        Err(AdvisorError::InvalidParameter(_))
    ));

    // A seasonal model needs two full cycles
    let result = HoltWintersModel::seasonal(7).unwrap().train(&[1.0; 13]);
    assert!(matches!(result, Err(AdvisorError::InsufficientData(_))));
}
