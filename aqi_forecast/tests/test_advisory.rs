use aqi_forecast::advisory::{
    build_prompt, client_from_config, parse_advisory, AdvisoryRequester, AdvisoryStatus,
    DisabledGenerator, GeminiClient, PromptFacts, TextGenerator, NOT_GENERATED, NO_RESPONSE,
};
use aqi_forecast::config::{AdvisoryConfig, Provider};
use aqi_forecast::{AdvisoryError, RiskCategory, TrendLabel};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Replies with a canned result and records every prompt it receives
struct FakeGenerator {
    reply: Result<String, AdvisoryError>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl FakeGenerator {
    fn new(reply: Result<String, AdvisoryError>) -> (Self, Arc<Mutex<Vec<String>>>) {
        let prompts = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                reply,
                prompts: Arc::clone(&prompts),
            },
            prompts,
        )
    }
}

impl TextGenerator for FakeGenerator {
    fn generate(&self, prompt: &str) -> Result<String, AdvisoryError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone()
    }

    fn name(&self) -> &str {
        "fake"
    }
}

fn sample_facts<'a>(history: &'a [f64], forecast: &'a [f64]) -> PromptFacts<'a> {
    PromptFacts::new(
        history,
        forecast,
        TrendLabel::Worsening,
        RiskCategory::VeryUnhealthy,
    )
}

#[rstest]
#[case("Wear a mask\nBecause AQI is high", "Wear a mask", "Because AQI is high")]
#[case("  Stay inside  \n\n Close windows.\nRun a purifier. ", "Stay inside", "Close windows.\nRun a purifier.")]
#[case("\n\nLimit outdoor exercise\nDetails follow", "Limit outdoor exercise", "Details follow")]
#[case("Single paragraph without breaks", NOT_GENERATED, "Single paragraph without breaks")]
#[case("   ", NOT_GENERATED, NO_RESPONSE)]
#[case("", NOT_GENERATED, NO_RESPONSE)]
fn test_parse_advisory(
    #[case] raw: &str,
    #[case] recommendation: &str,
    #[case] explanation: &str,
) {
    let (rec, exp) = parse_advisory(raw);
    assert_eq!(rec, recommendation);
    assert_eq!(exp, explanation);
}

#[test]
fn test_build_prompt_embeds_facts() {
    let history = [45.0, 60.0, 80.0, 120.0, 200.0];
    let forecast = [231.456, 262.0, 293.1];
    let prompt = build_prompt(&sample_facts(&history, &forecast));

    assert!(prompt.contains("Given AQI history: [45.00, 60.00, 80.00, 120.00, 200.00]"));
    assert!(prompt.contains("Forecasted next 3 AQI values: [231.46, 262.00, 293.10]"));
    assert!(prompt.contains("Trend: increasing 📈 (worsening)"));
    assert!(prompt.contains(&format!("Health Risk: {}", RiskCategory::VeryUnhealthy.message())));
    assert!(prompt.contains("1. Health & safety recommendations."));
    assert!(prompt.contains("2. Steps to reduce pollution exposure."));
    assert!(!prompt.contains("Pollutant readings"));

    // Deterministic
    assert_eq!(prompt, build_prompt(&sample_facts(&history, &forecast)));
}

#[test]
fn test_build_prompt_with_date_and_pollutants() {
    let history = [45.0, 60.0, 80.0, 120.0, 200.0];
    let forecast = [210.0];
    let mut pollutants = BTreeMap::new();
    pollutants.insert("NO2".to_string(), 31.5);
    pollutants.insert("PM2.5".to_string(), 90.125);
    let date = NaiveDate::from_ymd_opt(2023, 1, 5).unwrap();

    let prompt = build_prompt(&sample_facts(&history, &forecast).on_date(date, &pollutants));

    assert!(prompt.contains("Date of latest reading: 2023-01-05"));
    assert!(prompt.contains("Pollutant readings: NO2=31.50, PM2.5=90.13"));
}

#[test]
fn test_requester_generated_advisory() {
    let (generator, prompts) =
        FakeGenerator::new(Ok("Wear a mask\nBecause AQI is high".to_string()));
    let requester = AdvisoryRequester::new(Box::new(generator));

    let history = [45.0, 60.0, 80.0, 120.0, 200.0];
    let forecast = [210.0, 220.0, 230.0];
    let advisory = requester.advise(&sample_facts(&history, &forecast));

    assert!(advisory.is_generated());
    assert_eq!(advisory.recommendation, "Wear a mask");
    assert_eq!(advisory.explanation, "Because AQI is high");

    let prompts = prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Forecasted next 3 AQI values"));
}

#[rstest]
#[case(Err(AdvisoryError::Http("HTTP 500".to_string())))]
#[case(Err(AdvisoryError::Timeout(30)))]
#[case(Err(AdvisoryError::InvalidResponse("not json".to_string())))]
#[case(Ok("   \n  ".to_string()))]
fn test_requester_degrades_failures(#[case] reply: Result<String, AdvisoryError>) {
    let (generator, _) = FakeGenerator::new(reply);
    let requester = AdvisoryRequester::new(Box::new(generator));

    let history = [45.0, 60.0, 80.0];
    let forecast = [90.0];
    let advisory = requester.advise(&sample_facts(&history, &forecast));

    assert!(!advisory.is_generated());
    assert_eq!(advisory.recommendation, NOT_GENERATED);
    assert_eq!(advisory.explanation, NO_RESPONSE);
    assert!(matches!(advisory.status, AdvisoryStatus::Unavailable { .. }));
}

#[test]
fn test_request_advisory_reports_empty_response() {
    let (generator, _) = FakeGenerator::new(Ok(String::new()));
    let requester = AdvisoryRequester::new(Box::new(generator));

    assert_eq!(
        requester.request_advisory("prompt"),
        Err(AdvisoryError::EmptyResponse)
    );
}

#[test]
fn test_disabled_configuration() {
    let config = AdvisoryConfig {
        enabled: false,
        ..AdvisoryConfig::default()
    };
    let generator = client_from_config(&config).unwrap();
    assert_eq!(generator.name(), "disabled");
    assert_eq!(generator.generate("prompt"), Err(AdvisoryError::Disabled));

    let requester = AdvisoryRequester::new(Box::new(DisabledGenerator));
    let history = [45.0, 60.0, 80.0];
    let forecast = [90.0];
    let advisory = requester.advise(&sample_facts(&history, &forecast));
    match advisory.status {
        AdvisoryStatus::Unavailable { reason } => assert!(reason.contains("disabled")),
        AdvisoryStatus::Generated => panic!("Expected an unavailable advisory"),
    }
}

#[test]
fn test_gemini_requires_api_key() {
    let config = AdvisoryConfig {
        provider: Provider::Gemini,
        api_key: None,
        ..AdvisoryConfig::default()
    };
    let client = GeminiClient::new(config).unwrap();

    assert_eq!(
        client.generate("prompt"),
        Err(AdvisoryError::MissingApiKey("gemini".to_string()))
    );
}

#[test]
fn test_client_selection_from_config() {
    let ollama = AdvisoryConfig {
        provider: Provider::Ollama,
        endpoint: "http://localhost:11434".to_string(),
        model: "llama3.2:3b".to_string(),
        ..AdvisoryConfig::default()
    };
    assert_eq!(client_from_config(&ollama).unwrap().name(), "ollama");

    let requester = AdvisoryRequester::from_config(&AdvisoryConfig::default()).unwrap();
    assert_eq!(requester.generator_name(), "gemini");
}
