//! Natural-language advisories from forecast facts
//!
//! The requester turns the numeric results of a run into a prompt, sends it
//! to a [`TextGenerator`] and splits the reply into a one-line
//! recommendation and a longer explanation. Collaborator failures never
//! abort a run: they degrade to sentinel text and are recorded in
//! [`AdvisoryStatus`].

use crate::config::AdvisoryConfig;
use crate::error::{AdvisoryError, Result};
use crate::risk::RiskCategory;
use crate::trend::TrendLabel;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{info, warn};

mod client;

pub use client::{client_from_config, DisabledGenerator, GeminiClient, OllamaClient};

/// Recommendation used when the reply has no separate first line
pub const NOT_GENERATED: &str = "not generated";

/// Explanation used when no reply was obtained
pub const NO_RESPONSE: &str = "no response";

/// External text-generation capability: one prompt in, one text out
pub trait TextGenerator: Send + Sync {
    /// Complete `prompt`
    fn generate(&self, prompt: &str) -> std::result::Result<String, AdvisoryError>;

    /// Short name for logs
    fn name(&self) -> &str;
}

/// Facts embedded in an advisory prompt
#[derive(Debug, Clone)]
pub struct PromptFacts<'a> {
    pub history: &'a [f64],
    pub forecast: &'a [f64],
    pub trend: TrendLabel,
    pub risk: RiskCategory,
    pub date: Option<NaiveDate>,
    pub pollutants: Option<&'a BTreeMap<String, f64>>,
}

impl<'a> PromptFacts<'a> {
    pub fn new(
        history: &'a [f64],
        forecast: &'a [f64],
        trend: TrendLabel,
        risk: RiskCategory,
    ) -> Self {
        Self {
            history,
            forecast,
            trend,
            risk,
            date: None,
            pollutants: None,
        }
    }

    /// Add the query date and that day's pollutant readings
    pub fn on_date(mut self, date: NaiveDate, pollutants: &'a BTreeMap<String, f64>) -> Self {
        self.date = Some(date);
        self.pollutants = Some(pollutants);
        self
    }
}

/// Whether the advisory text came from the service
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AdvisoryStatus {
    Generated,
    Unavailable { reason: String },
}

/// Recommendation / explanation pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Advisory {
    pub recommendation: String,
    pub explanation: String,
    #[serde(flatten)]
    pub status: AdvisoryStatus,
}

impl Advisory {
    /// Sentinel advisory for a failed or skipped service call
    pub fn unavailable(error: &AdvisoryError) -> Self {
        Self {
            recommendation: NOT_GENERATED.to_string(),
            explanation: NO_RESPONSE.to_string(),
            status: AdvisoryStatus::Unavailable {
                reason: error.to_string(),
            },
        }
    }

    /// Whether the text came from the service
    pub fn is_generated(&self) -> bool {
        self.status == AdvisoryStatus::Generated
    }
}

/// Builds prompts, calls the text generator and parses its reply
pub struct AdvisoryRequester {
    generator: Box<dyn TextGenerator>,
}

impl std::fmt::Debug for AdvisoryRequester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdvisoryRequester")
            .field("generator", &self.generator.name())
            .finish()
    }
}

impl AdvisoryRequester {
    /// Use an explicit generator
    pub fn new(generator: Box<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Build the generator described by `config`
    pub fn from_config(config: &AdvisoryConfig) -> Result<Self> {
        Ok(Self::new(client_from_config(config)?))
    }

    /// Name of the underlying generator
    pub fn generator_name(&self) -> &str {
        self.generator.name()
    }

    /// Send `prompt` to the generator; blank replies count as failures
    pub fn request_advisory(&self, prompt: &str) -> std::result::Result<String, AdvisoryError> {
        let reply = self.generator.generate(prompt)?;
        if reply.trim().is_empty() {
            return Err(AdvisoryError::EmptyResponse);
        }
        Ok(reply)
    }

    /// Prompt, request and parse; failures become a sentinel advisory
    pub fn advise(&self, facts: &PromptFacts<'_>) -> Advisory {
        let prompt = build_prompt(facts);

        match self.request_advisory(&prompt) {
            Ok(reply) => {
                info!(generator = self.generator.name(), "advisory generated");
                let (recommendation, explanation) = parse_advisory(&reply);
                Advisory {
                    recommendation,
                    explanation,
                    status: AdvisoryStatus::Generated,
                }
            }
            Err(AdvisoryError::Disabled) => {
                info!("advisory generation disabled");
                Advisory::unavailable(&AdvisoryError::Disabled)
            }
            Err(err) => {
                warn!(generator = self.generator.name(), error = %err, "advisory unavailable");
                Advisory::unavailable(&err)
            }
        }
    }
}

fn format_values(values: &[f64]) -> String {
    let items: Vec<String> = values.iter().map(|v| format!("{:.2}", v)).collect();
    format!("[{}]", items.join(", "))
}

/// Deterministic prompt text for `facts`
pub fn build_prompt(facts: &PromptFacts<'_>) -> String {
    let mut prompt = String::from("You are an AI health & environment analyst.\n");
    if let Some(date) = facts.date {
        prompt.push_str(&format!("Date of latest reading: {}\n", date));
    }
    prompt.push_str(&format!("Given AQI history: {}\n", format_values(facts.history)));
    prompt.push_str(&format!(
        "Forecasted next {} AQI values: {}\n",
        facts.forecast.len(),
        format_values(facts.forecast)
    ));
    prompt.push_str(&format!("Trend: {}\n", facts.trend.description()));
    prompt.push_str(&format!("Health Risk: {}\n", facts.risk.message()));

    if let Some(pollutants) = facts.pollutants.filter(|p| !p.is_empty()) {
        let readings: Vec<String> = pollutants
            .iter()
            .map(|(name, value)| format!("{}={:.2}", name, value))
            .collect();
        prompt.push_str(&format!("Pollutant readings: {}\n", readings.join(", ")));
    }

    prompt.push_str("\nProvide:\n");
    prompt.push_str("1. Health & safety recommendations.\n");
    prompt.push_str("2. Steps to reduce pollution exposure.\n");
    prompt
}

/// Split a reply into `(recommendation, explanation)` at its first line break
///
/// Leading blank lines are ignored. Without a line break the whole reply is
/// the explanation and the recommendation is [`NOT_GENERATED`]; a blank
/// reply yields both sentinels.
pub fn parse_advisory(raw: &str) -> (String, String) {
    let text = raw.trim_start();
    if text.trim().is_empty() {
        return (NOT_GENERATED.to_string(), NO_RESPONSE.to_string());
    }

    match text.split_once('\n') {
        Some((first, rest)) => (first.trim().to_string(), rest.trim().to_string()),
        None => (NOT_GENERATED.to_string(), text.trim().to_string()),
    }
}
