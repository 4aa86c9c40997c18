//! Review sentiment, from the sentiment service or a keyword heuristic.

use anyhow::Context;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::model::Sentiment;

const POSITIVE_WORDS: [&str; 6] = ["great", "excellent", "good", "amazing", "wonderful", "fantastic"];
const NEGATIVE_WORDS: [&str; 6] = ["bad", "terrible", "awful", "horrible", "worst", "disappointing"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    Remote(Sentiment),
    Fallback(Sentiment),
}

impl Classification {
    pub fn sentiment(self) -> Sentiment {
        match self {
            Classification::Remote(sentiment) | Classification::Fallback(sentiment) => sentiment,
        }
    }
}

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct AnalyzeResponse {
    #[serde(default)]
    sentiment: Option<Sentiment>,
}

#[derive(Clone)]
pub struct SentimentService {
    client: reqwest::Client,
    base_url: String,
}

impl SentimentService {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> SentimentService {
        SentimentService {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn classify(&self, text: &str) -> Classification {
        match self.analyze(text).await {
            Ok(sentiment) => Classification::Remote(sentiment),
            Err(err) => {
                warn!("sentiment service unavailable ({:#}). using keyword heuristic", err);
                Classification::Fallback(heuristic(text))
            }
        }
    }

    async fn analyze(&self, text: &str) -> anyhow::Result<Sentiment> {
        let url = format!("{}/analyze", self.base_url);
        trace!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(&AnalyzeRequest { text })
            .send()
            .await
            .with_context(|| format!("failed to reach {}", url))?;

        let status = response.status();
        if status != StatusCode::OK {
            anyhow::bail!("{} answered {}", url, status);
        }

        let body = response
            .json::<AnalyzeResponse>()
            .await
            .with_context(|| format!("failed to decode response from {}", url))?;
        Ok(body.sentiment.unwrap_or_default())
    }
}

/// Counts how many lexicon words appear anywhere in `text`, ignoring case.
/// Containment is by substring, so "goodness" counts as "good".
pub fn heuristic(text: &str) -> Sentiment {
    let text = text.to_lowercase();
    let count = |words: &[&str]| words.iter().filter(|word| text.contains(*word)).count();

    let positive = count(&POSITIVE_WORDS);
    let negative = count(&NEGATIVE_WORDS);

    match positive.cmp(&negative) {
        std::cmp::Ordering::Greater => Sentiment::Positive,
        std::cmp::Ordering::Less => Sentiment::Negative,
        std::cmp::Ordering::Equal => Sentiment::Neutral,
    }
}
