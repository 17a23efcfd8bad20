//! Signal providers: sentiment and keyword analysis of user utterances.
//!
//! Providers are external collaborators. The interview core only consumes
//! their outputs, and any provider that fails or runs past its budget is
//! replaced by "no signal" for that turn.

pub mod keywords;
pub mod sentiment;
pub mod traits;

pub use keywords::PhraseDetector;
pub use sentiment::MarkerSentiment;
pub use traits::{
    Concept, ConceptLabel, Entity, KeywordDetector, KeywordSignal, SentimentAnalyzer,
    SentimentScores, SentimentSignal, SignalError, Tone,
};

use std::future::Future;
use std::time::Duration;

/// Signals gathered for one turn. `None` means the provider gave nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signals {
    /// Sentiment reading.
    pub sentiment: Option<SentimentSignal>,

    /// Keyword/entity reading.
    pub keywords: Option<KeywordSignal>,
}

impl Signals {
    /// No signals at all.
    #[must_use]
    pub fn neutral() -> Self {
        Self::default()
    }
}

/// Run both providers concurrently, each bounded by `timeout`.
pub async fn gather(
    sentiment: &dyn SentimentAnalyzer,
    keywords: &dyn KeywordDetector,
    text: &str,
    timeout: Duration,
) -> Signals {
    let (sentiment, keywords) = tokio::join!(
        bounded("sentiment", timeout, sentiment.analyze(text)),
        bounded("keywords", timeout, keywords.detect(text)),
    );
    Signals {
        sentiment,
        keywords,
    }
}

/// Await `call` for at most `timeout`, logging and discarding any failure.
async fn bounded<T, F>(provider: &'static str, timeout: Duration, call: F) -> Option<T>
where
    F: Future<Output = Result<T, SignalError>>,
{
    let outcome = match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(SignalError::TimedOut(
            u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        )),
    };

    match outcome {
        Ok(signal) => Some(signal),
        Err(e) => {
            tracing::warn!(provider, error = %e, "signal skipped for this turn");
            None
        }
    }
}
