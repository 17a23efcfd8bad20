//! Question Bank: per-topic pools of interview questions.
//!
//! Pools are append-only. A topic's pool is materialized from the built-in
//! defaults the first time the topic comes up, so the bank grows as
//! conversations wander into new subjects.

use crate::core::session::Topic;
use crate::error::Result;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Built-in questions for a topic.
#[must_use]
pub fn default_pool(topic: Topic) -> &'static [&'static str] {
    match topic {
        Topic::General => &[
            "Tell me more about that.",
            "How did that make you feel?",
            "What happened next?",
            "Can you explain that in a bit more detail?",
        ],
        Topic::Childhood => &[
            "What was your favorite game to play as a child?",
            "Who was your best friend growing up, and what did you do together?",
            "Can you describe the house you grew up in?",
            "What is your earliest memory?",
        ],
        Topic::Family => &[
            "What was your grandmother or grandfather like?",
            "What traditions did your family keep when you were young?",
            "How did you meet your partner?",
            "What is something your parents taught you that stayed with you?",
        ],
        Topic::Career => &[
            "What was your first job?",
            "Did you have a mentor who influenced your career path?",
            "What was the biggest challenge you faced in your work?",
            "What are you most proud of from your professional life?",
        ],
        Topic::Travel => &[
            "What was the most memorable trip you ever took?",
            "Was there a place you visited that changed how you saw the world?",
            "How did people travel when you were young?",
            "Where would you go again if you could?",
        ],
        Topic::Hardship => &[
            "Would you like to tell me more about them?",
            "Who helped you through that time?",
            "How did you find the strength to carry on?",
            "What would you like others to remember about that time?",
        ],
        Topic::Wartime => &[
            "What do you remember about daily life during the war?",
            "How did the war change your family?",
            "Were you or someone close to you in the service?",
            "What news do you remember hearing when the war ended?",
        ],
        Topic::Education => &[
            "What was your school like?",
            "Was there a teacher you still remember?",
            "What subject did you love most, and why?",
            "What did you do after you finished your studies?",
        ],
    }
}

/// Topics seeded at construction; everything else is materialized on demand.
const SEEDED: [Topic; 3] = [Topic::General, Topic::Childhood, Topic::Career];

/// Shared, append-only mapping from topic to ordered, duplicate-free questions.
#[derive(Debug)]
pub struct QuestionBank {
    pools: RwLock<HashMap<Topic, Vec<String>>>,
}

impl QuestionBank {
    /// Create a bank with the seeded topics.
    #[must_use]
    pub fn new() -> Self {
        let pools = SEEDED
            .into_iter()
            .map(|topic| (topic, owned(default_pool(topic))))
            .collect();
        Self {
            pools: RwLock::new(pools),
        }
    }

    /// Create a bank and append extra questions keyed by topic name.
    ///
    /// # Errors
    ///
    /// Returns `UnknownTopic` if a key is not a known topic name.
    pub fn with_extra(extra: &HashMap<String, Vec<String>>) -> Result<Self> {
        let bank = Self::new();
        for (name, questions) in extra {
            let topic: Topic = name.parse()?;
            bank.ensure_topic(topic);
            bank.extend(topic, questions.iter().cloned());
        }
        Ok(bank)
    }

    /// Current pool for `topic`, without materializing it.
    #[must_use]
    pub fn pool(&self, topic: Topic) -> Option<Vec<String>> {
        self.pools
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&topic)
            .cloned()
    }

    /// Pool for `topic`, materializing the defaults on first use.
    pub fn ensure_topic(&self, topic: Topic) -> Vec<String> {
        if let Some(pool) = self.pool(topic) {
            return pool;
        }
        let mut pools = self.pools.write().unwrap_or_else(PoisonError::into_inner);
        pools
            .entry(topic)
            .or_insert_with(|| {
                tracing::debug!(topic = %topic, "materializing question pool");
                owned(default_pool(topic))
            })
            .clone()
    }

    /// Append questions to a topic's pool, skipping ones already present.
    pub fn extend(&self, topic: Topic, questions: impl IntoIterator<Item = String>) {
        let mut pools = self.pools.write().unwrap_or_else(PoisonError::into_inner);
        let pool = pools.entry(topic).or_default();
        for question in questions {
            let question = question.trim().to_string();
            if !question.is_empty() && !pool.contains(&question) {
                pool.push(question);
            }
        }
    }

    /// Topics with a materialized pool.
    #[must_use]
    pub fn topics(&self) -> Vec<Topic> {
        let mut topics: Vec<Topic> = self
            .pools
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .copied()
            .collect();
        topics.sort();
        topics
    }
}

impl Default for QuestionBank {
    fn default() -> Self {
        Self::new()
    }
}

fn owned(questions: &[&str]) -> Vec<String> {
    questions.iter().map(|q| (*q).to_string()).collect()
}
