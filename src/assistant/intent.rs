//! Keyword intent classifier
//!
//! Maps an utterance onto one of a fixed set of feed categories by keyword
//! containment. Rules are evaluated in priority order and the first match
//! wins; nothing matched yields a clarification prompt.

use super::conversation::Intent;

/// Reply when no rule matches
pub const CLARIFICATION_PROMPT: &str = "I'm not sure what you're looking for. Could you be more specific about the type of places you want to see?";

/// One row of the decision table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntentRule {
    pub category: &'static str,
    pub keywords: &'static [&'static str],
    pub response: &'static str,
}

impl IntentRule {
    /// `lowered` must already be lowercase
    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k))
    }
}

/// Built-in rules in priority order
pub const DEFAULT_RULES: &[IntentRule] = &[
    IntentRule {
        category: "food",
        keywords: &["food", "eat", "restaurant"],
        response: "I've updated your feed with the best food spots in Singapore! Check out the famous hawker centers for authentic local cuisine.",
    },
    IntentRule {
        category: "beach",
        keywords: &["beach", "relax", "swim"],
        response: "Looking for some beach time? Sentosa Island has beautiful beaches for relaxation and fun water activities.",
    },
    IntentRule {
        category: "shopping",
        keywords: &["shopping", "mall", "buy"],
        response: "Singapore is a shopping paradise! I've shown you some great shopping destinations from luxury malls to local markets.",
    },
    IntentRule {
        category: "cultural",
        keywords: &["culture", "history", "temple"],
        response: "I've found some cultural attractions that showcase Singapore's rich heritage. You'll love exploring these diverse neighborhoods!",
    },
    IntentRule {
        category: "attraction",
        keywords: &["attraction", "tourist", "visit"],
        response: "Here are Singapore's top attractions that you shouldn't miss during your visit!",
    },
];

/// Classifier output: what to say, how the utterance was read, and the
/// category the caller should activate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub response: String,
    pub intent: Intent,
    pub category: Option<String>,
}

/// Ordered keyword decision table
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    rules: &'static [IntentRule],
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_RULES)
    }
}

impl IntentClassifier {
    pub fn new(rules: &'static [IntentRule]) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[IntentRule] {
        self.rules
    }

    /// First rule whose keywords appear in the utterance
    pub fn matching_rule(&self, utterance: &str) -> Option<&IntentRule> {
        let lowered = utterance.to_lowercase();
        self.rules.iter().find(|rule| rule.matches(&lowered))
    }

    /// Classify an utterance. Total: every input yields a response.
    pub fn classify(&self, utterance: &str) -> Classification {
        match self.matching_rule(utterance) {
            Some(rule) => {
                tracing::debug!(category = rule.category, "Utterance matched intent rule");
                Classification {
                    response: rule.response.to_string(),
                    intent: Intent::filter(
                        rule.category,
                        rule.keywords.iter().map(|k| k.to_string()).collect(),
                    ),
                    category: Some(rule.category.to_string()),
                }
            }
            None => {
                tracing::debug!("Utterance matched no intent rule");
                Classification {
                    response: CLARIFICATION_PROMPT.to_string(),
                    intent: Intent::info(),
                    category: None,
                }
            }
        }
    }
}

/// Classify with the built-in rules
pub fn classify(utterance: &str) -> Classification {
    IntentClassifier::default().classify(utterance)
}
