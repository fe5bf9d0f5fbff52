//! Deterministic question interpreter: free text -> TimeExpressionKind.
//!
//! Plain keyword rules, no model involved. Questions that name a period the
//! resolver has no kind for come back as `Unsupported` so the caller can say
//! it cannot interpret them instead of silently widening the scope.

use anyhow::Result;
use raseed_core::TimeExpressionKind;
use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interpretation {
    Kind(TimeExpressionKind),
    /// A temporal phrase was found but has no matching kind
    Unsupported(String),
}

pub struct QuestionInterpreter {
    rules: Vec<(TimeExpressionKind, Regex)>,
    unsupported: Regex,
}

impl QuestionInterpreter {
    pub fn new() -> Result<Self> {
        let rules = vec![
            (
                TimeExpressionKind::ThisMonth,
                Regex::new(r"\b(this|current)\s+month\b|\bmonth[\s-]+to[\s-]+date\b")?,
            ),
            (
                TimeExpressionKind::LastMonth,
                Regex::new(r"\b(last|previous|past|prior)\s+month\b|\ba\s+month\s+ago\b")?,
            ),
            (
                TimeExpressionKind::ThisWeek,
                Regex::new(r"\b(this|current)\s+week\b|\bweek[\s-]+to[\s-]+date\b")?,
            ),
            (
                TimeExpressionKind::LastWeek,
                Regex::new(r"\b(last|previous|past|prior)\s+week\b|\ba\s+week\s+ago\b")?,
            ),
        ];

        // Bare "may" is too common a verb; only count it after a preposition.
        // Relative spans need a quantity word, so plain "last month" stays a rule.
        let unsupported = Regex::new(concat!(
            r"\b(today|yesterday|tomorrow|tonight|weekend|quarter|",
            r"(this|last|next|previous|past)\s+year|next\s+(week|month)|",
            r"(last|past|previous|prior)\s+(\w+\s+){1,2}(days|weeks|months|years)|",
            r"\w+\s+(days|weeks|months|years)\s+ago|a\s+year\s+ago|",
            r"(in|during|since)\s+(19|20)\d{2}|(19|20)\d{2}|",
            r"(in|during|for|since|until|of)\s+may|",
            r"january|february|march|april|june|july|august|september|october|november|december|",
            r"jan|feb|mar|apr|jun|jul|aug|sept?|oct|nov|dec)\b"
        ))?;

        Ok(Self { rules, unsupported })
    }

    pub fn interpret(&self, question: &str) -> Interpretation {
        let q = question.to_lowercase();

        let mut found: Vec<(usize, TimeExpressionKind, String)> = Vec::new();
        for (kind, re) in &self.rules {
            if let Some(m) = re.find(&q) {
                found.push((m.start(), *kind, m.as_str().to_string()));
            }
        }

        if let Some(m) = self.unsupported.find(&q) {
            return Interpretation::Unsupported(m.as_str().to_string());
        }

        match found.len() {
            0 => Interpretation::Kind(TimeExpressionKind::Unbounded),
            1 => Interpretation::Kind(found[0].1),
            _ => {
                // Comparisons span two windows; one grounded window cannot cover them
                found.sort_by_key(|(start, _, _)| *start);
                let phrases: Vec<_> = found.into_iter().map(|(_, _, p)| p).collect();
                Interpretation::Unsupported(phrases.join(" and "))
            }
        }
    }
}
