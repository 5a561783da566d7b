//! Tolerant parsing of the model's evaluation reply.
//!
//! Two stages: strict JSON on the whole reply, then the greedy span from the
//! first `{` to the last `}`. Replies holding several unrelated brace groups
//! may still fail or parse the wrong span; that is accepted.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::models::fields::{lenient_list, lenient_score, lenient_text};

static BRACE_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

/// Structured evaluation recovered from a reply. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub education: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub languages: Vec<String>,
    #[serde(default, deserialize_with = "lenient_score")]
    pub score: Option<i64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub opinion: Option<String>,
}

/// Which stage produced the evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedReply {
    /// The whole reply was a JSON object.
    Clean(Evaluation),
    /// Only the brace-delimited span parsed; the model wrapped it in prose or fences.
    Recovered(Evaluation),
}

impl ParsedReply {
    pub fn is_recovered(&self) -> bool {
        matches!(self, ParsedReply::Recovered(_))
    }

    pub fn into_evaluation(self) -> Evaluation {
        match self {
            ParsedReply::Clean(e) | ParsedReply::Recovered(e) => e,
        }
    }
}

#[derive(Debug, Error)]
#[error("model reply is not recoverable JSON ({} chars)", .raw.chars().count())]
pub struct ParseError {
    /// The reply exactly as received, for operator diagnosis.
    pub raw: String,
}

pub fn parse_reply(raw: &str) -> Result<ParsedReply, ParseError> {
    if let Some(evaluation) = parse_object(raw) {
        return Ok(ParsedReply::Clean(evaluation));
    }

    if let Some(evaluation) = BRACE_SPAN
        .find(raw)
        .and_then(|span| parse_object(span.as_str()))
    {
        return Ok(ParsedReply::Recovered(evaluation));
    }

    Err(ParseError {
        raw: raw.to_string(),
    })
}

fn parse_object(text: &str) -> Option<Evaluation> {
    let value: Value = serde_json::from_str(text).ok()?;
    if !value.is_object() {
        return None;
    }
    serde_json::from_value(value).ok()
}
