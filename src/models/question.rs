use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

use super::difficulty::Difficulty;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Label {
    A,
    B,
    C,
    D,
}

impl Label {
    pub const ALL: [Label; 4] = [Label::A, Label::B, Label::C, Label::D];

    fn index(self) -> usize {
        match self {
            Label::A => 0,
            Label::B => 1,
            Label::C => 2,
            Label::D => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Label::A => "A",
            Label::B => "B",
            Label::C => "C",
            Label::D => "D",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Label {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Label::A),
            "B" => Ok(Label::B),
            "C" => Ok(Label::C),
            "D" => Ok(Label::D),
            other => Err(format!("'{}' is not one of A-D", other)),
        }
    }
}

/// Exactly four option texts, one per label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<Label, String>",
    into = "BTreeMap<Label, String>"
)]
pub struct Options {
    texts: [String; 4],
}

impl Options {
    pub fn new(a: String, b: String, c: String, d: String) -> Self {
        Self { texts: [a, b, c, d] }
    }

    pub fn get(&self, label: Label) -> &str {
        &self.texts[label.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Label, &str)> {
        Label::ALL
            .into_iter()
            .zip(self.texts.iter().map(String::as_str))
    }

    /// First label, in A-D order, whose text equals `text`.
    pub fn label_of(&self, text: &str) -> Option<Label> {
        self.iter().find(|(_, t)| *t == text).map(|(l, _)| l)
    }

    pub fn into_texts(self) -> [String; 4] {
        self.texts
    }
}

impl TryFrom<BTreeMap<Label, String>> for Options {
    type Error = String;

    fn try_from(mut map: BTreeMap<Label, String>) -> Result<Self, Self::Error> {
        if map.len() != 4 {
            return Err(format!("expected options A-D, got {} entries", map.len()));
        }
        let mut take = |l: Label| map.remove(&l).ok_or_else(|| format!("missing option {}", l));
        Ok(Options::new(
            take(Label::A)?,
            take(Label::B)?,
            take(Label::C)?,
            take(Label::D)?,
        ))
    }
}

impl From<Options> for BTreeMap<Label, String> {
    fn from(options: Options) -> Self {
        Label::ALL.into_iter().zip(options.texts).collect()
    }
}

/// A parsed and validated question as the model produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedQuestion {
    pub question: String,
    pub options: Options,
    pub answer: Label,
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: Uuid,
    pub category: String,
    pub difficulty: Difficulty,
    pub question: String,
    pub options: Options,
    pub answer: Label,
    pub explanation: String,
}

impl QuestionRecord {
    pub fn new(category: &str, difficulty: Difficulty, generated: GeneratedQuestion) -> Self {
        Self {
            id: Uuid::new_v4(),
            category: category.to_string(),
            difficulty,
            question: generated.question,
            options: generated.options,
            answer: generated.answer,
            explanation: generated.explanation,
        }
    }

    pub fn correct_text(&self) -> &str {
        self.options.get(self.answer)
    }
}
