//! Core data model types for iqplace.
//!
//! Questions, quiz instances, scores, and the closed label sets that user
//! input is validated against before it reaches the scorer or a predictor.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How hard a question is. Drives the scorer's difficulty bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Bonus points added to the IQ estimate for a correct answer.
    pub fn bonus(self) -> u32 {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Medium => 1,
            Difficulty::Hard => 2,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// The question text shown to the user.
    pub prompt: String,
    /// Answer options, in presentation order.
    pub options: Vec<String>,
    /// 0-based index of the correct option.
    pub correct: usize,
    pub difficulty: Difficulty,
}

/// A question drawn into a quiz, tagged with the category it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizItem {
    pub category: String,
    pub question: Question,
}

impl QuizItem {
    pub fn correct(&self) -> usize {
        self.question.correct
    }

    pub fn difficulty(&self) -> Difficulty {
        self.question.difficulty
    }

    pub fn option_count(&self) -> usize {
        self.question.options.len()
    }
}

/// An ordered, generated quiz. Order defines presentation and the
/// alignment of answers to questions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuizInstance {
    items: Vec<QuizItem>,
}

impl QuizInstance {
    pub fn new(items: Vec<QuizItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[QuizItem] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&QuizItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Chosen option indices, one per quiz item, aligned by position.
pub type AnswerSet = [usize];

/// Outcome of scoring an answer set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// IQ estimate in [70, 160], rounded to one decimal.
    pub iq_score: f64,
    /// Number of correctly answered items.
    pub correct_count: usize,
    /// Number of items in the quiz.
    pub total: usize,
}

impl ScoreResult {
    /// Fraction of items answered correctly, in [0, 1].
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct_count as f64 / self.total as f64
        }
    }
}

/// Binary placement outcome. Encoded as `1` / `0` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placement {
    Placed,
    NotPlaced,
}

impl Placement {
    pub fn as_flag(self) -> u8 {
        match self {
            Placement::Placed => 1,
            Placement::NotPlaced => 0,
        }
    }

    pub fn from_flag(flag: u8) -> Option<Self> {
        match flag {
            1 => Some(Placement::Placed),
            0 => Some(Placement::NotPlaced),
            _ => None,
        }
    }

    pub fn is_placed(self) -> bool {
        self == Placement::Placed
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Placement::Placed => write!(f, "Placed"),
            Placement::NotPlaced => write!(f, "Not Placed"),
        }
    }
}

impl Serialize for Placement {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_flag())
    }
}

impl<'de> Deserialize<'de> for Placement {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let flag = u8::deserialize(deserializer)?;
        Placement::from_flag(flag)
            .ok_or_else(|| serde::de::Error::custom(format!("placement must be 0 or 1, got {flag}")))
    }
}

/// Ground-truth placement as reported by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlacementStatus {
    Placed,
    NotPlaced,
    #[default]
    Undecided,
}

impl PlacementStatus {
    /// The known outcome, if any.
    pub fn outcome(self) -> Option<Placement> {
        match self {
            PlacementStatus::Placed => Some(Placement::Placed),
            PlacementStatus::NotPlaced => Some(Placement::NotPlaced),
            PlacementStatus::Undecided => None,
        }
    }
}

impl fmt::Display for PlacementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementStatus::Placed => write!(f, "Placed"),
            PlacementStatus::NotPlaced => write!(f, "Not Placed"),
            PlacementStatus::Undecided => write!(f, "Not Yet Decided"),
        }
    }
}

impl FromStr for PlacementStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "placed" | "yes" | "1" => Ok(PlacementStatus::Placed),
            "notplaced" | "no" | "0" => Ok(PlacementStatus::NotPlaced),
            "notyetdecided" | "undecided" | "" => Ok(PlacementStatus::Undecided),
            _ => Err(format!("unknown placement status: {}", s.trim())),
        }
    }
}

/// Academic branch / department.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Branch {
    #[serde(rename = "Computer Science")]
    ComputerScience,
    #[serde(rename = "IT")]
    It,
    #[serde(rename = "ECE")]
    Ece,
    #[serde(rename = "EEE")]
    Eee,
    Mechanical,
    Civil,
    Other,
}

impl Branch {
    pub const ALL: [Branch; 7] = [
        Branch::ComputerScience,
        Branch::It,
        Branch::Ece,
        Branch::Eee,
        Branch::Mechanical,
        Branch::Civil,
        Branch::Other,
    ];
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Branch::ComputerScience => "Computer Science",
            Branch::It => "IT",
            Branch::Ece => "ECE",
            Branch::Eee => "EEE",
            Branch::Mechanical => "Mechanical",
            Branch::Civil => "Civil",
            Branch::Other => "Other",
        };
        f.write_str(label)
    }
}

impl FromStr for Branch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "computerscience" | "cs" | "cse" => Ok(Branch::ComputerScience),
            "it" => Ok(Branch::It),
            "ece" => Ok(Branch::Ece),
            "eee" => Ok(Branch::Eee),
            "mechanical" | "mech" => Ok(Branch::Mechanical),
            "civil" => Ok(Branch::Civil),
            "other" => Ok(Branch::Other),
            _ => Err(format!("unknown branch: {}", s.trim())),
        }
    }
}

/// Year of study.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Year {
    #[serde(rename = "1st Year")]
    First,
    #[serde(rename = "2nd Year")]
    Second,
    #[serde(rename = "3rd Year")]
    Third,
    #[serde(rename = "4th Year")]
    Fourth,
    Graduated,
}

impl Year {
    pub const ALL: [Year; 5] = [
        Year::First,
        Year::Second,
        Year::Third,
        Year::Fourth,
        Year::Graduated,
    ];
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Year::First => "1st Year",
            Year::Second => "2nd Year",
            Year::Third => "3rd Year",
            Year::Fourth => "4th Year",
            Year::Graduated => "Graduated",
        };
        f.write_str(label)
    }
}

impl FromStr for Year {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "1styear" | "1st" | "1" | "first" => Ok(Year::First),
            "2ndyear" | "2nd" | "2" | "second" => Ok(Year::Second),
            "3rdyear" | "3rd" | "3" | "third" => Ok(Year::Third),
            "4thyear" | "4th" | "4" | "fourth" => Ok(Year::Fourth),
            "graduated" | "graduate" => Ok(Year::Graduated),
            _ => Err(format!("unknown year: {}", s.trim())),
        }
    }
}

/// The user-entered half of a placement prediction request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AcademicProfile {
    /// Cumulative GPA on a 0-10 scale.
    pub cgpa: f64,
    pub branch: Branch,
    pub year: Year,
    #[serde(default)]
    pub status: PlacementStatus,
}

/// Lowercase and drop whitespace, hyphens, and underscores.
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_display_and_parse() {
        assert_eq!(Difficulty::Hard.to_string(), "hard");
        assert_eq!("Medium".parse::<Difficulty>().unwrap(), Difficulty::Medium);
        assert!("impossible".parse::<Difficulty>().is_err());
        assert_eq!(Difficulty::Easy.bonus(), 0);
        assert_eq!(Difficulty::Medium.bonus(), 1);
        assert_eq!(Difficulty::Hard.bonus(), 2);
    }

    #[test]
    fn placement_status_parses_form_labels() {
        assert_eq!(
            "Placed".parse::<PlacementStatus>().unwrap(),
            PlacementStatus::Placed
        );
        assert_eq!(
            "Not Placed".parse::<PlacementStatus>().unwrap(),
            PlacementStatus::NotPlaced
        );
        assert_eq!(
            "Not Yet Decided".parse::<PlacementStatus>().unwrap(),
            PlacementStatus::Undecided
        );
        assert_eq!(
            "".parse::<PlacementStatus>().unwrap(),
            PlacementStatus::Undecided
        );
        assert!("maybe".parse::<PlacementStatus>().is_err());
        assert_eq!(PlacementStatus::Undecided.outcome(), None);
    }

    #[test]
    fn branch_and_year_labels_round_trip() {
        for branch in Branch::ALL {
            assert_eq!(branch.to_string().parse::<Branch>().unwrap(), branch);
        }
        for year in Year::ALL {
            assert_eq!(year.to_string().parse::<Year>().unwrap(), year);
        }
        assert_eq!("cse".parse::<Branch>().unwrap(), Branch::ComputerScience);
        assert_eq!("4".parse::<Year>().unwrap(), Year::Fourth);
        assert!("Biology".parse::<Branch>().is_err());
    }

    #[test]
    fn placement_serializes_as_flag() {
        assert_eq!(serde_json::to_string(&Placement::Placed).unwrap(), "1");
        let parsed: Placement = serde_json::from_str("0").unwrap();
        assert_eq!(parsed, Placement::NotPlaced);
        assert!(serde_json::from_str::<Placement>("2").is_err());
    }

    #[test]
    fn branch_serializes_as_label() {
        let json = serde_json::to_string(&Branch::ComputerScience).unwrap();
        assert_eq!(json, "\"Computer Science\"");
        let year: Year = serde_json::from_str("\"3rd Year\"").unwrap();
        assert_eq!(year, Year::Third);
    }

    #[test]
    fn accuracy_of_empty_score_is_zero() {
        let score = ScoreResult {
            iq_score: 70.0,
            correct_count: 0,
            total: 0,
        };
        assert_eq!(score.accuracy(), 0.0);
    }
}
