//! Per-user session state: the current quiz, its answers, and the record
//! store. Each user gets their own `Session`; nothing here is shared.

use chrono::Local;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::bank::QuestionBank;
use crate::error::{PredictorError, QuizError, SessionError};
use crate::generator::generate;
use crate::model::{AcademicProfile, QuizInstance, QuizItem, ScoreResult};
use crate::report::SessionReport;
use crate::scorer::score;
use crate::statistics::SessionSummary;
use crate::store::{SessionRecord, SessionRecordStore};
use crate::traits::{PlacementPredictor, PredictionInput, PredictionResult};

/// How far through the current quiz the user is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizProgress {
    pub answered: usize,
    pub total: usize,
}

impl QuizProgress {
    /// Completed fraction in [0, 1].
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.answered as f64 / self.total as f64
        }
    }
}

/// Result of submitting one answer.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerOutcome {
    /// More questions remain.
    Next(QuizProgress),
    /// That was the last question; the quiz has been scored.
    Completed(ScoreResult),
}

/// A single user's session.
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    quiz: Option<QuizInstance>,
    answers: Vec<usize>,
    score: Option<ScoreResult>,
    store: SessionRecordStore,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            quiz: None,
            answers: Vec::new(),
            score: None,
            store: SessionRecordStore::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Generate a fresh quiz, discarding any previous quiz, answers, and score.
    ///
    /// On failure the session is left as it was.
    pub fn start_quiz<R: Rng + ?Sized>(
        &mut self,
        bank: &QuestionBank,
        per_category: usize,
        rng: &mut R,
    ) -> Result<&QuizInstance, SessionError> {
        let quiz = generate(bank, per_category, rng)?;
        tracing::debug!("session {}: started quiz with {} items", self.id, quiz.len());
        self.answers.clear();
        self.score = None;
        Ok(self.quiz.insert(quiz))
    }

    pub fn quiz(&self) -> Option<&QuizInstance> {
        self.quiz.as_ref()
    }

    /// The question awaiting an answer, if a quiz is in progress.
    pub fn current_item(&self) -> Option<&QuizItem> {
        if self.score.is_some() {
            return None;
        }
        self.quiz.as_ref()?.get(self.answers.len())
    }

    pub fn progress(&self) -> Option<QuizProgress> {
        self.quiz.as_ref().map(|q| QuizProgress {
            answered: self.answers.len(),
            total: q.len(),
        })
    }

    pub fn answers(&self) -> &[usize] {
        &self.answers
    }

    pub fn is_completed(&self) -> bool {
        self.score.is_some()
    }

    /// Score of the completed quiz.
    pub fn score(&self) -> Option<ScoreResult> {
        self.score
    }

    /// Record the answer to the current question. Scores the quiz when the
    /// last question is answered.
    pub fn submit_answer(&mut self, option: usize) -> Result<AnswerOutcome, SessionError> {
        let quiz = self.quiz.as_ref().ok_or(SessionError::QuizNotStarted)?;
        if self.score.is_some() {
            return Err(SessionError::QuizAlreadyCompleted);
        }

        let position = self.answers.len();
        let item = quiz.get(position).ok_or(SessionError::QuizAlreadyCompleted)?;
        if option >= item.option_count() {
            return Err(QuizError::InvalidOption {
                position,
                option,
                option_count: item.option_count(),
            }
            .into());
        }
        self.answers.push(option);

        if self.answers.len() < quiz.len() {
            return Ok(AnswerOutcome::Next(QuizProgress {
                answered: self.answers.len(),
                total: quiz.len(),
            }));
        }

        let result = score(&self.answers, quiz)?;
        tracing::info!(
            "session {}: quiz completed, iq {} ({}/{} correct)",
            self.id,
            result.iq_score,
            result.correct_count,
            result.total
        );
        self.score = Some(result);
        Ok(AnswerOutcome::Completed(result))
    }

    /// Drop the current quiz so a new one can be started. Records are kept.
    pub fn retake(&mut self) {
        self.quiz = None;
        self.answers.clear();
        self.score = None;
    }

    /// Ask `predictor` for a placement prediction using the completed quiz
    /// score and `profile`.
    ///
    /// Exactly one record is appended on success. On any failure the record
    /// store is left untouched, and the call may be retried.
    pub async fn request_prediction(
        &mut self,
        predictor: &dyn PlacementPredictor,
        profile: &AcademicProfile,
    ) -> Result<(PredictionResult, SessionRecord), SessionError> {
        let score = match (&self.quiz, self.score) {
            (None, _) => return Err(SessionError::QuizNotStarted),
            (Some(quiz), None) => {
                return Err(SessionError::QuizInProgress {
                    answered: self.answers.len(),
                    total: quiz.len(),
                })
            }
            (Some(_), Some(score)) => score,
        };

        let input = PredictionInput::new(profile.cgpa, score.iq_score)?;
        let result = predictor.predict(&input).await.map_err(|e| {
            tracing::warn!(
                "session {}: predictor '{}' failed: {e}",
                self.id,
                predictor.name()
            );
            e
        })?;

        if !result.confidence.is_finite() || !(0.0..=1.0).contains(&result.confidence) {
            return Err(PredictorError::InvalidResponse(format!(
                "confidence must be within [0, 1], got {}",
                result.confidence
            ))
            .into());
        }

        let record = SessionRecord {
            cgpa: input.cgpa,
            iq_score: input.iq_score,
            branch: profile.branch,
            year: profile.year,
            predicted_placement: result.placement,
            confidence: result.confidence,
            dominant_factor: result.dominant_factor.clone(),
            actual_placement: profile.status,
            timestamp: Local::now(),
        };
        self.store.append(record.clone());

        tracing::info!(
            "session {}: predicted {} ({:.1}% confidence, key factor {}); {} record(s)",
            self.id,
            result.placement,
            result.confidence * 100.0,
            result.dominant_factor,
            self.store.len()
        );

        Ok((result, record))
    }

    pub fn records(&self) -> &SessionRecordStore {
        &self.store
    }

    pub fn summary(&self) -> SessionSummary {
        self.store.summary()
    }

    /// Snapshot of this session's records for export.
    pub fn report(&self) -> SessionReport {
        SessionReport::new(self.id, self.store.all().to_vec())
    }
}
