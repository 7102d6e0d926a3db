//! Error types for quiz generation, scoring, prediction, and sessions.
//!
//! Predictor errors are defined here rather than in `iqplace-predictors` so
//! that the session layer can classify failures without string matching.

use thiserror::Error;

/// Failures while generating or scoring a quiz.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    /// A category has fewer questions than the per-category draw.
    #[error("insufficient questions in category '{category}': {available} available, {required} required")]
    InsufficientQuestions {
        category: String,
        available: usize,
        required: usize,
    },

    /// The answer count does not match the quiz length.
    #[error("misaligned answers: got {answers} answer(s) for {questions} question(s)")]
    MisalignedAnswers { answers: usize, questions: usize },

    /// An answer refers to an option the question does not have.
    #[error("answer {option} at position {position} is out of range ({option_count} options)")]
    InvalidOption {
        position: usize,
        option: usize,
        option_count: usize,
    },

    /// The quiz would contain (or contains) no questions.
    #[error("quiz has no questions")]
    EmptyQuiz,
}

/// Errors returned by a placement predictor.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictorError {
    /// The model or service could not be reached or is not loaded.
    #[error("predictor unavailable: {0}")]
    Unavailable(String),

    /// The predictor rejected the input.
    #[error("invalid prediction input: {0}")]
    InvalidInput(String),

    /// The predictor answered with something outside the contract.
    #[error("invalid predictor response: {0}")]
    InvalidResponse(String),

    /// The request timed out.
    #[error("prediction timed out after {0}s")]
    Timeout(u64),

    /// The prediction service returned an error response.
    #[error("predictor API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },
}

impl PredictorError {
    /// Returns `true` if the caller's input was at fault, so retrying with
    /// the same values cannot succeed.
    pub fn is_input_error(&self) -> bool {
        matches!(self, PredictorError::InvalidInput(_))
    }
}

/// Errors surfaced by a [`Session`](crate::session::Session).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("no quiz has been started; start the IQ test first")]
    QuizNotStarted,

    #[error("the IQ test is not finished yet ({answered}/{total} answered); complete it first")]
    QuizInProgress { answered: usize, total: usize },

    #[error("the IQ test is already completed; retake it to answer again")]
    QuizAlreadyCompleted,

    #[error(transparent)]
    Quiz(#[from] QuizError),

    #[error("prediction failed: {0}")]
    Prediction(#[from] PredictorError),
}

impl SessionError {
    /// Returns `true` when the error means a prior step must be completed
    /// first, as opposed to a genuine failure.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            SessionError::QuizNotStarted
                | SessionError::QuizInProgress { .. }
                | SessionError::QuizAlreadyCompleted
        )
    }
}

/// Errors while loading a question bank.
#[derive(Debug, Error)]
pub enum BankError {
    #[error("failed to parse question bank {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    #[error("question {index} in category '{category}' has correct index {correct} but only {option_count} options")]
    InvalidCorrectIndex {
        category: String,
        index: usize,
        correct: usize,
        option_count: usize,
    },

    #[error("question {index} in category '{category}' has no options")]
    NoOptions { category: String, index: usize },

    #[error("duplicate category: {0}")]
    DuplicateCategory(String),

    #[error("question {index} in category '{category}' repeats an earlier prompt: {prompt}")]
    DuplicateQuestion {
        category: String,
        index: usize,
        prompt: String,
    },

    #[error("unknown difficulty '{0}' (expected easy, medium, or hard)")]
    UnknownDifficulty(String),
}
