//! IQ scoring.
//!
//! The estimate starts at [`IQ_FLOOR`], adds up to [`IQ_RANGE`] points in
//! proportion to the fraction answered correctly, then adds a bonus for each
//! correct medium or hard item. The clamp to `[IQ_FLOOR, IQ_CEILING]` is
//! applied last, so strong results on hard items can reach the ceiling.

use crate::error::QuizError;
use crate::model::{AnswerSet, QuizInstance, ScoreResult};

/// Lowest reportable IQ estimate.
pub const IQ_FLOOR: f64 = 70.0;
/// Highest reportable IQ estimate.
pub const IQ_CEILING: f64 = 160.0;
/// Points spanned by the accuracy term (0% -> 70, 100% -> 140).
pub const IQ_RANGE: f64 = 70.0;

/// Score `answers` against `quiz`, position by position.
pub fn score(answers: &AnswerSet, quiz: &QuizInstance) -> Result<ScoreResult, QuizError> {
    if answers.len() != quiz.len() {
        return Err(QuizError::MisalignedAnswers {
            answers: answers.len(),
            questions: quiz.len(),
        });
    }
    if quiz.is_empty() {
        return Err(QuizError::EmptyQuiz);
    }

    let mut correct_count = 0usize;
    let mut difficulty_bonus = 0u32;

    for (position, (&answer, item)) in answers.iter().zip(quiz.items()).enumerate() {
        if answer >= item.option_count() {
            return Err(QuizError::InvalidOption {
                position,
                option: answer,
                option_count: item.option_count(),
            });
        }
        if answer == item.correct() {
            correct_count += 1;
            difficulty_bonus += item.difficulty().bonus();
        }
    }

    let base_score = correct_count as f64 / quiz.len() as f64 * 100.0;
    let iq = IQ_FLOOR + (base_score / 100.0) * IQ_RANGE + difficulty_bonus as f64;
    let iq = iq.clamp(IQ_FLOOR, IQ_CEILING);

    Ok(ScoreResult {
        iq_score: round_one_decimal(iq),
        correct_count,
        total: quiz.len(),
    })
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::QuestionBank;
    use crate::generator::generate;
    use crate::model::{Difficulty, Question, QuizItem};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn item(category: &str, correct: usize, difficulty: Difficulty) -> QuizItem {
        QuizItem {
            category: category.into(),
            question: Question {
                prompt: format!("{category}-{correct}-{difficulty}"),
                options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                correct,
                difficulty,
            },
        }
    }

    fn quiz_of(items: Vec<QuizItem>) -> QuizInstance {
        QuizInstance::new(items)
    }

    /// Ten items from the built-in bank in a fixed order. Four of them have
    /// option A as the answer, one of which is medium.
    fn fixture_quiz() -> QuizInstance {
        let bank = QuestionBank::builtin().unwrap();
        let pick = |category: &str, index: usize| QuizItem {
            category: category.to_string(),
            question: bank.category(category).unwrap().questions[index].clone(),
        };
        quiz_of(vec![
            pick("Logical Reasoning", 2),    // A, easy
            pick("Spatial Reasoning", 1),    // D, hard
            pick("Logical Reasoning", 4),    // A, medium
            pick("Mathematical Ability", 1), // B, medium
            pick("Pattern Recognition", 2),  // A, easy
            pick("Verbal Reasoning", 1),     // A, easy
            pick("Mathematical Ability", 2), // B, hard
            pick("Pattern Recognition", 3),  // B, hard
            pick("Verbal Reasoning", 2),     // B, medium
            pick("Spatial Reasoning", 0),    // B, easy
        ])
    }

    #[test]
    fn all_index_zero_on_fixture() {
        let quiz = fixture_quiz();
        let answers = vec![0; quiz.len()];
        let result = score(&answers, &quiz).unwrap();
        // 4/10 correct: 70 + 28 + 1 (one medium) = 99.0
        assert_eq!(result.iq_score, 99.0);
        assert_eq!(result.correct_count, 4);
        assert_eq!(result.total, 10);
    }

    #[test]
    fn all_correct_on_fixture() {
        let quiz = fixture_quiz();
        let answers: Vec<usize> = quiz.items().iter().map(|i| i.correct()).collect();
        let result = score(&answers, &quiz).unwrap();
        // 70 + 70 + 3 hard * 2 + 3 medium * 1 = 149.0
        assert_eq!(result.iq_score, 149.0);
        assert_eq!(result.correct_count, 10);
    }

    #[test]
    fn all_incorrect_is_floor() {
        let quiz = fixture_quiz();
        let answers: Vec<usize> = quiz
            .items()
            .iter()
            .map(|i| (i.correct() + 1) % i.option_count())
            .collect();
        let result = score(&answers, &quiz).unwrap();
        assert_eq!(result.iq_score, 70.0);
        assert_eq!(result.correct_count, 0);
    }

    #[test]
    fn all_hard_all_correct_hits_ceiling() {
        let quiz = quiz_of((0..10).map(|i| item(&format!("c{i}"), 3, Difficulty::Hard)).collect());
        let result = score(&[3; 10], &quiz).unwrap();
        // 70 + 70 + 20 = 160, exactly the ceiling
        assert_eq!(result.iq_score, 160.0);

        let quiz = quiz_of((0..20).map(|i| item(&format!("c{i}"), 1, Difficulty::Hard)).collect());
        let result = score(&[1; 20], &quiz).unwrap();
        // 70 + 70 + 40 = 180, clamped
        assert_eq!(result.iq_score, IQ_CEILING);
    }

    #[test]
    fn all_hard_all_correct_is_instance_maximum() {
        let quiz = quiz_of((0..3).map(|i| item(&format!("c{i}"), 2, Difficulty::Hard)).collect());
        let best = score(&[2, 2, 2], &quiz).unwrap();
        assert_eq!(best.iq_score, 146.0);
        for a in 0..4 {
            for b in 0..4 {
                let other = score(&[a, b, 2], &quiz).unwrap();
                assert!(other.iq_score <= best.iq_score);
            }
        }
    }

    #[test]
    fn rounds_to_one_decimal() {
        let quiz = quiz_of((0..3).map(|i| item(&format!("c{i}"), 0, Difficulty::Easy)).collect());
        let result = score(&[0, 1, 1], &quiz).unwrap();
        // 70 + 70/3 = 93.333...
        assert_eq!(result.iq_score, 93.3);
    }

    #[test]
    fn scoring_is_deterministic() {
        let bank = QuestionBank::builtin().unwrap();
        let quiz = generate(&bank, 2, &mut ChaCha8Rng::seed_from_u64(9)).unwrap();
        let answers = [0, 1, 2, 3, 0, 1, 2, 3, 0, 1];
        let first = score(&answers, &quiz).unwrap();
        let second = score(&answers, &quiz).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn score_is_always_in_range() {
        let bank = QuestionBank::builtin().unwrap();
        for seed in 0..40u64 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let quiz = generate(&bank, 2, &mut rng).unwrap();
            let answers: Vec<usize> = (0..quiz.len()).map(|i| (i + seed as usize) % 4).collect();
            let result = score(&answers, &quiz).unwrap();
            assert!((IQ_FLOOR..=IQ_CEILING).contains(&result.iq_score));
            assert!(result.correct_count <= quiz.len());
        }
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let quiz = fixture_quiz();
        let err = score(&[0; 9], &quiz).unwrap_err();
        assert_eq!(
            err,
            QuizError::MisalignedAnswers {
                answers: 9,
                questions: 10
            }
        );
        assert!(score(&[0; 11], &quiz).is_err());
    }

    #[test]
    fn out_of_range_option_is_rejected() {
        let quiz = quiz_of(vec![item("a", 0, Difficulty::Easy), item("b", 0, Difficulty::Easy)]);
        let err = score(&[0, 4], &quiz).unwrap_err();
        assert_eq!(
            err,
            QuizError::InvalidOption {
                position: 1,
                option: 4,
                option_count: 4
            }
        );
    }

    #[test]
    fn empty_quiz_is_rejected() {
        let quiz = QuizInstance::default();
        assert_eq!(score(&[], &quiz), Err(QuizError::EmptyQuiz));
    }
}
