//! Quiz generation: an even per-category draw, then a full shuffle.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::bank::QuestionBank;
use crate::error::QuizError;
use crate::model::{QuizInstance, QuizItem};

/// Questions drawn from each category by default.
pub const DEFAULT_PER_CATEGORY: usize = 2;

/// Generate a quiz with exactly `per_category` distinct questions from every
/// category, in a uniformly random order.
///
/// All categories are checked before anything is drawn, so a short category
/// fails the whole generation without consuming randomness.
pub fn generate<R: Rng + ?Sized>(
    bank: &QuestionBank,
    per_category: usize,
    rng: &mut R,
) -> Result<QuizInstance, QuizError> {
    if per_category == 0 || bank.categories().is_empty() {
        return Err(QuizError::EmptyQuiz);
    }

    if let Some(short) = bank
        .categories()
        .iter()
        .find(|c| c.questions.len() < per_category)
    {
        return Err(QuizError::InsufficientQuestions {
            category: short.name.clone(),
            available: short.questions.len(),
            required: per_category,
        });
    }

    let mut items = Vec::with_capacity(bank.categories().len() * per_category);
    for category in bank.categories() {
        items.extend(
            category
                .questions
                .choose_multiple(rng, per_category)
                .map(|q| QuizItem {
                    category: category.name.clone(),
                    question: q.clone(),
                }),
        );
    }
    items.shuffle(rng);

    tracing::debug!(
        "generated quiz from bank '{}': {} items across {} categories",
        bank.id,
        items.len(),
        bank.categories().len()
    );

    Ok(QuizInstance::new(items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::Category;
    use crate::model::{Difficulty, Question};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::{HashMap, HashSet};

    fn question(prompt: &str) -> Question {
        Question {
            prompt: prompt.into(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct: 0,
            difficulty: Difficulty::Easy,
        }
    }

    fn bank_with_sizes(sizes: &[usize]) -> QuestionBank {
        let categories = sizes
            .iter()
            .enumerate()
            .map(|(i, &n)| Category {
                name: format!("cat-{i}"),
                questions: (0..n).map(|j| question(&format!("q-{i}-{j}"))).collect(),
            })
            .collect();
        QuestionBank::new("test", "Test", categories).unwrap()
    }

    #[test]
    fn draws_evenly_without_duplicates() {
        let bank = QuestionBank::builtin().unwrap();
        for seed in 0..50 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let quiz = generate(&bank, 2, &mut rng).unwrap();
            assert_eq!(quiz.len(), 10);

            let prompts: HashSet<&str> = quiz
                .items()
                .iter()
                .map(|i| i.question.prompt.as_str())
                .collect();
            assert_eq!(prompts.len(), 10, "duplicate question with seed {seed}");

            let mut per_category: HashMap<&str, usize> = HashMap::new();
            for item in quiz.items() {
                *per_category.entry(item.category.as_str()).or_default() += 1;
            }
            assert_eq!(per_category.len(), 5);
            assert!(per_category.values().all(|&n| n == 2));
        }
    }

    #[test]
    fn items_keep_their_source_category() {
        let bank = QuestionBank::builtin().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let quiz = generate(&bank, 3, &mut rng).unwrap();
        for item in quiz.items() {
            let category = bank.category(&item.category).unwrap();
            assert!(category.questions.contains(&item.question));
        }
    }

    #[test]
    fn same_seed_same_quiz() {
        let bank = QuestionBank::builtin().unwrap();
        let a = generate(&bank, 2, &mut ChaCha8Rng::seed_from_u64(42)).unwrap();
        let b = generate(&bank, 2, &mut ChaCha8Rng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 10);
    }

    #[test]
    fn whole_category_draw_is_a_permutation() {
        let bank = bank_with_sizes(&[3, 3]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let quiz = generate(&bank, 3, &mut rng).unwrap();
        assert_eq!(quiz.len(), 6);
    }

    #[test]
    fn insufficient_questions_names_the_category() {
        let bank = bank_with_sizes(&[5, 1, 5]);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = generate(&bank, 2, &mut rng).unwrap_err();
        assert_eq!(
            err,
            QuizError::InsufficientQuestions {
                category: "cat-1".into(),
                available: 1,
                required: 2,
            }
        );
    }

    #[test]
    fn zero_draw_is_rejected() {
        let bank = bank_with_sizes(&[5]);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(generate(&bank, 0, &mut rng), Err(QuizError::EmptyQuiz));

        let empty = bank_with_sizes(&[]);
        assert_eq!(generate(&empty, 2, &mut rng), Err(QuizError::EmptyQuiz));
    }
}
