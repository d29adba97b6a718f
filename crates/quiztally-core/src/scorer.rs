//! Scoring submitted answers against a questionnaire's answer key.
//!
//! An incomplete submission is scored against the full question count, so
//! every unanswered question is implicitly wrong.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::{AnswerRecord, Question, Questionnaire, ResponseRecord};

/// A participant's pick for one question, by option position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAnswer {
    pub question_id: String,
    pub selected_option_index: usize,
}

/// Result of scoring one set of answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreOutcome {
    /// Number of correct answers.
    pub score: u32,
    /// Question count of the questionnaire, not the number answered.
    pub total_questions: u32,
    /// The answers enriched with question text, option text, and correctness.
    pub answers: Vec<AnswerRecord>,
}

fn score_answer(answer: &UserAnswer, question: Option<&Question>) -> AnswerRecord {
    match question {
        Some(question) => AnswerRecord {
            question_id: answer.question_id.clone(),
            question_text: question.text.clone(),
            selected_option: question
                .options
                .get(answer.selected_option_index)
                .cloned()
                .unwrap_or_default(),
            selected_option_index: answer.selected_option_index,
            is_correct: Some(question.answer_key.index() == Some(answer.selected_option_index)),
        },
        None => AnswerRecord {
            question_id: answer.question_id.clone(),
            question_text: String::new(),
            selected_option: String::new(),
            selected_option_index: answer.selected_option_index,
            is_correct: Some(false),
        },
    }
}

fn count_correct(answers: &[AnswerRecord]) -> u32 {
    answers
        .iter()
        .filter(|a| a.is_correct == Some(true))
        .count() as u32
}

/// Score `user_answers` against `questionnaire`.
///
/// Pure: identical inputs give identical output.
pub fn score(user_answers: &[UserAnswer], questionnaire: &Questionnaire) -> ScoreOutcome {
    let by_id: HashMap<&str, &Question> = questionnaire
        .questions
        .iter()
        .map(|q| (q.id.as_str(), q))
        .collect();

    let answers: Vec<AnswerRecord> = user_answers
        .iter()
        .map(|ua| score_answer(ua, by_id.get(ua.question_id.as_str()).copied()))
        .collect();

    ScoreOutcome {
        score: count_correct(&answers),
        total_questions: questionnaire.questions.len() as u32,
        answers,
    }
}

/// Recover the option position of a stored answer.
///
/// The option text wins when it matches one of the question's options. The
/// stored index is only trusted for answers that were resolved when recorded;
/// an unresolved answer whose text matches nothing has no position.
pub fn resolve_user_answer(
    answer: &AnswerRecord,
    questionnaire: &Questionnaire,
) -> Option<UserAnswer> {
    let resolved_at_submit = answer.is_correct.is_some() || !answer.question_text.is_empty();
    let index = questionnaire
        .question(&answer.question_id)
        .and_then(|q| q.option_index(&answer.selected_option))
        .or(resolved_at_submit.then_some(answer.selected_option_index))?;
    Some(UserAnswer {
        question_id: answer.question_id.clone(),
        selected_option_index: index,
    })
}

/// Score a stored record after the fact.
///
/// Returns a scored copy; the record itself is never modified. Answers
/// without a resolvable option are wrong and keep their submitted text.
pub fn score_record(
    record: &ResponseRecord,
    questionnaire: &Questionnaire,
) -> Result<ResponseRecord, ValidationError> {
    if record.questionnaire_id != questionnaire.id {
        return Err(ValidationError::QuestionnaireMismatch {
            submitted: record.questionnaire_id.clone(),
            supplied: questionnaire.id.clone(),
        });
    }

    let answers: Vec<AnswerRecord> = record
        .answers
        .iter()
        .map(|original| {
            let question = questionnaire.question(&original.question_id);
            let mut scored = match resolve_user_answer(original, questionnaire) {
                Some(user_answer) => score_answer(&user_answer, question),
                None => AnswerRecord {
                    question_text: question.map(|q| q.text.clone()).unwrap_or_default(),
                    is_correct: Some(false),
                    ..original.clone()
                },
            };
            if scored.selected_option.is_empty() {
                scored.selected_option = original.selected_option.clone();
            }
            scored
        })
        .collect();

    Ok(ResponseRecord {
        score: Some(count_correct(&answers)),
        total_questions: Some(questionnaire.questions.len() as u32),
        answers,
        ..record.clone()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AnswerKey;
    use chrono::Utc;
    use uuid::Uuid;

    fn five_question_quiz() -> Questionnaire {
        Questionnaire {
            id: "quiz".into(),
            title: "Quiz".into(),
            questions: (0..5)
                .map(|i| Question {
                    id: format!("q{i}"),
                    text: format!("Question {i}"),
                    options: vec!["A".into(), "B".into(), "C".into()],
                    answer_key: AnswerKey::Correct { index: i % 3 },
                })
                .collect(),
        }
    }

    fn answer(id: &str, index: usize) -> UserAnswer {
        UserAnswer {
            question_id: id.into(),
            selected_option_index: index,
        }
    }

    #[test]
    fn full_credit() {
        let quiz = five_question_quiz();
        let answers: Vec<_> = (0..5).map(|i| answer(&format!("q{i}"), i % 3)).collect();

        let outcome = score(&answers, &quiz);
        assert_eq!(outcome.score, 5);
        assert_eq!(outcome.total_questions, 5);
        assert!(outcome.answers.iter().all(|a| a.is_correct == Some(true)));
    }

    #[test]
    fn partial_submission_counts_against_full_total() {
        let quiz = five_question_quiz();
        let answers: Vec<_> = (0..3).map(|i| answer(&format!("q{i}"), i % 3)).collect();

        let outcome = score(&answers, &quiz);
        assert_eq!(outcome.score, 3);
        assert_eq!(outcome.total_questions, 5);
        assert_eq!(outcome.answers.len(), 3);
    }

    #[test]
    fn wrong_answers_and_enrichment() {
        let quiz = five_question_quiz();
        let outcome = score(&[answer("q0", 2)], &quiz);

        assert_eq!(outcome.score, 0);
        let a = &outcome.answers[0];
        assert_eq!(a.question_text, "Question 0");
        assert_eq!(a.selected_option, "C");
        assert_eq!(a.is_correct, Some(false));
    }

    #[test]
    fn unscored_question_is_never_correct() {
        let mut quiz = five_question_quiz();
        quiz.questions[0].answer_key = AnswerKey::Unscored;

        let outcome = score(&[answer("q0", 0)], &quiz);
        assert_eq!(outcome.score, 0);
        assert_eq!(outcome.answers[0].is_correct, Some(false));
    }

    #[test]
    fn unknown_question_defaults_to_empty_and_wrong() {
        let quiz = five_question_quiz();
        let outcome = score(&[answer("nope", 0)], &quiz);

        let a = &outcome.answers[0];
        assert!(a.question_text.is_empty());
        assert!(a.selected_option.is_empty());
        assert_eq!(a.is_correct, Some(false));
        assert_eq!(outcome.total_questions, 5);
    }

    #[test]
    fn out_of_range_index_has_no_option_text() {
        let quiz = five_question_quiz();
        let outcome = score(&[answer("q1", 9)], &quiz);
        assert!(outcome.answers[0].selected_option.is_empty());
        assert_eq!(outcome.answers[0].is_correct, Some(false));
    }

    #[test]
    fn scoring_is_deterministic() {
        let quiz = five_question_quiz();
        let answers = vec![answer("q0", 0), answer("q3", 1), answer("x", 2)];
        assert_eq!(score(&answers, &quiz), score(&answers, &quiz));
    }

    #[test]
    fn empty_questionnaire() {
        let quiz = Questionnaire {
            id: "empty".into(),
            title: String::new(),
            questions: vec![],
        };
        let outcome = score(&[], &quiz);
        assert_eq!(outcome.score, 0);
        assert_eq!(outcome.total_questions, 0);
    }

    fn unscored_record(answers: &[(&str, &str)]) -> ResponseRecord {
        ResponseRecord {
            id: Uuid::new_v4(),
            questionnaire_id: "quiz".into(),
            questionnaire_title: String::new(),
            submitter_id: "u1".into(),
            submitter_name: "Ada".into(),
            answers: answers
                .iter()
                .map(|(q, o)| AnswerRecord {
                    question_id: q.to_string(),
                    question_text: String::new(),
                    selected_option: o.to_string(),
                    selected_option_index: 0,
                    is_correct: None,
                })
                .collect(),
            submitted_at: Utc::now(),
            score: None,
            total_questions: None,
        }
    }

    #[test]
    fn score_record_resolves_option_text() {
        let quiz = five_question_quiz();
        // q1 expects B, q2 expects C
        let record = unscored_record(&[("q1", "B"), ("q2", "A"), ("ghost", "Z")]);

        let scored = score_record(&record, &quiz).unwrap();
        assert_eq!(scored.score, Some(1));
        assert_eq!(scored.total_questions, Some(5));
        assert_eq!(scored.answers[0].selected_option_index, 1);
        assert_eq!(scored.answers[0].question_text, "Question 1");
        assert_eq!(scored.answers[2].selected_option, "Z");
        assert_eq!(scored.id, record.id);
        assert!(!record.is_scored());
    }

    #[test]
    fn score_record_keeps_text_the_question_does_not_offer() {
        let quiz = five_question_quiz();
        // q0 expects A, and the unresolved placeholder index is also 0
        let record = unscored_record(&[("q0", "Marseille"), ("q1", "B")]);

        let scored = score_record(&record, &quiz).unwrap();
        assert_eq!(scored.score, Some(1));
        let stray = &scored.answers[0];
        assert_eq!(stray.selected_option, "Marseille");
        assert_eq!(stray.question_text, "Question 0");
        assert_eq!(stray.is_correct, Some(false));
    }

    #[test]
    fn score_record_trusts_index_of_resolved_answers() {
        let quiz = five_question_quiz();
        let mut record = unscored_record(&[("q2", "renamed option")]);
        record.answers[0].question_text = "Question 2".into();
        record.answers[0].selected_option_index = 2;
        record.answers[0].is_correct = Some(true);

        let scored = score_record(&record, &quiz).unwrap();
        assert_eq!(scored.score, Some(1));
        assert_eq!(scored.answers[0].selected_option, "C");
    }

    #[test]
    fn score_record_rejects_other_questionnaire() {
        let mut quiz = five_question_quiz();
        quiz.id = "other".into();
        let err = score_record(&unscored_record(&[]), &quiz).unwrap_err();
        assert!(matches!(err, ValidationError::QuestionnaireMismatch { .. }));
    }
}
