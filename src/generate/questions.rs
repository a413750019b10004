use std::str::FromStr;

use serde_json::Value;

use super::{Completion, GenerateError};

/// Parse failures tolerated per chunk before it is given up on.
pub const MAX_ATTEMPTS: usize = 3;

pub const SYSTEM_PROMPT: &str = r#"Generate 2 questions in JSON format:
{
    "questions": [
        {"question": "clear question", "answer": "concise answer"}
    ]
}
Return ONLY valid JSON with properly escaped characters."#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionItem {
    pub question: String,
    pub answer: String,
}

impl QuestionItem {
    pub fn new(question: &str, answer: &str) -> Self {
        Self {
            question: question.trim().to_string(),
            answer: answer.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionSet {
    pub questions: Vec<QuestionItem>,
}

/// Ask the model for questions about `chunk`.
///
/// Unparseable completions are retried up to [`MAX_ATTEMPTS`] times, after
/// which the chunk yields an empty set. Any other failure is returned as is.
pub fn generate_questions<C>(client: &C, chunk: &str) -> Result<QuestionSet, GenerateError>
where
    C: Completion + ?Sized,
{
    let user_message = format!("Text content:\n{}", chunk);

    for attempt in 1..=MAX_ATTEMPTS {
        let content = client.complete(SYSTEM_PROMPT, &user_message)?;

        match parse_questions(&content) {
            Ok(set) => {
                log::debug!(
                    "attempt {}: parsed {} questions",
                    attempt,
                    set.questions.len()
                );
                return Ok(set);
            }
            Err(e) if e.is_retryable() => {
                log::warn!("attempt {}/{}: {}", attempt, MAX_ATTEMPTS, e);
            }
            Err(e) => return Err(e),
        }
    }

    log::warn!("giving up on chunk after {} attempts", MAX_ATTEMPTS);
    Ok(QuestionSet::default())
}

/// Read a `{"questions": [...]}` completion, keeping only the elements that
/// carry both a question and an answer.
pub fn parse_questions(content: &str) -> Result<QuestionSet, GenerateError> {
    let body: Value = serde_json::from_str(content)?;
    let body = body
        .as_object()
        .ok_or_else(|| GenerateError::Shape(format!("expected an object, got {}", kind(&body))))?;

    let items = match body.get("questions") {
        None => return Ok(QuestionSet::default()),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(GenerateError::Shape(format!(
                "expected 'questions' to be an array, got {}",
                kind(other)
            )))
        }
    };

    let questions = items
        .iter()
        .filter_map(|item| {
            let question: String = get_attribute(item, "question")?;
            let answer: String = get_attribute(item, "answer")?;
            let item = QuestionItem::new(&question, &answer);
            if item.question.is_empty() || item.answer.is_empty() {
                return None;
            }
            Some(item)
        })
        .collect();

    Ok(QuestionSet { questions })
}

fn get_attribute<T>(value: &Value, attribute: &str) -> Option<T>
where
    T: FromStr,
{
    value.get(attribute).and_then(|v| match v {
        Value::String(s) => T::from_str(s).ok(),
        Value::Number(n) => T::from_str(&n.to_string()).ok(),
        Value::Bool(b) => T::from_str(&b.to_string()).ok(),
        _ => None,
    })
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Replays canned completions in order and counts the calls.
    struct Scripted {
        replies: RefCell<VecDeque<Result<String, GenerateError>>>,
        calls: RefCell<usize>,
    }

    impl Scripted {
        fn new(replies: Vec<Result<String, GenerateError>>) -> Self {
            Self {
                replies: RefCell::new(replies.into()),
                calls: RefCell::new(0),
            }
        }

        fn calls(&self) -> usize {
            *self.calls.borrow()
        }
    }

    impl Completion for Scripted {
        fn complete(&self, system_prompt: &str, user_message: &str) -> Result<String, GenerateError> {
            assert_eq!(system_prompt, SYSTEM_PROMPT);
            assert!(user_message.starts_with("Text content:\n"));
            *self.calls.borrow_mut() += 1;
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Ok(String::from("not json")))
        }
    }

    #[test]
    fn test_parse_keeps_complete_items() {
        let set = parse_questions(
            r#"{"questions": [
                {"question": "  What is the capital of France? ", "answer": " Paris "},
                {"question": "Missing answer"},
                {"answer": "Missing question"},
                "not an object",
                {"question": "How many legs does a spider have?", "answer": 8},
                {"question": "Is water wet?", "answer": true},
                {"question": "   ", "answer": "blank question"}
            ]}"#,
        )
        .unwrap();

        assert_eq!(
            set.questions,
            vec![
                QuestionItem::new("What is the capital of France?", "Paris"),
                QuestionItem::new("How many legs does a spider have?", "8"),
                QuestionItem::new("Is water wet?", "true"),
            ]
        );
    }

    #[test]
    fn test_parse_without_questions_key_is_empty() {
        assert_eq!(parse_questions("{}").unwrap(), QuestionSet::default());
    }

    #[test]
    fn test_parse_rejects_wrong_shapes() {
        assert!(matches!(
            parse_questions(r#"{"questions": "nope"}"#),
            Err(GenerateError::Shape(_))
        ));
        assert!(matches!(
            parse_questions("[1, 2]"),
            Err(GenerateError::Shape(_))
        ));
        assert!(matches!(
            parse_questions("{\"questions\": [}"),
            Err(GenerateError::Malformed(_))
        ));
    }

    #[test]
    fn test_every_item_is_non_empty() {
        let client = Scripted::new(vec![Ok(String::from(
            r#"{"questions": [{"question": "Q1", "answer": "A1"}, {"question": "", "answer": "A2"}]}"#,
        ))]);
        let set = generate_questions(&client, "chunk").unwrap();

        assert_eq!(set.questions.len(), 1);
        for item in &set.questions {
            assert!(!item.question.trim().is_empty());
            assert!(!item.answer.trim().is_empty());
        }
    }

    #[test]
    fn test_retries_then_succeeds() {
        let client = Scripted::new(vec![
            Ok(String::from("{oops")),
            Ok(String::from(r#"{"questions": 3}"#)),
            Ok(String::from(r#"{"questions": [{"question": "Q", "answer": "A"}]}"#)),
        ]);
        let set = generate_questions(&client, "chunk").unwrap();

        assert_eq!(client.calls(), 3);
        assert_eq!(set.questions, vec![QuestionItem::new("Q", "A")]);
    }

    #[test]
    fn test_gives_up_after_three_parse_failures() {
        let client = Scripted::new(vec![
            Ok(String::from("nope")),
            Ok(String::from("still nope")),
            Ok(String::from("nope again")),
            Ok(String::from(r#"{"questions": [{"question": "Q", "answer": "A"}]}"#)),
        ]);
        let set = generate_questions(&client, "chunk").unwrap();

        assert_eq!(client.calls(), MAX_ATTEMPTS);
        assert_eq!(set, QuestionSet::default());
    }

    #[test]
    fn test_fatal_errors_are_not_retried() {
        let client = Scripted::new(vec![Err(GenerateError::Server { status: 401 })]);
        let err = generate_questions(&client, "chunk").unwrap_err();

        assert_eq!(client.calls(), 1);
        assert!(matches!(err, GenerateError::Server { status: 401 }));
    }
}
