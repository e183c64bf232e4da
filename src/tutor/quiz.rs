//! Quiz selection over a read-only topic catalog.
//!
//! The catalog is built once at startup and shared immutably. Every draw
//! returns an owned copy, so per-request changes (the advanced hint) never
//! leak back into the shared table.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

pub const DEFAULT_TOPIC: &str = "intro-python";
pub const ADVANCED_HINT: &str = " Try to think about edge cases!";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub explanation: String,
}

impl QuizQuestion {
    pub fn new(question: &str, options: [&str; 4], correct_answer: &str, explanation: &str) -> Self {
        Self {
            question: question.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_answer: correct_answer.to_string(),
            explanation: explanation.to_string(),
        }
    }

    /// The correct answer must be one of the options.
    pub fn is_well_formed(&self) -> bool {
        self.options.contains(&self.correct_answer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Standard,
    Advanced,
}

impl Difficulty {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("advanced") => Difficulty::Advanced,
            _ => Difficulty::Standard,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum QuizError {
    #[error("no questions available for topic '{0}'")]
    EmptyTopic(String),

    #[error("malformed question in topic '{topic}': {question}")]
    Malformed { topic: String, question: String },
}

/// Questions grouped by topic.
#[derive(Debug, Clone)]
pub struct QuizCatalog {
    topics: HashMap<String, Vec<QuizQuestion>>,
}

impl QuizCatalog {
    pub fn new(topics: HashMap<String, Vec<QuizQuestion>>) -> Self {
        Self { topics }
    }

    pub fn builtin() -> Self {
        let mut topics = HashMap::new();

        topics.insert(
            "intro-python".to_string(),
            vec![
                QuizQuestion::new(
                    "What will be the output of print('Hello, World!')?",
                    ["Hello, World!", "Error", "Nothing", "'Hello, World!'"],
                    "Hello, World!",
                    "The print function outputs the text exactly as given, without the quotes.",
                ),
                QuizQuestion::new(
                    "Which symbol is used for comments in Python?",
                    ["//", "#", "/*", "<!--"],
                    "#",
                    "In Python, the # symbol is used to start a single-line comment.",
                ),
                QuizQuestion::new(
                    "How do you create a variable named 'age' with value 25?",
                    ["var age = 25", "age := 25", "age = 25", "let age = 25"],
                    "age = 25",
                    "In Python, you can directly assign values to variables using the = operator.",
                ),
            ],
        );

        topics.insert(
            "variables".to_string(),
            vec![
                QuizQuestion::new(
                    "What is the data type of x in x = 5.0?",
                    ["int", "float", "number", "decimal"],
                    "float",
                    "Numbers with decimal points in Python are float data type.",
                ),
                QuizQuestion::new(
                    "Which is a valid variable name in Python?",
                    ["2name", "my-var", "my_var", "class"],
                    "my_var",
                    "Variable names can contain letters, numbers, and underscores, but can't start with a number.",
                ),
            ],
        );

        topics.insert(
            "control-flow".to_string(),
            vec![
                QuizQuestion::new(
                    "What will this loop print? for i in range(3): print(i)",
                    ["0 1 2", "1 2 3", "0 1 2 3", "1 2"],
                    "0 1 2",
                    "range(3) generates numbers from 0 to 2 (3 exclusive).",
                ),
                QuizQuestion::new(
                    "Which statement is used to exit a loop prematurely?",
                    ["exit", "stop", "break", "return"],
                    "break",
                    "The break statement is used to exit a loop before its normal completion.",
                ),
            ],
        );

        Self::new(topics)
    }

    /// Resolve `topic`, falling back to [`DEFAULT_TOPIC`] for unknown keys.
    fn resolve<'a>(&'a self, topic: &'a str) -> (&'a str, &'a [QuizQuestion]) {
        match self.topics.get(topic) {
            Some(questions) => (topic, questions),
            None => (
                DEFAULT_TOPIC,
                self.topics.get(DEFAULT_TOPIC).map(Vec::as_slice).unwrap_or(&[]),
            ),
        }
    }

    /// Pick one question uniformly at random and apply the difficulty transform to a copy.
    pub fn select<R: Rng + ?Sized>(
        &self,
        topic: &str,
        difficulty: Difficulty,
        rng: &mut R,
    ) -> Result<QuizQuestion, QuizError> {
        let (resolved, questions) = self.resolve(topic);

        let picked = questions
            .choose(rng)
            .ok_or_else(|| QuizError::EmptyTopic(resolved.to_string()))?;

        if !picked.is_well_formed() {
            return Err(QuizError::Malformed {
                topic: resolved.to_string(),
                question: picked.question.clone(),
            });
        }

        let mut quiz = picked.clone();
        if difficulty == Difficulty::Advanced && !quiz.explanation.is_empty() {
            quiz.explanation.push_str(ADVANCED_HINT);
        }
        Ok(quiz)
    }

    /// Like [`select`](Self::select), but any failure yields [`fallback_question`].
    pub fn draw<R: Rng + ?Sized>(&self, topic: &str, difficulty: Difficulty, rng: &mut R) -> QuizQuestion {
        self.select(topic, difficulty, rng).unwrap_or_else(|e| {
            tracing::warn!("Quiz generation error, serving fallback question: {}", e);
            fallback_question()
        })
    }
}

/// Served whenever selection fails.
pub fn fallback_question() -> QuizQuestion {
    QuizQuestion::new(
        "What is the output of print(2 + 3)?",
        ["5", "23", "2 + 3", "Error"],
        "5",
        "The + operator performs addition with numbers.",
    )
}
