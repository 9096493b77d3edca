//! Answer and follow-up prompt assembly

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use super::PromptTemplate;
use crate::domain::DomainError;

pub const DEFAULT_PERSONA: &str = "You are Milo, an intelligent CS tutor.";

pub const DEFAULT_ANSWER_TEMPLATE: &str = "${var:persona} Answer clearly and thoroughly.
Use the reference material below, but do not mention \"the context\" or say that you were given material.
Prefer a detailed, in-depth explanation over a short one.

Reference material:
${var:context}

Question: ${var:question}

Answer:";

pub const DEFAULT_FOLLOWUP_TEMPLATE: &str = "${var:persona}

Student asked: \"${var:question}\"

Suggest exactly 2 follow-up questions the student could ask next.
Reply with the two questions only, in this format:
1. <first question>
2. <second question>";

const PERSONA: &str = "persona";
const CONTEXT: &str = "context";
const QUESTION: &str = "question";

static NUMBERED_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\d+\s*[.)]\s*(.*\S)\s*$").expect("numbered line pattern is a valid regex")
});

/// Assembles answer and follow-up prompts from validated templates
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    persona: String,
    answer: PromptTemplate,
    followup: PromptTemplate,
}

impl PromptBuilder {
    /// Create a builder from custom templates.
    ///
    /// The answer template must reference `${var:context}` before
    /// `${var:question}`. The follow-up template must reference
    /// `${var:question}` and must not reference `${var:context}`.
    pub fn new(
        persona: impl Into<String>,
        answer_template: &str,
        followup_template: &str,
    ) -> Result<Self, DomainError> {
        let answer = PromptTemplate::parse(answer_template);
        let followup = PromptTemplate::parse(followup_template);

        match (answer.variable(CONTEXT), answer.variable(QUESTION)) {
            (Some(context), Some(question)) if context.offset < question.offset => {}
            (Some(_), Some(_)) => {
                return Err(DomainError::configuration(
                    "answer template must place ${var:context} before ${var:question}",
                ));
            }
            _ => {
                return Err(DomainError::configuration(
                    "answer template must reference both ${var:context} and ${var:question}",
                ));
            }
        }

        if !followup.references(QUESTION) {
            return Err(DomainError::configuration(
                "follow-up template must reference ${var:question}",
            ));
        }

        if followup.references(CONTEXT) {
            return Err(DomainError::configuration(
                "follow-up template must not reference ${var:context}",
            ));
        }

        Ok(Self {
            persona: persona.into(),
            answer,
            followup,
        })
    }

    /// Render the answer prompt for a selected context block and question
    pub fn answer_prompt(&self, context: &str, question: &str) -> Result<String, DomainError> {
        let values = HashMap::from([
            (PERSONA, self.persona.as_str()),
            (CONTEXT, context),
            (QUESTION, question),
        ]);

        self.answer
            .render(&values)
            .map_err(|e| DomainError::internal(e.to_string()))
    }

    /// Render the follow-up prompt; only the prior question is exposed
    pub fn followup_prompt(&self, question: &str) -> Result<String, DomainError> {
        let values = HashMap::from([(PERSONA, self.persona.as_str()), (QUESTION, question)]);

        self.followup
            .render(&values)
            .map_err(|e| DomainError::internal(e.to_string()))
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self {
            persona: DEFAULT_PERSONA.to_string(),
            answer: PromptTemplate::parse(DEFAULT_ANSWER_TEMPLATE),
            followup: PromptTemplate::parse(DEFAULT_FOLLOWUP_TEMPLATE),
        }
    }
}

/// Extract the numbered items (`1. ...`, `2) ...`) from follow-up model output
pub fn parse_followups(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| NUMBERED_LINE.captures(line))
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_templates_are_valid() {
        let defaults = PromptBuilder::new(
            DEFAULT_PERSONA,
            DEFAULT_ANSWER_TEMPLATE,
            DEFAULT_FOLLOWUP_TEMPLATE,
        );
        assert!(defaults.is_ok());
    }

    #[test]
    fn test_answer_prompt_places_context_before_question() {
        let builder = PromptBuilder::default();
        let prompt = builder
            .answer_prompt("TCP is a transport protocol.", "what is tcp")
            .unwrap();

        let context_at = prompt.find("TCP is a transport protocol.").unwrap();
        let question_at = prompt.find("what is tcp").unwrap();
        assert!(context_at < question_at);
        assert!(prompt.starts_with(DEFAULT_PERSONA));
    }

    #[test]
    fn test_followup_prompt_has_only_question() {
        let builder = PromptBuilder::default();
        let prompt = builder.followup_prompt("explain deadlock").unwrap();

        assert!(prompt.contains("Student asked: \"explain deadlock\""));
        assert!(prompt.contains("1. "));
        assert!(prompt.contains("2. "));
    }

    #[test]
    fn test_user_text_is_not_expanded() {
        let builder = PromptBuilder::default();
        let prompt = builder
            .answer_prompt("ctx", "what is ${var:persona}?")
            .unwrap();

        assert!(prompt.contains("Question: what is ${var:persona}?"));
    }

    #[test]
    fn test_rejects_question_before_context() {
        let result = PromptBuilder::new(
            "p",
            "Q: ${var:question}\nC: ${var:context}",
            DEFAULT_FOLLOWUP_TEMPLATE,
        );

        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_rejects_followup_with_context() {
        let result = PromptBuilder::new(
            "p",
            DEFAULT_ANSWER_TEMPLATE,
            "${var:context} ${var:question}",
        );

        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_parse_followups() {
        let text = "Here you go:\n1. What is a TCP handshake?\n2) How does UDP differ?\n";
        let questions = parse_followups(text);

        assert_eq!(
            questions,
            vec![
                "What is a TCP handshake?".to_string(),
                "How does UDP differ?".to_string()
            ]
        );
    }

    #[test]
    fn test_parse_followups_ignores_empty_items() {
        assert!(parse_followups("1. \n2. ").is_empty());
    }
}
