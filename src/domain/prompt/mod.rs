//! Prompt assembly - `${var:name}` templates for answers and follow-ups

mod builder;
mod template;

pub use builder::{
    parse_followups, PromptBuilder, DEFAULT_ANSWER_TEMPLATE, DEFAULT_FOLLOWUP_TEMPLATE,
    DEFAULT_PERSONA,
};
pub use template::{PromptTemplate, PromptVariable, TemplateError};
