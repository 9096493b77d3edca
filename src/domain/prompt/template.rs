//! Prompt template parsing and rendering
//!
//! Supports variable syntax: `${var:variable-name:default-value}`
//! - `${var:name}` - Required variable, error if not provided
//! - `${var:name:default}` - Optional variable with default value

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use thiserror::Error;

/// Regex to match variable patterns: ${var:name} or ${var:name:default}
static VARIABLE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{var:([a-zA-Z0-9][-a-zA-Z0-9_]*)(?::([^}]*))?\}")
        .expect("variable pattern is a valid regex")
});

/// Template processing errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TemplateError {
    #[error("Missing required variable: {name}")]
    MissingVariable { name: String },
}

/// A parsed variable from a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptVariable {
    /// Variable name
    pub name: String,
    /// Default value if provided
    pub default: Option<String>,
    /// Whether the variable is required (no default)
    pub required: bool,
    /// Byte offset of the first occurrence
    pub offset: usize,
}

/// A parsed prompt template
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    content: String,
    variables: Vec<PromptVariable>,
}

impl PromptTemplate {
    /// Parse a template string and extract variables in order of first use
    pub fn parse(content: impl Into<String>) -> Self {
        let content = content.into();
        let mut variables: Vec<PromptVariable> = Vec::new();

        for cap in VARIABLE_PATTERN.captures_iter(&content) {
            let (Some(whole), Some(name)) = (cap.get(0), cap.get(1)) else {
                continue;
            };

            if variables.iter().any(|v| v.name == name.as_str()) {
                continue;
            }

            let default = cap.get(2).map(|m| m.as_str().to_string());

            variables.push(PromptVariable {
                name: name.as_str().to_string(),
                required: default.is_none(),
                default,
                offset: whole.start(),
            });
        }

        Self { content, variables }
    }

    /// Get the original template content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Get all parsed variables
    pub fn variables(&self) -> &[PromptVariable] {
        &self.variables
    }

    /// Find a variable by name
    pub fn variable(&self, name: &str) -> Option<&PromptVariable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Whether the template references the named variable
    pub fn references(&self, name: &str) -> bool {
        self.variable(name).is_some()
    }

    /// Render the template with provided values.
    ///
    /// Substitution is a single pass over the template, so values that
    /// themselves contain `${var:...}` are inserted verbatim.
    pub fn render(&self, values: &HashMap<&str, &str>) -> Result<String, TemplateError> {
        if let Some(missing) = self
            .variables
            .iter()
            .find(|v| v.required && !values.contains_key(v.name.as_str()))
        {
            return Err(TemplateError::MissingVariable {
                name: missing.name.clone(),
            });
        }

        let rendered = VARIABLE_PATTERN.replace_all(&self.content, |caps: &Captures| {
            let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();

            match values.get(name) {
                Some(value) => (*value).to_string(),
                None => caps
                    .get(2)
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default(),
            }
        });

        Ok(rendered.into_owned())
    }
}
