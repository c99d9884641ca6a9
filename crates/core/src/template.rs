//! Prompt template rendering.
//!
//! Thin wrapper over Tera: the template is compiled once and rendered with a
//! fresh context on every call. Autoescaping is disabled because the output is
//! plain text for a language model, not HTML.

use crate::error::{Error, Result};
use serde::Serialize;
use std::error::Error as StdError;
use std::path::Path;
use tera::{Context, Tera};

const TEMPLATE_NAME: &str = "prompt";

/// A compiled text template with `{{ variable }}` placeholders.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    tera: Tera,
}

impl PromptTemplate {
    /// Compile a template from source text.
    pub fn new(source: &str) -> Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        tera.add_raw_template(TEMPLATE_NAME, source)
            .map_err(|e| Error::Template(describe(&e)))?;
        Ok(Self { tera })
    }

    /// Compile a template read from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path.as_ref())?;
        Self::new(&source)
    }

    /// Render with any serializable set of variables (struct or map).
    pub fn render<V: Serialize>(&self, vars: &V) -> Result<String> {
        let context = Context::from_serialize(vars).map_err(|e| Error::Template(describe(&e)))?;
        self.tera
            .render(TEMPLATE_NAME, &context)
            .map_err(|e| Error::Template(describe(&e)))
    }
}

/// Tera nests the useful message in the error source chain.
fn describe(err: &tera::Error) -> String {
    let mut msg = err.to_string();
    let mut source = StdError::source(err);
    while let Some(inner) = source {
        msg.push_str(": ");
        msg.push_str(&inner.to_string());
        source = StdError::source(inner);
    }
    msg
}
