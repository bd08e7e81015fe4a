//! Prompt Loader
//!
//! Loads prompt templates from an override directory or falls back to the
//! embedded defaults, then renders them with Handlebars.

use std::path::{Path, PathBuf};

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::{debug, info};

use super::embedded;
use crate::domain::{GoalAnalysis, Strategy, StrategyPath};

/// The three prompts the app sends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Analyze,
    Strategies,
    Ethics,
}

impl PromptKind {
    /// Template name, also the override file stem (`{name}.pmt`)
    pub fn template_name(&self) -> &'static str {
        match self {
            Self::Analyze => "analyze",
            Self::Strategies => "strategies",
            Self::Ethics => "ethics",
        }
    }
}

impl std::fmt::Display for PromptKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.template_name())
    }
}

/// Variables for the analyze prompt
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeContext<'a> {
    pub goal: &'a str,
}

/// Variables for the strategies prompt
#[derive(Debug, Clone, Serialize)]
pub struct StrategiesContext<'a> {
    pub goal: &'a str,
    /// Pretty-printed analysis JSON
    pub analysis: String,
}

impl<'a> StrategiesContext<'a> {
    pub fn new(goal: &'a str, analysis: &GoalAnalysis) -> Result<Self> {
        Ok(Self {
            goal,
            analysis: serde_json::to_string_pretty(analysis)?,
        })
    }
}

/// Variables for the ethics prompt
#[derive(Debug, Clone, Serialize)]
pub struct EthicsContext {
    /// Pretty-printed `{path, title, description}` list; steps are left out
    pub strategies: String,
}

#[derive(Serialize)]
struct StrategySummary<'a> {
    path: StrategyPath,
    title: &'a str,
    description: &'a str,
}

impl EthicsContext {
    pub fn new(strategies: &[Strategy]) -> Result<Self> {
        let summaries: Vec<StrategySummary<'_>> = strategies
            .iter()
            .map(|s| StrategySummary {
                path: s.path,
                title: &s.title,
                description: &s.description,
            })
            .collect();
        Ok(Self {
            strategies: serde_json::to_string_pretty(&summaries)?,
        })
    }
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// User override directory (e.g., `.lattice/prompts/`)
    override_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a loader that looks for overrides in `override_dir`
    pub fn new(override_dir: impl AsRef<Path>) -> Self {
        let dir = override_dir.as_ref();
        let exists = dir.is_dir();
        debug!(?dir, %exists, "PromptLoader::new: called");

        Self {
            hbs: Self::engine(),
            override_dir: exists.then(|| dir.to_path_buf()),
        }
    }

    /// Create a loader that only uses embedded prompts
    pub fn embedded_only() -> Self {
        debug!("PromptLoader::embedded_only: called");
        Self {
            hbs: Self::engine(),
            override_dir: None,
        }
    }

    fn engine() -> Handlebars<'static> {
        let mut hbs = Handlebars::new();
        // Prompts are plain text; a missing variable is a bug, not an empty string
        hbs.register_escape_fn(handlebars::no_escape);
        hbs.set_strict_mode(true);
        hbs
    }

    /// Load a template by name
    ///
    /// Checks the override directory first, then the embedded defaults.
    fn load_template(&self, name: &str) -> Result<String> {
        debug!(%name, "PromptLoader::load_template: called");
        if let Some(ref dir) = self.override_dir {
            let path = dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!(?path, "PromptLoader::load_template: found override");
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read prompt override {}: {}", path.display(), e));
            }
        }

        embedded::get_embedded(name)
            .map(str::to_string)
            .ok_or_else(|| eyre!("Prompt template not found: {}", name))
    }

    /// Render a prompt with the given context
    pub fn render<C: Serialize>(&self, kind: PromptKind, context: &C) -> Result<String> {
        let template = self.load_template(kind.template_name())?;
        info!("Rendering prompt '{}'", kind);

        self.hbs
            .render_template(&template, context)
            .map_err(|e| eyre!("Failed to render template {}: {}", kind, e))
    }
}
