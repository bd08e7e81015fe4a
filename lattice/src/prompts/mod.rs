//! Prompt Template System
//!
//! Template loading chain:
//! 1. `{override-dir}/{name}.pmt` (user override, `.lattice/prompts` by default)
//! 2. Embedded fallback in code
//!
//! Templates use Handlebars syntax for variable substitution.

pub mod embedded;
mod loader;

pub use loader::{AnalyzeContext, EthicsContext, PromptKind, PromptLoader, StrategiesContext};
