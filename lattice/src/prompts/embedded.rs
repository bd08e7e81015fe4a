//! Embedded prompts
//!
//! Compiled into the binary from the `.pmt` files under `prompts/`.

use tracing::debug;

/// Goal deconstruction prompt
pub const ANALYZE: &str = include_str!("../../prompts/analyze.pmt");

/// Alpha/Beta/Gamma strategy prompt
pub const STRATEGIES: &str = include_str!("../../prompts/strategies.pmt");

/// Probability-of-goodness scoring prompt
pub const ETHICS: &str = include_str!("../../prompts/ethics.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "analyze" => Some(ANALYZE),
        "strategies" => Some(STRATEGIES),
        "ethics" => Some(ETHICS),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_embedded_analyze() {
        let prompt = get_embedded("analyze").unwrap();
        assert!(prompt.contains("{{goal}}"));
        assert!(prompt.contains("negativeShifts"));
        assert!(prompt.contains("positiveShifts"));
        assert!(prompt.contains("decayFactors"));
    }

    #[test]
    fn test_get_embedded_strategies() {
        let prompt = get_embedded("strategies").unwrap();
        assert!(prompt.contains("{{analysis}}"));
        for path in ["Alpha", "Beta", "Gamma"] {
            assert!(prompt.contains(path), "missing {}", path);
        }
    }

    #[test]
    fn test_get_embedded_ethics() {
        let prompt = get_embedded("ethics").unwrap();
        assert!(prompt.contains("{{strategies}}"));
        assert!(prompt.contains("0.9"));
    }

    #[test]
    fn test_get_embedded_unknown() {
        assert!(get_embedded("unknown-template").is_none());
    }
}
