//! Plain-terminal rendering of results for the batch commands

use colored::{ColoredString, Colorize};

use crate::domain::{AnalysisCategory, EthicalScore, GoalAnalysis, Strategy};

fn score_text(score: &EthicalScore) -> ColoredString {
    let text = format!("{}%", score.percent());
    if score.is_sound() {
        text.green().bold()
    } else if score.score >= 0.7 {
        text.yellow().bold()
    } else {
        text.red().bold()
    }
}

/// Analysis as three headed, numbered lists
pub fn analysis_text(goal: &str, analysis: &GoalAnalysis) -> String {
    let mut out = format!("{} {}\n", "Goal:".bold(), goal);
    for category in AnalysisCategory::ALL {
        out.push('\n');
        out.push_str(&format!(
            "{} {}\n",
            category.title().cyan().bold(),
            format!("({})", category.subtitle()).dimmed()
        ));
        for (i, item) in analysis.items(category).iter().enumerate() {
            out.push_str(&format!("  {}. {}\n", i + 1, item));
        }
    }
    out
}

/// Strategies with their steps and ethics scores
pub fn strategies_text(strategies: &[Strategy]) -> String {
    let mut out = String::new();
    for strategy in strategies {
        out.push('\n');
        out.push_str(&format!(
            "{} {}\n",
            format!("Path {}:", strategy.path).cyan().bold(),
            strategy.title.bold()
        ));
        out.push_str(&format!("  {}\n", strategy.path.character().dimmed()));
        out.push_str(&format!("  {}\n", strategy.description));
        for (i, step) in strategy.steps.iter().enumerate() {
            out.push_str(&format!("    {}. {}\n", i + 1, step));
        }
        match &strategy.ethical_score {
            Some(score) => out.push_str(&format!(
                "  P(Goodness): {} {}\n",
                score_text(score),
                score.rationale.dimmed()
            )),
            None => out.push_str(&format!("  {}\n", "Ethics score unavailable".dimmed())),
        }
    }
    out
}
