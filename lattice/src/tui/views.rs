//! TUI views and rendering
//!
//! Drawing only: views read AppState and never modify it.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use tracing::trace;

use super::state::{AppState, ConfirmDialog, InteractionMode};
use crate::domain::{AnalysisCategory, EthicalScore, GoalAnalysis, Strategy, StrategyPath};
use crate::session::Screen;

mod colors {
    use ratatui::style::Color;

    pub const HEADER: Color = Color::Rgb(0, 255, 255); // Cyan
    pub const KEYBIND: Color = Color::Rgb(0, 255, 255);
    pub const NEGATIVE: Color = Color::Rgb(220, 20, 60); // Crimson
    pub const POSITIVE: Color = Color::Rgb(50, 205, 50); // Lime green
    pub const DECAY: Color = Color::Rgb(255, 215, 0); // Gold
    pub const ALPHA: Color = Color::Rgb(255, 69, 0); // Orange red
    pub const BETA: Color = Color::Rgb(100, 149, 237); // Cornflower blue
    pub const GAMMA: Color = Color::Rgb(0, 255, 127); // Spring green
    pub const SOUND: Color = Color::Rgb(50, 205, 50);
    pub const QUESTIONABLE: Color = Color::Rgb(255, 215, 0);
    pub const UNSOUND: Color = Color::Rgb(220, 20, 60);
    pub const ERROR: Color = Color::Rgb(220, 20, 60);
    pub const DIM: Color = Color::DarkGray;
}

/// Scores at or above this but under the goodness threshold are shown as a warning
const QUESTIONABLE_FLOOR: f64 = 0.7;

/// Main render function
pub fn render(state: &AppState, frame: &mut Frame) {
    trace!(screen = ?state.screen(), "render: called");
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    render_header(state, frame, chunks[0]);

    match state.screen() {
        Screen::AwaitingCredential => render_credential_prompt(state, frame, chunks[1]),
        Screen::AwaitingGoal => render_goal_prompt(state, frame, chunks[1]),
        Screen::Analyzing | Screen::GeneratingStrategies => render_loading(state, frame, chunks[1]),
        Screen::AnalysisReady => {
            if let Some(analysis) = state.session.state().analysis() {
                render_analysis(state, analysis, frame, chunks[1]);
            }
        }
        Screen::StrategiesReady => render_strategies(state, state.session.state().strategies(), frame, chunks[1]),
    }

    render_footer(state, frame, chunks[2]);

    match &state.interaction_mode {
        InteractionMode::Help => render_help_overlay(frame, frame.area()),
        InteractionMode::Confirm(dialog) => render_confirm_dialog(dialog, frame, frame.area()),
        InteractionMode::Normal => {}
    }
}

fn render_header(state: &AppState, frame: &mut Frame, area: Rect) {
    let stage = match state.screen() {
        Screen::AwaitingCredential => "API Key",
        Screen::AwaitingGoal => "Goal",
        Screen::Analyzing => "Analyzing",
        Screen::AnalysisReady => "Analysis",
        Screen::GeneratingStrategies => "Strategizing",
        Screen::StrategiesReady => "Strategies",
    };
    let key = state
        .session
        .state()
        .credential()
        .map(|c| c.redacted())
        .unwrap_or_else(|| "no key".to_string());

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "Lattice ",
            Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD),
        ),
        Span::raw("│ "),
        Span::styled(stage, Style::default().fg(Color::Yellow)),
        Span::raw(" │ "),
        Span::styled(key, Style::default().fg(colors::DIM)),
    ]))
    .block(Block::default().borders(Borders::ALL));

    frame.render_widget(header, area);
}

fn input_line(state: &AppState) -> Line<'static> {
    Line::from(vec![
        Span::styled("> ", Style::default().fg(colors::KEYBIND)),
        Span::raw(state.display_input()),
        Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
    ])
}

fn render_credential_prompt(state: &AppState, frame: &mut Frame, area: Rect) {
    let popup = centered_rect(70, 40, area);
    let content = vec![
        Line::from("Lattice needs a Gemini API key to talk to the model."),
        Line::from(Span::styled(
            "The key is saved on this machine and reused next time.",
            Style::default().fg(colors::DIM),
        )),
        Line::from(""),
        input_line(state),
    ];
    let widget = Paragraph::new(content)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" Enter API Key "));
    frame.render_widget(widget, popup);
}

fn render_goal_prompt(state: &AppState, frame: &mut Frame, area: Rect) {
    let popup = centered_rect(80, 40, area);
    let content = vec![
        Line::from("What do you want to achieve?"),
        Line::from(Span::styled(
            "Describe the goal in a sentence or two, then press Enter.",
            Style::default().fg(colors::DIM),
        )),
        Line::from(""),
        input_line(state),
    ];
    let widget = Paragraph::new(content)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" Goal "));
    frame.render_widget(widget, popup);
}

fn render_loading(state: &AppState, frame: &mut Frame, area: Rect) {
    let message = state.session.loading_message().unwrap_or_default();
    let popup = centered_rect(60, 20, area);
    let content = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(state.spinner(), Style::default().fg(colors::HEADER)),
            Span::raw(" "),
            Span::raw(message),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            format!("\"{}\"", state.session.state().goal_text()),
            Style::default().fg(colors::DIM),
        )),
    ];
    let widget = Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(widget, popup);
}

fn goal_banner(state: &AppState) -> Paragraph<'_> {
    Paragraph::new(Line::from(vec![
        Span::styled("Goal: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(state.session.state().goal_text()),
    ]))
    .wrap(Wrap { trim: true })
}

fn three_columns(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area)
}

fn category_color(category: AnalysisCategory) -> Color {
    match category {
        AnalysisCategory::NegativeShifts => colors::NEGATIVE,
        AnalysisCategory::PositiveShifts => colors::POSITIVE,
        AnalysisCategory::DecayFactors => colors::DECAY,
    }
}

fn render_analysis(state: &AppState, analysis: &GoalAnalysis, frame: &mut Frame, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);
    frame.render_widget(goal_banner(state), rows[0]);

    let columns = three_columns(rows[1]);
    for (category, column) in AnalysisCategory::ALL.into_iter().zip(columns.iter()) {
        let color = category_color(category);
        let mut lines = vec![
            Line::from(Span::styled(category.subtitle(), Style::default().fg(colors::DIM))),
            Line::from(""),
        ];
        for (i, item) in analysis.items(category).iter().enumerate() {
            lines.push(Line::from(vec![
                Span::styled(format!("{}. ", i + 1), Style::default().fg(color)),
                Span::raw(item.clone()),
            ]));
            lines.push(Line::from(""));
        }

        let widget = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .scroll((state.scroll, 0))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color))
                    .title(format!(" {} ", category.title())),
            );
        frame.render_widget(widget, *column);
    }
}

fn path_color(strategy: &Strategy) -> Color {
    match strategy.path {
        StrategyPath::Alpha => colors::ALPHA,
        StrategyPath::Beta => colors::BETA,
        StrategyPath::Gamma => colors::GAMMA,
    }
}

fn score_color(score: &EthicalScore) -> Color {
    if score.is_sound() {
        colors::SOUND
    } else if score.score >= QUESTIONABLE_FLOOR {
        colors::QUESTIONABLE
    } else {
        colors::UNSOUND
    }
}

fn score_lines(score: Option<&EthicalScore>) -> Vec<Line<'static>> {
    match score {
        Some(score) => vec![
            Line::from(vec![
                Span::styled("P(Goodness) ", Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(
                    format!("{}%", score.percent()),
                    Style::default().fg(score_color(score)).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(Span::styled(
                score.rationale.clone(),
                Style::default().fg(colors::DIM).add_modifier(Modifier::ITALIC),
            )),
        ],
        None => vec![Line::from(Span::styled(
            "Ethics score unavailable",
            Style::default().fg(colors::DIM),
        ))],
    }
}

fn render_strategies(state: &AppState, strategies: &[Strategy], frame: &mut Frame, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);
    frame.render_widget(goal_banner(state), rows[0]);

    let columns = three_columns(rows[1]);
    for (strategy, column) in strategies.iter().zip(columns.iter()) {
        let color = path_color(strategy);
        let mut lines = vec![
            Line::from(Span::styled(
                strategy.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(strategy.path.character(), Style::default().fg(colors::DIM))),
            Line::from(""),
            Line::from(strategy.description.clone()),
            Line::from(""),
        ];
        for (i, step) in strategy.steps.iter().enumerate() {
            lines.push(Line::from(vec![
                Span::styled(format!("{}. ", i + 1), Style::default().fg(color)),
                Span::raw(step.clone()),
            ]));
        }
        lines.push(Line::from(""));
        lines.extend(score_lines(strategy.ethical_score.as_ref()));

        let widget = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .scroll((state.scroll, 0))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color))
                    .title(format!(" Path {} ", strategy.path)),
            );
        frame.render_widget(widget, *column);
    }
}

fn keybind_line(binds: &[(&'static str, &'static str)]) -> Line<'static> {
    let mut spans = Vec::new();
    for (key, label) in binds {
        spans.push(Span::styled(*key, Style::default().fg(colors::KEYBIND)));
        spans.push(Span::raw(format!(" {}  ", label)));
    }
    Line::from(spans)
}

fn render_footer(state: &AppState, frame: &mut Frame, area: Rect) {
    let content = if let Some(error) = state.session.state().error_message() {
        Line::from(Span::styled(format!(" Error: {}", error), Style::default().fg(colors::ERROR)))
    } else {
        let binds: &[(&'static str, &'static str)] = match state.screen() {
            Screen::AwaitingCredential => &[("[Enter]", "Save key"), ("[F1]", "Help"), ("[Ctrl+C]", "Quit")],
            Screen::AwaitingGoal => &[
                ("[Enter]", "Analyze"),
                ("[Esc]", "Clear"),
                ("[Ctrl+K]", "Forget key"),
                ("[F1]", "Help"),
            ],
            Screen::Analyzing | Screen::GeneratingStrategies => &[("[q]", "Quit")],
            Screen::AnalysisReady => &[
                ("[Enter/g]", "Generate strategies"),
                ("[r]", "Start over"),
                ("[j/k]", "Scroll"),
                ("[?]", "Help"),
                ("[q]", "Quit"),
            ],
            Screen::StrategiesReady => &[("[r]", "Start over"), ("[j/k]", "Scroll"), ("[?]", "Help"), ("[q]", "Quit")],
        };
        keybind_line(binds)
    };

    let footer = Paragraph::new(content).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let key = |k: &'static str, label: &'static str| {
        Line::from(vec![
            Span::styled(format!("{:<12}", k), Style::default().fg(colors::KEYBIND)),
            Span::raw(label),
        ])
    };
    let heading = |text: &'static str| Line::from(Span::styled(text, Style::default().add_modifier(Modifier::BOLD)));

    let help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )),
        Line::from(""),
        heading("Everywhere"),
        key("Ctrl+C", "Quit"),
        key("F1", "Toggle help"),
        key("Ctrl+K", "Forget the saved API key"),
        Line::from(""),
        heading("Key and goal entry"),
        key("Enter", "Submit"),
        key("Esc", "Clear the input"),
        Line::from(""),
        heading("Results"),
        key("Enter, g", "Generate strategies from the analysis"),
        key("r", "Start over with a new goal"),
        key("j/k, ↑/↓", "Scroll"),
        key("?", "Toggle help"),
        key("q, Esc", "Quit"),
        Line::from(""),
        heading("Ethics scores"),
        Line::from(vec![
            Span::styled("■ ", Style::default().fg(colors::SOUND)),
            Span::raw(format!("{:.0}% and above: sound", EthicalScore::GOODNESS_THRESHOLD * 100.0)),
        ]),
        Line::from(vec![
            Span::styled("■ ", Style::default().fg(colors::QUESTIONABLE)),
            Span::raw("questionable"),
        ]),
        Line::from(vec![
            Span::styled("■ ", Style::default().fg(colors::UNSOUND)),
            Span::raw(format!("under {:.0}%: likely harmful", QUESTIONABLE_FLOOR * 100.0)),
        ]),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help ")
                .style(Style::default().bg(Color::Black)),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(help, popup_area);
}

fn render_confirm_dialog(dialog: &ConfirmDialog, frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(50, 25, area);
    frame.render_widget(Clear, popup_area);

    let yes_style = if dialog.selected_button {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Green)
    };
    let no_style = if !dialog.selected_button {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Red)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Red)
    };

    let content = vec![
        Line::from(""),
        Line::from(dialog.message.as_str()),
        Line::from(""),
        Line::from(vec![
            Span::styled(" No ", no_style),
            Span::raw("    "),
            Span::styled(" Yes ", yes_style),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Tab/←→: switch  Enter: confirm  Esc: cancel",
            Style::default().fg(colors::DIM),
        )),
    ];

    let widget = Paragraph::new(content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Confirm ")
                .style(Style::default().bg(Color::Black)),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(widget, popup_area);
}

/// Centered rect taking the given percentages of `area`
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
