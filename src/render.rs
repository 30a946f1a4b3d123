//! Result rendering: scored tasks to cards.
//!
//! `render` turns the service's ordered result list into nodes appended to a
//! `ResultContainer`. The container is cleared first on every call, so calls
//! are idempotent. Order is preserved as received; ranking is the service's job.

use std::io::{self, Write};

use serde_json::Value;

use crate::severity::{classify, Severity};
use crate::task::{is_truthy, value_text, ScoredTask};

pub const NO_RESULTS: &str = "No results.";
pub const NO_TITLE: &str = "(No title)";
const NOT_AVAILABLE: &str = "N/A";
const UNKNOWN: &str = "?";
const NO_DEPENDENCIES: &str = "None";

/// One rendered task.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultCard {
    pub severity: Severity,
    pub title: String,
    pub meta: String,
    /// Raw score text as sent by the service.
    pub score: String,
    pub explanation: String,
}

impl ResultCard {
    pub fn from_task(task: &ScoredTask) -> Self {
        ResultCard {
            severity: classify(task.score_value()),
            title: truthy_text(task.title.as_ref()).unwrap_or_else(|| NO_TITLE.to_string()),
            meta: format_meta(task),
            score: task
                .score
                .as_ref()
                .filter(|v| !v.is_null())
                .map(value_text)
                .unwrap_or_else(|| UNKNOWN.to_string()),
            explanation: truthy_text(task.explanation.as_ref()).unwrap_or_default(),
        }
    }

    pub fn score_line(&self) -> String {
        format!("Score: {}", self.score)
    }
}

/// A child node of the results container.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultNode {
    Placeholder(String),
    Card(ResultCard),
}

/// Output surface for rendered results: ordered append and full clear.
pub trait ResultContainer {
    fn clear(&mut self);
    fn append(&mut self, node: ResultNode);
}

/// In-memory results container, drawn by the terminal UI and printed by the CLI.
#[derive(Debug, Default)]
pub struct ResultsPane {
    nodes: Vec<ResultNode>,
}

impl ResultsPane {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[ResultNode] {
        &self.nodes
    }

    pub fn cards(&self) -> impl Iterator<Item = &ResultCard> {
        self.nodes.iter().filter_map(|n| match n {
            ResultNode::Card(card) => Some(card),
            ResultNode::Placeholder(_) => None,
        })
    }
}

impl ResultContainer for ResultsPane {
    fn clear(&mut self) {
        self.nodes.clear();
    }

    fn append(&mut self, node: ResultNode) {
        self.nodes.push(node);
    }
}

/// Replace the container's content with one card per task, or a placeholder.
pub fn render<C: ResultContainer + ?Sized>(container: &mut C, tasks: Option<&[ScoredTask]>) {
    container.clear();

    match tasks {
        Some(tasks) if !tasks.is_empty() => {
            for task in tasks {
                container.append(ResultNode::Card(ResultCard::from_task(task)));
            }
        }
        _ => container.append(ResultNode::Placeholder(NO_RESULTS.to_string())),
    }
}

/// Metadata line: due date, hours, importance and dependencies.
pub fn format_meta(task: &ScoredTask) -> String {
    let due = truthy_text(task.due_date.as_ref()).unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let hours = present_text(task.estimated_hours.as_ref());
    let importance = present_text(task.importance.as_ref());
    let deps = format_dependencies(task.dependencies.as_ref());
    format!("Due: {due} | Hours: {hours} | Importance: {importance} | Dependencies: {deps}")
}

fn format_dependencies(deps: Option<&Value>) -> String {
    let joined = match deps {
        Some(Value::Array(items)) => items
            .iter()
            .map(value_text)
            .collect::<Vec<_>>()
            .join(", "),
        Some(other) if is_truthy(other) => value_text(other),
        _ => String::new(),
    };
    if joined.is_empty() {
        NO_DEPENDENCIES.to_string()
    } else {
        joined
    }
}

/// Text of a value unless it is falsy.
fn truthy_text(value: Option<&Value>) -> Option<String> {
    value.filter(|v| is_truthy(v)).map(value_text)
}

/// Text of a value unless it is absent or null. Zero is kept.
fn present_text(value: Option<&Value>) -> String {
    value
        .filter(|v| !v.is_null())
        .map(value_text)
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// Print rendered nodes as plain text cards.
pub fn write_text<W: Write>(out: &mut W, nodes: &[ResultNode]) -> io::Result<()> {
    for node in nodes {
        match node {
            ResultNode::Placeholder(text) => writeln!(out, "{text}")?,
            ResultNode::Card(card) => {
                writeln!(out, "[{}] {}", card.severity.label(), card.title)?;
                writeln!(out, "  {}", card.meta)?;
                writeln!(out, "  {}", card.score_line())?;
                if !card.explanation.is_empty() {
                    writeln!(out, "  {}", card.explanation)?;
                }
                writeln!(out)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scored(value: Value) -> ScoredTask {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_empty_and_absent_render_single_placeholder() {
        let mut pane = ResultsPane::new();
        render(&mut pane, Some(&[][..]));
        assert_eq!(pane.nodes(), &[ResultNode::Placeholder(NO_RESULTS.to_string())]);

        render(&mut pane, None);
        assert_eq!(pane.nodes().len(), 1);
        assert_eq!(pane.cards().count(), 0);
    }

    #[test]
    fn test_full_card() {
        let task = scored(json!({
            "title": "A",
            "score": 150,
            "due_date": "2024-01-01",
            "estimated_hours": 2,
            "importance": 9,
            "dependencies": [1, 2]
        }));
        let mut pane = ResultsPane::new();
        render(&mut pane, Some(&[task][..]));

        let cards: Vec<_> = pane.cards().collect();
        assert_eq!(cards.len(), 1);
        let card = cards[0];
        assert_eq!(card.severity, Severity::High);
        assert_eq!(card.title, "A");
        assert_eq!(
            card.meta,
            "Due: 2024-01-01 | Hours: 2 | Importance: 9 | Dependencies: 1, 2"
        );
        assert_eq!(card.score_line(), "Score: 150");
        assert_eq!(card.explanation, "");
    }

    #[test]
    fn test_fallbacks_for_missing_fields() {
        let card = ResultCard::from_task(&ScoredTask::default());
        assert_eq!(card.title, NO_TITLE);
        assert_eq!(
            card.meta,
            "Due: N/A | Hours: ? | Importance: ? | Dependencies: None"
        );
        assert_eq!(card.score, "?");
        assert_eq!(card.severity, Severity::Low);
    }

    #[test]
    fn test_zero_hours_is_shown_not_replaced() {
        let task = scored(json!({"title": "", "estimated_hours": 0, "importance": 0, "dependencies": []}));
        let card = ResultCard::from_task(&task);
        assert_eq!(card.title, NO_TITLE);
        assert_eq!(
            card.meta,
            "Due: N/A | Hours: 0 | Importance: 0 | Dependencies: None"
        );
    }

    #[test]
    fn test_order_is_preserved_and_classified_per_card() {
        let tasks = vec![
            scored(json!({"title": "low first", "score": 10})),
            scored(json!({"title": "high second", "score": 130.5, "explanation": "urgent"})),
            scored(json!({"title": "medium third", "score": 80})),
        ];
        let mut pane = ResultsPane::new();
        render(&mut pane, Some(tasks.as_slice()));

        let summary: Vec<_> = pane
            .cards()
            .map(|c| (c.title.as_str(), c.severity, c.score.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("low first", Severity::Low, "10"),
                ("high second", Severity::High, "130.5"),
                ("medium third", Severity::Medium, "80"),
            ]
        );
        assert_eq!(pane.cards().nth(1).unwrap().explanation, "urgent");
    }

    #[test]
    fn test_render_replaces_previous_output() {
        let mut pane = ResultsPane::new();
        render(&mut pane, Some(&[scored(json!({"title": "old"}))][..]));
        render(&mut pane, Some(&[scored(json!({"title": "new"}))][..]));
        let titles: Vec<_> = pane.cards().map(|c| c.title.clone()).collect();
        assert_eq!(titles, vec!["new"]);
    }

    #[test]
    fn test_write_text() {
        let mut pane = ResultsPane::new();
        render(
            &mut pane,
            Some(&[scored(json!({"title": "A", "score": 90, "explanation": "why"}))][..]),
        );
        let mut out = Vec::new();
        write_text(&mut out, pane.nodes()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "[MEDIUM] A\n  Due: N/A | Hours: ? | Importance: ? | Dependencies: None\n  Score: 90\n  why\n\n"
        );
    }
}
