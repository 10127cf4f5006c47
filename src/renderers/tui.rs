//! ratatui drawing for the terminal player.
//!
//! Layout:
//!
//! ```text
//! ┌ title: algorithm, seed, counter, play state ──────────────┐
//! ├ visualization ─────────────────────┬ pseudocode ──────────┤
//! │ timeline / sack / graph            │ ▶ highlighted line   │
//! ├ description ───────────────────────┴──────────────────────┤
//! └ controls ─────────────────────────────────────────────────┘
//! ```
//!
//! Views draw the state *including* the step at the cursor so the current
//! decision is visible.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Line as CanvasLine},
        Block, Borders, Gauge, Paragraph, Wrap,
    },
    Frame,
};

use crate::demos::activity::{ActivityState, ActivityStep};
use crate::demos::knapsack::{KnapsackState, KnapsackStep};
use crate::demos::prim::{PrimState, PrimStep};
use crate::demos::AnySession;
use crate::engine::{Clock, PseudoLine};

const FOCUS: Color = Color::Yellow;
const ACCEPTED: Color = Color::Green;
const REJECTED: Color = Color::DarkGray;

/// Draw the whole player.
pub fn draw<C: Clock + Clone>(f: &mut Frame, session: &AnySession<C>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(4),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_title(f, chunks[0], session);

    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);
    render_visual(f, main[0], session);
    render_pseudocode(f, main[1], session.pseudocode(), session.source_line());

    render_description(f, chunks[2], session);
    render_controls(f, chunks[3], session);
}

fn render_title<C: Clock + Clone>(f: &mut Frame, area: Rect, session: &AnySession<C>) {
    let (current, total) = session.counter();
    let play = if session.is_playing() { "▶ playing" } else { "⏸ paused" };
    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {} ", session.kind().title()),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" seed {}  ", session.config().seed())),
        Span::styled(format!("step {current}/{total}  "), Style::default().fg(Color::Yellow)),
        Span::styled(play, Style::default().fg(Color::Gray)),
    ]))
    .block(Block::default().borders(Borders::ALL).title("greedyviz"));
    f.render_widget(title, area);
}

fn render_visual<C: Clock + Clone>(f: &mut Frame, area: Rect, session: &AnySession<C>) {
    if session.is_empty() {
        let empty = Paragraph::new("no data")
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL).title("Visualization"));
        f.render_widget(empty, area);
        return;
    }
    match session {
        AnySession::Activity(s) => {
            let player = s.player();
            let focus = match player.current_step().map(|st| &st.kind) {
                Some(ActivityStep::Select { index, .. } | ActivityStep::Skip { index, .. }) => Some(*index),
                _ => None,
            };
            if let Some(state) = &player.sink().frame().state {
                render_activity(f, area, state, focus);
            }
        }
        AnySession::Knapsack(s) => {
            let player = s.player();
            let focus = match player.current_step().map(|st| &st.kind) {
                Some(
                    KnapsackStep::CalculateRatio { index, .. }
                    | KnapsackStep::TakeWhole { index, .. }
                    | KnapsackStep::TakeFraction { index, .. },
                ) => Some(*index),
                _ => None,
            };
            if let Some(state) = &player.sink().frame().state {
                render_knapsack(f, area, state, focus);
            }
        }
        AnySession::Prim(s) => {
            let player = s.player();
            let focus = match player.current_step().map(|st| &st.kind) {
                Some(
                    PrimStep::StartVertex { vertex }
                    | PrimStep::AddVertex { vertex, .. }
                    | PrimStep::UpdateKey { vertex, .. },
                ) => Some(*vertex),
                Some(PrimStep::AddEdge { to, .. }) => Some(*to),
                _ => None,
            };
            if let Some(state) = &player.sink().frame().state {
                render_prim(f, area, state, focus);
            }
        }
    }
}

// =============================================================================
// Activity selection
// =============================================================================

/// Cells per row taken by the label, the borders and the `[start-end)` suffix.
const TIMELINE_RESERVED: usize = 30;

/// One timeline row per activity, in sorted order once sorted.
fn activity_lines(state: &ActivityState, focus: Option<usize>, width: usize) -> Vec<Line<'static>> {
    let order: Vec<usize> = if state.order.is_empty() {
        (0..state.activities.len()).collect()
    } else {
        state.order.clone()
    };
    let horizon = u64::from(state.activities.iter().map(|a| a.end).max().unwrap_or(1).max(1));
    let columns = timeline_columns(horizon, width.saturating_sub(TIMELINE_RESERVED));

    order
        .iter()
        .filter_map(|&i| state.activities.get(i).map(|a| (i, a)))
        .map(|(i, activity)| {
            let color = if focus == Some(i) {
                FOCUS
            } else if state.selected.contains(&i) {
                ACCEPTED
            } else if state.skipped.contains(&i) {
                REJECTED
            } else {
                Color::White
            };
            let bar: String = (0..columns)
                .map(|c| {
                    // Column c covers times [t0, t1).
                    let t0 = c * horizon / columns;
                    let t1 = ((c + 1) * horizon / columns).max(t0 + 1);
                    if u64::from(activity.start) < t1 && u64::from(activity.end) > t0 {
                        '█'
                    } else {
                        '·'
                    }
                })
                .collect();
            Line::from(vec![
                Span::styled(format!("{:<4}", activity.label), Style::default().fg(color)),
                Span::styled(bar, Style::default().fg(color)),
                Span::raw(format!(" [{}-{})", activity.start, activity.end)),
            ])
        })
        .collect()
}

/// Number of timeline columns for `horizon` time units in `available` cells.
///
/// Short horizons get a whole number of cells per time unit; long ones are
/// scaled down so the bar never exceeds the available width.
fn timeline_columns(horizon: u64, available: usize) -> u64 {
    let available = (available as u64).max(1);
    if horizon <= available {
        horizon * (available / horizon)
    } else {
        available
    }
}

fn render_activity(f: &mut Frame, area: Rect, state: &ActivityState, focus: Option<usize>) {
    let mut lines = activity_lines(state, focus, usize::from(area.width));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::raw("last finish: "),
        Span::styled(
            state.last_finish.map_or_else(|| "-∞".to_string(), |t| t.to_string()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(format!("   selected: {}", state.selected.len())),
    ]));
    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Timeline (green=selected, gray=skipped, yellow=current)"),
    );
    f.render_widget(widget, area);
}

// =============================================================================
// Fractional knapsack
// =============================================================================

const SACK_CELLS: usize = 20;

fn knapsack_lines(state: &KnapsackState, focus: Option<usize>) -> Vec<Line<'static>> {
    let order: Vec<usize> = if state.order.is_empty() {
        (0..state.items.len()).collect()
    } else {
        state.order.clone()
    };
    order
        .iter()
        .filter_map(|&i| state.items.get(i).map(|item| (i, item)))
        .map(|(i, item)| {
            let fraction = state.fraction_of(i);
            let filled = ((fraction * SACK_CELLS as f64).round() as usize).min(SACK_CELLS);
            let color = if focus == Some(i) {
                FOCUS
            } else if fraction > 0.0 {
                ACCEPTED
            } else {
                Color::White
            };
            let ratio = state
                .ratios
                .get(i)
                .copied()
                .flatten()
                .map_or_else(|| "  ?  ".to_string(), |r| format!("{r:5.2}"));
            Line::from(vec![
                Span::styled(format!("{:<4}", item.label), Style::default().fg(color)),
                Span::raw(format!("v={:<4} w={:<3} r={ratio} ", item.value, item.weight)),
                Span::styled("█".repeat(filled), Style::default().fg(color)),
                Span::styled("░".repeat(SACK_CELLS - filled), Style::default().fg(REJECTED)),
                Span::raw(format!(" {:>3.0}%", fraction * 100.0)),
            ])
        })
        .collect()
}

fn render_knapsack(f: &mut Frame, area: Rect, state: &KnapsackState, focus: Option<usize>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    let items = Paragraph::new(knapsack_lines(state, focus))
        .block(Block::default().borders(Borders::ALL).title("Items (by ratio once sorted)"));
    f.render_widget(items, chunks[0]);

    let capacity = f64::from(state.capacity);
    let ratio = if capacity > 0.0 {
        (state.total_weight / capacity).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Sack"))
        .gauge_style(Style::default().fg(ACCEPTED))
        .ratio(ratio)
        .label(format!(
            "weight {:.2}/{}  value {:.2}",
            state.total_weight, state.capacity, state.total_value
        ));
    f.render_widget(gauge, chunks[1]);
}

// =============================================================================
// Prim
// =============================================================================

fn render_prim(f: &mut Frame, area: Rect, state: &PrimState, focus: Option<usize>) {
    if state.vertices.is_empty() {
        let empty = Paragraph::new("no vertices")
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL).title("Graph"));
        f.render_widget(empty, area);
        return;
    }
    let (min_x, max_x, min_y, max_y) = state.vertices.iter().fold(
        (f64::MAX, f64::MIN, f64::MAX, f64::MIN),
        |(min_x, max_x, min_y, max_y), v| (min_x.min(v.x), max_x.max(v.x), min_y.min(v.y), max_y.max(v.y)),
    );
    let padding: f64 = 0.15;
    let x_range = (max_x - min_x).max(1.0);
    let y_range = (max_y - min_y).max(1.0);

    // Screen coordinates grow downwards; the canvas grows upwards.
    let canvas = Canvas::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Graph (tree weight {})", state.total_weight)),
        )
        .x_bounds([padding.mul_add(-x_range, min_x), padding.mul_add(x_range, max_x)])
        .y_bounds([padding.mul_add(-y_range, -max_y), padding.mul_add(y_range, -min_y)])
        .paint(move |ctx| {
            for edge in &state.edges {
                let (Some(a), Some(b)) = (state.vertices.get(edge.from), state.vertices.get(edge.to)) else {
                    continue;
                };
                let color = if state.is_tree_edge(edge) {
                    ACCEPTED
                } else if focus.is_some_and(|v| {
                    state.parents.get(v).copied().flatten().is_some_and(|p| edge.other(v) == Some(p))
                }) {
                    FOCUS
                } else {
                    REJECTED
                };
                ctx.draw(&CanvasLine {
                    x1: a.x,
                    y1: -a.y,
                    x2: b.x,
                    y2: -b.y,
                    color,
                });
                ctx.print(
                    (a.x + b.x) / 2.0,
                    -(a.y + b.y) / 2.0,
                    Span::styled(edge.weight.to_string(), Style::default().fg(Color::Gray)),
                );
            }
            for (i, vertex) in state.vertices.iter().enumerate() {
                let key = state
                    .keys
                    .get(i)
                    .copied()
                    .flatten()
                    .map_or_else(|| "∞".to_string(), |k| k.to_string());
                let color = if focus == Some(i) {
                    FOCUS
                } else if state.contains(i) {
                    ACCEPTED
                } else {
                    Color::White
                };
                ctx.print(
                    vertex.x,
                    -vertex.y,
                    Span::styled(
                        format!("{}:{key}", vertex.label),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ),
                );
            }
        });
    f.render_widget(canvas, area);
}

// =============================================================================
// Shared panels
// =============================================================================

fn pseudocode_lines(listing: &[PseudoLine], highlight: Option<&str>) -> Vec<Line<'static>> {
    listing
        .iter()
        .map(|line| {
            if highlight == Some(line.label) {
                Line::from(Span::styled(
                    format!("▶ {}", line.text),
                    Style::default().fg(Color::Black).bg(FOCUS).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(format!("  {}", line.text))
            }
        })
        .collect()
}

fn render_pseudocode(f: &mut Frame, area: Rect, listing: &[PseudoLine], highlight: Option<&str>) {
    let widget = Paragraph::new(pseudocode_lines(listing, highlight))
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Pseudocode"));
    f.render_widget(widget, area);
}

fn render_description<C: Clock + Clone>(f: &mut Frame, area: Rect, session: &AnySession<C>) {
    let widget = Paragraph::new(session.description().to_string())
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("What happens"));
    f.render_widget(widget, area);
}

fn control(key: &str, label: &str, enabled: bool) -> Vec<Span<'static>> {
    let style = if enabled {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(REJECTED)
    };
    vec![Span::styled(format!("[{key}]"), style), Span::raw(format!(" {label}  "))]
}

fn render_controls<C: Clock + Clone>(f: &mut Frame, area: Rect, session: &AnySession<C>) {
    let (prev, next) = session.controls();
    let auto = session.len() > 1;
    let play = if session.is_playing() { "pause" } else { "play" };
    let speed = format!("speed {}ms", session.interval().as_millis());

    let mut spans = Vec::new();
    spans.extend(control("←", "prev", prev));
    spans.extend(control("→", "next", next));
    spans.extend(control("space", play, auto));
    spans.extend(control("Home/End", "seek", !session.is_empty()));
    spans.extend(control("r", "reset", true));
    spans.extend(control("g", "new data", true));
    spans.extend(control("1/2/3", "algorithm", true));
    spans.extend(control("+/-", &speed, true));
    spans.extend(control("q", "quit", true));

    let widget = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL).title("Controls"));
    f.render_widget(widget, area);
}
