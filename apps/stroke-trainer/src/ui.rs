//! UI rendering for stroke trainer.

use crate::app::{App, MessageType, ROW_ASPECT};
use hanzi_quiz::{geometry, Point, Positioner};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Context, Line as CanvasLine},
        Block, Borders, Clear, Paragraph, Wrap,
    },
    Frame,
};
use std::time::Instant;

/// Draw the application.
pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Canvas + progress
            Constraint::Length(3), // Footer/status
        ])
        .split(f.area());

    draw_header(f, app, chunks[0]);

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(30)])
        .split(chunks[1]);
    draw_canvas(f, app, content[0]);
    draw_progress(f, app, content[1]);
    draw_footer(f, app, chunks[2]);

    if app.show_help {
        draw_help_popup(f);
    }
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let mut tabs: Vec<Span> = Vec::new();
    for (i, symbol) in app.config.data.characters.iter().enumerate() {
        if i > 0 {
            tabs.push(Span::raw(" "));
        }
        tabs.push(styled_tab(symbol, i == app.current));
    }

    let header = Paragraph::new(Line::from(tabs))
        .block(Block::default().borders(Borders::ALL).title(" Stroke Trainer "))
        .alignment(Alignment::Center);

    f.render_widget(header, area);
}

fn styled_tab(label: &str, active: bool) -> Span<'static> {
    if active {
        Span::styled(
            format!("[{label}]"),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(format!(" {label} "), Style::default().fg(Color::Gray))
    }
}

fn draw_canvas(f: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Draw here ");
    let inner = block.inner(area);
    app.set_canvas_area(inner);

    let width = f64::from(inner.width);
    let height = f64::from(inner.height) * ROW_ASPECT;
    let app: &App = app;
    let positioner = *app.session.positioner();
    let now = Instant::now();

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(move |ctx| paint_character(ctx, app, &positioner, height, now));

    f.render_widget(canvas, area);
}

fn paint_character(ctx: &mut Context, app: &App, positioner: &Positioner, height: f64, now: Instant) {
    let Some(character) = app.session.character() else {
        return;
    };
    let state = app.session.state();
    let to_canvas = |p: Point| {
        let surface = positioner.convert_internal_point(p);
        (surface.x, height - surface.y)
    };

    let show_outline = state.active().map_or(true, |quiz| quiz.options.show_outline);
    if show_outline {
        for stroke in &character.strokes {
            polyline(ctx, stroke.points.iter().map(|&p| to_canvas(p)), Color::DarkGray);
        }
    }

    let completed = match state.active() {
        Some(quiz) => quiz.index,
        None if app.drawn.len() >= character.stroke_count() => character.stroke_count(),
        None => 0,
    };
    for stroke in character.strokes.iter().take(completed) {
        polyline(ctx, stroke.points.iter().map(|&p| to_canvas(p)), Color::White);
    }

    if let Some(stroke) = app.hint.and_then(|i| character.strokes.get(i)) {
        polyline(ctx, stroke.points.iter().map(|&p| to_canvas(p)), Color::Yellow);
    }

    if app.config.display.show_drawn_strokes {
        for points in &app.drawn {
            polyline(ctx, points.iter().map(|&p| to_canvas(p)), Color::Green);
        }
    }

    if let Some(reveal) = &app.reveal {
        let progress = reveal.progress(now);
        for (i, stroke) in character.strokes.iter().enumerate() {
            let fraction = (progress - i as f64).clamp(0.0, 1.0);
            if fraction > 0.0 {
                let partial = partial_polyline(&stroke.points, fraction);
                polyline(ctx, partial.into_iter().map(to_canvas), Color::LightBlue);
            }
        }
    }

    // The gesture in progress is already in surface coordinates.
    if let Some(stroke) = app.session.user_stroke() {
        polyline(
            ctx,
            stroke.external_points.iter().map(|p| (p.x, height - p.y)),
            Color::Cyan,
        );
    }
}

fn polyline(ctx: &mut Context, points: impl Iterator<Item = (f64, f64)>, color: Color) {
    let points: Vec<(f64, f64)> = points.collect();
    for pair in points.windows(2) {
        ctx.draw(&CanvasLine {
            x1: pair[0].0,
            y1: pair[0].1,
            x2: pair[1].0,
            y2: pair[1].1,
            color,
        });
    }
}

/// Leading `fraction` of a polyline, measured along its length.
fn partial_polyline(points: &[Point], fraction: f64) -> Vec<Point> {
    let total = geometry::length(points);
    let Some(&first) = points.first() else {
        return Vec::new();
    };
    let target = total * fraction.clamp(0.0, 1.0);
    let mut out = vec![first];
    let mut walked = 0.0;
    for pair in points.windows(2) {
        let segment = geometry::distance(pair[0], pair[1]);
        if walked + segment >= target {
            let t = if segment > 0.0 { (target - walked) / segment } else { 0.0 };
            out.push(Point::new(
                pair[0].x + (pair[1].x - pair[0].x) * t,
                pair[0].y + (pair[1].y - pair[0].y) * t,
            ));
            return out;
        }
        walked += segment;
        out.push(pair[1]);
    }
    out
}

fn draw_progress(f: &mut Frame, app: &App, area: Rect) {
    let state = app.session.state();
    let mut lines = Vec::new();

    match app.session.character() {
        Some(character) => {
            lines.push(Line::from(Span::styled(
                format!("Character: {}", character.symbol),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(format!("Strokes:   {}", character.stroke_count())));
        }
        None => lines.push(Line::from("No character loaded")),
    }
    lines.push(Line::from(""));

    match state.active() {
        Some(quiz) => {
            lines.push(Line::from(format!(
                "Stroke {} of {}",
                quiz.index + 1,
                quiz.character.stroke_count()
            )));
            lines.push(Line::from(format!("Misses here: {}", quiz.mistakes_on(quiz.index))));
            lines.push(Line::from(format!("Total misses: {}", quiz.total_mistakes())));
        }
        None => lines.push(Line::from(Span::styled(
            "Not quizzing",
            Style::default().fg(Color::DarkGray),
        ))),
    }
    lines.push(Line::from(""));

    let quiz = &app.config.quiz;
    lines.push(Line::from(format!("Leniency:  {:.2}", quiz.leniency)));
    lines.push(Line::from(format!(
        "Outline:   {}",
        if quiz.show_outline { "on" } else { "off" }
    )));
    lines.push(Line::from(format!(
        "Backwards: {}",
        if quiz.accept_backwards_strokes { "accepted" } else { "rejected" }
    )));

    let panel = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Progress "))
        .wrap(Wrap { trim: false });
    f.render_widget(panel, area);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let (msg, style) = if let Some((ref message, msg_type)) = app.message {
        let color = match msg_type {
            MessageType::Info => Color::Blue,
            MessageType::Success => Color::Green,
            MessageType::Warning => Color::Yellow,
            MessageType::Error => Color::Red,
        };
        (message.clone(), Style::default().fg(color))
    } else {
        (
            "Drag:Draw  s:Start  x:Stop  n/p:Character  a:Animate  ?:Help  q:Quit".to_string(),
            Style::default().fg(Color::DarkGray),
        )
    };

    let footer = Paragraph::new(msg)
        .style(style)
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(footer, area);
}

fn draw_help_popup(f: &mut Frame) {
    let area = centered_rect(60, 70, f.area());
    f.render_widget(Clear, area);

    let help_text = r#"
Stroke Trainer Keybindings

Drawing:
  Left drag       Draw a stroke on the canvas

Quiz:
  s               Start (or restart) the quiz
  x               Stop the quiz
  n/p, Right/Left Next/previous character
  a               Animate strokes (while stopped)

Options (apply to the next quiz):
  o               Toggle outline
  b               Toggle accepting backwards strokes

General:
  ?               Show this help
  q               Quit

Press any key to close
"#;

    let popup = Paragraph::new(help_text)
        .block(Block::default().borders(Borders::ALL).title(" Help "))
        .wrap(Wrap { trim: false });

    f.render_widget(popup, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::loader::DirectorySource;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_partial_polyline() {
        let line = [Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)];
        assert_eq!(partial_polyline(&line, 0.25), vec![Point::new(0.0, 0.0), Point::new(5.0, 0.0)]);
        assert_eq!(partial_polyline(&line, 1.0).last(), Some(&Point::new(10.0, 10.0)));
        assert!(partial_polyline(&[], 0.5).is_empty());
    }

    #[test]
    fn test_draw_sets_canvas_area() {
        let mut app = App::new(Config::default(), Box::new(DirectorySource::default()));
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|f| draw(f, &mut app)).unwrap();
        // 100 wide minus the 30-column panel and the canvas border.
        assert_eq!(app.canvas_area, Rect::new(1, 4, 68, 32));
        assert_eq!(app.session.positioner().width, 68.0);
        assert_eq!(app.session.positioner().height, 64.0);
    }
}
