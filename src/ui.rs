use crate::app::App;
use crate::braille::BrailleCanvas;
use crate::data::Category;
use crate::map::arc::Brightness;
use crate::map::geometry::{draw_circle, draw_geo_line};
use crate::map::Projection;
use crate::timeline::DriverState;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
    Frame,
};
use std::time::Instant;

/// Render the UI
pub fn render(frame: &mut Frame, app: &App, now: Instant) {
    let area = frame.area();

    // Split into map area and status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Map
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_map(frame, app, chunks[0], now);
    render_status_bar(frame, app, chunks[1]);
}

fn render_map(frame: &mut Frame, app: &App, area: Rect, now: Instant) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " Born & Died in Amsterdam ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    // Braille gives 2x4 resolution per character
    let char_width = inner.width as usize;
    let char_height = inner.height as usize;
    let projection = Projection::new(&app.config, char_width * 2, char_height * 4);

    let (land, boundaries) = app.scene.render(char_width, char_height, &projection);

    // Layers back to front: static scene, then faint arcs under bright ones
    let mut layers: Vec<(BrailleCanvas, Color)> = vec![
        (land, Color::Green),
        (boundaries, Color::DarkGray),
    ];

    for level in [Brightness::Faint, Brightness::Mid, Brightness::Bright] {
        for category in [Category::Departed, Category::Arrived] {
            let mut canvas = BrailleCanvas::new(char_width, char_height);
            for sprite in &app.arcs {
                if sprite.category != category {
                    continue;
                }
                let (points, brightness) = sprite.visible(now, app.fade_out);
                if brightness != level {
                    continue;
                }
                if sprite.is_point() {
                    if let Some(&(lon, lat)) = points.first() {
                        let (px, py) = projection.project(lon, lat);
                        draw_circle(&mut canvas, px, py, 2);
                    }
                } else {
                    draw_geo_line(&mut canvas, points, &projection);
                }
            }
            if !canvas.is_blank() {
                layers.push((canvas, arc_color(category, level)));
            }
        }
    }

    frame.render_widget(MapWidget { layers }, inner);
}

fn arc_color(category: Category, level: Brightness) -> Color {
    match (category, level) {
        (Category::Arrived, Brightness::Bright) => Color::LightYellow,
        (Category::Arrived, Brightness::Mid) => Color::Yellow,
        (Category::Departed, Brightness::Bright) => Color::LightMagenta,
        (Category::Departed, Brightness::Mid) => Color::Magenta,
        (_, Brightness::Faint) => Color::DarkGray,
    }
}

/// Widget stacking braille canvas layers back to front
struct MapWidget {
    layers: Vec<(BrailleCanvas, Color)>,
}

impl Widget for MapWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for (canvas, color) in &self.layers {
            render_layer(canvas, *color, area, buf);
        }
    }
}

fn render_layer(canvas: &BrailleCanvas, color: Color, area: Rect, buf: &mut Buffer) {
    for (row_idx, row_str) in canvas.rows().enumerate() {
        if row_idx >= area.height as usize {
            break;
        }
        let y = area.y + row_idx as u16;

        for (col_idx, ch) in row_str.chars().enumerate() {
            if col_idx >= area.width as usize {
                break;
            }
            // Skip empty braille characters (U+2800)
            if ch == '\u{2800}' {
                continue;
            }
            let x = area.x + col_idx as u16;
            buf[(x, y)].set_char(ch).set_fg(color);
        }
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let year = app.year.map_or_else(|| "-".to_string(), |y| y.to_string());

    let mut spans = vec![
        Span::styled(" Year: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            year,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("  arrivals ", Style::default().fg(Color::DarkGray)),
        Span::styled("──", Style::default().fg(Color::LightYellow)),
        Span::styled("  departures ", Style::default().fg(Color::DarkGray)),
        Span::styled("──", Style::default().fg(Color::LightMagenta)),
        Span::styled(
            format!("  arcs: {}", app.arcs.len()),
            Style::default().fg(Color::DarkGray),
        ),
    ];

    if app.driver.state() == DriverState::Stopped && app.year.is_some() {
        spans.push(Span::styled("  done", Style::default().fg(Color::Green)));
    }
    spans.push(Span::styled(
        "  q:quit",
        Style::default().fg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
