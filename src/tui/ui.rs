use image::RgbaImage;
use image::imageops::{self, FilterType};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

use crate::models::{ImageSlot, VideoLink, VideoLookup};
use crate::tasks::gallery::MAX_IMAGES;

use super::{App, state::FocusArea};

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(12),
            Constraint::Length(7),
            Constraint::Length(1),
        ])
        .split(frame.size());

    draw_input(frame, app, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);

    draw_recipe(frame, app, body[0]);
    draw_videos(frame, app, body[1]);
    draw_gallery(frame, app, chunks[2]);
    draw_logs(frame, app, chunks[3]);
    draw_footer(frame, chunks[4]);
}

fn draw_input(frame: &mut Frame, app: &App, area: Rect) {
    let title = match app.busy {
        Some(action) => format!(
            "Dish {} {}",
            SPINNER[app.tick % SPINNER.len()],
            action.progress_label()
        ),
        None => "Enter the name of the dish you want to cook".to_string(),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style(app.focus, FocusArea::Input));

    let paragraph = Paragraph::new(format!("> {}", app.dish_input))
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

fn draw_recipe(frame: &mut Frame, app: &App, area: Rect) {
    let lines = if app.session.recipe.is_empty() {
        vec![Line::from("Press F1 to ask for a recipe").style(dim_style())]
    } else {
        recipe_lines(&app.session.recipe)
    };

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title("Recipe")
                .borders(Borders::ALL)
                .border_style(border_style(app.focus, FocusArea::Recipe)),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.recipe_scroll, 0));

    frame.render_widget(paragraph, area);
}

fn draw_videos(frame: &mut Frame, app: &mut App, area: Rect) {
    let items: Vec<ListItem> = match &app.session.videos {
        None => vec![ListItem::new("Press F3 to search YouTube").style(dim_style())],
        Some(VideoLookup::Found(links)) => links
            .iter()
            .map(|link| ListItem::new(video_lines(link)))
            .collect(),
        Some(lookup) => vec![ListItem::new(lookup.message().unwrap_or_default())],
    };

    let list = List::new(items)
        .block(
            Block::default()
                .title("YouTube Videos")
                .borders(Borders::ALL)
                .border_style(border_style(app.focus, FocusArea::Videos)),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    frame.render_stateful_widget(list, area, &mut app.video_state);
}

fn draw_gallery(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().title("Images").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.session.images.is_empty() {
        let text = if app.session.images_requested {
            Line::from("No images found.")
        } else {
            Line::from("Press F2 to fetch photos").style(dim_style())
        };
        frame.render_widget(Paragraph::new(text), inner);
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, MAX_IMAGES as u32); MAX_IMAGES])
        .split(inner);

    for (index, slot) in app.session.images.iter().enumerate() {
        draw_slot(frame, slot, columns[index % MAX_IMAGES]);
    }
}

fn draw_slot(frame: &mut Frame, slot: &ImageSlot, area: Rect) {
    match slot {
        ImageSlot::Loaded(image) => {
            let block = Block::default()
                .title(image.label())
                .borders(Borders::ALL)
                .border_style(dim_style());
            let inner = block.inner(area);
            frame.render_widget(block, area);

            let lines = halfblock_lines(&image.preview, inner.width, inner.height);
            frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
        }
        ImageSlot::Missing { url, reason } => {
            let mut lines = vec![
                Line::from("✖ unavailable").style(Style::default().fg(Color::Red)),
                Line::from(reason.clone()).style(dim_style()),
            ];
            if let Some(url) = url {
                lines.push(Line::from(url.clone()).style(dim_style()));
            }

            let paragraph = Paragraph::new(lines)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(dim_style()),
                )
                .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, area);
        }
    }
}

fn draw_logs(frame: &mut Frame, app: &App, area: Rect) {
    let lines: Vec<Line> = app
        .logs
        .iter()
        .rev()
        .take(100)
        .map(|entry| Line::from(entry.clone()))
        .collect();

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title("Activity")
                .borders(Borders::ALL)
                .border_style(border_style(app.focus, FocusArea::Logs)),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

fn draw_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new(
        "F1/Ctrl+R: recipe • F2/Ctrl+G: images • F3/Ctrl+Y: videos • F5/Ctrl+X: reset • Tab: cycle • Ctrl+C: quit",
    )
    .style(Style::default().fg(Color::Gray));
    frame.render_widget(footer, area);
}

/// Light markdown styling: headings, bullets and `**bold**` lines.
pub fn recipe_lines(text: &str) -> Vec<Line<'static>> {
    text.lines()
        .map(|raw| {
            let line = raw.trim_end();
            let trimmed = line.trim_start();
            if let Some(heading) = trimmed.strip_prefix('#') {
                Line::from(Span::styled(
                    heading.trim_start_matches('#').trim().to_string(),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ))
            } else if let Some(item) = trimmed
                .strip_prefix("* ")
                .or_else(|| trimmed.strip_prefix("- "))
            {
                let indent = &line[..line.len() - trimmed.len()];
                Line::from(format!("{indent}• {}", item.replace("**", "")))
            } else if trimmed.len() > 4 && trimmed.starts_with("**") && trimmed.ends_with("**") {
                Line::from(Span::styled(
                    trimmed.trim_matches('*').to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(line.replace("**", ""))
            }
        })
        .collect()
}

fn video_lines(link: &VideoLink) -> Vec<Line<'static>> {
    vec![
        Line::from(link.title.clone()),
        Line::from(format!("   {}", link.url)).style(dim_style()),
    ]
}

/// Renders an image with `▀` cells: foreground is the upper pixel, background the lower.
pub fn halfblock_lines(image: &RgbaImage, cols: u16, rows: u16) -> Vec<Line<'static>> {
    if cols == 0 || rows == 0 || image.width() == 0 || image.height() == 0 {
        return Vec::new();
    }

    let max_w = f64::from(cols);
    let max_h = f64::from(rows) * 2.0;
    let scale = (max_w / f64::from(image.width())).min(max_h / f64::from(image.height()));
    let width = ((f64::from(image.width()) * scale).round() as u32).clamp(1, u32::from(cols));
    let height = ((f64::from(image.height()) * scale).round() as u32).clamp(1, u32::from(rows) * 2);

    let scaled = imageops::resize(image, width, height, FilterType::Triangle);

    (0..height)
        .step_by(2)
        .map(|y| {
            let spans: Vec<Span<'static>> = (0..width)
                .map(|x| {
                    let top = to_color(scaled.get_pixel(x, y).0);
                    let bottom = if y + 1 < height {
                        to_color(scaled.get_pixel(x, y + 1).0)
                    } else {
                        Color::Reset
                    };
                    Span::styled("▀", Style::default().fg(top).bg(bottom))
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

fn to_color([r, g, b, a]: [u8; 4]) -> Color {
    let blend = |channel: u8| ((u16::from(channel) * u16::from(a)) / 255) as u8;
    Color::Rgb(blend(r), blend(g), blend(b))
}

fn border_style(current: FocusArea, area: FocusArea) -> Style {
    if current == area {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

fn dim_style() -> Style {
    Style::default().fg(Color::DarkGray)
}
