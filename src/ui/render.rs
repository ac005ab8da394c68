use crate::action::ActionResult;
use crate::ui::app::{App, Screen};
use crate::ui::theme::Theme;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

const TITLE: &str = "NiriSetup Assistant for FreeBSD";

/// Draw the whole UI. Pure projection of `app`.
pub fn render(frame: &mut Frame, app: &App, theme: &Theme) {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Body
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    render_header(frame, theme, main_chunks[0]);

    let body_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(main_chunks[1]);

    render_menu(frame, app, theme, body_chunks[0]);
    render_status(frame, app, theme, body_chunks[1]);
    render_footer(frame, app, theme, main_chunks[2]);

    if app.screen() == Screen::Result {
        render_result_modal(frame, app, theme);
    }
}

fn render_header(frame: &mut Frame, theme: &Theme, area: Rect) {
    let header = Paragraph::new(Line::from(Span::styled(
        format!("  {}  ", TITLE),
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD),
    )))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent)),
    )
    .style(Style::default().bg(theme.bg));

    frame.render_widget(header, area);
}

fn render_menu(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let menu_active = app.screen() == Screen::Menu;

    let items: Vec<ListItem> = app
        .actions()
        .iter()
        .enumerate()
        .map(|(i, action)| {
            let is_cursor = i == app.cursor();
            let marker = if is_cursor { ">" } else { " " };
            let style = if is_cursor && menu_active {
                Style::default()
                    .fg(theme.bg)
                    .bg(theme.accent)
                    .add_modifier(Modifier::BOLD)
            } else if is_cursor {
                Style::default().fg(theme.accent)
            } else {
                Style::default().fg(theme.fg)
            };
            ListItem::new(format!("{} {}", marker, action.label())).style(style)
        })
        .collect();

    let border_color = if menu_active {
        theme.accent
    } else {
        theme.fg_dim
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Actions ")
            .border_style(Style::default().fg(border_color)),
    );

    frame.render_widget(list, area);
}

/// Lines of the status panel, top to bottom.
fn status_lines<'a>(app: &'a App, theme: &Theme) -> Vec<Line<'a>> {
    let mut lines = Vec::new();

    if let Some(action) = app.selected() {
        lines.push(Line::from(vec![
            Span::styled("Selected: ", Style::default().fg(theme.fg_dim)),
            Span::styled(
                action.label(),
                Style::default()
                    .fg(theme.secondary)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));
    }

    if app.is_processing() {
        lines.push(Line::from(Span::styled(
            format!("Processing{}", ".".repeat(app.frame() % 4)),
            Style::default().fg(theme.secondary),
        )));
    }

    if !lines.is_empty() {
        lines.push(Line::from(""));
    }

    // A fresh result is the newest log entry; color it instead of repeating it
    let fresh = match app.last_result() {
        Some(result) if app.screen() == Screen::Menu => Some(result_style(result, theme)),
        _ => None,
    };
    let entries = app.log().lines();
    for (i, entry) in entries.iter().enumerate() {
        let style = match fresh {
            Some(style) if i + 1 == entries.len() => style,
            _ => Style::default().fg(theme.log),
        };
        lines.extend(text_lines(entry, style));
    }

    if app.should_quit() {
        lines.push(Line::from(""));
        lines.push(Line::from("Exiting..."));
    }

    lines
}

/// One `Line` per line of `text`; tool output usually spans several.
fn text_lines(text: &str, style: Style) -> impl Iterator<Item = Line<'_>> {
    text.split('\n')
        .map(move |part| Line::from(Span::styled(part.trim_end_matches('\r'), style)))
}

fn result_style(result: &ActionResult, theme: &Theme) -> Style {
    let color = if result.succeeded {
        theme.success
    } else {
        theme.error
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn render_status(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let lines = status_lines(app, theme);

    // Keep the newest lines visible, counting rows added by wrapping
    let inner_width = area.width.saturating_sub(2).max(1) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;
    let rows: usize = lines
        .iter()
        .map(|line| line.width().max(1).div_ceil(inner_width))
        .sum();
    let scroll = rows.saturating_sub(inner_height) as u16;

    let border_color = if app.is_processing() {
        theme.secondary
    } else {
        theme.fg_dim
    };

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Status ")
                .border_style(Style::default().fg(border_color)),
        )
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));

    frame.render_widget(paragraph, area);
}

fn render_result_modal(frame: &mut Frame, app: &App, theme: &Theme) {
    let Some(result) = app.last_result() else {
        return;
    };

    let area = centered_rect(60, 40, frame.area());
    let (title, color) = if result.succeeded {
        (" Done ", theme.success)
    } else {
        (" Failed ", theme.error)
    };

    let mut text: Vec<Line> = text_lines(&result.message, result_style(result, theme)).collect();
    text.push(Line::from(""));
    text.push(Line::from(Span::styled(
        "Returning to menu...",
        Style::default().fg(theme.fg_dim),
    )));

    let modal = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(color)),
        )
        .style(Style::default().bg(theme.bg).fg(theme.fg))
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, area);
    frame.render_widget(modal, area);
}

fn render_footer(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let help_text = match app.screen() {
        Screen::Menu => "[↑↓/jk] Navigate  [Enter] Select  [q/Ctrl+C] Quit",
        Screen::Running => "Working...  [q/Ctrl+C] Quit",
        Screen::Result => "Returning to menu...  [q/Ctrl+C] Quit",
    };

    let footer = Paragraph::new(help_text).style(Style::default().fg(theme.fg_dim));

    frame.render_widget(footer, area);
}

/// A rectangle of `percent_x` by `percent_y` centered in `area`.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
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
        .split(vertical[1])[1]
}
