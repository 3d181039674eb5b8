use crate::tui::app::App;
use crate::tui::notify::{Notice, Severity};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Member list
            Constraint::Length(3), // Status / banner
        ])
        .split(frame.size());

    draw_header(frame, chunks[0], app);
    draw_member_list(frame, chunks[1], app);
    draw_status(frame, chunks[2], app);

    if app.help_mode {
        draw_help_window(frame);
    }

    if app.notifier.is_blocking() {
        if let Some(notice) = app.notifier.active() {
            draw_modal(frame, notice);
        }
    }
}

fn draw_header(frame: &mut Frame, area: ratatui::layout::Rect, app: &App) {
    let aggregate = if app.sync.aggregate_checked() {
        "☑"
    } else {
        "☐"
    };
    let header_text = format!(
        "System {} — {} of {} users assigned | select all: {}",
        app.system_id,
        app.sync.selected_count(),
        app.sync.len(),
        aggregate,
    );
    let header = Paragraph::new(header_text)
        .block(Block::default().borders(Borders::ALL).title("sysassign"))
        .style(Style::default().fg(Color::Cyan));

    frame.render_widget(header, area);
}

fn draw_member_list(frame: &mut Frame, area: ratatui::layout::Rect, app: &mut App) {
    let compact = app.config.compact;
    let items: Vec<ListItem> = app
        .sync
        .members()
        .iter()
        .enumerate()
        .map(|(i, member)| {
            let checkbox = if member.selected { "☑" } else { "☐" };
            let is_match = app.search.search_matches.contains(&i);
            let match_indicator = if is_match { "›" } else { " " };

            let display = if compact || member.email.is_empty() {
                format!("{}{} {}", match_indicator, checkbox, member.username)
            } else {
                format!(
                    "{}{} {} <{}>",
                    match_indicator, checkbox, member.username, member.email
                )
            };

            let style = if is_match {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else if member.selected {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::White)
            };

            ListItem::new(Line::from(Span::styled(display, style)))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Users"))
        .highlight_style(
            Style::default()
                .bg(Color::Yellow)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        );

    let mut list_state = ListState::default();
    if !app.sync.is_empty() {
        list_state.select(Some(app.cursor));
    }

    frame.render_stateful_widget(list, area, &mut list_state);
}

fn draw_status(frame: &mut Frame, area: ratatui::layout::Rect, app: &App) {
    let (text, style) = if app.search.search_mode {
        (
            format!(
                "/{}█  ({} matches) | Enter: jump | Esc: cancel",
                app.search.search_query,
                app.search.search_matches.len()
            ),
            Style::default().fg(Color::Yellow),
        )
    } else if let Some(notice) = inline_notice(app) {
        (notice.text.clone(), notice_style(notice))
    } else {
        (
            "↑↓/j/k: navigate | Space: toggle | a: select all | s: save | /: search | ?: help | q: quit"
                .to_string(),
            Style::default().fg(Color::Yellow),
        )
    };

    let status = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .style(style);

    frame.render_widget(status, area);
}

fn inline_notice(app: &App) -> Option<&Notice> {
    if app.notifier.is_blocking() {
        None
    } else {
        app.notifier.active()
    }
}

fn notice_style(notice: &Notice) -> Style {
    let color = match notice.severity {
        Severity::Success => Color::Green,
        Severity::Danger => Color::Red,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn draw_modal(frame: &mut Frame, notice: &Notice) {
    let title = match notice.severity {
        Severity::Success => " Saved ",
        Severity::Danger => " Error ",
    };

    let paragraph = Paragraph::new(format!("{}\n\nPress any key to continue", notice.text))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .style(notice_style(notice)),
        )
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: true });

    let area = centered_rect(50, 25, frame.size());
    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn draw_help_window(frame: &mut Frame) {
    let help_text = vec![
        "User Assignment - Keyboard Commands",
        "",
        "NAVIGATION:",
        "  ↑↓ / j/k          Move between users",
        "",
        "SELECTION:",
        "  Space / Enter     Toggle the user under the cursor",
        "  a                 Toggle select-all (writes to every user)",
        "",
        "SAVING:",
        "  s                 Save the full assignment snapshot",
        "",
        "SEARCH:",
        "  /                 Search username/email",
        "  n / N             Jump to next/previous match",
        "  Esc               Clear search",
        "",
        "OTHER:",
        "  c                 Toggle compact view (persisted)",
        "  ?                 Show this help (press ? or Esc to close)",
        "  q / Ctrl+C        Quit",
    ];

    let help_paragraph = Paragraph::new(help_text.join("\n"))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help - Keyboard Commands ")
                .style(Style::default().fg(Color::Yellow)),
        )
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: true });

    let area = centered_rect(70, 70, frame.size());
    frame.render_widget(Clear, area);
    frame.render_widget(help_paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: ratatui::layout::Rect) -> ratatui::layout::Rect {
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
