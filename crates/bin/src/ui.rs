use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Margin},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, List, ListItem, ListState, Paragraph, Scrollbar, ScrollbarOrientation,
        ScrollbarState,
    },
};

use crate::app::{App, EMOJIS};
use crate::palette::Palette;
use banter::Sender;

pub fn ui(f: &mut ratatui::Frame, app: &App) {
    render_chat(f, app);
}

fn render_chat(f: &mut ratatui::Frame, app: &App) {
    let palette = Palette::for_theme(app.theme);
    let base = Style::default().fg(palette.text).bg(palette.background);
    f.render_widget(Block::default().style(base), f.area());

    let mut constraints = vec![
        Constraint::Min(0),    // Messages
        Constraint::Length(1), // Typing indicator
        Constraint::Length(3), // Input
        Constraint::Length(1), // Key help
    ];
    if app.emoji_picker.is_some() {
        constraints.insert(2, Constraint::Length(3)); // Emoji picker
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.area());

    // Messages area
    let messages: Vec<ListItem> = app
        .entries
        .iter()
        .map(|entry| {
            let timestamp = entry.created_at().with_timezone(&Local).format("%H:%M:%S");
            let (author, color) = match entry.sender {
                Sender::Outbound => ("you", palette.outbound),
                Sender::Inbound => ("friend", palette.inbound),
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("[{timestamp}] "), Style::default().fg(palette.timestamp)),
                Span::styled(
                    format!("{author}: "),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::raw(entry.text.as_str()),
            ]))
        })
        .collect();

    let mut messages_list = List::new(messages).style(base).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.border))
            .title(Span::styled(
                format!(
                    "Messages ({}/{}) - {} theme",
                    app.entries.len(),
                    app.chat.config().max_entries,
                    app.theme
                ),
                Style::default().fg(palette.title).add_modifier(Modifier::BOLD),
            )),
    );
    if app.selected.is_some() {
        messages_list = messages_list.highlight_style(Style::default().bg(palette.highlight));
    }

    // Follow the newest entry unless the user has selected one.
    let focus = app.selected.or(app.entries.len().checked_sub(1));
    let mut list_state = ListState::default().with_selected(focus);
    f.render_stateful_widget(messages_list, chunks[0], &mut list_state);

    let scrollbar = Scrollbar::default()
        .orientation(ScrollbarOrientation::VerticalRight)
        .begin_symbol(None)
        .end_symbol(None);
    let mut scroll_state = ScrollbarState::new(app.entries.len()).position(focus.unwrap_or(0));
    let scrollbar_area = chunks[0].inner(Margin {
        horizontal: 0,
        vertical: 1,
    });
    f.render_stateful_widget(scrollbar, scrollbar_area, &mut scroll_state);

    // Typing indicator, or the status message when there is one
    let indicator = match (&app.status_message, app.typing) {
        (Some(status), _) => Paragraph::new(status.as_str()).style(base.fg(palette.status)),
        (None, true) => Paragraph::new("friend is typing…")
            .style(base.fg(palette.typing).add_modifier(Modifier::ITALIC)),
        (None, false) => Paragraph::new("").style(base),
    };
    f.render_widget(indicator, chunks[1]);

    let mut input_index = 2;
    if let Some(selected) = app.emoji_picker {
        let spans: Vec<Span> = EMOJIS
            .iter()
            .enumerate()
            .map(|(i, emoji)| {
                let style = if i == selected {
                    base.bg(palette.highlight)
                } else {
                    base
                };
                Span::styled(format!(" {emoji} "), style)
            })
            .collect();
        let picker = Paragraph::new(Line::from(spans)).style(base).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.border))
                .title("Emoji (←/→ choose, Enter insert, Esc close)"),
        );
        f.render_widget(picker, chunks[2]);
        input_index = 3;
    }

    // Input area
    let draft = app.draft();
    let input = Paragraph::new(draft.as_str()).style(base).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.border))
            .title("Type your message (Enter to send, /attach <path>, /clear)"),
    );
    f.render_widget(input, chunks[input_index]);

    let help = Paragraph::new(
        "Esc quit | ↑/↓ select | Del delete own message | Ctrl-E emoji | Ctrl-T theme",
    )
    .style(base.fg(palette.status));
    f.render_widget(help, chunks[input_index + 1]);

    // Set cursor position
    if app.emoji_picker.is_none() {
        f.set_cursor_position((
            chunks[input_index].x + draft.chars().count() as u16 + 1,
            chunks[input_index].y + 1,
        ));
    }
}
