use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
    Frame,
};

use grant_checklist_core::{ChatRole, SummaryTab, QUICK_REPLIES};

use crate::app::{App, FocusPane, InputMode};

const CHAT_WIDTH: u16 = 44;

/// Style one line of summary markdown: a leading `- ` becomes a bullet and
/// `**bold**` runs are emboldened
fn parse_markdown_line(text: &str) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();

    let body = match text.strip_prefix("- ") {
        Some(rest) => {
            spans.push(Span::styled("• ", Style::default().fg(Color::Cyan)));
            rest
        }
        None => text,
    };

    let mut parts = body.split("**");
    if let Some(first) = parts.next() {
        if !first.is_empty() {
            spans.push(Span::raw(first.to_string()));
        }
    }

    // Odd-numbered parts sit between a pair of ** markers
    let rest: Vec<&str> = parts.collect();
    let closed = rest.len() % 2 == 0;
    for (i, part) in rest.iter().enumerate() {
        let is_last = i + 1 == rest.len();
        if i % 2 == 0 && !(is_last && !closed) {
            if !part.is_empty() {
                spans.push(Span::styled(
                    part.to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                ));
            }
        } else if i % 2 == 0 {
            // Unclosed ** stays literal
            spans.push(Span::raw(format!("**{}", part)));
        } else if !part.is_empty() {
            spans.push(Span::raw(part.to_string()));
        }
    }

    if spans.is_empty() {
        Line::default()
    } else {
        Line::from(spans)
    }
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    // Summary on the left, chat sidebar on the right
    let [summary_area, chat_area] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(CHAT_WIDTH.min(body_area.width / 2)),
    ])
    .areas(body_area);

    app.summary_area = Some(summary_area);
    app.chat_area = Some(chat_area);

    render_summary(app, frame, summary_area);
    render_chat(app, frame, chat_area);
    render_footer(app, frame, footer_area);

    if app.show_goto {
        render_goto_prompt(app, frame, area);
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" Grant Checklist ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(app.header_title(), Style::default().fg(Color::White)),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn border_color(focused: bool) -> Color {
    if focused {
        Color::Cyan
    } else {
        Color::DarkGray
    }
}

fn render_summary(app: &mut App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color(app.focus == FocusPane::Summary)));

    if app.summary.loading {
        let dots = ".".repeat(app.animation_frame as usize + 1);
        let loading = Paragraph::new(format!("Loading{}", dots))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(loading, area);
        return;
    }

    let grant_name = &app.summary.summary.grant_name;
    let block = block.title(Line::from(vec![
        Span::raw(" Application Requirements for "),
        Span::styled(grant_name.clone(), Style::default().fg(Color::Cyan).bold()),
        Span::raw(" "),
    ]));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [intro_area, tabs_area, blurb_area, content_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(2),
        Constraint::Length(2),
        Constraint::Min(0),
    ])
    .areas(inner);

    let intro = Paragraph::new(
        "We've extracted the Eligibility Criteria, Required Documents, Project Narrative Components, and Key Deadlines for this grant.",
    )
    .style(Style::default().fg(Color::Gray))
    .wrap(Wrap { trim: true });
    frame.render_widget(intro, intro_area);

    let titles: Vec<Line> = SummaryTab::all()
        .iter()
        .enumerate()
        .map(|(i, tab)| Line::from(format!("{} {}", i + 1, tab.label())))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.summary.active_tab.index())
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .divider("|");
    frame.render_widget(tabs, tabs_area);

    let blurb = Paragraph::new(app.summary.active_tab.blurb())
        .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC))
        .wrap(Wrap { trim: true });
    frame.render_widget(blurb, blurb_area);

    app.summary_height = content_area.height;

    let section = app.summary.active_section();
    let text = if section.is_empty() {
        Text::from(Span::styled(
            "Nothing was extracted for this section.",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Text::from(section.lines().map(parse_markdown_line).collect::<Vec<_>>())
    };

    let content = Paragraph::new(text).wrap(Wrap { trim: false });

    // Scroll limits count wrapped rows, not source lines
    app.summary_rows = u16::try_from(content.line_count(content_area.width)).unwrap_or(u16::MAX);
    let max_scroll = app.summary_rows.saturating_sub(app.summary_height.max(1));
    app.summary_scroll = app.summary_scroll.min(max_scroll);

    frame.render_widget(content.scroll((app.summary_scroll, 0)), content_area);
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    let [history_area, input_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .areas(area);

    // Inner size minus borders, for scroll calculations
    app.chat_height = history_area.height.saturating_sub(2);
    app.chat_width = history_area.width.saturating_sub(2);

    let chat_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color(app.focus == FocusPane::Chat)))
        .title(" How Can I Assist You Today? ");

    let chat_text = if app.transcript.messages().is_empty() && !app.transcript.is_sending() {
        let mut lines = vec![
            Line::from(Span::styled(
                "Ask a question about this grant.",
                Style::default().fg(Color::DarkGray),
            )),
            Line::default(),
        ];
        for (i, question) in QUICK_REPLIES.iter().enumerate() {
            lines.push(Line::from(vec![
                Span::styled(format!(" F{} ", i + 1), Style::default().bg(Color::DarkGray).fg(Color::White)),
                Span::raw(format!(" {}", question)),
            ]));
        }
        Text::from(lines)
    } else {
        let mut lines: Vec<Line> = Vec::new();

        for msg in app.transcript.messages() {
            let role_style = match msg.role {
                ChatRole::User => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ChatRole::Bot => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            };
            lines.push(Line::from(Span::styled(App::chat_role_label(msg.role), role_style)));
            for line in msg.content.lines() {
                lines.push(parse_markdown_line(line));
            }
            lines.push(Line::default());
        }

        if app.transcript.is_sending() {
            lines.push(Line::from(Span::styled(
                App::chat_role_label(ChatRole::Bot),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )));
            // Animated ellipsis: cycles through ".", "..", "..."
            let dots = ".".repeat(app.animation_frame as usize + 1);
            lines.push(Line::from(Span::styled(
                dots,
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            )));
        }

        Text::from(lines)
    };

    let chat = Paragraph::new(chat_text)
        .block(chat_block)
        .wrap(Wrap { trim: true })
        .scroll((app.chat_scroll, 0));
    frame.render_widget(chat, history_area);

    let editing = app.input_mode == InputMode::Editing;
    let input_title = if app.transcript.is_sending() {
        " Type your question... (waiting for reply) "
    } else {
        " Type your question... "
    };
    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if editing { Color::Yellow } else { Color::DarkGray }))
        .title(input_title);

    // Keep the cursor inside the visible slice of the input
    let inner_width = input_area.width.saturating_sub(2) as usize;
    let cursor_pos = app.transcript.cursor();
    let scroll_offset = if inner_width > 0 && cursor_pos >= inner_width {
        cursor_pos - inner_width + 1
    } else {
        0
    };

    let visible_text: String = app
        .transcript
        .input()
        .chars()
        .skip(scroll_offset)
        .take(inner_width)
        .collect();

    let input = Paragraph::new(visible_text)
        .style(Style::default().fg(Color::Cyan))
        .block(input_block);
    frame.render_widget(input, input_area);

    if editing {
        let cursor_x = (cursor_pos - scroll_offset) as u16;
        frame.set_cursor_position((input_area.x + cursor_x + 1, input_area.y + 1));
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let (mode_text, mode_style) = match app.input_mode {
        InputMode::Normal => (" VIEW ", Style::default().bg(Color::Blue).fg(Color::White)),
        InputMode::Editing => (" CHAT ", Style::default().bg(Color::Yellow).fg(Color::Black)),
    };

    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let mut spans = vec![
        Span::styled(mode_text, mode_style),
        Span::styled(" ", label_style),
    ];

    if let Some(message) = &app.status_message {
        spans.push(Span::styled(format!(" {} ", message), label_style.fg(Color::Yellow)));
    } else {
        let hints: &[(&str, &str)] = match app.input_mode {
            InputMode::Normal => &[
                (" 1-4 ", " tab "),
                (" j/k ", " scroll "),
                (" Tab ", " focus "),
                (" i ", " chat "),
                (" F1-F3 ", " suggest "),
                (" C ", " clear "),
                (" g ", " go to "),
                (" y ", " draft link "),
                (" q ", " quit "),
            ],
            InputMode::Editing => &[
                (" Enter ", " send "),
                (" F1-F3 ", " suggest "),
                (" Esc ", " stop typing "),
            ],
        };
        for (key, label) in hints {
            spans.push(Span::styled(*key, key_style));
            spans.push(Span::styled(*label, label_style));
        }
    }

    let footer = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}

fn render_goto_prompt(app: &App, frame: &mut Frame, area: Rect) {
    let popup_width = 60.min(area.width.saturating_sub(4));
    let popup_height = 5.min(area.height);

    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Go to document (Enter to open, Esc to cancel) ");

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    // Too small for the hint and input rows
    if inner.height < 3 {
        return;
    }

    let hint = Paragraph::new("document[?folder=name][#eligibility|documents|narrative|deadlines]")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(hint, Rect::new(inner.x, inner.y, inner.width, 1));

    let input_area = Rect::new(inner.x, inner.y + 2, inner.width, 1);
    let visible: String = {
        let count = app.goto_input.chars().count();
        let skip = count.saturating_sub(input_area.width.saturating_sub(1) as usize);
        app.goto_input.chars().skip(skip).collect()
    };
    let cursor_x = visible.chars().count() as u16;
    frame.render_widget(
        Paragraph::new(visible).style(Style::default().fg(Color::Cyan)),
        input_area,
    );
    frame.set_cursor_position((input_area.x + cursor_x, input_area.y));
}
