use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::config::ThemeConfig;

/// Which key set the help bar describes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HelpMode {
    Inbox,
    Search,
    Detail,
    Settings,
}

pub fn render_help(
    f: &mut Frame,
    area: Rect,
    mode: HelpMode,
    status: Option<&str>,
    status_is_error: bool,
    search_query: &str,
    theme: &ThemeConfig,
) {
    let key_style = Style::default().fg(theme.primary());
    let text_style = Style::default().fg(theme.fg_subtle());
    let search_style = Style::default().fg(theme.fg());

    let help_text = match mode {
        HelpMode::Search => vec![
            Span::styled("/", key_style),
            Span::raw(" "),
            Span::styled(search_query, search_style),
            Span::styled("_", key_style),
            Span::styled("  ", text_style),
            Span::styled("Enter", key_style),
            Span::styled(" keep  ", text_style),
            Span::styled("Esc", key_style),
            Span::styled(" clear", text_style),
        ],
        HelpMode::Inbox => vec![
            Span::styled("j/k", key_style),
            Span::styled(" nav  ", text_style),
            Span::styled("Enter", key_style),
            Span::styled(" open  ", text_style),
            Span::styled("/", key_style),
            Span::styled(" search  ", text_style),
            Span::styled("r", key_style),
            Span::styled(" refresh  ", text_style),
            Span::styled("Tab", key_style),
            Span::styled(" settings  ", text_style),
            Span::styled("q", key_style),
            Span::styled(" quit", text_style),
        ],
        HelpMode::Detail => vec![
            Span::styled("j/k", key_style),
            Span::styled(" scroll  ", text_style),
            Span::styled("d", key_style),
            Span::styled(" download  ", text_style),
            Span::styled("q/Esc", key_style),
            Span::styled(" close", text_style),
        ],
        HelpMode::Settings => vec![
            Span::styled("↑/↓", key_style),
            Span::styled(" field  ", text_style),
            Span::styled("type", key_style),
            Span::styled(" edit  ", text_style),
            Span::styled("Space", key_style),
            Span::styled(" toggle  ", text_style),
            Span::styled("Tab/Esc", key_style),
            Span::styled(" inbox", text_style),
        ],
    };

    let mut line = Line::from(help_text);

    // Add status message if present
    if let Some(msg) = status {
        line.spans
            .push(Span::styled("  │  ", Style::default().fg(theme.border())));
        let color = if status_is_error {
            theme.error()
        } else {
            theme.success()
        };
        line.spans.push(Span::styled(msg, Style::default().fg(color)));
    }

    let paragraph = Paragraph::new(line).style(Style::default().bg(theme.bg_panel()));

    f.render_widget(paragraph, area);
}
