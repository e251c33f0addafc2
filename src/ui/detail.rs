use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph, Wrap},
};

use super::Modal;
use crate::config::ThemeConfig;
use crate::mail::Message;

/// Render the message modal over `area`; returns the modal's rect
pub fn render_detail(
    f: &mut Frame,
    area: Rect,
    message: &Message,
    body: &str,
    scroll: u16,
    size_pct: (u16, u16),
    theme: &ThemeConfig,
) -> Rect {
    let title = if message.subject.is_empty() {
        " (no subject) ".to_string()
    } else {
        format!(" {} ", message.subject)
    };
    let modal = Modal::new(&title, theme);
    let modal_area = modal.centered_pct(size_pct.0, size_pct.1, area);

    f.render_widget(Clear, modal_area);
    let block = modal.block();
    let inner = block.inner(modal_area);
    f.render_widget(block, modal_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // headers
            Constraint::Min(1),    // body
        ])
        .split(inner);

    let label = Style::default()
        .fg(theme.primary())
        .add_modifier(Modifier::BOLD);
    let value = Style::default().fg(theme.fg());
    let header = |name: &'static str, text: String| {
        Line::from(vec![Span::styled(name, label), Span::styled(text, value)])
    };

    let headers = vec![
        header("From: ", message.from.clone()),
        header("To:   ", message.envelope_to.clone()),
        header("Date: ", message.date_long()),
        Line::from(vec![
            Span::styled("Tag:  ", label),
            Span::styled(message.tag.clone(), Style::default().fg(theme.tag())),
            Span::styled("   d", label),
            Span::styled(" download JSON", Style::default().fg(theme.fg_muted())),
        ]),
        Line::from(Span::styled(
            "─".repeat(inner.width as usize),
            Style::default().fg(theme.border()),
        )),
    ];
    f.render_widget(Paragraph::new(headers), chunks[0]);

    let paragraph = Paragraph::new(style_content(body, theme))
        .style(Style::default().fg(theme.fg()))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(paragraph, chunks[1]);

    modal_area
}

fn find_url(line: &str, from: usize) -> Option<(usize, usize)> {
    let rest = &line[from..];
    let start = [rest.find("http://"), rest.find("https://")]
        .into_iter()
        .flatten()
        .min()?;
    let abs_start = from + start;
    let url_end = line[abs_start..]
        .find(|c: char| c.is_whitespace() || c == '>' || c == ')' || c == ']' || c == '"')
        .map(|i| abs_start + i)
        .unwrap_or(line.len());
    Some((abs_start, url_end))
}

/// Style content with underlined URLs
fn style_content(content: &str, theme: &ThemeConfig) -> Vec<Line<'static>> {
    let url_style = Style::default()
        .fg(theme.url())
        .add_modifier(Modifier::UNDERLINED);

    content
        .lines()
        .map(|line_str| {
            let mut spans = Vec::new();
            let mut last_end = 0;

            while let Some((start, end)) = find_url(line_str, last_end) {
                if start > last_end {
                    spans.push(Span::raw(line_str[last_end..start].to_string()));
                }
                spans.push(Span::styled(line_str[start..end].to_string(), url_style));
                last_end = end;
            }

            if last_end < line_str.len() {
                spans.push(Span::raw(line_str[last_end..].to_string()));
            }
            if spans.is_empty() {
                spans.push(Span::raw(String::new()));
            }

            Line::from(spans)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_url() {
        let line = "see https://example.com/a) and http://b.io";
        assert_eq!(find_url(line, 0), Some((4, 25)));
        assert_eq!(find_url(line, 25), Some((31, 42)));
        assert_eq!(find_url(line, 42), None);
    }

    #[test]
    fn test_style_content_splits_urls() {
        let theme = ThemeConfig::default();
        let lines = style_content("go to https://x.io now\n\nplain", &theme);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].spans.len(), 3);
        assert_eq!(lines[0].spans[1].content, "https://x.io");
        assert_eq!(lines[2].spans.len(), 1);
    }
}
