use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, Wrap},
};

use super::Pane;
use crate::config::{LayoutConfig, ThemeConfig};
use crate::mail::Message;

/// What the inbox pane shows in place of rows
pub enum InboxBody<'a> {
    Rows(&'a [&'a Message]),
    Error(&'a str),
}

pub fn render_inbox(
    f: &mut Frame,
    area: Rect,
    body: InboxBody,
    state: &mut ListState,
    title: &str,
    theme: &ThemeConfig,
    layout: &LayoutConfig,
) {
    let block = Pane::new(title, true, theme).block();

    let emails = match body {
        InboxBody::Error(error) => {
            let paragraph = Paragraph::new(Line::from(Span::styled(
                error,
                Style::default().fg(theme.error()),
            )))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block);
            f.render_widget(paragraph, area);
            return;
        }
        InboxBody::Rows(emails) if emails.is_empty() => {
            let paragraph = Paragraph::new(Line::from(Span::styled(
                "No emails match your filters.",
                Style::default().fg(theme.fg_muted()),
            )))
            .alignment(Alignment::Center)
            .block(block);
            f.render_widget(paragraph, area);
            return;
        }
        InboxBody::Rows(emails) => emails,
    };

    // Available width: area minus borders (2) minus highlight symbol (2)
    let avail_width = area.width.saturating_sub(4) as usize;
    let date_width = layout.date_width;
    let from_width = layout
        .from_width
        .min(avail_width.saturating_sub(date_width + 4) / 3);
    let tag_width = layout
        .tag_width
        .min(avail_width.saturating_sub(date_width + from_width + 6) / 3);
    let subject_width = avail_width.saturating_sub(date_width + from_width + tag_width + 5);

    let items: Vec<ListItem> = emails
        .iter()
        .map(|m| {
            let text_style = if m.read {
                Style::default().fg(theme.fg_muted())
            } else {
                Style::default().fg(theme.fg())
            };
            let unread = if m.read { " " } else { "*" };
            let subject = if m.subject.is_empty() {
                "(no subject)"
            } else {
                m.subject.as_str()
            };

            ListItem::new(Line::from(vec![
                Span::styled(unread, Style::default().fg(theme.unread())),
                Span::raw(" "),
                Span::styled(
                    truncate(&m.date_short(), date_width),
                    Style::default().fg(theme.fg_subtle()),
                ),
                Span::raw(" "),
                Span::styled(truncate(&m.from, from_width), text_style),
                Span::raw(" "),
                Span::styled(
                    truncate(&m.tag, tag_width),
                    Style::default().fg(theme.tag()),
                ),
                Span::raw(" "),
                Span::styled(truncate(subject, subject_width), text_style),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(theme.selected_bg())
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    f.render_stateful_widget(list, area, state);
}

/// Pad or cut `s` to exactly `max` columns, marking cuts with "..."
pub fn truncate(s: &str, max: usize) -> String {
    if max < 4 {
        return s.chars().take(max).collect();
    }
    let char_count = s.chars().count();
    if char_count <= max {
        format!("{:width$}", s, width = max)
    } else {
        let truncated: String = s.chars().take(max - 3).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("abc", 6), "abc   ");
        assert_eq!(truncate("abcdefgh", 6), "abc...");
        assert_eq!(truncate("abcdefgh", 2), "ab");
        assert_eq!(truncate("héllo wörld", 8), "héllo...");
    }
}
