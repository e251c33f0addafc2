use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Tabs},
};

use crate::app::Tab;
use crate::config::ThemeConfig;

/// Top bar: tab titles on the left, refresh state on the right
pub fn render_tabs(f: &mut Frame, area: Rect, active: Tab, refresh: &str, theme: &ThemeConfig) {
    let selected = match active {
        Tab::Inbox => 0,
        Tab::Settings => 1,
    };
    let tabs = Tabs::new(vec![" Inbox ", " Settings "])
        .select(selected)
        .style(Style::default().fg(theme.fg_subtle()).bg(theme.bg_panel()))
        .highlight_style(
            Style::default()
                .fg(theme.primary())
                .add_modifier(Modifier::BOLD),
        )
        .divider(Span::styled("│", Style::default().fg(theme.border())));
    f.render_widget(tabs, area);

    let right = Paragraph::new(Line::from(Span::styled(
        format!("{} ", refresh),
        Style::default().fg(theme.fg_muted()),
    )))
    .alignment(Alignment::Right);
    f.render_widget(right, area);
}
