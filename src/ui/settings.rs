use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::Pane;
use crate::config::ThemeConfig;
use crate::settings::{Settings, SettingsField};

/// Settings form. Edits apply live; there is no save step.
pub fn render_settings(
    f: &mut Frame,
    area: Rect,
    settings: &Settings,
    focused: SettingsField,
    interval_input: &str,
    theme: &ThemeConfig,
) {
    let heading = Style::default()
        .fg(theme.secondary())
        .add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::from(Span::styled("API Configuration", heading)),
        Line::raw(""),
    ];
    for field in SettingsField::ALL {
        if field == SettingsField::AutoRefresh {
            lines.push(Line::raw(""));
            lines.push(Line::from(Span::styled("Auto-refresh Settings", heading)));
            lines.push(Line::raw(""));
        }
        let value = match field {
            SettingsField::Namespace => settings.namespace.clone(),
            SettingsField::ApiKey => "•".repeat(settings.api_key.chars().count()),
            SettingsField::AutoRefresh => {
                let checkbox = if settings.auto_refresh { "[x]" } else { "[ ]" };
                checkbox.to_string()
            }
            SettingsField::Interval => interval_input.to_string(),
        };
        lines.push(field_line(field, value, field == focused, theme));
    }

    let block = Pane::new(" Application Settings ", true, theme).block();
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn field_line(
    field: SettingsField,
    value: String,
    focused: bool,
    theme: &ThemeConfig,
) -> Line<'static> {
    let (marker, label_style) = if focused {
        (
            "> ",
            Style::default()
                .fg(theme.primary())
                .add_modifier(Modifier::BOLD),
        )
    } else {
        ("  ", Style::default().fg(theme.fg_subtle()))
    };

    let mut spans = vec![
        Span::styled(marker, Style::default().fg(theme.primary())),
        Span::styled(format!("{:<28}", field.label()), label_style),
        Span::styled(value, Style::default().fg(theme.fg())),
    ];
    if focused && field.is_text() {
        spans.push(Span::styled("_", Style::default().fg(theme.primary())));
    }
    Line::from(spans)
}
