use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Clear, Paragraph},
};

use super::Modal;
use crate::config::ThemeConfig;

/// Busy modal shown while the first fetch is outstanding
pub fn render_busy(f: &mut Frame, area: Rect, spinner: &str, message: &str, theme: &ThemeConfig) {
    let modal = Modal::new(" Loading ", theme);
    let modal_area = modal.centered_rect(40, 5, area);

    // Clear the modal area
    f.render_widget(Clear, modal_area);

    let block = modal.block();
    let inner_area = block.inner(modal_area);
    f.render_widget(block, modal_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // spacing
            Constraint::Length(1), // spinner + message
        ])
        .split(inner_area);

    let line = Line::from(vec![
        Span::styled(spinner, Style::default().fg(theme.primary())),
        Span::raw(" "),
        Span::styled(message, Style::default().fg(theme.fg())),
    ]);
    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), chunks[1]);
}
