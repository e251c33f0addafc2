use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use ratatui::widgets::Block;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use inboxtui::app::{App, Tab};
use inboxtui::config::Config;
use inboxtui::input::{Effect, handle_key, handle_mouse};
use inboxtui::logging;
use inboxtui::mail::{FetchRequest, FetchWorker, InboxClient, Message};
use inboxtui::ui::{
    HelpMode, InboxBody, render_busy, render_detail, render_help, render_inbox, render_settings,
    render_tabs,
};

fn main() -> Result<()> {
    logging::init();

    // Load config
    let config = Arc::new(Config::load());
    if config.api.api_key.is_empty() || config.api.namespace.is_empty() {
        log::warn!("API key or namespace not configured; set them in the Settings tab");
    }

    let worker = FetchWorker::new(Arc::new(InboxClient::new()));
    let mut app = App::new(config);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app, &worker);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    worker: &FetchWorker,
) -> Result<()> {
    if let Some(request) = app.start(Instant::now()) {
        dispatch(app, worker, request);
    }

    // Main loop
    while !app.should_quit {
        terminal.draw(|f| render(app, f))?;

        for outcome in worker.drain() {
            app.finish_fetch(outcome);
        }
        if let Some(request) = app.tick(Instant::now()) {
            dispatch(app, worker, request);
        }

        // Poll with timeout so timers and fetch results are handled without input
        if !event::poll(Duration::from_millis(100))? {
            continue;
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                match handle_key(app, key, Instant::now()) {
                    Some(Effect::Quit) => app.should_quit = true,
                    Some(Effect::Fetch(request)) => dispatch(app, worker, request),
                    None => {}
                }
            }
            Event::Mouse(mouse) => handle_mouse(app, mouse),
            _ => {}
        }
    }

    Ok(())
}

fn dispatch(app: &mut App, worker: &FetchWorker, request: FetchRequest) {
    let token = request.token;
    if let Err(e) = worker.spawn(request) {
        app.abort_fetch(token, &e.to_string());
    }
}

fn render(app: &mut App, f: &mut Frame) {
    let area = f.area();
    let config = app.config.clone();
    let theme = &config.theme;

    f.render_widget(Block::default().style(Style::default().bg(theme.bg())), area);

    // Tab bar, main area, help bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    let refresh_label = match app.poller().interval() {
        Some(interval) => format!("auto {}s", interval.as_secs()),
        None => "manual".to_string(),
    };
    render_tabs(f, chunks[0], app.tab, &refresh_label, theme);

    match app.tab {
        Tab::Inbox => {
            app.set_list_area(chunks[1]);

            let spinner = if app.is_loading() {
                format!(" {}", app.spinner_frame())
            } else {
                String::new()
            };
            let title = if app.filter.is_empty() {
                format!(" Inbox ({}){} ", app.emails.len(), spinner)
            } else {
                format!(
                    " Inbox ({} of {} match \"{}\"){} ",
                    app.filtered_indices.len(),
                    app.emails.len(),
                    app.filter,
                    spinner
                )
            };

            let filtered: Vec<&Message> = app
                .filtered_indices
                .iter()
                .filter_map(|&i| app.emails.get(i))
                .collect();
            let body = match app.error.as_deref() {
                Some(error) => InboxBody::Error(error),
                None => InboxBody::Rows(&filtered),
            };
            render_inbox(
                f,
                chunks[1],
                body,
                &mut app.list_state,
                &title,
                theme,
                &config.layout,
            );

            if app.is_loading() && app.emails.is_empty() {
                render_busy(f, chunks[1], app.spinner_frame(), "Fetching emails...", theme);
            }
        }
        Tab::Settings => {
            render_settings(
                f,
                chunks[1],
                &app.settings,
                app.settings_field,
                &app.interval_input,
                theme,
            );
        }
    }

    let detail_area = app.selected.as_ref().map(|message| {
        render_detail(
            f,
            chunks[1],
            message,
            &app.detail_body,
            app.detail_scroll,
            (config.layout.detail_width_pct, config.layout.detail_height_pct),
            theme,
        )
    });
    if let Some(rect) = detail_area {
        app.set_detail_area(rect);
    }

    let mode = if app.selected.is_some() {
        HelpMode::Detail
    } else if app.tab == Tab::Settings {
        HelpMode::Settings
    } else if app.searching {
        HelpMode::Search
    } else {
        HelpMode::Inbox
    };
    render_help(
        f,
        chunks[2],
        mode,
        app.status_message.as_deref(),
        app.status_is_error,
        &app.filter,
        theme,
    );
}
