use std::io;

use anyhow::Result;
use chrono::Utc;
use crossterm::cursor;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableMouseCapture;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::*;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Wrap;
use ratatui::Frame;
use ratatui::Terminal;
use tokio::sync::mpsc;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::truncate_token;
use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::IdentityBox;
use crate::domain::models::Language;
use crate::domain::models::Loading;
use crate::domain::models::Product;
use crate::domain::models::View;
use crate::domain::services::events::EventsService;
use crate::domain::services::rank;
use crate::domain::services::AppState;
use crate::domain::services::Translations;
use crate::infrastructure::storage::StorageManager;

const ORANGE: Color = Color::Rgb(255, 102, 0);
const MUTED: Color = Color::Rgb(130, 130, 130);

fn render_header<B: Backend>(frame: &mut Frame<B>, rect: Rect, app_state: &AppState) {
    let now = Utc::now();
    let credits = app_state.available_credits(now);
    let credit_text = if credits > 0 {
        Translations::format(
            app_state.language,
            "credits",
            &[("count", credits.to_string().as_str())],
        )
    } else if app_state.has_trial() {
        app_state.t("freeTrial")
    } else {
        app_state.t("noCredits")
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", app_state.t("title")),
            Style::default()
                .fg(Color::Black)
                .bg(ORANGE)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::raw(format!("{}: ", app_state.t("selectYear"))),
        Span::styled(
            format!("◀ {} ▶", app_state.year),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::raw(format!(
            "{}: {}",
            app_state.t("language"),
            app_state.language.label()
        )),
        Span::raw("  "),
        Span::styled(credit_text, Style::default().fg(ORANGE)),
    ]);

    frame.render_widget(
        Paragraph::new(line).block(Block::default().borders(Borders::BOTTOM)),
        rect,
    );
}

fn render_footer<B: Backend>(frame: &mut Frame<B>, rect: Rect, app_state: &AppState) {
    let hints = match app_state.view {
        View::Home => app_state.t("hints.home"),
        View::Stories => app_state.t("hints.stories"),
        View::Pricing => app_state.t("hints.pricing"),
        View::PaymentSuccess => app_state.t("hints.payment"),
    };

    let mut lines = vec![Line::from(Span::styled(hints, Style::default().fg(MUTED)))];
    if let Some(err) = &app_state.error {
        lines.insert(0, Line::from(Span::styled(err.to_string(), Style::default().fg(Color::Red))));
    } else if let Some(notice) = &app_state.notice {
        lines.insert(0, Line::from(Span::styled(notice.to_string(), Style::default().fg(Color::Green))));
    } else {
        lines.insert(0, Line::from(Span::styled(app_state.t("footer"), Style::default().fg(MUTED))));
    }

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::TOP)),
        rect,
    );
}

fn render_home<B: Backend>(frame: &mut Frame<B>, rect: Rect, app_state: &AppState) {
    let year = app_state.year.to_string();
    if app_state.loading {
        let text = Translations::format(app_state.language, "generating", &[("year", year.as_str())]);
        Loading::new(&text).render(frame, centered(rect, 3));
        return;
    }

    let lines = vec![
        Line::from(Span::styled(
            Translations::format(app_state.language, "subtitle", &[("year", year.as_str())]),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("[ {} → ]", app_state.t("generate")),
            Style::default().fg(ORANGE).add_modifier(Modifier::BOLD),
        )),
    ];

    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        centered(rect, 3),
    );
}

fn story_lines(app_state: &AppState) -> (Vec<Line<'static>>, usize) {
    let mut lines = vec![];
    let mut selected_line = 0;
    let list = &app_state.story_list;

    for (idx, story) in list.stories().iter().enumerate() {
        let selected = idx == list.cursor();
        if selected {
            selected_line = lines.len();
        }

        let marker = if selected { "▶" } else { " " };
        let mut title = vec![
            Span::styled(format!("{marker}{:>4} ", rank(idx)), Style::default().fg(MUTED)),
            Span::styled(
                story.title.to_string(),
                if selected {
                    Style::default().add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                },
            ),
        ];
        if !story.domain.is_empty() {
            title.push(Span::styled(
                format!(" ({})", story.domain),
                Style::default().fg(MUTED),
            ));
        }
        lines.push(Line::from(title));

        let toggle = if list.is_expanded(story.id) {
            app_state.t("hide")
        } else {
            app_state.t("comments")
        };
        lines.push(Line::from(Span::styled(
            format!(
                "       {} {} {} {} {} | {} {}",
                story.score,
                app_state.t("points"),
                app_state.t("by"),
                story.author,
                story.time,
                story.comments,
                toggle
            ),
            Style::default().fg(MUTED),
        )));

        if list.is_expanded(story.id) {
            if list.is_loading(story.id) {
                lines.push(Line::from(format!("       ⏳ {}", app_state.t("loadingDetails"))));
            } else if let Some(details) = list.details_for(story.id) {
                lines.push(Line::from(Span::styled(
                    format!("       {}", app_state.t("summary")),
                    Style::default().fg(ORANGE).add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(format!("       {}", details.summary)));
                lines.push(Line::from(Span::styled(
                    format!("       {}", app_state.t("topComments")),
                    Style::default().fg(ORANGE).add_modifier(Modifier::BOLD),
                )));
                for comment in details.comments.iter() {
                    lines.push(Line::from(vec![
                        Span::styled(
                            format!("         {} {}: ", comment.author, comment.time),
                            Style::default().fg(MUTED),
                        ),
                        Span::raw(comment.text.to_string()),
                    ]));
                }
            }
        }
    }

    return (lines, selected_line);
}

fn render_stories<B: Backend>(frame: &mut Frame<B>, rect: Rect, app_state: &AppState) {
    if app_state.loading {
        let year = app_state.year.to_string();
        let text = Translations::format(app_state.language, "generating", &[("year", year.as_str())]);
        Loading::new(&text).render(frame, centered(rect, 3));
        return;
    }

    let (lines, selected_line) = story_lines(app_state);
    let half = (rect.height / 2) as usize;
    let scroll = selected_line.saturating_sub(half) as u16;

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0)),
        rect,
    );
}

fn product_lines(product: &Product, selected: bool, language: Language) -> Vec<Line<'static>> {
    let marker = if selected { "▶ " } else { "  " };
    let style = if selected {
        Style::default().fg(ORANGE).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let mut heading = vec![Span::styled(
        format!(
            "{marker}{}  {}",
            Translations::format(
                language,
                "pricing.generations",
                &[("count", product.generations.to_string().as_str())]
            ),
            product.price()
        ),
        style,
    )];
    if product.popular {
        heading.push(Span::styled(
            format!("  ★ {}", Translations::get(language, "pricing.popular")),
            Style::default().fg(ORANGE),
        ));
    }
    if let Some(discount) = product.discount_percent {
        heading.push(Span::styled(
            format!(
                "  {}",
                Translations::format(
                    language,
                    "pricing.save",
                    &[("percent", discount.to_string().as_str())]
                )
            ),
            Style::default().fg(Color::Green),
        ));
    }

    return vec![
        Line::from(heading),
        Line::from(Span::styled(
            format!(
                "    {}",
                Translations::format(
                    language,
                    "pricing.perGeneration",
                    &[("price", product.price_per_generation().as_str())]
                )
            ),
            Style::default().fg(MUTED),
        )),
        Line::from(""),
    ];
}

fn render_pricing<B: Backend>(frame: &mut Frame<B>, rect: Rect, app_state: &AppState) {
    let mut lines = vec![];
    if app_state.needs_credits {
        lines.push(Line::from(Span::styled(
            app_state.t("needsCredits"),
            Style::default().fg(Color::Yellow),
        )));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        app_state.t("pricing.title"),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(app_state.t("pricing.subtitle")));
    lines.push(Line::from(""));

    for (idx, product) in Product::catalog().iter().enumerate() {
        lines.extend(product_lines(
            product,
            idx == app_state.pricing_cursor,
            app_state.language,
        ));
    }

    lines.push(Line::from(Span::styled(
        app_state.t("pricing.freeNote"),
        Style::default().fg(MUTED),
    )));

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().title(format!(" {} ", app_state.t("nav.pricing")))),
        rect,
    );
}

fn render_payment<B: Backend>(frame: &mut Frame<B>, rect: Rect, app_state: &AppState) {
    if app_state.loading {
        Loading::new(&app_state.t("payment.checking")).render(frame, centered(rect, 3));
        return;
    }

    let mut lines = vec![];
    if let Some(token) = &app_state.display_token {
        lines.push(Line::from(Span::styled(
            format!("✓ {}", app_state.t("payment.successTitle")),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(app_state.t("payment.successSubtitle")));
        lines.push(Line::from(""));
        lines.push(Line::from(format!("{}:", app_state.t("payment.tokenLabel"))));
        lines.push(Line::from(Span::styled(
            truncate_token(token),
            Style::default().fg(ORANGE).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            app_state.t("payment.tokenHint"),
            Style::default().fg(MUTED),
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(format!("[ {} → ]", app_state.t("payment.startUsing"))));
    } else {
        lines.push(Line::from(app_state.t("payment.noTokens")));
    }

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false }),
        centered(rect, 8),
    );
}

/// A band of `height` rows in the vertical middle of `rect`.
fn centered(rect: Rect, height: u16) -> Rect {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(rect);

    return layout[1];
}

fn render<B: Backend>(frame: &mut Frame<B>, app_state: &AppState) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.size());

    render_header(frame, layout[0], app_state);
    match app_state.view {
        View::Home => render_home(frame, layout[1], app_state),
        View::Stories => render_stories(frame, layout[1], app_state),
        View::Pricing => render_pricing(frame, layout[1], app_state),
        View::PaymentSuccess => render_payment(frame, layout[1], app_state),
    }
    render_footer(frame, layout[2], app_state);
}

async fn start_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app_state: &mut AppState,
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let mut events = EventsService::new(rx);
    app_state.init(&tx)?;

    loop {
        if let Some(url) = app_state.checkout_url.take() {
            if let Err(err) = open::that(&url) {
                tracing::error!(error = ?err, "Failed to open browser");
                app_state.notice = Some(url);
            }
        }

        terminal.draw(|frame| {
            render(frame, app_state);
        })?;

        let event = events.next().await?;
        if app_state.handle_event(event, &tx).await? {
            break;
        }
    }

    return Ok(());
}

pub fn destruct_terminal_for_panic() {
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
    let _ = crossterm::execute!(io::stdout(), cursor::Show);
}

pub async fn start(
    identity: IdentityBox,
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let language = Language::parse(&Config::get(ConfigKey::Lang)).unwrap_or_default();
    let mut app_state = AppState::new(
        &identity,
        StorageManager::get(),
        Config::year()?,
        language,
    )
    .await?;

    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    enable_raw_mode()?;
    crossterm::execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;

    let res = start_loop(&mut terminal, &mut app_state, tx, rx).await;

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    return res;
}
