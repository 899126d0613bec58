// Main shell screen: provider tabs, navigation, filter sidebar, module content

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Row, Table, Tabs, Widget, Wrap},
};

use crate::engine::{
    DispatchOutcome, FilterKey, NavItem, Provider, ViewBlock, ViewDescriptor, keys,
};
use crate::ui::components::Footer;
use crate::ui::state::AppState;
use crate::ui::theme::Palette;

/// Sidebar values read under a single session lock
struct SidebarInfo {
    filters: Vec<(String, String)>,
    mode: String,
    time_range: String,
    last_refresh: String,
    active_tenants: Option<usize>,
    auto_refresh: bool,
    filtered: bool,
}

/// Rows a block needs, clamped so oversized renderer output cannot overflow
fn block_height(lines: usize, chrome: u16, max: u16) -> u16 {
    u16::try_from(lines)
        .unwrap_or(u16::MAX)
        .saturating_add(chrome)
        .min(max)
}

pub struct Shell;

impl Shell {
    pub fn render(frame: &mut Frame, state: &mut AppState) {
        state.refresh_screen();

        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Provider tabs
                Constraint::Min(0),    // Body
                Constraint::Length(1), // Status line
                Constraint::Length(1), // Footer
            ])
            .split(area);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(28), // Navigation
                Constraint::Min(0),     // Module content
                Constraint::Length(32), // Filters
            ])
            .split(chunks[1]);

        let Some(cached) = state.screen.as_ref() else {
            return;
        };
        let provider = cached.screen.state.provider;
        let palette = Palette::for_provider(provider);

        Self::render_tabs(frame, chunks[0], provider, &palette);
        Self::render_nav(frame, body[0], &cached.screen.nav, state, &palette);
        Self::render_content(frame, body[1], &cached.screen.outcome, &palette);
        Self::render_sidebar(frame, body[2], &Self::sidebar_info(state), provider, &palette);

        let status = state.status.as_deref().unwrap_or("");
        Paragraph::new(Line::from(Span::styled(
            status.to_string(),
            Style::default().fg(Color::Gray),
        )))
        .render(chunks[2], frame.buffer_mut());

        Footer::shell(provider, state.dispatch_count).render(chunks[3], frame.buffer_mut());
    }

    fn render_tabs(frame: &mut Frame, area: Rect, provider: Provider, palette: &Palette) {
        let titles: Vec<String> = Provider::ALL
            .iter()
            .enumerate()
            .map(|(i, p)| format!("{} {}", i + 1, p))
            .collect();
        let selected = Provider::ALL.iter().position(|p| *p == provider).unwrap_or(0);

        let tabs = Tabs::new(titles)
            .select(selected)
            .style(palette.bar())
            .highlight_style(palette.highlight())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(palette.border())
                    .title(Span::styled(" Cloud Platform ", palette.title())),
            );
        frame.render_widget(tabs, area);
    }

    fn render_nav(
        frame: &mut Frame,
        area: Rect,
        items: &[NavItem],
        state: &AppState,
        palette: &Palette,
    ) {
        let list_items: Vec<ListItem> = items
            .iter()
            .map(|item| {
                let marker = if item.active { "▶" } else { " " };
                let style = if item.available {
                    Style::default().fg(Color::White)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                ListItem::new(Line::from(vec![
                    Span::raw(format!("{} ", marker)),
                    Span::raw(format!("{} ", item.icon)),
                    Span::styled(item.label.clone(), style),
                ]))
            })
            .collect();

        let list = List::new(list_items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(palette.border())
                    .title(Span::styled(" Navigation ", palette.title())),
            )
            .highlight_style(palette.highlight());

        // ListState is cheap to clone; rendering takes it mutably
        let mut list_state = state.list_state.clone();
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn render_content(frame: &mut Frame, area: Rect, outcome: &DispatchOutcome, palette: &Palette) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(palette.border());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        match outcome {
            DispatchOutcome::Rendered { view, .. } => Self::render_view(frame, inner, view, palette),
            DispatchOutcome::Unavailable {
                module_key,
                provider,
            } => {
                let lines = vec![
                    Line::from(""),
                    Line::from(Span::styled(
                        format!("🚧 {} is coming soon for {}", module_key, provider),
                        palette.title(),
                    )),
                    Line::from(""),
                    Line::from(format!(
                        "This module is under development for {}. Please check back later.",
                        provider
                    )),
                ];
                frame.render_widget(
                    Paragraph::new(lines)
                        .alignment(Alignment::Center)
                        .wrap(Wrap { trim: true }),
                    inner,
                );
            }
            DispatchOutcome::Failed {
                module_key,
                provider,
                error,
            } => {
                let lines = vec![
                    Line::from(""),
                    Line::from(Span::styled(
                        format!("Error loading {} for {}", module_key, provider),
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(""),
                    Line::from(error.clone()),
                    Line::from(""),
                    Line::from(Span::styled(
                        "Other modules remain available.",
                        Style::default().fg(Color::Gray),
                    )),
                ];
                frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
            }
        }
    }

    fn render_view(frame: &mut Frame, area: Rect, view: &ViewDescriptor, palette: &Palette) {
        let max = area.height;
        let mut constraints = vec![Constraint::Length(3)];
        for block in &view.blocks {
            constraints.push(Constraint::Length(match block {
                ViewBlock::Text(text) => block_height(text.lines().count(), 1, max),
                ViewBlock::Metrics(metrics) => block_height(metrics.len(), 2, max),
                ViewBlock::Table { rows, .. } => block_height(rows.len(), 3, max),
            }));
        }
        constraints.push(Constraint::Min(0));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        let mut heading = vec![Line::from(Span::styled(view.title.clone(), palette.title()))];
        if let Some(ref subtitle) = view.subtitle {
            heading.push(Line::from(Span::styled(
                subtitle.clone(),
                Style::default().fg(Color::Gray),
            )));
        }
        frame.render_widget(Paragraph::new(heading), chunks[0]);

        for (block, chunk) in view.blocks.iter().zip(chunks.iter().skip(1)) {
            match block {
                ViewBlock::Text(text) => {
                    frame.render_widget(
                        Paragraph::new(text.clone()).wrap(Wrap { trim: true }),
                        *chunk,
                    );
                }
                ViewBlock::Metrics(metrics) => {
                    let lines: Vec<Line> = metrics
                        .iter()
                        .map(|(name, value)| {
                            Line::from(vec![
                                Span::styled(
                                    format!("{:<20}", name),
                                    Style::default().fg(Color::Gray),
                                ),
                                Span::styled(
                                    value.clone(),
                                    Style::default().add_modifier(Modifier::BOLD),
                                ),
                            ])
                        })
                        .collect();
                    frame.render_widget(Paragraph::new(lines), *chunk);
                }
                ViewBlock::Table { headers, rows } => {
                    let columns = headers.len().max(1);
                    let widths = vec![Constraint::Ratio(1, columns as u32); columns];
                    let table = Table::new(
                        rows.iter().map(|row| Row::new(row.clone())),
                        widths,
                    )
                    .header(
                        Row::new(headers.clone())
                            .style(palette.title())
                            .bottom_margin(1),
                    );
                    frame.render_widget(table, *chunk);
                }
            }
        }
    }

    fn sidebar_info(state: &AppState) -> SidebarInfo {
        state.nav.session().read(|s| {
            let provider = s.current_provider();
            let scope = s.filter_scope();
            SidebarInfo {
                filters: FilterKey::native_to(provider)
                    .iter()
                    .map(|k| (k.label(provider).to_string(), scope.get(*k).to_string()))
                    .collect(),
                mode: s.get_text(keys::MODE, "Live").to_string(),
                time_range: s.get_text(keys::TIME_RANGE, "Last 30 Days").to_string(),
                last_refresh: s
                    .last_refresh()
                    .map(|t| t.format("%H:%M:%S").to_string())
                    .unwrap_or_else(|| "never".to_string()),
                active_tenants: s.registry().active_tenants(&scope).ok().map(|t| t.len()),
                auto_refresh: s.get_bool(keys::FEATURE_AUTO_REFRESH, false),
                filtered: scope.is_filtered(),
            }
        })
    }

    fn render_sidebar(
        frame: &mut Frame,
        area: Rect,
        info: &SidebarInfo,
        provider: Provider,
        palette: &Palette,
    ) {
        let label = Style::default().fg(Color::Gray);
        let mut header = vec![Span::styled(format!("{} Filters", provider), palette.title())];
        if info.filtered {
            header.push(Span::styled(" (filtered)", Style::default().fg(Color::Yellow)));
        }
        let mut lines = vec![Line::from(header)];
        for (name, value) in &info.filters {
            lines.push(Line::from(vec![
                Span::styled(format!("{:<15}", name), label),
                Span::raw(value.clone()),
            ]));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Session", palette.title())));
        lines.push(Line::from(vec![
            Span::styled(format!("{:<15}", "Mode"), label),
            Span::raw(info.mode.clone()),
        ]));
        lines.push(Line::from(vec![
            Span::styled(format!("{:<15}", "Time Range"), label),
            Span::raw(info.time_range.clone()),
        ]));
        lines.push(Line::from(vec![
            Span::styled(format!("{:<15}", "Last Refresh"), label),
            Span::raw(info.last_refresh.clone()),
        ]));
        lines.push(Line::from(vec![
            Span::styled(format!("{:<15}", "Auto Refresh"), label),
            Span::raw(if info.auto_refresh { "on" } else { "off" }),
        ]));

        lines.push(Line::from(""));
        let tenants = match info.active_tenants {
            Some(count) => count.to_string(),
            None => "unknown".to_string(),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("Active {}s: ", provider.tenant_noun()), label),
            Span::styled(tenants, Style::default().add_modifier(Modifier::BOLD)),
        ]));

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.border())
                .title(Span::styled(" Context ", palette.title())),
        );
        frame.render_widget(paragraph, area);
    }
}
