//! UI rendering and the terminal loop for the explorer.

use super::app::TopoApp;
use super::events::{handle_key_event, handle_mouse_event, Event, EventHandler};
use super::theme::{
    colors, filter_badge, render_footer_hints, set_theme, state_badge, FooterHints, Styles, Theme,
};
use super::widgets::TopologyTree;
use crate::model::Instance;
use crate::projection::{FlatRow, ResourceFilter};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs, Wrap},
};
use std::io::{self, stdout};

const MIN_WIDTH: u16 = 60;
const MIN_HEIGHT: u16 = 16;

/// Run the explorer TUI until the user quits.
pub fn run_tui(app: &mut TopoApp) -> io::Result<()> {
    set_theme(Theme::from_name(&app.config.theme));

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::default();

    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            Event::Key(key) => handle_key_event(app, key),
            Event::Mouse(mouse) => handle_mouse_event(app, mouse),
            Event::Resize(_, _) => {}
            Event::Tick => {
                app.tick += 1;
            }
        }

        if app.should_quit {
            break;
        }
    }

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}

/// Main render function.
fn render(frame: &mut Frame, app: &mut TopoApp) {
    let area = frame.area();

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        render_size_warning(frame, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Length(3), // Filter tabs
            Constraint::Min(8),    // Content
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Footer
        ])
        .split(area);

    render_header(frame, chunks[0], app);
    render_filter_tabs(frame, chunks[1], app);
    render_content(frame, chunks[2], app);
    render_status_bar(frame, chunks[3], app);
    render_footer(frame, chunks[4], app);

    if app.show_help {
        render_help_overlay(frame, area);
    }
}

fn render_size_warning(frame: &mut Frame, area: Rect) {
    let warning = Paragraph::new(format!(
        "Terminal too small: need at least {MIN_WIDTH}x{MIN_HEIGHT}"
    ))
    .style(Styles::warning())
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    frame.render_widget(warning, area);
}

fn render_header(frame: &mut Frame, area: Rect, app: &TopoApp) {
    let scheme = colors();
    let mut spans = vec![
        Span::styled("toposcope", Styles::header_title()),
        Span::styled(" │ ", Style::default().fg(scheme.muted)),
        Span::styled(
            format!(
                "{} regions, {} instances",
                app.inventory.len(),
                app.total_instances()
            ),
            Styles::text_muted(),
        ),
    ];

    if app.failed_regions() > 0 {
        spans.push(Span::styled(" │ ", Style::default().fg(scheme.muted)));
        spans.push(Span::styled(
            format!("{} regions failed", app.failed_regions()),
            Styles::error(),
        ));
    }

    if let Some(scanned) = app.last_scan {
        spans.push(Span::styled(" │ ", Style::default().fg(scheme.muted)));
        spans.push(Span::styled(
            format!("scanned {}", scanned.format("%H:%M:%S")),
            Styles::text_muted(),
        ));
    }

    spans.push(Span::raw(" "));
    spans.extend(filter_badge("filter", app.filter.label()));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_filter_tabs(frame: &mut Frame, area: Rect, app: &TopoApp) {
    let filters = [
        (ResourceFilter::All, "1"),
        (ResourceFilter::Vpc, "2"),
        (ResourceFilter::Subnet, "3"),
        (ResourceFilter::Instance, "4"),
        (ResourceFilter::SecurityGroup, "5"),
    ];

    let titles: Vec<Line> = filters
        .iter()
        .map(|(filter, key)| {
            let is_active = *filter == app.filter;
            let style = if is_active {
                Style::default().fg(colors().accent).bold()
            } else {
                Styles::text_muted()
            };
            Line::from(vec![
                Span::styled(format!("{key}:"), Styles::shortcut_key()),
                Span::styled(filter.label(), style),
            ])
        })
        .collect();

    let selected = filters
        .iter()
        .position(|(filter, _)| *filter == app.filter)
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .block(Block::default().borders(Borders::BOTTOM).border_style(Styles::border()))
        .divider(Span::styled("│", Style::default().fg(colors().muted)));
    frame.render_widget(tabs, area);
}

fn render_content(frame: &mut Frame, area: Rect, app: &mut TopoApp) {
    // The detail panel claims the right third whenever an instance is
    // selected, regardless of filter.
    let (main_area, detail_area) = if app.selection.selected().is_some() {
        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
            .split(area);
        (halves[0], Some(halves[1]))
    } else {
        (area, None)
    };

    if app.filter.is_tree() {
        render_tree_view(frame, main_area, app);
    } else {
        render_flat_view(frame, main_area, app);
    }

    if let Some(detail_area) = detail_area {
        if let Some(instance) = app.selection.selected() {
            render_instance_detail(frame, detail_area, instance);
        }
    }
}

fn render_tree_view(frame: &mut Frame, area: Rect, app: &mut TopoApp) {
    // Field borrows stay disjoint here: the cached projection is read while
    // expansion and cursor are touched separately, so no clone per frame.
    let roots = app.cache.get(&app.inventory, app.filter).roots();

    if roots.is_empty() {
        let message = if app.filter == ResourceFilter::SecurityGroup {
            "No security groups referenced by any instance"
        } else {
            "No inventory - press r to scan"
        };
        let empty = Paragraph::new(message)
            .style(Styles::text_muted())
            .alignment(Alignment::Center)
            .block(titled_block(app.filter.label()));
        frame.render_widget(empty, area);
        app.cursor.clamp(0);
        return;
    }

    let tree = TopologyTree::new(roots, &app.expansion).block(titled_block(app.filter.label()));
    frame.render_stateful_widget(tree, area, &mut app.cursor);
}

fn render_flat_view(frame: &mut Frame, area: Rect, app: &mut TopoApp) {
    let rows = app.cache.get(&app.inventory, app.filter).rows();
    app.cursor.clamp(rows.len());

    if rows.is_empty() {
        let empty = Paragraph::new("No inventory - press r to scan")
            .style(Styles::text_muted())
            .alignment(Alignment::Center)
            .block(titled_block(app.filter.label()));
        frame.render_widget(empty, area);
        return;
    }

    let (header, table_rows, widths) = match app.filter {
        ResourceFilter::Instance => instance_table(rows),
        _ => subnet_table(rows),
    };

    // Keep the selected row inside the viewport.
    let visible_height = area.height.saturating_sub(4) as usize;
    if visible_height > 0 {
        if app.cursor.selected >= app.cursor.offset + visible_height {
            app.cursor.offset = app.cursor.selected - visible_height + 1;
        } else if app.cursor.selected < app.cursor.offset {
            app.cursor.offset = app.cursor.selected;
        }
    }

    let visible: Vec<Row> = table_rows
        .into_iter()
        .enumerate()
        .skip(app.cursor.offset)
        .map(|(i, row)| {
            if i == app.cursor.selected {
                row.style(Styles::selected())
            } else {
                row
            }
        })
        .collect();

    let title = format!("{} ({})", app.filter.label(), rows.len());
    let table = Table::new(visible, widths)
        .header(header.style(Styles::header_title()))
        .block(titled_block(&title))
        .column_spacing(1);
    frame.render_widget(table, area);
}

fn instance_table<'a>(rows: &'a [FlatRow]) -> (Row<'a>, Vec<Row<'a>>, Vec<Constraint>) {
    let header = Row::new(vec![
        "Name", "ID", "Type", "State", "Private IP", "Public IP", "Subnet", "VPC", "AZ", "Region",
    ]);
    let scheme = colors();
    let table_rows = rows
        .iter()
        .filter_map(|row| match row {
            FlatRow::Instance(row) => Some(Row::new(vec![
                Cell::from(row.instance.name.as_str()),
                Cell::from(row.instance.id.as_str()).style(Styles::text_muted()),
                Cell::from(row.instance.instance_type.as_str()),
                Cell::from(row.instance.state.as_str())
                    .style(Style::default().fg(scheme.state_color(&row.instance.state))),
                Cell::from(row.instance.private_ip.as_str()),
                Cell::from(row.instance.public_ip.as_deref().unwrap_or("-")),
                Cell::from(row.subnet_name.as_str()),
                Cell::from(row.vpc_name.as_str()),
                Cell::from(row.az.as_str()),
                Cell::from(row.region.as_str()),
            ])),
            FlatRow::Subnet(_) => None,
        })
        .collect();
    let widths = vec![
        Constraint::Min(12),
        Constraint::Length(19),
        Constraint::Length(10),
        Constraint::Length(8),
        Constraint::Length(15),
        Constraint::Length(15),
        Constraint::Min(10),
        Constraint::Min(10),
        Constraint::Length(12),
        Constraint::Length(12),
    ];
    (header, table_rows, widths)
}

fn subnet_table<'a>(rows: &'a [FlatRow]) -> (Row<'a>, Vec<Row<'a>>, Vec<Constraint>) {
    let header = Row::new(vec![
        "Name",
        "ID",
        "CIDR",
        "AZ",
        "Instances",
        "VPC",
        "Region",
    ]);
    let table_rows = rows
        .iter()
        .filter_map(|row| match row {
            FlatRow::Subnet(row) => Some(Row::new(vec![
                Cell::from(row.subnet.name.as_str()),
                Cell::from(row.subnet.id.as_str()).style(Styles::text_muted()),
                Cell::from(row.subnet.cidr.as_str()),
                Cell::from(row.subnet.az.as_str()),
                Cell::from(row.instance_count.to_string()),
                Cell::from(row.vpc_name.as_str()),
                Cell::from(row.region.as_str()),
            ])),
            FlatRow::Instance(_) => None,
        })
        .collect();
    let widths = vec![
        Constraint::Min(14),
        Constraint::Length(24),
        Constraint::Length(18),
        Constraint::Length(14),
        Constraint::Length(9),
        Constraint::Min(10),
        Constraint::Length(12),
    ];
    (header, table_rows, widths)
}

fn render_instance_detail(frame: &mut Frame, area: Rect, instance: &Instance) {
    let scheme = colors();
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Name: ", Styles::label()),
            Span::styled(instance.name.clone(), Styles::value()),
        ]),
        Line::from(vec![
            Span::styled("ID: ", Styles::label()),
            Span::styled(instance.id.clone(), Styles::text()),
        ]),
        Line::from(vec![
            Span::styled("Type: ", Styles::label()),
            Span::styled(instance.instance_type.clone(), Styles::text()),
        ]),
        Line::from(vec![
            Span::styled("State: ", Styles::label()),
            state_badge(&instance.state),
        ]),
        Line::from(vec![
            Span::styled("Private IP: ", Styles::label()),
            Span::styled(instance.private_ip.clone(), Styles::text()),
        ]),
        Line::from(vec![
            Span::styled("Public IP: ", Styles::label()),
            Span::styled(
                instance.public_ip.clone().unwrap_or_else(|| "-".to_string()),
                Styles::text(),
            ),
        ]),
        Line::default(),
        Line::from(Span::styled(
            format!("Inbound rules ({})", instance.security_rules.len()),
            Styles::header_title(),
        )),
    ];

    if instance.security_rules.is_empty() {
        lines.push(Line::from(Span::styled("  none", Styles::text_muted())));
    }
    for rule in &instance.security_rules {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {} {} ", rule.protocol, rule.port_range_label()),
                Style::default().fg(scheme.security_group),
            ),
            Span::styled(rule.source.join(", "), Styles::text()),
        ]));
        let mut context = String::new();
        if !rule.sg_name.is_empty() {
            context.push_str(&format!("    {} ({})", rule.sg_name, rule.sg_id));
        } else if !rule.sg_id.is_empty() {
            context.push_str(&format!("    {}", rule.sg_id));
        }
        if !rule.description.is_empty() {
            context.push_str(&format!(" - {}", rule.description));
        }
        if !context.is_empty() {
            lines.push(Line::from(Span::styled(context, Styles::text_muted())));
        }
    }

    let detail = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Styles::border_focused())
                .title(" Instance "),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(detail, area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &TopoApp) {
    let line = app.status_message.as_ref().map_or_else(
        || {
            Line::from(Span::styled(
                format!("endpoint: {}", app.config.endpoint),
                Styles::text_muted(),
            ))
        },
        |message| Line::from(Span::styled(message.clone(), Styles::warning())),
    );
    frame.render_widget(Paragraph::new(line).style(Styles::status_bar()), area);
}

fn render_footer(frame: &mut Frame, area: Rect, app: &TopoApp) {
    let hints = FooterHints::for_filter(app.filter.is_tree(), app.expansion.allows_toggling());
    let footer = Paragraph::new(Line::from(render_footer_hints(&hints)));
    frame.render_widget(footer, area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let width = 52.min(area.width.saturating_sub(4));
    let height = 16.min(area.height.saturating_sub(2));
    let popup = Rect {
        x: (area.width.saturating_sub(width)) / 2,
        y: (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };

    let entries = [
        ("Tab / Shift+Tab", "cycle resource filter"),
        ("1-5", "jump to filter"),
        ("↑↓ / jk", "move cursor"),
        ("PgUp / PgDn", "page"),
        ("Home / End", "first / last"),
        ("Enter / Space", "expand node or select instance"),
        ("c", "collapse all"),
        ("Esc", "close detail panel / quit"),
        ("r", "rescan inventory"),
        ("T", "toggle theme"),
        ("?", "this help"),
        ("q", "quit"),
    ];

    let lines: Vec<Line> = entries
        .iter()
        .map(|(key, desc)| {
            Line::from(vec![
                Span::styled(format!(" {key:<16}"), Styles::shortcut_key()),
                Span::styled((*desc).to_string(), Styles::text()),
            ])
        })
        .collect();

    frame.render_widget(Clear, popup);
    let help = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Styles::border_focused())
            .title(" Help "),
    );
    frame.render_widget(help, popup);
}

fn titled_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Styles::border())
        .title(format!(" {title} "))
}
