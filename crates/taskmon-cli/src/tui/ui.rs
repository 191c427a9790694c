//! TUI rendering — task-manager screen.
//!
//! ┌──────────────────────────────────────────────────┐
//! │            SYSTEM MONITOR - hostname             │
//! │  [Processes]   Performance   Startup             │
//! ├────────────────────────────────┬─────────────────┤
//! │ ╭─ CPU: 42.0% ─╮ ╭─ RAM: 61% ─╮│ ╭─ Details ───╮ │
//! │ │ ⣀⣠⣴⣿⣶⣄⣀⣀⣀⣀⣀ │ │ ⣀⣀⣠⣤⣤⣤⣀⣀⣀⣀ ││ │ Up time     │ │
//! │ ╰──────────────╯ ╰────────────╯│ │ 3:12:09     │ │
//! │ ╭─ GPU: 8.0% ──╮ ╭─ Download ─╮│ │ Processes   │ │
//! │ │ ⣀⣀⣀⣀⣀⣀⣀⣀⣀⣀⣀ │ │ ⣀⣀⣮⣀⣀⣀⣀⣀⣀⣀ ││ │ 412         │ │
//! │ ╰──────────────╯ ╰────────────╯│ ╰─────────────╯ │
//! ├────────────────────────────────┴─────────────────┤
//! │  q: Quit | ←→: Switch Tab | ↑↓: Navigate         │
//! └──────────────────────────────────────────────────┘

use ratatui::{prelude::*, widgets::*};

use taskmon_core::{Rgb, StyledLine, Tab, Theme, VERSION};

use super::app::App;

pub fn draw(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Length(1), // tabs
            Constraint::Min(5),    // content
            Constraint::Length(1), // hints
            Constraint::Length(1), // status
        ])
        .split(f.area());

    draw_header(f, rows[0], app);
    draw_tabs(f, rows[1], app);
    match app.state().tab() {
        Tab::Processes => draw_processes(f, rows[2], app),
        Tab::Performance => draw_performance(f, rows[2], app),
        Tab::Startup => draw_startup(f, rows[2], app),
    }
    draw_hints(f, rows[3]);
    draw_status(f, rows[4], app);
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Map one composed row into a ratatui line using the active theme.
fn to_line(styled: &StyledLine, theme: &Theme) -> Line<'static> {
    let spans: Vec<Span<'static>> = styled
        .spans
        .iter()
        .map(|s| {
            let mut style = Style::default().fg(color(theme.resolve(s.role)));
            if s.bold {
                style = style.bold();
            }
            Span::styled(s.text.clone(), style)
        })
        .collect();
    Line::from(spans)
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let theme = app.composer().theme();
    let text = app.composer().header(app.hostname(), area.width).plain();
    let header = Paragraph::new(text)
        .style(Style::default().bg(color(theme.primary)).fg(Color::Black).bold());
    f.render_widget(header, area);
}

fn draw_tabs(f: &mut Frame, area: Rect, app: &App) {
    let theme = app.composer().theme();
    let active = app.state().tab();
    let mut spans = Vec::new();
    for tab in Tab::ALL {
        if tab == active {
            spans.push(Span::styled(
                format!(" [{}] ", tab.label()),
                Style::default().bg(color(theme.primary)).fg(Color::Black).bold(),
            ));
        } else {
            spans.push(Span::styled(
                format!(" {} ", tab.label()),
                Style::default().fg(color(theme.dim)),
            ));
        }
        spans.push(Span::raw("   "));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_performance(f: &mut Frame, area: Rect, app: &App) {
    let theme = app.composer().theme();
    // The composer works from the full terminal size; its chrome math
    // already accounts for the header/tab/hint/status rows.
    let size = f.area();
    let lines: Vec<Line> = app
        .composer()
        .performance_frame(app.state(), size.width, size.height)
        .iter()
        .map(|l| to_line(l, theme))
        .collect();
    f.render_widget(Paragraph::new(lines), area);
}

fn draw_processes(f: &mut Frame, area: Rect, app: &mut App) {
    let page = area.height.saturating_sub(1).max(1) as usize;
    app.set_page_size(page);

    let theme = app.composer().theme().clone();
    let state = app.state();
    let cursor = state.cursor();
    let rows_all = state.processes();

    if rows_all.is_empty() {
        let placeholder = Paragraph::new("Enumerating processes…")
            .style(Style::default().fg(color(theme.dim)));
        f.render_widget(placeholder, area);
        return;
    }

    let end = (cursor.offset() + page).min(rows_all.len());
    let rows: Vec<Row> = rows_all[cursor.offset()..end]
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let selected = cursor.offset() + i == cursor.index();
            let style = if selected {
                Style::default().bg(Color::DarkGray).fg(Color::White)
            } else {
                Style::default().fg(color(theme.secondary))
            };
            Row::new(vec![
                p.pid.to_string(),
                p.name.clone(),
                format!("{:.1}", p.cpu_pct),
                format!("{:.1}", p.mem_pct),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Fill(1),
            Constraint::Length(8),
            Constraint::Length(8),
        ],
    )
    .header(
        Row::new(vec!["PID", "Name", "CPU%", "MEM%"])
            .style(Style::default().fg(color(theme.primary)).bold()),
    );

    f.render_widget(table, area);
}

fn draw_startup(f: &mut Frame, area: Rect, app: &mut App) {
    let page = area.height.saturating_sub(1).max(1) as usize;
    app.set_page_size(page);

    let theme = app.composer().theme().clone();
    let state = app.state();
    let cursor = state.cursor();
    let rows_all = state.startup();

    if rows_all.is_empty() {
        let placeholder = Paragraph::new("No startup applications found")
            .style(Style::default().fg(color(theme.dim)));
        f.render_widget(placeholder, area);
        return;
    }

    let end = (cursor.offset() + page).min(rows_all.len());
    let rows: Vec<Row> = rows_all[cursor.offset()..end]
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let selected = cursor.offset() + i == cursor.index();
            let row_style = if selected {
                Style::default().bg(Color::DarkGray).fg(Color::White)
            } else {
                Style::default()
            };
            let status = if entry.enabled {
                Span::styled("Enabled", Style::default().fg(Color::Green))
            } else {
                Span::styled("Disabled", Style::default().fg(Color::Red))
            };
            Row::new(vec![
                Cell::from(entry.name.clone()),
                Cell::from(Line::from(status).right_aligned()),
            ])
            .style(row_style)
        })
        .collect();

    let table = Table::new(rows, [Constraint::Fill(1), Constraint::Length(15)]).header(
        Row::new(vec!["App Name", "Status"])
            .style(Style::default().fg(color(theme.primary)).bold()),
    );

    f.render_widget(table, area);
}

fn draw_hints(f: &mut Frame, area: Rect) {
    let bar = Paragraph::new(" q: Quit | ←→: Switch Tab | ↑↓: Navigate")
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));
    f.render_widget(bar, area);
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let theme = app.composer().theme();
    let snap = app.state().latest();
    let status = format!(
        " taskmon v{VERSION} | {} | {} procs | refresh {:.1}s",
        app.hostname(),
        snap.process_count,
        app.refresh_rate_secs(),
    );
    f.render_widget(
        Paragraph::new(status).style(Style::default().fg(color(theme.dim))),
        area,
    );
}
