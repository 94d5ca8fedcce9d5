use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, AppState, LoginFocus, Tab};
use crate::notify::Severity;

use super::styles;
use super::tabs::{analytics, customers, dashboard, expenses, inventory, sales};

const LOGO: [&str; 3] = [
    "╔═╗╦ ╦╔═╗╔═╗╦╔═╔═╗╔═╗╔═╗",
    "╚═╗╠═╣║ ║╠═╝╠╩╗║╣ ║╣ ╠═╝",
    "╚═╝╩ ╩╚═╝╩  ╩ ╩╚═╝╚═╝╩  ",
];

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Tabs
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }

    if matches!(app.state, AppState::LoggingIn) {
        render_login_overlay(frame, app);
    }

    if matches!(app.state, AppState::EditingForm) {
        render_form_overlay(frame, app);
    }

    if matches!(app.state, AppState::ConfirmingDelete) {
        render_delete_overlay(frame, app);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }

    render_toast(frame, app);
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let user = app
        .sessions
        .current()
        .map(|u| format!("  {}", u.username))
        .unwrap_or_default();
    let title = format!("  Shopkeep{}", user);
    let help_hint = "[?] Help";

    let title_line = Line::from(vec![
        Span::styled(title.clone(), styles::title_style()),
        Span::raw(" ".repeat(
            (area.width as usize)
                .saturating_sub(title.chars().count() + help_hint.len() + 2),
        )),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let tabs = [
        Tab::Dashboard,
        Tab::Sales,
        Tab::Inventory,
        Tab::Customers,
        Tab::Analytics,
        Tab::Expenses,
    ];

    let mut spans = vec![Span::raw(" ")];
    for (i, tab) in tabs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        let label = format!("[{}] {}", i + 1, tab.title());
        if app.current_tab == *tab {
            spans.push(Span::styled(label, styles::tab_style(true)));
        } else {
            spans.push(Span::styled(label, styles::muted_style()));
        }
    }

    let line = Line::from(spans);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.current_tab {
        Tab::Dashboard => dashboard::render(frame, app, area),
        Tab::Sales => sales::render(frame, app, area),
        Tab::Inventory => inventory::render(frame, app, area),
        Tab::Customers => customers::render(frame, app, area),
        Tab::Analytics => analytics::render(frame, app, area),
        Tab::Expenses => expenses::render(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let last_updated = app.cache_ages.last_updated();

    let shortcuts = match app.current_tab {
        Tab::Inventory | Tab::Customers | Tab::Expenses => {
            "[a]dd [e]dit [d]elete | [u]pdate | [l]ogout | [q]uit"
        }
        _ => "[u]pdate | [l]ogout | [q]uit",
    };

    let left_text = if let Some(ref msg) = app.status_message {
        format!(" {} ", msg)
    } else {
        format!(" Updated {} ", last_updated)
    };

    let right_text = format!(" {} ", shortcuts);

    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.len())
        .saturating_sub(right_text.len());

    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn logo_lines(indent: usize) -> Vec<Line<'static>> {
    LOGO.iter()
        .map(|row| {
            Line::from(Span::styled(
                format!("{}{}", " ".repeat(indent), row),
                styles::title_style(),
            ))
        })
        .collect()
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 24, frame.area());

    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let mut help_text = logo_lines(13);
    help_text.extend(vec![
        Line::from(Span::styled(
            format!("              version {}", version),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        Line::from(vec![
            Span::styled("  1-6       ", styles::help_key_style()),
            Span::styled("Switch tabs", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  ←/→       ", styles::help_key_style()),
            Span::styled("Prev/next tab", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  ↑/↓       ", styles::help_key_style()),
            Span::styled("Navigate list", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  PgUp/PgDn ", styles::help_key_style()),
            Span::styled("Scroll by page", styles::help_desc_style()),
        ]),
        Line::from(""),
        Line::from(Span::styled(" Actions", styles::highlight_style())),
        Line::from(vec![
            Span::styled("  a         ", styles::help_key_style()),
            Span::styled("Add a record (editable tabs)", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  e         ", styles::help_key_style()),
            Span::styled("Edit the selected record", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  d         ", styles::help_key_style()),
            Span::styled("Delete the selected record", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  u         ", styles::help_key_style()),
            Span::styled("Update data from the server", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  l         ", styles::help_key_style()),
            Span::styled("Log out", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  q         ", styles::help_key_style()),
            Span::styled("Quit", styles::help_desc_style()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(help_text).block(block);

    frame.render_widget(paragraph, area);
}

fn render_login_overlay(frame: &mut Frame, app: &App) {
    let height = if app.login_error.is_some() { 14 } else { 12 };
    let area = centered_rect_fixed(46, height, frame.area());

    frame.render_widget(Clear, area);

    let mut lines = logo_lines(10);
    lines.push(Line::from(""));

    // Username field
    let username_focused = app.login_focus == LoginFocus::Username;
    let username_style = if username_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let username_display = format!("{:<16}", app.login_username);
    let cursor = if username_focused { "▌" } else { "" };
    lines.push(Line::from(vec![
        Span::raw("      "),
        Span::styled("Username: [", styles::muted_style()),
        Span::styled(format!("{}{}", username_display, cursor), username_style),
        Span::styled("]", styles::muted_style()),
    ]));

    // Password field, masked
    let password_focused = app.login_focus == LoginFocus::Password;
    let password_style = if password_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let password_masked: String = "*".repeat(app.login_password.chars().count().min(16));
    let password_display = format!("{:<16}", password_masked);
    let cursor = if password_focused { "▌" } else { "" };
    lines.push(Line::from(vec![
        Span::raw("      "),
        Span::styled("Password: [", styles::muted_style()),
        Span::styled(format!("{}{}", password_display, cursor), password_style),
        Span::styled("]", styles::muted_style()),
    ]));

    // Login button
    let button_focused = app.login_focus == LoginFocus::Button;
    let button_style = if button_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    lines.push(Line::from(""));
    if button_focused {
        lines.push(Line::from(vec![
            Span::raw("            ["),
            Span::styled(" ▶ Login ◀ ", button_style),
            Span::raw("]"),
        ]));
    } else {
        lines.push(Line::from(vec![
            Span::raw("            ["),
            Span::styled("   Login   ", button_style),
            Span::raw("]"),
        ]));
    }

    // Error message
    if let Some(ref error) = app.login_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", error),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block);

    frame.render_widget(paragraph, area);
}

fn render_form_overlay(frame: &mut Frame, app: &App) {
    let Some(ref form) = app.form else {
        return;
    };

    let height = form.fields.len() as u16 + if form.error.is_some() { 8 } else { 6 };
    let area = centered_rect_fixed(56, height, frame.area());

    frame.render_widget(Clear, area);

    let mut lines = vec![Line::from("")];

    for (i, field) in form.fields.iter().enumerate() {
        let focused = i == form.focus;
        let style = if focused {
            styles::selected_style()
        } else {
            styles::list_item_style()
        };
        let display = format!("{:<32}", field.value);
        let cursor = if focused { "▌" } else { "" };
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(format!("{:>12}: [", field.label), styles::muted_style()),
            Span::styled(format!("{}{}", display, cursor), style),
            Span::styled("]", styles::muted_style()),
        ]));
    }

    if let Some(ref error) = form.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {}", error),
            styles::error_style(),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  Press ", styles::muted_style()),
        Span::styled("Enter", styles::help_key_style()),
        Span::styled(" to save, ", styles::muted_style()),
        Span::styled("Esc", styles::help_key_style()),
        Span::styled(" to cancel, ", styles::muted_style()),
        Span::styled("Tab", styles::help_key_style()),
        Span::styled(" next field", styles::muted_style()),
    ]));

    let block = Block::default()
        .title(format!(" {} ", form.title))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block);

    frame.render_widget(paragraph, area);
}

fn render_delete_overlay(frame: &mut Frame, app: &App) {
    let Some(ref pending) = app.pending_delete else {
        return;
    };

    let area = centered_rect_fixed(50, 8, frame.area());

    frame.render_widget(Clear, area);

    let label = crate::utils::truncate_string(&pending.label, 36);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("   Delete \"{}\"?", label),
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "   This cannot be undone.",
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to delete, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .title(" Confirm Delete ")
        .title_style(styles::error_style())
        .borders(Borders::ALL)
        .border_style(styles::error_style())
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block);

    frame.render_widget(paragraph, area);
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 10, frame.area());

    frame.render_widget(Clear, area);

    let mut lines = logo_lines(10);
    lines.extend(vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block);

    frame.render_widget(paragraph, area);
}

/// Render the active toast, if any, in the top-right corner
fn render_toast(frame: &mut Frame, app: &App) {
    let Some(toast) = app.toasts.current() else {
        return;
    };

    let width: u16 = 38;
    let height: u16 = if toast.description.is_some() { 4 } else { 3 };
    let screen = frame.area();
    if screen.width < width + 2 || screen.height < height + 3 {
        return;
    }
    let area = Rect::new(screen.width - width - 1, 3, width, height);

    frame.render_widget(Clear, area);

    let title_style = match toast.severity {
        Severity::Normal => styles::success_style(),
        Severity::Destructive => styles::error_style(),
    };

    let mut lines = vec![Line::from(Span::styled(
        format!(" {}", toast.title),
        title_style,
    ))];
    if let Some(ref description) = toast.description {
        lines.push(Line::from(Span::styled(
            format!(" {}", crate::utils::truncate_string(description, width as usize - 3)),
            styles::list_item_style(),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(title_style);

    let paragraph = Paragraph::new(lines).block(block);

    frame.render_widget(paragraph, area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
