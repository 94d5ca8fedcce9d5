use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::analytics::{
    average_order_value, monthly_expenses, products_by_category, sales_by_status, total_revenue,
};
use crate::app::App;
use crate::ui::styles;
use crate::utils::format_money;

/// Widest a text bar can grow inside its panel
const MAX_BAR_WIDTH: usize = 24;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Headline figures
            Constraint::Min(8),    // Charts
        ])
        .split(area);

    render_headline(frame, app, chunks[0]);

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(chunks[1]);

    render_sales_by_status(frame, app, charts[0]);
    render_categories(frame, app, charts[1]);
    render_monthly_expenses(frame, app, charts[2]);
}

fn render_headline(frame: &mut Frame, app: &App, area: Rect) {
    let lines = vec![
        Line::from(vec![
            Span::styled("  Total revenue: ", styles::muted_style()),
            Span::styled(
                format_money(total_revenue(&app.orders)),
                styles::success_style(),
            ),
            Span::styled("    Average order: ", styles::muted_style()),
            Span::styled(
                format_money(average_order_value(&app.orders)),
                styles::highlight_style(),
            ),
            Span::styled(
                format!("    Orders: {}", app.orders.len()),
                styles::muted_style(),
            ),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

/// Scale a value to a bar of block characters
fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 {
        return String::new();
    }
    let width = ((value / max) * MAX_BAR_WIDTH as f64).round() as usize;
    "█".repeat(width.min(MAX_BAR_WIDTH))
}

fn render_sales_by_status(frame: &mut Frame, app: &App, area: Rect) {
    let grouped = sales_by_status(&app.orders);
    let max = grouped
        .iter()
        .map(|(_, total)| *total)
        .fold(0.0_f64, f64::max);

    let mut lines = vec![];
    for (status, total) in &grouped {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<10}", status.label()), styles::list_item_style()),
            Span::styled(bar(*total, max), styles::bar_style()),
            Span::styled(format!(" {}", format_money(*total)), styles::muted_style()),
        ]));
    }

    let block = Block::default()
        .title(" Sales by Status ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

fn render_categories(frame: &mut Frame, app: &App, area: Rect) {
    let grouped = products_by_category(&app.products);
    let total: usize = grouped.iter().map(|(_, n)| n).sum();

    let mut lines = vec![];
    for (category, count) in &grouped {
        let percent = if total > 0 {
            (*count as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {:<16}", crate::utils::truncate_string(category, 14)),
                styles::list_item_style(),
            ),
            Span::styled(
                format!("{:>3} ({:>4.1}%)", count, percent),
                styles::muted_style(),
            ),
        ]));
    }

    if grouped.is_empty() {
        lines.push(Line::from(Span::styled(
            "  No products yet",
            styles::muted_style(),
        )));
    }

    let block = Block::default()
        .title(" Products by Category ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

fn render_monthly_expenses(frame: &mut Frame, app: &App, area: Rect) {
    let monthly = monthly_expenses(&app.expenses);
    let max = monthly
        .iter()
        .map(|(_, total)| *total)
        .fold(0.0_f64, f64::max);

    let mut lines = vec![];
    for (label, total) in &monthly {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<4}", label), styles::list_item_style()),
            Span::styled(bar(*total, max), styles::bar_style()),
            Span::styled(format!(" {}", format_money(*total)), styles::muted_style()),
        ]));
    }

    let block = Block::default()
        .title(" Monthly Expenses ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}
