use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::analytics::{low_stock, recent_orders, DashboardStats};
use crate::app::{App, RECENT_ORDERS_LIMIT};
use crate::ui::styles;
use crate::utils::{format_money, truncate_string};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Stat cards
            Constraint::Min(8),    // Recent orders / low stock
        ])
        .split(area);

    render_stats(frame, app, chunks[0]);

    let lower = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);

    render_recent_orders(frame, app, lower[0]);
    render_low_stock(frame, app, lower[1]);
}

fn render_stats(frame: &mut Frame, app: &App, area: Rect) {
    let stats = DashboardStats::compute(
        &app.orders,
        &app.expenses,
        app.customers.len(),
        app.products.len(),
    );

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
        ])
        .split(area);

    let profit_style = if stats.net_profit >= 0.0 {
        styles::success_style()
    } else {
        styles::error_style()
    };

    render_stat_card(
        frame,
        cards[0],
        "Revenue",
        &format_money(stats.total_revenue),
        styles::success_style(),
        &format!("{} orders", stats.order_count),
    );
    render_stat_card(
        frame,
        cards[1],
        "Expenses",
        &format_money(stats.total_expenses),
        styles::error_style(),
        &format!("{} recorded", app.expenses.len()),
    );
    render_stat_card(
        frame,
        cards[2],
        "Net Profit",
        &format_money(stats.net_profit),
        profit_style,
        "revenue - expenses",
    );
    render_stat_card(
        frame,
        cards[3],
        "Catalog",
        &format!("{}", stats.product_count),
        styles::highlight_style(),
        &format!("{} customers", stats.customer_count),
    );
}

fn render_stat_card(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    value: &str,
    value_style: ratatui::style::Style,
    subtitle: &str,
) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(format!("  {}", value), value_style)),
        Line::from(Span::styled(
            format!("  {}", subtitle),
            styles::muted_style(),
        )),
    ];

    let block = Block::default()
        .title(format!(" {} ", title))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

fn render_recent_orders(frame: &mut Frame, app: &App, area: Rect) {
    let recent = recent_orders(&app.orders, RECENT_ORDERS_LIMIT);

    let mut lines = vec![];
    for order in &recent {
        lines.push(Line::from(vec![
            Span::styled(format!("  #{:<10}", order.short_id()), styles::muted_style()),
            Span::styled(
                format!("{:<22}", truncate_string(&order.customer_name(), 20)),
                styles::list_item_style(),
            ),
            Span::styled(
                format!("{:>10}", format_money(order.total_amount)),
                styles::highlight_style(),
            ),
            Span::styled(
                format!("  {}", order.status.label()),
                styles::muted_style(),
            ),
        ]));
    }

    if recent.is_empty() {
        lines.push(Line::from(Span::styled(
            "  No orders yet",
            styles::muted_style(),
        )));
    }

    let block = Block::default()
        .title(" Recent Orders ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

fn render_low_stock(frame: &mut Frame, app: &App, area: Rect) {
    let low = low_stock(&app.products);

    let mut lines = vec![];
    for product in &low {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {:<24}", truncate_string(&product.name, 22)),
                styles::list_item_style(),
            ),
            Span::styled(
                format!("{:>3} left", product.stock_quantity),
                styles::warning_style(),
            ),
        ]));
    }

    if low.is_empty() {
        lines.push(Line::from(Span::styled(
            "  All products well stocked",
            styles::success_style(),
        )));
    }

    let block = Block::default()
        .title(format!(" Low Stock ({}) ", low.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}
