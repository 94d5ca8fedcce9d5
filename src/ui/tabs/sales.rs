use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::ui::styles;
use crate::utils::{format_money, truncate_string};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
        .split(area);

    render_order_list(frame, app, chunks[0]);
    render_order_detail(frame, app, chunks[1]);
}

fn render_order_list(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(vec![
        Cell::from("Order"),
        Cell::from("Customer"),
        Cell::from("Date"),
        Cell::from("Status"),
        Cell::from("Total"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = app
        .orders
        .iter()
        .map(|order| {
            Row::new(vec![
                Cell::from(format!("#{}", order.short_id())),
                Cell::from(truncate_string(&order.customer_name(), 20)),
                Cell::from(order.date_display()),
                Cell::from(order.status.label()),
                Cell::from(format!("{:>10}", format_money(order.total_amount))),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(10),
        Constraint::Fill(1),
        Constraint::Length(12),
        Constraint::Length(10),
        Constraint::Length(11),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!(" Orders ({}) ", app.orders.len()))
                .title_style(styles::title_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(true)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.sales_selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_order_detail(frame: &mut Frame, app: &App, area: Rect) {
    let (title, lines) = match app.selected_order() {
        Some(order) => {
            let title = format!(" Order #{} ", order.short_id());
            let mut lines = vec![
                Line::from(vec![
                    Span::styled("Customer: ", styles::highlight_style()),
                    Span::raw(order.customer_name()),
                ]),
                Line::from(vec![
                    Span::styled("Email:    ", styles::highlight_style()),
                    Span::raw(order.customer_email()),
                ]),
                Line::from(vec![
                    Span::styled("Date:     ", styles::highlight_style()),
                    Span::raw(order.date_display()),
                ]),
                Line::from(vec![
                    Span::styled("Status:   ", styles::highlight_style()),
                    Span::raw(order.status.label()),
                ]),
                Line::from(""),
                Line::from(Span::styled(
                    format!("Items ({})", order.items.len()),
                    styles::title_style(),
                )),
                Line::from(""),
            ];

            for item in &order.items {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("  {:<22}", truncate_string(&item.product_name(), 20)),
                        styles::list_item_style(),
                    ),
                    Span::styled(
                        format!("x{:<3}", item.quantity),
                        styles::muted_style(),
                    ),
                    Span::styled(
                        format!("{:>10}", format_money(item.total_price)),
                        styles::highlight_style(),
                    ),
                ]));
            }

            if order.items.is_empty() {
                lines.push(Line::from(Span::styled(
                    "  No line items",
                    styles::muted_style(),
                )));
            }

            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("Total: ", styles::title_style()),
                Span::styled(
                    format_money(order.total_amount),
                    styles::success_style(),
                ),
            ]));

            (title, lines)
        }
        None => (
            " No Order Selected ".to_string(),
            vec![Line::from(Span::styled(
                "Select an order from the list",
                styles::muted_style(),
            ))],
        ),
    };

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}
