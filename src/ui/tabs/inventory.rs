use ratatui::{
    layout::{Constraint, Rect},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::ui::styles;
use crate::utils::{format_money, format_optional, truncate_string};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(vec![
        Cell::from("Name"),
        Cell::from("SKU"),
        Cell::from("Category"),
        Cell::from("Price"),
        Cell::from("Stock"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = app
        .products
        .iter()
        .map(|product| {
            let stock_cell = if product.is_low_stock() {
                Cell::from(format!("{:>5} ▼", product.stock_quantity))
                    .style(styles::warning_style())
            } else {
                Cell::from(format!("{:>5}", product.stock_quantity))
            };

            Row::new(vec![
                Cell::from(truncate_string(&product.name, 28)),
                Cell::from(format_optional(&product.sku, "-")),
                Cell::from(product.category_display().to_string()),
                Cell::from(format!("{:>9}", format_money(product.price))),
                stock_cell,
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(1),
        Constraint::Length(12),
        Constraint::Length(16),
        Constraint::Length(10),
        Constraint::Length(8),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!(" Products ({}) ", app.products.len()))
                .title_style(styles::title_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(true)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.inventory_selection));

    frame.render_stateful_widget(table, area, &mut state);
}
