use ratatui::{
    layout::{Constraint, Rect},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::ui::styles;
use crate::utils::format::format_phone;
use crate::utils::truncate_string;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(vec![
        Cell::from("Name"),
        Cell::from("Email"),
        Cell::from("Phone"),
        Cell::from("Address"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = app
        .customers
        .iter()
        .map(|customer| {
            let phone = customer
                .phone
                .as_deref()
                .map(format_phone)
                .unwrap_or_else(|| "-".to_string());

            Row::new(vec![
                Cell::from(truncate_string(&customer.name, 26)),
                Cell::from(customer.email_display().to_string()),
                Cell::from(phone),
                Cell::from(truncate_string(customer.address_display(), 30)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(28),
        Constraint::Fill(1),
        Constraint::Length(16),
        Constraint::Length(32),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!(" Customers ({}) ", app.customers.len()))
                .title_style(styles::title_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(true)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.customer_selection));

    frame.render_stateful_widget(table, area, &mut state);
}
