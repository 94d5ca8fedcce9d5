use ratatui::{
    layout::{Constraint, Rect},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::analytics::total_expenses;
use crate::app::App;
use crate::ui::styles;
use crate::utils::{format_money, truncate_string};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(vec![
        Cell::from("Date"),
        Cell::from("Description"),
        Cell::from("Category"),
        Cell::from("Amount"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = app
        .expenses
        .iter()
        .map(|expense| {
            Row::new(vec![
                Cell::from(expense.expense_date.format("%Y-%m-%d").to_string()),
                Cell::from(truncate_string(&expense.description, 40)),
                Cell::from(expense.category_display().to_string()),
                Cell::from(format!("{:>10}", format_money(expense.amount))),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Fill(1),
        Constraint::Length(16),
        Constraint::Length(11),
    ];

    let title = format!(
        " Expenses ({}) - Total {} ",
        app.expenses.len(),
        format_money(total_expenses(&app.expenses))
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::title_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(true)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.expense_selection));

    frame.render_stateful_widget(table, area, &mut state);
}
