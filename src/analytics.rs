//! Aggregations computed from the cached business data.
//!
//! All functions here are pure: they take slices of already-fetched
//! records and return totals, groupings, and breakdowns for the
//! dashboard and analytics views.

use std::collections::HashMap;

use chrono::Datelike;

use crate::models::{Expense, Order, OrderStatus, Product};

/// Month labels in calendar order for the expense breakdown
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Headline figures shown on the dashboard tab
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    pub total_revenue: f64,
    pub total_expenses: f64,
    pub net_profit: f64,
    pub order_count: usize,
    pub customer_count: usize,
    pub product_count: usize,
}

impl DashboardStats {
    pub fn compute(
        orders: &[Order],
        expenses: &[Expense],
        customer_count: usize,
        product_count: usize,
    ) -> Self {
        let total_revenue = total_revenue(orders);
        let total_expenses = total_expenses(expenses);
        Self {
            total_revenue,
            total_expenses,
            net_profit: total_revenue - total_expenses,
            order_count: orders.len(),
            customer_count,
            product_count,
        }
    }
}

/// Sum of order totals across all orders, regardless of status
pub fn total_revenue(orders: &[Order]) -> f64 {
    orders.iter().map(|o| o.total_amount).sum()
}

/// Sum of all recorded expense amounts
pub fn total_expenses(expenses: &[Expense]) -> f64 {
    expenses.iter().map(|e| e.amount).sum()
}

/// Mean order value; 0 when there are no orders
pub fn average_order_value(orders: &[Order]) -> f64 {
    if orders.is_empty() {
        return 0.0;
    }
    total_revenue(orders) / orders.len() as f64
}

/// Order totals summed per status, in fixed status order.
/// The known statuses are always present; an Unknown bucket is appended
/// only when the data contains unrecognized statuses.
pub fn sales_by_status(orders: &[Order]) -> Vec<(OrderStatus, f64)> {
    let mut statuses = vec![
        OrderStatus::Pending,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];
    if orders.iter().any(|o| o.status == OrderStatus::Unknown) {
        statuses.push(OrderStatus::Unknown);
    }
    statuses
        .into_iter()
        .map(|status| {
            let total = orders
                .iter()
                .filter(|o| o.status == status)
                .map(|o| o.total_amount)
                .sum();
            (status, total)
        })
        .collect()
}

/// Product counts grouped by category name, sorted by count descending.
/// Products without a category are grouped under "Uncategorized".
pub fn products_by_category(products: &[Product]) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for product in products {
        *counts.entry(product.category_display().to_string()).or_insert(0) += 1;
    }

    let mut grouped: Vec<(String, usize)> = counts.into_iter().collect();
    grouped.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    grouped
}

/// Expense totals bucketed by calendar month, Jan through Dec.
/// Every month is present even when it has no expenses.
pub fn monthly_expenses(expenses: &[Expense]) -> Vec<(&'static str, f64)> {
    let mut totals = [0.0_f64; 12];
    for expense in expenses {
        let month = expense.expense_date.month0() as usize;
        totals[month] += expense.amount;
    }

    MONTH_LABELS
        .iter()
        .zip(totals)
        .map(|(label, total)| (*label, total))
        .collect()
}

/// Products below the low stock threshold, lowest stock first
pub fn low_stock(products: &[Product]) -> Vec<&Product> {
    let mut low: Vec<&Product> = products.iter().filter(|p| p.is_low_stock()).collect();
    low.sort_by_key(|p| p.stock_quantity);
    low
}

/// The most recently placed orders, newest first
pub fn recent_orders(orders: &[Order], limit: usize) -> Vec<&Order> {
    let mut sorted: Vec<&Order> = orders.iter().collect();
    sorted.sort_by(|a, b| b.order_date.cmp(&a.order_date));
    sorted.truncate(limit);
    sorted
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn order(id: &str, status: OrderStatus, total: f64) -> Order {
        Order {
            id: id.to_string(),
            customer_id: Some("c1".to_string()),
            order_date: None,
            status,
            total_amount: total,
            customer: None,
            items: Vec::new(),
        }
    }

    fn product(name: &str, category: Option<&str>, stock: i64) -> Product {
        Product {
            id: Some(name.to_string()),
            name: name.to_string(),
            description: None,
            price: 1.0,
            stock_quantity: stock,
            category: category.map(|c| c.to_string()),
            sku: None,
            created_at: None,
        }
    }

    fn expense(amount: f64, date: NaiveDate) -> Expense {
        Expense {
            id: None,
            description: "test".to_string(),
            amount,
            category: None,
            expense_date: date,
            created_at: None,
        }
    }

    #[test]
    fn test_totals_and_net_profit() {
        let orders = vec![
            order("o1", OrderStatus::Completed, 100.0),
            order("o2", OrderStatus::Pending, 50.0),
        ];
        let expenses = vec![expense(30.0, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap())];

        let stats = DashboardStats::compute(&orders, &expenses, 3, 7);
        assert_eq!(stats.total_revenue, 150.0);
        assert_eq!(stats.total_expenses, 30.0);
        assert_eq!(stats.net_profit, 120.0);
        assert_eq!(stats.order_count, 2);
        assert_eq!(stats.customer_count, 3);
        assert_eq!(stats.product_count, 7);
    }

    #[test]
    fn test_average_order_value_empty() {
        assert_eq!(average_order_value(&[]), 0.0);
    }

    #[test]
    fn test_average_order_value() {
        let orders = vec![
            order("o1", OrderStatus::Completed, 10.0),
            order("o2", OrderStatus::Completed, 30.0),
        ];
        assert_eq!(average_order_value(&orders), 20.0);
    }

    #[test]
    fn test_sales_by_status_sums_amounts() {
        let orders = vec![
            order("o1", OrderStatus::Completed, 100.0),
            order("o2", OrderStatus::Completed, 50.0),
            order("o3", OrderStatus::Pending, 5.0),
        ];
        let grouped = sales_by_status(&orders);
        assert_eq!(
            grouped,
            vec![
                (OrderStatus::Pending, 5.0),
                (OrderStatus::Completed, 150.0),
                (OrderStatus::Cancelled, 0.0),
            ]
        );
    }

    #[test]
    fn test_sales_by_status_unknown_bucket_only_when_present() {
        let known = vec![order("o1", OrderStatus::Pending, 1.0)];
        assert_eq!(sales_by_status(&known).len(), 3);

        let mixed = vec![
            order("o1", OrderStatus::Pending, 1.0),
            order("o2", OrderStatus::Unknown, 25.0),
        ];
        let grouped = sales_by_status(&mixed);
        assert_eq!(grouped.len(), 4);
        assert_eq!(grouped[3], (OrderStatus::Unknown, 25.0));
    }

    #[test]
    fn test_products_by_category_uncategorized() {
        let products = vec![
            product("a", Some("Tools"), 5),
            product("b", Some("Tools"), 5),
            product("c", None, 5),
        ];
        let grouped = products_by_category(&products);
        assert_eq!(
            grouped,
            vec![("Tools".to_string(), 2), ("Uncategorized".to_string(), 1)]
        );
    }

    #[test]
    fn test_monthly_expenses_all_months_present() {
        let expenses = vec![
            expense(10.0, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()),
            expense(5.0, NaiveDate::from_ymd_opt(2024, 1, 20).unwrap()),
            expense(7.5, NaiveDate::from_ymd_opt(2024, 12, 1).unwrap()),
        ];
        let monthly = monthly_expenses(&expenses);
        assert_eq!(monthly.len(), 12);
        assert_eq!(monthly[0], ("Jan", 15.0));
        assert_eq!(monthly[1], ("Feb", 0.0));
        assert_eq!(monthly[11], ("Dec", 7.5));
    }

    #[test]
    fn test_low_stock_sorted_ascending() {
        let products = vec![
            product("a", None, 8),
            product("b", None, 2),
            product("c", None, 50),
        ];
        let low = low_stock(&products);
        assert_eq!(low.len(), 2);
        assert_eq!(low[0].name, "b");
        assert_eq!(low[1].name, "a");
    }

    #[test]
    fn test_recent_orders_newest_first() {
        use chrono::{TimeZone, Utc};
        let mut o1 = order("o1", OrderStatus::Completed, 1.0);
        o1.order_date = Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let mut o2 = order("o2", OrderStatus::Completed, 1.0);
        o2.order_date = Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
        let mut o3 = order("o3", OrderStatus::Completed, 1.0);
        o3.order_date = Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());

        let orders = [o1, o2, o3];
        let recent = recent_orders(&orders, 2);
        assert_eq!(recent[0].id, "o2");
        assert_eq!(recent[1].id, "o3");
    }
}
