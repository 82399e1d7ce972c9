//! Table output for menu, cart and order listings.

use std::{io, ops::Range};

use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

use breakfast_app::domain::{
    carts::{ClearReport, models::CartLineItem},
    menu::MenuItem,
    orders::Order,
};

/// Format whole currency units, e.g. `50` as `NT$50.00`.
fn format_price(amount: u64, currency: &Currency) -> String {
    let major = i64::try_from(amount).unwrap_or(i64::MAX);

    format!("{}", Money::from_major(major, currency))
}

fn write_table(
    out: &mut impl io::Write,
    builder: Builder,
    numeric_columns: Columns<Range<usize>>,
) -> io::Result<()> {
    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(numeric_columns, Alignment::right());

    writeln!(out, "{table}")
}

pub(crate) fn write_menu(
    mut out: impl io::Write,
    menu: &[MenuItem],
    currency: &Currency,
) -> io::Result<()> {
    if menu.is_empty() {
        return writeln!(out, "menu is empty");
    }

    let mut builder = Builder::default();

    builder.push_record(["Id", "Item", "Price", "Description"]);

    for item in menu {
        builder.push_record([
            item.id.to_string(),
            item.name.clone(),
            format_price(item.price, currency),
            item.description.clone(),
        ]);
    }

    write_table(&mut out, builder, Columns::new(2..3))
}

pub(crate) fn write_cart(
    mut out: impl io::Write,
    items: &[CartLineItem],
    count: u64,
    total: u64,
    currency: &Currency,
) -> io::Result<()> {
    if items.is_empty() {
        return writeln!(out, "cart is empty");
    }

    let mut builder = Builder::default();

    builder.push_record(["Id", "Item", "Price", "Qty", "Subtotal"]);

    for line in items {
        builder.push_record([
            line.id.to_string(),
            line.name.clone(),
            format_price(line.price, currency),
            line.quantity.to_string(),
            format_price(line.line_total(), currency),
        ]);
    }

    write_table(&mut out, builder, Columns::new(2..5))?;

    writeln!(out, "items: {count}")?;
    writeln!(out, "total: {}", format_price(total, currency))
}

pub(crate) fn write_orders(
    mut out: impl io::Write,
    orders: &[Order],
    currency: &Currency,
) -> io::Result<()> {
    if orders.is_empty() {
        return writeln!(out, "no orders yet");
    }

    let mut builder = Builder::default();

    builder.push_record(["Order", "Placed", "Status", "Items", "Total"]);

    for order in orders {
        let items = order
            .items
            .iter()
            .map(|line| format!("{} x{}", line.name, line.quantity))
            .collect::<Vec<_>>()
            .join(", ");

        builder.push_record([
            order.id.to_string(),
            order.created_at.strftime("%Y-%m-%d %H:%M").to_string(),
            order.status.label().to_string(),
            items,
            format_price(order.total_amount, currency),
        ]);
    }

    write_table(&mut out, builder, Columns::new(4..5))
}

pub(crate) fn write_order_placed(
    mut out: impl io::Write,
    order: &Order,
    currency: &Currency,
) -> io::Result<()> {
    writeln!(
        out,
        "order {} placed ({}), total {}",
        order.id,
        order.status.label(),
        format_price(order.total_amount, currency)
    )
}

pub(crate) fn write_clear_report(mut out: impl io::Write, report: &ClearReport) -> io::Result<()> {
    writeln!(out, "removed {} cart row(s)", report.removed.len())?;

    for (item, error) in &report.failed {
        writeln!(out, "failed to remove {item}: {}", error.user_message())?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use rusty_money::iso;
    use testresult::TestResult;

    use breakfast_app::{
        api::ApiError,
        domain::{
            carts::models::{CartItem, CartItemId},
            orders::{OrderId, OrderLine, OrderStatus},
        },
        ids::UserId,
    };

    use super::*;

    fn line(id: &str, name: &str, price: u64, quantity: u32) -> CartLineItem {
        CartLineItem::from(CartItem {
            id: CartItemId::new(id),
            user_id: UserId::new("u1"),
            menu_item_id: id.into(),
            name: name.to_string(),
            price,
            quantity,
        })
    }

    #[test]
    fn prices_are_whole_currency_units() {
        let formatted = format_price(50, iso::USD);

        assert_eq!(formatted, "$50.00");
    }

    #[test]
    fn cart_table_lists_lines_and_totals() -> TestResult {
        let items = [line("a1", "Toast", 50, 2), line("a2", "Milk Tea", 100, 1)];

        let mut out = Vec::new();
        write_cart(&mut out, &items, 3, 200, iso::USD)?;

        let output = String::from_utf8(out)?;

        assert!(output.contains("Toast"), "missing Toast in {output}");
        assert!(output.contains("Milk Tea"), "missing Milk Tea in {output}");
        assert!(output.contains("items: 3"), "missing count in {output}");
        assert!(output.contains("total: $200.00"), "missing total in {output}");

        Ok(())
    }

    #[test]
    fn empty_cart_is_reported() -> TestResult {
        let mut out = Vec::new();
        write_cart(&mut out, &[], 0, 0, iso::USD)?;

        assert_eq!(String::from_utf8(out)?, "cart is empty\n");

        Ok(())
    }

    #[test]
    fn menu_table_shows_prices() -> TestResult {
        let menu = [MenuItem::new("7", "Toast", 50)];

        let mut out = Vec::new();
        write_menu(&mut out, &menu, iso::USD)?;

        let output = String::from_utf8(out)?;

        assert!(output.contains("Toast"), "missing Toast in {output}");
        assert!(output.contains("$50.00"), "missing price in {output}");

        Ok(())
    }

    #[test]
    fn order_table_uses_status_labels() -> TestResult {
        let order = Order {
            id: OrderId::new("o1"),
            user_id: UserId::new("u1"),
            items: vec![OrderLine::from(&line("a1", "Toast", 50, 2))],
            total_amount: 100,
            status: OrderStatus::Pending,
            created_at: Timestamp::from_second(1_700_000_000)?,
        };

        let mut out = Vec::new();
        write_orders(&mut out, &[order], iso::USD)?;

        let output = String::from_utf8(out)?;

        assert!(output.contains("Toast x2"), "missing items in {output}");
        assert!(output.contains(OrderStatus::Pending.label()), "missing status in {output}");
        assert!(output.contains("2023-11-14"), "missing date in {output}");

        Ok(())
    }

    #[test]
    fn clear_report_lists_failures() -> TestResult {
        let report = ClearReport {
            removed: vec![CartItemId::new("a1")],
            failed: vec![(
                CartItemId::new("a2"),
                ApiError::UnexpectedResponse("boom".to_string()),
            )],
        };

        let mut out = Vec::new();
        write_clear_report(&mut out, &report)?;

        let output = String::from_utf8(out)?;

        assert!(output.starts_with("removed 1 cart row(s)"), "unexpected {output}");
        assert!(output.contains("failed to remove a2"), "unexpected {output}");

        Ok(())
    }
}
