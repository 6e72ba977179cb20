//! Sales reports over paid orders.

use std::collections::HashMap;

use chrono::NaiveDate;
use common::ProductId;
use domain::{Money, Order, OrderStatus};

/// Units sold for one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSales {
    pub product_id: ProductId,
    pub sku: String,
    pub product_name: String,
    pub quantity: u64,
}

/// Ranks products by units sold across paid orders.
///
/// Highest quantity first; equal quantities keep the order in which the
/// products were first seen. At most `limit` entries are returned.
pub fn top_products<'a>(orders: impl IntoIterator<Item = &'a Order>, limit: usize) -> Vec<ProductSales> {
    let mut sales: Vec<ProductSales> = Vec::new();
    let mut index: HashMap<ProductId, usize> = HashMap::new();

    for order in orders.into_iter().filter(|o| o.status() == OrderStatus::Paid) {
        for item in order.items() {
            match index.get(&item.product_id) {
                Some(&at) => sales[at].quantity += u64::from(item.quantity),
                None => {
                    index.insert(item.product_id, sales.len());
                    sales.push(ProductSales {
                        product_id: item.product_id,
                        sku: item.sku.clone(),
                        product_name: item.product_name.clone(),
                        quantity: u64::from(item.quantity),
                    });
                }
            }
        }
    }

    // sort_by is stable
    sales.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    sales.truncate(limit);
    sales
}

/// Sums the totals of paid orders created within `start..=end`.
pub fn total_revenue<'a>(
    orders: impl IntoIterator<Item = &'a Order>,
    start: NaiveDate,
    end: NaiveDate,
) -> Money {
    orders
        .into_iter()
        .filter(|o| o.status() == OrderStatus::Paid && in_range(o, start, end))
        .map(Order::total)
        .sum()
}

pub(crate) fn in_range(order: &Order, start: NaiveDate, end: NaiveDate) -> bool {
    (start..=end).contains(&order.created_on())
}
