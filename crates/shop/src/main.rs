//! Shop entry point.
//!
//! Seeds a small catalog, runs a few customers through cart, order, and
//! checkout, then prints a JSON report of the resulting state.

use chrono::Utc;
use domain::{Money, PaymentMethod};
use serde_json::json;
use shop::{Config, Shop, ShopError};

async fn run(shop: &Shop) -> Result<serde_json::Value, ShopError> {
    // 1. Seed catalog, stock, and customers
    let catalog = [
        ("LAMP-01", "Desk lamp", 34_900, 8),
        ("MUG-02", "Coffee mug", 9_900, 25),
        ("CHAIR-03", "Office chair", 199_000, 3),
    ];
    let mut products = Vec::with_capacity(catalog.len());
    for (sku, name, cents, stock) in catalog {
        let product = shop
            .products()
            .create_product(sku, name, "", Money::from_cents(cents))
            .await?;
        if let Some(id) = product.id() {
            shop.inventory().restock(id, stock).await?;
        }
        products.push(product);
    }

    let anna = shop
        .customers()
        .find_or_create("anna@example.com", "Anna Svensson")
        .await?;
    let erik = shop
        .customers()
        .find_or_create("erik@example.com", "Erik Berg")
        .await?;

    // 2. Shop and check out
    let sessions = [
        (&anna, vec![(0, 1), (1, 2)], PaymentMethod::Card),
        (&erik, vec![(2, 2), (1, 1)], PaymentMethod::Invoice),
    ];
    for (customer, lines, method) in sessions {
        let Some(customer_id) = customer.id() else {
            continue;
        };
        for (index, quantity) in lines {
            if let Some(product_id) = products[index].id() {
                shop.add_to_cart(customer_id, product_id, quantity).await?;
            }
        }

        let order = shop.place_order(customer_id).await?;
        let Some(order_id) = order.id() else {
            continue;
        };
        let resolved = shop.checkout(order_id, method).await?;
        tracing::info!(
            %order_id,
            customer = %customer,
            status = %resolved.status(),
            total = %resolved.total(),
            "session finished"
        );
    }

    // 3. Report
    let today = Utc::now().date_naive();
    let orders = serde_json::to_value(shop.orders().list_all().await?)?;
    let top = shop.orders().top_products(3).await?;
    let low = shop.low_stock().await?;
    let revenue = shop.orders().total_revenue(today, today).await?;
    let summary = serde_json::to_value(shop.summary().await)?;

    Ok(json!({
        "summary": summary,
        "orders": orders,
        "revenue_today": revenue.to_string(),
        "top_products": top
            .iter()
            .map(|s| json!({ "sku": s.sku, "name": s.product_name, "quantity": s.quantity }))
            .collect::<Vec<_>>(),
        "low_stock": low
            .iter()
            .map(|r| json!({ "product_id": r.product_id(), "in_stock": r.in_stock() }))
            .collect::<Vec<_>>(),
    }))
}

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    // 1. Initialize tracing
    if let Err(err) = shop::telemetry::init(&config) {
        eprintln!("{err}");
        std::process::exit(err.exit_code());
    }
    tracing::info!(?config, "starting shop session");

    // 2. Run the scripted session
    let shop = Shop::from_config(config);
    let outcome = match run(&shop).await {
        Ok(report) => serde_json::to_string_pretty(&report).map_err(ShopError::from),
        Err(err) => Err(err),
    };

    match outcome {
        Ok(rendered) => println!("{rendered}"),
        Err(err) => {
            tracing::error!(error = %err, "shop session failed");
            std::process::exit(err.exit_code());
        }
    }
}
