use checkout::{FixedOutcome, InventoryLedger, OrderWorkflow, PaymentProcessor};
use common::{CustomerId, ProductId};
use criterion::{Criterion, criterion_group, criterion_main};
use domain::{InventoryRecord, Money, Order, OrderItem, Payment, PaymentMethod};
use store::InMemoryRepository;

type BenchWorkflow = OrderWorkflow<
    InMemoryRepository<Order>,
    InMemoryRepository<InventoryRecord>,
    InMemoryRepository<Payment>,
    FixedOutcome,
>;

fn make_workflow(approve: bool) -> BenchWorkflow {
    let gateway = if approve {
        FixedOutcome::approving()
    } else {
        FixedOutcome::declining()
    };
    OrderWorkflow::new(
        InMemoryRepository::new(),
        InventoryLedger::new(InMemoryRepository::new()),
        PaymentProcessor::new(InMemoryRepository::new(), gateway),
    )
}

fn items() -> Vec<OrderItem> {
    (1..=5)
        .map(|i| {
            OrderItem::new(
                ProductId::new(i),
                format!("SKU-{i}"),
                format!("Product {i}"),
                2,
                Money::from_cents(1_000),
            )
        })
        .collect()
}

fn bench_create_and_checkout(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    for (name, approve) in [("checkout/paid", true), ("checkout/declined", false)] {
        let workflow = make_workflow(approve);
        rt.block_on(async {
            for i in 1..=5 {
                workflow
                    .inventory()
                    .restock(ProductId::new(i), u32::MAX / 2)
                    .await
                    .unwrap();
            }
        });

        c.bench_function(name, |b| {
            b.iter(|| {
                rt.block_on(async {
                    let order = workflow
                        .create_order(CustomerId::new(1), items())
                        .await
                        .unwrap();
                    workflow
                        .checkout(order.id().unwrap(), PaymentMethod::Card)
                        .await
                        .unwrap();
                });
            });
        });
    }
}

fn bench_top_products(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let workflow = make_workflow(true);
    rt.block_on(async {
        for i in 1..=5 {
            workflow
                .inventory()
                .restock(ProductId::new(i), 100_000)
                .await
                .unwrap();
        }
        for _ in 0..1_000 {
            let order = workflow
                .create_order(CustomerId::new(1), items())
                .await
                .unwrap();
            workflow
                .checkout(order.id().unwrap(), PaymentMethod::Card)
                .await
                .unwrap();
        }
    });

    c.bench_function("reporting/top_products_1000_orders", |b| {
        b.iter(|| rt.block_on(async { workflow.top_products(3).await.unwrap() }));
    });
}

criterion_group!(benches, bench_create_and_checkout, bench_top_products);
criterion_main!(benches);
