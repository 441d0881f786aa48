use orders_hex::application::order_service::OrderService;
use orders_repo::memory::InMemoryRepo;
use orders_types::domain::order::LineRequest;
use orders_upstream::{InMemoryCatalog, StaticIdentity};
use rust_decimal::Decimal;

// End-to-end service flow against the in-memory adapters.
#[tokio::test]
async fn create_list_update_flow() {
    let repo = InMemoryRepo::new();
    let catalog = InMemoryCatalog::new();
    catalog.upsert("p1", Decimal::from(100), 10);
    catalog.upsert("p2", Decimal::new(1250, 2), 3);
    let identity = StaticIdentity::new(["u1", "u2"]);
    let svc = OrderService::new(repo.clone(), identity, catalog.clone());

    let (first, _) = svc
        .create_order(
            "u1".into(),
            vec![LineRequest {
                product_id: "p1".into(),
                quantity: 3,
            }],
        )
        .await
        .unwrap();
    let (second, items) = svc
        .create_order(
            "u1".into(),
            vec![
                LineRequest {
                    product_id: "p1".into(),
                    quantity: 1,
                },
                LineRequest {
                    product_id: "p2".into(),
                    quantity: 2,
                },
            ],
        )
        .await
        .unwrap();
    assert_eq!(second.total, Decimal::from(125));
    assert_eq!(items.len(), 2);
    assert_eq!(catalog.stock_of("p1"), Some(6));
    assert_eq!(catalog.stock_of("p2"), Some(1));

    // Prices are snapshots: later catalog changes do not rewrite stored items.
    catalog.upsert("p1", Decimal::from(999), 6);
    let stored = svc.get_items(first.id).await.unwrap();
    assert_eq!(stored[0].price, Decimal::from(100));

    let list = svc.list_by_owner("u1").await.unwrap();
    let ids: Vec<_> = list.iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
    assert!(svc.list_by_owner("u2").await.unwrap().is_empty());

    let updated = svc.update_status(first.id, "cancelled".into()).await.unwrap();
    assert_eq!(updated.status.as_str(), "cancelled");
    assert_eq!(svc.get_order(first.id).await.unwrap(), updated);
}
