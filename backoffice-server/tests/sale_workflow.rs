//! Sale workflow: stock reconciliation across create, update, delete
//! and bulk delete.

mod common;

use backoffice_server::ErrorCode;
use backoffice_server::db::models::{SaleUpdate, SaleLineInput};
use backoffice_server::services::SaleService;
use common::{line, rid, sale_payload, seed_product, setup, stock_of};

#[tokio::test]
async fn create_decrements_stock_for_every_line() {
    let ctx = setup().await;
    let pen = seed_product(&ctx.db, "Ballpoint Pen", "PEN-01", 1.5, 100).await;
    let pad = seed_product(&ctx.db, "Notepad A5", "PAD-05", 3.25, 40).await;

    let service = SaleService::new(ctx.db.clone());
    let sale = service
        .create(sale_payload(&ctx, vec![line(&pen, 10, 1.5), line(&pad, 4, 3.25)]))
        .await
        .expect("sale created");

    assert_eq!(sale.items.len(), 2);
    assert_eq!(sale.items[0].quantity, 10);
    assert_eq!(sale.items[0].line_no, 1);
    assert_eq!(sale.items[1].line_no, 2);
    assert_eq!(stock_of(&ctx.db, &pen).await, 90);
    assert_eq!(stock_of(&ctx.db, &pad).await, 36);
}

#[tokio::test]
async fn create_computes_subtotals_server_side() {
    let ctx = setup().await;
    let pen = seed_product(&ctx.db, "Ballpoint Pen", "PEN-01", 10.99, 10).await;

    let service = SaleService::new(ctx.db.clone());
    let mut payload = sale_payload(&ctx, vec![line(&pen, 3, 10.99)]);
    // Caller-supplied subtotal is ignored in favor of qty x price
    payload.items[0].subtotal = Some(999.0);
    let sale = service.create(payload).await.expect("sale created");

    assert_eq!(sale.items[0].subtotal, 32.97);
}

#[tokio::test]
async fn create_with_insufficient_stock_mutates_nothing() {
    let ctx = setup().await;
    let pen = seed_product(&ctx.db, "Ballpoint Pen", "PEN-01", 1.5, 100).await;
    let pad = seed_product(&ctx.db, "Notepad A5", "PAD-05", 3.25, 3).await;

    let service = SaleService::new(ctx.db.clone());
    let err = service
        .create(sale_payload(&ctx, vec![line(&pen, 10, 1.5), line(&pad, 4, 3.25)]))
        .await
        .expect_err("second line exceeds stock");

    assert_eq!(err.code, ErrorCode::InsufficientStock);
    assert!(err.message.contains("Notepad A5"));
    // The first line was processable but nothing may move
    assert_eq!(stock_of(&ctx.db, &pen).await, 100);
    assert_eq!(stock_of(&ctx.db, &pad).await, 3);
}

#[tokio::test]
async fn create_accumulates_duplicate_product_lines() {
    let ctx = setup().await;
    let pen = seed_product(&ctx.db, "Ballpoint Pen", "PEN-01", 1.5, 5).await;

    let service = SaleService::new(ctx.db.clone());
    // 3 + 3 across two lines exceeds the 5 in stock even though each
    // line alone fits
    let err = service
        .create(sale_payload(&ctx, vec![line(&pen, 3, 1.5), line(&pen, 3, 1.5)]))
        .await
        .expect_err("cumulative quantity exceeds stock");

    assert_eq!(err.code, ErrorCode::InsufficientStock);
    assert_eq!(stock_of(&ctx.db, &pen).await, 5);
}

#[tokio::test]
async fn create_rejects_unknown_references() {
    let ctx = setup().await;
    let pen = seed_product(&ctx.db, "Ballpoint Pen", "PEN-01", 1.5, 10).await;
    let service = SaleService::new(ctx.db.clone());

    let mut payload = sale_payload(&ctx, vec![line(&pen, 1, 1.5)]);
    payload.customer_id = "customer:nobody".into();
    let err = service.create(payload).await.expect_err("unknown customer");
    assert_eq!(err.code, ErrorCode::CustomerNotFound);

    let mut payload = sale_payload(&ctx, vec![line(&pen, 1, 1.5)]);
    payload.items[0].product_id = "product:ghost".into();
    let err = service.create(payload).await.expect_err("unknown product");
    assert_eq!(err.code, ErrorCode::ProductNotFound);
    assert_eq!(stock_of(&ctx.db, &pen).await, 10);
}

#[tokio::test]
async fn create_rejects_empty_item_list() {
    let ctx = setup().await;
    let service = SaleService::new(ctx.db.clone());
    let err = service
        .create(sale_payload(&ctx, vec![]))
        .await
        .expect_err("no items");
    assert_eq!(err.code, ErrorCode::SaleEmpty);
}

#[tokio::test]
async fn delete_restores_stock_round_trip() {
    let ctx = setup().await;
    let pen = seed_product(&ctx.db, "Ballpoint Pen", "PEN-01", 10.0, 10).await;

    let service = SaleService::new(ctx.db.clone());
    let sale = service
        .create(sale_payload(&ctx, vec![line(&pen, 3, 10.0)]))
        .await
        .expect("sale created");
    assert_eq!(stock_of(&ctx.db, &pen).await, 7);

    service.delete(&rid(&sale.id)).await.expect("sale deleted");
    assert_eq!(stock_of(&ctx.db, &pen).await, 10);

    let err = service.get(&rid(&sale.id)).await.expect_err("gone");
    assert_eq!(err.code, ErrorCode::SaleNotFound);
}

#[tokio::test]
async fn update_with_unchanged_items_leaves_stock_alone() {
    let ctx = setup().await;
    let pen = seed_product(&ctx.db, "Ballpoint Pen", "PEN-01", 1.5, 20).await;

    let service = SaleService::new(ctx.db.clone());
    let sale = service
        .create(sale_payload(&ctx, vec![line(&pen, 5, 1.5)]))
        .await
        .expect("sale created");
    assert_eq!(stock_of(&ctx.db, &pen).await, 15);

    let updated = service
        .update(
            &rid(&sale.id),
            SaleUpdate {
                customer_id: None,
                employee_id: None,
                total_amount: None,
                tax_amount: None,
                discount_amount: None,
                final_amount: None,
                items: vec![line(&pen, 5, 1.5)],
            },
        )
        .await
        .expect("sale updated");

    assert_eq!(updated.items.len(), 1);
    assert_eq!(stock_of(&ctx.db, &pen).await, 15);
}

#[tokio::test]
async fn update_moves_stock_by_net_difference() {
    let ctx = setup().await;
    let pen = seed_product(&ctx.db, "Ballpoint Pen", "PEN-01", 1.5, 20).await;
    let pad = seed_product(&ctx.db, "Notepad A5", "PAD-05", 3.25, 10).await;

    let service = SaleService::new(ctx.db.clone());
    let sale = service
        .create(sale_payload(&ctx, vec![line(&pen, 5, 1.5)]))
        .await
        .expect("sale created");
    assert_eq!(stock_of(&ctx.db, &pen).await, 15);

    // Pen drops 5 -> 2 (stock +3), pad appears with 4 (stock -4)
    let updated = service
        .update(
            &rid(&sale.id),
            SaleUpdate {
                customer_id: None,
                employee_id: None,
                total_amount: None,
                tax_amount: None,
                discount_amount: None,
                final_amount: None,
                items: vec![line(&pen, 2, 1.5), line(&pad, 4, 3.25)],
            },
        )
        .await
        .expect("sale updated");

    assert_eq!(updated.items.len(), 2);
    assert_eq!(stock_of(&ctx.db, &pen).await, 18);
    assert_eq!(stock_of(&ctx.db, &pad).await, 6);
}

#[tokio::test]
async fn update_removing_a_product_restores_its_stock() {
    let ctx = setup().await;
    let pen = seed_product(&ctx.db, "Ballpoint Pen", "PEN-01", 1.5, 20).await;
    let pad = seed_product(&ctx.db, "Notepad A5", "PAD-05", 3.25, 10).await;

    let service = SaleService::new(ctx.db.clone());
    let sale = service
        .create(sale_payload(&ctx, vec![line(&pen, 5, 1.5), line(&pad, 4, 3.25)]))
        .await
        .expect("sale created");

    let updated = service
        .update(
            &rid(&sale.id),
            SaleUpdate {
                customer_id: None,
                employee_id: None,
                total_amount: None,
                tax_amount: None,
                discount_amount: None,
                final_amount: None,
                items: vec![line(&pen, 5, 1.5)],
            },
        )
        .await
        .expect("sale updated");

    assert_eq!(updated.items.len(), 1);
    assert_eq!(stock_of(&ctx.db, &pen).await, 15);
    assert_eq!(stock_of(&ctx.db, &pad).await, 10);
}

#[tokio::test]
async fn update_exceeding_stock_fails_without_mutation() {
    let ctx = setup().await;
    let pen = seed_product(&ctx.db, "Ballpoint Pen", "PEN-01", 1.5, 10).await;

    let service = SaleService::new(ctx.db.clone());
    let sale = service
        .create(sale_payload(&ctx, vec![line(&pen, 5, 1.5)]))
        .await
        .expect("sale created");
    assert_eq!(stock_of(&ctx.db, &pen).await, 5);

    // 5 -> 12 demands 7 more than the 5 remaining
    let err = service
        .update(
            &rid(&sale.id),
            SaleUpdate {
                customer_id: None,
                employee_id: None,
                total_amount: None,
                tax_amount: None,
                discount_amount: None,
                final_amount: None,
                items: vec![SaleLineInput {
                    product_id: rid(&pen.id),
                    quantity: 12,
                    unit_price: 1.5,
                    subtotal: None,
                }],
            },
        )
        .await
        .expect_err("insufficient for the increase");

    assert_eq!(err.code, ErrorCode::InsufficientStock);
    assert_eq!(stock_of(&ctx.db, &pen).await, 5);

    // Original allocation survives intact
    let detail = service.get(&rid(&sale.id)).await.expect("still there");
    assert_eq!(detail.items[0].quantity, 5);
}

#[tokio::test]
async fn bulk_delete_is_all_or_nothing() {
    let ctx = setup().await;
    let pen = seed_product(&ctx.db, "Ballpoint Pen", "PEN-01", 1.5, 20).await;

    let service = SaleService::new(ctx.db.clone());
    let a = service
        .create(sale_payload(&ctx, vec![line(&pen, 3, 1.5)]))
        .await
        .expect("sale a");
    let b = service
        .create(sale_payload(&ctx, vec![line(&pen, 4, 1.5)]))
        .await
        .expect("sale b");
    assert_eq!(stock_of(&ctx.db, &pen).await, 13);

    let err = service
        .delete_many(&[rid(&a.id), "sale:missing".into(), rid(&b.id)])
        .await
        .expect_err("one id does not exist");
    assert_eq!(err.code, ErrorCode::SaleNotFound);
    assert!(err.message.contains("sale:missing"));

    // Nothing was touched
    assert_eq!(stock_of(&ctx.db, &pen).await, 13);
    assert!(service.get(&rid(&a.id)).await.is_ok());
    assert!(service.get(&rid(&b.id)).await.is_ok());

    // A clean batch restores everything
    service
        .delete_many(&[rid(&a.id), rid(&b.id)])
        .await
        .expect("bulk delete");
    assert_eq!(stock_of(&ctx.db, &pen).await, 20);
    assert!(service.get(&rid(&a.id)).await.is_err());
}
