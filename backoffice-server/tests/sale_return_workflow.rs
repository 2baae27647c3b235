//! Sale-return workflow: return invariants against the original sale
//! and inverse stock reconciliation.

mod common;

use backoffice_server::ErrorCode;
use backoffice_server::db::models::{
    CustomerCreate, ReturnLineInput, SaleReturnCreate, SaleReturnUpdate,
};
use backoffice_server::db::repository::CustomerRepository;
use backoffice_server::services::{SaleReturnService, SaleService};
use common::{TestContext, line, rid, sale_payload, seed_product, setup, stock_of};

async fn seed_sale(
    ctx: &TestContext,
    product: &backoffice_server::db::models::Product,
    quantity: i64,
    unit_price: f64,
) -> backoffice_server::db::models::SaleDetail {
    SaleService::new(ctx.db.clone())
        .create(sale_payload(ctx, vec![line(product, quantity, unit_price)]))
        .await
        .expect("seed sale")
}

fn return_payload(
    ctx: &TestContext,
    sale_id: &str,
    items: Vec<ReturnLineInput>,
) -> SaleReturnCreate {
    SaleReturnCreate {
        sale_id: sale_id.to_string(),
        customer_id: rid(&ctx.customer.id),
        employee_id: rid(&ctx.employee.id),
        reason: "damaged in transit".into(),
        items,
    }
}

fn return_line(product: &backoffice_server::db::models::Product, quantity: i64) -> ReturnLineInput {
    ReturnLineInput {
        product_id: rid(&product.id),
        quantity,
        unit_price: None,
    }
}

#[tokio::test]
async fn create_return_puts_goods_back_and_totals_from_sale_price() {
    let ctx = setup().await;
    let pen = seed_product(&ctx.db, "Ballpoint Pen", "PEN-01", 2.5, 10).await;
    let sale = seed_sale(&ctx, &pen, 4, 2.5).await;
    assert_eq!(stock_of(&ctx.db, &pen).await, 6);

    let service = SaleReturnService::new(ctx.db.clone());
    let ret = service
        .create(return_payload(&ctx, &rid(&sale.id), vec![return_line(&pen, 3)]))
        .await
        .expect("return created");

    assert_eq!(ret.items.len(), 1);
    // Unit price falls back to the original sale line's price
    assert_eq!(ret.items[0].unit_price, 2.5);
    assert_eq!(ret.total_return_amount, 7.5);
    assert_eq!(stock_of(&ctx.db, &pen).await, 9);
}

#[tokio::test]
async fn return_exceeding_purchase_fails_without_mutation() {
    let ctx = setup().await;
    let pen = seed_product(&ctx.db, "Ballpoint Pen", "PEN-01", 2.5, 20).await;
    let sale = seed_sale(&ctx, &pen, 10, 2.5).await;
    let before = stock_of(&ctx.db, &pen).await;

    let service = SaleReturnService::new(ctx.db.clone());
    let err = service
        .create(return_payload(&ctx, &rid(&sale.id), vec![return_line(&pen, 11)]))
        .await
        .expect_err("11 > 10 purchased");

    assert_eq!(err.code, ErrorCode::ReturnQuantityExceedsPurchase);
    assert_eq!(stock_of(&ctx.db, &pen).await, before);
}

#[tokio::test]
async fn return_quantity_accumulates_across_payload_lines() {
    let ctx = setup().await;
    let pen = seed_product(&ctx.db, "Ballpoint Pen", "PEN-01", 2.5, 20).await;
    let sale = seed_sale(&ctx, &pen, 10, 2.5).await;

    let service = SaleReturnService::new(ctx.db.clone());
    // 6 + 6 across two lines exceeds the 10 purchased
    let err = service
        .create(return_payload(
            &ctx,
            &rid(&sale.id),
            vec![return_line(&pen, 6), return_line(&pen, 6)],
        ))
        .await
        .expect_err("cumulative return exceeds purchase");

    assert_eq!(err.code, ErrorCode::ReturnQuantityExceedsPurchase);
}

#[tokio::test]
async fn return_of_product_not_in_sale_names_the_product() {
    let ctx = setup().await;
    let pen = seed_product(&ctx.db, "Ballpoint Pen", "PEN-01", 2.5, 20).await;
    let ink = seed_product(&ctx.db, "Ink Cartridge", "INK-11", 8.0, 5).await;
    let sale = seed_sale(&ctx, &pen, 10, 2.5).await;

    let service = SaleReturnService::new(ctx.db.clone());
    let err = service
        .create(return_payload(&ctx, &rid(&sale.id), vec![return_line(&ink, 1)]))
        .await
        .expect_err("ink was never sold on this sale");

    assert_eq!(err.code, ErrorCode::ReturnProductNotInSale);
    assert!(err.message.contains("Ink Cartridge"));
    assert_eq!(stock_of(&ctx.db, &ink).await, 5);
}

#[tokio::test]
async fn return_by_a_different_customer_is_rejected() {
    let ctx = setup().await;
    let pen = seed_product(&ctx.db, "Ballpoint Pen", "PEN-01", 2.5, 20).await;
    let sale = seed_sale(&ctx, &pen, 10, 2.5).await;

    let stranger = CustomerRepository::new(ctx.db.clone())
        .create(CustomerCreate {
            name: "Mallory".into(),
            phone: None,
            email: None,
            address: None,
        })
        .await
        .expect("second customer");

    let service = SaleReturnService::new(ctx.db.clone());
    let mut payload = return_payload(&ctx, &rid(&sale.id), vec![return_line(&pen, 1)]);
    payload.customer_id = rid(&stranger.id);
    let err = service.create(payload).await.expect_err("wrong customer");

    assert_eq!(err.code, ErrorCode::ReturnCustomerMismatch);
}

#[tokio::test]
async fn return_requires_reason_and_items() {
    let ctx = setup().await;
    let pen = seed_product(&ctx.db, "Ballpoint Pen", "PEN-01", 2.5, 20).await;
    let sale = seed_sale(&ctx, &pen, 10, 2.5).await;
    let service = SaleReturnService::new(ctx.db.clone());

    let mut payload = return_payload(&ctx, &rid(&sale.id), vec![return_line(&pen, 1)]);
    payload.reason = "  ".into();
    let err = service.create(payload).await.expect_err("blank reason");
    assert_eq!(err.code, ErrorCode::ReturnReasonRequired);

    let payload = return_payload(&ctx, &rid(&sale.id), vec![]);
    let err = service.create(payload).await.expect_err("no items");
    assert_eq!(err.code, ErrorCode::ReturnEmpty);
}

#[tokio::test]
async fn update_return_adjusts_stock_by_difference_and_recomputes_total() {
    let ctx = setup().await;
    let pen = seed_product(&ctx.db, "Ballpoint Pen", "PEN-01", 2.0, 10).await;
    let sale = seed_sale(&ctx, &pen, 6, 2.0).await;
    assert_eq!(stock_of(&ctx.db, &pen).await, 4);

    let service = SaleReturnService::new(ctx.db.clone());
    let ret = service
        .create(return_payload(&ctx, &rid(&sale.id), vec![return_line(&pen, 2)]))
        .await
        .expect("return created");
    assert_eq!(stock_of(&ctx.db, &pen).await, 6);

    // 2 -> 5 returned: three more come back
    let updated = service
        .update(
            &rid(&ret.id),
            SaleReturnUpdate {
                sale_id: None,
                customer_id: None,
                employee_id: None,
                reason: None,
                items: vec![return_line(&pen, 5)],
            },
        )
        .await
        .expect("return updated");

    assert_eq!(updated.items.len(), 1);
    assert_eq!(updated.items[0].quantity, 5);
    assert_eq!(updated.total_return_amount, 10.0);
    assert_eq!(stock_of(&ctx.db, &pen).await, 9);

    // 5 -> 1 returned: four go back out of stock
    let updated = service
        .update(
            &rid(&ret.id),
            SaleReturnUpdate {
                sale_id: None,
                customer_id: None,
                employee_id: None,
                reason: None,
                items: vec![return_line(&pen, 1)],
            },
        )
        .await
        .expect("return shrunk");

    assert_eq!(updated.total_return_amount, 2.0);
    assert_eq!(stock_of(&ctx.db, &pen).await, 5);
}

#[tokio::test]
async fn update_return_rejects_reference_changes() {
    let ctx = setup().await;
    let pen = seed_product(&ctx.db, "Ballpoint Pen", "PEN-01", 2.0, 10).await;
    let sale = seed_sale(&ctx, &pen, 6, 2.0).await;
    let other_sale = seed_sale(&ctx, &pen, 1, 2.0).await;

    let service = SaleReturnService::new(ctx.db.clone());
    let ret = service
        .create(return_payload(&ctx, &rid(&sale.id), vec![return_line(&pen, 2)]))
        .await
        .expect("return created");

    let err = service
        .update(
            &rid(&ret.id),
            SaleReturnUpdate {
                sale_id: Some(rid(&other_sale.id)),
                customer_id: None,
                employee_id: None,
                reason: None,
                items: vec![return_line(&pen, 2)],
            },
        )
        .await
        .expect_err("sale reference is immutable");
    assert_eq!(err.code, ErrorCode::ReturnSaleImmutable);

    let err = service
        .update(
            &rid(&ret.id),
            SaleReturnUpdate {
                sale_id: None,
                customer_id: Some("customer:mallory".into()),
                employee_id: None,
                reason: None,
                items: vec![return_line(&pen, 2)],
            },
        )
        .await
        .expect_err("customer reference is immutable");
    assert_eq!(err.code, ErrorCode::ReturnCustomerImmutable);
}

#[tokio::test]
async fn delete_return_takes_goods_back_out_of_stock() {
    let ctx = setup().await;
    let pen = seed_product(&ctx.db, "Ballpoint Pen", "PEN-01", 2.0, 10).await;
    let sale = seed_sale(&ctx, &pen, 6, 2.0).await;

    let service = SaleReturnService::new(ctx.db.clone());
    let ret = service
        .create(return_payload(&ctx, &rid(&sale.id), vec![return_line(&pen, 3)]))
        .await
        .expect("return created");
    assert_eq!(stock_of(&ctx.db, &pen).await, 7);

    service.delete(&rid(&ret.id)).await.expect("return deleted");
    assert_eq!(stock_of(&ctx.db, &pen).await, 4);

    let err = service.get(&rid(&ret.id)).await.expect_err("gone");
    assert_eq!(err.code, ErrorCode::ReturnNotFound);
}

#[tokio::test]
async fn delete_return_fails_when_returned_goods_were_resold() {
    let ctx = setup().await;
    let pen = seed_product(&ctx.db, "Ballpoint Pen", "PEN-01", 2.0, 6).await;
    let sale = seed_sale(&ctx, &pen, 6, 2.0).await;

    let service = SaleReturnService::new(ctx.db.clone());
    let ret = service
        .create(return_payload(&ctx, &rid(&sale.id), vec![return_line(&pen, 4)]))
        .await
        .expect("return created");
    assert_eq!(stock_of(&ctx.db, &pen).await, 4);

    // The returned pens get sold again; deleting the return would now
    // drive stock negative
    let _resale = seed_sale(&ctx, &pen, 3, 2.0).await;
    assert_eq!(stock_of(&ctx.db, &pen).await, 1);

    let err = service
        .delete(&rid(&ret.id))
        .await
        .expect_err("stock cannot cover the reversal");
    assert_eq!(err.code, ErrorCode::InsufficientStock);
    assert_eq!(stock_of(&ctx.db, &pen).await, 1);
    assert!(service.get(&rid(&ret.id)).await.is_ok());
}

#[tokio::test]
async fn bulk_delete_returns_checks_all_ids_first() {
    let ctx = setup().await;
    let pen = seed_product(&ctx.db, "Ballpoint Pen", "PEN-01", 2.0, 20).await;
    let sale = seed_sale(&ctx, &pen, 10, 2.0).await;

    let service = SaleReturnService::new(ctx.db.clone());
    let ret = service
        .create(return_payload(&ctx, &rid(&sale.id), vec![return_line(&pen, 2)]))
        .await
        .expect("return created");
    let before = stock_of(&ctx.db, &pen).await;

    let err = service
        .delete_many(&[rid(&ret.id), "sale_return:missing".into()])
        .await
        .expect_err("one id does not exist");
    assert_eq!(err.code, ErrorCode::ReturnNotFound);
    assert_eq!(stock_of(&ctx.db, &pen).await, before);
    assert!(service.get(&rid(&ret.id)).await.is_ok());

    service
        .delete_many(&[rid(&ret.id)])
        .await
        .expect("bulk delete");
    assert_eq!(stock_of(&ctx.db, &pen).await, before - 2);
}

#[tokio::test]
async fn returns_are_listed_by_original_sale() {
    let ctx = setup().await;
    let pen = seed_product(&ctx.db, "Ballpoint Pen", "PEN-01", 2.0, 20).await;
    let sale = seed_sale(&ctx, &pen, 10, 2.0).await;
    let unrelated = seed_sale(&ctx, &pen, 2, 2.0).await;

    let service = SaleReturnService::new(ctx.db.clone());
    service
        .create(return_payload(&ctx, &rid(&sale.id), vec![return_line(&pen, 1)]))
        .await
        .expect("first return");
    service
        .create(return_payload(&ctx, &rid(&sale.id), vec![return_line(&pen, 2)]))
        .await
        .expect("second return");

    let listed = service.find_by_sale(&rid(&sale.id)).await.expect("listed");
    assert_eq!(listed.len(), 2);

    let listed = service
        .find_by_sale(&rid(&unrelated.id))
        .await
        .expect("listed");
    assert!(listed.is_empty());

    let err = service
        .find_by_sale("sale:missing")
        .await
        .expect_err("unknown sale");
    assert_eq!(err.code, ErrorCode::SaleNotFound);
}
