//! Request boundary tests: guards and commit/rollback around handlers.

mod support;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use data_access::{
    execute_in_transaction, invoke, AppError, ExtraParams, HandlerOptions, RecordRepository,
};

use support::{audited_products, new_tx, product, setup_db, ProductFilter};

#[derive(Debug, Validate)]
struct NewProduct {
    #[validate(length(min = 1, message = "name is required"))]
    name: String,
    #[validate(range(min = 1, message = "price must be positive"))]
    price: i64,
}

#[tokio::test]
async fn test_successful_work_is_committed() {
    let db = setup_db().await;
    let tx = new_tx(&db);
    let store = Arc::new(audited_products(&tx, Uuid::new_v4()));

    let handler_store = store.clone();
    let saved = execute_in_transaction(&tx, move || async move {
        handler_store
            .save(product("Lamp", 40), &ExtraParams::new())
            .await
    })
    .await
    .unwrap();

    assert!(!tx.is_active().await);

    tx.begin().await.unwrap();
    assert_eq!(store.get(saved.id, None).await.unwrap().name, "Lamp");
    tx.rollback().await.unwrap();
}

#[tokio::test]
async fn test_failed_work_is_rolled_back_with_original_error() {
    let db = setup_db().await;
    let tx = new_tx(&db);
    let store = Arc::new(audited_products(&tx, Uuid::new_v4()));

    let handler_store = store.clone();
    let result = execute_in_transaction(&tx, move || async move {
        handler_store
            .save(product("Lamp", 40), &ExtraParams::new())
            .await?;
        handler_store
            .get_unique(Some(&ProductFilter::named("Ghost")), None)
            .await
    })
    .await;

    assert!(matches!(result, Err(AppError::NoMatch(_))));
    assert!(!tx.is_active().await);

    tx.begin().await.unwrap();
    assert_eq!(store.count(None).await.unwrap(), 0);
    tx.rollback().await.unwrap();
}

#[tokio::test]
async fn test_begin_failure_skips_work() {
    let db = setup_db().await;
    let tx = new_tx(&db);
    let ran = Arc::new(AtomicBool::new(false));
    tx.begin().await.unwrap();

    let flag = ran.clone();
    let result = execute_in_transaction(&tx, move || async move {
        flag.store(true, Ordering::SeqCst);
        Ok(())
    })
    .await;

    assert!(matches!(result, Err(AppError::TransactionAlreadyStarted)));
    assert!(!ran.load(Ordering::SeqCst));
    assert!(tx.is_active().await);
    tx.rollback().await.unwrap();
}

#[tokio::test]
async fn test_invoke_runs_valid_input_in_transaction() {
    let db = setup_db().await;
    let tx = new_tx(&db);
    let store = Arc::new(audited_products(&tx, Uuid::new_v4()));

    let input = NewProduct {
        name: "Lamp".to_string(),
        price: 40,
    };
    let handler_store = store.clone();
    let saved = invoke(&tx, HandlerOptions::default(), input, move |input| async move {
        handler_store
            .save(product(&input.name, input.price), &ExtraParams::new())
            .await
    })
    .await
    .unwrap();

    assert_eq!(saved.price, 40);
    assert!(!tx.is_active().await);
}

#[tokio::test]
async fn test_invoke_rejects_non_invokable_handler() {
    let db = setup_db().await;
    let tx = new_tx(&db);
    let ran = Arc::new(AtomicBool::new(false));

    let input = NewProduct {
        name: String::new(),
        price: 0,
    };
    let flag = ran.clone();
    let result = invoke(&tx, HandlerOptions::non_invokable(), input, move |_| async move {
        flag.store(true, Ordering::SeqCst);
        Ok(())
    })
    .await;

    // Checked before validation, so the invalid input is never reported
    assert!(matches!(result, Err(AppError::NotInvokable)));
    assert!(!ran.load(Ordering::SeqCst));
    assert!(!tx.is_active().await);
}

#[tokio::test]
async fn test_invoke_rejects_invalid_input() {
    let db = setup_db().await;
    let tx = new_tx(&db);
    let ran = Arc::new(AtomicBool::new(false));

    let input = NewProduct {
        name: String::new(),
        price: 0,
    };
    let flag = ran.clone();
    let result = invoke(&tx, HandlerOptions::default(), input, move |_| async move {
        flag.store(true, Ordering::SeqCst);
        Ok(())
    })
    .await;

    match result {
        Err(err @ AppError::ValidationFailed(_)) => {
            assert_eq!(err.to_string(), "name is required\nprice must be positive");
        }
        other => panic!("Expected ValidationFailed, got {:?}", other),
    }
    assert!(!ran.load(Ordering::SeqCst));
    assert!(!tx.is_active().await);
}
