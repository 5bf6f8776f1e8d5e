use edu_records::backend::StoreFactory;
use edu_records::config::StoreConfig;
use edu_records::error::AppError;

#[tokio::test]
async fn test_factory_creates_memory_store() {
    let config = StoreConfig {
        store_type: "memory".to_string(),
    };
    let store = StoreFactory::create(&config).unwrap();

    let doc = store
        .insert("Student", serde_json::json!({"first_name": "Jane"}))
        .await
        .unwrap();
    assert!(store.get("Student", &doc.name).await.unwrap().is_some());
}

#[test]
fn test_factory_rejects_unknown_store_type() {
    let config = StoreConfig {
        store_type: "postgresql".to_string(),
    };
    let err = StoreFactory::create(&config).unwrap_err();
    assert!(matches!(err, AppError::Configuration(_)));
}
