use axum::http::StatusCode;
use axum_test::TestServer;
use product_catalog::app::products::model::{CreateProductRequest, UpdateProductRequest};
use product_catalog::app::products::service::ProductService;
use product_catalog::core::error::ErrorResponse;
use product_catalog::{build_router, AppState, Config};
use serde_json::{json, Value};
use std::collections::BTreeMap;

fn create_test_server() -> TestServer {
    create_test_server_with(Config::default())
}

fn create_test_server_with(config: Config) -> TestServer {
    let state = AppState::new(&config);
    TestServer::new(build_router(state, &config)).unwrap()
}

async fn create_product(server: &TestServer, body: Value) -> Value {
    let response = server.post("/products").json(&body).await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

fn names(products: &[Value]) -> Vec<&str> {
    products
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_widget_lifecycle() {
    let server = create_test_server();

    let created = create_product(&server, json!({"name": "Widget", "category": "tools"})).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());
    assert_eq!(created["name"], "Widget");
    assert_eq!(created["category"], "tools");

    let response = server
        .get("/products/search")
        .add_query_param("name", "wid")
        .await;
    response.assert_status_ok();
    let results: Vec<Value> = response.json();
    assert_eq!(results, vec![created.clone()]);

    let response = server.get("/products/stats/category").await;
    response.assert_status_ok();
    let stats: BTreeMap<String, usize> = response.json();
    assert_eq!(stats, BTreeMap::from([("tools".to_string(), 1)]));

    let response = server.delete(&format!("/products/{}", id)).await;
    response.assert_status(StatusCode::NO_CONTENT);
    assert!(response.text().is_empty());

    let response = server.get(&format!("/products/{}", id)).await;
    response.assert_status(StatusCode::NOT_FOUND);
    let error: ErrorResponse = response.json();
    assert_eq!(error.error, "NOT_FOUND");
    assert_eq!(error.message, "Product not found");
    assert_eq!(error.code, 404);
}

#[tokio::test]
async fn test_create_then_get_returns_same_product() {
    let server = create_test_server();

    let created = create_product(
        &server,
        json!({"name": "Lamp", "category": "home", "price": 19.99, "tags": ["desk"]}),
    )
    .await;
    assert_eq!(created["price"], json!(19.99));
    assert_eq!(created["tags"], json!(["desk"]));

    let response = server
        .get(&format!("/products/{}", created["id"].as_str().unwrap()))
        .await;
    response.assert_status_ok();
    let fetched: Value = response.json();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_create_ignores_client_id() {
    let server = create_test_server();

    let created = create_product(
        &server,
        json!({"id": "mine", "name": "Lamp", "category": "home"}),
    )
    .await;
    assert_ne!(created["id"], "mine");
    assert!(uuid::Uuid::parse_str(created["id"].as_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_created_ids_are_unique() {
    let server = create_test_server();

    let a = create_product(&server, json!({"name": "Same", "category": "x"})).await;
    let b = create_product(&server, json!({"name": "Same", "category": "x"})).await;
    assert_ne!(a["id"], b["id"]);
}

#[tokio::test]
async fn test_update_merges_fields_and_keeps_id() {
    let server = create_test_server();

    let created = create_product(
        &server,
        json!({"name": "Lamp", "category": "home", "color": "white"}),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let response = server
        .put(&format!("/products/{}", id))
        .json(&json!({"id": "hijack", "color": "black", "stock": 4}))
        .await;
    response.assert_status_ok();
    let updated: Value = response.json();
    assert_eq!(updated["id"], id);
    assert_eq!(updated["name"], "Lamp");
    assert_eq!(updated["color"], "black");
    assert_eq!(updated["stock"], 4);

    let fetched: Value = server.get(&format!("/products/{}", id)).await.json();
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn test_missing_products_are_not_found() {
    let server = create_test_server();
    let missing = uuid::Uuid::new_v4();

    server
        .get(&format!("/products/{}", missing))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .put(&format!("/products/{}", missing))
        .json(&json!({"name": "x"}))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .delete(&format!("/products/{}", missing))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .get("/products/not-a-uuid")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_filters_by_category_in_insertion_order() {
    let server = create_test_server();

    for (name, category) in [("a", "tools"), ("b", "toys"), ("c", "tools"), ("d", "Tools")] {
        create_product(&server, json!({"name": name, "category": category})).await;
    }

    let response = server
        .get("/products")
        .add_query_param("category", "tools")
        .await;
    response.assert_status_ok();
    let products: Vec<Value> = response.json();
    assert_eq!(names(&products), ["a", "c"]);

    let all: Vec<Value> = server.get("/products").await.json();
    assert_eq!(names(&all), ["a", "b", "c", "d"]);
}

#[tokio::test]
async fn test_list_empty_category_is_no_filter() {
    let server = create_test_server();

    create_product(&server, json!({"name": "a", "category": "x"})).await;
    create_product(&server, json!({"name": "b", "category": "y"})).await;

    let response = server
        .get("/products")
        .add_query_param("category", "")
        .await;
    response.assert_status_ok();
    let products: Vec<Value> = response.json();
    assert_eq!(names(&products), ["a", "b"]);
}

#[tokio::test]
async fn test_list_pagination() {
    let server = create_test_server();

    for name in ["first", "second", "third"] {
        create_product(&server, json!({"name": name, "category": "x"})).await;
    }

    let response = server
        .get("/products")
        .add_query_param("page", 2)
        .add_query_param("limit", 1)
        .await;
    response.assert_status_ok();
    let products: Vec<Value> = response.json();
    assert_eq!(names(&products), ["second"]);

    let past_end: Vec<Value> = server
        .get("/products")
        .add_query_param("page", 5)
        .await
        .json();
    assert!(past_end.is_empty());
}

#[tokio::test]
async fn test_list_default_limit_and_clamp() {
    let mut config = Config::default();
    config.pagination.default_limit = 2;
    config.pagination.max_limit = 3;
    let server = create_test_server_with(config);

    for i in 0..5 {
        create_product(&server, json!({"name": format!("p{}", i), "category": "x"})).await;
    }

    let default_page: Vec<Value> = server.get("/products").await.json();
    assert_eq!(default_page.len(), 2);

    let clamped: Vec<Value> = server
        .get("/products")
        .add_query_param("limit", 50)
        .await
        .json();
    assert_eq!(clamped.len(), 3);
}

#[tokio::test]
async fn test_list_rejects_invalid_pagination() {
    let server = create_test_server();

    for (key, value) in [("page", "0"), ("limit", "0"), ("page", "abc"), ("limit", "-1")] {
        let response = server.get("/products").add_query_param(key, value).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let error: ErrorResponse = response.json();
        assert_eq!(error.error, "BAD_REQUEST");
    }
}

#[tokio::test]
async fn test_search_requires_name() {
    let server = create_test_server();

    server
        .get("/products/search")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_is_case_insensitive() {
    let server = create_test_server();

    for name in ["Blue Widget", "Gadget", "WIDGET XL"] {
        create_product(&server, json!({"name": name, "category": "x"})).await;
    }

    let results: Vec<Value> = server
        .get("/products/search")
        .add_query_param("name", "widget")
        .await
        .json();
    assert_eq!(names(&results), ["Blue Widget", "WIDGET XL"]);
}

#[tokio::test]
async fn test_category_stats() {
    let server = create_test_server();

    let empty: BTreeMap<String, usize> = server.get("/products/stats/category").await.json();
    assert!(empty.is_empty());

    for category in ["a", "a", "b"] {
        create_product(&server, json!({"name": "p", "category": category})).await;
    }

    let stats: BTreeMap<String, usize> = server.get("/products/stats/category").await.json();
    assert_eq!(
        stats,
        BTreeMap::from([("a".to_string(), 2), ("b".to_string(), 1)])
    );
}

#[tokio::test]
async fn test_create_validation() {
    let server = create_test_server();

    let response = server
        .post("/products")
        .json(&json!({"name": "", "category": "tools"}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let error: ErrorResponse = response.json();
    assert_eq!(error.error, "VALIDATION_ERROR");
    assert_eq!(error.message, "name must not be empty");

    server
        .post("/products")
        .json(&json!({"category": "tools"}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    server
        .post("/products")
        .json(&json!(["not", "an", "object"]))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let products: Vec<Value> = server.get("/products").await.json();
    assert!(products.is_empty());
}

#[tokio::test]
async fn test_update_validation() {
    let server = create_test_server();

    let created = create_product(&server, json!({"name": "Lamp", "category": "home"})).await;
    let id = created["id"].as_str().unwrap();

    server
        .put(&format!("/products/{}", id))
        .json(&json!({"category": ""}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let fetched: Value = server.get(&format!("/products/{}", id)).await.json();
    assert_eq!(fetched["category"], "home");
}

#[tokio::test]
async fn test_update_rejects_null_required_fields() {
    let server = create_test_server();

    let created = create_product(&server, json!({"name": "Lamp", "category": "home"})).await;
    let id = created["id"].as_str().unwrap();

    for body in [json!({"name": null}), json!({"category": null, "color": "red"})] {
        let response = server.put(&format!("/products/{}", id)).json(&body).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let error: ErrorResponse = response.json();
        assert_eq!(error.error, "VALIDATION_ERROR");
    }

    let fetched: Value = server.get(&format!("/products/{}", id)).await.json();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    create_product(&server, json!({"name": "Lamp", "category": "home"})).await;

    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["products"], 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_mutations_stay_consistent() {
    const TASKS: usize = 8;
    const PER_TASK: usize = 50;

    let service = ProductService::new();

    let handles: Vec<_> = (0..TASKS)
        .map(|task| {
            let service = service.clone();
            tokio::spawn(async move {
                let category = format!("c{}", task % 2);
                let mut kept = Vec::new();
                for i in 0..PER_TASK {
                    let product = service.create_product(CreateProductRequest {
                        name: format!("t{}-{}", task, i),
                        category: category.clone(),
                        attributes: Default::default(),
                    });
                    let id = product.id.to_string();
                    if i % 2 == 0 {
                        service.delete_product(&id).unwrap();
                        assert!(service.get_product(&id).is_err());
                    } else {
                        let patch: UpdateProductRequest =
                            serde_json::from_value(json!({"seq": i})).unwrap();
                        let updated = service.update_product(&id, patch).unwrap();
                        assert_eq!(updated.id, product.id);
                        kept.push(id);
                    }
                    tokio::task::yield_now().await;
                }
                kept
            })
        })
        .collect();

    let mut kept = Vec::new();
    for handle in handles {
        kept.extend(handle.await.unwrap());
    }

    let expected = TASKS * PER_TASK / 2;
    assert_eq!(kept.len(), expected);
    assert_eq!(service.count(), expected);

    let stats = service.category_stats();
    assert_eq!(stats.values().sum::<usize>(), expected);
    assert_eq!(stats["c0"], expected / 2);
    assert_eq!(stats["c1"], expected / 2);

    for id in &kept {
        let product = service.get_product(id).unwrap();
        assert!(product.attributes.contains_key("seq"));
    }
}
