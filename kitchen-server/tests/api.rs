//! Router-level tests: requests go through the full middleware stack
//! against an in-memory database.

use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use kitchen_server::api::build_app;
use kitchen_server::auth::JwtConfig;
use kitchen_server::db::repository::user;
use kitchen_server::{Config, DbService, ServerState};

const ADMIN_EMAIL: &str = "admin@kitchen.test";
const ADMIN_PASSWORD: &str = "admin-pass-123";

fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".into(),
        http_port: 0,
        environment: "test".into(),
        jwt: JwtConfig {
            secret: "test-secret-key-that-is-at-least-32-chars".into(),
            expiration_minutes: 60,
            issuer: "kitchen-server".into(),
            audience: "kitchen-dashboard".into(),
        },
        admin_email: None,
        admin_password: None,
        admin_name: "Administrator".into(),
        static_dir: None,
        request_timeout_ms: 30_000,
        login_delay_ms: 0,
        log_level: "warn".into(),
        log_json: false,
        log_dir: None,
    }
}

struct TestApp {
    app: Router,
    admin_token: String,
}

impl TestApp {
    async fn new() -> Self {
        let db = DbService::in_memory().await.unwrap();
        let state = ServerState::new(test_config(), db);
        user::bootstrap_admin(state.pool(), "Admin", ADMIN_EMAIL, ADMIN_PASSWORD)
            .await
            .unwrap();

        let app = build_app(state);
        let mut test_app = Self {
            app,
            admin_token: String::new(),
        };
        test_app.admin_token = test_app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
        test_app
    }

    async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn admin(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.request(method, uri, Some(&self.admin_token), body).await
    }

    async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["token"].as_str().unwrap().to_string()
    }

    async fn create_item(&self, name: &str, stock: f64, cost: f64) -> i64 {
        let (status, body) = self
            .admin(
                Method::POST,
                "/api/inventory",
                Some(json!({
                    "name": name,
                    "category": "vegetables",
                    "current_stock": stock,
                    "unit": "kg",
                    "min_stock": 2.0,
                    "max_stock": 100.0,
                    "cost_per_unit": cost
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create item failed: {body}");
        body["id"].as_i64().unwrap()
    }

    async fn create_recipe(&self, name: &str, price: f64) -> i64 {
        let (status, body) = self
            .admin(
                Method::POST,
                "/api/recipes",
                Some(json!({
                    "name": name,
                    "category": "mains",
                    "servings": 1,
                    "price": price,
                    "instructions": ["Cook it"]
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create recipe failed: {body}");
        body["id"].as_i64().unwrap()
    }

    async fn create_staff(&self, email: &str, role: &str, rate: f64) -> Value {
        let (status, body) = self
            .admin(
                Method::POST,
                "/api/staff",
                Some(json!({
                    "name": "Sam Cook",
                    "email": email,
                    "password": "staff-pass-123",
                    "role": role,
                    "position": "Line cook",
                    "hourly_rate": rate,
                    "hire_date": "2024-03-01"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create staff failed: {body}");
        body
    }

    async fn move_stock(&self, item_id: i64, body: Value) -> (StatusCode, Value) {
        self.admin(
            Method::POST,
            &format!("/api/inventory/{item_id}/movements"),
            Some(body),
        )
        .await
    }
}

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new().await;

    let (status, body) = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");

    let (status, _) = app.request(Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_missing_token_is_rejected() {
    let app = TestApp::new().await;

    let (status, body) = app.request(Method::GET, "/api/inventory", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1001);

    let (status, _) = app
        .request(Method::GET, "/api/inventory", Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_with_wrong_password_returns_no_token() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": ADMIN_EMAIL, "password": "wrong-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.get("token").is_none());
    assert!(body.get("data").is_none());

    // unknown email looks the same
    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "nobody@kitchen.test", "password": "wrong-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.get("token").is_none());
}

#[tokio::test]
async fn test_login_and_me() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "ADMIN@kitchen.test", "password": ADMIN_PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["user"]["role"], "admin");

    let (status, body) = app.admin(Method::GET, "/api/auth/me", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], ADMIN_EMAIL);
}

#[tokio::test]
async fn test_change_password() {
    let app = TestApp::new().await;

    let (status, _) = app
        .admin(
            Method::POST,
            "/api/auth/change-password",
            Some(json!({ "current_password": "wrong-password", "new_password": "new-pass-456" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .admin(
            Method::POST,
            "/api/auth/change-password",
            Some(json!({ "current_password": ADMIN_PASSWORD, "new_password": "new-pass-456" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    app.login(ADMIN_EMAIL, "new-pass-456").await;
}

#[tokio::test]
async fn test_stock_in_increases_balance_and_records_cost() {
    let app = TestApp::new().await;
    let item_id = app.create_item("Tomatoes", 0.0, 2.5).await;

    let (status, movement) = app
        .move_stock(
            item_id,
            json!({ "movement_type": "in", "quantity": 10.0, "reason": "Supplier delivery", "unit_cost": 3.0 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{movement}");
    assert_eq!(movement["balance_after"], 10.0);
    assert_eq!(movement["total_cost"], 30.0);

    let (_, item) = app
        .admin(Method::GET, &format!("/api/inventory/{item_id}"), None)
        .await;
    assert_eq!(item["current_stock"], 10.0);
    assert_eq!(item["cost_per_unit"], 3.0);
    assert!(item["last_restocked"].is_i64());

    let (_, ledger) = app
        .admin(Method::GET, &format!("/api/inventory/{item_id}/movements"), None)
        .await;
    assert_eq!(ledger.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_stock_out_clamps_at_zero_without_override() {
    let app = TestApp::new().await;
    let item_id = app.create_item("Onions", 10.0, 1.0).await;

    let (status, movement) = app
        .move_stock(
            item_id,
            json!({ "movement_type": "out", "quantity": 4.0, "reason": "Used in recipe" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(movement["balance_after"], 6.0);
    assert_eq!(movement["total_cost"], 0.0);

    let (_, movement) = app
        .move_stock(
            item_id,
            json!({ "movement_type": "out", "quantity": 50.0, "reason": "Spoilage" }),
        )
        .await;
    assert_eq!(movement["balance_after"], 0.0);
    assert_eq!(movement["quantity"], 50.0);
    assert_eq!(movement["applied_quantity"], 6.0);

    let (_, movement) = app
        .move_stock(
            item_id,
            json!({ "movement_type": "out", "quantity": 2.0, "reason": "Inventory adjustment", "allow_negative": true }),
        )
        .await;
    assert_eq!(movement["balance_after"], -2.0);

    let (status, report) = app
        .admin(Method::GET, &format!("/api/inventory/{item_id}/reconcile"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["is_consistent"], true);
    assert_eq!(report["movement_count"], 4);
    assert_eq!(report["total_in"], 10.0);
    assert_eq!(report["total_out"], 12.0);
    assert_eq!(report["drift"], 0.0);
}

#[tokio::test]
async fn test_stock_movement_validation() {
    let app = TestApp::new().await;
    let item_id = app.create_item("Garlic", 1.0, 1.0).await;

    let (status, body) = app
        .move_stock(
            item_id,
            json!({ "movement_type": "in", "quantity": 0.0, "reason": "Nothing" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["errors"].is_object());

    for quantity in [1e12, 1e308] {
        let (status, _) = app
            .move_stock(
                item_id,
                json!({ "movement_type": "in", "quantity": quantity, "reason": "Supplier delivery" }),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{quantity}");
    }
    let (_, item) = app
        .admin(Method::GET, &format!("/api/inventory/{item_id}"), None)
        .await;
    assert_eq!(item["current_stock"], 1.0);

    let (status, _) = app
        .move_stock(
            987_654_321,
            json!({ "movement_type": "in", "quantity": 1.0, "reason": "Supplier delivery" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_order_total_and_items() {
    let app = TestApp::new().await;
    let pasta = app.create_recipe("Pasta", 12.5).await;
    let soup = app.create_recipe("Soup", 4.99).await;

    let (status, order) = app
        .admin(
            Method::POST,
            "/api/orders",
            Some(json!({
                "customer_name": "Alice",
                "items": [
                    { "recipe_id": pasta, "quantity": 3 },
                    { "recipe_id": soup, "quantity": 2 }
                ]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{order}");
    assert_eq!(order["status"], "pending");
    assert_eq!(order["total_amount"], 47.48);
    assert_eq!(order["items"].as_array().unwrap().len(), 2);
    assert!(order["order_number"].as_str().unwrap().starts_with("ORD-"));

    let id = order["id"].as_i64().unwrap();
    let (_, fetched) = app.admin(Method::GET, &format!("/api/orders/{id}"), None).await;
    assert_eq!(fetched["items"].as_array().unwrap().len(), 2);

    let (status, _) = app
        .admin(
            Method::POST,
            "/api/orders",
            Some(json!({
                "customer_name": "Bob",
                "items": [{ "recipe_id": 123_456_789, "quantity": 1 }]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_order_status_transitions() {
    let app = TestApp::new().await;
    let recipe = app.create_recipe("Burger", 9.0).await;

    let (_, order) = app
        .admin(
            Method::POST,
            "/api/orders",
            Some(json!({ "customer_name": "Carol", "items": [{ "recipe_id": recipe, "quantity": 1 }] })),
        )
        .await;
    let id = order["id"].as_i64().unwrap();
    let status_uri = format!("/api/orders/{id}/status");

    let (status, body) = app
        .admin(Method::PATCH, &status_uri, Some(json!({ "status": "cooking" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "cooking");

    let (_, queue) = app.admin(Method::GET, "/api/orders/active", None).await;
    assert_eq!(queue.as_array().unwrap().len(), 1);

    // live orders move freely, backwards included
    let (status, body) = app
        .admin(Method::PATCH, &status_uri, Some(json!({ "status": "pending" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "pending");

    let (status, body) = app
        .admin(Method::PATCH, &status_uri, Some(json!({ "status": "delivered" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["delivered_at"].is_i64());

    // terminal states are locked
    for next in ["cancelled", "cooking"] {
        let (status, body) = app
            .admin(Method::PATCH, &status_uri, Some(json!({ "status": next })))
            .await;
        assert_eq!(status, StatusCode::CONFLICT, "{next}");
        assert_eq!(body["code"], 4003);
    }

    let (_, queue) = app.admin(Method::GET, "/api/orders/active", None).await;
    assert!(queue.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_update_missing_resource_returns_404() {
    let app = TestApp::new().await;

    for uri in [
        "/api/inventory/424242",
        "/api/recipes/424242",
        "/api/suppliers/424242",
        "/api/staff/424242",
        "/api/orders/424242",
    ] {
        let (status, _) = app
            .admin(Method::PUT, uri, Some(json!({ "name": "Renamed" })))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND, "PUT {uri}");
    }
}

#[tokio::test]
async fn test_delete_staff_removes_login_account() {
    let app = TestApp::new().await;
    let staff = app.create_staff("sam@kitchen.test", "kitchen_staff", 15.0).await;
    let staff_id = staff["id"].as_i64().unwrap();

    app.login("sam@kitchen.test", "staff-pass-123").await;

    let (status, _) = app
        .admin(Method::DELETE, &format!("/api/staff/{staff_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .admin(Method::GET, &format!("/api/staff/{staff_id}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "sam@kitchen.test", "password": "staff-pass-123" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // the email is free again
    app.create_staff("sam@kitchen.test", "kitchen_staff", 15.0).await;
}

#[tokio::test]
async fn test_deactivated_user_token_is_rejected() {
    let app = TestApp::new().await;
    let item = app.create_item("Carrots", 10.0, 0.5).await;
    let staff = app.create_staff("sam@kitchen.test", "kitchen_staff", 15.0).await;
    let staff_id = staff["id"].as_i64().unwrap();
    let token = app.login("sam@kitchen.test", "staff-pass-123").await;
    let movement = json!({ "movement_type": "out", "quantity": 1.0, "reason": "Used in production" });
    let movements_uri = format!("/api/inventory/{item}/movements");

    let (status, _) = app
        .request(Method::POST, &movements_uri, Some(&token), Some(movement.clone()))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .admin(
            Method::PUT,
            &format!("/api/staff/{staff_id}"),
            Some(json!({ "is_active": false })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .request(Method::POST, &movements_uri, Some(&token), Some(movement))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1005);

    let (_, ledger) = app.admin(Method::GET, &movements_uri, None).await;
    assert_eq!(ledger.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_deleted_user_token_is_rejected() {
    let app = TestApp::new().await;
    let item = app.create_item("Leeks", 10.0, 0.5).await;
    let staff = app.create_staff("sam@kitchen.test", "kitchen_staff", 15.0).await;
    let staff_id = staff["id"].as_i64().unwrap();
    let token = app.login("sam@kitchen.test", "staff-pass-123").await;

    let (status, _) = app
        .admin(Method::DELETE, &format!("/api/staff/{staff_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .request(
            Method::POST,
            &format!("/api/inventory/{item}/movements"),
            Some(&token),
            Some(json!({ "movement_type": "out", "quantity": 1.0, "reason": "Waste" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1004);

    let (status, _) = app.request(Method::GET, "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_role_change_applies_to_existing_token() {
    let app = TestApp::new().await;
    let staff = app.create_staff("sam@kitchen.test", "kitchen_staff", 15.0).await;
    let staff_id = staff["id"].as_i64().unwrap();
    let token = app.login("sam@kitchen.test", "staff-pass-123").await;

    let (status, _) = app
        .admin(
            Method::PUT,
            &format!("/api/staff/{staff_id}"),
            Some(json!({ "role": "delivery_staff" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let recipe = json!({ "name": "Soup", "category": "starters", "servings": 1, "price": 5.0 });
    let (status, _) = app
        .request(Method::POST, "/api/recipes", Some(&token), Some(recipe))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_delete_staff_with_paid_payroll_is_refused() {
    let app = TestApp::new().await;
    let staff = app.create_staff("pat@kitchen.test", "kitchen_staff", 15.0).await;
    let staff_id = staff["id"].as_i64().unwrap();

    let (_, entry) = app
        .admin(
            Method::POST,
            "/api/payroll",
            Some(json!({
                "staff_id": staff_id,
                "period_start": "2026-01-01",
                "period_end": "2026-01-07",
                "hours_worked": 8.0
            })),
        )
        .await;
    let entry_id = entry["id"].as_i64().unwrap();
    let (status, _) = app
        .admin(Method::POST, &format!("/api/payroll/{entry_id}/pay"), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .admin(Method::DELETE, &format!("/api/staff/{staff_id}"), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 8004);

    let (status, paid) = app
        .admin(Method::GET, &format!("/api/payroll/{entry_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(paid["status"], "paid");
}

#[tokio::test]
async fn test_role_permissions() {
    let app = TestApp::new().await;
    app.create_staff("driver@kitchen.test", "delivery_staff", 12.0).await;
    let driver = app.login("driver@kitchen.test", "staff-pass-123").await;

    let (status, _) = app
        .request(Method::GET, "/api/inventory", Some(&driver), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .request(
            Method::POST,
            "/api/inventory",
            Some(&driver),
            Some(json!({ "name": "Rice", "unit": "kg" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.get("id").is_none());

    let (status, _) = app.request(Method::GET, "/api/staff", Some(&driver), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .request(Method::GET, "/api/reports/dashboard", Some(&driver), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_purchase_order_receipt_books_stock() {
    let app = TestApp::new().await;
    let item_id = app.create_item("Flour", 0.0, 1.0).await;

    let (status, supplier) = app
        .admin(
            Method::POST,
            "/api/suppliers",
            Some(json!({ "name": "Mill & Co", "categories": ["grains"], "rating": 4 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{supplier}");
    let supplier_id = supplier["id"].as_i64().unwrap();

    let (status, po) = app
        .admin(
            Method::POST,
            "/api/purchase-orders",
            Some(json!({
                "supplier_id": supplier_id,
                "lines": [{ "inventory_item_id": item_id, "quantity": 25.0, "unit_cost": 0.8 }],
                "expected_date": "2026-01-15"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{po}");
    assert_eq!(po["status"], "draft");
    assert_eq!(po["total_amount"], 20.0);
    let po_id = po["id"].as_i64().unwrap();
    let po_number = po["po_number"].as_str().unwrap().to_string();

    let (status, received) = app
        .admin(Method::POST, &format!("/api/purchase-orders/{po_id}/receive"), None)
        .await;
    assert_eq!(status, StatusCode::OK, "{received}");
    assert_eq!(received["status"], "received");

    let (_, item) = app
        .admin(Method::GET, &format!("/api/inventory/{item_id}"), None)
        .await;
    assert_eq!(item["current_stock"], 25.0);

    let (_, ledger) = app
        .admin(Method::GET, &format!("/api/inventory/{item_id}/movements"), None)
        .await;
    let ledger = ledger.as_array().unwrap();
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0]["reason"], "Purchase order received");
    assert_eq!(ledger[0]["reference_number"], po_number.as_str());

    let (status, _) = app
        .admin(Method::POST, &format!("/api/purchase-orders/{po_id}/receive"), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .admin(Method::DELETE, &format!("/api/suppliers/{supplier_id}"), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_payroll_net_pay() {
    let app = TestApp::new().await;
    let staff = app.create_staff("pat@kitchen.test", "kitchen_staff", 15.5).await;
    let staff_id = staff["id"].as_i64().unwrap();

    let (status, entry) = app
        .admin(
            Method::POST,
            "/api/payroll",
            Some(json!({
                "staff_id": staff_id,
                "period_start": "2026-01-01",
                "period_end": "2026-01-07",
                "hours_worked": 40.0,
                "bonus": 50.0,
                "deductions": 20.25
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{entry}");
    assert_eq!(entry["hourly_rate"], 15.5);
    assert_eq!(entry["gross_pay"], 620.0);
    assert_eq!(entry["net_pay"], 649.75);
    assert_eq!(entry["status"], "pending");
    let id = entry["id"].as_i64().unwrap();

    let (status, paid) = app
        .admin(Method::POST, &format!("/api/payroll/{id}/pay"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(paid["status"], "paid");

    let (status, _) = app
        .admin(Method::POST, &format!("/api/payroll/{id}/pay"), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .admin(
            Method::POST,
            "/api/payroll",
            Some(json!({
                "staff_id": staff_id,
                "period_start": "2026-02-07",
                "period_end": "2026-02-01",
                "hours_worked": 10.0
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reports() {
    let app = TestApp::new().await;
    app.create_item("Milk", 4.0, 1.25).await;
    app.create_item("Salt", 1.0, 0.5).await;

    let (status, valuation) = app
        .admin(Method::GET, "/api/reports/inventory-valuation", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(valuation["total_value"], 5.5);

    let (status, dashboard) = app.admin(Method::GET, "/api/reports/dashboard", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["total_items"], 2);
    // only Salt is at or below min_stock (2.0)
    assert_eq!(dashboard["low_stock_items"], 1);

    let (status, _) = app
        .admin(Method::GET, "/api/reports/sales?from=2026-02-01&to=2026-01-01", None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, sales) = app.admin(Method::GET, "/api/reports/sales", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sales["total_orders"], 0);
}

#[tokio::test]
async fn test_unknown_api_route_is_json_404() {
    let app = TestApp::new().await;

    let (status, body) = app.admin(Method::GET, "/api/does-not-exist", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].is_string());
}
