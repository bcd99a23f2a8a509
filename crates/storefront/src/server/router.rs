//! Axum router construction.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer, trace::TraceLayer};

use super::handlers::{address, auth, cart, category, health, not_found, order, product};
use super::{middleware, state::AppState};

/// Build the application [`Router`] with all routes and middleware attached.
pub fn build(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .merge(catalog_routes())
        .merge(customer_routes())
        .merge(auth_routes())
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(middleware::MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(middleware::REQUEST_TIMEOUT))
        .layer(CompressionLayer::new())
        .with_state(state)
}

fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/api/public/categories", get(category::list))
        .route("/api/admin/categories", post(category::create))
        .route(
            "/api/admin/categories/:categoryId",
            put(category::update).delete(category::delete),
        )
        .route("/api/admin/categories/:categoryId/product", post(product::add))
        .route("/api/public/products", get(product::list))
        .route(
            "/api/public/categories/:categoryId/products",
            get(product::list_by_category),
        )
        .route("/api/public/products/keyword/:keyword", get(product::search))
        .route("/api/public/products/:productId", get(product::get))
        .route(
            "/api/admin/products/:productId",
            put(product::update).delete(product::delete),
        )
        .route("/api/admin/products/:productId/image", put(product::update_image))
}

fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/api/addresses", post(address::create).get(address::list_all))
        .route(
            "/api/addresses/:addressId",
            get(address::get).put(address::update).delete(address::delete),
        )
        .route("/api/users/addresses", get(address::list_mine))
        .route(
            "/api/carts/products/:productId/quantity/:quantity",
            post(cart::add_product),
        )
        .route("/api/carts", get(cart::list_all))
        .route("/api/carts/users/cart", get(cart::mine))
        .route(
            "/api/cart/products/:productId/quantity/:operation",
            put(cart::update_quantity),
        )
        .route(
            "/api/carts/:cartId/product/:productId",
            axum::routing::delete(cart::remove_product),
        )
        .route("/api/order/users/payments/:paymentMethod", post(order::place))
        .route("/api/orders/users", get(order::mine))
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/signin", post(auth::signin))
        .route("/api/auth/username", get(auth::username))
        .route("/api/auth/user", get(auth::current_user))
        .route("/api/auth/signout", post(auth::signout))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use axum::http::header::AUTHORIZATION;
    use axum::http::{HeaderValue, StatusCode};
    use axum_test::{TestResponse, TestServer};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::BootstrapAdmin;

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let app = build(AppState::default());
        let req = Request::builder()
            .uri("/unknown")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn health_route_exists() {
        let app = build(AppState::default());
        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), 200);
    }

    fn bearer(token: &str) -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer {token}")).unwrap()
    }

    async fn server_with_admin() -> (TestServer, String) {
        let state = AppState::default();
        state
            .services
            .auth
            .ensure_admin(&BootstrapAdmin {
                username: "admin".into(),
                email: "admin@shop.example".into(),
                password: "adminpass".into(),
            })
            .await
            .unwrap();
        let server = TestServer::new(build(state)).unwrap();
        let token = sign_in(&server, "admin", "adminpass").await;
        (server, token)
    }

    async fn sign_in(server: &TestServer, username: &str, password: &str) -> String {
        let resp = server
            .post("/api/auth/signin")
            .json(&json!({ "username": username, "password": password }))
            .await;
        resp.assert_status_ok();
        resp.json::<Value>()["token"].as_str().unwrap().to_owned()
    }

    async fn register(server: &TestServer, username: &str) -> String {
        server
            .post("/api/auth/signup")
            .json(&json!({
                "username": username,
                "email": format!("{username}@shop.example"),
                "password": "secret123",
            }))
            .await
            .assert_status_ok();
        sign_in(server, username, "secret123").await
    }

    fn message(resp: &TestResponse) -> String {
        resp.json::<Value>()["message"].as_str().unwrap_or_default().to_owned()
    }

    #[tokio::test]
    async fn admin_routes_need_admin_token() {
        let (server, _) = server_with_admin().await;
        let body = json!({ "categoryName": "Electronics" });

        let resp = server.post("/api/admin/categories").json(&body).await;
        resp.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(resp.json::<Value>()["success"], false);

        let shopper = register(&server, "shopper").await;
        let resp = server
            .post("/api/admin/categories")
            .add_header(AUTHORIZATION, bearer(&shopper))
            .json(&body)
            .await;
        resp.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn validation_failures_list_fields() {
        let (server, admin) = server_with_admin().await;
        let resp = server
            .post("/api/admin/categories")
            .add_header(AUTHORIZATION, bearer(&admin))
            .json(&json!({ "categoryName": "TV" }))
            .await;
        resp.assert_status(StatusCode::BAD_REQUEST);
        let body = resp.json::<Value>();
        assert!(body["errors"]["categoryName"].is_string());

        let resp = server
            .post("/api/admin/categories")
            .add_header(AUTHORIZATION, bearer(&admin))
            .json(&json!({ "wrong": 1 }))
            .await;
        resp.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn body_refusals_keep_their_status() {
        let (server, admin) = server_with_admin().await;
        let resp = server
            .post("/api/admin/categories")
            .add_header(AUTHORIZATION, bearer(&admin))
            .text("categoryName=Electronics")
            .await;
        resp.assert_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(resp.json::<Value>()["success"], false);
        assert!(resp.json::<Value>().get("errors").is_none());

        let resp = server
            .post("/api/admin/categories")
            .add_header(AUTHORIZATION, bearer(&admin))
            .json(&json!({ "categoryName": "x".repeat(middleware::MAX_BODY_BYTES + 1) }))
            .await;
        resp.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(resp.json::<Value>()["success"], false);
    }

    #[tokio::test]
    async fn bad_paging_is_rejected() {
        let (server, _) = server_with_admin().await;
        let resp = server
            .get("/api/public/categories")
            .add_query_param("sortBy", "colour")
            .await;
        resp.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(message(&resp), "Invalid sort field: colour");

        let resp = server
            .get("/api/public/products")
            .add_query_param("pageSize", "0")
            .await;
        resp.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn shopping_flow_end_to_end() {
        let (server, admin) = server_with_admin().await;

        let resp = server
            .post("/api/admin/categories")
            .add_header(AUTHORIZATION, bearer(&admin))
            .json(&json!({ "categoryName": "Electronics" }))
            .await;
        resp.assert_status(StatusCode::CREATED);
        let category_id = resp.json::<Value>()["categoryId"].as_i64().unwrap();

        let resp = server
            .post(&format!("/api/admin/categories/{category_id}/product"))
            .add_header(AUTHORIZATION, bearer(&admin))
            .json(&json!({
                "productName": "Headphones",
                "description": "Noise cancelling",
                "quantity": 10,
                "price": 200.0,
                "discount": 25.0,
            }))
            .await;
        resp.assert_status(StatusCode::CREATED);
        let product = resp.json::<Value>();
        assert_eq!(product["specialPrice"], 150.0);
        let product_id = product["productId"].as_i64().unwrap();

        let resp = server.get("/api/public/products/keyword/phone").await;
        resp.assert_status_ok();
        assert_eq!(resp.json::<Value>()["totalElements"], 1);

        let shopper = register(&server, "shopper").await;

        let resp = server
            .get("/api/auth/username")
            .add_header(AUTHORIZATION, bearer(&shopper))
            .await;
        assert_eq!(resp.text(), "shopper");

        let resp = server
            .post(&format!("/api/carts/products/{product_id}/quantity/2"))
            .add_header(AUTHORIZATION, bearer(&shopper))
            .await;
        resp.assert_status(StatusCode::CREATED);
        assert_eq!(resp.json::<Value>()["totalPrice"], 300.0);

        let resp = server
            .post("/api/addresses")
            .add_header(AUTHORIZATION, bearer(&shopper))
            .json(&json!({
                "street": "Market Street",
                "buildingName": "Tower One",
                "city": "San Francisco",
                "state": "CA",
                "country": "US",
                "pincode": "94103",
            }))
            .await;
        resp.assert_status(StatusCode::CREATED);
        let address_id = resp.json::<Value>()["addressId"].as_i64().unwrap();

        let resp = server
            .post("/api/order/users/payments/card")
            .add_header(AUTHORIZATION, bearer(&shopper))
            .json(&json!({
                "addressId": address_id,
                "pgName": "Stripe",
                "pgPaymentId": "pi_1",
                "pgStatus": "succeeded",
                "pgResponseMessage": "Payment successful",
            }))
            .await;
        resp.assert_status(StatusCode::CREATED);
        let order = resp.json::<Value>();
        assert_eq!(order["orderStatus"], "Order Accepted !");
        assert_eq!(order["totalAmount"], 300.0);

        let resp = server.get(&format!("/api/public/products/{product_id}")).await;
        assert_eq!(resp.json::<Value>()["quantity"], 8);

        let resp = server
            .get("/api/orders/users")
            .add_header(AUTHORIZATION, bearer(&shopper))
            .await;
        assert_eq!(resp.json::<Value>().as_array().unwrap().len(), 1);

        let resp = server
            .get("/api/carts/users/cart")
            .add_header(AUTHORIZATION, bearer(&shopper))
            .await;
        assert_eq!(resp.json::<Value>()["totalPrice"], 0.0);
    }

    #[tokio::test]
    async fn signed_out_token_is_rejected() {
        let (server, _) = server_with_admin().await;
        let token = register(&server, "shopper").await;

        let resp = server
            .post("/api/auth/signout")
            .add_header(AUTHORIZATION, bearer(&token))
            .await;
        resp.assert_status_ok();
        assert_eq!(message(&resp), "You've been signed out!");

        let resp = server
            .get("/api/auth/user")
            .add_header(AUTHORIZATION, bearer(&token))
            .await;
        resp.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn missing_product_is_404_envelope() {
        let (server, _) = server_with_admin().await;
        let resp = server.get("/api/public/products/41").await;
        resp.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(message(&resp), "Product not found with productId: 41");
    }
}
