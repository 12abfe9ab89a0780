//! REST integration test macro for storage backends.
//!
//! The `rest_api_tests!` macro generates HTTP-level tests:
//! JSON → HTTP request → handler → store → HTTP response → JSON.
//!
//! # Generated Tests
//!
//! ## Companies
//! - `test_company_round_trip`: POST 201, then GET returns the same body
//! - `test_list_companies_shape`: list items carry only `{code, name}`
//! - `test_create_company_missing_field`: 400, nothing persisted
//! - `test_create_company_duplicate`: 409
//! - `test_update_company`: PUT 200 / 404 / 400
//! - `test_delete_company`: 404 when absent, `{status: "deleted"}`, then 404
//!
//! ## Invoices
//! - `test_invoice_round_trip`: detail has `amt`, `paid: false`, embedded company
//! - `test_invoice_unknown_company`: 400, nothing persisted
//! - `test_create_invoice_validation`: 400 on missing / mistyped fields, nothing persisted
//! - `test_invoice_payment_toggle`: `paid_date` set then cleared
//! - `test_update_invoice_validation`: 400 on missing / mistyped fields, 404 when absent
//! - `test_delete_invoice`
//! - `test_company_invoices`
//!
//! ## Envelope
//! - `test_unknown_route`, `test_wrong_method`, `test_malformed_json`
//! - `test_invalid_invoice_id`, `test_out_of_range_invoice_id`, `test_health`

/// Generate a REST integration test suite for a storage backend.
///
/// `$factory` must produce a fresh store implementing
/// `CompanyService + InvoiceService + 'static`.
#[macro_export]
macro_rules! rest_api_tests {
    ($factory:expr) => {
        mod rest_api_tests {
            use super::*;
            use axum::http::StatusCode;
            use axum_test::TestServer;
            use chrono::{DateTime, Utc};
            use serde_json::{Value, json};

            async fn make_server() -> TestServer {
                let store = $factory;
                crate::storage_harness::integration::build_test_server(store)
            }

            async fn post_apple(server: &TestServer) {
                server
                    .post("/companies")
                    .json(&json!({
                        "code": "apple",
                        "name": "Apple Computer",
                        "description": "Maker of OSX."
                    }))
                    .await
                    .assert_status(StatusCode::CREATED);
            }

            async fn post_invoice(server: &TestServer, comp_code: &str, amt: f64) -> i64 {
                let response = server
                    .post("/invoices")
                    .json(&json!({ "comp_code": comp_code, "amt": amt }))
                    .await;
                response.assert_status(StatusCode::CREATED);
                let body: Value = response.json();
                body["invoice"]["id"].as_i64().expect("invoice id")
            }

            fn assert_error(body: &Value, status: u16) {
                assert_eq!(body["error"]["status"], status);
                assert!(body["error"]["message"].is_string());
            }

            // ==============================================================
            // Companies
            // ==============================================================

            #[tokio::test]
            async fn test_company_round_trip() {
                let server = make_server().await;

                let response = server
                    .post("/companies")
                    .json(&json!({
                        "code": "apple",
                        "name": "Apple Computer",
                        "description": "Maker of OSX."
                    }))
                    .await;
                response.assert_status(StatusCode::CREATED);
                let created: Value = response.json();

                let expected = json!({
                    "company": {
                        "code": "apple",
                        "name": "Apple Computer",
                        "description": "Maker of OSX."
                    }
                });
                assert_eq!(created, expected);

                let response = server.get("/companies/apple").await;
                response.assert_status(StatusCode::OK);
                let fetched: Value = response.json();
                assert_eq!(fetched, expected);
            }

            #[tokio::test]
            async fn test_list_companies_shape() {
                let server = make_server().await;
                post_apple(&server).await;

                let body: Value = server.get("/companies").await.json();
                assert_eq!(
                    body,
                    json!({ "companies": [{ "code": "apple", "name": "Apple Computer" }] })
                );
            }

            #[tokio::test]
            async fn test_create_company_missing_field() {
                let server = make_server().await;

                let response = server
                    .post("/companies")
                    .json(&json!({ "code": "apple", "name": "Apple Computer" }))
                    .await;
                response.assert_status(StatusCode::BAD_REQUEST);
                let body: Value = response.json();
                assert_error(&body, 400);
                assert_eq!(body["error"]["message"], "Missing required field: description");

                server
                    .get("/companies/apple")
                    .await
                    .assert_status(StatusCode::NOT_FOUND);
            }

            #[tokio::test]
            async fn test_create_company_duplicate() {
                let server = make_server().await;
                post_apple(&server).await;

                let response = server
                    .post("/companies")
                    .json(&json!({
                        "code": "apple",
                        "name": "Another Apple",
                        "description": "Again."
                    }))
                    .await;
                response.assert_status(StatusCode::CONFLICT);
                assert_error(&response.json::<Value>(), 409);
            }

            #[tokio::test]
            async fn test_update_company() {
                let server = make_server().await;
                post_apple(&server).await;

                let response = server
                    .put("/companies/apple")
                    .json(&json!({ "name": "Apple Inc.", "description": "Maker of macOS." }))
                    .await;
                response.assert_status(StatusCode::OK);
                let body: Value = response.json();
                assert_eq!(body["company"]["code"], "apple");
                assert_eq!(body["company"]["name"], "Apple Inc.");
                assert_eq!(body["company"]["description"], "Maker of macOS.");

                server
                    .put("/companies/nope")
                    .json(&json!({ "name": "Nope", "description": "Nothing." }))
                    .await
                    .assert_status(StatusCode::NOT_FOUND);

                server
                    .put("/companies/apple")
                    .json(&json!({ "name": "Apple Inc." }))
                    .await
                    .assert_status(StatusCode::BAD_REQUEST);
            }

            #[tokio::test]
            async fn test_delete_company() {
                let server = make_server().await;

                let response = server.delete("/companies/apple").await;
                response.assert_status(StatusCode::NOT_FOUND);
                assert_error(&response.json::<Value>(), 404);

                post_apple(&server).await;
                let response = server.delete("/companies/apple").await;
                response.assert_status(StatusCode::OK);
                assert_eq!(response.json::<Value>(), json!({ "status": "deleted" }));

                server
                    .get("/companies/apple")
                    .await
                    .assert_status(StatusCode::NOT_FOUND);
            }

            // ==============================================================
            // Invoices
            // ==============================================================

            #[tokio::test]
            async fn test_invoice_round_trip() {
                let server = make_server().await;
                post_apple(&server).await;

                let response = server
                    .post("/invoices")
                    .json(&json!({ "comp_code": "apple", "amt": 100 }))
                    .await;
                response.assert_status(StatusCode::CREATED);
                let created: Value = response.json();
                let invoice = &created["invoice"];
                assert_eq!(invoice["comp_code"], "apple");
                assert_eq!(invoice["paid"], false);
                assert!(invoice["paid_date"].is_null());
                assert!(invoice["add_date"].is_string());
                let id = invoice["id"].as_i64().unwrap();

                let response = server.get(&format!("/invoices/{}", id)).await;
                response.assert_status(StatusCode::OK);
                let body: Value = response.json();
                let detail = &body["invoice"];
                assert_eq!(detail["id"], id);
                assert_eq!(detail["amt"].as_f64(), Some(100.0));
                assert_eq!(detail["paid"], false);
                assert!(detail["paid_date"].is_null());
                assert!(detail.get("comp_code").is_none());
                assert_eq!(
                    detail["company"],
                    json!({
                        "code": "apple",
                        "name": "Apple Computer",
                        "description": "Maker of OSX."
                    })
                );

                let listed: Value = server.get("/invoices").await.json();
                assert_eq!(listed, json!({ "invoices": [{ "id": id, "comp_code": "apple" }] }));
            }

            #[tokio::test]
            async fn test_invoice_unknown_company() {
                let server = make_server().await;

                let response = server
                    .post("/invoices")
                    .json(&json!({ "comp_code": "nope", "amt": 100 }))
                    .await;
                response.assert_status(StatusCode::BAD_REQUEST);
                assert_error(&response.json::<Value>(), 400);

                let listed: Value = server.get("/invoices").await.json();
                assert_eq!(listed, json!({ "invoices": [] }));
            }

            #[tokio::test]
            async fn test_create_invoice_validation() {
                let server = make_server().await;
                post_apple(&server).await;

                for body in [
                    json!({ "amt": 100 }),
                    json!({ "comp_code": "apple" }),
                    json!({ "comp_code": "apple", "amt": "100" }),
                    json!({ "comp_code": "", "amt": 100 }),
                ] {
                    let response = server.post("/invoices").json(&body).await;
                    response.assert_status(StatusCode::BAD_REQUEST);
                    assert_error(&response.json::<Value>(), 400);
                }

                let listed: Value = server.get("/invoices").await.json();
                assert_eq!(listed, json!({ "invoices": [] }));
            }

            #[tokio::test]
            async fn test_invoice_payment_toggle() {
                let server = make_server().await;
                post_apple(&server).await;
                let id = post_invoice(&server, "apple", 100.0).await;
                let path = format!("/invoices/{}", id);

                let before = Utc::now();
                let response = server
                    .put(&path)
                    .json(&json!({ "amt": 100, "paid": true }))
                    .await;
                let after = Utc::now();
                response.assert_status(StatusCode::OK);
                let body: Value = response.json();
                assert_eq!(body["invoice"]["paid"], true);
                let stamp: DateTime<Utc> = body["invoice"]["paid_date"]
                    .as_str()
                    .expect("paid_date set")
                    .parse()
                    .unwrap();
                assert!(within(stamp, before, after));

                let response = server
                    .put(&path)
                    .json(&json!({ "amt": 100, "paid": false }))
                    .await;
                response.assert_status(StatusCode::OK);
                let body: Value = response.json();
                assert_eq!(body["invoice"]["paid"], false);
                assert!(body["invoice"]["paid_date"].is_null());

                let detail: Value = server.get(&path).await.json();
                assert!(detail["invoice"]["paid_date"].is_null());
            }

            #[tokio::test]
            async fn test_update_invoice_validation() {
                let server = make_server().await;
                post_apple(&server).await;
                let id = post_invoice(&server, "apple", 100.0).await;
                let path = format!("/invoices/{}", id);

                server
                    .put(&path)
                    .json(&json!({ "amt": 100 }))
                    .await
                    .assert_status(StatusCode::BAD_REQUEST);
                server
                    .put(&path)
                    .json(&json!({ "amt": 100, "paid": "yes" }))
                    .await
                    .assert_status(StatusCode::BAD_REQUEST);
                server
                    .put(&path)
                    .json(&json!({ "amt": "100", "paid": true }))
                    .await
                    .assert_status(StatusCode::BAD_REQUEST);
                server
                    .put("/invoices/999999")
                    .json(&json!({ "amt": 100, "paid": true }))
                    .await
                    .assert_status(StatusCode::NOT_FOUND);

                // Rejected updates left the invoice untouched
                let detail: Value = server.get(&path).await.json();
                assert_eq!(detail["invoice"]["paid"], false);
            }

            #[tokio::test]
            async fn test_delete_invoice() {
                let server = make_server().await;
                post_apple(&server).await;
                let id = post_invoice(&server, "apple", 100.0).await;
                let path = format!("/invoices/{}", id);

                let response = server.delete(&path).await;
                response.assert_status(StatusCode::OK);
                assert_eq!(response.json::<Value>(), json!({ "status": "deleted" }));

                server.delete(&path).await.assert_status(StatusCode::NOT_FOUND);
                server.get(&path).await.assert_status(StatusCode::NOT_FOUND);
            }

            #[tokio::test]
            async fn test_company_invoices() {
                let server = make_server().await;
                server
                    .get("/companies/apple/invoices")
                    .await
                    .assert_status(StatusCode::NOT_FOUND);

                post_apple(&server).await;
                let id = post_invoice(&server, "apple", 42.0).await;

                let body: Value = server.get("/companies/apple/invoices").await.json();
                let invoices = body["invoices"].as_array().expect("invoices array");
                assert_eq!(invoices.len(), 1);
                assert_eq!(invoices[0]["id"], id);
                assert_eq!(invoices[0]["amt"].as_f64(), Some(42.0));
                assert!(invoices[0].get("comp_code").is_none());
            }

            // ==============================================================
            // Envelope
            // ==============================================================

            #[tokio::test]
            async fn test_unknown_route() {
                let server = make_server().await;
                let response = server.get("/nowhere").await;
                response.assert_status(StatusCode::NOT_FOUND);
                assert_error(&response.json::<Value>(), 404);
            }

            #[tokio::test]
            async fn test_malformed_json() {
                let server = make_server().await;
                let response = server
                    .post("/companies")
                    .text("{\"code\": ")
                    .content_type("application/json")
                    .await;
                response.assert_status(StatusCode::BAD_REQUEST);
                assert_error(&response.json::<Value>(), 400);
            }

            #[tokio::test]
            async fn test_invalid_invoice_id() {
                let server = make_server().await;
                let response = server.get("/invoices/abc").await;
                response.assert_status(StatusCode::BAD_REQUEST);
                assert_error(&response.json::<Value>(), 400);
            }

            #[tokio::test]
            async fn test_out_of_range_invoice_id() {
                let server = make_server().await;
                let response = server.get("/invoices/99999999999").await;
                response.assert_status(StatusCode::NOT_FOUND);
                let body: Value = response.json();
                assert_error(&body, 404);
                assert_eq!(body["error"]["code"], "NOT_FOUND");

                server
                    .put("/invoices/99999999999")
                    .json(&json!({ "amt": 100, "paid": true }))
                    .await
                    .assert_status(StatusCode::NOT_FOUND);
            }

            #[tokio::test]
            async fn test_wrong_method() {
                let server = make_server().await;
                let response = server.patch("/companies").await;
                response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
                let body: Value = response.json();
                assert_error(&body, 405);
                assert_eq!(body["error"]["code"], "METHOD_NOT_ALLOWED");

                server
                    .post("/invoices/1")
                    .json(&json!({}))
                    .await
                    .assert_status(StatusCode::METHOD_NOT_ALLOWED);
            }

            #[tokio::test]
            async fn test_health() {
                let server = make_server().await;
                let body: Value = server.get("/health").await.json();
                assert_eq!(body["status"], "ok");
            }
        }
    };
}
