//! HTTP API tests
//!
//! The router runs over the in-memory ports; requests carry tokens signed
//! with the test secret.

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use core_kernel::UserId;
use interface_api::auth::create_token;
use interface_api::config::ApiConfig;
use interface_api::{create_router, AppState};
use test_utils::{IdFixtures, MockServiceHarness, ProfileBuilder};

const SECRET: &str = "test-secret";

fn server(harness: MockServiceHarness) -> TestServer {
    let app = create_router(AppState::new(
        harness.service,
        harness.income_service,
        harness.category_service,
        ApiConfig::new(SECRET),
    ));
    TestServer::new(app).unwrap()
}

fn token_for(user: UserId) -> String {
    create_token(user, Some("ana@example.com"), None, SECRET, 300).unwrap()
}

fn token() -> String {
    token_for(IdFixtures::user_id())
}

mod health_tests {
    use super::*;

    #[tokio::test]
    async fn test_health_is_public() {
        let server = server(MockServiceHarness::new());
        let response = server.get("/health").await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["status"], "healthy");
    }

    #[tokio::test]
    async fn test_readiness_reports_unavailable_store() {
        let harness = MockServiceHarness::new();
        harness.expenses.set_unavailable(true);
        let server = server(harness);

        let response = server.get("/health/ready").await;
        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.json::<Value>()["checks"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_readiness_asks_income_store() {
        let harness = MockServiceHarness::new();
        harness.incomes.set_unavailable(true);
        let server = server(harness);

        server
            .get("/health/ready")
            .await
            .assert_status(StatusCode::SERVICE_UNAVAILABLE);
    }
}

mod auth_tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let server = server(MockServiceHarness::new());
        let response = server.get("/api/v1/expenses").await;

        response.assert_status_unauthorized();
        assert_eq!(response.json::<Value>()["error"], "unauthorized");
    }

    #[tokio::test]
    async fn test_token_signed_with_other_secret_is_rejected() {
        let server = server(MockServiceHarness::new());
        let forged = create_token(UserId::new(), None, None, "other", 300).unwrap();

        server
            .get("/api/v1/expenses")
            .authorization_bearer(forged)
            .await
            .assert_status_unauthorized();
    }
}

mod installment_tests {
    use super::*;

    #[tokio::test]
    async fn test_preview_uses_profile_closing_day() {
        let profile = ProfileBuilder::new().with_payment_day(5).with_closing_day(29).build();
        let server = server(MockServiceHarness::seeded(vec![], vec![profile]).await);

        let response = server
            .post("/api/v1/installments/preview")
            .authorization_bearer(token())
            .json(&json!({
                "purchase_date": "2024-11-02",
                "total_amount": "100.00",
                "installment_count": 3
            }))
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        let installments = body["installments"].as_array().unwrap();
        let due: Vec<&str> = installments.iter().map(|i| i["due_date"].as_str().unwrap()).collect();
        let amounts: Vec<&str> = installments.iter().map(|i| i["amount"].as_str().unwrap()).collect();

        assert_eq!(due, ["2024-12-05", "2025-01-05", "2025-02-05"]);
        assert_eq!(amounts, ["33.34", "33.33", "33.33"]);
        assert_eq!(body["currency"], "BRL");
    }

    #[tokio::test]
    async fn test_preview_rejects_zero_count() {
        let server = server(MockServiceHarness::new());

        let response = server
            .post("/api/v1/installments/preview")
            .authorization_bearer(token())
            .json(&json!({
                "purchase_date": "2024-01-15",
                "total_amount": "100.00",
                "installment_count": 0
            }))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.json::<Value>()["field"], "installment_count");
    }

    #[tokio::test]
    async fn test_preview_rejects_bad_date() {
        let server = server(MockServiceHarness::new());

        let response = server
            .post("/api/v1/installments/preview")
            .authorization_bearer(token())
            .json(&json!({
                "purchase_date": "15/01/2024",
                "total_amount": "100.00",
                "installment_count": 2
            }))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.json::<Value>()["field"], "purchase_date");
    }
}

mod expense_tests {
    use super::*;

    async fn create(server: &TestServer, body: Value) -> Value {
        let response = server
            .post("/api/v1/expenses")
            .authorization_bearer(token())
            .json(&body)
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json::<Value>()
    }

    #[tokio::test]
    async fn test_create_list_and_delete_plain_expense() {
        let server = server(MockServiceHarness::new());
        let created = create(
            &server,
            json!({"title": "Coffee", "amount": "7.50", "date": "2024-03-10", "category": "food"}),
        )
        .await;

        assert_eq!(created["payment_method"], "debit");
        assert!(created.get("installments_total").is_none());

        let listed = server
            .get("/api/v1/expenses")
            .authorization_bearer(token())
            .await
            .json::<Value>();
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let id = created["id"].as_str().unwrap();
        let deleted = server
            .delete(&format!("/api/v1/expenses/{}", id))
            .authorization_bearer(token())
            .await
            .json::<Value>();
        assert_eq!(deleted["deleted"], 1);
    }

    #[tokio::test]
    async fn test_credit_card_installments_create_group() {
        let harness = MockServiceHarness::new();
        let store = harness.expenses.clone();
        let server = server(harness);

        let parent = create(
            &server,
            json!({
                "title": "TV",
                "amount": "3000.00",
                "date": "2024-01-15",
                "category": "home",
                "payment_method": "credit_card",
                "installments": 10
            }),
        )
        .await;

        assert_eq!(parent["installment_number"], 1);
        assert_eq!(parent["installments_total"], 10);
        assert_eq!(parent["date"], "2024-02-05");
        assert_eq!(parent["title"], "TV (1/10)");
        assert_eq!(store.count().await, 10);

        let february = server
            .get("/api/v1/expenses")
            .authorization_bearer(token())
            .add_query_param("year", 2024)
            .add_query_param("month", 2)
            .await
            .json::<Value>();
        assert_eq!(february.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_installment_cannot_be_edited() {
        let server = server(MockServiceHarness::new());
        let parent = create(
            &server,
            json!({
                "title": "Phone",
                "amount": "1200.00",
                "date": "2024-01-15",
                "category": "electronics",
                "payment_method": "credit_card",
                "installments": 3
            }),
        )
        .await;

        let response = server
            .put(&format!("/api/v1/expenses/{}", parent["id"].as_str().unwrap()))
            .authorization_bearer(token())
            .json(&json!({"amount": "10.00"}))
            .await;

        response.assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_too_many_installments() {
        let server = server(MockServiceHarness::new());

        let response = server
            .post("/api/v1/expenses")
            .authorization_bearer(token())
            .json(&json!({
                "title": "Car",
                "amount": "50000.00",
                "date": "2024-01-15",
                "category": "transport",
                "payment_method": "credit_card",
                "installments": 60
            }))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.json::<Value>()["field"], "installments");
    }

    #[tokio::test]
    async fn test_amount_wider_than_storage_is_unprocessable() {
        let harness = MockServiceHarness::new();
        let store = harness.expenses.clone();
        let server = server(harness);

        let response = server
            .post("/api/v1/expenses")
            .authorization_bearer(token())
            .json(&json!({
                "title": "Island",
                "amount": "100000000000",
                "date": "2024-01-15",
                "category": "misc"
            }))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.json::<Value>()["field"], "total_amount");
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn test_other_users_expense_is_not_found() {
        let server = server(MockServiceHarness::new());
        let created = create(
            &server,
            json!({"title": "Lunch", "amount": "30.00", "date": "2024-03-10", "category": "food"}),
        )
        .await;

        server
            .get(&format!("/api/v1/expenses/{}", created["id"].as_str().unwrap()))
            .authorization_bearer(token_for(IdFixtures::other_user_id()))
            .await
            .assert_status_not_found();
    }
}

mod income_tests {
    use super::*;

    async fn create(server: &TestServer, body: Value) -> Value {
        let response = server
            .post("/api/v1/incomes")
            .authorization_bearer(token())
            .json(&body)
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json::<Value>()
    }

    #[tokio::test]
    async fn test_create_filter_and_delete() {
        let server = server(MockServiceHarness::new());
        let salary = create(
            &server,
            json!({"title": "Salary", "amount": "5200.00", "date": "2024-03-05", "category": "Salário"}),
        )
        .await;
        create(
            &server,
            json!({"title": "Logo", "amount": "800.00", "date": "2024-04-12", "category": "Freelance"}),
        )
        .await;

        let freelance = server
            .get("/api/v1/incomes")
            .authorization_bearer(token())
            .add_query_param("category", "Freelance")
            .await
            .json::<Value>();
        assert_eq!(freelance.as_array().unwrap().len(), 1);
        assert_eq!(freelance[0]["title"], "Logo");

        let march = server
            .get("/api/v1/incomes")
            .authorization_bearer(token())
            .add_query_param("from", "2024-03-01")
            .add_query_param("to", "2024-03-31")
            .await
            .json::<Value>();
        assert_eq!(march.as_array().unwrap().len(), 1);
        assert_eq!(march[0]["amount"], "5200.00");

        let deleted = server
            .delete(&format!("/api/v1/incomes/{}", salary["id"].as_str().unwrap()))
            .authorization_bearer(token())
            .await
            .json::<Value>();
        assert_eq!(deleted["deleted"], 1);
    }

    #[tokio::test]
    async fn test_empty_description_clears_it() {
        let server = server(MockServiceHarness::new());
        let created = create(
            &server,
            json!({
                "title": "Dividends",
                "amount": "120.00",
                "date": "2024-03-20",
                "category": "Investimentos",
                "description": "quarterly"
            }),
        )
        .await;
        assert_eq!(created["description"], "quarterly");

        let updated = server
            .put(&format!("/api/v1/incomes/{}", created["id"].as_str().unwrap()))
            .authorization_bearer(token())
            .json(&json!({"description": ""}))
            .await
            .json::<Value>();
        assert!(updated.get("description").is_none());
        assert_eq!(updated["amount"], "120.00");
    }

    #[tokio::test]
    async fn test_zero_amount_is_rejected() {
        let harness = MockServiceHarness::new();
        let store = harness.incomes.clone();
        let server = server(harness);

        let response = server
            .post("/api/v1/incomes")
            .authorization_bearer(token())
            .json(&json!({"title": "Gift", "amount": "0", "date": "2024-03-20", "category": "Outros"}))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.json::<Value>()["field"], "amount");
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn test_other_users_income_is_not_found() {
        let server = server(MockServiceHarness::new());
        let created = create(
            &server,
            json!({"title": "Salary", "amount": "5200.00", "date": "2024-03-05", "category": "Salário"}),
        )
        .await;

        server
            .get(&format!("/api/v1/incomes/{}", created["id"].as_str().unwrap()))
            .authorization_bearer(token_for(IdFixtures::other_user_id()))
            .await
            .assert_status_not_found();
    }
}

mod category_tests {
    use super::*;

    #[tokio::test]
    async fn test_seed_runs_once() {
        let server = server(MockServiceHarness::new());

        let first = server
            .post("/api/v1/categories/seed")
            .authorization_bearer(token())
            .await;
        first.assert_status(StatusCode::CREATED);
        assert_eq!(first.json::<Value>().as_array().unwrap().len(), 16);

        let second = server
            .post("/api/v1/categories/seed")
            .authorization_bearer(token())
            .await;
        second.assert_status_ok();
        assert!(second.json::<Value>().as_array().unwrap().is_empty());

        let incomes = server
            .get("/api/v1/categories")
            .authorization_bearer(token())
            .add_query_param("type", "income")
            .await
            .json::<Value>();
        let incomes = incomes.as_array().unwrap();
        assert_eq!(incomes.len(), 8);
        assert!(incomes.iter().all(|c| c["type"] == "income"));
    }

    #[tokio::test]
    async fn test_duplicate_name_conflicts() {
        let server = server(MockServiceHarness::new());
        let body = json!({"name": "Pets", "type": "expense", "color": "#a855f7", "icon": "🐶"});

        server
            .post("/api/v1/categories")
            .authorization_bearer(token())
            .json(&body)
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .post("/api/v1/categories")
            .authorization_bearer(token())
            .json(&body)
            .await;
        response.assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let server = server(MockServiceHarness::new());
        let created = server
            .post("/api/v1/categories")
            .authorization_bearer(token())
            .json(&json!({"name": "Gym", "type": "expense", "color": "#10b981", "icon": "🏋"}))
            .await
            .json::<Value>();
        let path = format!("/api/v1/categories/{}", created["id"].as_str().unwrap());

        let bad = server
            .put(&path)
            .authorization_bearer(token())
            .json(&json!({"color": "green"}))
            .await;
        bad.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(bad.json::<Value>()["field"], "color");

        let renamed = server
            .put(&path)
            .authorization_bearer(token())
            .json(&json!({"name": "Fitness"}))
            .await
            .json::<Value>();
        assert_eq!(renamed["name"], "Fitness");
        assert_eq!(renamed["color"], "#10b981");

        let deleted = server
            .delete(&path)
            .authorization_bearer(token())
            .await
            .json::<Value>();
        assert_eq!(deleted["deleted"], 1);

        server
            .delete(&path)
            .authorization_bearer(token())
            .await
            .assert_status_not_found();
    }
}

mod summary_tests {
    use super::*;

    async fn post(server: &TestServer, path: &str, body: Value) {
        server
            .post(path)
            .authorization_bearer(token())
            .json(&body)
            .await
            .assert_status(StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_overview_balances() {
        let server = server(MockServiceHarness::new());
        post(
            &server,
            "/api/v1/incomes",
            json!({"title": "Salary", "amount": "5000.00", "date": "2024-05-05", "category": "Salário"}),
        )
        .await;
        post(
            &server,
            "/api/v1/incomes",
            json!({"title": "Refund", "amount": "100.00", "date": "2024-04-20", "category": "Outros"}),
        )
        .await;
        for (title, amount, category) in [
            ("Rent", "3000.00", "housing"),
            ("Market", "200.00", "food"),
            ("Dinner", "150.00", "food"),
        ] {
            post(
                &server,
                "/api/v1/expenses",
                json!({"title": title, "amount": amount, "date": "2024-05-10", "category": category}),
            )
            .await;
        }

        let body = server
            .get("/api/v1/summary/overview")
            .authorization_bearer(token())
            .add_query_param("year", 2024)
            .add_query_param("month", 5)
            .await
            .json::<Value>();

        assert_eq!(body["income_total"], "5000.00");
        assert_eq!(body["expense_total"], "3350.00");
        assert_eq!(body["monthly_balance"], "1650.00");
        assert_eq!(body["current_balance"], "1750.00");
        assert_eq!(body["top_expense"]["title"], "Rent");
        assert_eq!(body["top_category"]["category"], "housing");
        assert_eq!(body["currency"], "BRL");

        let incomes = server
            .get("/api/v1/summary/incomes")
            .authorization_bearer(token())
            .add_query_param("year", 2024)
            .add_query_param("month", 4)
            .await
            .json::<Value>();
        assert_eq!(incomes["total"], "100.00");
    }

    #[tokio::test]
    async fn test_empty_month_overview() {
        let server = server(MockServiceHarness::new());
        let body = server
            .get("/api/v1/summary/overview")
            .authorization_bearer(token())
            .add_query_param("year", 2024)
            .add_query_param("month", 1)
            .await
            .json::<Value>();

        let zero = |key: &str| body[key].as_str().unwrap().parse::<f64>().unwrap() == 0.0;
        assert!(zero("expense_total"));
        assert!(zero("current_balance"));
        assert_eq!(body["top_expense"], Value::Null);
        assert_eq!(body["top_category"], Value::Null);
    }

    #[tokio::test]
    async fn test_monthly_total() {
        let server = server(MockServiceHarness::new());
        for (amount, date) in [("10.00", "2024-05-01"), ("15.50", "2024-05-31"), ("99.00", "2024-06-01")] {
            server
                .post("/api/v1/expenses")
                .authorization_bearer(token())
                .json(&json!({"title": "x", "amount": amount, "date": date, "category": "misc"}))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let body = server
            .get("/api/v1/summary/monthly")
            .authorization_bearer(token())
            .add_query_param("year", 2024)
            .add_query_param("month", 5)
            .await
            .json::<Value>();

        assert_eq!(body["total"], "25.50");
        assert_eq!(body["month"], 5);
    }

    #[tokio::test]
    async fn test_invalid_month() {
        let server = server(MockServiceHarness::new());
        let response = server
            .get("/api/v1/summary/monthly")
            .authorization_bearer(token())
            .add_query_param("year", 2024)
            .add_query_param("month", 13)
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.json::<Value>()["field"], "month");
    }
}

mod profile_tests {
    use super::*;

    #[tokio::test]
    async fn test_profile_round_trip() {
        let server = server(MockServiceHarness::new());

        server
            .get("/api/v1/profile")
            .authorization_bearer(token())
            .await
            .assert_status_not_found();

        let saved = server
            .put("/api/v1/profile")
            .authorization_bearer(token())
            .json(&json!({
                "full_name": "Ana Souza",
                "avatar_url": "",
                "invoice_payment_day": 10,
                "invoice_closing_day": 3
            }))
            .await;
        saved.assert_status_ok();

        let body = server
            .get("/api/v1/profile")
            .authorization_bearer(token())
            .await
            .json::<Value>();
        assert_eq!(body["email"], "ana@example.com");
        assert_eq!(body["invoice_payment_day"], 10);
        assert_eq!(body["avatar_url"], Value::Null);
    }

    #[tokio::test]
    async fn test_renaming_keeps_statement_days() {
        let profile = ProfileBuilder::new().with_payment_day(10).with_closing_day(3).build();
        let harness = MockServiceHarness::seeded(vec![], vec![profile]).await;
        let server = server(harness);

        server
            .put("/api/v1/profile")
            .authorization_bearer(token())
            .json(&json!({"full_name": "Ana Maria"}))
            .await
            .assert_status_ok();

        let body = server
            .get("/api/v1/profile")
            .authorization_bearer(token())
            .await
            .json::<Value>();
        assert_eq!(body["full_name"], "Ana Maria");
        assert_eq!(body["invoice_payment_day"], 10);
        assert_eq!(body["invoice_closing_day"], 3);

        let preview = server
            .post("/api/v1/installments/preview")
            .authorization_bearer(token())
            .json(&json!({
                "purchase_date": "2024-06-03",
                "total_amount": "300.00",
                "installment_count": 2
            }))
            .await
            .json::<Value>();
        assert_eq!(preview["installments"][0]["due_date"], "2024-08-10");
    }

    #[tokio::test]
    async fn test_short_name_is_rejected() {
        let server = server(MockServiceHarness::new());
        let response = server
            .put("/api/v1/profile")
            .authorization_bearer(token())
            .json(&json!({"full_name": "Al"}))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.json::<Value>()["field"], "full_name");
    }
}
