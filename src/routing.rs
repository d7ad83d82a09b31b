//! Application router configuration for the ledger API.

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;

use crate::{
    AppState,
    balance::get_balance_endpoint,
    endpoints,
    insights::get_insights_endpoint,
    records::delete_records_endpoint,
    withdrawal::{authorize_withdrawal_endpoint, get_withdrawals_endpoint},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::BALANCE, get(get_balance_endpoint))
        .route(endpoints::WITHDRAW, post(authorize_withdrawal_endpoint))
        .route(endpoints::WITHDRAWALS, get(get_withdrawals_endpoint))
        .route(endpoints::DELETE_RECORDS, post(delete_records_endpoint))
        .route(endpoints::INSIGHTS, get(get_insights_endpoint))
        .fallback(get_not_found)
        .with_state(state)
}

async fn get_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "success": false, "message": "Not found" })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};
    use time::macros::date;

    use crate::{
        AppState, build_router,
        category::AccountCategory,
        endpoints,
        test_utils::{insert_income, insert_withdrawal},
    };

    fn new_test_server() -> (TestServer, AppState) {
        let state = AppState::new(Connection::open_in_memory().unwrap()).unwrap();
        let server = TestServer::new(build_router(state.clone()));

        (server, state)
    }

    #[tokio::test]
    async fn balance_route_returns_income_withdrawals_and_balance() {
        let (server, state) = new_test_server();
        {
            let connection = state.db_connection.lock().unwrap();
            insert_income(
                &connection,
                AccountCategory::Offering,
                "OFF-1",
                "500",
                date!(2026 - 08 - 02),
            );
            insert_income(
                &connection,
                AccountCategory::Offering,
                "OFF-2",
                "300",
                date!(2026 - 07 - 05),
            );
            insert_withdrawal(
                &connection,
                "WD-1-1",
                AccountCategory::Offering,
                "100",
                date!(2026 - 08 - 03),
                "Fuel",
            );
        }

        let response = server
            .get(endpoints::BALANCE)
            .add_query_param("account", "offering")
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["income"], json!("800"));
        assert_eq!(body["withdrawals"], json!("100"));
        assert_eq!(body["balance"], json!("700"));
    }

    #[tokio::test]
    async fn balance_route_requires_an_account() {
        let (server, _state) = new_test_server();

        let response = server.get(endpoints::BALANCE).await;

        response.assert_status_bad_request();
        let body = response.json::<Value>();
        assert_eq!(body["message"], json!("Account type required"));
    }

    #[tokio::test]
    async fn balance_route_rejects_unknown_account() {
        let (server, _state) = new_test_server();

        let response = server
            .get(endpoints::BALANCE)
            .add_query_param("account", "donation")
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn withdraw_route_processes_a_valid_request() {
        let (server, state) = new_test_server();
        {
            let connection = state.db_connection.lock().unwrap();
            insert_income(
                &connection,
                AccountCategory::Offering,
                "OFF-1",
                "800",
                date!(2026 - 08 - 02),
            );
        }

        let response = server
            .post(endpoints::WITHDRAW)
            .json(&json!({
                "account_type": "offering",
                "amount": "100",
                "recipient": "Hope Clinic",
                "purpose": "Medical outreach",
                "authorized_by": "Pastor Mensah",
                "date": "2026-08-05",
            }))
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["new_balance"], json!("700"));
        assert!(
            body["transaction_id"]
                .as_str()
                .unwrap()
                .starts_with("WD-")
        );
        assert_eq!(body["data"]["recipient"], json!("Hope Clinic"));
    }

    #[tokio::test]
    async fn withdraw_route_rejects_insufficient_funds_with_available_amount() {
        let (server, state) = new_test_server();
        {
            let connection = state.db_connection.lock().unwrap();
            insert_income(
                &connection,
                AccountCategory::Offering,
                "OFF-1",
                "40",
                date!(2026 - 08 - 02),
            );
        }

        let response = server
            .post(endpoints::WITHDRAW)
            .json(&json!({
                "account_type": "offering",
                "amount": 100,
                "recipient": "Hope Clinic",
                "purpose": "Medical outreach",
                "authorized_by": "Pastor Mensah",
                "date": "2026-08-05",
            }))
            .await;

        response.assert_status_bad_request();
        let body = response.json::<Value>();
        assert_eq!(
            body["message"],
            json!("Insufficient funds. Available: ₵40.00")
        );
    }

    #[tokio::test]
    async fn delete_route_reports_missing_records() {
        let (server, _state) = new_test_server();

        let response = server
            .post(endpoints::DELETE_RECORDS)
            .json(&json!({ "records": [{ "id": "TTH-1", "type": "tithe" }] }))
            .await;

        response.assert_status_not_found();
        let body = response.json::<Value>();
        assert_eq!(
            body["message"],
            json!("One or more records could not be found: TTH-1")
        );
    }

    #[tokio::test]
    async fn delete_route_skips_unrecognized_types() {
        let (server, state) = new_test_server();
        {
            let connection = state.db_connection.lock().unwrap();
            insert_income(
                &connection,
                AccountCategory::Tithe,
                "TTH-1",
                "50",
                date!(2026 - 08 - 02),
            );
        }

        let response = server
            .post(endpoints::DELETE_RECORDS)
            .json(&json!({ "records": [
                { "id": "TTH-1", "type": "tithe" },
                { "id": "DON-1", "type": "donation" },
            ]}))
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["deleted_count"], json!(1));
    }

    #[tokio::test]
    async fn insights_route_returns_an_empty_list_for_an_empty_ledger() {
        let (server, _state) = new_test_server();

        let response = server.get(endpoints::INSIGHTS).await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["count"], json!(0));
        assert_eq!(body["data"], json!([]));
    }

    #[tokio::test]
    async fn unknown_route_returns_a_json_404() {
        let (server, _state) = new_test_server();

        let response = server.get("/api/finance/unknown").await;

        response.assert_status_not_found();
        let body = response.json::<Value>();
        assert_eq!(body["success"], json!(false));
    }
}
