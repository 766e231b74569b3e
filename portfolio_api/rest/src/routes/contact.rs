use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use portfolio_core_contact_contracts::ContactFeatureService;
use portfolio_models::contact::{ContactMessage, ContactMessageDraft};
use tracing::{debug, error};

use crate::{
    errors::{self, FAILED_TO_SEND_EMAIL, INVALID_REQUEST_BODY},
    models::contact::ApiContactResponse,
};

pub fn router(service: Arc<impl ContactFeatureService>) -> Router<()> {
    Router::new()
        .route("/api/contact", routing::post(send_message))
        .with_state(service)
}

async fn send_message(
    service: State<Arc<impl ContactFeatureService>>,
    body: Result<Json<ContactMessageDraft>, JsonRejection>,
) -> Response {
    let draft = match body {
        Ok(Json(draft)) => draft,
        Err(err) => {
            debug!("Invalid request body: {err}");
            return errors::error(StatusCode::BAD_REQUEST, INVALID_REQUEST_BODY);
        }
    };

    let message = match ContactMessage::try_from(draft) {
        Ok(message) => message,
        Err(err) => {
            debug!("Invalid contact message: {err}");
            return errors::error(StatusCode::BAD_REQUEST, err.to_string());
        }
    };

    match service.send_message(message).await {
        Ok(()) => Json(ApiContactResponse {
            message: "Email sent successfully",
        })
        .into_response(),
        Err(err) => {
            error!("Failed to send email: {err:#}");
            errors::error(StatusCode::INTERNAL_SERVER_ERROR, FAILED_TO_SEND_EMAIL)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use portfolio_core_contact_contracts::{ContactSendMessageError, MockContactFeatureService};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    use super::*;

    fn message() -> ContactMessage {
        ContactMessageDraft {
            name: "Jane Doe".into(),
            email: "jane@example.com".into(),
            subject: "Hello".into(),
            message: "Hi there".into(),
        }
        .try_into()
        .unwrap()
    }

    fn valid_body() -> Value {
        json!({
            "name": "Jane Doe",
            "email": "jane@example.com",
            "subject": "Hello",
            "message": "Hi there",
        })
    }

    async fn post(addr: SocketAddr, body: reqwest::Body) -> (u16, Value) {
        let response = reqwest::Client::new()
            .post(format!("http://{addr}/api/contact"))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .unwrap();
        let status = response.status().as_u16();
        (status, response.json().await.unwrap())
    }

    #[tokio::test]
    async fn ok() {
        // Arrange
        let service = MockContactFeatureService::new().with_send_message(message(), Ok(()));
        let addr = crate::tests::spawn(router(service.into())).await;

        // Act
        let result = post(addr, valid_body().to_string().into()).await;

        // Assert
        assert_eq!(result, (200, json!({"message": "Email sent successfully"})));
    }

    #[tokio::test]
    async fn missing_fields() {
        let addr = crate::tests::spawn(router(MockContactFeatureService::new().into())).await;

        for field in ["name", "email", "subject", "message"] {
            for value in [Value::Null, json!("")] {
                let mut body = valid_body();
                body[field] = value;
                let result = post(addr, body.to_string().into()).await;
                assert_eq!(result, (400, json!({"error": "All fields are required"})));
            }

            let mut body = valid_body();
            body.as_object_mut().unwrap().remove(field);
            let result = post(addr, body.to_string().into()).await;
            assert_eq!(result, (400, json!({"error": "All fields are required"})));
        }
    }

    #[tokio::test]
    async fn missing_field_wins_over_invalid_email() {
        let addr = crate::tests::spawn(router(MockContactFeatureService::new().into())).await;

        let body = json!({"name": "", "email": "not-an-email", "subject": "Hello", "message": "Hi"});
        let result = post(addr, body.to_string().into()).await;

        assert_eq!(result, (400, json!({"error": "All fields are required"})));
    }

    #[tokio::test]
    async fn invalid_email() {
        let addr = crate::tests::spawn(router(MockContactFeatureService::new().into())).await;

        for email in ["not-an-email", "jane@example", "jane doe@example.com", "@example.com"] {
            let mut body = valid_body();
            body["email"] = json!(email);
            let result = post(addr, body.to_string().into()).await;
            assert_eq!(result, (400, json!({"error": "Invalid email format"})), "{email}");
        }
    }

    #[tokio::test]
    async fn invalid_body() {
        let addr = crate::tests::spawn(router(MockContactFeatureService::new().into())).await;

        for body in ["", "{", "not json", r#"{"name": 42}"#] {
            let result = post(addr, body.into()).await;
            assert_eq!(result, (400, json!({"error": "Invalid request body"})), "{body}");
        }
    }

    #[tokio::test]
    async fn rejected_by_smtp_server() {
        // Arrange
        let service = MockContactFeatureService::new()
            .with_send_message(message(), Err(ContactSendMessageError::Send));
        let addr = crate::tests::spawn(router(service.into())).await;

        // Act
        let result = post(addr, valid_body().to_string().into()).await;

        // Assert
        assert_eq!(result, (500, json!({"error": "Failed to send email"})));
    }

    #[tokio::test]
    async fn transport_error() {
        // Arrange
        let service = MockContactFeatureService::new().with_send_message(
            message(),
            Err(anyhow::anyhow!("connection refused").into()),
        );
        let addr = crate::tests::spawn(router(service.into())).await;

        // Act
        let result = post(addr, valid_body().to_string().into()).await;

        // Assert
        assert_eq!(result, (500, json!({"error": "Failed to send email"})));
    }
}
