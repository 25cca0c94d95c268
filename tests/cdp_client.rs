//! Integration tests for the CDP HTTP client.
//!
//! A wiremock server stands in for the CDP test API.

use citycatalyst_cdp::reporting::cdp::CdpClient;
use citycatalyst_cdp::reporting::{
    CityId, MatrixAnswer, MatrixCell, ReportingError, ReportingService, SingleSelectAnswer,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> CdpClient {
    CdpClient::new(format!("{}/api/v1/", server.uri()), Some("t0ken".to_string()))
}

mod requests {
    use super::*;

    #[tokio::test]
    async fn city_id_queries_by_name_and_country() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/cities"))
            .and(query_param("name", "Ciudad de México"))
            .and(query_param("country", "Mexico"))
            .and(header("authorization", "Bearer t0ken"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "31108"})))
            .expect(1)
            .mount(&server)
            .await;

        let city = client(&server)
            .city_id("Ciudad de México", "Mexico")
            .await
            .unwrap();

        assert_eq!(city, CityId::new("31108"));
    }

    #[tokio::test]
    async fn questionnaire_is_parsed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/cities/31108/questionnaire"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "sections": [{
                    "id": "s-emissions",
                    "title": "Emissions",
                    "questions": [
                        {
                            "id": "q-inv",
                            "title": "Inventory?",
                            "options": [{"id": "o1", "name": "Yes"}, {"id": "o2", "name": "No"}]
                        },
                        {
                            "id": "q-mx",
                            "rows": [{"id": "r1", "title": "Total scope 2 emissions"}],
                            "columns": [{"id": "c1", "header": "Emissions (metric tonnes CO2e)"}]
                        }
                    ]
                }]
            })))
            .mount(&server)
            .await;

        let q = client(&server)
            .questionnaire(&CityId::new("31108"))
            .await
            .unwrap();

        let questions = &q.sections[0].questions;
        assert_eq!(questions[0].options[0].name, "Yes");
        assert_eq!(questions[1].rows[0].id, "r1");
        assert_eq!(questions[1].columns[0].id, "c1");
    }

    #[tokio::test]
    async fn single_select_posts_camel_case_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/cities/31108/answers/single-select"))
            .and(body_json(json!({
                "questionId": "q-inv",
                "optionId": "o1",
                "answer": "Yes"
            })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .submit_single_select(
                &CityId::new("31108"),
                SingleSelectAnswer {
                    question_id: "q-inv".to_string(),
                    option_id: "o1".to_string(),
                    answer: "Yes".to_string(),
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn matrix_values_are_sent_as_strings() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/cities/31108/answers/matrix"))
            .and(body_json(json!({
                "questionId": "q-mx",
                "rows": [{"rowId": "r1", "columnId": "c1", "value": "9007199254740993"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .submit_matrix(
                &CityId::new("31108"),
                MatrixAnswer {
                    question_id: "q-mx".to_string(),
                    rows: vec![MatrixCell {
                        row_id: "r1".to_string(),
                        column_id: "c1".to_string(),
                        value: "9007199254740993".to_string(),
                    }],
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn city_id_with_reserved_characters_stays_in_its_segment() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/cities/31108%2F..%3Fx/questionnaire"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sections": []})))
            .expect(1)
            .mount(&server)
            .await;

        let q = client(&server)
            .questionnaire(&CityId::new("31108/..?x"))
            .await
            .unwrap();

        assert!(q.sections.is_empty());
    }
}

mod errors {
    use super::*;

    async fn city_id_with_status(status: u16, body: serde_json::Value) -> ReportingError {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/cities"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&server)
            .await;

        client(&server)
            .city_id("Lagos", "Nigeria")
            .await
            .unwrap_err()
    }

    #[tokio::test]
    async fn unauthorized_is_auth_failure() {
        let err = city_id_with_status(401, json!({"message": "bad token"})).await;
        assert!(matches!(err, ReportingError::AuthFailed(_)));
    }

    #[tokio::test]
    async fn forbidden_keeps_message() {
        let err = city_id_with_status(403, json!({"error": "no access to city"})).await;
        assert_eq!(
            err,
            ReportingError::AuthFailed("Permission denied: no access to city".to_string())
        );
    }

    #[tokio::test]
    async fn not_found_keeps_message() {
        let err = city_id_with_status(404, json!({"message": "unknown city"})).await;
        assert_eq!(err, ReportingError::NotFound("unknown city".to_string()));
    }

    #[tokio::test]
    async fn too_many_requests_is_rate_limited() {
        let err = city_id_with_status(429, json!({})).await;
        assert_eq!(err, ReportingError::RateLimited);
    }

    #[tokio::test]
    async fn server_error_is_api_error() {
        let err = city_id_with_status(503, json!({"message": "maintenance"})).await;
        assert_eq!(
            err,
            ReportingError::ApiError {
                status: 503,
                message: "CDP server error: maintenance".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn unparsable_success_body_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/cities"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client(&server)
            .city_id("Lagos", "Nigeria")
            .await
            .unwrap_err();

        assert!(matches!(err, ReportingError::ApiError { status: 200, .. }));
    }

    #[tokio::test]
    async fn unreachable_server_is_network_error() {
        let err = CdpClient::new("http://127.0.0.1:1", None)
            .city_id("Lagos", "Nigeria")
            .await
            .unwrap_err();

        assert!(matches!(err, ReportingError::NetworkError(_)));
    }
}
