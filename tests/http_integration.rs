//! Integration tests for the control-plane HTTP client using wiremock
//!
//! These tests verify the HTTP client behavior against mocked endpoints,
//! ensuring warnings, errors, pagination and job payloads are handled, and
//! drive the actor end to end over real HTTP.

use platctl::api::{
    CloudControllerClient, HttpCloudControllerClient, JobStatus, Query, ResourceKind,
};
use platctl::config::Config;
use platctl::{Actor, ActorError};
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{bearer_token, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WARNINGS: &str = "X-Cf-Warnings";

fn org_page(guids: &[&str], next_url: Option<&str>) -> Value {
    json!({
        "total_results": guids.len(),
        "next_url": next_url,
        "resources": guids
            .iter()
            .map(|guid| json!({
                "metadata": {"guid": guid, "url": format!("/v2/organizations/{}", guid)},
                "entity": {"name": "some-org", "status": "active"}
            }))
            .collect::<Vec<_>>()
    })
}

fn job_body(status: &str) -> Value {
    json!({
        "metadata": {"guid": "some-job-guid", "url": "/v2/jobs/some-job-guid"},
        "entity": {"guid": "some-job-guid", "status": status}
    })
}

fn client(server: &MockServer) -> HttpCloudControllerClient {
    HttpCloudControllerClient::new(&server.uri(), "test-token").expect("valid endpoint")
}

/// Test module for transport-level behavior
mod http_client_tests {
    use super::*;

    /// Listing sends the name filter and decodes header warnings
    #[tokio::test]
    async fn test_list_sends_filter_and_returns_warnings() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/organizations"))
            .and(query_param("q", "name:some-org"))
            .and(bearer_token("test-token"))
            .and(header_exists("X-Vcap-Request-Id"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header(WARNINGS, "get-org-warning,second%20warning")
                    .set_body_json(org_page(&["some-org-guid"], None)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let reply = client(&server)
            .list_resources(ResourceKind::Organization, &[Query::name_equals("some-org")])
            .await;

        let orgs = reply.result.expect("listing should succeed");
        assert_eq!(orgs.len(), 1);
        assert_eq!(orgs[0].guid, "some-org-guid");
        assert_eq!(orgs[0].name, "some-org");
        assert_eq!(reply.warnings, vec!["get-org-warning", "second warning"]);
    }

    /// Pages are followed and their warnings concatenated in order
    #[tokio::test]
    async fn test_list_follows_next_url() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/organizations"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header(WARNINGS, "page-1")
                    .set_body_json(org_page(
                        &["org-1-guid"],
                        Some("/v2/organizations?page=2&q=name:some-org"),
                    )),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v2/organizations"))
            .and(query_param("page", "2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header(WARNINGS, "page-2")
                    .set_body_json(org_page(&["org-2-guid"], None)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let reply = client(&server)
            .list_resources(ResourceKind::Organization, &[Query::name_equals("some-org")])
            .await;

        let guids: Vec<String> = reply.result.unwrap().into_iter().map(|r| r.guid).collect();
        assert_eq!(guids, vec!["org-1-guid", "org-2-guid"]);
        assert_eq!(reply.warnings, vec!["page-1", "page-2"]);
    }

    /// Error responses keep their warnings and surface the server description
    #[tokio::test]
    async fn test_error_response_keeps_warnings() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/spaces"))
            .respond_with(
                ResponseTemplate::new(403)
                    .insert_header(WARNINGS, "deprecated-endpoint")
                    .set_body_json(json!({
                        "code": 10003,
                        "description": "You are not authorized to perform the requested action",
                        "error_code": "CF-NotAuthorized"
                    })),
            )
            .mount(&server)
            .await;

        let reply = client(&server)
            .list_resources(ResourceKind::Space, &[Query::name_equals("dev")])
            .await;

        assert_eq!(
            reply.result.unwrap_err().to_string(),
            "You are not authorized to perform the requested action"
        );
        assert_eq!(reply.warnings, vec!["deprecated-endpoint"]);
    }

    /// Asynchronous delete returns a job handle
    #[tokio::test]
    async fn test_delete_returns_job() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/v2/organizations/some-org-guid"))
            .and(query_param("recursive", "true"))
            .and(query_param("async", "true"))
            .respond_with(ResponseTemplate::new(202).set_body_json(job_body("queued")))
            .expect(1)
            .mount(&server)
            .await;

        let reply = client(&server)
            .delete_resource(ResourceKind::Organization, "some-org-guid")
            .await;

        let job = reply.result.unwrap();
        assert_eq!(job.guid, "some-job-guid");
        assert_eq!(job.status, JobStatus::Queued);
    }

    /// A 204 from delete means there is nothing to poll
    #[tokio::test]
    async fn test_synchronous_delete_has_no_job_handle() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/v2/spaces/space-guid"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let reply = client(&server)
            .delete_resource(ResourceKind::Space, "space-guid")
            .await;

        assert!(!reply.result.unwrap().has_handle());
    }

    /// Failed jobs carry the server's error description
    #[tokio::test]
    async fn test_get_failed_job() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/jobs/some-job-guid"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "metadata": {"guid": "some-job-guid"},
                "entity": {
                    "status": "failed",
                    "error_details": {
                        "code": 10001,
                        "description": "Please delete the service instances first",
                        "error_code": "CF-AssociationNotEmpty"
                    }
                }
            })))
            .mount(&server)
            .await;

        let job = client(&server).get_job("some-job-guid").await.result.unwrap();

        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(
            job.error.as_deref(),
            Some("Please delete the service instances first")
        );
    }

    /// Malformed JSON is a transport error, not a panic
    #[tokio::test]
    async fn test_malformed_json_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/jobs/bad"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let reply = client(&server).get_job("bad").await;
        assert!(reply.result.is_err());
    }
}

/// End-to-end actor flows over HTTP
mod actor_tests {
    use super::*;

    fn actor(server: &MockServer, timeout_secs: u64) -> Actor {
        let config = Config {
            polling_timeout_secs: timeout_secs,
            polling_interval_secs: 0,
            ..Config::default()
        };
        Actor::new(Arc::new(client(server)), Arc::new(config))
    }

    async fn mount_org_lookup(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/v2/organizations"))
            .and(query_param("q", "name:some-org"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header(WARNINGS, "get-org-warning")
                    .set_body_json(org_page(&["some-org-guid"], None)),
            )
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_delete_org_polls_until_finished() {
        let server = MockServer::start().await;
        mount_org_lookup(&server).await;

        Mock::given(method("DELETE"))
            .and(path("/v2/organizations/some-org-guid"))
            .respond_with(
                ResponseTemplate::new(202)
                    .insert_header(WARNINGS, "delete-org-warning")
                    .set_body_json(job_body("queued")),
            )
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v2/jobs/some-job-guid"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header(WARNINGS, "polling-warning-1")
                    .set_body_json(job_body("running")),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v2/jobs/some-job-guid"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header(WARNINGS, "polling-warning-2")
                    .set_body_json(job_body("finished")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let outcome = actor(&server, 30).delete_organization("some-org").await;

        assert!(outcome.result.is_ok(), "unexpected: {:?}", outcome.result);
        assert_eq!(
            outcome.warnings,
            vec![
                "get-org-warning",
                "delete-org-warning",
                "polling-warning-1",
                "polling-warning-2"
            ]
        );
    }

    #[tokio::test]
    async fn test_delete_error_is_passed_through_with_warnings() {
        let server = MockServer::start().await;
        mount_org_lookup(&server).await;

        Mock::given(method("DELETE"))
            .and(path("/v2/organizations/some-org-guid"))
            .respond_with(
                ResponseTemplate::new(422)
                    .insert_header(WARNINGS, "delete-org-warning")
                    .set_body_json(json!({
                        "code": 10006,
                        "description": "Please delete the apps associations for your organizations.",
                        "error_code": "CF-AssociationNotEmpty"
                    })),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v2/jobs/some-job-guid"))
            .respond_with(ResponseTemplate::new(200).set_body_json(job_body("finished")))
            .expect(0)
            .mount(&server)
            .await;

        let outcome = actor(&server, 30).delete_organization("some-org").await;

        let err = outcome.result.unwrap_err();
        assert!(matches!(err, ActorError::Transport(_)));
        assert_eq!(
            err.to_string(),
            "Please delete the apps associations for your organizations."
        );
        assert_eq!(outcome.warnings, vec!["get-org-warning", "delete-org-warning"]);
    }

    #[tokio::test]
    async fn test_ambiguous_name_never_deletes() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/organizations"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(org_page(&["org-2-guid", "org-1-guid"], None)),
            )
            .mount(&server)
            .await;

        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(202))
            .expect(0)
            .mount(&server)
            .await;

        let outcome = actor(&server, 30).delete_organization("some-org").await;

        assert_eq!(
            outcome.result.unwrap_err().to_string(),
            "Organization name 'some-org' matches multiple GUIDs: org-2-guid, org-1-guid"
        );
    }

    #[tokio::test]
    async fn test_job_stuck_running_times_out() {
        let server = MockServer::start().await;
        mount_org_lookup(&server).await;

        Mock::given(method("DELETE"))
            .and(path("/v2/organizations/some-org-guid"))
            .respond_with(ResponseTemplate::new(202).set_body_json(job_body("running")))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v2/jobs/some-job-guid"))
            .respond_with(ResponseTemplate::new(200).set_body_json(job_body("running")))
            .mount(&server)
            .await;

        let outcome = actor(&server, 1).delete_organization("some-org").await;

        assert!(matches!(
            outcome.result,
            Err(ActorError::PollingTimeout { ref job_guid, .. }) if job_guid == "some-job-guid"
        ));
    }
}
