use logstitch_testing::{Dataset, FakeController};
use reqwest::StatusCode;
use reqwest::blocking::Client;

#[test]
fn test_serves_repeated_requests_on_one_connection() -> anyhow::Result<()> {
    let controller = FakeController::builder(Dataset::new())
        .version("30.1.1")
        .start()?;
    let client = Client::new();
    let url = format!("{}/api/initial-data", controller.base_url());

    for _ in 0..3 {
        let body: serde_json::Value = client.get(&url).send()?.error_for_status()?.json()?;
        assert_eq!(body["version"]["Version"], "30.1.1");
    }
    assert_eq!(controller.requests().len(), 3);
    Ok(())
}

#[test]
fn test_request_with_body_is_recorded_and_answered() -> anyhow::Result<()> {
    let controller = FakeController::start(Dataset::from_offsets(&[2, 1]))?;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/macro", controller.base_url()))
        .header("X-Avi-Tenant", "ops")
        .body(r#"{"model_name": "virtualservice", "data": {"name": "vs-1"}}"#)
        .send()?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client
        .get(format!("{}/api/analytics/logs", controller.base_url()))
        .query(&[
            ("start", "2024-01-01T00:00:00.000000+00:00"),
            ("end", "2024-01-01T00:00:09.000000+00:00"),
            ("page_size", "10"),
        ])
        .send()?;
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json()?;
    assert_eq!(body["count"], 2);

    let requests = controller.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/api/macro");
    assert_eq!(requests[0].header("x-avi-tenant"), Some("ops"));
    assert_eq!(controller.log_requests().len(), 1);
    Ok(())
}

#[test]
fn test_missing_window_parameters_are_rejected() -> anyhow::Result<()> {
    let controller = FakeController::start(Dataset::new())?;

    let response = Client::new()
        .get(format!("{}/api/analytics/logs", controller.base_url()))
        .query(&[("page_size", "10")])
        .send()?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json()?;
    assert_eq!(body["error"], "missing start");
    Ok(())
}

#[test]
fn test_port_is_released_on_drop() -> anyhow::Result<()> {
    let base_url = {
        let controller = FakeController::start(Dataset::new())?;
        controller.base_url()
    };

    let result = Client::new()
        .get(format!("{}/api/initial-data", base_url))
        .send();
    assert!(result.is_err());
    Ok(())
}
