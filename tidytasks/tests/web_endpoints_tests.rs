use axum::http::StatusCode;

mod common;

#[tokio::test]
async fn can_check_health_endpoint() {
    let context = common::setup();

    let response = context.get("/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "OK");
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let context = common::setup();

    let response = context.get("/tasks").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_tasks_file_shows_error_chain_in_debug_mode() {
    let context = common::setup();
    std::fs::write(&context.tasks_file, "not json").unwrap();

    let response = context.get("/").await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.body.contains("Task store failed"));
    assert!(response.body.contains("is malformed"));
}

#[tokio::test]
async fn malformed_tasks_file_hides_error_chain_outside_debug_mode() {
    let context = common::setup_with_config(|config| config.debug = false);
    std::fs::write(&context.tasks_file, "not json").unwrap();

    let response = context.get("/").await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.body,
        "<h1>Internal Server Error</h1><p>An unexpected error occurred while processing your request. Please try again later.</p>"
    );
}

#[tokio::test]
async fn malformed_tasks_file_is_left_untouched_by_mutations() {
    let context = common::setup();
    std::fs::write(&context.tasks_file, "not json").unwrap();

    let response = context.add("description=buy+milk").await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        std::fs::read_to_string(&context.tasks_file).unwrap(),
        "not json"
    );
}
