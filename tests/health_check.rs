mod common;

#[tokio::test]
async fn health_check_works() {
    let app = match common::spawn_app().await {
        Some(app) => app,
        None => return,
    };

    let client = reqwest::Client::new();
    let response = client
        .get(app.url("/health_check"))
        .send()
        .await
        .expect("Failed to execute request.");

    assert!(response.status().is_success());
    assert_eq!(Some(0), response.content_length());
}

#[tokio::test]
async fn requests_without_token_are_rejected() {
    let app = match common::spawn_app().await {
        Some(app) => app,
        None => return,
    };

    let client = reqwest::Client::new();
    for path in ["/chat/sessions", "/model/stats"] {
        let response = client
            .get(app.url(path))
            .send()
            .await
            .expect("Failed to execute request.");

        assert_eq!(401, response.status().as_u16(), "path {}", path);
    }
}
