mod common;

use serde_json::Value;

#[tokio::test]
async fn send_creates_session_with_linked_reply() {
    let app = match common::spawn_app().await {
        Some(app) => app,
        None => return,
    };

    let item = app.send("alice", "What is a Caesar cipher?", None).await;

    let session_id = item["session_id"].as_i64().unwrap();
    assert_eq!("What is a Caesar cipher?", item["session_title"]);
    assert_eq!("user", item["user_message"]["message_type"]);
    assert_eq!("bot", item["bot_message"]["message_type"]);
    assert_eq!(item["user_message"]["id"], item["bot_message"]["linked_message_id"]);
    assert_eq!("rules", item["bot_message"]["source"]);

    let messages = app.session_messages("alice", session_id).await;
    assert_eq!(2, messages.len());
    assert_eq!("user", messages[0]["message_type"]);
    assert_eq!("bot", messages[1]["message_type"]);

    let response = app
        .get("alice", "/chat/sessions")
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    let sessions = body["list"].as_array().unwrap();
    assert_eq!(1, sessions.len());
    assert_eq!(2, sessions[0]["message_count"]);

    let (actions,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM user_activity WHERE user_id = 'alice' AND action = 'message_sent'",
    )
    .fetch_one(&app.db_pool)
    .await
    .unwrap();
    assert_eq!(1, actions);
}

#[tokio::test]
async fn follow_up_joins_existing_session() {
    let app = match common::spawn_app().await {
        Some(app) => app,
        None => return,
    };

    let first = app.send("alice", "hello there", None).await;
    let session_id = first["session_id"].as_i64().unwrap();

    let second = app.send("alice", "thanks", Some(session_id)).await;
    assert_eq!(session_id, second["session_id"].as_i64().unwrap());

    let messages = app.session_messages("alice", session_id).await;
    let contents: Vec<&str> = messages
        .iter()
        .map(|message| message["content"].as_str().unwrap())
        .collect();
    assert_eq!(4, contents.len());
    assert_eq!("hello there", contents[0]);
    assert_eq!("thanks", contents[2]);
}

#[tokio::test]
async fn blank_message_is_rejected() {
    let app = match common::spawn_app().await {
        Some(app) => app,
        None => return,
    };

    for message in ["", "   "] {
        let response = app
            .post("alice", "/chat")
            .json(&serde_json::json!({ "message": message }))
            .send()
            .await
            .expect("Failed to execute request.");

        assert_eq!(400, response.status().as_u16());
    }
}

#[tokio::test]
async fn foreign_session_is_not_found() {
    let app = match common::spawn_app().await {
        Some(app) => app,
        None => return,
    };

    let item = app.send("alice", "What is a Caesar cipher?", None).await;
    let session_id = item["session_id"].as_i64().unwrap();

    let response = app
        .post("bob", "/chat")
        .json(&serde_json::json!({ "message": "let me in", "session_id": session_id }))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(404, response.status().as_u16());

    let response = app
        .get("bob", &format!("/chat/sessions/{}", session_id))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(404, response.status().as_u16());

    let response = app
        .delete("bob", &format!("/chat/sessions/{}", session_id))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(404, response.status().as_u16());

    assert_eq!(2, app.session_messages("alice", session_id).await.len());
}

#[tokio::test]
async fn edit_replaces_the_single_reply() {
    let app = match common::spawn_app().await {
        Some(app) => app,
        None => return,
    };

    let item = app.send("alice", "What is a Caesar cipher?", None).await;
    let session_id = item["session_id"].as_i64().unwrap();
    let user_id = item["user_message"]["id"].as_i64().unwrap();
    let old_bot_id = item["bot_message"]["id"].as_i64().unwrap();

    let response = app
        .put("alice", &format!("/chat/messages/{}", user_id))
        .json(&serde_json::json!({ "new_text": "thanks" }))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());

    let body: Value = response.json().await.unwrap();
    let edited = &body["item"];
    assert_eq!("thanks", edited["user_message"]["content"]);
    assert_eq!(old_bot_id, edited["removed_bot_id"].as_i64().unwrap());
    assert_eq!(user_id, edited["new_bot_message"]["linked_message_id"].as_i64().unwrap());
    assert!(edited["new_bot_message"]["content"]
        .as_str()
        .unwrap()
        .starts_with("You're welcome!"));

    let messages = app.session_messages("alice", session_id).await;
    assert_eq!(2, messages.len());
    assert!(messages.iter().all(|message| message["id"].as_i64() != Some(old_bot_id)));
}

#[tokio::test]
async fn only_own_user_messages_can_be_edited() {
    let app = match common::spawn_app().await {
        Some(app) => app,
        None => return,
    };

    let item = app.send("alice", "hello there", None).await;
    let user_id = item["user_message"]["id"].as_i64().unwrap();
    let bot_id = item["bot_message"]["id"].as_i64().unwrap();

    for (token, id) in [("alice", bot_id), ("bob", user_id)] {
        let response = app
            .put(token, &format!("/chat/messages/{}", id))
            .json(&serde_json::json!({ "new_text": "rewritten" }))
            .send()
            .await
            .expect("Failed to execute request.");

        assert_eq!(404, response.status().as_u16());
    }
}

#[tokio::test]
async fn deleting_user_message_removes_its_reply() {
    let app = match common::spawn_app().await {
        Some(app) => app,
        None => return,
    };

    let item = app.send("alice", "What is a Caesar cipher?", None).await;
    let session_id = item["session_id"].as_i64().unwrap();
    let user_id = item["user_message"]["id"].as_i64().unwrap();
    let bot_id = item["bot_message"]["id"].as_i64().unwrap();

    let response = app
        .delete("alice", &format!("/chat/messages/{}", user_id))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());

    let body: Value = response.json().await.unwrap();
    let mut deleted: Vec<i64> = body["item"]["deleted_ids"]
        .as_array()
        .unwrap()
        .iter()
        .map(|id| id.as_i64().unwrap())
        .collect();
    deleted.sort();
    assert_eq!(vec![user_id, bot_id], deleted);

    assert!(app.session_messages("alice", session_id).await.is_empty());
}

#[tokio::test]
async fn deleting_bot_message_removes_the_exchange() {
    let app = match common::spawn_app().await {
        Some(app) => app,
        None => return,
    };

    let first = app.send("alice", "hello there", None).await;
    let session_id = first["session_id"].as_i64().unwrap();
    app.send("alice", "thanks", Some(session_id)).await;

    let bot_id = first["bot_message"]["id"].as_i64().unwrap();
    let response = app
        .delete("alice", &format!("/chat/messages/{}", bot_id))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());

    let messages = app.session_messages("alice", session_id).await;
    assert_eq!(2, messages.len());
    assert_eq!("thanks", messages[0]["content"]);
}

#[tokio::test]
async fn search_is_scoped_to_the_user() {
    let app = match common::spawn_app().await {
        Some(app) => app,
        None => return,
    };

    app.send("alice", "Tell me about AES encryption", None).await;

    let response = app
        .get("alice", "/chat/search?query=aes")
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    let hits = body["list"].as_array().unwrap();
    assert!(!hits.is_empty());
    assert!(hits.iter().all(|hit| hit["content"]
        .as_str()
        .unwrap()
        .to_lowercase()
        .contains("aes")));

    let response = app
        .get("bob", "/chat/search?query=aes")
        .send()
        .await
        .expect("Failed to execute request.");
    let body: Value = response.json().await.unwrap();
    assert!(body["list"].as_array().map_or(true, |hits| hits.is_empty()));

    // wildcards are matched literally
    let response = app
        .get("alice", "/chat/search?query=%25%25")
        .send()
        .await
        .expect("Failed to execute request.");
    let body: Value = response.json().await.unwrap();
    assert!(body["list"].as_array().map_or(true, |hits| hits.is_empty()));

    let response = app
        .get("alice", "/chat/search?query=a")
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn session_can_be_renamed_and_deleted() {
    let app = match common::spawn_app().await {
        Some(app) => app,
        None => return,
    };

    let item = app.send("alice", "hello there", None).await;
    let session_id = item["session_id"].as_i64().unwrap();
    let path = format!("/chat/sessions/{}", session_id);

    let response = app
        .put("alice", &path)
        .json(&serde_json::json!({ "title": "Greetings" }))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!("Greetings", body["item"]["title"]);

    let response = app
        .put("alice", &path)
        .json(&serde_json::json!({ "title": "x".repeat(201) }))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(400, response.status().as_u16());

    let response = app
        .delete("alice", &path)
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());

    let response = app
        .get("alice", &path)
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(404, response.status().as_u16());

    let (remaining,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM chat_message")
        .fetch_one(&app.db_pool)
        .await
        .unwrap();
    assert_eq!(0, remaining);
}
