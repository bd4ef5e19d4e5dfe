mod common;

use axum::http::{StatusCode, header};
use common::{ADMIN_EMAIL, ADMIN_PASSWORD, Part, body_json, body_text, image, spawn_app};

#[tokio::test]
async fn test_registration_and_uniqueness() {
    let app = spawn_app().await;

    assert_eq!(
        app.register("a@b.com", "alice", "x").await,
        StatusCode::CREATED
    );
    assert_eq!(
        app.register("a@b.com", "alice", "x").await,
        StatusCode::CONFLICT
    );
    assert_eq!(
        app.register("other@b.com", "alice", "x").await,
        StatusCode::CONFLICT
    );
    assert_eq!(
        app.register("a@b.com", "someone-else", "x").await,
        StatusCode::CONFLICT
    );
}

#[tokio::test]
async fn test_registration_validation() {
    let app = spawn_app().await;

    assert_eq!(
        app.register("not-an-email", "bob", "x").await,
        StatusCode::BAD_REQUEST
    );

    let response = app
        .form(
            "POST",
            "/registration",
            "User_email=bob%40b.com&User_password=one&User_password_confirm=two&User_name=bob",
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("Passwords do not match"));

    assert_eq!(
        app.register("bob@b.com", "", "x").await,
        StatusCode::BAD_REQUEST
    );

    // A mismatch is reported before uniqueness is looked at.
    assert_eq!(
        app.register("taken@b.com", "taken", "x").await,
        StatusCode::CREATED
    );
    let response = app
        .form(
            "POST",
            "/registration",
            "User_email=taken%40b.com&User_password=one&User_password_confirm=two&User_name=taken",
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("Passwords do not match"));
}

#[tokio::test]
async fn test_login_flow() {
    let app = spawn_app().await;
    assert_eq!(
        app.register("carol@b.com", "carol", "pw").await,
        StatusCode::CREATED
    );

    let response = app
        .form("POST", "/login", "User_name=nobody&User_password=pw", None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .form("POST", "/login", "User_name=carol&User_password=wrong", None)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(body_text(response).await.contains("Wrong password"));

    let response = app
        .form(
            "POST",
            "/login",
            "User_name=carol%40b.com&User_password=pw",
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");
    let cookie = common::session_cookie(&response).unwrap();

    let page = body_text(app.get("/", Some(&cookie)).await).await;
    assert!(page.contains("carol"));
    assert!(page.contains("/logout"));

    let response = app.get("/logout", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let page = body_text(app.get("/", Some(&cookie)).await).await;
    assert!(!page.contains("/logout"));
}

#[tokio::test]
async fn test_admin_guard() {
    let app = spawn_app().await;

    let response = app.get("/admin", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(body_text(response).await.contains("You are not signed in"));

    let user = app.login_user("dave").await;
    let response = app.get("/admin", Some(&user)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(
        body_text(response)
            .await
            .contains("You do not have sufficient rights")
    );

    let response = app.get("/get_feedback", Some(&user)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Login by email works for the admin too.
    let admin = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let response = app.get("/admin", Some(&admin)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Add hero"));
}

#[tokio::test]
async fn test_rejected_upload_never_touches_disk() {
    let app = spawn_app().await;
    let user = app.login_user("erin").await;

    let response = app
        .multipart(
            "POST",
            "/Add_card",
            &[
                Part::Text("name", "Intruder"),
                image("image_url"),
                image("background_image_url"),
            ],
            Some(&user),
        )
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(app.files_in("images"), 0);
}

#[tokio::test]
async fn test_comments() {
    let app = spawn_app().await;
    let admin = app.login_admin().await;
    assert_eq!(app.create_hero(&admin, "Axe").await, StatusCode::CREATED);

    let response = app
        .form("POST", "/add_comment", "comment=hello&hero_id=1", None)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let page = body_text(app.get("/hero/Axe", None).await).await;
    assert!(!page.contains("hello"));

    let user = app.login_user("frank").await;

    let response = app
        .form("POST", "/add_comment", "comment=%20%20&hero_id=1", Some(&user))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .form("POST", "/add_comment", "comment=hi&hero_id=abc", Some(&user))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .form("POST", "/add_comment", "comment=hi&hero_id=999", Some(&user))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .form(
            "POST",
            "/add_comment",
            "comment=Great+%3Cb%3Ehero%3C%2Fb%3E&hero_id=1",
            Some(&user),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let page = body_text(app.get("/hero/Axe", None).await).await;
    assert!(page.contains("frank"));
    assert!(page.contains("Great &lt;b&gt;hero&lt;/b&gt;"));
}

#[tokio::test]
async fn test_feedback() {
    let app = spawn_app().await;

    let response = app
        .form(
            "POST",
            "/feedback_answer",
            "Username=Gina&Useremail=gina%40b.com&Theme=Bug",
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .form(
            "POST",
            "/feedback_answer",
            "Username=Gina&Useremail=gina%40b.com&Theme=Bug&Message=Broken+link",
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let admin = app.login_admin().await;
    let response = app.get("/get_feedback", Some(&admin)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let feedback = json["feedback"].as_array().unwrap();
    assert_eq!(feedback.len(), 1);
    assert_eq!(feedback[0]["user_name"], "Gina");
    assert_eq!(feedback[0]["theme"], "Bug");
    assert_eq!(feedback[0]["message"], "Broken link");
}

#[tokio::test]
async fn test_pages_and_fallback() {
    let app = spawn_app().await;

    for uri in ["/", "/auth", "/feedback"] {
        let response = app.get(uri, None).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    }

    let response = app.get("/hero/Nobody", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("Hero not found"));

    let response = app.get("/definitely/not/here", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("This page does not exist"));

    std::fs::create_dir_all(app.public_dir().join("css")).unwrap();
    std::fs::write(app.public_dir().join("css/site.css"), "body { margin: 0; }").unwrap();

    let response = app.get("/css/site.css", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "body { margin: 0; }");
}

#[tokio::test]
async fn test_abilities_json_is_public() {
    let app = spawn_app().await;

    let response = app.get("/get_abilities/1", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["abilities"], serde_json::json!([]));

    let response = app.get("/get_abilities/abc", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["errorMessage"], "Hero not found");
}

#[tokio::test]
async fn test_promoted_user_reaches_admin() {
    use herodex::db::Store;
    use herodex::models::user::UserRole;

    let app = spawn_app().await;
    let before = app.login_user("ivy").await;
    assert_eq!(
        app.get("/admin", Some(&before)).await.status(),
        StatusCode::FORBIDDEN
    );

    let db_url = format!("sqlite:{}", app.base_dir.join("herodex.db").display());
    let store = Store::with_pool_options(&db_url, 1, 1).await.unwrap();
    assert!(store.set_user_role("ivy", UserRole::Admin).await.unwrap());
    assert!(!store.set_user_role("nobody", UserRole::Admin).await.unwrap());

    // The role is snapshotted at login.
    assert_eq!(
        app.get("/admin", Some(&before)).await.status(),
        StatusCode::FORBIDDEN
    );
    let after = app.login("ivy", "secret").await;
    assert_eq!(app.get("/admin", Some(&after)).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_metrics_route() {
    let app = spawn_app().await;

    let response = app.get("/metrics", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Metrics are switched off for tests, so even the admin gets a 404.
    let admin = app.login_admin().await;
    let response = app.get("/metrics", Some(&admin)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_long_feedback_message_is_accepted() {
    let app = spawn_app().await;
    let message = "a".repeat(70 * 1024);

    let response = app
        .form(
            "POST",
            "/feedback_answer",
            &format!("Username=Hank&Useremail=hank%40b.com&Theme=Essay&Message={message}"),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let admin = app.login_admin().await;
    let json = body_json(app.get("/get_feedback", Some(&admin)).await).await;
    assert_eq!(
        json["feedback"][0]["message"].as_str().map(str::len),
        Some(70 * 1024)
    );
}
