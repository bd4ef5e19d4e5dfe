#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use herodex::config::{BootstrapAdmin, Config};
use http_body_util::BodyExt;
use std::path::PathBuf;
use tower::ServiceExt;

pub const ADMIN_USERNAME: &str = "root";
pub const ADMIN_EMAIL: &str = "root@herodex.test";
pub const ADMIN_PASSWORD: &str = "root-password";

const BOUNDARY: &str = "herodex-test-boundary";

pub struct TestApp {
    pub router: Router,
    pub base_dir: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.base_dir);
    }
}

pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        data: &'a [u8],
    },
}

pub fn image(name: &'static str) -> Part<'static> {
    Part::File {
        name,
        file_name: "picture.png",
        content_type: "image/png",
        data: b"\x89PNG fake image bytes",
    }
}

pub async fn spawn_app() -> TestApp {
    let base_dir = std::env::temp_dir().join(format!("herodex-test-{}", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", base_dir.join("herodex.db").display());
    config.general.public_path = base_dir.join("public").display().to_string();
    config.server.metrics_enabled = false;
    config.security.argon2_memory_cost_kib = 256;
    config.security.argon2_time_cost = 1;
    config.security.argon2_parallelism = 1;
    config.security.bootstrap_admin = Some(BootstrapAdmin {
        username: ADMIN_USERNAME.to_string(),
        email: ADMIN_EMAIL.to_string(),
        password: ADMIN_PASSWORD.to_string(),
    });

    let state = herodex::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");

    TestApp {
        router: herodex::api::router(state),
        base_dir,
    }
}

impl TestApp {
    pub fn public_dir(&self) -> PathBuf {
        self.base_dir.join("public")
    }

    pub fn files_in(&self, dir: &str) -> usize {
        std::fs::read_dir(self.public_dir().join(dir))
            .map(|entries| {
                entries
                    .filter_map(Result::ok)
                    .filter(|e| e.path().is_file())
                    .count()
            })
            .unwrap_or(0)
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn form(
        &self,
        method: &str,
        uri: &str,
        body: &str,
        cookie: Option<&str>,
    ) -> Response<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                mime::APPLICATION_WWW_FORM_URLENCODED.as_ref(),
            );
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    pub async fn multipart(
        &self,
        method: &str,
        uri: &str,
        parts: &[Part<'_>],
        cookie: Option<&str>,
    ) -> Response<Body> {
        let mut body: Vec<u8> = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n")
                            .as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
                Part::File {
                    name,
                    file_name,
                    content_type,
                    data,
                } => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(data);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        let mut builder = Request::builder().method(method).uri(uri).header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body)).unwrap()).await
    }

    pub async fn register(&self, email: &str, username: &str, password: &str) -> StatusCode {
        let body = format!(
            "User_email={}&User_password={password}&User_password_confirm={password}&User_name={username}",
            urlencoding::encode(email)
        );
        self.form("POST", "/registration", &body, None)
            .await
            .status()
    }

    /// Signs in and returns the `Cookie` header value for later requests.
    pub async fn login(&self, identifier: &str, password: &str) -> String {
        let body = format!(
            "User_name={}&User_password={password}",
            urlencoding::encode(identifier)
        );
        let response = self.form("POST", "/login", &body, None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        session_cookie(&response).expect("login should set the session cookie")
    }

    pub async fn login_admin(&self) -> String {
        self.login(ADMIN_USERNAME, ADMIN_PASSWORD).await
    }

    pub async fn login_user(&self, username: &str) -> String {
        let status = self
            .register(&format!("{username}@herodex.test"), username, "secret")
            .await;
        assert_eq!(status, StatusCode::CREATED);
        self.login(username, "secret").await
    }

    pub async fn create_hero(&self, cookie: &str, name: &str) -> StatusCode {
        let response = self
            .multipart(
                "POST",
                "/Add_card",
                &[
                    Part::Text("name", name),
                    Part::Text("primary_attribute", "Strength"),
                    Part::Text("attack_type", "Melee"),
                    Part::Text("complexity", "1"),
                    Part::Text("short_description", "A hero for tests"),
                    image("image_url"),
                    image("background_image_url"),
                ],
                Some(cookie),
            )
            .await;
        response.status()
    }

    pub async fn create_ability(&self, cookie: &str, hero_id: &str, name: &str) -> StatusCode {
        let response = self
            .multipart(
                "POST",
                "/Add_ability",
                &[
                    Part::Text("hero_id", hero_id),
                    Part::Text("name", name),
                    Part::Text("description", "Does something"),
                    Part::Text("specification", r#"{"cooldown": 12}"#),
                    image("image_url"),
                ],
                Some(cookie),
            )
            .await;
        response.status()
    }
}

pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("herodex.sid="))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
