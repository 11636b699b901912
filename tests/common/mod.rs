use std::net::SocketAddr;

use chrono::{Duration, Utc};
use reqwest::{Client, Response};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use authgate::auth::reset_code;
use authgate::config::Config;
use authgate::flash::Flash;

/// A running test server instance with a dedicated test database.
pub struct TestApp {
    pub addr: SocketAddr,
    pub pool: PgPool,
    pub client: Client,
    pub db_name: String,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("get request failed")
    }

    pub async fn get_with_cookie(&self, path: &str, cookie: &str) -> Response {
        self.client
            .get(self.url(path))
            .header("cookie", cookie)
            .send()
            .await
            .expect("get request failed")
    }

    pub async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(fields)
            .send()
            .await
            .expect("form post failed")
    }

    /// Register with a full field set; only email and passwords vary per test.
    pub async fn register(&self, email: &str, password: &str, password2: &str) -> Response {
        self.post_form(
            "/register",
            &[
                ("firstname", "Ada"),
                ("lastname", "Lovelace"),
                ("email", email),
                ("phone", "+44 20 7946 0000"),
                ("country", "GB"),
                ("currency", "GBP"),
                ("password", password),
                ("password2", password2),
            ],
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> Response {
        self.post_form("/login", &[("email", email), ("password", password)])
            .await
    }

    /// Issue a reset code directly in the store, returning the raw token.
    pub async fn issue_code(&self, email: &str) -> String {
        let code = reset_code::generate();
        authgate::db::password_reset_codes::create(
            &self.pool,
            email,
            &reset_code::hash(&code),
            Utc::now() + Duration::hours(1),
        )
        .await
        .expect("failed to insert reset code");
        code
    }

    /// Issue an already-expired reset code, returning the raw token.
    pub async fn issue_expired_code(&self, email: &str) -> String {
        let code = reset_code::generate();
        authgate::db::password_reset_codes::create(
            &self.pool,
            email,
            &reset_code::hash(&code),
            Utc::now() - Duration::hours(1),
        )
        .await
        .expect("failed to insert reset code");
        code
    }

    pub async fn count_codes(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM password_reset_codes")
            .fetch_one(&self.pool)
            .await
            .expect("count query failed")
    }

    pub async fn count_users(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .expect("count query failed")
    }

    pub async fn password_hash_of(&self, email: &str) -> String {
        sqlx::query_scalar("SELECT password_hash FROM users WHERE email = $1")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .expect("user not found")
    }
}

/// The `Location` header of a redirect response.
pub fn location(resp: &Response) -> String {
    resp.headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// The flash set by a response, decoded from its `Set-Cookie` headers.
pub fn flash_of(resp: &Response) -> Option<Flash> {
    resp.headers().get_all("set-cookie").iter().find_map(|v| {
        let raw = v.to_str().ok()?;
        let value = raw.strip_prefix("flash=")?.split(';').next()?;
        authgate::flash::from_cookie_value(value)
    })
}

/// The session cookie value set by a response, if any.
pub fn session_cookie_of(resp: &Response) -> Option<String> {
    resp.headers().get_all("set-cookie").iter().find_map(|v| {
        let raw = v.to_str().ok()?;
        let value = raw.strip_prefix("session=")?.split(';').next()?;
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    })
}

/// Spawn a test app with a fresh temporary database.
pub async fn spawn_app() -> TestApp {
    let _ = dotenvy::dotenv();

    let base_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    // Create a unique test database
    let db_name = format!(
        "authgate_test_{}",
        Uuid::now_v7().to_string().replace('-', "")
    );

    // Connect to default postgres DB to create test DB
    let admin_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/postgres"))
        .unwrap_or_else(|| base_url.clone());

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url)
        .await
        .expect("Failed to connect to postgres for test DB creation");

    sqlx::query(&format!("CREATE DATABASE \"{db_name}\""))
        .execute(&admin_pool)
        .await
        .expect("Failed to create test database");

    admin_pool.close().await;

    // Connect to test DB and run migrations
    let test_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/{db_name}"))
        .unwrap_or_else(|| base_url.clone());

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&test_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations on test database");

    let config = Config {
        database_url: test_url,
        session_secret: "test-session-secret-that-is-long-enough".to_string(),
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        base_url: "http://localhost:0".to_string(),
        trusted_proxies: vec![],
        log_level: "warn".to_string(),
        smtp: None,
    };

    let app = authgate::build_app(pool.clone(), config);

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    // Spawn server in background
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("Server failed");
    });

    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        addr,
        pool,
        client,
        db_name,
    }
}

/// Drop the test database after tests complete.
pub async fn cleanup(app: TestApp) {
    let db_name = app.db_name.clone();
    app.pool.close().await;

    let base_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");
    let admin_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/postgres"))
        .unwrap_or_else(|| base_url.clone());

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url)
        .await
        .expect("Failed to connect for cleanup");

    let _ = sqlx::query(&format!("DROP DATABASE IF EXISTS \"{db_name}\" WITH (FORCE)"))
        .execute(&admin_pool)
        .await;

    admin_pool.close().await;
}
