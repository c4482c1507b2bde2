use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use http_body_util::BodyExt;
use nikjin::{
    AppState,
    config::{Config, DatabaseConfig, JwtConfig, LogConfig, MediaConfig, ServerConfig},
};
use nikjin_user::CreateUserInput;
use temp_dir::TempDir;
use tower::ServiceExt;

pub const PASSWORD: &str = "s3cure-pass-word";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    _dir: TempDir,
}

pub async fn setup_test_app() -> anyhow::Result<TestApp> {
    let dir = TempDir::new()?;
    let url = format!("sqlite:{}", dir.child("db.sqlite3").display());

    let write_db = nikjin::db::create_write_pool(&url).await?;
    nikjin_db::migrate(&write_db).await?;
    let read_db = nikjin::db::create_read_pool(&url, 2).await?;

    let config = Config {
        server: ServerConfig {
            host: "127.0.0.1".to_owned(),
            port: 8000,
        },
        database: DatabaseConfig {
            url,
            max_connections: 2,
        },
        jwt: JwtConfig {
            secret: "test_secret_key_minimum_32_characters_long".to_owned(),
            issuer: "nikjin".to_owned(),
            audience: "nikjin".to_owned(),
            expiration_days: 1,
        },
        media: MediaConfig {
            dir: dir.child("media").display().to_string(),
        },
        log: LogConfig::default(),
    };

    let state = AppState::new(config, nikjin_shared::State { read_db, write_db });

    Ok(TestApp {
        router: nikjin::router(state.clone()),
        state,
        _dir: dir,
    })
}

impl TestApp {
    pub async fn create_user(&self, username: &str) -> anyhow::Result<String> {
        Ok(self
            .state
            .user_command
            .create(CreateUserInput {
                username: username.to_owned(),
                first_name: "Test".to_owned(),
                last_name: "User".to_owned(),
                email: format!("{username}@nikjin.localhost"),
                password: PASSWORD.to_owned(),
            })
            .await?)
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> anyhow::Result<Response<Body>> {
        let mut request = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }

        Ok(self.router.clone().oneshot(request.body(Body::empty())?).await?)
    }

    pub async fn post_form(
        &self,
        uri: &str,
        form: &[(&str, &str)],
        cookie: Option<&str>,
    ) -> anyhow::Result<Response<Body>> {
        let mut request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }

        let body = serde_urlencoded::to_string(form)?;

        Ok(self.router.clone().oneshot(request.body(Body::from(body))?).await?)
    }

    /// Logs `username` in through the form and returns the `Cookie` header to reuse.
    pub async fn login(&self, username: &str) -> anyhow::Result<String> {
        let response = self
            .post_form(
                "/login",
                &[("username", username), ("password", PASSWORD)],
                None,
            )
            .await?;

        cookie(&response, "auth_token").ok_or_else(|| anyhow::anyhow!("login failed"))
    }
}

/// `name=value` of a cookie set by the response.
pub fn cookie(response: &Response<Body>, name: &str) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .find(|pair| pair.starts_with(&format!("{name}=")))
        .map(str::to_owned)
}

pub fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
}

pub async fn body_string(response: Response<Body>) -> anyhow::Result<String> {
    let bytes = response.into_body().collect().await?.to_bytes();

    Ok(String::from_utf8(bytes.to_vec())?)
}
