//! Test fixtures: a small seeded guild
//!
//! Four identities cover the access matrix: an administrator, a member
//! holding a login role, a stranger with no roles, and an access manager.

use std::net::SocketAddr;

use axum::{
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Form, Json, Router,
};
use roster_common::AccessConfig;
use roster_core::{MemberId, PlatformMember, RoleId};
use roster_service::testing::{platform_role, TestOptions};
use roster_service::{MembershipMirror, RoleRegistry};
use serde::{Deserialize, Serialize};

use crate::helpers::{test_config, TestServer};

pub const ADMIN_ROLE: &str = "100";
pub const MEMBER_ROLE: &str = "200";
pub const WEB_ADMIN_ROLE: &str = "300";
pub const NEWCOMER_ROLE: &str = "400";

pub const ADMIN_ID: &str = "1001";
pub const MEMBER_ID: &str = "1002";
pub const STRANGER_ID: &str = "1003";
pub const MANAGER_ID: &str = "1004";

/// Administrator bit on a role
const ADMINISTRATOR: i64 = 1 << 3;

/// Options with the access-manager role configured
pub fn seeded_options() -> TestOptions {
    TestOptions {
        access: AccessConfig {
            web_admin_role_id: Some(RoleId::new(WEB_ADMIN_ROLE)),
            ..AccessConfig::default()
        },
        ..TestOptions::default()
    }
}

/// Start a server and seed the guild
pub async fn seeded_server() -> TestServer {
    let server = TestServer::start_with(seeded_options())
        .await
        .expect("Failed to start server");
    seed(&server).await;
    server
}

/// Start a seeded server whose OAuth client talks to [`fake_provider`]
pub async fn seeded_server_with_provider() -> TestServer {
    let options = seeded_options();
    let mut config = test_config(&options);
    config.oauth.client_id = "client".to_string();
    config.oauth.client_secret = "secret".to_string();
    config.oauth.api_base = fake_provider().await;

    let server = TestServer::start_with_config(config, options)
        .await
        .expect("Failed to start server");
    seed(&server).await;
    server
}

#[derive(Debug, Deserialize)]
struct TokenForm {
    code: String,
}

/// OAuth provider double
///
/// The access token it hands out is the authorization code, and the identity
/// behind a token is the user with that id, so `?code=<user id>` logs in as
/// that user. Returns the base URL.
pub async fn fake_provider() -> String {
    async fn token(Form(form): Form<TokenForm>) -> Json<serde_json::Value> {
        Json(serde_json::json!({"access_token": form.code, "token_type": "Bearer"}))
    }

    async fn me(headers: HeaderMap) -> Result<Json<serde_json::Value>, StatusCode> {
        let id = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(StatusCode::UNAUTHORIZED)?;
        Ok(Json(serde_json::json!({"id": id, "username": format!("user{id}")})))
    }

    let app = Router::new()
        .route("/oauth2/token", post(token))
        .route("/users/@me", get(me));
    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .expect("bind provider");
    let addr = listener.local_addr().expect("provider addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    format!("http://{addr}")
}

async fn seed(server: &TestServer) {
    let roles = vec![
        platform_role(ADMIN_ROLE, "Admin", ADMINISTRATOR),
        platform_role(MEMBER_ROLE, "Member", 0),
        platform_role(WEB_ADMIN_ROLE, "Web Admin", 0),
        platform_role(NEWCOMER_ROLE, "Newcomer", 0),
    ];
    server.platform.set_roles(roles.clone());
    let registry = RoleRegistry::new(&server.ctx);
    for role in roles {
        registry.upsert(role).await;
    }

    let mirror = MembershipMirror::new(&server.ctx);
    for (id, name, role) in [
        (ADMIN_ID, "Ada", Some(ADMIN_ROLE)),
        (MEMBER_ID, "Max", Some(MEMBER_ROLE)),
        (STRANGER_ID, "Sam", None),
        (MANAGER_ID, "Mia", Some(WEB_ADMIN_ROLE)),
    ] {
        let member = PlatformMember::new(
            MemberId::new(id),
            Some(name),
            role.map(RoleId::new).into_iter(),
        );
        server.platform.add_member(member.clone());
        mirror.upsert(member).await;
    }

    server
        .ctx
        .settings()
        .set_login_role_ids(&[RoleId::new(MEMBER_ROLE)])
        .await
        .expect("seed login roles");
}

/// Role list form body
#[derive(Debug, Serialize)]
pub struct RoleIdsForm {
    pub role_ids: Vec<String>,
}

impl RoleIdsForm {
    pub fn of(ids: &[&str]) -> Self {
        Self {
            role_ids: ids.iter().map(|id| (*id).to_string()).collect(),
        }
    }
}

/// Birthday settings form body
#[derive(Debug, Default, Serialize)]
pub struct BirthdaySettingsForm {
    pub category_id: Option<String>,
    pub channel_format: Option<String>,
    pub role_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AccessBody {
    pub is_admin: bool,
    pub can_manage_access: bool,
    pub can_login: bool,
}

#[derive(Debug, Deserialize)]
pub struct ViewerBody {
    pub id: String,
    pub display_name: String,
    pub access: AccessBody,
}

#[derive(Debug, Deserialize)]
pub struct AnnouncementsBody {
    pub viewer: ViewerBody,
}

#[derive(Debug, Deserialize)]
pub struct BoardEntryBody {
    pub user_id: String,
    pub direction: String,
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
pub struct AttendanceBody {
    pub viewer: ViewerBody,
    pub board: Vec<BoardEntryBody>,
    pub history: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct RoleListBody {
    pub role_ids: Vec<String>,
    pub roles: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct BirthdaySettingsBody {
    pub category_id: Option<String>,
    pub channel_format: String,
    pub role_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetailBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetailBody,
}
