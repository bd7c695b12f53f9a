//! Dashboard integration tests
//!
//! Each test starts its own server over an in-memory database, so no
//! external services are needed.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_json, assert_redirect, assert_status, cookie_pair, fixtures::*, is_removal,
    set_cookie, set_cookies, TestServer, OAUTH_STATE_COOKIE, SESSION_COOKIE,
};
use reqwest::StatusCode;
use roster_core::{MemberId, RoleId};

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready_with_bot_offline() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(body["checks"]["database"], "healthy");
    assert_eq!(body["checks"]["bot"], "offline");
}

// ============================================================================
// Session Gate Tests
// ============================================================================

#[tokio::test]
async fn test_root_redirects_to_announcements() {
    let server = TestServer::start().await.unwrap();
    let response = server.get("/").await.unwrap();
    assert_redirect(&response, "/announcements");
}

#[tokio::test]
async fn test_gated_routes_redirect_to_login() {
    let server = TestServer::start().await.unwrap();

    for path in ["/announcements", "/attendance", "/status", "/members", "/auto-role"] {
        let response = server.get(path).await.unwrap();
        assert_redirect(&response, "/login");
    }
}

#[tokio::test]
async fn test_forged_session_redirects_to_login() {
    let server = TestServer::start().await.unwrap();
    let cookie = format!("{SESSION_COOKIE}=not-a-token");

    let response = server.get_as("/attendance", &cookie).await.unwrap();
    assert_redirect(&response, "/login");
}

#[tokio::test]
async fn test_stranger_session_is_revoked() {
    let server = seeded_server().await;
    let cookie = server.session_cookie(STRANGER_ID, "Sam").unwrap();

    let response = server.get_as("/announcements", &cookie).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let cleared = set_cookie(&response, SESSION_COOKIE).expect("session cookie cleared");
    assert!(cleared.contains("Max-Age=0"));

    let body: ErrorBody = response.json().await.unwrap();
    assert_eq!(body.error.code, "ACCESS_REVOKED");
}

#[tokio::test]
async fn test_session_revoked_after_login_role_removed() {
    let server = seeded_server().await;
    let cookie = server.session_cookie(MEMBER_ID, "Max").unwrap();

    let response = server.get_as("/announcements", &cookie).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    server.ctx.settings().set_login_role_ids(&[]).await.unwrap();

    let response = server.get_as("/announcements", &cookie).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ============================================================================
// Page Tests
// ============================================================================

#[tokio::test]
async fn test_announcements_show_viewer_access() {
    let server = seeded_server().await;
    let cookie = server.session_cookie(ADMIN_ID, "Ada").unwrap();

    let response = server.get_as("/announcements", &cookie).await.unwrap();
    let body: AnnouncementsBody = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(body.viewer.id, ADMIN_ID);
    assert_eq!(body.viewer.display_name, "Ada");
    assert!(body.viewer.access.is_admin);
    assert!(body.viewer.access.can_login);
    assert!(!body.viewer.access.can_manage_access);
}

#[tokio::test]
async fn test_check_in_and_out() {
    let server = seeded_server().await;
    let cookie = server.session_cookie(MEMBER_ID, "Max").unwrap();

    let response = server.post_as("/checkin", &cookie).await.unwrap();
    assert_redirect(&response, "/attendance");

    let response = server.get_as("/attendance", &cookie).await.unwrap();
    let body: AttendanceBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body.viewer.id, MEMBER_ID);
    assert_eq!(body.board.len(), 1);
    assert_eq!(body.board[0].user_id, MEMBER_ID);
    assert_eq!(body.board[0].direction, "in");
    assert_eq!(body.board[0].display_name, "Max");

    let response = server.post_as("/checkout", &cookie).await.unwrap();
    assert_redirect(&response, "/attendance");

    let response = server.get_as("/attendance", &cookie).await.unwrap();
    let body: AttendanceBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body.board[0].direction, "out");
    assert_eq!(body.history.len(), 2);
}

#[tokio::test]
async fn test_status_requires_admin() {
    let server = seeded_server().await;

    let member = server.session_cookie(MEMBER_ID, "Max").unwrap();
    let response = server.get_as("/status", &member).await.unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(body.error.code, "MISSING_PERMISSIONS");

    let admin = server.session_cookie(ADMIN_ID, "Ada").unwrap();
    let response = server.get_as("/status", &admin).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_member_detail() {
    let server = seeded_server().await;
    let admin = server.session_cookie(ADMIN_ID, "Ada").unwrap();

    let response = server.get_as("/members", &admin).await.unwrap();
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["members"].as_array().map(Vec::len), Some(4));

    let response = server
        .get_as(&format!("/members/{MEMBER_ID}"), &admin)
        .await
        .unwrap();
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["access"]["can_login"], true);

    let response = server.get_as("/members/999999", &admin).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

// ============================================================================
// Admin Form Tests
// ============================================================================

#[tokio::test]
async fn test_update_auto_roles() {
    let server = seeded_server().await;
    let admin = server.session_cookie(ADMIN_ID, "Ada").unwrap();

    let response = server
        .post_json_as("/auto-role", &admin, &RoleIdsForm::of(&[NEWCOMER_ROLE]))
        .await
        .unwrap();
    let body: RoleListBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body.role_ids, vec![NEWCOMER_ROLE.to_string()]);
    assert_eq!(body.roles.len(), 4);

    assert_eq!(
        server.ctx.settings().auto_role_ids(),
        vec![RoleId::new(NEWCOMER_ROLE)]
    );
}

#[tokio::test]
async fn test_auto_roles_reject_malformed_ids() {
    let server = seeded_server().await;
    let admin = server.session_cookie(ADMIN_ID, "Ada").unwrap();

    let response = server
        .post_json_as("/auto-role", &admin, &RoleIdsForm::of(&["not-a-role"]))
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "VALIDATION_ERROR");
    assert!(server.ctx.settings().auto_role_ids().is_empty());
}

#[tokio::test]
async fn test_auto_roles_forbidden_for_members() {
    let server = seeded_server().await;
    let member = server.session_cookie(MEMBER_ID, "Max").unwrap();

    let response = server
        .post_json_as("/auto-role", &member, &RoleIdsForm::of(&[NEWCOMER_ROLE]))
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
    assert!(server.ctx.settings().auto_role_ids().is_empty());
}

#[tokio::test]
async fn test_login_roles_need_access_manager() {
    let server = seeded_server().await;

    // Administrators without the access-manager role are refused
    let admin = server.session_cookie(ADMIN_ID, "Ada").unwrap();
    let response = server.get_as("/login-roles", &admin).await.unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let manager = server.session_cookie(MANAGER_ID, "Mia").unwrap();
    let response = server
        .post_json_as(
            "/login-roles",
            &manager,
            &RoleIdsForm::of(&[MEMBER_ROLE, NEWCOMER_ROLE]),
        )
        .await
        .unwrap();
    let body: RoleListBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body.role_ids.len(), 2);

    let response = server.get_as("/login-roles", &manager).await.unwrap();
    let body: RoleListBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(body.role_ids.contains(&NEWCOMER_ROLE.to_string()));
}

#[tokio::test]
async fn test_update_birthday_settings() {
    let server = seeded_server().await;
    let admin = server.session_cookie(ADMIN_ID, "Ada").unwrap();

    let form = BirthdaySettingsForm {
        category_id: Some("555".to_string()),
        channel_format: Some("hbd-{user}".to_string()),
        role_id: Some(NEWCOMER_ROLE.to_string()),
    };
    let response = server
        .post_json_as("/birthday-settings", &admin, &form)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.get_as("/birthday-settings", &admin).await.unwrap();
    let body: BirthdaySettingsBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body.category_id.as_deref(), Some("555"));
    assert_eq!(body.channel_format, "hbd-{user}");
    assert_eq!(body.role_id.as_deref(), Some(NEWCOMER_ROLE));
}

// ============================================================================
// Login Flow Tests
// ============================================================================

#[tokio::test]
async fn test_login_without_oauth_config() {
    let server = TestServer::start().await.unwrap();
    let response = server.get("/login").await.unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::INTERNAL_SERVER_ERROR)
        .await
        .unwrap();
    assert_eq!(body.error.code, "CONFIG_ERROR");
}

#[tokio::test]
async fn test_callback_rejects_state_mismatch() {
    let server = TestServer::start().await.unwrap();
    let response = server
        .get_as(
            "/callback?code=abc&state=forged",
            "roster_oauth_state=expected",
        )
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "OAUTH_STATE_MISMATCH");
}

#[tokio::test]
async fn test_callback_without_state_cookie() {
    let server = TestServer::start().await.unwrap();
    let response = server.get("/callback?code=abc&state=any").await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

/// Run the callback leg of a login as `user_id` against the fake provider
async fn finish_login(server: &TestServer, user_id: &str) -> reqwest::Response {
    server
        .get_as(
            &format!("/callback?code={user_id}&state=nonce"),
            &format!("{OAUTH_STATE_COOKIE}=nonce"),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn test_callback_admits_member_with_login_role() {
    let server = seeded_server_with_provider().await;

    let response = finish_login(&server, MEMBER_ID).await;
    assert_redirect(&response, "/");

    let session = set_cookie(&response, SESSION_COOKIE).expect("session issued");
    assert!(!is_removal(&session));
    let state = set_cookie(&response, OAUTH_STATE_COOKIE).expect("state cookie cleared");
    assert!(is_removal(&state));

    let response = server
        .get_as("/announcements", cookie_pair(&session))
        .await
        .unwrap();
    let body: AnnouncementsBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body.viewer.id, MEMBER_ID);
}

#[tokio::test]
async fn test_callback_admits_web_admin_without_login_role() {
    let server = seeded_server_with_provider().await;

    let response = finish_login(&server, MANAGER_ID).await;
    assert_redirect(&response, "/");
    let session = set_cookie(&response, SESSION_COOKIE).expect("session issued");
    assert!(!is_removal(&session));
}

#[tokio::test]
async fn test_callback_refuses_member_without_access() {
    let server = seeded_server_with_provider().await;

    let response = finish_login(&server, STRANGER_ID).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let sessions = set_cookies(&response, SESSION_COOKIE);
    assert!(sessions.iter().all(|c| is_removal(c)));
    let state = set_cookie(&response, OAUTH_STATE_COOKIE).expect("state cookie cleared");
    assert!(is_removal(&state));

    let body: ErrorBody = response.json().await.unwrap();
    assert_eq!(body.error.code, "ACCESS_REVOKED");
}

#[tokio::test]
async fn test_callback_refuses_unknown_account() {
    let server = seeded_server_with_provider().await;

    let response = finish_login(&server, "9999").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(set_cookies(&response, SESSION_COOKIE)
        .iter()
        .all(|c| is_removal(c)));
}

#[tokio::test]
async fn test_logout_clears_session() {
    let server = seeded_server().await;
    let cookie = server.session_cookie(MEMBER_ID, "Max").unwrap();

    let response = server.get_as("/logout", &cookie).await.unwrap();
    assert_redirect(&response, "/");
    let cleared = set_cookie(&response, SESSION_COOKIE).expect("session cookie cleared");
    assert!(cleared.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_session_revoked_after_member_leaves() {
    let server = seeded_server().await;
    server
        .ctx
        .member_repo()
        .delete(&MemberId::new(MEMBER_ID))
        .await
        .unwrap();

    let cookie = server.session_cookie(MEMBER_ID, "Max").unwrap();
    let response = server.get_as("/attendance", &cookie).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
