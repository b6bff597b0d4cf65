use axum::Router;
use axum::http::StatusCode;
use tower::ServiceExt;

use nippo_web::domain::repository::EmployeeRepository;
use nippo_web::domain::types::{EmployeeStatus, Role};
use nippo_web::infra::db::DbEmployeeRepository;

use crate::helpers::{
    TEST_PASSWORD, body_text, form_token, get, location, post_form, seed, session_cookie,
    test_app, test_db,
};

/// Open a session on the login page, log in, and return the session cookie.
async fn login(app: &Router, code: &str) -> String {
    let response = app
        .clone()
        .oneshot(get("/?action=Auth&command=showLogin", None))
        .await
        .unwrap();
    let cookie = session_cookie(&response);
    let token = form_token(&body_text(response).await);

    let form = format!("code={code}&password={TEST_PASSWORD}&token={token}");
    let response = app
        .clone()
        .oneshot(post_form("/?action=Auth&command=login", Some(&cookie), &form))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/?action=Top&command=index");
    session_cookie(&response)
}

/// Fetch a page with a form and return its anti-forgery token.
async fn token_from(app: &Router, uri: &str, cookie: &str) -> String {
    let response = app.clone().oneshot(get(uri, Some(cookie))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    form_token(&body_text(response).await)
}

// ── Routing ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_answer_health_checks() {
    let app = test_app(test_db().await);

    let response = app.clone().oneshot(get("/healthz", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let response = app.oneshot(get("/readyz", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn should_redirect_anonymous_top_to_login() {
    let app = test_app(test_db().await);

    let response = app.oneshot(get("/", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/?action=Auth&command=showLogin");
    assert!(session_cookie(&response).starts_with("nippo_session="));
}

#[tokio::test]
async fn should_render_error_view_for_unknown_command() {
    let app = test_app(test_db().await);

    let response = app
        .oneshot(get("/?action=Employee&command=getClass", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("Something went wrong"));
}

#[tokio::test]
async fn should_render_error_view_for_unknown_action() {
    let app = test_app(test_db().await);

    let response = app
        .oneshot(get("/?action=Report&command=index", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ── Login ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_login_with_wrong_token() {
    let db = test_db().await;
    seed(&db, "E001", Role::Admin, EmployeeStatus::Active).await;
    let app = test_app(db);

    let response = app
        .clone()
        .oneshot(get("/?action=Auth&command=showLogin", None))
        .await
        .unwrap();
    let cookie = session_cookie(&response);

    let form = format!("code=E001&password={TEST_PASSWORD}&token=forged");
    let response = app
        .oneshot(post_form("/?action=Auth&command=login", Some(&cookie), &form))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(body_text(response).await.contains("Something went wrong"));
}

#[tokio::test]
async fn should_rerender_login_on_bad_password() {
    let db = test_db().await;
    seed(&db, "E001", Role::Admin, EmployeeStatus::Active).await;
    let app = test_app(db);

    let response = app
        .clone()
        .oneshot(get("/?action=Auth&command=showLogin", None))
        .await
        .unwrap();
    let cookie = session_cookie(&response);
    let token = form_token(&body_text(response).await);

    let form = format!("code=E001&password=wrong&token={token}");
    let response = app
        .oneshot(post_form("/?action=Auth&command=login", Some(&cookie), &form))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Employee code or password is incorrect."));
    assert!(html.contains(r#"value="E001""#));
}

#[tokio::test]
async fn should_rotate_session_and_flash_on_login() {
    let db = test_db().await;
    seed(&db, "E001", Role::Admin, EmployeeStatus::Active).await;
    let app = test_app(db);

    let response = app
        .clone()
        .oneshot(get("/?action=Auth&command=showLogin", None))
        .await
        .unwrap();
    let anonymous = session_cookie(&response);

    let cookie = login(&app, "E001").await;
    assert_ne!(cookie, anonymous);

    let response = app
        .clone()
        .oneshot(get("/?action=Top&command=index", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Logged in."));
    assert!(html.contains("Welcome, Employee E001"));

    // The flash message is shown once.
    let response = app
        .oneshot(get("/?action=Top&command=index", Some(&cookie)))
        .await
        .unwrap();
    assert!(!body_text(response).await.contains("Logged in."));
}

#[tokio::test]
async fn should_not_log_in_deleted_employee() {
    let db = test_db().await;
    seed(&db, "E001", Role::Admin, EmployeeStatus::Deleted).await;
    let app = test_app(db);

    let response = app
        .clone()
        .oneshot(get("/?action=Auth&command=showLogin", None))
        .await
        .unwrap();
    let cookie = session_cookie(&response);
    let token = form_token(&body_text(response).await);

    let form = format!("code=E001&password={TEST_PASSWORD}&token={token}");
    let response = app
        .oneshot(post_form("/?action=Auth&command=login", Some(&cookie), &form))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("incorrect"));
}

#[tokio::test]
async fn should_send_logged_in_visitor_from_login_page_to_top() {
    let db = test_db().await;
    seed(&db, "E001", Role::General, EmployeeStatus::Active).await;
    let app = test_app(db);
    let cookie = login(&app, "E001").await;

    let response = app
        .oneshot(get("/?action=Auth&command=showLogin", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/?action=Top&command=index");
}

#[tokio::test]
async fn should_log_out() {
    let db = test_db().await;
    seed(&db, "E001", Role::General, EmployeeStatus::Active).await;
    let app = test_app(db);
    let cookie = login(&app, "E001").await;

    let token = token_from(&app, "/?action=Top&command=index", &cookie).await;

    let response = app
        .clone()
        .oneshot(post_form(
            "/?action=Auth&command=logout",
            Some(&cookie),
            &format!("token={token}"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/?action=Auth&command=showLogin");

    let response = app
        .oneshot(get("/?action=Top&command=index", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
}

#[tokio::test]
async fn should_keep_session_on_logout_without_token() {
    let db = test_db().await;
    seed(&db, "E001", Role::General, EmployeeStatus::Active).await;
    let app = test_app(db);
    let cookie = login(&app, "E001").await;

    let response = app
        .clone()
        .oneshot(get("/?action=Auth&command=logout", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(get("/?action=Top&command=index", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// ── Employee management ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_forbid_general_employee_from_management() {
    let db = test_db().await;
    seed(&db, "E001", Role::General, EmployeeStatus::Active).await;
    let app = test_app(db);
    let cookie = login(&app, "E001").await;

    let response = app
        .oneshot(get("/?action=Employee&command=index", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn should_register_employee_and_list_it() {
    let db = test_db().await;
    seed(&db, "E001", Role::Admin, EmployeeStatus::Active).await;
    let app = test_app(db);
    let cookie = login(&app, "E001").await;
    let token = token_from(&app, "/?action=Employee&command=entryNew", &cookie).await;

    let form = format!("code=E777&name=Saburo&password=secret&admin_flag=0&token={token}");
    let response = app
        .clone()
        .oneshot(post_form("/?action=Employee&command=create", Some(&cookie), &form))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/?action=Employee&command=index");

    let response = app
        .oneshot(get("/?action=Employee&command=index", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("E777"));
    assert!(html.contains("Registration completed."));
}

#[tokio::test]
async fn should_rerender_form_with_validation_messages() {
    let db = test_db().await;
    seed(&db, "E001", Role::Admin, EmployeeStatus::Active).await;
    let app = test_app(db);
    let cookie = login(&app, "E001").await;
    let token = token_from(&app, "/?action=Employee&command=entryNew", &cookie).await;

    let form = format!("code=E001&name=&password=secret&admin_flag=0&token={token}");
    let response = app
        .oneshot(post_form("/?action=Employee&command=create", Some(&cookie), &form))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("An employee with that code already exists."));
    assert!(html.contains("Name is required."));
}

#[tokio::test]
async fn should_reject_create_without_token() {
    let db = test_db().await;
    seed(&db, "E001", Role::Admin, EmployeeStatus::Active).await;
    let app = test_app(db);
    let cookie = login(&app, "E001").await;

    let form = "code=E777&name=Saburo&password=secret&admin_flag=0";
    let response = app
        .oneshot(post_form("/?action=Employee&command=create", Some(&cookie), form))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn should_show_edit_and_destroy_employee() {
    let db = test_db().await;
    seed(&db, "E001", Role::Admin, EmployeeStatus::Active).await;
    let target = seed(&db, "E002", Role::General, EmployeeStatus::Active).await;
    let app = test_app(db);
    let cookie = login(&app, "E001").await;

    let response = app
        .clone()
        .oneshot(get(
            &format!("/?action=Employee&command=show&id={}", target.id),
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Employee E002"));

    let edit = format!("/?action=Employee&command=edit&id={}", target.id);
    let token = token_from(&app, &edit, &cookie).await;
    let form = format!(
        "id={}&code=E002&name=Renamed&password=&admin_flag=1&token={token}",
        target.id
    );
    let response = app
        .clone()
        .oneshot(post_form("/?action=Employee&command=update", Some(&cookie), &form))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);

    let form = format!("id={}&token={token}", target.id);
    let response = app
        .clone()
        .oneshot(post_form("/?action=Employee&command=destroy", Some(&cookie), &form))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);

    let response = app
        .oneshot(get(
            &format!("/?action=Employee&command=show&id={}", target.id),
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_reject_non_numeric_id() {
    let db = test_db().await;
    seed(&db, "E001", Role::Admin, EmployeeStatus::Active).await;
    let app = test_app(db);
    let cookie = login(&app, "E001").await;

    let response = app
        .oneshot(get("/?action=Employee&command=show&id=abc", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn should_log_out_admin_who_deleted_themselves() {
    let db = test_db().await;
    let admin = seed(&db, "E001", Role::Admin, EmployeeStatus::Active).await;
    let app = test_app(db.clone());
    let cookie = login(&app, "E001").await;
    let token = token_from(&app, "/?action=Employee&command=entryNew", &cookie).await;

    let form = format!("id={}&token={token}", admin.id);
    let response = app
        .clone()
        .oneshot(post_form("/?action=Employee&command=destroy", Some(&cookie), &form))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);

    let form = format!("code=E777&name=Saburo&password=secret&admin_flag=1&token={token}");
    let response = app
        .clone()
        .oneshot(post_form("/?action=Employee&command=create", Some(&cookie), &form))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/?action=Auth&command=showLogin");

    let repo = DbEmployeeRepository { db };
    assert_eq!(repo.count_by_code("E777").await.unwrap(), 0);

    let response = app
        .oneshot(get("/?action=Top&command=index", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/?action=Auth&command=showLogin");
}

#[tokio::test]
async fn should_apply_demotion_to_open_session() {
    let db = test_db().await;
    let admin = seed(&db, "E001", Role::Admin, EmployeeStatus::Active).await;
    let app = test_app(db);
    let cookie = login(&app, "E001").await;

    let edit = format!("/?action=Employee&command=edit&id={}", admin.id);
    let token = token_from(&app, &edit, &cookie).await;
    let form = format!(
        "id={}&code=E001&name=Demoted&password=&admin_flag=0&token={token}",
        admin.id
    );
    let response = app
        .clone()
        .oneshot(post_form("/?action=Employee&command=update", Some(&cookie), &form))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);

    let response = app
        .clone()
        .oneshot(get("/?action=Employee&command=index", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(get("/?action=Top&command=index", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Welcome, Demoted"));
}
