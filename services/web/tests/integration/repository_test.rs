use nippo_core::pagination::PageRequest;
use nippo_web::domain::repository::EmployeeRepository;
use nippo_web::domain::types::{EmployeeFilter, EmployeeStatus, Role};
use nippo_web::error::EmployeeServiceError;
use nippo_web::infra::db::DbEmployeeRepository;
use nippo_web::usecase::auth::AuthenticateUseCase;
use nippo_web::usecase::employee::BootstrapAdminUseCase;

use crate::helpers::{TEST_PASSWORD, seed, test_db};

#[tokio::test]
async fn should_assign_increasing_ids() {
    let db = test_db().await;
    let first = seed(&db, "E001", Role::Admin, EmployeeStatus::Active).await;
    let second = seed(&db, "E002", Role::General, EmployeeStatus::Active).await;

    assert!(second.id > first.id);
    assert_eq!(first.updated_at, first.created_at);
}

#[tokio::test]
async fn should_list_newest_first_excluding_deleted() {
    let db = test_db().await;
    seed(&db, "E001", Role::Admin, EmployeeStatus::Active).await;
    seed(&db, "E002", Role::General, EmployeeStatus::Deleted).await;
    seed(&db, "E003", Role::General, EmployeeStatus::Active).await;
    let repo = DbEmployeeRepository { db };

    let active = repo
        .list(EmployeeFilter::Active, PageRequest::new(1, 15))
        .await
        .unwrap();
    let codes: Vec<_> = active.iter().map(|e| e.code.as_str()).collect();
    assert_eq!(codes, vec!["E003", "E001"]);

    assert_eq!(repo.count(EmployeeFilter::Active).await.unwrap(), 2);
    assert_eq!(repo.count(EmployeeFilter::All).await.unwrap(), 3);
}

#[tokio::test]
async fn should_page_with_offset_and_limit() {
    let db = test_db().await;
    for n in 1..=5 {
        seed(&db, &format!("E{n:03}"), Role::General, EmployeeStatus::Active).await;
    }
    let repo = DbEmployeeRepository { db };

    let page = repo
        .list(EmployeeFilter::Active, PageRequest::new(2, 2))
        .await
        .unwrap();
    let codes: Vec<_> = page.iter().map(|e| e.code.as_str()).collect();
    assert_eq!(codes, vec!["E003", "E002"]);
}

#[tokio::test]
async fn should_count_code_regardless_of_delete_flag() {
    let db = test_db().await;
    seed(&db, "E001", Role::General, EmployeeStatus::Deleted).await;
    let repo = DbEmployeeRepository { db };

    assert_eq!(repo.count_by_code("E001").await.unwrap(), 1);
    assert_eq!(repo.count_by_code("E999").await.unwrap(), 0);
}

#[tokio::test]
async fn should_find_only_active_employee_by_code() {
    let db = test_db().await;
    seed(&db, "E001", Role::General, EmployeeStatus::Active).await;
    seed(&db, "E002", Role::General, EmployeeStatus::Deleted).await;
    let repo = DbEmployeeRepository { db };

    assert!(repo.find_active_by_code("E001").await.unwrap().is_some());
    assert!(repo.find_active_by_code("E002").await.unwrap().is_none());
}

#[tokio::test]
async fn should_persist_update_but_keep_created_at() {
    let db = test_db().await;
    let mut employee = seed(&db, "E001", Role::General, EmployeeStatus::Active).await;
    let repo = DbEmployeeRepository { db };

    employee.name = "Renamed".into();
    employee.role = Role::Admin;
    employee.updated_at = employee.created_at + chrono::Duration::minutes(5);
    repo.update(&employee).await.unwrap();

    let stored = repo.find_by_id(employee.id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Renamed");
    assert_eq!(stored.role, Role::Admin);
    assert_eq!(stored.created_at, employee.created_at);
    assert!(stored.updated_at > stored.created_at);
}

// ── Authentication against the database ──────────────────────────────────────

#[tokio::test]
async fn should_authenticate_active_e001() {
    let db = test_db().await;
    seed(&db, "E001", Role::Admin, EmployeeStatus::Active).await;

    let usecase = AuthenticateUseCase {
        repo: DbEmployeeRepository { db },
    };
    let employee = usecase.execute("E001", TEST_PASSWORD).await.unwrap();
    assert_eq!(employee.code, "E001");
    assert!(employee.is_admin());
}

#[tokio::test]
async fn should_not_authenticate_deleted_e001() {
    let db = test_db().await;
    seed(&db, "E001", Role::Admin, EmployeeStatus::Deleted).await;

    let usecase = AuthenticateUseCase {
        repo: DbEmployeeRepository { db },
    };
    let result = usecase.execute("E001", TEST_PASSWORD).await;
    assert!(matches!(result, Err(EmployeeServiceError::InvalidCredentials)));
}

#[tokio::test]
async fn should_bootstrap_admin_who_can_log_in() {
    let db = test_db().await;
    let bootstrap = BootstrapAdminUseCase {
        repo: DbEmployeeRepository { db: db.clone() },
    };

    let admin = bootstrap
        .execute("A001", "Administrator", "first-pass")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(admin.role, Role::Admin);
    assert_ne!(admin.password_hash, "first-pass");

    let auth = AuthenticateUseCase {
        repo: DbEmployeeRepository { db },
    };
    let employee = auth.execute("A001", "first-pass").await.unwrap();
    assert_eq!(employee.id, admin.id);
}

#[tokio::test]
async fn should_bootstrap_only_once() {
    let db = test_db().await;
    let bootstrap = BootstrapAdminUseCase {
        repo: DbEmployeeRepository { db: db.clone() },
    };

    assert!(bootstrap.execute("A001", "Administrator", "first-pass").await.unwrap().is_some());
    assert!(bootstrap.execute("A002", "Other", "second-pass").await.unwrap().is_none());
    assert_eq!(bootstrap.repo.count(EmployeeFilter::All).await.unwrap(), 1);
}

#[tokio::test]
async fn should_not_bootstrap_over_deleted_employees() {
    let db = test_db().await;
    seed(&db, "E001", Role::General, EmployeeStatus::Deleted).await;
    let bootstrap = BootstrapAdminUseCase {
        repo: DbEmployeeRepository { db },
    };

    assert!(bootstrap.execute("A001", "Administrator", "first-pass").await.unwrap().is_none());
    assert!(bootstrap.repo.find_active_by_code("A001").await.unwrap().is_none());
}
