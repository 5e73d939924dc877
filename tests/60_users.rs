mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;
use uuid::Uuid;

use carefull_api::database::ProfileRepository;
use common::{read, TestApp, PUBLIC_URL};

#[tokio::test]
async fn list_returns_family_admins_by_name() -> Result<()> {
    let app = TestApp::spawn().await?;
    let family = Uuid::new_v4();
    let boss = app.admin(family, "zed@x.com").await?;
    app.admin(family, "amy@x.com").await?;
    app.admin(Uuid::new_v4(), "elsewhere@y.com").await?;
    app.caregiver(family, "cg@x.com", "Cara").await?;

    let (status, body) = read(app.get("/api/admin/users/list", &boss.token).await?).await?;
    assert_eq!(status, StatusCode::OK);
    let emails: Vec<&str> = body["admins"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["email"].as_str().unwrap())
        .collect();
    assert_eq!(emails, vec!["amy@x.com", "zed@x.com"]);
    Ok(())
}

#[tokio::test]
async fn create_adds_an_admin_who_can_sign_in() -> Result<()> {
    let app = TestApp::spawn().await?;
    let family = Uuid::new_v4();
    let boss = app.admin(family, "boss@x.com").await?;

    let (status, body) = read(
        app.post(
            "/api/admin/users/create",
            &boss.token,
            json!({ "email": "New@X.com", "full_name": "New Admin", "temp_password": "s3cret!" }),
        )
        .await?,
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["role"], "admin");
    assert_eq!(body["user"]["is_active"], true);
    assert_eq!(body["user"]["email"], "new@x.com");
    assert_eq!(body["user"]["family_id"], family.to_string());

    let created = app.identity.find_by_email("new@x.com").await.expect("identity");
    assert_eq!(body["user"]["user_id"], created.id.to_string());
    assert_eq!(
        app.identity.metadata(created.id).await.expect("metadata")["full_name"],
        "New Admin"
    );

    let token = app.identity.token_for(created.id).await?;
    let (status, _) = read(app.get("/api/admin/clients/list", &token).await?).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn create_removes_identity_when_profile_write_fails() -> Result<()> {
    let app = TestApp::spawn().await?;
    let boss = app.admin(Uuid::new_v4(), "boss@x.com").await?;

    app.store.fail_writes(true);
    let (status, body) = read(
        app.post(
            "/api/admin/users/create",
            &boss.token,
            json!({ "email": "new@x.com", "full_name": "New Admin" }),
        )
        .await?,
    )
    .await?;
    app.store.fail_writes(false);

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "UPSTREAM_FAILURE");
    assert!(app.identity.find_by_email("new@x.com").await.is_none());
    Ok(())
}

#[tokio::test]
async fn update_renames_and_guards_self_deactivation() -> Result<()> {
    let app = TestApp::spawn().await?;
    let family = Uuid::new_v4();
    let boss = app.admin(family, "boss@x.com").await?;
    let other = app.admin(family, "other@x.com").await?;
    let foreign = app.admin(Uuid::new_v4(), "far@y.com").await?;

    let (status, body) = read(
        app.patch(
            "/api/admin/users/update",
            &boss.token,
            json!({ "user_id": boss.user_id, "is_active": false }),
        )
        .await?,
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    let still = app.store.find_profile(boss.user_id).await?.expect("profile");
    assert!(still.is_active);

    let (status, body) = read(
        app.patch(
            "/api/admin/users/update",
            &boss.token,
            json!({ "user_id": other.user_id, "full_name": "Renamed" }),
        )
        .await?,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["full_name"], "Renamed");
    assert_eq!(body["user"]["is_active"], true);

    let (status, _) = read(
        app.patch(
            "/api/admin/users/update",
            &boss.token,
            json!({ "user_id": foreign.user_id, "full_name": "Stolen" }),
        )
        .await?,
    )
    .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn reset_password_targets_family_members_only() -> Result<()> {
    let app = TestApp::spawn().await?;
    let family = Uuid::new_v4();
    let boss = app.admin(family, "boss@x.com").await?;
    app.caregiver(family, "cg@x.com", "Cara").await?;
    app.admin(Uuid::new_v4(), "far@y.com").await?;

    let (status, body) = read(
        app.post(
            "/api/admin/users/reset-password",
            &boss.token,
            json!({ "email": " CG@x.com " }),
        )
        .await?,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reset"]["email"], "cg@x.com");
    assert_eq!(body["reset"]["redirect_to"], format!("{}/login", PUBLIC_URL));

    let (status, _) = read(
        app.post(
            "/api/admin/users/reset-password",
            &boss.token,
            json!({ "email": "far@y.com" }),
        )
        .await?,
    )
    .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let sent = app.identity.password_resets().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].email, "cg@x.com");
    Ok(())
}
