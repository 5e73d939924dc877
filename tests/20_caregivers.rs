mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;
use uuid::Uuid;

use carefull_api::database::CaregiverRepository;
use common::{read, TestApp, PUBLIC_URL};

#[tokio::test]
async fn invite_provisions_caregiver_and_sends_email() -> Result<()> {
    let app = TestApp::spawn().await?;
    let family = Uuid::new_v4();
    let admin = app.admin(family, "boss@x.com").await?;

    let (status, body) = read(
        app.post(
            "/api/admin/caregivers/invite",
            &admin.token,
            json!({ "email": "  Jane@X.com ", "full_name": " Jane Admin ", "phone": "" }),
        )
        .await?,
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["caregiver"]["email"], "jane@x.com");
    assert_eq!(body["caregiver"]["full_name"], "Jane Admin");
    assert!(body["caregiver"]["phone"].is_null());
    assert_eq!(body["caregiver"]["is_active"], true);
    assert_eq!(body["redirect_to"], format!("{}/accept-invite", PUBLIC_URL));

    let invited = app.identity.find_by_email("jane@x.com").await.expect("identity");
    assert_eq!(body["invited_user_id"], invited.id.to_string());
    let metadata = app.identity.metadata(invited.id).await.expect("metadata");
    assert_eq!(metadata["role"], "caregiver");
    assert_eq!(metadata["full_name"], "Jane Admin");

    let sent = app.identity.invitations().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].redirect_to, format!("{}/accept-invite", PUBLIC_URL));

    // The invitee can sign in as a caregiver of the family
    let token = app.identity.token_for(invited.id).await?;
    let (status, me) = read(app.get("/api/me", &token).await?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["role"], "caregiver");
    assert_eq!(me["family_id"], family.to_string());
    assert_eq!(me["caregiver_id"], body["caregiver"]["id"]);

    let (status, list) = read(app.get("/api/admin/caregivers/list", &admin.token).await?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["caregivers"].as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn invite_requires_email_and_name() -> Result<()> {
    let app = TestApp::spawn().await?;
    let admin = app.admin(Uuid::new_v4(), "boss@x.com").await?;

    let (status, body) = read(
        app.post(
            "/api/admin/caregivers/invite",
            &admin.token,
            json!({ "email": "jane@x.com", "full_name": "   " }),
        )
        .await?,
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["field_errors"]["full_name"].is_string());

    let (status, body) = read(
        app.post(
            "/api/admin/caregivers/invite",
            &admin.token,
            json!({ "full_name": "Jane" }),
        )
        .await?,
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["field_errors"]["email"].is_string());
    assert!(app.identity.invitations().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn malformed_body_is_invalid_json() -> Result<()> {
    let app = TestApp::spawn().await?;
    let admin = app.admin(Uuid::new_v4(), "boss@x.com").await?;

    let resp = app
        .raw()
        .post(app.url("/api/admin/caregivers/invite"))
        .bearer_auth(&admin.token)
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await?;
    let (status, body) = read(resp).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_JSON");
    assert!(body["error"].is_string());
    Ok(())
}

#[tokio::test]
async fn failed_store_write_removes_invited_identity() -> Result<()> {
    let app = TestApp::spawn().await?;
    let family = Uuid::new_v4();
    let admin = app.admin(family, "boss@x.com").await?;

    app.store.fail_writes(true);
    let (status, body) = read(
        app.post(
            "/api/admin/caregivers/invite",
            &admin.token,
            json!({ "email": "jane@x.com", "full_name": "Jane" }),
        )
        .await?,
    )
    .await?;
    app.store.fail_writes(false);

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "UPSTREAM_FAILURE");
    assert!(app.identity.find_by_email("jane@x.com").await.is_none());
    assert!(app.store.list_caregivers(family).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn identity_rejection_is_reported_without_writing() -> Result<()> {
    let app = TestApp::spawn().await?;
    let family = Uuid::new_v4();
    let admin = app.admin(family, "boss@x.com").await?;

    app.identity.reject_invites(true);
    let (status, body) = read(
        app.post(
            "/api/admin/caregivers/invite",
            &admin.token,
            json!({ "email": "jane@x.com", "full_name": "Jane" }),
        )
        .await?,
    )
    .await?;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "UPSTREAM_FAILURE");
    assert!(app.store.list_caregivers(family).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn phone_only_update_keeps_other_fields() -> Result<()> {
    let app = TestApp::spawn().await?;
    let family = Uuid::new_v4();
    let admin = app.admin(family, "boss@x.com").await?;
    let caregiver = app.caregiver(family, "cg@x.com", "Cara Giver").await?;

    let (status, body) = read(
        app.patch(
            "/api/admin/caregivers/update",
            &admin.token,
            json!({ "caregiver_id": caregiver.caregiver_id, "phone": "555-0100" }),
        )
        .await?,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["caregiver"]["phone"], "555-0100");
    assert_eq!(body["caregiver"]["full_name"], "Cara Giver");
    assert_eq!(body["caregiver"]["email"], "cg@x.com");
    assert_eq!(body["caregiver"]["is_active"], true);

    // null clears the phone again; `id` is accepted as the key
    let (status, body) = read(
        app.patch(
            "/api/admin/caregivers/update",
            &admin.token,
            json!({ "id": caregiver.caregiver_id, "phone": null }),
        )
        .await?,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["caregiver"]["phone"].is_null());
    Ok(())
}

#[tokio::test]
async fn null_full_name_is_rejected() -> Result<()> {
    let app = TestApp::spawn().await?;
    let family = Uuid::new_v4();
    let admin = app.admin(family, "boss@x.com").await?;
    let caregiver = app.caregiver(family, "cg@x.com", "Cara Giver").await?;

    let (status, body) = read(
        app.patch(
            "/api/admin/caregivers/update",
            &admin.token,
            json!({ "caregiver_id": caregiver.caregiver_id, "full_name": null }),
        )
        .await?,
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    Ok(())
}

#[tokio::test]
async fn cross_family_update_is_not_found() -> Result<()> {
    let app = TestApp::spawn().await?;
    let admin = app.admin(Uuid::new_v4(), "boss@x.com").await?;
    let other_family = Uuid::new_v4();
    let foreign = app.caregiver(other_family, "cg@y.com", "Foreign Carer").await?;

    let (status, body) = read(
        app.patch(
            "/api/admin/caregivers/update",
            &admin.token,
            json!({ "caregiver_id": foreign.caregiver_id, "full_name": "Hijacked" }),
        )
        .await?,
    )
    .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let untouched = app.store.list_caregivers(other_family).await?;
    assert_eq!(untouched[0].full_name, "Foreign Carer");
    Ok(())
}

#[tokio::test]
async fn list_shows_only_own_family() -> Result<()> {
    let app = TestApp::spawn().await?;
    let family = Uuid::new_v4();
    let admin = app.admin(family, "boss@x.com").await?;
    let local = app.caregiver(family, "cg@x.com", "Local Carer").await?;
    app.caregiver(Uuid::new_v4(), "cg@y.com", "Foreign Carer").await?;

    let (status, body) = read(app.get("/api/admin/caregivers/list", &admin.token).await?).await?;
    assert_eq!(status, StatusCode::OK);
    let caregivers = body["caregivers"].as_array().unwrap();
    assert_eq!(caregivers.len(), 1);
    assert_eq!(caregivers[0]["id"], local.caregiver_id.unwrap().to_string());
    assert_eq!(caregivers[0]["full_name"], "Local Carer");

    let empty = app.admin(Uuid::new_v4(), "lonely@z.com").await?;
    let (status, body) = read(app.get("/api/admin/caregivers/list", &empty.token).await?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "caregivers": [] }));
    Ok(())
}

#[tokio::test]
async fn deactivated_caregiver_loses_access() -> Result<()> {
    let app = TestApp::spawn().await?;
    let family = Uuid::new_v4();
    let admin = app.admin(family, "boss@x.com").await?;
    let caregiver = app.caregiver(family, "cg@x.com", "Cara Giver").await?;

    let (status, body) = read(
        app.patch(
            "/api/admin/caregivers/update",
            &admin.token,
            json!({ "caregiver_id": caregiver.caregiver_id, "is_active": false }),
        )
        .await?,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["caregiver"]["is_active"], false);

    let (status, _) = read(app.get("/api/logs/list", &caregiver.token).await?).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}
