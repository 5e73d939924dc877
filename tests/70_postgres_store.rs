// Store tests against a live Postgres. Skipped unless DATABASE_URL is set.

use anyhow::Result;
use chrono::NaiveDate;
use uuid::Uuid;

use carefull_api::config::DatabaseConfig;
use carefull_api::database::models::{
    CaregiverChanges, ClientChanges, ClientDetails, LogDraft, LogFilter, LogScope, NewCaregiver,
    NewClient, NewProfile, ProfileChanges,
};
use carefull_api::database::{
    AssignmentRepository, CaregiverRepository, ClientRepository, DatabaseManager, LogRepository,
    PgStore, ProfileRepository, Store,
};
use carefull_api::types::{Meals, Role, Visits, YesNo};

async fn store() -> Result<Option<PgStore>> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping Postgres store test");
        return Ok(None);
    };
    let config = DatabaseConfig {
        url: Some(url),
        max_connections: 2,
        connection_timeout: 10,
    };
    let pool = DatabaseManager::connect(&config).await?;
    DatabaseManager::migrate(&pool).await?;
    Ok(Some(PgStore::new(pool)))
}

fn new_caregiver(name: &str) -> NewCaregiver {
    NewCaregiver {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        full_name: name.to_string(),
        email: format!("{}@pg.test", name.to_lowercase()),
        phone: Some("555-0100".to_string()),
    }
}

fn new_client(name: &str) -> NewClient {
    NewClient {
        id: Uuid::new_v4(),
        full_name: name.to_string(),
        details: ClientDetails {
            dob: NaiveDate::from_ymd_opt(1940, 2, 3),
            medications: Some("Aspirin".to_string()),
            allergies: Some("Peanuts".to_string()),
            ..Default::default()
        },
    }
}

fn draft(client_id: Uuid, caregiver_id: Uuid, date: &str) -> LogDraft {
    LogDraft {
        client_id,
        caregiver_id,
        date: date.parse().unwrap(),
        bp: Some("120/80".to_string()),
        meals: Meals { b: YesNo::Yes, l: YesNo::No, d: YesNo::Yes },
        visits: Visits { ot: YesNo::No, pt: YesNo::No, n: YesNo::Yes },
        notes: None,
    }
}

#[tokio::test]
async fn caregiver_partial_update_and_clearing() -> Result<()> {
    let Some(store) = store().await? else { return Ok(()) };
    let family = Uuid::new_v4();
    let created = store.provision_caregiver(family, new_caregiver("Ann")).await?;

    let phone_only = CaregiverChanges {
        phone: Some(Some("555-0199".to_string())),
        ..Default::default()
    };
    let updated = store.update_caregiver(family, created.id, phone_only).await?.unwrap();
    assert_eq!(updated.phone.as_deref(), Some("555-0199"));
    assert_eq!(updated.full_name, "Ann");
    assert_eq!(updated.email, "ann@pg.test");
    assert!(updated.is_active);

    let clear = CaregiverChanges { phone: Some(None), ..Default::default() };
    let cleared = store.update_caregiver(family, created.id, clear).await?.unwrap();
    assert_eq!(cleared.phone, None);
    assert_eq!(cleared.full_name, "Ann");

    let unchanged = store
        .update_caregiver(family, created.id, CaregiverChanges::default())
        .await?
        .unwrap();
    assert_eq!(unchanged, cleared);
    Ok(())
}

#[tokio::test]
async fn caregiver_update_in_wrong_family_touches_nothing() -> Result<()> {
    let Some(store) = store().await? else { return Ok(()) };
    let family = Uuid::new_v4();
    let created = store.provision_caregiver(family, new_caregiver("Bea")).await?;

    let hijack = CaregiverChanges {
        full_name: Some("Mallory".to_string()),
        is_active: Some(false),
        ..Default::default()
    };
    assert!(store.update_caregiver(Uuid::new_v4(), created.id, hijack).await?.is_none());

    let found = store.find_caregiver(family, created.id).await?.unwrap();
    assert_eq!(found.full_name, "Bea");
    assert!(found.is_active);
    let profile = store.find_profile(created.user_id).await?.unwrap();
    assert!(profile.is_active);
    Ok(())
}

#[tokio::test]
async fn caregiver_deactivation_reaches_profile() -> Result<()> {
    let Some(store) = store().await? else { return Ok(()) };
    let family = Uuid::new_v4();
    let created = store.provision_caregiver(family, new_caregiver("Cy")).await?;

    let profile = store.find_profile(created.user_id).await?.unwrap();
    assert_eq!(profile.role, Role::Caregiver);
    assert_eq!(profile.family_id, Some(family));

    let off = CaregiverChanges { is_active: Some(false), ..Default::default() };
    store.update_caregiver(family, created.id, off).await?.unwrap();
    assert!(!store.find_profile(created.user_id).await?.unwrap().is_active);
    Ok(())
}

#[tokio::test]
async fn provisioning_takes_over_an_existing_profile() -> Result<()> {
    let Some(store) = store().await? else { return Ok(()) };
    let family = Uuid::new_v4();
    let caregiver = new_caregiver("Dee");
    store
        .insert_profile(NewProfile {
            user_id: caregiver.user_id,
            family_id: Uuid::new_v4(),
            role: Role::Admin,
            is_active: false,
            full_name: "Old Name".to_string(),
            email: "old@pg.test".to_string(),
        })
        .await?;

    let created = store.provision_caregiver(family, caregiver).await?;
    let profile = store.find_profile(created.user_id).await?.unwrap();
    assert_eq!(profile.family_id, Some(family));
    assert_eq!(profile.role, Role::Caregiver);
    assert!(profile.is_active);
    assert_eq!(profile.full_name.as_deref(), Some("Dee"));
    Ok(())
}

#[tokio::test]
async fn client_update_sets_and_clears_fields() -> Result<()> {
    let Some(store) = store().await? else { return Ok(()) };
    let family = Uuid::new_v4();
    let created = store.insert_client(family, new_client("Eve")).await?;

    let changes = ClientChanges {
        medications: Some(None),
        dob: Some(None),
        reason: Some(Some("Post-surgery".to_string())),
        ..Default::default()
    };
    let updated = store.update_client(family, created.id, changes).await?.unwrap();
    assert_eq!(updated.medications, None);
    assert_eq!(updated.dob, None);
    assert_eq!(updated.reason.as_deref(), Some("Post-surgery"));
    assert_eq!(updated.allergies.as_deref(), Some("Peanuts"));
    assert_eq!(updated.full_name, "Eve");

    let rename = ClientChanges { full_name: Some("Mallory".to_string()), ..Default::default() };
    assert!(store.update_client(Uuid::new_v4(), created.id, rename).await?.is_none());
    assert_eq!(store.find_client(family, created.id).await?.unwrap().full_name, "Eve");
    Ok(())
}

#[tokio::test]
async fn admin_update_is_limited_to_family_admins() -> Result<()> {
    let Some(store) = store().await? else { return Ok(()) };
    let family = Uuid::new_v4();
    let admin = store
        .insert_profile(NewProfile {
            user_id: Uuid::new_v4(),
            family_id: family,
            role: Role::Admin,
            is_active: true,
            full_name: "Fay".to_string(),
            email: "fay@pg.test".to_string(),
        })
        .await?;
    let caregiver = store.provision_caregiver(family, new_caregiver("Gus")).await?;

    let rename = ProfileChanges { full_name: Some("Fay Admin".to_string()), is_active: None };
    let updated = store.update_admin(family, admin.user_id, rename).await?.unwrap();
    assert_eq!(updated.full_name.as_deref(), Some("Fay Admin"));
    assert!(updated.is_active);

    let off = ProfileChanges { full_name: None, is_active: Some(false) };
    assert!(store.update_admin(family, caregiver.user_id, off.clone()).await?.is_none());
    assert!(store.update_admin(Uuid::new_v4(), admin.user_id, off).await?.is_none());
    assert_eq!(store.list_admins(family).await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn replacing_assignments_overwrites_the_set() -> Result<()> {
    let Some(store) = store().await? else { return Ok(()) };
    let family = Uuid::new_v4();
    let client = store.insert_client(family, new_client("Hal")).await?;
    let a = store.provision_caregiver(family, new_caregiver("Ida")).await?;
    let b = store.provision_caregiver(family, new_caregiver("Jon")).await?;

    store.replace_assignments(family, client.id, &[a.id, b.id]).await?;
    let mut both = vec![a.id, b.id];
    both.sort();
    assert_eq!(store.assigned_caregiver_ids(family, client.id).await?, both);

    store.replace_assignments(family, client.id, &[b.id]).await?;
    assert_eq!(store.assigned_caregiver_ids(family, client.id).await?, vec![b.id]);
    assert!(!store.is_assigned(family, a.id, client.id).await?);
    assert!(store.is_assigned(family, b.id, client.id).await?);
    assert_eq!(store.assigned_client_ids(family, b.id).await?, vec![client.id]);
    assert!(store.assigned_client_ids(family, a.id).await?.is_empty());

    store.replace_assignments(family, client.id, &[]).await?;
    assert!(store.assigned_caregiver_ids(family, client.id).await?.is_empty());
    assert!(store.assigned_caregiver_ids(Uuid::new_v4(), client.id).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn log_listing_honors_visible_clients() -> Result<()> {
    let Some(store) = store().await? else { return Ok(()) };
    let family = Uuid::new_v4();
    let carer = store.provision_caregiver(family, new_caregiver("Kit")).await?;
    let seen = store.insert_client(family, new_client("Lou")).await?;
    let hidden = store.insert_client(family, new_client("Max")).await?;

    for date in ["2024-05-01", "2024-05-03", "2024-05-02"] {
        store
            .insert_log(family, Uuid::new_v4(), draft(seen.id, carer.id, date))
            .await?;
    }
    store
        .insert_log(family, Uuid::new_v4(), draft(hidden.id, carer.id, "2024-05-04"))
        .await?;

    let all = store.list_logs(family, &LogFilter::default()).await?;
    let dates: Vec<String> = all.iter().map(|l| l.date.to_string()).collect();
    assert_eq!(dates, vec!["2024-05-04", "2024-05-03", "2024-05-02", "2024-05-01"]);
    assert_eq!(all[0].client_name, "Max");
    assert_eq!(all[0].caregiver_name, "Kit");
    assert_eq!(all[0].meals, Meals { b: YesNo::Yes, l: YesNo::No, d: YesNo::Yes });

    let visible = LogFilter {
        client_id: None,
        visible_clients: Some(vec![seen.id]),
    };
    let limited = store.list_logs(family, &visible).await?;
    assert_eq!(limited.len(), 3);
    assert!(limited.iter().all(|l| l.client_id == seen.id));

    let narrowed = LogFilter {
        client_id: Some(hidden.id),
        visible_clients: Some(vec![seen.id]),
    };
    assert!(store.list_logs(family, &narrowed).await?.is_empty());

    let nothing = LogFilter {
        client_id: None,
        visible_clients: Some(Vec::new()),
    };
    assert!(store.list_logs(family, &nothing).await?.is_empty());
    assert!(store.list_logs(Uuid::new_v4(), &LogFilter::default()).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn log_update_is_scoped_to_family_and_author() -> Result<()> {
    let Some(store) = store().await? else { return Ok(()) };
    let family = Uuid::new_v4();
    let author = store.provision_caregiver(family, new_caregiver("Ned")).await?;
    let other = store.provision_caregiver(family, new_caregiver("Ola")).await?;
    let client = store.insert_client(family, new_client("Pam")).await?;
    let log = store
        .insert_log(family, Uuid::new_v4(), draft(client.id, author.id, "2024-06-01"))
        .await?;

    let mut edit = draft(client.id, other.id, "2024-06-01");
    edit.notes = Some("Rewritten".to_string());
    let by_other = LogScope { family_id: family, log_id: log.id, author: Some(other.id) };
    assert!(store.update_log(by_other, edit.clone()).await?.is_none());

    let foreign = LogScope { family_id: Uuid::new_v4(), log_id: log.id, author: None };
    assert!(store.update_log(foreign, edit).await?.is_none());

    let mut edit = draft(client.id, author.id, "2024-06-02");
    edit.bp = None;
    let by_author = LogScope { family_id: family, log_id: log.id, author: Some(author.id) };
    let updated = store.update_log(by_author, edit).await?.unwrap();
    assert_eq!(updated.date.to_string(), "2024-06-02");
    assert_eq!(updated.bp, None);
    assert_eq!(updated.created_at, log.created_at);
    assert!(updated.updated_at >= log.updated_at);
    Ok(())
}

#[tokio::test]
async fn ping_reaches_the_database() -> Result<()> {
    let Some(store) = store().await? else { return Ok(()) };
    store.ping().await?;
    Ok(())
}
