
use hobbymates::utils::auth::models::AuthResponse;
use hobbymates::utils::profile::{
    errors::ProfileError,
    fetch_profile,
    models::{Profile, ProfileUpdate},
    update_profile,
};
use reqwest::StatusCode;
use serde_json::{json, Value};
use sqlx::PgPool;
use tools::{AppData, STRONG_PASSWORD};
use uuid::{uuid, Uuid};

const ADAM: Uuid = uuid!("ba34ff10-4b89-44cb-9b36-31eb57c41556");
const JEFF: Uuid = uuid!("4bd30a6a-7dfe-46a2-b741-f49612aa85c1");

#[sqlx::test(fixtures("users"))]
async fn fetch_own_profile(db: PgPool) {
    let profile = fetch_profile(&db, ADAM).await.unwrap();

    assert_eq!(
        profile,
        Profile {
            username: "adam".into(),
            name: Some("Adam".into()),
            email: "adam@hobbymates.dev".into(),
            date_of_birth: Some("1999-04-12".into()),
        }
    );
}

#[sqlx::test(fixtures("users"))]
async fn missing_birth_date_is_null(db: PgPool) {
    let profile = fetch_profile(&db, JEFF).await.unwrap();
    assert_eq!(profile.date_of_birth, None);
}

#[sqlx::test(fixtures("users"))]
async fn fetch_missing_profile(db: PgPool) {
    let res = fetch_profile(&db, Uuid::new_v4()).await;

    match res {
        Err(ProfileError::UserNotFound) => (),
        _ => panic!("Test gives the result {:?}", res),
    }
}

#[sqlx::test(fixtures("users"))]
async fn partial_update_keeps_other_fields(db: PgPool) {
    let update = ProfileUpdate {
        name: Some("Adam Smith".into()),
        ..Default::default()
    };
    let profile = update_profile(&db, ADAM, update).await.unwrap();

    assert_eq!(profile.name.as_deref(), Some("Adam Smith"));
    assert_eq!(profile.email, "adam@hobbymates.dev");
    assert_eq!(profile.date_of_birth.as_deref(), Some("1999-04-12"));
    assert_eq!(fetch_profile(&db, ADAM).await.unwrap(), profile);
}

#[sqlx::test(fixtures("users"))]
async fn empty_fields_clear_name_and_keep_date(db: PgPool) {
    let update = ProfileUpdate {
        name: Some("  ".into()),
        email: None,
        date_of_birth: Some("".into()),
    };
    let profile = update_profile(&db, ADAM, update).await.unwrap();

    assert_eq!(profile.name, None);
    assert_eq!(profile.date_of_birth.as_deref(), Some("1999-04-12"));
}

#[sqlx::test(fixtures("users"))]
async fn update_birth_date(db: PgPool) {
    let update = ProfileUpdate {
        date_of_birth: Some("2002-02-28".into()),
        ..Default::default()
    };
    let profile = update_profile(&db, JEFF, update).await.unwrap();

    assert_eq!(profile.date_of_birth.as_deref(), Some("2002-02-28"));
}

#[sqlx::test(fixtures("users"))]
async fn update_invalid_date(db: PgPool) {
    let update = ProfileUpdate {
        date_of_birth: Some("2002-02-30".into()),
        ..Default::default()
    };
    let res = update_profile(&db, ADAM, update).await;

    match res {
        Err(ProfileError::InvalidDate) => (),
        _ => panic!("Test gives the result {:?}", res),
    }
}

#[sqlx::test(fixtures("users"))]
async fn update_invalid_email(db: PgPool) {
    let update = ProfileUpdate {
        email: Some("adam-at-home".into()),
        ..Default::default()
    };
    let res = update_profile(&db, ADAM, update).await;

    match res {
        Err(ProfileError::InvalidEmail) => (),
        _ => panic!("Test gives the result {:?}", res),
    }
}

#[sqlx::test(fixtures("users"))]
async fn update_taken_email(db: PgPool) {
    let update = ProfileUpdate {
        email: Some("Hubert@hobbymates.dev".into()),
        ..Default::default()
    };
    let res = update_profile(&db, ADAM, update).await;

    match res {
        Err(ProfileError::EmailTaken) => (),
        _ => panic!("Test gives the result {:?}", res),
    }
    assert_eq!(
        fetch_profile(&db, ADAM).await.unwrap().email,
        "adam@hobbymates.dev"
    );
}

#[sqlx::test]
async fn update_through_api(db: PgPool) {
    let app = AppData::new(db).await;
    let client = app.client();
    let auth = app.new_user(&client).await;

    let res = client
        .post(app.url("/profile"))
        .bearer_auth(&auth.token)
        .json(&json!({"name": "Chad", "date_of_birth": "1995-07-01"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let profile: Profile = client
        .get(app.url("/profile"))
        .bearer_auth(&auth.token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(profile.name.as_deref(), Some("Chad"));
    assert_eq!(profile.date_of_birth.as_deref(), Some("1995-07-01"));
}

#[sqlx::test]
async fn change_password_rotates_session(db: PgPool) {
    let app = AppData::new(db).await;
    let client = app.client();
    let old = app.new_user(&client).await;
    let new_password = "#even#_#stronger#_#pass#";

    let res = client
        .post(app.url("/change_password"))
        .bearer_auth(&old.token)
        .json(&json!({"current_password": STRONG_PASSWORD, "new_password": new_password}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let new: AuthResponse = res.json().await.unwrap();
    assert_eq!(new.user_id, old.user_id);

    let res = client
        .get(app.url("/profile"))
        .bearer_auth(&old.token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(app.url("/profile"))
        .bearer_auth(&new.token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let profile: Profile = res.json().await.unwrap();

    let res = client
        .post(app.url("/auth/login"))
        .json(&json!({"username": profile.username, "password": new_password}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[sqlx::test]
async fn change_password_wrong_current(db: PgPool) {
    let app = AppData::new(db).await;
    let client = app.client();
    let auth = app.new_user(&client).await;

    let res = client
        .post(app.url("/change_password"))
        .bearer_auth(&auth.token)
        .json(&json!({"current_password": "#wrong#_#pass#", "new_password": "#even#_#stronger#_#pass#"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // old token still works
    let res = client
        .get(app.url("/profile"))
        .bearer_auth(&auth.token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[sqlx::test]
async fn change_password_weak(db: PgPool) {
    let app = AppData::new(db).await;
    let client = app.client();
    let auth = app.new_user(&client).await;

    let res = client
        .post(app.url("/change_password"))
        .bearer_auth(&auth.token)
        .json(&json!({"current_password": STRONG_PASSWORD, "new_password": "12345"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
}
