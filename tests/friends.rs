
use hobbymates::utils::friends::{
    errors::FriendError,
    fetch_incoming_requests, fetch_user_friends, is_friend,
    models::{FriendRequestAction, FriendRequestOutcome, FriendRequestStatus},
    remove_user_friend, respond_to_friend_request, send_friend_request,
};
use reqwest::StatusCode;
use serde_json::{json, Value};
use sqlx::PgPool;
use tools::AppData;
use uuid::{uuid, Uuid};

const ADAM: Uuid = uuid!("ba34ff10-4b89-44cb-9b36-31eb57c41556");
const HUBERT: Uuid = uuid!("263541a8-fa1e-4f13-9e5d-5b250a5a71e6");
const JEFF: Uuid = uuid!("4bd30a6a-7dfe-46a2-b741-f49612aa85c1");
const POLO: Uuid = uuid!("6666e44f-14ce-4aa5-b5f9-8a4cc5ee5c58");
const ADAM_TO_HUBERT: Uuid = uuid!("c0ffee00-0000-4000-8000-000000000001");

#[sqlx::test(fixtures("users"))]
async fn send_request(db: PgPool) {
    let request = send_friend_request(&db, ADAM, POLO).await.unwrap();

    assert_eq!(request.sender_id, ADAM);
    assert_eq!(request.receiver_id, POLO);
    assert_eq!(request.status, FriendRequestStatus::Sent);

    let incoming = fetch_incoming_requests(&db, POLO).await.unwrap();
    assert_eq!(incoming.len(), 1);
    assert_eq!(incoming[0].id, request.id);
    assert_eq!(incoming[0].sender.username, "adam");
}

#[sqlx::test(fixtures("users"))]
async fn send_request_to_self(db: PgPool) {
    let res = send_friend_request(&db, ADAM, ADAM).await;

    match res {
        Err(FriendError::SelfRequest) => (),
        _ => panic!("Test gives the result {:?}", res),
    }
}

#[sqlx::test(fixtures("users"))]
async fn send_request_to_nobody(db: PgPool) {
    let res = send_friend_request(&db, ADAM, Uuid::new_v4()).await;

    match res {
        Err(FriendError::UserNotFound) => (),
        _ => panic!("Test gives the result {:?}", res),
    }
}

#[sqlx::test(fixtures("users", "friend_requests"))]
async fn send_duplicate_request(db: PgPool) {
    let res = send_friend_request(&db, ADAM, HUBERT).await;

    match res {
        Err(FriendError::DuplicateRequest) => (),
        _ => panic!("Test gives the result {:?}", res),
    }
}

#[sqlx::test(fixtures("users", "friends"))]
async fn send_request_to_friend(db: PgPool) {
    for (sender, receiver) in [(JEFF, POLO), (POLO, JEFF)] {
        let res = send_friend_request(&db, sender, receiver).await;

        match res {
            Err(FriendError::AlreadyFriends) => (),
            _ => panic!("Test gives the result {:?}", res),
        }
    }
}

#[sqlx::test(fixtures("users", "friend_requests"))]
async fn accept_request(db: PgPool) {
    let status =
        respond_to_friend_request(&db, ADAM_TO_HUBERT, HUBERT, FriendRequestAction::Accept)
            .await
            .unwrap();
    assert_eq!(status, FriendRequestStatus::Accepted);

    assert!(is_friend(&db, ADAM, HUBERT).await.unwrap());
    assert!(is_friend(&db, HUBERT, ADAM).await.unwrap());

    let adam_friends = fetch_user_friends(&db, ADAM).await.unwrap();
    let hubert_friends = fetch_user_friends(&db, HUBERT).await.unwrap();
    assert_eq!(adam_friends.len(), 1);
    assert_eq!(adam_friends[0].id, HUBERT);
    assert_eq!(hubert_friends.len(), 1);
    assert_eq!(hubert_friends[0].id, ADAM);

    assert!(fetch_incoming_requests(&db, HUBERT).await.unwrap().is_empty());

    let res =
        respond_to_friend_request(&db, ADAM_TO_HUBERT, HUBERT, FriendRequestAction::Accept).await;
    match res {
        Err(FriendError::RequestNotFound) => (),
        _ => panic!("Test gives the result {:?}", res),
    }
}

#[sqlx::test(fixtures("users", "friend_requests"))]
async fn accept_clears_reverse_request(db: PgPool) {
    send_friend_request(&db, HUBERT, ADAM).await.unwrap();

    respond_to_friend_request(&db, ADAM_TO_HUBERT, HUBERT, FriendRequestAction::Accept)
        .await
        .unwrap();

    assert!(fetch_incoming_requests(&db, ADAM).await.unwrap().is_empty());
    assert_eq!(fetch_user_friends(&db, ADAM).await.unwrap().len(), 1);
}

#[sqlx::test(fixtures("users", "friend_requests"))]
async fn decline_request(db: PgPool) {
    let status =
        respond_to_friend_request(&db, ADAM_TO_HUBERT, HUBERT, FriendRequestAction::Decline)
            .await
            .unwrap();
    assert_eq!(status, FriendRequestStatus::Declined);

    assert!(!is_friend(&db, ADAM, HUBERT).await.unwrap());
    assert!(fetch_incoming_requests(&db, HUBERT).await.unwrap().is_empty());

    // declined requests do not block a new one
    send_friend_request(&db, ADAM, HUBERT).await.unwrap();
}

#[sqlx::test(fixtures("users", "friend_requests"))]
async fn only_receiver_responds(db: PgPool) {
    for user in [ADAM, JEFF] {
        let res =
            respond_to_friend_request(&db, ADAM_TO_HUBERT, user, FriendRequestAction::Accept)
                .await;

        match res {
            Err(FriendError::RequestNotFound) => (),
            _ => panic!("Test gives the result {:?}", res),
        }
    }

    assert_eq!(fetch_incoming_requests(&db, HUBERT).await.unwrap().len(), 1);
}

#[sqlx::test(fixtures("users"))]
async fn concurrent_send_and_accept_leave_no_request_between_friends(db: PgPool) {
    for _ in 0..20 {
        let pending = send_friend_request(&db, HUBERT, ADAM).await.unwrap();

        let (sent, accepted) = tokio::join!(
            send_friend_request(&db, ADAM, HUBERT),
            respond_to_friend_request(&db, pending.id, ADAM, FriendRequestAction::Accept),
        );
        accepted.unwrap();
        match sent {
            Ok(_) | Err(FriendError::AlreadyFriends) => (),
            other => panic!("Test gives the result {other:?}"),
        }

        assert!(is_friend(&db, ADAM, HUBERT).await.unwrap());
        assert!(fetch_incoming_requests(&db, ADAM).await.unwrap().is_empty());
        assert!(fetch_incoming_requests(&db, HUBERT).await.unwrap().is_empty());

        remove_user_friend(&db, ADAM, HUBERT).await.unwrap();
    }
}

#[sqlx::test(fixtures("users", "friends"))]
async fn fetch_all_friends(db: PgPool) {
    let friends = fetch_user_friends(&db, JEFF).await.unwrap();
    assert_eq!(friends.len(), 1);
    assert_eq!(friends[0].id, POLO);
    assert_eq!(friends[0].username, "polo");

    let friends = fetch_user_friends(&db, POLO).await.unwrap();
    assert_eq!(friends.len(), 1);
    assert_eq!(friends[0].id, JEFF);

    assert!(fetch_user_friends(&db, ADAM).await.unwrap().is_empty());
}

#[sqlx::test(fixtures("users", "friends"))]
async fn remove_friend(db: PgPool) {
    remove_user_friend(&db, POLO, JEFF).await.unwrap();

    assert!(!is_friend(&db, JEFF, POLO).await.unwrap());
    assert!(fetch_user_friends(&db, JEFF).await.unwrap().is_empty());

    let res = remove_user_friend(&db, JEFF, POLO).await;
    match res {
        Err(FriendError::NotFriends) => (),
        _ => panic!("Test gives the result {:?}", res),
    }
}

#[sqlx::test]
async fn friendship_through_api(db: PgPool) {
    let app = AppData::new(db).await;
    let client = app.client();
    let sender = app.new_user(&client).await;
    let receiver = app.new_user(&client).await;

    let res = client
        .post(app.url("/friend_requests"))
        .bearer_auth(&sender.token)
        .json(&json!({ "receiver_id": receiver.user_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(app.url("/friend_requests"))
        .bearer_auth(&sender.token)
        .json(&json!({ "receiver_id": receiver.user_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "duplicate_request");

    let incoming: Vec<Value> = client
        .get(app.url("/friend_requests"))
        .bearer_auth(&receiver.token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(incoming.len(), 1);
    assert_eq!(incoming[0]["sender"]["id"], sender.user_id.to_string());
    let request_id = incoming[0]["id"].as_str().unwrap().to_string();

    let res = client
        .post(app.url(&format!("/friend_requests/{request_id}")))
        .bearer_auth(&receiver.token)
        .json(&json!({"action": "befriend"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_action");

    let res = client
        .post(app.url(&format!("/friend_requests/{request_id}")))
        .bearer_auth(&receiver.token)
        .json(&json!({"action": "accept"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let outcome: FriendRequestOutcome = res.json().await.unwrap();
    assert_eq!(outcome.status, FriendRequestStatus::Accepted);

    let friends: Vec<Value> = client
        .get(app.url("/friends"))
        .bearer_auth(&sender.token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(friends.len(), 1);
    assert_eq!(friends[0]["id"], receiver.user_id.to_string());

    let res = client
        .post(app.url("/friend_requests"))
        .bearer_auth(&receiver.token)
        .json(&json!({ "receiver_id": sender.user_id }))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "already_friends");

    let res = client
        .delete(app.url(&format!("/friends/{}", sender.user_id)))
        .bearer_auth(&receiver.token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .delete(app.url(&format!("/friends/{}", sender.user_id)))
        .bearer_auth(&receiver.token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
