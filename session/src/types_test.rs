use super::*;

#[test]
fn user_accepts_string_id_and_created_at() {
    let user: User = serde_json::from_value(serde_json::json!({
        "id": "5f0c",
        "name": "Ada",
        "email": "ada@example.com",
        "createdAt": "2024-01-02T03:04:05Z"
    }))
    .unwrap();
    assert_eq!(user.id, "5f0c");
    assert_eq!(user.created_at.as_deref(), Some("2024-01-02T03:04:05Z"));
}

#[test]
fn user_folds_numeric_id_into_string() {
    let user: User = serde_json::from_value(serde_json::json!({
        "id": 42,
        "name": "Ada",
        "email": "ada@example.com"
    }))
    .unwrap();
    assert_eq!(user.id, "42");
    assert_eq!(user.created_at, None);
}

#[test]
fn user_rejects_object_id() {
    let result = serde_json::from_value::<User>(serde_json::json!({
        "id": {"nested": true},
        "name": "Ada",
        "email": "ada@example.com"
    }));
    assert!(result.is_err());
}

#[test]
fn user_serializes_created_at_in_camel_case() {
    let user = User {
        id: "u1".to_owned(),
        name: "Ada".to_owned(),
        email: "ada@example.com".to_owned(),
        created_at: Some("2024-01-01".to_owned()),
    };
    let json = serde_json::to_value(&user).unwrap();
    assert_eq!(json["createdAt"], "2024-01-01");
    assert!(json.get("created_at").is_none());
}

#[test]
fn user_omits_missing_created_at() {
    let user = User {
        id: "u1".to_owned(),
        name: "Ada".to_owned(),
        email: "ada@example.com".to_owned(),
        created_at: None,
    };
    let json = serde_json::to_value(&user).unwrap();
    assert!(json.get("createdAt").is_none());
}

#[test]
fn profile_payload_token_is_optional() {
    let payload: ProfilePayload = serde_json::from_value(serde_json::json!({
        "user": {"id": "u1", "name": "Ada", "email": "ada@example.com"}
    }))
    .unwrap();
    assert_eq!(payload.token, None);
}

#[test]
fn signup_payload_tolerates_message_only_body() {
    let payload: SignupPayload =
        serde_json::from_value(serde_json::json!({ "message": "User created successfully" })).unwrap();
    assert_eq!(payload.token, None);
    assert_eq!(payload.user, None);
}
