use chrono::{TimeZone, Utc};
use viem_dependents::models::{RepositoryRecord, StopReason};
use viem_dependents::types::GitHubRepo;

fn api_repo() -> GitHubRepo {
    serde_json::from_value(serde_json::json!({
        "id": 1,
        "name": "wallet",
        "full_name": "acme/wallet",
        "description": "A wallet",
        "html_url": "https://github.com/acme/wallet",
        "stargazers_count": 99,
        "language": null,
        "archived": false,
        "created_at": "2023-01-02T03:04:05Z",
        "updated_at": "2024-06-07T08:09:10Z"
    }))
    .expect("Failed to deserialize repository")
}

#[test]
fn test_record_from_api_repo() {
    let record = RepositoryRecord::from(api_repo());

    assert_eq!(record.name, "wallet");
    assert_eq!(record.full_name, "acme/wallet");
    assert_eq!(record.description.as_deref(), Some("A wallet"));
    assert_eq!(record.stars, 99);
    assert_eq!(record.url, "https://github.com/acme/wallet");
    assert!(record.language.is_none());
    assert_eq!(record.created_at, Some(Utc.with_ymd_and_hms(2023, 1, 2, 3, 4, 5).unwrap()));
}

#[test]
fn test_serde_serialization() {
    let record = RepositoryRecord::from(api_repo());
    let json = serde_json::to_value(&record).unwrap();

    assert_eq!(json["full_name"], "acme/wallet");
    assert_eq!(json["stars"], 99);
    assert!(json["language"].is_null());
    assert_eq!(json["created_at"], "2023-01-02T03:04:05Z");

    let back: RepositoryRecord = serde_json::from_value(json).unwrap();
    assert_eq!(back, record);
}

#[test]
fn test_scraped_record_omits_timestamps() {
    let record = RepositoryRecord {
        name: "dapp".to_string(),
        full_name: "solo/dapp".to_string(),
        description: None,
        stars: 7,
        url: "https://github.com/solo/dapp".to_string(),
        language: Some("TypeScript".to_string()),
        created_at: None,
        updated_at: None,
    };

    let json = serde_json::to_value(&record).unwrap();
    let object = json.as_object().unwrap();
    assert!(!object.contains_key("created_at"));
    assert!(!object.contains_key("updated_at"));
    assert_eq!(object.len(), 6);
}

#[test]
fn test_stop_reason_display() {
    assert_eq!(StopReason::ShortPage.to_string(), "short page");
    assert_eq!(StopReason::NoNextLink.to_string(), "no next page link");
    assert_eq!(
        serde_json::to_string(&StopReason::MaxPagesReached).unwrap(),
        "\"max_pages_reached\""
    );
}
