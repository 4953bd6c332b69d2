/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

use crate::fixtures::TestFixture;
use convoy_master::error::Error;
use convoy_models::models::settings::NewSetting;

#[test]
fn test_upsert_creates_setting() {
    let fixture = TestFixture::new();
    let key = fixture.unique_name("poll_interval");

    let setting = fixture
        .dal
        .settings()
        .upsert(&NewSetting::new(key.clone(), "30".to_string()).unwrap())
        .expect("Failed to upsert setting");

    assert_eq!(setting.key, key);
    assert_eq!(setting.value, "30");
}

#[test]
fn test_upsert_overwrites_value() {
    let fixture = TestFixture::new();
    let key = fixture.unique_name("poll_interval");

    let first = fixture
        .dal
        .settings()
        .upsert(&NewSetting::new(key.clone(), "30".to_string()).unwrap())
        .expect("Failed to upsert setting");

    let second = fixture
        .dal
        .settings()
        .upsert(&NewSetting::new(key.clone(), "60".to_string()).unwrap())
        .expect("Failed to overwrite setting");

    assert_eq!(second.key, first.key);
    assert_eq!(second.value, "60");
    assert!(second.updated_at >= first.updated_at);
}

#[test]
fn test_get_missing_setting() {
    let fixture = TestFixture::new();

    let result = fixture
        .dal
        .settings()
        .get("no-such-key")
        .expect("Failed to query setting");
    assert!(result.is_none());
}

#[test]
fn test_list_contains_upserted_setting() {
    let fixture = TestFixture::new();
    let key = fixture.unique_name("banner");

    fixture
        .dal
        .settings()
        .upsert(&NewSetting::new(key.clone(), "maintenance tonight".to_string()).unwrap())
        .expect("Failed to upsert setting");

    let all = fixture.dal.settings().list().expect("Failed to list settings");
    assert!(all.iter().any(|s| s.key == key));
}

#[test]
fn test_delete_setting() {
    let fixture = TestFixture::new();
    let key = fixture.unique_name("banner");

    fixture
        .dal
        .settings()
        .upsert(&NewSetting::new(key.clone(), "x".to_string()).unwrap())
        .expect("Failed to upsert setting");

    fixture
        .dal
        .settings()
        .delete(&key)
        .expect("Failed to delete setting");

    let again = fixture.dal.settings().delete(&key);
    assert!(matches!(again, Err(Error::NotFound("setting", _))));
}
