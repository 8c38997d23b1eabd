use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use snipstash::{Config, SnipError, SnippetDraft, SnippetPatch, SnippetStore};
use tempfile::TempDir;

fn test_config(dir: &TempDir) -> Config {
    Config {
        data_file: dir.path().join("snippets.json"),
        editor_command: None,
    }
}

fn open_store(dir: &TempDir) -> SnippetStore {
    SnippetStore::open(test_config(dir)).expect("open store")
}

fn draft(title: &str, code: &str, language: &str) -> SnippetDraft {
    SnippetDraft {
        title: title.to_string(),
        code: code.to_string(),
        language: language.to_string(),
        ..SnippetDraft::default()
    }
}

#[test]
fn export_envelope_has_the_versioned_shape() {
    let dir = TempDir::new().expect("temp dir");
    let mut store = open_store(&dir);
    store
        .create(draft("Hello World", "print('hi')", "python"))
        .expect("create");

    let envelope: Value = serde_json::from_str(&store.export().expect("export")).expect("parse");
    let object = envelope.as_object().expect("object");

    assert_eq!(object.len(), 3);
    assert!(object.contains_key("snippets"));
    assert!(object.contains_key("exportedAt"));
    assert_eq!(object["version"], "1.0");

    let snippet = &envelope["snippets"][0];
    assert_eq!(snippet["title"], "Hello World");
    assert!(snippet.get("createdAt").is_some());
    assert!(snippet.get("updatedAt").is_none());
}

#[test]
fn export_includes_updated_at_once_stamped() {
    let dir = TempDir::new().expect("temp dir");
    let mut store = open_store(&dir);
    let created = store
        .create(draft("Hello", "print(1)", "python"))
        .expect("create");
    store
        .update(
            &created.id,
            &SnippetPatch {
                description: Some("now described".to_string()),
                ..SnippetPatch::default()
            },
        )
        .expect("update");

    let envelope: Value = serde_json::from_str(&store.export().expect("export")).expect("parse");
    assert!(envelope["snippets"][0].get("updatedAt").is_some());
}

#[test]
fn import_round_trips_an_export() {
    let dir = TempDir::new().expect("temp dir");
    let mut store = open_store(&dir);
    let mut input = draft("Quick Sort", "fn sort() {}", "rust");
    input.tags = vec!["sorting".to_string()];
    let original = store.create(input).expect("create");
    let payload = store.export().expect("export");

    let other_dir = TempDir::new().expect("temp dir");
    let mut other = open_store(&other_dir);
    assert_eq!(other.import(&payload).expect("import"), 1);

    let imported = &other.get_all()[0];
    assert_ne!(imported.id, original.id);
    assert_eq!(imported.title, original.title);
    assert_eq!(imported.code, original.code);
    assert_eq!(imported.language, original.language);
    assert_eq!(imported.tags, original.tags);
    assert_eq!(imported.created_at, original.created_at);
    assert!(imported.updated_at.is_none());
}

#[test]
fn importing_the_same_payload_twice_adds_nothing() {
    let dir = TempDir::new().expect("temp dir");
    let mut store = open_store(&dir);
    store.create(draft("Hello", "1", "rust")).expect("create");
    let payload = store.export().expect("export");

    assert_eq!(store.import(&payload).expect("import"), 0);
    assert_eq!(store.get_all().len(), 1);
}

#[test]
fn duplicate_titles_are_skipped_case_insensitively() {
    let dir = TempDir::new().expect("temp dir");
    let mut store = open_store(&dir);
    store
        .create(draft("Hello World", "print(1)", "python"))
        .expect("create");

    let payload = json!({
        "snippets": [
            { "title": "HELLO world", "code": "print(2)", "language": "python" },
            { "title": "Goodbye", "code": "print(3)", "language": "python" },
        ],
        "exportedAt": "2024-03-01T12:00:00Z",
        "version": "1.0",
    })
    .to_string();

    assert_eq!(store.import(&payload).expect("import"), 1);
    let titles: Vec<String> = store.get_all().into_iter().map(|s| s.title).collect();
    assert_eq!(titles, vec!["Goodbye", "Hello World"]);
}

#[test]
fn one_invalid_record_rejects_the_whole_payload() {
    let dir = TempDir::new().expect("temp dir");
    let mut store = open_store(&dir);
    store
        .create(draft("Existing", "1", "rust"))
        .expect("create");
    let before = store.get_all();

    let payload = json!({
        "snippets": [
            { "title": "Fine", "code": "print(1)", "language": "python" },
            { "title": "Broken", "code": "   ", "language": "python" },
        ],
        "exportedAt": "2024-03-01T12:00:00Z",
        "version": "1.0",
    })
    .to_string();

    let error = store.import(&payload).expect_err("import must fail");
    assert!(matches!(error, SnipError::Import { .. }));
    assert!(error.to_string().contains("index 1"));
    assert_eq!(store.get_all(), before);
}

#[test]
fn malformed_payloads_are_import_errors() {
    let dir = TempDir::new().expect("temp dir");
    let mut store = open_store(&dir);

    for payload in [
        "not json at all",
        r#"{"exportedAt":"2024-03-01T12:00:00Z"}"#,
        r#"{"snippets":42}"#,
    ] {
        assert!(matches!(
            store.import(payload),
            Err(SnipError::Import { .. })
        ));
    }
    assert!(store.get_all().is_empty());
}

#[test]
fn import_assigns_fresh_ids_and_clears_update_stamps() {
    let dir = TempDir::new().expect("temp dir");
    let mut store = open_store(&dir);

    let payload = json!({
        "snippets": [{
            "id": "imported-id",
            "title": "Carried Over",
            "code": "print(1)",
            "language": "python",
            "bookmarked": true,
            "createdAt": "2023-06-15T08:30:00Z",
            "updatedAt": "2023-07-01T10:00:00Z",
        }],
        "exportedAt": "2024-03-01T12:00:00Z",
        "version": "1.0",
    })
    .to_string();

    assert_eq!(store.import(&payload).expect("import"), 1);
    let imported = &store.get_all()[0];

    assert_ne!(imported.id, "imported-id");
    assert!(imported.bookmarked);
    assert_eq!(
        imported.created_at,
        Utc.with_ymd_and_hms(2023, 6, 15, 8, 30, 0).unwrap()
    );
    assert!(imported.updated_at.is_none());
}

#[test]
fn records_without_a_creation_time_are_stamped_on_import() {
    let dir = TempDir::new().expect("temp dir");
    let mut store = open_store(&dir);

    let payload = json!({
        "snippets": [{ "title": "Fresh", "code": "1", "language": "rust" }],
        "exportedAt": "2024-03-01T12:00:00Z",
        "version": "1.0",
    })
    .to_string();

    let before = Utc::now();
    assert_eq!(store.import(&payload).expect("import"), 1);

    let imported = &store.get_all()[0];
    assert!(imported.created_at >= before);
    assert!(imported.created_at <= Utc::now());
}

#[test]
fn imported_records_are_prepended_in_payload_order() {
    let dir = TempDir::new().expect("temp dir");
    let mut store = open_store(&dir);
    store
        .create(draft("Old Timer", "1", "rust"))
        .expect("create");

    let payload = json!({
        "snippets": [
            { "title": "New One", "code": "1", "language": "rust" },
            { "title": "New Two", "code": "2", "language": "rust" },
        ],
        "exportedAt": "2024-03-01T12:00:00Z",
        "version": "1.0",
    })
    .to_string();

    assert_eq!(store.import(&payload).expect("import"), 2);
    let titles: Vec<String> = store.get_all().into_iter().map(|s| s.title).collect();
    assert_eq!(titles, vec!["New One", "New Two", "Old Timer"]);
}

#[test]
fn same_titled_records_within_one_payload_are_all_kept() {
    let dir = TempDir::new().expect("temp dir");
    let mut store = open_store(&dir);

    let payload = json!({
        "snippets": [
            { "title": "Twin", "code": "1", "language": "rust" },
            { "title": "twin", "code": "2", "language": "rust" },
        ],
        "exportedAt": "2024-03-01T12:00:00Z",
        "version": "1.0",
    })
    .to_string();

    assert_eq!(store.import(&payload).expect("import"), 2);
    assert_eq!(store.get_all().len(), 2);
}

#[test]
fn import_cleans_tags_like_create_does() {
    let dir = TempDir::new().expect("temp dir");
    let mut store = open_store(&dir);

    let payload = json!({
        "snippets": [{
            "title": "Tagged",
            "code": "1",
            "language": "rust",
            "tags": [" rust ", "", "cli", "rust"],
        }],
        "exportedAt": "2024-03-01T12:00:00Z",
        "version": "1.0",
    })
    .to_string();

    assert_eq!(store.import(&payload).expect("import"), 1);
    assert_eq!(store.get_all()[0].tags, vec!["rust", "cli"]);
}

#[test]
fn imported_snippets_survive_a_reopen_and_are_searchable() {
    let dir = TempDir::new().expect("temp dir");
    let mut store = open_store(&dir);

    let payload = json!({
        "snippets": [{ "title": "Binary Search", "code": "fn s() {}", "language": "rust" }],
        "exportedAt": "2024-03-01T12:00:00Z",
        "version": "1.0",
    })
    .to_string();
    store.import(&payload).expect("import");
    assert_eq!(store.search("binary").len(), 1);

    let reopened = open_store(&dir);
    assert_eq!(reopened.get_all().len(), 1);
    assert_eq!(reopened.search("binary").len(), 1);
}
