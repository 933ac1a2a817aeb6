use jne_core::{
    DocumentStore, EditError, EditOpts, EditSession, MemoryMirror, MemoryStore, Mode, Path, SyncOptions,
    resolve, to_pretty,
};
use serde_json::json;

fn session(text: &str) -> EditSession<MemoryStore, MemoryMirror> {
    EditSession::new(MemoryStore::new(text), MemoryMirror::default(), EditOpts::default())
}

fn name_path() -> Path {
    Path::from_pointer("/customer/0/name").unwrap()
}

#[test]
fn select_resolves_and_resets() {
    let mut s = session(r#"{"customer":[{"name":"Ann"}]}"#);
    assert_eq!(s.mode(), Mode::Viewing);
    assert_eq!(s.path_label(), "$");

    s.select(Some(name_path()));
    assert_eq!(s.mode(), Mode::Viewing);
    assert_eq!(s.draft(), "\"Ann\"");
    assert_eq!(s.error(), None);
    assert_eq!(s.path_label(), r#"$["customer"][0]["name"]"#);
}

#[test]
fn save_commits_to_both_stores() {
    let mut s = session(r#"{"customer":[{"name":"Ann"}]}"#);
    s.select(Some(name_path()));
    s.begin_edit();
    assert_eq!(s.mode(), Mode::Editing);
    assert_eq!(s.draft(), "\"Ann\"");

    s.set_draft("\"Bob\"").unwrap();
    s.save().unwrap();

    let expected = to_pretty(&json!({"customer": [{"name": "Bob"}]}), 2);
    assert_eq!(s.store().text().unwrap(), expected);
    assert_eq!(s.mirror().text.as_deref(), Some(expected.as_str()));
    assert_eq!(s.mirror().writes, 1);
    assert_eq!(s.mirror().last_opts, Some(SyncOptions::committed()));
    assert!(s.mirror().last_opts.unwrap().suppress_downstream_sync);
    assert_eq!(s.mode(), Mode::Viewing);
    assert_eq!(s.error(), None);
    assert_eq!(s.draft(), "\"Bob\"");
}

#[test]
fn invalid_draft_keeps_everything() {
    let original = r#"{"customer":[{"name":"Ann"}]}"#;
    let mut s = session(original);
    s.select(Some(name_path()));
    s.begin_edit();
    s.set_draft("{oops").unwrap();

    let err = s.save().unwrap_err();
    assert!(matches!(err, EditError::Parse(_)));
    assert_eq!(s.store().text().unwrap(), original);
    assert_eq!(s.mode(), Mode::Editing);
    assert!(!s.error().unwrap_or_default().is_empty());
    assert_eq!(s.draft(), "{oops");
    assert_eq!(s.mirror().writes, 0);

    // fixing the draft clears the error
    s.set_draft("\"Cy\"").unwrap();
    s.save().unwrap();
    assert_eq!(s.error(), None);
    assert_eq!(s.view_text(), "\"Cy\"");
}

#[test]
fn cancel_restores_resolved_text() {
    let mut s = session(r#"{"customer":[{"name":"Ann","age":3}]}"#);
    s.select(Some(Path::from_pointer("/customer/0").unwrap()));
    s.begin_edit();
    s.set_draft("anything at all").unwrap();
    let _ = s.save();
    assert!(s.error().is_some());

    s.cancel().unwrap();
    let current = s.store().text().unwrap();
    assert_eq!(s.draft(), resolve(&current, &Path::from_pointer("/customer/0").unwrap()));
    assert_eq!(s.mode(), Mode::Viewing);
    assert_eq!(s.error(), None);
}

#[test]
fn selection_change_discards_draft() {
    let mut s = session(r#"{"a":1,"b":2}"#);
    s.select(Some(Path::from_pointer("/a").unwrap()));
    s.begin_edit();
    s.set_draft("42").unwrap();

    s.select(Some(Path::from_pointer("/b").unwrap()));
    assert_eq!(s.mode(), Mode::Viewing);
    assert_eq!(s.draft(), "2");
    assert_eq!(s.store().text().unwrap(), r#"{"a":1,"b":2}"#);
}

#[test]
fn guarded_outside_editing() {
    let mut s = session(r#"{"a":1}"#);
    assert!(matches!(s.set_draft("2"), Err(EditError::NotEditing)));
    assert!(matches!(s.save(), Err(EditError::NotEditing)));
    assert!(matches!(s.cancel(), Err(EditError::NotEditing)));
    assert_eq!(s.store().text().unwrap(), r#"{"a":1}"#);

    s.begin_edit();
    s.cancel().unwrap();
    assert!(matches!(s.cancel(), Err(EditError::NotEditing)));
    assert_eq!(s.mode(), Mode::Viewing);
}

#[test]
fn view_text_ignores_draft() {
    let mut s = session(r#"{"a":1}"#);
    s.select(Some(Path::from_pointer("/a").unwrap()));
    s.begin_edit();
    s.set_draft("99").unwrap();
    assert_eq!(s.view_text(), "1");
    assert_eq!(s.draft(), "99");
}

#[test]
fn no_selection_replaces_whole_document() {
    let mut s = session(r#"{"a":1}"#);
    s.select(None);
    assert_eq!(s.draft(), "{\n  \"a\": 1\n}");
    s.begin_edit();
    s.set_draft("[1,2]").unwrap();
    s.save().unwrap();
    assert_eq!(s.store().text().unwrap(), "[\n  1,\n  2\n]");
}

#[test]
fn save_builds_missing_structure() {
    let mut s = session("{}");
    s.select(Some(Path::from_pointer("/a/0/b").unwrap()));
    assert_eq!(s.draft(), "null");
    s.begin_edit();
    s.set_draft("1").unwrap();
    s.save().unwrap();
    let v: serde_json::Value = serde_json::from_str(&s.store().text().unwrap()).unwrap();
    assert_eq!(v, json!({"a": [{"b": 1}]}));
}

#[test]
fn malformed_document_shows_null_and_refuses_save() {
    let mut s = session("{broken");
    s.select(Some(Path::from_pointer("/a").unwrap()));
    assert_eq!(s.draft(), "null");
    s.begin_edit();
    s.set_draft("1").unwrap();
    assert!(matches!(s.save(), Err(EditError::Parse(_))));
    assert_eq!(s.store().text().unwrap(), "{broken");
    assert_eq!(s.mode(), Mode::Editing);
}

#[test]
fn scalar_in_the_way_is_reported() {
    let mut s = session(r#"{"a":5}"#);
    s.select(Some(Path::from_pointer("/a/b").unwrap()));
    s.begin_edit();
    s.set_draft("1").unwrap();
    assert!(matches!(s.save(), Err(EditError::NotAContainer { .. })));
    assert!(s.error().unwrap_or_default().contains("not a container"));
    assert_eq!(s.store().text().unwrap(), r#"{"a":5}"#);
}

#[test]
fn indent_option_applies_to_commit() {
    let opts = EditOpts {
        indent: 4,
        ..Default::default()
    };
    let mut s = EditSession::new(MemoryStore::new(r#"{"a":1}"#), MemoryMirror::default(), opts);
    s.select(Some(Path::from_pointer("/a").unwrap()));
    s.begin_edit();
    s.set_draft("[2]").unwrap();
    s.save().unwrap();
    assert_eq!(s.store().text().unwrap(), "{\n    \"a\": [\n        2\n    ]\n}");
    assert_eq!(s.draft(), "[\n    2\n]");
}

#[test]
fn file_backed_session_writes_store_and_mirror() {
    use jne_core::FileStore;
    let dir = tempfile::tempdir().unwrap();
    let doc = dir.path().join("doc.json");
    let mirror = dir.path().join("mirror.json");
    std::fs::write(&doc, r#"{"items":[1,2]}"#).unwrap();

    let mut s = EditSession::new(FileStore::new(&doc), FileStore::new(&mirror), EditOpts::default());
    s.select(Some(Path::from_pointer("/items/1").unwrap()));
    s.begin_edit();
    s.set_draft("{\"x\": true}").unwrap();
    s.save().unwrap();

    let written = std::fs::read_to_string(&doc).unwrap();
    assert_eq!(written, std::fs::read_to_string(&mirror).unwrap());
    let v: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(v, json!({"items": [1, {"x": true}]}));
}

#[test]
fn borrowed_stores_stay_with_caller() {
    let mut store = MemoryStore::new(r#"{"a":1}"#);
    let mut mirror = MemoryMirror::default();
    {
        let mut s = EditSession::new(&mut store, &mut mirror, EditOpts::default());
        s.select(Some(Path::from_pointer("/a").unwrap()));
        s.begin_edit();
        s.set_draft("2").unwrap();
        s.save().unwrap();
    }
    assert_eq!(store.text().unwrap(), "{\n  \"a\": 2\n}");
    assert_eq!(mirror.writes, 1);
}
