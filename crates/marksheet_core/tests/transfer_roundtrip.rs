use marksheet_core::db::open_db_in_memory;
use marksheet_core::{
    CollectionImport, NewMark, NewTrade, RecordsStore, SqliteCollectionRepository, StoreError,
    Trade, TransferError,
};
use rusqlite::Connection;

fn seeded_store(conn: &Connection) -> RecordsStore<SqliteCollectionRepository<'_>> {
    let repo = SqliteCollectionRepository::try_new(conn).unwrap();
    RecordsStore::open(repo).unwrap()
}

fn empty_store(conn: &Connection) -> RecordsStore<SqliteCollectionRepository<'_>> {
    let repo = SqliteCollectionRepository::try_new(conn).unwrap();
    RecordsStore::open_empty(repo).unwrap()
}

#[test]
fn export_then_import_reproduces_collections() {
    let source_conn = open_db_in_memory().unwrap();
    let mut source = seeded_store(&source_conn);
    source.add_trade(NewTrade::new("Electrical L3")).unwrap();
    let document = source.export_json().unwrap();

    let target_conn = open_db_in_memory().unwrap();
    let mut target = empty_store(&target_conn);
    target.import_json(&document).unwrap();

    assert_eq!(target.snapshot(), source.snapshot());
    assert_eq!(target.id_counters().trades, 6);
    assert_eq!(target.id_counters().marks, 5);
    assert!(target.users().is_empty());
}

#[test]
fn export_document_uses_camel_case_keys() {
    let conn = open_db_in_memory().unwrap();
    let store = seeded_store(&conn);
    let document = store.export_json().unwrap();

    let value: serde_json::Value = serde_json::from_str(&document).unwrap();
    assert_eq!(value["trades"][0]["tradeName"], "Software Development L3");
    assert_eq!(value["trainees"][1]["gender"], "Female");
    assert_eq!(value["marks"][2]["totalMarks100"], 84);
    assert!(value.get("users").is_none());
}

#[test]
fn malformed_document_changes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let mut store = seeded_store(&conn);
    let before = store.snapshot();

    let document = r#"{
        "trades": [{"tradeId": 1, "tradeName": "Replaced"}],
        "marks": [{"markId": "one"}]
    }"#;
    let err = store.import_json(document).unwrap_err();
    assert!(matches!(err, StoreError::Transfer(TransferError::Malformed(_))));
    assert_eq!(store.snapshot(), before);

    let repo = store.into_repository();
    let reopened = RecordsStore::open(repo).unwrap();
    assert_eq!(reopened.snapshot(), before);
}

#[test]
fn partial_import_replaces_only_present_collections() {
    let conn = open_db_in_memory().unwrap();
    let mut store = seeded_store(&conn);
    let modules = store.modules().to_vec();

    store
        .import_json(r#"{"trades":[{"tradeId":9,"tradeName":"Imported"}]}"#)
        .unwrap();

    assert_eq!(
        store.trades(),
        &[Trade {
            trade_id: 9,
            trade_name: "Imported".to_string(),
        }]
    );
    assert_eq!(store.modules(), modules.as_slice());
    assert_eq!(store.trainees().len(), 5);
    assert_eq!(store.add_trade(NewTrade::new("Next")).unwrap().trade_id, 10);
}

#[test]
fn import_bypasses_guards_and_resets_counters() {
    let conn = open_db_in_memory().unwrap();
    let mut store = seeded_store(&conn);

    store
        .import(CollectionImport {
            trades: Some(Vec::new()),
            marks: Some(Vec::new()),
            ..CollectionImport::default()
        })
        .unwrap();

    assert!(store.trades().is_empty());
    assert_eq!(store.trainees().len(), 5);
    let mark = store
        .add_mark(NewMark::new(1, 1, 1, 2, [60, 60, 60]))
        .unwrap();
    assert_eq!(mark.mark_id, 1);
}

#[test]
fn clear_all_empties_entities_and_keeps_users() {
    let conn = open_db_in_memory().unwrap();
    let mut store = seeded_store(&conn);

    store.clear_all().unwrap();

    assert!(store.trades().is_empty());
    assert!(store.trainees().is_empty());
    assert!(store.modules().is_empty());
    assert!(store.marks().is_empty());
    assert_eq!(store.users().len(), 2);
    assert_eq!(store.add_trade(NewTrade::new("Fresh")).unwrap().trade_id, 1);

    let repo = store.into_repository();
    let reopened = RecordsStore::open(repo).unwrap();
    assert_eq!(reopened.trades().len(), 1);
    assert!(reopened.marks().is_empty());
}

#[test]
fn import_with_repeated_ids_changes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let mut store = empty_store(&conn);

    let document = r#"{
        "trades": [
            {"tradeId": 1, "tradeName": "A"},
            {"tradeId": 1, "tradeName": "B"}
        ]
    }"#;
    let err = store.import_json(document).unwrap_err();

    assert!(matches!(
        err,
        StoreError::Transfer(TransferError::DuplicateId {
            collection: "trades",
            id: 1
        })
    ));
    assert!(store.trades().is_empty());
    assert!(!store.delete_trade(1).unwrap());
}

#[test]
fn import_rejects_out_of_range_scores() {
    let conn = open_db_in_memory().unwrap();
    let mut store = seeded_store(&conn);
    let before = store.snapshot();

    let document = r#"{
        "trades": [],
        "marks": [{
            "markId": 1, "traineeId": 1, "tradeId": 1, "moduleId": 1, "userId": 2,
            "formativeAss": 500, "summativeAss": 75, "comprehensiveAss": 85,
            "totalMarks100": 7
        }]
    }"#;
    let err = store.import_json(document).unwrap_err();

    assert!(matches!(
        err,
        StoreError::Transfer(TransferError::InvalidRecord {
            collection: "marks",
            id: 1,
            ..
        })
    ));
    assert_eq!(store.snapshot(), before);
}

#[test]
fn import_recomputes_stale_totals() {
    let conn = open_db_in_memory().unwrap();
    let mut store = empty_store(&conn);

    store
        .import_json(
            r#"{"marks":[{
                "markId": 3, "traineeId": 2, "tradeId": 1, "moduleId": 1, "userId": 2,
                "formativeAss": 80, "summativeAss": 75, "comprehensiveAss": 85,
                "totalMarks100": 7
            }]}"#,
        )
        .unwrap();

    assert_eq!(store.mark_by_id(3).unwrap().total_marks100, 80);
}
