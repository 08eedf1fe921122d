mod support;

use pretty_assertions::assert_eq;
use chrono::{TimeZone, Utc};
use relorm::{Field, ModelDef, Record, Type, Value};
use serde_json::json;
use std_util::prelude::*;
use support::{memory_db, todo};

fn new_todo(title: &str, priority: i64) -> Record {
    Record::new("Todo")
        .with("Title", title)
        .with("Priority", priority)
}

fn ids(records: &[Record]) -> Vec<Value> {
    records.iter().map(|record| record.get("Id").clone()).collect()
}

#[tokio::test]
async fn create_then_find_round_trips() {
    let db = memory_db([todo()]).await;

    let mut created = new_todo("write docs", 2);
    assert_ok!(db.create(&mut created).await);

    let id = created.get("Id").clone();
    assert_eq!(id, Value::from(1));
    assert_empty!(created.changed().collect::<Vec<_>>());

    let found = assert_ok!(db.find_one("Todo", id.clone()).await);
    assert_eq!(found.get("Id"), &id);
    assert_eq!(found.get("Title"), &Value::from("write docs"));
    assert_eq!(found.get("Priority"), &Value::from(2));
    // Defaults are applied on create
    assert_eq!(found.get("Done"), &Value::from(false));

    for (field, value) in created.values() {
        assert_eq!(found.get(field), value, "field `{field}`");
    }
}

#[tokio::test]
async fn queries_default_to_primary_key_order() {
    let db = memory_db([todo()]).await;

    for id in [3, 1, 2] {
        let mut record = new_todo("t", 0).with("Id", id);
        assert_ok!(db.create(&mut record).await);
    }

    let all = assert_ok!(db.query("Todo").all().await);
    assert_eq!(ids(&all), vec![Value::from(1), Value::from(2), Value::from(3)]);

    // A generated key continues after the largest explicit one
    let mut next = new_todo("t", 0);
    assert_ok!(db.create(&mut next).await);
    assert_eq!(next.get("Id"), &Value::from(4));
}

#[tokio::test]
async fn sort_limit_and_offset() {
    let db = memory_db([todo()]).await;

    for (title, priority) in [("b", 1), ("d", 3), ("a", 2), ("c", 5)] {
        assert_ok!(db.create(&mut new_todo(title, priority)).await);
    }

    let titles = |records: Vec<Record>| {
        records
            .iter()
            .map(|record| record.get("Title").clone())
            .collect::<Vec<_>>()
    };

    let sorted = assert_ok!(db.query("Todo").sort("-Priority").all().await);
    assert_eq!(
        titles(sorted),
        vec![
            Value::from("c"),
            Value::from("d"),
            Value::from("a"),
            Value::from("b")
        ]
    );

    let page = assert_ok!(db.query("Todo").sort("Title").offset(1).limit(2).all().await);
    assert_eq!(titles(page), vec![Value::from("b"), Value::from("c")]);

    // Count ignores paging
    assert_eq!(assert_ok!(db.query("Todo").limit(1).count().await), 4);
}

#[tokio::test]
async fn filters() {
    let db = memory_db([todo()]).await;

    for (title, priority) in [("a", 1), ("b", 2), ("c", 3)] {
        assert_ok!(db.create(&mut new_todo(title, priority)).await);
    }

    let high = assert_ok!(db.query("Todo").filter_op("Priority", ">", 1).all().await);
    assert_eq!(ids(&high), vec![Value::from(2), Value::from(3)]);

    let picked = assert_ok!(
        db.query("Todo")
            .filter_op("Title", "in", vec![Value::from("a"), Value::from("c")])
            .all()
            .await
    );
    assert_eq!(ids(&picked), vec![Value::from(1), Value::from(3)]);

    // Filters combine with AND and accept column names
    let none = assert_ok!(
        db.query("Todo")
            .filter("priority", 1)
            .filter("Title", "b")
            .count()
            .await
    );
    assert_eq!(none, 0);

    let err = assert_err!(db.query("Todo").filter_op("Priority", "~~", 1).all().await);
    assert!(err.is_invalid_expression());

    let err = assert_err!(db.query("Todo").filter("Nope", 1).all().await);
    assert!(err.is_unknown_field());

    let err = assert_err!(db.query("Nope").all().await);
    assert!(err.is_unknown_collection());
}

#[tokio::test]
async fn memory_backend_rejects_unsupported_query_shapes() {
    let db = memory_db([todo()]).await;

    let err = assert_err!(db.query("Todo").select(["Title"]).all().await);
    assert!(err.is_unsupported_field_projection());

    let err = assert_err!(db.query("Todo").sort("Title").sort("-Id").all().await);
    assert!(err.is_unsupported_multi_sort());
}

#[tokio::test]
async fn update_persists_changed_fields() {
    let db = memory_db([todo()]).await;

    let mut record = new_todo("draft", 1);
    assert_ok!(db.create(&mut record).await);

    let mut loaded = assert_ok!(db.find_one("Todo", record.get("Id").clone()).await);
    loaded.set("Title", "final");
    assert_eq!(loaded.changed().collect::<Vec<_>>(), vec!["Title"]);
    assert_ok!(db.update(&mut loaded).await);
    assert_empty!(loaded.changed().collect::<Vec<_>>());

    let found = assert_ok!(db.find_one("Todo", record.get("Id").clone()).await);
    assert_eq!(found.get("Title"), &Value::from("final"));
    assert_eq!(found.get("Priority"), &Value::from(1));
}

#[tokio::test]
async fn update_by_fields_writes_only_named_fields() {
    let db = memory_db([todo()]).await;

    let mut record = new_todo("draft", 1);
    assert_ok!(db.create(&mut record).await);

    // A pending change outside the named fields stays unsaved
    record.set("Priority", 9);
    assert_ok!(db.update_by_fields(&mut record, [("Done", true)]).await);

    let found = assert_ok!(db.find_one("Todo", record.get("Id").clone()).await);
    assert_eq!(found.get("Done"), &Value::from(true));
    assert_eq!(found.get("Priority"), &Value::from(1));

    let err = assert_err!(
        db.update_by_fields(&mut record, Vec::<(&str, Value)>::new())
            .await
    );
    assert!(err.is_empty_model_data());

    let err = assert_err!(db.update_by_fields(&mut record, [("Nope", 1)]).await);
    assert!(err.is_unknown_field());
}

#[tokio::test]
async fn unpersisted_records_cannot_be_updated_or_deleted() {
    let db = memory_db([todo()]).await;

    let mut record = new_todo("never saved", 1);
    assert!(assert_err!(db.update(&mut record).await).is_unpersisted_model());
    assert!(assert_err!(db.delete(&mut record).await).is_unpersisted_model());
}

#[tokio::test]
async fn create_without_data_fails() {
    let db = memory_db([todo()]).await;

    let err = assert_err!(db.create(&mut Record::new("Todo")).await);
    assert!(err.is_empty_model_data());
    assert_eq!(assert_ok!(db.query("Todo").count().await), 0);
}

#[tokio::test]
async fn delete_removes_the_record() {
    let db = memory_db([todo()]).await;

    let mut record = new_todo("gone", 1);
    assert_ok!(db.create(&mut record).await);
    assert_ok!(db.delete(&mut record).await);

    let err = assert_err!(db.find_one("Todo", record.get("Id").clone()).await);
    assert!(err.is_record_not_found());

    // Deleting twice reports the missing record
    let err = assert_err!(db.delete(&mut record).await);
    assert!(err.is_record_not_found());
    assert_eq!(err.to_string(), "record not found: collection=todo key=1");
}

#[tokio::test]
async fn find_by_field() {
    let db = memory_db([todo()]).await;

    assert_ok!(db.create(&mut new_todo("one", 1)).await);
    assert_ok!(db.create(&mut new_todo("two", 2)).await);

    let found = assert_ok!(db.find_by("Todo", "Title", "two").await);
    assert_eq!(found.get("Priority"), &Value::from(2));

    let err = assert_err!(db.find_by("Todo", "Title", "three").await);
    assert!(err.is_record_not_found());
}

#[tokio::test]
async fn delete_many_removes_matches() {
    let db = memory_db([todo()]).await;

    for priority in [1, 2, 2, 3] {
        assert_ok!(db.create(&mut new_todo("t", priority)).await);
    }

    let removed = assert_ok!(db.delete_many(db.query("Todo").filter("Priority", 2)).await);
    assert_eq!(removed, 2);

    let left = assert_ok!(db.query("Todo").all().await);
    assert_eq!(ids(&left), vec![Value::from(1), Value::from(4)]);
}

#[tokio::test]
async fn field_validation() {
    let db = memory_db([ModelDef::new("Account")
        .field(Field::i64("Id").primary_key().auto_increment())
        .field(Field::string("Name").required().min_len(2).max_len(8))
        .field(Field::i64("Age").min(0.0).max(150.0))])
    .await;

    let mut missing = Record::new("Account").with("Age", 3);
    let err = assert_err!(db.create(&mut missing).await);
    assert!(err.is_validation());
    assert_eq!(err.to_string(), "validation failed: `Name` is required");

    let mut blank = Record::new("Account").with("Name", "");
    assert!(assert_err!(db.create(&mut blank).await).is_validation());

    let mut short = Record::new("Account").with("Name", "a");
    let err = assert_err!(db.create(&mut short).await);
    assert_eq!(
        err.to_string(),
        "validation failed: `Name` length 1 is too short (minimum: 2)"
    );

    let mut old = Record::new("Account").with("Name", "ann").with("Age", 200);
    assert!(assert_err!(db.create(&mut old).await).is_validation());

    assert_eq!(assert_ok!(db.query("Account").count().await), 0);

    // Updates check only the fields on the record
    let mut ok = Record::new("Account").with("Name", "ann");
    assert_ok!(db.create(&mut ok).await);

    let mut partial = Record::new("Account").with("Id", ok.get("Id").clone());
    partial.set("Age", -1);
    assert!(assert_err!(db.update(&mut partial).await).is_validation());

    partial.set("Age", 30);
    assert_ok!(db.update(&mut partial).await);
}

#[tokio::test]
async fn unique_fields_and_groups() {
    let db = memory_db([ModelDef::new("Member")
        .field(Field::i64("Id").primary_key().auto_increment())
        .field(Field::string("Email").unique())
        .field(Field::i64("OrgId").unique_with("seat"))
        .field(Field::i64("Seat").unique_with("seat"))])
    .await;

    let member = |email: &str, seat: i64| {
        Record::new("Member")
            .with("Email", email)
            .with("OrgId", 1)
            .with("Seat", seat)
    };

    assert_ok!(db.create(&mut member("a@x", 1)).await);

    let err = assert_err!(db.create(&mut member("a@x", 2)).await);
    assert!(err.is_unique_violation());

    let err = assert_err!(db.create(&mut member("b@x", 1)).await);
    assert!(err.is_unique_violation());

    assert_ok!(db.create(&mut member("b@x", 2)).await);
    assert_eq!(assert_ok!(db.query("Member").count().await), 2);
}

#[tokio::test]
async fn explicit_duplicate_key_fails() {
    let db = memory_db([todo()]).await;

    assert_ok!(db.create(&mut new_todo("a", 1).with("Id", 7)).await);

    let err = assert_err!(db.create(&mut new_todo("b", 1).with("Id", 7)).await);
    assert!(err.is_primary_key_exists());
}

#[tokio::test]
async fn models_registered_late_need_a_build() {
    let db = memory_db([todo()]).await;

    assert_ok!(db.register(
        ModelDef::new("Note")
            .field(Field::i64("Id").primary_key().auto_increment())
            .field(Field::string("Body"))
    ));

    let err = assert_err!(db.query("Note").all().await);
    assert!(err.is_model_not_built());

    assert_ok!(db.build());
    assert_ok!(db.push_schema().await);

    assert_ok!(db.create(&mut Record::new("Note").with("Body", "hi")).await);
    assert_eq!(assert_ok!(db.query("Note").count().await), 1);

    // Existing collections keep their rows
    assert_ok!(db.create(&mut new_todo("kept", 1)).await);
    assert_eq!(assert_ok!(db.query("Todo").count().await), 1);
}

#[tokio::test]
async fn table_prefix_applies_to_collections() {
    support::init_logging();

    let mut builder = relorm::Db::builder();
    builder.table_name_prefix("app_").register_model(todo());
    let db = assert_ok!(builder.build(relorm::Memory::new()).await);

    let model = assert_ok!(db.model("Todo"));
    assert_eq!(model.table, "app_todo");
    assert_eq!(model.field("Priority").unwrap().column, "priority");
}

#[tokio::test]
async fn time_and_structured_fields_round_trip() {
    let db = memory_db([ModelDef::new("Event")
        .field(Field::i64("Id").primary_key().auto_increment())
        .field(Field::time("At"))
        .field(Field::json("Meta").marshal())
        .field(Field::json("Place").embed([("City", Type::String), ("Zip", Type::I64)]))])
    .await;

    let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
    let mut record = Record::new("Event")
        .with("At", at)
        .with("Meta", json!({"tags": ["launch"]}))
        .with("Place", json!({"City": "Lyon", "Zip": 69001}));
    assert_ok!(db.create(&mut record).await);

    let found = assert_ok!(db.find_one("Event", record.get("Id").clone()).await);
    assert_eq!(found.get("At"), &Value::from(at));
    assert_eq!(found.get("Meta"), &Value::from(json!({"tags": ["launch"]})));
    assert_eq!(
        found.get("Place"),
        &Value::from(json!({"City": "Lyon", "Zip": 69001}))
    );

    // Embedded fields span several columns
    let err = assert_err!(db.query("Event").filter("Place", "Lyon").all().await);
    assert!(err.is_unsupported_construct());
}
