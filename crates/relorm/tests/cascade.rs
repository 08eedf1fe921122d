mod support;

use pretty_assertions::assert_eq;
use relorm::{bail, Db, Field, HookStage, Memory, ModelDef, Record, Value};
use std_util::prelude::*;
use support::{memory_db, project, task};

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

fn new_task(name: &str) -> Record {
    Record::new("Task").with("Name", name)
}

fn new_project(name: &str) -> Record {
    Record::new("Project").with("Name", name)
}

#[tokio::test]
async fn has_one_target_is_created_first() {
    let db = memory_db([
        task().field(Field::one("Project", "Project").auto_create()),
        project(),
    ])
    .await;

    let mut record = new_task("write").with_one("Project", new_project("docs"));
    assert_ok!(db.create(&mut record).await);

    assert_eq!(assert_ok!(db.query("Project").count().await), 1);
    assert_eq!(assert_ok!(db.query("Task").count().await), 1);

    let project_id = assert_some!(record.one("Project")).get("Id").clone();
    assert!(!project_id.is_zero());
    assert_eq!(record.get("ProjectId"), &project_id);

    let stored = assert_ok!(db.find_one("Task", record.get("Id").clone()).await);
    assert_eq!(stored.get("ProjectId"), &project_id);
}

#[tokio::test]
async fn unpersisted_target_is_skipped_without_auto_create() {
    let db = memory_db([
        task().field(Field::one("Project", "Project")),
        project(),
    ])
    .await;

    let mut record = new_task("write").with_one("Project", new_project("docs"));
    assert_ok!(db.create(&mut record).await);

    assert_eq!(assert_ok!(db.query("Project").count().await), 0);
    assert_eq!(assert_ok!(db.query("Task").count().await), 1);
    assert!(record.get("ProjectId").is_null());

    // An already persisted target still provides the key
    let mut existing = new_project("existing");
    assert_ok!(db.create(&mut existing).await);

    let mut linked = new_task("linked").with_one("Project", existing.clone());
    assert_ok!(db.create(&mut linked).await);
    assert_eq!(linked.get("ProjectId"), existing.get("Id"));
}

#[tokio::test]
async fn required_key_is_checked_when_target_is_skipped() {
    let db = memory_db([
        ModelDef::new("Task")
            .field(Field::i64("Id").primary_key().auto_increment())
            .field(Field::string("Name").required())
            .field(Field::i64("ProjectId").required())
            .field(Field::one("Project", "Project")),
        project(),
    ])
    .await;

    let err = assert_err!(db.create(&mut new_task("a")).await);
    assert!(err.is_validation());

    // The unpersisted target will not provide a key
    let mut record = new_task("b").with_one("Project", new_project("docs"));
    let err = assert_err!(db.create(&mut record).await);
    assert!(err.is_validation());
    assert_eq!(err.to_string(), "validation failed: `ProjectId` is required");
    assert_eq!(assert_ok!(db.query("Task").count().await), 0);

    // A persisted target does
    let mut existing = new_project("existing");
    assert_ok!(db.create(&mut existing).await);

    let mut linked = new_task("c").with_one("Project", existing.clone());
    assert_ok!(db.create(&mut linked).await);
    assert_eq!(linked.get("ProjectId"), existing.get("Id"));
}

#[tokio::test]
async fn has_many_children_receive_the_owner_key() {
    let db = memory_db([
        project().field(Field::many("Tasks", "Task").auto_create()),
        task(),
    ])
    .await;

    let mut record = new_project("docs").with_many("Tasks", vec![new_task("a"), new_task("b")]);
    assert_ok!(db.create(&mut record).await);

    let id = record.get("Id").clone();
    for child in record.many("Tasks") {
        assert_eq!(child.get("ProjectId"), &id);
        assert!(!child.get("Id").is_zero());
    }

    let stored = assert_ok!(db.query("Task").filter("ProjectId", id).all().await);
    assert_eq!(stored.len(), 2);

    // Without auto-create only the owner is written
    let db = memory_db([
        project().field(Field::many("Tasks", "Task")),
        task(),
    ])
    .await;

    let mut record = new_project("docs").with_many("Tasks", vec![new_task("a")]);
    assert_ok!(db.create(&mut record).await);
    assert_eq!(assert_ok!(db.query("Project").count().await), 1);
    assert_eq!(assert_ok!(db.query("Task").count().await), 0);
}

#[tokio::test]
async fn belongs_to_target_is_created_after_the_owner() {
    let db = memory_db([
        ModelDef::new("User")
            .field(Field::i64("Id").primary_key().auto_increment())
            .field(Field::string("Name"))
            .field(Field::one("Profile", "Profile").auto_create()),
        ModelDef::new("Profile")
            .field(Field::i64("Id").primary_key().auto_increment())
            .field(Field::string("Bio"))
            .field(Field::i64("UserId")),
    ])
    .await;

    let relation = assert_ok!(db.model("User")).relation("Profile").unwrap().clone();
    assert_eq!(relation.kind.to_string(), "belongs-to");

    let profile = Record::new("Profile").with("Bio", "hello");
    let mut user = Record::new("User").with("Name", "ann").with_one("Profile", profile);
    assert_ok!(db.create(&mut user).await);

    let profile = assert_some!(user.one("Profile"));
    assert_eq!(profile.get("UserId"), user.get("Id"));

    let loaded = assert_ok!(db.query("User").join("Profile").all().await);
    let loaded = loaded.only();
    assert_eq!(
        assert_some!(loaded.one("Profile")).get("Bio"),
        &Value::from("hello")
    );
}

#[tokio::test]
async fn mutual_auto_create_is_rejected_at_build() {
    support::init_logging();

    let mut builder = Db::builder();
    builder
        .register_model(
            ModelDef::new("Husband")
                .field(Field::i64("Id").primary_key().auto_increment())
                .field(Field::i64("WifeId"))
                .field(Field::one("Wife", "Wife").auto_create()),
        )
        .register_model(
            ModelDef::new("Wife")
                .field(Field::i64("Id").primary_key().auto_increment())
                .field(Field::i64("HusbandId"))
                .field(Field::one("Husband", "Husband").auto_create()),
        );

    let err = assert_err!(builder.build(Memory::new()).await);
    assert!(err.is_invalid_schema());

    // A self reference is allowed
    let mut builder = Db::builder();
    builder.register_model(
        ModelDef::new("Node")
            .field(Field::i64("Id").primary_key().auto_increment())
            .field(Field::i64("ParentId"))
            .field(Field::one("Parent", "Node").auto_create()),
    );
    assert_ok!(builder.build(Memory::new()).await);
}

#[tokio::test]
async fn delete_cascades_only_when_enabled() {
    let db = memory_db([
        project().field(Field::many("Tasks", "Task").auto_create()),
        task(),
    ])
    .await;

    let mut record = new_project("docs").with_many("Tasks", vec![new_task("a"), new_task("b")]);
    assert_ok!(db.create(&mut record).await);
    assert_ok!(db.delete(&mut record).await);

    assert_eq!(assert_ok!(db.query("Project").count().await), 0);
    assert_eq!(assert_ok!(db.query("Task").count().await), 2);

    let deleted = Arc::new(AtomicUsize::new(0));
    let counter = deleted.clone();

    let db = memory_db([
        project().field(Field::many("Tasks", "Task").auto_create().auto_delete()),
        task().before_delete(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }),
    ])
    .await;

    let mut record = new_project("docs").with_many("Tasks", vec![new_task("a"), new_task("b")]);
    assert_ok!(db.create(&mut record).await);

    let mut other = new_project("other").with_many("Tasks", vec![new_task("c")]);
    assert_ok!(db.create(&mut other).await);

    assert_ok!(db.delete(&mut record).await);

    // Children are deleted one by one, with their hooks
    assert_eq!(deleted.load(Ordering::SeqCst), 2);
    let left = assert_ok!(db.query("Task").all().await);
    assert_eq!(left.only().get("Name"), &Value::from("c"));
}

#[tokio::test]
async fn before_create_failure_aborts_the_graph() {
    let db = memory_db([
        project()
            .field(Field::many("Tasks", "Task").auto_create())
            .before_create(|record| {
                if record.get("Name") == &Value::from("reserved") {
                    bail!("name is reserved");
                }
                Ok(())
            }),
        task(),
    ])
    .await;

    let mut record = new_project("reserved").with_many("Tasks", vec![new_task("a")]);
    let err = assert_err!(db.create(&mut record).await);

    assert!(err.is_hook());
    assert_eq!(err.hook_stage(), Some(HookStage::BeforeCreate));
    assert_eq!(err.to_string(), "before_create hook failed: name is reserved");

    assert_eq!(assert_ok!(db.query("Project").count().await), 0);
    assert_eq!(assert_ok!(db.query("Task").count().await), 0);
}

#[tokio::test]
async fn validate_hook_runs_after_before_create() {
    let db = memory_db([project()
        .before_create(|record| {
            let name = record.get("Name").as_str().unwrap_or_default().trim().to_string();
            record.set("Name", name);
            Ok(())
        })
        .validate(|record| {
            if record.get("Name").as_str().is_some_and(|name| name.contains(' ')) {
                bail!("name must be one word");
            }
            Ok(())
        })])
    .await;

    let mut record = new_project("  docs  ");
    assert_ok!(db.create(&mut record).await);

    let stored = assert_ok!(db.find_one("Project", record.get("Id").clone()).await);
    assert_eq!(stored.get("Name"), &Value::from("docs"));

    let err = assert_err!(db.create(&mut new_project("two words")).await);
    assert_eq!(err.hook_stage(), Some(HookStage::Validate));
    assert_eq!(assert_ok!(db.query("Project").count().await), 1);
}

#[tokio::test]
async fn after_hook_errors_do_not_fail_the_operation() {
    let db = memory_db([project()
        .after_create(|_| bail!("ignored"))
        .after_update(|_| bail!("ignored"))
        .after_delete(|_| bail!("ignored"))
        .after_query(|_| bail!("ignored"))])
    .await;

    let mut record = new_project("docs");
    assert_ok!(db.create(&mut record).await);

    record.set("Name", "renamed");
    assert_ok!(db.update(&mut record).await);

    let all = assert_ok!(db.query("Project").all().await);
    assert_eq!(all.only().get("Name"), &Value::from("renamed"));

    assert_ok!(db.delete(&mut record).await);
    assert_eq!(assert_ok!(db.query("Project").count().await), 0);
}

#[tokio::test]
async fn after_query_adjusts_loaded_records() {
    let db = memory_db([project().after_query(|record| {
        let name = record.get("Name").as_str().unwrap_or_default().to_uppercase();
        record.set_loaded("Name", name);
        Ok(())
    })])
    .await;

    assert_ok!(db.create(&mut new_project("docs")).await);

    let loaded = assert_ok!(db.query("Project").all().await);
    let loaded = loaded.only();
    assert_eq!(loaded.get("Name"), &Value::from("DOCS"));
    assert_empty!(loaded.changed().collect::<Vec<_>>());
}

#[tokio::test]
async fn update_cascades_into_loaded_children() {
    let db = memory_db([
        project().field(Field::many("Tasks", "Task").auto_create().auto_update()),
        task(),
    ])
    .await;

    let mut record = new_project("docs").with_many("Tasks", vec![new_task("a"), new_task("b")]);
    assert_ok!(db.create(&mut record).await);

    let mut loaded = assert_ok!(db.query("Project").join("Tasks").all().await);
    let project = &mut loaded[0];
    assert_eq!(project.many("Tasks").len(), 2);

    let tasks = assert_some!(project.many_mut("Tasks"));
    tasks[0].set("Name", "renamed");
    assert_ok!(db.update(project).await);

    let first = assert_ok!(db.find_one("Task", record.many("Tasks")[0].get("Id").clone()).await);
    assert_eq!(first.get("Name"), &Value::from("renamed"));

    let second = assert_ok!(db.find_one("Task", record.many("Tasks")[1].get("Id").clone()).await);
    assert_eq!(second.get("Name"), &Value::from("b"));
}
