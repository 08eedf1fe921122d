mod support;

use pretty_assertions::assert_eq;
use relorm::{Field, Record};
use std_util::prelude::*;
use support::{memory_db, project, task, todo};

fn new_todo(title: &str) -> Record {
    Record::new("Todo").with("Title", title)
}

#[tokio::test]
async fn committed_changes_become_visible() {
    let db = memory_db([todo()]).await;

    let tx = assert_ok!(db.transaction().await);
    assert_ok!(tx.create(&mut new_todo("a")).await);
    assert_ok!(tx.create(&mut new_todo("b")).await);

    assert_eq!(assert_ok!(tx.query("Todo").count().await), 2);
    assert_eq!(assert_ok!(db.query("Todo").count().await), 0);

    assert_ok!(tx.commit().await);
    assert_eq!(assert_ok!(db.query("Todo").count().await), 2);
}

#[tokio::test]
async fn rolled_back_changes_are_discarded() {
    let db = memory_db([todo()]).await;

    let mut kept = new_todo("kept");
    assert_ok!(db.create(&mut kept).await);

    let tx = assert_ok!(db.transaction().await);
    assert_ok!(tx.create(&mut new_todo("dropped")).await);
    assert_ok!(tx.delete(&mut kept.clone()).await);
    assert_ok!(tx.rollback().await);

    let all = assert_ok!(db.query("Todo").all().await);
    assert_eq!(all.only().get("Title"), kept.get("Title"));
}

#[tokio::test]
async fn dropped_transactions_are_discarded() {
    let db = memory_db([todo()]).await;

    {
        let tx = assert_ok!(db.transaction().await);
        assert_ok!(tx.create(&mut new_todo("lost")).await);
    }

    assert_eq!(assert_ok!(db.query("Todo").count().await), 0);
}

#[tokio::test]
async fn finished_transactions_reject_operations() {
    let db = memory_db([todo()]).await;

    let tx = assert_ok!(db.transaction().await);
    let handle = (*tx).clone();
    assert_ok!(tx.commit().await);

    assert!(assert_err!(tx.commit().await).is_transaction_closed());
    assert!(assert_err!(tx.rollback().await).is_transaction_closed());
    assert!(assert_err!(tx.query("Todo").all().await).is_transaction_closed());

    // Clones taken from the transaction are closed too
    let err = assert_err!(handle.create(&mut new_todo("late")).await);
    assert!(err.is_transaction_closed());

    // The originating handle is unaffected
    assert_ok!(db.create(&mut new_todo("after")).await);
}

#[tokio::test]
async fn transactions_do_not_nest() {
    let db = memory_db([todo()]).await;

    let tx = assert_ok!(db.transaction().await);
    let err = assert_err!(tx.transaction().await);
    assert!(err.is_unsupported_construct());
    assert_ok!(tx.rollback().await);
}

#[tokio::test]
async fn a_failed_cascade_can_be_rolled_back() {
    let db = memory_db([
        project().field(Field::many("Tasks", "Task").auto_create()),
        task(),
    ])
    .await;

    let tx = assert_ok!(db.transaction().await);

    // The second task is missing its required name
    let mut record = Record::new("Project").with("Name", "docs").with_many(
        "Tasks",
        vec![
            Record::new("Task").with("Name", "a"),
            Record::new("Task"),
        ],
    );
    let err = assert_err!(tx.create(&mut record).await);
    assert!(err.is_validation());

    assert_eq!(assert_ok!(tx.query("Project").count().await), 1);
    assert_ok!(tx.rollback().await);

    assert_eq!(assert_ok!(db.query("Project").count().await), 0);
    assert_eq!(assert_ok!(db.query("Task").count().await), 0);
}
