mod support;

use pretty_assertions::assert_eq;
use relorm::{Db, Field, ModelDef, Record, Value};
use std_util::prelude::*;
use support::{memory_db, post, tag};

async fn blog(tags: Field) -> Db {
    memory_db([post().field(tags), tag()]).await
}

async fn create(db: &Db, collection: &str, field: &str, value: &str) -> Record {
    let mut record = Record::new(collection).with(field, value);
    assert_ok!(db.create(&mut record).await);
    record
}

fn names(records: &[Record]) -> Vec<Value> {
    records.iter().map(|record| record.get("Name").clone()).collect()
}

#[tokio::test]
async fn join_collection_is_derived_from_the_relation() {
    let db = blog(Field::many("Tags", "Tag").many_to_many()).await;

    let model = assert_ok!(db.model("Post"));
    let join = assert_some!(model.relation("Tags").unwrap().join.clone());
    assert_eq!(join.name, "post_tags");
    assert_eq!(join.owner_column, "post_id");
    assert_eq!(join.target_column, "tag_id");
}

#[tokio::test]
async fn models_can_link_to_themselves() {
    let db = memory_db([ModelDef::new("User")
        .field(Field::i64("Id").primary_key().auto_increment())
        .field(Field::string("Name"))
        .field(Field::many("Friends", "User").many_to_many())])
    .await;

    let ann = create(&db, "User", "Name", "ann").await;
    let bob = create(&db, "User", "Name", "bob").await;

    let friends = assert_ok!(db.many_to_many(&ann, "Friends"));
    assert_ok!(friends.add([&bob]).await);

    assert!(assert_ok!(friends.contains(&bob).await));
    assert!(!assert_ok!(friends.contains(&ann).await));
    assert_eq!(names(&assert_ok!(friends.all().await)), vec![Value::from("bob")]);

    // Links are directed
    let theirs = assert_ok!(db.many_to_many(&bob, "Friends"));
    assert_eq!(assert_ok!(theirs.count().await), 0);
}

#[tokio::test]
async fn add_skips_existing_links() {
    let db = blog(Field::many("Tags", "Tag").many_to_many()).await;

    let post = create(&db, "Post", "Title", "hello").await;
    let rust = create(&db, "Tag", "Name", "rust").await;
    let orm = create(&db, "Tag", "Name", "orm").await;
    let db_tag = create(&db, "Tag", "Name", "db").await;

    let tags = assert_ok!(db.many_to_many(&post, "Tags"));
    assert_eq!(tags.owner_key(), post.get("Id"));

    assert_ok!(tags.add([&rust, &orm]).await);
    assert_ok!(tags.add([&orm, &db_tag, &db_tag]).await);
    assert_eq!(assert_ok!(tags.count().await), 3);

    // Members come back in the order they were linked
    let all = assert_ok!(tags.all().await);
    assert_eq!(
        names(&all),
        vec![Value::from("rust"), Value::from("orm"), Value::from("db")]
    );
    assert_eq!(
        assert_ok!(tags.ids().await),
        vec![rust.get("Id").clone(), orm.get("Id").clone(), db_tag.get("Id").clone()]
    );
}

#[tokio::test]
async fn keys_identify_members() {
    let db = blog(Field::many("Tags", "Tag").many_to_many()).await;

    let post = create(&db, "Post", "Title", "hello").await;
    let rust = create(&db, "Tag", "Name", "rust").await;
    let orm = create(&db, "Tag", "Name", "orm").await;

    let tags = assert_ok!(db.many_to_many(&post, "Tags"));
    assert_ok!(tags.add([2_i64, 1]).await);

    assert!(assert_ok!(tags.contains(&rust).await));
    assert!(assert_ok!(tags.contains(orm.get("Id").clone()).await));
    assert_eq!(names(&assert_ok!(tags.all().await)), vec![Value::from("orm"), Value::from("rust")]);

    let unsaved = Record::new("Tag").with("Name", "new");
    assert!(assert_err!(tags.add([&unsaved]).await).is_unpersisted_model());

    let wrong = Record::new("Post").with("Id", 1);
    assert!(assert_err!(tags.add([&wrong]).await).is_unsupported());
}

#[tokio::test]
async fn remove_and_clear_only_touch_the_owner() {
    let db = blog(Field::many("Tags", "Tag").many_to_many()).await;

    let first = create(&db, "Post", "Title", "first").await;
    let second = create(&db, "Post", "Title", "second").await;
    let rust = create(&db, "Tag", "Name", "rust").await;
    let orm = create(&db, "Tag", "Name", "orm").await;

    let first_tags = assert_ok!(db.many_to_many(&first, "Tags"));
    let second_tags = assert_ok!(db.many_to_many(&second, "Tags"));

    assert_ok!(first_tags.add([&rust, &orm]).await);
    assert_ok!(second_tags.add([&rust, &orm]).await);

    assert_ok!(first_tags.remove([&rust]).await);
    assert!(!assert_ok!(first_tags.contains(&rust).await));
    assert!(assert_ok!(second_tags.contains(&rust).await));

    // Removing a non-member is a no-op
    assert_ok!(first_tags.remove([&rust]).await);
    assert_eq!(assert_ok!(first_tags.count().await), 1);

    assert_ok!(first_tags.clear().await);
    assert_eq!(assert_ok!(first_tags.count().await), 0);
    assert_eq!(assert_ok!(second_tags.count().await), 2);

    // Tags themselves are untouched
    assert_eq!(assert_ok!(db.query("Tag").count().await), 2);
}

#[tokio::test]
async fn replace_sets_exact_membership() {
    let db = blog(Field::many("Tags", "Tag").many_to_many()).await;

    let post = create(&db, "Post", "Title", "hello").await;
    let rust = create(&db, "Tag", "Name", "rust").await;
    let orm = create(&db, "Tag", "Name", "orm").await;
    let db_tag = create(&db, "Tag", "Name", "db").await;

    let tags = assert_ok!(db.many_to_many(&post, "Tags"));
    assert_ok!(tags.add([&rust]).await);

    for _ in 0..2 {
        assert_ok!(tags.replace([&orm, &db_tag]).await);
        assert_eq!(
            names(&assert_ok!(tags.all().await)),
            vec![Value::from("orm"), Value::from("db")]
        );
    }

    assert_ok!(tags.replace(Vec::<&Record>::new()).await);
    assert_empty!(assert_ok!(tags.all().await));
}

#[tokio::test]
async fn owner_must_be_persisted_and_relation_many_to_many() {
    let db = memory_db([
        post()
            .field(Field::many("Tags", "Tag").many_to_many())
            .field(Field::one("Author", "Author")),
        tag(),
        ModelDef::new("Author")
            .field(Field::i64("Id").primary_key().auto_increment())
            .field(Field::i64("PostId")),
    ])
    .await;

    let unsaved = Record::new("Post").with("Title", "draft");
    assert!(assert_err!(db.many_to_many(&unsaved, "Tags")).is_unpersisted_model());

    let post = create(&db, "Post", "Title", "hello").await;
    assert!(assert_err!(db.many_to_many(&post, "Author")).is_unsupported());
    assert!(assert_err!(db.many_to_many(&post, "Nope")).is_unknown_relation());
}

#[tokio::test]
async fn create_links_related_records() {
    let db = blog(Field::many("Tags", "Tag").many_to_many().auto_create()).await;

    let existing = create(&db, "Tag", "Name", "existing").await;

    let mut post = Record::new("Post").with("Title", "hello").with_many(
        "Tags",
        vec![Record::new("Tag").with("Name", "fresh"), existing.clone()],
    );
    assert_ok!(db.create(&mut post).await);

    assert_eq!(assert_ok!(db.query("Tag").count().await), 2);

    let tags = assert_ok!(db.many_to_many(&post, "Tags"));
    assert_eq!(
        names(&assert_ok!(tags.all().await)),
        vec![Value::from("fresh"), Value::from("existing")]
    );

    // Loading through the relation keeps link order
    let loaded = assert_ok!(db.query("Post").join("Tags").all().await);
    assert_eq!(
        names(loaded.only().many("Tags")),
        vec![Value::from("fresh"), Value::from("existing")]
    );
}

#[tokio::test]
async fn create_without_auto_create_does_not_link() {
    let db = blog(Field::many("Tags", "Tag").many_to_many()).await;

    let existing = create(&db, "Tag", "Name", "existing").await;
    let mut post = Record::new("Post")
        .with("Title", "hello")
        .with_many("Tags", vec![existing]);
    assert_ok!(db.create(&mut post).await);

    let tags = assert_ok!(db.many_to_many(&post, "Tags"));
    assert_eq!(assert_ok!(tags.count().await), 0);
}

#[tokio::test]
async fn deleting_the_owner_clears_links_when_enabled() {
    let db = blog(Field::many("Tags", "Tag").many_to_many().auto_delete()).await;

    let mut post = create(&db, "Post", "Title", "hello").await;
    let other = create(&db, "Post", "Title", "other").await;
    let rust = create(&db, "Tag", "Name", "rust").await;

    assert_ok!(assert_ok!(db.many_to_many(&post, "Tags")).add([&rust]).await);
    assert_ok!(assert_ok!(db.many_to_many(&other, "Tags")).add([&rust]).await);

    let tags = assert_ok!(db.many_to_many(&post, "Tags"));
    assert_ok!(db.delete(&mut post).await);

    assert_eq!(assert_ok!(tags.count().await), 0);
    assert_eq!(
        assert_ok!(assert_ok!(db.many_to_many(&other, "Tags")).count().await),
        1
    );
    assert_eq!(assert_ok!(db.query("Tag").count().await), 1);
}
