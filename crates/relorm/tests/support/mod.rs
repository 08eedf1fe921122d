#![allow(dead_code)]

pub mod exec_log;
pub use exec_log::ExecLog;

use relorm::{Db, Field, Memory, ModelDef};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Builds a registry of `defs` over a fresh in-memory backend and creates
/// their collections.
pub async fn memory_db(defs: impl IntoIterator<Item = ModelDef>) -> Db {
    init_logging();

    let mut builder = Db::builder();
    for def in defs {
        builder.register_model(def);
    }

    let db = builder.build(Memory::new()).await.unwrap();
    db.push_schema().await.unwrap();
    db
}

pub fn todo() -> ModelDef {
    ModelDef::new("Todo")
        .field(Field::i64("Id").primary_key().auto_increment())
        .field(Field::string("Title").required().max_len(32))
        .field(Field::bool("Done").default(false))
        .field(Field::i64("Priority"))
}

pub fn project() -> ModelDef {
    ModelDef::new("Project")
        .field(Field::i64("Id").primary_key().auto_increment())
        .field(Field::string("Name").required())
}

pub fn task() -> ModelDef {
    ModelDef::new("Task")
        .field(Field::i64("Id").primary_key().auto_increment())
        .field(Field::string("Name").required())
        .field(Field::i64("ProjectId"))
}

pub fn post() -> ModelDef {
    ModelDef::new("Post")
        .field(Field::i64("Id").primary_key().auto_increment())
        .field(Field::string("Title"))
}

pub fn tag() -> ModelDef {
    ModelDef::new("Tag")
        .field(Field::i64("Id").primary_key().auto_increment())
        .field(Field::string("Name"))
}
