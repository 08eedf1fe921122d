use heck::{ToSnakeCase, ToUpperCamelCase};

/// Backend name of a collection: the snake-cased model name behind `prefix`.
pub(crate) fn table_name(prefix: &str, model: &str) -> String {
    format!("{prefix}{}", model.to_snake_case())
}

pub(crate) fn column_name(field: &str) -> String {
    field.to_snake_case()
}

/// Foreign-key names tried for a relation named `name`, logical form first.
pub(crate) fn foreign_key_candidates(name: &str) -> [String; 2] {
    [
        format!("{}Id", name.to_upper_camel_case()),
        format!("{}_id", name.to_snake_case()),
    ]
}

/// Column of a join collection holding the key of `table`.
pub(crate) fn join_column(table: &str, pk_column: &str) -> String {
    format!("{table}_{pk_column}")
}

pub(crate) fn join_table(owner_table: &str, relation: &str) -> String {
    format!("{owner_table}_{}", relation.to_snake_case())
}

pub(crate) fn index_name(table: &str, group: &str) -> String {
    format!("index_{table}_{}", group.to_snake_case())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        assert_eq!(table_name("", "TodoItem"), "todo_item");
        assert_eq!(table_name("app_", "Task"), "app_task");
        assert_eq!(column_name("ProjectId"), "project_id");
        assert_eq!(
            foreign_key_candidates("Project"),
            ["ProjectId".to_string(), "project_id".to_string()]
        );
        assert_eq!(join_column("post", "id"), "post_id");
        assert_eq!(join_table("post", "Tags"), "post_tags");
    }
}
