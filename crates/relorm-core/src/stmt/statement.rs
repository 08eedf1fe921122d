use super::*;
use crate::Result;

/// Top-level statement node.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    CreateCollection(CreateCollection),
    DropCollection(DropCollection),
    RenameCollection(RenameCollection),
    CreateField(CreateField),
    DropField(DropField),
    RenameField(RenameField),
    CreateIndex(CreateIndex),
    DropIndex(DropIndex),
    Select(Select),
    Insert(Insert),
    Update(Update),
    Delete(Delete),
}

impl Statement {
    /// Short name of the statement kind, used in logs and errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CreateCollection(_) => "create_collection",
            Self::DropCollection(_) => "drop_collection",
            Self::RenameCollection(_) => "rename_collection",
            Self::CreateField(_) => "create_field",
            Self::DropField(_) => "drop_field",
            Self::RenameField(_) => "rename_field",
            Self::CreateIndex(_) => "create_index",
            Self::DropIndex(_) => "drop_index",
            Self::Select(_) => "select",
            Self::Insert(_) => "insert",
            Self::Update(_) => "update",
            Self::Delete(_) => "delete",
        }
    }

    pub fn is_select(&self) -> bool {
        matches!(self, Self::Select(_))
    }

    pub fn as_select(&self) -> Option<&Select> {
        match self {
            Self::Select(select) => Some(select),
            _ => None,
        }
    }

    /// Returns an error for the first missing or invalid element, including
    /// those inside nested statements.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::CreateCollection(stmt) => stmt.validate(),
            Self::DropCollection(stmt) => stmt.validate(),
            Self::RenameCollection(stmt) => stmt.validate(),
            Self::CreateField(stmt) => stmt.validate(),
            Self::DropField(stmt) => stmt.validate(),
            Self::RenameField(stmt) => stmt.validate(),
            Self::CreateIndex(stmt) => stmt.validate(),
            Self::DropIndex(stmt) => stmt.validate(),
            Self::Select(stmt) => stmt.validate(),
            Self::Insert(stmt) => stmt.validate(),
            Self::Update(stmt) => stmt.validate(),
            Self::Delete(stmt) => stmt.validate(),
        }
    }
}

macro_rules! impl_from_stmt {
    ( $( $name:ident ),* ) => {
        $(
            impl From<$name> for Statement {
                fn from(value: $name) -> Self {
                    Statement::$name(value)
                }
            }
        )*
    };
}

impl_from_stmt!(
    CreateCollection,
    DropCollection,
    RenameCollection,
    CreateField,
    DropField,
    RenameField,
    CreateIndex,
    DropIndex,
    Select,
    Insert,
    Update,
    Delete
);

#[cfg(test)]
mod tests {
    use super::*;
    use std_util::assert_err;

    #[test]
    fn filter_without_field_is_rejected() {
        let select = Select::new("task").filter(Expr::eq("", Value::from(1)));
        let err = assert_err!(Statement::from(select).validate());
        assert_eq!(err.invalid_reason(), Some(&Invalid::EmptyField));
    }

    #[test]
    fn filter_without_clause_is_rejected() {
        let filter = ExprFilter {
            column: ExprColumn::new("name"),
            op: BinaryOp::Eq,
            clause: None,
        };
        let select = Select::new("task").filter(filter);
        let err = assert_err!(Statement::from(select).validate());
        assert_eq!(err.invalid_reason(), Some(&Invalid::MissingClause));
    }

    #[test]
    fn invalid_subquery_is_found() {
        let inner = Select::new("").field(Expr::column("id"));
        let select = Select::new("task").filter(Expr::in_subquery("project_id", inner));
        let err = assert_err!(Statement::from(select).validate());
        assert_eq!(err.invalid_reason(), Some(&Invalid::EmptyCollection));
        assert_eq!(err.to_string(), "invalid select expression: empty collection");
    }

    #[test]
    fn join_requires_condition() {
        let mut join = Join::new(JoinKind::Left, "project", Expr::value(true));
        join.on = None;
        let err = assert_err!(Statement::from(Select::new("task").join(join)).validate());
        assert_eq!(err.invalid_reason(), Some(&Invalid::NoJoinCondition));
    }

    #[test]
    fn insert_column_count_must_match() {
        let mut insert = Insert::new("task").value("name", Value::from("T1"));
        insert.values.push(Expr::value(1));
        let err = assert_err!(Statement::from(insert).validate());
        assert_eq!(
            err.invalid_reason(),
            Some(&Invalid::ValueCountMismatch {
                columns: 1,
                values: 2
            })
        );
    }

    #[test]
    fn default_must_be_literal() {
        let field = FieldDef::new("name", Type::String)
            .constraint(Constraint::Default(Expr::column("other")));
        let err = assert_err!(Statement::from(CreateCollection::new("task", vec![field])).validate());
        assert_eq!(err.invalid_reason(), Some(&Invalid::NonLiteralDefault));
    }
}
