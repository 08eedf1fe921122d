mod constraint;
pub use constraint::Constraint;

mod ddl;
pub use ddl::{
    CreateCollection, CreateField, CreateIndex, DropCollection, DropField, DropIndex,
    RenameCollection, RenameField,
};

mod delete;
pub use delete::Delete;

mod eval;

mod expr;
pub use expr::Expr;

mod expr_column;
pub use expr_column::ExprColumn;

mod expr_filter;
pub use expr_filter::ExprFilter;

mod expr_func;
pub use expr_func::ExprFunc;

mod expr_junction;
pub use expr_junction::{ExprAnd, ExprOr};

mod field_def;
pub use field_def::FieldDef;

mod input;
pub use input::Input;

mod insert;
pub use insert::Insert;

mod invalid;
pub use invalid::Invalid;

mod join;
pub use join::{Join, JoinKind};

mod op_binary;
pub use op_binary::BinaryOp;

mod order_by;
pub use order_by::{Direction, OrderBy};

mod select;
pub use select::Select;

mod statement;
pub use statement::Statement;

mod ty;
pub use ty::Type;

mod update;
pub use update::{Assignment, Update};

mod value;
pub use value::Value;

mod value_cast;
mod value_cmp;
