mod ddl;

mod field;
pub use field::{Constraints, EmbedField, FieldDescriptor};

mod hooks;
pub use hooks::{Hook, HookStage, Hooks};

mod model;
pub use model::ModelDescriptor;

mod model_def;
pub use model_def::{Field, ModelDef};
use model_def::FieldKind;

mod name;

mod registry;
pub use registry::Registry;

mod relation;
pub use relation::{JoinTable, RelationDescriptor, RelationKind};

mod verify;
