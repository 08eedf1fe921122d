use crate::stmt::Type;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    /// Single related record, foreign key on the owning model.
    HasOne,

    /// Single related record, foreign key on the related model.
    BelongsTo,

    /// Related records carry the foreign key.
    HasMany,

    /// Links stored in a join collection.
    ManyToMany,
}

impl RelationKind {
    pub fn is_single(self) -> bool {
        matches!(self, Self::HasOne | Self::BelongsTo)
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::HasOne => "has-one",
            Self::BelongsTo => "belongs-to",
            Self::HasMany => "has-many",
            Self::ManyToMany => "many-to-many",
        })
    }
}

/// A resolved relation between two models.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationDescriptor {
    pub name: String,
    pub kind: RelationKind,

    /// Model declaring the relation
    pub owner: String,

    /// Model on the other side
    pub target: String,

    /// Foreign-key field on the owner (has-one only)
    pub owner_field: Option<String>,

    /// Foreign-key field on the target (belongs-to and has-many)
    pub target_field: Option<String>,

    /// Join collection (many-to-many only)
    pub join: Option<JoinTable>,

    pub auto_create: bool,
    pub auto_update: bool,
    pub auto_delete: bool,
}

/// Backend shape of the collection linking the two sides of a many-to-many
/// relation. Rows are keyed by an auto-incrementing `id`, so reading links in
/// key order yields insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinTable {
    pub name: String,
    pub owner_column: String,
    pub owner_key_ty: Type,
    pub target_column: String,
    pub target_key_ty: Type,
}

impl JoinTable {
    pub const ID: &'static str = "id";
}
