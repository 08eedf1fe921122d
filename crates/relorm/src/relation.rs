mod many_to_many;
pub use many_to_many::{ManyToMany, RelatedKey};
