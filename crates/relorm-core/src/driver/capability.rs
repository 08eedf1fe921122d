/// Features a backend supports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capability {
    /// Joins in select statements (SQL joins or a fetch plan)
    pub joins: bool,

    /// Selecting a subset of columns
    pub projection: bool,

    /// Sorting by more than one field
    pub multi_sort: bool,

    /// Generated keys come back from a RETURNING clause
    pub returning: bool,

    /// Generated keys are reported as a last-insert id
    pub last_insert_id: bool,

    pub transactions: bool,
}

impl Capability {
    pub const SQL: Capability = Capability {
        joins: true,
        projection: true,
        multi_sort: true,
        returning: false,
        last_insert_id: true,
        transactions: true,
    };

    pub const SQL_RETURNING: Capability = Capability {
        returning: true,
        last_insert_id: false,
        ..Capability::SQL
    };

    /// Record stores that hold whole records and sort by one key.
    pub const DOCUMENT: Capability = Capability {
        joins: true,
        projection: true,
        multi_sort: false,
        returning: false,
        last_insert_id: true,
        transactions: false,
    };

    pub const MEMORY: Capability = Capability {
        joins: false,
        projection: false,
        multi_sort: false,
        returning: false,
        last_insert_id: true,
        transactions: true,
    };
}
