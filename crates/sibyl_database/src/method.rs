//! The closed set of dispatchable query methods.

use crate::QueryResult;
use sibyl_error::{QueryError, QueryErrorKind};
use strum::{Display, EnumString};

/// Methods a structured call may invoke on an entity.
///
/// Method names follow the object-accessor convention the generator is
/// prompted with (`findMany`, `findUnique`, ...). Anything outside this set
/// fails resolution with `UnknownMethod`.
///
/// # Examples
///
/// ```
/// use sibyl_database::QueryMethod;
///
/// let method = QueryMethod::parse("findMany").unwrap();
/// assert_eq!(method, QueryMethod::FindMany);
/// assert!(QueryMethod::parse("dropTable").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum QueryMethod {
    /// Multi-row lookup
    #[strum(serialize = "findMany")]
    FindMany,
    /// Single-row lookup by unique criteria
    #[strum(serialize = "findUnique")]
    FindUnique,
    /// First row matching the criteria
    #[strum(serialize = "findFirst")]
    FindFirst,
    /// Row count
    #[strum(serialize = "count")]
    Count,
    /// Insert one record
    #[strum(serialize = "create")]
    Create,
    /// Update matching records
    #[strum(serialize = "update")]
    Update,
    /// Delete matching records
    #[strum(serialize = "delete")]
    Delete,
}

impl QueryMethod {
    /// Parses a method name, failing with `UnknownMethod` if unsupported.
    pub fn parse(name: &str) -> QueryResult<Self> {
        name.parse()
            .map_err(|_| QueryError::new(QueryErrorKind::UnknownMethod(name.to_string())))
    }

    /// Whether this method writes to the store.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            QueryMethod::Create | QueryMethod::Update | QueryMethod::Delete
        )
    }
}
