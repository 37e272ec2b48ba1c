use crate::error::StoreError;
use async_trait::async_trait;
use model::{
    access::permission::{PermissionAction, PermissionRecord},
    core::relation::RelationDescriptor,
};

/// Read-only access to the metadata an AST build depends on.
///
/// Every read is issued fresh; implementations must not cache across calls
/// since permissions and relations may change between requests.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// All persisted relation rows. Built-in system relations are merged by the caller.
    async fn relations(&self) -> Result<Vec<RelationDescriptor>, StoreError>;

    /// Grants for `role` (`None` for public requests) and `action`.
    async fn permissions(
        &self,
        role: Option<&str>,
        action: PermissionAction,
    ) -> Result<Vec<PermissionRecord>, StoreError>;

    /// Declared field names for `collection`, including alias fields with no column.
    async fn field_names(&self, collection: &str) -> Result<Vec<String>, StoreError>;
}
