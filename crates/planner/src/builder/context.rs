use crate::{
    catalog::RelationCatalog, classifier::RelationClassifier, error::AstError,
    permissions::Access,
};
use connectors::{error::StoreError, store::MetadataStore};
use model::core::schema::SchemaOverview;
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Immutable snapshot shared by every recursion step of one build.
pub(crate) struct BuildContext<'a> {
    pub schema: &'a SchemaOverview,
    pub store: &'a dyn MetadataStore,
    pub catalog: RelationCatalog,
    pub access: Access,
    pub classifier: &'a dyn RelationClassifier,
    pub cancel: CancellationToken,
}

/// Awaits a store read unless the build is cancelled first.
pub(crate) async fn guarded<T, F>(cancel: &CancellationToken, read: F) -> Result<T, AstError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(AstError::Cancelled),
        result = read => result.map_err(AstError::from),
    }
}
