use connectors::{error::StoreError, store::MetadataStore};
use model::access::{
    accountability::Accountability,
    permission::{FieldSet, PermissionAction},
};
use std::collections::BTreeMap;
use tracing::debug;

static ALL_FIELDS: FieldSet = FieldSet::All;

/// Field allow-lists per collection for one role and action.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PermissionSet {
    collections: BTreeMap<String, FieldSet>,
}

impl PermissionSet {
    pub fn from_records(records: impl IntoIterator<Item = (String, FieldSet)>) -> Self {
        let mut collections: BTreeMap<String, FieldSet> = BTreeMap::new();
        for (collection, fields) in records {
            match collections.get_mut(&collection) {
                Some(existing) => existing.merge(&fields),
                None => {
                    collections.insert(collection, fields);
                }
            }
        }
        Self { collections }
    }

    pub fn fields(&self, collection: &str) -> Option<&FieldSet> {
        self.collections.get(collection)
    }
}

/// What the requester may see.
#[derive(Debug, Clone, PartialEq)]
pub enum Access {
    /// Admins: every field of every collection.
    Unrestricted,
    Restricted(PermissionSet),
}

impl Access {
    /// Admins (and builds without accountability) skip the permission read entirely.
    pub async fn resolve(
        store: &dyn MetadataStore,
        accountability: Option<&Accountability>,
        action: PermissionAction,
    ) -> Result<Self, StoreError> {
        let Some(accountability) = accountability.filter(|a| !a.admin) else {
            return Ok(Access::Unrestricted);
        };

        let records = store
            .permissions(accountability.role.as_deref(), action)
            .await?;
        debug!(
            role = ?accountability.role,
            %action,
            rows = records.len(),
            "Resolved permissions"
        );

        Ok(Access::Restricted(PermissionSet::from_records(
            records.into_iter().map(|r| (r.collection, r.fields)),
        )))
    }

    /// `None` when the collection has no permission row at all.
    pub fn allowed_fields(&self, collection: &str) -> Option<&FieldSet> {
        match self {
            Access::Unrestricted => Some(&ALL_FIELDS),
            Access::Restricted(set) => set.fields(collection),
        }
    }

    pub fn field_allowed(&self, collection: &str, field: &str) -> bool {
        self.allowed_fields(collection)
            .is_some_and(|fields| fields.contains(field))
    }

    /// Collections without a row, or whose row exposes no field, are invisible.
    pub fn collection_allowed(&self, collection: &str) -> bool {
        self.allowed_fields(collection)
            .is_some_and(|fields| !fields.is_empty())
    }
}
