use lazy_static::lazy_static;
use model::core::relation::RelationDescriptor;

// (many_collection, many_field, one_collection, one_field)
const RELATION_ROWS: &[(&str, &str, &str, Option<&str>)] = &[
    ("directus_users", "role", "directus_roles", Some("users")),
    ("directus_users", "avatar", "directus_files", None),
    ("directus_revisions", "activity", "directus_activity", Some("revisions")),
    ("directus_revisions", "parent", "directus_revisions", None),
    ("directus_presets", "user", "directus_users", None),
    ("directus_presets", "role", "directus_roles", None),
    ("directus_folders", "parent", "directus_folders", None),
    ("directus_files", "folder", "directus_folders", None),
    ("directus_files", "uploaded_by", "directus_users", None),
    ("directus_files", "modified_by", "directus_users", None),
    ("directus_fields", "collection", "directus_collections", Some("fields")),
    ("directus_activity", "user", "directus_users", None),
    ("directus_settings", "project_logo", "directus_files", None),
    ("directus_settings", "public_foreground", "directus_files", None),
    ("directus_settings", "public_background", "directus_files", None),
    ("directus_permissions", "role", "directus_roles", None),
    ("directus_sessions", "user", "directus_users", None),
];

lazy_static! {
    pub static ref SYSTEM_RELATIONS: Vec<RelationDescriptor> = RELATION_ROWS
        .iter()
        .map(|(many_collection, many_field, one_collection, one_field)| {
            let relation = RelationDescriptor::m2o(many_collection, many_field, one_collection);
            match one_field {
                Some(alias) => relation.with_alias(alias),
                None => relation,
            }
        })
        .collect();
}

pub fn system_relations() -> &'static [RelationDescriptor] {
    &SYSTEM_RELATIONS
}
