use lazy_static::lazy_static;

const FIELD_ROWS: &[(&str, &[&str])] = &[
    (
        "directus_activity",
        &[
            "id", "action", "user", "timestamp", "ip", "user_agent", "collection", "item",
            "comment", "revisions",
        ],
    ),
    (
        "directus_collections",
        &[
            "collection", "icon", "note", "display_template", "hidden", "singleton",
            "translations", "archive_field", "archive_value", "unarchive_value", "sort_field",
            "fields",
        ],
    ),
    (
        "directus_fields",
        &[
            "id", "collection", "field", "special", "interface", "options", "display",
            "display_options", "locked", "readonly", "hidden", "sort", "width", "group",
            "translations", "note",
        ],
    ),
    (
        "directus_files",
        &[
            "id", "storage", "filename_disk", "filename_download", "title", "type", "folder",
            "uploaded_by", "uploaded_on", "modified_by", "modified_on", "charset", "filesize",
            "width", "height", "duration", "embed", "description", "location", "tags",
            "metadata",
        ],
    ),
    ("directus_folders", &["id", "name", "parent"]),
    (
        "directus_permissions",
        &[
            "id", "role", "collection", "action", "permissions", "validation", "presets",
            "fields", "limit",
        ],
    ),
    (
        "directus_presets",
        &[
            "id", "bookmark", "user", "role", "collection", "search", "filters", "layout",
            "layout_query", "layout_options",
        ],
    ),
    (
        "directus_relations",
        &[
            "id", "many_collection", "many_field", "many_primary", "one_collection",
            "one_field", "one_primary", "one_collection_field", "one_allowed_collections",
            "junction_field",
        ],
    ),
    (
        "directus_revisions",
        &["id", "activity", "collection", "item", "data", "delta", "parent"],
    ),
    (
        "directus_roles",
        &[
            "id", "name", "icon", "description", "ip_access", "enforce_tfa", "module_list",
            "collection_list", "admin_access", "app_access", "users",
        ],
    ),
    ("directus_sessions", &["token", "user", "expires", "ip", "user_agent"]),
    (
        "directus_settings",
        &[
            "id", "project_name", "project_url", "project_color", "project_logo",
            "public_foreground", "public_background", "public_note", "auth_login_attempts",
            "auth_password_policy", "storage_asset_transform", "storage_asset_presets",
            "custom_css",
        ],
    ),
    (
        "directus_users",
        &[
            "id", "first_name", "last_name", "email", "password", "location", "title",
            "description", "tags", "avatar", "language", "theme", "tfa_secret", "status",
            "role", "token", "last_access", "last_page",
        ],
    ),
    (
        "directus_webhooks",
        &[
            "id", "name", "method", "url", "status", "data", "actions", "collections",
        ],
    ),
];

/// One built-in field metadata row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemField {
    pub collection: &'static str,
    pub field: &'static str,
}

lazy_static! {
    pub static ref SYSTEM_FIELDS: Vec<SystemField> = FIELD_ROWS
        .iter()
        .flat_map(|&(collection, fields)| {
            fields
                .iter()
                .map(move |&field| SystemField { collection, field })
        })
        .collect();
}

/// Built-in field names of `collection`, empty for user collections.
pub fn system_field_names(collection: &str) -> Vec<&'static str> {
    SYSTEM_FIELDS
        .iter()
        .filter(|row| row.collection == collection)
        .map(|row| row.field)
        .collect()
}
