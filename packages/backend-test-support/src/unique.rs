use uuid::Uuid;

/// Fresh upper-case GUID in the accepted submission format.
pub fn unique_guid() -> String {
    Uuid::new_v4().hyphenated().to_string().to_uppercase()
}

/// `prefix` plus a short random suffix, for names that must not collide.
pub fn unique_name(prefix: &str) -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("{prefix}-{}", &id[..8])
}
