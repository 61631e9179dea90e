/// Derive the filesystem-safe cache key for a (profile, role, session) triple.
///
/// Deterministic and total: identical inputs always produce the identical
/// key, and inputs differing in role or session never collide. ARN colons
/// are replaced before the parts are joined with `--`; any remaining `/`
/// in the composed key is replaced last.
pub fn derive_key(profile: &str, role_arn: &str, session_name: Option<&str>) -> String {
    let role = role_arn.replace(':', "-");
    let key = match session_name {
        Some(session) => format!("{profile}--{role}--{session}"),
        None => format!("{profile}--{role}"),
    };
    key.replace('/', "-")
}
