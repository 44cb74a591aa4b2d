use uuid::Uuid;

/// Route pattern of the partner comparison view
pub const PARTNER_ROUTE: &str = "/partners/:partnerId";

const PARAM: &str = ":partnerId";

/// Navigation target for an accepted partner
pub fn partner_route(partner_id: Uuid) -> String {
    PARTNER_ROUTE.replace(PARAM, &partner_id.to_string())
}

/// Partner id from a concrete `/partners/<id>` path
pub fn parse_partner_route(path: &str) -> Option<Uuid> {
    let prefix = PARTNER_ROUTE.strip_suffix(PARAM)?;
    let id = path.trim_end_matches('/').strip_prefix(prefix)?;
    Uuid::parse_str(id).ok()
}
