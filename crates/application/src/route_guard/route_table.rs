use super::RouteRequirement;

/// Protected route prefixes and their requirements.
///
/// Lookups pick the longest prefix that matches on a path segment boundary,
/// so `/app/campaigns` covers `/app/campaigns/42` but not `/app/campaigns-archive`.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<(String, RouteRequirement)>,
}

impl RouteTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Protects `prefix` with `requirement`, replacing any earlier entry.
    #[must_use]
    pub fn protect(mut self, prefix: impl Into<String>, requirement: RouteRequirement) -> Self {
        let prefix = normalize(prefix.into());
        self.routes.retain(|(existing, _)| existing != &prefix);
        self.routes.push((prefix, requirement));
        self
    }

    /// Returns the requirement for the most specific matching prefix.
    #[must_use]
    pub fn requirement_for(&self, path: &str) -> Option<&RouteRequirement> {
        let path = path.split(['?', '#']).next().unwrap_or_default();

        self.routes
            .iter()
            .filter(|(prefix, _)| matches_prefix(prefix, path))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, requirement)| requirement)
    }

    /// Returns the number of protected prefixes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns whether no prefix is protected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

fn normalize(prefix: String) -> String {
    let trimmed = prefix.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_owned()
    } else {
        trimmed.to_owned()
    }
}

fn matches_prefix(prefix: &str, path: &str) -> bool {
    if prefix == "/" {
        return path.starts_with('/');
    }

    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use rolegate_domain::Role;

    use super::{RouteRequirement, RouteTable};

    #[test]
    fn longest_prefix_wins() {
        let table = RouteTable::new()
            .protect("/app", RouteRequirement::authenticated())
            .protect(
                "/app/admin/",
                RouteRequirement::authenticated().with_role(Role::SuperAdmin),
            );

        let admin = table.requirement_for("/app/admin/users?page=2");
        assert!(admin.is_some_and(|requirement| requirement.role.is_some()));

        let dashboard = table.requirement_for("/app/dashboard");
        assert!(dashboard.is_some_and(|requirement| requirement.role.is_none()));
    }

    #[test]
    fn prefixes_match_on_segment_boundaries() {
        let table = RouteTable::new().protect("/app/campaigns", RouteRequirement::authenticated());

        assert!(table.requirement_for("/app/campaigns").is_some());
        assert!(table.requirement_for("/app/campaigns/42").is_some());
        assert!(table.requirement_for("/app/campaigns-archive").is_none());
        assert!(table.requirement_for("/login").is_none());
    }

    #[test]
    fn protecting_twice_replaces_the_entry() {
        let table = RouteTable::new()
            .protect("/app", RouteRequirement::authenticated())
            .protect("/app/", RouteRequirement::authenticated().with_role(Role::Viewer));

        assert_eq!(table.len(), 1);
        assert!(
            table
                .requirement_for("/app")
                .is_some_and(|requirement| requirement.role.is_some())
        );
    }
}
