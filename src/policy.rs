//! Role policy: a declarative, ordered mapping from route prefixes to the
//! roles allowed through.
//!
//! Loaded once at startup and read-only afterwards. Rules are evaluated
//! longest-prefix-first so `/admin/reports` can be carved out of `/admin`.

use crate::principal::Role;

/// A single route rule: a path prefix and the roles allowed under it.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyRule {
    prefix: String,
    allowed: Vec<Role>,
}

impl PolicyRule {
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn allows(&self, role: Role) -> bool {
        self.allowed.contains(&role)
    }
}

/// How the policy classifies a request path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RouteClass<'p> {
    /// Explicitly exempt (assets, public API, the login page itself).
    Exempt,
    /// No rule matches; the guard lets it through untouched.
    Open,
    /// Matched a rule; authentication and the rule's allow-set apply.
    Protected(&'p PolicyRule),
}

/// The process-wide route authorization table.
#[derive(Debug, Clone, Default)]
pub struct RolePolicy {
    exempt: Vec<String>,
    rules: Vec<PolicyRule>,
}

impl RolePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// The platform's standard table: dashboards for everyone logged in,
    /// `/org` for organizations and admins, `/admin` for admins only.
    pub fn standard() -> Self {
        use Role::{Admin, Organization, Student, SuperAdmin, Volunteer};

        Self::new()
            .exempt("/")
            .exempt("/assets")
            .exempt("/api/public")
            .exempt("/auth/login")
            .allow("/dashboard", &[Volunteer, Student, Organization, Admin, SuperAdmin])
            .allow("/profile", &[Volunteer, Student, Organization, Admin, SuperAdmin])
            .allow("/org", &[Organization, Admin, SuperAdmin])
            .allow("/admin", &[Admin, SuperAdmin])
    }

    /// Marks a prefix exempt from the guard entirely.
    pub fn exempt(mut self, prefix: impl Into<String>) -> Self {
        self.exempt.push(prefix.into());
        self
    }

    /// Adds a protected prefix with its allow-set.
    pub fn allow(mut self, prefix: impl Into<String>, roles: &[Role]) -> Self {
        self.rules.push(PolicyRule {
            prefix: prefix.into(),
            allowed: roles.to_vec(),
        });
        // longest-prefix-first
        self.rules
            .sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));
        self
    }

    /// Classifies a request path. Exemptions win over rules.
    pub fn classify(&self, path: &str) -> RouteClass<'_> {
        if self.exempt.iter().any(|p| prefix_matches(p, path)) {
            return RouteClass::Exempt;
        }

        self.rules
            .iter()
            .find(|rule| prefix_matches(&rule.prefix, path))
            .map_or(RouteClass::Open, RouteClass::Protected)
    }
}

/// `/admin` matches `/admin` and `/admin/...` but never `/administrator`.
/// The bare root prefix `/` matches only the root itself, so exempting the
/// landing page does not exempt the whole site.
fn prefix_matches(prefix: &str, path: &str) -> bool {
    if prefix == "/" {
        return path == "/";
    }
    path == prefix || path.strip_prefix(prefix).is_some_and(|rest| rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_matching_boundaries() {
        assert!(prefix_matches("/admin", "/admin"));
        assert!(prefix_matches("/admin", "/admin/users"));
        assert!(!prefix_matches("/admin", "/administrator"));
        assert!(prefix_matches("/", "/"));
        assert!(!prefix_matches("/", "/dashboard"));
    }

    #[test]
    fn test_standard_policy_classification() {
        let policy = RolePolicy::standard();

        assert_eq!(policy.classify("/"), RouteClass::Exempt);
        assert_eq!(policy.classify("/assets/app.css"), RouteClass::Exempt);
        assert_eq!(policy.classify("/auth/login"), RouteClass::Exempt);
        assert_eq!(policy.classify("/about"), RouteClass::Open);

        match policy.classify("/admin/users") {
            RouteClass::Protected(rule) => {
                assert!(rule.allows(Role::Admin));
                assert!(rule.allows(Role::SuperAdmin));
                assert!(!rule.allows(Role::Volunteer));
                assert!(!rule.allows(Role::Organization));
            }
            other => panic!("expected Protected, got {other:?}"),
        }
    }

    #[test]
    fn test_dashboard_open_to_all_roles() {
        let policy = RolePolicy::standard();
        match policy.classify("/dashboard") {
            RouteClass::Protected(rule) => {
                for role in [
                    Role::Volunteer,
                    Role::Student,
                    Role::Organization,
                    Role::Admin,
                    Role::SuperAdmin,
                ] {
                    assert!(rule.allows(role), "{role} should reach /dashboard");
                }
            }
            other => panic!("expected Protected, got {other:?}"),
        }
    }

    #[test]
    fn test_longest_prefix_wins() {
        let policy = RolePolicy::new()
            .allow("/admin", &[Role::Admin])
            .allow("/admin/exports", &[Role::SuperAdmin]);

        match policy.classify("/admin/exports/q3.csv") {
            RouteClass::Protected(rule) => {
                assert_eq!(rule.prefix(), "/admin/exports");
                assert!(!rule.allows(Role::Admin));
                assert!(rule.allows(Role::SuperAdmin));
            }
            other => panic!("expected Protected, got {other:?}"),
        }

        // insertion order must not matter
        let policy = RolePolicy::new()
            .allow("/admin/exports", &[Role::SuperAdmin])
            .allow("/admin", &[Role::Admin]);
        match policy.classify("/admin/exports") {
            RouteClass::Protected(rule) => assert_eq!(rule.prefix(), "/admin/exports"),
            other => panic!("expected Protected, got {other:?}"),
        }
    }

    #[test]
    fn test_exemption_wins_over_rule() {
        let policy = RolePolicy::new()
            .exempt("/dashboard/help")
            .allow("/dashboard", &[Role::Volunteer]);

        assert_eq!(policy.classify("/dashboard/help"), RouteClass::Exempt);
        assert!(matches!(
            policy.classify("/dashboard/tasks"),
            RouteClass::Protected(_)
        ));
    }
}
