//! Role gating for navigation.

use super::claims::Role;

/// Decide whether content gated behind `required` may be shown to a user
/// holding `current`. Ungated content is always allowed; gated content needs
/// an exact role match. The caller redirects to the login view on a deny.
///
/// This check mirrors what the backend enforces and exists so the UI does
/// not offer tabs the server would reject; it is not an access control point.
pub fn allow(required: Option<Role>, current: Option<Role>) -> bool {
    match required {
        None => true,
        Some(role) => current == Some(role),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ungated_content_is_always_allowed() {
        assert!(allow(None, Some(Role::Admin)));
        assert!(allow(None, Some(Role::Viewer)));
        assert!(allow(None, None));
    }

    #[test]
    fn test_matching_role_is_allowed() {
        assert!(allow(Some(Role::Admin), Some(Role::Admin)));
        assert!(allow(Some(Role::Pi), Some(Role::Pi)));
    }

    #[test]
    fn test_mismatched_role_is_denied() {
        assert!(!allow(Some(Role::Admin), Some(Role::Member)));
        assert!(!allow(Some(Role::Pi), Some(Role::Viewer)));
    }

    #[test]
    fn test_logged_out_user_is_denied_gated_content() {
        assert!(!allow(Some(Role::Admin), None));
    }
}
