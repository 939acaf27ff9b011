/// Router Module Index
///
/// Organizes the routing logic into access-segregated modules. Access control
/// is applied explicitly per module: the authenticated router carries the
/// token-verification layer, and every admin handler demands the `AdminUser`
/// extractor, so no protected endpoint can be exposed by accident.

/// Routes accessible to any client, anonymous included.
pub mod public;

/// Routes behind the token verifier. A validated `AuthUser` is guaranteed.
pub mod authenticated;

/// Routes restricted to users whose record carries `role = "admin"`.
pub mod admin;
