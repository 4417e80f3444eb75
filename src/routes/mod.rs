/// Router Module Index
///
/// Organizes the application's routing logic into access-segregated modules.
/// Access control is applied explicitly at the module level (via Axum route
/// layers) or, for owner-only routes, inside the handlers through the guard,
/// never implicitly inside business logic.
///
/// The four modules map directly to the guard classes.

/// Routes accessible to any session, anonymous or authenticated.
pub mod public;

/// Routes reserved for sessions *without* an identity (register, login).
pub mod anonymous;

/// Routes protected by the authentication guard middleware.
pub mod authenticated;

/// Routes whose verdict depends on the targeted snippet's owner. The guard
/// runs inside the handlers because it must resolve the resource first.
pub mod owner;
