//! Chooses between mock-serving and upstream forwarding.

/// What the serving layer should do with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAction {
    /// Serve generated data; a catalog miss becomes a 404 at the serving
    /// layer, not here.
    Mock,
    /// Forward the request verbatim to the configured upstream, exactly once.
    Forward,
}

/// Only type resolution decides mock-vs-proxy, never upstream health: local
/// definitions always take precedence over the real backend, and without an
/// upstream there is nothing to forward to.
pub fn decide(upstream_configured: bool, type_resolved: bool) -> RouteAction {
    match (upstream_configured, type_resolved) {
        (false, _) => RouteAction::Mock,
        (true, true) => RouteAction::Mock,
        (true, false) => RouteAction::Forward,
    }
}
