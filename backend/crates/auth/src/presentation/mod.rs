//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::AuthAppState;
pub use middleware::{
    AuthLayerState, GuardState, RateLimitState, RouteTable, limit_auth_requests,
    require_admin_auth, require_user_auth, route_guard,
};
pub use router::{auth_router, auth_router_generic};
