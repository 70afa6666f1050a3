//! Operation guard
//!
//! Attached with `route_layer` to every protected route. It validates the
//! bearer token and asks the role policy about the route's operation before
//! the handler extracts or validates anything.

use activity_core::{authorize, Decision, DomainError, Operation};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use crate::extractors::bearer_identity;
use crate::response::ApiError;
use crate::state::AppState;

/// State handed to one route's guard layer
#[derive(Clone, Debug)]
pub struct GuardState {
    app: AppState,
    operation: Operation,
}

impl GuardState {
    pub fn new(app: AppState, operation: Operation) -> Self {
        Self { app, operation }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }
}

/// Reject with 401/403 or run the route with the caller's `Identity` attached
pub async fn require_operation(
    State(guard): State<GuardState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = bearer_identity(request.headers(), guard.app.jwt_service())?;

    if let Decision::Denied(reason) = authorize(&identity, guard.operation) {
        warn!(
            user_id = %identity.user_id,
            role = %identity.role,
            operation = %guard.operation,
            "Access denied"
        );
        return Err(DomainError::AccessDenied { reason }.into());
    }

    debug!(user_id = %identity.user_id, operation = %guard.operation, "Access granted");
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}
