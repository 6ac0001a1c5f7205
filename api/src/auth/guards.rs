use crate::auth::claims::AuthUser;
use crate::response::{ApiResponse, Empty};
use axum::{
    body::Body,
    extract::FromRequestParts,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Requires a valid session token on the request.
///
/// On success the extracted `AuthUser` is inserted into request extensions
/// for downstream handlers. On failure the endpoint's uniform JSON error
/// payload is returned; the transport status stays 200 because this API
/// signals failure in-band.
pub async fn allow_authenticated(req: Request<Body>, next: Next) -> Response {
    let (mut parts, body) = req.into_parts();

    match AuthUser::from_request_parts(&mut parts, &()).await {
        Ok(user) => {
            let mut req = Request::from_parts(parts, body);
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Err(_) => ApiResponse::<Empty>::error("Not authenticated").into_response(),
    }
}
