//! Authentication middleware that resolves bearer tokens to user IDs.

use axum::{
    RequestPartsExt,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use crate::{Error, app_state::TokenState, auth::token::decode_token};

/// Middleware function that checks for a valid bearer token in the
/// `Authorization` header.
/// The user ID is placed into the request and then the request executed
/// normally if the token is valid, otherwise a 401 response is returned.
///
/// **Note**: Route handlers can use the function argument
/// `Extension(user_id): Extension<UserID>` to receive the user ID.
pub async fn auth_guard(
    State(state): State<TokenState>,
    request: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();

    let header = match parts.extract::<TypedHeader<Authorization<Bearer>>>().await {
        Ok(TypedHeader(header)) => header,
        Err(_) => return Error::Unauthorized.into_response(),
    };

    match decode_token(header.token(), &state.decoding_key) {
        Ok(user_id) => {
            parts.extensions.insert(user_id);
            let request = Request::from_parts(parts, body);

            next.run(request).await
        }
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod auth_guard_tests {
    use axum::{Extension, Json, Router, middleware, routing::get};
    use axum_test::TestServer;

    use crate::{
        JwtKeys,
        app_state::TokenState,
        auth::token::{DEFAULT_TOKEN_DURATION, encode_token},
        models::UserID,
    };

    use super::auth_guard;

    const TEST_PROTECTED_ROUTE: &str = "/protected";

    async fn test_handler(Extension(user_id): Extension<UserID>) -> Json<i64> {
        Json(user_id.as_i64())
    }

    fn get_test_server_and_keys() -> (TestServer, JwtKeys) {
        let keys = JwtKeys::from_secret("nafstenoas");
        let state = TokenState {
            decoding_key: keys.decoding.clone(),
        };

        let app = Router::new()
            .route(TEST_PROTECTED_ROUTE, get(test_handler))
            .route_layer(middleware::from_fn_with_state(state, auth_guard));

        (
            TestServer::new(app),
            keys,
        )
    }

    #[tokio::test]
    async fn get_protected_route_succeeds_with_valid_token() {
        let (server, keys) = get_test_server_and_keys();
        let token =
            encode_token(UserID::new(7), &keys.encoding, DEFAULT_TOKEN_DURATION).unwrap();

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .authorization_bearer(token)
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<i64>(), 7);
    }

    #[tokio::test]
    async fn get_protected_route_fails_without_token() {
        let (server, _) = get_test_server_and_keys();

        server
            .get(TEST_PROTECTED_ROUTE)
            .await
            .assert_status_unauthorized();
    }

    #[tokio::test]
    async fn get_protected_route_fails_with_invalid_token() {
        let (server, _) = get_test_server_and_keys();

        server
            .get(TEST_PROTECTED_ROUTE)
            .authorization_bearer("not.a.token")
            .await
            .assert_status_unauthorized();
    }

    #[tokio::test]
    async fn get_protected_route_fails_with_token_from_other_server() {
        let (server, _) = get_test_server_and_keys();
        let other_keys = JwtKeys::from_secret("adifferentsecret");
        let token =
            encode_token(UserID::new(7), &other_keys.encoding, DEFAULT_TOKEN_DURATION).unwrap();

        server
            .get(TEST_PROTECTED_ROUTE)
            .authorization_bearer(token)
            .await
            .assert_status_unauthorized();
    }
}
