//! Defines the claims carried by bearer tokens and how to encode/decode a token.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{Error, models::UserID};

/// How long a bearer token stays valid after it is issued.
pub const DEFAULT_TOKEN_DURATION: Duration = Duration::hours(24);

/// The claims encoded into a bearer token.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// The ID of the authenticated user.
    pub sub: i64,
    /// The expiry time as a unix timestamp.
    pub exp: i64,
}

/// Create a signed bearer token for `user_id` that expires after `duration`.
///
/// # Errors
/// Returns an [Error::TokenCreation] if the token could not be signed.
pub fn encode_token(
    user_id: UserID,
    key: &EncodingKey,
    duration: Duration,
) -> Result<String, Error> {
    let claims = Claims {
        sub: user_id.as_i64(),
        exp: (OffsetDateTime::now_utc() + duration).unix_timestamp(),
    };

    encode(&Header::default(), &claims, key).map_err(|error| {
        tracing::error!("an error occurred while signing a token: {}", error);
        Error::TokenCreation(error.to_string())
    })
}

/// Extract the user ID from a bearer token.
///
/// # Errors
/// Returns an [Error::Unauthorized] if the token could not be decoded, was
/// signed with a different key, or has expired.
pub fn decode_token(token: &str, key: &DecodingKey) -> Result<UserID, Error> {
    decode::<Claims>(token, key, &Validation::default())
        .map(|token_data| UserID::new(token_data.claims.sub))
        .map_err(|_| Error::Unauthorized)
}

#[cfg(test)]
mod token_tests {
    use time::Duration;

    use crate::{Error, JwtKeys, models::UserID};

    use super::{DEFAULT_TOKEN_DURATION, decode_token, encode_token};

    #[test]
    fn round_trip() {
        let keys = JwtKeys::from_secret("foobar");
        let user_id = UserID::new(42);

        let token = encode_token(user_id, &keys.encoding, DEFAULT_TOKEN_DURATION).unwrap();
        let decoded_user_id = decode_token(&token, &keys.decoding).unwrap();

        assert_eq!(decoded_user_id, user_id);
    }

    #[test]
    fn decode_fails_with_wrong_key() {
        let keys = JwtKeys::from_secret("foobar");
        let other_keys = JwtKeys::from_secret("notfoobar");

        let token =
            encode_token(UserID::new(1), &keys.encoding, DEFAULT_TOKEN_DURATION).unwrap();
        let result = decode_token(&token, &other_keys.decoding);

        assert_eq!(result, Err(Error::Unauthorized));
    }

    #[test]
    fn decode_fails_with_expired_token() {
        let keys = JwtKeys::from_secret("foobar");

        // Well past the default validation leeway.
        let token =
            encode_token(UserID::new(1), &keys.encoding, Duration::hours(-2)).unwrap();
        let result = decode_token(&token, &keys.decoding);

        assert_eq!(result, Err(Error::Unauthorized));
    }

    #[test]
    fn decode_fails_with_garbage() {
        let keys = JwtKeys::from_secret("foobar");

        let result = decode_token("not.a.token", &keys.decoding);

        assert_eq!(result, Err(Error::Unauthorized));
    }
}
