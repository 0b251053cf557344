//! JWT access token generation and verification.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use super::{AuthError, TokenRejection};
use crate::models::auth::TokenClaims;

/// Value of the `iss` claim on every token issued by this service.
pub const ISSUER: &str = "chirpy";

/// The only algorithm tokens are signed and accepted with.
pub const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// Upper bound on access token lifetime: 1 hour.
pub const MAX_ACCESS_TOKEN_EXPIRY_SECS: i64 = 60 * 60;

/// Generate a signed access token for `user_id`.
///
/// `ttl` is clamped to [`MAX_ACCESS_TOKEN_EXPIRY_SECS`]; longer requests are
/// shortened rather than rejected.
pub fn issue_access_token(
    user_id: Uuid,
    secret: &[u8],
    ttl: Duration,
) -> Result<String, AuthError> {
    let ttl = ttl.min(Duration::seconds(MAX_ACCESS_TOKEN_EXPIRY_SECS));
    let now = Utc::now();
    let claims = TokenClaims {
        iss: ISSUER.to_string(),
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };
    encode(
        &Header::new(SIGNING_ALGORITHM),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| AuthError::Signing(format!("jwt encode: {e}")))
}

/// Verify an access token and return the user it was issued for.
///
/// Rejects any algorithm other than [`SIGNING_ALGORITHM`], a foreign issuer,
/// and tokens whose `exp` is in the past (no leeway).
pub fn validate_access_token(token: &str, secret: &[u8]) -> Result<Uuid, AuthError> {
    let claims = decode_claims(token, secret)?;
    Uuid::parse_str(&claims.sub)
        .map_err(|_| AuthError::InvalidToken(TokenRejection::BadSubjectFormat))
}

fn decode_claims(token: &str, secret: &[u8]) -> Result<TokenClaims, AuthError> {
    let mut validation = Validation::new(SIGNING_ALGORITHM);
    validation.leeway = 0;
    validation.set_issuer(&[ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);

    decode::<TokenClaims>(token, &DecodingKey::from_secret(secret), &validation)
        .map(|data| data.claims)
        .map_err(|e| AuthError::InvalidToken(rejection_for(e.kind())))
}

fn rejection_for(kind: &ErrorKind) -> TokenRejection {
    match kind {
        ErrorKind::InvalidSignature => TokenRejection::BadSignature,
        ErrorKind::InvalidAlgorithm
        | ErrorKind::InvalidAlgorithmName
        | ErrorKind::MissingAlgorithm => TokenRejection::WrongAlgorithm,
        ErrorKind::ExpiredSignature => TokenRejection::Expired,
        ErrorKind::InvalidIssuer => TokenRejection::WrongIssuer,
        ErrorKind::MissingRequiredClaim(claim) if claim == "sub" => {
            TokenRejection::MissingSubject
        }
        ErrorKind::MissingRequiredClaim(claim) if claim == "iss" => TokenRejection::WrongIssuer,
        _ => TokenRejection::Malformed,
    }
}
