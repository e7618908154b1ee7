//! Bearer token gate for the seeding endpoints

use axum::http::{HeaderMap, header::AUTHORIZATION};
use tracing::{error, warn};

use crate::{
    error::{SeedError, SeedResult},
    identity::{Actor, IdentityError, IdentityProvider},
};

/// Extract the bearer token from the Authorization header
pub fn bearer_token(headers: &HeaderMap) -> SeedResult<&str> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(SeedError::Unauthenticated)?;

    // Check if it's a Bearer token
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(SeedError::Unauthenticated)?;

    if token.is_empty() {
        return Err(SeedError::Unauthenticated);
    }

    Ok(token)
}

/// Verify the request's bearer token and return the calling actor
pub async fn authenticate(
    headers: &HeaderMap,
    identity: &dyn IdentityProvider,
) -> SeedResult<Actor> {
    let token = bearer_token(headers)?;

    identity.verify_token(token).await.map_err(|e| {
        match &e {
            IdentityError::InvalidToken(reason) => warn!("Rejected bearer token: {}", reason),
            IdentityError::Unavailable(_) => error!("Failed to verify bearer token: {}", e),
        }
        SeedError::InvalidCredential
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::tests::{TEST_SECRET, sign, test_provider};
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")).unwrap(), "abc.def");

        for bad in ["", "Basic abc", "bearer abc", "Bearer ", "Bearerabc"] {
            assert!(
                matches!(bearer_token(&headers(bad)), Err(SeedError::Unauthenticated)),
                "{bad:?} should be rejected"
            );
        }
        assert!(matches!(
            bearer_token(&HeaderMap::new()),
            Err(SeedError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn test_authenticate() {
        let provider = test_provider(&[]);

        let bearer = format!("Bearer {}", sign("ops", 60, TEST_SECRET));
        let actor = authenticate(&headers(&bearer), &provider).await.unwrap();
        assert_eq!(actor.uid, "ops");

        assert!(matches!(
            authenticate(&headers("Bearer garbage"), &provider).await,
            Err(SeedError::InvalidCredential)
        ));
        assert!(matches!(
            authenticate(&HeaderMap::new(), &provider).await,
            Err(SeedError::Unauthenticated)
        ));
    }
}
