use std::future::Future;
use std::pin::Pin;

use actix_web::dev::{Service, ServiceRequest, Transform};
use actix_web::error::ErrorUnauthorized;
use actix_web::{Error, HttpMessage};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::context::{Role, UserInfo};

pub static JWT_SECRET: &str = "JWT_SECRET";

// Tokens are issued by an external admin tool; this service only verifies.
#[derive(Debug, Deserialize, Serialize)]
pub struct Claim {
    pub user: String,
    pub role: Role,
    pub exp: i64,
}

pub fn verify_token(token: &str, secret: &[u8]) -> Result<Claim, jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_secret(secret);
    let validation = Validation::new(Algorithm::HS256);
    let payload = decode(token, &key, &validation)?;
    Ok(payload.claims)
}

pub struct Jwt {
    secret: Vec<u8>,
}

impl Jwt {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self { secret: secret.into() }
    }
}

impl<S> Transform<S, ServiceRequest> for Jwt
where
    S: Service<ServiceRequest> + 'static,
    S::Future: 'static,
    S::Error: Into<Error>,
{
    type Error = Error;
    type Response = S::Response;
    type Transform = JwtService<S>;
    type InitError = ();
    type Future = Pin<Box<dyn Future<Output = Result<Self::Transform, Self::InitError>>>>;

    fn new_transform(&self, service: S) -> Self::Future {
        let secret = self.secret.clone();
        Box::pin(async move {
            Ok(JwtService {
                secret,
                next_service: service,
            })
        })
    }
}

pub struct JwtService<S> {
    secret: Vec<u8>,
    next_service: S,
}

impl<S> Service<ServiceRequest> for JwtService<S>
where
    S: Service<ServiceRequest>,
    S::Future: 'static,
    S::Error: Into<Error>,
{
    type Response = S::Response;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&self, ctx: &mut core::task::Context<'_>) -> std::task::Poll<Result<(), Self::Error>> {
        self.next_service.poll_ready(ctx).map_err(|e| e.into())
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let header = match req.headers().get("Authorization") {
            Some(header) => header.to_owned(),
            None => return Box::pin(async move { Err(ErrorUnauthorized("no token in header")) }),
        };
        match header.to_str() {
            Err(e) => return Box::pin(async move { Err(ErrorUnauthorized(e)) }),
            Ok(token) => {
                let token = token.strip_prefix("Bearer ").unwrap_or(token);
                match verify_token(token, &self.secret) {
                    Err(e) => return Box::pin(async move { Err(ErrorUnauthorized(e)) }),
                    Ok(claim) => match claim.user.parse::<i32>() {
                        Err(e) => return Box::pin(async move { Err(ErrorUnauthorized(e)) }),
                        Ok(id) => {
                            req.extensions_mut().insert(UserInfo { id, role: claim.role });
                        }
                    },
                }
            }
        }

        let res_fut = self.next_service.call(req);
        Box::pin(async move {
            let resp = res_fut.await.map_err(|e| e.into())?;
            Ok(resp)
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn gen_token(claim: &Claim, secret: &[u8]) -> String {
        encode(&Header::new(Algorithm::HS256), claim, &EncodingKey::from_secret(secret)).unwrap()
    }

    fn future_exp() -> i64 {
        chrono::Utc::now().timestamp() + 3600
    }

    #[test]
    fn test_verify_round_trip_keeps_role() {
        let claim = Claim {
            user: "1".into(),
            role: Role::Admin,
            exp: future_exp(),
        };
        let token = gen_token(&claim, b"secret");
        let verified = verify_token(&token, b"secret").unwrap();
        assert_eq!(verified.user, "1");
        assert_eq!(verified.role, Role::Admin);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let claim = Claim {
            user: "1".into(),
            role: Role::Admin,
            exp: future_exp(),
        };
        let token = gen_token(&claim, b"secret");
        assert!(verify_token(&token, b"other").is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let claim = Claim {
            user: "1".into(),
            role: Role::Admin,
            exp: chrono::Utc::now().timestamp() - 3600,
        };
        let token = gen_token(&claim, b"secret");
        assert!(verify_token(&token, b"secret").is_err());
    }
}
