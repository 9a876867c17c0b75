use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use super::{
    dto::{LoginRequest, LoginResponse, SignupRequest},
    jwt::JwtKeys,
    password::verify_password,
};
use crate::{
    error::{AppError, AppResult, AuthFailure},
    state::Services,
    users::{CreateUser, User},
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn check_email(email: &str) -> AppResult<()> {
    if !is_valid_email(email) {
        warn!(email = %email, "invalid email");
        return Err(AppError::Validation("Invalid email".into()));
    }
    Ok(())
}

/// Creates the account with the email exactly as given. Hashing and the
/// duplicate check happen in the user service and store; the format check
/// only runs when `strict_email` is set.
#[instrument(skip(services, req), fields(email = %req.email))]
pub async fn signup(services: &Services, req: SignupRequest, strict_email: bool) -> AppResult<User> {
    if strict_email {
        check_email(&req.email)?;
    }
    let user = services
        .users
        .create(CreateUser {
            name: req.name,
            email: req.email,
            password: req.password,
        })
        .await?;
    info!(user_id = %user.id, "user signed up");
    Ok(user)
}

#[instrument(skip(services, keys, req), fields(email = %req.email))]
pub async fn login(services: &Services, keys: &JwtKeys, req: LoginRequest) -> AppResult<LoginResponse> {
    let Some(user) = services.relations.user_by_email(&req.email).await? else {
        warn!("login unknown email");
        return Err(AppError::Unauthorized(AuthFailure::UnknownAccount));
    };

    if !verify_password(&req.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::Unauthorized(AuthFailure::BadPassword));
    }

    let token = keys.sign(user.id, &user.email)?;
    info!(user_id = %user.id, "user logged in");
    Ok(LoginResponse {
        token,
        user: user.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::state::AppState;

    fn signup_req(email: &str) -> SignupRequest {
        SignupRequest {
            name: "Ada".into(),
            email: email.into(),
            password: "s3cret".into(),
        }
    }

    #[test]
    fn email_validation() {
        assert!(is_valid_email("a@x.com"));
        assert!(!is_valid_email("a@x"));
        assert!(!is_valid_email("a x@y.com"));
        assert!(check_email("Ada@Example.COM").is_ok());
        assert!(matches!(check_email("nope"), Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn signup_keeps_email_as_given() {
        let state = AppState::fake();
        let user = signup(&state.services, signup_req("Ann@X.com"), false).await.unwrap();
        assert_eq!(user.email, "Ann@X.com");
        let loose = signup(&state.services, signup_req("bob"), false).await.unwrap();
        assert_eq!(loose.email, "bob");
    }

    #[tokio::test]
    async fn strict_signup_rejects_malformed_email() {
        let state = AppState::fake();
        let err = signup(&state.services, signup_req("bob"), true).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Invalid email"));
        assert!(state.services.users.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn signup_then_login_issues_token_for_user() {
        let state = AppState::fake();
        let keys = JwtKeys::from_config(&AppConfig::for_tests().jwt);
        let user = signup(&state.services, signup_req("Ada@X.com"), false).await.unwrap();

        let resp = login(
            &state.services,
            &keys,
            LoginRequest {
                email: "Ada@X.com".into(),
                password: "s3cret".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(resp.user.id, user.id);
        assert_eq!(resp.user.name, "Ada");
        assert_eq!(keys.verify(&resp.token).unwrap().sub, user.id);
    }

    #[tokio::test]
    async fn duplicate_signup_is_conflict() {
        let state = AppState::fake();
        signup(&state.services, signup_req("a@x.com"), false).await.unwrap();
        let err = signup(&state.services, signup_req("a@x.com"), false).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref m) if m == "Email already in use"));
    }

    #[tokio::test]
    async fn login_failures_are_distinguished() {
        let state = AppState::fake();
        let keys = JwtKeys::from_config(&AppConfig::for_tests().jwt);
        signup(&state.services, signup_req("a@x.com"), false).await.unwrap();

        let unknown = login(
            &state.services,
            &keys,
            LoginRequest {
                email: "b@x.com".into(),
                password: "s3cret".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(unknown, AppError::Unauthorized(AuthFailure::UnknownAccount)));

        let wrong = login(
            &state.services,
            &keys,
            LoginRequest {
                email: "a@x.com".into(),
                password: "nope".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(wrong, AppError::Unauthorized(AuthFailure::BadPassword)));
    }
}
