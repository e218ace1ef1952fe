use chrono::Utc;

use crate::auth;
use crate::domain::user::{NewUser, User};
use crate::forms::auth::{LoginFormPayload, RegisterFormPayload};
use crate::repository::{UserReader, UserWriter};

use super::{ServiceError, ServiceResult};

/// Create a new account. Returns the stored user so the route can log the
/// session in straight away.
pub fn register<R>(payload: RegisterFormPayload, repo: &R) -> ServiceResult<User>
where
    R: UserWriter,
{
    let password_hash = auth::hash_password(&payload.password).map_err(|e| {
        log::error!("Failed to hash password: {e}");
        ServiceError::Internal
    })?;

    let new_user = NewUser {
        username: payload.username,
        first_name: payload.first_name,
        last_name: payload.last_name,
        email: payload.email,
        password_hash,
        created_at: Utc::now().naive_utc(),
    };

    match repo.create_user(&new_user) {
        Ok(user) => Ok(user),
        Err(e) if e.is_unique_violation() => Err(ServiceError::Form(format!(
            "Username '{}' is already taken",
            new_user.username
        ))),
        Err(e) => {
            log::error!("Failed to create user: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Check credentials and return the matching user.
///
/// A missing user and a wrong password produce the same message.
pub fn login<R>(payload: LoginFormPayload, repo: &R) -> ServiceResult<User>
where
    R: UserReader,
{
    const BAD_CREDENTIALS: &str = "Invalid username or password";

    let user = match repo.get_user_by_username(&payload.username) {
        Ok(Some(user)) => user,
        Ok(None) => return Err(ServiceError::Form(BAD_CREDENTIALS.to_string())),
        Err(e) => {
            log::error!("Failed to get user {}: {e}", payload.username);
            return Err(ServiceError::Internal);
        }
    };

    let verified = auth::verify_password(&payload.password, &user.password_hash).map_err(|e| {
        log::error!("Failed to verify password for {}: {e}", payload.username);
        ServiceError::Internal
    })?;

    if !verified {
        return Err(ServiceError::Form(BAD_CREDENTIALS.to_string()));
    }

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{EmailAddress, Username};
    use crate::repository::test::TestRepository;

    fn register_payload(username: &str) -> RegisterFormPayload {
        RegisterFormPayload {
            username: Username::new(username).unwrap(),
            first_name: String::new(),
            last_name: String::new(),
            email: EmailAddress::new(format!("{username}@example.com")).unwrap(),
            password: "correct horse battery staple".to_string(),
        }
    }

    fn login_payload(username: &str, password: &str) -> LoginFormPayload {
        LoginFormPayload {
            username: Username::new(username).unwrap(),
            password: password.to_string(),
        }
    }

    #[test]
    fn registered_user_can_log_in() {
        let repo = TestRepository::new();
        let user = register(register_payload("alice"), &repo).unwrap();
        assert_eq!(user.username.as_str(), "alice");

        let logged_in =
            login(login_payload("alice", "correct horse battery staple"), &repo).unwrap();
        assert_eq!(logged_in.id, user.id);
    }

    #[test]
    fn duplicate_username_is_a_form_error() {
        let repo = TestRepository::new();
        register(register_payload("alice"), &repo).unwrap();

        let err = register(register_payload("alice"), &repo).unwrap_err();
        assert!(matches!(err, ServiceError::Form(_)));
    }

    #[test]
    fn wrong_password_is_rejected() {
        let repo = TestRepository::new();
        register(register_payload("alice"), &repo).unwrap();

        let err = login(login_payload("alice", "wrong"), &repo).unwrap_err();
        assert!(matches!(err, ServiceError::Form(_)));
    }

    #[test]
    fn unknown_user_gets_the_same_message_as_wrong_password() {
        let repo = TestRepository::new();
        let err = login(login_payload("ghost", "whatever"), &repo).unwrap_err();
        match err {
            ServiceError::Form(message) => assert_eq!(message, "Invalid username or password"),
            other => panic!("expected form error, got {other:?}"),
        }
    }
}
