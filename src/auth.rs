//! Account signup, login and bearer-token sessions

use std::sync::Arc;

use chrono::Duration;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::AuthSettings;
use crate::domain::{Profile, ProfileUpdate, UserRecord, normalize_email};
use crate::error::{GameError, GameResult};
use crate::progression::Clock;
use crate::store::GameStore;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Result of a successful signup or login
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthGrant {
    pub token: String,
    pub user_id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Account operations on top of the user and session stores
#[derive(Clone)]
pub struct AuthService {
    store: GameStore,
    settings: AuthSettings,
    clock: Arc<dyn Clock>,
}

impl AuthService {
    pub fn new(store: GameStore, settings: AuthSettings, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            settings,
            clock,
        }
    }

    pub fn signup(&self, email: &str, password: &str) -> GameResult<AuthGrant> {
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            return Err(GameError::invalid_input("Email and password are required"));
        }
        if !EMAIL_RE.is_match(&email) {
            return Err(GameError::invalid_input("Invalid email address"));
        }

        let users = self.store.users();
        if users.email_exists(&email)? {
            return Err(GameError::Conflict("Email exists".to_string()));
        }

        let hash = bcrypt::hash(password, self.settings.bcrypt_cost)?;
        let now = self.clock.now();
        let user = UserRecord::new(uuid::Uuid::new_v4().to_string(), &email, hash, now);

        // Lost a race with a concurrent signup for the same address
        if !users.insert(&user)? {
            return Err(GameError::Conflict("Email exists".to_string()));
        }
        info!("[bq:auth] New account {} ({})", user.id, user.email);

        self.grant(&user)
    }

    /// Unknown email and wrong password produce the same error
    pub fn login(&self, email: &str, password: &str) -> GameResult<AuthGrant> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(GameError::invalid_input("Email and password are required"));
        }

        let user = self
            .store
            .users()
            .find_by_email(email)?
            .ok_or(GameError::InvalidCredentials)?;

        if user.password_hash.is_empty() {
            return Err(GameError::InvalidCredentials);
        }
        // A malformed stored hash is treated like a mismatch
        let valid = bcrypt::verify(password, &user.password_hash).unwrap_or(false);
        if !valid {
            debug!("[bq:auth] Failed login for {}", user.id);
            return Err(GameError::InvalidCredentials);
        }

        let mut grant = self.grant(&user)?;
        grant.username = user.username.clone();
        Ok(grant)
    }

    /// Resolve an `Authorization` header value to a user
    pub fn authenticate(&self, header: Option<&str>) -> GameResult<UserRecord> {
        let token = header
            .and_then(|h| h.trim().strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| GameError::unauthorized("No token provided"))?;

        let session = self
            .store
            .sessions()
            .find_valid(token, self.clock.now())?
            .ok_or_else(|| GameError::unauthorized("Invalid token"))?;

        self.store
            .users()
            .find_by_id(&session.user_id)?
            .ok_or_else(|| GameError::not_found("User not found"))
    }

    pub fn logout(&self, token: &str) -> GameResult<bool> {
        Ok(self.store.sessions().revoke(token)?)
    }

    pub fn update_username(&self, user: &mut UserRecord, username: &str) -> GameResult<()> {
        let username = username.trim();
        if username.is_empty() {
            return Err(GameError::invalid_input("Username is required"));
        }
        user.username = Some(username.to_string());
        self.store.users().save(user)?;
        Ok(())
    }

    /// Cosmetic changes only; badges are left alone
    pub fn update_profile(&self, user: &mut UserRecord, update: ProfileUpdate) -> GameResult<Profile> {
        update.apply(&mut user.profile);
        self.store.users().save(user)?;
        Ok(user.profile.clone())
    }

    fn grant(&self, user: &UserRecord) -> GameResult<AuthGrant> {
        let ttl = Duration::try_hours(self.settings.session_ttl_hours).ok_or_else(|| {
            anyhow::anyhow!(
                "Session lifetime of {} hours is out of range",
                self.settings.session_ttl_hours
            )
        })?;
        let session = self.store.sessions().create(&user.id, ttl, self.clock.now())?;
        Ok(AuthGrant {
            token: session.token,
            user_id: user.id.clone(),
            email: user.email.clone(),
            username: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::FixedClock;
    use chrono::Utc;

    fn service() -> (AuthService, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(Utc::now()));
        let settings = AuthSettings {
            bcrypt_cost: 4,
            session_ttl_hours: 1,
        };
        let service = AuthService::new(GameStore::in_memory().unwrap(), settings, clock.clone());
        (service, clock)
    }

    #[test]
    fn test_signup_then_login() {
        let (auth, _) = service();
        let grant = auth.signup("  Hero@Example.com ", "bananas").unwrap();
        assert_eq!(grant.email, "hero@example.com");
        assert_eq!(grant.token.len(), 64);

        let login = auth.login("HERO@example.com", "bananas").unwrap();
        assert_eq!(login.user_id, grant.user_id);
        assert_ne!(login.token, grant.token);
    }

    #[test]
    fn test_signup_rejects_duplicate_and_bad_input() {
        let (auth, _) = service();
        auth.signup("a@example.com", "pw").unwrap();

        let dup = auth.signup("A@example.com", "pw").unwrap_err();
        assert_eq!(dup.to_string(), "Email exists");
        assert_eq!(dup.status_code(), 400);

        assert!(matches!(
            auth.signup("", "pw"),
            Err(GameError::InvalidInput(_))
        ));
        assert!(matches!(
            auth.signup("not-an-email", "pw"),
            Err(GameError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_login_failures_are_indistinguishable() {
        let (auth, _) = service();
        auth.signup("a@example.com", "right").unwrap();

        let wrong_password = auth.login("a@example.com", "wrong").unwrap_err();
        let unknown = auth.login("b@example.com", "right").unwrap_err();
        assert_eq!(wrong_password.to_string(), unknown.to_string());
        assert!(matches!(unknown, GameError::InvalidCredentials));
    }

    #[test]
    fn test_authenticate_and_expiry() {
        let (auth, clock) = service();
        let grant = auth.signup("a@example.com", "pw").unwrap();
        let header = format!("Bearer {}", grant.token);

        let user = auth.authenticate(Some(header.as_str())).unwrap();
        assert_eq!(user.id, grant.user_id);

        assert_eq!(auth.authenticate(None).unwrap_err().status_code(), 401);
        assert_eq!(
            auth.authenticate(Some("Bearer nope")).unwrap_err().status_code(),
            401
        );

        clock.advance(Duration::hours(2));
        assert_eq!(
            auth.authenticate(Some(header.as_str())).unwrap_err().to_string(),
            "Invalid token"
        );
    }

    #[test]
    fn test_logout_revokes_token() {
        let (auth, _) = service();
        let grant = auth.signup("a@example.com", "pw").unwrap();
        assert!(auth.logout(&grant.token).unwrap());
        let header = format!("Bearer {}", grant.token);
        assert!(auth.authenticate(Some(header.as_str())).is_err());
    }

    #[test]
    fn test_profile_updates_keep_badges() {
        let (auth, _) = service();
        let grant = auth.signup("a@example.com", "pw").unwrap();
        let header = format!("Bearer {}", grant.token);
        let mut user = auth.authenticate(Some(header.as_str())).unwrap();
        user.add_badge("Knight");

        auth.update_username(&mut user, " banana_hero ").unwrap();
        let profile = auth
            .update_profile(
                &mut user,
                ProfileUpdate {
                    bio: Some("Counting bananas".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(profile.bio, "Counting bananas");
        assert_eq!(profile.badges, vec!["Knight".to_string()]);

        let stored = auth.authenticate(Some(header.as_str())).unwrap();
        assert_eq!(stored.username.as_deref(), Some("banana_hero"));
        assert!(auth.update_username(&mut user, "  ").is_err());
    }

    #[test]
    fn test_oversized_session_lifetime_fails_without_panicking() {
        let settings = AuthSettings {
            bcrypt_cost: 4,
            session_ttl_hours: 10_000_000_000,
        };
        let auth = AuthService::new(
            GameStore::in_memory().unwrap(),
            settings,
            Arc::new(FixedClock::new(Utc::now())),
        );
        let err = auth.signup("far@example.com", "pw").unwrap_err();
        assert_eq!(err.status_code(), 500);
    }
}
