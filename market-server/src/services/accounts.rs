//! Account service
//!
//! Registration, login, and the administrator's account management.

use std::sync::Arc;
use std::time::Duration;

use shared::ErrorCode;
use shared::models::{AccountResponse, LoginRequest, LoginResponse, RegisterRequest, Role};
use validator::Validate;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::{CurrentUser, JwtService, Operation, authorize};
use crate::core::{AdminBootstrap, MarketError, MarketResult};
use crate::db::bounded;
use crate::db::models::{ACCOUNT_TABLE, Account, NewAccount, now_millis, parse_record_id};
use crate::db::repository::AccountRepository;
use crate::security_log;

/// Fixed delay before answering a login, hit or miss
const AUTH_FIXED_DELAY_MS: u64 = 500;

#[derive(Clone)]
pub struct AccountService {
    repo: AccountRepository,
    jwt: Arc<JwtService>,
    store_timeout: Duration,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validation_error(e: validator::ValidationErrors) -> MarketError {
    MarketError::invalid(e.to_string())
}

impl AccountService {
    pub fn new(repo: AccountRepository, jwt: Arc<JwtService>, store_timeout: Duration) -> Self {
        Self {
            repo,
            jwt,
            store_timeout,
        }
    }

    /// Public registration; producers and buyers only
    pub async fn register(&self, req: RegisterRequest) -> MarketResult<AccountResponse> {
        req.validate().map_err(validation_error)?;

        let role = req.role.unwrap_or(Role::Buyer);
        if role == Role::Administrator {
            security_log!("WARN", "register_admin_refused", email = req.email.as_str());
            return Err(MarketError::invalid_with(
                ErrorCode::RoleNotSelfAssignable,
                "administrator accounts cannot be self-registered",
            ));
        }

        let account = self
            .create_account(&req.email, &req.password, &req.display_name, role)
            .await?;
        security_log!(
            "INFO",
            "account_registered",
            account_id = account.id.to_string(),
            role = role.as_str()
        );
        Ok(account.into())
    }

    async fn create_account(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
        role: Role,
    ) -> MarketResult<Account> {
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(MarketError::invalid("name must not be blank"));
        }

        let data = NewAccount {
            email: normalize_email(email),
            password_hash: hash_password(password)?,
            display_name: display_name.to_string(),
            role,
            created_at: now_millis(),
        };

        bounded(self.store_timeout, self.repo.create(data))
            .await
            .map_err(|e| match e {
                MarketError::AlreadyExists(_) => MarketError::AlreadyExists("Email"),
                other => other,
            })
    }

    /// Verify credentials and issue a token
    ///
    /// Unknown email and wrong password produce the same error after the
    /// same delay.
    pub async fn login(&self, req: LoginRequest) -> MarketResult<LoginResponse> {
        req.validate().map_err(validation_error)?;
        let email = normalize_email(&req.email);

        let account = bounded(self.store_timeout, self.repo.find_by_email(&email)).await?;

        tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

        let account = match account {
            Some(account) if verify_password(&req.password, &account.password_hash) => account,
            Some(account) => {
                security_log!(
                    "WARN",
                    "login_failed",
                    account_id = account.id.to_string(),
                    reason = "invalid_password"
                );
                return Err(MarketError::InvalidCredentials);
            }
            None => {
                security_log!(
                    "WARN",
                    "login_failed",
                    email = email.as_str(),
                    reason = "unknown_email"
                );
                return Err(MarketError::InvalidCredentials);
            }
        };

        let user = CurrentUser {
            id: account.id.to_string(),
            display_name: account.display_name.clone(),
            role: account.role,
        };
        let token = self
            .jwt
            .generate_token(&user)
            .map_err(|e| MarketError::Internal(format!("Failed to generate token: {}", e)))?;

        security_log!(
            "INFO",
            "login_success",
            account_id = user.id.as_str(),
            role = user.role.as_str()
        );

        Ok(LoginResponse {
            token,
            expires_in: self.jwt.expires_in_seconds(),
            account: account.into(),
        })
    }

    /// The caller's own account, freshly read
    pub async fn me(&self, user: &CurrentUser) -> MarketResult<AccountResponse> {
        let id = user.account_id()?;
        bounded(self.store_timeout, self.repo.find_by_id(&id))
            .await?
            .map(AccountResponse::from)
            .ok_or(MarketError::NotFound("Account"))
    }

    pub async fn list(&self, user: &CurrentUser) -> MarketResult<Vec<AccountResponse>> {
        authorize(user, Operation::ManageAccounts)?;
        let accounts = bounded(self.store_timeout, self.repo.find_all()).await?;
        Ok(accounts.into_iter().map(AccountResponse::from).collect())
    }

    /// Change another account's role
    ///
    /// Tokens already issued keep the role they were issued with.
    pub async fn change_role(
        &self,
        user: &CurrentUser,
        raw_id: &str,
        role: Role,
    ) -> MarketResult<AccountResponse> {
        authorize(user, Operation::ManageAccounts)?;
        let id = parse_record_id(ACCOUNT_TABLE, raw_id).ok_or(MarketError::NotFound("Account"))?;
        if id == user.account_id()? {
            return Err(MarketError::invalid("administrators cannot change their own role"));
        }

        let account = bounded(self.store_timeout, self.repo.update_role(&id, role))
            .await
            .map_err(not_found_as_account)?;
        security_log!(
            "INFO",
            "role_changed",
            actor = user.id.as_str(),
            account_id = account.id.to_string(),
            role = role.as_str()
        );
        Ok(account.into())
    }

    /// Delete an account with its listings and orders
    pub async fn delete(&self, user: &CurrentUser, raw_id: &str) -> MarketResult<()> {
        authorize(user, Operation::ManageAccounts)?;
        let id = parse_record_id(ACCOUNT_TABLE, raw_id).ok_or(MarketError::NotFound("Account"))?;
        if id == user.account_id()? {
            return Err(MarketError::invalid("administrators cannot delete their own account"));
        }

        bounded(self.store_timeout, self.repo.delete_cascade(&id))
            .await
            .map_err(not_found_as_account)?;
        security_log!(
            "WARN",
            "account_deleted",
            actor = user.id.as_str(),
            account_id = id.to_string()
        );
        Ok(())
    }

    /// Create the configured administrator unless the email is taken
    pub async fn bootstrap_admin(&self, admin: &AdminBootstrap) -> MarketResult<()> {
        let email = normalize_email(&admin.email);
        if bounded(self.store_timeout, self.repo.find_by_email(&email))
            .await?
            .is_some()
        {
            tracing::debug!(email = %email, "Bootstrap administrator already present");
            return Ok(());
        }
        if admin.password.len() < 6 {
            return Err(MarketError::invalid_with(
                ErrorCode::PasswordTooShort,
                "ADMIN_PASSWORD must be at least 6 characters",
            ));
        }

        let account = self
            .create_account(&email, &admin.password, &admin.display_name, Role::Administrator)
            .await?;
        security_log!("INFO", "admin_bootstrapped", account_id = account.id.to_string());
        Ok(())
    }
}

fn not_found_as_account(err: MarketError) -> MarketError {
    match err {
        MarketError::NotFound(_) => MarketError::NotFound("Account"),
        other => other,
    }
}
