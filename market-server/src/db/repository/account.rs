//! Account Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{ACCOUNT_TABLE, Account, NewAccount, new_record_id};
use shared::models::Role;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct AccountRepository {
    base: BaseRepository,
}

impl AccountRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All accounts, oldest first
    pub async fn find_all(&self) -> RepoResult<Vec<Account>> {
        let accounts: Vec<Account> = self
            .base
            .db()
            .query("SELECT * FROM account ORDER BY created_at ASC")
            .await?
            .take(0)?;
        Ok(accounts)
    }

    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Account>> {
        let account: Option<Account> = self.base.db().select(id.clone()).await?;
        Ok(account)
    }

    /// Lookup by already-normalized email
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<Account>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM account WHERE email = $email")
            .bind(("email", email.to_string()))
            .await?;
        let accounts: Vec<Account> = result.take(0)?;
        Ok(accounts.into_iter().next())
    }

    pub async fn exists_with_role(&self, role: Role) -> RepoResult<bool> {
        let mut result = self
            .base
            .db()
            .query("SELECT VALUE id FROM account WHERE role = $role")
            .bind(("role", role))
            .await?;
        let ids: Vec<RecordId> = result.take(0)?;
        Ok(!ids.is_empty())
    }

    /// Create an account; the unique email index is the final arbiter
    pub async fn create(&self, data: NewAccount) -> RepoResult<Account> {
        if self.find_by_email(&data.email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Email '{}' already registered",
                data.email
            )));
        }

        let id = new_record_id(ACCOUNT_TABLE, 'a');
        let created: Option<Account> = self.base.db().create(id).content(data).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create account".to_string()))
    }

    pub async fn update_role(&self, id: &RecordId, role: Role) -> RepoResult<Account> {
        let mut result = self
            .base
            .db()
            .query("UPDATE $id SET role = $role RETURN AFTER")
            .bind(("id", id.clone()))
            .bind(("role", role))
            .await?;
        result
            .take::<Option<Account>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Account {} not found", id)))
    }

    /// Hard delete the account, its listings, orders on those listings and
    /// its own orders, in one transaction
    pub async fn delete_cascade(&self, id: &RecordId) -> RepoResult<()> {
        if self.find_by_id(id).await?.is_none() {
            return Err(RepoError::NotFound(format!("Account {} not found", id)));
        }

        let mut response = self
            .base
            .db()
            .query(
                r#"BEGIN TRANSACTION;
                LET $owned = (SELECT VALUE id FROM listing WHERE producer = $account);
                DELETE purchase_order WHERE buyer = $account OR listing IN $owned;
                DELETE listing WHERE producer = $account;
                DELETE $account;
                COMMIT TRANSACTION;"#,
            )
            .bind(("account", id.clone()))
            .await?;

        let errors = response.take_errors();
        if let Some(err) = errors.into_values().next() {
            return Err(RepoError::from(err));
        }
        Ok(())
    }
}
