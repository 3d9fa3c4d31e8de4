//! Access control guard
//!
//! One policy table maps every role-scoped operation to the roles allowed to
//! perform it. Handlers and services call [`authorize`] before touching the
//! store, or [`require_role`] where exactly one role is the precondition.

use shared::models::Role;
use surrealdb::RecordId;

use crate::auth::Claims;
use crate::core::{MarketError, MarketResult};
use crate::db::models::ACCOUNT_TABLE;

/// Role-scoped operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateListing,
    ViewOwnListings,
    UploadImage,
    PlaceOrder,
    ViewOwnOrders,
    ViewReceivedOrders,
    CancelOrder,
    ModerateListing,
    ViewPendingListings,
    ViewReports,
    ManageAccounts,
}

impl Operation {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CreateListing => "listings:create",
            Self::ViewOwnListings => "listings:own",
            Self::UploadImage => "uploads:create",
            Self::PlaceOrder => "orders:place",
            Self::ViewOwnOrders => "orders:own",
            Self::ViewReceivedOrders => "orders:received",
            Self::CancelOrder => "orders:cancel",
            Self::ModerateListing => "listings:moderate",
            Self::ViewPendingListings => "listings:pending",
            Self::ViewReports => "reports:view",
            Self::ManageAccounts => "accounts:manage",
        }
    }
}

use Role::{Administrator, Buyer, Producer};

/// {operation -> allowed roles}
pub const POLICY: &[(Operation, &[Role])] = &[
    (Operation::CreateListing, &[Producer]),
    (Operation::ViewOwnListings, &[Producer]),
    (Operation::UploadImage, &[Producer, Administrator]),
    (Operation::PlaceOrder, &[Buyer]),
    (Operation::ViewOwnOrders, &[Buyer]),
    (Operation::ViewReceivedOrders, &[Producer]),
    (Operation::CancelOrder, &[Buyer, Administrator]),
    (Operation::ModerateListing, &[Administrator]),
    (Operation::ViewPendingListings, &[Administrator]),
    (Operation::ViewReports, &[Administrator]),
    (Operation::ManageAccounts, &[Administrator]),
];

/// Roles allowed to perform `op`; empty when the table has no entry
pub fn allowed_roles(op: Operation) -> &'static [Role] {
    POLICY
        .iter()
        .find(|(candidate, _)| *candidate == op)
        .map(|(_, roles)| *roles)
        .unwrap_or(&[])
}

/// Authenticated principal, rebuilt from verified claims on every request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    /// Account record id (`account:...`)
    pub id: String,
    pub display_name: String,
    pub role: Role,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == Administrator
    }

    pub fn account_id(&self) -> MarketResult<RecordId> {
        parse_account_id(&self.id)
    }
}

fn parse_account_id(raw: &str) -> MarketResult<RecordId> {
    let id: RecordId = raw
        .parse()
        .map_err(|_| MarketError::unauthorized("malformed identity"))?;
    if id.table() != ACCOUNT_TABLE {
        return Err(MarketError::unauthorized("malformed identity"));
    }
    Ok(id)
}

impl TryFrom<Claims> for CurrentUser {
    type Error = MarketError;

    /// Fails closed: an unknown role or a subject that is not an account id is
    /// rejected, never defaulted.
    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let role: Role = claims
            .role
            .parse()
            .map_err(|_| MarketError::unauthorized("unknown role in identity"))?;
        parse_account_id(&claims.sub)?;
        Ok(Self {
            id: claims.sub,
            display_name: claims.name,
            role,
        })
    }
}

/// Check that `user` may perform `op`
pub fn authorize(user: &CurrentUser, op: Operation) -> MarketResult<()> {
    if allowed_roles(op).contains(&user.role) {
        return Ok(());
    }
    crate::security_log!(
        "WARN",
        "permission_denied",
        user_id = user.id.as_str(),
        role = user.role.as_str(),
        operation = op.as_str()
    );
    Err(MarketError::unauthorized(format!(
        "{} may not perform {}",
        user.role,
        op.as_str()
    )))
}

/// Check that `user` holds exactly `role`
pub fn require_role(user: &CurrentUser, role: Role) -> MarketResult<()> {
    if user.role == role {
        return Ok(());
    }
    crate::security_log!(
        "WARN",
        "role_required",
        user_id = user.id.as_str(),
        role = user.role.as_str(),
        required = role.as_str()
    );
    Err(MarketError::unauthorized(format!("{} role required", role)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> CurrentUser {
        CurrentUser {
            id: "account:a1".into(),
            display_name: "Test".into(),
            role,
        }
    }

    fn claims(sub: &str, role: &str) -> Claims {
        Claims {
            sub: sub.into(),
            name: "Test".into(),
            role: role.into(),
            exp: 0,
            iat: 0,
            iss: "market-server".into(),
            aud: "market-clients".into(),
        }
    }

    #[test]
    fn every_operation_has_a_policy_entry() {
        let all = [
            Operation::CreateListing,
            Operation::ViewOwnListings,
            Operation::UploadImage,
            Operation::PlaceOrder,
            Operation::ViewOwnOrders,
            Operation::ViewReceivedOrders,
            Operation::CancelOrder,
            Operation::ModerateListing,
            Operation::ViewPendingListings,
            Operation::ViewReports,
            Operation::ManageAccounts,
        ];
        for op in all {
            assert!(!allowed_roles(op).is_empty(), "{:?} has no roles", op);
        }
    }

    #[test]
    fn only_buyers_place_orders() {
        assert!(authorize(&user(Buyer), Operation::PlaceOrder).is_ok());
        assert!(matches!(
            authorize(&user(Producer), Operation::PlaceOrder),
            Err(MarketError::Unauthorized(_))
        ));
        assert!(authorize(&user(Administrator), Operation::PlaceOrder).is_err());
    }

    #[test]
    fn admin_operations_are_admin_only() {
        for op in [
            Operation::ModerateListing,
            Operation::ViewReports,
            Operation::ManageAccounts,
        ] {
            assert!(authorize(&user(Administrator), op).is_ok());
            assert!(authorize(&user(Buyer), op).is_err());
            assert!(authorize(&user(Producer), op).is_err());
        }
    }

    #[test]
    fn claims_with_unknown_role_fail_closed() {
        assert!(CurrentUser::try_from(claims("account:a1", "superuser")).is_err());
        assert!(CurrentUser::try_from(claims("account:a1", "")).is_err());
    }

    #[test]
    fn claims_with_foreign_subject_fail_closed() {
        assert!(CurrentUser::try_from(claims("listing:l1", "buyer")).is_err());
        assert!(CurrentUser::try_from(claims("", "buyer")).is_err());
    }

    #[test]
    fn claims_accept_legacy_role_names() {
        let user = CurrentUser::try_from(claims("account:a1", "farmer")).unwrap();
        assert_eq!(user.role, Producer);
        assert!(!user.is_admin());
        let admin = CurrentUser::try_from(claims("account:a2", "admin")).unwrap();
        assert!(admin.is_admin());
        assert_eq!(admin.account_id().unwrap().to_string(), "account:a2");
    }

    #[test]
    fn require_role_is_exact() {
        assert!(require_role(&user(Buyer), Buyer).is_ok());
        assert!(require_role(&user(Administrator), Buyer).is_err());
    }
}
