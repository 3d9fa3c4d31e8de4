//! Schema definitions
//!
//! Idempotent; applied on every start. Tables stay SCHEMALESS but the fields
//! that carry invariants are typed and asserted, so a bad write fails inside
//! the store rather than being trusted to application code.

pub(crate) const SCHEMA: &str = r#"
DEFINE TABLE IF NOT EXISTS account SCHEMALESS;
DEFINE FIELD IF NOT EXISTS email ON account TYPE string ASSERT string::is::email($value);
DEFINE FIELD IF NOT EXISTS password_hash ON account TYPE string;
DEFINE FIELD IF NOT EXISTS display_name ON account TYPE string;
DEFINE FIELD IF NOT EXISTS role ON account TYPE string
    ASSERT $value IN ['producer', 'buyer', 'administrator'];
DEFINE FIELD IF NOT EXISTS created_at ON account TYPE int;
DEFINE INDEX IF NOT EXISTS account_email ON account FIELDS email UNIQUE;
DEFINE INDEX IF NOT EXISTS account_role ON account FIELDS role;

DEFINE TABLE IF NOT EXISTS listing SCHEMALESS;
DEFINE FIELD IF NOT EXISTS producer ON listing TYPE record<account>;
DEFINE FIELD IF NOT EXISTS item_name ON listing TYPE string;
DEFINE FIELD IF NOT EXISTS unit_price ON listing TYPE int ASSERT $value > 0;
DEFINE FIELD IF NOT EXISTS producer_payout ON listing TYPE int ASSERT $value >= 0;
DEFINE FIELD IF NOT EXISTS available_quantity ON listing TYPE int ASSERT $value >= 0;
DEFINE FIELD IF NOT EXISTS initial_quantity ON listing TYPE int ASSERT $value > 0;
DEFINE FIELD IF NOT EXISTS status ON listing TYPE string
    ASSERT $value IN ['pending', 'approved', 'refused'];
DEFINE FIELD IF NOT EXISTS created_at ON listing TYPE int;
DEFINE INDEX IF NOT EXISTS listing_producer ON listing FIELDS producer;
DEFINE INDEX IF NOT EXISTS listing_status ON listing FIELDS status;

DEFINE TABLE IF NOT EXISTS purchase_order SCHEMALESS;
DEFINE FIELD IF NOT EXISTS buyer ON purchase_order TYPE record<account>;
DEFINE FIELD IF NOT EXISTS listing ON purchase_order TYPE record<listing>;
DEFINE FIELD IF NOT EXISTS quantity ON purchase_order TYPE int ASSERT $value > 0;
DEFINE FIELD IF NOT EXISTS unit_price ON purchase_order TYPE int ASSERT $value > 0;
DEFINE FIELD IF NOT EXISTS total_price ON purchase_order TYPE int ASSERT $value >= 0;
DEFINE FIELD IF NOT EXISTS platform_fee ON purchase_order TYPE int ASSERT $value >= 0;
DEFINE FIELD IF NOT EXISTS status ON purchase_order TYPE string
    ASSERT $value IN ['completed', 'cancelled'];
DEFINE FIELD IF NOT EXISTS created_at ON purchase_order TYPE int;
DEFINE INDEX IF NOT EXISTS order_buyer ON purchase_order FIELDS buyer;
DEFINE INDEX IF NOT EXISTS order_listing ON purchase_order FIELDS listing;
"#;
