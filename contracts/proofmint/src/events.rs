//! # Structured Event Emissions
//!
//! This module defines and emits structured, indexable events for the
//! ledger lifecycle. Events are designed for compatibility with off-chain
//! indexers and the merchant/buyer dashboards.
//!
//! ## Event Types
//!
//! | Event                | Description                                     |
//! |----------------------|-------------------------------------------------|
//! | MerchantAdded/Removed| Merchant set membership changed by the admin    |
//! | RecyclerAdded/Removed| Recycler set membership changed by the admin    |
//! | HumanVerified/Revoked| Human verification granted (oracle or admin)    |
//! | SubscriptionPurchased| A merchant bought or renewed a subscription     |
//! | ReceiptIssued        | A receipt was minted to a buyer                 |
//! | GadgetFlagged        | The token owner changed a gadget's status       |
//! | ReceiptTransferred   | Receipt token ownership moved                   |
//! | FundsWithdrawn       | Admin drained the custodial balance             |
//! | ContractPaused/Unpaused | Circuit breaker toggled                      |
//! | AdminRotated         | Ownership transferred to a new admin            |
//! | OracleChanged        | Identity oracle reconfigured                    |
//!
//! Each event publishes under a short topic symbol plus the primary address
//! involved, so indexers can filter per-account without scanning.

use soroban_sdk::{contracttype, symbol_short, Address, Env, String, Symbol};

use crate::receipts::GadgetStatus;
use crate::subscriptions::SubscriptionTier;

// ════════════════════════════════════════════════════════════════════
//  Event Topics (Short symbols for efficient indexing)
// ════════════════════════════════════════════════════════════════════

pub const TOPIC_MERCHANT_ADDED: Symbol = symbol_short!("m_add");
pub const TOPIC_MERCHANT_REMOVED: Symbol = symbol_short!("m_rem");
pub const TOPIC_RECYCLER_ADDED: Symbol = symbol_short!("r_add");
pub const TOPIC_RECYCLER_REMOVED: Symbol = symbol_short!("r_rem");
pub const TOPIC_HUMAN_VERIFIED: Symbol = symbol_short!("hv_add");
pub const TOPIC_HUMAN_REVOKED: Symbol = symbol_short!("hv_rev");
pub const TOPIC_SUBSCRIPTION: Symbol = symbol_short!("sub_buy");
pub const TOPIC_RECEIPT_ISSUED: Symbol = symbol_short!("rcpt_iss");
pub const TOPIC_GADGET_FLAGGED: Symbol = symbol_short!("flag");
pub const TOPIC_RECEIPT_TRANSFERRED: Symbol = symbol_short!("rcpt_xfr");
pub const TOPIC_FUNDS_WITHDRAWN: Symbol = symbol_short!("withdraw");
pub const TOPIC_PAUSED: Symbol = symbol_short!("paused");
pub const TOPIC_UNPAUSED: Symbol = symbol_short!("unpaus");
pub const TOPIC_ADMIN_ROTATED: Symbol = symbol_short!("adm_rot");
pub const TOPIC_ORACLE_CHANGED: Symbol = symbol_short!("oracle");

// ════════════════════════════════════════════════════════════════════
//  Event Data Structures
// ════════════════════════════════════════════════════════════════════

/// Membership change in the merchant or recycler set.
#[contracttype]
#[derive(Clone, Debug)]
pub struct RoleChangedEvent {
    /// Address whose membership changed.
    pub account: Address,
    /// Admin that made the change.
    pub changed_by: Address,
}

/// Human verification granted or revoked.
#[contracttype]
#[derive(Clone, Debug)]
pub struct HumanVerificationEvent {
    /// Address whose verification changed.
    pub account: Address,
    /// Oracle (attestation path) or admin (override path).
    pub changed_by: Address,
}

/// A merchant purchased or renewed a subscription.
#[contracttype]
#[derive(Clone, Debug)]
pub struct SubscriptionPurchasedEvent {
    pub merchant: Address,
    pub tier: SubscriptionTier,
    pub duration_months: u32,
    /// Exact amount pulled into custody, discount applied.
    pub price_paid: i128,
    /// New expiry after this purchase.
    pub expires_at: u64,
}

/// A receipt was minted.
#[contracttype]
#[derive(Clone, Debug)]
pub struct ReceiptIssuedEvent {
    pub id: u64,
    pub merchant: Address,
    pub buyer: Address,
    pub content_hash: String,
}

/// The token owner flagged a gadget's lifecycle status.
#[contracttype]
#[derive(Clone, Debug)]
pub struct GadgetFlaggedEvent {
    pub id: u64,
    pub owner: Address,
    pub status: GadgetStatus,
    pub timestamp: u64,
}

/// Receipt token ownership moved.
#[contracttype]
#[derive(Clone, Debug)]
pub struct ReceiptTransferredEvent {
    pub id: u64,
    pub from: Address,
    pub to: Address,
}

/// Admin drained the custodial balance.
#[contracttype]
#[derive(Clone, Debug)]
pub struct FundsWithdrawnEvent {
    pub admin: Address,
    pub amount: i128,
}

/// Pause state changed.
#[contracttype]
#[derive(Clone, Debug)]
pub struct PauseChangedEvent {
    pub changed_by: Address,
}

/// Ownership transferred.
#[contracttype]
#[derive(Clone, Debug)]
pub struct AdminRotatedEvent {
    pub old_admin: Address,
    pub new_admin: Address,
}

/// Identity oracle reconfigured.
#[contracttype]
#[derive(Clone, Debug)]
pub struct OracleChangedEvent {
    pub oracle: Address,
    pub changed_by: Address,
}

// ════════════════════════════════════════════════════════════════════
//  Event Emission Functions
// ════════════════════════════════════════════════════════════════════

pub fn emit_merchant_added(env: &Env, merchant: &Address, changed_by: &Address) {
    let event = RoleChangedEvent {
        account: merchant.clone(),
        changed_by: changed_by.clone(),
    };
    env.events()
        .publish((TOPIC_MERCHANT_ADDED, merchant.clone()), event);
}

pub fn emit_merchant_removed(env: &Env, merchant: &Address, changed_by: &Address) {
    let event = RoleChangedEvent {
        account: merchant.clone(),
        changed_by: changed_by.clone(),
    };
    env.events()
        .publish((TOPIC_MERCHANT_REMOVED, merchant.clone()), event);
}

pub fn emit_recycler_added(env: &Env, recycler: &Address, changed_by: &Address) {
    let event = RoleChangedEvent {
        account: recycler.clone(),
        changed_by: changed_by.clone(),
    };
    env.events()
        .publish((TOPIC_RECYCLER_ADDED, recycler.clone()), event);
}

pub fn emit_recycler_removed(env: &Env, recycler: &Address, changed_by: &Address) {
    let event = RoleChangedEvent {
        account: recycler.clone(),
        changed_by: changed_by.clone(),
    };
    env.events()
        .publish((TOPIC_RECYCLER_REMOVED, recycler.clone()), event);
}

pub fn emit_human_verified(env: &Env, account: &Address, changed_by: &Address) {
    let event = HumanVerificationEvent {
        account: account.clone(),
        changed_by: changed_by.clone(),
    };
    env.events()
        .publish((TOPIC_HUMAN_VERIFIED, account.clone()), event);
}

pub fn emit_human_revoked(env: &Env, account: &Address, changed_by: &Address) {
    let event = HumanVerificationEvent {
        account: account.clone(),
        changed_by: changed_by.clone(),
    };
    env.events()
        .publish((TOPIC_HUMAN_REVOKED, account.clone()), event);
}

pub fn emit_subscription_purchased(
    env: &Env,
    merchant: &Address,
    tier: SubscriptionTier,
    duration_months: u32,
    price_paid: i128,
    expires_at: u64,
) {
    let event = SubscriptionPurchasedEvent {
        merchant: merchant.clone(),
        tier,
        duration_months,
        price_paid,
        expires_at,
    };
    env.events()
        .publish((TOPIC_SUBSCRIPTION, merchant.clone()), event);
}

pub fn emit_receipt_issued(
    env: &Env,
    id: u64,
    merchant: &Address,
    buyer: &Address,
    content_hash: &String,
) {
    let event = ReceiptIssuedEvent {
        id,
        merchant: merchant.clone(),
        buyer: buyer.clone(),
        content_hash: content_hash.clone(),
    };
    env.events()
        .publish((TOPIC_RECEIPT_ISSUED, merchant.clone()), event);
}

pub fn emit_gadget_flagged(env: &Env, id: u64, owner: &Address, status: GadgetStatus, timestamp: u64) {
    let event = GadgetFlaggedEvent {
        id,
        owner: owner.clone(),
        status,
        timestamp,
    };
    env.events()
        .publish((TOPIC_GADGET_FLAGGED, owner.clone()), event);
}

pub fn emit_receipt_transferred(env: &Env, id: u64, from: &Address, to: &Address) {
    let event = ReceiptTransferredEvent {
        id,
        from: from.clone(),
        to: to.clone(),
    };
    env.events()
        .publish((TOPIC_RECEIPT_TRANSFERRED, from.clone()), event);
}

pub fn emit_funds_withdrawn(env: &Env, admin: &Address, amount: i128) {
    let event = FundsWithdrawnEvent {
        admin: admin.clone(),
        amount,
    };
    env.events().publish((TOPIC_FUNDS_WITHDRAWN,), event);
}

pub fn emit_paused(env: &Env, changed_by: &Address) {
    let event = PauseChangedEvent {
        changed_by: changed_by.clone(),
    };
    env.events().publish((TOPIC_PAUSED,), event);
}

pub fn emit_unpaused(env: &Env, changed_by: &Address) {
    let event = PauseChangedEvent {
        changed_by: changed_by.clone(),
    };
    env.events().publish((TOPIC_UNPAUSED,), event);
}

pub fn emit_admin_rotated(env: &Env, old_admin: &Address, new_admin: &Address) {
    let event = AdminRotatedEvent {
        old_admin: old_admin.clone(),
        new_admin: new_admin.clone(),
    };
    env.events().publish((TOPIC_ADMIN_ROTATED,), event);
}

pub fn emit_oracle_changed(env: &Env, oracle: &Address, changed_by: &Address) {
    let event = OracleChangedEvent {
        oracle: oracle.clone(),
        changed_by: changed_by.clone(),
    };
    env.events().publish((TOPIC_ORACLE_CHANGED,), event);
}
