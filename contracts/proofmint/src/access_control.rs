//! # Roles, Verification Gates, and the Circuit Breaker
//!
//! This module holds every permission layer the ledger enforces:
//!
//! | Gate           | Granted by                         | Checked on                |
//! |----------------|------------------------------------|---------------------------|
//! | Admin          | `initialize`, `rotate_admin`       | All privileged mutations  |
//! | Merchant       | Admin (`add_merchant`)             | Purchase, receipt issue   |
//! | Recycler       | Admin (`add_recycler`)             | Recycling integrations    |
//! | Human-verified | Identity oracle or admin override  | Purchase, receipt issue   |
//!
//! ## Security Model
//!
//! - Role sets are per-address boolean flags in persistent storage, giving
//!   O(1) membership checks with no unbounded iteration. Enumeration is an
//!   off-chain indexing concern driven by the emitted events.
//! - The admin is a single address; transferring it is an explicit,
//!   immediate operation.
//! - Default policy is least-privilege: an address holds no role until one
//!   is granted.
//! - The paused flag is the contract's sole global emergency stop: every
//!   state-mutating entrypoint checks [`require_not_paused`] first, while
//!   read-only queries stay available.

use soroban_sdk::{contracttype, Address, Env};

use crate::errors::Error;

/// Storage keys for roles, verification flags, and pause state.
#[contracttype]
#[derive(Clone)]
pub enum AccessControlKey {
    /// Contract administrator address.
    Admin,
    /// Trusted identity verification oracle address.
    Oracle,
    /// Contract paused state.
    Paused,
    /// Merchant set membership flag for an address.
    Merchant(Address),
    /// Recycler set membership flag for an address.
    Recycler(Address),
    /// Human (Sybil-resistance) verification flag for an address.
    HumanVerified(Address),
    /// Running count of verified merchants (for `get_total_stats`).
    MerchantCount,
    /// Running count of verified recyclers (for `get_total_stats`).
    RecyclerCount,
}

// ════════════════════════════════════════════════════════════════════
//  Admin
// ════════════════════════════════════════════════════════════════════

/// Read the admin address. Errors if the contract has not been initialized.
pub fn get_admin(env: &Env) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(&AccessControlKey::Admin)
        .ok_or(Error::NotInitialized)
}

pub fn set_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&AccessControlKey::Admin, admin);
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&AccessControlKey::Admin)
}

/// Require that `caller` authorized the call and is the contract admin.
pub fn require_admin(env: &Env, caller: &Address) -> Result<(), Error> {
    caller.require_auth();
    if *caller != get_admin(env)? {
        return Err(Error::OnlyAdmin);
    }
    Ok(())
}

// ════════════════════════════════════════════════════════════════════
//  Identity oracle
// ════════════════════════════════════════════════════════════════════

/// Read the configured identity oracle address.
pub fn get_oracle(env: &Env) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(&AccessControlKey::Oracle)
        .ok_or(Error::NotInitialized)
}

pub fn set_oracle(env: &Env, oracle: &Address) {
    env.storage()
        .instance()
        .set(&AccessControlKey::Oracle, oracle);
}

/// Require that `caller` authorized the call and is the identity oracle.
pub fn require_oracle(env: &Env, caller: &Address) -> Result<(), Error> {
    caller.require_auth();
    if *caller != get_oracle(env)? {
        return Err(Error::OnlyOracle);
    }
    Ok(())
}

// ════════════════════════════════════════════════════════════════════
//  Role sets
// ════════════════════════════════════════════════════════════════════

/// Check merchant set membership.
pub fn is_verified_merchant(env: &Env, account: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&AccessControlKey::Merchant(account.clone()))
}

/// Add or remove an address from the merchant set, keeping the count in sync.
/// Idempotent: re-adding or re-removing is a no-op.
pub fn set_merchant(env: &Env, account: &Address, member: bool) {
    let key = AccessControlKey::Merchant(account.clone());
    if member && !is_verified_merchant(env, account) {
        env.storage().persistent().set(&key, &true);
        bump_count(env, &AccessControlKey::MerchantCount, 1);
    } else if !member && is_verified_merchant(env, account) {
        env.storage().persistent().remove(&key);
        bump_count(env, &AccessControlKey::MerchantCount, -1);
    }
}

/// Check recycler set membership.
pub fn is_recycler(env: &Env, account: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&AccessControlKey::Recycler(account.clone()))
}

/// Add or remove an address from the recycler set, keeping the count in sync.
pub fn set_recycler(env: &Env, account: &Address, member: bool) {
    let key = AccessControlKey::Recycler(account.clone());
    if member && !is_recycler(env, account) {
        env.storage().persistent().set(&key, &true);
        bump_count(env, &AccessControlKey::RecyclerCount, 1);
    } else if !member && is_recycler(env, account) {
        env.storage().persistent().remove(&key);
        bump_count(env, &AccessControlKey::RecyclerCount, -1);
    }
}

pub fn merchant_count(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&AccessControlKey::MerchantCount)
        .unwrap_or(0)
}

pub fn recycler_count(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&AccessControlKey::RecyclerCount)
        .unwrap_or(0)
}

fn bump_count(env: &Env, key: &AccessControlKey, delta: i32) {
    let current: u32 = env.storage().instance().get(key).unwrap_or(0);
    let next = if delta >= 0 {
        current + delta as u32
    } else {
        current.saturating_sub((-delta) as u32)
    };
    env.storage().instance().set(key, &next);
}

// ════════════════════════════════════════════════════════════════════
//  Human verification
// ════════════════════════════════════════════════════════════════════

/// Check the human (Sybil-resistance) verification flag.
pub fn is_verified_human(env: &Env, account: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&AccessControlKey::HumanVerified(account.clone()))
}

/// Set or clear the human verification flag. Idempotent in both directions:
/// verifying an already-verified address (or revoking an unverified one) is
/// a no-op, not an error, so replayed oracle attestations are harmless.
pub fn set_human_verified(env: &Env, account: &Address, verified: bool) {
    let key = AccessControlKey::HumanVerified(account.clone());
    if verified {
        env.storage().persistent().set(&key, &true);
    } else {
        env.storage().persistent().remove(&key);
    }
}

// ════════════════════════════════════════════════════════════════════
//  Pause / circuit breaker
// ════════════════════════════════════════════════════════════════════

/// Check if the contract is paused.
pub fn is_paused(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&AccessControlKey::Paused)
        .unwrap_or(false)
}

/// Set the paused state of the contract.
pub fn set_paused(env: &Env, paused: bool) {
    env.storage()
        .instance()
        .set(&AccessControlKey::Paused, &paused);
}

/// Gate for every state-mutating entrypoint.
pub fn require_not_paused(env: &Env) -> Result<(), Error> {
    if is_paused(env) {
        return Err(Error::ContractPaused);
    }
    Ok(())
}
