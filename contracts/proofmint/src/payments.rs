//! # Funds Custody
//!
//! All subscription payments pool into a single custodial balance held by
//! the contract in the configured payment token (a USDC-style Stellar
//! asset). There is no per-merchant escrow.
//!
//! The tracked accumulator under [`PaymentKey::CollectedFunds`] mirrors the
//! contract's token balance from subscription income. On withdrawal the
//! accumulator is zeroed *before* the outbound transfer, so the contract's
//! own bookkeeping is never observable in a stale state by the transfer
//! target.

use soroban_sdk::{contracttype, token, Address, Env};

use crate::errors::Error;

/// Storage keys for payment configuration and custody.
#[contracttype]
#[derive(Clone)]
pub enum PaymentKey {
    /// Token contract used for subscription payment (e.g. USDC on Stellar).
    PaymentToken,
    /// Running total of collected, not-yet-withdrawn subscription payments.
    CollectedFunds,
}

/// Read the configured payment token address.
pub fn get_payment_token(env: &Env) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(&PaymentKey::PaymentToken)
        .ok_or(Error::NotInitialized)
}

pub fn set_payment_token(env: &Env, token: &Address) {
    env.storage()
        .instance()
        .set(&PaymentKey::PaymentToken, token);
}

/// Custodial balance collected from subscription purchases.
pub fn collected_funds(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&PaymentKey::CollectedFunds)
        .unwrap_or(0)
}

/// Pull an exact payment from `payer` into contract custody.
///
/// The token transfer is all-or-nothing: if the payer's balance or
/// authorization is insufficient the host traps and the whole transaction
/// rolls back, so the accumulator and the real balance cannot diverge.
pub fn collect(env: &Env, payer: &Address, amount: i128) -> Result<(), Error> {
    let token_addr = get_payment_token(env)?;
    let client = token::Client::new(env, &token_addr);
    client.transfer(payer, &env.current_contract_address(), &amount);
    env.storage()
        .instance()
        .set(&PaymentKey::CollectedFunds, &(collected_funds(env) + amount));
    Ok(())
}

/// Drain the full custodial balance to `recipient`.
///
/// Zeroes the accumulator first, then transfers. Returns the amount moved;
/// draining an empty balance is a no-op returning zero.
pub fn drain(env: &Env, recipient: &Address) -> Result<i128, Error> {
    let amount = collected_funds(env);
    if amount == 0 {
        return Ok(0);
    }
    env.storage()
        .instance()
        .set(&PaymentKey::CollectedFunds, &0i128);
    let token_addr = get_payment_token(env)?;
    let client = token::Client::new(env, &token_addr);
    client.transfer(&env.current_contract_address(), recipient, &amount);
    Ok(amount)
}
