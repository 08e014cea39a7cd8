//! # Merchant Subscription Accounting
//!
//! Receipt-issuance capacity is gated behind a paid, time-boxed, tiered
//! quota. One subscription record exists per merchant address.
//!
//! ## Tiers
//!
//! | Tier       | Monthly price (token units) | Receipts / month |
//! |------------|-----------------------------|------------------|
//! | Basic      | 10 USDC                     | 100              |
//! | Premium    | 50 USDC                     | 500              |
//! | Enterprise | 100 USDC                    | Unlimited        |
//!
//! ## Pricing
//!
//! `price = monthly_rate × duration_months`, with a 10% discount applied
//! only when `duration_months == 12` exactly. No discount for any other
//! multi-month span.
//!
//! ## Unlimited-quota sentinel
//!
//! `receipts_remaining == 0` on an Enterprise subscription means *unlimited*
//! ([`RECEIPTS_UNLIMITED`]), never "quota exhausted". The ambiguity is
//! resolved by tier: [`is_unlimited`] is the only place the sentinel is
//! interpreted, and Basic/Premium subscriptions with zero remaining are
//! genuinely exhausted.
//!
//! ## Renewal
//!
//! Purchasing while a subscription is still active extends `expires_at`
//! additively; purchasing after a lapse starts a new cycle from now. Quota
//! always resets to the purchased tier's monthly allotment — unused receipts
//! do not roll over across cycles.

use soroban_sdk::{contracttype, Address, Env};

use crate::access_control;
use crate::errors::Error;

/// Seconds in one billing month (30 days).
pub const SECONDS_PER_MONTH: u64 = 30 * 24 * 60 * 60;

/// Shortest purchasable subscription, in months.
pub const MIN_DURATION_MONTHS: u32 = 1;
/// Longest purchasable subscription, in months.
pub const MAX_DURATION_MONTHS: u32 = 12;
/// Percent discount applied only to exactly 12-month purchases.
pub const YEARLY_DISCOUNT_PERCENT: i128 = 10;

/// Monthly prices in the payment token's smallest unit (7-decimal USDC).
pub const BASIC_MONTHLY_PRICE: i128 = 100_000_000;
pub const PREMIUM_MONTHLY_PRICE: i128 = 500_000_000;
pub const ENTERPRISE_MONTHLY_PRICE: i128 = 1_000_000_000;

/// Monthly receipt allotments per tier.
pub const BASIC_MONTHLY_RECEIPTS: u32 = 100;
pub const PREMIUM_MONTHLY_RECEIPTS: u32 = 500;
/// Sentinel stored in `receipts_remaining` for Enterprise subscriptions.
/// Zero is unambiguous here because only [`is_unlimited`] interprets it,
/// and it checks the tier first.
pub const RECEIPTS_UNLIMITED: u32 = 0;

/// Storage keys for subscription records.
#[contracttype]
#[derive(Clone)]
pub enum SubscriptionKey {
    /// Subscription record keyed by merchant address.
    Subscription(Address),
}

/// Pricing/quota bracket purchased per merchant.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SubscriptionTier {
    Basic = 0,
    Premium = 1,
    Enterprise = 2,
}

/// Stored subscription record. One per merchant; created on first purchase.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Subscription {
    pub tier: SubscriptionTier,
    /// Unix timestamp (seconds); the subscription is active iff `now < expires_at`.
    pub expires_at: u64,
    /// Receipts consumed in the current billing cycle.
    pub receipts_issued: u32,
    /// Quota left this cycle. [`RECEIPTS_UNLIMITED`] on Enterprise means unlimited.
    pub receipts_remaining: u32,
}

/// Read view of a merchant's subscription with derived activity flags.
///
/// `is_active` / `is_expired` are recomputed from `expires_at` at read time,
/// never stored. A merchant with no record reads as Basic/inactive with zero
/// quota, which cannot issue receipts.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubscriptionView {
    pub tier: SubscriptionTier,
    pub expires_at: u64,
    pub receipts_issued: u32,
    pub receipts_remaining: u32,
    pub is_active: bool,
    pub is_expired: bool,
}

/// Monthly rates and discount, for client-side price display.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubscriptionPricing {
    pub basic_monthly: i128,
    pub premium_monthly: i128,
    pub enterprise_monthly: i128,
    pub yearly_discount_percent: u32,
}

// ════════════════════════════════════════════════════════════════════
//  Tier tables
// ════════════════════════════════════════════════════════════════════

pub fn monthly_price(tier: SubscriptionTier) -> i128 {
    match tier {
        SubscriptionTier::Basic => BASIC_MONTHLY_PRICE,
        SubscriptionTier::Premium => PREMIUM_MONTHLY_PRICE,
        SubscriptionTier::Enterprise => ENTERPRISE_MONTHLY_PRICE,
    }
}

pub fn monthly_allotment(tier: SubscriptionTier) -> u32 {
    match tier {
        SubscriptionTier::Basic => BASIC_MONTHLY_RECEIPTS,
        SubscriptionTier::Premium => PREMIUM_MONTHLY_RECEIPTS,
        SubscriptionTier::Enterprise => RECEIPTS_UNLIMITED,
    }
}

/// Compute the full purchase price for `duration_months` of `tier`.
///
/// Validates the duration bound here so every caller gets the same
/// `InvalidDuration` behavior.
pub fn compute_price(tier: SubscriptionTier, duration_months: u32) -> Result<i128, Error> {
    if !(MIN_DURATION_MONTHS..=MAX_DURATION_MONTHS).contains(&duration_months) {
        return Err(Error::InvalidDuration);
    }
    let base = monthly_price(tier) * duration_months as i128;
    if duration_months == MAX_DURATION_MONTHS {
        Ok(base * (100 - YEARLY_DISCOUNT_PERCENT) / 100)
    } else {
        Ok(base)
    }
}

pub fn pricing() -> SubscriptionPricing {
    SubscriptionPricing {
        basic_monthly: BASIC_MONTHLY_PRICE,
        premium_monthly: PREMIUM_MONTHLY_PRICE,
        enterprise_monthly: ENTERPRISE_MONTHLY_PRICE,
        yearly_discount_percent: YEARLY_DISCOUNT_PERCENT as u32,
    }
}

// ════════════════════════════════════════════════════════════════════
//  Storage helpers
// ════════════════════════════════════════════════════════════════════

pub fn get(env: &Env, merchant: &Address) -> Option<Subscription> {
    env.storage()
        .persistent()
        .get(&SubscriptionKey::Subscription(merchant.clone()))
}

pub fn set(env: &Env, merchant: &Address, sub: &Subscription) {
    env.storage()
        .persistent()
        .set(&SubscriptionKey::Subscription(merchant.clone()), sub);
}

// ════════════════════════════════════════════════════════════════════
//  Derived state
// ════════════════════════════════════════════════════════════════════

/// Whether this subscription carries an unlimited quota.
/// The only place the [`RECEIPTS_UNLIMITED`] sentinel is interpreted.
pub fn is_unlimited(sub: &Subscription) -> bool {
    sub.tier == SubscriptionTier::Enterprise
}

fn is_active(sub: &Subscription, now: u64) -> bool {
    now < sub.expires_at
}

/// Build the read view for a merchant. Absent records default to an
/// inactive Basic subscription with no quota.
pub fn view(env: &Env, merchant: &Address, now: u64) -> SubscriptionView {
    match get(env, merchant) {
        Some(sub) => {
            let active = is_active(&sub, now);
            SubscriptionView {
                tier: sub.tier,
                expires_at: sub.expires_at,
                receipts_issued: sub.receipts_issued,
                receipts_remaining: sub.receipts_remaining,
                is_active: active,
                is_expired: !active,
            }
        }
        None => SubscriptionView {
            tier: SubscriptionTier::Basic,
            expires_at: 0,
            receipts_issued: 0,
            receipts_remaining: 0,
            is_active: false,
            is_expired: true,
        },
    }
}

/// Derived issuance gate: merchant verified AND human-verified AND
/// subscription active AND (quota unlimited OR receipts remaining).
pub fn can_issue_receipts(env: &Env, merchant: &Address, now: u64) -> bool {
    require_issuer(env, merchant, now).is_ok()
}

/// Same gate as [`can_issue_receipts`] but with a distinct error per
/// violated rule, for the `issue_receipt` path.
pub fn require_issuer(env: &Env, merchant: &Address, now: u64) -> Result<Subscription, Error> {
    if !access_control::is_verified_merchant(env, merchant) {
        return Err(Error::NotVerifiedMerchant);
    }
    if !access_control::is_verified_human(env, merchant) {
        return Err(Error::NotVerifiedHuman);
    }
    let sub = get(env, merchant).ok_or(Error::SubscriptionExpired)?;
    if !is_active(&sub, now) {
        return Err(Error::SubscriptionExpired);
    }
    if !is_unlimited(&sub) && sub.receipts_remaining == 0 {
        return Err(Error::QuotaExhausted);
    }
    Ok(sub)
}

// ════════════════════════════════════════════════════════════════════
//  Mutations
// ════════════════════════════════════════════════════════════════════

/// Apply a paid purchase: extend an active subscription additively or start
/// a fresh cycle, record the tier, and reset the quota to the tier's monthly
/// allotment (no rollover). Returns the stored record.
pub fn apply_purchase(
    env: &Env,
    merchant: &Address,
    tier: SubscriptionTier,
    duration_months: u32,
    now: u64,
) -> Subscription {
    let base = match get(env, merchant) {
        Some(existing) if is_active(&existing, now) => existing.expires_at,
        _ => now,
    };
    let sub = Subscription {
        tier,
        expires_at: base + duration_months as u64 * SECONDS_PER_MONTH,
        receipts_issued: 0,
        receipts_remaining: monthly_allotment(tier),
    };
    set(env, merchant, &sub);
    sub
}

/// Consume one receipt of quota. Decrement is a no-op on unlimited tiers;
/// callers must have passed [`require_issuer`] first.
pub fn consume_quota(env: &Env, merchant: &Address, mut sub: Subscription) {
    if !is_unlimited(&sub) {
        sub.receipts_remaining -= 1;
    }
    sub.receipts_issued += 1;
    set(env, merchant, &sub);
}
