#![no_std]
use soroban_sdk::{contract, contractimpl, Address, BytesN, Env, String, Vec};

// ─── Feature modules: add new `pub mod <name>;` here (one per feature) ───
pub mod access_control;
pub mod errors;
pub mod events;
pub mod payments;
pub mod receipts;
pub mod subscriptions;
// ─── End feature modules ───

// ─── Re-exports: add new `pub use <module>::...` here if needed ───
pub use errors::Error;
pub use receipts::{GadgetStatus, Receipt, ReceiptStatus, TotalStats, FIRST_RECEIPT_ID};
pub use subscriptions::{
    Subscription, SubscriptionPricing, SubscriptionTier, SubscriptionView, RECEIPTS_UNLIMITED,
};
// ─── End re-exports ───

#[cfg(test)]
mod receipts_test;
// ─── End test modules ───

/// Contract version reported by [`ProofMint::version`]. Bump on every
/// deployed logic upgrade.
pub const CONTRACT_VERSION: &str = "1.0.0";

#[contract]
pub struct ProofMint;

#[contractimpl]
impl ProofMint {
    // ── Initialization ──────────────────────────────────────────────

    /// One-time contract initialization. Sets the admin, the payment token
    /// used for subscriptions, and the trusted identity verification oracle.
    ///
    /// Must be called before any other method. The caller must authorize
    /// as `admin`.
    pub fn initialize(
        env: Env,
        admin: Address,
        payment_token: Address,
        identity_oracle: Address,
    ) -> Result<(), Error> {
        if access_control::is_initialized(&env) {
            return Err(Error::AlreadyInitialized);
        }
        admin.require_auth();
        access_control::set_admin(&env, &admin);
        access_control::set_oracle(&env, &identity_oracle);
        payments::set_payment_token(&env, &payment_token);
        // Receipt ids are 1-indexed from construction.
        receipts::init_id_counter(&env);
        Ok(())
    }

    /// Rotate admin to a new address. Only callable by the current admin.
    ///
    /// Immediate effect: the old admin loses access in the same transaction.
    pub fn rotate_admin(env: Env, caller: Address, new_admin: Address) -> Result<(), Error> {
        access_control::require_admin(&env, &caller)?;
        access_control::set_admin(&env, &new_admin);
        events::emit_admin_rotated(&env, &caller, &new_admin);
        Ok(())
    }

    /// Replace the trusted identity oracle. Admin only.
    pub fn set_identity_oracle(env: Env, caller: Address, oracle: Address) -> Result<(), Error> {
        access_control::require_admin(&env, &caller)?;
        access_control::set_oracle(&env, &oracle);
        events::emit_oracle_changed(&env, &oracle, &caller);
        Ok(())
    }

    // ── Role management ─────────────────────────────────────────────

    /// Add an address to the verified-merchant set. Admin only.
    pub fn add_merchant(env: Env, caller: Address, merchant: Address) -> Result<(), Error> {
        access_control::require_not_paused(&env)?;
        access_control::require_admin(&env, &caller)?;
        access_control::set_merchant(&env, &merchant, true);
        events::emit_merchant_added(&env, &merchant, &caller);
        Ok(())
    }

    /// Remove an address from the verified-merchant set. Admin only.
    ///
    /// The merchant's subscription record and already-issued receipts are
    /// left intact; the address simply fails the merchant gate from now on.
    pub fn remove_merchant(env: Env, caller: Address, merchant: Address) -> Result<(), Error> {
        access_control::require_not_paused(&env)?;
        access_control::require_admin(&env, &caller)?;
        access_control::set_merchant(&env, &merchant, false);
        events::emit_merchant_removed(&env, &merchant, &caller);
        Ok(())
    }

    /// Add an address to the recycler set. Admin only.
    pub fn add_recycler(env: Env, caller: Address, recycler: Address) -> Result<(), Error> {
        access_control::require_not_paused(&env)?;
        access_control::require_admin(&env, &caller)?;
        access_control::set_recycler(&env, &recycler, true);
        events::emit_recycler_added(&env, &recycler, &caller);
        Ok(())
    }

    /// Remove an address from the recycler set. Admin only.
    pub fn remove_recycler(env: Env, caller: Address, recycler: Address) -> Result<(), Error> {
        access_control::require_not_paused(&env)?;
        access_control::require_admin(&env, &caller)?;
        access_control::set_recycler(&env, &recycler, false);
        events::emit_recycler_removed(&env, &recycler, &caller);
        Ok(())
    }

    // ── Human verification ──────────────────────────────────────────

    /// Attestation callback from the identity verification oracle: mark
    /// `account` as human-verified.
    ///
    /// Rejects any caller other than the configured oracle. Idempotent —
    /// a replayed attestation for an already-verified address is a no-op,
    /// not an error.
    pub fn confirm_human_verification(
        env: Env,
        caller: Address,
        account: Address,
    ) -> Result<(), Error> {
        access_control::require_not_paused(&env)?;
        access_control::require_oracle(&env, &caller)?;
        if !access_control::is_verified_human(&env, &account) {
            access_control::set_human_verified(&env, &account, true);
            events::emit_human_verified(&env, &account, &caller);
        }
        Ok(())
    }

    /// Admin bypass of the oracle flow: mark `account` human-verified
    /// directly. For regions where the verification provider is unavailable.
    pub fn emergency_verify_human(env: Env, caller: Address, account: Address) -> Result<(), Error> {
        access_control::require_not_paused(&env)?;
        access_control::require_admin(&env, &caller)?;
        access_control::set_human_verified(&env, &account, true);
        events::emit_human_verified(&env, &account, &caller);
        Ok(())
    }

    /// Revoke an address's human verification. Admin only.
    pub fn revoke_human_verification(
        env: Env,
        caller: Address,
        account: Address,
    ) -> Result<(), Error> {
        access_control::require_not_paused(&env)?;
        access_control::require_admin(&env, &caller)?;
        access_control::set_human_verified(&env, &account, false);
        events::emit_human_revoked(&env, &account, &caller);
        Ok(())
    }

    // ── Pause / circuit breaker ─────────────────────────────────────

    /// Pause the contract. Admin only. While paused every state-mutating
    /// entrypoint is rejected; reads remain available.
    pub fn pause(env: Env, caller: Address) -> Result<(), Error> {
        access_control::require_admin(&env, &caller)?;
        access_control::set_paused(&env, true);
        events::emit_paused(&env, &caller);
        Ok(())
    }

    /// Unpause the contract. Admin only.
    pub fn unpause(env: Env, caller: Address) -> Result<(), Error> {
        access_control::require_admin(&env, &caller)?;
        access_control::set_paused(&env, false);
        events::emit_unpaused(&env, &caller);
        Ok(())
    }

    /// Check if the contract is paused.
    pub fn is_paused(env: Env) -> bool {
        access_control::is_paused(&env)
    }

    // ── Subscriptions ───────────────────────────────────────────────

    /// Purchase or renew a subscription.
    ///
    /// The merchant must be verified, human-verified, and pay the exact
    /// computed price (monthly rate × months, 10% off for exactly 12
    /// months) in the configured payment token. The token pull happens
    /// before any subscription state is written; if it fails the whole
    /// call rolls back.
    ///
    /// An active subscription is extended additively; a lapsed or absent
    /// one starts a fresh cycle from now. Quota resets to the tier's
    /// monthly allotment either way — unused receipts never roll over.
    pub fn purchase_subscription(
        env: Env,
        merchant: Address,
        tier: SubscriptionTier,
        duration_months: u32,
    ) -> Result<(), Error> {
        access_control::require_not_paused(&env)?;
        merchant.require_auth();
        if !access_control::is_verified_merchant(&env, &merchant) {
            return Err(Error::NotVerifiedMerchant);
        }
        if !access_control::is_verified_human(&env, &merchant) {
            return Err(Error::NotVerifiedHuman);
        }
        let price = subscriptions::compute_price(tier, duration_months)?;
        payments::collect(&env, &merchant, price)?;

        let now = env.ledger().timestamp();
        let sub = subscriptions::apply_purchase(&env, &merchant, tier, duration_months, now);
        events::emit_subscription_purchased(
            &env,
            &merchant,
            tier,
            duration_months,
            price,
            sub.expires_at,
        );
        Ok(())
    }

    /// Read a merchant's subscription with derived activity flags.
    /// Merchants without a record read as Basic/inactive with zero quota.
    pub fn get_subscription(env: Env, merchant: Address) -> SubscriptionView {
        subscriptions::view(&env, &merchant, env.ledger().timestamp())
    }

    /// Monthly prices per tier and the yearly discount, for price display.
    pub fn get_subscription_pricing(_env: Env) -> SubscriptionPricing {
        subscriptions::pricing()
    }

    /// Derived issuance gate: merchant verified AND human-verified AND
    /// subscription active AND (quota unlimited OR receipts remaining).
    pub fn can_issue_receipts(env: Env, merchant: Address) -> bool {
        subscriptions::can_issue_receipts(&env, &merchant, env.ledger().timestamp())
    }

    // ── Receipts ────────────────────────────────────────────────────

    /// Mint a proof-of-purchase receipt to `buyer`.
    ///
    /// The caller must pass the full issuance gate; each failing rule
    /// surfaces its own error (`NotVerifiedMerchant`, `NotVerifiedHuman`,
    /// `SubscriptionExpired`, `QuotaExhausted`). `content_hash` must be a
    /// non-empty content-addressed pointer (e.g. an IPFS CID).
    ///
    /// On success the next sequential id is assigned, the receipt is stored
    /// with status `Active`, token ownership goes to `buyer`, and one unit
    /// of quota is consumed (no-op on Enterprise). Returns the new id.
    pub fn issue_receipt(
        env: Env,
        merchant: Address,
        buyer: Address,
        content_hash: String,
    ) -> Result<u64, Error> {
        access_control::require_not_paused(&env)?;
        merchant.require_auth();
        let now = env.ledger().timestamp();
        let sub = subscriptions::require_issuer(&env, &merchant, now)?;
        let receipt = receipts::mint(&env, &merchant, &buyer, &content_hash, now)?;
        subscriptions::consume_quota(&env, &merchant, sub);
        events::emit_receipt_issued(&env, receipt.id, &merchant, &buyer, &content_hash);
        Ok(receipt.id)
    }

    /// Flag the lifecycle status of the gadget behind `receipt_id`.
    ///
    /// Only the *current* owner of the receipt token may flag — originally
    /// the buyer, or whoever the token was transferred to since. Any
    /// transition among the four statuses is permitted.
    pub fn flag_gadget(
        env: Env,
        caller: Address,
        receipt_id: u64,
        status: GadgetStatus,
    ) -> Result<(), Error> {
        access_control::require_not_paused(&env)?;
        caller.require_auth();
        let now = env.ledger().timestamp();
        receipts::flag(&env, &caller, receipt_id, status, now)?;
        events::emit_gadget_flagged(&env, receipt_id, &caller, status, now);
        Ok(())
    }

    /// Transfer receipt token ownership from `from` to `to`. Moving the
    /// token moves the right to flag; the provenance `buyer` field on the
    /// receipt record never changes.
    pub fn transfer_receipt(
        env: Env,
        from: Address,
        to: Address,
        receipt_id: u64,
    ) -> Result<(), Error> {
        access_control::require_not_paused(&env)?;
        from.require_auth();
        receipts::transfer(&env, &from, &to, receipt_id)?;
        events::emit_receipt_transferred(&env, receipt_id, &from, &to);
        Ok(())
    }

    // ── Funds custody ───────────────────────────────────────────────

    /// Withdraw the full custodial balance to the admin. Admin only.
    ///
    /// The tracked balance is zeroed before the outbound token transfer.
    /// Calling with an empty balance is a safe no-op returning 0. Stays
    /// available while paused so funds are never locked behind the
    /// circuit breaker.
    pub fn withdraw_funds(env: Env, caller: Address) -> Result<i128, Error> {
        access_control::require_admin(&env, &caller)?;
        let amount = payments::drain(&env, &caller)?;
        if amount > 0 {
            events::emit_funds_withdrawn(&env, &caller, amount);
        }
        Ok(amount)
    }

    /// Custodial balance currently held from subscription payments.
    pub fn get_collected_funds(env: Env) -> i128 {
        payments::collected_funds(&env)
    }

    // ── Read-only queries ───────────────────────────────────────────

    /// Check merchant set membership.
    pub fn is_verified_merchant(env: Env, account: Address) -> bool {
        access_control::is_verified_merchant(&env, &account)
    }

    /// Check recycler set membership.
    pub fn is_recycler(env: Env, account: Address) -> bool {
        access_control::is_recycler(&env, &account)
    }

    /// Check the human verification flag.
    pub fn is_verified_human(env: Env, account: Address) -> bool {
        access_control::is_verified_human(&env, &account)
    }

    /// Full receipt record by id.
    pub fn get_receipt(env: Env, receipt_id: u64) -> Result<Receipt, Error> {
        receipts::get_receipt(&env, receipt_id)
    }

    /// Gadget status and last update timestamp for a receipt.
    pub fn get_receipt_status(env: Env, receipt_id: u64) -> Result<ReceiptStatus, Error> {
        let receipt = receipts::get_receipt(&env, receipt_id)?;
        Ok(ReceiptStatus {
            gadget_status: receipt.gadget_status,
            last_status_update: receipt.last_status_update,
        })
    }

    /// Current owner of the receipt token.
    pub fn owner_of(env: Env, receipt_id: u64) -> Result<Address, Error> {
        receipts::owner_of(&env, receipt_id)
    }

    /// All receipt ids issued by a merchant, oldest first.
    pub fn get_merchant_receipts(env: Env, merchant: Address) -> Vec<u64> {
        receipts::merchant_receipts(&env, &merchant)
    }

    /// The next receipt id to be assigned. Starts at 1.
    pub fn get_next_receipt_id(env: Env) -> u64 {
        receipts::next_receipt_id(&env)
    }

    /// Ledger-wide totals: receipts minted, merchants, recyclers.
    pub fn get_total_stats(env: Env) -> TotalStats {
        TotalStats {
            total_receipts: receipts::next_receipt_id(&env) - FIRST_RECEIPT_ID,
            total_merchants: access_control::merchant_count(&env),
            total_recyclers: access_control::recycler_count(&env),
        }
    }

    /// The contract admin address.
    pub fn get_admin(env: Env) -> Result<Address, Error> {
        access_control::get_admin(&env)
    }

    /// The configured identity verification oracle.
    pub fn get_identity_oracle(env: Env) -> Result<Address, Error> {
        access_control::get_oracle(&env)
    }

    /// The configured payment token.
    pub fn get_payment_token(env: Env) -> Result<Address, Error> {
        payments::get_payment_token(&env)
    }

    // ── Versioning & upgrade ────────────────────────────────────────

    /// Semantic version of the deployed logic.
    pub fn version(env: Env) -> String {
        String::from_str(&env, CONTRACT_VERSION)
    }

    /// Upgrade the contract logic in place. Admin only.
    ///
    /// Replaces the wasm while preserving all storage; the `DataKey` enums
    /// are append-only across versions so new logic never reinterprets
    /// existing entries. Available while paused.
    pub fn upgrade(env: Env, caller: Address, new_wasm_hash: BytesN<32>) -> Result<(), Error> {
        access_control::require_admin(&env, &caller)?;
        env.deployer().update_current_contract_wasm(new_wasm_hash);
        Ok(())
    }
}
