//! # Error Taxonomy for the Receipt & Subscription Ledger
//!
//! Every rejected call surfaces a distinct, named condition so clients can
//! branch on cause and present precise feedback. All errors are synchronous
//! transaction rejections: the Soroban host rolls back every storage write
//! made before the error is returned, so there is no partial-success state.

use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum Error {
    /// `initialize` was called on an already-initialized contract.
    AlreadyInitialized = 1,
    /// An admin-gated or oracle-gated method was called before `initialize`.
    NotInitialized = 2,
    /// Caller is not the contract admin.
    OnlyAdmin = 3,
    /// Caller is not the configured identity verification oracle.
    OnlyOracle = 4,
    /// Caller has not been added to the merchant set by the admin.
    NotVerifiedMerchant = 5,
    /// Caller has not passed human (Sybil-resistance) verification.
    NotVerifiedHuman = 6,
    /// Caller does not currently own the receipt token being flagged.
    OnlyBuyerCanFlag = 7,
    /// Subscription duration is outside the 1-12 month range.
    InvalidDuration = 8,
    /// Receipt content hash must be a non-empty string.
    EmptyContentHash = 9,
    /// Merchant's subscription has no receipts remaining this cycle.
    QuotaExhausted = 10,
    /// Merchant has no subscription record, or its expiry has passed.
    SubscriptionExpired = 11,
    /// No receipt exists under the given id.
    ReceiptNotFound = 12,
    /// A state-mutating call was made while the contract is paused.
    ContractPaused = 13,
    /// Transfer attempted by an address that does not own the receipt token.
    NotTokenOwner = 14,
}
