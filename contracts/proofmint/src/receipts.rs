//! # Receipt Records and Gadget Lifecycle
//!
//! One non-fungible receipt per physical gadget. The provenance fields
//! (`id`, `merchant`, `buyer`, `content_hash`, `issued_at`) are immutable
//! once minted; only `gadget_status` / `last_status_update` ever change,
//! and only at the hand of the *current* token owner.
//!
//! Receipts are permanent: they are never destroyed, and ids are never
//! reused. Ownership of the underlying token is a separate, transferable
//! mapping — `buyer` records who originally received the gadget, while
//! `Owner(id)` records who may flag its status today.

use soroban_sdk::{contracttype, Address, Env, String, Vec};

use crate::errors::Error;

/// First receipt id ever allocated. The counter starts here and increments
/// by exactly one per successful mint; it never decrements.
pub const FIRST_RECEIPT_ID: u64 = 1;

/// Storage keys for receipt records and token ownership.
#[contracttype]
#[derive(Clone)]
pub enum ReceiptKey {
    /// Monotonic id counter: the next id to be assigned.
    NextReceiptId,
    /// Immutable-provenance receipt record keyed by id.
    Receipt(u64),
    /// Current token owner keyed by receipt id (transferable).
    Owner(u64),
    /// Index of receipt ids issued by a merchant.
    MerchantReceipts(Address),
}

/// Lifecycle state of the physical gadget a receipt represents.
///
/// Any transition among the four states is permitted, including away from
/// `Recycled`; a mistaken flag can always be corrected by the owner.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum GadgetStatus {
    Active = 0,
    Stolen = 1,
    Misplaced = 2,
    Recycled = 3,
}

/// Full receipt record.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Receipt {
    pub id: u64,
    /// Issuing merchant. Immutable; stays valid even if the merchant is
    /// later removed from the merchant set.
    pub merchant: Address,
    /// Original recipient. Immutable provenance; flag rights follow the
    /// transferable owner mapping instead.
    pub buyer: Address,
    /// Opaque content-addressed pointer to off-chain metadata (e.g. IPFS).
    pub content_hash: String,
    /// Ledger timestamp at minting.
    pub issued_at: u64,
    pub gadget_status: GadgetStatus,
    /// Ledger timestamp of the most recent status change.
    pub last_status_update: u64,
}

/// Compact status view returned by `get_receipt_status`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReceiptStatus {
    pub gadget_status: GadgetStatus,
    pub last_status_update: u64,
}

/// Ledger-wide totals for dashboards and monitoring.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TotalStats {
    pub total_receipts: u64,
    pub total_merchants: u32,
    pub total_recyclers: u32,
}

// ════════════════════════════════════════════════════════════════════
//  Id counter
// ════════════════════════════════════════════════════════════════════

/// The next id that would be assigned. Reads [`FIRST_RECEIPT_ID`] before
/// any receipt has been minted.
pub fn next_receipt_id(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&ReceiptKey::NextReceiptId)
        .unwrap_or(FIRST_RECEIPT_ID)
}

/// Seed the counter at construction so `get_next_receipt_id` reads 1 from
/// an explicit slot rather than a fallback.
pub fn init_id_counter(env: &Env) {
    env.storage()
        .instance()
        .set(&ReceiptKey::NextReceiptId, &FIRST_RECEIPT_ID);
}

/// Allocate the next receipt id and advance the counter.
///
/// Ids increment by exactly one per successful mint and are never reused.
/// The `u64` space outlasts any realistic deployment, so no ceiling check.
fn allocate_receipt_id(env: &Env) -> u64 {
    let id = next_receipt_id(env);
    env.storage()
        .instance()
        .set(&ReceiptKey::NextReceiptId, &(id + 1));
    id
}

// ════════════════════════════════════════════════════════════════════
//  Storage helpers
// ════════════════════════════════════════════════════════════════════

pub fn get_receipt(env: &Env, id: u64) -> Result<Receipt, Error> {
    env.storage()
        .persistent()
        .get(&ReceiptKey::Receipt(id))
        .ok_or(Error::ReceiptNotFound)
}

fn set_receipt(env: &Env, receipt: &Receipt) {
    env.storage()
        .persistent()
        .set(&ReceiptKey::Receipt(receipt.id), receipt);
}

/// Current owner of the receipt token — the address allowed to flag it.
pub fn owner_of(env: &Env, id: u64) -> Result<Address, Error> {
    env.storage()
        .persistent()
        .get(&ReceiptKey::Owner(id))
        .ok_or(Error::ReceiptNotFound)
}

pub fn set_owner(env: &Env, id: u64, owner: &Address) {
    env.storage()
        .persistent()
        .set(&ReceiptKey::Owner(id), owner);
}

/// All receipt ids a merchant has issued, oldest first.
pub fn merchant_receipts(env: &Env, merchant: &Address) -> Vec<u64> {
    env.storage()
        .persistent()
        .get(&ReceiptKey::MerchantReceipts(merchant.clone()))
        .unwrap_or_else(|| Vec::new(env))
}

fn push_merchant_receipt(env: &Env, merchant: &Address, id: u64) {
    let mut ids = merchant_receipts(env, merchant);
    ids.push_back(id);
    env.storage()
        .persistent()
        .set(&ReceiptKey::MerchantReceipts(merchant.clone()), &ids);
}

// ════════════════════════════════════════════════════════════════════
//  Mutations
// ════════════════════════════════════════════════════════════════════

/// Mint a receipt: allocate the id, store the record with status `Active`,
/// hand token ownership to `buyer`, and index it under the merchant.
///
/// Quota checks and payment are the caller's responsibility; everything
/// here either fully commits or is rolled back by the host with the rest
/// of the transaction.
pub fn mint(
    env: &Env,
    merchant: &Address,
    buyer: &Address,
    content_hash: &String,
    now: u64,
) -> Result<Receipt, Error> {
    if content_hash.is_empty() {
        return Err(Error::EmptyContentHash);
    }
    let id = allocate_receipt_id(env);
    let receipt = Receipt {
        id,
        merchant: merchant.clone(),
        buyer: buyer.clone(),
        content_hash: content_hash.clone(),
        issued_at: now,
        gadget_status: GadgetStatus::Active,
        last_status_update: now,
    };
    set_receipt(env, &receipt);
    set_owner(env, id, buyer);
    push_merchant_receipt(env, merchant, id);
    Ok(receipt)
}

/// Update the gadget status. `caller` must be the current token owner.
pub fn flag(
    env: &Env,
    caller: &Address,
    id: u64,
    status: GadgetStatus,
    now: u64,
) -> Result<Receipt, Error> {
    if *caller != owner_of(env, id)? {
        return Err(Error::OnlyBuyerCanFlag);
    }
    let mut receipt = get_receipt(env, id)?;
    receipt.gadget_status = status;
    receipt.last_status_update = now;
    set_receipt(env, &receipt);
    Ok(receipt)
}

/// Move token ownership — and with it the right to flag — from `from` to
/// `to`. The provenance `buyer` field is untouched.
pub fn transfer(env: &Env, from: &Address, to: &Address, id: u64) -> Result<(), Error> {
    if *from != owner_of(env, id)? {
        return Err(Error::NotTokenOwner);
    }
    set_owner(env, id, to);
    Ok(())
}
