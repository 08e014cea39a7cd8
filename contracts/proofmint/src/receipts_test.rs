//! Receipt lifecycle tests — sequential ids, quota consumption and
//! exhaustion, gadget flagging permissions, and token transfer.

use super::*;
use soroban_sdk::testutils::{Address as _, Ledger};
use soroban_sdk::{token, Address, Env, String};

use crate::subscriptions::{BASIC_MONTHLY_RECEIPTS, RECEIPTS_UNLIMITED, SECONDS_PER_MONTH};

const START: u64 = 1_700_000_000;

fn setup() -> (
    Env,
    ProofMintClient<'static>,
    Address,
    Address,
    token::StellarAssetClient<'static>,
) {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().with_mut(|li| li.timestamp = START);

    let admin = Address::generate(&env);
    let oracle = Address::generate(&env);
    let token_issuer = Address::generate(&env);
    let sac = env.register_stellar_asset_contract_v2(token_issuer);
    let token_admin = token::StellarAssetClient::new(&env, &sac.address());

    let contract_id = env.register(ProofMint, ());
    let client = ProofMintClient::new(&env, &contract_id);
    client.initialize(&admin, &sac.address(), &oracle);

    (env, client, admin, oracle, token_admin)
}

/// Helper: verified, funded merchant with an active subscription.
fn subscribed_merchant(
    env: &Env,
    client: &ProofMintClient<'static>,
    admin: &Address,
    oracle: &Address,
    token_admin: &token::StellarAssetClient<'static>,
    tier: SubscriptionTier,
) -> Address {
    let merchant = Address::generate(env);
    client.add_merchant(admin, &merchant);
    client.confirm_human_verification(oracle, &merchant);
    token_admin.mint(&merchant, &100_000_000_000);
    client.purchase_subscription(&merchant, &tier, &1);
    merchant
}

#[test]
fn ids_are_sequential_and_quota_is_consumed() {
    let (env, client, admin, oracle, token_admin) = setup();
    let merchant = subscribed_merchant(
        &env,
        &client,
        &admin,
        &oracle,
        &token_admin,
        SubscriptionTier::Basic,
    );
    let buyer = Address::generate(&env);
    let hash = String::from_str(&env, "QmSeq");

    assert_eq!(client.issue_receipt(&merchant, &buyer, &hash), 1);
    assert_eq!(client.issue_receipt(&merchant, &buyer, &hash), 2);
    assert_eq!(client.get_next_receipt_id(), 3);

    let view = client.get_subscription(&merchant);
    assert_eq!(view.receipts_issued, 2);
    assert_eq!(view.receipts_remaining, BASIC_MONTHLY_RECEIPTS - 2);
}

#[test]
fn empty_content_hash_is_rejected_without_consuming_id() {
    let (env, client, admin, oracle, token_admin) = setup();
    let merchant = subscribed_merchant(
        &env,
        &client,
        &admin,
        &oracle,
        &token_admin,
        SubscriptionTier::Basic,
    );
    let buyer = Address::generate(&env);

    let empty = String::from_str(&env, "");
    let result = client.try_issue_receipt(&merchant, &buyer, &empty);
    assert_eq!(result, Err(Ok(Error::EmptyContentHash)));

    assert_eq!(client.get_next_receipt_id(), 1);
    assert_eq!(client.get_subscription(&merchant).receipts_issued, 0);
}

#[test]
fn quota_exhaustion_blocks_issuance_and_preserves_counter() {
    let (env, client, admin, oracle, token_admin) = setup();
    let merchant = subscribed_merchant(
        &env,
        &client,
        &admin,
        &oracle,
        &token_admin,
        SubscriptionTier::Basic,
    );
    let buyer = Address::generate(&env);
    let hash = String::from_str(&env, "QmBulk");

    for _ in 0..BASIC_MONTHLY_RECEIPTS {
        client.issue_receipt(&merchant, &buyer, &hash);
    }
    let view = client.get_subscription(&merchant);
    assert_eq!(view.receipts_remaining, 0);

    let next_before = client.get_next_receipt_id();
    let result = client.try_issue_receipt(&merchant, &buyer, &hash);
    assert_eq!(result, Err(Ok(Error::QuotaExhausted)));
    assert_eq!(client.get_next_receipt_id(), next_before);
    assert!(!client.can_issue_receipts(&merchant));
}

#[test]
fn enterprise_quota_is_unlimited() {
    let (env, client, admin, oracle, token_admin) = setup();
    let merchant = subscribed_merchant(
        &env,
        &client,
        &admin,
        &oracle,
        &token_admin,
        SubscriptionTier::Enterprise,
    );
    let buyer = Address::generate(&env);
    let hash = String::from_str(&env, "QmUnltd");

    for _ in 0..5 {
        client.issue_receipt(&merchant, &buyer, &hash);
    }

    // The sentinel stays at zero and keeps meaning "unlimited".
    let view = client.get_subscription(&merchant);
    assert_eq!(view.receipts_remaining, RECEIPTS_UNLIMITED);
    assert_eq!(view.receipts_issued, 5);
    assert!(client.can_issue_receipts(&merchant));
}

#[test]
fn expired_subscription_cannot_issue() {
    let (env, client, admin, oracle, token_admin) = setup();
    let merchant = subscribed_merchant(
        &env,
        &client,
        &admin,
        &oracle,
        &token_admin,
        SubscriptionTier::Basic,
    );
    let buyer = Address::generate(&env);
    let hash = String::from_str(&env, "QmLate");

    env.ledger()
        .with_mut(|li| li.timestamp = START + 2 * SECONDS_PER_MONTH);

    let result = client.try_issue_receipt(&merchant, &buyer, &hash);
    assert_eq!(result, Err(Ok(Error::SubscriptionExpired)));
    assert_eq!(client.get_next_receipt_id(), 1);
}

#[test]
fn owner_flags_gadget_and_timestamp_updates() {
    let (env, client, admin, oracle, token_admin) = setup();
    let merchant = subscribed_merchant(
        &env,
        &client,
        &admin,
        &oracle,
        &token_admin,
        SubscriptionTier::Basic,
    );
    let buyer = Address::generate(&env);
    let hash = String::from_str(&env, "QmFlag");
    client.issue_receipt(&merchant, &buyer, &hash);

    let flagged_at = START + 1_000;
    env.ledger().with_mut(|li| li.timestamp = flagged_at);
    client.flag_gadget(&buyer, &1, &GadgetStatus::Stolen);

    let status = client.get_receipt_status(&1);
    assert_eq!(status.gadget_status, GadgetStatus::Stolen);
    assert_eq!(status.last_status_update, flagged_at);

    // Provenance fields are untouched by flagging.
    let receipt = client.get_receipt(&1);
    assert_eq!(receipt.buyer, buyer);
    assert_eq!(receipt.issued_at, START);
}

#[test]
fn non_owner_cannot_flag() {
    let (env, client, admin, oracle, token_admin) = setup();
    let merchant = subscribed_merchant(
        &env,
        &client,
        &admin,
        &oracle,
        &token_admin,
        SubscriptionTier::Basic,
    );
    let buyer = Address::generate(&env);
    let stranger = Address::generate(&env);
    let hash = String::from_str(&env, "QmOwn");
    client.issue_receipt(&merchant, &buyer, &hash);

    let result = client.try_flag_gadget(&stranger, &1, &GadgetStatus::Stolen);
    assert_eq!(result, Err(Ok(Error::OnlyBuyerCanFlag)));

    // Not even the issuing merchant may flag.
    let result = client.try_flag_gadget(&merchant, &1, &GadgetStatus::Stolen);
    assert_eq!(result, Err(Ok(Error::OnlyBuyerCanFlag)));

    let status = client.get_receipt_status(&1);
    assert_eq!(status.gadget_status, GadgetStatus::Active);
    assert_eq!(status.last_status_update, START);
}

#[test]
fn flagging_unknown_receipt_fails() {
    let (env, client, _admin, _oracle, _token_admin) = setup();
    let caller = Address::generate(&env);

    let result = client.try_flag_gadget(&caller, &42, &GadgetStatus::Misplaced);
    assert_eq!(result, Err(Ok(Error::ReceiptNotFound)));
    let result = client.try_get_receipt(&42);
    assert_eq!(result, Err(Ok(Error::ReceiptNotFound)));
}

#[test]
fn transfer_moves_flag_rights_but_not_provenance() {
    let (env, client, admin, oracle, token_admin) = setup();
    let merchant = subscribed_merchant(
        &env,
        &client,
        &admin,
        &oracle,
        &token_admin,
        SubscriptionTier::Basic,
    );
    let buyer = Address::generate(&env);
    let new_owner = Address::generate(&env);
    let hash = String::from_str(&env, "QmXfer");
    client.issue_receipt(&merchant, &buyer, &hash);

    client.transfer_receipt(&buyer, &new_owner, &1);
    assert_eq!(client.owner_of(&1), new_owner);

    // Original buyer lost the right to flag along with the token.
    let result = client.try_flag_gadget(&buyer, &1, &GadgetStatus::Misplaced);
    assert_eq!(result, Err(Ok(Error::OnlyBuyerCanFlag)));

    client.flag_gadget(&new_owner, &1, &GadgetStatus::Misplaced);
    assert_eq!(
        client.get_receipt_status(&1).gadget_status,
        GadgetStatus::Misplaced
    );

    // Provenance still names the original buyer.
    assert_eq!(client.get_receipt(&1).buyer, buyer);
}

#[test]
fn transfer_by_non_owner_is_rejected() {
    let (env, client, admin, oracle, token_admin) = setup();
    let merchant = subscribed_merchant(
        &env,
        &client,
        &admin,
        &oracle,
        &token_admin,
        SubscriptionTier::Basic,
    );
    let buyer = Address::generate(&env);
    let stranger = Address::generate(&env);
    let hash = String::from_str(&env, "QmSteal");
    client.issue_receipt(&merchant, &buyer, &hash);

    let result = client.try_transfer_receipt(&stranger, &stranger, &1);
    assert_eq!(result, Err(Ok(Error::NotTokenOwner)));
    assert_eq!(client.owner_of(&1), buyer);
}

#[test]
fn recycled_is_not_terminal() {
    let (env, client, admin, oracle, token_admin) = setup();
    let merchant = subscribed_merchant(
        &env,
        &client,
        &admin,
        &oracle,
        &token_admin,
        SubscriptionTier::Basic,
    );
    let buyer = Address::generate(&env);
    let hash = String::from_str(&env, "QmCycle");
    client.issue_receipt(&merchant, &buyer, &hash);

    client.flag_gadget(&buyer, &1, &GadgetStatus::Recycled);
    assert_eq!(
        client.get_receipt_status(&1).gadget_status,
        GadgetStatus::Recycled
    );

    // A mistaken flag can be corrected by the owner.
    client.flag_gadget(&buyer, &1, &GadgetStatus::Active);
    assert_eq!(
        client.get_receipt_status(&1).gadget_status,
        GadgetStatus::Active
    );
}
