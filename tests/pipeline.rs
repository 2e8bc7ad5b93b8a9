//! End-to-end: compose a draft, encode it, decode the messages back.

use dao_actions::types::encode_address;
use dao_actions::{
    classify, handler, ActionContext, ActionKey, ActionRegistry, ChainConfig, ProposalDraft,
    RegistryBuilder, RegistryError, WireMessage,
};
use serde_json::json;

const CHAIN_TOML: &str = r#"
chain_id = "juno-1"
bech32_prefix = "juno"
native_denom = "ujuno"
native_symbol = "JUNO"
dao_address = "juno1dao"
governance_token = "juno1govtoken"
account_code_id = 4021
proposal_module = "juno1proposals"

[[tokens]]
denom = "juno1govtoken"
symbol = "GOV"
kind = "cw20"

[[tokens]]
denom = "juno1usdctoken"
symbol = "USDC"
decimals = 8
kind = "cw20"
"#;

fn setup() -> (ActionRegistry, ActionContext) {
    let config = ChainConfig::from_toml(CHAIN_TOML).unwrap();
    (ActionRegistry::standard().unwrap(), ActionContext::new(config))
}

fn addr(seed: u8) -> String {
    encode_address("juno", &[seed; 20])
}

#[test]
fn test_spend_scenario() {
    let (registry, ctx) = setup();
    let mut draft = ProposalDraft::new();
    draft.add(
        ActionKey::Spend,
        json!({"to": addr(1), "amount": "1.5", "denom": "ujuno"}),
    );
    assert!(draft.validate_all(&registry, &ctx).unwrap().is_empty());

    let msgs = draft.encode_all(&registry, &ctx).unwrap();
    assert_eq!(
        msgs[0].to_json().unwrap(),
        json!({"bank": {"send": {
            "to_address": addr(1),
            "amount": [{"denom": "ujuno", "amount": "1500000"}]
        }}})
    );

    let decoded = ProposalDraft::from_messages(&registry, &ctx, &msgs).unwrap();
    let instance = decoded.at(0).unwrap();
    assert_eq!(instance.action_key, ActionKey::Spend);
    assert_eq!(instance.data["amount"], "1.5");
}

#[test]
fn test_every_action_roundtrips() {
    let (registry, ctx) = setup();
    let mut draft = ProposalDraft::new();
    let entries = [
        (ActionKey::Spend, json!({"to": addr(1), "amount": "3", "denom": "juno1usdctoken"})),
        (ActionKey::Mint, json!({"to": addr(2), "amount": "10"})),
        (ActionKey::Stake, json!({"kind": "redelegate", "validator": "junovaloper1a", "to_validator": "junovaloper1b", "amount": "4"})),
        (ActionKey::AddTreasuryToken, json!({"address": addr(3)})),
        (ActionKey::RemoveTreasuryToken, json!({"address": addr(4)})),
        (ActionKey::UpdateInfo, json!({"name": "DAO", "description": "d", "image_url": null, "automatically_add_cw20s": true, "automatically_add_cw721s": true})),
        (ActionKey::CreateFundedAccount, json!({"owner": "juno1dao", "label": "acct", "admin": "juno1dao", "salt": "s1", "account_address": addr(5), "amount": "2", "denom": "ujuno"})),
        (ActionKey::Instantiate, json!({"admin": null, "code_id": 9, "label": "x", "message": "{}", "funds": [], "salt": null})),
        (ActionKey::Migrate, json!({"contract": addr(6), "code_id": 10, "message": "{\"v\":2}"})),
        (ActionKey::UpdateAdmin, json!({"contract": addr(7), "new_admin": addr(8)})),
        (ActionKey::ClearAdmin, json!({"contract": addr(7)})),
        (ActionKey::Execute, json!({"address": addr(9), "message": "{\"ping\":{}}", "funds": []})),
        (ActionKey::Custom, json!({"message": "{\n  \"custom\": {\n    \"noop\": {}\n  }\n}"})),
    ];
    for (key, data) in &entries {
        draft.add(*key, data.clone());
    }

    let msgs = draft.encode_all(&registry, &ctx).unwrap();
    assert_eq!(msgs.len(), entries.len() + 1);

    let decoded = ProposalDraft::from_messages(&registry, &ctx, &msgs).unwrap();
    let recovered: Vec<_> = decoded.iter().map(|i| (i.action_key, i.data.clone())).collect();
    assert_eq!(recovered, entries.to_vec());
}

#[test]
fn test_composite_decodes_to_one_instance() {
    let (registry, ctx) = setup();
    let mut draft = ProposalDraft::new();
    draft.add(
        ActionKey::CreateFundedAccount,
        json!({"owner": "juno1dao", "label": "acct", "admin": "juno1dao", "salt": "s1", "account_address": addr(5), "amount": "2", "denom": "ujuno"}),
    );
    let msgs = draft.encode_all(&registry, &ctx).unwrap();
    assert_eq!(msgs.len(), 2);

    let classified = classify(&registry, &ctx, &msgs).unwrap();
    assert_eq!(classified.len(), 1);
    assert_eq!(classified[0].key, ActionKey::CreateFundedAccount);
    assert_eq!(classified[0].span, 0..2);

    // Without the funding half the instantiate stands alone.
    let classified = classify(&registry, &ctx, &msgs[..1]).unwrap();
    assert_eq!(classified.len(), 1);
    assert_eq!(classified[0].key, ActionKey::Instantiate);
    assert_eq!(classified[0].data["salt"], "s1");
}

#[test]
fn test_unknown_messages_survive() {
    let (registry, ctx) = setup();
    let raw = vec![
        json!({"ibc": {"transfer": {"channel_id": "channel-0", "to_address": "osmo1x", "amount": {"denom": "ujuno", "amount": "1"}, "timeout": {"block": null}}}}),
        json!({"stargate": {"type_url": "/cosmos.gov.v1beta1.MsgVote", "value": "CAES"}}),
        json!({"bank": {"send": {"to_address": addr(1), "amount": [{"denom": "uatom", "amount": "5"}]}}}),
    ];
    let msgs: Vec<WireMessage> = raw
        .iter()
        .cloned()
        .map(|v| WireMessage::from_json(v).unwrap())
        .collect();

    let draft = ProposalDraft::from_messages(&registry, &ctx, &msgs).unwrap();
    assert!(draft.iter().all(|i| i.action_key == ActionKey::Custom));

    let reencoded: Vec<_> = draft
        .encode_all(&registry, &ctx)
        .unwrap()
        .iter()
        .map(|m| m.to_json().unwrap())
        .collect();
    assert_eq!(reencoded, raw);
}

#[test]
fn test_lossy_known_shapes_survive_unchanged() {
    let (registry, ctx) = setup();
    let raw = vec![
        json!({"bank": {"send": {"to_address": addr(1), "amount": [
            {"denom": "ujuno", "amount": "007"},
            {"denom": "uatom", "amount": "+5"}
        ]}}}),
        json!({"wasm": {"instantiate": {"code_id": 1, "msg": "e30=", "funds": [], "label": "x"}}}),
    ];
    let msgs: Vec<WireMessage> = raw
        .iter()
        .cloned()
        .map(|v| WireMessage::from_json(v).unwrap())
        .collect();

    let classified = classify(&registry, &ctx, &msgs).unwrap();
    assert!(classified.iter().all(|c| c.key == ActionKey::Custom));

    let draft = ProposalDraft::from_messages(&registry, &ctx, &msgs).unwrap();
    let reencoded: Vec<_> = draft
        .encode_all(&registry, &ctx)
        .unwrap()
        .iter()
        .map(|m| m.to_json().unwrap())
        .collect();
    assert_eq!(reencoded, raw);
}

#[test]
fn test_catch_all_is_required_and_takes_leftovers() {
    let (registry, ctx) = setup();
    let err = RegistryBuilder::new()
        .register([handler(dao_actions::actions::spend::Spend)])
        .build()
        .unwrap_err();
    assert_eq!(err, RegistryError::MissingCatchAll);

    let msgs = vec![WireMessage::from_json(json!({"bank": {"burn": {"amount": []}}})).unwrap()];
    assert_eq!(classify(&registry, &ctx, &msgs).unwrap()[0].key, ActionKey::Custom);
}

#[test]
fn test_removal_reindexes_field_paths() {
    let (registry, ctx) = setup();
    let mut draft = ProposalDraft::new();
    let first = draft.add_default(&registry, &ctx, ActionKey::Spend).unwrap();
    let second = draft.add_default(&registry, &ctx, ActionKey::Mint).unwrap();
    let third = draft.add_default(&registry, &ctx, ActionKey::Migrate).unwrap();

    draft.remove(second).unwrap();
    assert_eq!(draft.field_path(first).unwrap(), "0.");
    assert_eq!(draft.field_path(third).unwrap(), "1.");

    let errors = draft.validate_all(&registry, &ctx).unwrap();
    assert!(errors.iter().all(|e| e.path.starts_with("0.") || e.path.starts_with("1.")));
    let (id, field) = draft.resolve_field_path("1.contract").unwrap();
    assert_eq!((id, field), (third, "contract"));
}

#[test]
fn test_encode_aborts_on_first_error() {
    let (registry, ctx) = setup();
    let mut draft = ProposalDraft::new();
    draft.add(ActionKey::ClearAdmin, json!({"contract": addr(1)}));
    draft.add(ActionKey::Spend, json!({"to": addr(1), "amount": "1", "denom": "uunknown"}));
    draft.add(ActionKey::Spend, json!({"wrong": true}));

    let err = draft.encode_all(&registry, &ctx).unwrap_err();
    assert_eq!(err.position, 1);
    assert_eq!(err.key, ActionKey::Spend);
}
