//! Stake: manage native staking from the treasury.

use serde::{Deserialize, Serialize};

use super::{
    check_positive, check_required, Action, ActionContext, ActionKey, ActionResult, Decoded,
    FieldError,
};
use crate::codec::{DistributionMsg, StakingMsg, WireMessage};
use crate::types::{Amount, Coin};

/// Staking operation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StakeKind {
    /// Bond tokens
    #[default]
    Delegate,
    /// Unbond tokens
    Undelegate,
    /// Move bonded tokens
    Redelegate,
    /// Claim pending rewards
    ClaimRewards,
}

/// Stake form data.
///
/// `to_validator` is only meaningful for redelegation and `amount` is not
/// used when claiming rewards; decoding leaves them empty in those cases.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeData {
    /// Operation
    pub kind: StakeKind,
    /// Validator operator address (source, when redelegating)
    pub validator: String,
    /// Destination validator when redelegating
    #[serde(default)]
    pub to_validator: String,
    /// Amount of the native token in whole units
    pub amount: Amount,
}

/// Native staking operations
#[derive(Clone, Copy, Debug, Default)]
pub struct Stake;

impl Action for Stake {
    type Data = StakeData;

    fn key(&self) -> ActionKey {
        ActionKey::Stake
    }

    fn label(&self) -> &'static str {
        "Manage Staking"
    }

    fn icon(&self) -> &'static str {
        "⚡"
    }

    fn default_data(&self, _ctx: &ActionContext) -> StakeData {
        StakeData {
            kind: StakeKind::Delegate,
            validator: String::new(),
            to_validator: String::new(),
            amount: Amount::from_whole(1),
        }
    }

    fn validate(&self, ctx: &ActionContext, data: &StakeData) -> Vec<FieldError> {
        // Validator operator addresses use the `valoper` prefix, so only
        // presence is checked here.
        let mut errors = Vec::new();
        check_required(&mut errors, "validator", &data.validator);
        if data.kind == StakeKind::Redelegate {
            check_required(&mut errors, "to_validator", &data.to_validator);
            if data.to_validator == data.validator {
                errors.push(FieldError::new(
                    "to_validator",
                    "cannot redelegate to the same validator",
                ));
            }
        }
        if data.kind != StakeKind::ClaimRewards {
            check_positive(
                &mut errors,
                "amount",
                &data.amount,
                Some(ctx.native_token().decimals),
            );
        }
        errors
    }

    fn encode(&self, ctx: &ActionContext, data: &StakeData) -> ActionResult<Vec<WireMessage>> {
        let native = ctx.native_token();
        let coin = || -> ActionResult<Coin> {
            Ok(Coin::new(data.amount.to_micro(native.decimals)?, &native.denom))
        };

        let msg = match data.kind {
            StakeKind::Delegate => WireMessage::Staking(StakingMsg::Delegate {
                validator: data.validator.clone(),
                amount: coin()?,
            }),
            StakeKind::Undelegate => WireMessage::Staking(StakingMsg::Undelegate {
                validator: data.validator.clone(),
                amount: coin()?,
            }),
            StakeKind::Redelegate => WireMessage::Staking(StakingMsg::Redelegate {
                src_validator: data.validator.clone(),
                dst_validator: data.to_validator.clone(),
                amount: coin()?,
            }),
            StakeKind::ClaimRewards => {
                WireMessage::Distribution(DistributionMsg::WithdrawDelegatorReward {
                    validator: data.validator.clone(),
                })
            }
        };
        Ok(vec![msg])
    }

    fn decode(
        &self,
        ctx: &ActionContext,
        msgs: &[WireMessage],
    ) -> ActionResult<Option<Decoded<StakeData>>> {
        let native = ctx.native_token();
        let human = |coin: &Coin| -> ActionResult<Option<Amount>> {
            if coin.denom != native.denom {
                return Ok(None);
            }
            Ok(Some(Amount::from_micro(coin.amount, native.decimals)?))
        };

        let (kind, validator, to_validator, amount) = match msgs.first() {
            Some(WireMessage::Staking(StakingMsg::Delegate { validator, amount })) => {
                (StakeKind::Delegate, validator, None, human(amount)?)
            }
            Some(WireMessage::Staking(StakingMsg::Undelegate { validator, amount })) => {
                (StakeKind::Undelegate, validator, None, human(amount)?)
            }
            Some(WireMessage::Staking(StakingMsg::Redelegate {
                src_validator,
                dst_validator,
                amount,
            })) => (
                StakeKind::Redelegate,
                src_validator,
                Some(dst_validator),
                human(amount)?,
            ),
            Some(WireMessage::Distribution(DistributionMsg::WithdrawDelegatorReward {
                validator,
            })) => (StakeKind::ClaimRewards, validator, None, Some(Amount::zero())),
            _ => return Ok(None),
        };

        // Staking in a non-native denom is left to the catch-all.
        let Some(amount) = amount else {
            return Ok(None);
        };

        Ok(Some(Decoded::single(StakeData {
            kind,
            validator: validator.clone(),
            to_validator: to_validator.cloned().unwrap_or_default(),
            amount,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::testing::ctx;

    fn data(kind: StakeKind) -> StakeData {
        StakeData {
            kind,
            validator: "junovaloper1alpha".to_string(),
            to_validator: if kind == StakeKind::Redelegate {
                "junovaloper1beta".to_string()
            } else {
                String::new()
            },
            amount: if kind == StakeKind::ClaimRewards {
                Amount::zero()
            } else {
                Amount::parse("12.75").unwrap()
            },
        }
    }

    #[test]
    fn test_roundtrip_every_kind() {
        let ctx = ctx();
        for kind in [
            StakeKind::Delegate,
            StakeKind::Undelegate,
            StakeKind::Redelegate,
            StakeKind::ClaimRewards,
        ] {
            let msgs = Stake.encode(&ctx, &data(kind)).unwrap();
            let decoded = Stake.decode(&ctx, &msgs).unwrap().unwrap();
            assert_eq!(decoded.data, data(kind), "{kind:?}");
        }
    }

    #[test]
    fn test_delegate_uses_native_micro_units() {
        let ctx = ctx();
        let msgs = Stake.encode(&ctx, &data(StakeKind::Delegate)).unwrap();
        assert_eq!(
            msgs[0],
            WireMessage::Staking(StakingMsg::Delegate {
                validator: "junovaloper1alpha".to_string(),
                amount: Coin::new(12_750_000u128, "ujuno"),
            })
        );
    }

    #[test]
    fn test_claim_drops_amount() {
        let ctx = ctx();
        let mut claim = data(StakeKind::ClaimRewards);
        claim.amount = Amount::from_whole(5);
        let msgs = Stake.encode(&ctx, &claim).unwrap();
        let decoded = Stake.decode(&ctx, &msgs).unwrap().unwrap();
        assert!(decoded.data.amount.is_zero());
    }

    #[test]
    fn test_declines_foreign_denom() {
        let ctx = ctx();
        let msg = WireMessage::Staking(StakingMsg::Delegate {
            validator: "junovaloper1alpha".to_string(),
            amount: Coin::new(1u128, "uatom"),
        });
        assert!(Stake.decode(&ctx, &[msg]).unwrap().is_none());
    }

    #[test]
    fn test_validation() {
        let ctx = ctx();
        let mut bad = data(StakeKind::Redelegate);
        bad.to_validator = bad.validator.clone();
        bad.amount = Amount::zero();
        let errors = Stake.validate(&ctx, &bad);
        assert_eq!(errors.len(), 2);

        assert!(Stake.validate(&ctx, &data(StakeKind::ClaimRewards)).is_empty());
    }

    #[test]
    fn test_rejects_amount_below_native_precision() {
        let ctx = ctx();
        let mut dust = data(StakeKind::Delegate);
        dust.amount = Amount::parse("0.0000001").unwrap();
        let errors = Stake.validate(&ctx, &dust);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "amount");
    }
}
