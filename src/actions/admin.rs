//! Contract admin management.

use serde::{Deserialize, Serialize};

use super::{check_address, Action, ActionContext, ActionKey, ActionResult, Decoded, FieldError};
use crate::codec::{WasmMsg, WireMessage};

/// Update-admin form data
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateAdminData {
    /// Contract whose admin changes
    pub contract: String,
    /// New admin
    pub new_admin: String,
}

/// Clear-admin form data
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearAdminData {
    /// Contract to make immutable
    pub contract: String,
}

/// Hand a contract's admin rights to another address
#[derive(Clone, Copy, Debug, Default)]
pub struct UpdateAdmin;

impl Action for UpdateAdmin {
    type Data = UpdateAdminData;

    fn key(&self) -> ActionKey {
        ActionKey::UpdateAdmin
    }

    fn label(&self) -> &'static str {
        "Update Contract Admin"
    }

    fn icon(&self) -> &'static str {
        "🍄"
    }

    fn default_data(&self, _ctx: &ActionContext) -> UpdateAdminData {
        UpdateAdminData::default()
    }

    fn validate(&self, ctx: &ActionContext, data: &UpdateAdminData) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_address(&mut errors, ctx, "contract", &data.contract);
        check_address(&mut errors, ctx, "new_admin", &data.new_admin);
        errors
    }

    fn encode(
        &self,
        _ctx: &ActionContext,
        data: &UpdateAdminData,
    ) -> ActionResult<Vec<WireMessage>> {
        Ok(vec![WireMessage::Wasm(WasmMsg::UpdateAdmin {
            contract_addr: data.contract.clone(),
            admin: data.new_admin.clone(),
        })])
    }

    fn decode(
        &self,
        _ctx: &ActionContext,
        msgs: &[WireMessage],
    ) -> ActionResult<Option<Decoded<UpdateAdminData>>> {
        match msgs.first() {
            Some(WireMessage::Wasm(WasmMsg::UpdateAdmin {
                contract_addr,
                admin,
            })) => Ok(Some(Decoded::single(UpdateAdminData {
                contract: contract_addr.clone(),
                new_admin: admin.clone(),
            }))),
            _ => Ok(None),
        }
    }
}

/// Remove a contract's admin, making it immutable
#[derive(Clone, Copy, Debug, Default)]
pub struct ClearAdmin;

impl Action for ClearAdmin {
    type Data = ClearAdminData;

    fn key(&self) -> ActionKey {
        ActionKey::ClearAdmin
    }

    fn label(&self) -> &'static str {
        "Clear Contract Admin"
    }

    fn icon(&self) -> &'static str {
        "🧹"
    }

    fn default_data(&self, _ctx: &ActionContext) -> ClearAdminData {
        ClearAdminData::default()
    }

    fn validate(&self, ctx: &ActionContext, data: &ClearAdminData) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_address(&mut errors, ctx, "contract", &data.contract);
        errors
    }

    fn encode(
        &self,
        _ctx: &ActionContext,
        data: &ClearAdminData,
    ) -> ActionResult<Vec<WireMessage>> {
        Ok(vec![WireMessage::Wasm(WasmMsg::ClearAdmin {
            contract_addr: data.contract.clone(),
        })])
    }

    fn decode(
        &self,
        _ctx: &ActionContext,
        msgs: &[WireMessage],
    ) -> ActionResult<Option<Decoded<ClearAdminData>>> {
        match msgs.first() {
            Some(WireMessage::Wasm(WasmMsg::ClearAdmin { contract_addr })) => {
                Ok(Some(Decoded::single(ClearAdminData {
                    contract: contract_addr.clone(),
                })))
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::testing::{address, ctx};

    #[test]
    fn test_update_admin_roundtrip() {
        let ctx = ctx();
        let data = UpdateAdminData {
            contract: address(1),
            new_admin: address(2),
        };
        let msgs = UpdateAdmin.encode(&ctx, &data).unwrap();
        assert_eq!(UpdateAdmin.decode(&ctx, &msgs).unwrap().unwrap().data, data);
        assert!(ClearAdmin.decode(&ctx, &msgs).unwrap().is_none());
        assert!(UpdateAdmin.validate(&ctx, &data).is_empty());
    }

    #[test]
    fn test_clear_admin_roundtrip() {
        let ctx = ctx();
        let data = ClearAdminData {
            contract: address(1),
        };
        let msgs = ClearAdmin.encode(&ctx, &data).unwrap();
        assert_eq!(
            msgs[0].to_json().unwrap(),
            serde_json::json!({"wasm": {"clear_admin": {"contract_addr": address(1)}}})
        );
        assert_eq!(ClearAdmin.decode(&ctx, &msgs).unwrap().unwrap().data, data);
        assert!(UpdateAdmin.decode(&ctx, &msgs).unwrap().is_none());
    }

    #[test]
    fn test_validation_flags_both_addresses() {
        let errors = UpdateAdmin.validate(&ctx(), &UpdateAdminData::default());
        assert_eq!(errors.len(), 2);
    }
}
