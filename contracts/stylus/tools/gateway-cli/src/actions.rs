//! JSON form of relay actions.

use std::fs;

use alloy_primitives::{Address, Bytes, U256};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use timelock_gateway_types::Action;

/// One planned call, as read from or written to JSON.
///
/// `value` and `data` default to zero and empty, so a bare `{"target": "0x.."}` is a
/// zero-value call with no calldata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSpec {
    pub target: Address,
    #[serde(default)]
    pub value: U256,
    #[serde(default)]
    pub data: Bytes,
}

impl From<ActionSpec> for Action {
    fn from(spec: ActionSpec) -> Self {
        Action::new(spec.target, spec.value, spec.data)
    }
}

impl From<Action> for ActionSpec {
    fn from(action: Action) -> Self {
        Self {
            target: action.target,
            value: action.value,
            data: action.data,
        }
    }
}

/// Parse an action list given inline, or from a file when prefixed with `@`.
pub fn load_actions(arg: &str) -> Result<Vec<Action>> {
    let json = match arg.strip_prefix('@') {
        Some(path) => fs::read_to_string(path).with_context(|| format!("failed reading {path}"))?,
        None => arg.to_string(),
    };
    let specs: Vec<ActionSpec> = serde_json::from_str(&json).context("failed parsing actions JSON")?;
    Ok(specs.into_iter().map(Action::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_value_and_data() -> Result<()> {
        let actions = load_actions(
            r#"[
                {"target": "0x0101010101010101010101010101010101010101", "value": "0x5"},
                {"target": "0x4242424242424242424242424242424242424242", "data": "0xdeadbeef"}
            ]"#,
        )?;
        assert_eq!(
            actions,
            vec![
                Action::transfer(Address::repeat_byte(0x01), U256::from(5u64)),
                Action::new(Address::repeat_byte(0x42), U256::ZERO, vec![0xde, 0xad, 0xbe, 0xef]),
            ]
        );
        Ok(())
    }

    #[test]
    fn rejects_missing_target() {
        assert!(load_actions(r#"[{"value": "0x1"}]"#).is_err());
        assert!(load_actions("@/nonexistent/actions.json").is_err());
    }
}
