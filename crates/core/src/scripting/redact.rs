//! Masking for incognito runs.

use super::executor::ExecuteRequest;

/// Replacement for every sensitive value in an incognito history record.
pub const MASK: &str = "*****";

/// Copy of `request` with every argument and every env value masked.
///
/// Env keys are kept so the record still shows which variables were set.
pub fn redact_request(request: &ExecuteRequest) -> ExecuteRequest {
    let mut masked = request.clone();
    masked.args = masked.args.iter().map(|_| MASK.to_string()).collect();
    for value in masked.env.values_mut() {
        *value = MASK.to_string();
    }
    masked
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn masks_args_and_env_values_but_keeps_shape() {
        let request = ExecuteRequest {
            args: vec!["--token".to_string(), "abc".to_string()],
            env: BTreeMap::from([("API_KEY".to_string(), "s3cret".to_string())]),
            command: "bash".to_string(),
            backoff: 10,
            repeat: 2,
            retry: 1,
        };
        let masked = redact_request(&request);

        assert_eq!(masked.args, vec![MASK, MASK]);
        assert_eq!(masked.env.get("API_KEY").map(String::as_str), Some(MASK));
        assert_eq!(masked.command, "bash");
        assert_eq!(masked.repeat, 2);
        assert_eq!(request.args[1], "abc");
    }
}
