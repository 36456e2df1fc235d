//! Request and response bodies exchanged with Vault.

use serde::{Deserialize, Serialize};

/// Metadata placeholder when the host supplies no job ID.
pub const NO_JOB_ID: &str = "<no jid set>";
/// Metadata placeholder when the host supplies no acting user.
pub const NO_ACTING_USER: &str = "<no user set>";

/// Body of `POST /v1/auth/approle/login`.
#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub role_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_id: Option<&'a str>,
}

/// Body of `POST /v1/auth/token/create[/{role}]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCreateRequest {
    pub policies: Vec<String>,
    pub num_uses: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explicit_max_ttl: Option<String>,
    pub meta: TokenMeta,
}

/// Audit metadata attached to an issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMeta {
    pub requester_id: String,
    pub job_id: String,
    pub acting_user: String,
}

/// The `auth` envelope common to login and token creation responses.
#[derive(Deserialize)]
pub struct AuthResponse<A> {
    pub auth: A,
}

#[derive(Deserialize)]
pub struct LoginAuth {
    pub client_token: String,
}

#[derive(Deserialize)]
pub struct TokenAuth {
    pub client_token: String,
    #[serde(default)]
    pub renewable: bool,
    #[serde(default)]
    pub lease_duration: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ttl_omitted_when_unset() {
        let request = TokenCreateRequest {
            policies: vec!["a".into()],
            num_uses: 6,
            explicit_max_ttl: None,
            meta: TokenMeta {
                requester_id: "web01".into(),
                job_id: NO_JOB_ID.into(),
                acting_user: NO_ACTING_USER.into(),
            },
        };
        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(
            value,
            json!({
                "policies": ["a"],
                "num_uses": 6,
                "meta": {
                    "requester_id": "web01",
                    "job_id": "<no jid set>",
                    "acting_user": "<no user set>",
                },
            })
        );
    }

    #[test]
    fn test_secret_id_optional() {
        let body = serde_json::to_value(LoginRequest {
            role_id: "role",
            secret_id: None,
        })
        .expect("serialize");
        assert_eq!(body, json!({ "role_id": "role" }));
    }

    #[test]
    fn test_token_auth_without_lease_fields() {
        let parsed: AuthResponse<TokenAuth> =
            serde_json::from_value(json!({ "auth": { "client_token": "t" } })).expect("parse");
        assert_eq!(parsed.auth.client_token, "t");
        assert!(!parsed.auth.renewable);
        assert_eq!(parsed.auth.lease_duration, 0);
    }
}
