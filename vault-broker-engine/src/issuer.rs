//! The credential issuer: orchestrates signature validation, policy
//! resolution, broker authentication, and token creation.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::VaultConfig;
use crate::error::{ConfigError, IssueError, NO_POLICIES_MATCHED};
use crate::transport::{
    HttpRequest, ReqwestTransport, Transport, NAMESPACE_HEADER, TOKEN_HEADER,
};
use crate::types::{
    Credential, Identity, IssueOptions, PolicyBackend, PolicySet, RequestContext,
    SignatureValidator,
};
use crate::wire::{
    AuthResponse, TokenAuth, TokenCreateRequest, TokenMeta, NO_ACTING_USER, NO_JOB_ID,
};

/// Issues scoped, limited-use Vault tokens for requesters.
///
/// The issuer is generic over a `PolicyBackend`, so the policy model can be
/// swapped without touching the issuance flow. It holds only read-only state
/// and can be shared across threads.
pub struct CredentialIssuer<P: PolicyBackend> {
    config: VaultConfig,
    policy: P,
    validator: Arc<dyn SignatureValidator>,
    transport: Arc<dyn Transport>,
}

impl<P: PolicyBackend> CredentialIssuer<P> {
    /// Create an issuer that talks to Vault over HTTP.
    ///
    /// Fails if the configuration is incomplete or the HTTP client cannot be
    /// built.
    pub fn new(
        config: VaultConfig,
        policy: P,
        validator: Arc<dyn SignatureValidator>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let transport = Arc::new(ReqwestTransport::new(&config)?);
        Ok(Self {
            config,
            policy,
            validator,
            transport,
        })
    }

    /// Create an issuer with a caller-provided transport.
    pub fn with_transport(
        config: VaultConfig,
        policy: P,
        validator: Arc<dyn SignatureValidator>,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            policy,
            validator,
            transport,
        })
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    /// Get a reference to the policy backend.
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Issue a token for `identity`.
    ///
    /// 1. Validates the caller's signature
    /// 2. Resolves the identity's policies (an empty set aborts)
    /// 3. Obtains the broker's own token from the configured auth method
    /// 4. Sends the token creation request
    ///
    /// No network call is made if step 1 or 2 fails.
    #[tracing::instrument(skip_all, fields(identity = %identity))]
    pub fn issue(
        &self,
        identity: &Identity,
        signature: &str,
        options: &IssueOptions,
        context: &RequestContext,
    ) -> Result<Credential, IssueError> {
        if !self
            .validator
            .validate(identity, signature, options.impersonated_by_host)
        {
            warn!("rejecting token request with invalid signature");
            return Err(IssueError::Authentication {
                identity: identity.clone(),
            });
        }

        if options.uses == Some(0) {
            warn!("ignoring requested use count of zero");
        }

        let policies = self.policy.policies(identity);
        if policies.is_empty() {
            debug!("no policies matched");
            return Err(IssueError::Policy(NO_POLICIES_MATCHED.to_string()));
        }

        let caller_token = self
            .config
            .auth
            .caller_token(&self.config, self.transport.as_ref())?;

        let payload = self.build_request(identity, &policies, options, context);
        let body = serde_json::to_value(&payload)
            .map_err(|e| IssueError::Transport(e.to_string()))?;
        let mut request = HttpRequest::new(self.config.token_create_url(), body)
            .with_header(TOKEN_HEADER, caller_token);
        if let Some(namespace) = &self.config.namespace {
            request = request.with_header(NAMESPACE_HEADER, namespace.as_str());
        }

        debug!(
            url = %request.url,
            policies = payload.policies.len(),
            num_uses = payload.num_uses,
            "sending token creation request"
        );
        let response = self.transport.post(&request)?;
        if !response.is_success() {
            let reason = response.reason_or_status();
            warn!(status = response.status, %reason, "token creation rejected");
            return Err(IssueError::RemoteService(reason));
        }

        let created: AuthResponse<TokenAuth> = response.json()?;
        Ok(Credential {
            token: created.auth.client_token,
            renewable: created.auth.renewable,
            lease_duration: created.auth.lease_duration,
            uses: payload.num_uses,
            issued: chrono::Utc::now().timestamp(),
            url: self.config.url.clone(),
            namespace: self.config.namespace.clone(),
            verify: self.config.verify,
        })
    }

    /// Build the token creation body for an already-resolved policy set.
    ///
    /// An explicit TTL always limits the token to a single use. A requested
    /// use count of zero is ignored in favour of the configured default.
    pub fn build_request(
        &self,
        identity: &Identity,
        policies: &PolicySet,
        options: &IssueOptions,
        context: &RequestContext,
    ) -> TokenCreateRequest {
        let (uses, ttl) = if self.config.allow_override {
            (
                options
                    .uses
                    .filter(|&uses| uses > 0)
                    .unwrap_or(self.config.uses),
                options.ttl.clone().or_else(|| self.config.ttl.clone()),
            )
        } else {
            (self.config.uses, self.config.ttl.clone())
        };
        let num_uses = if ttl.is_some() { 1 } else { uses };

        TokenCreateRequest {
            policies: policies.to_vec(),
            num_uses,
            explicit_max_ttl: ttl,
            meta: TokenMeta {
                requester_id: identity.as_str().to_string(),
                job_id: context
                    .job_id
                    .clone()
                    .unwrap_or_else(|| NO_JOB_ID.to_string()),
                acting_user: context
                    .acting_user
                    .clone()
                    .unwrap_or_else(|| NO_ACTING_USER.to_string()),
            },
        }
    }
}
