//! Verification state machine implementation

use std::net::IpAddr;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use vt_shared::utils::phone::{is_valid_local_phone, mask_phone};

use crate::domain::entities::client::{Client, Operator};
use crate::domain::entities::verification_token::{Channel, VerificationToken};
use crate::errors::{DomainError, DomainResult, ValidationError, VerificationError};
use crate::repositories::{AttemptRepository, ClientRepository, TokenRepository};
use crate::services::cooldown::CooldownPolicy;
use crate::services::token;

use super::config::VerificationConfig;
use super::traits::MessageSender;
use super::types::{CooldownStatus, RequestTokenResult, VerifiedToken};

/// Verification state machine over a client's tokens and attempt ledger
pub struct VerificationService<C, T, A, M>
where
    C: ClientRepository,
    T: TokenRepository,
    A: AttemptRepository,
    M: MessageSender,
{
    clients: Arc<C>,
    tokens: Arc<T>,
    attempts: Arc<A>,
    sender: Arc<M>,
    config: VerificationConfig,
}

impl<C, T, A, M> VerificationService<C, T, A, M>
where
    C: ClientRepository,
    T: TokenRepository,
    A: AttemptRepository,
    M: MessageSender,
{
    pub fn new(
        clients: Arc<C>,
        tokens: Arc<T>,
        attempts: Arc<A>,
        sender: Arc<M>,
        config: VerificationConfig,
    ) -> Self {
        Self {
            clients,
            tokens,
            attempts,
            sender,
            config,
        }
    }

    pub fn config(&self) -> &VerificationConfig {
        &self.config
    }

    /// Load a client that is still allowed to mutate state.
    /// Completed clients are terminal and reject every operation.
    async fn load_active_client(&self, client_id: Uuid) -> DomainResult<Client> {
        let client =
            self.clients
                .find_by_id(client_id)
                .await?
                .ok_or_else(|| DomainError::NotFound {
                    resource: "Client".to_string(),
                })?;
        if client.completed {
            return Err(VerificationError::AlreadyRegistered.into());
        }
        Ok(client)
    }

    /// Load the token the client's pointer currently designates, if any
    async fn current_token(&self, client: &Client) -> DomainResult<Option<VerificationToken>> {
        match client.current_token_id {
            Some(token_id) => self.tokens.find_by_id(token_id).await,
            None => Ok(None),
        }
    }

    /// Request a new one-time code for the client over the given channel.
    ///
    /// Validates the destination, consults the cooldown gate (read-only),
    /// supersedes any still-pending token, mints and persists the new token
    /// pinned to the requester IP, and attempts delivery. A delivery failure
    /// leaves the token in the terminal `NotSent` status, never `Pending`.
    pub async fn request_token(
        &self,
        client_id: Uuid,
        phone: &str,
        operator: &str,
        channel: &str,
        requester_ip: IpAddr,
    ) -> DomainResult<RequestTokenResult> {
        let mut client = self.load_active_client(client_id).await?;

        let phone = phone.trim().to_string();
        if !is_valid_local_phone(&phone) {
            return Err(ValidationError::InvalidPhone.into());
        }
        let operator = Operator::parse(&operator.trim().to_uppercase())
            .ok_or(ValidationError::InvalidOperator)?;
        let channel = Channel::parse(&channel.trim().to_uppercase())
            .ok_or(ValidationError::InvalidChannel)?;

        let ledger = self.attempts.get_or_create(client_id, channel).await?;
        let remaining =
            CooldownPolicy::remaining_wait_seconds(ledger.last_attempt_at, ledger.count, Utc::now());
        if remaining > 0 {
            tracing::warn!(
                client_id = %client_id,
                channel = channel.as_code(),
                remaining_seconds = remaining,
                event = "cooldown_blocked_request",
                "Token request rejected by cooldown gate"
            );
            return Err(VerificationError::CooldownActive {
                remaining_seconds: remaining,
            }
            .into());
        }

        // At most one pending token per client: a re-request supersedes the
        // old one without charging the ledger.
        if let Some(mut previous) = self.current_token(&client).await? {
            if previous.is_pending() {
                previous.mark_expired()?;
                self.tokens.update(previous).await?;
            }
        }

        let code = token::generate(self.config.code_length);
        let code_hash = token::hash(&code)?;
        let minted = VerificationToken::new(
            client_id,
            code.clone(),
            code_hash,
            channel,
            requester_ip,
            self.config.token_ttl_seconds,
        );
        let minted = self.tokens.create(minted).await?;

        client.set_contact(phone.clone(), operator);
        client.set_current_token(minted.id);
        self.clients.update(client).await?;

        let message = format!(
            "Veritel: your verification code is {}. It expires in {} seconds.",
            code, self.config.token_ttl_seconds
        );

        if self.config.dry_run {
            tracing::info!(
                client_id = %client_id,
                phone = %mask_phone(&phone),
                channel = channel.as_code(),
                token_id = %minted.id,
                event = "delivery_simulated",
                "Dry-run: delivery skipped, code {}",
                code
            );
        } else {
            match self.sender.send(channel, &phone, &message).await {
                Ok(provider_id) => {
                    tracing::info!(
                        client_id = %client_id,
                        phone = %mask_phone(&phone),
                        channel = channel.as_code(),
                        provider_id = %provider_id,
                        event = "token_delivered",
                        "Verification code delivered"
                    );
                }
                Err(reason) => {
                    let mut failed = minted;
                    failed.mark_not_sent()?;
                    self.tokens.update(failed).await?;
                    tracing::warn!(
                        client_id = %client_id,
                        phone = %mask_phone(&phone),
                        channel = channel.as_code(),
                        error = %reason,
                        event = "delivery_failed",
                        "Message delivery failed, token marked as not sent"
                    );
                    return Err(VerificationError::SendFailed { reason }.into());
                }
            }
        }

        Ok(RequestTokenResult {
            token_id: minted.id,
            expires_in_seconds: self.config.token_ttl_seconds,
        })
    }

    /// Verify a submitted code against the client's pending token.
    ///
    /// The requester IP must match the IP pinned at request time; a mismatch
    /// is a security boundary, not a guess, and does not charge the ledger.
    /// A wrong code charges one attempt; crossing the block threshold
    /// cancels the token. A correct code past the deadline expires the
    /// token instead of validating it.
    pub async fn verify_token(
        &self,
        client_id: Uuid,
        submitted_code: &str,
        requester_ip: IpAddr,
    ) -> DomainResult<VerifiedToken> {
        let client = self.load_active_client(client_id).await?;

        let mut token = match self.current_token(&client).await? {
            Some(token) if token.is_pending() => token,
            _ => return Err(VerificationError::NoPendingToken.into()),
        };

        // The verify gate only engages once the pair is blocked; below the
        // threshold every submission is evaluated (and charged on mismatch).
        let ledger = self.attempts.get_or_create(client_id, token.channel).await?;
        if ledger.blocked {
            let remaining = CooldownPolicy::remaining_wait_seconds(
                ledger.last_attempt_at,
                ledger.count,
                Utc::now(),
            );
            if remaining > 0 {
                return Err(VerificationError::CooldownActive {
                    remaining_seconds: remaining,
                }
                .into());
            }
        }

        if requester_ip != token.requester_ip {
            tracing::warn!(
                client_id = %client_id,
                token_id = %token.id,
                pinned_ip = %token.requester_ip,
                caller_ip = %requester_ip,
                event = "ip_mismatch",
                "Verification attempted from a different IP than the token request"
            );
            return Err(VerificationError::IpMismatch.into());
        }

        let submitted = submitted_code.trim().to_uppercase();
        if !token::verify(&submitted, &token.code_hash)? {
            // One unit of work: the charge and the cancellation it may
            // entail commit together or not at all.
            let (ledger, _) = self
                .attempts
                .record_failure(self.config.block_threshold, token)
                .await?;

            if ledger.count >= self.config.block_threshold {
                tracing::warn!(
                    client_id = %client_id,
                    attempts = ledger.count,
                    event = "max_attempts",
                    "Attempt threshold crossed, token invalidated"
                );
                return Err(VerificationError::MaxAttempts.into());
            }

            tracing::warn!(
                client_id = %client_id,
                attempts = ledger.count,
                event = "invalid_code",
                "Incorrect verification code"
            );
            return Err(VerificationError::InvalidToken {
                remaining_attempts: ledger.remaining_attempts(self.config.block_threshold),
            }
            .into());
        }

        if token.is_expired() {
            token.mark_expired()?;
            self.tokens.update(token).await?;
            tracing::warn!(
                client_id = %client_id,
                event = "token_expired",
                "Correct code submitted after the deadline"
            );
            return Err(VerificationError::TokenExpired.into());
        }

        token.mark_validated()?;
        let elapsed_seconds = token.elapsed_seconds.unwrap_or(0);
        let token = self.tokens.update(token).await?;
        self.attempts.record_success(client_id, token.channel).await?;

        tracing::info!(
            client_id = %client_id,
            token_id = %token.id,
            elapsed_seconds,
            event = "token_validated",
            "Verification code accepted"
        );

        Ok(VerifiedToken {
            token_id: token.id,
            elapsed_seconds,
        })
    }

    /// Voluntarily cancel the client's pending token.
    ///
    /// Cancellation is not free: it charges one ledger attempt, so the
    /// cooldown cannot be dodged by cancel-and-resend loops.
    pub async fn cancel_token(&self, client_id: Uuid) -> DomainResult<()> {
        let client = self.load_active_client(client_id).await?;

        let token = match self.current_token(&client).await? {
            Some(token) if token.is_pending() => token,
            _ => return Err(VerificationError::NoPendingToken.into()),
        };

        // Cancellation and its charge are a single unit of work
        let (ledger, token) = self
            .attempts
            .record_cancellation(self.config.block_threshold, token)
            .await?;

        tracing::info!(
            client_id = %client_id,
            token_id = %token.id,
            attempts = ledger.count,
            event = "token_cancelled",
            "Token cancelled by the client, attempt charged"
        );
        Ok(())
    }

    /// Expire the client's pending token after the deadline passed without
    /// a response. A timeout is no-fault: the ledger is not charged.
    /// Idempotent: returns `false` when nothing was pending.
    pub async fn expire_token(&self, client_id: Uuid) -> DomainResult<bool> {
        let client = self.load_active_client(client_id).await?;

        let mut token = match self.current_token(&client).await? {
            Some(token) if token.is_pending() => token,
            _ => return Ok(false),
        };

        token.mark_expired()?;
        let token = self.tokens.update(token).await?;

        tracing::info!(
            client_id = %client_id,
            token_id = %token.id,
            event = "token_expired_unanswered",
            "Pending token expired without a response"
        );
        Ok(true)
    }

    /// Read-only cooldown report for a (client, channel) pair
    pub async fn cooldown_status(
        &self,
        client_id: Uuid,
        channel: &str,
    ) -> DomainResult<CooldownStatus> {
        self.load_active_client(client_id).await?;
        let channel = Channel::parse(&channel.trim().to_uppercase())
            .ok_or(ValidationError::InvalidChannel)?;

        let ledger = self.attempts.get_or_create(client_id, channel).await?;
        let next_attempt_number = ledger.count + 1;
        let wait_seconds = CooldownPolicy::required_wait_seconds(next_attempt_number);
        let remaining_seconds =
            CooldownPolicy::remaining_wait_seconds(ledger.last_attempt_at, ledger.count, Utc::now());

        Ok(CooldownStatus {
            channel,
            attempts: ledger.count,
            next_attempt_number,
            wait_seconds,
            remaining_seconds,
            blocked: ledger.blocked,
            can_request: remaining_seconds == 0,
        })
    }
}
