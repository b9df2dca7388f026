//! Three-tier delivery of an extraction request into a tab.
//!
//! # Tiers
//!
//! | Tier | Action | Bound | On failure |
//! |------|--------|-------|------------|
//! | 1 | Message the running agent | 3000 ms | next tier |
//! | 2 | Inject agent, settle 500 ms, message again | 5000 ms | next tier |
//! | 3 | One-shot direct execution | host | `AllTiersExhausted` |
//!
//! Before any tier the tab address is checked against the restricted
//! schemes. Tiers run strictly one after another and none is retried.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::time::Duration;

use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::protocol::{AgentMessage, parse_reply};
use crate::request::{ExtractionRequest, ExtractionResult};
use crate::status::{StatusLevel, StatusSink};

use super::config::DeliveryConfig;
use super::host::{TabHost, is_restricted};

// ============================================================================
// Tier
// ============================================================================

/// A delivery tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Message an agent presumed already running.
    ExistingAgent,
    /// Inject the agent, then message it.
    InjectAndRetry,
    /// Run the extractor once without an agent.
    DirectExecution,
}

impl Tier {
    /// All tiers in attempt order.
    pub const ORDER: [Self; 3] = [Self::ExistingAgent, Self::InjectAndRetry, Self::DirectExecution];

    /// Status line shown when the tier starts.
    #[must_use]
    pub const fn progress_message(self) -> &'static str {
        match self {
            Self::ExistingAgent => "Checking for content script...",
            Self::InjectAndRetry => "Injecting content script...",
            Self::DirectExecution => "Using direct execution method...",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ExistingAgent => "existing agent",
            Self::InjectAndRetry => "inject and retry",
            Self::DirectExecution => "direct execution",
        })
    }
}

// ============================================================================
// DeliveryOutcome
// ============================================================================

/// Terminal result of one delivery.
#[derive(Debug)]
pub enum DeliveryOutcome {
    /// A tier produced a result.
    Success(ExtractionResult),
    /// The request was rejected or every tier failed.
    Failure(Error),
}

impl DeliveryOutcome {
    /// Returns `true` on success.
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Converts into a `Result`.
    ///
    /// # Errors
    ///
    /// Returns the failure's error.
    pub fn into_result(self) -> Result<ExtractionResult> {
        match self {
            Self::Success(result) => Ok(result),
            Self::Failure(e) => Err(e),
        }
    }
}

impl From<Result<ExtractionResult>> for DeliveryOutcome {
    fn from(result: Result<ExtractionResult>) -> Self {
        match result {
            Ok(values) => Self::Success(values),
            Err(e) => Self::Failure(e),
        }
    }
}

// ============================================================================
// DeliveryStrategy
// ============================================================================

/// Runs an extraction request inside a tab, falling back across tiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeliveryStrategy {
    config: DeliveryConfig,
}

impl DeliveryStrategy {
    /// Creates a strategy with the given timings.
    #[inline]
    #[must_use]
    pub const fn new(config: DeliveryConfig) -> Self {
        Self { config }
    }

    /// Returns the timings in use.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &DeliveryConfig {
        &self.config
    }

    /// Delivers `request` to `host`.
    ///
    /// Tier-level errors are logged and never returned; the outcome is
    /// either the first tier's result, [`Error::RestrictedPage`], or
    /// [`Error::AllTiersExhausted`].
    pub async fn deliver<H>(
        &self,
        host: &H,
        request: &ExtractionRequest,
        status: &dyn StatusSink,
    ) -> DeliveryOutcome
    where
        H: TabHost + ?Sized,
    {
        self.run(host, request, status).await.into()
    }

    async fn run<H>(
        &self,
        host: &H,
        request: &ExtractionRequest,
        status: &dyn StatusSink,
    ) -> Result<ExtractionResult>
    where
        H: TabHost + ?Sized,
    {
        let tab_id = host.tab_id().map(|id| id.as_u32());
        check_page(host).await?;

        debug!(
            ?tab_id,
            selector = request.selector(),
            attribute = %request.attribute(),
            "Delivering extraction request"
        );

        let message = AgentMessage::scrape(request);

        for tier in Tier::ORDER {
            status.post(tier.progress_message(), StatusLevel::Progress);

            match self.attempt(tier, host, request, &message).await {
                Ok(result) => {
                    info!(?tab_id, %tier, count = result.len(), "Extraction delivered");
                    return Ok(result);
                }
                Err(e) if tier != Tier::DirectExecution => {
                    warn!(?tab_id, %tier, error = %e, "Tier failed, falling through");
                }
                Err(e) => {
                    error!(?tab_id, %tier, error = %e, "Direct execution failed");
                    return Err(Error::all_tiers_exhausted(e.to_string()));
                }
            }
        }

        Err(Error::all_tiers_exhausted("no tier attempted"))
    }

    /// Runs one tier.
    async fn attempt<H>(
        &self,
        tier: Tier,
        host: &H,
        request: &ExtractionRequest,
        message: &AgentMessage,
    ) -> Result<ExtractionResult>
    where
        H: TabHost + ?Sized,
    {
        match tier {
            Tier::ExistingAgent => {
                message_agent(host, message, tier, self.config.agent_timeout).await
            }
            Tier::InjectAndRetry => {
                host.inject_agent().await?;
                sleep(self.config.settle_delay).await;
                message_agent(host, message, tier, self.config.injected_timeout).await
            }
            Tier::DirectExecution => {
                let value = host.execute_direct(request).await?;
                parse_reply(Some(value))
            }
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Rejects tabs with no address or a restricted one.
async fn check_page<H>(host: &H) -> Result<()>
where
    H: TabHost + ?Sized,
{
    let url = match host.url().await {
        Ok(url) => url,
        Err(e) => {
            warn!(error = %e, "Could not read tab address");
            None
        }
    };

    match url {
        Some(url) if !is_restricted(&url) => Ok(()),
        Some(url) => Err(Error::restricted_page(url)),
        None => Err(Error::restricted_page("<unknown>")),
    }
}

/// Messages the agent and waits at most `bound` for a well-formed reply.
async fn message_agent<H>(
    host: &H,
    message: &AgentMessage,
    tier: Tier,
    bound: Duration,
) -> Result<ExtractionResult>
where
    H: TabHost + ?Sized,
{
    let reply = timeout(bound, host.send_message(message, bound))
        .await
        .map_err(|_| Error::tier_timeout(tier, bound.as_millis() as u64))??;

    parse_reply(reply)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::{Value, json};

    use crate::identifiers::TabId;
    use crate::status::StatusLog;

    /// How the scripted host answers a tier's call.
    #[derive(Clone)]
    enum Answer {
        Reply(Value),
        NoReply,
        Fail,
        Hang,
    }

    struct ScriptedHost {
        url: Option<String>,
        before_inject: Answer,
        after_inject: Answer,
        inject_ok: bool,
        direct: Answer,
        injected: AtomicUsize,
        messages: AtomicUsize,
        directs: AtomicUsize,
    }

    impl ScriptedHost {
        fn new(before_inject: Answer, after_inject: Answer, direct: Answer) -> Self {
            Self {
                url: Some("https://example.com/page".to_string()),
                before_inject,
                after_inject,
                inject_ok: true,
                direct,
                injected: AtomicUsize::new(0),
                messages: AtomicUsize::new(0),
                directs: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> (usize, usize, usize) {
            (
                self.messages.load(Ordering::SeqCst),
                self.injected.load(Ordering::SeqCst),
                self.directs.load(Ordering::SeqCst),
            )
        }
    }

    async fn answer(answer: &Answer) -> Result<Option<Value>> {
        match answer {
            Answer::Reply(v) => Ok(Some(v.clone())),
            Answer::NoReply => Ok(None),
            Answer::Fail => Err(Error::transport("Receiving end does not exist")),
            Answer::Hang => std::future::pending().await,
        }
    }

    #[async_trait]
    impl TabHost for ScriptedHost {
        fn tab_id(&self) -> Option<TabId> {
            TabId::new(1)
        }

        async fn url(&self) -> Result<Option<String>> {
            Ok(self.url.clone())
        }

        async fn send_message(
            &self,
            _message: &AgentMessage,
            _bound: Duration,
        ) -> Result<Option<Value>> {
            self.messages.fetch_add(1, Ordering::SeqCst);
            if self.injected.load(Ordering::SeqCst) == 0 {
                answer(&self.before_inject).await
            } else {
                answer(&self.after_inject).await
            }
        }

        async fn inject_agent(&self) -> Result<()> {
            if !self.inject_ok {
                return Err(Error::injection_failure("Cannot access contents of the page"));
            }
            self.injected.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn execute_direct(&self, _request: &ExtractionRequest) -> Result<Value> {
            self.directs.fetch_add(1, Ordering::SeqCst);
            match answer(&self.direct).await? {
                Some(v) => Ok(v),
                None => Ok(Value::Null),
            }
        }
    }

    fn fast() -> DeliveryStrategy {
        DeliveryStrategy::new(
            DeliveryConfig::new()
                .with_agent_timeout(Duration::from_millis(30))
                .with_settle_delay(Duration::from_millis(1))
                .with_injected_timeout(Duration::from_millis(30)),
        )
    }

    fn request() -> ExtractionRequest {
        ExtractionRequest::new("h1", "textContent").expect("valid request")
    }

    #[tokio::test]
    async fn test_tier1_success_short_circuits() {
        let host = ScriptedHost::new(Answer::Reply(json!(["A"])), Answer::Fail, Answer::Fail);
        let log = StatusLog::new();

        let result = fast().deliver(&host, &request(), &log).await.into_result();

        assert_eq!(result.expect("success").as_slice(), ["A"]);
        assert_eq!(host.calls(), (1, 0, 0));
        assert_eq!(log.entries().len(), 1);
    }

    #[tokio::test]
    async fn test_tier1_empty_reply_is_authoritative() {
        let host = ScriptedHost::new(Answer::Reply(json!([])), Answer::Fail, Answer::Fail);

        let result = fast().deliver(&host, &request(), &StatusLog::new()).await;

        assert!(result.into_result().expect("success").is_empty());
        assert_eq!(host.calls(), (1, 0, 0));
    }

    #[tokio::test]
    async fn test_tier1_malformed_reply_falls_through() {
        let host = ScriptedHost::new(
            Answer::Reply(json!({"oops": true})),
            Answer::Reply(json!(["B"])),
            Answer::Fail,
        );

        let result = fast().deliver(&host, &request(), &StatusLog::new()).await;

        assert_eq!(result.into_result().expect("success").as_slice(), ["B"]);
        assert_eq!(host.calls(), (2, 1, 0));
    }

    #[tokio::test]
    async fn test_tier1_timeout_falls_to_tier2() {
        let host = ScriptedHost::new(Answer::Hang, Answer::Reply(json!(["B"])), Answer::Fail);

        let result = fast().deliver(&host, &request(), &StatusLog::new()).await;

        assert_eq!(result.into_result().expect("success").as_slice(), ["B"]);
        assert_eq!(host.calls(), (2, 1, 0));
    }

    #[tokio::test]
    async fn test_tier1_and_tier2_fail_tier3_wins() {
        let mut host = ScriptedHost::new(Answer::Fail, Answer::Fail, Answer::Reply(json!(["C"])));
        host.inject_ok = false;
        let log = StatusLog::new();

        let result = fast().deliver(&host, &request(), &log).await;

        assert_eq!(result.into_result().expect("success").as_slice(), ["C"]);
        assert_eq!(host.calls(), (1, 0, 1));

        let messages: Vec<_> = log.entries().into_iter().map(|e| e.message).collect();
        assert_eq!(
            messages,
            [
                Tier::ExistingAgent.progress_message(),
                Tier::InjectAndRetry.progress_message(),
                Tier::DirectExecution.progress_message(),
            ]
        );
    }

    #[tokio::test]
    async fn test_tier2_timeout_falls_to_tier3() {
        let host = ScriptedHost::new(Answer::NoReply, Answer::Hang, Answer::Reply(json!(["C"])));

        let result = fast().deliver(&host, &request(), &StatusLog::new()).await;

        assert_eq!(result.into_result().expect("success").as_slice(), ["C"]);
        assert_eq!(host.calls(), (2, 1, 1));
    }

    #[tokio::test]
    async fn test_tier3_failure_exhausts() {
        let host = ScriptedHost::new(Answer::Fail, Answer::Fail, Answer::Fail);

        let outcome = fast().deliver(&host, &request(), &StatusLog::new()).await;

        assert!(!outcome.is_success());
        let err = outcome.into_result().unwrap_err();
        assert!(matches!(err, Error::AllTiersExhausted { .. }));
        assert_eq!(host.calls(), (2, 1, 1));
    }

    #[tokio::test]
    async fn test_tier3_non_array_exhausts() {
        let host = ScriptedHost::new(Answer::Fail, Answer::Fail, Answer::NoReply);

        let err = fast()
            .deliver(&host, &request(), &StatusLog::new())
            .await
            .into_result()
            .unwrap_err();

        assert!(matches!(err, Error::AllTiersExhausted { .. }));
    }

    #[tokio::test]
    async fn test_restricted_page_attempts_nothing() {
        let mut host =
            ScriptedHost::new(Answer::Reply(json!(["A"])), Answer::Fail, Answer::Fail);
        host.url = Some("chrome://extensions".to_string());
        let log = StatusLog::new();

        let err = fast()
            .deliver(&host, &request(), &log)
            .await
            .into_result()
            .unwrap_err();

        assert!(matches!(err, Error::RestrictedPage { .. }));
        assert_eq!(host.calls(), (0, 0, 0));
        assert!(log.entries().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_address_is_restricted() {
        let mut host =
            ScriptedHost::new(Answer::Reply(json!(["A"])), Answer::Fail, Answer::Fail);
        host.url = None;

        let err = fast()
            .deliver(&host, &request(), &StatusLog::new())
            .await
            .into_result()
            .unwrap_err();

        assert!(matches!(err, Error::RestrictedPage { .. }));
        assert_eq!(host.calls(), (0, 0, 0));
    }

    #[test]
    fn test_tier_display() {
        assert_eq!(Tier::ExistingAgent.to_string(), "existing agent");
        assert_eq!(Tier::InjectAndRetry.to_string(), "inject and retry");
        assert_eq!(Tier::DirectExecution.to_string(), "direct execution");
    }
}
