use std::{future::Future, time::Duration};

use async_trait::async_trait;
use lectern_catalog::EntitySummary;
use lectern_shared::kind::EntityKind;
use serde::Deserialize;

use crate::{Dashboard, RegistrationEvent, aggregate, present};

/// Read side of the entity catalog, as the analytics dashboard needs it.
#[async_trait]
pub trait EntityCatalog: Send + Sync {
    /// Every entity of `kind`, archived ones included, most recent first.
    async fn list_entities(&self, kind: EntityKind) -> anyhow::Result<Vec<EntitySummary>>;
}

#[async_trait]
pub trait RegistrationLog: Send + Sync {
    async fn list_registrations(&self) -> anyhow::Result<Vec<RegistrationEvent>>;
}

#[async_trait]
impl EntityCatalog for lectern_catalog::Query {
    async fn list_entities(&self, kind: EntityKind) -> anyhow::Result<Vec<EntitySummary>> {
        Ok(self.list(kind, true).await?)
    }
}

#[async_trait]
impl RegistrationLog for crate::Query {
    async fn list_registrations(&self) -> anyhow::Result<Vec<RegistrationEvent>> {
        Ok(self.list_all().await?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff_ms: 100,
        }
    }
}

impl RetryPolicy {
    /// Delay after the failed `attempt` (1-based): base, 2 x base, 4 x base...
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 1u64
            .checked_shl(attempt.saturating_sub(1))
            .unwrap_or(u64::MAX);

        Duration::from_millis(self.base_backoff_ms.saturating_mul(factor))
    }

    pub async fn run<T, F, Fut>(&self, what: &str, mut op: F) -> anyhow::Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < max_attempts => {
                    let delay = self.delay_for_attempt(attempt);
                    tracing::warn!(
                        what,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "fetch failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Fetches the catalog and the log concurrently, then aggregates and
/// presents them. Failures that outlast the retry policy are reported as
/// [`lectern_shared::Error::Unavailable`].
pub async fn load_dashboard<C, L>(
    catalog: &C,
    log: &L,
    kind: EntityKind,
    policy: RetryPolicy,
) -> lectern_shared::Result<Dashboard>
where
    C: EntityCatalog + ?Sized,
    L: RegistrationLog + ?Sized,
{
    let entities = async {
        policy
            .run("catalog", || catalog.list_entities(kind))
            .await
            .map_err(|err| {
                tracing::error!(error = %err, %kind, "catalog fetch gave up");
                lectern_shared::Error::Unavailable("catalog".to_owned())
            })
    };

    let events = async {
        policy
            .run("registration log", || log.list_registrations())
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "registration log fetch gave up");
                lectern_shared::Error::Unavailable("registration log".to_owned())
            })
    };

    let (entities, events) = futures::try_join!(entities, events)?;
    let stats = aggregate(&events, kind);

    Ok(present(kind, &stats, &entities))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::RawTimestamp;

    struct FlakyCatalog {
        failures: u32,
        calls: AtomicU32,
    }

    #[async_trait]
    impl EntityCatalog for FlakyCatalog {
        async fn list_entities(&self, _kind: EntityKind) -> anyhow::Result<Vec<EntitySummary>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                anyhow::bail!("catalog offline");
            }

            Ok(vec![EntitySummary {
                id: "A".to_owned(),
                title: "Rust in practice".to_owned(),
                price_cents: 0,
                created_at: 0,
                archived_at: None,
            }])
        }
    }

    struct StaticLog(Vec<RegistrationEvent>);

    #[async_trait]
    impl RegistrationLog for StaticLog {
        async fn list_registrations(&self) -> anyhow::Result<Vec<RegistrationEvent>> {
            Ok(self.0.clone())
        }
    }

    fn policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_backoff_ms: 1,
        }
    }

    fn log() -> StaticLog {
        StaticLog(vec![RegistrationEvent {
            id: "1".to_owned(),
            kind: EntityKind::Course,
            entity_id: Some("A".to_owned()),
            user_id: None,
            created_at: Some(RawTimestamp::Millis(1000)),
            recorded_at: 0,
        }])
    }

    #[test]
    fn backoff_doubles() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(400));
        assert_eq!(policy.delay_for_attempt(200), Duration::from_millis(u64::MAX));
    }

    #[tokio::test]
    async fn transient_failures_are_retried() -> anyhow::Result<()> {
        let catalog = FlakyCatalog {
            failures: 2,
            calls: AtomicU32::new(0),
        };

        let dashboard = load_dashboard(&catalog, &log(), EntityKind::Course, policy()).await?;

        assert_eq!(catalog.calls.load(Ordering::SeqCst), 3);
        assert_eq!(dashboard.entities.len(), 1);
        assert_eq!(dashboard.entities[0].count, 1);
        assert_eq!(dashboard.entities[0].percentage, 100);

        Ok(())
    }

    #[tokio::test]
    async fn exhausted_retries_surface_as_unavailable() {
        let catalog = FlakyCatalog {
            failures: 3,
            calls: AtomicU32::new(0),
        };

        let err = load_dashboard(&catalog, &log(), EntityKind::Course, policy())
            .await
            .unwrap_err();

        assert!(matches!(err, lectern_shared::Error::Unavailable(_)));
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 3);
    }
}
