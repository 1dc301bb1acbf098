//! Apply-now, roll-back-on-failure mutation helper.
//!
//! Request deletion and dose status/note updates all share the same
//! shape: the visible state changes immediately, the portal call runs
//! behind it, and a failure puts the prior state back verbatim so the
//! UI is indistinguishable from "nothing happened" apart from the
//! surfaced error. Centralizing the snapshot/rollback here keeps call
//! sites from re-deriving it (and getting the aliasing wrong).

use std::future::Future;

use crate::error::PortalError;

/// Run one optimistic mutation against `state`.
///
/// Snapshots `state` by clone (a true copy — later mutation cannot
/// alias it), applies `apply` synchronously, then awaits `remote`. On
/// `Err` the snapshot is written back and the error propagated; on `Ok`
/// the local state already reflects reality.
///
/// Concurrency model matches the engine's: no queueing or merging. Two
/// racing mutations of the same entity each keep their own snapshot and
/// the last writer wins locally; reconciliation is the next full reload.
/// Dropping the returned future mid-flight applies nothing further —
/// the rollback is discarded with it rather than fired at stale state.
pub async fn mutate<S, T, F>(
    state: &mut S,
    apply: impl FnOnce(&mut S),
    remote: F,
) -> Result<T, PortalError>
where
    S: Clone,
    F: Future<Output = Result<T, PortalError>>,
{
    let prior = state.clone();
    apply(state);

    match remote.await {
        Ok(value) => Ok(value),
        Err(err) => {
            tracing::warn!(%err, "remote call failed, rolling back local state");
            *state = prior;
            Err(err)
        }
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn keeps_applied_state_on_success() {
        let mut items = vec![1, 2, 3];
        let result = mutate(&mut items, |s| s.retain(|&n| n != 2), async { Ok(()) }).await;
        assert!(result.is_ok());
        assert_eq!(items, vec![1, 3]);
    }

    #[tokio::test]
    async fn restores_snapshot_on_failure() {
        let mut items = vec![1, 2, 3];
        let result: Result<(), _> = mutate(
            &mut items,
            |s| s.clear(),
            async { Err(PortalError::Transport("boom".into())) },
        )
        .await;
        assert_eq!(result, Err(PortalError::Transport("boom".into())));
        assert_eq!(items, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn rollback_is_exact_not_merely_equivalent() {
        // Order matters: the snapshot must restore the original position.
        let mut items = vec!["a", "b", "c"];
        let _ = mutate(
            &mut items,
            |s| {
                s.remove(1);
            },
            async { Err::<(), _>(PortalError::Transport("500".into())) },
        )
        .await;
        assert_eq!(items, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn remote_value_is_passed_through() {
        let mut counter = 0u32;
        let value = mutate(&mut counter, |c| *c += 1, async { Ok(41) })
            .await
            .unwrap();
        assert_eq!(value, 41);
        assert_eq!(counter, 1);
    }
}
