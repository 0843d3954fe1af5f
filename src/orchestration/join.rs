// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! All-or-nothing fetch of two independent resources.

use std::future::Future;

/// Run both fetches concurrently. The first error wins and the other
/// fetch is dropped.
pub async fn fetch_both<A, B, E>(
    first: impl Future<Output = Result<A, E>>,
    second: impl Future<Output = Result<B, E>>,
) -> Result<(A, B), E> {
    tokio::try_join!(first, second)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::backend::{BackendError, BackendStatus, Service};

    #[tokio::test]
    async fn both_halves_are_returned() {
        let result: Result<_, BackendError> =
            fetch_both(async { Ok("profile") }, async { Ok(vec![1, 2]) }).await;
        assert_eq!(result.unwrap(), ("profile", vec![1, 2]));
    }

    #[tokio::test]
    async fn an_error_cancels_the_pending_half() {
        let err = BackendError::new(Service::Achievement, BackendStatus::Unavailable, "down");
        let expected = err.clone();

        let result = tokio::time::timeout(
            Duration::from_secs(1),
            fetch_both(std::future::pending::<Result<(), BackendError>>(), async move {
                Err::<(), _>(err)
            }),
        )
        .await
        .expect("error returned without waiting for the other half");

        assert_eq!(result.unwrap_err(), expected);
    }

    #[tokio::test]
    async fn first_error_is_returned_unchanged() {
        let result: Result<((), ()), BackendError> = fetch_both(
            async {
                Err(BackendError::new(
                    Service::Users,
                    BackendStatus::NotFound,
                    "no profile",
                ))
            },
            async { Ok(()) },
        )
        .await;
        let err = result.unwrap_err();
        assert_eq!(err.service, Service::Users);
        assert!(err.is_not_found());
    }
}
