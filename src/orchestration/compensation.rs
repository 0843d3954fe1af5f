// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Best-effort compensation for writes spanning several backends.
//!
//! A [`CompensableSequence`] runs forward steps in order and records an
//! inverse for each one that succeeded. When a step fails, the recorded
//! inverses run newest first and the step's own error is returned as is.
//! Inverse failures are logged and never replace that error.

use std::{fmt::Display, future::Future};

use futures::{future::BoxFuture, FutureExt};

use crate::backend::BackendError;

/// Undo action for one completed step.
pub type Inverse = Box<dyn FnOnce() -> BoxFuture<'static, Result<(), BackendError>> + Send>;

/// Wrap an async undo action.
pub fn inverse<F, Fut>(undo: F) -> Option<Inverse>
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<(), BackendError>> + Send + 'static,
{
    Some(Box::new(move || undo().boxed()))
}

pub struct CompensableSequence {
    name: &'static str,
    completed: Vec<(&'static str, Option<Inverse>)>,
}

impl CompensableSequence {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            completed: Vec::new(),
        }
    }

    /// Run one forward step. `undo` builds the inverse from the step's
    /// result; `None` means the step needs no undo.
    pub async fn step<T, E, F, U>(&mut self, step: &'static str, forward: F, undo: U) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        U: FnOnce(&T) -> Option<Inverse>,
        E: Display,
    {
        match forward.await {
            Ok(value) => {
                self.completed.push((step, undo(&value)));
                Ok(value)
            }
            Err(e) => {
                tracing::debug!(sequence = self.name, step, error = %e, "Step failed, unwinding");
                self.unwind(step).await;
                Err(e)
            }
        }
    }

    async fn unwind(&mut self, failed_step: &'static str) {
        while let Some((compensated, undo)) = self.completed.pop() {
            let Some(undo) = undo else { continue };
            match undo().await {
                Ok(()) => {
                    tracing::info!(
                        sequence = self.name,
                        failed_step,
                        compensated_step = compensated,
                        "Compensated completed step"
                    );
                }
                // Already gone counts as undone.
                Err(e) if e.is_not_found() => {}
                Err(e) => {
                    tracing::error!(
                        sequence = self.name,
                        failed_step,
                        compensated_step = compensated,
                        error = %e,
                        "Compensation failed, state left inconsistent"
                    );
                }
            }
        }
    }
}
