// Copyright 2025 the asyncbind authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

/// Terminal signal delivered to a subscriber.
///
/// Exactly one completion is delivered per subscription, after at most one
/// value signal, unless the subscription was cancelled first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion<E> {
    /// The computation finished, possibly without producing a value.
    Finished,
    /// The computation failed with the subscriber's declared failure type.
    Failed(E),
}

impl<E> Completion<E> {
    /// Returns `true` if this is a successful completion.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        matches!(self, Self::Finished)
    }

    /// Returns `true` if this is a failure completion.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Converts into the carried failure, discarding a successful completion.
    pub fn failure(self) -> Option<E> {
        match self {
            Self::Finished => None,
            Self::Failed(e) => Some(e),
        }
    }
}
