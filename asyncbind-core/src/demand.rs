// Copyright 2025 the asyncbind authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

/// Advisory demand signalled by a downstream consumer.
///
/// The bridge emits at most one value per subscription, so it does no
/// incremental demand accounting: any non-empty demand counts as "ready to
/// receive", and further requests are no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Demand {
    /// No values requested.
    None,
    /// At most the given number of values requested.
    Max(usize),
    /// Any number of values requested.
    Unlimited,
}

impl Demand {
    /// Returns `true` if this demand requests no values at all.
    ///
    /// `Max(0)` is treated the same as `None`.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None | Self::Max(0))
    }
}
