//! Counters that persist across polling cycles.

/// Mutable bot state owned by the publication gate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    promo_every: i64,
    posts_since_promo: i64,
    destination_errors: u32,
}

impl Session {
    /// Session adding a promo every `promo_every` posts; zero or less disables promos.
    pub fn new(promo_every: i64) -> Self {
        Self {
            promo_every,
            ..Self::default()
        }
    }

    /// Count one composed caption and report whether it carries the promo.
    ///
    /// ```
    /// use tootbot_bot::Session;
    ///
    /// let mut session = Session::new(3);
    /// let promos: Vec<bool> = (0..6).map(|_| session.next_caption_has_promo()).collect();
    /// assert_eq!(promos, [false, false, true, false, false, true]);
    /// ```
    pub fn next_caption_has_promo(&mut self) -> bool {
        if self.promo_every <= 0 {
            return false;
        }
        self.posts_since_promo += 1;
        if self.posts_since_promo >= self.promo_every {
            self.posts_since_promo = 0;
            true
        } else {
            false
        }
    }

    /// Posts composed since the last promo.
    pub fn posts_since_promo(&self) -> i64 {
        self.posts_since_promo
    }

    /// Record a failed upload or status post.
    pub fn record_destination_failure(&mut self) {
        self.destination_errors = self.destination_errors.saturating_add(1);
    }

    /// Record a successful publication.
    pub fn record_destination_success(&mut self) {
        self.destination_errors = 0;
    }

    /// Consecutive destination failures.
    pub fn destination_errors(&self) -> u32 {
        self.destination_errors
    }
}
