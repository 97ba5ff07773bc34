//! Retry policies for the fetcher.

/// Decides whether another attempt is made after `attempt` failed attempts.
pub trait RetryPolicy {
    fn should_retry(&self, attempt: u32) -> bool;
}

/// Allow a fixed number of retries beyond the first attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedRetries {
    pub max_retries: u32,
}

impl FixedRetries {
    pub const fn new(max_retries: u32) -> Self {
        Self { max_retries }
    }
}

impl Default for FixedRetries {
    fn default() -> Self {
        Self::new(3)
    }
}

impl RetryPolicy for FixedRetries {
    fn should_retry(&self, attempt: u32) -> bool {
        attempt <= self.max_retries
    }
}

impl<F> RetryPolicy for F
where
    F: Fn(u32) -> bool,
{
    fn should_retry(&self, attempt: u32) -> bool {
        self(attempt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_allows_three_retries() {
        let policy = FixedRetries::default();
        assert!(policy.should_retry(1));
        assert!(policy.should_retry(3));
        assert!(!policy.should_retry(4));
    }

    #[test]
    fn test_zero_retries() {
        assert!(!FixedRetries::new(0).should_retry(1));
    }

    #[test]
    fn test_closure_policy() {
        let never = |_: u32| false;
        assert!(!never.should_retry(1));
    }
}
