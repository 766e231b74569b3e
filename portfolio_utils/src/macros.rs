/// Asserts that an expression matches a pattern, with an optional guard.
///
/// ```
/// # use portfolio_utils::assert_matches;
/// assert_matches!(Some(3), Some(x) if x > 2);
/// ```
#[macro_export]
macro_rules! assert_matches {
    ($expr:expr, $pat:pat $(if $guard:expr)? $(,)?) => {
        match $expr {
            $pat $(if $guard)? => {}
            ref other => ::core::panic!(
                "assertion failed: `{:?}` does not match `{}`",
                other,
                ::core::stringify!($pat $(if $guard)?),
            ),
        }
    };
}

#[cfg(test)]
mod tests {
    #[derive(Debug)]
    enum Outcome {
        Sent(u32),
        Failed,
    }

    #[test]
    fn matches() {
        assert_matches!(Outcome::Sent(2), Outcome::Sent(_));
        assert_matches!(Outcome::Sent(2), Outcome::Sent(n) if n == 2);
        assert_matches!(Outcome::Failed, Outcome::Failed,);
    }

    #[test]
    #[should_panic(expected = "does not match `Outcome::Failed`")]
    fn mismatch() {
        assert_matches!(Outcome::Sent(2), Outcome::Failed);
    }

    #[test]
    #[should_panic(expected = "does not match")]
    fn guard_mismatch() {
        assert_matches!(Outcome::Sent(2), Outcome::Sent(n) if n > 5);
    }
}
