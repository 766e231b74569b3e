pub use portfolio_utils_derive::trace_instrument;

mod macros;
pub mod serde;

/// Returns the version of this build.
///
/// Release builds may override the crate version by setting
/// `PORTFOLIO_VERSION` at compile time.
pub fn portfolio_version() -> &'static str {
    option_env!("PORTFOLIO_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Builder helper for optional settings.
pub trait Apply: Sized {
    /// Passes `self` through `f` if `value` is present, otherwise returns
    /// `self` unchanged.
    ///
    /// ```rust
    /// # use portfolio_utils::Apply;
    /// let port = |p: Option<u16>| String::from("smtp").apply_map(p, |s, p| format!("{s}:{p}"));
    /// assert_eq!(port(None), "smtp");
    /// assert_eq!(port(Some(25)), "smtp:25");
    /// ```
    fn apply_map<U>(self, value: Option<U>, f: impl FnOnce(Self, U) -> Self) -> Self {
        match value {
            Some(value) => f(self, value),
            None => self,
        }
    }
}

impl<T> Apply for T {}
