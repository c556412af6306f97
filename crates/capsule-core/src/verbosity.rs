/// How much internal failure detail may be disclosed to the caller
///
/// Resolved once at process start from the deployment environment and
/// never mutated afterwards. Passed explicitly into classification so the
/// mapping stays a pure function of (failure, verbosity).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Raw messages, traces, and source locations are exposed.
    /// Strictly a development aid; must never be enabled for externally
    /// reachable deployments.
    Verbose,
    /// Internal faults collapse to a fixed user-safe message
    Terse,
}

impl Verbosity {
    /// Resolve from a deployment environment name
    ///
    /// `development` and `staging` are verbose; anything else is terse.
    #[must_use]
    pub fn from_environment(environment: &str) -> Self {
        match environment {
            "development" | "staging" => Self::Verbose,
            _ => Self::Terse,
        }
    }

    #[must_use]
    pub const fn is_verbose(self) -> bool {
        matches!(self, Self::Verbose)
    }
}
