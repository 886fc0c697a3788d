//! Run configuration shared by the driver and the CLI.

use crate::method::GedMethod;

/// Global run configuration.
///
/// - method: GED approximation method whose runs are consumed.
/// - parallel: score independent graph pairs concurrently.
/// - start_index: first graph index considered by batch scoring; pairs are
///   `start_index <= i < j < n`.
/// - verify_paths: extract and replay an edit path for every scored pair.
/// - pretty: pretty-print JSON output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// GED method whose runs are consumed
    pub method: GedMethod,
    /// Score pairs concurrently
    pub parallel: bool,
    /// First graph index considered by batch scoring
    pub start_index: usize,
    /// Extract and replay a path for every scored pair
    pub verify_paths: bool,
    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Config {
    /// Start building a configuration from the defaults.
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

impl Default for Config {
    /// IPFP upper bounds, parallel, all pairs, no verification, pretty output.
    fn default() -> Self {
        Self {
            method: GedMethod::Ipfp,
            parallel: true,
            start_index: 0,
            verify_paths: false,
            pretty: true,
        }
    }
}

/// Builder for [`Config`].
#[derive(Clone, Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the GED method.
    #[must_use]
    pub fn method(mut self, method: GedMethod) -> Self {
        self.config.method = method;
        self
    }

    /// Enable or disable parallel scoring.
    #[must_use]
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// Set the first graph index.
    #[must_use]
    pub fn start_index(mut self, start_index: usize) -> Self {
        self.config.start_index = start_index;
        self
    }

    /// Enable or disable per-pair verification.
    #[must_use]
    pub fn verify_paths(mut self, verify_paths: bool) -> Self {
        self.config.verify_paths = verify_paths;
        self
    }

    /// Enable or disable pretty JSON.
    #[must_use]
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.config.pretty = pretty;
        self
    }

    /// Finish the configuration.
    #[must_use]
    pub fn build(self) -> Config {
        self.config
    }
}
