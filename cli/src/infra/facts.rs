//! Infrastructure implementation of the `FactProvider` port, backed by the
//! host's resolver configuration.

use std::io;
use std::path::PathBuf;

use tracing::warn;

use crate::application::ports::{FactProvider, LocalFs};
use crate::domain::FactError;
use crate::domain::resolver::{self, ResolverConfig};

/// Reads domain and name servers from a `resolv.conf`-format file.
///
/// The file is read on every call so a run always sees current host state.
pub struct ResolvConfFacts<F> {
    fs: F,
    path: PathBuf,
}

impl<F: LocalFs> ResolvConfFacts<F> {
    pub fn new(fs: F, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }

    fn load(&self) -> Result<ResolverConfig, FactError> {
        let unreadable = |source| FactError::Unreadable {
            path: self.path.clone(),
            source,
        };
        let bytes = self
            .fs
            .read(&self.path)
            .map_err(unreadable)?
            .ok_or_else(|| unreadable(io::Error::from(io::ErrorKind::NotFound)))?;
        let config = resolver::parse(&String::from_utf8_lossy(&bytes));
        for entry in &config.rejected {
            warn!(path = %self.path.display(), entry = %entry, "ignoring nameserver that is not an IPv4 address");
        }
        Ok(config)
    }
}

impl<F: LocalFs> FactProvider for ResolvConfFacts<F> {
    fn domain_name(&self) -> Result<String, FactError> {
        Ok(self.load()?.domain_or_default().to_string())
    }

    fn name_servers(&self) -> Result<Vec<String>, FactError> {
        Ok(self.load()?.nameservers)
    }
}
