/// Format versions accepted by default: `dex\n035\0` through `dex\n039\0`.
pub const SUPPORTED_VERSIONS: [u32; 5] = [35, 36, 37, 38, 39];

/// Load-time knobs for [`crate::dex::DexFile::with_options`].
///
/// ```
/// use dexview::dex::LoadOptions;
///
/// let options = LoadOptions::default().allow_version(40).strict_header_size(true);
/// assert!(options.allows_version(40));
/// assert!(!options.allows_version(41));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions
{
    pub(crate) allowed_versions: Vec<u32>,
    pub(crate) strict_header_size: bool,
    pub(crate) verify_checksum: bool,
    pub(crate) verify_signature: bool,
}

impl Default for LoadOptions
{
    fn default() -> Self
    {
        LoadOptions {
            allowed_versions: SUPPORTED_VERSIONS.to_vec(),
            strict_header_size: false,
            verify_checksum: false,
            verify_signature: false,
        }
    }
}

impl LoadOptions
{
    pub fn allow_version(mut self, version: u32) -> Self
    {
        if !self.allowed_versions.contains(&version)
        {
            self.allowed_versions.push(version);
        }
        self
    }

    /// Replace the accepted version set entirely.
    pub fn only_versions(mut self, versions: &[u32]) -> Self
    {
        self.allowed_versions = versions.to_vec();
        self
    }

    /// Reject headers whose `header_size` is not 0x70 instead of warning.
    pub fn strict_header_size(mut self, strict: bool) -> Self
    {
        self.strict_header_size = strict;
        self
    }

    /// Check the Adler-32 `checksum` over everything after it.
    pub fn verify_checksum(mut self, verify: bool) -> Self
    {
        self.verify_checksum = verify;
        self
    }

    /// Check the SHA-1 `signature` over everything after it.
    pub fn verify_signature(mut self, verify: bool) -> Self
    {
        self.verify_signature = verify;
        self
    }

    pub fn allows_version(&self, version: u32) -> bool
    {
        self.allowed_versions.contains(&version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_versions_replaces_defaults()
    {
        let options = LoadOptions::default().only_versions(&[37]);
        assert!(options.allows_version(37));
        assert!(!options.allows_version(35));
    }

    #[test]
    fn integrity_checks_are_opt_in()
    {
        let options = LoadOptions::default();
        assert!(!options.verify_checksum && !options.verify_signature);
        let options = options.verify_checksum(true).verify_signature(true);
        assert!(options.verify_checksum && options.verify_signature);
    }
}
