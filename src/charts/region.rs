//! Display regions a chart can be bound to.

use std::collections::BTreeSet;

/// Region used when none is configured.
pub const DEFAULT_REGION: &str = "chart1";

/// The addressable regions of the hosting window or page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    regions: BTreeSet<String>,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new([DEFAULT_REGION])
    }
}

impl Surface {
    pub fn new<I, S>(regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            regions: regions.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.regions.contains(name)
    }

    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.regions.iter().map(String::as_str)
    }
}
