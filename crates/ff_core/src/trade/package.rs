//! Candidate packages: one side of a prospective trade

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::models::Asset;

/// An unordered bundle of assets offered or requested in a trade.
#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    assets: Vec<Arc<Asset>>,
}

impl Package {
    pub fn new(assets: Vec<Arc<Asset>>) -> Self {
        Self { assets }
    }

    pub fn assets(&self) -> &[Arc<Asset>] {
        &self.assets
    }

    /// Position tags present in the package; `None` stands for a pick.
    pub fn positions(&self) -> BTreeSet<Option<&str>> {
        self.assets.iter().map(|asset| asset.position()).collect()
    }

    /// Whether an asset matching `reference` (id or name) is in the package.
    pub fn contains(&self, reference: &str) -> bool {
        self.assets.iter().any(|asset| asset.matches(reference))
    }

    pub fn value(&self) -> f64 {
        self.assets.iter().map(|asset| asset.value).sum()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Asset>> {
        self.assets.iter()
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let names: Vec<&str> = self.assets.iter().map(|asset| asset.name.as_str()).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

/// Every combination of `1..=max_size` assets.
///
/// Smaller packages come first; within a size, combinations follow the
/// input order lexicographically.
pub fn assemble(assets: &[Arc<Asset>], max_size: usize) -> Vec<Package> {
    let max_size = max_size.min(assets.len());
    let mut packages = Vec::new();
    for size in 1..=max_size {
        let mut indices: Vec<usize> = (0..size).collect();
        loop {
            packages.push(Package::new(indices.iter().map(|&i| Arc::clone(&assets[i])).collect()));
            if !advance(&mut indices, assets.len()) {
                break;
            }
        }
    }
    packages
}

/// Steps `indices` to the next combination; false once exhausted.
fn advance(indices: &mut [usize], n: usize) -> bool {
    let k = indices.len();
    let Some(i) = (0..k).rev().find(|&i| indices[i] != i + n - k) else {
        return false;
    };
    indices[i] += 1;
    for j in i + 1..k {
        indices[j] = indices[j - 1] + 1;
    }
    true
}
