use super::{Endpoint, TestArtifact};
use std::collections::BTreeMap;

/// Test artifacts created during the current run, one per endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactRegistry {
    entries: BTreeMap<Endpoint, TestArtifact>,
}

impl ArtifactRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `artifact` under its endpoint, returning the one it replaces.
    pub fn put(&mut self, artifact: TestArtifact) -> Option<TestArtifact> {
        self.entries.insert(artifact.endpoint().clone(), artifact)
    }

    pub fn get(&self, endpoint: &Endpoint) -> Option<&TestArtifact> {
        self.entries.get(endpoint)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn artifacts(&self) -> impl Iterator<Item = &TestArtifact> {
        self.entries.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifacts_are_keyed_by_endpoint() {
        let first = Endpoint::parse("https://one.example.org/data").expect("endpoint");
        let second = Endpoint::parse("https://two.example.org/data").expect("endpoint");
        let mut registry = ArtifactRegistry::new();
        assert!(registry.is_empty());

        registry.put(TestArtifact::with_name(&first, "a.txt"));
        assert_eq!(
            registry.get(&first).map(TestArtifact::address),
            Some("https://one.example.org/data/a.txt")
        );
        assert!(registry.get(&second).is_none());

        let replaced = registry.put(TestArtifact::with_name(&first, "b.txt"));
        assert_eq!(replaced.map(|a| a.name().to_string()), Some("a.txt".to_string()));
        assert_eq!(registry.len(), 1);
    }
}
