/// Capability deciding whether a presented key carries admin rights. Injected
/// at engine construction so the engine itself holds no literal secret.
pub trait AdminPolicy: Send + Sync {
    fn authorize(&self, key: &str) -> bool;
}

/// Single shared-key policy, the key coming from configuration.
pub struct SharedKeyPolicy {
    key: String,
}

impl SharedKeyPolicy {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl AdminPolicy for SharedKeyPolicy {
    fn authorize(&self, key: &str) -> bool {
        self.key == key
    }
}
