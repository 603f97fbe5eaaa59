use serde_json::Value;
use sha2::{Digest, Sha256};

/// Type of GraphQL operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationType {
    Query,
    Mutation,
    Subscription,
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationType::Query => write!(f, "query"),
            OperationType::Mutation => write!(f, "mutation"),
            OperationType::Subscription => write!(f, "subscription"),
        }
    }
}

/// Lowercase hex SHA-256 of a document, the id used by persisted queries
pub fn sha256_hex(document: &str) -> String {
    hex::encode(Sha256::digest(document.as_bytes()))
}

/// A GraphQL operation as produced by a code generator.
///
/// Generated operations usually hardcode [`Operation::id`]; the provided
/// implementation hashes the document.
pub trait Operation: Send + Sync {
    fn operation_type(&self) -> OperationType;

    fn name(&self) -> &str;

    /// The full document text
    fn document(&self) -> &str;

    /// Variables serialized as a JSON object
    fn variables(&self) -> Result<Value, serde_json::Error>;

    /// Stable identifier, the SHA-256 hash of the document
    fn id(&self) -> String {
        sha256_hex(self.document())
    }
}

/// An operation assembled at runtime
#[derive(Debug, Clone, PartialEq)]
pub struct OperationDescriptor {
    pub operation_type: OperationType,
    pub name: String,
    pub document: String,
    pub variables: Value,
    id: String,
}

impl OperationDescriptor {
    pub fn new(
        operation_type: OperationType,
        name: impl Into<String>,
        document: impl Into<String>,
    ) -> Self {
        let document = document.into();
        Self {
            operation_type,
            name: name.into(),
            id: sha256_hex(&document),
            document,
            variables: Value::Object(Default::default()),
        }
    }

    pub fn query(name: impl Into<String>, document: impl Into<String>) -> Self {
        Self::new(OperationType::Query, name, document)
    }

    pub fn mutation(name: impl Into<String>, document: impl Into<String>) -> Self {
        Self::new(OperationType::Mutation, name, document)
    }

    pub fn with_variables(mut self, variables: Value) -> Self {
        self.variables = variables;
        self
    }

    /// Use a precomputed id instead of the document hash
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

impl Operation for OperationDescriptor {
    fn operation_type(&self) -> OperationType {
        self.operation_type
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn document(&self) -> &str {
        &self.document
    }

    fn variables(&self) -> Result<Value, serde_json::Error> {
        Ok(self.variables.clone())
    }

    fn id(&self) -> String {
        self.id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_type_display() {
        assert_eq!(format!("{}", OperationType::Query), "query");
        assert_eq!(format!("{}", OperationType::Mutation), "mutation");
        assert_eq!(format!("{}", OperationType::Subscription), "subscription");
    }

    #[test]
    fn test_sha256_hex_known_value() {
        assert_eq!(
            sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_descriptor_id_is_document_hash() {
        let op = OperationDescriptor::query("Users", "query Users { users { id } }");
        assert_eq!(op.id(), sha256_hex("query Users { users { id } }"));
        assert_eq!(op.id().len(), 64);
    }

    #[test]
    fn test_descriptor_with_id() {
        let op = OperationDescriptor::query("Users", "query Users { users { id } }").with_id("custom");
        assert_eq!(op.id(), "custom");
    }

    #[test]
    fn test_descriptor_default_variables_empty_object() {
        let op = OperationDescriptor::mutation("Create", "mutation Create { create }");
        assert_eq!(op.operation_type(), OperationType::Mutation);
        assert_eq!(op.variables().unwrap(), serde_json::json!({}));
    }

    #[test]
    fn test_descriptor_with_variables() {
        let op = OperationDescriptor::query("User", "query User($id: ID!) { user(id: $id) { name } }")
            .with_variables(serde_json::json!({"id": "123"}));
        assert_eq!(op.variables().unwrap()["id"], "123");
    }

    struct GeneratedHero;

    impl Operation for GeneratedHero {
        fn operation_type(&self) -> OperationType {
            OperationType::Query
        }
        fn name(&self) -> &str {
            "Hero"
        }
        fn document(&self) -> &str {
            "query Hero { hero { name } }"
        }
        fn variables(&self) -> Result<Value, serde_json::Error> {
            serde_json::to_value(serde_json::Map::new())
        }
    }

    #[test]
    fn test_trait_default_id_hashes_document() {
        assert_eq!(GeneratedHero.id(), sha256_hex("query Hero { hero { name } }"));
    }
}
