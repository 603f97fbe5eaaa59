use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone)]
struct Element {
    type_name: &'static str,
    value: Arc<dyn Any + Send + Sync>,
}

/// Immutable bag of typed elements attached to a request.
///
/// Elements are keyed by their Rust type: storing a `Tracing` element and an
/// `Auth` element gives two entries, storing two `Auth` elements keeps one.
/// Contexts never shrink, they are combined with [`ExecutionContext::merge`]
/// where the right-hand side wins on collisions.
#[derive(Clone, Default)]
pub struct ExecutionContext {
    elements: HashMap<TypeId, Element>,
}

impl ExecutionContext {
    /// An empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// A context holding a single element
    pub fn with<T: Any + Send + Sync>(element: T) -> Self {
        let mut elements = HashMap::with_capacity(1);
        elements.insert(
            TypeId::of::<T>(),
            Element {
                type_name: std::any::type_name::<T>(),
                value: Arc::new(element),
            },
        );
        Self { elements }
    }

    /// Read an element by its type
    pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.elements
            .get(&TypeId::of::<T>())
            .and_then(|element| element.value.downcast_ref::<T>())
    }

    pub fn contains<T: Any + Send + Sync>(&self) -> bool {
        self.elements.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Combine two contexts. Keys present in both take `other`'s value.
    pub fn merge(&self, other: &ExecutionContext) -> ExecutionContext {
        if other.is_empty() {
            return self.clone();
        }
        let mut elements = self.elements.clone();
        for (key, element) in &other.elements {
            elements.insert(*key, element.clone());
        }
        ExecutionContext { elements }
    }
}

impl std::ops::Add for ExecutionContext {
    type Output = ExecutionContext;

    fn add(self, rhs: ExecutionContext) -> Self::Output {
        self.merge(&rhs)
    }
}

impl std::fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.elements.values().map(|e| e.type_name).collect();
        names.sort_unstable();
        f.debug_tuple("ExecutionContext").field(&names).finish()
    }
}
