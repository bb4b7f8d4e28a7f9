//! Minimal bean storage used while evaluating auto-configuration.
//!
//! Beans are `Arc<T>` values stored by unique name and looked up by type.
//! Registration order is preserved; lookups by type sort on the explicit
//! order first and registration order second.

use crate::error::{BootError, Result};
use indexmap::IndexMap;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Identifies a bean type for condition evaluation.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BeanType {
    id: TypeId,
    name: &'static str,
}

impl BeanType {
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Short type name, without the module path.
    pub fn simple_name(&self) -> &'static str {
        let base = self.name.split('<').next().unwrap_or(self.name);
        base.rsplit("::").next().unwrap_or(base)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for BeanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BeanOptions {
    pub primary: bool,
    pub order: i32,
}

impl BeanOptions {
    pub fn primary() -> Self {
        Self {
            primary: true,
            order: 0,
        }
    }

    pub fn ordered(order: i32) -> Self {
        Self {
            primary: false,
            order,
        }
    }
}

struct BeanEntry {
    bean_type: BeanType,
    instance: Arc<dyn Any + Send + Sync>,
    options: BeanOptions,
}

#[derive(Default)]
pub struct BeanFactory {
    beans: RwLock<IndexMap<String, BeanEntry>>,
}

impl BeanFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T: Any + Send + Sync>(&self, name: impl Into<String>, bean: T) -> Result<Arc<T>> {
        self.register_with(name, bean, BeanOptions::default())
    }

    pub fn register_primary<T: Any + Send + Sync>(
        &self,
        name: impl Into<String>,
        bean: T,
    ) -> Result<Arc<T>> {
        self.register_with(name, bean, BeanOptions::primary())
    }

    pub fn register_with<T: Any + Send + Sync>(
        &self,
        name: impl Into<String>,
        bean: T,
        options: BeanOptions,
    ) -> Result<Arc<T>> {
        self.register_arc(name, Arc::new(bean), options)
    }

    pub fn register_arc<T: Any + Send + Sync>(
        &self,
        name: impl Into<String>,
        bean: Arc<T>,
        options: BeanOptions,
    ) -> Result<Arc<T>> {
        let name = name.into();
        let mut beans = self.beans.write().unwrap_or_else(PoisonError::into_inner);
        if beans.contains_key(&name) {
            return Err(BootError::BeanDefinition(format!(
                "A bean named '{}' is already registered",
                name
            )));
        }
        let bean_type = BeanType::of::<T>();
        debug!("Registered bean '{}' of type {:?}", name, bean_type);
        beans.insert(
            name,
            BeanEntry {
                bean_type,
                instance: bean.clone(),
                options,
            },
        );
        Ok(bean)
    }

    pub fn get_bean<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        let beans = self.beans.read().unwrap_or_else(PoisonError::into_inner);
        beans
            .get(name)
            .and_then(|entry| entry.instance.clone().downcast::<T>().ok())
    }

    /// All beans of type `T` with their names, in bean order.
    pub fn get_beans_of_type<T: Any + Send + Sync>(&self) -> Vec<(String, Arc<T>)> {
        let beans = self.beans.read().unwrap_or_else(PoisonError::into_inner);
        let mut matches: Vec<(i32, String, Arc<T>)> = beans
            .iter()
            .filter_map(|(name, entry)| {
                entry
                    .instance
                    .clone()
                    .downcast::<T>()
                    .ok()
                    .map(|bean| (entry.options.order, name.clone(), bean))
            })
            .collect();
        // Stable sort keeps registration order among equal orders.
        matches.sort_by_key(|(order, _, _)| *order);
        matches.into_iter().map(|(_, name, bean)| (name, bean)).collect()
    }

    /// Beans of type `T`, in bean order.
    pub fn ordered_stream<T: Any + Send + Sync>(&self) -> Vec<Arc<T>> {
        self.get_beans_of_type::<T>()
            .into_iter()
            .map(|(_, bean)| bean)
            .collect()
    }

    /// The only bean of type `T`, or `None` when there are zero or several.
    pub fn get_if_unique<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        let mut beans = self.get_beans_of_type::<T>();
        if beans.len() == 1 {
            beans.pop().map(|(_, bean)| bean)
        } else {
            None
        }
    }

    /// The only bean of type `T`, or the single primary among several.
    pub fn single_candidate<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        let name = self.single_candidate_name(&BeanType::of::<T>())?;
        self.get_bean::<T>(&name)
    }

    pub fn contains_bean(&self, name: &str) -> bool {
        let beans = self.beans.read().unwrap_or_else(PoisonError::into_inner);
        beans.contains_key(name)
    }

    pub fn contains_bean_of_type(&self, bean_type: &BeanType) -> bool {
        !self.bean_names_for_type(bean_type).is_empty()
    }

    pub fn bean_names_for_type(&self, bean_type: &BeanType) -> Vec<String> {
        let beans = self.beans.read().unwrap_or_else(PoisonError::into_inner);
        beans
            .iter()
            .filter(|(_, entry)| entry.bean_type == *bean_type)
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn single_candidate_name(&self, bean_type: &BeanType) -> Option<String> {
        let beans = self.beans.read().unwrap_or_else(PoisonError::into_inner);
        let candidates: Vec<(&String, &BeanEntry)> = beans
            .iter()
            .filter(|(_, entry)| entry.bean_type == *bean_type)
            .collect();
        match candidates.as_slice() {
            [(name, _)] => Some((*name).clone()),
            [] => None,
            many => {
                let primaries: Vec<&String> = many
                    .iter()
                    .filter(|(_, entry)| entry.options.primary)
                    .map(|(name, _)| *name)
                    .collect();
                match primaries.as_slice() {
                    [name] => Some((*name).clone()),
                    _ => None,
                }
            }
        }
    }

    pub fn bean_names(&self) -> Vec<String> {
        let beans = self.beans.read().unwrap_or_else(PoisonError::into_inner);
        beans.keys().cloned().collect()
    }

    /// Name and type of every bean, in registration order.
    pub fn describe(&self) -> Vec<(String, BeanType)> {
        let beans = self.beans.read().unwrap_or_else(PoisonError::into_inner);
        beans
            .iter()
            .map(|(name, entry)| (name.clone(), entry.bean_type))
            .collect()
    }

    pub fn len(&self) -> usize {
        let beans = self.beans.read().unwrap_or_else(PoisonError::into_inner);
        beans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for BeanFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanFactory")
            .field("beans", &self.bean_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Greeter: Send + Sync {
        fn greet(&self) -> String;
    }

    struct English;
    impl Greeter for English {
        fn greet(&self) -> String {
            "hello".to_string()
        }
    }

    #[derive(Debug, PartialEq)]
    struct Port(u16);

    #[test]
    fn test_register_and_lookup_by_name() {
        let factory = BeanFactory::new();
        factory.register("port", Port(5672)).unwrap();
        assert_eq!(factory.get_bean::<Port>("port").as_deref(), Some(&Port(5672)));
        assert!(factory.get_bean::<String>("port").is_none());
        assert!(factory.contains_bean("port"));
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let factory = BeanFactory::new();
        factory.register("port", Port(1)).unwrap();
        let err = factory.register("port", Port(2)).unwrap_err();
        assert!(matches!(err, BootError::BeanDefinition(_)));
    }

    #[test]
    fn test_trait_objects_are_stored_as_arcs() {
        let factory = BeanFactory::new();
        let greeter: Arc<dyn Greeter> = Arc::new(English);
        factory.register("greeter", greeter).unwrap();

        let found = factory.get_if_unique::<Arc<dyn Greeter>>().unwrap();
        assert_eq!(found.greet(), "hello");
        assert!(factory.contains_bean_of_type(&BeanType::of::<Arc<dyn Greeter>>()));
    }

    #[test]
    fn test_ordering_uses_order_then_registration() {
        let factory = BeanFactory::new();
        factory.register_with("c", Port(3), BeanOptions::ordered(5)).unwrap();
        factory.register_with("a", Port(1), BeanOptions::ordered(-1)).unwrap();
        factory.register("b", Port(2)).unwrap();
        factory.register("d", Port(4)).unwrap();

        let names: Vec<String> = factory
            .get_beans_of_type::<Port>()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["a", "b", "d", "c"]);
    }

    #[test]
    fn test_single_candidate_prefers_primary() {
        let factory = BeanFactory::new();
        factory.register("first", Port(1)).unwrap();
        assert_eq!(factory.single_candidate::<Port>().as_deref(), Some(&Port(1)));

        factory.register("second", Port(2)).unwrap();
        assert!(factory.single_candidate::<Port>().is_none());
        assert!(factory.get_if_unique::<Port>().is_none());

        factory.register_primary("third", Port(3)).unwrap();
        assert_eq!(factory.single_candidate::<Port>().as_deref(), Some(&Port(3)));
    }

    #[test]
    fn test_simple_type_name() {
        assert_eq!(BeanType::of::<Port>().simple_name(), "Port");
    }
}
