//! Predicates deciding whether a configuration or bean applies.

use bootkit_core::{BeanFactory, BeanType, ClassPath, CloudPlatform, Environment};
use serde::Serialize;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// What a condition sees while it is evaluated.
#[derive(Clone, Copy)]
pub struct ConditionContext<'a> {
    pub environment: &'a Environment,
    pub classpath: &'a ClassPath,
    pub beans: &'a BeanFactory,
}

impl<'a> ConditionContext<'a> {
    pub fn new(environment: &'a Environment, classpath: &'a ClassPath, beans: &'a BeanFactory) -> Self {
        Self {
            environment,
            classpath,
            beans,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionOutcome {
    pub matched: bool,
    pub message: String,
}

impl ConditionOutcome {
    pub fn matched(message: impl Into<String>) -> Self {
        Self {
            matched: true,
            message: message.into(),
        }
    }

    pub fn no_match(message: impl Into<String>) -> Self {
        Self {
            matched: false,
            message: message.into(),
        }
    }
}

/// Property-based condition.
///
/// Each name is looked up under `prefix`. A present property matches when it
/// equals `having_value` ignoring case, or, without `having_value`, when it
/// is anything but `false`. A missing property matches only with
/// `match_if_missing`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyCondition {
    pub prefix: String,
    pub names: Vec<String>,
    pub having_value: Option<String>,
    pub match_if_missing: bool,
}

impl PropertyCondition {
    pub fn new(prefix: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            names: vec![name.into()],
            having_value: None,
            match_if_missing: false,
        }
    }

    pub fn and_name(mut self, name: impl Into<String>) -> Self {
        self.names.push(name.into());
        self
    }

    pub fn having_value(mut self, value: impl Into<String>) -> Self {
        self.having_value = Some(value.into());
        self
    }

    pub fn match_if_missing(mut self) -> Self {
        self.match_if_missing = true;
        self
    }

    fn key(&self, name: &str) -> String {
        let prefix = self.prefix.trim_end_matches('.');
        if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", prefix, name)
        }
    }

    fn evaluate(&self, environment: &Environment) -> ConditionOutcome {
        let mut missing = Vec::new();
        let mut non_matching = Vec::new();
        for name in &self.names {
            let key = self.key(name);
            match environment.get_property(&key) {
                None if !self.match_if_missing => missing.push(key),
                None => {}
                Some(value) => {
                    let ok = match &self.having_value {
                        Some(expected) => value.trim().eq_ignore_ascii_case(expected),
                        None => !value.trim().eq_ignore_ascii_case("false"),
                    };
                    if !ok {
                        non_matching.push(key);
                    }
                }
            }
        }

        if !missing.is_empty() {
            return ConditionOutcome::no_match(format!(
                "did not find property {}",
                missing.join(", ")
            ));
        }
        if !non_matching.is_empty() {
            return ConditionOutcome::no_match(format!(
                "found different value in property {}",
                non_matching.join(", ")
            ));
        }
        ConditionOutcome::matched(format!("matched property {}", self.describe_names()))
    }

    fn describe_names(&self) -> String {
        let keys: Vec<String> = self.names.iter().map(|n| self.key(n)).collect();
        match &self.having_value {
            Some(value) => format!("{}={}", keys.join(", "), value),
            None => keys.join(", "),
        }
    }
}

type Check = dyn Fn(&ConditionContext<'_>) -> ConditionOutcome + Send + Sync;

/// A named predicate for checks that are not covered by the other variants.
#[derive(Clone)]
pub struct CustomCondition {
    name: String,
    check: Arc<Check>,
}

impl CustomCondition {
    pub fn new<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&ConditionContext<'_>) -> ConditionOutcome + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            check: Arc::new(check),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for CustomCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CustomCondition").field(&self.name).finish()
    }
}

#[derive(Debug, Clone)]
pub enum Condition {
    /// Every class is present.
    OnClass(Vec<String>),
    /// No class is present.
    OnMissingClass(Vec<String>),
    /// A bean of every type exists.
    OnBean(Vec<BeanType>),
    /// No bean of any of the types exists.
    OnMissingBean(Vec<BeanType>),
    /// Exactly one bean of the type exists, or a single primary one.
    OnSingleCandidate(BeanType),
    OnProperty(PropertyCondition),
    OnCloudPlatform(CloudPlatform),
    /// Every resource location resolves.
    OnResource(Vec<String>),
    /// At least one nested condition matches.
    AnyOf(Vec<Condition>),
    Custom(CustomCondition),
}

impl Condition {
    pub fn on_class(class_name: impl Into<String>) -> Self {
        Condition::OnClass(vec![class_name.into()])
    }

    pub fn on_classes<I, S>(class_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Condition::OnClass(class_names.into_iter().map(Into::into).collect())
    }

    pub fn on_missing_class(class_name: impl Into<String>) -> Self {
        Condition::OnMissingClass(vec![class_name.into()])
    }

    pub fn on_bean<T: Any>() -> Self {
        Condition::OnBean(vec![BeanType::of::<T>()])
    }

    pub fn on_missing_bean<T: Any>() -> Self {
        Condition::OnMissingBean(vec![BeanType::of::<T>()])
    }

    pub fn on_single_candidate<T: Any>() -> Self {
        Condition::OnSingleCandidate(BeanType::of::<T>())
    }

    pub fn on_property(property: PropertyCondition) -> Self {
        Condition::OnProperty(property)
    }

    pub fn on_resource(location: impl Into<String>) -> Self {
        Condition::OnResource(vec![location.into()])
    }

    pub fn evaluate(&self, context: &ConditionContext<'_>) -> ConditionOutcome {
        match self {
            Condition::OnClass(classes) => {
                let missing: Vec<&str> = classes
                    .iter()
                    .map(String::as_str)
                    .filter(|c| !context.classpath.is_present(c))
                    .collect();
                if missing.is_empty() {
                    ConditionOutcome::matched(format!(
                        "found required class {}",
                        quoted(classes.iter().map(String::as_str))
                    ))
                } else {
                    ConditionOutcome::no_match(format!(
                        "did not find required class {}",
                        quoted(missing.into_iter())
                    ))
                }
            }
            Condition::OnMissingClass(classes) => {
                let present: Vec<&str> = classes
                    .iter()
                    .map(String::as_str)
                    .filter(|c| context.classpath.is_present(c))
                    .collect();
                if present.is_empty() {
                    ConditionOutcome::matched(format!(
                        "did not find unwanted class {}",
                        quoted(classes.iter().map(String::as_str))
                    ))
                } else {
                    ConditionOutcome::no_match(format!(
                        "found unwanted class {}",
                        quoted(present.into_iter())
                    ))
                }
            }
            Condition::OnBean(types) => {
                let missing: Vec<&BeanType> = types
                    .iter()
                    .filter(|t| !context.beans.contains_bean_of_type(t))
                    .collect();
                if missing.is_empty() {
                    ConditionOutcome::matched(format!("found beans of type {}", type_names(types.iter())))
                } else {
                    ConditionOutcome::no_match(format!(
                        "did not find any beans of type {}",
                        type_names(missing.into_iter())
                    ))
                }
            }
            Condition::OnMissingBean(types) => {
                let found: Vec<String> = types
                    .iter()
                    .flat_map(|t| context.beans.bean_names_for_type(t))
                    .collect();
                if found.is_empty() {
                    ConditionOutcome::matched(format!(
                        "did not find any beans of type {}",
                        type_names(types.iter())
                    ))
                } else {
                    ConditionOutcome::no_match(format!(
                        "found beans of type {}: {}",
                        type_names(types.iter()),
                        found.join(", ")
                    ))
                }
            }
            Condition::OnSingleCandidate(bean_type) => {
                match context.beans.single_candidate_name(bean_type) {
                    Some(name) => ConditionOutcome::matched(format!(
                        "found a single bean '{}' of type {}",
                        name,
                        bean_type.simple_name()
                    )),
                    None => {
                        let names = context.beans.bean_names_for_type(bean_type);
                        if names.is_empty() {
                            ConditionOutcome::no_match(format!(
                                "did not find any beans of type {}",
                                bean_type.simple_name()
                            ))
                        } else {
                            ConditionOutcome::no_match(format!(
                                "expected a single bean of type {} but found {}",
                                bean_type.simple_name(),
                                names.join(", ")
                            ))
                        }
                    }
                }
            }
            Condition::OnProperty(property) => property.evaluate(context.environment),
            Condition::OnCloudPlatform(platform) => {
                if platform.is_active(context.environment) {
                    ConditionOutcome::matched(format!("running on {}", platform))
                } else {
                    ConditionOutcome::no_match(format!("not running on {}", platform))
                }
            }
            Condition::OnResource(locations) => {
                let loader = context.classpath.resource_loader();
                let missing: Vec<&str> = locations
                    .iter()
                    .map(String::as_str)
                    .filter(|l| !loader.exists(l))
                    .collect();
                if missing.is_empty() {
                    ConditionOutcome::matched(format!(
                        "found resource {}",
                        quoted(locations.iter().map(String::as_str))
                    ))
                } else {
                    ConditionOutcome::no_match(format!(
                        "did not find resource {}",
                        quoted(missing.into_iter())
                    ))
                }
            }
            Condition::AnyOf(conditions) => {
                let outcomes: Vec<ConditionOutcome> =
                    conditions.iter().map(|c| c.evaluate(context)).collect();
                let messages: Vec<&str> = outcomes.iter().map(|o| o.message.as_str()).collect();
                if outcomes.iter().any(|o| o.matched) {
                    ConditionOutcome::matched(format!("any of: {}", messages.join("; ")))
                } else {
                    ConditionOutcome::no_match(format!("none of: {}", messages.join("; ")))
                }
            }
            Condition::Custom(custom) => (custom.check)(context),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::OnClass(_) => f.write_str("OnClass"),
            Condition::OnMissingClass(_) => f.write_str("OnMissingClass"),
            Condition::OnBean(_) => f.write_str("OnBean"),
            Condition::OnMissingBean(_) => f.write_str("OnMissingBean"),
            Condition::OnSingleCandidate(_) => f.write_str("OnSingleCandidate"),
            Condition::OnProperty(_) => f.write_str("OnProperty"),
            Condition::OnCloudPlatform(_) => f.write_str("OnCloudPlatform"),
            Condition::OnResource(_) => f.write_str("OnResource"),
            Condition::AnyOf(_) => f.write_str("AnyOf"),
            Condition::Custom(custom) => f.write_str(custom.name()),
        }
    }
}

impl From<PropertyCondition> for Condition {
    fn from(property: PropertyCondition) -> Self {
        Condition::OnProperty(property)
    }
}

fn quoted<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names
        .map(|n| format!("'{}'", n))
        .collect::<Vec<_>>()
        .join(", ")
}

fn type_names<'a>(types: impl Iterator<Item = &'a BeanType>) -> String {
    types
        .map(|t| t.simple_name())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    struct Fixture {
        environment: Environment,
        classpath: ClassPath,
        beans: BeanFactory,
    }

    impl Fixture {
        fn new(properties: &[&str]) -> Self {
            Self {
                environment: Environment::new().with_properties(properties.iter().copied()),
                classpath: ClassPath::new().with_class("com.example.Present"),
                beans: BeanFactory::new(),
            }
        }

        fn evaluate(&self, condition: impl Into<Condition>) -> ConditionOutcome {
            let context = ConditionContext::new(&self.environment, &self.classpath, &self.beans);
            condition.into().evaluate(&context)
        }
    }

    #[derive(Debug)]
    struct Widget;

    #[test]
    fn test_class_conditions() {
        let fixture = Fixture::new(&[]);
        assert!(fixture.evaluate(Condition::on_class("com.example.Present")).matched);
        let outcome = fixture.evaluate(Condition::on_classes(["com.example.Present", "com.example.Absent"]));
        assert!(!outcome.matched);
        assert_eq!(outcome.message, "did not find required class 'com.example.Absent'");
        assert!(fixture.evaluate(Condition::on_missing_class("com.example.Absent")).matched);
        assert!(!fixture.evaluate(Condition::on_missing_class("com.example.Present")).matched);
    }

    #[test]
    fn test_bean_conditions() {
        let fixture = Fixture::new(&[]);
        assert!(!fixture.evaluate(Condition::on_bean::<Widget>()).matched);
        assert!(fixture.evaluate(Condition::on_missing_bean::<Widget>()).matched);

        fixture.beans.register("first", Widget).unwrap();
        assert!(fixture.evaluate(Condition::on_bean::<Widget>()).matched);
        assert!(!fixture.evaluate(Condition::on_missing_bean::<Widget>()).matched);
        assert!(fixture.evaluate(Condition::on_single_candidate::<Widget>()).matched);

        fixture.beans.register("second", Widget).unwrap();
        let outcome = fixture.evaluate(Condition::on_single_candidate::<Widget>());
        assert!(!outcome.matched);
        assert!(outcome.message.contains("first, second"));

        fixture.beans.register_primary("third", Widget).unwrap();
        assert!(fixture.evaluate(Condition::on_single_candidate::<Widget>()).matched);
    }

    #[test]
    fn test_property_condition() {
        let fixture = Fixture::new(&["feature.enabled=true", "feature.mode=Fast", "other.flag=false"]);
        assert!(fixture.evaluate(PropertyCondition::new("feature", "enabled")).matched);
        assert!(fixture.evaluate(PropertyCondition::new("feature.", "mode").having_value("fast")).matched);
        assert!(!fixture.evaluate(PropertyCondition::new("feature", "mode").having_value("slow")).matched);
        assert!(!fixture.evaluate(PropertyCondition::new("other", "flag")).matched);

        let outcome = fixture.evaluate(PropertyCondition::new("feature", "missing"));
        assert!(!outcome.matched);
        assert_eq!(outcome.message, "did not find property feature.missing");
        assert!(fixture.evaluate(PropertyCondition::new("feature", "missing").match_if_missing()).matched);
        assert!(!fixture.evaluate(PropertyCondition::new("", "other.flag").match_if_missing()).matched);
    }

    #[test]
    fn test_property_condition_with_several_names() {
        let fixture = Fixture::new(&["a.x=on", "a.y=on"]);
        assert!(fixture.evaluate(PropertyCondition::new("a", "x").and_name("y")).matched);
        assert!(!fixture.evaluate(PropertyCondition::new("a", "x").and_name("z")).matched);
    }

    #[test]
    fn test_cloud_platform_condition() {
        let fixture = Fixture::new(&["spring.main.cloud-platform=heroku"]);
        assert!(fixture.evaluate(Condition::OnCloudPlatform(CloudPlatform::Heroku)).matched);
        assert!(!fixture.evaluate(Condition::OnCloudPlatform(CloudPlatform::CloudFoundry)).matched);
    }

    #[test]
    fn test_cloud_platform_condition_follows_enforced_platform() {
        let fixture = Fixture::new(&["DYNO=web.1", "spring.main.cloud-platform=kubernetes"]);
        let outcome = fixture.evaluate(Condition::OnCloudPlatform(CloudPlatform::Heroku));
        assert!(!outcome.matched);
        assert_eq!(outcome.message, "not running on HEROKU");
        assert!(fixture.evaluate(Condition::OnCloudPlatform(CloudPlatform::Kubernetes)).matched);
    }

    #[test]
    fn test_cloud_platform_condition_disabled_by_none() {
        let fixture = Fixture::new(&["VCAP_APPLICATION={}", "spring.main.cloud-platform=none"]);
        assert!(!fixture.evaluate(Condition::OnCloudPlatform(CloudPlatform::CloudFoundry)).matched);

        let detected = Fixture::new(&["VCAP_APPLICATION={}"]);
        assert!(detected.evaluate(Condition::OnCloudPlatform(CloudPlatform::CloudFoundry)).matched);
    }

    #[test]
    fn test_resource_and_any_of() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("hazelcast.xml"), "<hazelcast/>").unwrap();
        let mut fixture = Fixture::new(&[]);
        fixture.classpath = fixture.classpath.clone().with_resource_root(dir.path());

        assert!(fixture.evaluate(Condition::on_resource("classpath:hazelcast.xml")).matched);
        assert!(!fixture.evaluate(Condition::on_resource("hazelcast.yaml")).matched);

        let any = Condition::AnyOf(vec![
            Condition::on_resource("hazelcast.yaml"),
            Condition::on_resource("hazelcast.xml"),
        ]);
        assert!(fixture.evaluate(any).matched);
        let none = Condition::AnyOf(vec![Condition::on_class("com.example.Absent")]);
        assert!(!fixture.evaluate(none).matched);
    }

    #[test]
    fn test_custom_condition() {
        let fixture = Fixture::new(&["app.name=demo"]);
        let condition = Condition::Custom(CustomCondition::new("HasName", |ctx| {
            match ctx.environment.get_property("app.name") {
                Some(name) => ConditionOutcome::matched(format!("name is {}", name)),
                None => ConditionOutcome::no_match("no name"),
            }
        }));
        assert_eq!(condition.to_string(), "HasName");
        assert_eq!(fixture.evaluate(condition).message, "name is demo");
    }
}
