//! Building an application context from user beans and auto-configurations.

use crate::condition::{Condition, ConditionContext};
use crate::report::ConditionEvaluationReport;
use bootkit_core::{
    BeanFactory, BeanOptions, BeanType, BootError, ClassPath, Environment, ResourceLoader, Result,
};
use std::any::Any;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Names auto-configurations to skip, comma separated.
pub const EXCLUDE_PROPERTY: &str = "spring.autoconfigure.exclude";

/// A conditional bundle of bean definitions.
pub trait AutoConfiguration: Send + Sync {
    fn name(&self) -> &str;

    /// Class-level conditions. When one fails, `configure` is not called.
    fn conditions(&self) -> Vec<Condition> {
        Vec::new()
    }

    fn configure(&self, context: &mut ConfigurationContext<'_>) -> Result<()>;
}

/// Handed to [`AutoConfiguration::configure`]; registers beans whose own
/// conditions match.
pub struct ConfigurationContext<'a> {
    source: String,
    environment: &'a Environment,
    classpath: &'a ClassPath,
    beans: &'a BeanFactory,
    report: &'a mut ConditionEvaluationReport,
}

impl<'a> ConfigurationContext<'a> {
    /// A context for a nested group of beans, reported as
    /// `Outer.Nested#bean`.
    pub fn nested(&mut self, name: &str) -> ConfigurationContext<'_> {
        ConfigurationContext {
            source: format!("{}.{}", self.source, name),
            environment: self.environment,
            classpath: self.classpath,
            beans: self.beans,
            report: &mut *self.report,
        }
    }

    pub fn environment(&self) -> &Environment {
        self.environment
    }

    pub fn classpath(&self) -> &ClassPath {
        self.classpath
    }

    pub fn beans(&self) -> &BeanFactory {
        self.beans
    }

    pub fn resource_loader(&self) -> ResourceLoader {
        self.classpath.resource_loader()
    }

    /// The single candidate bean of type `T`, or an error naming the type.
    pub fn require<T: Any + Send + Sync>(&self) -> Result<Arc<T>> {
        self.beans.single_candidate::<T>().ok_or_else(|| {
            BootError::Internal(format!(
                "No qualifying bean of type '{}' available",
                BeanType::of::<T>().simple_name()
            ))
        })
    }

    /// Evaluate `conditions` and, when all match, register the bean built by
    /// `factory` under `name`. Returns the bean, or `None` when a condition
    /// did not match.
    pub fn bean<T, F>(&mut self, name: &str, conditions: Vec<Condition>, factory: F) -> Result<Option<Arc<T>>>
    where
        T: Any + Send + Sync,
        F: FnOnce(&ConfigurationContext<'_>) -> Result<T>,
    {
        self.bean_with(name, conditions, BeanOptions::default(), factory)
    }

    pub fn bean_with<T, F>(
        &mut self,
        name: &str,
        conditions: Vec<Condition>,
        options: BeanOptions,
        factory: F,
    ) -> Result<Option<Arc<T>>>
    where
        T: Any + Send + Sync,
        F: FnOnce(&ConfigurationContext<'_>) -> Result<T>,
    {
        let source = format!("{}#{}", self.source, name);
        if !self.matches(&source, &conditions) {
            return Ok(None);
        }

        let bean = factory(&*self).map_err(|err| into_bean_creation(name, err))?;
        self.beans.register_with(name, bean, options).map(Some)
    }

    /// Like [`bean`](Self::bean) for factories that hand out shared
    /// instances.
    pub fn bean_arc<T, F>(&mut self, name: &str, conditions: Vec<Condition>, factory: F) -> Result<Option<Arc<T>>>
    where
        T: Any + Send + Sync,
        F: FnOnce(&ConfigurationContext<'_>) -> Result<Arc<T>>,
    {
        let source = format!("{}#{}", self.source, name);
        if !self.matches(&source, &conditions) {
            return Ok(None);
        }

        let bean = factory(&*self).map_err(|err| into_bean_creation(name, err))?;
        self.beans
            .register_arc(name, bean, BeanOptions::default())
            .map(Some)
    }

    fn matches(&mut self, source: &str, conditions: &[Condition]) -> bool {
        evaluate(
            source,
            conditions,
            ConditionContext::new(self.environment, self.classpath, self.beans),
            &mut *self.report,
        )
    }
}

fn into_bean_creation(name: &str, err: BootError) -> BootError {
    match err {
        BootError::BeanCreation { .. } => err,
        other => BootError::bean_creation(name, other.to_string()),
    }
}

/// Records outcomes in order and stops at the first condition that fails.
fn evaluate(
    source: &str,
    conditions: &[Condition],
    context: ConditionContext<'_>,
    report: &mut ConditionEvaluationReport,
) -> bool {
    if conditions.is_empty() {
        report.record_unconditional(source);
        return true;
    }
    for condition in conditions {
        let outcome = condition.evaluate(&context);
        let matched = outcome.matched;
        debug!("{} {}: {}", source, condition, outcome.message);
        report.record(source, condition, outcome);
        if !matched {
            return false;
        }
    }
    true
}

type BeanRegistration = Box<dyn FnOnce(&BeanFactory) -> Result<()> + Send>;

/// Assembles an [`ApplicationContext`].
///
/// User beans are registered first so that `OnMissingBean` conditions see
/// them; auto-configurations then run in the order they were added.
pub struct ApplicationContextBuilder {
    environment: Environment,
    classpath: ClassPath,
    user_beans: Vec<BeanRegistration>,
    configurations: Vec<Box<dyn AutoConfiguration>>,
    exclusions: HashSet<String>,
}

impl ApplicationContextBuilder {
    pub fn new() -> Self {
        Self {
            environment: Environment::new(),
            classpath: ClassPath::new(),
            user_beans: Vec::new(),
            configurations: Vec::new(),
            exclusions: HashSet::new(),
        }
    }

    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Inline `key=value` properties on top of the current environment.
    pub fn with_properties<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.environment = self.environment.with_properties(entries);
        self
    }

    pub fn classpath(mut self, classpath: ClassPath) -> Self {
        self.classpath = classpath;
        self
    }

    pub fn with_bean<T: Any + Send + Sync>(self, name: impl Into<String>, bean: T) -> Self {
        self.with_bean_options(name, bean, BeanOptions::default())
    }

    pub fn with_primary_bean<T: Any + Send + Sync>(self, name: impl Into<String>, bean: T) -> Self {
        self.with_bean_options(name, bean, BeanOptions::primary())
    }

    pub fn with_bean_options<T: Any + Send + Sync>(
        mut self,
        name: impl Into<String>,
        bean: T,
        options: BeanOptions,
    ) -> Self {
        let name = name.into();
        self.user_beans.push(Box::new(move |beans: &BeanFactory| {
            beans.register_with(name, bean, options).map(|_| ())
        }));
        self
    }

    pub fn with_configuration(mut self, configuration: impl AutoConfiguration + 'static) -> Self {
        self.configurations.push(Box::new(configuration));
        self
    }

    pub fn with_configurations(
        mut self,
        configurations: impl IntoIterator<Item = Box<dyn AutoConfiguration>>,
    ) -> Self {
        self.configurations.extend(configurations);
        self
    }

    pub fn exclude(mut self, name: impl Into<String>) -> Self {
        self.exclusions.insert(name.into());
        self
    }

    pub fn build(self) -> Result<ApplicationContext> {
        let Self {
            environment,
            classpath,
            user_beans,
            configurations,
            mut exclusions,
        } = self;
        exclusions.extend(environment.get_list(EXCLUDE_PROPERTY));

        let beans = BeanFactory::new();
        for register in user_beans {
            register(&beans)?;
        }

        let mut report = ConditionEvaluationReport::new();
        let mut applied = 0usize;
        for configuration in &configurations {
            let name = configuration.name();
            if exclusions.contains(name) {
                debug!("Skipping excluded auto-configuration {}", name);
                report.record_exclusion(name);
                continue;
            }

            let conditions = configuration.conditions();
            let context = ConditionContext::new(&environment, &classpath, &beans);
            if !evaluate(name, &conditions, context, &mut report) {
                continue;
            }

            let mut configuration_context = ConfigurationContext {
                source: name.to_string(),
                environment: &environment,
                classpath: &classpath,
                beans: &beans,
                report: &mut report,
            };
            configuration.configure(&mut configuration_context)?;
            applied += 1;
        }

        info!(
            "Application context ready: {} beans, {} of {} auto-configurations applied",
            beans.len(),
            applied,
            configurations.len()
        );
        Ok(ApplicationContext {
            beans,
            environment,
            classpath,
            report,
        })
    }
}

impl Default for ApplicationContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct ApplicationContext {
    beans: BeanFactory,
    environment: Environment,
    classpath: ClassPath,
    report: ConditionEvaluationReport,
}

impl ApplicationContext {
    pub fn builder() -> ApplicationContextBuilder {
        ApplicationContextBuilder::new()
    }

    pub fn beans(&self) -> &BeanFactory {
        &self.beans
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn classpath(&self) -> &ClassPath {
        &self.classpath
    }

    pub fn report(&self) -> &ConditionEvaluationReport {
        &self.report
    }

    pub fn get_bean<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        self.beans.get_bean(name)
    }

    /// The single candidate of type `T`.
    pub fn bean<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.beans.single_candidate()
    }

    pub fn contains_bean(&self, name: &str) -> bool {
        self.beans.contains_bean(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::PropertyCondition;

    #[derive(Debug, PartialEq)]
    struct Greeting(String);

    struct GreetingAutoConfiguration;

    impl AutoConfiguration for GreetingAutoConfiguration {
        fn name(&self) -> &str {
            "GreetingAutoConfiguration"
        }

        fn conditions(&self) -> Vec<Condition> {
            vec![Condition::on_class("com.example.Greeter")]
        }

        fn configure(&self, context: &mut ConfigurationContext<'_>) -> Result<()> {
            context.bean(
                "greeting",
                vec![
                    Condition::on_missing_bean::<Greeting>(),
                    PropertyCondition::new("greeting", "enabled").match_if_missing().into(),
                ],
                |ctx| {
                    let text = ctx.environment().get_property_or("greeting.text", "hello");
                    Ok(Greeting(text))
                },
            )?;
            Ok(())
        }
    }

    struct FailingAutoConfiguration;

    impl AutoConfiguration for FailingAutoConfiguration {
        fn name(&self) -> &str {
            "FailingAutoConfiguration"
        }

        fn configure(&self, context: &mut ConfigurationContext<'_>) -> Result<()> {
            context.bean::<Greeting, _>("broken", Vec::new(), |ctx| {
                ctx.environment().get_required_property("missing.key").map(Greeting)
            })?;
            Ok(())
        }
    }

    fn builder() -> ApplicationContextBuilder {
        ApplicationContext::builder()
            .classpath(ClassPath::new().with_class("com.example.Greeter"))
            .with_configuration(GreetingAutoConfiguration)
    }

    #[test]
    fn test_auto_configured_bean() {
        let context = builder().with_properties(["greeting.text=hi"]).build().unwrap();
        assert_eq!(context.bean::<Greeting>().as_deref(), Some(&Greeting("hi".into())));
        assert_eq!(
            context.report().positive_matches(),
            vec!["GreetingAutoConfiguration", "GreetingAutoConfiguration#greeting"]
        );
    }

    #[test]
    fn test_user_bean_backs_off_auto_configuration() {
        let context = builder()
            .with_bean("myGreeting", Greeting("custom".into()))
            .build()
            .unwrap();
        assert_eq!(context.beans().bean_names(), vec!["myGreeting"]);
        assert_eq!(
            context.report().is_full_match("GreetingAutoConfiguration#greeting"),
            Some(false)
        );
    }

    #[test]
    fn test_missing_class_skips_configuration() {
        let context = ApplicationContext::builder()
            .with_configuration(GreetingAutoConfiguration)
            .build()
            .unwrap();
        assert!(context.beans().is_empty());
        assert_eq!(context.report().negative_matches(), vec!["GreetingAutoConfiguration"]);
    }

    #[test]
    fn test_exclusions() {
        let context = builder().exclude("GreetingAutoConfiguration").build().unwrap();
        assert!(context.beans().is_empty());
        assert_eq!(context.report().exclusions(), ["GreetingAutoConfiguration".to_string()]);

        let context = builder()
            .with_properties(["spring.autoconfigure.exclude=Other, GreetingAutoConfiguration"])
            .build()
            .unwrap();
        assert!(context.beans().is_empty());
    }

    #[test]
    fn test_bean_creation_failure_names_the_bean() {
        let err = ApplicationContext::builder()
            .with_configuration(FailingAutoConfiguration)
            .build()
            .unwrap_err();
        match err {
            BootError::BeanCreation { bean, message } => {
                assert_eq!(bean, "broken");
                assert!(message.contains("missing.key"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
