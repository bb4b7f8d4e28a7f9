pub mod beans;
pub mod classpath;
pub mod cloud;
pub mod config;
pub mod env;
pub mod error;
pub mod logging;

pub use beans::{BeanFactory, BeanOptions, BeanType};
pub use classpath::{ClassPath, Resource, ResourceLoader};
pub use cloud::{CloudPlatform, CloudPlatformDetector};
pub use config::ConfigFileLoader;
pub use env::{Environment, MapPropertySource, PropertySource, SystemEnvironmentPropertySource};
pub use error::{BootError, Result};
