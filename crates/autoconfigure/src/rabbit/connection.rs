//! Broker client objects configured by [`RabbitAutoConfiguration`].
//!
//! These are plain values describing how a client would connect; nothing
//! here opens a socket.
//!
//! [`RabbitAutoConfiguration`]: super::RabbitAutoConfiguration

use super::properties::{CacheMode, RabbitProperties, RetrySettings};
use indexmap::IndexMap;
use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

/// Source of broker connections. Beans of this role are registered as
/// `Arc<dyn ConnectionFactory>`.
pub trait ConnectionFactory: Debug + Send + Sync {
    fn host(&self) -> &str;

    fn port(&self) -> u16;

    fn virtual_host(&self) -> &str;

    fn username(&self) -> &str;

    fn as_any(&self) -> &dyn Any;
}

/// Names each new connection.
pub trait ConnectionNameStrategy: Send + Sync {
    fn obtain_new_connection_name(&self, factory: &CachingConnectionFactory) -> String;
}

/// Adjusts the auto-configured connection factory before it is registered.
pub trait ConnectionFactoryCustomizer: Send + Sync {
    fn customize(&self, factory: &mut CachingConnectionFactory);
}

pub trait MessageConverter: Debug + Send + Sync {
    fn content_type(&self) -> &str;
}

pub trait RabbitRetryTemplateCustomizer: Send + Sync {
    fn customize(&self, policy: &mut RetryPolicy);
}

/// Publishing and receiving operations. Registering an
/// `Arc<dyn RabbitOperations>` bean disables the auto-configured template.
pub trait RabbitOperations: Send + Sync {
    fn exchange(&self) -> &str;

    fn routing_key(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq)]
pub struct CachingConnectionFactory {
    pub host: String,
    pub port: u16,
    pub addresses: String,
    pub username: String,
    pub password: String,
    pub virtual_host: String,
    pub ssl_enabled: bool,
    pub requested_heartbeat: Option<Duration>,
    pub requested_channel_max: Option<u32>,
    pub connection_timeout: Option<Duration>,
    pub publisher_returns: bool,
    pub cache_mode: CacheMode,
    pub channel_cache_size: Option<u32>,
    pub channel_checkout_timeout: Option<Duration>,
    pub connection_cache_size: Option<u32>,
    pub connection_name: Option<String>,
    pub client_properties: IndexMap<String, String>,
}

impl CachingConnectionFactory {
    pub fn from_properties(properties: &RabbitProperties) -> Self {
        Self {
            host: properties.determine_host(),
            port: properties.determine_port(),
            addresses: properties.determine_addresses(),
            username: properties.determine_username(),
            password: properties.determine_password(),
            virtual_host: properties
                .determine_virtual_host()
                .unwrap_or_else(|| "/".to_string()),
            ssl_enabled: properties.determine_ssl_enabled(),
            requested_heartbeat: properties.requested_heartbeat,
            requested_channel_max: properties.requested_channel_max,
            connection_timeout: properties.connection_timeout,
            publisher_returns: properties.publisher_returns,
            cache_mode: properties.cache.connection_mode,
            channel_cache_size: properties.cache.channel_size,
            channel_checkout_timeout: properties.cache.channel_checkout_timeout,
            connection_cache_size: properties.cache.connection_size,
            connection_name: None,
            client_properties: IndexMap::new(),
        }
    }
}

impl ConnectionFactory for CachingConnectionFactory {
    fn host(&self) -> &str {
        &self.host
    }

    fn port(&self) -> u16 {
        self.port
    }

    fn virtual_host(&self) -> &str {
        &self.virtual_host
    }

    fn username(&self) -> &str {
        &self.username
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_interval: Duration,
    pub multiplier: f64,
    pub max_interval: Duration,
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            max_attempts: settings.max_attempts,
            initial_interval: settings.initial_interval,
            multiplier: settings.multiplier,
            max_interval: settings.max_interval,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RabbitTemplate {
    pub connection_factory: Arc<dyn ConnectionFactory>,
    pub message_converter: Option<Arc<dyn MessageConverter>>,
    pub exchange: String,
    pub routing_key: String,
    pub default_receive_queue: Option<String>,
    pub mandatory: bool,
    pub receive_timeout: Option<Duration>,
    pub reply_timeout: Option<Duration>,
    /// `None` unless retries are enabled.
    pub retry: Option<RetryPolicy>,
}

impl RabbitOperations for RabbitTemplate {
    fn exchange(&self) -> &str {
        &self.exchange
    }

    fn routing_key(&self) -> &str {
        &self.routing_key
    }
}

/// Declares exchanges, queues and bindings on the broker.
#[derive(Debug, Clone)]
pub struct AmqpAdmin {
    pub connection_factory: Arc<dyn ConnectionFactory>,
    pub auto_startup: bool,
}

#[derive(Debug, Clone)]
pub struct RabbitMessagingTemplate {
    pub template: Arc<RabbitTemplate>,
}
