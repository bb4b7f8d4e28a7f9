//! Message broker client auto-configuration.

mod connection;
mod properties;

pub use connection::{
    AmqpAdmin, CachingConnectionFactory, ConnectionFactory, ConnectionFactoryCustomizer,
    ConnectionNameStrategy, MessageConverter, RabbitMessagingTemplate, RabbitOperations,
    RabbitRetryTemplateCustomizer, RabbitTemplate, RetryPolicy,
};
pub use properties::{
    Address, CacheMode, CacheSettings, PREFIX, RabbitProperties, RetrySettings, TemplateSettings,
};

use crate::condition::{Condition, PropertyCondition};
use crate::context::{AutoConfiguration, ConfigurationContext};
use bootkit_core::{BeanType, Result};
use std::sync::Arc;

pub const RABBIT_TEMPLATE_CLASS: &str = "org.springframework.amqp.rabbit.core.RabbitTemplate";
pub const CHANNEL_CLASS: &str = "com.rabbitmq.client.Channel";
pub const RABBIT_MESSAGING_TEMPLATE_CLASS: &str =
    "org.springframework.amqp.rabbit.core.RabbitMessagingTemplate";

/// Registers, each only when the application has not defined its own:
///
/// - `rabbitProperties`: [`RabbitProperties`] bound from `spring.rabbitmq.*`
/// - `rabbitConnectionFactory`: a [`CachingConnectionFactory`] as
///   `Arc<dyn ConnectionFactory>`
/// - `rabbitTemplate`: a [`RabbitTemplate`] on the single connection factory
/// - `amqpAdmin`: an [`AmqpAdmin`], unless `spring.rabbitmq.dynamic=false`
/// - `rabbitMessagingTemplate`: when the messaging class is available
#[derive(Debug, Default, Clone, Copy)]
pub struct RabbitAutoConfiguration;

impl AutoConfiguration for RabbitAutoConfiguration {
    fn name(&self) -> &str {
        "RabbitAutoConfiguration"
    }

    fn conditions(&self) -> Vec<Condition> {
        vec![Condition::on_classes([RABBIT_TEMPLATE_CLASS, CHANNEL_CLASS])]
    }

    fn configure(&self, context: &mut ConfigurationContext<'_>) -> Result<()> {
        context.bean(
            "rabbitProperties",
            vec![Condition::on_missing_bean::<RabbitProperties>()],
            |ctx| RabbitProperties::bind(ctx.environment()),
        )?;

        context.bean(
            "rabbitConnectionFactory",
            vec![Condition::on_missing_bean::<Arc<dyn ConnectionFactory>>()],
            |ctx| {
                let properties = ctx.require::<RabbitProperties>()?;
                let mut factory = CachingConnectionFactory::from_properties(&properties);
                for customizer in ctx
                    .beans()
                    .ordered_stream::<Arc<dyn ConnectionFactoryCustomizer>>()
                {
                    customizer.customize(&mut factory);
                }
                if let Some(strategy) = ctx.beans().get_if_unique::<Arc<dyn ConnectionNameStrategy>>() {
                    factory.connection_name = Some(strategy.obtain_new_connection_name(&factory));
                }
                Ok(Arc::new(factory) as Arc<dyn ConnectionFactory>)
            },
        )?;

        context.bean(
            "rabbitTemplate",
            vec![
                Condition::on_single_candidate::<Arc<dyn ConnectionFactory>>(),
                Condition::OnMissingBean(vec![
                    BeanType::of::<RabbitTemplate>(),
                    BeanType::of::<Arc<dyn RabbitOperations>>(),
                ]),
            ],
            |ctx| {
                let properties = ctx.require::<RabbitProperties>()?;
                let connection_factory = Arc::clone(&*ctx.require::<Arc<dyn ConnectionFactory>>()?);
                let template = &properties.template;

                let retry = template.retry.enabled.then(|| {
                    let mut policy = RetryPolicy::from(&template.retry);
                    for customizer in ctx
                        .beans()
                        .ordered_stream::<Arc<dyn RabbitRetryTemplateCustomizer>>()
                    {
                        customizer.customize(&mut policy);
                    }
                    policy
                });

                Ok(RabbitTemplate {
                    connection_factory,
                    message_converter: ctx
                        .beans()
                        .get_if_unique::<Arc<dyn MessageConverter>>()
                        .map(|converter| Arc::clone(&*converter)),
                    exchange: template.exchange.clone(),
                    routing_key: template.routing_key.clone(),
                    default_receive_queue: template.default_receive_queue.clone(),
                    mandatory: template.mandatory.unwrap_or(properties.publisher_returns),
                    receive_timeout: template.receive_timeout,
                    reply_timeout: template.reply_timeout,
                    retry,
                })
            },
        )?;

        context.bean(
            "amqpAdmin",
            vec![
                Condition::on_single_candidate::<Arc<dyn ConnectionFactory>>(),
                PropertyCondition::new(PREFIX, "dynamic").match_if_missing().into(),
                Condition::on_missing_bean::<AmqpAdmin>(),
            ],
            |ctx| {
                let connection_factory = ctx.require::<Arc<dyn ConnectionFactory>>()?;
                Ok(AmqpAdmin {
                    connection_factory: Arc::clone(&*connection_factory),
                    auto_startup: true,
                })
            },
        )?;

        context.bean(
            "rabbitMessagingTemplate",
            vec![
                Condition::on_class(RABBIT_MESSAGING_TEMPLATE_CLASS),
                Condition::on_missing_bean::<RabbitMessagingTemplate>(),
                Condition::on_single_candidate::<RabbitTemplate>(),
            ],
            |ctx| {
                Ok(RabbitMessagingTemplate {
                    template: ctx.require::<RabbitTemplate>()?,
                })
            },
        )?;
        Ok(())
    }
}
