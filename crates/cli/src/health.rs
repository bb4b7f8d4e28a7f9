use crate::{ClassPathArgs, ConfigArgs};
use bootkit_actuator::{HealthContributorRegistry, HttpCodeStatusMapper, Status};
use nu_ansi_term::Color;

pub fn run(config: ConfigArgs, classpath: ClassPathArgs) -> anyhow::Result<()> {
    let environment = bootkit_runtime::load_environment(config.config.as_deref())?;
    let context = bootkit_runtime::build_default_context(environment, classpath.to_classpath())?;

    let registry = context
        .bean::<HealthContributorRegistry>()
        .ok_or_else(|| anyhow::anyhow!("no health contributor registry in the context"))?;
    let mapper = context.bean::<HttpCodeStatusMapper>().unwrap_or_default();

    let health = registry.health();
    let code = mapper.status_code(&health.status);
    println!("Status: {} (HTTP {})", paint(&health.status), code);
    println!("{}", serde_json::to_string_pretty(&health)?);
    Ok(())
}

fn paint(status: &Status) -> String {
    let color = if *status == Status::UP {
        Color::LightGreen
    } else if *status == Status::DOWN || *status == Status::OUT_OF_SERVICE {
        Color::Red
    } else {
        Color::Yellow
    };
    color.bold().paint(status.code()).to_string()
}
