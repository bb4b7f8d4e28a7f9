use crate::ConfigArgs;
use bootkit_core::CloudPlatformDetector;
use nu_ansi_term::Color;

pub fn run(config: ConfigArgs) -> anyhow::Result<()> {
    let environment = bootkit_runtime::load_environment(config.config.as_deref())?;
    match CloudPlatformDetector::default().detect(&environment) {
        Some(platform) => {
            println!("Platform:        {}", Color::LightGreen.bold().paint(platform.as_str()));
            println!("Forward headers: {}", platform.is_using_forward_headers());
        }
        None => println!("Platform:        {}", Color::Yellow.paint("none")),
    }
    Ok(())
}
