//! Hosting platform detection.
//!
//! Platforms are checked in declaration order and the first detected one
//! wins. Setting `spring.main.cloud-platform` overrides detection entirely:
//! it names the active platform, or `none` to disable detection.

use crate::env::{Environment, canonical_name};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::debug;

pub const CLOUD_PLATFORM_PROPERTY: &str = "spring.main.cloud-platform";

const KUBERNETES_SERVICE_HOST: &str = "KUBERNETES_SERVICE_HOST";
const KUBERNETES_SERVICE_PORT: &str = "KUBERNETES_SERVICE_PORT";
const SERVICE_HOST_SUFFIX: &str = "_SERVICE_HOST";
const SERVICE_PORT_SUFFIX: &str = "_SERVICE_PORT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CloudPlatform {
    CloudFoundry,
    Heroku,
    Sap,
    Kubernetes,
}

impl CloudPlatform {
    pub const ALL: [CloudPlatform; 4] = [
        CloudPlatform::CloudFoundry,
        CloudPlatform::Heroku,
        CloudPlatform::Sap,
        CloudPlatform::Kubernetes,
    ];

    /// The active platform, using the default detector.
    pub fn active(env: &Environment) -> Option<CloudPlatform> {
        CloudPlatformDetector::default().detect(env)
    }

    /// Whether the application runs on this platform. When
    /// `spring.main.cloud-platform` is set it alone decides; signals are
    /// only consulted when it is absent.
    pub fn is_active(&self, env: &Environment) -> bool {
        CloudPlatformDetector::default().is_active(*self, env)
    }

    /// Whether `spring.main.cloud-platform` names this platform.
    pub fn is_enforced(&self, env: &Environment) -> bool {
        matches!(enforced_platform(env), Some(Enforced::Platform(p)) if p == *self)
    }

    /// Whether signals identify this platform, including the default
    /// service-account directory check for Kubernetes.
    pub fn is_detected(&self, env: &Environment) -> bool {
        CloudPlatformDetector::default().is_detected(*self, env)
    }

    fn has_environment_signals(&self, env: &Environment) -> bool {
        match self {
            CloudPlatform::CloudFoundry => {
                env.contains_property("VCAP_APPLICATION") || env.contains_property("VCAP_SERVICES")
            }
            CloudPlatform::Heroku => env.contains_property("DYNO"),
            CloudPlatform::Sap => env.contains_property("HC_LANDSCAPE"),
            CloudPlatform::Kubernetes => is_kubernetes_environment(env),
        }
    }

    /// Whether the platform terminates TLS upstream and forwards headers.
    pub fn is_using_forward_headers(&self) -> bool {
        !matches!(self, CloudPlatform::Kubernetes)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CloudPlatform::CloudFoundry => "CLOUD_FOUNDRY",
            CloudPlatform::Heroku => "HEROKU",
            CloudPlatform::Sap => "SAP",
            CloudPlatform::Kubernetes => "KUBERNETES",
        }
    }
}

impl fmt::Display for CloudPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CloudPlatform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match canonical_name(s.trim()).as_str() {
            "cloud-foundry" | "cloudfoundry" => Ok(CloudPlatform::CloudFoundry),
            "heroku" => Ok(CloudPlatform::Heroku),
            "sap" => Ok(CloudPlatform::Sap),
            "kubernetes" => Ok(CloudPlatform::Kubernetes),
            _ => Err(format!("unknown cloud platform '{}'", s)),
        }
    }
}

enum Enforced {
    Platform(CloudPlatform),
    Disabled,
}

fn enforced_platform(env: &Environment) -> Option<Enforced> {
    let value = env.get_property(CLOUD_PLATFORM_PROPERTY)?;
    if value.trim().eq_ignore_ascii_case("none") {
        return Some(Enforced::Disabled);
    }
    match value.parse() {
        Ok(platform) => Some(Enforced::Platform(platform)),
        Err(e) => {
            debug!("Ignoring {}: {}", CLOUD_PLATFORM_PROPERTY, e);
            None
        }
    }
}

// Only the real process environment counts; a property file that happens to
// define *_SERVICE_HOST keys does not make the application a pod.
fn is_kubernetes_environment(env: &Environment) -> bool {
    let Some(source) = env.system_environment() else {
        return false;
    };
    if source.get(KUBERNETES_SERVICE_HOST).is_some() && source.get(KUBERNETES_SERVICE_PORT).is_some()
    {
        return true;
    }
    source.keys().iter().any(|key| {
        key.strip_suffix(SERVICE_HOST_SUFFIX)
            .filter(|service| !service.is_empty())
            .is_some_and(|service| {
                source
                    .get(&format!("{}{}", service, SERVICE_PORT_SUFFIX))
                    .is_some()
            })
    })
}

/// Detection with the filesystem check for the Kubernetes service account.
#[derive(Debug, Clone)]
pub struct CloudPlatformDetector {
    service_account_dir: Option<PathBuf>,
}

impl Default for CloudPlatformDetector {
    fn default() -> Self {
        Self {
            service_account_dir: Some(PathBuf::from("/var/run/secrets/kubernetes.io")),
        }
    }
}

impl CloudPlatformDetector {
    /// Detector that looks at the environment only.
    pub fn environment_only() -> Self {
        Self {
            service_account_dir: None,
        }
    }

    pub fn with_service_account_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.service_account_dir = Some(dir.into());
        self
    }

    pub fn detect(&self, env: &Environment) -> Option<CloudPlatform> {
        match enforced_platform(env) {
            Some(Enforced::Disabled) => return None,
            Some(Enforced::Platform(platform)) => return Some(platform),
            None => {}
        }
        let detected = CloudPlatform::ALL
            .into_iter()
            .find(|platform| self.is_detected(*platform, env));
        debug!("Detected cloud platform: {:?}", detected);
        detected
    }

    pub fn is_active(&self, platform: CloudPlatform, env: &Environment) -> bool {
        match enforced_platform(env) {
            Some(Enforced::Platform(enforced)) => enforced == platform,
            Some(Enforced::Disabled) => false,
            None => self.is_detected(platform, env),
        }
    }

    /// Signal-based detection only; `spring.main.cloud-platform` is ignored.
    pub fn is_detected(&self, platform: CloudPlatform, env: &Environment) -> bool {
        platform.has_environment_signals(env)
            || (platform == CloudPlatform::Kubernetes && self.has_service_account())
    }

    fn has_service_account(&self) -> bool {
        self.service_account_dir
            .as_ref()
            .is_some_and(|dir| dir.is_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{MapPropertySource, SystemEnvironmentPropertySource};
    use tempfile::tempdir;

    fn detector() -> CloudPlatformDetector {
        CloudPlatformDetector::environment_only()
    }

    fn with_property(key: &str, value: &str) -> Environment {
        let mut env = Environment::new();
        env.add_last(MapPropertySource::from_pairs("test", [(key, value)]));
        env
    }

    fn with_system_env(vars: &[(&str, &str)]) -> Environment {
        let mut env = Environment::new();
        env.add_last(SystemEnvironmentPropertySource::from_map(vars.iter().copied()));
        env
    }

    #[test]
    fn test_not_in_cloud() {
        assert_eq!(detector().detect(&Environment::new()), None);
    }

    #[test]
    fn test_vcap_application_is_cloud_foundry() {
        let env = with_property("VCAP_APPLICATION", "---");
        assert_eq!(detector().detect(&env), Some(CloudPlatform::CloudFoundry));
        assert!(CloudPlatform::CloudFoundry.is_active(&env));
    }

    #[test]
    fn test_vcap_services_is_cloud_foundry() {
        let env = with_property("VCAP_SERVICES", "---");
        assert_eq!(detector().detect(&env), Some(CloudPlatform::CloudFoundry));
    }

    #[test]
    fn test_dyno_is_heroku() {
        let env = with_property("DYNO", "---");
        assert_eq!(detector().detect(&env), Some(CloudPlatform::Heroku));
        assert!(CloudPlatform::Heroku.is_active(&env));
    }

    #[test]
    fn test_hc_landscape_is_sap() {
        let env = with_property("HC_LANDSCAPE", "---");
        assert_eq!(detector().detect(&env), Some(CloudPlatform::Sap));
    }

    #[test]
    fn test_service_host_and_port_is_kubernetes() {
        let env = with_system_env(&[
            ("EXAMPLE_SERVICE_HOST", "---"),
            ("EXAMPLE_SERVICE_PORT", "8080"),
        ]);
        assert_eq!(detector().detect(&env), Some(CloudPlatform::Kubernetes));
        assert!(!CloudPlatform::Kubernetes.is_using_forward_headers());
    }

    #[test]
    fn test_kubernetes_service_variables() {
        let env = with_system_env(&[
            ("KUBERNETES_SERVICE_HOST", "10.0.0.1"),
            ("KUBERNETES_SERVICE_PORT", "443"),
        ]);
        assert_eq!(detector().detect(&env), Some(CloudPlatform::Kubernetes));
    }

    #[test]
    fn test_service_host_without_port_is_not_kubernetes() {
        let env = with_system_env(&[("EXAMPLE_SERVICE_HOST", "---")]);
        assert_eq!(detector().detect(&env), None);
    }

    #[test]
    fn test_service_variables_outside_system_environment_are_ignored() {
        let mut env = Environment::new();
        env.add_last(MapPropertySource::from_pairs(
            "file",
            [("EXAMPLE_SERVICE_HOST", "---"), ("EXAMPLE_SERVICE_PORT", "80")],
        ));
        assert_eq!(detector().detect(&env), None);
    }

    #[test]
    fn test_service_account_directory() {
        let dir = tempdir().unwrap();
        let detector = CloudPlatformDetector::environment_only().with_service_account_dir(dir.path());
        assert_eq!(detector.detect(&Environment::new()), Some(CloudPlatform::Kubernetes));

        let missing = CloudPlatformDetector::environment_only()
            .with_service_account_dir(dir.path().join("absent"));
        assert_eq!(missing.detect(&Environment::new()), None);
    }

    #[test]
    fn test_enforced_platform_wins() {
        let mut env = with_property("DYNO", "---");
        env.add_first(MapPropertySource::from_pairs(
            "override",
            [(CLOUD_PLATFORM_PROPERTY, "kubernetes")],
        ));
        assert_eq!(detector().detect(&env), Some(CloudPlatform::Kubernetes));
        assert!(CloudPlatform::Kubernetes.is_enforced(&env));
        assert!(!CloudPlatform::Heroku.is_enforced(&env));
    }

    #[test]
    fn test_enforced_none_disables_detection() {
        let mut env = with_property("VCAP_APPLICATION", "---");
        env.add_first(MapPropertySource::from_pairs(
            "override",
            [(CLOUD_PLATFORM_PROPERTY, "NONE")],
        ));
        assert_eq!(detector().detect(&env), None);
    }

    #[test]
    fn test_enforced_none_deactivates_detected_platform() {
        let mut env = with_property("VCAP_APPLICATION", "---");
        env.add_first(MapPropertySource::from_pairs(
            "override",
            [(CLOUD_PLATFORM_PROPERTY, "none")],
        ));
        let detector = detector();
        assert!(detector.is_detected(CloudPlatform::CloudFoundry, &env));
        assert!(!detector.is_active(CloudPlatform::CloudFoundry, &env));
        assert!(!CloudPlatform::CloudFoundry.is_active(&env));
    }

    #[test]
    fn test_enforced_platform_deactivates_other_signals() {
        let mut env = with_property("DYNO", "---");
        env.add_first(MapPropertySource::from_pairs(
            "override",
            [(CLOUD_PLATFORM_PROPERTY, "kubernetes")],
        ));
        assert!(!CloudPlatform::Heroku.is_active(&env));
        assert!(CloudPlatform::Kubernetes.is_active(&env));
        assert!(!detector().is_active(CloudPlatform::Heroku, &env));
    }

    #[test]
    fn test_service_account_counts_as_kubernetes_detection() {
        let dir = tempdir().unwrap();
        let detector = CloudPlatformDetector::environment_only().with_service_account_dir(dir.path());
        let env = Environment::new();
        assert!(detector.is_detected(CloudPlatform::Kubernetes, &env));
        assert!(detector.is_active(CloudPlatform::Kubernetes, &env));
        assert!(!detector.is_detected(CloudPlatform::Heroku, &env));
        assert_eq!(detector.detect(&env), Some(CloudPlatform::Kubernetes));
    }

    #[test]
    fn test_platform_names_parse_loosely() {
        assert_eq!("cloud_foundry".parse::<CloudPlatform>(), Ok(CloudPlatform::CloudFoundry));
        assert_eq!("CLOUD_FOUNDRY".parse::<CloudPlatform>(), Ok(CloudPlatform::CloudFoundry));
        assert_eq!("Heroku".parse::<CloudPlatform>(), Ok(CloudPlatform::Heroku));
        assert!("azure".parse::<CloudPlatform>().is_err());
    }
}
