//! Relaxed property names.
//!
//! `spring.rabbitmq.virtualHost`, `spring.rabbitmq.virtual_host` and
//! `spring.rabbitmq.virtual-host` all name the same property. The canonical
//! form is lowercase kebab-case per dotted segment.

/// Canonical form of a property name.
pub fn canonical_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev: Option<char> = None;
    for c in name.chars() {
        match c {
            '_' | '-' => {
                if !matches!(prev, Some('-') | Some('.') | None) {
                    out.push('-');
                }
                prev = Some('-');
                continue;
            }
            '.' => out.push('.'),
            c if c.is_ascii_uppercase() => {
                if matches!(prev, Some(p) if p.is_ascii_lowercase() || p.is_ascii_digit()) {
                    out.push('-');
                }
                out.push(c.to_ascii_lowercase());
            }
            c => out.push(c),
        }
        prev = Some(c);
    }
    out
}

/// Environment-variable spellings of a property name, most specific first.
///
/// `spring.rabbitmq.virtual-host` maps to `SPRING_RABBITMQ_VIRTUAL_HOST` and
/// `SPRING_RABBITMQ_VIRTUALHOST`.
pub fn env_var_names(name: &str) -> Vec<String> {
    let canonical = canonical_name(name);
    let underscored = canonical.replace(&['.', '-'][..], "_").to_ascii_uppercase();
    let collapsed = canonical
        .replace('-', "")
        .replace('.', "_")
        .to_ascii_uppercase();
    if underscored == collapsed {
        vec![underscored]
    } else {
        vec![underscored, collapsed]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_forms_agree() {
        assert_eq!(canonical_name("spring.rabbitmq.virtualHost"), "spring.rabbitmq.virtual-host");
        assert_eq!(canonical_name("spring.rabbitmq.virtual_host"), "spring.rabbitmq.virtual-host");
        assert_eq!(canonical_name("spring.rabbitmq.virtual-host"), "spring.rabbitmq.virtual-host");
    }

    #[test]
    fn test_upper_case_env_names() {
        assert_eq!(canonical_name("VCAP_APPLICATION"), "vcap-application");
        assert_eq!(canonical_name("HC_LANDSCAPE"), "hc-landscape");
    }

    #[test]
    fn test_env_var_names() {
        assert_eq!(
            env_var_names("spring.rabbitmq.virtual-host"),
            vec!["SPRING_RABBITMQ_VIRTUAL_HOST", "SPRING_RABBITMQ_VIRTUALHOST"]
        );
        assert_eq!(env_var_names("spring.rabbitmq.host"), vec!["SPRING_RABBITMQ_HOST"]);
    }
}
