use crate::context::{Context, Value};
use std::path::{Path, PathBuf};

/// A representative omnibus configuration template: proxy ports, TLS flags,
/// forwarded headers and an SMTP relay.
pub(crate) const OMNIBUS_TEMPLATE: &str = r#"external_url 'https://gitlab.{{ domain }}/'
letsencrypt['enable'] = false

nginx['listen_port'] = 8181
nginx['listen_https'] = false
nginx['proxy_set_headers'] = {
  "Host" => "$http_host",
  "X-Forwarded-Proto" => "https",
  "X-Forwarded-Ssl" => "on"
}

registry_external_url 'https://registry.gitlab.{{domain}}'
registry_nginx['listen_port'] = 5100

pages_external_url 'https://pages.gitlab.{{domain}}'
pages_nginx['listen_port'] = 5200

gitlab_rails['smtp_enable'] = true
gitlab_rails['smtp_address'] = "{{ smtp_host }}"
gitlab_rails['smtp_port'] = {{ smtp_port }}
gitlab_rails['smtp_user_name'] = "{{ smtp_user }}"
gitlab_rails['smtp_password'] = "{{ smtp_password }}"
gitlab_rails['smtp_enable_starttls_auto'] = true
"#;

pub(crate) fn omnibus_context() -> Context {
    [
        ("domain", Value::from("example.org")),
        ("smtp_host", Value::from("mail.example.org")),
        ("smtp_port", Value::Int(587)),
        ("smtp_user", Value::from("gitlab@example.org")),
        ("smtp_password", Value::from("s3cret")),
    ]
    .into_iter()
    .collect()
}

/// Write `content` to `dir/name` and return the full path.
pub(crate) fn write_fixture(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}
