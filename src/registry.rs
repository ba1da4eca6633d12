use reqwest::{header, Client};

use crate::error::{Error, Result};
use crate::models::RegistryApp;

/// Fetches the names of the organisation's own applications. They are used as
/// the default set of internal libraries.
pub async fn fetch_internal_libraries(url: &str) -> Result<Vec<String>> {
    let client = Client::builder()
        .user_agent("dependabot-stats/0.1")
        .build()?;

    tracing::info!("Fetching internal libraries from {}", url);
    let response = client
        .get(url)
        .header(header::ACCEPT, "application/json")
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        return Err(Error::Registry(format!("{} returned {}", url, status)));
    }

    let body = response.text().await?;
    let names = parse_app_names(&body)?;
    tracing::info!("Registry lists {} applications", names.len());
    Ok(names)
}

pub fn parse_app_names(body: &str) -> Result<Vec<String>> {
    let apps: Vec<RegistryApp> = serde_json::from_str(body)?;
    Ok(apps.into_iter().map(|app| app.app_name).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_app_names_ignores_other_fields() {
        let body = r##"[
            {"app_name": "whitehall", "team": "#govuk-publishing"},
            {"app_name": "govuk_app_config", "retired": false}
        ]"##;
        let names = parse_app_names(body).unwrap();
        assert_eq!(names, vec!["whitehall", "govuk_app_config"]);
    }

    #[test]
    fn test_parse_app_names_rejects_non_list() {
        let err = parse_app_names(r#"{"app_name": "whitehall"}"#).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
