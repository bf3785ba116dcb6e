use tersify::config::RuntimeMode;
use tersify::{endpoint::candidates, Endpoint, ResolverInputs};

fn strings(list: Vec<Endpoint>) -> Vec<String> {
    list.into_iter().map(|e| e.to_string()).collect()
}

#[test]
fn test_development_always_uses_localhost() {
    let inputs = ResolverInputs {
        mode: RuntimeMode::Development,
        api_url: Some("https://api.example.com".to_string()),
        site_url: None,
    };

    assert_eq!(
        strings(candidates(&inputs, "/api/summary_gen")),
        vec![
            "http://localhost:3000/api/summary_gen/",
            "http://localhost:3000/api/summary_gen",
            "/api/summary_gen/",
            "/api/summary_gen",
        ]
    );
}

#[test]
fn test_production_prefers_api_url_then_site_url() {
    let mut inputs = ResolverInputs {
        mode: RuntimeMode::Production,
        api_url: Some("https://api.example.com/".to_string()),
        site_url: Some("https://site.example.com".to_string()),
    };
    assert_eq!(inputs.base_url(), "https://api.example.com");

    inputs.api_url = Some("   ".to_string());
    assert_eq!(inputs.base_url(), "https://site.example.com");

    inputs.site_url = None;
    assert_eq!(inputs.base_url(), "http://localhost:3000");
}

#[test]
fn test_list_ends_with_bare_relative_path() {
    let inputs = ResolverInputs::default();
    let list = candidates(&inputs, "api/summary_gen/");

    assert_eq!(list.len(), 4);
    assert!(matches!(list[0], Endpoint::Absolute(_)));
    assert_eq!(list[3], Endpoint::Relative("/api/summary_gen".to_string()));
}
