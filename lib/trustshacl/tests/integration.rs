#![expect(clippy::panic, clippy::panic_in_result_fn)]

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use trustshacl::{
    HttpRegistry, Registry, ShapeCache, ShapeLoadError, ShapeVerifier, StaticRegistry,
    ValidationResult, VerifierConfig, VerifyError,
};

const NS: &str = "https://example.org/tf#";

const MEMBER_SHAPE: &str = r#"
    @prefix sh: <http://www.w3.org/ns/shacl#> .
    @prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
    @prefix tf: <https://example.org/tf#> .

    tf:MemberShape a sh:NodeShape ;
        sh:targetClass tf:Member ;
        sh:property [
            sh:path tf:name ;
            sh:minCount 1 ;
            sh:datatype xsd:string
        ] ;
        sh:property [
            sh:path tf:address ;
            sh:node tf:AddressShape
        ] .

    tf:AddressShape a sh:NodeShape ;
        sh:property [
            sh:path tf:country ;
            sh:minCount 1 ;
            sh:pattern "^[A-Z]{2}$" ;
            sh:message "must be a country code"
        ] .
"#;

fn member_registry() -> StaticRegistry {
    StaticRegistry::new(["Member"]).with_shape("Member", MEMBER_SHAPE)
}

fn verifier(registry: StaticRegistry) -> ShapeVerifier<StaticRegistry> {
    ShapeVerifier::new(registry, VerifierConfig::new(NS))
}

fn member(extra: Value) -> Value {
    let mut document = json!({
        "@context": {"tf": NS},
        "@id": "https://example.org/members/1",
        "@type": "tf:Member"
    });
    if let (Some(document), Some(extra)) = (document.as_object_mut(), extra.as_object()) {
        document.extend(extra.clone());
    }
    document
}

#[tokio::test]
async fn test_conforming_member() -> Result<(), VerifyError> {
    let result = verifier(member_registry())
        .verify_shape(&member(json!({"tf:name": "Acme"})), "Member")
        .await?;
    assert_eq!(
        result,
        ValidationResult {
            conforms: true,
            results: Vec::new()
        }
    );
    Ok(())
}

#[tokio::test]
async fn test_shape_without_constraints_on_the_fields() -> Result<(), VerifyError> {
    let registry = StaticRegistry::new(["Member"]).with_shape(
        "Member",
        "@prefix sh: <http://www.w3.org/ns/shacl#> .
         <https://example.org/tf#MemberShape> a sh:NodeShape ;
             sh:targetClass <https://example.org/tf#Member> .",
    );
    let result = verifier(registry)
        .verify_shape(&member(json!({"tf:anything": 12})), "Member")
        .await?;
    assert!(result.conforms);
    assert!(result.results.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_violations_are_explained() -> Result<(), VerifyError> {
    let document = member(json!({
        "tf:address": {"@id": "https://example.org/addresses/1", "tf:country": "France"}
    }));
    let result = verifier(member_registry())
        .verify_shape(&document, "Member")
        .await?;
    assert!(!result.conforms);
    assert_eq!(result.results.len(), 2);
    assert!(result.results.iter().any(|message| message.starts_with(
        "ERROR: https://example.org/members/1 https://example.org/tf#name: "
    )));
    assert!(result.results.iter().any(|message| message.ends_with(
        "; DETAILS: https://example.org/tf#country: must be a country code;"
    )));
    Ok(())
}

#[tokio::test]
async fn test_unregistered_type_is_a_mismatch() {
    let document = json!({
        "@context": {"tf": NS},
        "@id": "https://example.org/members/1",
        "@type": "tf:Unregistered"
    });
    let result = verifier(member_registry())
        .verify_shape(&document, "Member")
        .await;
    let error = match result {
        Err(VerifyError::TrustFrameworkMismatch(error)) => error,
        other => panic!("an unregistered type must be rejected, got {other:?}"),
    };
    assert_eq!(error.unregistered(), [format!("{NS}Unregistered")]);
    assert_eq!(
        error.to_string(),
        "document contains a shape not defined in registry shapes"
    );
}

#[tokio::test]
async fn test_one_extra_type_fails_the_whole_document() {
    let mut document = member(json!({"tf:name": "Acme"}));
    document["@type"] = json!(["tf:Member", "https://other.example/Thing"]);
    let registry = member_registry();
    let verifier = verifier(registry);
    assert!(matches!(
        verifier.verify_shape(&document, "Member").await,
        Err(VerifyError::TrustFrameworkMismatch(_))
    ));
    assert_eq!(verifier.registry().shape_fetches(), 0);
}

#[tokio::test]
async fn test_presentation_with_bundled_contexts() -> Result<(), VerifyError> {
    let presentation = json!({
        "@context": ["https://www.w3.org/2018/credentials/v1", {"tf": NS}],
        "type": ["VerifiablePresentation"],
        "verifiableCredential": [{
            "@context": ["https://www.w3.org/2018/credentials/v1", {"tf": NS}],
            "type": ["VerifiableCredential"],
            "id": "https://example.org/credentials/1",
            "issuer": "did:example:issuer",
            "issuanceDate": "2024-01-01T00:00:00Z",
            "credentialSubject": {
                "id": "https://example.org/members/1",
                "type": "tf:Member",
                "tf:name": "Acme"
            }
        }]
    });
    let result = verifier(member_registry())
        .verify_shape(&presentation, "Member")
        .await?;
    assert!(result.conforms, "{:?}", result.results);
    Ok(())
}

#[tokio::test]
async fn test_json_ld_shape() -> Result<(), VerifyError> {
    let shape = json!({
        "@context": {
            "sh": "http://www.w3.org/ns/shacl#",
            "tf": NS,
            "sh:targetClass": {"@type": "@id"},
            "sh:path": {"@type": "@id"}
        },
        "@id": "tf:MemberShape",
        "@type": "sh:NodeShape",
        "sh:targetClass": "tf:Member",
        "sh:property": {"sh:path": "tf:name", "sh:maxCount": 1}
    });
    let registry = StaticRegistry::new(["Member"]).with_shape("Member", shape.to_string());
    let result = verifier(registry)
        .verify_shape(&member(json!({"tf:name": ["Acme", "ACME"]})), "Member")
        .await?;
    assert!(!result.conforms);
    assert_eq!(result.results.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_shape_is_loaded_once() -> Result<(), VerifyError> {
    let verifier = verifier(member_registry());
    let document = member(json!({"tf:name": "Acme"}));
    for _ in 0..3 {
        assert!(verifier.verify_shape(&document, "Member").await?.conforms);
    }
    assert_eq!(verifier.registry().shape_fetches(), 1);
    let first = verifier.get_shacl_shape("Member").await?;
    let second = verifier.get_shacl_shape("Member").await?;
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(verifier.registry().shape_fetches(), 1);
    assert_eq!(verifier.cache().cached_types(), ["Member"]);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_first_requests_share_the_load() {
    let verifier = Arc::new(verifier(member_registry()));
    let tasks = (0..16)
        .map(|i| {
            let verifier = Arc::clone(&verifier);
            tokio::spawn(async move {
                let document = member(json!({"tf:name": format!("Member {i}")}));
                verifier.verify_shape(&document, "Member").await
            })
        })
        .collect::<Vec<_>>();
    for task in tasks {
        assert!(matches!(task.await, Ok(Ok(ValidationResult { conforms: true, .. }))));
    }
    assert_eq!(verifier.registry().shape_fetches(), 1);
}

#[tokio::test]
async fn test_cache_is_shared_between_verifiers() -> Result<(), VerifyError> {
    let cache = Arc::new(ShapeCache::new());
    let first = verifier(member_registry()).with_cache(Arc::clone(&cache));
    let second = verifier(member_registry()).with_cache(Arc::clone(&cache));
    let document = member(json!({"tf:name": "Acme"}));
    first.verify_shape(&document, "Member").await?;
    second.verify_shape(&document, "Member").await?;
    assert_eq!(first.registry().shape_fetches(), 1);
    assert_eq!(second.registry().shape_fetches(), 0);
    assert_eq!(cache.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_malformed_shape_is_absorbed() -> Result<(), VerifyError> {
    let registry = StaticRegistry::new(["Member"]).with_shape("Member", "this is { not turtle");
    let verifier = verifier(registry);
    let result = verifier
        .verify_shape(&member(json!({"tf:name": "Acme"})), "Member")
        .await?;
    assert!(!result.conforms);
    assert_eq!(result.results.len(), 1);
    assert!(result.results[0].contains("static:shapes/Member"));
    assert!(verifier.cache().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_missing_shape_is_raised() {
    let verifier = verifier(StaticRegistry::new(["Member"]));
    let result = verifier
        .verify_shape(&member(json!({"tf:name": "Acme"})), "Member")
        .await;
    assert!(matches!(
        result,
        Err(VerifyError::ShapeLoad(ShapeLoadError::Fetch { .. }))
    ));
}

#[tokio::test]
async fn test_unreachable_registry_is_raised() -> std::io::Result<()> {
    let registry = HttpRegistry::new("http://127.0.0.1:9", Some(Duration::from_secs(2)), 0)?;
    assert_eq!(
        registry.shape_location("Member"),
        "http://127.0.0.1:9/shapes/Member"
    );
    let verifier = ShapeVerifier::new(registry, VerifierConfig::new(NS));
    let result = verifier
        .verify_shape(&member(json!({"tf:name": "Acme"})), "Member")
        .await;
    let error = match result {
        Err(VerifyError::ShapeLoad(error)) => error,
        other => panic!("the registry is unreachable, got {other:?}"),
    };
    assert_eq!(error.url(), "http://127.0.0.1:9/shapes/implemented");
    Ok(())
}
