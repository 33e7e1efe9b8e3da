//! Environment overrides for the advisory config.

use agrigrow::config::AgriConfig;
use std::time::Duration;

// Single test so the env mutations never race another test in this
// binary.
#[test]
fn test_from_env_overrides_every_recognized_option() {
    let vars = [
        ("AGRIGROW_EMBEDDING_MODEL", "custom-embed"),
        ("AGRIGROW_TEXT_MODEL", "custom-text"),
        ("AGRIGROW_VISION_MODEL", "custom-vision"),
        ("AGRIGROW_TREATMENTS_NAMESPACE", "remedies"),
        ("AGRIGROW_SCHEMES_NAMESPACE", "programs"),
        ("AGRIGROW_UPSERT_CHUNK_SIZE", "25"),
        ("AGRIGROW_EMBED_BATCH_SIZE", "4"),
        ("AGRIGROW_TREATMENT_TOP_K", "7"),
        ("AGRIGROW_SCHEME_TOP_K", "3"),
        ("AGRIGROW_MAX_IMAGE_BYTES", "1024"),
        ("AGRIGROW_IMAGE_MIME", "image/png"),
        ("AGRIGROW_TIMEOUT_SECS", "9"),
        ("AGRIGROW_MAX_RETRIES", "5"),
    ];
    for (key, value) in vars {
        std::env::set_var(key, value);
    }

    let config = AgriConfig::from_env();

    for (key, _) in vars {
        std::env::remove_var(key);
    }

    assert_eq!(config.embedding_model, "custom-embed");
    assert_eq!(config.text_model, "custom-text");
    assert_eq!(config.vision_model, "custom-vision");
    assert_eq!(config.treatments_namespace, "remedies");
    assert_eq!(config.schemes_namespace, "programs");
    assert_eq!(config.upsert_chunk_size, 25);
    assert_eq!(config.embed_batch_size, 4);
    assert_eq!(config.treatment_top_k, 7);
    assert_eq!(config.scheme_top_k, 3);
    assert_eq!(config.max_image_bytes, 1024);
    assert_eq!(config.accepted_image_mime, "image/png");
    assert_eq!(config.request_timeout, Duration::from_secs(9));
    assert_eq!(config.max_retries, 5);

    // Unparseable numbers are ignored, not fatal.
    std::env::set_var("AGRIGROW_TIMEOUT_SECS", "not-a-number");
    let config = AgriConfig::from_env();
    std::env::remove_var("AGRIGROW_TIMEOUT_SECS");
    assert_eq!(config.request_timeout, AgriConfig::default().request_timeout);
}
