//! Exercise the translation path against the live inference API

use darija_translator::core::client::ProviderRegistry;
use darija_translator::core::models::{display_outcome, TranslationRequest};
use dotenvy::dotenv;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    println!("=== Translation smoke test ===");

    match std::env::var("HF_API_TOKEN") {
        Ok(_) => println!("✅ HF_API_TOKEN is set"),
        Err(_) => {
            println!("❌ HF_API_TOKEN is not set");
            return;
        }
    }

    let registry = match ProviderRegistry::from_env() {
        Ok(r) => {
            println!("✅ Registry created with {} providers", r.providers().len());
            r
        }
        Err(e) => {
            println!("❌ Registry creation failed: {}", e);
            return;
        }
    };

    for provider in registry.providers() {
        println!("   {} -> {}", provider.tag, provider.model_id);
    }

    let request = TranslationRequest::new("Hello, how are you?", "en", "ary");

    for tag in ["NLLB", "Terjman"] {
        println!("\n--- {} ---", tag);
        let client = match registry.client(tag) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ {}", e);
                continue;
            }
        };

        let outcome = client.translate(&request).await;
        match &outcome {
            Ok(translation) => {
                println!("✅ Translation succeeded");
                println!("   input:  {}", request.text);
                println!("   output: {}", translation.text);
            }
            Err(e) => {
                println!("❌ Translation failed: {}", e);
            }
        }
        println!("   display string: {}", display_outcome(tag, &outcome));
    }

    println!("\n=== Done ===");
}
