//! Load a Darija dataset from the catalog and print its shape

use darija_translator::core::config::TranslatorConfig;
use darija_translator::datasets::adapter::DatasetAdapter;
use darija_translator::datasets::cleaner::clean;
use darija_translator::datasets::convert::{convert_lenient, detect_arabizi};
use dotenvy::dotenv;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let name = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "atlasia/darija_english".to_string());

    println!("=== Dataset report: {} ===", name);

    let config = TranslatorConfig::default();
    let adapter = match DatasetAdapter::from_config(&config) {
        Ok(a) => a,
        Err(e) => {
            println!("❌ Adapter creation failed: {}", e);
            return;
        }
    };

    let Some(dataset) = adapter.load(&name).await else {
        println!("❌ Dataset could not be loaded (see log for the cause)");
        return;
    };

    let dataset = clean(dataset);

    for (label, table) in dataset.tables() {
        let split = if label.is_empty() { "all" } else { &label };
        println!("\n--- split {} ---", split);
        println!("   rows: {}  columns: {:?}", table.len(), table.columns);

        let mut arabizi = 0usize;
        for row in &table.rows {
            let sample = convert_lenient(row);
            if sample
                .includes_arabizi
                .unwrap_or_else(|| detect_arabizi(&sample.darija))
            {
                arabizi += 1;
            }
        }
        println!("   samples with arabizi: {}", arabizi);

        if let Some(row) = table.rows.first() {
            let sample = convert_lenient(row);
            println!("   first: en={:?} ary={:?}", sample.english, sample.darija);
        }
    }

    println!("\n=== Done ===");
}
