//! Example: Extract articles from a few live pages and summarise them
//!
//! Run with: cargo run -p articlekit --example extract_urls

use articlekit::{extract, Extraction, ExtractionRequest};

/// Page to try and what its extraction should look like
struct Case {
    url: &'static str,
    description: &'static str,
    expect_text: Option<&'static str>,
}

const CASES: &[Case] = &[
    Case {
        url: "https://example.com",
        description: "Minimal HTML page",
        expect_text: Some("illustrative examples"),
    },
    Case {
        url: "https://httpbin.org/html",
        description: "Long prose page",
        expect_text: Some("Moby-Dick"),
    },
    Case {
        url: "https://httpbin.org/status/404",
        description: "Missing page",
        expect_text: None,
    },
];

#[tokio::main]
async fn main() {
    println!("ArticleKit Extraction Examples");
    println!("==============================\n");

    let mut failed = 0;

    for (i, case) in CASES.iter().enumerate() {
        println!("{}. {}", i + 1, case.description);
        println!("   URL: {}", case.url);

        let ok = match extract(ExtractionRequest::new(case.url)).await {
            Ok(extraction) => {
                print_summary(&extraction);
                match (case.expect_text, extraction.article()) {
                    (Some(text), Some(result)) => result.article.article_text.contains(text),
                    _ => false,
                }
            }
            Err(e) => {
                println!("   Error: {}", e);
                case.expect_text.is_none()
            }
        };

        if ok {
            println!("   ✓ PASS\n");
        } else {
            println!("   ✗ FAIL\n");
            failed += 1;
        }
    }

    if failed > 0 {
        std::process::exit(1);
    }
}

fn print_summary(extraction: &Extraction) {
    match extraction {
        Extraction::Article(result) => {
            println!("   Title: {}", result.article.title);
            println!("   Domain: {}", result.article.domain);
            println!("   Main image: {}", result.main_image);
            let preview: String = result.article.article_text.chars().take(100).collect();
            println!("   Preview: {}", preview.replace('\n', " "));
        }
        Extraction::Failed(err) => println!("   {}", err.error),
    }
}
