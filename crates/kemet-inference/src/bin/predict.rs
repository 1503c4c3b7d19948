//! Kemet prediction runner
//!
//! Analyze a photograph of Egyptian artwork from the command line:
//!
//! ```bash
//! kemet-predict wall_painting.jpg
//! kemet-predict relief.png --speed regular --type temple
//! kemet-predict cartouche.jpg --json
//! ```

use std::env;
use std::path::PathBuf;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use kemet_core::{AnalysisOutcome, AnalysisRequest, ImageTypeHint, SpeedTier};
use kemet_inference::gemini::GeminiConfig;
use kemet_inference::ArtAnalyzer;

#[derive(Debug)]
struct Args {
    image_path: Option<PathBuf>,
    speed: SpeedTier,
    image_type: ImageTypeHint,
    json: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            image_path: None,
            speed: SpeedTier::default(),
            image_type: ImageTypeHint::default(),
            json: false,
        }
    }
}

fn parse_args() -> Args {
    let args: Vec<String> = env::args().collect();
    let mut parsed = Args::default();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--speed" | "-s" => {
                i += 1;
                if i < args.len() {
                    match SpeedTier::from_str_loose(&args[i]) {
                        Some(tier) => parsed.speed = tier,
                        None => eprintln!("Unknown speed: {}. Using fast.", args[i]),
                    }
                }
            }
            "--type" | "-t" => {
                i += 1;
                if i < args.len() {
                    match ImageTypeHint::from_str_loose(&args[i]) {
                        Some(hint) => parsed.image_type = hint,
                        None => eprintln!("Unknown image type: {}. Using unknown.", args[i]),
                    }
                }
            }
            "--json" => parsed.json = true,
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            other => {
                if !other.starts_with('-') && parsed.image_path.is_none() {
                    parsed.image_path = Some(PathBuf::from(other));
                }
            }
        }
        i += 1;
    }
    parsed
}

fn print_help() {
    println!(
        r#"kemet-predict - Egyptian art analysis from the command line

USAGE:
    kemet-predict <IMAGE> [OPTIONS]

ARGS:
    <IMAGE>    Path to the photograph to analyze

OPTIONS:
    -s, --speed <TIER>    Speed tier: regular, fast, super-fast [default: fast]
    -t, --type <HINT>     Site hint: tomb, temple, other, unknown [default: unknown]
        --json            Print the raw outcome envelope as JSON
    -h, --help            Show this help

ENVIRONMENT:
    GOOGLE_API_KEY        Gemini API key (GEMINI_API_KEY works as a fallback).
                          Also read from an env.local file in the working directory.

EXAMPLES:
    kemet-predict wall_painting.jpg
    kemet-predict relief.png --speed regular --type temple
    kemet-predict cartouche.jpg --json
"#
    );
}

fn banner() -> String {
    "═".repeat(80)
}

fn print_report(outcome: &AnalysisOutcome) {
    match outcome {
        AnalysisOutcome::Success {
            result,
            call_duration,
            ..
        } => {
            println!();
            println!("{}", banner());
            println!("EGYPTIAN ART ANALYSIS RESULTS");
            println!("{}", banner());

            println!("\nLOCATION:");
            println!("   {}", result.picture_location);

            println!("\nHISTORICAL PERIOD:");
            println!("   {}", result.date);

            println!("\nANCIENT TEXT TRANSLATION:");
            println!("   {}", result.ancient_text_translation);

            println!("\nCHARACTERS IDENTIFIED ({}):", result.characters.len());
            for (i, character) in result.characters.iter().enumerate() {
                println!("\n   {}. {}", i + 1, character.name);
                println!("      Location: {}", character.location);
                println!("      Reasoning: {}", character.reasoning);
                println!("      Description: {}", character.description);
            }

            println!("\nINTERESTING DETAIL:");
            println!("   {}", result.interesting_detail);

            println!("\nPROCESSING TIME:");
            println!("   {:.2} seconds", call_duration);

            println!("\n{}", banner());
        }
        AnalysisOutcome::Failure {
            reason,
            call_duration,
            trace,
        } => {
            println!();
            println!("{}", banner());
            println!("ANALYSIS FAILED");
            println!("{}", banner());

            println!("\nError: {}", reason);
            println!("\nFailed after {:.2} seconds", call_duration);
            if let Some(trace) = trace {
                println!("\nTraceback:\n{}", trace);
            }
            println!("\n{}", banner());
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // env.local carries local credentials; a plain .env works too.
    dotenvy::from_filename("env.local").ok();
    dotenvy::dotenv().ok();

    let args = parse_args();
    let image_path = match args.image_path {
        Some(path) => path,
        None => {
            eprintln!("Error: no image path given. See --help.");
            std::process::exit(1);
        }
    };

    if !image_path.exists() {
        eprintln!("Error: Image file not found: {}", image_path.display());
        std::process::exit(1);
    }

    let config = GeminiConfig::from_env();
    if !config.has_credential() {
        eprintln!("Error: No Google API key found!");
        eprintln!("Please set GOOGLE_API_KEY in env.local file or as environment variable.");
        std::process::exit(1);
    }

    println!("Analyzing image: {}", image_path.display());
    println!("Speed: {}, type hint: {}", args.speed, args.image_type);
    println!("Please wait...");

    let bytes = match std::fs::read(&image_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Error loading image: {}", e);
            std::process::exit(1);
        }
    };

    let mut request = AnalysisRequest::new(STANDARD.encode(&bytes));
    request.speed = args.speed;
    request.image_type = args.image_type;

    let analyzer = ArtAnalyzer::new(config);
    let outcome = analyzer.analyze(&request).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_report(&outcome);
    }

    std::process::exit(if outcome.is_success() { 0 } else { 1 });
}
