use dsf_cards::diagnostics::{comp_cards_tsv, score_cards_tsv};
use dsf_cards::{extract_text, parse_comp_cards_report, parse_score_cards_report};
use std::env;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 || !matches!(args[1].as_str(), "score" | "comp" | "raw") {
        eprintln!("Usage: debug_cards <score|comp|raw> <pdf_path>");
        std::process::exit(1);
    }

    let text = match extract_text(&args[2]) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let anomaly = match args[1].as_str() {
        "score" => {
            let report = parse_score_cards_report(&text);
            print!("{}", score_cards_tsv(&report.entries));
            report.anomaly
        }
        "comp" => {
            let report = parse_comp_cards_report(&text);
            print!("{}", comp_cards_tsv(&report.entries));
            report.anomaly
        }
        _ => {
            for (line_no, line) in dsf_cards::cursor::split_lines(&text).iter().enumerate() {
                println!("{:5} {:?}", line_no + 1, line);
            }
            None
        }
    };

    if let Some(anomaly) = anomaly {
        eprintln!("stopped early: {}", anomaly);
    }
}
