//! CLI tool for inspecting CV transcripts
//!
//! Usage: cv-inspect <file>... [--markup <document.xml>] [--json]

use cv_inspector::{load_source, process_cv_batch, CvAnalysis, CvAnalyzer, CvError, ExperienceEntry};
use std::env;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

fn json_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn to_json(file: &str, analysis: &CvAnalysis) -> String {
    let missing: Vec<String> = analysis.missing_fields().iter().map(|f| json_str(f)).collect();
    format!(
        r#"{{"file":{},"name":{},"date_of_birth":{},"gender":{},"gender_source":"{:?}","email":{},"phone":{},"education":{},"school":{},"major":{},"current_position":{},"experience":{},"applied_position":{},"missing":[{}]}}"#,
        json_str(file),
        json_str(&analysis.personal.name),
        json_str(&analysis.personal.date_of_birth),
        analysis
            .personal
            .gender
            .map(|g| json_str(g.as_str()))
            .unwrap_or_else(|| "null".to_string()),
        analysis.gender_source,
        json_str(&analysis.contact.email),
        json_str(&analysis.contact.phone),
        json_str(&analysis.education.level),
        json_str(&analysis.education.school),
        json_str(&analysis.education.major),
        json_str(&analysis.current_position),
        json_str(&analysis.formatted_experience),
        json_str(&analysis.applied_position),
        missing.join(",")
    )
}

fn print_report(file: &str, analysis: &CvAnalysis) {
    let show = |v: &str| if v.is_empty() { "-".to_string() } else { v.to_string() };

    println!("CV Inspection Results");
    println!("=====================");
    println!("File: {}", file);
    println!();
    println!("Name:             {}", show(&analysis.personal.name));
    println!("Date of birth:    {}", show(&analysis.personal.date_of_birth));
    println!(
        "Gender:           {} ({:?})",
        analysis.personal.gender.map(|g| g.as_str()).unwrap_or("-"),
        analysis.gender_source
    );
    println!("Email:            {}", show(&analysis.contact.email));
    println!("Phone:            {}", show(&analysis.contact.phone));
    println!("Education:        {}", show(&analysis.education.level));
    println!("School:           {}", show(&analysis.education.school));
    println!("Major:            {}", show(&analysis.education.major));
    println!("Current position: {}", show(&analysis.current_position));
    println!("Applied position: {}", show(&analysis.applied_position));
    println!();
    println!("Experience ({} entries):", analysis.experience.len());
    for entry in &analysis.experience {
        match entry {
            ExperienceEntry::Structured(job) => println!(
                "  {:<20} {}{}",
                job.time_range(),
                job.description(),
                if job.is_current() { "  [current]" } else { "" }
            ),
            ExperienceEntry::RawLine(line) => println!("  ? {}", line),
        }
    }

    let missing = analysis.missing_fields();
    if !missing.is_empty() {
        println!();
        println!("Needs review: {}", missing.join(", "));
    }
    println!();
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut files = Vec::new();
    let mut markup_path = None;
    let mut json_output = false;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" => json_output = true,
            "--markup" => markup_path = iter.next().cloned(),
            _ => files.push(arg.clone()),
        }
    }

    if files.is_empty() {
        eprintln!("Usage: {} <file>... [--markup <document.xml>] [--json]", args[0]);
        eprintln!("       files may be .txt, .md, .pdf or an unpacked word/document.xml");
        process::exit(1);
    }

    let analyzer = CvAnalyzer::default();
    let start = Instant::now();
    let mut failed = false;

    let results: Vec<(PathBuf, Result<CvAnalysis, CvError>)> = match &markup_path {
        // A separate markup file pairs with a single transcript
        Some(markup_path) => {
            let result = load_source(&files[0]).and_then(|source| {
                let markup = std::fs::read_to_string(markup_path)?;
                Ok(analyzer.analyze(&source.text, Some(&markup)))
            });
            vec![(PathBuf::from(&files[0]), result)]
        }
        None => process_cv_batch(&files, &analyzer),
    };

    for (path, result) in results {
        let file = path.display().to_string();
        match result {
            Ok(analysis) if json_output => println!("{}", to_json(&file, &analysis)),
            Ok(analysis) => print_report(&file, &analysis),
            Err(e) => {
                failed = true;
                if json_output {
                    println!(r#"{{"file":{},"error":{}}}"#, json_str(&file), json_str(&e.to_string()));
                } else {
                    eprintln!("Error: {}: {}", file, e);
                }
            }
        }
    }

    if !json_output {
        println!("Processing time: {}ms", start.elapsed().as_millis());
    }
    if failed {
        process::exit(1);
    }
}
