//! Debug tool: dump experience-section line matches and their sort keys

use cv_inspector::experience::{resolve_current_position, JobEntry};
use cv_inspector::load_source;
use cv_inspector::sections::find_experience_section;
use std::env;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: debug_experience <cv_file>");
        std::process::exit(1);
    }

    let source = match load_source(&args[1]) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let Some(section) = find_experience_section(&source.text) else {
        println!("=== NO EXPERIENCE SECTION ({} chars of text) ===", source.text.len());
        return;
    };

    println!("=== EXPERIENCE SECTION ({} chars) ===", section.len());
    let mut jobs = Vec::new();
    for (idx, line) in section.lines().map(str::trim).filter(|l| !l.is_empty()).enumerate() {
        match JobEntry::parse_line(line) {
            Some(job) => {
                println!(
                    "  {:3} MATCH key={:6} current={:5} range={:?} position={:?} company={:?}",
                    idx,
                    job.start_key(),
                    job.is_current(),
                    job.time_range(),
                    job.position(),
                    job.company()
                );
                jobs.push(job);
            }
            None => println!("  {:3} skip  {:?}", idx, line),
        }
    }

    println!();
    println!("current position: {:?}", resolve_current_position(&jobs));
}
