use anyhow::Context;
use log::debug;
use mazepath::{compare, ParsedMaze, RunConfig};

fn main() -> Result<(), anyhow::Error> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let maze_path = args
        .next()
        .ok_or_else(|| anyhow::anyhow!("usage: mazepath <maze.txt> [config.json]"))?;

    let maze: ParsedMaze = std::fs::read_to_string(&maze_path)
        .with_context(|| format!("reading {}", maze_path))?
        .parse()
        .with_context(|| format!("parsing {}", maze_path))?;

    let config: RunConfig = match args.next() {
        Some(path) => serde_json::from_str(
            &std::fs::read_to_string(&path).with_context(|| format!("reading {}", path))?,
        )
        .with_context(|| format!("parsing {}", path))?,
        None => RunConfig::default(),
    };

    debug!("{}", maze.grid);

    let reports = compare(&maze.grid, maze.start, maze.end, &config)?;

    println!(
        "{:<6} {:<20} {:>8} {:>10} {:>12}",
        "moves", "heuristic", "length", "explored", "runtime"
    );
    for report in &reports {
        let length = report
            .length
            .map_or_else(|| "none".to_string(), |l| l.to_string());
        println!(
            "{:<6} {:<20} {:>8} {:>10} {:>12?}",
            report.move_set.to_string(),
            report.heuristic.to_string(),
            length,
            report.explored,
            report.elapsed
        );
        debug!(
            "final state for {} / {}:\n{}",
            report.move_set, report.heuristic, report.final_state
        );
    }

    Ok(())
}
